use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "HealthRec";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Port existing frontends are configured against.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";

/// Hard cap on diagnoses returned by `/predict/`.
pub const MAX_TOP_K: usize = 10;

/// Number of diagnoses returned by `/predict/`.
pub const DEFAULT_TOP_K: usize = MAX_TOP_K;

pub const DEFAULT_ICD9_URL: &str = "https://clinicaltables.nlm.nih.gov/api/icd9cm_dx/v3/search";
pub const DEFAULT_MEDLINEPLUS_URL: &str = "https://connect.medlineplus.gov/service";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "healthrec_lib=info,healthrec=info,tower_http=info"
}

/// Get the application data directory.
///
/// An explicit `HEALTHREC_DATA_DIR` wins; otherwise `~/HealthRec/`. Falls
/// back to the working directory when no home directory can be determined
/// (containers).
fn data_dir_from(overridden: Option<String>) -> PathBuf {
    match overridden {
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .map(|home| home.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Default location of the reference symptom–diagnosis table.
pub fn default_dataset_path(data_dir: &Path) -> PathBuf {
    data_dir.join("datasets").join("final.csv")
}

/// Default location of the exported latent-factor model.
pub fn default_model_path(data_dir: &Path) -> PathBuf {
    data_dir.join("models").join("als_model.json")
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub top_k: usize,
    /// Keep only the best-scoring row per diagnosis label before truncation.
    pub dedupe_labels: bool,
    pub icd9_url: String,
    pub medlineplus_url: String,
    pub lookup_timeout: Duration,
}

impl AppConfig {
    /// Build the configuration from `HEALTHREC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `get`, so tests
    /// don't have to mutate the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = get("HEALTHREC_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                var: "HEALTHREC_BIND",
                value: bind_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let top_k = match get("HEALTHREC_TOP_K") {
            Some(raw) => parse_top_k(&raw)?,
            None => DEFAULT_TOP_K,
        };

        let dedupe_labels = match get("HEALTHREC_DEDUPE_LABELS") {
            Some(raw) => parse_flag("HEALTHREC_DEDUPE_LABELS", &raw)?,
            None => false,
        };

        let lookup_timeout_secs = match get("HEALTHREC_LOOKUP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "HEALTHREC_LOOKUP_TIMEOUT_SECS",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_LOOKUP_TIMEOUT_SECS,
        };

        let data_dir = data_dir_from(get("HEALTHREC_DATA_DIR"));

        Ok(Self {
            bind_addr,
            dataset_path: get("HEALTHREC_DATASET")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_dataset_path(&data_dir)),
            model_path: get("HEALTHREC_MODEL")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_model_path(&data_dir)),
            top_k,
            dedupe_labels,
            icd9_url: get("HEALTHREC_ICD9_URL").unwrap_or_else(|| DEFAULT_ICD9_URL.to_string()),
            medlineplus_url: get("HEALTHREC_MEDLINEPLUS_URL")
                .unwrap_or_else(|| DEFAULT_MEDLINEPLUS_URL.to_string()),
            lookup_timeout: Duration::from_secs(lookup_timeout_secs),
        })
    }
}

fn parse_top_k(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "HEALTHREC_TOP_K",
        value: raw.to_string(),
        reason,
    };
    let value = raw.trim().parse::<usize>().map_err(|e| invalid(e.to_string()))?;
    if !(1..=MAX_TOP_K).contains(&value) {
        return Err(invalid(format!("must be between 1 and {MAX_TOP_K}")));
    }
    Ok(value)
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected true/false".into(),
        }),
    }
}
