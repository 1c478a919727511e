use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::medlineplus::{extract_summary, MedlinePlusSummary};
use super::LookupError;
use crate::config::AppConfig;

/// OID of the ICD-9-CM code system in MedlinePlus Connect queries.
const ICD9_CODE_SYSTEM: &str = "2.16.840.1.113883.6.103";

/// MedlinePlus data for one code: the summary, or the reason it is missing.
///
/// A failure for one code does not fail the whole lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MedlinePlusData {
    Summary(MedlinePlusSummary),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeSummary {
    pub icd9_code: String,
    pub medlineplus_data: MedlinePlusData,
}

/// Insert the decimal point the code search omits: `4871` → `487.1`.
pub fn format_icd9_code(code: &str) -> String {
    match code.char_indices().nth(3) {
        Some((split, _)) => format!("{}.{}", &code[..split], &code[split..]),
        None => code.to_string(),
    }
}

/// Async HTTP client for the two NLM services.
#[derive(Clone)]
pub struct LookupClient {
    http: reqwest::Client,
    icd9_url: String,
    medlineplus_url: String,
}

impl LookupClient {
    pub fn new(icd9_url: &str, medlineplus_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            icd9_url: icd9_url.to_string(),
            medlineplus_url: medlineplus_url.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, LookupError> {
        Self::new(&config.icd9_url, &config.medlineplus_url, config.lookup_timeout)
    }

    /// ICD-9-CM codes matching a free-text term.
    pub async fn search_icd9(&self, term: &str) -> Result<Vec<String>, LookupError> {
        let response = self
            .http
            .get(&self.icd9_url)
            .query(&[("terms", term), ("ef", "short_name")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::UpstreamStatus {
                service: "ICD-9 code search",
                status: status.as_u16(),
            });
        }

        // Shape: [total, [codes...], {extra fields}, [[display...]]]
        let data: Value = response.json().await?;
        let codes = data
            .get(1)
            .and_then(Value::as_array)
            .ok_or_else(|| LookupError::ResponseParsing("missing code list".into()))?;

        Ok(codes
            .iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect())
    }

    /// Consumer-health summary for one ICD-9 code.
    pub async fn medlineplus_summary(&self, icd9_code: &str) -> Result<MedlinePlusSummary, LookupError> {
        let formatted = format_icd9_code(icd9_code);
        let response = self
            .http
            .get(&self.medlineplus_url)
            .query(&[
                ("mainSearchCriteria.v.cs", ICD9_CODE_SYSTEM),
                ("mainSearchCriteria.v.c", formatted.as_str()),
                ("knowledgeResponseType", "application/json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::UpstreamStatus {
                service: "MedlinePlus",
                status: status.as_u16(),
            });
        }

        let data: Value = response.json().await?;
        Ok(extract_summary(&data))
    }

    /// Search codes for `term`, then fetch every code's summary concurrently.
    ///
    /// An empty result means the term matched no codes.
    pub async fn lookup(&self, term: &str) -> Result<Vec<CodeSummary>, LookupError> {
        let codes = self.search_icd9(term).await?;

        let fetches = codes.iter().map(|code| async move {
            let medlineplus_data = match self.medlineplus_summary(code).await {
                Ok(summary) => MedlinePlusData::Summary(summary),
                Err(e) => {
                    tracing::warn!(code = %code, error = %e, "MedlinePlus fetch failed");
                    MedlinePlusData::Error(format!(
                        "Unable to fetch MedlinePlus data for ICD-9 code {}",
                        format_icd9_code(code)
                    ))
                }
            };
            CodeSummary {
                icd9_code: code.clone(),
                medlineplus_data,
            }
        });

        Ok(futures_util::future::join_all(fetches).await)
    }
}
