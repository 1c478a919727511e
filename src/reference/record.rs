use serde::{Deserialize, Deserializer, Serialize};

pub type SymptomId = i64;
pub type DiagnosisId = i64;

/// One observed symptom–diagnosis pairing from the reference corpus.
///
/// Field names on the wire follow the exported table (`syd`, `did`,
/// `diagnose_index`, `diagnose`, `wei`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub symptom: String,
    #[serde(rename = "syd", deserialize_with = "lenient_id")]
    pub symptom_id: SymptomId,
    #[serde(rename = "did", deserialize_with = "lenient_id")]
    pub diagnosis_id: DiagnosisId,
    #[serde(rename = "diagnose_index", deserialize_with = "lenient_id")]
    pub diagnosis_index: i64,
    #[serde(rename = "diagnose")]
    pub diagnosis_label: String,
    #[serde(rename = "wei")]
    pub weight: f64,
}

/// Accept integer ids written either as `12` or as `12.0`.
///
/// Schema-inferring exporters render integer columns as doubles once a
/// single null sneaks in; a genuinely fractional id is still rejected.
fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_id(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid id {raw:?}")))
}

pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    let f = trimmed.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
