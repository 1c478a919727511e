use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{Affinity, AffinityModel, ModelError, ModelInfo};
use crate::reference::{DiagnosisId, SymptomId};

/// On-disk form of an exported ALS model.
///
/// Symptoms play the "user" role and diagnoses the "item" role of the
/// factorization, so `predict` is `u_symptom · v_diagnosis` plus any bias
/// terms the training run learned.
#[derive(Debug, Deserialize)]
pub struct FactorArtifact {
    pub rank: usize,
    #[serde(default)]
    pub global_bias: f32,
    pub symptom_factors: Vec<FactorEntry>,
    pub diagnosis_factors: Vec<FactorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FactorEntry {
    pub id: i64,
    pub features: Vec<f32>,
    #[serde(default)]
    pub bias: f32,
}

#[derive(Debug, Clone)]
struct Factor {
    features: Vec<f32>,
    bias: f32,
}

/// Matrix-factorization model held fully in memory.
#[derive(Debug, Clone)]
pub struct FactorModel {
    rank: usize,
    global_bias: f32,
    symptoms: HashMap<SymptomId, Factor>,
    diagnoses: HashMap<DiagnosisId, Factor>,
}

impl FactorModel {
    /// Validate an artifact and index its factors by id.
    pub fn from_artifact(artifact: FactorArtifact) -> Result<Self, ModelError> {
        if artifact.rank == 0 {
            return Err(ModelError::Malformed("rank must be at least 1".into()));
        }
        let rank = artifact.rank;
        let symptoms = index_factors("symptom", artifact.symptom_factors, rank)?;
        let diagnoses = index_factors("diagnosis", artifact.diagnosis_factors, rank)?;

        Ok(Self {
            rank,
            global_bias: artifact.global_bias,
            symptoms,
            diagnoses,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: FactorArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// Load the exported model from disk.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::Unavailable(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let artifact: FactorArtifact = serde_json::from_reader(std::io::BufReader::new(file))?;
        let model = Self::from_artifact(artifact)?;

        tracing::info!(
            path = %path.display(),
            rank = model.rank,
            symptoms = model.symptoms.len(),
            diagnoses = model.diagnoses.len(),
            "Latent-factor model loaded"
        );
        Ok(model)
    }
}

fn index_factors(
    side: &str,
    entries: Vec<FactorEntry>,
    rank: usize,
) -> Result<HashMap<i64, Factor>, ModelError> {
    let mut out = HashMap::with_capacity(entries.len());
    for entry in entries {
        if entry.features.len() != rank {
            return Err(ModelError::Malformed(format!(
                "{side} {} has {} features, expected {rank}",
                entry.id,
                entry.features.len()
            )));
        }
        let id = entry.id;
        let factor = Factor {
            features: entry.features,
            bias: entry.bias,
        };
        if out.insert(id, factor).is_some() {
            return Err(ModelError::Malformed(format!("duplicate {side} id {id}")));
        }
    }
    Ok(out)
}

impl AffinityModel for FactorModel {
    fn predict(
        &self,
        symptom_id: SymptomId,
        diagnosis_id: DiagnosisId,
    ) -> Result<Affinity, ModelError> {
        let (Some(s), Some(d)) = (self.symptoms.get(&symptom_id), self.diagnoses.get(&diagnosis_id))
        else {
            return Ok(Affinity::OutOfVocabulary);
        };

        let dot: f32 = s
            .features
            .iter()
            .zip(d.features.iter())
            .map(|(a, b)| a * b)
            .sum();
        let score = self.global_bias + s.bias + d.bias + dot;

        // Overflowed or NaN-poisoned factors are as unusable as missing ones.
        if score.is_finite() {
            Ok(Affinity::Score(score))
        } else {
            Ok(Affinity::OutOfVocabulary)
        }
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            rank: self.rank,
            symptoms: self.symptoms.len(),
            diagnoses: self.diagnoses.len(),
        }
    }
}
