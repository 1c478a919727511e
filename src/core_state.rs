//! Process-wide state: the reference dataset and model, loaded once.
//!
//! `CoreState` holds an immutable `Snapshot` behind `RwLock<Arc<_>>`.
//! Requests clone the `Arc` and release the lock immediately, so a reload
//! never mutates anything a request is looking at: it builds a complete new
//! snapshot off-lock and swaps the pointer.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AppConfig;
use crate::model::{AffinityModel, FactorModel, ModelError, ModelInfo};
use crate::pipeline::recommend::RankOptions;
use crate::reference::{ReferenceDataset, ReferenceError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Reference dataset: {0}")]
    Reference(#[from] ReferenceError),
    #[error("Model: {0}")]
    Model(#[from] ModelError),
    #[error("Internal lock poisoned")]
    LockPoisoned,
    #[error("State was built in memory and has no source files to reload")]
    NoSources,
    #[error("Background load task failed: {0}")]
    Task(String),
}

// ═══════════════════════════════════════════════════════════
// Snapshot: immutable for its whole lifetime
// ═══════════════════════════════════════════════════════════

/// Everything a prediction needs, loaded together.
pub struct Snapshot {
    pub dataset: ReferenceDataset,
    pub model: Arc<dyn AffinityModel>,
    pub loaded_at: DateTime<Utc>,
    /// Increments on every successful reload; 1 for the startup load.
    pub generation: u64,
}

impl Snapshot {
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            generation: self.generation,
            loaded_at: self.loaded_at.to_rfc3339(),
            symptoms: self.dataset.distinct_symptoms().len(),
            rows: self.dataset.len(),
            model: self.model.describe(),
        }
    }
}

/// Serializable description of a snapshot (admin + health endpoints).
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSummary {
    pub generation: u64,
    pub loaded_at: String,
    pub symptoms: usize,
    pub rows: usize,
    pub model: ModelInfo,
}

/// Where snapshots are loaded from.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub dataset: PathBuf,
    pub model: PathBuf,
}

impl SourcePaths {
    fn load(&self) -> Result<(ReferenceDataset, Arc<dyn AffinityModel>), CoreError> {
        let dataset = ReferenceDataset::load_csv(&self.dataset)?;
        let model: Arc<dyn AffinityModel> = Arc::new(FactorModel::load(&self.model)?);
        Ok((dataset, model))
    }
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

/// Shared by every request handler through `Arc<CoreState>`.
pub struct CoreState {
    current: RwLock<Arc<Snapshot>>,
    /// Serializes reloads so two admin calls cannot interleave generations.
    reload_lock: Mutex<()>,
    /// `None` for states built from in-memory parts (tests); reload is refused.
    sources: Option<SourcePaths>,
    pub rank_options: RankOptions,
}

impl CoreState {
    /// Load dataset and model from the configured paths.
    ///
    /// Nothing is shared until both have loaded completely, so no request
    /// can ever see a half-initialized snapshot.
    pub fn load(config: &AppConfig) -> Result<Self, CoreError> {
        let sources = SourcePaths {
            dataset: config.dataset_path.clone(),
            model: config.model_path.clone(),
        };
        let (dataset, model) = sources.load()?;
        let state = Self::with_sources(
            dataset,
            model,
            Some(sources),
            RankOptions {
                top_k: config.top_k,
                dedupe_labels: config.dedupe_labels,
            },
        );
        tracing::info!(generation = 1, "Core state initialized");
        Ok(state)
    }

    /// Build a state from already-loaded parts. Such a state cannot reload.
    pub fn from_parts(
        dataset: ReferenceDataset,
        model: Arc<dyn AffinityModel>,
        rank_options: RankOptions,
    ) -> Self {
        Self::with_sources(dataset, model, None, rank_options)
    }

    fn with_sources(
        dataset: ReferenceDataset,
        model: Arc<dyn AffinityModel>,
        sources: Option<SourcePaths>,
        rank_options: RankOptions,
    ) -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot {
                dataset,
                model,
                loaded_at: Utc::now(),
                generation: 1,
            })),
            reload_lock: Mutex::new(()),
            sources,
            rank_options,
        }
    }

    /// Current snapshot. Cheap: one `Arc` clone under a read lock.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.current
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| CoreError::LockPoisoned)
    }

    /// Re-read dataset and model from disk and atomically swap them in.
    ///
    /// Blocking: call from `spawn_blocking` in async contexts. On failure
    /// the previous snapshot stays active.
    pub fn reload(&self) -> Result<SnapshotSummary, CoreError> {
        let Some(sources) = &self.sources else {
            return Err(CoreError::NoSources);
        };
        let _exclusive = self.reload_lock.lock().map_err(|_| CoreError::LockPoisoned)?;

        let (dataset, model) = sources.load()?;
        let generation = self.snapshot()?.generation + 1;
        let next = Arc::new(Snapshot {
            dataset,
            model,
            loaded_at: Utc::now(),
            generation,
        });
        let summary = next.summary();

        {
            let mut guard = self.current.write().map_err(|_| CoreError::LockPoisoned)?;
            *guard = next;
        }

        tracing::info!(generation, rows = summary.rows, "Snapshot reloaded");
        Ok(summary)
    }

    /// Release shared state on shutdown.
    pub fn teardown(self) {
        let generation = self.snapshot().map(|s| s.generation).unwrap_or(0);
        drop(self);
        tracing::info!(generation, "Core state released");
    }
}
