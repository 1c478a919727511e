use std::io::Read;
use std::path::Path;

use super::index::SymptomIndex;
use super::record::{SymptomId, SymptomRecord};
use super::ReferenceError;

/// The full reference table held in memory, plus its symptom index.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    records: Vec<SymptomRecord>,
    index: SymptomIndex,
}

impl ReferenceDataset {
    /// Build a dataset from rows already in memory.
    pub fn from_records(records: Vec<SymptomRecord>) -> Result<Self, ReferenceError> {
        if records.is_empty() {
            return Err(ReferenceError::Empty);
        }
        let index = SymptomIndex::build(&records);
        Ok(Self { records, index })
    }

    /// Parse a headered CSV stream. Columns other than
    /// `symptom, syd, did, diagnose_index, diagnose, wei` are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReferenceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let records = rdr
            .deserialize::<SymptomRecord>()
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_records(records)
    }

    /// Load the reference table from a CSV file on disk.
    pub fn load_csv(path: &Path) -> Result<Self, ReferenceError> {
        if !path.exists() {
            return Err(ReferenceError::NotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(std::io::BufReader::new(file))?;

        tracing::info!(
            path = %path.display(),
            rows = dataset.records.len(),
            symptoms = dataset.index.len(),
            "Reference dataset loaded"
        );
        Ok(dataset)
    }

    pub fn records(&self) -> &[SymptomRecord] {
        &self.records
    }

    pub fn resolve(&self, term: &str) -> Option<SymptomId> {
        self.index.resolve(term)
    }

    pub fn distinct_symptoms(&self) -> &[String] {
        self.index.distinct_symptoms()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
