use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::feature::FeatureRow;

use super::{FeatureListError, ProcessingHistory};

/// The features detected in one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureList {
    /// Unique name of the list
    pub name: String,

    /// Name of the sample (raw data file) the features belong to
    pub sample: String,

    /// Feature rows
    pub rows: Vec<FeatureRow>,

    /// Processing applied to produce this list
    #[serde(default)]
    pub history: ProcessingHistory,
}

impl FeatureList {
    /// Create a list with an empty processing history
    pub fn new(name: impl Into<String>, sample: impl Into<String>, rows: Vec<FeatureRow>) -> Self {
        Self {
            name: name.into(),
            sample: sample.into(),
            rows,
            history: ProcessingHistory::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the list has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Name of a list derived from this one by a processing step
    pub fn derived_name(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, suffix)
        }
    }

    /// Find a row by id
    pub fn row_by_id(&self, id: i64) -> Option<&FeatureRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Check that row ids are unique
    pub fn validate(&self) -> Result<(), FeatureListError> {
        let mut seen = HashSet::with_capacity(self.rows.len());
        for row in &self.rows {
            if !seen.insert(row.id) {
                return Err(FeatureListError::DuplicateRowId(row.id));
            }
        }
        Ok(())
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, FeatureListError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, FeatureListError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the list as JSON to a file
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), FeatureListError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a list from a JSON file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self, FeatureListError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
