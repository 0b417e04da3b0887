use serde::{Deserialize, Serialize};

/// Origin of an isotope pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternStatus {
    /// Assembled from features detected in the data
    #[default]
    Detected,
    /// Calculated from a molecular formula
    Predicted,
}

/// One isotope signal within a pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsotopeEntry {
    /// m/z of the isotope signal
    pub mz: f64,
    /// Height of the isotope signal
    pub height: f64,
    /// Id of the feature row the signal was taken from
    pub row_id: i64,
}

/// An ordered isotope spectrum attached to a representative feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotopePattern {
    /// Isotope signals in representative order
    pub entries: Vec<IsotopeEntry>,
    /// Charge state the pattern was fitted with
    pub charge: i32,
    /// Whether the pattern was detected or predicted
    pub status: PatternStatus,
    /// Short human-readable description
    pub description: String,
}

impl IsotopePattern {
    /// Create a detected pattern
    pub fn detected(entries: Vec<IsotopeEntry>, charge: i32, description: impl Into<String>) -> Self {
        Self {
            entries,
            charge,
            status: PatternStatus::Detected,
            description: description.into(),
        }
    }

    /// Number of isotope signals
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pattern has no signals
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summed height over all signals
    pub fn total_height(&self) -> f64 {
        self.entries.iter().map(|e| e.height).sum()
    }

    /// The most intense signal
    pub fn base_peak(&self) -> Option<&IsotopeEntry> {
        self.entries
            .iter()
            .max_by(|a, b| a.height.total_cmp(&b.height))
    }

    /// Ids of all rows contributing to the pattern, in pattern order
    pub fn row_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().map(|e| e.row_id)
    }
}
