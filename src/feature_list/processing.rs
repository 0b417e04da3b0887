use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::FeatureListError;

/// Data processing history for audit trail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingHistory {
    /// List of processing steps applied
    pub steps: Vec<ProcessingStep>,
}

/// A single data processing step in the processing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    /// Step order (1-indexed)
    pub order: i32,

    /// Software name
    pub software: String,

    /// Software version
    pub version: Option<String>,

    /// Processing type (e.g., "isotopic peaks grouper")
    pub processing_type: String,

    /// Timestamp when processing was performed (RFC 3339)
    pub timestamp: Option<String>,

    /// Processing parameters
    pub parameters: BTreeMap<String, String>,
}

impl ProcessingStep {
    /// A step performed now by this crate
    pub fn now(processing_type: impl Into<String>, parameters: BTreeMap<String, String>) -> Self {
        Self {
            order: 0,
            software: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            processing_type: processing_type.into(),
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            parameters,
        }
    }
}

impl ProcessingHistory {
    /// Create a new empty processing history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, numbering it after the existing ones
    pub fn add_step(&mut self, mut step: ProcessingStep) {
        step.order = self.steps.len() as i32 + 1;
        self.steps.push(step);
    }

    /// The most recent step
    pub fn last(&self) -> Option<&ProcessingStep> {
        self.steps.last()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, FeatureListError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, FeatureListError> {
        Ok(serde_json::from_str(json)?)
    }
}
