use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::feature_list::OriginalListHandling;
use crate::grouper::GrouperConfig;

/// Suffix appended to the name of the deisotoped list
pub const DEFAULT_SUFFIX: &str = "deisotoped";

/// Everything a grouping job needs besides its input list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrouperParameters {
    /// Grouping algorithm settings
    pub grouping: GrouperConfig,

    /// Suffix for the name of the resulting list
    pub suffix: String,

    /// Keep or retire the input list after success
    pub original_handling: OriginalListHandling,
}

impl Default for GrouperParameters {
    fn default() -> Self {
        Self {
            grouping: GrouperConfig::default(),
            suffix: DEFAULT_SUFFIX.to_string(),
            original_handling: OriginalListHandling::Keep,
        }
    }
}

impl GrouperParameters {
    /// Create parameters around a grouping configuration
    pub fn new(grouping: GrouperConfig) -> Self {
        Self {
            grouping,
            ..Default::default()
        }
    }

    /// Set the result name suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set what happens to the input list on success
    pub fn with_original_handling(mut self, handling: OriginalListHandling) -> Self {
        self.original_handling = handling;
        self
    }

    /// Flat parameter listing recorded in the processing history
    pub fn to_parameter_map(&self) -> BTreeMap<String, String> {
        let g = &self.grouping;
        let mut map = BTreeMap::new();
        map.insert("mz_tolerance".to_string(), g.mz_tolerance.to_string());
        map.insert("rt_tolerance".to_string(), g.rt_tolerance.to_string());
        map.insert("monotonic_shape".to_string(), g.monotonic_shape.to_string());
        map.insert("max_charge".to_string(), g.max_charge.to_string());
        map.insert(
            "representative_isotope".to_string(),
            g.representative_isotope.to_string(),
        );
        map.insert("isotope_spacing".to_string(), g.isotope_spacing.to_string());
        map.insert(
            "mobility_tolerance".to_string(),
            g.mobility_tolerance
                .map(|t| t.to_string())
                .unwrap_or_else(|| "none".to_string()),
        );
        map.insert("keep_all_ms2".to_string(), g.keep_all_ms2.to_string());
        map.insert("suffix".to_string(), self.suffix.clone());
        map.insert(
            "remove_original".to_string(),
            (self.original_handling == OriginalListHandling::Remove).to_string(),
        );
        map
    }
}
