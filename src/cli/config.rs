//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, grouping settings can live in a file:
//!
//! ```toml
//! # mzdeiso.toml
//! [grouping]
//! mz_tolerance = { absolute = 0.003, ppm = 10.0 }
//! rt_tolerance = { absolute = 0.1 }
//! monotonic_shape = true
//! max_charge = 2
//! representative_isotope = "most_intense"
//! mobility_tolerance = 0.008
//! suffix = "deisotoped"
//! ```
//!
//! Flags given on the command line override the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mzdeiso::feature_list::OriginalListHandling;
use mzdeiso::grouper::RepresentativeIsotope;
use mzdeiso::task::GrouperParameters;
use mzdeiso::tolerance::{MobilityTolerance, MzTolerance, RtTolerance};

/// Root configuration structure for mzdeiso.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Grouping settings.
    #[serde(default)]
    pub grouping: GroupingConfig,
}

/// Settings for the group command. Unset fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupingConfig {
    pub mz_tolerance: Option<MzTolerance>,
    pub rt_tolerance: Option<RtTolerance>,
    pub monotonic_shape: Option<bool>,
    pub max_charge: Option<i32>,
    pub representative_isotope: Option<RepresentativeIsotope>,
    pub isotope_spacing: Option<f64>,
    pub keep_all_ms2: Option<bool>,
    pub mobility_tolerance: Option<MobilityTolerance>,
    pub suffix: Option<String>,
    pub remove_original: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl GroupingConfig {
    /// Overlay the values set in the file onto `parameters`.
    pub fn apply(&self, mut parameters: GrouperParameters) -> GrouperParameters {
        let grouping = &mut parameters.grouping;
        if let Some(mz) = self.mz_tolerance {
            grouping.mz_tolerance = mz;
        }
        if let Some(rt) = self.rt_tolerance {
            grouping.rt_tolerance = rt;
        }
        if let Some(monotonic) = self.monotonic_shape {
            grouping.monotonic_shape = monotonic;
        }
        if let Some(max_charge) = self.max_charge {
            grouping.max_charge = max_charge;
        }
        if let Some(representative) = self.representative_isotope {
            grouping.representative_isotope = representative;
        }
        if let Some(spacing) = self.isotope_spacing {
            grouping.isotope_spacing = spacing;
        }
        if let Some(keep) = self.keep_all_ms2 {
            grouping.keep_all_ms2 = keep;
        }
        if self.mobility_tolerance.is_some() {
            grouping.mobility_tolerance = self.mobility_tolerance;
        }
        if let Some(suffix) = &self.suffix {
            parameters.suffix = suffix.clone();
        }
        if let Some(remove) = self.remove_original {
            parameters.original_handling = OriginalListHandling::from_remove_flag(remove);
        }
        parameters
    }
}
