use serde::{Deserialize, Serialize};
use std::fmt;

use super::pattern::IsotopePattern;

/// A detected chromatographic feature in one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Observed mass-to-charge ratio
    pub mz: f64,
    /// Retention time in minutes
    pub rt: f64,
    /// Peak height (apex intensity)
    pub height: f64,
    /// Ion mobility at the apex, if the data has a mobility dimension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobility: Option<f64>,
}

impl Feature {
    /// Create a feature without ion mobility
    pub fn new(mz: f64, rt: f64, height: f64) -> Self {
        Self {
            mz,
            rt,
            height,
            mobility: None,
        }
    }

    /// Attach an ion mobility value
    pub fn with_mobility(mut self, mobility: f64) -> Self {
        self.mobility = Some(mobility);
        self
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m/z {:.4} @ {:.2} min", self.mz, self.rt)
    }
}

/// One row of a feature list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Numeric row identifier, unique within a feature list
    pub id: i64,

    /// The feature detected for this row
    pub feature: Feature,

    /// Charge state, if known
    #[serde(default)]
    pub charge: Option<i32>,

    /// Free-form user comment
    #[serde(default)]
    pub comment: Option<String>,

    /// Prior identification (compound name, annotation, ...)
    #[serde(default)]
    pub identity: Option<String>,

    /// Scan numbers of MS2 spectra acquired on this feature
    #[serde(default)]
    pub fragment_scans: Vec<i64>,

    /// Isotope pattern assigned to this row
    #[serde(default)]
    pub isotope_pattern: Option<IsotopePattern>,

    /// How the most recent grouping pass produced this row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<GroupingTag>,
}

impl FeatureRow {
    /// Create a row with no metadata
    pub fn new(id: i64, feature: Feature) -> Self {
        Self {
            id,
            feature,
            charge: None,
            comment: None,
            identity: None,
            fragment_scans: Vec::new(),
            isotope_pattern: None,
            grouping: None,
        }
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the prior identification
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Set the fragment scan references
    pub fn with_fragment_scans(mut self, scans: Vec<i64>) -> Self {
        self.fragment_scans = scans;
        self
    }
}

/// Whether a grouping pass merged a row or copied it through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingKind {
    /// No isotopes were found; the input row was copied unchanged
    PassThrough,
    /// The row replaces an isotope group of two or more features
    Merged,
}

impl GroupingKind {
    /// Label used in tabular output
    pub const fn as_str(&self) -> &'static str {
        match self {
            GroupingKind::PassThrough => "pass-through",
            GroupingKind::Merged => "merged",
        }
    }
}

impl fmt::Display for GroupingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance attached to every row a grouping pass emits.
///
/// The tag is replaced on each pass, so a row carried through a second
/// grouping reports that pass, not the one that built its isotope pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingTag {
    /// Merge or pass-through
    pub kind: GroupingKind,
    /// Ids of the input rows the row was built from, in pattern order
    pub source_ids: Vec<i64>,
}

impl GroupingTag {
    /// Tag for a row copied through unchanged
    pub fn pass_through(source_id: i64) -> Self {
        Self {
            kind: GroupingKind::PassThrough,
            source_ids: vec![source_id],
        }
    }

    /// Tag for a row built from an isotope group
    pub fn merged(source_ids: Vec<i64>) -> Self {
        Self {
            kind: GroupingKind::Merged,
            source_ids,
        }
    }

    /// Whether the row replaces an isotope group
    pub fn is_merged(&self) -> bool {
        self.kind == GroupingKind::Merged
    }
}

impl fmt::Display for FeatureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.feature)
    }
}
