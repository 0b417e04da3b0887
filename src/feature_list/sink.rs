use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{FeatureList, FeatureListError};

/// What to do with the input list after a successful processing step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginalListHandling {
    /// Keep the original list next to the new one
    #[default]
    Keep,
    /// Retire the original list once the new one is registered
    Remove,
}

impl OriginalListHandling {
    /// Map a "remove original on success" flag
    pub fn from_remove_flag(remove: bool) -> Self {
        if remove {
            OriginalListHandling::Remove
        } else {
            OriginalListHandling::Keep
        }
    }
}

/// Receiver of processing results
pub trait ResultSink {
    /// Register a new feature list
    fn register(&mut self, list: FeatureList) -> Result<(), FeatureListError>;

    /// Retire a list by name, returning it if it was registered
    fn retire(&mut self, name: &str) -> Option<FeatureList>;
}

/// In-memory collection of feature lists
#[derive(Debug, Clone, Default)]
pub struct Project {
    lists: Vec<FeatureList>,
}

impl Project {
    /// Create an empty project
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered lists, in registration order
    pub fn lists(&self) -> &[FeatureList] {
        &self.lists
    }

    /// Look up a list by name
    pub fn get(&self, name: &str) -> Option<&FeatureList> {
        self.lists.iter().find(|list| list.name == name)
    }

    /// Take ownership of all lists
    pub fn into_lists(self) -> Vec<FeatureList> {
        self.lists
    }
}

impl ResultSink for Project {
    fn register(&mut self, list: FeatureList) -> Result<(), FeatureListError> {
        if self.get(&list.name).is_some() {
            return Err(FeatureListError::DuplicateName(list.name));
        }
        info!("Registered feature list '{}' ({} rows)", list.name, list.len());
        self.lists.push(list);
        Ok(())
    }

    fn retire(&mut self, name: &str) -> Option<FeatureList> {
        let position = self.lists.iter().position(|list| list.name == name)?;
        debug!("Retired feature list '{}'", name);
        Some(self.lists.remove(position))
    }
}
