#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimal catalog record the browser lists and keeps in the library.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogEntry {
    pub id: u64,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub year: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub score: Option<f32>,
}

impl CatalogEntry {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            year: None,
            score: None,
        }
    }
}
