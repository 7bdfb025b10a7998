#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One fetched batch of items at a given page index.
///
/// Item order is whatever the source produced and is never rearranged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Page<T> {
    pub page_number: u32,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(page_number: u32, items: Vec<T>) -> Self {
        Self { page_number, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Shape of the local sliding window: how many items make up a page and how
/// many pages may be resident at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PagingWindowConfig {
    page_size: usize,
    max_pages: usize,
}

impl Default for PagingWindowConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_pages: 3,
        }
    }
}

impl PagingWindowConfig {
    pub fn new(page_size: usize, max_pages: usize) -> Result<Self> {
        let config = Self {
            page_size,
            max_pages,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check the invariants; deserialized values bypass [`Self::new`].
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ModelError::InvalidPageSize(self.page_size));
        }
        if self.max_pages == 0 {
            return Err(ModelError::InvalidMaxPages(self.max_pages));
        }
        Ok(())
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Number of items held when every slot of the window is filled.
    pub fn total_window_size(&self) -> usize {
        self.page_size * self.max_pages
    }

    /// Item offset of a 1-based page number.
    pub fn offset_of(&self, page_number: u32) -> usize {
        (page_number.saturating_sub(1) as usize) * self.page_size
    }
}
