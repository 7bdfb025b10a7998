use std::sync::Arc;

/// Materialized view of the local window as seen by observers.
///
/// Every merge produces a fresh `Loaded` snapshot; the list is shared behind
/// an `Arc` so cloning the state out of a watch channel stays cheap.
#[derive(Debug, PartialEq)]
pub enum PagerState<T> {
    /// Nothing has been merged yet.
    Loading,
    /// The resident pages, flattened in window order and mapped.
    Loaded(Arc<Vec<T>>),
    /// The initial window could not be loaded.
    Failed { reason: String },
}

impl<T> PagerState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PagerState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, PagerState::Loaded(_))
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            PagerState::Loaded(items) => Some(items.as_slice()),
            PagerState::Loading | PagerState::Failed { .. } => None,
        }
    }
}

impl<T> Default for PagerState<T> {
    fn default() -> Self {
        PagerState::Loading
    }
}

// Manual impl: cloning only bumps the `Arc`, so `T: Clone` is not required.
impl<T> Clone for PagerState<T> {
    fn clone(&self) -> Self {
        match self {
            PagerState::Loading => PagerState::Loading,
            PagerState::Loaded(items) => PagerState::Loaded(Arc::clone(items)),
            PagerState::Failed { reason } => PagerState::Failed {
                reason: reason.clone(),
            },
        }
    }
}
