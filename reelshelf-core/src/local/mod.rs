//! Bidirectional windowed paging over a local store.

mod controller;
mod memory_store;
mod merge;
mod scroll;
mod window;

pub use controller::WindowedPagerController;
pub use memory_store::MemoryPageStore;
pub use merge::MapFn;
pub use scroll::{ScrollAction, ScrollThresholds};
pub use window::{LocalPagingWindow, WindowChange};
