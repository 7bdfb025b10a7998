pub mod browse;
pub mod library;

pub use browse::BrowseArgs;
pub use library::LibraryArgs;
