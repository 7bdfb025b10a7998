//! Forward-only paging over the remote catalog.

mod catalog;
mod pager;

pub use catalog::{CatalogApi, CatalogQuery, Season};
pub use pager::{INITIAL_PAGE, RemotePager};
