use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    InvalidPageSize(usize),
    InvalidMaxPages(usize),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidPageSize(size) => {
                write!(f, "page size must be greater than zero (got {size})")
            }
            ModelError::InvalidMaxPages(pages) => {
                write!(f, "max pages must be at least one (got {pages})")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
