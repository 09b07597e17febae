use thiserror::Error;

use crate::store::StoreError;

/// Problems with a draft that are caught before anything is sent to the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Instructions are required")]
    MissingInstructions,

    #[error("Ingredient {} needs a name", .index + 1)]
    EmptyIngredientName { index: usize },

    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Page-level failures. These replace the whole page rather than showing
/// inline next to a form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("Recipe not found")]
    NotFound,

    #[error("{0}")]
    Load(String),
}

impl PageError {
    /// Convert a store failure into a page error, using `fallback` when the
    /// failure carries no message of its own.
    pub fn from_store(err: &StoreError, fallback: &str) -> Self {
        if err.is_not_found() {
            PageError::NotFound
        } else {
            PageError::Load(err.user_message(fallback))
        }
    }
}
