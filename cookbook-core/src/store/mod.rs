//! Persistence store abstraction.
//!
//! The catalog never owns recipe storage; every read and write goes through a
//! [`RecipeStore`]. [`HttpStore`] talks to the recipe API, [`MemoryStore`]
//! keeps everything in process for demos and tests.

mod http;
mod memory;

pub use http::{HttpStore, HttpStoreBuilder};
pub use memory::{MemoryStore, StoreCall};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};
use crate::types::{Category, Recipe, RecipeCreate, RecipeUpdate};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// The single message shown to the user, or `fallback` if the failure
    /// has nothing to say.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

/// Trait for recipe stores, enabling mockability in tests.
#[async_trait]
pub trait RecipeStore: Send + Sync + fmt::Debug {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError>;

    /// Fetch one recipe. A missing recipe is `StoreError::NotFound`.
    async fn get_recipe(&self, id: i64) -> Result<Recipe, StoreError>;

    async fn create_recipe(&self, payload: &RecipeCreate) -> Result<Recipe, StoreError>;

    async fn update_recipe(&self, id: i64, payload: &RecipeUpdate) -> Result<Recipe, StoreError>;

    async fn delete_recipe(&self, id: i64) -> Result<(), StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Get the store name (e.g., "http", "memory").
    fn store_name(&self) -> &'static str;
}

/// Build the store selected by `config`.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn RecipeStore>, StoreError> {
    match config.backend {
        StoreBackend::Http => Ok(Arc::new(HttpStoreBuilder::from_config(config).build()?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::seeded())),
    }
}
