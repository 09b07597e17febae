pub mod config;
pub mod display;
pub mod draft;
pub mod error;
pub mod form;
pub mod ingredients;
pub mod navigation;
pub mod pages;
pub mod seed;
pub mod store;
pub mod submit;
pub mod types;

pub use config::{ConfigError, StoreBackend, StoreConfig};
pub use display::{detail_badges, ingredient_line, RecipeCard};
pub use draft::{to_draft, to_payload, DraftField};
pub use error::{PageError, ValidationError};
pub use form::RecipeForm;
pub use ingredients::{IngredientField, IngredientList, IngredientUpdate};
pub use navigation::{routes, NavigationEvent, Navigator, RecordingNavigator};
pub use pages::{DeleteOutcome, RecipeDetail};
pub use seed::{seed_recipes, SeedReport};
pub use store::{create_store, HttpStore, HttpStoreBuilder, MemoryStore, RecipeStore, StoreCall, StoreError};
pub use submit::{SaveTarget, SubmissionController, SubmitOutcome, SubmitState};
pub use types::{
    total_time, Category, Ingredient, Recipe, RecipeCreate, RecipeDraft, RecipePayload,
    RecipeUpdate,
};
