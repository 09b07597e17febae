//! Page-level flows: listing, detail with delete, new and edit.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::display::{detail_badges, ingredient_line, RecipeCard};
use crate::error::PageError;
use crate::form::RecipeForm;
use crate::navigation::{routes, Navigator};
use crate::store::RecipeStore;
use crate::submit::SaveTarget;
use crate::types::Recipe;

const LOAD_RECIPE_FALLBACK: &str = "Failed to load recipe";
const LOAD_RECIPES_FALLBACK: &str = "Failed to load recipes";
const DELETE_FALLBACK: &str = "Failed to delete recipe";

/// Load the recipe listing as cards, in store order.
pub async fn recipe_list(store: &dyn RecipeStore) -> Result<Vec<RecipeCard>, PageError> {
    let recipes = store.list_recipes().await.map_err(|e| {
        tracing::error!(error = %e, "failed to load recipes");
        PageError::from_store(&e, LOAD_RECIPES_FALLBACK)
    })?;
    Ok(recipes.iter().map(RecipeCard::from).collect())
}

/// Open the form for a new recipe.
pub async fn new_recipe(store: Arc<dyn RecipeStore>, navigator: Arc<dyn Navigator>) -> RecipeForm {
    let mut form = RecipeForm::new(store, navigator, SaveTarget::Create, None);
    form.load_categories().await;
    form
}

/// Load recipe `id` and open the form for editing it. No form is built if
/// the recipe cannot be loaded.
pub async fn edit_recipe(
    store: Arc<dyn RecipeStore>,
    navigator: Arc<dyn Navigator>,
    id: i64,
) -> Result<RecipeForm, PageError> {
    let recipe = load_recipe(&*store, id).await?;
    let mut form = RecipeForm::new(store, navigator, SaveTarget::Update(id), Some(&recipe));
    form.load_categories().await;
    Ok(form)
}

async fn load_recipe(store: &dyn RecipeStore, id: i64) -> Result<Recipe, PageError> {
    store.get_recipe(id).await.map_err(|e| {
        tracing::warn!(id, error = %e, "failed to load recipe");
        PageError::from_store(&e, LOAD_RECIPE_FALLBACK)
    })
}

#[derive(Debug)]
pub enum DeleteOutcome {
    /// Deleted; the caller has been sent to the listing.
    Deleted,
    /// The store refused; delete is available again.
    Failed(String),
    /// A delete is already in flight.
    Rejected,
}

#[derive(Debug, Default)]
struct DeleteStatus {
    deleting: bool,
    error: Option<String>,
}

/// A single recipe with its delete action.
pub struct RecipeDetail {
    recipe: Recipe,
    store: Arc<dyn RecipeStore>,
    navigator: Arc<dyn Navigator>,
    status: Mutex<DeleteStatus>,
}

impl RecipeDetail {
    pub async fn load(
        store: Arc<dyn RecipeStore>,
        navigator: Arc<dyn Navigator>,
        id: i64,
    ) -> Result<Self, PageError> {
        let recipe = load_recipe(&*store, id).await?;
        Ok(Self {
            recipe,
            store,
            navigator,
            status: Mutex::new(DeleteStatus::default()),
        })
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn badges(&self) -> Vec<String> {
        detail_badges(&self.recipe)
    }

    pub fn ingredient_lines(&self) -> Vec<String> {
        self.recipe.ingredients.iter().map(ingredient_line).collect()
    }

    pub fn edit_path(&self) -> String {
        routes::edit_recipe(self.recipe.id)
    }

    pub fn is_deleting(&self) -> bool {
        self.status().deleting
    }

    pub fn error(&self) -> Option<String> {
        self.status().error.clone()
    }

    /// Delete the recipe. Confirmation is the caller's job.
    pub async fn delete(&self) -> DeleteOutcome {
        {
            let mut status = self.status();
            if status.deleting {
                return DeleteOutcome::Rejected;
            }
            status.deleting = true;
        }

        let in_flight = Deleting::new(&self.status);
        let result = self.store.delete_recipe(self.recipe.id).await;
        in_flight.finish();

        match result {
            Ok(()) => {
                tracing::info!(id = self.recipe.id, "recipe deleted");
                self.navigator.navigate_to(routes::RECIPES);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!(id = self.recipe.id, error = %e, "failed to delete recipe");
                let message = e.user_message(DELETE_FALLBACK);
                let mut status = self.status();
                status.deleting = false;
                status.error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }

    fn status(&self) -> MutexGuard<'_, DeleteStatus> {
        lock(&self.status)
    }
}

fn lock(status: &Mutex<DeleteStatus>) -> MutexGuard<'_, DeleteStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Re-enables delete if a delete is dropped mid-flight.
struct Deleting<'a> {
    status: &'a Mutex<DeleteStatus>,
    finished: bool,
}

impl<'a> Deleting<'a> {
    fn new(status: &'a Mutex<DeleteStatus>) -> Self {
        Self {
            status,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for Deleting<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("delete abandoned while in flight");
            lock(self.status).deleting = false;
        }
    }
}
