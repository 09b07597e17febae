//! In-process recipe store.
//!
//! Holds recipes and categories in memory and behaves like the recipe API:
//! ids and timestamps are assigned on create, the category object is filled
//! in from `category_id`, and unknown ids are `NotFound`. Tests can make the
//! next calls fail and can hold write calls until released.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use super::{RecipeStore, StoreError};
use crate::seed::{SAMPLE_CATEGORIES, SAMPLE_RECIPES};
use crate::types::{Category, Ingredient, Recipe, RecipePayload};

/// A call that reached the store, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListRecipes,
    GetRecipe(i64),
    CreateRecipe,
    UpdateRecipe(i64),
    DeleteRecipe(i64),
    ListCategories,
}

impl StoreCall {
    fn is_write(&self) -> bool {
        matches!(
            self,
            StoreCall::CreateRecipe | StoreCall::UpdateRecipe(_) | StoreCall::DeleteRecipe(_)
        )
    }
}

#[derive(Debug, Default)]
struct Catalog {
    recipes: Vec<Recipe>,
    categories: Vec<Category>,
    next_recipe_id: i64,
    next_ingredient_id: i64,
}

impl Catalog {
    fn category(&self, id: Option<i64>) -> Result<Option<Category>, StoreError> {
        let Some(id) = id else {
            return Ok(None);
        };
        self.categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(Some)
            .ok_or_else(|| StoreError::Api {
                status: 400,
                message: format!("Category {id} does not exist"),
            })
    }

    fn assign_ingredient_ids(&mut self, ingredients: &[Ingredient]) -> Vec<Ingredient> {
        ingredients
            .iter()
            .map(|ingredient| {
                let mut ingredient = ingredient.clone();
                if ingredient.id.is_none() {
                    self.next_ingredient_id += 1;
                    ingredient.id = Some(self.next_ingredient_id);
                }
                ingredient
            })
            .collect()
    }

    fn insert(&mut self, payload: &RecipePayload) -> Result<Recipe, StoreError> {
        let category = self.category(payload.category_id)?;
        let ingredients = self.assign_ingredient_ids(&payload.ingredients);
        self.next_recipe_id += 1;

        let recipe = Recipe {
            id: self.next_recipe_id,
            title: payload.title.clone(),
            description: non_empty(&payload.description),
            instructions: payload.instructions.clone(),
            prep_time: payload.prep_time,
            cook_time: payload.cook_time,
            servings: payload.servings,
            category_id: payload.category_id,
            category,
            ingredients,
            created_at: Utc::now(),
        };
        self.recipes.push(recipe.clone());
        Ok(recipe)
    }

    fn replace(&mut self, id: i64, payload: &RecipePayload) -> Result<Recipe, StoreError> {
        let position = self
            .recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound {
                resource: "Recipe",
                id,
            })?;
        let category = self.category(payload.category_id)?;
        let ingredients = self.assign_ingredient_ids(&payload.ingredients);

        let recipe = &mut self.recipes[position];
        recipe.title = payload.title.clone();
        recipe.description = non_empty(&payload.description);
        recipe.instructions = payload.instructions.clone();
        recipe.prep_time = payload.prep_time;
        recipe.cook_time = payload.cook_time;
        recipe.servings = payload.servings;
        recipe.category_id = payload.category_id;
        recipe.category = category;
        recipe.ingredients = ingredients;
        Ok(recipe.clone())
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    catalog: Mutex<Catalog>,
    calls: Mutex<Vec<StoreCall>>,
    /// Messages for upcoming calls that should fail, oldest first.
    failures: Mutex<VecDeque<String>>,
    write_gate: Option<Arc<Notify>>,
}

impl MemoryStore {
    /// Create an empty store with no categories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the sample categories and recipes.
    pub fn seeded() -> Self {
        let store = Self::new().with_categories(
            SAMPLE_CATEGORIES
                .iter()
                .map(|(name, description)| (*name, Some(*description))),
        );
        {
            let mut catalog = store.catalog();
            for sample in SAMPLE_RECIPES {
                let category_id = catalog
                    .categories
                    .iter()
                    .find(|c| c.name == sample.category)
                    .map(|c| c.id);
                // Sample categories always exist, so this cannot fail.
                if let Err(e) = catalog.insert(&sample.to_payload(category_id)) {
                    tracing::warn!(title = sample.title, error = %e, "failed to seed recipe");
                }
            }
        }
        store
    }

    /// Add categories, numbered from 1 in the order given.
    pub fn with_categories<'a>(
        self,
        categories: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
    ) -> Self {
        {
            let mut catalog = self.catalog();
            for (name, description) in categories {
                let id = catalog.categories.len() as i64 + 1;
                catalog.categories.push(Category {
                    id,
                    name: name.to_string(),
                    description: description.map(str::to_string),
                });
            }
        }
        self
    }

    /// Make create, update and delete calls wait until `gate` is notified.
    pub fn with_write_gate(mut self, gate: Arc<Notify>) -> Self {
        self.write_gate = Some(gate);
        self
    }

    /// Insert a recipe directly, bypassing call recording and failures.
    pub fn insert(&self, payload: &RecipePayload) -> Result<Recipe, StoreError> {
        self.catalog().insert(payload)
    }

    /// Make the next call fail with `message`. Queued failures are consumed
    /// one per call.
    pub fn fail_next(&self, message: impl Into<String>) {
        lock(&self.failures).push_back(message.into());
    }

    /// Every call that has reached the store so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn write_count(&self) -> usize {
        lock(&self.calls).iter().filter(|c| c.is_write()).count()
    }

    pub fn recipe_count(&self) -> usize {
        self.catalog().recipes.len()
    }

    fn catalog(&self) -> MutexGuard<'_, Catalog> {
        lock(&self.catalog)
    }

    /// Record the call, wait on the write gate if this is a write, then
    /// consume a queued failure if there is one.
    async fn enter(&self, call: StoreCall) -> Result<(), StoreError> {
        let is_write = call.is_write();
        tracing::debug!(?call, "memory store call");
        lock(&self.calls).push(call);

        if is_write {
            if let Some(gate) = &self.write_gate {
                gate.notified().await;
            }
        }

        match lock(&self.failures).pop_front() {
            Some(message) => Err(StoreError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        self.enter(StoreCall::ListRecipes).await?;
        Ok(self.catalog().recipes.clone())
    }

    async fn get_recipe(&self, id: i64) -> Result<Recipe, StoreError> {
        self.enter(StoreCall::GetRecipe(id)).await?;
        self.catalog()
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                resource: "Recipe",
                id,
            })
    }

    async fn create_recipe(&self, payload: &RecipePayload) -> Result<Recipe, StoreError> {
        self.enter(StoreCall::CreateRecipe).await?;
        self.catalog().insert(payload)
    }

    async fn update_recipe(&self, id: i64, payload: &RecipePayload) -> Result<Recipe, StoreError> {
        self.enter(StoreCall::UpdateRecipe(id)).await?;
        self.catalog().replace(id, payload)
    }

    async fn delete_recipe(&self, id: i64) -> Result<(), StoreError> {
        self.enter(StoreCall::DeleteRecipe(id)).await?;
        let mut catalog = self.catalog();
        let before = catalog.recipes.len();
        catalog.recipes.retain(|r| r.id != id);
        if catalog.recipes.len() == before {
            return Err(StoreError::NotFound {
                resource: "Recipe",
                id,
            });
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.enter(StoreCall::ListCategories).await?;
        Ok(self.catalog().categories.clone())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> RecipePayload {
        RecipePayload {
            title: title.to_string(),
            description: String::new(),
            instructions: "Stir".to_string(),
            prep_time: None,
            cook_time: None,
            servings: None,
            category_id: None,
            ingredients: vec![Ingredient::new("Water", 1.0, "cup")],
        }
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_category() {
        let store = MemoryStore::new().with_categories([("Soups", None)]);
        let mut body = payload("Broth");
        body.category_id = Some(1);

        let recipe = store.create_recipe(&body).await.unwrap();

        assert_eq!(recipe.id, 1);
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.category.map(|c| c.name), Some("Soups".to_string()));
        assert_eq!(recipe.ingredients[0].id, Some(1));
    }

    #[tokio::test]
    async fn test_update_keeps_existing_ingredient_ids() {
        let store = MemoryStore::new();
        let created = store.create_recipe(&payload("Broth")).await.unwrap();

        let mut body = payload("Better Broth");
        body.ingredients = created.ingredients.clone();
        body.ingredients.push(Ingredient::new("Salt", 1.0, "pinch"));

        let updated = store.update_recipe(created.id, &body).await.unwrap();
        assert_eq!(updated.title, "Better Broth");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.ingredients[0].id, created.ingredients[0].id);
        assert_eq!(updated.ingredients[1].id, Some(2));
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let store = MemoryStore::new();
        assert!(store.get_recipe(9).await.unwrap_err().is_not_found());
        assert!(store.delete_recipe(9).await.unwrap_err().is_not_found());
        assert!(store
            .update_recipe(9, &payload("x"))
            .await
            .unwrap_err()
            .is_not_found());

        let mut body = payload("x");
        body.category_id = Some(42);
        let err = store.create_recipe(&body).await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_fail_next_consumes_one_failure() {
        let store = MemoryStore::new();
        store.fail_next("database is down");

        let err = store.list_recipes().await.unwrap_err();
        assert_eq!(err.to_string(), "database is down");
        assert!(store.list_recipes().await.is_ok());
        assert_eq!(store.calls(), vec![StoreCall::ListRecipes, StoreCall::ListRecipes]);
    }

    #[test]
    fn test_seeded_store() {
        let store = MemoryStore::seeded();
        let catalog = store.catalog();
        assert_eq!(catalog.categories.len(), 6);
        assert_eq!(catalog.recipes.len(), 3);
        assert!(catalog.recipes.iter().all(|r| r.category.is_some()));
    }
}
