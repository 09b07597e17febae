//! A recipe editing session: the draft, its category choices, and the
//! controller that saves it.

use std::sync::Arc;

use crate::draft::{to_draft, DraftField};
use crate::error::ValidationError;
use crate::ingredients::{IngredientList, IngredientUpdate};
use crate::navigation::Navigator;
use crate::store::RecipeStore;
use crate::submit::{SaveTarget, SubmissionController, SubmitOutcome, SubmitState, SAVING_LABEL};
use crate::types::{Category, Recipe, RecipeDraft};

pub struct RecipeForm {
    draft: RecipeDraft,
    categories: Vec<Category>,
    controller: SubmissionController,
    store: Arc<dyn RecipeStore>,
    navigator: Arc<dyn Navigator>,
}

impl RecipeForm {
    /// Start a session. `initial` is the recipe being edited, or `None` for a
    /// new one; `target` decides whether submit creates or updates.
    pub fn new(
        store: Arc<dyn RecipeStore>,
        navigator: Arc<dyn Navigator>,
        target: SaveTarget,
        initial: Option<&Recipe>,
    ) -> Self {
        Self {
            draft: to_draft(initial),
            categories: Vec::new(),
            controller: SubmissionController::new(store.clone(), navigator.clone(), target),
            store,
            navigator,
        }
    }

    /// Fetch the category choices. A failure is logged and leaves the list
    /// empty; the form stays usable without categories.
    pub async fn load_categories(&mut self) {
        match self.store.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(e) => tracing::error!(error = %e, "failed to fetch categories"),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    /// Direct access for scalar field assignment.
    pub fn draft_mut(&mut self) -> &mut RecipeDraft {
        &mut self.draft
    }

    pub fn ingredients_mut(&mut self) -> &mut IngredientList {
        &mut self.draft.ingredients
    }

    pub fn set_field(&mut self, field: DraftField, raw: &str) -> Result<(), ValidationError> {
        self.draft.set_from_input(field, raw)
    }

    pub fn add_ingredient(&mut self) -> usize {
        self.draft.ingredients.append()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn update_ingredient(&mut self, index: usize, update: IngredientUpdate) {
        self.draft.ingredients.update_field(index, update);
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove_ingredient(&mut self, index: usize) {
        self.draft.ingredients.remove_at(index);
    }

    pub fn target(&self) -> SaveTarget {
        self.controller.target()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.controller.is_submitting() {
            SAVING_LABEL
        } else {
            self.controller.target().submit_label()
        }
    }

    /// The submit button is disabled while a save is in flight.
    pub fn can_submit(&self) -> bool {
        self.controller.state() == SubmitState::Idle
    }

    pub fn state(&self) -> SubmitState {
        self.controller.state()
    }

    /// The inline error shown above the form.
    pub fn error(&self) -> Option<String> {
        self.controller.error()
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.controller.submit(&self.draft).await
    }

    /// Leave without saving. The draft is discarded.
    pub fn cancel(self) {
        tracing::debug!(save_target = ?self.controller.target(), "edit cancelled");
        self.navigator.back();
    }
}
