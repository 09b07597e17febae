//! Submission of a draft to the store.
//!
//! The controller moves `Idle -> Submitting -> Success` on a successful save
//! and `Idle -> Submitting -> Failed -> Idle` on a failed one, keeping the
//! failure message for display. While a submission is in flight every other
//! submit is rejected without touching the store. The draft is only borrowed,
//! so a failed save leaves every edit in place for a retry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::draft::to_payload;
use crate::error::ValidationError;
use crate::navigation::{routes, Navigator};
use crate::store::RecipeStore;
use crate::types::{Recipe, RecipeDraft};

/// Shown when a failed save carries no message of its own.
pub const SAVE_FALLBACK_MESSAGE: &str = "Failed to save recipe";

/// Submit button label while a save is in flight.
pub const SAVING_LABEL: &str = "Saving...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed,
}

/// Whether a submission creates a new recipe or updates an existing one.
/// Chosen by the page that owns the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(i64),
}

impl SaveTarget {
    pub fn submit_label(&self) -> &'static str {
        match self {
            SaveTarget::Create => "Create Recipe",
            SaveTarget::Update(_) => "Update Recipe",
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The store accepted the recipe and the caller has been sent to the
    /// listing.
    Saved(Recipe),
    /// The draft failed validation; nothing was sent.
    Invalid(ValidationError),
    /// The store call failed; the message is also kept on the controller.
    Failed(String),
    /// Another submission is in flight (or already succeeded).
    Rejected,
}

#[derive(Debug, Default)]
struct Status {
    state: SubmitState,
    error: Option<String>,
}

impl Status {
    fn transition(&mut self, to: SubmitState) {
        tracing::debug!(from = ?self.state, to = ?to, "submit state");
        self.state = to;
    }
}

pub struct SubmissionController {
    store: Arc<dyn RecipeStore>,
    navigator: Arc<dyn Navigator>,
    target: SaveTarget,
    status: Mutex<Status>,
}

impl SubmissionController {
    pub fn new(store: Arc<dyn RecipeStore>, navigator: Arc<dyn Navigator>, target: SaveTarget) -> Self {
        Self {
            store,
            navigator,
            target,
            status: Mutex::new(Status::default()),
        }
    }

    pub fn target(&self) -> SaveTarget {
        self.target
    }

    pub fn state(&self) -> SubmitState {
        self.status().state
    }

    pub fn is_submitting(&self) -> bool {
        self.state() == SubmitState::Submitting
    }

    /// The message from the last failed submit, if the user has not
    /// submitted again since.
    pub fn error(&self) -> Option<String> {
        self.status().error.clone()
    }

    /// Validate `draft` and send it to the store.
    ///
    /// The payload is built from the draft before the store is called, so
    /// every edit made before this call is part of the request.
    ///
    /// Dropping the returned future while the store call is pending abandons
    /// that call: its result is never observed and the controller goes back
    /// to `Idle`.
    pub async fn submit(&self, draft: &RecipeDraft) -> SubmitOutcome {
        {
            let mut status = self.status();
            if status.state != SubmitState::Idle {
                tracing::debug!(state = ?status.state, "submit rejected");
                return SubmitOutcome::Rejected;
            }
            if let Err(err) = draft.validate() {
                status.error = Some(err.to_string());
                return SubmitOutcome::Invalid(err);
            }
            status.error = None;
            status.transition(SubmitState::Submitting);
        }

        let in_flight = InFlight::new(&self.status);
        let payload = to_payload(draft);
        let result = match self.target {
            SaveTarget::Create => self.store.create_recipe(&payload).await,
            SaveTarget::Update(id) => self.store.update_recipe(id, &payload).await,
        };
        in_flight.finish();

        match result {
            Ok(recipe) => {
                tracing::info!(id = recipe.id, title = %recipe.title, save_target = ?self.target, "recipe saved");
                self.status().transition(SubmitState::Success);
                self.navigator.navigate_to(routes::RECIPES);
                SubmitOutcome::Saved(recipe)
            }
            Err(err) => {
                let message = err.user_message(SAVE_FALLBACK_MESSAGE);
                tracing::warn!(error = %err, save_target = ?self.target, "failed to save recipe");
                let mut status = self.status();
                status.transition(SubmitState::Failed);
                status.error = Some(message.clone());
                status.transition(SubmitState::Idle);
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn status(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Puts the controller back to `Idle` if a submission is dropped mid-flight.
struct InFlight<'a> {
    status: &'a Mutex<Status>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn new(status: &'a Mutex<Status>) -> Self {
        Self {
            status,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        if status.state == SubmitState::Submitting {
            tracing::warn!("submission abandoned while in flight");
            status.transition(SubmitState::Idle);
        }
    }
}
