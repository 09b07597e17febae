//! Navigation collaborator and the catalog's routes.

use std::sync::Mutex;

pub mod routes {
    pub const HOME: &str = "/";
    pub const RECIPES: &str = "/recipes";
    pub const NEW_RECIPE: &str = "/recipes/new";

    pub fn recipe(id: i64) -> String {
        format!("/recipes/{id}")
    }

    pub fn edit_recipe(id: i64) -> String {
        format!("/recipes/{id}/edit")
    }
}

/// Moves the user between pages. Routing itself belongs to the caller.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);

    /// Return to the previous page.
    fn back(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    To(String),
    Back,
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<NavigationEvent> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<NavigationEvent>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::debug!(path, "navigate");
        self.lock().push(NavigationEvent::To(path.to_string()));
    }

    fn back(&self) {
        tracing::debug!("navigate back");
        self.lock().push(NavigationEvent::Back);
    }
}
