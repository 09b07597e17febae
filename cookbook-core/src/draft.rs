//! Conversions between persisted recipes, editable drafts and submission
//! payloads, plus form-boundary validation.

use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::{Recipe, RecipeDraft, RecipePayload};

/// Project a persisted recipe into editable form state. `None` gives the
/// empty draft for the "new recipe" flow.
pub fn to_draft(recipe: Option<&Recipe>) -> RecipeDraft {
    let Some(recipe) = recipe else {
        return RecipeDraft::default();
    };

    RecipeDraft {
        title: recipe.title.clone(),
        description: recipe.description.clone().unwrap_or_default(),
        instructions: recipe.instructions.clone(),
        prep_time: recipe.prep_time,
        cook_time: recipe.cook_time,
        servings: recipe.servings,
        category_id: recipe.category_id,
        ingredients: recipe.ingredients.iter().cloned().collect(),
    }
}

/// Build the create/update body from a draft. Field for field; the
/// denormalized category and the creation timestamp have no place here.
pub fn to_payload(draft: &RecipeDraft) -> RecipePayload {
    RecipePayload {
        title: draft.title.clone(),
        description: draft.description.clone(),
        instructions: draft.instructions.clone(),
        prep_time: draft.prep_time,
        cook_time: draft.cook_time,
        servings: draft.servings,
        category_id: draft.category_id,
        ingredients: draft.ingredients.as_slice().to_vec(),
    }
}

impl From<&Recipe> for RecipeDraft {
    fn from(recipe: &Recipe) -> Self {
        to_draft(Some(recipe))
    }
}

impl From<&RecipeDraft> for RecipePayload {
    fn from(draft: &RecipeDraft) -> Self {
        to_payload(draft)
    }
}

/// Scalar fields of a draft that are bound to text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    Instructions,
    PrepTime,
    CookTime,
    Servings,
    Category,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::Instructions => "instructions",
            DraftField::PrepTime => "prep_time",
            DraftField::CookTime => "cook_time",
            DraftField::Servings => "servings",
            DraftField::Category => "category_id",
        }
    }
}

impl FromStr for DraftField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(DraftField::Title),
            "description" => Ok(DraftField::Description),
            "instructions" => Ok(DraftField::Instructions),
            "prep_time" => Ok(DraftField::PrepTime),
            "cook_time" => Ok(DraftField::CookTime),
            "servings" => Ok(DraftField::Servings),
            "category_id" | "category" => Ok(DraftField::Category),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

impl RecipeDraft {
    /// Assign a scalar field from raw input text. Empty input clears an
    /// optional number; it never becomes zero.
    pub fn set_from_input(&mut self, field: DraftField, raw: &str) -> Result<(), ValidationError> {
        match field {
            DraftField::Title => self.title = raw.to_string(),
            DraftField::Description => self.description = raw.to_string(),
            DraftField::Instructions => self.instructions = raw.to_string(),
            DraftField::PrepTime => self.prep_time = parse_optional(field, raw)?,
            DraftField::CookTime => self.cook_time = parse_optional(field, raw)?,
            DraftField::Servings => self.servings = parse_optional(field, raw)?,
            DraftField::Category => self.category_id = parse_optional(field, raw)?,
        }
        Ok(())
    }

    /// Check the fields required for submission.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.instructions.trim().is_empty() {
            return Err(ValidationError::MissingInstructions);
        }
        if let Some(index) = self
            .ingredients
            .iter()
            .position(|ingredient| ingredient.name.trim().is_empty())
        {
            return Err(ValidationError::EmptyIngredientName { index });
        }
        Ok(())
    }
}

fn parse_optional<T: FromStr>(field: DraftField, raw: &str) -> Result<Option<T>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::InvalidNumber {
            field: field.as_str(),
            value: raw.to_string(),
        })
}
