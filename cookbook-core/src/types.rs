//! Entity model: persisted recipes, their ingredients and categories, and the
//! editable draft / submission payload shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ingredients::IngredientList;

/// A recipe category. Read-only from the editor's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One ingredient line. `id` is absent until the store has persisted it and
/// is passed through untouched by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Ingredient {
    /// The row added by the "add ingredient" action.
    pub fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            amount: 0.0,
            unit: Some(String::new()),
        }
    }

    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            amount,
            unit: Some(unit.into()),
        }
    }
}

/// A recipe as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub instructions: String,
    #[serde(default)]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub cook_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Denormalized copy of the category named by `category_id`.
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    pub fn total_time(&self) -> u64 {
        total_time(self.prep_time, self.cook_time)
    }
}

/// Editable form state for a recipe being created or edited.
///
/// `Default` is the empty draft used by the "new recipe" flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub category_id: Option<i64>,
    pub ingredients: IngredientList,
}

impl RecipeDraft {
    pub fn total_time(&self) -> u64 {
        total_time(self.prep_time, self.cook_time)
    }
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePayload {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub category_id: Option<i64>,
    pub ingredients: Vec<Ingredient>,
}

pub type RecipeCreate = RecipePayload;
pub type RecipeUpdate = RecipePayload;

/// Unset times count as zero here and nowhere else. Widened so two `u32`
/// times always fit.
pub fn total_time(prep_time: Option<u32>, cook_time: Option<u32>) -> u64 {
    u64::from(prep_time.unwrap_or(0)) + u64::from(cook_time.unwrap_or(0))
}

/// Timestamps come back either as RFC 3339 or as a naive ISO datetime
/// (assumed UTC), depending on the backend.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_time_treats_unset_as_zero() {
        assert_eq!(total_time(Some(10), Some(20)), 30);
        assert_eq!(total_time(None, Some(20)), 20);
        assert_eq!(total_time(None, None), 0);
    }

    #[test]
    fn test_total_time_of_largest_times() {
        assert_eq!(total_time(Some(u32::MAX), Some(1)), u64::from(u32::MAX) + 1);
        assert_eq!(total_time(Some(u32::MAX), Some(u32::MAX)), 2 * u64::from(u32::MAX));

        let draft = RecipeDraft {
            prep_time: Some(4_000_000_000),
            cook_time: Some(4_000_000_000),
            ..RecipeDraft::default()
        };
        assert_eq!(draft.total_time(), 8_000_000_000);
    }

    #[test]
    fn test_recipe_deserializes_naive_timestamp() {
        let json = r#"{
            "id": 3,
            "title": "Spaghetti Carbonara",
            "description": null,
            "instructions": "Cook pasta",
            "prep_time": 10,
            "cook_time": null,
            "category_id": 3,
            "category": {"id": 3, "name": "Dinner", "description": "Evening meals and hearty dishes"},
            "ingredients": [{"id": 7, "name": "Spaghetti", "amount": 400, "unit": "grams"}],
            "created_at": "2024-03-01T18:30:00.123456"
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.prep_time, Some(10));
        assert_eq!(recipe.cook_time, None);
        assert_eq!(recipe.servings, None);
        assert_eq!(recipe.category.as_ref().map(|c| c.name.as_str()), Some("Dinner"));
        assert_eq!(recipe.ingredients[0].id, Some(7));
        assert_eq!(recipe.ingredients[0].amount, 400.0);
        assert_eq!(recipe.created_at.to_rfc3339(), "2024-03-01T18:30:00.123456+00:00");
    }

    #[test]
    fn test_recipe_deserializes_rfc3339_timestamp() {
        let json = r#"{
            "id": 1,
            "title": "Pancakes",
            "instructions": "Mix",
            "created_at": "2024-03-01T18:30:00Z"
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.total_time(), 0);
    }

    #[test]
    fn test_payload_serializes_unset_scalars_as_null() {
        let payload = RecipePayload {
            title: "Toast".to_string(),
            description: String::new(),
            instructions: "Toast the bread".to_string(),
            prep_time: None,
            cook_time: Some(0),
            servings: None,
            category_id: None,
            ingredients: vec![Ingredient::new("Bread", 2.0, "slices")],
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["prep_time"].is_null());
        assert_eq!(value["cook_time"], 0);
        assert!(value.get("category").is_none());
        assert!(value.get("created_at").is_none());
        assert!(value["ingredients"][0].get("id").is_none());
    }
}
