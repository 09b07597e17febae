//! Positional editing of a draft's ingredient rows.
//!
//! Rows are addressed by index rather than by id: an ingredient that has not
//! been saved yet has no id, and the form binds its inputs by position.

use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::Ingredient;

/// Which editable field of an ingredient row an input is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientField {
    Name,
    Amount,
    Unit,
}

impl IngredientField {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientField::Name => "name",
            IngredientField::Amount => "amount",
            IngredientField::Unit => "unit",
        }
    }
}

impl FromStr for IngredientField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(IngredientField::Name),
            "amount" => Ok(IngredientField::Amount),
            "unit" => Ok(IngredientField::Unit),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// A new value for one field of one ingredient row.
#[derive(Debug, Clone, PartialEq)]
pub enum IngredientUpdate {
    Name(String),
    Amount(f64),
    Unit(String),
}

impl IngredientUpdate {
    /// Build an update from raw text input. An empty amount means 0.
    pub fn from_input(field: IngredientField, raw: &str) -> Result<Self, ValidationError> {
        match field {
            IngredientField::Name => Ok(IngredientUpdate::Name(raw.to_string())),
            IngredientField::Unit => Ok(IngredientUpdate::Unit(raw.to_string())),
            IngredientField::Amount => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(IngredientUpdate::Amount(0.0));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|amount| amount.is_finite())
                    .map(IngredientUpdate::Amount)
                    .ok_or_else(|| ValidationError::InvalidNumber {
                        field: "amount",
                        value: raw.to_string(),
                    })
            }
        }
    }

    fn apply(self, ingredient: &mut Ingredient) {
        match self {
            IngredientUpdate::Name(name) => ingredient.name = name,
            IngredientUpdate::Amount(amount) => ingredient.amount = amount,
            IngredientUpdate::Unit(unit) => ingredient.unit = Some(unit),
        }
    }
}

/// Ordered ingredient rows of a draft. Order is display order and
/// submission order; nothing is ever sorted or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientList(Vec<Ingredient>);

impl IngredientList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a blank row at the end and return its index.
    pub fn append(&mut self) -> usize {
        self.0.push(Ingredient::blank());
        self.0.len() - 1
    }

    /// Replace one field of the row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn update_field(&mut self, index: usize, update: IngredientUpdate) {
        let len = self.0.len();
        let Some(ingredient) = self.0.get_mut(index) else {
            panic!("ingredient index {index} out of range for {len} rows");
        };
        update.apply(ingredient);
    }

    /// Remove the row at `index`; later rows move up by one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove_at(&mut self, index: usize) -> Ingredient {
        let len = self.0.len();
        assert!(index < len, "ingredient index {index} out of range for {len} rows");
        self.0.remove(index)
    }

    pub fn as_slice(&self) -> &[Ingredient] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Ingredient> {
        self.0
    }
}

impl Deref for IngredientList {
    type Target = [Ingredient];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Ingredient>> for IngredientList {
    fn from(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }
}

impl FromIterator<Ingredient> for IngredientList {
    fn from_iter<I: IntoIterator<Item = Ingredient>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a IngredientList {
    type Item = &'a Ingredient;
    type IntoIter = std::slice::Iter<'a, Ingredient>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
