//! Read-only presentation of recipes: listing cards, detail badges and
//! ingredient lines.

use std::fmt;

use crate::navigation::routes;
use crate::types::{Ingredient, Recipe};

/// A recipe as shown in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeCard {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Prep plus cook time, only when it is more than zero.
    pub total_time: Option<u64>,
    pub servings: Option<u32>,
    pub href: String,
}

impl From<&Recipe> for RecipeCard {
    fn from(recipe: &Recipe) -> Self {
        let total_time = recipe.total_time();
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            description: recipe.description.clone().filter(|d| !d.is_empty()),
            category: recipe.category.as_ref().map(|c| c.name.clone()),
            total_time: (total_time > 0).then_some(total_time),
            servings: recipe.servings,
            href: routes::recipe(recipe.id),
        }
    }
}

impl fmt::Display for RecipeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.title)?;
        let mut tags = Vec::new();
        if let Some(category) = &self.category {
            tags.push(category.clone());
        }
        if let Some(total) = self.total_time {
            tags.push(format!("{total} min"));
        }
        if let Some(servings) = self.servings {
            tags.push(format!("Serves {servings}"));
        }
        if !tags.is_empty() {
            write!(f, " [{}]", tags.join(", "))?;
        }
        Ok(())
    }
}

/// "2 cups Flour", "2 Eggs" or just "Salt" when there is no amount.
pub fn ingredient_line(ingredient: &Ingredient) -> String {
    let unit = ingredient.unit.as_deref().filter(|u| !u.is_empty());
    match (ingredient.amount != 0.0, unit) {
        (true, Some(unit)) => format!("{} {} {}", ingredient.amount, unit, ingredient.name),
        (true, None) => format!("{} {}", ingredient.amount, ingredient.name),
        (false, _) => ingredient.name.clone(),
    }
}

/// Badges above a recipe's ingredients.
pub fn detail_badges(recipe: &Recipe) -> Vec<String> {
    let mut badges = Vec::new();
    if let Some(category) = &recipe.category {
        badges.push(category.name.clone());
    }
    if let Some(prep) = recipe.prep_time {
        badges.push(format!("Prep: {prep} min"));
    }
    if let Some(cook) = recipe.cook_time {
        badges.push(format!("Cook: {cook} min"));
    }
    let total = recipe.total_time();
    if total > 0 {
        badges.push(format!("Total: {total} min"));
    }
    if let Some(servings) = recipe.servings {
        badges.push(format!("Serves: {servings}"));
    }
    badges
}
