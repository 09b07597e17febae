//! Sample categories and recipes for a fresh catalog.

use crate::store::{RecipeStore, StoreError};
use crate::types::{Ingredient, RecipeCreate};

/// (name, description)
pub const SAMPLE_CATEGORIES: &[(&str, &str)] = &[
    ("Breakfast", "Morning meals and brunch dishes"),
    ("Lunch", "Midday meals and light dishes"),
    ("Dinner", "Evening meals and hearty dishes"),
    ("Desserts", "Sweet treats and baked goods"),
    ("Appetizers", "Starters and small bites"),
    ("Beverages", "Drinks and cocktails"),
];

pub struct SeedRecipe {
    pub title: &'static str,
    pub description: &'static str,
    pub instructions: &'static str,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    /// Category name, resolved to an id at seed time.
    pub category: &'static str,
    pub ingredients: &'static [(&'static str, f64, &'static str)], // (name, amount, unit)
}

impl SeedRecipe {
    pub fn to_payload(&self, category_id: Option<i64>) -> RecipeCreate {
        RecipeCreate {
            title: self.title.to_string(),
            description: self.description.to_string(),
            instructions: self.instructions.to_string(),
            prep_time: Some(self.prep_time),
            cook_time: Some(self.cook_time),
            servings: Some(self.servings),
            category_id,
            ingredients: self
                .ingredients
                .iter()
                .map(|(name, amount, unit)| Ingredient::new(*name, *amount, *unit))
                .collect(),
        }
    }
}

pub const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Classic Pancakes",
        description: "Fluffy buttermilk pancakes perfect for weekend breakfast",
        instructions: "1. Mix dry ingredients
2. Whisk wet ingredients separately
3. Combine and let rest for 5 minutes
4. Cook on griddle until golden brown",
        prep_time: 10,
        cook_time: 15,
        servings: 4,
        category: "Breakfast",
        ingredients: &[
            ("All-purpose flour", 2.0, "cups"),
            ("Sugar", 2.0, "tablespoons"),
            ("Baking powder", 2.0, "teaspoons"),
            ("Salt", 0.5, "teaspoon"),
            ("Buttermilk", 2.0, "cups"),
            ("Eggs", 2.0, "large"),
            ("Butter (melted)", 4.0, "tablespoons"),
        ],
    },
    SeedRecipe {
        title: "Chocolate Chip Cookies",
        description: "Classic chewy chocolate chip cookies",
        instructions: "1. Cream butter and sugars
2. Add eggs and vanilla
3. Mix in dry ingredients
4. Fold in chocolate chips
5. Bake at 375°F for 10-12 minutes",
        prep_time: 15,
        cook_time: 12,
        servings: 24,
        category: "Desserts",
        ingredients: &[
            ("All-purpose flour", 2.25, "cups"),
            ("Butter (softened)", 1.0, "cup"),
            ("White sugar", 0.75, "cup"),
            ("Brown sugar", 0.75, "cup"),
            ("Eggs", 2.0, "large"),
            ("Vanilla extract", 2.0, "teaspoons"),
            ("Baking soda", 1.0, "teaspoon"),
            ("Salt", 1.0, "teaspoon"),
            ("Chocolate chips", 2.0, "cups"),
        ],
    },
    SeedRecipe {
        title: "Spaghetti Carbonara",
        description: "Classic Italian pasta with eggs, cheese, and pancetta",
        instructions: "1. Cook pasta in salted water
2. Fry pancetta until crispy
3. Mix eggs, cheese, and pepper
4. Toss hot pasta with pancetta
5. Add egg mixture off heat, stirring quickly
6. Serve immediately",
        prep_time: 10,
        cook_time: 20,
        servings: 4,
        category: "Dinner",
        ingredients: &[
            ("Spaghetti", 400.0, "grams"),
            ("Pancetta", 200.0, "grams"),
            ("Eggs", 4.0, "large"),
            ("Parmesan cheese (grated)", 1.0, "cup"),
            ("Black pepper", 1.0, "teaspoon"),
            ("Salt", 1.0, "to taste"),
        ],
    },
];

/// What [`seed_recipes`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedReport {
    /// The store already had this many recipes; nothing was created.
    Skipped { existing: usize },
    Created { titles: Vec<String> },
}

/// Create the sample recipes through `store` unless it already has recipes.
/// Categories are looked up by name; a missing category leaves the recipe
/// uncategorized.
pub async fn seed_recipes(store: &dyn RecipeStore) -> Result<SeedReport, StoreError> {
    let existing = store.list_recipes().await?.len();
    if existing > 0 {
        tracing::info!(existing, "store already has recipes, skipping seed");
        return Ok(SeedReport::Skipped { existing });
    }

    let categories = store.list_categories().await?;
    let mut titles = Vec::with_capacity(SAMPLE_RECIPES.len());

    for sample in SAMPLE_RECIPES {
        let category_id = categories
            .iter()
            .find(|c| c.name == sample.category)
            .map(|c| c.id);
        if category_id.is_none() {
            tracing::warn!(category = sample.category, "category missing, seeding without it");
        }

        let recipe = store.create_recipe(&sample.to_payload(category_id)).await?;
        tracing::info!(id = recipe.id, title = %recipe.title, "seeded recipe");
        titles.push(recipe.title);
    }

    Ok(SeedReport::Created { titles })
}
