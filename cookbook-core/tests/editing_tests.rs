//! Editing flow tests: drafts, ingredient rows and the payload they produce.

use chrono::{TimeZone, Utc};
use cookbook_core::{
    to_draft, to_payload, total_time, Category, DraftField, Ingredient, IngredientField,
    IngredientList, IngredientUpdate, Recipe, RecipeDraft,
};

fn pancakes() -> Recipe {
    Recipe {
        id: 1,
        title: "Classic Pancakes".to_string(),
        description: Some("Fluffy buttermilk pancakes".to_string()),
        instructions: "1. Mix dry ingredients\n2. Cook on griddle".to_string(),
        prep_time: Some(10),
        cook_time: Some(15),
        servings: Some(4),
        category_id: Some(1),
        category: Some(Category {
            id: 1,
            name: "Breakfast".to_string(),
            description: Some("Morning meals and brunch dishes".to_string()),
        }),
        ingredients: vec![
            Ingredient {
                id: Some(1),
                name: "All-purpose flour".to_string(),
                amount: 2.0,
                unit: Some("cups".to_string()),
            },
            Ingredient {
                id: Some(2),
                name: "Salt".to_string(),
                amount: 0.5,
                unit: Some("teaspoon".to_string()),
            },
            Ingredient {
                id: Some(3),
                name: "Eggs".to_string(),
                amount: 2.0,
                unit: None,
            },
        ],
        created_at: Utc.with_ymd_and_hms(2024, 5, 4, 9, 0, 0).unwrap(),
    }
}

#[test]
fn test_new_recipe_draft_is_empty() {
    let draft = to_draft(None);
    assert_eq!(draft, RecipeDraft::default());
    assert_eq!(draft.title, "");
    assert_eq!(draft.instructions, "");
    assert!(draft.ingredients.is_empty());
    assert_eq!(
        (draft.prep_time, draft.cook_time, draft.servings, draft.category_id),
        (None, None, None, None)
    );
}

#[test]
fn test_payload_of_loaded_recipe_matches_recipe() {
    let recipe = pancakes();
    let payload = to_payload(&to_draft(Some(&recipe)));

    assert_eq!(payload.title, recipe.title);
    assert_eq!(payload.instructions, recipe.instructions);
    assert_eq!(payload.prep_time, recipe.prep_time);
    assert_eq!(payload.cook_time, recipe.cook_time);
    assert_eq!(payload.servings, recipe.servings);
    assert_eq!(payload.category_id, recipe.category_id);
    assert_eq!(payload.ingredients, recipe.ingredients);

    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("id").is_none());
    assert!(json.get("category").is_none());
    assert!(json.get("created_at").is_none());
}

#[test]
fn test_total_time() {
    assert_eq!(total_time(Some(10), Some(20)), 30);
    assert_eq!(total_time(None, Some(20)), 20);

    let mut draft = to_draft(Some(&pancakes()));
    assert_eq!(draft.total_time(), 25);
    draft.set_from_input(DraftField::CookTime, "").unwrap();
    assert_eq!(draft.total_time(), 10);
    assert_eq!(draft.cook_time, None);
}

#[test]
fn test_append_and_fill_first_row() {
    let mut list = IngredientList::new();
    list.append();
    list.update_field(0, IngredientUpdate::Name("Flour".to_string()));
    list.update_field(0, IngredientUpdate::Amount(2.0));

    assert_eq!(
        list.as_slice(),
        &[Ingredient {
            id: None,
            name: "Flour".to_string(),
            amount: 2.0,
            unit: Some(String::new()),
        }]
    );
}

#[test]
fn test_remove_first_of_two_rows() {
    let mut list = IngredientList::new();
    list.append();
    list.append();
    list.update_field(1, IngredientUpdate::Name("Butter".to_string()));
    let second = list[1].clone();

    list.remove_at(0);

    assert_eq!(list.len(), 1);
    assert_eq!(list[0], second);
}

#[test]
fn test_editing_a_loaded_recipe_keeps_other_rows() {
    let recipe = pancakes();
    let mut draft = to_draft(Some(&recipe));

    draft.ingredients.remove_at(1);
    let index = draft.ingredients.append();
    let amount = IngredientUpdate::from_input(IngredientField::Amount, "3").unwrap();
    draft.ingredients.update_field(index, amount);
    draft
        .ingredients
        .update_field(index, IngredientUpdate::Name("Buttermilk".to_string()));

    let payload = to_payload(&draft);
    let names: Vec<&str> = payload.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["All-purpose flour", "Eggs", "Buttermilk"]);
    assert_eq!(payload.ingredients[0], recipe.ingredients[0]);
    assert_eq!(payload.ingredients[1], recipe.ingredients[2]);
    assert_eq!(payload.ingredients[2].id, None);
    assert_eq!(payload.ingredients[2].amount, 3.0);
}

/// Small deterministic generator so the sequence test needs no extra crates.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

#[test]
fn test_operation_sequences_keep_length_and_order() {
    for seed in 0..20 {
        let mut rng = Lcg(seed);
        let mut list = IngredientList::new();
        let mut model: Vec<usize> = Vec::new();
        let (mut appends, mut removes) = (0usize, 0usize);

        for step in 0..200 {
            match rng.next(3) {
                0 => {
                    let index = list.append();
                    list.update_field(index, IngredientUpdate::Name(appends.to_string()));
                    model.push(appends);
                    appends += 1;
                }
                1 if !list.is_empty() => {
                    let index = rng.next(list.len());
                    list.remove_at(index);
                    model.remove(index);
                    removes += 1;
                }
                _ if !list.is_empty() => {
                    let index = rng.next(list.len());
                    list.update_field(index, IngredientUpdate::Amount(step as f64));
                }
                _ => {}
            }
        }

        assert_eq!(list.len(), appends - removes);
        let order: Vec<usize> = list.iter().map(|i| i.name.parse().unwrap()).collect();
        assert_eq!(order, model);
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }
}
