use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use cookbook_core::{
    DraftField, IngredientField, IngredientUpdate, NavigationEvent, RecipeForm,
    RecordingNavigator, SubmitOutcome,
};

/// Field values for `new` and `edit`. Anything left out keeps its current
/// value; pass an empty string to clear an optional number.
#[derive(Args, Debug, Default)]
pub struct RecipeArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub instructions: Option<String>,

    /// Prep time in minutes
    #[arg(long)]
    pub prep_time: Option<String>,

    /// Cook time in minutes
    #[arg(long)]
    pub cook_time: Option<String>,

    #[arg(long)]
    pub servings: Option<String>,

    /// Category name or id
    #[arg(long)]
    pub category: Option<String>,

    /// Ingredient to append, as "name:amount:unit" (repeatable)
    #[arg(long = "ingredient")]
    pub ingredients: Vec<String>,
}

/// Apply command-line edits to the form: removals first, then scalar
/// fields, then appended ingredients.
pub fn apply_edits(form: &mut RecipeForm, args: &RecipeArgs, removals: &[usize]) -> Result<()> {
    let mut removals = removals.to_vec();
    removals.sort_unstable();
    removals.dedup();
    let rows = form.draft().ingredients.len();
    if let Some(&index) = removals.iter().find(|&&index| index >= rows) {
        bail!("No ingredient at position {index} (recipe has {rows})");
    }
    // Highest first so earlier positions stay put.
    for &index in removals.iter().rev() {
        form.remove_ingredient(index);
    }

    let scalars = [
        (DraftField::Title, &args.title),
        (DraftField::Description, &args.description),
        (DraftField::Instructions, &args.instructions),
        (DraftField::PrepTime, &args.prep_time),
        (DraftField::CookTime, &args.cook_time),
        (DraftField::Servings, &args.servings),
    ];
    for (field, value) in scalars {
        if let Some(raw) = value {
            form.set_field(field, raw)?;
        }
    }

    if let Some(category) = &args.category {
        let raw = resolve_category(form, category)?;
        form.set_field(DraftField::Category, &raw)?;
    }

    for entry in &args.ingredients {
        let updates = parse_ingredient(entry)?;
        let index = form.add_ingredient();
        for update in updates {
            form.update_ingredient(index, update);
        }
    }

    Ok(())
}

/// Accept a category id, a category name (case-insensitive), or an empty
/// string to clear it.
fn resolve_category(form: &RecipeForm, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() || value.parse::<i64>().is_ok() {
        return Ok(value.to_string());
    }
    form.categories()
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(value))
        .map(|c| c.id.to_string())
        .with_context(|| format!("Unknown category: {value}"))
}

/// Parse "name:amount:unit". Amount and unit may be omitted.
fn parse_ingredient(entry: &str) -> Result<Vec<IngredientUpdate>> {
    let mut parts = entry.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        bail!("Ingredient {entry:?} needs a name");
    }

    let mut updates = vec![IngredientUpdate::from_input(IngredientField::Name, name)?];
    if let Some(amount) = parts.next() {
        updates.push(IngredientUpdate::from_input(IngredientField::Amount, amount)?);
    }
    if let Some(unit) = parts.next() {
        updates.push(IngredientUpdate::from_input(IngredientField::Unit, unit.trim())?);
    }
    Ok(updates)
}

/// Print a saved recipe and where the form sent us, or turn the failure into
/// an error for the exit status.
pub fn report_outcome(outcome: SubmitOutcome, navigator: &Arc<RecordingNavigator>) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved(recipe) => {
            println!("Saved recipe #{} \"{}\"", recipe.id, recipe.title);
            if let Some(NavigationEvent::To(path)) = navigator.last() {
                println!("-> {path}");
            }
            Ok(())
        }
        SubmitOutcome::Invalid(e) => Err(e.into()),
        SubmitOutcome::Failed(message) => bail!(message),
        SubmitOutcome::Rejected => bail!("A save is already in progress"),
    }
}
