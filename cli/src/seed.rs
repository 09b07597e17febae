use anyhow::{Context, Result};
use cookbook_core::{seed_recipes, RecipeStore, SeedReport};

pub async fn seed(store: &dyn RecipeStore) -> Result<()> {
    let report = seed_recipes(store)
        .await
        .with_context(|| format!("Failed to seed {} store", store.store_name()))?;

    match report {
        SeedReport::Skipped { existing } => {
            println!("Catalog already has {} recipes, skipping seed", existing);
        }
        SeedReport::Created { titles } => {
            println!("Created {} sample recipes:", titles.len());
            for title in &titles {
                println!("  Created: {}", title);
            }
            println!();
            println!("{}", "=".repeat(50));
            println!("SEED DATA COMPLETE");
            println!("{}", "=".repeat(50));
        }
    }

    Ok(())
}
