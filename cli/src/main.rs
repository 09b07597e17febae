mod edit;
mod seed;

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use cookbook_core::pages::{edit_recipe, new_recipe, recipe_list};
use cookbook_core::{
    create_store, DeleteOutcome, NavigationEvent, PageError, RecipeDetail,
    RecipeStore, RecordingNavigator, StoreConfig,
};
use tracing_subscriber::EnvFilter;

use crate::edit::{apply_edits, report_outcome, RecipeArgs};

#[derive(Parser)]
#[command(name = "cookbook")]
#[command(about = "Personal recipe catalog", long_about = None)]
struct Cli {
    /// Recipe API URL (default: http://localhost:8000)
    #[arg(long, global = true, env = "COOKBOOK_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all recipes
    List,
    /// Show one recipe
    Show { id: i64 },
    /// List recipe categories
    Categories,
    /// Create a recipe
    New {
        #[command(flatten)]
        recipe: RecipeArgs,
    },
    /// Edit an existing recipe
    Edit {
        id: i64,
        #[command(flatten)]
        recipe: RecipeArgs,
        /// Remove the ingredient at this position (0-based, repeatable)
        #[arg(long = "remove-ingredient")]
        remove_ingredients: Vec<usize>,
    },
    /// Delete a recipe
    Delete { id: i64 },
    /// Add the sample recipes if the catalog is empty
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = StoreConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    let store = create_store(&config)?;
    tracing::debug!(store = store.store_name(), api_url = %config.api_url, "store ready");

    let navigator = Arc::new(RecordingNavigator::new());

    match cli.command {
        Commands::List => list(store.as_ref()).await?,
        Commands::Show { id } => show(store, navigator, id).await?,
        Commands::Categories => categories(store.as_ref()).await?,
        Commands::New { recipe } => {
            let mut form = new_recipe(store, navigator.clone()).await;
            apply_edits(&mut form, &recipe, &[])?;
            report_outcome(form.submit().await, &navigator)?;
        }
        Commands::Edit {
            id,
            recipe,
            remove_ingredients,
        } => {
            let mut form = edit_recipe(store, navigator.clone(), id).await?;
            apply_edits(&mut form, &recipe, &remove_ingredients)?;
            report_outcome(form.submit().await, &navigator)?;
        }
        Commands::Delete { id } => delete(store, navigator, id).await?,
        Commands::Seed => seed::seed(store.as_ref()).await?,
    }

    Ok(())
}

async fn list(store: &dyn RecipeStore) -> Result<()> {
    let cards = recipe_list(store).await?;
    if cards.is_empty() {
        println!("No recipes yet. Create your first recipe to get started!");
    }
    for card in cards {
        println!("{card}");
        if let Some(description) = &card.description {
            println!("    {description}");
        }
    }
    Ok(())
}

async fn categories(store: &dyn RecipeStore) -> Result<()> {
    for category in store.list_categories().await? {
        match &category.description {
            Some(description) => println!("{:>3}  {}  ({})", category.id, category.name, description),
            None => println!("{:>3}  {}", category.id, category.name),
        }
    }
    Ok(())
}

async fn show(store: Arc<dyn RecipeStore>, navigator: Arc<RecordingNavigator>, id: i64) -> Result<()> {
    let detail = RecipeDetail::load(store, navigator, id).await?;
    let recipe = detail.recipe();

    println!("{}", recipe.title);
    if let Some(description) = recipe.description.as_deref().filter(|d| !d.is_empty()) {
        println!("{description}");
    }
    let badges = detail.badges();
    if !badges.is_empty() {
        println!("[{}]", badges.join("] ["));
    }

    let lines = detail.ingredient_lines();
    if !lines.is_empty() {
        println!("\nIngredients:");
        for (index, line) in lines.iter().enumerate() {
            println!("  {index}. {line}");
        }
    }

    println!("\nInstructions:\n{}", recipe.instructions);
    println!("\nEdit: {}", detail.edit_path());
    Ok(())
}

async fn delete(store: Arc<dyn RecipeStore>, navigator: Arc<RecordingNavigator>, id: i64) -> Result<()> {
    let detail = match RecipeDetail::load(store, navigator.clone(), id).await {
        Ok(detail) => detail,
        Err(PageError::NotFound) => bail!("Recipe {id} not found"),
        Err(e) => return Err(e.into()),
    };

    match detail.delete().await {
        DeleteOutcome::Deleted => {
            println!("Deleted \"{}\"", detail.recipe().title);
            if let Some(NavigationEvent::To(path)) = navigator.last() {
                println!("-> {path}");
            }
            Ok(())
        }
        DeleteOutcome::Failed(message) => bail!(message),
        DeleteOutcome::Rejected => bail!("A delete is already in progress"),
    }
}
