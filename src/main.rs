use anyhow::{Context, Result};
use chrono::Local;
use menu_planner::api_connection::endpoints::{NewRecipe, Recipe};
use menu_planner::api_connection::MenuApiClient;
use menu_planner::cli::{parse_args, Commands, IngredientAction, RecipeAction};
use menu_planner::config::Config;
use menu_planner::export::{default_export_file_name, export_ingredients, export_recipes};
use menu_planner::planning::{current_week, week_window, DateKey};
use menu_planner::recipe_parser::build_new_recipe;
use menu_planner::shell;
use std::path::PathBuf;
use tokio::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("menu_planner=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn matches_search(name: &str, search: Option<&str>) -> bool {
    search.map_or(true, |term| name.to_lowercase().contains(&term.to_lowercase()))
}

fn print_recipe(recipe: &Recipe) {
    match recipe.id {
        Some(id) => println!("{} - {}", id, recipe.name),
        None => println!("{}", recipe.name),
    }
    if recipe.ingredients.is_empty() {
        println!("  no ingredients");
    }
    for name in recipe.ingredient_names() {
        println!("  - {}", name);
    }
    if !recipe.instructions.is_empty() {
        println!("{}", recipe.instructions);
    }
}

fn export_path(output: Option<PathBuf>, prefix: &str) -> PathBuf {
    output.unwrap_or_else(|| {
        PathBuf::from(default_export_file_name(prefix, Local::now().naive_local()))
    })
}

async fn run_ingredients(client: &MenuApiClient, action: IngredientAction) -> Result<()> {
    match action {
        IngredientAction::List { search } => {
            let ingredients = client
                .list_ingredients()
                .await
                .context("Failed to load ingredients")?;
            let shown: Vec<_> = ingredients
                .iter()
                .filter(|ingredient| matches_search(&ingredient.name, search.as_deref()))
                .collect();
            for ingredient in &shown {
                println!("{} - {}", ingredient.id, ingredient.name);
            }
            println!("{} of {} ingredients", shown.len(), ingredients.len());
        }
        IngredientAction::Get { id } => {
            let ingredient = client
                .get_ingredient(id)
                .await
                .with_context(|| format!("Failed to load ingredient {}", id))?;
            println!("{} - {}", ingredient.id, ingredient.name);
        }
        IngredientAction::Add { name } => {
            let created = client
                .create_ingredient(name.trim())
                .await
                .with_context(|| format!("Failed to add ingredient '{}'", name))?;
            println!("Ingredient '{}' added with id {}", created.name, created.id);
        }
        IngredientAction::Update { id, name } => {
            let updated = client
                .update_ingredient(id, name.trim())
                .await
                .with_context(|| format!("Failed to update ingredient {}", id))?;
            println!("Ingredient {} is now '{}'", updated.id, updated.name);
        }
        IngredientAction::Delete { id } => {
            let status = client
                .delete_ingredient(id)
                .await
                .with_context(|| format!("Failed to delete ingredient {}", id))?;
            println!("Ingredient {} removed: {}", id, status);
        }
        IngredientAction::Export { output } => {
            let ingredients = client
                .list_ingredients()
                .await
                .context("Failed to load ingredients")?;
            let path = export_path(output, "ingredients");
            export_ingredients(&ingredients, &path)?;
            println!("{} ingredients written to {}", ingredients.len(), path.display());
        }
    }
    Ok(())
}

async fn run_recipes(client: &MenuApiClient, action: RecipeAction) -> Result<()> {
    match action {
        RecipeAction::List { search } => {
            let recipes = client.list_recipes().await.context("Failed to load recipes")?;
            let shown: Vec<_> = recipes
                .iter()
                .filter(|recipe| matches_search(&recipe.name, search.as_deref()))
                .collect();
            for recipe in &shown {
                let id = recipe.id.map(|id| id.to_string()).unwrap_or_default();
                println!("{} - {}", id, recipe.name);
            }
            println!("{} of {} recipes", shown.len(), recipes.len());
        }
        RecipeAction::Get { name } => {
            let recipe = client
                .get_recipe_by_name(&name)
                .await
                .with_context(|| format!("Failed to load recipe '{}'", name))?;
            print_recipe(&recipe);
        }
        RecipeAction::Add {
            name,
            instructions,
            ingredients,
        } => {
            let new_recipe = build_new_recipe(&name, &instructions, &ingredients.join("\n"));
            let created = client
                .create_recipe(&new_recipe)
                .await
                .with_context(|| format!("Failed to add recipe '{}'", name))?;
            println!(
                "Recipe '{}' added with {} ingredients",
                new_recipe.name,
                new_recipe.ingredients.len()
            );
            if let Some(id) = created.id {
                println!("id: {}", id);
            }
        }
        RecipeAction::Delete { id } => {
            let status = client
                .delete_recipe(id)
                .await
                .with_context(|| format!("Failed to delete recipe {}", id))?;
            println!("Recipe {} removed: {}", id, status);
        }
        RecipeAction::Bulk { file } => {
            let content = fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read recipe file {:?}", file))?;
            let recipes: Vec<NewRecipe> = serde_json::from_str(&content)
                .with_context(|| format!("Recipe file {:?} is not a JSON array of recipes", file))?;
            let created = client
                .create_recipes_bulk(&recipes)
                .await
                .context("Failed to create recipes in bulk")?;
            println!("{} recipes created", created.len());
        }
        RecipeAction::Export { output } => {
            let recipes = client.list_recipes().await.context("Failed to load recipes")?;
            let path = export_path(output, "recipes");
            export_recipes(&recipes, &path)?;
            println!("{} recipes written to {}", recipes.len(), path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli_args = parse_args();

    let mut config = Config::from_env();
    if let Some(base_url) = &cli_args.base_url {
        config = config.with_base_url(base_url);
    }
    tracing::debug!(base_url = %config.base_url, "using menu API");
    let client = MenuApiClient::new(&config).context("Failed to build HTTP client")?;

    match cli_args.command {
        Commands::Health => {
            let health = client.health_check().await.context("API health check failed")?;
            println!("API is up: {}", health);
        }
        Commands::Ingredients { action } => run_ingredients(&client, action).await?,
        Commands::Recipes { action } => run_recipes(&client, action).await?,
        Commands::Chat { message, thread_id } => {
            let thread_id = thread_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            let response = client
                .chat(&message, &thread_id)
                .await
                .context("Failed to reach the assistant")?;
            match response.reply() {
                Some(reply) => println!("{}", reply),
                None => eprintln!("The assistant sent no answer"),
            }
            println!("thread: {}", thread_id);
        }
        Commands::Week { date } => {
            let window = match date {
                Some(raw) => week_window(raw.parse::<DateKey>()?.date()),
                None => current_week(),
            };
            for date in window {
                println!("{} {}", date.date().format("%a"), date);
            }
        }
        Commands::Session => shell::run(&client).await?,
    }

    Ok(())
}
