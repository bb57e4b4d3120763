use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plan meals and shopping lists against the menu API",
    long_about = None
)]
pub struct Cli {
    /// Base URL of the menu API (overrides MENU_API_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the API is up
    Health,
    /// Manage ingredients
    Ingredients {
        #[command(subcommand)]
        action: IngredientAction,
    },
    /// Manage recipes
    Recipes {
        #[command(subcommand)]
        action: RecipeAction,
    },
    /// Send one message to the assistant
    Chat {
        message: String,
        /// Continue an existing conversation
        #[arg(long)]
        thread_id: Option<String>,
    },
    /// Print the dates of the week containing DATE (default: today)
    Week {
        /// DD/MM/YYYY
        #[arg(long)]
        date: Option<String>,
    },
    /// Interactive meal-planning shell
    Session,
}

#[derive(Subcommand, Debug)]
pub enum IngredientAction {
    List {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
    },
    Get {
        id: i64,
    },
    Add {
        name: String,
    },
    Update {
        id: i64,
        name: String,
    },
    Delete {
        id: i64,
    },
    /// Write all ingredients to CSV
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecipeAction {
    List {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
    },
    Get {
        name: String,
    },
    Add {
        name: String,
        #[arg(short, long)]
        instructions: String,
        /// One `quantity unit name` line; repeat for each ingredient
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },
    Delete {
        id: i64,
    },
    /// Create every recipe in a JSON array file
    Bulk {
        file: PathBuf,
    },
    /// Write all recipes to CSV
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
