use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::io;
use std::path::Path;

use crate::api_connection::endpoints::{Ingredient, Recipe};
use crate::planning::plan::ADDED_AT_FORMAT;
use crate::planning::{MealPlan, ShoppingListRecord};

#[derive(Debug, Serialize)]
struct PlanRow {
    date: String,
    meal_slot: &'static str,
    recipe_ref: String,
    notes: String,
    added_at: String,
}

#[derive(Debug, Serialize)]
struct ShoppingRow<'a> {
    ingredient_name: &'a str,
    recipe_ref: &'a str,
    date_key: String,
    meal_slot: &'static str,
}

#[derive(Debug, Serialize)]
struct RecipeRow<'a> {
    id: Option<i64>,
    name: &'a str,
    instructions: &'a str,
    ingredients: String,
}

/// `{prefix}_YYYYmmdd_HHMM.csv`
pub fn default_export_file_name(prefix: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.csv", prefix, now.format("%Y%m%d_%H%M"))
}

/// Writes a header row even when there are no rows, so the columns stay stable.
fn write_rows<W, R, I>(writer: W, headers: &[&str], rows: I) -> Result<()>
where
    W: io::Write,
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer
        .write_record(headers)
        .context("Failed to write CSV header")?;
    for row in rows {
        csv_writer
            .serialize(row)
            .context("Failed to write CSV row")?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub const PLAN_COLUMNS: [&str; 5] = ["date", "meal_slot", "recipe_ref", "notes", "added_at"];
pub const SHOPPING_COLUMNS: [&str; 4] = ["ingredient_name", "recipe_ref", "date_key", "meal_slot"];
pub const INGREDIENT_COLUMNS: [&str; 2] = ["id", "name"];
pub const RECIPE_COLUMNS: [&str; 4] = ["id", "name", "instructions", "ingredients"];

pub fn write_plan_csv<W: io::Write>(plan: &MealPlan, writer: W) -> Result<()> {
    let rows = plan.flat_entries().map(|(date, slot, entry)| PlanRow {
        date: date.to_string(),
        meal_slot: slot.label(),
        recipe_ref: entry.recipe_ref.to_string(),
        notes: entry.notes.clone(),
        added_at: entry.added_at.format(ADDED_AT_FORMAT).to_string(),
    });
    write_rows(writer, &PLAN_COLUMNS, rows)
}

pub fn write_shopping_list_csv<W: io::Write>(
    records: &[ShoppingListRecord],
    writer: W,
) -> Result<()> {
    let rows = records.iter().map(|record| ShoppingRow {
        ingredient_name: &record.ingredient_name,
        recipe_ref: &record.recipe_ref,
        date_key: record.date_key.to_string(),
        meal_slot: record.meal_slot.label(),
    });
    write_rows(writer, &SHOPPING_COLUMNS, rows)
}

pub fn write_ingredients_csv<W: io::Write>(ingredients: &[Ingredient], writer: W) -> Result<()> {
    write_rows(writer, &INGREDIENT_COLUMNS, ingredients)
}

pub fn write_recipes_csv<W: io::Write>(recipes: &[Recipe], writer: W) -> Result<()> {
    let rows = recipes.iter().map(|recipe| RecipeRow {
        id: recipe.id,
        name: &recipe.name,
        instructions: &recipe.instructions,
        ingredients: recipe.ingredient_names().collect::<Vec<_>>().join("; "),
    });
    write_rows(writer, &RECIPE_COLUMNS, rows)
}

fn create_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).with_context(|| format!("Failed to create export file {:?}", path))
}

pub fn export_plan(plan: &MealPlan, path: &Path) -> Result<()> {
    write_plan_csv(plan, create_file(path)?)?;
    tracing::info!(path = %path.display(), meals = plan.total_meals(), "plan exported");
    Ok(())
}

pub fn export_shopping_list(records: &[ShoppingListRecord], path: &Path) -> Result<()> {
    write_shopping_list_csv(records, create_file(path)?)?;
    tracing::info!(path = %path.display(), records = records.len(), "shopping list exported");
    Ok(())
}

pub fn export_ingredients(ingredients: &[Ingredient], path: &Path) -> Result<()> {
    write_ingredients_csv(ingredients, create_file(path)?)
}

pub fn export_recipes(recipes: &[Recipe], path: &Path) -> Result<()> {
    write_recipes_csv(recipes, create_file(path)?)
}
