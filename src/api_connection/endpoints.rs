use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const HEALTH_PATH: &str = "/";
pub const INGREDIENTS_PATH: &str = "/ingredients/";
pub const RECIPES_PATH: &str = "/recipes/";
pub const RECIPES_BULK_PATH: &str = "/recipes/bulk";
pub const CHAT_INVOKE_PATH: &str = "/chat/invoke";

pub const UNKNOWN_INGREDIENT: &str = "unknown ingredient";
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I could not process your message.";

pub fn ingredient_path(id: i64) -> String {
    format!("{}{}", INGREDIENTS_PATH, id)
}

pub fn recipe_by_name_path(name: &str) -> String {
    format!("{}{}", RECIPES_PATH, urlencoding::encode(name))
}

pub fn recipe_by_id_path(id: i64) -> String {
    format!("{}id/{}", RECIPES_PATH, id)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct IngredientPayload {
    pub name: String,
}

/// Ingredient as embedded in a recipe listing.
///
/// The service does not guarantee the shape of these objects, so `name` is
/// `None` whenever it is absent or not a string. Everything else is kept
/// verbatim in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RecipeIngredient {
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecipeIngredient {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            extra: Map::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_INGREDIENT)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(RecipeIngredient::display_name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NewRecipeIngredient {
    pub ingredient_name: String,
    pub quantity: String,
    pub unit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub instructions: String,
    pub ingredients: Vec<NewRecipeIngredient>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub thread_id: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChatOutput {
    #[serde(default, deserialize_with = "string_or_none")]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub output: Option<ChatOutput>,
}

impl ChatResponse {
    /// Assistant reply text, if the service sent an `output` block at all.
    pub fn reply(&self) -> Option<&str> {
        self.output.as_ref().map(|output| {
            output
                .content
                .as_deref()
                .unwrap_or(CHAT_FALLBACK_REPLY)
        })
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
