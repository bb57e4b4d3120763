use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::endpoints::{
    ingredient_path, recipe_by_id_path, recipe_by_name_path, ChatRequest, ChatResponse,
    Ingredient, IngredientPayload, NewRecipe, Recipe, CHAT_INVOKE_PATH, HEALTH_PATH,
    INGREDIENTS_PATH, RECIPES_BULK_PATH, RECIPES_PATH,
};
use crate::config::Config;

/// A failed call to the menu API. Every variant names the endpoint it hit.
#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("Network error calling {endpoint}: {source}")]
    NetworkError {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Serialization error calling {endpoint}: {source}")]
    SerializationError {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("API error {status} from {endpoint}: {error_body}")]
    ApiError {
        endpoint: String,
        status: StatusCode,
        error_body: String,
    },
    #[error("Unsupported HTTP method {method} for {endpoint}")]
    UnsupportedMethod { endpoint: String, method: Method },
}

impl ApiConnectionError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiConnectionError::NetworkError { endpoint, .. }
            | ApiConnectionError::SerializationError { endpoint, .. }
            | ApiConnectionError::ApiError { endpoint, .. }
            | ApiConnectionError::UnsupportedMethod { endpoint, .. } => endpoint,
        }
    }
}

/// Thin typed client over the menu REST API.
#[derive(Debug, Clone)]
pub struct MenuApiClient {
    base_url: String,
    client: Client,
}

impl MenuApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiConnectionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ApiConnectionError::NetworkError {
                endpoint: config.base_url.clone(),
                source,
            })?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[instrument(level = "debug", skip(self, body), fields(base = %self.base_url))]
    async fn make_request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiConnectionError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);

        let request = match method {
            Method::GET => self.client.get(&url),
            Method::DELETE => self.client.delete(&url),
            Method::POST | Method::PUT => {
                let builder = self.client.request(method.clone(), &url);
                match body {
                    Some(payload) => builder.json(payload),
                    None => builder,
                }
            }
            other => {
                return Err(ApiConnectionError::UnsupportedMethod {
                    endpoint: url,
                    method: other,
                })
            }
        };

        let response = request
            .send()
            .await
            .map_err(|source| ApiConnectionError::NetworkError {
                endpoint: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            warn!(%status, endpoint = %url, "menu API returned an error status");
            return Err(ApiConnectionError::ApiError {
                endpoint: url,
                status,
                error_body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiConnectionError::NetworkError {
                endpoint: url.clone(),
                source,
            })?;
        debug!(%status, len = bytes.len(), "menu API response received");

        serde_json::from_slice(&bytes)
            .map_err(|source| ApiConnectionError::SerializationError { endpoint: url, source })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiConnectionError> {
        self.make_request::<T, ()>(Method::GET, path, None).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiConnectionError> {
        self.make_request::<T, ()>(Method::DELETE, path, None).await
    }

    pub async fn health_check(&self) -> Result<Value, ApiConnectionError> {
        self.get(HEALTH_PATH).await
    }

    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiConnectionError> {
        self.get(INGREDIENTS_PATH).await
    }

    pub async fn get_ingredient(&self, id: i64) -> Result<Ingredient, ApiConnectionError> {
        self.get(&ingredient_path(id)).await
    }

    pub async fn create_ingredient(&self, name: &str) -> Result<Ingredient, ApiConnectionError> {
        let payload = IngredientPayload {
            name: name.to_string(),
        };
        self.make_request(Method::POST, INGREDIENTS_PATH, Some(&payload))
            .await
    }

    pub async fn update_ingredient(
        &self,
        id: i64,
        name: &str,
    ) -> Result<Ingredient, ApiConnectionError> {
        let payload = IngredientPayload {
            name: name.to_string(),
        };
        self.make_request(Method::PUT, &ingredient_path(id), Some(&payload))
            .await
    }

    pub async fn delete_ingredient(&self, id: i64) -> Result<Value, ApiConnectionError> {
        self.delete(&ingredient_path(id)).await
    }

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiConnectionError> {
        self.get(RECIPES_PATH).await
    }

    pub async fn get_recipe_by_name(&self, name: &str) -> Result<Recipe, ApiConnectionError> {
        self.get(&recipe_by_name_path(name)).await
    }

    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, ApiConnectionError> {
        self.make_request(Method::POST, RECIPES_PATH, Some(recipe))
            .await
    }

    pub async fn create_recipes_bulk(
        &self,
        recipes: &[NewRecipe],
    ) -> Result<Vec<Recipe>, ApiConnectionError> {
        self.make_request(Method::POST, RECIPES_BULK_PATH, Some(recipes))
            .await
    }

    pub async fn delete_recipe(&self, id: i64) -> Result<Value, ApiConnectionError> {
        self.delete(&recipe_by_id_path(id)).await
    }

    pub async fn chat(
        &self,
        message: &str,
        thread_id: &str,
    ) -> Result<ChatResponse, ApiConnectionError> {
        let payload = ChatRequest {
            message: message.to_string(),
            thread_id: thread_id.to_string(),
        };
        self.make_request(Method::POST, CHAT_INVOKE_PATH, Some(&payload))
            .await
    }
}
