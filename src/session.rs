use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api_connection::{ApiConnectionError, MenuApiClient};
use crate::planning::{
    generate_shopping_list, group_by_ingredient, DateKey, IngredientGroup, MealEntry, MealPlan,
    MealSlot, PlanSummary, PlanningError, RecipeRef, ShoppingListRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: NaiveDateTime,
}

/// Everything one user works on between start and exit.
///
/// Sessions never share state; each owns its plan, shopping list and chat
/// thread.
#[derive(Debug, Clone)]
pub struct PlanningSession {
    plan: MealPlan,
    shopping_list: Vec<ShoppingListRecord>,
    thread_id: String,
    chat_messages: Vec<ChatMessage>,
}

impl Default for PlanningSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanningSession {
    pub fn new() -> Self {
        Self {
            plan: MealPlan::new(),
            shopping_list: Vec::new(),
            thread_id: Uuid::new_v4().to_string(),
            chat_messages: Vec::new(),
        }
    }

    pub fn plan(&self) -> &MealPlan {
        &self.plan
    }

    pub fn shopping_list(&self) -> &[ShoppingListRecord] {
        &self.shopping_list
    }

    pub fn grouped_shopping_list(&self) -> Vec<IngredientGroup> {
        group_by_ingredient(&self.shopping_list)
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn chat_messages(&self) -> &[ChatMessage] {
        &self.chat_messages
    }

    pub fn add_meal(
        &mut self,
        date: DateKey,
        slot: MealSlot,
        recipe_ref: RecipeRef,
        notes: &str,
    ) -> MealEntry {
        self.plan.add_entry(date, slot, recipe_ref, notes)
    }

    /// Removes the meal at `index` within the slot, as numbered in listings.
    pub fn remove_meal(
        &mut self,
        date: DateKey,
        slot: MealSlot,
        index: usize,
    ) -> Result<MealEntry, PlanningError> {
        let entry = self
            .plan
            .entries(date, slot)
            .get(index)
            .cloned()
            .ok_or_else(|| PlanningError::InvalidEntryIndex {
                date: date.to_string(),
                slot: slot.to_string(),
                index,
            })?;
        self.plan.remove_entry(date, slot, &entry);
        Ok(entry)
    }

    /// Rebuilds the shopping list from a fresh recipe listing.
    ///
    /// On a failed fetch the previous list and the plan are left as they were.
    pub async fn regenerate_shopping_list(
        &mut self,
        client: &MenuApiClient,
    ) -> Result<&[ShoppingListRecord], ApiConnectionError> {
        let snapshots = client.list_recipes().await.map_err(|err| {
            warn!(
                endpoint = err.endpoint(),
                error = %err,
                "could not load recipes for shopping list"
            );
            err
        })?;
        self.shopping_list = generate_shopping_list(&self.plan, &snapshots);
        info!(
            records = self.shopping_list.len(),
            recipes = snapshots.len(),
            "shopping list generated"
        );
        Ok(&self.shopping_list)
    }

    pub fn clear_shopping_list(&mut self) {
        self.shopping_list.clear();
    }

    pub fn summary(&self) -> PlanSummary {
        self.plan.summary(&self.shopping_list)
    }

    /// Sends `message` on this session's thread and records both sides.
    ///
    /// The user message is kept even if the call fails. A response without an
    /// `output` block yields `Ok(None)` and records no assistant message.
    pub async fn send_chat(
        &mut self,
        client: &MenuApiClient,
        message: &str,
    ) -> Result<Option<String>, ApiConnectionError> {
        self.chat_messages.push(ChatMessage {
            role: ChatRole::User,
            content: message.to_string(),
            timestamp: Local::now().naive_local(),
        });

        let response = client.chat(message, &self.thread_id).await?;
        let Some(reply) = response.reply().map(str::to_string) else {
            warn!(thread_id = %self.thread_id, "chat response carried no output");
            return Ok(None);
        };
        self.chat_messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply.clone(),
            timestamp: Local::now().naive_local(),
        });
        Ok(Some(reply))
    }

    pub fn new_conversation(&mut self) {
        self.thread_id = Uuid::new_v4().to_string();
        self.chat_messages.clear();
        info!(thread_id = %self.thread_id, "started new chat thread");
    }
}
