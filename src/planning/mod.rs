//! Session-scoped meal planning: the plan store, the week window and the
//! shopping list derived from them.

pub mod calendar;
pub mod error;
pub mod plan;
pub mod shopping;
pub mod week;

pub use calendar::{DateKey, MealSlot, RecipeRef, UNASSIGNED_MEAL};
pub use error::PlanningError;
pub use plan::{DayPlan, MealEntry, MealPlan, PlanSummary};
pub use shopping::{
    generate_shopping_list, group_by_ingredient, IngredientGroup, RecipeSnapshot,
    ShoppingListRecord,
};
pub use week::{current_week, week_window};
