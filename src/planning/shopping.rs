use std::collections::HashMap;

use super::calendar::{DateKey, MealSlot};
use super::plan::MealPlan;
use crate::api_connection::endpoints::Recipe;

/// Recipe data as read from the API for one shopping-list generation.
pub type RecipeSnapshot = Recipe;

/// One ingredient needed by one planned meal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListRecord {
    pub ingredient_name: String,
    pub recipe_ref: String,
    pub date_key: DateKey,
    pub meal_slot: MealSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientGroup {
    pub ingredient_name: String,
    pub records: Vec<ShoppingListRecord>,
}

impl IngredientGroup {
    /// Number of planned meals using the ingredient (not a purchase quantity).
    pub fn uses(&self) -> usize {
        self.records.len()
    }
}

/// Derives the shopping list from the whole plan.
///
/// Entries without a recipe are skipped, as are entries whose recipe name has
/// no match in `snapshots`. When several snapshots share the planned name,
/// each contributes its ingredients. Nothing is deduplicated here; see
/// [`group_by_ingredient`].
pub fn generate_shopping_list(
    plan: &MealPlan,
    snapshots: &[RecipeSnapshot],
) -> Vec<ShoppingListRecord> {
    let mut records = Vec::new();

    for (date, slot, entry) in plan.flat_entries() {
        let Some(recipe_name) = entry.recipe_ref.recipe_name() else {
            continue;
        };
        let mut matched = false;
        for recipe in snapshots.iter().filter(|recipe| recipe.name == recipe_name) {
            matched = true;
            records.extend(recipe.ingredient_names().map(|ingredient| ShoppingListRecord {
                ingredient_name: ingredient.to_string(),
                recipe_ref: recipe_name.to_string(),
                date_key: date,
                meal_slot: slot,
            }));
        }
        if !matched {
            tracing::debug!(
                %date,
                %slot,
                recipe = recipe_name,
                "planned recipe not found, skipping"
            );
        }
    }

    records
}

/// Groups records by ingredient name in first-seen order.
pub fn group_by_ingredient(records: &[ShoppingListRecord]) -> Vec<IngredientGroup> {
    let mut groups: Vec<IngredientGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index
            .entry(record.ingredient_name.as_str())
            .or_insert_with(|| {
                groups.push(IngredientGroup {
                    ingredient_name: record.ingredient_name.clone(),
                    records: Vec::new(),
                });
                groups.len() - 1
            });
        groups[slot].records.push(record.clone());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_connection::endpoints::{RecipeIngredient, UNKNOWN_INGREDIENT};
    use crate::planning::calendar::RecipeRef;
    use chrono::NaiveDate;
    use serde_json::Map;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn recipe(name: &str, ingredients: &[&str]) -> RecipeSnapshot {
        Recipe {
            id: None,
            name: name.to_string(),
            instructions: String::new(),
            ingredients: ingredients.iter().map(|i| RecipeIngredient::named(i)).collect(),
        }
    }

    fn plan_with(entries: &[(&str, MealSlot, &str)]) -> MealPlan {
        let added_at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut plan = MealPlan::new();
        for (date, slot, recipe_ref) in entries {
            plan.add_entry_at(key(date), *slot, RecipeRef::from(*recipe_ref), "", added_at);
        }
        plan
    }

    #[test]
    fn test_generate_single_recipe() {
        let plan = plan_with(&[("15/01/2024", MealSlot::Lunch, "Macarrão")]);
        let snapshots = vec![recipe("Macarrão", &["Tomate", "Cebola"])];

        let list = generate_shopping_list(&plan, &snapshots);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|r| r.recipe_ref == "Macarrão"
            && r.date_key == key("15/01/2024")
            && r.meal_slot == MealSlot::Lunch));
        assert_eq!(list[0].ingredient_name, "Tomate");
        assert_eq!(list[1].ingredient_name, "Cebola");
        assert_eq!(list[0].meal_slot.label(), "Almoço");
    }

    #[test]
    fn test_generate_skips_unassigned_and_unresolved() {
        let plan = plan_with(&[
            ("15/01/2024", MealSlot::Lunch, "unassigned meal"),
            ("15/01/2024", MealSlot::Dinner, "Receita apagada"),
        ]);
        let snapshots = vec![recipe("Macarrão", &["Tomate"])];
        assert!(generate_shopping_list(&plan, &snapshots).is_empty());
        assert!(generate_shopping_list(&plan, &[]).is_empty());
    }

    #[test]
    fn test_generate_keeps_duplicates_and_placeholder() {
        let plan = plan_with(&[
            ("16/01/2024", MealSlot::Dinner, "Sopa"),
            ("15/01/2024", MealSlot::Lunch, "Sopa"),
        ]);
        let mut sopa = recipe("Sopa", &["Cebola"]);
        sopa.ingredients.push(RecipeIngredient {
            name: None,
            extra: Map::new(),
        });

        let list = generate_shopping_list(&plan, &[sopa]);
        let names: Vec<&str> = list.iter().map(|r| r.ingredient_name.as_str()).collect();
        assert_eq!(names, vec!["Cebola", UNKNOWN_INGREDIENT, "Cebola", UNKNOWN_INGREDIENT]);
        // Plan order is chronological.
        assert_eq!(list[0].date_key, key("15/01/2024"));
    }

    #[test]
    fn test_generate_uses_every_same_named_recipe() {
        let plan = plan_with(&[("15/01/2024", MealSlot::Lunch, "Macarrão")]);
        let snapshots = vec![
            recipe("Macarrão", &["Tomate"]),
            recipe("Sopa", &["Batata"]),
            recipe("Macarrão", &["Queijo"]),
        ];

        let list = generate_shopping_list(&plan, &snapshots);
        let names: Vec<&str> = list.iter().map(|r| r.ingredient_name.as_str()).collect();
        assert_eq!(names, vec!["Tomate", "Queijo"]);
        assert!(list.iter().all(|r| r.recipe_ref == "Macarrão"));
    }

    #[test]
    fn test_generate_is_pure() {
        let plan = plan_with(&[
            ("15/01/2024", MealSlot::Lunch, "Macarrão"),
            ("17/01/2024", MealSlot::Snack, "Bolo"),
        ]);
        let snapshots = vec![
            recipe("Macarrão", &["Tomate", "Cebola"]),
            recipe("Bolo", &["Farinha", "Ovo"]),
        ];
        let first = generate_shopping_list(&plan, &snapshots);
        let second = generate_shopping_list(&plan, &snapshots);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_group_by_ingredient_preserves_order_and_count() {
        let plan = plan_with(&[
            ("15/01/2024", MealSlot::Lunch, "Macarrão"),
            ("15/01/2024", MealSlot::Dinner, "Sopa"),
            ("16/01/2024", MealSlot::Lunch, "Macarrão"),
        ]);
        let snapshots = vec![
            recipe("Macarrão", &["Tomate", "Cebola"]),
            recipe("Sopa", &["Cebola", "Batata"]),
        ];
        let records = generate_shopping_list(&plan, &snapshots);
        let groups = group_by_ingredient(&records);

        let names: Vec<&str> = groups.iter().map(|g| g.ingredient_name.as_str()).collect();
        assert_eq!(names, vec!["Tomate", "Cebola", "Batata"]);
        assert_eq!(groups.iter().map(IngredientGroup::uses).sum::<usize>(), records.len());

        let cebola = &groups[1];
        assert_eq!(cebola.uses(), 3);
        let sources: Vec<(&str, MealSlot)> = cebola
            .records
            .iter()
            .map(|r| (r.recipe_ref.as_str(), r.meal_slot))
            .collect();
        assert_eq!(
            sources,
            vec![
                ("Macarrão", MealSlot::Lunch),
                ("Sopa", MealSlot::Dinner),
                ("Macarrão", MealSlot::Lunch),
            ]
        );
    }

    #[test]
    fn test_group_by_ingredient_empty() {
        assert!(group_by_ingredient(&[]).is_empty());
    }
}
