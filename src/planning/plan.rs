use chrono::{Local, NaiveDateTime};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;

use super::calendar::{DateKey, MealSlot, RecipeRef};
use super::shopping::ShoppingListRecord;

pub const ADDED_AT_FORMAT: &str = "%d/%m/%Y %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealEntry {
    pub recipe_ref: RecipeRef,
    pub notes: String,
    pub added_at: NaiveDateTime,
}

/// Meals planned for one day, keyed by slot. Never holds an empty slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayPlan {
    slots: BTreeMap<MealSlot, Vec<MealEntry>>,
}

impl DayPlan {
    pub fn entries(&self, slot: MealSlot) -> &[MealEntry] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, slot: MealSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = (MealSlot, &[MealEntry])> {
        self.slots.iter().map(|(slot, entries)| (*slot, entries.as_slice()))
    }

    pub fn meal_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Statistics shown next to the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub total_meals: usize,
    pub days_planned: usize,
    pub unique_items: usize,
}

/// One session's meal calendar. Days without meals are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPlan {
    days: BTreeMap<DateKey, DayPlan>,
}

impl MealPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(
        &mut self,
        date: DateKey,
        slot: MealSlot,
        recipe_ref: RecipeRef,
        notes: &str,
    ) -> MealEntry {
        self.add_entry_at(date, slot, recipe_ref, notes, Local::now().naive_local())
    }

    /// Appends to the end of the slot; the same recipe may be planned twice.
    pub fn add_entry_at(
        &mut self,
        date: DateKey,
        slot: MealSlot,
        recipe_ref: RecipeRef,
        notes: &str,
        added_at: NaiveDateTime,
    ) -> MealEntry {
        let entry = MealEntry {
            recipe_ref,
            notes: notes.to_string(),
            added_at,
        };
        self.days
            .entry(date)
            .or_default()
            .slots
            .entry(slot)
            .or_default()
            .push(entry.clone());
        tracing::debug!(%date, %slot, recipe = %entry.recipe_ref, "meal added to plan");
        entry
    }

    /// Removes the first entry equal to `entry`. Returns `false` if there was none.
    pub fn remove_entry(&mut self, date: DateKey, slot: MealSlot, entry: &MealEntry) -> bool {
        let btree_map::Entry::Occupied(mut day) = self.days.entry(date) else {
            return false;
        };
        let btree_map::Entry::Occupied(mut meals) = day.get_mut().slots.entry(slot) else {
            return false;
        };
        let Some(position) = meals.get().iter().position(|candidate| candidate == entry) else {
            return false;
        };

        meals.get_mut().remove(position);
        if meals.get().is_empty() {
            meals.remove();
        }
        if day.get().is_empty() {
            day.remove();
        }
        tracing::debug!(%date, %slot, recipe = %entry.recipe_ref, "meal removed from plan");
        true
    }

    pub fn day(&self, date: DateKey) -> Option<&DayPlan> {
        self.days.get(&date)
    }

    pub fn entries(&self, date: DateKey, slot: MealSlot) -> &[MealEntry] {
        self.days
            .get(&date)
            .map(|day| day.entries(slot))
            .unwrap_or(&[])
    }

    /// Chronological walk over the planned days.
    pub fn iter(&self) -> impl Iterator<Item = (DateKey, &DayPlan)> {
        self.days.iter().map(|(date, day)| (*date, day))
    }

    /// Every entry as `(date, slot, entry)` in date, slot, insertion order.
    pub fn flat_entries(&self) -> impl Iterator<Item = (DateKey, MealSlot, &MealEntry)> {
        self.iter().flat_map(|(date, day)| {
            day.slots().flat_map(move |(slot, entries)| {
                entries.iter().map(move |entry| (date, slot, entry))
            })
        })
    }

    pub fn week_view<'a>(
        &'a self,
        window: &'a [DateKey],
    ) -> impl Iterator<Item = (DateKey, Option<&'a DayPlan>)> + 'a {
        window.iter().map(move |date| (*date, self.days.get(date)))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_meals(&self) -> usize {
        self.days.values().map(DayPlan::meal_count).sum()
    }

    pub fn days_planned(&self) -> usize {
        self.days.len()
    }

    pub fn summary(&self, shopping_list: &[ShoppingListRecord]) -> PlanSummary {
        let unique_items = shopping_list
            .iter()
            .map(|record| record.ingredient_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        PlanSummary {
            total_meals: self.total_meals(),
            days_planned: self.days_planned(),
            unique_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_add_entries_keep_insertion_order() {
        let mut plan = MealPlan::new();
        let date = key("15/01/2024");
        plan.add_entry_at(date, MealSlot::Lunch, RecipeRef::from("Macarrão"), "", at(9, 0));
        plan.add_entry_at(date, MealSlot::Lunch, RecipeRef::Unassigned, "sem fome", at(9, 5));

        assert_eq!(plan.days_planned(), 1);
        let day = plan.day(date).unwrap();
        assert_eq!(day.slots().count(), 1);
        let entries = plan.entries(date, MealSlot::Lunch);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].recipe_ref, RecipeRef::from("Macarrão"));
        assert_eq!(entries[1].recipe_ref, RecipeRef::Unassigned);
        assert_eq!(entries[1].notes, "sem fome");
    }

    #[test]
    fn test_remove_first_leaves_second() {
        let mut plan = MealPlan::new();
        let date = key("15/01/2024");
        let first =
            plan.add_entry_at(date, MealSlot::Lunch, RecipeRef::from("Macarrão"), "", at(9, 0));
        let second =
            plan.add_entry_at(date, MealSlot::Lunch, RecipeRef::Unassigned, "sem fome", at(9, 5));

        assert!(plan.remove_entry(date, MealSlot::Lunch, &first));
        assert_eq!(plan.entries(date, MealSlot::Lunch), &[second]);
    }

    #[test]
    fn test_remove_duplicate_takes_first_occurrence() {
        let mut plan = MealPlan::new();
        let date = key("16/01/2024");
        let entry =
            plan.add_entry_at(date, MealSlot::Dinner, RecipeRef::from("Sopa"), "", at(8, 0));
        plan.add_entry_at(date, MealSlot::Dinner, RecipeRef::from("Arroz"), "", at(8, 1));
        plan.add_entry_at(date, MealSlot::Dinner, RecipeRef::from("Sopa"), "", at(8, 0));

        plan.remove_entry(date, MealSlot::Dinner, &entry);
        let names: Vec<String> = plan
            .entries(date, MealSlot::Dinner)
            .iter()
            .map(|e| e.recipe_ref.to_string())
            .collect();
        assert_eq!(names, vec!["Arroz", "Sopa"]);
    }

    #[test]
    fn test_add_then_remove_restores_plan() {
        let mut plan = MealPlan::new();
        plan.add_entry_at(
            key("14/01/2024"),
            MealSlot::Breakfast,
            RecipeRef::from("Pão"),
            "",
            at(7, 0),
        );
        plan.add_entry_at(
            key("15/01/2024"),
            MealSlot::Lunch,
            RecipeRef::from("Feijão"),
            "",
            at(7, 1),
        );
        let before = plan.clone();

        for (date, slot) in [
            (key("15/01/2024"), MealSlot::Lunch),
            (key("15/01/2024"), MealSlot::LateSnack),
            (key("20/02/2024"), MealSlot::Snack),
        ] {
            let added = plan.add_entry_at(date, slot, RecipeRef::from("Bolo"), "x", at(10, 0));
            assert!(plan.remove_entry(date, slot, &added));
            assert_eq!(plan, before);
        }
    }

    #[test]
    fn test_emptied_slot_and_day_are_pruned() {
        let mut plan = MealPlan::new();
        let date = key("15/01/2024");
        let lunch =
            plan.add_entry_at(date, MealSlot::Lunch, RecipeRef::from("Arroz"), "", at(9, 0));
        let dinner =
            plan.add_entry_at(date, MealSlot::Dinner, RecipeRef::from("Sopa"), "", at(9, 0));

        plan.remove_entry(date, MealSlot::Lunch, &lunch);
        let day = plan.day(date).unwrap();
        assert!(!day.contains(MealSlot::Lunch));
        assert!(day.contains(MealSlot::Dinner));

        plan.remove_entry(date, MealSlot::Dinner, &dinner);
        assert!(plan.day(date).is_none());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_remove_missing_entry_is_noop() {
        let mut plan = MealPlan::new();
        let date = key("15/01/2024");
        let entry =
            plan.add_entry_at(date, MealSlot::Lunch, RecipeRef::from("Arroz"), "", at(9, 0));
        let before = plan.clone();

        let stranger = MealEntry {
            notes: "other".to_string(),
            ..entry.clone()
        };
        assert!(!plan.remove_entry(date, MealSlot::Lunch, &stranger));
        assert!(!plan.remove_entry(date, MealSlot::Dinner, &entry));
        assert!(!plan.remove_entry(key("01/01/2030"), MealSlot::Lunch, &entry));
        assert_eq!(plan, before);
    }

    #[test]
    fn test_week_view_keeps_outside_entries() {
        let mut plan = MealPlan::new();
        plan.add_entry_at(
            key("15/01/2024"),
            MealSlot::Lunch,
            RecipeRef::from("Arroz"),
            "",
            at(9, 0),
        );
        plan.add_entry_at(
            key("01/03/2024"),
            MealSlot::Lunch,
            RecipeRef::from("Sopa"),
            "",
            at(9, 0),
        );
        let window = vec![key("15/01/2024"), key("16/01/2024")];

        let view: Vec<_> = plan.week_view(&window).collect();
        assert!(view[0].1.is_some());
        assert!(view[1].1.is_none());
        assert_eq!(plan.days_planned(), 2);
    }

    #[test]
    fn test_summary_counts() {
        let mut plan = MealPlan::new();
        plan.add_entry_at(
            key("15/01/2024"),
            MealSlot::Lunch,
            RecipeRef::from("Arroz"),
            "",
            at(9, 0),
        );
        plan.add_entry_at(key("15/01/2024"), MealSlot::Dinner, RecipeRef::Unassigned, "", at(9, 0));
        plan.add_entry_at(
            key("16/01/2024"),
            MealSlot::Lunch,
            RecipeRef::from("Arroz"),
            "",
            at(9, 0),
        );

        let record = |name: &str| ShoppingListRecord {
            ingredient_name: name.to_string(),
            recipe_ref: "Arroz".to_string(),
            date_key: key("15/01/2024"),
            meal_slot: MealSlot::Lunch,
        };
        let list = vec![record("Arroz"), record("Sal"), record("Arroz")];

        assert_eq!(
            plan.summary(&list),
            PlanSummary {
                total_meals: 3,
                days_planned: 2,
                unique_items: 2,
            }
        );
    }
}
