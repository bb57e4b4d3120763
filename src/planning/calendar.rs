use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::error::PlanningError;

pub const DATE_KEY_FORMAT: &str = "%d/%m/%Y";
pub const UNASSIGNED_MEAL: &str = "unassigned meal";

/// The five fixed times of day a meal can be planned for.
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    LateSnack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
        MealSlot::LateSnack,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Café da Manhã",
            MealSlot::Lunch => "Almoço",
            MealSlot::Dinner => "Jantar",
            MealSlot::Snack => "Lanche",
            MealSlot::LateSnack => "Ceia",
        }
    }

    fn english_name(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
            MealSlot::LateSnack => "late-snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealSlot {
    type Err = PlanningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MealSlot::ALL
            .into_iter()
            .find(|slot| slot.label().to_lowercase() == wanted || slot.english_name() == wanted)
            .ok_or_else(|| PlanningError::InvalidMealSlot(s.to_string()))
    }
}

/// A calendar day, written `DD/MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = PlanningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
            .map(DateKey)
            .map_err(|_| PlanningError::InvalidDate(s.to_string()))
    }
}

/// Which recipe a planned meal uses, by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipeRef {
    Named(String),
    Unassigned,
}

impl RecipeRef {
    pub fn recipe_name(&self) -> Option<&str> {
        match self {
            RecipeRef::Named(name) => Some(name.as_str()),
            RecipeRef::Unassigned => None,
        }
    }
}

impl From<&str> for RecipeRef {
    fn from(value: &str) -> Self {
        if value == UNASSIGNED_MEAL {
            RecipeRef::Unassigned
        } else {
            RecipeRef::Named(value.to_string())
        }
    }
}

impl fmt::Display for RecipeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeRef::Named(name) => f.write_str(name),
            RecipeRef::Unassigned => f.write_str(UNASSIGNED_MEAL),
        }
    }
}
