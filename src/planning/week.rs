use chrono::{Datelike, Days, Local, NaiveDate};

use super::calendar::DateKey;

/// The Monday-to-Sunday week containing `reference`.
pub fn week_window(reference: NaiveDate) -> [DateKey; 7] {
    let offset = u64::from(reference.weekday().num_days_from_monday());
    let monday = reference - Days::new(offset);
    std::array::from_fn(|i| DateKey::new(monday + Days::new(i as u64)))
}

pub fn current_week() -> [DateKey; 7] {
    week_window(Local::now().date_naive())
}
