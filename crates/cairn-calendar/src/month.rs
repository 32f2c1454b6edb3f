//! Month-view date arithmetic.
//!
//! The grid is Monday-first and padded with leading/trailing days from
//! the neighboring months so every week is complete.

use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::HashMap;

use crate::types::CalendarEvent;

/// First and last day of a month, or `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// All days shown in the month view: the month itself plus padding to
/// whole Monday-started weeks. Empty for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some((first, last)) = month_bounds(year, month) else {
        return Vec::new();
    };

    let lead = u64::from(first.weekday().num_days_from_monday());
    let trail = u64::from(6 - last.weekday().num_days_from_monday());

    let Some(grid_start) = first.checked_sub_days(Days::new(lead)) else {
        return Vec::new();
    };
    let Some(grid_end) = last.checked_add_days(Days::new(trail)) else {
        return Vec::new();
    };

    grid_start
        .iter_days()
        .take_while(|day| *day <= grid_end)
        .collect()
}

/// Group event color tags by day. Un-datable events are excluded.
pub fn events_by_date(events: &[CalendarEvent]) -> HashMap<NaiveDate, Vec<String>> {
    let mut map: HashMap<NaiveDate, Vec<String>> = HashMap::new();
    for event in events {
        let Some(date) = event.start_date() else {
            continue;
        };
        map.entry(date)
            .or_default()
            .push(event.color_id.clone().unwrap_or_default());
    }
    map
}
