//! Calendar month-grid aggregation
//!
//! Turns one user's tasks for a month into a renderable [`MonthView`]: a
//! Monday-first week grid with padding slots outside the month, tasks
//! bucketed per day, and previous/next month pointers that roll over year
//! boundaries.
//!
//! Everything here is a pure function of its arguments. The caller fetches
//! the month's tasks and injects "today"; nothing reads the ambient clock,
//! so leap years and month boundaries are directly testable.

use crate::models::task::Task;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Days per week row in the grid
const WEEK_LEN: usize = 7;

/// English month names for the view label
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Error type for calendar aggregation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Year/month pair does not name a real calendar month
    #[error("Invalid calendar month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Task fields exposed to the calendar and day listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Task ID
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Completion flag
    pub is_completed: bool,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            is_completed: task.is_completed,
        }
    }
}

/// One in-month slot of the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Day of month (1..=31)
    pub day: u32,

    /// Whether this slot is the injected "today"
    pub is_today: bool,

    /// Tasks due this day, in store order (due date desc, then title)
    pub tasks: Vec<TaskSummary>,
}

/// A (year, month) pointer for month navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    /// Calendar year
    pub year: i32,

    /// Calendar month (1..=12)
    pub month: u32,
}

/// Aggregated, padded week-grid of one calendar month
///
/// Weeks run Monday through Sunday (the layout of Python's
/// `calendar.monthcalendar`, which the original web calendar used). Slots
/// outside the month are `None` and serialize as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthView {
    /// Calendar year
    pub year: i32,

    /// Calendar month (1..=12)
    pub month: u32,

    /// Human-readable label, e.g. "February 2024"
    pub month_label: String,

    /// Week rows, each exactly 7 slots, Monday first
    pub weeks: Vec<Vec<Option<CalendarDay>>>,

    /// The adjacent earlier month (December of year-1 when month is January)
    pub prev_month: MonthRef,

    /// The adjacent later month (January of year+1 when month is December)
    pub next_month: MonthRef,
}

/// Returns the month before `(year, month)`, rolling over the year boundary
pub fn prev_month(year: i32, month: u32) -> MonthRef {
    if month == 1 {
        MonthRef {
            year: year - 1,
            month: 12,
        }
    } else {
        MonthRef {
            year,
            month: month - 1,
        }
    }
}

/// Returns the month after `(year, month)`, rolling over the year boundary
pub fn next_month(year: i32, month: u32) -> MonthRef {
    if month == 12 {
        MonthRef {
            year: year + 1,
            month: 1,
        }
    } else {
        MonthRef {
            year,
            month: month + 1,
        }
    }
}

/// Returns the half-open date range `[first of month, first of next month)`
///
/// This is the range the store queries with `due_date >= start AND
/// due_date < end`.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CalendarError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(CalendarError::InvalidMonth { year, month })?;

    let next = next_month(year, month);
    let end = NaiveDate::from_ymd_opt(next.year, next.month, 1)
        .ok_or(CalendarError::InvalidMonth { year, month })?;

    Ok((start, end))
}

/// Builds the month view for one user's tasks
///
/// `tasks` must already be restricted to the target month; the order they
/// arrive in is the order they appear under each day. `today` marks the
/// `is_today` slot and is passed in explicitly.
///
/// # Errors
///
/// Returns `CalendarError::InvalidMonth` if `(year, month)` is not a real
/// calendar month.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use taskcal_shared::calendar::build_month_view;
///
/// let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
/// let view = build_month_view(2024, 2, today, &[]).unwrap();
///
/// assert_eq!(view.month_label, "February 2024");
/// assert_eq!(view.prev_month.month, 1);
/// assert_eq!(view.next_month.month, 3);
/// ```
pub fn build_month_view(
    year: i32,
    month: u32,
    today: NaiveDate,
    tasks: &[Task],
) -> Result<MonthView, CalendarError> {
    let (month_start, next_month_start) = month_bounds(year, month)?;
    let days_in_month = next_month_start
        .signed_duration_since(month_start)
        .num_days() as u32;

    // Bucket tasks by day-of-month, preserving incoming order per day.
    let mut tasks_by_day: BTreeMap<u32, Vec<TaskSummary>> = BTreeMap::new();
    for task in tasks {
        if task.due_date.year() == year && task.due_date.month() == month {
            tasks_by_day
                .entry(task.due_date.day())
                .or_default()
                .push(TaskSummary::from(task));
        }
    }

    // Monday-first grid: pad up to the weekday of the 1st, then one slot per
    // day, then pad the final week out to 7.
    let leading_pad = month_start.weekday().num_days_from_monday() as usize;
    let mut slots: Vec<Option<CalendarDay>> = Vec::with_capacity(42);
    slots.resize(leading_pad, None);

    for day in 1..=days_in_month {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        slots.push(Some(CalendarDay {
            day,
            is_today: date == today,
            tasks: tasks_by_day.remove(&day).unwrap_or_default(),
        }));
    }

    while slots.len() % WEEK_LEN != 0 {
        slots.push(None);
    }

    let weeks = slots
        .chunks(WEEK_LEN)
        .map(|week| week.to_vec())
        .collect();

    Ok(MonthView {
        year,
        month,
        month_label: format!("{} {}", MONTH_NAMES[(month - 1) as usize], year),
        weeks,
        prev_month: prev_month(year, month),
        next_month: next_month(year, month),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task_on(date: NaiveDate, title: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            due_date: date,
            is_completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn count_days(view: &MonthView) -> usize {
        view.weeks
            .iter()
            .flatten()
            .filter(|slot| slot.is_some())
            .count()
    }

    #[test]
    fn test_leap_february_has_29_days() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let view = build_month_view(2024, 2, today, &[]).unwrap();

        assert_eq!(count_days(&view), 29);
        assert_eq!(view.month_label, "February 2024");
    }

    #[test]
    fn test_non_leap_february_has_28_days() {
        let today = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        let view = build_month_view(2023, 2, today, &[]).unwrap();

        assert_eq!(count_days(&view), 28);
    }

    #[test]
    fn test_weeks_are_monday_first_and_seven_wide() {
        // February 2024 starts on a Thursday: three leading pads.
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let view = build_month_view(2024, 2, today, &[]).unwrap();

        for week in &view.weeks {
            assert_eq!(week.len(), 7);
        }

        let first_week = &view.weeks[0];
        assert!(first_week[0].is_none());
        assert!(first_week[1].is_none());
        assert!(first_week[2].is_none());
        assert_eq!(first_week[3].as_ref().unwrap().day, 1);
    }

    #[test]
    fn test_january_prev_month_is_december_of_prior_year() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let view = build_month_view(2024, 1, today, &[]).unwrap();

        assert_eq!(view.prev_month, MonthRef { year: 2023, month: 12 });
        assert_eq!(view.next_month, MonthRef { year: 2024, month: 2 });
    }

    #[test]
    fn test_december_next_month_is_january_of_following_year() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 10).unwrap();
        let view = build_month_view(2024, 12, today, &[]).unwrap();

        assert_eq!(view.prev_month, MonthRef { year: 2024, month: 11 });
        assert_eq!(view.next_month, MonthRef { year: 2025, month: 1 });
    }

    #[test]
    fn test_tasks_bucketed_by_day_in_incoming_order() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let feb_10 = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let feb_29 = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let tasks = vec![
            task_on(feb_29, "leap day task"),
            task_on(feb_10, "first"),
            task_on(feb_10, "second"),
        ];

        let view = build_month_view(2024, 2, today, &tasks).unwrap();

        let day_tasks: BTreeMap<u32, &CalendarDay> = view
            .weeks
            .iter()
            .flatten()
            .flatten()
            .map(|d| (d.day, d))
            .collect();

        assert_eq!(day_tasks[&29].tasks.len(), 1);
        assert_eq!(day_tasks[&29].tasks[0].title, "leap day task");
        assert_eq!(day_tasks[&10].tasks.len(), 2);
        assert_eq!(day_tasks[&10].tasks[0].title, "first");
        assert_eq!(day_tasks[&10].tasks[1].title, "second");
        assert!(day_tasks[&11].tasks.is_empty());
    }

    #[test]
    fn test_today_is_marked() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let view = build_month_view(2024, 2, today, &[]).unwrap();

        let marked: Vec<u32> = view
            .weeks
            .iter()
            .flatten()
            .flatten()
            .filter(|d| d.is_today)
            .map(|d| d.day)
            .collect();

        assert_eq!(marked, vec![15]);
    }

    #[test]
    fn test_today_outside_month_marks_nothing() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let view = build_month_view(2024, 2, today, &[]).unwrap();

        assert!(view.weeks.iter().flatten().flatten().all(|d| !d.is_today));
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let result = build_month_view(2024, 13, today, &[]);

        assert_eq!(
            result.unwrap_err(),
            CalendarError::InvalidMonth {
                year: 2024,
                month: 13
            }
        );
    }

    #[test]
    fn test_month_bounds_half_open_range() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_month_bounds_december() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
