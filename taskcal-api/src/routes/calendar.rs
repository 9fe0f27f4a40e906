/// Calendar view endpoint
///
/// # Endpoint
///
/// ```text
/// GET /v1/calendar?year=2024&month=2
/// Authorization: Bearer <session token>
/// ```
///
/// Year and month default to the current month. The response is the padded
/// Monday-first week grid with the session user's tasks bucketed per day,
/// plus prev/next month pointers for navigation.

use crate::{
    app::{AppState, Session},
    error::ApiResult,
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use taskcal_shared::{
    calendar::{build_month_view, month_bounds, MonthView},
    models::task::Task,
};

/// Calendar query parameters
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Target year (defaults to the current year)
    pub year: Option<i32>,

    /// Target month 1-12 (defaults to the current month)
    pub month: Option<u32>,
}

/// Calendar view response
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    /// Today's date (ISO), the reference the view was built against
    pub today: String,

    /// The aggregated month grid
    #[serde(flatten)]
    pub view: MonthView,
}

/// Calendar view handler
///
/// Fetches the session user's tasks for the requested month and aggregates
/// them into a [`MonthView`]. "Today" is read once here at the boundary and
/// injected into the pure aggregation.
pub async fn calendar_view(
    State(state): State<AppState>,
    Extension(sess): Extension<Session>,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<Json<CalendarResponse>> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    let (month_start, next_month_start) = month_bounds(year, month)?;

    let tasks = Task::list_for_month(&state.db, sess.user_id, month_start, next_month_start).await?;

    let view = build_month_view(year, month, today, &tasks)?;

    Ok(Json(CalendarResponse {
        today: today.to_string(),
        view,
    }))
}
