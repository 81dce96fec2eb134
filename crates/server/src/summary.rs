//! Derived monthly metrics endpoint.

use api_types::summary::SummaryView;
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::Deserialize;

use crate::{ServerError, server::ServerState, user};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// IANA timezone used to pick "today" and the current month. Defaults to UTC.
    pub tz: Option<String>,
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryView>, ServerError> {
    let tz: chrono_tz::Tz = match query.tz.as_deref() {
        Some(name) => name
            .parse()
            .map_err(|_| ServerError::Generic(format!("unknown timezone: {name}")))?,
        None => chrono_tz::UTC,
    };
    let today = Utc::now().with_timezone(&tz).date_naive();

    let expenses = state.engine.expenses(&user.username).await?;
    let settings = state.engine.user_settings(&user.username).await?;
    let summary = engine::monthly_summary(&expenses, settings, today);

    Ok(Json(SummaryView {
        total_expenses_minor: summary.total_expenses.minor(),
        adjusted_budget_minor: summary.adjusted_budget.minor(),
        remaining_budget_minor: summary.remaining_budget.minor(),
        budget_usage_percent: summary.budget_usage_percent,
        daily_average_minor: summary.daily_average.minor(),
    }))
}
