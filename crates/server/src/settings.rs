//! Budget and saving-goal settings endpoints.

use api_types::settings::{SettingsUpdate, SettingsView};
use axum::{Extension, Json, extract::State};
use engine::{AmountMinor, SettingsPatch, StoreError, UserSettings};

use crate::{ServerError, server::ServerState, user};

fn view(settings: UserSettings) -> SettingsView {
    SettingsView {
        monthly_budget_minor: settings.monthly_budget.map(AmountMinor::minor),
        saving_goal_minor: settings.saving_goal.map(AmountMinor::minor),
    }
}

fn parse_amount(field: &str, raw: Option<String>) -> Result<Option<AmountMinor>, StoreError> {
    raw.map(|s| {
        s.parse()
            .map_err(|_| StoreError::Validation(format!("invalid {field} amount: {s}")))
    })
    .transpose()
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SettingsView>, ServerError> {
    let settings = state.engine.user_settings(&user.username).await?;

    Ok(Json(view(settings)))
}

/// Merge-write: fields absent from the payload keep their stored value.
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>, ServerError> {
    let patch = SettingsPatch {
        monthly_budget: parse_amount("monthly_budget", payload.monthly_budget)?,
        saving_goal: parse_amount("saving_goal", payload.saving_goal)?,
    };
    let settings = state.engine.update_user_settings(&user.username, patch).await?;

    Ok(Json(view(settings)))
}
