//! User accounts: signup and password reset.

use api_types::user::{ResetConfirm, ResetRequest, Signup};
use axum::{Json, extract::State, http::StatusCode};
use engine::StoreError;
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub reset_code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<Signup>,
) -> Result<StatusCode, ServerError> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(StoreError::Validation("username and password required".to_string()).into());
    }

    let existing = Entity::find_by_id(username)
        .one(&state.db)
        .await
        .map_err(StoreError::from)?;
    if existing.is_some() {
        return Err(StoreError::ExistingKey(username.to_string()).into());
    }

    let user = ActiveModel {
        username: ActiveValue::Set(username.to_string()),
        password: ActiveValue::Set(payload.password),
        reset_code: ActiveValue::Set(None),
    };
    user.insert(&state.db).await.map_err(StoreError::from)?;

    Ok(StatusCode::CREATED)
}

/// Starts a password reset.
///
/// Always answers 202 so the endpoint does not reveal which usernames exist.
/// The reset code is only emitted through the log; a mail relay can pick it up
/// from there.
pub async fn reset_request(
    State(state): State<ServerState>,
    Json(payload): Json<ResetRequest>,
) -> Result<StatusCode, ServerError> {
    if let Some(user) = Entity::find_by_id(payload.username.trim())
        .one(&state.db)
        .await
        .map_err(StoreError::from)?
    {
        let code = uuid::Uuid::new_v4().simple().to_string();
        tracing::info!(username = %user.username, %code, "password reset requested");

        let mut user: ActiveModel = user.into();
        user.reset_code = ActiveValue::Set(Some(code));
        user.update(&state.db).await.map_err(StoreError::from)?;
    }

    Ok(StatusCode::ACCEPTED)
}

pub async fn reset_confirm(
    State(state): State<ServerState>,
    Json(payload): Json<ResetConfirm>,
) -> Result<StatusCode, ServerError> {
    if payload.new_password.is_empty() {
        return Err(StoreError::Validation("password required".to_string()).into());
    }

    let user = Entity::find_by_id(payload.username.trim())
        .one(&state.db)
        .await
        .map_err(StoreError::from)?;

    // Unknown user and wrong code answer the same way.
    let matches = user
        .as_ref()
        .is_some_and(|u| u.reset_code.as_deref() == Some(payload.code.as_str()));
    let Some(user) = user.filter(|_| matches) else {
        return Err(ServerError::Generic("invalid reset code".to_string()));
    };

    let mut user: ActiveModel = user.into();
    user.password = ActiveValue::Set(payload.new_password);
    user.reset_code = ActiveValue::Set(None);
    user.update(&state.db).await.map_err(StoreError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
