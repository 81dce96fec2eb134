use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::StoreError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod expenses;
mod server;
mod settings;
mod summary;
mod user;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            ExpenseCreated, ExpenseListResponse, ExpenseNew, ExpenseView,
        };
    }

    pub mod settings {
        pub use api_types::settings::{SettingsUpdate, SettingsView};
    }

    pub mod summary {
        pub use api_types::summary::SummaryView;
    }

    pub mod user {
        pub use api_types::user::{ResetConfirm, ResetRequest, Signup};
    }
}

pub enum ServerError {
    Store(StoreError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_store_error(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::ExistingKey(_) => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_store_error(err: StoreError) -> String {
    match err {
        StoreError::Unavailable(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Store(err) => (status_for_store_error(&err), message_for_store_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_422() {
        let res = ServerError::from(StoreError::Validation("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::from(StoreError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflict_maps_to_409() {
        let res = ServerError::from(StoreError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
