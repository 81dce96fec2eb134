//! Expense record endpoints, including the live watch stream.

use std::convert::Infallible;

use api_types::expense::{ExpenseCreated, ExpenseListResponse, ExpenseNew, ExpenseView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use engine::{Expense, NewExpense};
use tokio_stream::{StreamExt, wrappers::WatchStream};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(expense: &Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        title: expense.title.clone(),
        category: expense.category.as_str().to_string(),
        amount_minor: expense.amount.minor(),
        date: expense.date,
        notes: expense.notes.clone(),
        payment_method: expense.payment_method.map(|m| m.as_str().to_string()),
        created_at: expense.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let fields = NewExpense {
        title: payload.title,
        category: payload.category,
        amount: payload.amount,
        date: payload.date,
        notes: payload.notes,
        payment_method: payload.payment_method,
    };
    let expense = state.engine.add_expense(&user.username, fields).await?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { id: expense.id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state.engine.expenses(&user.username).await?;

    Ok(Json(ExpenseListResponse {
        expenses: expenses.iter().map(view).collect(),
    }))
}

/// Removing an already-removed record is not an error.
pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&user.username, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Live expense stream over server-sent events.
///
/// Every event carries the full current list for the user, newest first; the
/// first event arrives immediately after subscribing.
pub async fn watch(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, ServerError> {
    let feed = state.engine.subscribe_expenses(&user.username).await?;

    let stream = WatchStream::new(feed.into_receiver()).map(|snapshot| {
        let body = ExpenseListResponse {
            expenses: snapshot.iter().map(view).collect(),
        };
        let json = serde_json::to_string(&body).unwrap_or_default();
        Ok(Event::default().data(json))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
