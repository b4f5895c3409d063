// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Todo CRUD routes. All of them sit behind the auth middleware and are
//! scoped to the authenticated user.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthSession;
use crate::models::{Todo, TodoPatch};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Todo routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", post(create_todo).get(list_todos))
        .route(
            "/todos/{id}",
            get(get_todo).delete(delete_todo).patch(patch_todo),
        )
}

/// Creation payload. `text` defaults to empty so an absent field fails the
/// same emptiness check instead of a body-shape rejection.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize)]
pub struct TodosResponse {
    pub todos: Vec<Todo>,
}

#[derive(Serialize)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// An ID that is not even a well-formed UUID reads as 404, the same as a
/// missing record — "bad id" and "not found" are deliberately conflated.
fn parse_todo_id(raw: &str) -> Result<String> {
    uuid::Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::NotFound)
}

/// POST /todos — create a todo owned by the current user.
async fn create_todo(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<Json<Todo>> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let todo = Todo::new(session.user.id.clone(), text.to_string());
    state.db.create_todo(&todo).await?;

    tracing::debug!(user_id = %session.user.id, todo_id = %todo.id, "Todo created");

    Ok(Json(todo))
}

/// GET /todos — list the current user's todos.
async fn list_todos(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<TodosResponse>> {
    let todos = state.db.list_todos(&session.user.id).await?;
    Ok(Json(TodosResponse { todos }))
}

/// GET /todos/{id}
async fn get_todo(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>> {
    let id = parse_todo_id(&id)?;

    let todo = state
        .db
        .get_todo_for_owner(&id, &session.user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(TodoResponse { todo }))
}

/// DELETE /todos/{id} — returns the removed todo.
async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>> {
    let id = parse_todo_id(&id)?;

    let todo = state
        .db
        .delete_todo_for_owner(&id, &session.user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::debug!(user_id = %session.user.id, todo_id = %todo.id, "Todo deleted");

    Ok(Json(TodoResponse { todo }))
}

/// PATCH /todos/{id} — apply an allow-listed patch; the server derives
/// `completed_at` on every update.
async fn patch_todo(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<TodoResponse>> {
    let id = parse_todo_id(&id)?;

    let todo = state
        .db
        .update_todo_for_owner(&id, &session.user.id, &patch)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(TodoResponse { todo }))
}
