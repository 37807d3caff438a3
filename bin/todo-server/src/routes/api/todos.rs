//! Todo CRUD endpoints.
//!
//! Every handler is a single store call (plus validation); nothing is held
//! between requests and nothing is retried.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::entities::{TodoRecord, TodoStore};
use crate::error::{ResultExt, ServerError, TodoError, TodoOp};
use crate::schemas::todo::{MessageResponse, PAGE_SIZE, PageQuery, TodoRequest, TodoResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(create_todo, list_todos, update_todo, delete_todo),
    components(schemas(TodoRequest, TodoResponse, MessageResponse))
)]
pub struct TodosApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
}

fn parse_id(raw: &str) -> Result<String, ServerError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| ServerError::Malformed(format!("invalid todo id: {raw}")))
}

fn parse_body(payload: Result<Json<TodoRequest>, JsonRejection>) -> Result<TodoRequest, ServerError> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| ServerError::Malformed(rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = TodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Missing field, blank field or store failure", body = MessageResponse),
    )
)]
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), TodoError> {
    let fields = parse_body(payload)
        .and_then(TodoRequest::into_fields)
        .during(TodoOp::Create)?;

    let record = TodoRecord::new(fields.title, fields.description);
    state.store.insert_todo(record.clone()).await.during(TodoOp::Create)?;
    info!(id = %record.id, "todo created");

    Ok((StatusCode::CREATED, Json(record.to_response())))
}

#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    params(PageQuery),
    responses(
        (status = 200, description = "At most ten todos, newest first", body = [TodoResponse]),
        (status = 500, description = "Store failure", body = MessageResponse),
    )
)]
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<TodoResponse>>, TodoError> {
    let q = PageQuery::from_pairs(&pairs);
    let records = state
        .store
        .list_todos(q.skip(), PAGE_SIZE)
        .await
        .during(TodoOp::List)?;
    Ok(Json(records.iter().map(TodoRecord::to_response).collect()))
}

#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "ID of the todo to update")
    ),
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Malformed id, missing field or store failure", body = MessageResponse),
        (status = 404, description = "Todo not found", body = MessageResponse),
    )
)]
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, TodoError> {
    let id = parse_id(&id).during(TodoOp::Update)?;
    let fields = parse_body(payload)
        .and_then(TodoRequest::into_fields)
        .during(TodoOp::Update)?;

    let record = state
        .store
        .update_todo(&id, &fields.title, &fields.description)
        .await
        .during(TodoOp::Update)?
        .ok_or_else(|| ServerError::NotFound(format!("todo {id} not found")).during(TodoOp::Update))?;
    info!(id = %record.id, "todo updated");

    Ok(Json(record.to_response()))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "ID of the todo to delete")
    ),
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = MessageResponse),
        (status = 404, description = "Todo not found", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse),
    )
)]
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, TodoError> {
    let id = parse_id(&id).during(TodoOp::Delete)?;

    if !state.store.delete_todo(&id).await.during(TodoOp::Delete)? {
        return Err(ServerError::NotFound(format!("todo {id} not found")).during(TodoOp::Delete));
    }
    info!(%id, "todo deleted");

    Ok(Json(MessageResponse {
        message: "Todo deleted successfully".to_owned(),
        error: None,
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
