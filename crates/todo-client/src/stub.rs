//! In-process stand-in for todo-server, used by the client tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};

use crate::model::{Todo, TodoInput};

#[derive(Default)]
pub(crate) struct StubState {
    todos: Mutex<Vec<Todo>>,
    next_id: AtomicU64,
    fail_list: AtomicBool,
}

impl StubState {
    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.todos.lock().unwrap().len()
    }
}

pub(crate) struct StubServer {
    pub base_url: String,
    pub state: Arc<StubState>,
}

pub(crate) async fn spawn() -> StubServer {
    let state = Arc::new(StubState::default());
    let app = Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/api/todos", get(list).post(create))
        .route("/api/todos/{id}", put(update).delete(remove))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn valid(input: &TodoInput) -> bool {
    !input.title.trim().is_empty() && !input.description.trim().is_empty()
}

async fn list(State(state): State<Arc<StubState>>, Query(q): Query<HashMap<String, String>>) -> Response {
    if state.fail_list.load(Ordering::SeqCst) {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching todos");
    }
    let page = q.get("page").and_then(|p| p.parse::<usize>().ok()).filter(|p| *p >= 1).unwrap_or(1);
    let todos = state.todos.lock().unwrap();
    let window: Vec<Todo> = todos.iter().skip((page - 1) * 10).take(10).cloned().collect();
    Json(window).into_response()
}

async fn create(State(state): State<Arc<StubState>>, Json(input): Json<TodoInput>) -> Response {
    if !valid(&input) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Error creating todo", "error": "title must not be empty" })),
        )
            .into_response();
    }
    let todo = Todo {
        id: format!("todo-{}", state.next_id.fetch_add(1, Ordering::SeqCst)),
        title: input.title,
        description: input.description,
        created_at: Utc::now(),
    };
    state.todos.lock().unwrap().insert(0, todo.clone());
    (StatusCode::CREATED, Json(todo)).into_response()
}

async fn update(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    Json(input): Json<TodoInput>,
) -> Response {
    if !valid(&input) {
        return failure(StatusCode::BAD_REQUEST, "Error updating todo");
    }
    let mut todos = state.todos.lock().unwrap();
    match todos.iter_mut().find(|t| t.id == id) {
        Some(todo) => {
            todo.title = input.title;
            todo.description = input.description;
            Json(todo.clone()).into_response()
        }
        None => failure(StatusCode::NOT_FOUND, "Todo not found"),
    }
}

async fn remove(State(state): State<Arc<StubState>>, Path(id): Path<String>) -> Response {
    let mut todos = state.todos.lock().unwrap();
    let before = todos.len();
    todos.retain(|t| t.id != id);
    if todos.len() == before {
        return failure(StatusCode::NOT_FOUND, "Todo not found");
    }
    Json::<Value>(json!({ "message": "Todo deleted successfully" })).into_response()
}
