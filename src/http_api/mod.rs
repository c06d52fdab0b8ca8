use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{BoardMetadata, ScoredTask, Suggestion, Task, TaskBoard};

#[derive(Clone)]
pub struct AppState {
    board: Arc<RwLock<TaskBoard>>,
}

impl AppState {
    pub fn new(board: TaskBoard) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
        }
    }

    pub fn with_shared(board: Arc<RwLock<TaskBoard>>) -> Self {
        Self { board }
    }

    fn board(&self) -> Arc<RwLock<TaskBoard>> {
        self.board.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<polars::prelude::PolarsError> for ApiError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateTaskPayload {
    title: String,
    due_date: NaiveDate,
    estimated_hours: f64,
    importance: i32,
    #[serde(default)]
    dependencies: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct AddDependencyPayload {
    depends_on: i32,
}

#[derive(Debug, Default, Deserialize)]
struct AnalyzeParams {
    today: Option<NaiveDate>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metadata", get(get_metadata).put(update_metadata))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/analyze", post(analyze_tasks))
        .route("/tasks/suggest", get(suggest_tasks))
        .route("/tasks/:id", get(get_task).delete(delete_task))
        .route("/tasks/:id/complete", post(complete_task))
        .route("/tasks/:id/dependencies", post(add_dependency))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, board: TaskBoard) -> std::io::Result<()> {
    let state = AppState::new(board);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_metadata(State(state): State<AppState>) -> Json<BoardMetadata> {
    let board = state.board();
    let metadata = {
        let guard = board.read();
        guard.metadata().clone()
    };
    Json(metadata)
}

async fn update_metadata(
    State(state): State<AppState>,
    Json(metadata): Json<BoardMetadata>,
) -> Result<Json<BoardMetadata>, ApiError> {
    let board = state.board();
    {
        let mut guard = board.write();
        guard
            .set_metadata(metadata)
            .map_err(|err| ApiError::invalid(err.to_string()))?;
    }
    let current = {
        let guard = board.read();
        guard.metadata().clone()
    };
    Ok(Json(current))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let board = state.board();
    let tasks = {
        let guard = board.read();
        guard.open_tasks()?
    };
    Ok(Json(tasks))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    let board = state.board();
    let result = {
        let guard = board.read();
        guard.find_task(task_id)?
    };
    match result {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(format!("task {task_id} not found"))),
    }
}

async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let board = state.board();
    let created = {
        let mut guard = board.write();
        guard
            .add_task(
                &payload.title,
                payload.due_date,
                payload.estimated_hours,
                payload.importance,
                payload.dependencies,
            )
            .map_err(ApiError::from)?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let board = state.board();
    let removed = {
        let mut guard = board.write();
        guard.delete_task(task_id)?
    };
    if !removed {
        return Err(ApiError::not_found(format!("task {task_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    let board = state.board();
    let completed = {
        let mut guard = board.write();
        guard.complete_task(task_id)?
    };
    if !completed {
        return Err(ApiError::not_found(format!("task {task_id} not found")));
    }
    let task = {
        let guard = board.read();
        guard
            .find_task(task_id)?
            .ok_or_else(|| ApiError::internal("task not found after completion"))?
    };
    Ok(Json(task))
}

async fn add_dependency(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Json(payload): Json<AddDependencyPayload>,
) -> Result<Json<Task>, ApiError> {
    let board = state.board();
    let updated = {
        let mut guard = board.write();
        if guard.find_task(task_id)?.is_none() {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        guard
            .add_dependency(task_id, payload.depends_on)
            .map_err(ApiError::from)?
    };
    Ok(Json(updated))
}

async fn analyze_tasks(
    State(state): State<AppState>,
    payload: Option<Json<AnalyzeParams>>,
) -> Result<Json<Vec<ScoredTask>>, ApiError> {
    let today = payload
        .and_then(|Json(params)| params.today)
        .unwrap_or_else(|| Local::now().date_naive());
    let board = state.board();
    let ranking = {
        let guard = board.read();
        guard.rank(today)?
    };
    Ok(Json(ranking))
}

async fn suggest_tasks(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
    let today = params.today.unwrap_or_else(|| Local::now().date_naive());
    let board = state.board();
    let suggestions = {
        let guard = board.read();
        guard.suggest(today)?
    };
    Ok(Json(suggestions))
}
