//! HTTP JSON backend for a minimal todo list.
//!
//! # Overview
//! Four fixed routes dispatch to one `TodoStore` operation each and serialize
//! the result, or the `TodoError`, as JSON.
//!
//! | Method | Path                    | Success              |
//! |--------|-------------------------|----------------------|
//! | GET    | `/api/get-todo`         | 200, array of todos  |
//! | POST   | `/api/add-todo`         | 201, created todo    |
//! | POST   | `/api/update-todo/{id}` | 200, toggled todo    |
//! | POST   | `/api/del-todo/{id}`    | 200, deleted todo    |

pub mod config;
pub mod error;
pub mod store;

use std::any::Any;
use std::future::Future;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, TraceLayer},
};
use tracing::Level;

pub use config::Config;
pub use error::{ErrorBody, TodoError};
pub use store::{SharedStore, TodoRecord, TodoStore};

pub const DELETED_MESSAGE: &str = "todo deleted";

/// Request payload for `POST /api/add-todo`.
#[derive(Debug, Deserialize)]
pub struct AddTodo {
    #[serde(default)]
    pub value: Option<String>,
}

/// Response payload for `POST /api/del-todo/{id}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: String,
    pub deleted_todo: TodoRecord,
}

/// Router over a fresh, empty store.
pub fn app() -> Router {
    router(TodoStore::shared())
}

pub fn router(store: SharedStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(cors::Any);

    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO));

    Router::new()
        .route("/api/get-todo", get(list_todos))
        .route("/api/add-todo", post(add_todo))
        .route("/api/update-todo/{id}", post(toggle_todo))
        .route("/api/del-todo/{id}", post(delete_todo))
        .fallback(unknown_route)
        .method_not_allowed_fallback(wrong_method)
        .with_state(store)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(trace)
}

/// Turn a handler panic into the generic 500 JSON body.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    TodoError::Internal(detail).into_response()
}

pub async fn run(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    run_until(listener, store, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(
    listener: TcpListener,
    store: SharedStore,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Parse a path segment as a todo id. Anything that is not a plain unsigned
/// integer is a lookup miss.
pub fn parse_id(raw: &str) -> Result<u64, TodoError> {
    raw.parse::<u64>().map_err(|_| TodoError::not_found(raw))
}

/// Resolve the `{id}` segment. A segment axum cannot decode is a miss too,
/// reported with its raw (still percent-encoded) text.
fn resolve_id(segment: Result<Path<String>, PathRejection>, uri: &Uri) -> Result<u64, TodoError> {
    match segment {
        Ok(Path(raw)) => parse_id(&raw),
        Err(rejection) => {
            tracing::debug!(%rejection, "todo id segment rejected");
            let raw = uri.path().rsplit('/').next().unwrap_or_default();
            Err(TodoError::not_found(raw))
        }
    }
}

async fn list_todos(State(store): State<SharedStore>) -> Json<Vec<TodoRecord>> {
    let store = store.read().await;
    Json(store.list().to_vec())
}

async fn add_todo(
    State(store): State<SharedStore>,
    payload: Result<Json<AddTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoRecord>), TodoError> {
    // Malformed JSON carries no value, same as a missing field.
    let value = match payload {
        Ok(Json(input)) => input.value,
        Err(
            rejection @ (JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_)),
        ) => {
            tracing::debug!(%rejection, "add-todo body rejected");
            None
        }
        Err(rejection) => {
            tracing::debug!(%rejection, "add-todo body unreadable");
            return Err(TodoError::unreadable_body());
        }
    };
    let todo = store.write().await.create(value.as_deref())?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn toggle_todo(
    State(store): State<SharedStore>,
    uri: Uri,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<TodoRecord>, TodoError> {
    let id = resolve_id(id, &uri)?;
    let todo = store.write().await.toggle_complete(id)?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(store): State<SharedStore>,
    uri: Uri,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteResponse>, TodoError> {
    let id = resolve_id(id, &uri)?;
    let deleted_todo = store.write().await.delete(id)?;
    Ok(Json(DeleteResponse {
        message: DELETED_MESSAGE.to_string(),
        deleted_todo,
    }))
}

async fn unknown_route(uri: Uri) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("no route for {}", uri.path()),
        }),
    )
}

async fn wrong_method(method: Method, uri: Uri) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: format!("{method} not allowed on {}", uri.path()),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_plain_integers() {
        assert_eq!(parse_id("1"), Ok(1));
        assert_eq!(parse_id("42"), Ok(42));
    }

    #[test]
    fn parse_id_treats_garbage_as_not_found() {
        for raw in ["abc", "12abc", "-1", "1.5", ""] {
            assert_eq!(parse_id(raw), Err(TodoError::not_found(raw)), "{raw}");
        }
    }

    #[test]
    fn add_todo_value_is_optional() {
        let input: AddTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.value.is_none());

        let input: AddTodo = serde_json::from_str(r#"{"value":null}"#).unwrap();
        assert!(input.value.is_none());

        let input: AddTodo = serde_json::from_str(r#"{"value":"buy milk"}"#).unwrap();
        assert_eq!(input.value.as_deref(), Some("buy milk"));
    }

    #[test]
    fn add_todo_rejects_non_string_value() {
        let result: Result<AddTodo, _> = serde_json::from_str(r#"{"value":5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn delete_response_uses_camel_case() {
        let mut store = TodoStore::new();
        let deleted_todo = store.create(Some("walk dog")).unwrap();
        let json = serde_json::to_value(DeleteResponse {
            message: DELETED_MESSAGE.to_string(),
            deleted_todo,
        })
        .unwrap();
        assert_eq!(json["message"], DELETED_MESSAGE);
        assert_eq!(json["deletedTodo"]["value"], "walk dog");
    }
}
