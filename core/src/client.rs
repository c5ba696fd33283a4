//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AddTodo, DeletedTodo, ErrorBody, Todo};

/// Synchronous, stateless client for the todo API.
///
/// The caller is responsible for executing the HTTP round-trip between
/// `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/api/get-todo".to_string())
    }

    pub fn build_add_todo(&self, value: &str) -> Result<HttpRequest, ApiError> {
        let input = AddTodo {
            value: value.to_string(),
        };
        let body = serde_json::to_string(&input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/add-todo", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Flip the completion flag of todo `id`.
    pub fn build_toggle_todo(&self, id: u64) -> HttpRequest {
        self.bare(HttpMethod::Post, format!("/api/update-todo/{id}"))
    }

    pub fn build_delete_todo(&self, id: u64) -> HttpRequest {
        self.bare(HttpMethod::Post, format!("/api/del-todo/{id}"))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_add_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<DeletedTodo, ApiError> {
        parse_json(response, 200)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        404 => Err(ApiError::NotFound),
        400 => {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .map(|b| b.error)
                .unwrap_or_else(|_| response.body.clone());
            Err(ApiError::BadRequest(message))
        }
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODO_JSON: &str = r#"{"id":1,"value":"buy milk","isCompleted":false,"createdAt":"2024-01-01T00:00:00.000Z","updatedAt":"2024-01-01T00:00:00.000Z"}"#;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/get-todo");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_add_todo_produces_correct_request() {
        let req = client().build_add_todo("buy milk").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/add-todo");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"value": "buy milk"}));
    }

    #[test]
    fn build_toggle_todo_posts_without_body() {
        let req = client().build_toggle_todo(7);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/update-todo/7");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_delete_todo_posts_without_body() {
        let req = client().build_delete_todo(7);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/del-todo/7");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_todos_success() {
        let todos = client()
            .parse_list_todos(response(200, &format!("[{TODO_JSON}]")))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].value, "buy milk");
        assert!(!todos[0].is_completed);
    }

    #[test]
    fn parse_add_todo_success() {
        let todo = client().parse_add_todo(response(201, TODO_JSON)).unwrap();
        assert_eq!(todo.id, 1);
    }

    #[test]
    fn parse_add_todo_surfaces_server_message() {
        let err = client()
            .parse_add_todo(response(400, r#"{"error":"todo value must not be empty"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "todo value must not be empty"));
    }

    #[test]
    fn parse_add_todo_wrong_status() {
        let err = client()
            .parse_add_todo(response(500, r#"{"error":"internal server error"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_toggle_todo_not_found() {
        let err = client()
            .parse_toggle_todo(response(404, r#"{"error":"todo 9 not found"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_delete_todo_success() {
        let body = format!(r#"{{"message":"todo deleted","deletedTodo":{TODO_JSON}}}"#);
        let deleted = client().parse_delete_todo(response(200, &body)).unwrap();
        assert_eq!(deleted.message, "todo deleted");
        assert_eq!(deleted.deleted_todo.value, "buy milk");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_list_todos();
        assert_eq!(req.path, "http://localhost:3000/api/get-todo");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client().parse_list_todos(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
