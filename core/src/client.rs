//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ErrorBody, ListFilter, NewTodoItem, StatusUpdate, TodoItem};

/// Synchronous, stateless client for the todo API.
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

    pub fn build_list_items(&self, filter: ListFilter) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            format!("/items{}", filter.query_string()),
            None,
        )
    }

    pub fn build_get_item(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/items/{id}"), None)
    }

    pub fn build_create_item(&self, input: &NewTodoItem) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, "/items".to_string(), Some(body)))
    }

    /// Full replace of `item`, addressed by `item.id`.
    pub fn build_replace_item(&self, item: &TodoItem) -> Result<HttpRequest, ApiError> {
        let body = to_json(item)?;
        Ok(self.request(HttpMethod::Put, format!("/items/{}", item.id), Some(body)))
    }

    pub fn build_toggle_status(&self, id: i64) -> Result<HttpRequest, ApiError> {
        let body = to_json(&StatusUpdate { id })?;
        Ok(self.request(HttpMethod::Put, format!("/items/status/{id}"), Some(body)))
    }

    pub fn build_delete_item(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/items/{id}"), None)
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_get_item(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_status(&response, 201)?;
        from_json(&response.body)
    }

    pub fn parse_replace_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_toggle_status(&self, response: HttpResponse) -> Result<TodoItem, ApiError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        404 => Err(ApiError::NotFound),
        400 => {
            // Fall back to the raw body when it is not the usual error shape.
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .map(|body| body.message)
                .unwrap_or_else(|_| response.body.clone());
            Err(ApiError::BadRequest { message })
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
    use chrono::{TimeZone, Utc};

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

    const ITEM_JSON: &str = r#"{"id":1,"title":"Test","description":null,"dueDate":"2030-01-01T00:00:00Z","completionDate":null}"#;

    #[test]
    fn build_list_items_without_filter() {
        let req = client().build_list_items(ListFilter::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/items");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_items_with_filters() {
        let req = client().build_list_items(ListFilter::incomplete());
        assert_eq!(req.path, "http://localhost:3000/items?showIncomplete=true");

        let req = client().build_list_items(ListFilter::completed());
        assert_eq!(req.path, "http://localhost:3000/items?showCompleted=true");

        let both = ListFilter {
            incomplete: true,
            completed: true,
        };
        let req = client().build_list_items(both);
        assert_eq!(
            req.path,
            "http://localhost:3000/items?showIncomplete=true&showCompleted=true"
        );
    }

    #[test]
    fn build_create_item_produces_correct_request() {
        let input = NewTodoItem {
            title: "Buy milk".to_string(),
            description: None,
            due_date: Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap(),
        };
        let req = client().build_create_item(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/items");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Buy milk");
        assert!(body.get("description").is_none());
        assert!(body.get("dueDate").is_some());
    }

    #[test]
    fn build_replace_item_uses_item_id() {
        let item: TodoItem = serde_json::from_str(ITEM_JSON).unwrap();
        let req = client().build_replace_item(&item).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/items/1");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id"], 1);
    }

    #[test]
    fn build_toggle_status_sends_only_id() {
        let req = client().build_toggle_status(5).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/items/status/5");
        assert_eq!(req.body.as_deref(), Some(r#"{"id":5}"#));
    }

    #[test]
    fn build_delete_item_produces_correct_request() {
        let req = client().build_delete_item(3);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/items/3");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_items_success() {
        let todos = client()
            .parse_list_items(response(200, &format!("[{ITEM_JSON}]")))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "Test");
    }

    #[test]
    fn parse_get_item_not_found() {
        let err = client().parse_get_item(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_item_bad_request_extracts_message() {
        let err = client()
            .parse_create_item(response(400, r#"{"message":"期日に過去の日付が設定されています"}"#))
            .unwrap_err();
        assert!(
            matches!(err, ApiError::BadRequest { ref message } if message == "期日に過去の日付が設定されています")
        );
    }

    #[test]
    fn parse_bad_request_with_plain_body() {
        let err = client()
            .parse_replace_item(response(400, "Invalid URL"))
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { ref message } if message == "Invalid URL"));
    }

    #[test]
    fn parse_create_item_wrong_status() {
        let err = client()
            .parse_create_item(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_toggle_status_success() {
        let body = r#"{"id":1,"title":"Done","description":null,"dueDate":"2030-01-01T00:00:00Z","completionDate":"2029-12-31T10:00:00Z"}"#;
        let item = client().parse_toggle_status(response(200, body)).unwrap();
        assert_eq!(
            item.completion_date,
            Some(Utc.with_ymd_and_hms(2029, 12, 31, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_replace_and_delete_expect_no_content() {
        assert!(client().parse_replace_item(response(204, "")).is_ok());
        assert!(client().parse_delete_item(response(204, "")).is_ok());
        assert!(matches!(
            client().parse_delete_item(response(404, "")).unwrap_err(),
            ApiError::NotFound
        ));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_get_item(1);
        assert_eq!(req.path, "http://localhost:3000/items/1");
    }

    #[test]
    fn parse_list_items_bad_json() {
        let err = client()
            .parse_list_items(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
