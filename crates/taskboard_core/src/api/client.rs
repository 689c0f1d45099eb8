use super::envelope::{ApiResponse, PaginatedResponse};
use super::error::{RequestError, RequestResult, GENERIC_ERROR_MESSAGE};
use crate::config::ClientConfig;
use crate::model::todo::{NotePayload, Todo, TodoPayload};
use crate::model::user::{NewUser, User};
use log::{debug, error, info};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page and filter parameters for `GET /todos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListQuery {
    pub page: u32,
    pub limit: u32,
    /// Extra `key=value` filters, sent in insertion order.
    pub filters: Vec<(String, String)>,
}

impl Default for TodoListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
            filters: Vec::new(),
        }
    }
}

impl TodoListQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: if limit == 0 { DEFAULT_PAGE_SIZE } else { limit },
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Query-string pairs: `page`, `limit`, then filters.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        pairs.extend(self.filters.iter().cloned());
        pairs
    }
}

/// JSON client for the users/todos REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Creates a client rooted at `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: impl Into<String>) -> RequestResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(RequestError::Transport)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &ClientConfig) -> RequestResult<Self> {
        Self::new(config.api_base_url.as_str())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_users(&self) -> RequestResult<Vec<User>> {
        let response: ApiResponse<Vec<User>> = self
            .send("list_users", self.request(Method::GET, "/users"))
            .await?;
        unwrap_envelope(response)
    }

    pub async fn get_user(&self, id: &str) -> RequestResult<User> {
        let response: ApiResponse<User> = self
            .send("get_user", self.request(Method::GET, &format!("/users/{id}")))
            .await?;
        unwrap_envelope(response)
    }

    pub async fn create_user(&self, user: &NewUser) -> RequestResult<User> {
        let response: ApiResponse<User> = self
            .send("create_user", self.request(Method::POST, "/users").json(user))
            .await?;
        unwrap_envelope(response)
    }

    pub async fn list_todos(&self, query: &TodoListQuery) -> RequestResult<PaginatedResponse<Todo>> {
        let response: PaginatedResponse<Todo> = self
            .send(
                "list_todos",
                self.request(Method::GET, "/todos").query(&query.to_pairs()),
            )
            .await?;
        if !response.success {
            return Err(rejected(response.error));
        }
        Ok(response)
    }

    pub async fn get_todo(&self, id: &str) -> RequestResult<Todo> {
        let response: ApiResponse<Todo> = self
            .send("get_todo", self.request(Method::GET, &format!("/todos/{id}")))
            .await?;
        unwrap_envelope(response)
    }

    pub async fn create_todo(&self, payload: &TodoPayload) -> RequestResult<Todo> {
        let response: ApiResponse<Todo> = self
            .send("create_todo", self.request(Method::POST, "/todos").json(payload))
            .await?;
        unwrap_envelope(response)
    }

    pub async fn update_todo(&self, id: &str, payload: &TodoPayload) -> RequestResult<Todo> {
        let response: ApiResponse<Todo> = self
            .send(
                "update_todo",
                self.request(Method::PUT, &format!("/todos/{id}")).json(payload),
            )
            .await?;
        unwrap_envelope(response)
    }

    pub async fn delete_todo(&self, id: &str) -> RequestResult<()> {
        let response: Acknowledgement = self
            .send(
                "delete_todo",
                self.request(Method::DELETE, &format!("/todos/{id}")),
            )
            .await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.error))
        }
    }

    /// Fetches notes through the todo payload returned by `/todos/:id/notes`.
    pub async fn get_todo_notes(&self, id: &str) -> RequestResult<Todo> {
        let response: ApiResponse<Todo> = self
            .send(
                "get_todo_notes",
                self.request(Method::GET, &format!("/todos/{id}/notes")),
            )
            .await?;
        unwrap_envelope(response)
    }

    pub async fn add_note(&self, id: &str, note: &NotePayload) -> RequestResult<Todo> {
        let response: ApiResponse<Todo> = self
            .send(
                "add_note",
                self.request(Method::POST, &format!("/todos/{id}/notes"))
                    .json(note),
            )
            .await?;
        unwrap_envelope(response)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> RequestResult<T> {
        let started_at = Instant::now();
        debug!("event=api_request module=api status=start op={operation}");

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=api_request module=api status=error op={} duration_ms={} error_code=transport error={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(RequestError::Transport(err));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = RequestError::from_body(status, &body);
            error!(
                "event=api_request module=api status=error op={} duration_ms={} http_status={} error={}",
                operation,
                started_at.elapsed().as_millis(),
                status.as_u16(),
                err
            );
            return Err(err);
        }

        let parsed = response.json::<T>().await.map_err(RequestError::from);
        match &parsed {
            Ok(_) => info!(
                "event=api_request module=api status=ok op={} duration_ms={} http_status={}",
                operation,
                started_at.elapsed().as_millis(),
                status.as_u16()
            ),
            Err(err) => error!(
                "event=api_request module=api status=error op={} duration_ms={} error_code=decode error={}",
                operation,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        parsed
    }
}

/// Envelope for responses whose `data` is empty or absent.
#[derive(Debug, Deserialize)]
struct Acknowledgement {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

fn unwrap_envelope<T>(response: ApiResponse<T>) -> RequestResult<T> {
    if !response.success {
        return Err(rejected(response.error));
    }
    response
        .data
        .ok_or_else(|| RequestError::Decode("successful response carried no `data`".to_string()))
}

fn rejected(error: Option<String>) -> RequestError {
    RequestError::Rejected(error.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{unwrap_envelope, ApiClient, TodoListQuery};
    use crate::api::{ApiResponse, PaginatedResponse, RequestError, GENERIC_ERROR_MESSAGE};
    use crate::model::todo::Todo;
    use crate::model::user::User;

    #[test]
    fn rejection_without_data_decodes_and_is_rejected() {
        let response: ApiResponse<User> =
            serde_json::from_str(r#"{"success":false,"error":"Username taken"}"#).unwrap();
        let err = unwrap_envelope(response).unwrap_err();
        assert!(matches!(err, RequestError::Rejected(ref message) if message == "Username taken"));

        let response: ApiResponse<User> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(
            unwrap_envelope(response).unwrap_err().to_string(),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn success_without_data_is_a_decode_error() {
        let response: ApiResponse<User> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(matches!(
            unwrap_envelope(response).unwrap_err(),
            RequestError::Decode(_)
        ));
    }

    #[test]
    fn list_rejection_without_data_decodes() {
        let response: PaginatedResponse<Todo> =
            serde_json::from_str(r#"{"success":false,"error":"bad filter"}"#).unwrap();
        assert!(!response.success);
        assert!(response.data.is_empty());
        assert_eq!(response.error.as_deref(), Some("bad filter"));
    }

    #[test]
    fn list_query_orders_page_limit_then_filters() {
        let query = TodoListQuery::page(2, 25)
            .with_filter("priority", "High")
            .with_filter("tag", "work");
        let pairs = query.to_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["page", "limit", "priority", "tag"]);
        assert_eq!(pairs[0].1, "2");
        assert_eq!(pairs[1].1, "25");
    }

    #[test]
    fn list_query_clamps_zero_values() {
        let query = TodoListQuery::page(0, 0);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ApiClient::new("http://localhost:9/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9/api");
    }
}
