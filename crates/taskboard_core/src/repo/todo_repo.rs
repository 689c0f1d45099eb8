//! Todo repository contract and HTTP implementation.

use crate::api::{ApiClient, PaginatedResponse, RequestResult, TodoListQuery};
use crate::model::todo::{NotePayload, Todo, TodoPayload};
use async_trait::async_trait;

/// Remote todo store, including note append.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn list_todos(&self, query: &TodoListQuery) -> RequestResult<PaginatedResponse<Todo>>;
    async fn get_todo(&self, id: &str) -> RequestResult<Todo>;
    async fn create_todo(&self, payload: &TodoPayload) -> RequestResult<Todo>;
    async fn update_todo(&self, id: &str, payload: &TodoPayload) -> RequestResult<Todo>;
    async fn delete_todo(&self, id: &str) -> RequestResult<()>;
    /// Returns the todo with its notes.
    async fn get_todo_notes(&self, id: &str) -> RequestResult<Todo>;
    /// Appends one note and returns the updated todo.
    async fn add_note(&self, id: &str, note: &NotePayload) -> RequestResult<Todo>;
}

#[async_trait]
impl TodoRepository for ApiClient {
    async fn list_todos(&self, query: &TodoListQuery) -> RequestResult<PaginatedResponse<Todo>> {
        ApiClient::list_todos(self, query).await
    }

    async fn get_todo(&self, id: &str) -> RequestResult<Todo> {
        ApiClient::get_todo(self, id).await
    }

    async fn create_todo(&self, payload: &TodoPayload) -> RequestResult<Todo> {
        ApiClient::create_todo(self, payload).await
    }

    async fn update_todo(&self, id: &str, payload: &TodoPayload) -> RequestResult<Todo> {
        ApiClient::update_todo(self, id, payload).await
    }

    async fn delete_todo(&self, id: &str) -> RequestResult<()> {
        ApiClient::delete_todo(self, id).await
    }

    async fn get_todo_notes(&self, id: &str) -> RequestResult<Todo> {
        ApiClient::get_todo_notes(self, id).await
    }

    async fn add_note(&self, id: &str, note: &NotePayload) -> RequestResult<Todo> {
        ApiClient::add_note(self, id, note).await
    }
}
