#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use taskboard_core::{
    Note, NotePayload, NewUser, PaginatedResponse, Pagination, Priority, RequestError,
    RequestResult, Todo, TodoListQuery, TodoPayload, TodoRepository, User, UserRef,
    UserRepository,
};
use uuid::Uuid;

const FIXED_TS: &str = "2026-01-01T00:00:00.000Z";

#[derive(Default)]
pub struct FakeState {
    pub users: Vec<User>,
    pub todos: Vec<Todo>,
    failures: HashMap<&'static str, (u16, String)>,
    pub calls: Vec<&'static str>,
}

/// In-memory backend shared between clones.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn with_users(users: Vec<User>) -> Self {
        let backend = Self::default();
        backend.state().users = users;
        backend
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap()
    }

    /// Makes every call to `op` fail with `status` and `message` until cleared.
    pub fn fail(&self, op: &'static str, status: u16, message: &str) {
        self.state().failures.insert(op, (status, message.to_string()));
    }

    pub fn clear_failures(&self) {
        self.state().failures.clear();
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.state().calls.iter().filter(|call| **call == op).count()
    }

    pub fn seed_todo(&self, title: &str, author: &str) -> Todo {
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            priority: Priority::Medium,
            tags: Vec::new(),
            mentioned_users: Vec::new(),
            notes: Vec::new(),
            created_by: UserRef::Unresolved(author.to_string()),
            created_at: FIXED_TS.to_string(),
            updated_at: FIXED_TS.to_string(),
        };
        self.state().todos.push(todo.clone());
        todo
    }

    fn enter(&self, op: &'static str) -> RequestResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(op);
        if let Some((status, message)) = state.failures.get(op) {
            return Err(RequestError::Status {
                status: StatusCode::from_u16(*status).unwrap(),
                message: message.clone(),
            });
        }
        Ok(state)
    }
}

fn not_found(what: &str) -> RequestError {
    RequestError::Status {
        status: StatusCode::NOT_FOUND,
        message: format!("{what} not found"),
    }
}

pub fn user(id: &str, username: &str) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        name: format!("{username} name"),
        email: format!("{username}@example.com"),
        created_at: FIXED_TS.to_string(),
        updated_at: FIXED_TS.to_string(),
    }
}

fn todo_from_payload(id: String, payload: &TodoPayload, notes: Vec<Note>) -> Todo {
    Todo {
        id,
        title: payload.title.clone(),
        description: payload.description.clone(),
        priority: payload.priority,
        tags: payload.tags.clone(),
        mentioned_users: payload
            .mentioned_users
            .iter()
            .cloned()
            .map(UserRef::Unresolved)
            .collect(),
        notes,
        created_by: UserRef::Unresolved(payload.created_by.clone()),
        created_at: FIXED_TS.to_string(),
        updated_at: FIXED_TS.to_string(),
    }
}

#[async_trait]
impl UserRepository for FakeBackend {
    async fn list_users(&self) -> RequestResult<Vec<User>> {
        Ok(self.enter("list_users")?.users.clone())
    }

    async fn get_user(&self, id: &str) -> RequestResult<User> {
        let state = self.enter("get_user")?;
        state
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| not_found("User"))
    }

    async fn create_user(&self, new_user: &NewUser) -> RequestResult<User> {
        let mut state = self.enter("create_user")?;
        let mut created = user(&Uuid::new_v4().to_string(), &new_user.username);
        created.name = new_user.name.clone();
        created.email = new_user.email.clone();
        state.users.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl TodoRepository for FakeBackend {
    async fn list_todos(&self, query: &TodoListQuery) -> RequestResult<PaginatedResponse<Todo>> {
        let state = self.enter("list_todos")?;
        let filtered: Vec<Todo> = state
            .todos
            .iter()
            .filter(|todo| {
                query.filters.iter().all(|(key, value)| match key.as_str() {
                    "priority" => todo.priority.as_str() == value,
                    "tag" => todo.tags.contains(value),
                    _ => true,
                })
            })
            .cloned()
            .collect();
        let total = filtered.len() as u64;
        let limit = query.limit.max(1);
        let pages = filtered.len().div_ceil(limit as usize) as u32;
        let data: Vec<Todo> = filtered
            .into_iter()
            .skip(((query.page.max(1) - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        Ok(PaginatedResponse {
            success: true,
            count: data.len() as u64,
            data,
            error: None,
            pagination: Pagination {
                total,
                page: query.page,
                pages,
                limit,
            },
        })
    }

    async fn get_todo(&self, id: &str) -> RequestResult<Todo> {
        let state = self.enter("get_todo")?;
        state
            .todos
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
            .ok_or_else(|| not_found("Todo"))
    }

    async fn create_todo(&self, payload: &TodoPayload) -> RequestResult<Todo> {
        let mut state = self.enter("create_todo")?;
        let todo = todo_from_payload(Uuid::new_v4().to_string(), payload, Vec::new());
        state.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update_todo(&self, id: &str, payload: &TodoPayload) -> RequestResult<Todo> {
        let mut state = self.enter("update_todo")?;
        let slot = state
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| not_found("Todo"))?;
        *slot = todo_from_payload(id.to_string(), payload, slot.notes.clone());
        Ok(slot.clone())
    }

    async fn delete_todo(&self, id: &str) -> RequestResult<()> {
        let mut state = self.enter("delete_todo")?;
        let before = state.todos.len();
        state.todos.retain(|todo| todo.id != id);
        if state.todos.len() == before {
            return Err(not_found("Todo"));
        }
        Ok(())
    }

    async fn get_todo_notes(&self, id: &str) -> RequestResult<Todo> {
        let state = self.enter("get_todo_notes")?;
        state
            .todos
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
            .ok_or_else(|| not_found("Todo"))
    }

    async fn add_note(&self, id: &str, note: &NotePayload) -> RequestResult<Todo> {
        let mut state = self.enter("add_note")?;
        let todo = state
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| not_found("Todo"))?;
        todo.notes.push(Note {
            id: Uuid::new_v4().to_string(),
            content: note.content.clone(),
            created_by: UserRef::Unresolved(note.created_by.clone()),
            created_at: FIXED_TS.to_string(),
        });
        Ok(todo.clone())
    }
}
