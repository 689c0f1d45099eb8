//! Todo list/detail state and mutation flow.
//!
//! # Responsibility
//! - Load the todo page and roster, view single todos.
//! - Run create/update/delete/add-note against the repository.
//! - Re-fetch authoritative data after each successful mutation.
//!
//! # Invariants
//! - No optimistic updates: local state changes only after the backend
//!   confirms, except delete which drops the id locally.
//! - Any failed call leaves `todos`, `users` and `viewing` untouched.
//! - Create/update re-fetch the current page; add-note re-fetches the todo.

use crate::api::{Pagination, RequestError, TodoListQuery};
use crate::model::todo::{NotePayload, Todo, TodoPayload};
use crate::model::user::User;
use crate::repo::todo_repo::TodoRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::notification::Notifications;
use crate::service::todo_form::{TodoForm, TodoFormErrors};
use log::{info, warn};

pub const MSG_FETCH_FAILED: &str = "Failed to fetch data";
pub const MSG_REFRESH_FAILED: &str = "Failed to refresh todos";
pub const MSG_CREATED: &str = "Todo created successfully";
pub const MSG_UPDATED: &str = "Todo updated successfully";
pub const MSG_CREATE_FAILED: &str = "Failed to create todo";
pub const MSG_UPDATE_FAILED: &str = "Failed to update todo";
pub const MSG_DELETED: &str = "Todo deleted successfully";
pub const MSG_DELETE_FAILED: &str = "Failed to delete todo";
pub const MSG_NOTE_ADDED: &str = "Note added successfully";
pub const MSG_NOTE_FAILED: &str = "Failed to add note";
pub const MSG_VIEW_FAILED: &str = "Failed to load todo";
pub const MSG_NOT_LOGGED_IN: &str = "You must be logged in to create a todo";

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Validation(#[from] TodoFormErrors),
    #[error("no user selected")]
    NotLoggedIn,
}

pub type BoardResult<T> = Result<T, BoardError>;

pub struct TodoBoard<R>
where
    R: TodoRepository + UserRepository,
{
    repo: R,
    query: TodoListQuery,
    todos: Vec<Todo>,
    users: Vec<User>,
    pagination: Pagination,
    loading: bool,
    stale: bool,
    viewing: Option<Todo>,
    notifications: Notifications,
}

impl<R> TodoBoard<R>
where
    R: TodoRepository + UserRepository,
{
    pub fn new(repo: R) -> Self {
        Self::with_query(repo, TodoListQuery::default())
    }

    pub fn with_query(repo: R, query: TodoListQuery) -> Self {
        Self {
            repo,
            query,
            todos: Vec::new(),
            users: Vec::new(),
            pagination: Pagination::default(),
            loading: false,
            stale: true,
            viewing: None,
            notifications: Notifications::default(),
        }
    }

    /// Fetches the current page and the roster concurrently.
    ///
    /// Either request failing fails the whole load.
    pub async fn load(&mut self) -> BoardResult<()> {
        self.loading = true;
        let result = tokio::try_join!(
            self.repo.list_todos(&self.query),
            self.repo.list_users()
        );
        self.loading = false;

        match result {
            Ok((page, users)) => {
                info!(
                    "event=board_load module=board status=ok todos={} users={}",
                    page.data.len(),
                    users.len()
                );
                self.todos = page.data;
                self.pagination = page.pagination;
                self.users = users;
                self.stale = false;
                Ok(())
            }
            Err(err) => {
                warn!("event=board_load module=board status=error error={err}");
                self.notifications.error(MSG_FETCH_FAILED);
                Err(err.into())
            }
        }
    }

    /// Marks the loaded list as out of date.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Re-fetches the current page and replaces the local list.
    pub async fn reload(&mut self) -> BoardResult<()> {
        self.loading = true;
        let result = self.repo.list_todos(&self.query).await;
        self.loading = false;

        let page = result?;
        self.todos = page.data;
        self.pagination = page.pagination;
        self.stale = false;
        Ok(())
    }

    /// Reloads only when `invalidate` was called since the last fetch.
    pub async fn reload_if_stale(&mut self) -> BoardResult<bool> {
        if !self.stale {
            return Ok(false);
        }
        self.reload().await?;
        Ok(true)
    }

    /// Switches page/filters and reloads.
    pub async fn list(&mut self, query: TodoListQuery) -> BoardResult<()> {
        let previous = std::mem::replace(&mut self.query, query);
        if let Err(err) = self.reload().await {
            self.query = previous;
            self.notifications.error(MSG_FETCH_FAILED);
            return Err(err);
        }
        Ok(())
    }

    pub async fn fetch_one(&self, id: &str) -> BoardResult<Todo> {
        Ok(self.repo.get_todo(id).await?)
    }

    /// Fetches one todo and opens it in the detail view.
    pub async fn view(&mut self, id: &str) -> BoardResult<&Todo> {
        match self.repo.get_todo(id).await {
            Ok(todo) => {
                let todo: &Todo = self.viewing.insert(todo);
                Ok(todo)
            }
            Err(err) => {
                self.notifications.error(MSG_VIEW_FAILED);
                Err(err.into())
            }
        }
    }

    pub fn close_view(&mut self) {
        self.viewing = None;
    }

    pub async fn create(&mut self, payload: &TodoPayload) -> BoardResult<Todo> {
        match self.repo.create_todo(payload).await {
            Ok(created) => {
                info!("event=todo_create module=board status=ok id={}", created.id);
                self.notifications.success(MSG_CREATED);
                self.refresh_after_mutation().await;
                Ok(created)
            }
            Err(err) => {
                warn!("event=todo_create module=board status=error error={err}");
                self.notifications.error(MSG_CREATE_FAILED);
                Err(err.into())
            }
        }
    }

    pub async fn update(
        &mut self,
        id: &str,
        payload: &TodoPayload,
    ) -> BoardResult<Todo> {
        match self.repo.update_todo(id, payload).await {
            Ok(updated) => {
                info!("event=todo_update module=board status=ok id={id}");
                self.notifications.success(MSG_UPDATED);
                self.refresh_after_mutation().await;
                Ok(updated)
            }
            Err(err) => {
                warn!("event=todo_update module=board status=error id={id} error={err}");
                self.notifications.error(MSG_UPDATE_FAILED);
                Err(err.into())
            }
        }
    }

    /// Validates `form` and creates or updates depending on its mode.
    ///
    /// A successful create resets the form; edits keep it as submitted.
    pub async fn submit(
        &mut self,
        form: &mut TodoForm,
        current_user: Option<&User>,
    ) -> BoardResult<Todo> {
        let Some(author) = current_user else {
            self.notifications.error(MSG_NOT_LOGGED_IN);
            return Err(BoardError::NotLoggedIn);
        };
        let payload = form.to_payload(&author.id)?;

        match form.editing_id().map(str::to_string) {
            Some(id) => self.update(&id, &payload).await,
            None => {
                let created = self.create(&payload).await?;
                form.reset();
                Ok(created)
            }
        }
    }

    /// Deletes a todo and drops it from the local list without re-fetching.
    pub async fn delete(&mut self, id: &str) -> BoardResult<()> {
        match self.repo.delete_todo(id).await {
            Ok(()) => {
                info!("event=todo_delete module=board status=ok id={id}");
                self.todos.retain(|todo| todo.id != id);
                if self.viewing.as_ref().is_some_and(|todo| todo.id == id) {
                    self.viewing = None;
                }
                self.notifications.success(MSG_DELETED);
                Ok(())
            }
            Err(err) => {
                warn!("event=todo_delete module=board status=error id={id} error={err}");
                self.notifications.error(MSG_DELETE_FAILED);
                Err(err.into())
            }
        }
    }

    /// Appends a note, then re-fetches that todo.
    ///
    /// Blank content is ignored and returns `Ok(None)` without a request.
    pub async fn add_note(
        &mut self,
        id: &str,
        content: &str,
        author: &User,
    ) -> BoardResult<Option<Todo>> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        let note = NotePayload {
            content: content.to_string(),
            created_by: author.id.clone(),
        };
        if let Err(err) = self.repo.add_note(id, &note).await {
            warn!("event=note_add module=board status=error id={id} error={err}");
            self.notifications.error(MSG_NOTE_FAILED);
            return Err(err.into());
        }
        self.notifications.success(MSG_NOTE_ADDED);

        match self.repo.get_todo(id).await {
            Ok(fresh) => {
                self.replace_local(&fresh);
                Ok(Some(fresh))
            }
            Err(err) => {
                warn!("event=note_refresh module=board status=error id={id} error={err}");
                self.notifications.error(MSG_REFRESH_FAILED);
                Err(err.into())
            }
        }
    }

    async fn refresh_after_mutation(&mut self) {
        self.invalidate();
        if let Err(err) = self.reload().await {
            warn!("event=board_refresh module=board status=error error={err}");
            self.notifications.error(MSG_REFRESH_FAILED);
        }
    }

    fn replace_local(&mut self, fresh: &Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|todo| todo.id == fresh.id) {
            *slot = fresh.clone();
        }
        if let Some(viewing) = self.viewing.as_mut().filter(|todo| todo.id == fresh.id) {
            *viewing = fresh.clone();
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn query(&self) -> &TodoListQuery {
        &self.query
    }

    pub fn viewing(&self) -> Option<&Todo> {
        self.viewing.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }
}
