//! Session/user context.
//!
//! # Responsibility
//! - Hold the user roster and the current user selection.
//! - Load the roster on init and on explicit refresh.
//! - Remember the selected user id in local preferences.
//!
//! # Invariants
//! - Phase is `Loading` while a roster fetch is in flight, `Ready` otherwise.
//! - A failed fetch keeps the previous roster and sets `error`.
//! - `set_current_user` never validates against the roster.

use crate::api::RequestError;
use crate::model::user::User;
use crate::repo::preference_repo::{PreferenceRepository, CURRENT_USER_KEY};
use crate::repo::user_repo::UserRepository;
use crate::service::notification::Notifications;
use log::{info, warn};

const FETCH_USERS_FAILED: &str = "Failed to fetch users";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
}

/// Where the front end should send the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Roster still loading; show a spinner.
    Loading,
    /// No user selected; prompt for selection.
    Landing,
    Dashboard,
}

/// Explicitly constructed session store.
pub struct SessionStore<R: UserRepository> {
    repo: R,
    preferences: Option<Box<dyn PreferenceRepository>>,
    phase: SessionPhase,
    users: Vec<User>,
    current_user: Option<User>,
    error: Option<String>,
    notifications: Notifications,
}

impl<R: UserRepository> SessionStore<R> {
    /// Creates a store in `Loading` phase; call `init` to fetch the roster.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            preferences: None,
            phase: SessionPhase::Loading,
            users: Vec::new(),
            current_user: None,
            error: None,
            notifications: Notifications::default(),
        }
    }

    /// Attaches local preference storage used to restore/remember the selection.
    pub fn with_preferences(mut self, preferences: Box<dyn PreferenceRepository>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Initial roster load.
    pub async fn init(&mut self) -> Result<(), RequestError> {
        self.fetch_users().await
    }

    /// Re-fetches the roster (e.g. after registration).
    pub async fn refresh(&mut self) -> Result<(), RequestError> {
        self.fetch_users().await
    }

    async fn fetch_users(&mut self) -> Result<(), RequestError> {
        self.phase = SessionPhase::Loading;
        let result = self.repo.list_users().await;
        self.phase = SessionPhase::Ready;

        match result {
            Ok(users) => {
                info!(
                    "event=session_fetch module=session status=ok users={}",
                    users.len()
                );
                self.users = users;
                if self.current_user.is_none() {
                    self.current_user = self.default_user();
                }
                self.error = None;
                Ok(())
            }
            Err(err) => {
                warn!("event=session_fetch module=session status=error error={err}");
                self.error = Some(err.to_string());
                self.notifications.error(FETCH_USERS_FAILED);
                Err(err)
            }
        }
    }

    /// Stored selection if it is still in the roster, else the first user.
    fn default_user(&self) -> Option<User> {
        let stored_id = self.preferences.as_ref().and_then(|prefs| {
            prefs
                .get(CURRENT_USER_KEY)
                .map_err(|err| {
                    warn!("event=preference_read module=session status=error error={err}");
                })
                .ok()
                .flatten()
        });
        stored_id
            .and_then(|id| self.users.iter().find(|user| user.id == id))
            .or_else(|| self.users.first())
            .cloned()
    }

    /// Overwrites the current user unconditionally.
    pub fn set_current_user(&mut self, user: User) {
        self.current_user = Some(user);
    }

    /// Selects a roster user by id and remembers the choice.
    ///
    /// Returns the selected user, or `None` when the id is not in the roster.
    pub fn select_user_by_id(&mut self, id: &str) -> Option<&User> {
        let user = self.users.iter().find(|user| user.id == id)?.clone();
        if let Some(prefs) = self.preferences.as_ref() {
            if let Err(err) = prefs.set(CURRENT_USER_KEY, &user.id) {
                warn!("event=preference_write module=session status=error error={err}");
            }
        }
        self.current_user = Some(user);
        self.current_user.as_ref()
    }

    /// Drops session state; the store can be re-initialized afterwards.
    pub fn teardown(&mut self) {
        self.phase = SessionPhase::Loading;
        self.users.clear();
        self.current_user = None;
        self.error = None;
    }

    pub fn landing_route(&self) -> Route {
        match (self.phase, self.current_user.is_some()) {
            (SessionPhase::Loading, _) => Route::Loading,
            (SessionPhase::Ready, true) => Route::Dashboard,
            (SessionPhase::Ready, false) => Route::Landing,
        }
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }
}
