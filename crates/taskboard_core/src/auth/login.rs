use crate::api::RequestError;
use crate::model::user::{NewUser, User};
use crate::repo::user_repo::UserRepository;
use crate::service::session::SessionStore;
use log::{info, warn};
use std::collections::HashMap;

const MSG_USERNAME_TAKEN: &str = "Username already exists";
const MSG_REGISTERED: &str = "Registration successful";
const MSG_REGISTER_FAILED: &str = "Failed to register user";
const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("username `{0}` already exists")]
    UsernameTaken(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("user `{0}` is not in the roster")]
    UnknownUser(String),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// In-memory `username -> password` table seeded at registration.
#[derive(Debug, Default)]
pub struct PasswordTable {
    entries: HashMap<String, String>,
}

impl PasswordTable {
    pub fn insert(&mut self, username: &str, password: &str) {
        self.entries
            .insert(username.to_string(), password.to_string());
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.entries
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains_key(username)
    }
}

/// Login page state: the password table plus helpers bound to a session.
#[derive(Debug, Default)]
pub struct LoginFlow {
    passwords: PasswordTable,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passwords(&self) -> &PasswordTable {
        &self.passwords
    }

    /// Dropdown selection of an existing roster user.
    pub fn select_existing<R: UserRepository>(
        &self,
        session: &mut SessionStore<R>,
        user_id: &str,
    ) -> Result<User, LoginError> {
        session
            .select_user_by_id(user_id)
            .cloned()
            .ok_or_else(|| LoginError::UnknownUser(user_id.to_string()))
    }

    /// Checks the password table and selects the matching roster user.
    pub fn login<R: UserRepository>(
        &self,
        session: &mut SessionStore<R>,
        username: &str,
        password: &str,
    ) -> Result<User, LoginError> {
        let username = username.trim();
        if !self.passwords.verify(username, password) {
            warn!("event=login module=auth status=error reason=invalid_credentials");
            session.notifications_mut().error(MSG_INVALID_CREDENTIALS);
            return Err(LoginError::InvalidCredentials);
        }
        let user_id = session
            .find_by_username(username)
            .map(|user| user.id.clone())
            .ok_or_else(|| LoginError::UnknownUser(username.to_string()))?;
        self.select_existing(session, &user_id)
    }

    /// Registers a user, seeds its password, refreshes the roster and selects it.
    ///
    /// Duplicate usernames are rejected before any request is made.
    pub async fn register<R: UserRepository>(
        &mut self,
        session: &mut SessionStore<R>,
        new_user: NewUser,
        password: &str,
    ) -> Result<User, LoginError> {
        let new_user = NewUser {
            username: new_user.username.trim().to_string(),
            name: new_user.name.trim().to_string(),
            email: new_user.email.trim().to_string(),
        };
        if new_user.username.is_empty() {
            return Err(LoginError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(LoginError::MissingField("password"));
        }
        if session.find_by_username(&new_user.username).is_some() {
            session.notifications_mut().error(MSG_USERNAME_TAKEN);
            return Err(LoginError::UsernameTaken(new_user.username));
        }

        let created = match session.repo().create_user(&new_user).await {
            Ok(user) => user,
            Err(err) => {
                warn!("event=register module=auth status=error error={err}");
                session.notifications_mut().error(MSG_REGISTER_FAILED);
                return Err(err.into());
            }
        };
        self.passwords.insert(&created.username, password);
        info!(
            "event=register module=auth status=ok user_id={}",
            created.id
        );
        session.notifications_mut().success(MSG_REGISTERED);

        if let Err(err) = session.refresh().await {
            warn!(
                "event=register_refresh module=auth status=error user_id={} error={}",
                created.id, err
            );
        }
        if session.select_user_by_id(&created.id).is_none() {
            session.set_current_user(created.clone());
        }
        Ok(created)
    }
}
