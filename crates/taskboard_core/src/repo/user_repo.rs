//! User repository contract and HTTP implementation.

use crate::api::{ApiClient, RequestResult};
use crate::model::user::{NewUser, User};
use async_trait::async_trait;

/// Remote user store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Full roster.
    async fn list_users(&self) -> RequestResult<Vec<User>>;
    async fn get_user(&self, id: &str) -> RequestResult<User>;
    /// Registers a user and returns the stored record.
    async fn create_user(&self, user: &NewUser) -> RequestResult<User>;
}

#[async_trait]
impl UserRepository for ApiClient {
    async fn list_users(&self) -> RequestResult<Vec<User>> {
        ApiClient::list_users(self).await
    }

    async fn get_user(&self, id: &str) -> RequestResult<User> {
        ApiClient::get_user(self, id).await
    }

    async fn create_user(&self, user: &NewUser) -> RequestResult<User> {
        ApiClient::create_user(self, user).await
    }
}
