//! User service implementation
//!
//! This service records users the first time they contact the bot and
//! provides profile lookups for operator commands.

use tracing::{info, debug};
use crate::database::repositories::UserRepository;
use crate::models::user::{User, CreateUserRequest};
use crate::utils::errors::Result;

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Register a new user or get existing user
    pub async fn register_or_get_user(&self, request: CreateUserRequest) -> Result<User> {
        let telegram_id = request.telegram_id;
        debug!(telegram_id = telegram_id, "Attempting to register or get user");

        if let Some(existing_user) = self.user_repository.find_by_telegram_id(telegram_id).await? {
            return Ok(existing_user);
        }

        let user = self.user_repository.create(request).await?;
        info!(user_id = user.id, telegram_id = telegram_id, display_name = %user.display_name, "New user registered");

        Ok(user)
    }

    /// Most recently registered users
    pub async fn list_users(&self, limit: i64) -> Result<Vec<User>> {
        self.user_repository.list(limit, 0).await
    }

    pub async fn count_users(&self) -> Result<i64> {
        self.user_repository.count().await
    }
}
