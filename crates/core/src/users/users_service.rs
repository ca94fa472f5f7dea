use log::info;
use std::sync::Arc;

use super::users_model::{JoinedCampaign, NewUser, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::Result;

/// Service for registering and reading participants
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn register_user(&self, new_user: NewUser) -> Result<User> {
        let new_user = new_user.validate()?;
        let user = self.repository.create(new_user).await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn get_joined_campaigns(&self, user_id: &str) -> Result<Vec<JoinedCampaign>> {
        // Distinguish an unknown user from one with no joins.
        self.repository.get_by_id(user_id)?;
        self.repository.list_joined_campaigns(user_id)
    }
}
