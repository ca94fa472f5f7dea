//! User repository and service traits.

use async_trait::async_trait;

use super::users_model::{JoinedCampaign, NewUser, User};
use crate::errors::Result;

/// Trait defining the contract for User repository operations.
///
/// Balances are never written through this trait; they only change when the
/// participation ledger credits a settlement.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Persists a new user with a zero balance. A taken email fails with a
    /// validation error on `email`.
    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// Retrieves a user by ID, failing with `Error::NotFound`.
    fn get_by_id(&self, user_id: &str) -> Result<User>;

    /// Campaigns the user joined, most recent join first.
    fn list_joined_campaigns(&self, user_id: &str) -> Result<Vec<JoinedCampaign>>;
}

/// Trait defining the contract for User service operations.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register_user(&self, new_user: NewUser) -> Result<User>;

    fn get_user(&self, user_id: &str) -> Result<User>;

    fn get_joined_campaigns(&self, user_id: &str) -> Result<Vec<JoinedCampaign>>;
}
