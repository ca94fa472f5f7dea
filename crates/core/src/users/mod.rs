//! Users module - participant identities and credited balances.

mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{JoinedCampaign, NewUser, User};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
