//! SQLite storage implementation for campaigns.

mod model;
mod repository;

pub use model::CampaignDB;
pub use repository::CampaignRepository;

pub(crate) use repository::{load_campaign, transition_status};
