//! Campaign repository and service traits.
//!
//! These traits define the contract for campaign operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::campaigns_model::{
    Campaign, CampaignDraft, CampaignStatusView, CampaignSummary, NewCampaign,
};
use crate::errors::Result;

/// Trait defining the contract for Campaign repository operations.
///
/// Rule and funding fields are immutable once stored; the only mutation the
/// repository exposes besides creation is the `active -> cancelled` transition.
/// Completion is owned by the participation ledger's settlement.
#[async_trait]
pub trait CampaignRepositoryTrait: Send + Sync {
    /// Persists a validated campaign with status `active`.
    async fn create(&self, draft: CampaignDraft) -> Result<Campaign>;

    /// Retrieves a campaign by its ID, failing with `Error::NotFound`.
    fn get_by_id(&self, campaign_id: &str) -> Result<Campaign>;

    /// Reads a campaign and its committed participant count from the same
    /// snapshot, so a completed settlement is never reported as a full but
    /// still active campaign.
    fn get_summary(&self, campaign_id: &str) -> Result<CampaignSummary>;

    /// Lists campaigns newest first, optionally restricted to one creator.
    fn list(&self, creator_id: Option<&str>) -> Result<Vec<Campaign>>;

    /// Moves an active campaign to `cancelled`.
    async fn cancel(&self, campaign_id: &str) -> Result<Campaign>;
}

/// Trait defining the contract for Campaign service operations.
#[async_trait]
pub trait CampaignServiceTrait: Send + Sync {
    /// Validates and creates a campaign.
    async fn create_campaign(&self, new_campaign: NewCampaign) -> Result<Campaign>;

    /// Retrieves a campaign with its current participant count.
    fn get_campaign(&self, campaign_id: &str) -> Result<CampaignSummary>;

    /// Lists campaigns with their current participant counts.
    fn list_campaigns(&self, creator_id: Option<&str>) -> Result<Vec<CampaignSummary>>;

    /// Status, participant count and remaining slots.
    fn get_campaign_status(&self, campaign_id: &str) -> Result<CampaignStatusView>;

    /// Cancels an active campaign.
    async fn cancel_campaign(&self, campaign_id: &str) -> Result<Campaign>;
}
