//! Participation ledger traits.
//!
//! `LedgerTransaction` is the set of primitives the join-and-settle workflow
//! runs against. Storage implementations hand the workflow a ledger bound to a
//! single serialised write transaction, so everything the workflow reads and
//! writes through it is atomic relative to concurrent joins.

use std::sync::Arc;

use async_trait::async_trait;

use super::participation_model::{
    JoinOutcome, JoinRequest, NewParticipation, Participation, PayoutDetails,
};
use crate::campaigns::{Campaign, CampaignStatus};
use crate::errors::Result;
use crate::settlement::{RandomSource, Settlement};

/// Operations available inside one exclusive write transaction.
pub trait LedgerTransaction {
    fn find_campaign(&mut self, campaign_id: &str) -> Result<Option<Campaign>>;

    fn user_exists(&mut self, user_id: &str) -> Result<bool>;

    /// Number of distinct users recorded for the campaign.
    fn count_joined(&mut self, campaign_id: &str) -> Result<i64>;

    fn has_joined(&mut self, user_id: &str, campaign_id: &str) -> Result<bool>;

    /// Appends a membership row. Must fail with
    /// `ParticipationError::DuplicateJoin` if the pair already exists.
    fn record_join(&mut self, entry: NewParticipation) -> Result<Participation>;

    /// Copies the latest payout details onto the user's saved profile.
    fn save_payout_profile(&mut self, user_id: &str, details: &PayoutDetails) -> Result<()>;

    /// Joiners in join order.
    fn list_joined(&mut self, campaign_id: &str) -> Result<Vec<Participation>>;

    /// Compare-and-swap on campaign status. Returns `false` when the campaign
    /// was not in `from`.
    fn transition_status(
        &mut self,
        campaign_id: &str,
        from: CampaignStatus,
        to: CampaignStatus,
    ) -> Result<bool>;

    fn credit_balance(&mut self, user_id: &str, amount: i64) -> Result<()>;

    fn record_payout(&mut self, participation_id: &str, amount: i64) -> Result<()>;

    /// Stores the settlement record; at most one per campaign.
    fn record_settlement(&mut self, settlement: &Settlement) -> Result<()>;

    /// Runs `f` in a nested scope whose writes are discarded if it fails,
    /// leaving earlier writes of the enclosing transaction intact.
    fn savepoint<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>;
}

/// Trait defining the contract for participation ledger storage.
#[async_trait]
pub trait ParticipationRepositoryTrait: Send + Sync {
    /// Runs the join workflow inside one exclusive write transaction.
    async fn join(
        &self,
        request: JoinRequest,
        random: Arc<dyn RandomSource>,
    ) -> Result<JoinOutcome>;

    /// Runs settlement for a campaign whose cap was reached but which is
    /// still active.
    async fn settle(&self, campaign_id: &str, random: Arc<dyn RandomSource>)
        -> Result<Settlement>;

    /// Committed joins only.
    fn count_joined(&self, campaign_id: &str) -> Result<i64>;

    fn has_joined(&self, user_id: &str, campaign_id: &str) -> Result<bool>;

    fn list_joined(&self, campaign_id: &str) -> Result<Vec<Participation>>;

    fn get_settlement(&self, campaign_id: &str) -> Result<Option<Settlement>>;
}

/// Trait defining the contract for participation service operations.
#[async_trait]
pub trait ParticipationServiceTrait: Send + Sync {
    /// Validates the payout details and joins the campaign, settling it if
    /// this join fills the last slot.
    async fn join_campaign(&self, request: JoinRequest) -> Result<JoinOutcome>;

    /// Retries settlement for a full campaign left active by a failed attempt.
    async fn settle_campaign(&self, campaign_id: &str) -> Result<Settlement>;

    fn list_participants(&self, campaign_id: &str) -> Result<Vec<Participation>>;

    fn get_settlement(&self, campaign_id: &str) -> Result<Settlement>;
}
