//! In-memory ledger used by the workflow and service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::join_workflow::{join_within, settle_within};
use super::participation_errors::ParticipationError;
use super::participation_model::{
    JoinOutcome, JoinRequest, NewParticipation, Participation, PayoutDetails,
};
use super::participation_traits::{LedgerTransaction, ParticipationRepositoryTrait};
use crate::campaigns::{
    Campaign, CampaignDraft, CampaignRepositoryTrait, CampaignStatus, CampaignSummary,
    DistributionRule,
};
use crate::errors::{DatabaseError, Error, Result};
use crate::settlement::{RandomSource, Settlement};

#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    pub campaigns: HashMap<String, Campaign>,
    pub balances: HashMap<String, i64>,
    pub profiles: HashMap<String, PayoutDetails>,
    pub participations: Vec<Participation>,
    pub settlements: HashMap<String, Settlement>,
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
    pub state: LedgerState,
    /// Makes `credit_balance` fail for this user.
    pub fail_credit_for: Option<String>,
    next_id: usize,
}

impl MemoryLedger {
    pub fn add_user(&mut self, user_id: &str) {
        self.state.balances.insert(user_id.to_string(), 0);
    }

    pub fn add_campaign(
        &mut self,
        id: &str,
        rule: DistributionRule,
        total_amount: i64,
        max_participants: i64,
        beneficiaries: Option<i64>,
    ) -> Campaign {
        let now = Utc::now().naive_utc();
        let campaign = Campaign {
            id: id.to_string(),
            title: format!("Campaign {}", id),
            description: None,
            creator_id: "creator".to_string(),
            creator_name: "Creator".to_string(),
            social_requirements: vec![],
            total_amount,
            max_participants,
            beneficiaries,
            distribution_rule: rule,
            status: CampaignStatus::Active,
            amount_per_person: total_amount / beneficiaries.unwrap_or(max_participants),
            created_at: now,
            updated_at: now,
        };
        self.state
            .campaigns
            .insert(id.to_string(), campaign.clone());
        campaign
    }

    pub fn balance(&self, user_id: &str) -> i64 {
        self.state.balances.get(user_id).copied().unwrap_or(0)
    }

    pub fn status(&self, campaign_id: &str) -> CampaignStatus {
        self.state.campaigns[campaign_id].status
    }

    pub fn total_credited(&self) -> i64 {
        self.state.balances.values().sum()
    }

    /// Runs `f` as one transaction: all of its writes are discarded on error.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.state.clone();
        let result = f(self);
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }
}

pub fn payout_details(name: &str) -> PayoutDetails {
    PayoutDetails {
        full_name: name.to_string(),
        phone_number: "+2348030000000".to_string(),
        bank_name: "First Bank".to_string(),
        account_number: "0123456789".to_string(),
        account_name: name.to_string(),
    }
}

pub fn join_request(campaign_id: &str, user_id: &str) -> JoinRequest {
    JoinRequest {
        campaign_id: campaign_id.to_string(),
        user_id: user_id.to_string(),
        payout_details: payout_details(user_id),
        has_followed: true,
    }
}

impl LedgerTransaction for MemoryLedger {
    fn find_campaign(&mut self, campaign_id: &str) -> Result<Option<Campaign>> {
        Ok(self.state.campaigns.get(campaign_id).cloned())
    }

    fn user_exists(&mut self, user_id: &str) -> Result<bool> {
        Ok(self.state.balances.contains_key(user_id))
    }

    fn count_joined(&mut self, campaign_id: &str) -> Result<i64> {
        Ok(self
            .state
            .participations
            .iter()
            .filter(|p| p.campaign_id == campaign_id)
            .count() as i64)
    }

    fn has_joined(&mut self, user_id: &str, campaign_id: &str) -> Result<bool> {
        Ok(self
            .state
            .participations
            .iter()
            .any(|p| p.campaign_id == campaign_id && p.user_id == user_id))
    }

    fn record_join(&mut self, entry: NewParticipation) -> Result<Participation> {
        if self.has_joined(&entry.user_id, &entry.campaign_id)? {
            return Err(ParticipationError::DuplicateJoin {
                user_id: entry.user_id,
                campaign_id: entry.campaign_id,
            }
            .into());
        }
        self.next_id += 1;
        let participation = Participation {
            id: format!("part-{}", self.next_id),
            campaign_id: entry.campaign_id,
            user_id: entry.user_id,
            join_position: entry.join_position,
            payout_details: entry.payout_details,
            has_followed: entry.has_followed,
            amount_received: 0,
            joined_at: Utc::now().naive_utc(),
        };
        self.state.participations.push(participation.clone());
        Ok(participation)
    }

    fn save_payout_profile(&mut self, user_id: &str, details: &PayoutDetails) -> Result<()> {
        self.state
            .profiles
            .insert(user_id.to_string(), details.clone());
        Ok(())
    }

    fn list_joined(&mut self, campaign_id: &str) -> Result<Vec<Participation>> {
        let mut joined: Vec<Participation> = self
            .state
            .participations
            .iter()
            .filter(|p| p.campaign_id == campaign_id)
            .cloned()
            .collect();
        joined.sort_by_key(|p| p.join_position);
        Ok(joined)
    }

    fn transition_status(
        &mut self,
        campaign_id: &str,
        from: CampaignStatus,
        to: CampaignStatus,
    ) -> Result<bool> {
        match self.state.campaigns.get_mut(campaign_id) {
            Some(campaign) if campaign.status == from => {
                campaign.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn credit_balance(&mut self, user_id: &str, amount: i64) -> Result<()> {
        if self.fail_credit_for.as_deref() == Some(user_id) {
            return Err(
                DatabaseError::QueryFailed(format!("disk I/O error crediting {}", user_id)).into(),
            );
        }
        let balance = self
            .state
            .balances
            .get_mut(user_id)
            .ok_or_else(|| Error::user_not_found(user_id))?;
        *balance += amount;
        Ok(())
    }

    fn record_payout(&mut self, participation_id: &str, amount: i64) -> Result<()> {
        let participation = self
            .state
            .participations
            .iter_mut()
            .find(|p| p.id == participation_id)
            .ok_or_else(|| Error::NotFound(participation_id.to_string()))?;
        participation.amount_received = amount;
        Ok(())
    }

    fn record_settlement(&mut self, settlement: &Settlement) -> Result<()> {
        if self.state.settlements.contains_key(&settlement.campaign_id) {
            return Err(DatabaseError::UniqueViolation(settlement.campaign_id.clone()).into());
        }
        self.state
            .settlements
            .insert(settlement.campaign_id.clone(), settlement.clone());
        Ok(())
    }

    fn savepoint<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.transaction(f)
    }
}

/// Shares a `MemoryLedger` between tasks, one transaction at a time.
#[derive(Clone, Default)]
pub struct SharedLedger(pub Arc<Mutex<MemoryLedger>>);

impl SharedLedger {
    pub fn with<T>(&self, f: impl FnOnce(&mut MemoryLedger) -> T) -> T {
        f(&mut self.0.lock().unwrap())
    }
}

#[async_trait]
impl ParticipationRepositoryTrait for SharedLedger {
    async fn join(
        &self,
        request: JoinRequest,
        random: Arc<dyn RandomSource>,
    ) -> Result<JoinOutcome> {
        self.with(|ledger| ledger.transaction(|tx| join_within(tx, &request, random.as_ref())))
    }

    async fn settle(
        &self,
        campaign_id: &str,
        random: Arc<dyn RandomSource>,
    ) -> Result<Settlement> {
        self.with(|ledger| {
            ledger.transaction(|tx| settle_within(tx, campaign_id, random.as_ref()))
        })
    }

    fn count_joined(&self, campaign_id: &str) -> Result<i64> {
        self.with(|ledger| ledger.count_joined(campaign_id))
    }

    fn has_joined(&self, user_id: &str, campaign_id: &str) -> Result<bool> {
        self.with(|ledger| ledger.has_joined(user_id, campaign_id))
    }

    fn list_joined(&self, campaign_id: &str) -> Result<Vec<Participation>> {
        self.with(|ledger| ledger.list_joined(campaign_id))
    }

    fn get_settlement(&self, campaign_id: &str) -> Result<Option<Settlement>> {
        self.with(|ledger| Ok(ledger.state.settlements.get(campaign_id).cloned()))
    }
}

#[async_trait]
impl CampaignRepositoryTrait for SharedLedger {
    async fn create(&self, _draft: CampaignDraft) -> Result<Campaign> {
        unimplemented!()
    }

    fn get_by_id(&self, campaign_id: &str) -> Result<Campaign> {
        self.with(|ledger| {
            ledger
                .state
                .campaigns
                .get(campaign_id)
                .cloned()
                .ok_or_else(|| Error::campaign_not_found(campaign_id))
        })
    }

    fn get_summary(&self, campaign_id: &str) -> Result<CampaignSummary> {
        self.with(|ledger| {
            let campaign = ledger
                .find_campaign(campaign_id)?
                .ok_or_else(|| Error::campaign_not_found(campaign_id))?;
            let current_participants = ledger.count_joined(campaign_id)?;
            Ok(CampaignSummary {
                campaign,
                current_participants,
            })
        })
    }

    fn list(&self, _creator_id: Option<&str>) -> Result<Vec<Campaign>> {
        self.with(|ledger| Ok(ledger.state.campaigns.values().cloned().collect()))
    }

    async fn cancel(&self, campaign_id: &str) -> Result<Campaign> {
        self.with(|ledger| {
            let campaign = ledger
                .find_campaign(campaign_id)?
                .ok_or_else(|| Error::campaign_not_found(campaign_id))?;
            if !ledger.transition_status(
                campaign_id,
                CampaignStatus::Active,
                CampaignStatus::Cancelled,
            )? {
                return Err(ParticipationError::CampaignNotActive {
                    campaign_id: campaign.id,
                    status: campaign.status.to_string(),
                }
                .into());
            }
            Ok(ledger.state.campaigns[campaign_id].clone())
        })
    }
}
