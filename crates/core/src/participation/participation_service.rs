use log::{debug, error, info, warn};
use std::sync::Arc;

use super::participation_model::{JoinOutcome, JoinRequest, Participation, SettlementOutcome};
use super::participation_traits::{ParticipationRepositoryTrait, ParticipationServiceTrait};
use crate::campaigns::CampaignRepositoryTrait;
use crate::errors::{Error, Result};
use crate::settlement::{RandomSource, Settlement, SettlementError};

/// Service for joining campaigns and settling their pools
pub struct ParticipationService {
    repository: Arc<dyn ParticipationRepositoryTrait>,
    campaign_repository: Arc<dyn CampaignRepositoryTrait>,
    random: Arc<dyn RandomSource>,
}

impl ParticipationService {
    pub fn new(
        repository: Arc<dyn ParticipationRepositoryTrait>,
        campaign_repository: Arc<dyn CampaignRepositoryTrait>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            repository,
            campaign_repository,
            random,
        }
    }
}

#[async_trait::async_trait]
impl ParticipationServiceTrait for ParticipationService {
    async fn join_campaign(&self, request: JoinRequest) -> Result<JoinOutcome> {
        let request = request.validate()?;
        let outcome = match self.repository.join(request, self.random.clone()).await {
            Ok(outcome) => outcome,
            Err(Error::Participation(err)) => {
                debug!("Join rejected: {}", err);
                return Err(err.into());
            }
            Err(err) => return Err(err),
        };

        match &outcome.settlement {
            SettlementOutcome::Completed(settlement) => info!(
                "Join by {} completed campaign {}; {} winners credited",
                outcome.participation.user_id, outcome.campaign_id, settlement.winner_count
            ),
            SettlementOutcome::Deferred { .. } => warn!(
                "Campaign {} is full but unsettled; retry settlement",
                outcome.campaign_id
            ),
            SettlementOutcome::NotTriggered => {}
        }
        Ok(outcome)
    }

    async fn settle_campaign(&self, campaign_id: &str) -> Result<Settlement> {
        self.repository
            .settle(campaign_id, self.random.clone())
            .await
            .inspect_err(|err| match err {
                Error::Settlement(
                    SettlementError::AlreadySettled(_)
                    | SettlementError::CapNotReached { .. }
                    | SettlementError::CampaignNotActive { .. },
                ) => debug!("Settlement of {} refused: {}", campaign_id, err),
                Error::NotFound(_) => {}
                _ => error!("Settlement of {} failed: {}", campaign_id, err),
            })
    }

    fn list_participants(&self, campaign_id: &str) -> Result<Vec<Participation>> {
        self.campaign_repository.get_by_id(campaign_id)?;
        self.repository.list_joined(campaign_id)
    }

    fn get_settlement(&self, campaign_id: &str) -> Result<Settlement> {
        self.campaign_repository.get_by_id(campaign_id)?;
        self.repository
            .get_settlement(campaign_id)?
            .ok_or_else(|| Error::NotFound(format!("Campaign {} has not been settled", campaign_id)))
    }
}
