use log::{debug, info};
use std::sync::Arc;

use super::campaigns_model::{
    Campaign, CampaignLimits, CampaignStatusView, CampaignSummary, NewCampaign,
};
use super::campaigns_traits::{CampaignRepositoryTrait, CampaignServiceTrait};
use crate::errors::Result;
use crate::participation::ParticipationRepositoryTrait;

/// Service for creating and reading campaigns
pub struct CampaignService {
    repository: Arc<dyn CampaignRepositoryTrait>,
    participation_repository: Arc<dyn ParticipationRepositoryTrait>,
    limits: CampaignLimits,
}

impl CampaignService {
    pub fn new(
        repository: Arc<dyn CampaignRepositoryTrait>,
        participation_repository: Arc<dyn ParticipationRepositoryTrait>,
        limits: CampaignLimits,
    ) -> Self {
        Self {
            repository,
            participation_repository,
            limits,
        }
    }

    fn summarize(&self, campaign: Campaign) -> Result<CampaignSummary> {
        let current_participants = self.participation_repository.count_joined(&campaign.id)?;
        Ok(CampaignSummary {
            campaign,
            current_participants,
        })
    }
}

#[async_trait::async_trait]
impl CampaignServiceTrait for CampaignService {
    async fn create_campaign(&self, new_campaign: NewCampaign) -> Result<Campaign> {
        let draft = new_campaign.validate(&self.limits)?;
        debug!(
            "Creating {} campaign '{}': total={}, cap={}, per person={}",
            draft.distribution_rule,
            draft.title,
            draft.total_amount,
            draft.max_participants,
            draft.amount_per_person
        );
        let campaign = self.repository.create(draft).await?;
        info!("Campaign {} created by {}", campaign.id, campaign.creator_id);
        Ok(campaign)
    }

    fn get_campaign(&self, campaign_id: &str) -> Result<CampaignSummary> {
        self.repository.get_summary(campaign_id)
    }

    fn list_campaigns(&self, creator_id: Option<&str>) -> Result<Vec<CampaignSummary>> {
        self.repository
            .list(creator_id)?
            .into_iter()
            .map(|campaign| self.summarize(campaign))
            .collect()
    }

    fn get_campaign_status(&self, campaign_id: &str) -> Result<CampaignStatusView> {
        let CampaignSummary {
            campaign,
            current_participants,
        } = self.repository.get_summary(campaign_id)?;
        Ok(CampaignStatusView {
            campaign_id: campaign.id.clone(),
            status: campaign.status,
            current_participants,
            max_participants: campaign.max_participants,
            remaining_participants: campaign.remaining_slots(current_participants),
        })
    }

    async fn cancel_campaign(&self, campaign_id: &str) -> Result<Campaign> {
        let campaign = self.repository.cancel(campaign_id).await?;
        info!("Campaign {} cancelled", campaign.id);
        Ok(campaign)
    }
}
