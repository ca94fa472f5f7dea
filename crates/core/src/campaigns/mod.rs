//! Campaigns module - domain models, services, and traits.

mod campaigns_model;
mod campaigns_service;
mod campaigns_traits;


pub use campaigns_model::{
    Campaign, CampaignDraft, CampaignLimits, CampaignStatus, CampaignStatusView, CampaignSummary,
    DistributionRule, NewCampaign, SocialRequirement,
};
pub use campaigns_service::CampaignService;
pub use campaigns_traits::{CampaignRepositoryTrait, CampaignServiceTrait};
