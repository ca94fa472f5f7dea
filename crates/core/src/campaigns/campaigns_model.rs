//! Campaign domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{
    MINIMUM_PARTICIPANTS, MINIMUM_PER_PERSON, MINIMUM_TOTAL_AMOUNT, RANDOM_PARTICIPANT_MULTIPLIER,
};
use crate::errors::ValidationError;

/// How a campaign's pool is split once its participant cap is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionRule {
    /// Every joiner wins `totalAmount / maxParticipants`.
    Equal,
    /// The first `beneficiaries` joiners win, in join order.
    Order,
    /// `beneficiaries` joiners are drawn uniformly at random.
    Random,
}

impl DistributionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionRule::Equal => "equal",
            DistributionRule::Order => "order",
            DistributionRule::Random => "random",
        }
    }
}

impl fmt::Display for DistributionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionRule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(DistributionRule::Equal),
            "order" => Ok(DistributionRule::Order),
            "random" => Ok(DistributionRule::Random),
            other => Err(ValidationError::invalid_field(
                "distributionRule",
                format!("'{}' is not one of equal, order, random", other),
            )),
        }
    }
}

/// Lifecycle status of a campaign.
///
/// `Active` is the only state that accepts joins. `Completed` and `Cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CampaignStatus::Active),
            "completed" => Ok(CampaignStatus::Completed),
            "cancelled" => Ok(CampaignStatus::Cancelled),
            other => Err(ValidationError::invalid_field(
                "status",
                format!("unknown campaign status '{}'", other),
            )),
        }
    }
}

/// A social-media task participants are asked to complete before joining.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SocialRequirement {
    pub platform: String,
    pub action: String,
    pub profile_url: String,
    pub display_name: String,
}

/// Domain model representing a funded campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub creator_name: String,
    pub social_requirements: Vec<SocialRequirement>,
    pub total_amount: i64,
    pub max_participants: i64,
    pub beneficiaries: Option<i64>,
    pub distribution_rule: DistributionRule,
    pub status: CampaignStatus,
    pub amount_per_person: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Campaign {
    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }

    /// Number of joiners that will be credited at settlement.
    pub fn winner_count(&self) -> i64 {
        match self.distribution_rule {
            DistributionRule::Equal => self.max_participants,
            DistributionRule::Order | DistributionRule::Random => {
                self.beneficiaries.unwrap_or(0)
            }
        }
    }

    pub fn remaining_slots(&self, joined: i64) -> i64 {
        (self.max_participants - joined).max(0)
    }
}

/// Input model for creating a new campaign.
///
/// `distribution_rule` stays a string here so an unknown rule is reported as a
/// field validation error rather than a payload decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub title: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub creator_name: String,
    #[serde(default)]
    pub social_requirements: Vec<SocialRequirement>,
    pub total_amount: i64,
    pub distribution_rule: String,
    pub max_participants: Option<i64>,
    pub beneficiaries: Option<i64>,
}

/// A campaign that passed validation, with its per-person amount derived.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDraft {
    pub title: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub creator_name: String,
    pub social_requirements: Vec<SocialRequirement>,
    pub total_amount: i64,
    pub max_participants: i64,
    pub beneficiaries: Option<i64>,
    pub distribution_rule: DistributionRule,
    pub amount_per_person: i64,
}

/// Platform-wide bounds applied when a campaign is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignLimits {
    pub min_total_amount: i64,
    pub min_per_person: i64,
    pub min_participants: i64,
    pub random_multiplier: i64,
}

impl Default for CampaignLimits {
    fn default() -> Self {
        Self {
            min_total_amount: MINIMUM_TOTAL_AMOUNT,
            min_per_person: MINIMUM_PER_PERSON,
            min_participants: MINIMUM_PARTICIPANTS,
            random_multiplier: RANDOM_PARTICIPANT_MULTIPLIER,
        }
    }
}

impl CampaignLimits {
    /// Largest number of winners a pool can pay at least `min_per_person` each.
    pub fn max_winners(&self, total_amount: i64) -> i64 {
        if self.min_per_person <= 0 {
            return 0;
        }
        total_amount / self.min_per_person
    }
}

fn require_text(value: &str, field: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

fn require_in_range(
    value: Option<i64>,
    field: &str,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::MissingField(field.to_string()))?;
    if value < min || value > max {
        return Err(ValidationError::invalid_field(
            field,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(value)
}

impl NewCampaign {
    /// Checks the creation rules and derives `amount_per_person`.
    pub fn validate(&self, limits: &CampaignLimits) -> Result<CampaignDraft, ValidationError> {
        let title = require_text(&self.title, "title")?;
        let creator_id = require_text(&self.creator_id, "creatorId")?;
        let creator_name = require_text(&self.creator_name, "creatorName")?;

        let mut social_requirements = Vec::with_capacity(self.social_requirements.len());
        for (idx, requirement) in self.social_requirements.iter().enumerate() {
            let field = |name: &str| format!("socialRequirements[{}].{}", idx, name);
            social_requirements.push(SocialRequirement {
                platform: require_text(&requirement.platform, &field("platform"))?,
                action: require_text(&requirement.action, &field("action"))?,
                profile_url: require_text(&requirement.profile_url, &field("profileUrl"))?,
                display_name: require_text(&requirement.display_name, &field("displayName"))?,
            });
        }

        if self.total_amount < limits.min_total_amount {
            return Err(ValidationError::invalid_field(
                "totalAmount",
                format!("must be at least {}", limits.min_total_amount),
            ));
        }

        let distribution_rule: DistributionRule = self.distribution_rule.parse()?;
        let max_winners = limits.max_winners(self.total_amount);

        let (max_participants, beneficiaries) = match distribution_rule {
            DistributionRule::Equal => {
                let max_participants = require_in_range(
                    self.max_participants,
                    "maxParticipants",
                    limits.min_participants,
                    max_winners,
                )?;
                (max_participants, None)
            }
            DistributionRule::Order | DistributionRule::Random => {
                let beneficiaries = require_in_range(
                    self.beneficiaries,
                    "beneficiaries",
                    limits.min_participants,
                    max_winners,
                )?;
                let upper = if distribution_rule == DistributionRule::Random {
                    beneficiaries.saturating_mul(limits.random_multiplier)
                } else {
                    i64::MAX
                };
                let max_participants = match self.max_participants {
                    Some(value) if value < beneficiaries || value > upper => {
                        let message = if upper == i64::MAX {
                            format!("must be at least {}", beneficiaries)
                        } else {
                            format!("must be between {} and {}", beneficiaries, upper)
                        };
                        return Err(ValidationError::invalid_field("maxParticipants", message));
                    }
                    Some(value) => value,
                    None => return Err(ValidationError::MissingField("maxParticipants".into())),
                };
                (max_participants, Some(beneficiaries))
            }
        };

        let divisor = beneficiaries.unwrap_or(max_participants);
        let amount_per_person = self.total_amount / divisor;

        Ok(CampaignDraft {
            title,
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            creator_id,
            creator_name,
            social_requirements,
            total_amount: self.total_amount,
            max_participants,
            beneficiaries,
            distribution_rule,
            amount_per_person,
        })
    }
}

/// A campaign together with its committed participant count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub current_participants: i64,
}

/// Read-only status snapshot consumed by UI polling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStatusView {
    pub campaign_id: String,
    pub status: CampaignStatus,
    pub current_participants: i64,
    pub max_participants: i64,
    pub remaining_participants: i64,
}
