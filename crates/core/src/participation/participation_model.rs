//! Participation ledger domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::settlement::Settlement;

/// Bank and contact details a participant submits when joining.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDetails {
    pub full_name: String,
    pub phone_number: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}

fn required(value: &str, field: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

impl PayoutDetails {
    /// Returns a trimmed copy, rejecting blank or malformed fields.
    pub fn validate(&self) -> Result<PayoutDetails, ValidationError> {
        let full_name = required(&self.full_name, "fullName")?;
        let phone_number = required(&self.phone_number, "phoneNumber")?;
        let bank_name = required(&self.bank_name, "bankName")?;
        let account_number = required(&self.account_number, "accountNumber")?;
        let account_name = required(&self.account_name, "accountName")?;

        let phone_digits = phone_number.strip_prefix('+').unwrap_or(&phone_number);
        if phone_digits.is_empty() || !phone_digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_field(
                "phoneNumber",
                "must contain only digits, optionally prefixed with '+'",
            ));
        }
        if !account_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_field(
                "accountNumber",
                "must contain only digits",
            ));
        }

        Ok(PayoutDetails {
            full_name,
            phone_number,
            bank_name,
            account_number,
            account_name,
        })
    }
}

/// A participant's request to join a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Filled from the route when the request arrives over HTTP.
    #[serde(default)]
    pub campaign_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub payout_details: PayoutDetails,
    /// The participant confirmed they completed the campaign's social tasks.
    pub has_followed: bool,
}

impl JoinRequest {
    /// Boundary validation applied before the request reaches the ledger.
    pub fn validate(&self) -> Result<JoinRequest, ValidationError> {
        let campaign_id = required(&self.campaign_id, "campaignId")?;
        let user_id = required(&self.user_id, "userId")?;
        let payout_details = self.payout_details.validate()?;
        if !self.has_followed {
            return Err(ValidationError::invalid_field(
                "hasFollowed",
                "the campaign's social tasks must be completed before joining",
            ));
        }
        Ok(JoinRequest {
            campaign_id,
            user_id,
            payout_details,
            has_followed: true,
        })
    }
}

/// Row appended to the ledger on a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipation {
    pub campaign_id: String,
    pub user_id: String,
    /// 1-based position in the campaign's join sequence.
    pub join_position: i64,
    pub payout_details: PayoutDetails,
    pub has_followed: bool,
}

/// A recorded (user, campaign) membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub id: String,
    pub campaign_id: String,
    pub user_id: String,
    pub join_position: i64,
    #[serde(flatten)]
    pub payout_details: PayoutDetails,
    pub has_followed: bool,
    pub amount_received: i64,
    pub joined_at: NaiveDateTime,
}

/// What happened to settlement as part of a join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SettlementOutcome {
    /// The cap was not reached by this join.
    NotTriggered,
    /// This join reached the cap and the pool was distributed.
    Completed(Settlement),
    /// This join reached the cap but settlement failed and was rolled back;
    /// the campaign stays active until settlement is retried.
    Deferred { reason: String },
}

/// Result of a successful join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    pub campaign_id: String,
    pub participation: Participation,
    pub current_participants: i64,
    pub max_participants: i64,
    pub remaining_participants: i64,
    pub settlement: SettlementOutcome,
}
