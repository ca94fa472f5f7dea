//! User domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::campaigns::Campaign;
use crate::errors::ValidationError;

/// A registered participant with their credited balance.
///
/// The payout fields hold the details submitted on the user's latest join and
/// stay empty until they join a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub balance: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for registering a user.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    /// Returns a trimmed copy with the email lowercased.
    pub fn validate(&self) -> Result<NewUser, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        let email = self.email.trim().to_ascii_lowercase();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email".to_string()));
        }
        let well_formed = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains('@')
            }
            None => false,
        };
        if !well_formed || email.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_field(
                "email",
                "must be a valid email address",
            ));
        }
        Ok(NewUser {
            name: name.to_string(),
            email,
        })
    }
}

/// A campaign seen from one of its participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinedCampaign {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub join_position: i64,
    pub amount_received: i64,
    pub joined_at: NaiveDateTime,
}
