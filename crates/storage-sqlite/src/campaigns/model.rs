//! Database models for campaigns.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use giveaway_core::campaigns::{Campaign, CampaignDraft, CampaignStatus};
use giveaway_core::errors::{DatabaseError, Error};

/// Database model for campaigns
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::campaigns)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CampaignDB {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub creator_id: String,
    pub creator_name: String,
    /// JSON array of social requirements
    pub social_requirements: String,
    pub total_amount: i64,
    pub max_participants: i64,
    pub beneficiaries: Option<i64>,
    pub distribution_rule: String,
    pub status: String,
    pub amount_per_person: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CampaignDB {
    pub fn from_draft(id: String, draft: CampaignDraft) -> Result<Self, Error> {
        let now = chrono::Utc::now().naive_utc();
        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            creator_id: draft.creator_id,
            creator_name: draft.creator_name,
            social_requirements: serde_json::to_string(&draft.social_requirements)
                .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))?,
            total_amount: draft.total_amount,
            max_participants: draft.max_participants,
            beneficiaries: draft.beneficiaries,
            distribution_rule: draft.distribution_rule.to_string(),
            status: CampaignStatus::Active.to_string(),
            amount_per_person: draft.amount_per_person,
            created_at: now,
            updated_at: now,
        })
    }
}

fn corrupt(id: &str, column: &str, detail: impl std::fmt::Display) -> Error {
    Error::Database(DatabaseError::Internal(format!(
        "campaign {} has an unreadable {}: {}",
        id, column, detail
    )))
}

impl TryFrom<CampaignDB> for Campaign {
    type Error = Error;

    fn try_from(db: CampaignDB) -> Result<Self, Self::Error> {
        let social_requirements = serde_json::from_str(&db.social_requirements)
            .map_err(|e| corrupt(&db.id, "social_requirements", e))?;
        let distribution_rule = db
            .distribution_rule
            .parse()
            .map_err(|e| corrupt(&db.id, "distribution_rule", e))?;
        let status = db
            .status
            .parse()
            .map_err(|e| corrupt(&db.id, "status", e))?;

        Ok(Campaign {
            id: db.id,
            title: db.title,
            description: db.description,
            creator_id: db.creator_id,
            creator_name: db.creator_name,
            social_requirements,
            total_amount: db.total_amount,
            max_participants: db.max_participants,
            beneficiaries: db.beneficiaries,
            distribution_rule,
            status,
            amount_per_person: db.amount_per_person,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
