//! Database models for the participation ledger and settlements.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use giveaway_core::errors::{DatabaseError, Error};
use giveaway_core::participation::{NewParticipation, Participation, PayoutDetails};
use giveaway_core::settlement::Settlement;

/// Database model for participations
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::participations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ParticipationDB {
    pub id: String,
    pub campaign_id: String,
    pub user_id: String,
    pub join_position: i64,
    pub full_name: String,
    pub phone_number: String,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub has_followed: bool,
    pub amount_received: i64,
    pub joined_at: NaiveDateTime,
}

impl ParticipationDB {
    pub fn new(id: String, entry: NewParticipation) -> Self {
        let PayoutDetails {
            full_name,
            phone_number,
            bank_name,
            account_number,
            account_name,
        } = entry.payout_details;
        Self {
            id,
            campaign_id: entry.campaign_id,
            user_id: entry.user_id,
            join_position: entry.join_position,
            full_name,
            phone_number,
            bank_name,
            account_number,
            account_name,
            has_followed: entry.has_followed,
            amount_received: 0,
            joined_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl From<ParticipationDB> for Participation {
    fn from(db: ParticipationDB) -> Self {
        Self {
            id: db.id,
            campaign_id: db.campaign_id,
            user_id: db.user_id,
            join_position: db.join_position,
            payout_details: PayoutDetails {
                full_name: db.full_name,
                phone_number: db.phone_number,
                bank_name: db.bank_name,
                account_number: db.account_number,
                account_name: db.account_name,
            },
            has_followed: db.has_followed,
            amount_received: db.amount_received,
            joined_at: db.joined_at,
        }
    }
}

/// Database model for settlements
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::settlements)]
#[diesel(primary_key(campaign_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SettlementDB {
    pub campaign_id: String,
    pub distribution_rule: String,
    pub amount_per_winner: i64,
    pub winner_count: i64,
    pub total_distributed: i64,
    pub undistributed: i64,
    /// JSON array of winner payouts
    pub winners: String,
    pub settled_at: NaiveDateTime,
}

impl TryFrom<&Settlement> for SettlementDB {
    type Error = Error;

    fn try_from(settlement: &Settlement) -> Result<Self, Self::Error> {
        Ok(Self {
            campaign_id: settlement.campaign_id.clone(),
            distribution_rule: settlement.distribution_rule.to_string(),
            amount_per_winner: settlement.amount_per_winner,
            winner_count: settlement.winner_count,
            total_distributed: settlement.total_distributed,
            undistributed: settlement.undistributed,
            winners: serde_json::to_string(&settlement.winners)
                .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))?,
            settled_at: settlement.settled_at,
        })
    }
}

impl TryFrom<SettlementDB> for Settlement {
    type Error = Error;

    fn try_from(db: SettlementDB) -> Result<Self, Self::Error> {
        let unreadable = |column: &str, detail: String| {
            Error::Database(DatabaseError::Internal(format!(
                "settlement of {} has an unreadable {}: {}",
                db.campaign_id, column, detail
            )))
        };
        let winners = serde_json::from_str(&db.winners)
            .map_err(|e| unreadable("winners", e.to_string()))?;
        let distribution_rule = db
            .distribution_rule
            .parse()
            .map_err(|e: giveaway_core::errors::ValidationError| {
                unreadable("distribution_rule", e.to_string())
            })?;
        Ok(Settlement {
            campaign_id: db.campaign_id.clone(),
            distribution_rule,
            amount_per_winner: db.amount_per_winner,
            winner_count: db.winner_count,
            total_distributed: db.total_distributed,
            undistributed: db.undistributed,
            winners,
            settled_at: db.settled_at,
        })
    }
}
