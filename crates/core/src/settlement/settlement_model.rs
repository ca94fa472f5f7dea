//! Settlement domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::campaigns::DistributionRule;

/// One credited winner of a settled campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WinnerPayout {
    pub user_id: String,
    pub participation_id: String,
    pub join_position: i64,
    pub amount: i64,
}

/// Record of a campaign's one and only distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub campaign_id: String,
    pub distribution_rule: DistributionRule,
    pub amount_per_winner: i64,
    pub winner_count: i64,
    pub total_distributed: i64,
    /// Rounding remainder left in the pool by floor division.
    pub undistributed: i64,
    pub winners: Vec<WinnerPayout>,
    pub settled_at: NaiveDateTime,
}

impl Settlement {
    /// Amount credited to the given participation, if it won.
    pub fn payout_for(&self, participation_id: &str) -> Option<i64> {
        self.winners
            .iter()
            .find(|w| w.participation_id == participation_id)
            .map(|w| w.amount)
    }
}
