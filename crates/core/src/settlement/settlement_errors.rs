use thiserror::Error;

/// Failures while selecting winners or crediting balances.
///
/// Any of these leaves the campaign `active` with no balance changes visible,
/// so settlement can be retried from the persisted join order.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettlementError {
    #[error("Campaign {0} has already been settled")]
    AlreadySettled(String),

    #[error("Campaign {campaign_id} is {status} and cannot be settled")]
    CampaignNotActive { campaign_id: String, status: String },

    #[error("Campaign {campaign_id} has {joined} of {required} participants")]
    CapNotReached {
        campaign_id: String,
        joined: i64,
        required: i64,
    },

    #[error("Campaign {campaign_id} needs {required} joiners to pick winners but has {joined}")]
    InsufficientJoiners {
        campaign_id: String,
        joined: i64,
        required: i64,
    },

    #[error("Paying {winners} winners {amount_per_winner} each exceeds the pool of {total_amount}")]
    ConservationViolated {
        winners: i64,
        amount_per_winner: i64,
        total_amount: i64,
    },

    #[error("Random source returned an unusable sample: {0}")]
    InvalidSample(String),

    #[error("Failed to credit winner balance: {0}")]
    Crediting(String),
}
