use thiserror::Error;

/// Expected rejections of a join attempt.
///
/// These are surfaced to the participant as-is and are not retried.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParticipationError {
    #[error("Campaign {campaign_id} is {status} and no longer accepts participants")]
    CampaignNotActive { campaign_id: String, status: String },

    #[error("Campaign {campaign_id} already has its maximum of {max_participants} participants")]
    CampaignFull {
        campaign_id: String,
        max_participants: i64,
    },

    #[error("You have already joined campaign {campaign_id}")]
    DuplicateJoin { user_id: String, campaign_id: String },
}
