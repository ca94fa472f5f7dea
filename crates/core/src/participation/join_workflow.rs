//! The join-and-settle workflow.
//!
//! Both entry points expect a ledger bound to an exclusive write transaction:
//! the capacity check, the insert, the recount and the settlement trigger
//! all observe and modify the same serialised state.

use chrono::Utc;
use log::{debug, error, info};

use super::participation_errors::ParticipationError;
use super::participation_model::{JoinOutcome, JoinRequest, NewParticipation, SettlementOutcome};
use super::participation_traits::LedgerTransaction;
use crate::campaigns::{Campaign, CampaignStatus};
use crate::errors::{Error, Result};
use crate::settlement::{plan_settlement, RandomSource, Settlement, SettlementError};

/// Records `request` in the ledger and settles the campaign if this join
/// fills its last slot.
///
/// Settlement runs in a savepoint: when it fails, the join is still recorded,
/// the campaign stays `active` with no balances touched, and the outcome
/// reports the settlement as deferred.
pub fn join_within<L: LedgerTransaction>(
    ledger: &mut L,
    request: &JoinRequest,
    random: &dyn RandomSource,
) -> Result<JoinOutcome> {
    let campaign = ledger
        .find_campaign(&request.campaign_id)?
        .ok_or_else(|| Error::campaign_not_found(&request.campaign_id))?;

    if !ledger.user_exists(&request.user_id)? {
        return Err(Error::user_not_found(&request.user_id));
    }

    if !campaign.is_active() {
        return Err(ParticipationError::CampaignNotActive {
            campaign_id: campaign.id.clone(),
            status: campaign.status.to_string(),
        }
        .into());
    }

    let current = ledger.count_joined(&campaign.id)?;
    if current >= campaign.max_participants {
        return Err(ParticipationError::CampaignFull {
            campaign_id: campaign.id.clone(),
            max_participants: campaign.max_participants,
        }
        .into());
    }

    if ledger.has_joined(&request.user_id, &campaign.id)? {
        return Err(ParticipationError::DuplicateJoin {
            user_id: request.user_id.clone(),
            campaign_id: campaign.id.clone(),
        }
        .into());
    }

    let mut participation = ledger.record_join(NewParticipation {
        campaign_id: campaign.id.clone(),
        user_id: request.user_id.clone(),
        join_position: current + 1,
        payout_details: request.payout_details.clone(),
        has_followed: request.has_followed,
    })?;
    ledger.save_payout_profile(&request.user_id, &request.payout_details)?;

    let updated = ledger.count_joined(&campaign.id)?;
    if updated > campaign.max_participants {
        // Only reachable if the ledger is not actually serialised.
        return Err(Error::Unexpected(format!(
            "campaign {} would exceed its cap: {} of {}",
            campaign.id, updated, campaign.max_participants
        )));
    }
    debug!(
        "User {} joined campaign {} at position {} ({}/{})",
        request.user_id,
        campaign.id,
        participation.join_position,
        updated,
        campaign.max_participants
    );

    let settlement = if updated == campaign.max_participants {
        match ledger.savepoint(|tx| settle_locked(tx, &campaign, random)) {
            Ok(settlement) => {
                if let Some(amount) = settlement.payout_for(&participation.id) {
                    participation.amount_received = amount;
                }
                SettlementOutcome::Completed(settlement)
            }
            Err(err) => {
                error!(
                    "Settlement of campaign {} failed after join by {}; campaign left active for retry: {}",
                    campaign.id, request.user_id, err
                );
                SettlementOutcome::Deferred {
                    reason: err.to_string(),
                }
            }
        }
    } else {
        SettlementOutcome::NotTriggered
    };

    Ok(JoinOutcome {
        campaign_id: campaign.id.clone(),
        participation,
        current_participants: updated,
        max_participants: campaign.max_participants,
        remaining_participants: campaign.remaining_slots(updated),
        settlement,
    })
}

/// Settles a campaign that is full but still active.
///
/// Completed campaigns fail with `SettlementError::AlreadySettled`, so a
/// repeated call never credits twice.
pub fn settle_within<L: LedgerTransaction>(
    ledger: &mut L,
    campaign_id: &str,
    random: &dyn RandomSource,
) -> Result<Settlement> {
    let campaign = ledger
        .find_campaign(campaign_id)?
        .ok_or_else(|| Error::campaign_not_found(campaign_id))?;

    match campaign.status {
        CampaignStatus::Active => {}
        CampaignStatus::Completed => {
            return Err(SettlementError::AlreadySettled(campaign.id.clone()).into())
        }
        CampaignStatus::Cancelled => {
            return Err(SettlementError::CampaignNotActive {
                campaign_id: campaign.id.clone(),
                status: campaign.status.to_string(),
            }
            .into())
        }
    }

    let joined = ledger.count_joined(&campaign.id)?;
    if joined < campaign.max_participants {
        return Err(SettlementError::CapNotReached {
            campaign_id: campaign.id.clone(),
            joined,
            required: campaign.max_participants,
        }
        .into());
    }

    settle_locked(ledger, &campaign, random)
}

/// Flips the campaign to `completed`, then selects and credits winners.
///
/// Only the caller that wins the `active -> completed` swap credits anyone.
fn settle_locked<L: LedgerTransaction>(
    ledger: &mut L,
    campaign: &Campaign,
    random: &dyn RandomSource,
) -> Result<Settlement> {
    if !ledger.transition_status(
        &campaign.id,
        CampaignStatus::Active,
        CampaignStatus::Completed,
    )? {
        return Err(SettlementError::AlreadySettled(campaign.id.clone()).into());
    }

    let joiners = ledger.list_joined(&campaign.id)?;
    let settlement = plan_settlement(campaign, &joiners, random, Utc::now().naive_utc())?;

    for winner in &settlement.winners {
        ledger
            .credit_balance(&winner.user_id, winner.amount)
            .and_then(|_| ledger.record_payout(&winner.participation_id, winner.amount))
            .map_err(|e| {
                SettlementError::Crediting(format!("user {}: {}", winner.user_id, e))
            })?;
    }
    ledger.record_settlement(&settlement)?;

    info!(
        "Campaign {} settled ({}): {} winners x {} = {} distributed, {} undistributed",
        campaign.id,
        settlement.distribution_rule,
        settlement.winner_count,
        settlement.amount_per_winner,
        settlement.total_distributed,
        settlement.undistributed
    );
    Ok(settlement)
}
