//! Winner selection and payout computation.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::settlement_errors::SettlementError;
use super::settlement_model::{Settlement, WinnerPayout};
use crate::campaigns::{Campaign, DistributionRule};
use crate::participation::Participation;

/// Source of randomness for the random distribution rule.
///
/// Implementations must return `amount` distinct indices in `0..population`,
/// each index equally likely to be included.
pub trait RandomSource: Send + Sync {
    fn sample_indices(&self, population: usize, amount: usize) -> Vec<usize>;
}

/// Draws from the thread-local OS-seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn sample_indices(&self, population: usize, amount: usize) -> Vec<usize> {
        let mut rng = rand::thread_rng();
        index::sample(&mut rng, population, amount.min(population)).into_vec()
    }
}

/// Deterministic generator for reproducible draws.
#[derive(Debug)]
pub struct SeededRandomSource {
    rng: Mutex<StdRng>,
}

impl SeededRandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn sample_indices(&self, population: usize, amount: usize) -> Vec<usize> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        index::sample(&mut *rng, population, amount.min(population)).into_vec()
    }
}

fn pick_random<'a>(
    joiners: &'a [Participation],
    required: usize,
    random: &dyn RandomSource,
) -> Result<Vec<&'a Participation>, SettlementError> {
    let indices = random.sample_indices(joiners.len(), required);
    let mut seen = HashSet::with_capacity(indices.len());
    let mut picked = Vec::with_capacity(indices.len());
    for idx in indices {
        let joiner = joiners.get(idx).ok_or_else(|| {
            SettlementError::InvalidSample(format!(
                "index {} outside of {} joiners",
                idx,
                joiners.len()
            ))
        })?;
        if !seen.insert(idx) {
            return Err(SettlementError::InvalidSample(format!(
                "index {} drawn twice",
                idx
            )));
        }
        picked.push(joiner);
    }
    if picked.len() != required {
        return Err(SettlementError::InvalidSample(format!(
            "expected {} winners, got {}",
            required,
            picked.len()
        )));
    }
    Ok(picked)
}

/// Chooses winners for `campaign` among `joiners` and computes their payouts.
///
/// The result is derived entirely from the campaign and the persisted join
/// order (plus `random` for the random rule), so re-running it after a failed
/// attempt reproduces the same order-rule winners.
pub fn plan_settlement(
    campaign: &Campaign,
    joiners: &[Participation],
    random: &dyn RandomSource,
    settled_at: NaiveDateTime,
) -> Result<Settlement, SettlementError> {
    let joined = joiners.len() as i64;
    let required = campaign.winner_count();
    if required <= 0 || joined == 0 {
        return Err(SettlementError::InsufficientJoiners {
            campaign_id: campaign.id.clone(),
            joined,
            required,
        });
    }

    let mut ordered: Vec<&Participation> = joiners.iter().collect();
    ordered.sort_by_key(|p| p.join_position);

    let (mut selected, amount_per_winner) = match campaign.distribution_rule {
        DistributionRule::Equal => (ordered, campaign.amount_per_person),
        DistributionRule::Order | DistributionRule::Random => {
            if joined < required {
                return Err(SettlementError::InsufficientJoiners {
                    campaign_id: campaign.id.clone(),
                    joined,
                    required,
                });
            }
            let selected = if campaign.distribution_rule == DistributionRule::Order {
                ordered.truncate(required as usize);
                ordered
            } else {
                pick_random(joiners, required as usize, random)?
            };
            (selected, campaign.total_amount / required)
        }
    };
    selected.sort_by_key(|p| p.join_position);

    let winner_count = selected.len() as i64;
    let total_distributed = amount_per_winner
        .checked_mul(winner_count)
        .filter(|total| *total <= campaign.total_amount && amount_per_winner >= 0)
        .ok_or(SettlementError::ConservationViolated {
            winners: winner_count,
            amount_per_winner,
            total_amount: campaign.total_amount,
        })?;

    let winners = selected
        .into_iter()
        .map(|p| WinnerPayout {
            user_id: p.user_id.clone(),
            participation_id: p.id.clone(),
            join_position: p.join_position,
            amount: amount_per_winner,
        })
        .collect();

    Ok(Settlement {
        campaign_id: campaign.id.clone(),
        distribution_rule: campaign.distribution_rule,
        amount_per_winner,
        winner_count,
        total_distributed,
        undistributed: campaign.total_amount - total_distributed,
        winners,
        settled_at,
    })
}
