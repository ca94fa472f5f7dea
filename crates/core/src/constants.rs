/// Smallest pool a creator may fund a campaign with
pub const MINIMUM_TOTAL_AMOUNT: i64 = 2000;

/// Smallest share any single winner may receive
pub const MINIMUM_PER_PERSON: i64 = 1000;

/// Smallest participant cap (and winner count) a campaign may declare
pub const MINIMUM_PARTICIPANTS: i64 = 2;

/// Upper bound on joiners competing for each winner slot under the random rule
pub const RANDOM_PARTICIPANT_MULTIPLIER: i64 = 3;
