//! Participation module - the campaign membership ledger and the
//! join-and-settle workflow.

mod join_workflow;
mod participation_errors;
mod participation_model;
mod participation_service;
mod participation_traits;

#[cfg(test)]
pub(crate) mod memory_ledger;
#[cfg(test)]
mod participation_service_tests;

pub use join_workflow::{join_within, settle_within};
pub use participation_errors::ParticipationError;
pub use participation_model::{
    JoinOutcome, JoinRequest, NewParticipation, Participation, PayoutDetails, SettlementOutcome,
};
pub use participation_service::ParticipationService;
pub use participation_traits::{
    LedgerTransaction, ParticipationRepositoryTrait, ParticipationServiceTrait,
};
