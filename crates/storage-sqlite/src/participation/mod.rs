//! SQLite storage implementation for the participation ledger.

mod ledger;
mod model;
mod repository;

pub use ledger::SqliteLedger;
pub use model::{ParticipationDB, SettlementDB};
pub use repository::ParticipationRepository;
