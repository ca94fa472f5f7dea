//! Settlement module - winner selection, payout computation and the
//! settlement record.

mod selection;
mod settlement_errors;
mod settlement_model;

pub use selection::{plan_settlement, RandomSource, SeededRandomSource, ThreadRandomSource};
pub use settlement_errors::SettlementError;
pub use settlement_model::{Settlement, WinnerPayout};
