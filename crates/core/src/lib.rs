//! Giveaway Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for giveaway campaigns: campaign
//! creation rules, the participation ledger contract, and the join-and-settle
//! workflow that distributes a campaign's pool once its participant cap is
//! reached. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod campaigns;
pub mod constants;
pub mod errors;
pub mod participation;
pub mod settlement;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
