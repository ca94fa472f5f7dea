//! SQLite storage implementation for the giveaway platform.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `giveaway-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor every write goes through
//! - Repository implementations for campaigns, users and the participation ledger
//!
//! This crate is the only place in the application where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod campaigns;
pub mod participation;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use campaigns::CampaignRepository;
pub use participation::ParticipationRepository;
pub use users::UserRepository;

// Re-export from giveaway-core for convenience
pub use giveaway_core::errors::{DatabaseError, Error, Result};
