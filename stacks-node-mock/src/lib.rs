//! Stacks Node Mock Library
//!
//! This crate provides both a standalone binary and library components
//! for mocking the three Stacks node endpoints the savings-pool client
//! uses, backed by an in-memory pool simulation.

pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use server::{create_router, run_server, spawn_server};
pub use state::{PoolState, Rejection, BLOCKS_PER_YEAR, INTEREST_RATE_BPS, MIN_DEPOSIT};
pub use types::*;
