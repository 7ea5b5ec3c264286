//! Error types for savings-pool contract interaction
//!
//! Minimal, production-ready error handling for broadcasting contract-call
//! transactions and executing read-only queries against a Stacks node.

use std::error::Error as StdError;
use std::fmt;

/// A state-mutating contract call failed before or during submission
///
/// Covers the local fee precondition, signing and serialization failures,
/// and transport-level errors while talking to the node. A transaction the
/// node explicitly rejects is NOT an error; it comes back as a
/// [`crate::BroadcastReceipt::Rejected`] result.
#[derive(Clone, Debug)]
pub enum BroadcastError {
    /// Fee budget failed the local precondition (must be a positive µSTX amount)
    InvalidFee(u64),

    /// Transaction signing failed
    Signing(String),

    /// Transaction or argument serialization failed
    Serialization(String),

    /// Network-level failure submitting to the node
    Network(String),
}

impl fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFee(fee) => {
                write!(f, "Invalid fee budget: {} (must be positive)", fee)
            }
            Self::Signing(msg) => {
                write!(f, "Transaction signing failed: {}", msg)
            }
            Self::Serialization(msg) => {
                write!(f, "Transaction serialization failed: {}", msg)
            }
            Self::Network(msg) => {
                write!(f, "Broadcast request failed: {}", msg)
            }
        }
    }
}

impl StdError for BroadcastError {}

// Helper functions for common error scenarios
impl BroadcastError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

/// A read-only contract call failed
///
/// Covers malformed arguments caught locally, transport failures, remote
/// contract execution failures (e.g. an assertion inside the contract), and
/// result values whose shape does not match the function's declared return
/// type.
#[derive(Clone, Debug)]
pub enum QueryError {
    /// An argument was rejected locally (e.g. malformed principal address)
    InvalidArgument(String),

    /// Network-level failure talking to the node
    Network(String),

    /// The node reported a contract execution failure
    Execution(String),

    /// The returned value could not be decoded into the expected shape
    Decode(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => {
                write!(f, "Invalid argument: {}", msg)
            }
            Self::Network(msg) => {
                write!(f, "Query request failed: {}", msg)
            }
            Self::Execution(msg) => {
                write!(f, "Contract execution failed: {}", msg)
            }
            Self::Decode(msg) => {
                write!(f, "Failed to decode query result: {}", msg)
            }
        }
    }
}

impl StdError for QueryError {}

// Helper functions for common error scenarios
impl QueryError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
