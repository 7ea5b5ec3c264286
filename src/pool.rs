//! High-level savings-pool operations
//!
//! Typed wrapper over [`ContractClient`] with one method per function the
//! deployed savings-pool contract exports. Mutating calls come back as
//! broadcast receipts; read-only calls are decoded into plain Rust shapes,
//! with any mismatch surfacing as a decode error rather than a default
//! value.

use serde::Serialize;

use crate::address::StacksAddress;
use crate::clarity::ClarityValue;
use crate::client::{BroadcastReceipt, ContractClient};
use crate::error::{BroadcastError, QueryError};

/// Fee budget for simple calls (initialize-pool), in µSTX
pub const DEFAULT_CALL_FEE: u64 = 10_000;
/// Fee budget for balance-moving calls (deposit, withdraw, claim), in µSTX
pub const TRANSFER_CALL_FEE: u64 = 15_000;

/// Decoded `get-pool-stats` record
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub total_deposits: u128,
    pub total_depositors: u128,
    pub pool_enabled: bool,
    pub interest_rate: u128,
}

/// Decoded `get-contract-info` record
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContractInfo {
    pub name: String,
    pub version: String,
    pub interest_rate: u128,
    pub min_deposit: u128,
}

/// Decoded `get-user-deposit` record
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserDeposit {
    pub amount: u128,
    pub deposited_at: u128,
}

/// Typed API for one deployed savings-pool contract
///
/// Thin layer over the generic client: argument construction, address
/// parsing, and result decoding live here; transport and signing live in
/// [`ContractClient`].
pub struct SavingsPool {
    client: ContractClient,
}

impl SavingsPool {
    pub fn new(client: ContractClient) -> Self {
        Self { client }
    }

    /// The underlying generic client
    pub fn client(&self) -> &ContractClient {
        &self.client
    }

    /// The configured sender address, as a c32 string
    pub fn sender_address(&self) -> String {
        self.client.sender_address().to_string()
    }

    // ------------------------------------------------------------------
    // Mutating calls
    // ------------------------------------------------------------------

    /// `initialize-pool` — one-time pool setup
    pub async fn initialize_pool(&self) -> Result<BroadcastReceipt, BroadcastError> {
        self.client
            .submit_call("initialize-pool", vec![], DEFAULT_CALL_FEE)
            .await
    }

    /// `deposit(amount)` — move `amount` µSTX into the pool
    pub async fn deposit(&self, amount: u64) -> Result<BroadcastReceipt, BroadcastError> {
        self.client
            .submit_call(
                "deposit",
                vec![ClarityValue::UInt(amount as u128)],
                TRANSFER_CALL_FEE,
            )
            .await
    }

    /// `withdraw(amount)` — move `amount` µSTX back out of the pool
    pub async fn withdraw(&self, amount: u64) -> Result<BroadcastReceipt, BroadcastError> {
        self.client
            .submit_call(
                "withdraw",
                vec![ClarityValue::UInt(amount as u128)],
                TRANSFER_CALL_FEE,
            )
            .await
    }

    /// `claim-interest` — pay out accrued interest to the sender
    pub async fn claim_interest(&self) -> Result<BroadcastReceipt, BroadcastError> {
        self.client
            .submit_call("claim-interest", vec![], TRANSFER_CALL_FEE)
            .await
    }

    // ------------------------------------------------------------------
    // Read-only calls
    // ------------------------------------------------------------------

    /// `is-pool-enabled` — whether deposits are currently accepted
    pub async fn is_pool_enabled(&self) -> Result<bool, QueryError> {
        let value = self.client.call_read_only("is-pool-enabled", vec![]).await?;
        value
            .unwrap_shell()
            .as_bool()
            .ok_or_else(|| shape_error("is-pool-enabled", "bool", &value))
    }

    /// `get-pool-stats` — aggregate pool counters
    pub async fn get_pool_stats(&self) -> Result<PoolStats, QueryError> {
        let value = self.client.call_read_only("get-pool-stats", vec![]).await?;
        let record = value.unwrap_shell();

        Ok(PoolStats {
            total_deposits: tuple_uint(record, "total-deposits")?,
            total_depositors: tuple_uint(record, "total-depositors")?,
            pool_enabled: tuple_bool(record, "pool-enabled")?,
            interest_rate: tuple_uint(record, "interest-rate")?,
        })
    }

    /// `get-contract-info` — static contract metadata
    pub async fn get_contract_info(&self) -> Result<ContractInfo, QueryError> {
        let value = self
            .client
            .call_read_only("get-contract-info", vec![])
            .await?;
        let record = value.unwrap_shell();

        Ok(ContractInfo {
            name: tuple_ascii(record, "name")?,
            version: tuple_ascii(record, "version")?,
            interest_rate: tuple_uint(record, "interest-rate")?,
            min_deposit: tuple_uint(record, "min-deposit")?,
        })
    }

    /// `get-user-deposit(address)` — the user's deposit record, if any
    pub async fn get_user_deposit(&self, address: &str) -> Result<Option<UserDeposit>, QueryError> {
        let principal = parse_principal(address)?;
        let value = self
            .client
            .call_read_only("get-user-deposit", vec![principal])
            .await?;

        match strip_response(&value) {
            ClarityValue::OptionalNone => Ok(None),
            ClarityValue::OptionalSome(inner) => Ok(Some(UserDeposit {
                amount: tuple_uint(inner, "amount")?,
                deposited_at: tuple_uint(inner, "deposited-at")?,
            })),
            other => Err(shape_error("get-user-deposit", "optional", other)),
        }
    }

    /// `get-user-balance(address)` — current balance in µSTX
    pub async fn get_user_balance(&self, address: &str) -> Result<u128, QueryError> {
        let principal = parse_principal(address)?;
        let value = self
            .client
            .call_read_only("get-user-balance", vec![principal])
            .await?;
        value
            .unwrap_shell()
            .as_uint()
            .ok_or_else(|| shape_error("get-user-balance", "uint", &value))
    }

    /// `calculate-interest(address)` — interest accrued so far, in µSTX
    pub async fn calculate_interest(&self, address: &str) -> Result<u128, QueryError> {
        let principal = parse_principal(address)?;
        let value = self
            .client
            .call_read_only("calculate-interest", vec![principal])
            .await?;
        value
            .unwrap_shell()
            .as_uint()
            .ok_or_else(|| shape_error("calculate-interest", "uint", &value))
    }

    /// `get-user-history(address)` — raw history value
    ///
    /// The contract does not pin this shape down, so the caller gets the
    /// decoded Clarity value as-is.
    pub async fn get_user_history(&self, address: &str) -> Result<ClarityValue, QueryError> {
        let principal = parse_principal(address)?;
        self.client
            .call_read_only("get-user-history", vec![principal])
            .await
    }

    /// `calculate-potential-interest(amount, blocks)` — what `amount` µSTX
    /// would earn over `blocks` blocks
    pub async fn calculate_potential_interest(
        &self,
        amount: u64,
        blocks: u64,
    ) -> Result<u128, QueryError> {
        let value = self
            .client
            .call_read_only(
                "calculate-potential-interest",
                vec![
                    ClarityValue::UInt(amount as u128),
                    ClarityValue::UInt(blocks as u128),
                ],
            )
            .await?;
        value
            .unwrap_shell()
            .as_uint()
            .ok_or_else(|| shape_error("calculate-potential-interest", "uint", &value))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a caller-supplied address into a principal argument
///
/// A malformed address (wrong prefix, bad checksum) is a local
/// `InvalidArgument`, never a silently defaulted query.
fn parse_principal(address: &str) -> Result<ClarityValue, QueryError> {
    let parsed = StacksAddress::from_c32(address)
        .map_err(|e| QueryError::InvalidArgument(format!("'{}': {}", address, e)))?;
    Ok(ClarityValue::Principal(parsed))
}

/// Strip a `(ok ...)` wrapper but keep optionals intact, for functions whose
/// payload is itself an optional
fn strip_response(value: &ClarityValue) -> &ClarityValue {
    match value {
        ClarityValue::ResponseOk(inner) => strip_response(inner),
        other => other,
    }
}

fn shape_error(function: &str, expected: &str, got: &ClarityValue) -> QueryError {
    QueryError::decode(format!("{} returned {} (expected {})", function, got, expected))
}

fn tuple_uint(record: &ClarityValue, field: &str) -> Result<u128, QueryError> {
    record
        .tuple_get(field)
        .and_then(|v| v.as_uint())
        .ok_or_else(|| QueryError::decode(format!("missing uint field '{}'", field)))
}

fn tuple_bool(record: &ClarityValue, field: &str) -> Result<bool, QueryError> {
    record
        .tuple_get(field)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| QueryError::decode(format!("missing bool field '{}'", field)))
}

fn tuple_ascii(record: &ClarityValue, field: &str) -> Result<String, QueryError> {
    record
        .tuple_get(field)
        .and_then(|v| v.as_ascii())
        .map(|s| s.to_string())
        .ok_or_else(|| QueryError::decode(format!("missing string field '{}'", field)))
}
