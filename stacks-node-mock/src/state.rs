//! In-memory savings-pool simulation
//!
//! Models just enough of the deployed contract for the client's integration
//! tests: per-user deposit records, aggregate pool counters, a block height
//! that advances once per accepted transaction, and per-block interest
//! accrual at a fixed annual rate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use savings_pool_client::clarity::ClarityValue;
use savings_pool_client::transaction::ContractCallTransaction;
use thiserror::Error;

/// Annual interest rate in basis points (5%)
pub const INTEREST_RATE_BPS: u128 = 500;
/// Minimum deposit: 1 STX
pub const MIN_DEPOSIT: u128 = 1_000_000;
/// Stacks block cadence: roughly one block per 10 minutes
pub const BLOCKS_PER_YEAR: u128 = 52_560;
/// STX balance reported for every account, enough to fund any demo sequence
const ACCOUNT_FUNDING: u128 = 100_000_000_000;

/// Why a transaction was refused mempool admission
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("BadNonce")]
    BadNonce,

    #[error("PoolNotInitialized")]
    PoolNotInitialized,

    #[error("PoolDisabled")]
    PoolDisabled,

    #[error("DepositBelowMinimum")]
    DepositBelowMinimum,

    #[error("InsufficientDeposit")]
    InsufficientDeposit,

    #[error("BadFunctionArgument")]
    BadFunctionArgument,

    #[error("NoSuchPublicFunction")]
    NoSuchPublicFunction,
}

#[derive(Clone, Debug)]
struct DepositRecord {
    amount: u128,
    deposited_at: u64,
}

#[derive(Clone, Debug)]
struct HistoryEntry {
    action: &'static str,
    amount: u128,
    block: u64,
}

struct Inner {
    block_height: u64,
    initialized: bool,
    enabled: bool,
    total_deposits: u128,
    deposits: HashMap<[u8; 20], DepositRecord>,
    history: HashMap<[u8; 20], Vec<HistoryEntry>>,
    nonces: HashMap<[u8; 20], u64>,
}

/// Shared simulation state behind a mutex (one lock per request, no
/// cross-request ordering concerns beyond that)
#[derive(Clone)]
pub struct PoolState {
    inner: Arc<Mutex<Inner>>,
}

impl PoolState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                block_height: 1_000,
                initialized: false,
                // The contract ships enabled by default
                enabled: true,
                total_deposits: 0,
                deposits: HashMap::new(),
                history: HashMap::new(),
                nonces: HashMap::new(),
            })),
        }
    }

    /// Account view: (funded balance, next nonce)
    pub fn account(&self, hash160: &[u8; 20]) -> (u128, u64) {
        let inner = self.lock();
        let nonce = inner.nonces.get(hash160).copied().unwrap_or(0);
        (ACCOUNT_FUNDING, nonce)
    }

    pub fn block_height(&self) -> u64 {
        self.lock().block_height
    }

    /// Admit a decoded contract-call transaction, applying its effect
    ///
    /// Mirrors mempool admission: nonce must match, the called function
    /// must exist, and the contract's own guards must pass. An accepted
    /// transaction advances the chain by one block.
    pub fn apply_transaction(&self, tx: &ContractCallTransaction) -> Result<(), Rejection> {
        let mut inner = self.lock();

        let sender = *tx.sender_hash160();
        let expected_nonce = inner.nonces.get(&sender).copied().unwrap_or(0);
        if tx.nonce() != expected_nonce {
            return Err(Rejection::BadNonce);
        }

        match tx.function_name() {
            "initialize-pool" => {
                inner.initialized = true;
            }
            "deposit" => {
                let amount = uint_arg(tx, 0)?;
                if !inner.initialized {
                    return Err(Rejection::PoolNotInitialized);
                }
                if !inner.enabled {
                    return Err(Rejection::PoolDisabled);
                }
                if amount < MIN_DEPOSIT {
                    return Err(Rejection::DepositBelowMinimum);
                }
                let height = inner.block_height;
                let record = inner.deposits.entry(sender).or_insert(DepositRecord {
                    amount: 0,
                    deposited_at: height,
                });
                record.amount += amount;
                inner.total_deposits += amount;
                inner.history.entry(sender).or_default().push(HistoryEntry {
                    action: "deposit",
                    amount,
                    block: height,
                });
            }
            "withdraw" => {
                let amount = uint_arg(tx, 0)?;
                let height = inner.block_height;
                let held = inner.deposits.get(&sender).map(|r| r.amount).unwrap_or(0);
                if held < amount {
                    return Err(Rejection::InsufficientDeposit);
                }
                if let Some(record) = inner.deposits.get_mut(&sender) {
                    record.amount -= amount;
                }
                inner.total_deposits -= amount;
                inner.history.entry(sender).or_default().push(HistoryEntry {
                    action: "withdraw",
                    amount,
                    block: height,
                });
            }
            "claim-interest" => {
                let height = inner.block_height;
                let accrued = inner
                    .deposits
                    .get(&sender)
                    .map(|r| accrued_interest(r, height))
                    .unwrap_or(0);
                if let Some(record) = inner.deposits.get_mut(&sender) {
                    record.deposited_at = height;
                }
                inner.history.entry(sender).or_default().push(HistoryEntry {
                    action: "claim-interest",
                    amount: accrued,
                    block: height,
                });
            }
            _ => return Err(Rejection::NoSuchPublicFunction),
        }

        inner.nonces.insert(sender, expected_nonce + 1);
        inner.block_height += 1;
        Ok(())
    }

    /// Execute a read-only function against current state
    ///
    /// Returns the Clarity value the real node would produce, or a cause
    /// string for execution failures (unknown function, bad arguments).
    pub fn read_call(
        &self,
        function: &str,
        args: &[ClarityValue],
    ) -> Result<ClarityValue, String> {
        let inner = self.lock();

        match function {
            "is-pool-enabled" => Ok(ClarityValue::Bool(inner.enabled)),
            "get-pool-stats" => Ok(ok_value(ClarityValue::Tuple(vec![
                (
                    "total-deposits".to_string(),
                    ClarityValue::UInt(inner.total_deposits),
                ),
                (
                    "total-depositors".to_string(),
                    ClarityValue::UInt(inner.deposits.values().filter(|r| r.amount > 0).count() as u128),
                ),
                ("pool-enabled".to_string(), ClarityValue::Bool(inner.enabled)),
                (
                    "interest-rate".to_string(),
                    ClarityValue::UInt(INTEREST_RATE_BPS),
                ),
            ]))),
            "get-contract-info" => Ok(ok_value(ClarityValue::Tuple(vec![
                (
                    "name".to_string(),
                    ClarityValue::StringAscii("savings-pool".to_string()),
                ),
                (
                    "version".to_string(),
                    ClarityValue::StringAscii("1.0.0".to_string()),
                ),
                (
                    "interest-rate".to_string(),
                    ClarityValue::UInt(INTEREST_RATE_BPS),
                ),
                ("min-deposit".to_string(), ClarityValue::UInt(MIN_DEPOSIT)),
            ]))),
            "get-user-deposit" => {
                let user = principal_arg(args, 0)?;
                match inner.deposits.get(&user) {
                    Some(record) => Ok(ClarityValue::OptionalSome(Box::new(ClarityValue::Tuple(
                        vec![
                            ("amount".to_string(), ClarityValue::UInt(record.amount)),
                            (
                                "deposited-at".to_string(),
                                ClarityValue::UInt(record.deposited_at as u128),
                            ),
                        ],
                    )))),
                    None => Ok(ClarityValue::OptionalNone),
                }
            }
            "get-user-balance" => {
                let user = principal_arg(args, 0)?;
                let balance = inner.deposits.get(&user).map(|r| r.amount).unwrap_or(0);
                Ok(ClarityValue::UInt(balance))
            }
            "calculate-interest" => {
                let user = principal_arg(args, 0)?;
                let interest = inner
                    .deposits
                    .get(&user)
                    .map(|r| accrued_interest(r, inner.block_height))
                    .unwrap_or(0);
                Ok(ClarityValue::UInt(interest))
            }
            "get-user-history" => {
                let user = principal_arg(args, 0)?;
                let entries = inner
                    .history
                    .get(&user)
                    .map(|entries| {
                        entries
                            .iter()
                            .map(|e| {
                                ClarityValue::Tuple(vec![
                                    (
                                        "action".to_string(),
                                        ClarityValue::StringAscii(e.action.to_string()),
                                    ),
                                    ("amount".to_string(), ClarityValue::UInt(e.amount)),
                                    ("block".to_string(), ClarityValue::UInt(e.block as u128)),
                                ])
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(ClarityValue::List(entries))
            }
            "calculate-potential-interest" => {
                let amount = uint_value(args, 0)?;
                let blocks = uint_value(args, 1)?;
                Ok(ClarityValue::UInt(potential_interest(amount, blocks)))
            }
            other => Err(format!("UndefinedFunction(\"{}\")", other)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for PoolState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Interest accrued since the deposit record's reference block
fn accrued_interest(record: &DepositRecord, height: u64) -> u128 {
    let elapsed = height.saturating_sub(record.deposited_at) as u128;
    potential_interest(record.amount, elapsed)
}

/// `amount * rate * blocks / (10_000 * blocks_per_year)`
fn potential_interest(amount: u128, blocks: u128) -> u128 {
    amount * INTEREST_RATE_BPS * blocks / (10_000 * BLOCKS_PER_YEAR)
}

fn ok_value(inner: ClarityValue) -> ClarityValue {
    ClarityValue::ResponseOk(Box::new(inner))
}

fn uint_arg(tx: &ContractCallTransaction, index: usize) -> Result<u128, Rejection> {
    tx.args()
        .get(index)
        .and_then(|v| v.as_uint())
        .ok_or(Rejection::BadFunctionArgument)
}

fn uint_value(args: &[ClarityValue], index: usize) -> Result<u128, String> {
    args.get(index)
        .and_then(|v| v.as_uint())
        .ok_or_else(|| format!("BadFunctionArgument(index {})", index))
}

fn principal_arg(args: &[ClarityValue], index: usize) -> Result<[u8; 20], String> {
    match args.get(index) {
        Some(ClarityValue::Principal(address)) => Ok(*address.hash160()),
        _ => Err(format!("BadFunctionArgument(index {})", index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potential_interest_formula() {
        // 10 STX at 5% for a full year of blocks
        let full_year = potential_interest(10_000_000, BLOCKS_PER_YEAR);
        assert_eq!(full_year, 500_000);
        // Zero blocks, zero interest
        assert_eq!(potential_interest(10_000_000, 0), 0);
    }

    #[test]
    fn test_read_call_unknown_function() {
        let state = PoolState::new();
        let result = state.read_call("no-such-fn", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_pool_enabled_by_default() {
        let state = PoolState::new();
        let value = state.read_call("is-pool-enabled", &[]).unwrap();
        assert_eq!(value.as_bool(), Some(true));
    }
}
