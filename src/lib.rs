//! Savings-Pool Client: Stacks contract interaction for the savings-pool contract
//!
//! This crate wraps the three things the interaction scripts need against a
//! deployed savings-pool Clarity contract:
//!
//! - **Contract Client**: sign-and-broadcast mutating calls, read-only queries
//! - **Wire layer**: Clarity value codec, c32check addresses, contract-call
//!   transaction construction and signing
//! - **Typed pool API**: one method per exported contract function
//!
//! # Example
//!
//! ```ignore
//! use savings_pool_client::{ContractClient, ContractRef, SavingsPool, SignerIdentity, StacksNetwork};
//!
//! let network = StacksNetwork::testnet();
//! let contract = ContractRef::new("ST2GG7HZZHEB3JHQFXHKD65HZXVRRNV6AYTS2VGMS", "savings-pool")?;
//! let signer = SignerIdentity::from_private_key_hex(&private_key_hex, &network)?;
//! let pool = SavingsPool::new(ContractClient::new(network, contract, signer));
//!
//! // Read-only query
//! let enabled = pool.is_pool_enabled().await?;
//!
//! // Mutating call: returns on mempool admission, not finality
//! let receipt = pool.deposit(5_000_000).await?;
//! ```

// Public modules
pub mod address;
pub mod clarity;
pub mod client;
pub mod error;
pub mod network;
pub mod pool;
pub mod signer;
pub mod transaction;

// Re-exports for convenience
pub use address::{AddressError, StacksAddress};
pub use clarity::{ClarityError, ClarityValue};
pub use client::{BroadcastReceipt, ContractClient, ContractRef};
pub use error::{BroadcastError, QueryError};
pub use network::{NetworkKind, StacksNetwork};
pub use pool::{ContractInfo, PoolStats, SavingsPool, UserDeposit};
pub use signer::SignerIdentity;
pub use transaction::ContractCallTransaction;
