//! Network configuration for a target Stacks node
//!
//! Immutable, created once at process start. Carries the chain environment
//! (testnet vs mainnet transaction version and chain id) and the core API
//! base URL, which is overridable so tests can point the client at an
//! in-process mock node.

use crate::address::{C32_VERSION_MAINNET_P2PKH, C32_VERSION_TESTNET_P2PKH};

const MAINNET_CORE_API: &str = "https://api.hiro.so";
const TESTNET_CORE_API: &str = "https://api.testnet.hiro.so";

/// Chain environment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkKind {
    Mainnet,
    Testnet,
}

/// Target network: chain environment plus core API endpoint
#[derive(Clone, Debug)]
pub struct StacksNetwork {
    kind: NetworkKind,
    core_api_url: String,
}

impl StacksNetwork {
    /// Stacks testnet with the default public core API endpoint
    pub fn testnet() -> Self {
        Self {
            kind: NetworkKind::Testnet,
            core_api_url: TESTNET_CORE_API.to_string(),
        }
    }

    /// Stacks mainnet with the default public core API endpoint
    pub fn mainnet() -> Self {
        Self {
            kind: NetworkKind::Mainnet,
            core_api_url: MAINNET_CORE_API.to_string(),
        }
    }

    /// Use a custom core API endpoint (local node, mock node in tests)
    pub fn with_core_api_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.core_api_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    pub fn core_api_url(&self) -> &str {
        &self.core_api_url
    }

    /// Transaction wire version byte (0x00 mainnet, 0x80 testnet)
    pub fn transaction_version(&self) -> u8 {
        match self.kind {
            NetworkKind::Mainnet => 0x00,
            NetworkKind::Testnet => 0x80,
        }
    }

    /// Chain id embedded in every transaction
    pub fn chain_id(&self) -> u32 {
        match self.kind {
            NetworkKind::Mainnet => 0x0000_0001,
            NetworkKind::Testnet => 0x8000_0000,
        }
    }

    /// c32 version byte for single-signature addresses on this network
    pub fn address_version(&self) -> u8 {
        match self.kind {
            NetworkKind::Mainnet => C32_VERSION_MAINNET_P2PKH,
            NetworkKind::Testnet => C32_VERSION_TESTNET_P2PKH,
        }
    }

    /// URL for account info (nonce, balance): GET /v2/accounts/{principal}
    pub fn account_url(&self, principal: &str) -> String {
        format!("{}/v2/accounts/{}?proof=0", self.core_api_url, principal)
    }

    /// URL for raw transaction broadcast: POST /v2/transactions
    pub fn broadcast_url(&self) -> String {
        format!("{}/v2/transactions", self.core_api_url)
    }

    /// URL for a read-only function call:
    /// POST /v2/contracts/call-read/{address}/{contract}/{function}
    pub fn read_only_url(&self, address: &str, contract: &str, function: &str) -> String {
        format!(
            "{}/v2/contracts/call-read/{}/{}/{}",
            self.core_api_url, address, contract, function
        )
    }
}
