//! Generic contract-interaction client
//!
//! Wraps the two operations every script in this repository needs against
//! one configured contract/network pair:
//!
//! - sign-and-broadcast a state-mutating contract call ([`ContractClient::submit_call`])
//! - execute a read-only query and decode the result ([`ContractClient::call_read_only`])
//!
//! The client holds no mutable state beyond the immutable configuration it
//! is constructed with. There is no retry policy, no backoff, and no
//! idempotency key: each attempt is independent and at-most-once from the
//! client's perspective. A broadcast returns as soon as the node accepts
//! the transaction into its mempool (or rejects it); it never waits for
//! confirmation.

use serde_json::{json, Value};

use crate::address::{AddressError, StacksAddress};
use crate::clarity::ClarityValue;
use crate::error::{BroadcastError, QueryError};
use crate::network::StacksNetwork;
use crate::signer::SignerIdentity;
use crate::transaction::ContractCallTransaction;

/// (address, name) pair identifying the deployed contract
#[derive(Clone, Debug)]
pub struct ContractRef {
    address: StacksAddress,
    name: String,
}

impl ContractRef {
    /// Parse the contract address and pair it with the contract name
    pub fn new(address: &str, name: impl Into<String>) -> Result<Self, AddressError> {
        Ok(Self {
            address: StacksAddress::from_c32(address)?,
            name: name.into(),
        })
    }

    pub fn address(&self) -> &StacksAddress {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ContractRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.address, self.name)
    }
}

/// Outcome of a broadcast attempt
///
/// A node-side rejection is a result, not an error: the transaction had no
/// on-chain effect and the caller decides what that means for its sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BroadcastReceipt {
    /// The node admitted the transaction to its mempool
    Accepted { txid: String },

    /// The node rejected the transaction (bad nonce, contract abort, fee
    /// too low, ...); `txid` is present when the node echoes one back
    Rejected { reason: String, txid: Option<String> },
}

impl BroadcastReceipt {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn txid(&self) -> Option<&str> {
        match self {
            Self::Accepted { txid } => Some(txid),
            Self::Rejected { txid, .. } => txid.as_deref(),
        }
    }
}

/// Client for one contract on one network
///
/// Configuration is immutable after construction; clone freely
/// (`reqwest::Client` is internally reference-counted).
#[derive(Clone)]
pub struct ContractClient {
    network: StacksNetwork,
    contract: ContractRef,
    signer: SignerIdentity,
    http_client: reqwest::Client,
}

impl ContractClient {
    /// Create a client from explicit configuration
    ///
    /// The configuration is passed in rather than read from ambient
    /// globals so the same client runs against the public testnet or an
    /// in-process mock node.
    pub fn new(network: StacksNetwork, contract: ContractRef, signer: SignerIdentity) -> Self {
        Self {
            network,
            contract,
            signer,
            http_client: reqwest::Client::new(),
        }
    }

    /// The sender address derived from the signing key
    pub fn sender_address(&self) -> &StacksAddress {
        self.signer.address()
    }

    /// The contract this client is bound to
    pub fn contract(&self) -> &ContractRef {
        &self.contract
    }

    /// Sign and broadcast a state-mutating contract call
    ///
    /// Fetches the sender's next nonce, builds and signs the transaction,
    /// and POSTs it to the node. Returns as soon as the node answers;
    /// finality may take arbitrarily long after that.
    ///
    /// The fee budget is denominated in µSTX and must be positive; a zero
    /// fee fails locally before any network contact.
    pub async fn submit_call(
        &self,
        function_name: &str,
        args: Vec<ClarityValue>,
        fee: u64,
    ) -> Result<BroadcastReceipt, BroadcastError> {
        if fee == 0 {
            return Err(BroadcastError::InvalidFee(fee));
        }
        if function_name.is_empty() {
            return Err(BroadcastError::serialization("empty function name"));
        }

        log::info!(
            "📞 Calling {} on {} (fee: {} µSTX)",
            function_name,
            self.contract,
            fee
        );

        let nonce = self.fetch_nonce().await?;
        log::debug!("   Sender nonce: {}", nonce);

        let mut tx = ContractCallTransaction::new(
            &self.network,
            &self.signer,
            *self.contract.address(),
            self.contract.name(),
            function_name,
            args,
            fee,
            nonce,
        );
        tx.sign(&self.signer)?;
        let tx_bytes = tx.serialize()?;
        log::debug!("   Signed transaction: {} bytes, txid {}", tx_bytes.len(), tx.txid()?);

        let response = self
            .http_client
            .post(self.network.broadcast_url())
            .header("Content-Type", "application/octet-stream")
            .body(tx_bytes)
            .send()
            .await
            .map_err(|e| {
                log::error!("   ❌ Broadcast request failed: {}", e);
                BroadcastError::network(e.to_string())
            })?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| {
            log::error!("   ❌ Unreadable broadcast response: {}", e);
            BroadcastError::network(format!("unreadable response: {}", e))
        })?;

        if status.is_success() {
            // The node answers a bare JSON string: the txid
            let txid = body
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| body.to_string());
            log::info!("   ✅ Transaction accepted: {}", txid);
            return Ok(BroadcastReceipt::Accepted { txid });
        }

        // 400-class answers carry a structured rejection
        if status.as_u16() == 400 {
            let reason = body
                .get("reason")
                .and_then(|v| v.as_str())
                .or_else(|| body.get("error").and_then(|v| v.as_str()))
                .unwrap_or("transaction rejected")
                .to_string();
            let txid = body
                .get("txid")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            log::warn!("   ⚠️  Transaction rejected: {}", reason);
            return Ok(BroadcastReceipt::Rejected { reason, txid });
        }

        log::error!("   ❌ Broadcast failed with HTTP {}", status);
        Err(BroadcastError::network(format!("HTTP {}", status)))
    }

    /// Execute a read-only function against current chain state
    ///
    /// The call is simulated by the node and never written to the ledger,
    /// so there is no fee and no signature. The returned Clarity value is
    /// decoded from the node's hex envelope.
    pub async fn call_read_only(
        &self,
        function_name: &str,
        args: Vec<ClarityValue>,
    ) -> Result<ClarityValue, QueryError> {
        log::info!("🔍 Querying {} on {}", function_name, self.contract);

        let arguments = args
            .iter()
            .map(|arg| arg.serialize_hex())
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| QueryError::InvalidArgument(e.to_string()))?;
        let body = json!({
            "sender": self.signer.address().to_string(),
            "arguments": arguments,
        });

        let url = self.network.read_only_url(
            &self.contract.address().to_string(),
            self.contract.name(),
            function_name,
        );

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("   ❌ Query request failed: {}", e);
                QueryError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("   ❌ Query failed with HTTP {}", status);
            return Err(QueryError::network(format!("HTTP {}", status)));
        }

        let json_response: Value = response.json().await.map_err(|e| {
            log::error!("   ❌ Unreadable query response: {}", e);
            QueryError::network(format!("unreadable response: {}", e))
        })?;

        // Node shape: {"okay": bool, "result": "0x...", "cause": "..."}
        let okay = json_response
            .get("okay")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !okay {
            let cause = json_response
                .get("cause")
                .and_then(|v| v.as_str())
                .unwrap_or("unspecified execution failure")
                .to_string();
            log::warn!("   ⚠️  Remote execution failed: {}", cause);
            return Err(QueryError::Execution(cause));
        }

        let result_hex = json_response
            .get("result")
            .and_then(|v| v.as_str())
            .ok_or_else(|| QueryError::decode("response missing 'result' field"))?;

        let value = ClarityValue::deserialize_hex(result_hex)
            .map_err(|e| QueryError::decode(e.to_string()))?;
        log::debug!("   📊 Decoded result: {}", value);

        Ok(value)
    }

    /// Next nonce for the sender, from the node's account endpoint
    async fn fetch_nonce(&self) -> Result<u64, BroadcastError> {
        let url = self.network.account_url(&self.signer.address().to_string());

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| BroadcastError::network(format!("account lookup failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BroadcastError::network(format!(
                "account lookup failed: HTTP {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BroadcastError::network(format!("unreadable account response: {}", e)))?;

        body.get("nonce").and_then(|v| v.as_u64()).ok_or_else(|| {
            BroadcastError::network("account response missing 'nonce'".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "edf9aee84d9b7abc145504dde6726c64f369d37ee34ded868fabd876c26570bc";
    const CONTRACT_ADDRESS: &str = "ST2GG7HZZHEB3JHQFXHKD65HZXVRRNV6AYTS2VGMS";

    fn test_client() -> ContractClient {
        // Endpoint intentionally points at nothing: these tests must not
        // reach the network
        let network = StacksNetwork::testnet().with_core_api_url("http://127.0.0.1:1");
        let contract = ContractRef::new(CONTRACT_ADDRESS, "savings-pool").unwrap();
        let signer = SignerIdentity::from_private_key_hex(TEST_KEY, &network).unwrap();
        ContractClient::new(network, contract, signer)
    }

    #[tokio::test]
    async fn test_zero_fee_fails_before_network() {
        let client = test_client();
        let result = client
            .submit_call("deposit", vec![ClarityValue::UInt(5_000_000)], 0)
            .await;
        assert!(
            matches!(result, Err(BroadcastError::InvalidFee(0))),
            "expected InvalidFee, got {:?}",
            result
        );
    }

    #[tokio::test]
    async fn test_empty_function_name_fails_before_network() {
        let client = test_client();
        let result = client.submit_call("", vec![], 15_000).await;
        assert!(matches!(result, Err(BroadcastError::Serialization(_))));
    }

    #[test]
    fn test_contract_ref_rejects_malformed_address() {
        assert!(ContractRef::new("not-an-address", "savings-pool").is_err());
    }

    #[test]
    fn test_contract_ref_display() {
        let contract = ContractRef::new(CONTRACT_ADDRESS, "savings-pool").unwrap();
        assert_eq!(
            contract.to_string(),
            format!("{}.savings-pool", CONTRACT_ADDRESS)
        );
    }
}
