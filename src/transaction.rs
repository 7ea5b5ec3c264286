//! Stacks contract-call transaction wire format
//!
//! Builds, signs, and serializes the single flavor of transaction this
//! client submits: a standard single-signature contract call with anchor
//! mode "any", post-condition mode "allow", and no post-conditions —
//! matching what the original interaction scripts sent.
//!
//! Signing follows SIP-005: the presign sighash is SHA512/256 over the
//! transaction with its spending condition cleared, the final sighash
//! additionally commits to the auth flag, fee, and nonce.

use sha2::{Digest, Sha512_256};

use crate::address::StacksAddress;
use crate::clarity::ClarityValue;
use crate::error::BroadcastError;
use crate::network::StacksNetwork;
use crate::signer::SignerIdentity;

// Wire constants
const AUTH_TYPE_STANDARD: u8 = 0x04;
const HASH_MODE_P2PKH: u8 = 0x00;
const KEY_ENCODING_COMPRESSED: u8 = 0x00;
const ANCHOR_MODE_ANY: u8 = 0x03;
const POST_CONDITION_MODE_ALLOW: u8 = 0x01;
const PAYLOAD_CONTRACT_CALL: u8 = 0x02;

/// Maximum length of a contract or function name on the wire
const MAX_NAME_LEN: usize = 128;

/// A contract-call transaction, unsigned until [`sign`](Self::sign) runs
#[derive(Clone, Debug)]
pub struct ContractCallTransaction {
    version: u8,
    chain_id: u32,
    signer_hash160: [u8; 20],
    nonce: u64,
    fee: u64,
    signature: [u8; 65],
    contract_address: StacksAddress,
    contract_name: String,
    function_name: String,
    args: Vec<ClarityValue>,
}

impl ContractCallTransaction {
    /// Assemble an unsigned contract call for the given network and sender
    pub fn new(
        network: &StacksNetwork,
        signer: &SignerIdentity,
        contract_address: StacksAddress,
        contract_name: impl Into<String>,
        function_name: impl Into<String>,
        args: Vec<ClarityValue>,
        fee: u64,
        nonce: u64,
    ) -> Self {
        Self {
            version: network.transaction_version(),
            chain_id: network.chain_id(),
            signer_hash160: *signer.address().hash160(),
            nonce,
            fee,
            signature: [0u8; 65],
            contract_address,
            contract_name: contract_name.into(),
            function_name: function_name.into(),
            args,
        }
    }

    /// Sign in place with the sender's key
    pub fn sign(&mut self, signer: &SignerIdentity) -> Result<(), BroadcastError> {
        let sighash = self.sighash()?;
        self.signature = signer.sign_sighash(sighash);
        Ok(())
    }

    /// Final sighash: SHA512/256(presign || auth_flag || fee || nonce)
    fn sighash(&self) -> Result<[u8; 32], BroadcastError> {
        // Presign sighash covers the transaction with fee, nonce, and
        // signature cleared
        let mut cleared = self.clone();
        cleared.fee = 0;
        cleared.nonce = 0;
        cleared.signature = [0u8; 65];
        let presign = sha512_256(&cleared.serialize()?);

        let mut commitment = Vec::with_capacity(32 + 1 + 8 + 8);
        commitment.extend_from_slice(&presign);
        commitment.push(AUTH_TYPE_STANDARD);
        commitment.extend_from_slice(&self.fee.to_be_bytes());
        commitment.extend_from_slice(&self.nonce.to_be_bytes());
        Ok(sha512_256(&commitment))
    }

    /// Serialize to wire bytes
    ///
    /// Fails if a name or argument cannot be represented on the wire
    /// (non-ASCII, over the length limit); nothing is truncated.
    pub fn serialize(&self) -> Result<Vec<u8>, BroadcastError> {
        let mut out = Vec::with_capacity(128);

        out.push(self.version);
        out.extend_from_slice(&self.chain_id.to_be_bytes());

        // Standard single-signature spending condition
        out.push(AUTH_TYPE_STANDARD);
        out.push(HASH_MODE_P2PKH);
        out.extend_from_slice(&self.signer_hash160);
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(&self.fee.to_be_bytes());
        out.push(KEY_ENCODING_COMPRESSED);
        out.extend_from_slice(&self.signature);

        out.push(ANCHOR_MODE_ANY);
        out.push(POST_CONDITION_MODE_ALLOW);
        out.extend_from_slice(&0u32.to_be_bytes()); // no post-conditions

        // Contract-call payload
        out.push(PAYLOAD_CONTRACT_CALL);
        out.push(self.contract_address.version());
        out.extend_from_slice(self.contract_address.hash160());
        write_lp_string(&self.contract_name, &mut out)?;
        write_lp_string(&self.function_name, &mut out)?;
        out.extend_from_slice(&(self.args.len() as u32).to_be_bytes());
        for arg in &self.args {
            let bytes = arg
                .serialize()
                .map_err(|e| BroadcastError::serialization(e.to_string()))?;
            out.extend_from_slice(&bytes);
        }

        Ok(out)
    }

    /// Transaction id: SHA512/256 over the serialized transaction
    pub fn txid(&self) -> Result<String, BroadcastError> {
        Ok(hex::encode(sha512_256(&self.serialize()?)))
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn args(&self) -> &[ClarityValue] {
        &self.args
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn sender_hash160(&self) -> &[u8; 20] {
        &self.signer_hash160
    }

    /// Decode wire bytes back into a transaction
    ///
    /// Used by the mock node and by round-trip tests. Only the shape this
    /// client produces is accepted (standard auth, contract-call payload).
    pub fn deserialize(bytes: &[u8]) -> Result<Self, String> {
        let mut r = Reader::new(bytes);

        let version = r.u8()?;
        let chain_id = u32::from_be_bytes(r.array::<4>()?);

        if r.u8()? != AUTH_TYPE_STANDARD {
            return Err("unsupported auth type".to_string());
        }
        if r.u8()? != HASH_MODE_P2PKH {
            return Err("unsupported hash mode".to_string());
        }
        let signer_hash160 = r.array::<20>()?;
        let nonce = u64::from_be_bytes(r.array::<8>()?);
        let fee = u64::from_be_bytes(r.array::<8>()?);
        if r.u8()? != KEY_ENCODING_COMPRESSED {
            return Err("unsupported key encoding".to_string());
        }
        let signature = r.array::<65>()?;

        let _anchor_mode = r.u8()?;
        let _post_condition_mode = r.u8()?;
        let post_condition_count = u32::from_be_bytes(r.array::<4>()?);
        if post_condition_count != 0 {
            return Err("post-conditions not supported".to_string());
        }

        if r.u8()? != PAYLOAD_CONTRACT_CALL {
            return Err("not a contract-call payload".to_string());
        }
        let address_version = r.u8()?;
        let address_hash = r.array::<20>()?;
        let contract_address = StacksAddress::new(address_version, address_hash);
        let contract_name = read_lp_string(&mut r)?;
        let function_name = read_lp_string(&mut r)?;

        let arg_count = u32::from_be_bytes(r.array::<4>()?);
        let arg_bytes = r.rest();
        let args = decode_args(arg_bytes, arg_count)?;

        Ok(Self {
            version,
            chain_id,
            signer_hash160,
            nonce,
            fee,
            signature,
            contract_address,
            contract_name,
            function_name,
            args,
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn sha512_256(bytes: &[u8]) -> [u8; 32] {
    let digest = Sha512_256::digest(bytes);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Contract and function names are 1-byte length prefixed ASCII
fn write_lp_string(s: &str, out: &mut Vec<u8>) -> Result<(), BroadcastError> {
    if !s.is_ascii() {
        return Err(BroadcastError::serialization(format!(
            "non-ASCII name '{}'",
            s
        )));
    }
    if s.len() > MAX_NAME_LEN {
        return Err(BroadcastError::serialization(format!(
            "name is {} bytes, limit is {}",
            s.len(),
            MAX_NAME_LEN
        )));
    }
    out.push(s.len() as u8);
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

fn read_lp_string(r: &mut Reader<'_>) -> Result<String, String> {
    let len = r.u8()? as usize;
    if len > MAX_NAME_LEN {
        return Err(format!("name is {} bytes, limit is {}", len, MAX_NAME_LEN));
    }
    let bytes = r.take(len)?;
    if !bytes.is_ascii() {
        return Err("non-ASCII name".to_string());
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| format!("invalid name: {}", e))
}

/// Decode the argument list, which occupies the remainder of the payload
fn decode_args(bytes: &[u8], count: u32) -> Result<Vec<ClarityValue>, String> {
    let mut args = Vec::with_capacity(count.min(64) as usize);
    let mut offset = 0;
    for _ in 0..count {
        let (value, consumed) = ClarityValue::deserialize_prefix(&bytes[offset..])
            .map_err(|e| format!("undecodable Clarity argument: {}", e))?;
        args.push(value);
        offset += consumed;
    }
    if offset != bytes.len() {
        return Err(format!("{} trailing bytes after arguments", bytes.len() - offset));
    }
    Ok(args)
}

/// Minimal byte reader over a borrowed slice
struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], String> {
        if self.bytes.len() - self.position < len {
            return Err("truncated transaction".to_string());
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, String> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], String> {
        let slice = self.take(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(slice);
        Ok(array)
    }

    fn rest(&mut self) -> &'a [u8] {
        let slice = &self.bytes[self.position..];
        self.position = self.bytes.len();
        slice
    }
}
