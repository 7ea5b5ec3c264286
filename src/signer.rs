//! Signer identity: private key and the address derived from it
//!
//! Owned exclusively by the process for its lifetime, immutable after
//! construction, never persisted. Produces the 65-byte recoverable ECDSA
//! signatures the transaction wire format embeds.

use secp256k1::ecdsa::RecoverableSignature;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use crate::address::StacksAddress;
use crate::error::BroadcastError;
use crate::network::StacksNetwork;

/// Key material plus the derived sender address for one network
#[derive(Clone)]
pub struct SignerIdentity {
    secret_key: SecretKey,
    public_key: PublicKey,
    address: StacksAddress,
}

impl SignerIdentity {
    /// Build a signer from a hex-encoded secp256k1 private key
    ///
    /// Accepts the 66-character "compressed" form (trailing 01 marker) the
    /// Stacks tooling emits as well as the plain 64-character form.
    pub fn from_private_key_hex(
        private_key_hex: &str,
        network: &StacksNetwork,
    ) -> Result<Self, BroadcastError> {
        let trimmed = match private_key_hex.len() {
            66 if private_key_hex.is_ascii() && private_key_hex.ends_with("01") => {
                &private_key_hex[..64]
            }
            _ => private_key_hex,
        };

        let key_bytes = hex::decode(trimmed)
            .map_err(|e| BroadcastError::Signing(format!("invalid private key hex: {}", e)))?;
        let secret_key = SecretKey::from_slice(&key_bytes)
            .map_err(|e| BroadcastError::Signing(format!("invalid private key: {}", e)))?;

        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        let address = StacksAddress::from_public_key(network.address_version(), &public_key);

        Ok(Self {
            secret_key,
            public_key,
            address,
        })
    }

    /// The sender address derived from this key
    pub fn address(&self) -> &StacksAddress {
        &self.address
    }

    /// Compressed public key bytes (33 bytes)
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    /// Sign a 32-byte sighash, returning the wire signature
    /// `recovery_id || r || s` (65 bytes)
    pub fn sign_sighash(&self, sighash: [u8; 32]) -> [u8; 65] {
        let secp = Secp256k1::new();
        let message = Message::from_digest(sighash);
        let signature: RecoverableSignature =
            secp.sign_ecdsa_recoverable(&message, &self.secret_key);

        let (recovery_id, compact) = signature.serialize_compact();
        let mut wire = [0u8; 65];
        wire[0] = recovery_id.to_i32() as u8;
        wire[1..].copy_from_slice(&compact);
        wire
    }
}

impl std::fmt::Debug for SignerIdentity {
    // Key material stays out of logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerIdentity")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}
