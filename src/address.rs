//! Stacks principal addresses and c32check encoding
//!
//! Implements the c32check address format used by Stacks principals
//! (Crockford-style base32 without I/L/O/U, double-SHA256 checksum) and
//! derivation of a single-signature address from a compressed secp256k1
//! public key (SHA256 then RIPEMD160).

use std::error::Error as StdError;
use std::fmt;

use ripemd::Ripemd160;
use secp256k1::PublicKey;
use sha2::{Digest, Sha256};

/// c32 alphabet: Crockford base32 without I, L, O, U
const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Address version byte: mainnet single-signature (addresses start with "SP")
pub const C32_VERSION_MAINNET_P2PKH: u8 = 22;
/// Address version byte: mainnet multi-signature ("SM")
pub const C32_VERSION_MAINNET_P2SH: u8 = 20;
/// Address version byte: testnet single-signature ("ST")
pub const C32_VERSION_TESTNET_P2PKH: u8 = 26;
/// Address version byte: testnet multi-signature ("SN")
pub const C32_VERSION_TESTNET_P2SH: u8 = 21;

/// Failure to parse or validate a c32check address
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressError {
    /// Address does not start with the 'S' prefix
    BadPrefix,

    /// Version character is not in the c32 alphabet
    BadVersion(char),

    /// A payload character is not in the c32 alphabet
    BadCharacter(char),

    /// Decoded payload is not hash160 + 4-byte checksum
    BadLength(usize),

    /// Checksum mismatch
    BadChecksum,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadPrefix => write!(f, "address must start with 'S'"),
            Self::BadVersion(c) => write!(f, "invalid version character '{}'", c),
            Self::BadCharacter(c) => write!(f, "invalid c32 character '{}'", c),
            Self::BadLength(len) => {
                write!(f, "decoded payload has {} bytes, expected 24", len)
            }
            Self::BadChecksum => write!(f, "checksum mismatch"),
        }
    }
}

impl StdError for AddressError {}

/// A Stacks principal address: version byte plus hash160 of the public key
///
/// Immutable once constructed. Parsing validates the checksum, so a held
/// `StacksAddress` always round-trips to a well-formed c32check string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StacksAddress {
    version: u8,
    hash160: [u8; 20],
}

impl StacksAddress {
    /// Construct from raw parts (used when decoding Clarity principals)
    pub fn new(version: u8, hash160: [u8; 20]) -> Self {
        Self { version, hash160 }
    }

    /// Parse a c32check-encoded address string (e.g. "ST2GG7HZZ...")
    ///
    /// Rejects missing 'S' prefix, invalid characters, truncated payloads,
    /// and checksum mismatches. Never silently substitutes a default.
    pub fn from_c32(address: &str) -> Result<Self, AddressError> {
        let mut chars = address.chars();
        match chars.next() {
            Some('S') | Some('s') => {}
            _ => return Err(AddressError::BadPrefix),
        }

        let version_char = chars.next().ok_or(AddressError::BadPrefix)?;
        let version = c32_char_value(version_char).ok_or(AddressError::BadVersion(version_char))?;

        let payload = c32_decode(chars.as_str())?;
        if payload.len() != 24 {
            return Err(AddressError::BadLength(payload.len()));
        }

        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(&payload[..20]);

        let expected = c32_checksum(version, &hash160);
        if payload[20..] != expected {
            return Err(AddressError::BadChecksum);
        }

        Ok(Self { version, hash160 })
    }

    /// Derive a single-signature address from a compressed secp256k1 public key
    ///
    /// hash160 = RIPEMD160(SHA256(compressed pubkey)), per Stacks convention.
    pub fn from_public_key(version: u8, public_key: &PublicKey) -> Self {
        let sha = Sha256::digest(public_key.serialize());
        let ripemd = Ripemd160::digest(sha);

        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(&ripemd);

        Self { version, hash160 }
    }

    /// Address version byte (22/20 mainnet, 26/21 testnet)
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The 20-byte hash160 of the signer's public key
    pub fn hash160(&self) -> &[u8; 20] {
        &self.hash160
    }

    /// Whether this is a testnet address (version 26 or 21)
    pub fn is_testnet(&self) -> bool {
        self.version == C32_VERSION_TESTNET_P2PKH || self.version == C32_VERSION_TESTNET_P2SH
    }
}

impl fmt::Display for StacksAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checksum = c32_checksum(self.version, &self.hash160);
        let mut payload = Vec::with_capacity(24);
        payload.extend_from_slice(&self.hash160);
        payload.extend_from_slice(&checksum);

        write!(
            f,
            "S{}{}",
            C32_ALPHABET[self.version as usize & 0x1f] as char,
            c32_encode(&payload)
        )
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// First four bytes of double-SHA256 over (version byte || hash160)
fn c32_checksum(version: u8, hash160: &[u8; 20]) -> [u8; 4] {
    let mut check_data = Vec::with_capacity(21);
    check_data.push(version);
    check_data.extend_from_slice(hash160);

    let first = Sha256::digest(&check_data);
    let second = Sha256::digest(first);

    let mut checksum = [0u8; 4];
    checksum.copy_from_slice(&second[..4]);
    checksum
}

/// Map one c32 character to its 5-bit value
///
/// Accepts lowercase and normalizes the visually ambiguous characters the
/// reference decoder accepts: O→0, L/I→1.
fn c32_char_value(c: char) -> Option<u8> {
    let normalized = match c.to_ascii_uppercase() {
        'O' => '0',
        'L' | 'I' => '1',
        other => other,
    };
    C32_ALPHABET
        .iter()
        .position(|&a| a as char == normalized)
        .map(|pos| pos as u8)
}

/// Encode bytes as c32
///
/// Processes the input from the least-significant end, emitting 5 bits per
/// character. High-order zero digits are stripped and one '0' character is
/// restored per leading zero byte, matching the reference c32check encoder.
fn c32_encode(input: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::new();
    let mut carry: u32 = 0;
    let mut carry_bits: u32 = 0;

    for &byte in input.iter().rev() {
        carry |= (byte as u32) << carry_bits;
        carry_bits += 8;
        while carry_bits >= 5 {
            digits.push(C32_ALPHABET[(carry & 0x1f) as usize]);
            carry >>= 5;
            carry_bits -= 5;
        }
    }
    if carry_bits > 0 {
        digits.push(C32_ALPHABET[(carry & 0x1f) as usize]);
    }

    // Strip high-order zero digits, then restore one per leading zero byte
    while digits.last() == Some(&b'0') {
        digits.pop();
    }
    for &byte in input {
        if byte == 0 {
            digits.push(b'0');
        } else {
            break;
        }
    }

    digits.iter().rev().map(|&d| d as char).collect()
}

/// Decode a c32 string to bytes (inverse of [`c32_encode`])
fn c32_decode(input: &str) -> Result<Vec<u8>, AddressError> {
    let mut bytes: Vec<u8> = Vec::new();
    let mut carry: u32 = 0;
    let mut carry_bits: u32 = 0;

    for c in input.chars().rev() {
        let value = c32_char_value(c).ok_or(AddressError::BadCharacter(c))?;
        carry |= (value as u32) << carry_bits;
        carry_bits += 5;
        while carry_bits >= 8 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
            carry_bits -= 8;
        }
    }
    if carry_bits > 0 && carry != 0 {
        bytes.push(carry as u8);
    }

    // Strip high-order zero bytes, then restore one per leading '0' character
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    for c in input.chars() {
        if c == '0' || c == 'o' || c == 'O' {
            bytes.push(0);
        } else {
            break;
        }
    }

    bytes.reverse();
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::{Secp256k1, SecretKey};

    #[test]
    fn test_c32_roundtrip() {
        let samples: Vec<Vec<u8>> = vec![
            vec![0x00],
            vec![0x80],
            vec![0x00, 0xab],
            vec![0x00, 0x00, 0x01],
            vec![0xde, 0xad, 0xbe, 0xef],
            (0..24).collect(),
        ];
        for sample in samples {
            let encoded = c32_encode(&sample);
            let decoded = c32_decode(&encoded).expect("decode failed");
            assert_eq!(decoded, sample, "roundtrip failed for {:?}", sample);
        }
    }

    #[test]
    fn test_address_roundtrip() {
        let address = StacksAddress::new(C32_VERSION_TESTNET_P2PKH, [0x42; 20]);
        let encoded = address.to_string();
        assert!(encoded.starts_with("ST"));

        let parsed = StacksAddress::from_c32(&encoded).expect("parse failed");
        assert_eq!(parsed, address);
    }

    #[test]
    fn test_address_roundtrip_leading_zero_hash() {
        let mut hash160 = [0x17; 20];
        hash160[0] = 0;
        hash160[1] = 0;
        let address = StacksAddress::new(C32_VERSION_MAINNET_P2PKH, hash160);
        let parsed = StacksAddress::from_c32(&address.to_string()).expect("parse failed");
        assert_eq!(parsed, address);
    }

    #[test]
    fn test_bad_prefix_rejected() {
        assert_eq!(
            StacksAddress::from_c32("T2GG7HZZHEB3JHQFXHKD65HZXVRRNV6AYTS2VGMS"),
            Err(AddressError::BadPrefix)
        );
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let address = StacksAddress::new(C32_VERSION_TESTNET_P2PKH, [0x42; 20]);
        let mut encoded = address.to_string();
        // Flip the last payload character to corrupt the checksum
        let last = encoded.pop().unwrap();
        let replacement = if last == 'Z' { 'Y' } else { 'Z' };
        encoded.push(replacement);

        assert!(StacksAddress::from_c32(&encoded).is_err());
    }

    #[test]
    fn test_invalid_character_rejected() {
        // 'U' is not in the c32 alphabet
        assert_eq!(
            StacksAddress::from_c32("STUUUUUUUUUUUUUUUUUUUUUUUUUUUUUUUUUUUUUU"),
            Err(AddressError::BadCharacter('U'))
        );
    }

    #[test]
    fn test_from_public_key_versions() {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[0x42; 32]).expect("valid key");
        let public = PublicKey::from_secret_key(&secp, &secret);

        let testnet = StacksAddress::from_public_key(C32_VERSION_TESTNET_P2PKH, &public);
        let mainnet = StacksAddress::from_public_key(C32_VERSION_MAINNET_P2PKH, &public);

        assert!(testnet.to_string().starts_with("ST"));
        assert!(mainnet.to_string().starts_with("SP"));
        // Same key, same hash160, different version
        assert_eq!(testnet.hash160(), mainnet.hash160());
    }
}
