//! Clarity value wire codec
//!
//! Serialization and deserialization of Clarity values in the consensus
//! wire format the node expects for read-only call arguments and returns
//! for their results: a 1-byte type id followed by a type-specific body.
//!
//! Only the types the savings-pool contract exchanges are covered:
//! integers, booleans, ASCII strings, principals, and the optional /
//! response / list / tuple wrappers that read-only results arrive in.

use std::error::Error as StdError;
use std::fmt;

use crate::address::StacksAddress;

// Wire type ids (Clarity consensus serialization)
const TYPE_INT: u8 = 0x00;
const TYPE_UINT: u8 = 0x01;
const TYPE_BOOL_TRUE: u8 = 0x03;
const TYPE_BOOL_FALSE: u8 = 0x04;
const TYPE_PRINCIPAL_STANDARD: u8 = 0x05;
const TYPE_PRINCIPAL_CONTRACT: u8 = 0x06;
const TYPE_RESPONSE_OK: u8 = 0x07;
const TYPE_RESPONSE_ERR: u8 = 0x08;
const TYPE_OPTIONAL_NONE: u8 = 0x09;
const TYPE_OPTIONAL_SOME: u8 = 0x0a;
const TYPE_LIST: u8 = 0x0b;
const TYPE_TUPLE: u8 = 0x0c;
const TYPE_STRING_ASCII: u8 = 0x0d;

/// Maximum length of a Clarity name (contract or tuple key)
const MAX_CLARITY_NAME_LEN: usize = 128;

/// Codec failure while encoding or decoding a Clarity value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClarityError {
    /// Input ended before the value was complete
    Truncated,

    /// Type id byte is not one we understand
    UnknownTypeId(u8),

    /// Bytes left over after a complete value was decoded
    TrailingBytes(usize),

    /// String or name payload is not valid ASCII / exceeds length limits
    BadString(String),

    /// Hex envelope could not be decoded
    BadHex(String),
}

impl fmt::Display for ClarityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated Clarity value"),
            Self::UnknownTypeId(id) => write!(f, "unknown Clarity type id 0x{:02x}", id),
            Self::TrailingBytes(n) => write!(f, "{} trailing bytes after Clarity value", n),
            Self::BadString(msg) => write!(f, "invalid Clarity string: {}", msg),
            Self::BadHex(msg) => write!(f, "invalid hex envelope: {}", msg),
        }
    }
}

impl StdError for ClarityError {}

/// A Clarity value, as passed to and returned from contract functions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClarityValue {
    /// Signed 128-bit integer
    Int(i128),
    /// Unsigned 128-bit integer
    UInt(u128),
    /// Boolean
    Bool(bool),
    /// ASCII string
    StringAscii(String),
    /// Standard principal (account address)
    Principal(StacksAddress),
    /// Contract principal (address plus contract name)
    ContractPrincipal(StacksAddress, String),
    /// `(some value)`
    OptionalSome(Box<ClarityValue>),
    /// `none`
    OptionalNone,
    /// `(ok value)`
    ResponseOk(Box<ClarityValue>),
    /// `(err value)`
    ResponseErr(Box<ClarityValue>),
    /// Homogeneous list
    List(Vec<ClarityValue>),
    /// Named tuple, entries in serialization order
    Tuple(Vec<(String, ClarityValue)>),
}

impl ClarityValue {
    /// Serialize to consensus wire bytes
    ///
    /// Rejects values the wire format cannot carry (non-ASCII strings,
    /// names over the length limit) rather than emitting bytes that would
    /// not decode back to the same value.
    pub fn serialize(&self) -> Result<Vec<u8>, ClarityError> {
        let mut out = Vec::new();
        self.write_bytes(&mut out)?;
        Ok(out)
    }

    /// Serialize to the "0x..." hex envelope the node's HTTP API uses
    pub fn serialize_hex(&self) -> Result<String, ClarityError> {
        Ok(format!("0x{}", hex::encode(self.serialize()?)))
    }

    /// Deserialize a single value, rejecting trailing bytes
    pub fn deserialize(bytes: &[u8]) -> Result<Self, ClarityError> {
        let mut cursor = Cursor::new(bytes);
        let value = Self::read_value(&mut cursor)?;
        let remaining = cursor.remaining();
        if remaining > 0 {
            return Err(ClarityError::TrailingBytes(remaining));
        }
        Ok(value)
    }

    /// Deserialize one value from the front of `bytes`, returning the
    /// number of bytes consumed (values are self-delimiting)
    pub fn deserialize_prefix(bytes: &[u8]) -> Result<(Self, usize), ClarityError> {
        let mut cursor = Cursor::new(bytes);
        let value = Self::read_value(&mut cursor)?;
        Ok((value, cursor.position))
    }

    /// Deserialize from a hex envelope, with or without the "0x" prefix
    pub fn deserialize_hex(hex_str: &str) -> Result<Self, ClarityError> {
        let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let bytes = hex::decode(stripped).map_err(|e| ClarityError::BadHex(e.to_string()))?;
        Self::deserialize(&bytes)
    }

    fn write_bytes(&self, out: &mut Vec<u8>) -> Result<(), ClarityError> {
        match self {
            Self::Int(value) => {
                out.push(TYPE_INT);
                out.extend_from_slice(&value.to_be_bytes());
            }
            Self::UInt(value) => {
                out.push(TYPE_UINT);
                out.extend_from_slice(&value.to_be_bytes());
            }
            Self::Bool(true) => out.push(TYPE_BOOL_TRUE),
            Self::Bool(false) => out.push(TYPE_BOOL_FALSE),
            Self::StringAscii(s) => {
                if !s.is_ascii() {
                    return Err(ClarityError::BadString(
                        "non-ASCII byte in string-ascii".to_string(),
                    ));
                }
                out.push(TYPE_STRING_ASCII);
                out.extend_from_slice(&(s.len() as u32).to_be_bytes());
                out.extend_from_slice(s.as_bytes());
            }
            Self::Principal(address) => {
                out.push(TYPE_PRINCIPAL_STANDARD);
                write_principal(address, out);
            }
            Self::ContractPrincipal(address, name) => {
                out.push(TYPE_PRINCIPAL_CONTRACT);
                write_principal(address, out);
                write_clarity_name(name, out)?;
            }
            Self::OptionalSome(inner) => {
                out.push(TYPE_OPTIONAL_SOME);
                inner.write_bytes(out)?;
            }
            Self::OptionalNone => out.push(TYPE_OPTIONAL_NONE),
            Self::ResponseOk(inner) => {
                out.push(TYPE_RESPONSE_OK);
                inner.write_bytes(out)?;
            }
            Self::ResponseErr(inner) => {
                out.push(TYPE_RESPONSE_ERR);
                inner.write_bytes(out)?;
            }
            Self::List(items) => {
                out.push(TYPE_LIST);
                out.extend_from_slice(&(items.len() as u32).to_be_bytes());
                for item in items {
                    item.write_bytes(out)?;
                }
            }
            Self::Tuple(entries) => {
                out.push(TYPE_TUPLE);
                out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
                for (name, value) in entries {
                    write_clarity_name(name, out)?;
                    value.write_bytes(out)?;
                }
            }
        }
        Ok(())
    }

    fn read_value(cursor: &mut Cursor<'_>) -> Result<Self, ClarityError> {
        let type_id = cursor.read_u8()?;
        match type_id {
            TYPE_INT => {
                let bytes = cursor.read_array::<16>()?;
                Ok(Self::Int(i128::from_be_bytes(bytes)))
            }
            TYPE_UINT => {
                let bytes = cursor.read_array::<16>()?;
                Ok(Self::UInt(u128::from_be_bytes(bytes)))
            }
            TYPE_BOOL_TRUE => Ok(Self::Bool(true)),
            TYPE_BOOL_FALSE => Ok(Self::Bool(false)),
            TYPE_PRINCIPAL_STANDARD => Ok(Self::Principal(read_principal(cursor)?)),
            TYPE_PRINCIPAL_CONTRACT => {
                let address = read_principal(cursor)?;
                let name = read_clarity_name(cursor)?;
                Ok(Self::ContractPrincipal(address, name))
            }
            TYPE_RESPONSE_OK => Ok(Self::ResponseOk(Box::new(Self::read_value(cursor)?))),
            TYPE_RESPONSE_ERR => Ok(Self::ResponseErr(Box::new(Self::read_value(cursor)?))),
            TYPE_OPTIONAL_NONE => Ok(Self::OptionalNone),
            TYPE_OPTIONAL_SOME => Ok(Self::OptionalSome(Box::new(Self::read_value(cursor)?))),
            TYPE_LIST => {
                let count = cursor.read_u32()?;
                let mut items = Vec::with_capacity(count.min(1024) as usize);
                for _ in 0..count {
                    items.push(Self::read_value(cursor)?);
                }
                Ok(Self::List(items))
            }
            TYPE_TUPLE => {
                let count = cursor.read_u32()?;
                let mut entries = Vec::with_capacity(count.min(1024) as usize);
                for _ in 0..count {
                    let name = read_clarity_name(cursor)?;
                    let value = Self::read_value(cursor)?;
                    entries.push((name, value));
                }
                Ok(Self::Tuple(entries))
            }
            TYPE_STRING_ASCII => {
                let len = cursor.read_u32()? as usize;
                let bytes = cursor.read_bytes(len)?;
                if !bytes.is_ascii() {
                    return Err(ClarityError::BadString("non-ASCII byte".to_string()));
                }
                let s = String::from_utf8(bytes.to_vec())
                    .map_err(|e| ClarityError::BadString(e.to_string()))?;
                Ok(Self::StringAscii(s))
            }
            other => Err(ClarityError::UnknownTypeId(other)),
        }
    }

    // ------------------------------------------------------------------
    // Shape accessors used by the typed pool wrapper
    // ------------------------------------------------------------------

    /// Unsigned integer payload, if this is a `uint`
    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Self::UInt(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean payload, if this is a `bool`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload, if this is a `string-ascii`
    pub fn as_ascii(&self) -> Option<&str> {
        match self {
            Self::StringAscii(s) => Some(s),
            _ => None,
        }
    }

    /// Tuple entries, if this is a tuple
    pub fn as_tuple(&self) -> Option<&[(String, ClarityValue)]> {
        match self {
            Self::Tuple(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a tuple field by name
    pub fn tuple_get(&self, name: &str) -> Option<&ClarityValue> {
        self.as_tuple()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Unwrap one level of `(ok ...)` / `(err ...)` / `(some ...)` wrappers
    ///
    /// Read-only functions commonly wrap their payload in a response or
    /// optional; typed decoding wants the payload. `none` and `(err ...)`
    /// are left as-is so callers can distinguish them.
    pub fn unwrap_shell(&self) -> &ClarityValue {
        match self {
            Self::ResponseOk(inner) | Self::OptionalSome(inner) => inner.unwrap_shell(),
            other => other,
        }
    }
}

impl fmt::Display for ClarityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "u{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::StringAscii(s) => write!(f, "\"{}\"", s),
            Self::Principal(address) => write!(f, "'{}", address),
            Self::ContractPrincipal(address, name) => write!(f, "'{}.{}", address, name),
            Self::OptionalSome(inner) => write!(f, "(some {})", inner),
            Self::OptionalNone => write!(f, "none"),
            Self::ResponseOk(inner) => write!(f, "(ok {})", inner),
            Self::ResponseErr(inner) => write!(f, "(err {})", inner),
            Self::List(items) => {
                write!(f, "(list")?;
                for item in items {
                    write!(f, " {}", item)?;
                }
                write!(f, ")")
            }
            Self::Tuple(entries) => {
                write!(f, "(tuple")?;
                for (name, value) in entries {
                    write!(f, " ({} {})", name, value)?;
                }
                write!(f, ")")
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn write_principal(address: &StacksAddress, out: &mut Vec<u8>) {
    out.push(address.version());
    out.extend_from_slice(address.hash160());
}

fn read_principal(cursor: &mut Cursor<'_>) -> Result<StacksAddress, ClarityError> {
    let version = cursor.read_u8()?;
    let hash160 = cursor.read_array::<20>()?;
    Ok(StacksAddress::new(version, hash160))
}

/// Clarity names (contract names, tuple keys) are 1-byte length prefixed ASCII
fn write_clarity_name(name: &str, out: &mut Vec<u8>) -> Result<(), ClarityError> {
    if !name.is_ascii() {
        return Err(ClarityError::BadString("non-ASCII name".to_string()));
    }
    if name.len() > MAX_CLARITY_NAME_LEN {
        return Err(ClarityError::BadString(format!(
            "name is {} bytes, limit is {}",
            name.len(),
            MAX_CLARITY_NAME_LEN
        )));
    }
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

fn read_clarity_name(cursor: &mut Cursor<'_>) -> Result<String, ClarityError> {
    let len = cursor.read_u8()? as usize;
    if len > MAX_CLARITY_NAME_LEN {
        return Err(ClarityError::BadString(format!(
            "name is {} bytes, limit is {}",
            len, MAX_CLARITY_NAME_LEN
        )));
    }
    let bytes = cursor.read_bytes(len)?;
    if !bytes.is_ascii() {
        return Err(ClarityError::BadString("non-ASCII name".to_string()));
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| ClarityError::BadString(e.to_string()))
}

/// Minimal byte cursor over a borrowed slice
struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ClarityError> {
        if self.remaining() < len {
            return Err(ClarityError::Truncated);
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, ClarityError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, ClarityError> {
        let bytes = self.read_array::<4>()?;
        Ok(u32::from_be_bytes(bytes))
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ClarityError> {
        let slice = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(slice);
        Ok(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::C32_VERSION_TESTNET_P2PKH;

    fn sample_address() -> StacksAddress {
        StacksAddress::new(C32_VERSION_TESTNET_P2PKH, [0x42; 20])
    }

    #[test]
    fn test_uint_wire_format() {
        let bytes = ClarityValue::UInt(5_000_000).serialize().unwrap();
        assert_eq!(bytes.len(), 17);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(&bytes[13..], &[0x4c, 0x4b, 0x40]);
    }

    #[test]
    fn test_bool_wire_format() {
        assert_eq!(ClarityValue::Bool(true).serialize().unwrap(), vec![0x03]);
        assert_eq!(ClarityValue::Bool(false).serialize().unwrap(), vec![0x04]);
    }

    #[test]
    fn test_roundtrip_all_variants() {
        let values = vec![
            ClarityValue::Int(-42),
            ClarityValue::UInt(u128::MAX),
            ClarityValue::Bool(true),
            ClarityValue::StringAscii("savings-pool".to_string()),
            ClarityValue::Principal(sample_address()),
            ClarityValue::ContractPrincipal(sample_address(), "savings-pool".to_string()),
            ClarityValue::OptionalNone,
            ClarityValue::OptionalSome(Box::new(ClarityValue::UInt(7))),
            ClarityValue::ResponseOk(Box::new(ClarityValue::Bool(true))),
            ClarityValue::ResponseErr(Box::new(ClarityValue::UInt(401))),
            ClarityValue::List(vec![ClarityValue::UInt(1), ClarityValue::UInt(2)]),
            ClarityValue::Tuple(vec![
                ("total-deposits".to_string(), ClarityValue::UInt(5_000_000)),
                ("pool-enabled".to_string(), ClarityValue::Bool(true)),
            ]),
        ];

        for value in values {
            let bytes = value
                .serialize()
                .unwrap_or_else(|e| panic!("encode failed for {}: {}", value, e));
            let decoded = ClarityValue::deserialize(&bytes)
                .unwrap_or_else(|e| panic!("decode failed for {}: {}", value, e));
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_non_ascii_string_rejected_at_serialize() {
        // The wire format is ASCII-only; encoding must refuse rather than
        // emit bytes its own decoder rejects
        let value = ClarityValue::StringAscii("sävings".to_string());
        assert!(matches!(value.serialize(), Err(ClarityError::BadString(_))));
        assert!(value.serialize_hex().is_err());
    }

    #[test]
    fn test_oversized_tuple_key_rejected_at_serialize() {
        // Names carry a 1-byte length with a 128-byte limit; a longer key
        // must be an encode error, not a silent truncation
        let value = ClarityValue::Tuple(vec![("k".repeat(200), ClarityValue::UInt(1))]);
        assert!(matches!(value.serialize(), Err(ClarityError::BadString(_))));

        let boundary = ClarityValue::Tuple(vec![("k".repeat(128), ClarityValue::UInt(1))]);
        let decoded = ClarityValue::deserialize(&boundary.serialize().unwrap()).unwrap();
        assert_eq!(decoded, boundary);
    }

    #[test]
    fn test_oversized_name_rejected_at_deserialize() {
        // Tuple of one entry whose key claims 200 bytes
        let mut bytes = vec![0x0c, 0x00, 0x00, 0x00, 0x01, 200];
        bytes.extend_from_slice(&[b'k'; 200]);
        bytes.push(0x03);
        assert!(matches!(
            ClarityValue::deserialize(&bytes),
            Err(ClarityError::BadString(_))
        ));
    }

    #[test]
    fn test_hex_envelope_roundtrip() {
        let value = ClarityValue::UInt(15_000);
        let hex_str = value.serialize_hex().unwrap();
        assert!(hex_str.starts_with("0x01"));
        assert_eq!(ClarityValue::deserialize_hex(&hex_str).unwrap(), value);
        // Prefix-less hex is accepted too
        assert_eq!(
            ClarityValue::deserialize_hex(hex_str.trim_start_matches("0x")).unwrap(),
            value
        );
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = ClarityValue::Bool(true).serialize().unwrap();
        bytes.push(0xff);
        assert_eq!(
            ClarityValue::deserialize(&bytes),
            Err(ClarityError::TrailingBytes(1))
        );
    }

    #[test]
    fn test_truncated_rejected() {
        let bytes = ClarityValue::UInt(12345).serialize().unwrap();
        assert_eq!(
            ClarityValue::deserialize(&bytes[..10]),
            Err(ClarityError::Truncated)
        );
    }

    #[test]
    fn test_unknown_type_id_rejected() {
        assert_eq!(
            ClarityValue::deserialize(&[0x7f]),
            Err(ClarityError::UnknownTypeId(0x7f))
        );
    }

    #[test]
    fn test_tuple_field_lookup() {
        let stats = ClarityValue::Tuple(vec![
            ("total-deposits".to_string(), ClarityValue::UInt(10)),
            ("pool-enabled".to_string(), ClarityValue::Bool(true)),
        ]);
        assert_eq!(stats.tuple_get("total-deposits").and_then(|v| v.as_uint()), Some(10));
        assert!(stats.tuple_get("missing").is_none());
    }

    #[test]
    fn test_unwrap_shell() {
        let wrapped = ClarityValue::ResponseOk(Box::new(ClarityValue::OptionalSome(Box::new(
            ClarityValue::UInt(9),
        ))));
        assert_eq!(wrapped.unwrap_shell().as_uint(), Some(9));
        // err and none are not unwrapped
        let err = ClarityValue::ResponseErr(Box::new(ClarityValue::UInt(1)));
        assert_eq!(err.unwrap_shell(), &err);
    }
}
