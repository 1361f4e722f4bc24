//! On-chain identifiers: account addresses, transaction hashes and receipts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Error returned when parsing a hex identifier fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("Missing 0x prefix")]
    MissingPrefix,

    #[error("Expected {expected} hex characters, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("Invalid hex character in {0}")]
    InvalidChar(String),
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub(crate) fn parse_hex<const N: usize>(s: &str) -> Result<[u8; N], HexError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or(HexError::MissingPrefix)?;

    if digits.len() != N * 2 {
        return Err(HexError::Length {
            expected: N * 2,
            actual: digits.len(),
        });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| HexError::InvalidChar(format!("{s}: {e}")))?;
    Ok(out)
}

/// A 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive a stable address from a label (last 20 bytes of its SHA-256).
    ///
    /// Used for local development accounts and the devnet contract address.
    #[must_use]
    pub fn derive(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Abbreviated form for list views: `0x1234...abcd`.
    #[must_use]
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[38..])
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", to_hex(&self.0))
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({self})")
    }
}

impl std::str::FromStr for Address {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex::<20>(s.trim()).map(Self)
    }
}

/// Hash identifying a submitted transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

impl TxHash {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", to_hex(&self.0))
    }
}

impl std::fmt::Debug for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TxHash({self})")
    }
}

/// A transaction accepted by the node but not yet awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    pub hash: TxHash,
    pub from: Address,
    pub nonce: u64,
}

/// Confirmation of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub block_number: u64,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse_and_display() {
        let addr: Address = "0x00112233445566778899aabbccddeeff00112233"
            .parse()
            .expect("valid address");
        assert_eq!(addr.to_string(), "0x00112233445566778899aabbccddeeff00112233");
        assert_eq!(addr.as_bytes()[1], 0x11);
    }

    #[test]
    fn test_address_parse_errors() {
        assert_eq!(
            "00112233445566778899aabbccddeeff00112233".parse::<Address>(),
            Err(HexError::MissingPrefix)
        );
        assert!(matches!(
            "0x0011".parse::<Address>(),
            Err(HexError::Length { expected: 40, actual: 4 })
        ));
        assert!(matches!(
            "0xzz112233445566778899aabbccddeeff00112233".parse::<Address>(),
            Err(HexError::InvalidChar(_))
        ));
    }

    #[test]
    fn test_address_accepts_mixed_case() {
        let addr: Address = "0X00112233445566778899AABBCCDDEEFF00112233"
            .parse()
            .expect("valid address");
        assert_eq!(addr.to_string(), "0x00112233445566778899aabbccddeeff00112233");
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // 40 bytes but not 40 hex digits
        let s = format!("0x{}é{}", "00".repeat(9), "00".repeat(10));
        assert_eq!(s.len(), 42);
        assert!(matches!(s.parse::<Address>(), Err(HexError::InvalidChar(_))));
    }

    #[test]
    fn test_short_address() {
        let addr: Address = "0xabcdef0000000000000000000000000000001234"
            .parse()
            .expect("valid address");
        assert_eq!(addr.short(), "0xabcd...1234");
    }

    #[test]
    fn test_derive_is_stable() {
        assert_eq!(Address::derive("alice"), Address::derive("alice"));
        assert_ne!(Address::derive("alice"), Address::derive("bob"));
    }
}
