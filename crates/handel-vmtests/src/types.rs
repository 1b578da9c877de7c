//! Type definitions for the VMTests JSON format

use handel_primitives::{Address, H256, U256};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

fn strip_hex(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// Parse a quantity: `0x`-prefixed hex, otherwise decimal
pub fn parse_u256(s: &str) -> Result<U256, String> {
    match strip_hex(s) {
        Some("") => Ok(U256::zero()),
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| format!("invalid quantity {s}: {e:?}")),
        None if s.is_empty() => Ok(U256::zero()),
        None => U256::from_dec_str(s).map_err(|e| format!("invalid quantity {s}: {e:?}")),
    }
}

/// Parse an address with or without `0x`
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_hex(s).map_err(|e| format!("invalid address {s}: {e}"))
}

/// Hex-encoded bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let s = strip_hex(&s).unwrap_or(&s);
        if s.is_empty() {
            return Ok(HexBytes(Vec::new()));
        }
        hex::decode(s).map(HexBytes).map_err(serde::de::Error::custom)
    }
}

/// 256-bit quantity, hex with `0x` or decimal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexU256(pub U256);

impl<'de> Deserialize<'de> for HexU256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        parse_u256(&s).map(HexU256).map_err(serde::de::Error::custom)
    }
}

/// 64-bit quantity, hex with `0x` or decimal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexU64(pub u64);

impl<'de> Deserialize<'de> for HexU64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let value = parse_u256(&s).map_err(serde::de::Error::custom)?;
        if value.bits() > 64 {
            return Err(serde::de::Error::custom(format!("quantity too large: {s}")));
        }
        Ok(HexU64(value.low_u64()))
    }
}

/// Hex-encoded address (20 bytes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HexAddress(pub Address);

impl<'de> Deserialize<'de> for HexAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        parse_address(&s).map(HexAddress).map_err(serde::de::Error::custom)
    }
}

/// Hex-encoded H256 (32 bytes), shorter input is left-padded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HexH256(pub H256);

impl<'de> Deserialize<'de> for HexH256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        let s = strip_hex(&s).unwrap_or(&s);
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        if bytes.len() > 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hash length: {}",
                bytes.len()
            )));
        }
        let mut result = [0u8; 32];
        result[32 - bytes.len()..].copy_from_slice(&bytes);
        Ok(HexH256(H256::from_bytes(result)))
    }
}

/// Fixture file: test name to case
pub type VmTestFile = BTreeMap<String, VmTestCase>;

/// Single VM test case
#[derive(Debug, Deserialize)]
pub struct VmTestCase {
    /// Block environment
    pub env: VmEnv,
    /// Execution parameters
    pub exec: VmExec,
    /// Expected gas remaining (absent if execution should fail)
    pub gas: Option<HexU64>,
    /// Expected logs hash
    pub logs: Option<HexH256>,
    /// Expected output
    pub out: Option<HexBytes>,
    /// Pre-execution state
    pub pre: BTreeMap<String, AccountState>,
    /// Post-execution state (absent if execution should fail)
    pub post: Option<BTreeMap<String, AccountState>>,
}

/// Block environment of a test
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmEnv {
    /// Current coinbase
    pub current_coinbase: HexAddress,
    /// Current difficulty
    pub current_difficulty: HexU256,
    /// Current gas limit
    pub current_gas_limit: HexU64,
    /// Current block number
    pub current_number: HexU64,
    /// Current timestamp
    pub current_timestamp: HexU64,
}

/// Execution parameters of a test
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmExec {
    /// Address of the executing account
    pub address: HexAddress,
    /// Caller address
    pub caller: HexAddress,
    /// Code to execute
    pub code: HexBytes,
    /// Input data
    pub data: HexBytes,
    /// Gas provided
    pub gas: HexU64,
    /// Gas price
    pub gas_price: HexU256,
    /// Origin address
    pub origin: HexAddress,
    /// Value transferred
    pub value: HexU256,
}

/// Account state
#[derive(Debug, Deserialize)]
pub struct AccountState {
    /// Balance
    pub balance: HexU256,
    /// Code
    #[serde(default)]
    pub code: HexBytes,
    /// Nonce
    pub nonce: HexU64,
    /// Storage, slot to value
    #[serde(default)]
    pub storage: BTreeMap<String, HexU256>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_bytes_deserialize() {
        let bytes: HexBytes = serde_json::from_str(r#""0x1234""#).unwrap();
        assert_eq!(bytes.0, vec![0x12, 0x34]);

        let bytes: HexBytes = serde_json::from_str(r#""0x""#).unwrap();
        assert!(bytes.0.is_empty());
    }

    #[test]
    fn test_quantities() {
        let value: HexU256 = serde_json::from_str(r#""0x1""#).unwrap();
        assert_eq!(value.0, U256::one());

        // legacy fixtures write quantities in decimal
        let value: HexU256 = serde_json::from_str(r#""100000""#).unwrap();
        assert_eq!(value.0, U256::from(100_000));

        let value: HexU64 = serde_json::from_str(r#""0x100""#).unwrap();
        assert_eq!(value.0, 256);

        let too_big = r#""0x10000000000000000""#;
        assert!(serde_json::from_str::<HexU64>(too_big).is_err());
    }

    #[test]
    fn test_hex_address_deserialize() {
        let addr: HexAddress =
            serde_json::from_str(r#""0x1234567890123456789012345678901234567890""#).unwrap();
        assert_eq!(addr.0.to_hex(), "0x1234567890123456789012345678901234567890");

        assert!(serde_json::from_str::<HexAddress>(r#""0x1234""#).is_err());
    }

    #[test]
    fn test_hex_h256_left_pads() {
        let hash: HexH256 = serde_json::from_str(r#""0x01""#).unwrap();
        assert_eq!(hash.0, H256::from_u256(U256::one()));
    }

    #[test]
    fn test_account_state_defaults() {
        let account: AccountState =
            serde_json::from_str(r#"{"balance": "0x0a", "nonce": "0x00"}"#).unwrap();
        assert_eq!(account.balance.0, U256::from(10));
        assert!(account.code.0.is_empty());
        assert!(account.storage.is_empty());
    }
}
