//! Protocol feature flags
//!
//! The interpreter implements one instruction set; forks differ only in the
//! handful of rules gated here.

use crate::gas::cost;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol spec errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// No preset with this name
    #[error("unknown fork: {0}")]
    UnknownFork(String),
}

/// Rules that vary between forks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolSpec {
    /// Install CREATE output even when the deposit cannot be paid (EIP-2)
    #[serde(default)]
    pub code_deposit_check_waived: bool,
    /// Charge NewAccount when SELFDESTRUCT creates its beneficiary (EIP-150)
    #[serde(default)]
    pub selfdestruct_new_account_charge: bool,
    /// Static cost of SELFDESTRUCT
    #[serde(default)]
    pub self_destruct_cost: u64,
}

impl ProtocolSpec {
    /// Frontier rules
    pub fn frontier() -> Self {
        Self {
            code_deposit_check_waived: false,
            selfdestruct_new_account_charge: false,
            self_destruct_cost: cost::SELFDESTRUCT,
        }
    }

    /// Homestead rules
    pub fn homestead() -> Self {
        Self {
            code_deposit_check_waived: true,
            ..Self::frontier()
        }
    }

    /// Tangerine Whistle rules
    pub fn tangerine_whistle() -> Self {
        Self {
            selfdestruct_new_account_charge: true,
            self_destruct_cost: 5000,
            ..Self::homestead()
        }
    }

    /// Preset by fork name (case-insensitive, `-` and `_` ignored)
    pub fn by_name(name: &str) -> Result<Self, SpecError> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "frontier" => Ok(Self::frontier()),
            "homestead" => Ok(Self::homestead()),
            "tangerinewhistle" | "eip150" => Ok(Self::tangerine_whistle()),
            _ => Err(SpecError::UnknownFork(name.to_string())),
        }
    }
}

impl Default for ProtocolSpec {
    fn default() -> Self {
        Self::frontier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let frontier = ProtocolSpec::frontier();
        assert!(!frontier.code_deposit_check_waived);
        assert!(!frontier.selfdestruct_new_account_charge);
        assert_eq!(frontier.self_destruct_cost, 0);

        assert!(ProtocolSpec::homestead().code_deposit_check_waived);

        let tangerine = ProtocolSpec::tangerine_whistle();
        assert!(tangerine.selfdestruct_new_account_charge);
        assert_eq!(tangerine.self_destruct_cost, 5000);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(ProtocolSpec::by_name("Frontier").unwrap(), ProtocolSpec::frontier());
        assert_eq!(ProtocolSpec::by_name("tangerine-whistle").unwrap(), ProtocolSpec::tangerine_whistle());
        assert_eq!(
            ProtocolSpec::by_name("byzantium"),
            Err(SpecError::UnknownFork("byzantium".to_string()))
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let spec: ProtocolSpec = serde_json::from_str(r#"{"codeDepositCheckWaived": true}"#).unwrap();
        assert!(spec.code_deposit_check_waived);
        assert!(!spec.selfdestruct_new_account_charge);
        assert_eq!(spec.self_destruct_cost, 0);

        let json = serde_json::to_string(&ProtocolSpec::tangerine_whistle()).unwrap();
        let back: ProtocolSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProtocolSpec::tangerine_whistle());
    }
}
