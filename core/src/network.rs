//! Tron network scopes and their chain-ID mapping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;

pub const MAINNET_CHAIN_ID: &str = "0x2b6653dc";
pub const NILE_CHAIN_ID: &str = "0xcd8690dc";
pub const SHASTA_CHAIN_ID: &str = "0x94a9059e";

/// A Tron network environment, identified by its CAIP-2 chain string.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    #[serde(rename = "tron:728126428")]
    Mainnet,
    #[serde(rename = "tron:3448148188")]
    Nile,
    #[serde(rename = "tron:2494104990")]
    Shasta,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Mainnet, Scope::Nile, Scope::Shasta];

    /// CAIP-2 form, e.g. `tron:728126428`.
    pub fn as_caip(self) -> &'static str {
        match self {
            Scope::Mainnet => "tron:728126428",
            Scope::Nile => "tron:3448148188",
            Scope::Shasta => "tron:2494104990",
        }
    }

    /// Hex chain ID as reported by `eth_chainId`-style calls.
    pub fn chain_id(self) -> &'static str {
        match self {
            Scope::Mainnet => MAINNET_CHAIN_ID,
            Scope::Nile => NILE_CHAIN_ID,
            Scope::Shasta => SHASTA_CHAIN_ID,
        }
    }

    pub fn network_type(self) -> NetworkType {
        match self {
            Scope::Mainnet => NetworkType::Mainnet,
            Scope::Nile => NetworkType::Nile,
            Scope::Shasta => NetworkType::Shasta,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scope::Mainnet => "mainnet",
            Scope::Nile => "nile",
            Scope::Shasta => "shasta",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_caip())
    }
}

/// Accepts the CAIP-2 form or the plain network name (case-insensitive).
impl FromStr for Scope {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        Scope::ALL
            .into_iter()
            .find(|scope| {
                raw == scope.as_caip() || raw.eq_ignore_ascii_case(scope.name())
            })
            .ok_or_else(|| ChainError::UnsupportedScope(s.to_string()))
    }
}

/// Network classification exposed to applications.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetworkType {
    Mainnet,
    Shasta,
    Nile,
    Unknown,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Mainnet => write!(f, "mainnet"),
            NetworkType::Shasta => write!(f, "shasta"),
            NetworkType::Nile => write!(f, "nile"),
            NetworkType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Network a connected wallet reports.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub network_type: NetworkType,
    pub chain_id: String,
}

impl Network {
    pub fn from_chain_id(chain_id: impl Into<String>) -> Self {
        let chain_id = chain_id.into();
        Self {
            network_type: network_type_from_chain_id(&chain_id),
            chain_id,
        }
    }
}

impl From<Scope> for Network {
    fn from(scope: Scope) -> Self {
        Self {
            network_type: scope.network_type(),
            chain_id: scope.chain_id().to_string(),
        }
    }
}

/// Map a hex chain ID onto its Tron scope. Only the exact lowercase form
/// returned by [`Scope::chain_id`] is accepted.
pub fn chain_id_to_scope(chain_id: &str) -> Result<Scope, ChainError> {
    Scope::ALL
        .into_iter()
        .find(|scope| scope.chain_id() == chain_id)
        .ok_or_else(|| ChainError::UnsupportedChainId(chain_id.to_string()))
}

/// Map a raw scope value (CAIP-2 string or network name) onto its chain ID.
/// Use [`Scope::chain_id`] when a typed scope is already at hand.
pub fn scope_to_chain_id(raw_scope: &str) -> Result<&'static str, ChainError> {
    raw_scope.parse::<Scope>().map(Scope::chain_id)
}

pub fn scope_to_network_type(scope: Scope) -> NetworkType {
    scope.network_type()
}

/// Classify a chain ID without failing; foreign chains are `Unknown`.
pub fn network_type_from_chain_id(chain_id: &str) -> NetworkType {
    chain_id_to_scope(chain_id)
        .map(Scope::network_type)
        .unwrap_or(NetworkType::Unknown)
}
