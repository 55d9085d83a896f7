//! CAIP-10 account identifiers (`namespace:reference:address`).

use std::fmt;
use std::str::FromStr;

use crate::error::ChainError;
use crate::network::Scope;

/// A parsed CAIP-10 account identifier, e.g. `tron:728126428:TXYZ...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaipAccountId {
    pub namespace: String,
    pub reference: String,
    pub address: String,
}

impl CaipAccountId {
    pub fn new(scope: Scope, address: impl Into<String>) -> Self {
        let (namespace, reference) = scope
            .as_caip()
            .split_once(':')
            .unwrap_or(("tron", scope.as_caip()));
        Self {
            namespace: namespace.to_string(),
            reference: reference.to_string(),
            address: address.into(),
        }
    }

    /// Parse an account id. Only the address segment must be non-empty;
    /// its syntax is left to the caller.
    pub fn parse(input: &str) -> Result<Self, ChainError> {
        let mut parts = input.split(':');
        let namespace = parts.next().unwrap_or_default();
        let reference = parts.next().unwrap_or_default();
        let address = parts.next().unwrap_or_default();
        if address.is_empty() {
            return Err(ChainError::InvalidCaipAccountId(input.to_string()));
        }
        Ok(Self {
            namespace: namespace.to_string(),
            reference: reference.to_string(),
            address: address.to_string(),
        })
    }

    /// The CAIP-2 chain part, `namespace:reference`.
    pub fn chain(&self) -> String {
        format!("{}:{}", self.namespace, self.reference)
    }

    /// The Tron scope this account lives on, if it is one of ours.
    pub fn scope(&self) -> Result<Scope, ChainError> {
        self.chain().parse()
    }
}

impl fmt::Display for CaipAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.reference, self.address)
    }
}

impl FromStr for CaipAccountId {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Extract the address (third segment) from a CAIP account id.
pub fn get_address_from_caip_account_id(caip_account_id: &str) -> Result<&str, ChainError> {
    match caip_account_id.split(':').nth(2) {
        Some(address) if !address.is_empty() => Ok(address),
        _ => Err(ChainError::InvalidCaipAccountId(caip_account_id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf";

    #[test]
    fn extracts_address() {
        let id = format!("tron:mainnet:{ADDRESS}");
        assert_eq!(get_address_from_caip_account_id(&id).unwrap(), ADDRESS);
    }

    #[test]
    fn rejects_empty_address() {
        let err = get_address_from_caip_account_id("tron:mainnet:").unwrap_err();
        assert_eq!(err, ChainError::InvalidCaipAccountId("tron:mainnet:".into()));
    }

    #[test]
    fn rejects_missing_segments() {
        assert!(get_address_from_caip_account_id("bad").is_err());
        assert!(get_address_from_caip_account_id("tron:mainnet").is_err());
        assert!(get_address_from_caip_account_id("").is_err());
    }

    #[test]
    fn does_not_validate_address_syntax() {
        assert_eq!(get_address_from_caip_account_id("a:b:not-an-address").unwrap(), "not-an-address");
    }

    #[test]
    fn parse_and_display() {
        let id: CaipAccountId = format!("tron:728126428:{ADDRESS}").parse().unwrap();
        assert_eq!(id.namespace, "tron");
        assert_eq!(id.reference, "728126428");
        assert_eq!(id.address, ADDRESS);
        assert_eq!(id.scope().unwrap(), Scope::Mainnet);
        assert_eq!(id.to_string(), format!("tron:728126428:{ADDRESS}"));
    }

    #[test]
    fn new_builds_scope_prefixed_id() {
        let id = CaipAccountId::new(Scope::Nile, ADDRESS);
        assert_eq!(id.to_string(), format!("tron:3448148188:{ADDRESS}"));
    }

    #[test]
    fn foreign_chain_has_no_scope() {
        let id = CaipAccountId::parse("eip155:1:0xabc").unwrap();
        assert!(id.scope().is_err());
    }
}
