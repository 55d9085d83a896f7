//! The injected provider seam and the session shapes it returns.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::caip::get_address_from_caip_account_id;
use crate::error::ProviderError;
use crate::network::Scope;

/// `{ method, params }` as passed to `provider.request(...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestArguments {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestArguments {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
        }
    }

    pub fn with_params(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params: Some(params),
        }
    }
}

/// A wallet's injected, request-based provider (EIP-1193 and the MetaMask
/// multichain API share this shape). Opaque beyond `request`.
#[async_trait(?Send)]
pub trait Provider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError>;
}

#[async_trait(?Send)]
impl<T: Provider + ?Sized> Provider for Arc<T> {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError> {
        (**self).request(args).await
    }
}

#[async_trait(?Send)]
impl<T: Provider + ?Sized> Provider for Rc<T> {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError> {
        (**self).request(args).await
    }
}

/// One scope entry of a multichain session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionScope {
    /// CAIP-10 account ids.
    pub accounts: Vec<String>,
    pub methods: Vec<String>,
    pub notifications: Vec<String>,
}

/// A multichain session as returned by `wallet_createSession` /
/// `wallet_getSession` and carried by `wallet_sessionChanged`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub session_scopes: BTreeMap<String, SessionScope>,
}

impl Session {
    /// Tron scopes present in the session, in `Scope::ALL` order.
    pub fn tron_scopes(&self) -> Vec<Scope> {
        Scope::ALL
            .into_iter()
            .filter(|scope| self.session_scopes.contains_key(scope.as_caip()))
            .collect()
    }

    /// Plain addresses authorized for `scope`. Malformed account ids are
    /// skipped with a warning.
    pub fn addresses(&self, scope: Scope) -> Vec<String> {
        let Some(entry) = self.session_scopes.get(scope.as_caip()) else {
            return Vec::new();
        };
        entry
            .accounts
            .iter()
            .filter_map(|id| match get_address_from_caip_account_id(id) {
                Ok(address) => Some(address.to_string()),
                Err(e) => {
                    tracing::warn!("ignoring session account: {e}");
                    None
                }
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.session_scopes.is_empty()
    }
}
