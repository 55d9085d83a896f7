//! Error types shared by every adapter.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The failure point a [`WalletError`] was raised at.
///
/// Callers match on the kind instead of downcasting, and every kind still goes
/// through the same `WalletError` value for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletErrorKind {
    /// Unclassified wallet failure.
    Wallet,
    /// No provider for the wallet could be found in the environment.
    NotFound,
    /// An operation was attempted before a wallet was selected.
    NotSelected,
    /// An operation needing a session was attempted while disconnected.
    Disconnected,
    /// Connecting to the wallet failed or was rejected.
    Connection,
    /// Disconnecting from the wallet failed.
    Disconnection,
    /// The wallet failed to sign a message.
    SignMessage,
    /// The wallet failed to sign a transaction.
    SignTransaction,
    /// The wallet's module or provider failed to load.
    WalletLoad,
    /// The user closed the QR window before the session was approved.
    WindowClosed,
    /// Switching chain failed.
    SwitchChain,
    /// Reading the wallet's current network failed.
    GetNetwork,
}

impl WalletErrorKind {
    pub const ALL: [WalletErrorKind; 12] = [
        Self::Wallet,
        Self::NotFound,
        Self::NotSelected,
        Self::Disconnected,
        Self::Connection,
        Self::Disconnection,
        Self::SignMessage,
        Self::SignTransaction,
        Self::WalletLoad,
        Self::WindowClosed,
        Self::SwitchChain,
        Self::GetNetwork,
    ];

    /// Stable tag identifying the kind, e.g. `WalletNotFoundError`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Wallet => "WalletError",
            Self::NotFound => "WalletNotFoundError",
            Self::NotSelected => "WalletNotSelectedError",
            Self::Disconnected => "WalletDisconnectedError",
            Self::Connection => "WalletConnectionError",
            Self::Disconnection => "WalletDisconnectionError",
            Self::SignMessage => "WalletSignMessageError",
            Self::SignTransaction => "WalletSignTransactionError",
            Self::WalletLoad => "WalletWalletLoadError",
            Self::WindowClosed => "WalletWindowClosedError",
            Self::SwitchChain => "WalletSwitchChainError",
            Self::GetNetwork => "WalletGetNetworkError",
        }
    }

    /// Message used when none is supplied at construction.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::NotFound => "The wallet is not found.",
            Self::NotSelected => "No wallet is selected. Please select a wallet.",
            Self::Disconnected => "The wallet is disconnected. Please connect first.",
            Self::WindowClosed => "The QR window is closed.",
            _ => "",
        }
    }
}

impl fmt::Display for WalletErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned by every public adapter operation.
///
/// Immutable once built. The optional `cause` keeps the low-level provider or
/// library error that was wrapped at the operation boundary.
#[derive(Debug)]
pub struct WalletError {
    kind: WalletErrorKind,
    message: String,
    cause: Option<anyhow::Error>,
}

impl WalletError {
    /// Error of `kind` carrying the kind's default message and no cause.
    pub fn new(kind: WalletErrorKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
            cause: None,
        }
    }

    pub fn with_message(kind: WalletErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        kind: WalletErrorKind,
        message: impl Into<String>,
        cause: impl Into<anyhow::Error>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Wrap a lower-level failure, reusing its text as the message.
    pub fn wrap(kind: WalletErrorKind, cause: impl Into<anyhow::Error>) -> Self {
        let cause = cause.into();
        Self {
            kind,
            message: cause.to_string(),
            cause: Some(cause),
        }
    }

    pub fn kind(&self) -> WalletErrorKind {
        self.kind
    }

    pub fn is(&self, kind: WalletErrorKind) -> bool {
        self.kind == kind
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }

    /// Downcast the wrapped cause, e.g. to the [`ProviderError`] it came from.
    pub fn cause_as<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.cause.as_ref().and_then(|c| c.downcast_ref::<E>())
    }

    pub fn wallet(message: impl Into<String>) -> Self {
        Self::with_message(WalletErrorKind::Wallet, message)
    }

    pub fn not_found() -> Self {
        Self::new(WalletErrorKind::NotFound)
    }

    pub fn not_selected() -> Self {
        Self::new(WalletErrorKind::NotSelected)
    }

    pub fn disconnected() -> Self {
        Self::new(WalletErrorKind::Disconnected)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::with_message(WalletErrorKind::Connection, message)
    }

    pub fn disconnection(message: impl Into<String>) -> Self {
        Self::with_message(WalletErrorKind::Disconnection, message)
    }

    pub fn sign_message(message: impl Into<String>) -> Self {
        Self::with_message(WalletErrorKind::SignMessage, message)
    }

    pub fn sign_transaction(message: impl Into<String>) -> Self {
        Self::with_message(WalletErrorKind::SignTransaction, message)
    }

    pub fn wallet_load(message: impl Into<String>) -> Self {
        Self::with_message(WalletErrorKind::WalletLoad, message)
    }

    pub fn window_closed() -> Self {
        Self::new(WalletErrorKind::WindowClosed)
    }

    pub fn switch_chain(message: impl Into<String>) -> Self {
        Self::with_message(WalletErrorKind::SwitchChain, message)
    }

    pub fn get_network(message: impl Into<String>) -> Self {
        Self::with_message(WalletErrorKind::GetNetwork, message)
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(self.kind.tag())
        } else {
            write!(f, "{}: {}", self.kind.tag(), self.message)
        }
    }
}

impl std::error::Error for WalletError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|c| AsRef::<dyn std::error::Error + 'static>::as_ref(c))
    }
}

/// Alias for `std::result::Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;

/// Invalid input to the chain / scope / CAIP mapping helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Could not determine scope for unsupported chainId: {0}")]
    UnsupportedChainId(String),

    #[error("Could not determine chainId for unsupported scope: {0}")]
    UnsupportedScope(String),

    #[error("Invalid CAIP account ID: {0}")]
    InvalidCaipAccountId(String),
}

/// JSON-RPC style error object rejected by an injected provider.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ProviderError {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const DISCONNECTED: i64 = 4900;
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected() -> Self {
        Self::new(Self::USER_REJECTED, "User rejected the request.")
    }

    /// Interpret an arbitrary rejected value. Values that are not an error
    /// object become an internal error carrying the raw JSON as `data`.
    pub fn from_value(value: serde_json::Value) -> Self {
        match serde_json::from_value::<ProviderError>(value.clone()) {
            Ok(err) => err,
            Err(_) => Self {
                code: Self::INTERNAL,
                message: value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| "Unexpected provider response".to_string()),
                data: Some(value),
            },
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Self::USER_REJECTED
    }
}

/// A provider event payload that does not match any known event shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event payload is not an object")]
    NotAnObject,

    #[error("event payload has no method")]
    MissingMethod,

    #[error("unknown event method '{0}'")]
    UnknownMethod(String),

    #[error("malformed '{method}' event: {reason}")]
    Malformed { method: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM: &str = "Custom message";

    #[test]
    fn default_construction_uses_kind_message_and_no_cause() {
        for kind in WalletErrorKind::ALL {
            let err = WalletError::new(kind);
            assert_eq!(err.kind(), kind);
            assert_eq!(err.message(), kind.default_message());
            assert!(err.cause().is_none());
        }
    }

    #[test]
    fn documented_defaults() {
        assert_eq!(WalletError::not_found().message(), "The wallet is not found.");
        assert_eq!(
            WalletError::not_selected().message(),
            "No wallet is selected. Please select a wallet."
        );
        assert_eq!(
            WalletError::disconnected().message(),
            "The wallet is disconnected. Please connect first."
        );
        assert_eq!(WalletError::window_closed().message(), "The QR window is closed.");
        assert_eq!(WalletError::new(WalletErrorKind::Wallet).message(), "");
    }

    #[test]
    fn message_overrides_default() {
        for kind in WalletErrorKind::ALL {
            let err = WalletError::with_message(kind, CUSTOM);
            assert_eq!(err.message(), CUSTOM);
            assert!(err.cause().is_none());
        }
    }

    #[test]
    fn message_and_cause_are_both_kept() {
        for kind in WalletErrorKind::ALL {
            let err = WalletError::with_cause(kind, CUSTOM, anyhow::anyhow!("root cause"));
            assert_eq!(err.message(), CUSTOM);
            assert_eq!(err.cause().unwrap().to_string(), "root cause");
        }
    }

    #[test]
    fn every_kind_is_a_std_error() {
        for kind in WalletErrorKind::ALL {
            let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(WalletError::new(kind));
            let back = boxed.downcast_ref::<WalletError>().unwrap();
            assert!(back.is(kind));
        }
    }

    #[test]
    fn source_exposes_cause() {
        use std::error::Error as _;

        let err = WalletError::with_cause(
            WalletErrorKind::SignMessage,
            "sign failed",
            ProviderError::user_rejected(),
        );
        let source = err.source().unwrap();
        assert!(source.to_string().contains("4001"));
        assert!(err.cause_as::<ProviderError>().unwrap().is_user_rejection());
        assert!(WalletError::not_found().source().is_none());
    }

    #[test]
    fn display_contains_tag_and_message() {
        let err = WalletError::connection("Connection failed");
        let s = err.to_string();
        assert!(s.contains("WalletConnectionError"));
        assert!(s.contains("Connection failed"));

        assert_eq!(
            WalletError::new(WalletErrorKind::SwitchChain).to_string(),
            "WalletSwitchChainError"
        );
    }

    #[test]
    fn tags_are_unique() {
        let mut tags: Vec<_> = WalletErrorKind::ALL.iter().map(|k| k.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), WalletErrorKind::ALL.len());
    }

    #[test]
    fn wrap_reuses_cause_text() {
        let err = WalletError::wrap(
            WalletErrorKind::GetNetwork,
            ProviderError::new(ProviderError::DISCONNECTED, "offline"),
        );
        assert_eq!(err.message(), "provider error 4900: offline");
        assert!(err.cause_as::<ProviderError>().is_some());
    }

    #[test]
    fn provider_error_from_shaped_value() {
        let err = ProviderError::from_value(serde_json::json!({
            "code": 4001,
            "message": "User denied",
        }));
        assert!(err.is_user_rejection());
        assert_eq!(err.message, "User denied");
    }

    #[test]
    fn provider_error_from_unshaped_value() {
        let err = ProviderError::from_value(serde_json::json!("boom"));
        assert_eq!(err.code, ProviderError::INTERNAL);
        assert_eq!(err.message, "boom");
        assert_eq!(err.data, Some(serde_json::json!("boom")));
    }
}
