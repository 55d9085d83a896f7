//! The common adapter surface every wallet is normalized into.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::environment::Availability;
use crate::error::{ProviderError, Result, WalletError, WalletErrorKind};
use crate::network::Network;

const EVENT_CAPACITY: usize = 32;

/// Connection lifecycle of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterState {
    Loading,
    NotFound,
    Disconnect,
    Connected,
}

/// Whether the wallet's provider could be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletReadyState {
    Loading,
    NotFound,
    Found,
}

impl From<Availability> for WalletReadyState {
    fn from(availability: Availability) -> Self {
        match availability {
            Availability::Available => WalletReadyState::Found,
            Availability::NotInstalled | Availability::NoBrowser => WalletReadyState::NotFound,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdapterEvent {
    Connect(String),
    Disconnect,
    AccountsChanged {
        address: Option<String>,
        previous: Option<String>,
    },
    ChainChanged(String),
    ReadyStateChanged(WalletReadyState),
    StateChanged(AdapterState),
    Error {
        kind: WalletErrorKind,
        message: String,
    },
}

/// Connect / sign / disconnect surface shared by all wallets.
///
/// Futures are not `Send`: adapters run on the page's single event loop and
/// hold providers that are bound to it.
#[async_trait(?Send)]
pub trait Adapter {
    fn name(&self) -> &'static str;

    /// The wallet's website.
    fn url(&self) -> &'static str;

    fn ready_state(&self) -> WalletReadyState;

    fn state(&self) -> AdapterState;

    fn address(&self) -> Option<&str>;

    fn connected(&self) -> bool {
        self.state() == AdapterState::Connected
    }

    fn subscribe(&self) -> broadcast::Receiver<AdapterEvent>;

    /// Connect and return the active address.
    async fn connect(&mut self) -> Result<String>;

    async fn disconnect(&mut self) -> Result<()>;

    /// Sign `message`, returning the signature.
    async fn sign_message(&self, message: &str) -> Result<String>;

    /// Sign a wallet-specific transaction object, returning the signed form.
    async fn sign_transaction(&self, transaction: Value) -> Result<Value>;

    async fn switch_chain(&mut self, chain_id: &str) -> Result<()>;

    async fn network(&self) -> Result<Network>;
}

/// State and event plumbing shared by the concrete adapters.
#[derive(Debug)]
pub struct AdapterCore {
    name: &'static str,
    state: AdapterState,
    ready_state: WalletReadyState,
    address: Option<String>,
    events: broadcast::Sender<AdapterEvent>,
}

impl AdapterCore {
    pub fn new(name: &'static str, ready_state: WalletReadyState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = match ready_state {
            WalletReadyState::Loading => AdapterState::Loading,
            WalletReadyState::NotFound => AdapterState::NotFound,
            WalletReadyState::Found => AdapterState::Disconnect,
        };
        Self {
            name,
            state,
            ready_state,
            address: None,
            events,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    pub fn ready_state(&self) -> WalletReadyState {
        self.ready_state
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn connected(&self) -> bool {
        self.state == AdapterState::Connected
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdapterEvent> {
        self.events.subscribe()
    }

    /// Publish to subscribers; having none is fine.
    pub fn emit(&self, event: AdapterEvent) {
        let _ = self.events.send(event);
    }

    pub fn set_state(&mut self, state: AdapterState) {
        if self.state != state {
            tracing::debug!(adapter = self.name, ?state, "state changed");
            self.state = state;
            self.emit(AdapterEvent::StateChanged(state));
        }
    }

    pub fn set_ready_state(&mut self, ready_state: WalletReadyState) {
        if self.ready_state != ready_state {
            self.ready_state = ready_state;
            self.emit(AdapterEvent::ReadyStateChanged(ready_state));
        }
    }

    /// Update the active address, announcing real changes only.
    pub fn set_address(&mut self, address: Option<String>) {
        if self.address != address {
            let previous = std::mem::replace(&mut self.address, address.clone());
            self.emit(AdapterEvent::AccountsChanged { address, previous });
        }
    }

    pub fn mark_connected(&mut self, address: String) {
        self.set_address(Some(address.clone()));
        self.set_state(AdapterState::Connected);
        self.emit(AdapterEvent::Connect(address));
    }

    pub fn mark_disconnected(&mut self) {
        let was_connected = self.connected();
        self.set_address(None);
        self.set_state(AdapterState::Disconnect);
        if was_connected {
            self.emit(AdapterEvent::Disconnect);
        }
    }

    /// Log, announce and hand back an error raised by an operation.
    pub fn fail(&self, err: WalletError) -> WalletError {
        tracing::warn!(adapter = self.name, "{err}");
        self.emit(AdapterEvent::Error {
            kind: err.kind(),
            message: err.message().to_string(),
        });
        err
    }

    /// Wrap a provider rejection into `kind`, keeping it as the cause.
    pub fn provider_failure(&self, kind: WalletErrorKind, err: ProviderError) -> WalletError {
        let message = err.message.clone();
        self.fail(WalletError::with_cause(kind, message, err))
    }

    /// Fail with `Disconnected` unless connected; returns the address.
    pub fn require_address(&self) -> Result<String> {
        match (&self.address, self.connected()) {
            (Some(address), true) => Ok(address.clone()),
            _ => Err(self.fail(WalletError::disconnected())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut broadcast::Receiver<AdapterEvent>) -> Vec<AdapterEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[test]
    fn initial_state_follows_ready_state() {
        assert_eq!(
            AdapterCore::new("x", WalletReadyState::Found).state(),
            AdapterState::Disconnect
        );
        assert_eq!(
            AdapterCore::new("x", WalletReadyState::NotFound).state(),
            AdapterState::NotFound
        );
        assert_eq!(
            AdapterCore::new("x", WalletReadyState::Loading).state(),
            AdapterState::Loading
        );
    }

    #[test]
    fn availability_maps_to_ready_state() {
        assert_eq!(WalletReadyState::from(Availability::Available), WalletReadyState::Found);
        assert_eq!(WalletReadyState::from(Availability::NotInstalled), WalletReadyState::NotFound);
        assert_eq!(WalletReadyState::from(Availability::NoBrowser), WalletReadyState::NotFound);
    }

    #[test]
    fn connect_and_disconnect_emit_in_order() {
        let mut core = AdapterCore::new("x", WalletReadyState::Found);
        let mut rx = core.subscribe();

        core.mark_connected("TAbc".into());
        core.mark_disconnected();

        assert_eq!(
            drain(&mut rx),
            vec![
                AdapterEvent::AccountsChanged {
                    address: Some("TAbc".into()),
                    previous: None
                },
                AdapterEvent::StateChanged(AdapterState::Connected),
                AdapterEvent::Connect("TAbc".into()),
                AdapterEvent::AccountsChanged {
                    address: None,
                    previous: Some("TAbc".into())
                },
                AdapterEvent::StateChanged(AdapterState::Disconnect),
                AdapterEvent::Disconnect,
            ]
        );
    }

    #[test]
    fn unchanged_values_are_not_announced() {
        let mut core = AdapterCore::new("x", WalletReadyState::Found);
        let mut rx = core.subscribe();
        core.set_state(AdapterState::Disconnect);
        core.set_address(None);
        core.set_ready_state(WalletReadyState::Found);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn require_address_needs_connection() {
        let mut core = AdapterCore::new("x", WalletReadyState::Found);
        let err = core.require_address().unwrap_err();
        assert!(err.is(WalletErrorKind::Disconnected));

        core.mark_connected("TAbc".into());
        assert_eq!(core.require_address().unwrap(), "TAbc");
    }

    #[test]
    fn provider_failure_keeps_cause_and_emits() {
        let core = AdapterCore::new("x", WalletReadyState::Found);
        let mut rx = core.subscribe();
        let err = core.provider_failure(WalletErrorKind::SignMessage, ProviderError::user_rejected());

        assert!(err.is(WalletErrorKind::SignMessage));
        assert_eq!(err.message(), "User rejected the request.");
        assert!(err.cause_as::<ProviderError>().unwrap().is_user_rejection());
        assert_eq!(
            drain(&mut rx),
            vec![AdapterEvent::Error {
                kind: WalletErrorKind::SignMessage,
                message: "User rejected the request.".into()
            }]
        );
    }
}
