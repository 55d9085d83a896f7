//! MetaMask's Tron support, reached through the multichain API.

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use crate::adapter::{Adapter, AdapterCore, AdapterEvent, AdapterState, WalletReadyState};
use crate::caip::get_address_from_caip_account_id;
use crate::config::AdapterConfig;
use crate::deeplink::{metamask_dapp_link, LinkTarget, Navigator};
use crate::environment::{is_in_browser, is_in_mobile_browser, Availability, Environment};
use crate::error::{EventError, Result, WalletError, WalletErrorKind};
use crate::event::MultichainEvent;
use crate::network::{chain_id_to_scope, Network, Scope};
use crate::provider::{Provider, RequestArguments, Session};

pub const METAMASK_TRON_NAME: &str = "MetaMask";
pub const METAMASK_URL: &str = "https://metamask.io";

const SESSION_METHODS: [&str; 2] = ["signMessage", "signTransaction"];

/// True inside the MetaMask mobile app's embedded browser.
pub fn is_metamask_mobile_webview(env: &impl Environment) -> bool {
    env.has_global("ReactNativeWebView")
        && env
            .user_agent()
            .map(|ua| ua.ends_with("MetaMaskMobile"))
            .unwrap_or(false)
}

/// Desktop extension or mobile webview.
pub fn is_metamask_available(env: &impl Environment) -> bool {
    env.global_flag("ethereum", "isMetaMask") || is_metamask_mobile_webview(env)
}

/// Reopen the current page inside MetaMask mobile. Returns whether a
/// navigation was attempted; never navigates from inside MetaMask itself.
pub fn open_metamask_app(env: &impl Environment, navigator: &impl Navigator) -> bool {
    if !is_in_mobile_browser(env) || is_metamask_mobile_webview(env) {
        return false;
    }
    let Some(href) = env.href() else {
        return false;
    };
    navigator.open(&metamask_dapp_link(href), LinkTarget::SelfFrame);
    true
}

pub struct MetaMaskTronAdapter<P, E, N> {
    core: AdapterCore,
    provider: Option<P>,
    env: E,
    navigator: N,
    config: AdapterConfig,
    scope: Scope,
}

impl<P, E, N> MetaMaskTronAdapter<P, E, N>
where
    P: Provider,
    E: Environment,
    N: Navigator,
{
    /// `provider` is the multichain client when the extension answered, `None`
    /// when it did not.
    pub fn new(provider: Option<P>, env: E, navigator: N, config: AdapterConfig) -> Self {
        let availability = Availability::detect(&env, || provider.is_some());
        let scope = config.default_scope;
        Self {
            core: AdapterCore::new(METAMASK_TRON_NAME, availability.into()),
            provider,
            env,
            navigator,
            config,
            scope,
        }
    }

    /// Attach a provider that showed up after construction.
    pub fn set_provider(&mut self, provider: P) {
        self.provider = Some(provider);
        self.core.set_ready_state(WalletReadyState::Found);
        if matches!(self.core.state(), AdapterState::NotFound | AdapterState::Loading) {
            self.core.set_state(AdapterState::Disconnect);
        }
    }

    /// Scope of the active session (or the configured default before connecting).
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Feed a payload from the provider's notification channel.
    pub fn handle_event(&mut self, payload: &Value) -> std::result::Result<(), EventError> {
        match MultichainEvent::parse(payload)? {
            MultichainEvent::AccountsChanged { scope, accounts } => {
                if scope.as_deref().is_some_and(|s| s != self.scope.as_caip()) {
                    return Ok(());
                }
                let first = accounts.iter().find_map(|account| {
                    match get_address_from_caip_account_id(account) {
                        Ok(address) => Some(address.to_string()),
                        Err(e) => {
                            tracing::warn!("ignoring changed account: {e}");
                            None
                        }
                    }
                });
                match first {
                    Some(address) if self.core.connected() => self.core.set_address(Some(address)),
                    Some(_) => {}
                    None => self.core.mark_disconnected(),
                }
            }
            MultichainEvent::SessionChanged(session) => {
                match session.addresses(self.scope).into_iter().next() {
                    Some(address) if self.core.connected() => self.core.set_address(Some(address)),
                    Some(_) => {}
                    None => self.core.mark_disconnected(),
                }
            }
            MultichainEvent::Notification { method, .. } => {
                tracing::debug!(method, "ignoring multichain notification");
            }
        }
        Ok(())
    }

    fn wallet_not_found(&self) -> WalletError {
        if self.config.open_app_with_deeplink && open_metamask_app(&self.env, &self.navigator) {
            return self.core.fail(WalletError::with_message(
                WalletErrorKind::NotFound,
                "The wallet is not found. Reopening the page in the MetaMask app.",
            ));
        }
        if self.config.open_url_when_wallet_not_found && is_in_browser(&self.env) {
            self.navigator.open(METAMASK_URL, LinkTarget::Blank);
        }
        self.core.fail(WalletError::not_found())
    }

    async fn call(&self, kind: WalletErrorKind, args: RequestArguments) -> Result<Value> {
        let Some(provider) = self.provider.as_ref() else {
            return Err(self.wallet_not_found());
        };
        tracing::debug!(method = %args.method, "multichain request");
        provider
            .request(args)
            .await
            .map_err(|e| self.core.provider_failure(kind, e))
    }

    async fn invoke(&self, kind: WalletErrorKind, method: &str, params: Value) -> Result<Value> {
        let args = RequestArguments::with_params(
            "wallet_invokeMethod",
            json!({
                "scope": self.scope.as_caip(),
                "request": { "method": method, "params": params },
            }),
        );
        self.call(kind, args).await
    }

    async fn get_session(&self, kind: WalletErrorKind) -> Result<Session> {
        let value = self.call(kind, RequestArguments::new("wallet_getSession")).await?;
        self.parse_session(kind, value)
    }

    async fn create_session(&self, kind: WalletErrorKind, scope: Scope) -> Result<Session> {
        let mut scopes = serde_json::Map::new();
        scopes.insert(
            scope.as_caip().to_string(),
            json!({ "methods": SESSION_METHODS, "notifications": [], "accounts": [] }),
        );
        let args = RequestArguments::with_params(
            "wallet_createSession",
            json!({ "optionalScopes": scopes }),
        );
        let value = self.call(kind, args).await?;
        self.parse_session(kind, value)
    }

    fn parse_session(&self, kind: WalletErrorKind, value: Value) -> Result<Session> {
        if value.is_null() {
            return Ok(Session::default());
        }
        serde_json::from_value(value).map_err(|e| {
            self.core
                .fail(WalletError::with_cause(kind, "The wallet returned a malformed session.", e))
        })
    }

    /// Make sure the session authorizes `scope`, requesting it if needed.
    async fn authorize(&self, kind: WalletErrorKind, scope: Scope) -> Result<Session> {
        let session = self.get_session(kind).await?;
        if !session.addresses(scope).is_empty() {
            return Ok(session);
        }
        self.create_session(kind, scope).await
    }
}

/// First authorized account, preferring `preferred` over other Tron scopes.
fn active_account(session: &Session, preferred: Scope) -> Option<(Scope, String)> {
    std::iter::once(preferred)
        .chain(session.tron_scopes())
        .find_map(|scope| {
            session
                .addresses(scope)
                .into_iter()
                .next()
                .map(|address| (scope, address))
        })
}

fn extract_signature(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => obj
            .get("signature")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

#[async_trait(?Send)]
impl<P, E, N> Adapter for MetaMaskTronAdapter<P, E, N>
where
    P: Provider,
    E: Environment,
    N: Navigator,
{
    fn name(&self) -> &'static str {
        self.core.name()
    }

    fn url(&self) -> &'static str {
        METAMASK_URL
    }

    fn ready_state(&self) -> WalletReadyState {
        self.core.ready_state()
    }

    fn state(&self) -> AdapterState {
        self.core.state()
    }

    fn address(&self) -> Option<&str> {
        self.core.address()
    }

    fn subscribe(&self) -> broadcast::Receiver<AdapterEvent> {
        self.core.subscribe()
    }

    async fn connect(&mut self) -> Result<String> {
        if let (true, Some(address)) = (self.core.connected(), self.core.address()) {
            return Ok(address.to_string());
        }
        let kind = WalletErrorKind::Connection;
        let session = self.authorize(kind, self.config.default_scope).await?;
        let (scope, address) = active_account(&session, self.config.default_scope)
            .ok_or_else(|| {
                self.core
                    .fail(WalletError::connection("No Tron account was authorized."))
            })?;
        self.scope = scope;
        self.core.mark_connected(address.clone());
        Ok(address)
    }

    async fn disconnect(&mut self) -> Result<()> {
        if !self.core.connected() {
            return Ok(());
        }
        let args = RequestArguments::with_params(
            "wallet_revokeSession",
            json!({ "scopes": [self.scope.as_caip()] }),
        );
        self.call(WalletErrorKind::Disconnection, args).await?;
        self.core.mark_disconnected();
        Ok(())
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let address = self.core.require_address()?;
        let kind = WalletErrorKind::SignMessage;
        let result = self
            .invoke(kind, "signMessage", json!({ "address": address, "message": message }))
            .await?;
        extract_signature(&result).ok_or_else(|| {
            self.core
                .fail(WalletError::sign_message("The wallet returned no signature."))
        })
    }

    async fn sign_transaction(&self, transaction: Value) -> Result<Value> {
        let address = self.core.require_address()?;
        self.invoke(
            WalletErrorKind::SignTransaction,
            "signTransaction",
            json!({ "address": address, "transaction": transaction }),
        )
        .await
    }

    async fn switch_chain(&mut self, chain_id: &str) -> Result<()> {
        let kind = WalletErrorKind::SwitchChain;
        let scope = chain_id_to_scope(chain_id)
            .map_err(|e| self.core.fail(WalletError::with_cause(kind, e.to_string(), e)))?;
        if !self.core.connected() {
            return Err(self.core.fail(WalletError::with_cause(
                kind,
                "Connect before switching chain.",
                WalletError::disconnected(),
            )));
        }
        if scope == self.scope {
            return Ok(());
        }

        let session = self.authorize(kind, scope).await?;
        let address = session.addresses(scope).into_iter().next().ok_or_else(|| {
            self.core
                .fail(WalletError::switch_chain(format!("No account was authorized for {scope}.")))
        })?;
        self.scope = scope;
        self.core.set_address(Some(address));
        self.core.emit(AdapterEvent::ChainChanged(scope.chain_id().to_string()));
        Ok(())
    }

    async fn network(&self) -> Result<Network> {
        if !self.core.connected() {
            return Err(self.core.fail(WalletError::with_cause(
                WalletErrorKind::GetNetwork,
                "The wallet is disconnected.",
                WalletError::disconnected(),
            )));
        }
        Ok(Network::from(self.scope))
    }
}
