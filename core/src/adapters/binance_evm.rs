//! Binance Web3 Wallet on EVM chains, via its EIP-1193 provider.

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use crate::adapter::{Adapter, AdapterCore, AdapterEvent, AdapterState, WalletReadyState};
use crate::config::AdapterConfig;
use crate::deeplink::{binance_deep_link, LinkTarget, Navigator};
use crate::environment::{
    is_in_browser, is_in_mobile_browser, user_agent_contains, Availability, Environment,
};
use crate::error::{EventError, Result, WalletError, WalletErrorKind};
use crate::event::Eip1193Event;
use crate::network::Network;
use crate::provider::{Provider, RequestArguments};

pub const BINANCE_EVM_NAME: &str = "Binance Wallet";
pub const BINANCE_URL: &str = "https://www.binance.com/en/web3wallet";

/// The desktop extension injects `window.binancew3w`.
pub fn is_binance_extension_installed(env: &impl Environment) -> bool {
    env.has_global("binancew3w")
}

/// Inside the Binance app's dapp browser.
pub fn is_in_binance(env: &impl Environment) -> bool {
    env.global_flag("ethereum", "isBinance") || user_agent_contains(env, "BNC/")
}

pub fn support_binance_evm(env: &impl Environment) -> bool {
    is_in_browser(env) && (is_binance_extension_installed(env) || is_in_binance(env))
}

/// Reopen the current page in the Binance app from a mobile browser that has
/// no Binance provider. Returns whether a navigation was attempted.
pub fn open_binance_with_deeplink(
    env: &impl Environment,
    navigator: &impl Navigator,
    chain_id: u64,
) -> bool {
    if !is_in_mobile_browser(env) || support_binance_evm(env) {
        return false;
    }
    let Some(href) = env.href() else {
        return false;
    };
    let link = binance_deep_link(href, chain_id);
    navigator.open(&link.bnc, LinkTarget::Blank);
    true
}

pub struct BinanceEvmAdapter<P, E, N> {
    core: AdapterCore,
    provider: Option<P>,
    env: E,
    navigator: N,
    config: AdapterConfig,
    chain_id: Option<String>,
}

impl<P, E, N> BinanceEvmAdapter<P, E, N>
where
    P: Provider,
    E: Environment,
    N: Navigator,
{
    /// `provider` is `window.binancew3w.ethereum` or `window.ethereum`; it is
    /// only used when the environment shows Binance support.
    pub fn new(provider: Option<P>, env: E, navigator: N, config: AdapterConfig) -> Self {
        let provider = provider.filter(|_| support_binance_evm(&env));
        let availability = Availability::detect(&env, || provider.is_some());
        Self {
            core: AdapterCore::new(BINANCE_EVM_NAME, availability.into()),
            provider,
            env,
            navigator,
            config,
            chain_id: None,
        }
    }

    /// Last chain id seen from the wallet.
    pub fn chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref()
    }

    /// Feed an EIP-1193 event (`accountsChanged`, `chainChanged`, ...).
    pub fn handle_event(&mut self, event: &str, payload: &Value) -> std::result::Result<(), EventError> {
        match Eip1193Event::parse(event, payload)? {
            Eip1193Event::AccountsChanged(accounts) => match accounts.into_iter().next() {
                Some(address) if self.core.connected() => self.core.set_address(Some(address)),
                Some(_) => {}
                None => self.core.mark_disconnected(),
            },
            Eip1193Event::ChainChanged(chain_id) => {
                self.chain_id = Some(chain_id.clone());
                self.core.emit(AdapterEvent::ChainChanged(chain_id));
            }
            Eip1193Event::Connect { chain_id } => self.chain_id = Some(chain_id),
            Eip1193Event::Disconnect(err) => {
                tracing::debug!(code = err.code, "provider disconnected: {}", err.message);
                self.core.mark_disconnected();
            }
        }
        Ok(())
    }

    fn wallet_not_found(&self) -> WalletError {
        if self.config.open_app_with_deeplink
            && open_binance_with_deeplink(
                &self.env,
                &self.navigator,
                self.config.binance_deeplink_chain_id,
            )
        {
            return self.core.fail(WalletError::with_message(
                WalletErrorKind::NotFound,
                "The wallet is not found. Reopening the page in the Binance app.",
            ));
        }
        if self.config.open_url_when_wallet_not_found && is_in_browser(&self.env) {
            self.navigator.open(BINANCE_URL, LinkTarget::Blank);
        }
        self.core.fail(WalletError::not_found())
    }

    /// Without a provider only `connect` navigates; every other call fails
    /// with its own kind.
    async fn call(&self, kind: WalletErrorKind, args: RequestArguments) -> Result<Value> {
        let Some(provider) = self.provider.as_ref() else {
            return Err(self.core.fail(WalletError::with_cause(
                kind,
                "The wallet is not found.",
                WalletError::not_found(),
            )));
        };
        tracing::debug!(method = %args.method, "eip-1193 request");
        provider
            .request(args)
            .await
            .map_err(|e| self.core.provider_failure(kind, e))
    }

    async fn fetch_chain_id(&self, kind: WalletErrorKind) -> Result<String> {
        let value = self.call(kind, RequestArguments::new("eth_chainId")).await?;
        value.as_str().map(str::to_string).ok_or_else(|| {
            self.core.fail(WalletError::with_message(
                kind,
                format!("The wallet returned an invalid chain id: {value}"),
            ))
        })
    }
}

#[async_trait(?Send)]
impl<P, E, N> Adapter for BinanceEvmAdapter<P, E, N>
where
    P: Provider,
    E: Environment,
    N: Navigator,
{
    fn name(&self) -> &'static str {
        self.core.name()
    }

    fn url(&self) -> &'static str {
        BINANCE_URL
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
        if self.provider.is_none() {
            return Err(self.wallet_not_found());
        }
        let kind = WalletErrorKind::Connection;
        let accounts = self
            .call(kind, RequestArguments::new("eth_requestAccounts"))
            .await?;
        let address = accounts
            .as_array()
            .and_then(|list| list.first())
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                self.core
                    .fail(WalletError::connection("The wallet returned no account."))
            })?;
        self.chain_id = Some(self.fetch_chain_id(kind).await?);
        self.core.mark_connected(address.clone());
        Ok(address)
    }

    /// EIP-1193 has no revoke call; the session is dropped locally.
    async fn disconnect(&mut self) -> Result<()> {
        self.core.mark_disconnected();
        Ok(())
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let address = self.core.require_address()?;
        let kind = WalletErrorKind::SignMessage;
        let payload = format!("0x{}", hex::encode(message.as_bytes()));
        let result = self
            .call(kind, RequestArguments::with_params("personal_sign", json!([payload, address])))
            .await?;
        result
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                self.core
                    .fail(WalletError::sign_message("The wallet returned no signature."))
            })
    }

    async fn sign_transaction(&self, mut transaction: Value) -> Result<Value> {
        let address = self.core.require_address()?;
        let Some(tx) = transaction.as_object_mut() else {
            return Err(self.core.fail(WalletError::sign_transaction(
                "The transaction must be a JSON object.",
            )));
        };
        tx.entry("from").or_insert_with(|| Value::String(address));
        self.call(
            WalletErrorKind::SignTransaction,
            RequestArguments::with_params("eth_signTransaction", json!([transaction])),
        )
        .await
    }

    async fn switch_chain(&mut self, chain_id: &str) -> Result<()> {
        let kind = WalletErrorKind::SwitchChain;
        self.call(
            kind,
            RequestArguments::with_params(
                "wallet_switchEthereumChain",
                json!([{ "chainId": chain_id }]),
            ),
        )
        .await?;
        self.chain_id = Some(chain_id.to_string());
        self.core.emit(AdapterEvent::ChainChanged(chain_id.to_string()));
        Ok(())
    }

    async fn network(&self) -> Result<Network> {
        let chain_id = self.fetch_chain_id(WalletErrorKind::GetNetwork).await?;
        Ok(Network::from_chain_id(chain_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deeplink::RecordingNavigator;
    use crate::environment::tests::{ANDROID_UA, DESKTOP_UA};
    use crate::environment::BrowserSnapshot;

    const PAGE: &str = "https://dapp.example.com/";

    #[test]
    fn extension_counts_as_support() {
        let env = BrowserSnapshot::browser(DESKTOP_UA, PAGE).with_global("binancew3w");
        assert!(is_binance_extension_installed(&env));
        assert!(support_binance_evm(&env));
    }

    #[test]
    fn in_app_browser_counts_as_support() {
        let flagged = BrowserSnapshot::browser(ANDROID_UA, PAGE).with_flag("ethereum", "isBinance");
        assert!(is_in_binance(&flagged));
        assert!(support_binance_evm(&flagged));

        let by_agent = BrowserSnapshot::browser(format!("{ANDROID_UA} BNC/2.90.0"), PAGE);
        assert!(is_in_binance(&by_agent));
    }

    #[test]
    fn plain_browser_has_no_support() {
        assert!(!support_binance_evm(&BrowserSnapshot::browser(DESKTOP_UA, PAGE)));
        assert!(!support_binance_evm(&BrowserSnapshot::headless().with_global("binancew3w")));
    }

    #[test]
    fn deep_link_from_mobile_browser() {
        let nav = RecordingNavigator::new();
        let env = BrowserSnapshot::browser(ANDROID_UA, PAGE);
        assert!(open_binance_with_deeplink(&env, &nav, 14));

        let opened = nav.opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].0, binance_deep_link(PAGE, 14).bnc);
        assert_eq!(opened[0].1, LinkTarget::Blank);
    }

    #[test]
    fn no_deep_link_inside_binance_or_on_desktop() {
        let nav = RecordingNavigator::new();
        let inside = BrowserSnapshot::browser(ANDROID_UA, PAGE).with_flag("ethereum", "isBinance");
        assert!(!open_binance_with_deeplink(&inside, &nav, 14));
        assert!(!open_binance_with_deeplink(&BrowserSnapshot::browser(DESKTOP_UA, PAGE), &nav, 14));
        assert!(nav.opened().is_empty());
    }
}
