//! Concrete wallet adapters and a registry of the wallets they cover.

pub mod binance_evm;
pub mod metamask_tron;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::AdapterConfig;
use crate::deeplink::{binance_deep_link, metamask_dapp_link, Navigator};
use crate::environment::{Availability, Environment};
use crate::error::{WalletError, WalletErrorKind};

pub use binance_evm::BinanceEvmAdapter;
pub use metamask_tron::MetaMaskTronAdapter;

/// Wallets with an adapter in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletKind {
    MetamaskTron,
    BinanceEvm,
}

impl WalletKind {
    pub const ALL: [WalletKind; 2] = [WalletKind::MetamaskTron, WalletKind::BinanceEvm];

    pub fn name(self) -> &'static str {
        match self {
            WalletKind::MetamaskTron => metamask_tron::METAMASK_TRON_NAME,
            WalletKind::BinanceEvm => binance_evm::BINANCE_EVM_NAME,
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            WalletKind::MetamaskTron => metamask_tron::METAMASK_URL,
            WalletKind::BinanceEvm => binance_evm::BINANCE_URL,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            WalletKind::MetamaskTron => "metamask-tron",
            WalletKind::BinanceEvm => "binance-evm",
        }
    }

    /// Whether the wallet's provider can be expected in `env`.
    pub fn availability(self, env: &impl Environment) -> Availability {
        Availability::detect(env, || match self {
            WalletKind::MetamaskTron => metamask_tron::is_metamask_available(env),
            WalletKind::BinanceEvm => binance_evm::support_binance_evm(env),
        })
    }

    /// Whether `env` is the wallet's own embedded browser.
    pub fn is_in_app(self, env: &impl Environment) -> bool {
        match self {
            WalletKind::MetamaskTron => metamask_tron::is_metamask_mobile_webview(env),
            WalletKind::BinanceEvm => binance_evm::is_in_binance(env),
        }
    }

    /// Deep link that reopens `href` inside the wallet app.
    pub fn deep_link(self, href: &str, config: &AdapterConfig) -> String {
        match self {
            WalletKind::MetamaskTron => metamask_dapp_link(href),
            WalletKind::BinanceEvm => binance_deep_link(href, config.binance_deeplink_chain_id).bnc,
        }
    }

    /// Navigate into the wallet app when the environment calls for it.
    pub fn open_app(
        self,
        env: &impl Environment,
        navigator: &impl Navigator,
        config: &AdapterConfig,
    ) -> bool {
        match self {
            WalletKind::MetamaskTron => metamask_tron::open_metamask_app(env, navigator),
            WalletKind::BinanceEvm => binance_evm::open_binance_with_deeplink(
                env,
                navigator,
                config.binance_deeplink_chain_id,
            ),
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for WalletKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metamask" | "metamask-tron" => Ok(WalletKind::MetamaskTron),
            "binance" | "binance-evm" => Ok(WalletKind::BinanceEvm),
            other => Err(WalletError::with_message(
                WalletErrorKind::NotFound,
                format!("Unknown wallet '{other}'. Expected one of: metamask-tron, binance-evm."),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deeplink::RecordingNavigator;
    use crate::environment::tests::{DESKTOP_UA, IPHONE_UA};
    use crate::environment::BrowserSnapshot;

    #[test]
    fn parse_wallet_kind() {
        assert_eq!("MetaMask".parse::<WalletKind>().unwrap(), WalletKind::MetamaskTron);
        assert_eq!("binance-evm".parse::<WalletKind>().unwrap(), WalletKind::BinanceEvm);

        let err = "phantom".parse::<WalletKind>().unwrap_err();
        assert!(err.is(WalletErrorKind::NotFound));
        assert!(err.message().contains("phantom"));
    }

    #[test]
    fn slug_round_trips() {
        for kind in WalletKind::ALL {
            assert_eq!(kind.slug().parse::<WalletKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.slug());
        }
    }

    #[test]
    fn availability_per_wallet() {
        let env = BrowserSnapshot::browser(DESKTOP_UA, "https://a.io").with_global("binancew3w");
        assert_eq!(WalletKind::BinanceEvm.availability(&env), Availability::Available);
        assert_eq!(WalletKind::MetamaskTron.availability(&env), Availability::NotInstalled);
        assert_eq!(
            WalletKind::MetamaskTron.availability(&BrowserSnapshot::headless()),
            Availability::NoBrowser
        );
    }

    #[test]
    fn open_app_dispatches() {
        let config = AdapterConfig::default();
        let env = BrowserSnapshot::browser(IPHONE_UA, "https://a.io/x");
        let nav = RecordingNavigator::new();

        assert!(WalletKind::MetamaskTron.open_app(&env, &nav, &config));
        assert_eq!(
            nav.last_url().as_deref(),
            Some(WalletKind::MetamaskTron.deep_link("https://a.io/x", &config).as_str())
        );

        assert!(WalletKind::BinanceEvm.open_app(&env, &nav, &config));
        assert_eq!(
            nav.last_url().unwrap(),
            WalletKind::BinanceEvm.deep_link("https://a.io/x", &config)
        );
    }
}
