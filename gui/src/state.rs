use std::fmt;

use iced::widget::qr_code;
use tronwallet_adapter_core::deeplink::binance_deep_link;
use tronwallet_adapter_core::{AdapterConfig, Availability, BrowserSnapshot, WalletKind};

const DESKTOP_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148";

// -- QR session --

/// A pasted connection URI together with its encoded QR matrix.
pub(crate) struct QrSession {
    pub(crate) uri: String,
    pub(crate) data: qr_code::Data,
}

impl QrSession {
    /// The URI is encoded as given; only surrounding whitespace from the
    /// paste is dropped.
    pub(crate) fn new(uri: &str) -> Result<Self, String> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err("Paste a connection URI first".into());
        }
        let data = qr_code::Data::new(uri).map_err(|e| format!("Cannot encode URI: {e}"))?;
        Ok(Self {
            uri: uri.to_string(),
            data,
        })
    }
}

// -- Simulated page for the deep-link panel --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Device {
    Desktop,
    Mobile,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Desktop => write!(f, "Desktop"),
            Device::Mobile => write!(f, "Mobile"),
        }
    }
}

/// Browser snapshot for `page_url` on `device`, optionally inside `wallet`'s
/// own app browser.
pub(crate) fn simulated_page(
    page_url: &str,
    device: Device,
    wallet: WalletKind,
    inside_wallet: bool,
) -> BrowserSnapshot {
    let ua = match device {
        Device::Desktop => DESKTOP_UA,
        Device::Mobile => MOBILE_UA,
    };
    if !inside_wallet {
        return BrowserSnapshot::browser(ua, page_url);
    }
    match wallet {
        WalletKind::MetamaskTron => {
            BrowserSnapshot::browser(format!("{ua} MetaMaskMobile"), page_url)
                .with_global("ReactNativeWebView")
                .with_flag("ethereum", "isMetaMask")
        }
        WalletKind::BinanceEvm => {
            BrowserSnapshot::browser(format!("{ua} BNC/2.90.0"), page_url)
                .with_flag("ethereum", "isBinance")
        }
    }
}

/// What the deep-link panel shows for one wallet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinkPreview {
    pub(crate) availability: Availability,
    pub(crate) in_app: bool,
    pub(crate) link: String,
    /// Browser fallback for users without the app (Binance only).
    pub(crate) fallback: Option<String>,
}

impl LinkPreview {
    pub(crate) fn new(
        wallet: WalletKind,
        env: &BrowserSnapshot,
        page_url: &str,
        config: &AdapterConfig,
    ) -> Self {
        let fallback = match wallet {
            WalletKind::BinanceEvm => {
                Some(binance_deep_link(page_url, config.binance_deeplink_chain_id).http)
            }
            WalletKind::MetamaskTron => None,
        };
        Self {
            availability: wallet.availability(env),
            in_app: wallet.is_in_app(env),
            link: wallet.deep_link(page_url, config),
            fallback,
        }
    }

    pub(crate) fn availability_label(&self) -> &'static str {
        match self.availability {
            Availability::Available => "Provider available",
            Availability::NotInstalled => "Not installed",
            Availability::NoBrowser => "No browser",
        }
    }
}
