//! Deep links that reopen the current page inside a wallet's mobile app.

use std::cell::RefCell;

use base64ct::{Base64, Encoding};

const METAMASK_DAPP_BASE: &str = "https://link.metamask.io/dapp/";

const BINANCE_MINI_APP_BASE: &str = "bnc://app.binance.com/mp/app";
const BINANCE_APP_ID: &str = "yFK5FCqYprrXDiVFbhyRx7";
const BINANCE_BROWSER_PAGE: &str = "/pages/browser/index";
const BINANCE_DOWNLOAD: &str = "https://app.binance.com/en/download";

/// Where a navigation should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// Replace the current page (`_self`).
    SelfFrame,
    /// Open a new browsing context (`_blank`).
    Blank,
}

impl LinkTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkTarget::SelfFrame => "_self",
            LinkTarget::Blank => "_blank",
        }
    }
}

/// The one side effect deep linking has: navigating somewhere.
pub trait Navigator {
    fn open(&self, url: &str, target: LinkTarget);
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn open(&self, url: &str, target: LinkTarget) {
        (**self).open(url, target)
    }
}

/// Navigator that only records what it was asked to open.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    opened: RefCell<Vec<(String, LinkTarget)>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<(String, LinkTarget)> {
        self.opened.borrow().clone()
    }

    pub fn last_url(&self) -> Option<String> {
        self.opened.borrow().last().map(|(url, _)| url.clone())
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, url: &str, target: LinkTarget) {
        tracing::debug!(url, target = target.as_str(), "navigation recorded");
        self.opened.borrow_mut().push((url.to_string(), target));
    }
}

/// Drop the `scheme://` prefix, keeping host, path, query and fragment.
pub fn strip_scheme(href: &str) -> &str {
    match href.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => href,
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// `https://link.metamask.io/dapp/<host-and-path>`
pub fn metamask_dapp_link(href: &str) -> String {
    format!("{METAMASK_DAPP_BASE}{}", strip_scheme(href))
}

/// Both forms of a Binance Web3 wallet deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinanceDeepLink {
    /// `bnc://` link that opens the in-app browser directly.
    pub bnc: String,
    /// Download page carrying the `bnc` link, for devices without the app.
    pub http: String,
}

pub fn binance_deep_link(href: &str, chain_id: u64) -> BinanceDeepLink {
    let start_page_path = Base64::encode_string(BINANCE_BROWSER_PAGE.as_bytes());
    let start_page_query =
        Base64::encode_string(format!("url={href}&defaultChainId={chain_id}").as_bytes());
    let bnc = format!(
        "{BINANCE_MINI_APP_BASE}?appId={BINANCE_APP_ID}&startPagePath={start_page_path}&startPageQuery={start_page_query}"
    );
    let http = format!("{BINANCE_DOWNLOAD}?_dp={}", Base64::encode_string(bnc.as_bytes()));
    BinanceDeepLink { bnc, http }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_http_schemes() {
        assert_eq!(strip_scheme("https://dapp.io/swap?x=1#top"), "dapp.io/swap?x=1#top");
        assert_eq!(strip_scheme("http://localhost:3000/"), "localhost:3000/");
    }

    #[test]
    fn leaves_scheme_less_input_alone() {
        assert_eq!(strip_scheme("dapp.io/path"), "dapp.io/path");
        assert_eq!(strip_scheme("dapp.io/?next=https://x.io"), "dapp.io/?next=https://x.io");
    }

    #[test]
    fn metamask_link_matches_template() {
        assert_eq!(
            metamask_dapp_link("https://app.example.com/trade?pair=TRX"),
            "https://link.metamask.io/dapp/app.example.com/trade?pair=TRX"
        );
    }

    #[test]
    fn binance_link_encodes_page_and_chain() {
        let link = binance_deep_link("https://app.example.com/", 14);
        assert!(link.bnc.starts_with(
            "bnc://app.binance.com/mp/app?appId=yFK5FCqYprrXDiVFbhyRx7&startPagePath="
        ));

        let query = link.bnc.split("startPageQuery=").nth(1).unwrap();
        let decoded = Base64::decode_vec(query).unwrap();
        assert_eq!(
            String::from_utf8(decoded).unwrap(),
            "url=https://app.example.com/&defaultChainId=14"
        );

        let path = link
            .bnc
            .split("startPagePath=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap();
        assert_eq!(Base64::decode_vec(path).unwrap(), b"/pages/browser/index");
    }

    #[test]
    fn binance_http_wraps_bnc() {
        let link = binance_deep_link("https://app.example.com/", 56);
        let dp = link.http.strip_prefix("https://app.binance.com/en/download?_dp=").unwrap();
        assert_eq!(Base64::decode_vec(dp).unwrap(), link.bnc.as_bytes());
    }

    #[test]
    fn recording_navigator_keeps_order() {
        let nav = RecordingNavigator::new();
        nav.open("https://a.io", LinkTarget::Blank);
        nav.open("https://b.io", LinkTarget::SelfFrame);
        assert_eq!(nav.opened().len(), 2);
        assert_eq!(nav.last_url().as_deref(), Some("https://b.io"));
        assert_eq!(nav.opened()[0].1, LinkTarget::Blank);
    }
}
