//! Browsing-context detection behind an injectable [`Environment`].
//!
//! Nothing here reads process-global state. Hosts hand in an `Environment`
//! (a live binding in a browser, a [`BrowserSnapshot`] everywhere else), so
//! every predicate is deterministic for a given snapshot.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Read-only view of the page an adapter runs in.
pub trait Environment {
    /// Whether a window/navigator exists at all.
    fn is_browser(&self) -> bool;

    fn user_agent(&self) -> Option<&str>;

    /// Current page URL (`location.href`).
    fn href(&self) -> Option<&str>;

    /// Whether a global object such as `tronLink` or `binancew3w` is injected.
    fn has_global(&self, name: &str) -> bool;

    /// Whether `object.flag` is truthy, e.g. `ethereum.isBinance`.
    fn global_flag(&self, object: &str, flag: &str) -> bool;
}

impl<T: Environment + ?Sized> Environment for &T {
    fn is_browser(&self) -> bool {
        (**self).is_browser()
    }

    fn user_agent(&self) -> Option<&str> {
        (**self).user_agent()
    }

    fn href(&self) -> Option<&str> {
        (**self).href()
    }

    fn has_global(&self, name: &str) -> bool {
        (**self).has_global(name)
    }

    fn global_flag(&self, object: &str, flag: &str) -> bool {
        (**self).global_flag(object, flag)
    }
}

/// Owned snapshot of a browsing context.
///
/// `globals` maps each injected object to the set of its truthy boolean flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserSnapshot {
    pub in_browser: bool,
    pub user_agent: Option<String>,
    pub href: Option<String>,
    pub globals: BTreeMap<String, BTreeSet<String>>,
}

impl BrowserSnapshot {
    /// No window: server-side rendering, tests, native hosts.
    pub fn headless() -> Self {
        Self::default()
    }

    pub fn browser(user_agent: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            in_browser: true,
            user_agent: Some(user_agent.into()),
            href: Some(href.into()),
            globals: BTreeMap::new(),
        }
    }

    pub fn with_global(mut self, name: impl Into<String>) -> Self {
        self.globals.entry(name.into()).or_default();
        self
    }

    pub fn with_flag(mut self, object: impl Into<String>, flag: impl Into<String>) -> Self {
        self.globals.entry(object.into()).or_default().insert(flag.into());
        self
    }
}

impl Environment for BrowserSnapshot {
    fn is_browser(&self) -> bool {
        self.in_browser
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    fn has_global(&self, name: &str) -> bool {
        self.in_browser && self.globals.contains_key(name)
    }

    fn global_flag(&self, object: &str, flag: &str) -> bool {
        self.in_browser
            && self
                .globals
                .get(object)
                .map(|flags| flags.contains(flag))
                .unwrap_or(false)
    }
}

/// Outcome of looking for a wallet's provider.
///
/// Keeps "no browser to look in" apart from "looked, nothing there", which
/// the boolean predicates fold together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    Available,
    NotInstalled,
    NoBrowser,
}

impl Availability {
    pub fn detect(env: &impl Environment, present: impl FnOnce() -> bool) -> Self {
        if !env.is_browser() {
            Availability::NoBrowser
        } else if present() {
            Availability::Available
        } else {
            Availability::NotInstalled
        }
    }

    pub fn is_available(self) -> bool {
        self == Availability::Available
    }
}

const MOBILE_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

pub fn is_in_browser(env: &impl Environment) -> bool {
    env.is_browser()
}

pub fn is_in_mobile_browser(env: &impl Environment) -> bool {
    if !env.is_browser() {
        return false;
    }
    let Some(ua) = env.user_agent() else {
        return false;
    };
    let ua = ua.to_ascii_lowercase();
    MOBILE_MARKERS.iter().any(|marker| ua.contains(marker))
}

/// Case-sensitive user-agent substring check; false outside a browser.
pub fn user_agent_contains(env: &impl Environment, needle: &str) -> bool {
    env.is_browser() && env.user_agent().map(|ua| ua.contains(needle)).unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const DESKTOP_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
    pub(crate) const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148";
    pub(crate) const ANDROID_UA: &str =
        "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Mobile Safari/537.36";

    #[test]
    fn headless_is_not_a_browser() {
        let env = BrowserSnapshot::headless();
        assert!(!is_in_browser(&env));
        assert!(!is_in_mobile_browser(&env));
        assert!(!env.has_global("tronLink"));
    }

    #[test]
    fn detects_mobile_user_agents() {
        assert!(is_in_mobile_browser(&BrowserSnapshot::browser(IPHONE_UA, "https://a.io")));
        assert!(is_in_mobile_browser(&BrowserSnapshot::browser(ANDROID_UA, "https://a.io")));
        assert!(!is_in_mobile_browser(&BrowserSnapshot::browser(DESKTOP_UA, "https://a.io")));
    }

    #[test]
    fn globals_and_flags() {
        let env = BrowserSnapshot::browser(DESKTOP_UA, "https://a.io")
            .with_global("tronLink")
            .with_flag("ethereum", "isBinance");
        assert!(env.has_global("tronLink"));
        assert!(env.has_global("ethereum"));
        assert!(env.global_flag("ethereum", "isBinance"));
        assert!(!env.global_flag("ethereum", "isMetaMask"));
        assert!(!env.global_flag("tronLink", "ready"));
    }

    #[test]
    fn globals_ignored_outside_browser() {
        let mut env = BrowserSnapshot::headless().with_flag("ethereum", "isBinance");
        assert!(!env.has_global("ethereum"));
        assert!(!env.global_flag("ethereum", "isBinance"));
        env.in_browser = true;
        assert!(env.global_flag("ethereum", "isBinance"));
    }

    #[test]
    fn availability_keeps_no_browser_apart() {
        let headless = BrowserSnapshot::headless();
        assert_eq!(Availability::detect(&headless, || true), Availability::NoBrowser);

        let env = BrowserSnapshot::browser(DESKTOP_UA, "https://a.io");
        assert_eq!(Availability::detect(&env, || false), Availability::NotInstalled);
        assert_eq!(Availability::detect(&env, || true), Availability::Available);
    }

    #[test]
    fn snapshot_deserializes_with_defaults() {
        let env: BrowserSnapshot = serde_json::from_str(
            r#"{"inBrowser":true,"userAgent":"x","globals":{"ethereum":["isBinance"]}}"#,
        )
        .unwrap();
        assert!(env.global_flag("ethereum", "isBinance"));
        assert!(env.href.is_none());
    }
}
