//! Text and JSON rendering of command results.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::json;
use tronwallet_adapter_core::{
    is_in_browser, is_in_mobile_browser, AdapterConfig, Availability, BrowserSnapshot,
    CaipAccountId, Scope, WalletErrorKind, WalletKind,
};

pub fn scope(scope: Scope, as_json: bool) -> String {
    if as_json {
        return json!({
            "scope": scope,
            "chainId": scope.chain_id(),
            "network": scope.name(),
        })
        .to_string();
    }
    format!("{} ({})", scope.as_caip(), scope.name())
}

pub fn chain_id(raw_scope: &str, chain_id: &str, as_json: bool) -> String {
    if as_json {
        return json!({ "scope": raw_scope, "chainId": chain_id }).to_string();
    }
    chain_id.to_string()
}

pub fn account(account: &CaipAccountId, as_json: bool) -> String {
    let scope = account.scope().ok();
    if as_json {
        return json!({
            "namespace": account.namespace,
            "reference": account.reference,
            "address": account.address,
            "scope": scope,
        })
        .to_string();
    }
    match scope {
        Some(scope) => format!("{} (on {})", account.address, scope.name()),
        None => account.address.clone(),
    }
}

pub fn deep_link(wallet: WalletKind, link: &str, fallback: Option<&str>, as_json: bool) -> String {
    if as_json {
        return json!({ "wallet": wallet, "link": link, "fallback": fallback }).to_string();
    }
    match fallback {
        Some(fallback) => format!("{link}\nWithout the app: {fallback}"),
        None => link.to_string(),
    }
}

fn availability_label(availability: Availability) -> &'static str {
    match availability {
        Availability::Available => "available",
        Availability::NotInstalled => "not installed",
        Availability::NoBrowser => "no browser",
    }
}

pub fn detection(env: &BrowserSnapshot, config: &AdapterConfig, as_json: bool) -> String {
    let href = env.href.clone().unwrap_or_default();
    if as_json {
        let wallets: Vec<_> = WalletKind::ALL
            .iter()
            .map(|kind| {
                json!({
                    "wallet": kind,
                    "name": kind.name(),
                    "availability": kind.availability(env),
                    "inApp": kind.is_in_app(env),
                    "deepLink": kind.deep_link(&href, config),
                })
            })
            .collect();
        return json!({
            "browser": is_in_browser(env),
            "mobile": is_in_mobile_browser(env),
            "wallets": wallets,
        })
        .to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Browser: {}  Mobile: {}",
        yes_no(is_in_browser(env)),
        yes_no(is_in_mobile_browser(env))
    );
    for kind in WalletKind::ALL {
        let _ = write!(
            out,
            "\n  {:<16} {:<14}",
            kind.name(),
            availability_label(kind.availability(env))
        );
        if kind.is_in_app(env) {
            out.push_str(" (in-app browser)");
        } else if is_in_mobile_browser(env) && !kind.availability(env).is_available() {
            let _ = write!(out, " -> {}", kind.deep_link(&href, config));
        }
    }
    out
}

pub fn config(config: &AdapterConfig, path: &Path, as_json: bool) -> Result<String> {
    if as_json {
        return Ok(serde_json::to_string_pretty(config)?);
    }
    Ok(format!(
        "Config:            {}\n\
         Default scope:     {} ({})\n\
         Open wallet URL:   {}\n\
         Deep link to app:  {}\n\
         Binance chain id:  {}\n\
         QR cell size:      {}",
        path.display(),
        config.default_scope.as_caip(),
        config.default_scope.name(),
        yes_no(config.open_url_when_wallet_not_found),
        yes_no(config.open_app_with_deeplink),
        config.binance_deeplink_chain_id,
        config.qr_cell_size,
    ))
}

pub fn error_kinds(as_json: bool) -> String {
    if as_json {
        let kinds: Vec<_> = WalletErrorKind::ALL
            .iter()
            .map(|kind| json!({ "name": kind.tag(), "defaultMessage": kind.default_message() }))
            .collect();
        return serde_json::Value::Array(kinds).to_string();
    }
    WalletErrorKind::ALL
        .iter()
        .map(|kind| match kind.default_message() {
            "" => kind.tag().to_string(),
            message => format!("{:<28} {message}", kind.tag()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) Mobile/15E148";

    #[test]
    fn scope_json_carries_chain_id() {
        let out: serde_json::Value = serde_json::from_str(&scope(Scope::Nile, true)).unwrap();
        assert_eq!(out["scope"], "tron:3448148188");
        assert_eq!(out["chainId"], "0xcd8690dc");
        assert_eq!(out["network"], "nile");
    }

    #[test]
    fn account_mentions_known_network() {
        let parsed = CaipAccountId::parse("tron:728126428:TAbc").unwrap();
        assert_eq!(account(&parsed, false), "TAbc (on mainnet)");

        let foreign = CaipAccountId::parse("eip155:1:0xabc").unwrap();
        assert_eq!(account(&foreign, false), "0xabc");
        let out: serde_json::Value = serde_json::from_str(&account(&foreign, true)).unwrap();
        assert!(out["scope"].is_null());
    }

    #[test]
    fn mobile_detection_suggests_deep_links() {
        let env = BrowserSnapshot::browser(IPHONE_UA, "https://a.io/");
        let out = detection(&env, &AdapterConfig::default(), false);
        assert!(out.starts_with("Browser: yes  Mobile: yes"));
        assert!(out.contains("https://link.metamask.io/dapp/a.io/"));
        assert!(out.contains("bnc://app.binance.com/mp/app?"));
    }

    #[test]
    fn headless_detection() {
        let out: serde_json::Value = serde_json::from_str(&detection(
            &BrowserSnapshot::headless(),
            &AdapterConfig::default(),
            true,
        ))
        .unwrap();
        assert_eq!(out["browser"], false);
        assert_eq!(out["wallets"][0]["availability"], "noBrowser");
    }

    #[test]
    fn error_listing_includes_defaults() {
        let out = error_kinds(false);
        assert!(out.contains("WalletNotFoundError"));
        assert!(out.contains("The wallet is not found."));
        assert_eq!(out.lines().count(), WalletErrorKind::ALL.len());
    }
}
