//! Parsing of provider event payloads into typed events.
//!
//! Payloads arrive as untyped JSON. Each parser either returns a fully
//! validated variant or an [`EventError`]; there is no "looks roughly right"
//! fallthrough.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{EventError, ProviderError};
use crate::provider::Session;

const WALLET_NOTIFY: &str = "wallet_notify";
const WALLET_SESSION_CHANGED: &str = "wallet_sessionChanged";
const METAMASK_ACCOUNTS_CHANGED: &str = "metamask_accountsChanged";

/// Event delivered on a multichain provider's message channel.
#[derive(Debug, Clone, PartialEq)]
pub enum MultichainEvent {
    /// `wallet_notify` carrying `metamask_accountsChanged`.
    AccountsChanged {
        scope: Option<String>,
        accounts: Vec<String>,
    },
    /// Any other `wallet_notify` notification.
    Notification {
        scope: Option<String>,
        method: String,
        params: Value,
    },
    /// `wallet_sessionChanged`.
    SessionChanged(Session),
}

#[derive(Deserialize)]
struct NotifyParams {
    #[serde(default)]
    scope: Option<String>,
    notification: Notification,
}

#[derive(Deserialize)]
struct Notification {
    method: String,
    #[serde(default)]
    params: Value,
}

impl MultichainEvent {
    pub fn parse(payload: &Value) -> Result<Self, EventError> {
        let (method, params) = split_method(payload)?;
        match method {
            WALLET_NOTIFY => {
                let notify: NotifyParams = decode(method, params)?;
                if notify.notification.method == METAMASK_ACCOUNTS_CHANGED {
                    let accounts: Vec<String> =
                        decode(METAMASK_ACCOUNTS_CHANGED, &notify.notification.params)?;
                    Ok(MultichainEvent::AccountsChanged {
                        scope: notify.scope,
                        accounts,
                    })
                } else {
                    Ok(MultichainEvent::Notification {
                        scope: notify.scope,
                        method: notify.notification.method,
                        params: notify.notification.params,
                    })
                }
            }
            WALLET_SESSION_CHANGED => Ok(MultichainEvent::SessionChanged(decode(method, params)?)),
            other => Err(EventError::UnknownMethod(other.to_string())),
        }
    }
}

/// Event emitted by an EIP-1193 provider, keyed by event name.
#[derive(Debug, Clone, PartialEq)]
pub enum Eip1193Event {
    AccountsChanged(Vec<String>),
    ChainChanged(String),
    Connect { chain_id: String },
    Disconnect(ProviderError),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectInfo {
    chain_id: String,
}

impl Eip1193Event {
    pub fn parse(event: &str, payload: &Value) -> Result<Self, EventError> {
        match event {
            "accountsChanged" => Ok(Eip1193Event::AccountsChanged(decode(event, payload)?)),
            "chainChanged" => Ok(Eip1193Event::ChainChanged(decode(event, payload)?)),
            "connect" => {
                let info: ConnectInfo = decode(event, payload)?;
                Ok(Eip1193Event::Connect {
                    chain_id: info.chain_id,
                })
            }
            "disconnect" => Ok(Eip1193Event::Disconnect(decode(event, payload)?)),
            other => Err(EventError::UnknownMethod(other.to_string())),
        }
    }
}

/// Whether `payload` is a `wallet_notify` carrying `metamask_accountsChanged`.
pub fn is_account_changed_event(payload: &Value) -> bool {
    matches!(
        MultichainEvent::parse(payload),
        Ok(MultichainEvent::AccountsChanged { .. })
    )
}

pub fn is_session_changed_event(payload: &Value) -> bool {
    matches!(
        MultichainEvent::parse(payload),
        Ok(MultichainEvent::SessionChanged(_))
    )
}

fn split_method(payload: &Value) -> Result<(&str, &Value), EventError> {
    let obj = payload.as_object().ok_or(EventError::NotAnObject)?;
    let method = obj
        .get("method")
        .and_then(Value::as_str)
        .ok_or(EventError::MissingMethod)?;
    Ok((method, obj.get("params").unwrap_or(&Value::Null)))
}

fn decode<T: DeserializeOwned>(method: &str, value: &Value) -> Result<T, EventError> {
    T::deserialize(value).map_err(|e| EventError::Malformed {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn accounts_changed() -> Value {
        json!({
            "method": "wallet_notify",
            "params": {
                "scope": "tron:728126428",
                "notification": {
                    "method": "metamask_accountsChanged",
                    "params": ["TAbc"]
                }
            }
        })
    }

    #[test]
    fn parses_accounts_changed() {
        let event = MultichainEvent::parse(&accounts_changed()).unwrap();
        assert_eq!(
            event,
            MultichainEvent::AccountsChanged {
                scope: Some("tron:728126428".into()),
                accounts: vec!["TAbc".into()],
            }
        );
        assert!(is_account_changed_event(&accounts_changed()));
        assert!(!is_session_changed_event(&accounts_changed()));
    }

    #[test]
    fn other_notifications_pass_through() {
        let payload = json!({
            "method": "wallet_notify",
            "params": { "notification": { "method": "metamask_chainChanged", "params": { "x": 1 } } }
        });
        match MultichainEvent::parse(&payload).unwrap() {
            MultichainEvent::Notification { method, scope, params } => {
                assert_eq!(method, "metamask_chainChanged");
                assert!(scope.is_none());
                assert_eq!(params["x"], 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn parses_session_changed() {
        let payload = json!({
            "method": "wallet_sessionChanged",
            "params": { "sessionScopes": { "tron:3448148188": { "accounts": ["tron:3448148188:TNile"] } } }
        });
        assert!(is_session_changed_event(&payload));
        match MultichainEvent::parse(&payload).unwrap() {
            MultichainEvent::SessionChanged(session) => {
                assert_eq!(session.addresses(crate::Scope::Nile), vec!["TNile".to_string()]);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert_eq!(MultichainEvent::parse(&json!("x")), Err(EventError::NotAnObject));
        assert_eq!(MultichainEvent::parse(&json!({})), Err(EventError::MissingMethod));
        assert_eq!(
            MultichainEvent::parse(&json!({ "method": "foo" })),
            Err(EventError::UnknownMethod("foo".into()))
        );
        assert!(matches!(
            MultichainEvent::parse(&json!({ "method": "wallet_notify", "params": {} })),
            Err(EventError::Malformed { .. })
        ));
        assert!(matches!(
            MultichainEvent::parse(&json!({
                "method": "wallet_notify",
                "params": { "notification": { "method": "metamask_accountsChanged", "params": "TAbc" } }
            })),
            Err(EventError::Malformed { .. })
        ));
        assert!(!is_account_changed_event(&json!(null)));
    }

    #[test]
    fn parses_eip1193_events() {
        assert_eq!(
            Eip1193Event::parse("accountsChanged", &json!(["0xabc"])).unwrap(),
            Eip1193Event::AccountsChanged(vec!["0xabc".into()])
        );
        assert_eq!(
            Eip1193Event::parse("chainChanged", &json!("0x38")).unwrap(),
            Eip1193Event::ChainChanged("0x38".into())
        );
        assert_eq!(
            Eip1193Event::parse("connect", &json!({ "chainId": "0x1" })).unwrap(),
            Eip1193Event::Connect { chain_id: "0x1".into() }
        );
        match Eip1193Event::parse("disconnect", &json!({ "code": 4900, "message": "bye" })).unwrap() {
            Eip1193Event::Disconnect(err) => assert_eq!(err.code, 4900),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_eip1193_events() {
        assert!(Eip1193Event::parse("chainChanged", &json!(56)).is_err());
        assert!(Eip1193Event::parse("message", &json!({})).is_err());
    }
}
