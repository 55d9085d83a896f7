pub mod adapter;
pub mod adapters;
pub mod caip;
pub mod config;
pub mod deeplink;
pub mod environment;
pub mod error;
pub mod event;
pub mod network;
pub mod provider;

pub use adapter::{Adapter, AdapterCore, AdapterEvent, AdapterState, WalletReadyState};
pub use adapters::binance_evm::{
    is_binance_extension_installed, is_in_binance, open_binance_with_deeplink,
    support_binance_evm, BinanceEvmAdapter,
};
pub use adapters::metamask_tron::{
    is_metamask_mobile_webview, open_metamask_app, MetaMaskTronAdapter,
};
pub use adapters::WalletKind;
pub use caip::{get_address_from_caip_account_id, CaipAccountId};
pub use config::AdapterConfig;
pub use deeplink::{LinkTarget, Navigator, RecordingNavigator};
pub use environment::{
    is_in_browser, is_in_mobile_browser, Availability, BrowserSnapshot, Environment,
};
pub use error::{ChainError, EventError, ProviderError, Result, WalletError, WalletErrorKind};
pub use event::{is_account_changed_event, is_session_changed_event, Eip1193Event, MultichainEvent};
pub use network::{
    chain_id_to_scope, scope_to_chain_id, scope_to_network_type, Network, NetworkType, Scope,
};
pub use provider::{Provider, RequestArguments, Session, SessionScope};
