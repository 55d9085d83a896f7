use crate::state::Device;
use tronwallet_adapter_core::WalletKind;

// -- Messages --

#[derive(Debug, Clone)]
pub(crate) enum Message {
    // QR session
    UriChanged(String),
    ShowQr,
    CloseQr,
    CopyUri,

    // Deep links
    PageUrlChanged(String),
    WalletSelected(WalletKind),
    DeviceSelected(Device),
    InsideWalletToggled(bool),
    CopyLink,
    OpenInApp,
    OpenWalletSite,
}
