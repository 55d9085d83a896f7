mod deeplink;
pub(crate) mod qr_modal;
mod session;
