use std::cell::RefCell;

use iced::Task;
use tronwallet_adapter_core::{LinkTarget, Navigator};

use crate::messages::Message;
use crate::state::{simulated_page, LinkPreview, QrSession};
use crate::App;

/// Sends links to the desktop's URL handler, remembering the last failure.
#[derive(Default)]
struct DesktopNavigator {
    failure: RefCell<Option<String>>,
}

impl Navigator for DesktopNavigator {
    fn open(&self, url: &str, target: LinkTarget) {
        tracing::info!(url, target = target.as_str(), "opening link");
        if let Err(e) = open::that(url) {
            *self.failure.borrow_mut() = Some(format!("Failed to open link: {e}"));
        }
    }
}

impl App {
    // -- Update --

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UriChanged(uri) => {
                self.uri_input = uri;
                Task::none()
            }

            Message::ShowQr => {
                self.clear_messages();
                match QrSession::new(&self.uri_input) {
                    Ok(session) => {
                        tracing::debug!(len = session.uri.len(), "showing session QR");
                        self.qr_session = Some(session);
                        self.qr_open = true;
                    }
                    Err(e) => self.error_message = Some(e),
                }
                Task::none()
            }

            Message::CloseQr => {
                self.qr_open = false;
                Task::none()
            }

            Message::CopyUri => {
                if let Some(uri) = self.qr_session.as_ref().map(|s| s.uri.clone()) {
                    self.copy(&uri, "URI copied");
                }
                Task::none()
            }

            Message::PageUrlChanged(url) => {
                self.page_url = url;
                Task::none()
            }

            Message::WalletSelected(wallet) => {
                self.wallet = wallet;
                self.clear_messages();
                Task::none()
            }

            Message::DeviceSelected(device) => {
                self.device = device;
                self.clear_messages();
                Task::none()
            }

            Message::InsideWalletToggled(inside) => {
                self.inside_wallet = inside;
                self.clear_messages();
                Task::none()
            }

            Message::CopyLink => {
                let link = self.link_preview().link;
                self.copy(&link, "Deep link copied");
                Task::none()
            }

            Message::OpenInApp => {
                self.clear_messages();
                let env = simulated_page(&self.page_url, self.device, self.wallet, self.inside_wallet);
                let navigator = DesktopNavigator::default();
                let navigated = self.wallet.open_app(&env, &navigator, &self.config);
                if let Some(e) = navigator.failure.take() {
                    self.error_message = Some(e);
                } else if navigated {
                    self.status_message = Some(format!("Opened in {}", self.wallet.name()));
                } else if self.inside_wallet {
                    self.status_message =
                        Some(format!("Already inside {}, nothing to open", self.wallet.name()));
                } else {
                    self.status_message =
                        Some("Deep links are only followed from mobile browsers".into());
                }
                Task::none()
            }

            Message::OpenWalletSite => {
                let navigator = DesktopNavigator::default();
                navigator.open(self.wallet.url(), LinkTarget::Blank);
                if let Some(e) = navigator.failure.take() {
                    self.error_message = Some(e);
                }
                Task::none()
            }
        }
    }

    pub(crate) fn link_preview(&self) -> LinkPreview {
        let env = simulated_page(&self.page_url, self.device, self.wallet, self.inside_wallet);
        LinkPreview::new(self.wallet, &env, &self.page_url, &self.config)
    }

    fn copy(&mut self, value: &str, done: &str) {
        if let Some(cb) = &mut self.clipboard {
            match cb.set_text(value) {
                Ok(_) => self.status_message = Some(done.into()),
                Err(e) => self.error_message = Some(format!("Copy failed: {e}")),
            }
        } else {
            self.error_message = Some("Clipboard not available".into());
        }
    }

    fn clear_messages(&mut self) {
        self.error_message = None;
        self.status_message = None;
    }
}
