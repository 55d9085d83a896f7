mod messages;
mod state;
mod styles;
mod update;
mod views;

use iced::theme::Palette;
use iced::widget::{column, container, stack, text, Space};
use iced::{Color, Element, Fill, Length, Task, Theme};

use tronwallet_adapter_core::{AdapterConfig, WalletKind};

use messages::Message;
use state::{Device, QrSession};
use views::qr_modal::QrCodeModal;

// Dark palette with Tron red as the accent colour
const BG: Color = Color::from_rgb(0.063, 0.063, 0.078); // #101014
const SURFACE: Color = Color::from_rgb(0.118, 0.118, 0.141); // #1e1e24
const BORDER: Color = Color::from_rgb(0.220, 0.220, 0.259); // #383842
const ACTIVE: Color = Color::from_rgb(0.165, 0.133, 0.149); // #2a2226
const MUTED: Color = Color::from_rgb(0.549, 0.549, 0.600); // #8c8c99
const PRIMARY: Color = Color::from_rgb(0.922, 0.0, 0.161); // #eb0029

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    iced::application(App::new, App::update, App::view)
        .title("Tron Wallet Adapter Demo")
        .theme(App::theme)
        .run()
}

// -- App state --

struct App {
    config: AdapterConfig,

    // QR session
    uri_input: String,
    qr_session: Option<QrSession>,
    qr_open: bool,

    // Deep-link panel
    page_url: String,
    wallet: WalletKind,
    device: Device,
    inside_wallet: bool,

    // UI state
    clipboard: Option<arboard::Clipboard>,
    error_message: Option<String>,
    status_message: Option<String>,

    theme: Theme,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let config = Self::load_config();
        let app = Self {
            config,
            uri_input: String::new(),
            qr_session: None,
            qr_open: false,
            page_url: String::from("https://dapp.example.com/"),
            wallet: WalletKind::MetamaskTron,
            device: Device::Mobile,
            inside_wallet: false,
            clipboard: arboard::Clipboard::new().ok(),
            error_message: None,
            status_message: None,
            theme: Theme::custom(
                "Tron".to_string(),
                Palette {
                    background: BG,
                    text: Color::from_rgb(0.961, 0.961, 0.969),
                    primary: PRIMARY,
                    success: styles::ACCENT,
                    warning: Color::from_rgb(1.0, 0.757, 0.027),
                    danger: styles::DANGER,
                },
            ),
        };
        (app, Task::none())
    }

    /// A broken config file is reported and replaced by the defaults.
    fn load_config() -> AdapterConfig {
        let loaded = AdapterConfig::default_path().and_then(|path| AdapterConfig::load(&path));
        match loaded {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e:#}");
                AdapterConfig::default()
            }
        }
    }

    fn theme(&self) -> Theme {
        self.theme.clone()
    }

    // -- Views --

    fn view(&self) -> Element<'_, Message> {
        let title = text("Wallet Adapter Demo").size(24).font(styles::BOLD);

        let mut content = column![
            title,
            self.view_session(),
            self.view_deeplink(),
        ]
        .spacing(20)
        .max_width(640);

        if let Some(msg) = &self.error_message {
            content = content.push(text(msg.as_str()).size(13).color(styles::DANGER));
        } else if let Some(msg) = &self.status_message {
            content = content.push(text(msg.as_str()).size(13).color(styles::ACCENT));
        }

        let base = container(column![content, Space::new().height(Length::Fill)])
            .center_x(Fill)
            .padding(24);

        let modal = QrCodeModal::new(self.qr_open, self.qr_session.as_ref(), Message::CloseQr)
            .cell_size(self.config.qr_cell_size);

        match modal.view() {
            Some(overlay) => stack![base, overlay].into(),
            None => base.into(),
        }
    }
}
