//! Modal that shows a connection URI as a scannable QR code.
//!
//! The modal owns no state: whether it is open and the session (URI plus its
//! encoded matrix) come from the caller, and closing it only hands back the
//! caller's `on_close` message.

use iced::widget::{button, center, column, container, mouse_area, opaque, qr_code, row, text, Space};
use iced::{Element, Fill, Length};

use crate::state::QrSession;
use crate::{styles, MUTED};

const TITLE: &str = "Scan with Wallet";
const HINT: &str = "Scan this QR code with your WalletConnect-compatible wallet";
const DEFAULT_CELL_SIZE: u16 = 6;

pub(crate) struct QrCodeModal<'a, M> {
    open: bool,
    session: Option<&'a QrSession>,
    cell_size: u16,
    on_close: M,
}

impl<'a, M: Clone + 'a> QrCodeModal<'a, M> {
    pub(crate) fn new(open: bool, session: Option<&'a QrSession>, on_close: M) -> Self {
        Self {
            open,
            session,
            cell_size: DEFAULT_CELL_SIZE,
            on_close,
        }
    }

    pub(crate) fn cell_size(mut self, cell_size: u16) -> Self {
        self.cell_size = cell_size.max(1);
        self
    }

    /// The exact string rendered into the code while open.
    pub(crate) fn payload(&self) -> Option<&'a str> {
        self.session
            .filter(|_| self.open)
            .map(|session| session.uri.as_str())
    }

    /// The single message a dismissal produces; `None` when nothing is shown.
    pub(crate) fn dismiss(&self) -> Option<M> {
        self.payload().map(|_| self.on_close.clone())
    }

    /// Overlay layer to stack above the page, `None` while closed.
    pub(crate) fn view(self) -> Option<Element<'a, M>> {
        let session = self.session.filter(|_| self.open)?;

        let close = button(text("Close").size(13))
            .padding([6, 12])
            .style(styles::btn_ghost)
            .on_press(self.on_close.clone());

        let header = row![text(TITLE).size(18).font(styles::BOLD), Space::new().width(Fill), close]
            .align_y(iced::Alignment::Center);

        let code = container(qr_code(&session.data).cell_size(u32::from(self.cell_size)))
            .padding(16)
            .style(styles::qr_frame);

        let body = column![
            header,
            Space::new().height(4),
            container(code).center_x(Fill),
            text(HINT).size(13).color(MUTED).center().width(Fill),
        ]
        .spacing(12);

        let card = container(body)
            .padding(24)
            .width(Length::Fixed(420.0))
            .style(styles::card);

        // Clicks on the card stay inside; clicks on the backdrop close.
        let layer = mouse_area(center(opaque(card)).style(styles::backdrop)).on_press(self.on_close);
        Some(opaque(layer))
    }
}
