use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Element, Fill, Font};

use crate::messages::Message;
use crate::{styles, App, MUTED};

impl App {
    pub(crate) fn view_session(&self) -> Element<'_, Message> {
        let uri = text_input("wc:...@2?relay-protocol=irn&symKey=...", &self.uri_input)
            .on_input(Message::UriChanged)
            .on_submit(Message::ShowQr)
            .font(Font::MONOSPACE)
            .size(13);

        let mut show = button(text("Show QR").size(14))
            .padding([10, 20])
            .style(styles::btn_primary);
        if !self.uri_input.trim().is_empty() {
            show = show.on_press(Message::ShowQr);
        }

        let mut card_content = column![
            text("Remote signing").size(16).font(styles::BOLD),
            text("Paste a WalletConnect URI to show it as a QR code.")
                .size(12)
                .color(MUTED),
            Space::new().height(4),
            row![uri, show].spacing(8).align_y(iced::Alignment::Center),
        ]
        .spacing(8);

        if let Some(session) = &self.qr_session {
            let copy = button(text("Copy").size(12))
                .style(styles::btn_ghost)
                .on_press(Message::CopyUri);
            card_content = card_content.push(
                row![
                    text("Last session").size(12).color(MUTED),
                    text(short(&session.uri)).size(12).font(Font::MONOSPACE),
                    Space::new().width(Fill),
                    copy,
                ]
                .spacing(8)
                .align_y(iced::Alignment::Center),
            );
        }

        container(card_content)
            .padding(20)
            .width(Fill)
            .style(styles::card)
            .into()
    }
}

/// Head and tail of a long URI.
fn short(uri: &str) -> String {
    let chars: Vec<char> = uri.chars().collect();
    if chars.len() <= 32 {
        return uri.to_string();
    }
    let head: String = chars[..16].iter().collect();
    let tail: String = chars[chars.len() - 12..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::short;

    #[test]
    fn shortens_long_uris() {
        assert_eq!(short("wc:abc@2"), "wc:abc@2");
        let long = format!("wc:{}@2?symKey=ffff", "a".repeat(64));
        let out = short(&long);
        assert!(out.starts_with("wc:aaaaaaaaaaaaa..."));
        assert!(out.ends_with("?symKey=ffff"));
    }
}
