use iced::widget::{button, column, container, pick_list, row, text, text_input, Space};
use iced::{Element, Fill, Font, Length};
use tronwallet_adapter_core::WalletKind;

use crate::messages::Message;
use crate::state::Device;
use crate::{styles, App, MUTED};

impl App {
    pub(crate) fn view_deeplink(&self) -> Element<'_, Message> {
        let preview = self.link_preview();

        let page = text_input("https://your-dapp.example/", &self.page_url)
            .on_input(Message::PageUrlChanged)
            .size(13);

        let wallet_picker = pick_list(WalletKind::ALL, Some(self.wallet), Message::WalletSelected)
            .text_size(13)
            .width(Length::Fixed(180.0));

        let device_btn = |device: Device| {
            button(text(device.to_string()).size(13))
                .padding([6, 14])
                .style(styles::toggle_btn(self.device == device))
                .on_press(Message::DeviceSelected(device))
        };

        let inside = button(text(format!("Inside {} app browser", self.wallet.name())).size(13))
            .padding([6, 14])
            .style(styles::toggle_btn(self.inside_wallet))
            .on_press(Message::InsideWalletToggled(!self.inside_wallet));

        let label = |s: &'static str| text(s).size(12).color(MUTED).width(Length::Fixed(90.0));

        let mut detail = column![
            row![label("Detection"), text(preview.availability_label()).size(13)].spacing(8),
        ]
        .spacing(8);
        if preview.in_app {
            detail = detail.push(
                row![label("Browser"), text("Wallet's own browser, no deep link needed").size(13)]
                    .spacing(8),
            );
        }
        detail = detail.push(
            row![
                label("Deep link"),
                container(text(preview.link.clone()).size(11).font(Font::MONOSPACE))
                    .padding(10)
                    .width(Fill)
                    .style(styles::code_box),
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
        );
        if let Some(fallback) = &preview.fallback {
            detail = detail.push(
                row![
                    label("Without app"),
                    text(fallback.clone()).size(11).font(Font::MONOSPACE).width(Fill),
                ]
                .spacing(8),
            );
        }

        let actions = row![
            button(text("Copy link").size(13))
                .padding([8, 16])
                .style(styles::btn_secondary)
                .on_press(Message::CopyLink),
            button(text("Wallet website").size(13))
                .padding([8, 16])
                .style(styles::btn_ghost)
                .on_press(Message::OpenWalletSite),
            Space::new().width(Fill),
            button(text("Open in app").size(13))
                .padding([8, 16])
                .style(styles::btn_primary)
                .on_press(Message::OpenInApp),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center);

        let card_content = column![
            text("Deep links").size(16).font(styles::BOLD),
            page,
            row![
                wallet_picker,
                Space::new().width(Fill),
                device_btn(Device::Desktop),
                device_btn(Device::Mobile),
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center),
            inside,
            Space::new().height(4),
            styles::separator(),
            Space::new().height(4),
            detail,
            Space::new().height(4),
            actions,
        ]
        .spacing(8);

        container(card_content)
            .padding(20)
            .width(Fill)
            .style(styles::card)
            .into()
    }
}
