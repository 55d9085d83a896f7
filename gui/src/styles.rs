use iced::font::Weight;
use iced::widget::{button, container, Space};
use iced::{Background, Border, Color, Element, Fill, Font, Shadow, Vector};

use crate::{ACTIVE, BG, BORDER, MUTED, PRIMARY, SURFACE};

// -- Additional palette --

pub const ACCENT: Color = Color::from_rgb(0.157, 0.780, 0.490);
pub const DANGER: Color = Color::from_rgb(1.0, 0.420, 0.420);

// -- Fonts --

pub const BOLD: Font = Font {
    weight: Weight::Bold,
    ..Font::DEFAULT
};

// -- Container styles --

pub fn card(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(SURFACE)),
        border: Border {
            color: BORDER,
            width: 1.0,
            radius: 12.0.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.25),
            offset: Vector::new(0.0, 4.0),
            blur_radius: 16.0,
        },
        ..Default::default()
    }
}

/// Monospace field for links and URIs.
pub fn code_box(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(BG)),
        border: Border {
            color: BORDER,
            width: 1.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}

/// Scanners need dark modules on a light quiet zone.
pub fn qr_frame(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::WHITE)),
        border: Border {
            radius: 8.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn backdrop(_theme: &iced::Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.7))),
        ..Default::default()
    }
}

// -- Button styles --

pub fn btn_primary(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let base = button::Style {
        text_color: Color::WHITE,
        border: Border {
            radius: 8.0.into(),
            ..Default::default()
        },
        ..Default::default()
    };

    match status {
        button::Status::Active => button::Style {
            background: Some(Background::Color(PRIMARY)),
            ..base
        },
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(Color::from_rgb(1.0, 0.157, 0.294))),
            shadow: Shadow {
                color: Color::from_rgba(0.922, 0.0, 0.161, 0.35),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
            ..base
        },
        button::Status::Pressed => button::Style {
            background: Some(Background::Color(Color::from_rgb(0.780, 0.0, 0.137))),
            ..base
        },
        button::Status::Disabled => button::Style {
            background: Some(Background::Color(ACTIVE)),
            text_color: Color::from_rgba(1.0, 1.0, 1.0, 0.35),
            ..base
        },
    }
}

pub fn btn_secondary(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let border = Border {
        color: BORDER,
        width: 1.0,
        radius: 8.0.into(),
    };

    match status {
        button::Status::Hovered | button::Status::Pressed => button::Style {
            background: Some(Background::Color(ACTIVE)),
            text_color: Color::WHITE,
            border,
            ..Default::default()
        },
        button::Status::Active => button::Style {
            text_color: Color::from_rgb(0.86, 0.86, 0.89),
            border,
            ..Default::default()
        },
        button::Status::Disabled => button::Style {
            text_color: Color::from_rgba(1.0, 1.0, 1.0, 0.3),
            border,
            ..Default::default()
        },
    }
}

pub fn btn_ghost(_theme: &iced::Theme, status: button::Status) -> button::Style {
    let border = Border {
        radius: 8.0.into(),
        ..Default::default()
    };
    match status {
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(Color::from_rgba(1.0, 1.0, 1.0, 0.06))),
            text_color: Color::WHITE,
            border,
            ..Default::default()
        },
        _ => button::Style {
            text_color: MUTED,
            border,
            ..Default::default()
        },
    }
}

/// Segmented-control button; `active` marks the current choice.
pub fn toggle_btn(active: bool) -> impl Fn(&iced::Theme, button::Status) -> button::Style {
    move |theme, status| {
        if active {
            button::Style {
                background: Some(Background::Color(PRIMARY)),
                text_color: Color::WHITE,
                border: Border {
                    radius: 8.0.into(),
                    ..Default::default()
                },
                ..Default::default()
            }
        } else {
            btn_secondary(theme, status)
        }
    }
}

// -- Helpers --

pub fn separator<'a, M: 'a>() -> Element<'a, M> {
    container(Space::new())
        .width(Fill)
        .height(1)
        .style(|_theme| container::Style {
            background: Some(Background::Color(BORDER)),
            ..Default::default()
        })
        .into()
}
