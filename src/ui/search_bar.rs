//! Search input

use iced::widget::{container, mouse_area, text_input};
use iced::{Background, Border, Color, Element, Length, Padding};

use super::theme;
use crate::app::Message;

/// Id of the text input, used to move focus back to it
pub const INPUT_ID: &str = "searchbox-input";

pub fn input_id() -> text_input::Id {
    text_input::Id::new(INPUT_ID)
}

/// The input row. Presses are picked up by the application from the global
/// pointer events while the cursor is over this row.
pub fn view(value: &str) -> Element<'_, Message> {
    let input = text_input("Search...", value)
        .id(input_id())
        .on_input(Message::InputChanged)
        .on_submit(Message::Submit)
        .padding(Padding::new(14.0))
        .size(18)
        .style(|_theme, _status| text_input::Style {
            background: Background::Color(Color::TRANSPARENT),
            border: Border::default(),
            icon: theme::TEXT_MUTED,
            placeholder: theme::TEXT_PLACEHOLDER,
            value: theme::TEXT,
            selection: theme::PRIMARY,
        });

    let bar = container(input)
        .padding(Padding::from([4.0, 12.0]))
        .width(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Background::Color(theme::SURFACE)),
            border: Border {
                color: theme::BORDER,
                width: 1.0,
                radius: 12.0.into(),
            },
            ..Default::default()
        });

    mouse_area(bar)
        .on_enter(Message::InputEntered)
        .on_exit(Message::InputLeft)
        .into()
}
