//! Dropdown panel below the input
//!
//! Row text goes through `text` widgets, never through markup, so the
//! untrusted `phrase`, `subtext` and `url` fields are shown literally.

use iced::widget::{column, container, mouse_area, scrollable, text};
use iced::{Background, Border, Color, Element, Length, Padding};

use super::theme;
use crate::app::Message;
use crate::widget::{Panel, Row};

pub fn view(panel: &Panel, selected: Option<usize>) -> Element<'_, Message> {
    let body: Element<'_, Message> = match panel.message() {
        Some(message) => container(text(message).size(14).color(theme::TEXT_MUTED))
            .padding(Padding::from([12.0, 16.0]))
            .width(Length::Fill)
            .into(),
        None => {
            let rows: Vec<Element<'_, Message>> = panel
                .rows()
                .iter()
                .map(|row| view_row(row, selected == Some(row.index)))
                .collect();
            scrollable(column(rows).spacing(4)).into()
        }
    };

    container(body)
        .padding(6)
        .width(Length::Fill)
        .max_height(320.0)
        .style(|_theme| container::Style {
            background: Some(Background::Color(theme::SURFACE)),
            border: Border {
                color: theme::BORDER,
                width: 1.0,
                radius: 12.0.into(),
            },
            ..Default::default()
        })
        .into()
}

fn view_row(row: &Row, is_selected: bool) -> Element<'_, Message> {
    let content = column![
        text(&row.result.phrase).size(15).color(theme::TEXT),
        text(&row.result.subtext).size(12).color(theme::TEXT_MUTED),
        text(row.url()).size(11).color(theme::PRIMARY),
    ]
    .spacing(2);

    let item = container(content)
        .padding(Padding::from([8.0, 12.0]))
        .width(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(if is_selected {
                theme::SELECTION
            } else {
                Color::TRANSPARENT
            })),
            border: Border::default().rounded(8),
            ..Default::default()
        });

    mouse_area(item)
        .on_enter(Message::RowHovered(row.index))
        .on_press(Message::RowClicked(row.index))
        .into()
}
