//! Colors for the search box

use iced::Color;

pub const BACKGROUND: Color = Color::from_rgb(0.09, 0.09, 0.11);
pub const SURFACE: Color = Color::from_rgb(0.12, 0.12, 0.14);
pub const BORDER: Color = Color::from_rgb(0.25, 0.25, 0.28);
pub const PRIMARY: Color = Color::from_rgb(0.4, 0.55, 1.0);
pub const TEXT: Color = Color::from_rgb(0.95, 0.95, 0.95);
pub const TEXT_MUTED: Color = Color::from_rgb(0.55, 0.55, 0.6);
pub const TEXT_PLACEHOLDER: Color = Color::from_rgb(0.4, 0.4, 0.45);
pub const SELECTION: Color = Color::from_rgb(0.2, 0.25, 0.35);
