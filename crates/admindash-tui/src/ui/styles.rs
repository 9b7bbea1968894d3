use ratatui::style::{Color, Modifier, Style};

use admindash_core::state::NotificationKind;

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);

// Theme-dependent colors
const DARK_BG: Color = Color::Rgb(24, 24, 32);
const DARK_FG: Color = Color::Rgb(224, 224, 232);
const DARK_HIGHLIGHT: Color = Color::Rgb(48, 48, 64);
const DARK_STATUS_BG: Color = Color::Rgb(32, 32, 40);

const LIGHT_BG: Color = Color::Rgb(245, 245, 248);
const LIGHT_FG: Color = Color::Rgb(32, 32, 40);
const LIGHT_HIGHLIGHT: Color = Color::Rgb(210, 222, 240);
const LIGHT_STATUS_BG: Color = Color::Rgb(225, 225, 232);

/// Whole-screen base style for the active theme
pub fn base_style(dark: bool) -> Style {
    if dark {
        Style::default().bg(DARK_BG).fg(DARK_FG)
    } else {
        Style::default().bg(LIGHT_BG).fg(LIGHT_FG)
    }
}

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style(dark: bool) -> Style {
    let bg = if dark { DARK_HIGHLIGHT } else { LIGHT_HIGHLIGHT };
    Style::default().bg(bg).add_modifier(Modifier::BOLD)
}

pub fn list_item_style(dark: bool) -> Style {
    Style::default().fg(if dark { DARK_FG } else { LIGHT_FG })
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style() -> Style {
    Style::default()
        .fg(PRIMARY)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style(dark: bool) -> Style {
    if dark {
        Style::default().bg(DARK_STATUS_BG).fg(DARK_FG)
    } else {
        Style::default().bg(LIGHT_STATUS_BG).fg(LIGHT_FG)
    }
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn notification_style(kind: NotificationKind) -> Style {
    let color = match kind {
        NotificationKind::Success => SECONDARY,
        NotificationKind::Error => ERROR,
        NotificationKind::Info => PRIMARY,
        NotificationKind::Warning => ACCENT,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_themes_differ() {
        assert_ne!(base_style(true), base_style(false));
        assert_ne!(selected_style(true), selected_style(false));
    }

    #[test]
    fn test_notification_colors() {
        assert_eq!(notification_style(NotificationKind::Error).fg, Some(ERROR));
        assert_eq!(notification_style(NotificationKind::Success).fg, Some(SECONDARY));
    }
}
