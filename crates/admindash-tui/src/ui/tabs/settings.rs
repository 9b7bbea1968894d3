use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use admindash_core::settings::{option_label, UserPreferences, EMAIL_DIGESTS, LANGUAGES, TIMEZONES};

use crate::app::{App, SettingsField};
use crate::ui::styles;

/// Render the Settings tab - preference form with save/cancel/reset
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_actions(frame, app, chunks[1]);
}

/// Display text for a field's value in `prefs`
fn field_value(prefs: &UserPreferences, field: SettingsField) -> String {
    let toggle = |on: bool| (if on { "[x] On" } else { "[ ] Off" }).to_string();
    match field {
        SettingsField::DarkMode => toggle(prefs.dark_mode),
        SettingsField::EmailNotifications => toggle(prefs.notifications.email),
        SettingsField::PushNotifications => toggle(prefs.notifications.push),
        SettingsField::SmsNotifications => toggle(prefs.notifications.sms),
        SettingsField::Language => format!("< {} >", option_label(LANGUAGES, &prefs.language)),
        SettingsField::Timezone => format!("< {} >", option_label(TIMEZONES, &prefs.timezone)),
        SettingsField::EmailDigest => {
            format!("< {} >", option_label(EMAIL_DIGESTS, &prefs.email_digest))
        }
    }
}

fn section_for(field: SettingsField) -> Option<&'static str> {
    match field {
        SettingsField::DarkMode => Some("Appearance"),
        SettingsField::EmailNotifications => Some("Notifications"),
        SettingsField::Language => Some("Regional"),
        _ => None,
    }
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let dark = app.dark_mode();
    let mut lines = vec![];

    for field in SettingsField::ALL {
        if let Some(section) = section_for(field) {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(section, styles::highlight_style())));
        }

        let selected = field == app.settings_field;
        let style = if selected {
            styles::selected_style(dark)
        } else {
            styles::list_item_style(dark)
        };
        let marker = if selected { "▶ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<22}", marker, field.label()), style),
            Span::styled(field_value(&app.settings_draft, field), style),
        ]));
    }

    let block = Block::default()
        .title(" Settings ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_actions(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" [Space]", styles::help_key_style()),
        Span::styled(" change  ", styles::muted_style()),
        Span::styled("[s]", styles::help_key_style()),
        Span::styled(" save  ", styles::muted_style()),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::styled(" cancel  ", styles::muted_style()),
        Span::styled("[R]", styles::help_key_style()),
        Span::styled(" reset to defaults", styles::muted_style()),
    ];
    if app.settings_has_changes() {
        spans.push(Span::styled("   Unsaved changes", styles::highlight_style()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value() {
        let mut prefs = UserPreferences::default();
        assert_eq!(field_value(&prefs, SettingsField::DarkMode), "[ ] Off");
        assert_eq!(field_value(&prefs, SettingsField::EmailNotifications), "[x] On");
        assert_eq!(field_value(&prefs, SettingsField::Timezone), "< UTC (Coordinated Universal Time) >");

        prefs.language = "ja".to_string();
        assert_eq!(field_value(&prefs, SettingsField::Language), "< Japanese >");
    }

    #[test]
    fn test_every_section_starts_on_a_field() {
        let sections: Vec<_> = SettingsField::ALL.iter().filter_map(|f| section_for(*f)).collect();
        assert_eq!(sections, vec!["Appearance", "Notifications", "Regional"]);
    }
}
