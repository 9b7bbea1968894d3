use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use admindash_core::state::Notification;
use admindash_core::utils::{format_timestamp, truncate_string};

use crate::app::{App, AppState, EditField, LoginFocus, Tab};

use super::styles;
use super::tabs::{dashboard, settings, users};

/// Most notifications shown in the banner at once
const MAX_VISIBLE_NOTIFICATIONS: usize = 3;

pub fn render(frame: &mut Frame, app: &App) {
    let dark = app.dark_mode();
    frame.render_widget(Block::default().style(styles::base_style(dark)), frame.area());

    let notifications = visible_notifications(app);
    let banner_height = if notifications.is_empty() {
        0
    } else {
        notifications.len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title bar
            Constraint::Length(3),             // Tabs
            Constraint::Length(banner_height), // Notifications
            Constraint::Min(10),               // Main content
            Constraint::Length(2),             // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    if !notifications.is_empty() {
        render_notifications(frame, &notifications, chunks[2]);
    }
    render_main_content(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::LoggingIn => render_login_overlay(frame, app),
        AppState::EditingUser => render_edit_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame, app),
        _ => {}
    }
}

fn visible_notifications(app: &App) -> Vec<Notification> {
    let mut notifications = app.store.notifications();
    let skip = notifications.len().saturating_sub(MAX_VISIBLE_NOTIFICATIONS);
    notifications.split_off(skip)
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  AdminDash";
    let help_hint = "[?] Help";
    let user_text = app
        .auth
        .user()
        .map(|u| format!("{} ({})  ", u.name, u.role))
        .unwrap_or_default();

    let used = title.len() + user_text.chars().count() + help_hint.len() + 4;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(user_text, styles::muted_style()),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [Tab::Dashboard, Tab::Users, Tab::Settings];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if *tab == app.current_tab {
            spans.push(Span::styled(label, styles::tab_style()));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_notifications(frame: &mut Frame, notifications: &[Notification], area: Rect) {
    let width = area.width.saturating_sub(24) as usize;
    let lines: Vec<Line> = notifications
        .iter()
        .map(|n| {
            Line::from(vec![
                Span::styled(format!(" {} ", format_timestamp(n.timestamp)), styles::muted_style()),
                Span::styled(format!("{:<8}", n.kind.label()), styles::notification_style(n.kind)),
                Span::raw(truncate_string(&n.message, width)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Dashboard => dashboard::render(frame, app, area),
        Tab::Users => users::render(frame, app, area),
        Tab::Settings => settings::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[d]ark mode | [L]ogout | [q]uit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if let Some(error) = app.store.last_error() {
        format!(" Last error: {} ", error)
    } else if app.store.is_loading() {
        " Loading... ".to_string()
    } else {
        " Ready ".to_string()
    };
    let right_text = format!(" {} ", shortcuts);

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let left_style = if app.store.last_error().is_some() && app.status_message.is_none() {
        styles::error_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style(app.dark_mode()));
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str, dark: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::list_item_style(dark)),
    ])
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 28, frame.area());
    frame.render_widget(Clear, area);

    let dark = app.dark_mode();
    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  AdminDash", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-3", "Switch tabs", dark),
        help_line("Tab/←/→", "Prev/next tab", dark),
        help_line("↑/↓", "Navigate list or form", dark),
        help_line("Esc", "Go back / discard", dark),
        Line::from(""),
        Line::from(Span::styled(" Users", styles::highlight_style())),
        help_line("/", "Search name, email, username", dark),
        help_line("c / o", "Cycle city / company filter", dark),
        help_line("x", "Clear filters", dark),
        help_line("n / p", "Next / previous page", dark),
        help_line("Enter", "Edit selected user", dark),
        help_line("r", "Reload users", dark),
        Line::from(""),
        Line::from(Span::styled(" Settings", styles::highlight_style())),
        help_line("Space", "Toggle or change value", dark),
        help_line("s / R", "Save / reset to defaults", dark),
        Line::from(""),
        Line::from(Span::styled(" Global", styles::highlight_style())),
        help_line("d", "Toggle dark mode", dark),
        help_line("L", "Log out", dark),
        help_line("q", "Quit", dark),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(styles::base_style(dark));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 12 } else { 10 };
    let area = centered_rect_fixed(50, height, frame.area());
    frame.render_widget(Clear, area);

    let dark = app.dark_mode();
    let field_style = |focused: bool| {
        if focused {
            styles::selected_style(dark)
        } else {
            styles::list_item_style(dark)
        }
    };

    let mut lines = vec![
        Line::from(Span::styled("  Sign in to AdminDash", styles::title_style())),
        Line::from(""),
    ];

    let email_focused = app.login_focus == LoginFocus::Email;
    let cursor = if email_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::styled("  Email:    [", styles::muted_style()),
        Span::styled(
            format!("{:<26}{}", truncate_string(&app.login_email, 26), cursor),
            field_style(email_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    let password_focused = app.login_focus == LoginFocus::Password;
    let cursor = if password_focused { "▌" } else { "" };
    let masked = "*".repeat(app.login_password.chars().count().min(26));
    lines.push(Line::from(vec![
        Span::styled("  Password: [", styles::muted_style()),
        Span::styled(format!("{:<26}{}", masked, cursor), field_style(password_focused)),
        Span::styled("]", styles::muted_style()),
    ]));

    lines.push(Line::from(""));
    let button_focused = app.login_focus == LoginFocus::Button;
    let label = if button_focused { " ▶ Login ◀ " } else { "   Login   " };
    lines.push(Line::from(vec![
        Span::raw("               ["),
        Span::styled(label, field_style(button_focused)),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(styles::base_style(dark));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_edit_overlay(frame: &mut Frame, app: &App) {
    let Some(ref form) = app.edit_form else {
        return;
    };
    let height = if form.error.is_some() { 12 } else { 10 };
    let area = centered_rect_fixed(56, height, frame.area());
    frame.render_widget(Clear, area);

    let dark = app.dark_mode();
    let mut lines = vec![Line::from("")];

    for field in EditField::ALL {
        let focused = form.focus == field;
        let style = if focused {
            styles::selected_style(dark)
        } else {
            styles::list_item_style(dark)
        };
        let cursor = if focused { "▌" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<9}[", field.label()), styles::muted_style()),
            Span::styled(
                format!("{:<34}{}", truncate_string(form.value(field), 34), cursor),
                style,
            ),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [Enter]", styles::help_key_style()),
        Span::styled(" save   ", styles::muted_style()),
        Span::styled("[Esc]", styles::help_key_style()),
        Span::styled(" cancel", styles::muted_style()),
    ]));

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    let block = Block::default()
        .title(format!(" Edit user #{} ", form.user.id))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(styles::base_style(dark));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(styles::base_style(app.dark_mode()));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
