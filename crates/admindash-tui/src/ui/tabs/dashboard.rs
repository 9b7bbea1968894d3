use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use admindash_core::settings::{option_label, EMAIL_DIGESTS, LANGUAGES, TIMEZONES};
use admindash_core::utils::format_remaining;

use crate::app::App;
use crate::ui::styles;

/// Render the Dashboard tab - account card and overview stats
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_account(frame, app, chunks[0]);
    render_overview(frame, app, chunks[1]);
}

fn label_value(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<16}", label), styles::muted_style()),
        Span::raw(value),
    ])
}

fn render_account(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![];

    match app.auth.session() {
        Some(session) => {
            lines.push(Line::from(Span::styled(
                format!("Welcome back, {}!", session.user.name),
                styles::title_style(),
            )));
            lines.push(Line::from(""));
            lines.push(label_value("Email:", session.user.email.clone()));
            lines.push(label_value("Role:", session.user.role.clone()));
            lines.push(label_value("User ID:", session.user.id.clone()));
            lines.push(label_value(
                "Session:",
                format!("expires in {}", format_remaining(session.minutes_until_expiry())),
            ));
        }
        None => {
            lines.push(Line::from(Span::styled("Not signed in", styles::muted_style())));
        }
    }

    let preferences = app.settings.preferences();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Preferences", styles::highlight_style())));
    lines.push(label_value(
        "Theme:",
        if preferences.dark_mode { "Dark" } else { "Light" }.to_string(),
    ));
    lines.push(label_value(
        "Language:",
        option_label(LANGUAGES, &preferences.language).to_string(),
    ));
    lines.push(label_value(
        "Timezone:",
        option_label(TIMEZONES, &preferences.timezone).to_string(),
    ));
    lines.push(label_value(
        "Email digest:",
        option_label(EMAIL_DIGESTS, &preferences.email_digest).to_string(),
    ));

    let block = Block::default()
        .title(" Account ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_overview(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(Span::styled("Users", styles::highlight_style()))];

    if app.users_loading {
        lines.push(Line::from(Span::styled("Loading users...", styles::muted_style())));
    } else if let Some(ref error) = app.users_error {
        lines.push(Line::from(Span::styled(
            format!("Error loading users: {}", error),
            styles::error_style(),
        )));
    } else {
        lines.push(label_value("Total:", app.listing.users().len().to_string()));
        lines.push(label_value("Cities:", app.listing.cities().len().to_string()));
        lines.push(label_value("Companies:", app.listing.companies().len().to_string()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Network", styles::highlight_style())));
    let retries = app.store.retry_count();
    let retry_style = if retries > 0 {
        styles::highlight_style()
    } else {
        styles::success_style()
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{:<16}", "Retries:"), styles::muted_style()),
        Span::styled(retries.to_string(), retry_style),
    ]));
    match app.store.last_error() {
        Some(error) => lines.push(Line::from(vec![
            Span::styled(format!("{:<16}", "Last error:"), styles::muted_style()),
            Span::styled(error, styles::error_style()),
        ])),
        None => lines.push(label_value("Last error:", "none".to_string())),
    }

    let block = Block::default()
        .title(" Overview ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
