use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, AppState};
use crate::ui::styles;

/// Render the Users tab - filter bar, paginated table and pager
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.users_loading && app.listing.users().is_empty() {
        render_message(frame, area, Line::from(Span::styled("Loading users...", styles::muted_style())));
        return;
    }
    if let Some(ref error) = app.users_error {
        if app.listing.users().is_empty() {
            let lines = vec![
                Line::from(Span::styled("Error loading users", styles::error_style())),
                Line::from(Span::raw(error.clone())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("[r]", styles::help_key_style()),
                    Span::styled(" Try again", styles::muted_style()),
                ]),
            ];
            render_lines(frame, area, lines);
            return;
        }
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filters
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pager
        ])
        .split(area);

    render_filters(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_pager(frame, app, chunks[2]);
}

fn render_message(frame: &mut Frame, area: Rect, line: Line<'static>) {
    render_lines(frame, area, vec![line]);
}

fn render_lines(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn filter_span(label: &str, value: &str) -> Vec<Span<'static>> {
    let value_span = if value.is_empty() {
        Span::styled("All".to_string(), styles::muted_style())
    } else {
        Span::styled(value.to_string(), styles::highlight_style())
    };
    vec![Span::styled(format!("{}: ", label), styles::muted_style()), value_span]
}

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let searching = matches!(app.state, AppState::Searching);
    let filters = app.listing.filters();

    let mut spans = vec![Span::styled(" Search: ", styles::muted_style())];
    if searching {
        spans.push(Span::styled(format!("{}▌", app.search_query), styles::highlight_style()));
    } else if filters.search.is_empty() {
        spans.push(Span::styled("[/]", styles::help_key_style()));
    } else {
        spans.push(Span::styled(filters.search.clone(), styles::highlight_style()));
    }

    spans.push(Span::raw("   "));
    spans.extend(filter_span("[c]ity", &filters.city));
    spans.push(Span::raw("   "));
    spans.extend(filter_span("c[o]mpany", &filters.company));

    if app.listing.has_active_filters() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("[x] clear", styles::help_key_style()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(searching));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let dark = app.dark_mode();
    let page_items = app.listing.page_items();

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Name"),
        Cell::from("Email"),
        Cell::from("City"),
        Cell::from("Company"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = page_items
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if i == app.user_selection {
                styles::selected_style(dark)
            } else {
                styles::list_item_style(dark)
            };
            Row::new(vec![
                Cell::from(format!("{:>3}", user.id)),
                Cell::from(user.name.clone()),
                Cell::from(user.email.clone()),
                Cell::from(user.city().to_string()),
                Cell::from(user.company_name().to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(2),
    ];

    let title = format!(
        " Users ({} of {}) - [Enter] edit [r]eload ",
        app.listing.filtered_count(),
        app.listing.users().len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(!matches!(app.state, AppState::Searching))),
        )
        .row_highlight_style(styles::selected_style(dark));

    let mut state = TableState::default();
    if !page_items.is_empty() {
        state.select(Some(app.user_selection));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pager(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.listing.total_pages();
    let text = if total == 0 {
        " No users match the current filters".to_string()
    } else {
        format!(" Page {} of {}   [p]rev [n]ext", app.listing.page(), total)
    };
    frame.render_widget(Paragraph::new(Span::styled(text, styles::muted_style())), area);
}
