// UI rendering logic
use crate::app::{App, InputMode, ViewStatus};
use artscout_core::{card, format_details, PageSize};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows in one card: border, title, caption, image link, border
const CARD_HEIGHT: u16 = 5;
const SIDEBAR_WIDTH: u16 = 34;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(8),    // Sidebar + results
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    render_sidebar(frame, app, body[0]);
    render_results(frame, app, body[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "ArtScout",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Search artworks from The Met Museum (no API key required)",
            Style::default().fg(Color::Gray),
        )),
    ];

    let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Keyword input
            Constraint::Length(3), // Page size
            Constraint::Min(3),    // Attribution
        ])
        .split(area);

    let (input_style, input_title) = match app.input_mode {
        InputMode::Searching => (
            Style::default().fg(Color::Yellow),
            "Keyword (Enter to search, Esc to leave)",
        ),
        InputMode::Normal => (Style::default(), "Keyword (/ to edit)"),
    };

    let mut input_spans = vec![Span::raw(app.search_input.as_str())];
    if app.input_mode == InputMode::Searching {
        input_spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    } else if app.search_input.is_empty() {
        input_spans.push(Span::styled(
            "e.g. Van Gogh",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let input = Paragraph::new(Line::from(input_spans)).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(input_title),
    );
    frame.render_widget(input, chunks[0]);

    let sizes: Vec<Span> = PageSize::OPTIONS
        .iter()
        .flat_map(|&size| {
            let style = if size == app.page_size.get() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {} ", size), style), Span::raw(" ")]
        })
        .collect();

    let page_size = Paragraph::new(Line::from(sizes)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Per page (s to change)"),
    );
    frame.render_widget(page_size, chunks[1]);

    let about = Paragraph::new(vec![
        Line::from("Data: The Metropolitan Museum"),
        Line::from("of Art Collection API"),
        Line::from(Span::styled(
            "collectionapi.metmuseum.org",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("About"));
    frame.render_widget(about, chunks[2]);
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(CARD_HEIGHT)])
        .split(area);

    render_pager_bar(frame, app, chunks[0]);

    if app.status != ViewStatus::Results {
        render_status_message(frame, app, chunks[1]);
        return;
    }

    if app.show_details {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        render_grid(frame, app, split[0]);
        render_details(frame, app, split[1]);
    } else {
        render_grid(frame, app, chunks[1]);
    }
}

fn render_pager_bar(frame: &mut Frame, app: &App, area: Rect) {
    let enabled = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = Vec::new();
    match app.page.as_ref().filter(|_| app.status == ViewStatus::Results) {
        Some(page) => {
            spans.push(Span::styled(
                "◀ Prev",
                if page.has_prev() { enabled } else { disabled },
            ));
            spans.push(Span::raw(format!(
                "  Page {} of {}  ",
                page.state.page(),
                page.total_pages
            )));
            spans.push(Span::styled(
                "Next ▶",
                if page.has_next() { enabled } else { disabled },
            ));
            spans.push(Span::raw("   "));
            spans.push(Span::raw(page.summary()));

            let skipped = app.skipped_count();
            if skipped > 0 {
                spans.push(Span::styled(
                    format!("  ({} could not be loaded)", skipped),
                    Style::default().fg(Color::Yellow),
                ));
            }
        }
        None => {
            spans.push(Span::styled("◀ Prev", disabled));
            spans.push(Span::raw("  "));
            spans.push(Span::styled("Next ▶", disabled));
        }
    }

    let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn render_status_message(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.status {
        ViewStatus::Prompt => (
            "Type a keyword and press Enter to search the collection.".to_string(),
            Style::default().fg(Color::Gray),
        ),
        ViewStatus::Searching => (
            "Searching…".to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        ViewStatus::Empty => (
            "No results found. Try another keyword.".to_string(),
            Style::default().fg(Color::Gray),
        ),
        ViewStatus::Failed(reason) => (
            format!("Search failed: {}", reason),
            Style::default().fg(Color::Red),
        ),
        ViewStatus::Results => (String::new(), Style::default()),
    };

    let message = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Results"));
    frame.render_widget(message, area);
}

/// First grid row to draw so the selected card stays on screen
pub(crate) fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    let visible_rows = visible_rows.max(1);
    (selected_row + 1).saturating_sub(visible_rows)
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let records = app.records();
    if records.is_empty() {
        let empty = Paragraph::new("Nothing could be loaded for this page.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Results"));
        frame.render_widget(empty, area);
        return;
    }

    let columns = app.grid_columns.max(1);
    let total_rows = (records.len() + columns - 1) / columns;
    let visible_rows = ((area.height / CARD_HEIGHT) as usize).clamp(1, total_rows);
    let first_row = first_visible_row(app.selected_index / columns, visible_rows);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (offset, row_area) in row_areas.iter().enumerate() {
        let row = first_row + offset;
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (column, cell_area) in cell_areas.iter().enumerate() {
            let index = row * columns + column;
            if let Some(record) = records.get(index) {
                render_card(frame, record, index == app.selected_index, *cell_area);
            }
        }
    }
}

fn render_card(frame: &mut Frame, record: &artscout_core::ObjectRecord, selected: bool, area: Rect) {
    let card = card(record);

    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let image = match &card.image_url {
        Some(url) => Span::styled(url.clone(), Style::default().fg(Color::Blue)),
        None => Span::styled("No image", Style::default().fg(Color::DarkGray)),
    };

    let lines = vec![
        Line::from(Span::styled(
            card.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(card.caption.clone(), Style::default().fg(Color::Gray))),
        Line::from(image),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!("#{}", card.object_id)),
    );
    frame.render_widget(widget, area);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let Some(record) = app.selected_record() else {
        let empty = Paragraph::new("Select an object to see its details.")
            .block(Block::default().borders(Borders::ALL).title("Details"));
        frame.render_widget(empty, area);
        return;
    };

    let mut lines: Vec<Line> = format_details(record)
        .into_iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(
                    format!("{}: ", row.label),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(row.value),
            ])
        })
        .collect();

    if let Some(url) = record.object_url.as_deref().filter(|u| !u.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            url.to_string(),
            Style::default().fg(Color::Blue),
        )));
    }

    let details = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Details: {}", record.display_title())),
    );
    frame.render_widget(details, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(error) = &app.error_message {
        let bar = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(bar, area);
        return;
    }

    let hints = match app.input_mode {
        InputMode::Searching => "Enter: search | Esc: cancel | Ctrl+C: quit",
        InputMode::Normal => {
            "/: search | n/p: page | hjkl: move | d: details | s: page size | o: image | w: web page | q: quit"
        }
    };

    let bar = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(bar, area);
}
