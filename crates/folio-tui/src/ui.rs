//! Panel rendering

use std::path::Path;

use chrono::Local;
use folio_core::assets::resolve_asset_url;
use folio_core::project::Project;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, DraftField, EditField, Mode};

pub fn draw(frame: &mut Frame, app: &App) {
    let banner_height = if app.state().error_message().is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(10),               // Main content
            Constraint::Length(3),             // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    if let Some(message) = app.state().error_message() {
        let banner = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Error"));
        frame.render_widget(banner, chunks[1]);
    }

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    draw_list(frame, app, main_chunks[0]);
    match app.mode() {
        Mode::Browsing => draw_detail(frame, app, main_chunks[1]),
        Mode::Editing { field } => draw_edit(frame, app, *field, main_chunks[1]),
        Mode::Creating { field } => draw_create(frame, app, *field, main_chunks[1]),
        Mode::ConfirmDelete { id, title } => {
            let text = format!(
                "Delete project '{}' ({})?\n\nThis cannot be undone.\n\ny: delete | n: cancel",
                title, id
            );
            let confirm = Paragraph::new(text)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title("Confirm"));
            frame.render_widget(confirm, main_chunks[1]);
        }
    }

    let footer = Paragraph::new(footer_hint(app.mode()))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let synced = state
        .last_synced()
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut spans = vec![
        Span::raw(format!("Backend: {}", app.backend_url())),
        Span::raw(format!("  |  Last synced: {}", synced)),
    ];
    if state.is_fallback() {
        spans.push(Span::styled(
            "  |  local copy",
            Style::default().fg(Color::Yellow),
        ));
    }
    if state.is_loading() {
        spans.push(Span::styled(" (Loading...)", Style::default().fg(Color::Cyan)));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Folio Admin"));
    frame.render_widget(header, area);
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Projects");
    let records = app.state().records();

    if records.is_empty() {
        let empty = Paragraph::new("No projects yet\n\nPress 'n' to create one").block(block);
        frame.render_widget(empty, area);
        return;
    }

    let editing = app.state().editing_id();
    let items: Vec<ListItem> = records
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let marker = if editing.is_some() && p.id.as_ref() == editing {
                "* "
            } else {
                "  "
            };
            ListItem::new(format!("{}{} - {}", marker, p.display_key(index), p.title))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(app.selected()));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Details");
    let Some(project) = app.selected_project() else {
        frame.render_widget(Paragraph::new("Select a project").block(block), area);
        return;
    };

    let detail = Paragraph::new(detail_lines(project, app.asset_root()))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(detail, area);
}

fn detail_lines<'a>(project: &'a Project, asset_root: &str) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            project.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    if let Some(desc) = project.description.as_deref() {
        lines.push(Line::raw(desc));
        lines.push(Line::raw(""));
    }
    if let Some(src) = project.image_src.as_deref() {
        lines.push(Line::raw(format!(
            "Image: {}",
            resolve_asset_url(src, asset_root)
        )));
    }
    if let Some(repo) = project.repo_url.as_deref().filter(|r| !r.is_empty()) {
        lines.push(Line::raw(format!("Repo:  {}", repo)));
    }
    if let Some(live) = project.live_url.as_deref().filter(|l| !l.is_empty()) {
        lines.push(Line::raw(format!("Live:  {}", live)));
    }
    lines
}

fn input_line<'a>(label: &str, value: &'a str, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![
        Span::styled(format!("{:<12} ", label), label_style),
        Span::raw(value),
    ];
    if focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn draw_edit(frame: &mut Frame, app: &App, focused: EditField, area: Rect) {
    let title = match app.state().editing_id() {
        Some(id) => format!("Edit project {}", id),
        None => "Edit project".to_string(),
    };
    let lines: Vec<Line> = match app.state().edit_values() {
        Some(values) => EditField::ALL
            .iter()
            .map(|field| input_line(field.label(), field.value(values), *field == focused))
            .collect(),
        None => vec![Line::raw("No project open")],
    };

    let form = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(form, area);
}

fn draw_create(frame: &mut Frame, app: &App, focused: DraftField, area: Rect) {
    let draft = app.state().draft();
    let mut lines: Vec<Line> = DraftField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                DraftField::Title => draft.title.as_str(),
                DraftField::Description => draft.description.as_str(),
                DraftField::Image => app.image_path(),
            };
            input_line(field.label(), value, *field == focused)
        })
        .collect();

    if let Some(name) = Path::new(app.image_path().trim())
        .file_name()
        .and_then(|n| n.to_str())
    {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Selected image: {}", name),
            Style::default().fg(Color::Cyan),
        ));
    }

    let form = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("New project"));
    frame.render_widget(form, area);
}

fn footer_hint(mode: &Mode) -> &'static str {
    match mode {
        Mode::Browsing => "q: Quit | r: Reload | n: New | e/Enter: Edit | d: Delete | j/k: Move",
        Mode::Editing { .. } => "Tab: Next field | Enter: Save | Esc: Cancel",
        Mode::Creating { .. } => "Tab: Next field | Enter: Create | Esc: Back (keeps draft)",
        Mode::ConfirmDelete { .. } => "y: Delete | n/Esc: Cancel",
    }
}
