// Modal overlay rendering
//
// Modals are rendered on top of the main content:
// - Help: keyboard shortcuts and current config
// - Logs: captured tracing output, filterable by level
// - Path input: add project / change project folder
// - Confirm: project removal

use crate::logging::LogLevel;
use crate::tui::app::App;
use crate::tui::modal::Modal;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help { scroll } => render_help(f, app, *scroll),
        Modal::Logs { scroll, min_level } => render_logs(f, app, *scroll, *min_level),
        Modal::PathInput {
            purpose,
            input,
            error,
        } => render_path_input(f, app, purpose.title(), input, error.as_deref()),
        Modal::ConfirmRemove { name, .. } => render_confirm(f, app, name),
    }
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn modal_block<'a>(app: &App, title: &'a str, footer: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focused))
        .border_type(app.theme.border_type)
        .title(title)
        .title_bottom(Line::from(footer).centered())
        .style(Style::default().bg(app.theme.background))
}

fn render_help(f: &mut Frame, app: &App, scroll: u16) {
    let key_style = Style::default().fg(app.theme.accent);
    let desc_style = Style::default().fg(app.theme.foreground);
    let header_style = Style::default()
        .fg(app.theme.title)
        .add_modifier(Modifier::BOLD);
    let divider_style = Style::default().fg(app.theme.border);

    // "    key         description"
    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Sidebar", header_style)),
        kb("↑/↓, j/k", "Move cursor"),
        kb("Enter", "Open selection"),
        kb("Space", "Expand / collapse project"),
        kb("←/→", "Collapse / expand"),
        kb("m", "Move project (↑↓ Enter Esc)"),
        kb("a", "Add project"),
        kb("e", "Change project folder"),
        kb("d", "Remove project"),
        Line::raw(""),
        Line::from(Span::styled("  Dashboard", header_style)),
        kb("Ctrl+K, /", "Command palette"),
        kb("Tab", "Switch pane focus"),
        kb("b", "Toggle sidebar"),
        kb("c", "Copy active folder path"),
        kb("p", "Git pull"),
        kb("g", "Generate diagram"),
        kb("r", "Refresh"),
        kb("L", "Logs"),
        Line::raw(""),
        Line::from(Span::styled("  Diagram", header_style)),
        kb("+/-, 0", "Zoom in / out / reset"),
        kb("arrows", "Pan"),
        kb("f", "Fullscreen"),
        kb("s / y", "Export SVG / copy source"),
        Line::raw(""),
        Line::from(Span::styled("  Mouse", header_style)),
        kb("Click", "Select"),
        kb("Drag", "Reorder projects / pan"),
        kb("Ctrl+Wheel", "Zoom diagram"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "  ──────────────────────────────────",
            divider_style,
        )),
        Line::from(vec![
            Span::styled("  Theme: ", desc_style),
            Span::styled(app.theme.name.clone(), key_style),
        ]),
        Line::from(vec![
            Span::styled("  API: ", desc_style),
            Span::styled(app.config.api.base_url.clone(), key_style),
        ]),
    ]);

    let area = centered_rect(48, 44, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content)
            .scroll((scroll, 0))
            .block(modal_block(app, " Help ", " Press ? or Esc to close ")),
        area,
    );
}

fn level_color(app: &App, level: LogLevel) -> ratatui::style::Color {
    match level {
        LogLevel::Error => app.theme.error,
        LogLevel::Warn => app.theme.warning,
        LogLevel::Info => app.theme.foreground,
        LogLevel::Debug | LogLevel::Trace => app.theme.muted,
    }
}

fn render_logs(f: &mut Frame, app: &App, scroll: usize, min_level: LogLevel) {
    let frame_area = f.area();
    let area = centered_rect(
        (frame_area.width * 90 / 100).max(60),
        (frame_area.height * 80 / 100).max(12),
        frame_area,
    );
    let viewport = area.height.saturating_sub(2) as usize;

    let entries = app.log_buffer.recent(usize::MAX, min_level);
    // `scroll` counts lines up from the newest entry
    let end = entries.len().saturating_sub(scroll.min(entries.len().saturating_sub(1)));
    let start = end.saturating_sub(viewport);

    let lines: Vec<Line> = entries[start..end]
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(app.theme.muted),
                ),
                Span::styled(
                    format!("{:5} ", entry.level.as_str()),
                    Style::default().fg(level_color(app, entry.level)),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(app.theme.foreground)),
            ])
        })
        .collect();

    let title = format!(
        " Logs ({}+, {} captured) ",
        min_level.as_str(),
        app.log_buffer.len()
    );
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(modal_block(
            app,
            &title,
            " ↑↓ scroll  l level  y copy  Esc close ",
        )),
        area,
    );
}

fn render_path_input(f: &mut Frame, app: &App, title: &str, input: &str, error: Option<&str>) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Project folder (~ expands to home):",
            Style::default().fg(app.theme.muted),
        )),
        Line::from(vec![
            Span::styled("› ", Style::default().fg(app.theme.accent)),
            Span::styled(input.to_string(), Style::default().fg(app.theme.foreground)),
            Span::styled("▏", Style::default().fg(app.theme.accent)),
        ]),
    ];
    if let Some(error) = error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(app.theme.error),
        )));
    }

    let title = format!(" {} ", title);
    let area = centered_rect(64, 7, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(modal_block(app, &title, " Enter confirm  Esc cancel ")),
        area,
    );
}

fn render_confirm(f: &mut Frame, app: &App, name: &str) {
    let lines = vec![
        Line::default(),
        Line::from(vec![
            Span::raw("Remove "),
            Span::styled(
                name.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" from the dashboard?"),
        ]),
        Line::from(Span::styled(
            "Files on disk are not touched.",
            Style::default().fg(app.theme.muted),
        )),
    ];

    let area = centered_rect(50, 6, f.area());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .centered()
            .block(modal_block(app, " Remove project ", " y remove  n cancel ")),
        area,
    );
}
