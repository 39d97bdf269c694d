// Title bar component
//
// One line: app name, loading spinner, what the detail pane shows and the
// last sync time with the palette/help hints on the right.

use crate::tui::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        " ▣ SpecDeck",
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )];

    if app.is_loading() {
        spans.push(Span::styled(
            format!(" {}", app.spinner_char()),
            Style::default().fg(theme.accent),
        ));
    }

    if let Some(selected) = &app.selected {
        let name = selected
            .project_id()
            .and_then(|id| app.cache.project(id))
            .map(|p| format!(" {}", p.name))
            .unwrap_or_default();
        spans.push(Span::styled(
            format!("  ·  {}{}", selected.label(), name),
            Style::default().fg(theme.muted),
        ));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_bar)),
        area,
    );
    let refreshed = app
        .cache
        .last_refresh
        .map(|at| format!("synced {}  ", at.with_timezone(&chrono::Local).format("%H:%M")))
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(format!("{}Ctrl+K palette  ? help ", refreshed))
            .alignment(Alignment::Right)
            .style(Style::default().fg(theme.muted)),
        area,
    );
}
