// Status bar component
//
// Active project folder, git branch with sync and dirty markers, then the
// key hints of whatever has focus.

use crate::dashboard::StatusSummary;
use crate::tui::app::{App, Focus};
use crate::tui::layout::Breakpoint;
use crate::tui::traits::Interactive;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let bp = Breakpoint::from_width(area.width);

    let spans = match app.status_summary() {
        Some(status) => status_spans(&status, app, bp),
        None => vec![Span::styled(
            " No active project",
            Style::default().fg(theme.muted),
        )],
    };
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_bar)),
        area,
    );

    if bp.at_least(Breakpoint::Normal) {
        f.render_widget(
            Paragraph::new(format!("{} ", focus_hint(app)))
                .alignment(Alignment::Right)
                .style(Style::default().fg(theme.muted)),
            area,
        );
    }
}

fn status_spans(status: &StatusSummary, app: &App, bp: Breakpoint) -> Vec<Span<'static>> {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        format!(" 📁 {}", status.cwd_short),
        Style::default().fg(theme.foreground),
    )];

    let Some(git) = &status.git else {
        if app.cache.active.is_some() {
            spans.push(Span::styled("  ⎇ …", Style::default().fg(theme.muted)));
        }
        return spans;
    };

    spans.push(Span::styled(
        format!("  ⎇ {}", git.branch),
        Style::default().fg(theme.accent),
    ));
    let sync = git.sync_label();
    if !sync.is_empty() {
        spans.push(Span::styled(
            format!(" {}", sync),
            Style::default().fg(theme.warning),
        ));
    }
    if git.dirty {
        let marker = if bp.at_least(Breakpoint::Wide) {
            format!(" ● {} changed", git.changed_files)
        } else {
            " ●".to_string()
        };
        spans.push(Span::styled(marker, Style::default().fg(theme.warning)));
    }
    spans
}

fn focus_hint(app: &App) -> &'static str {
    if app.drag.is_active() {
        return "↑↓:target  Enter:drop  Esc:cancel";
    }
    match app.focus {
        Focus::Sidebar => "↑↓:move  Enter:open  m:move  a/e/d:project  c:copy path",
        Focus::Detail => match &app.diagram {
            Some(diagram) => diagram.viewport.focus_hint(),
            None => app.detail.focus_hint(),
        },
    }
}
