// Command palette overlay
//
// Centered box: query line, then the visible sections. Sections still
// waiting on their source show a spinner under the title. The highlighted
// item is kept in view.

use crate::tui::app::App;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = (area.width * 3 / 5).clamp(40.min(area.width), 100.min(area.width));
    let height = (area.height * 3 / 5).clamp(8.min(area.height), 30.min(area.height));
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + area.height / 6,
        width,
        height.min(area.height.saturating_sub(area.height / 6)),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border_focused))
        .title(" Search ")
        .style(Style::default().bg(theme.background));
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let text_width = inner.width as usize;
    let palette = &app.palette;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("› ", Style::default().fg(theme.accent)),
            Span::styled(
                palette.query().to_string(),
                Style::default().fg(theme.foreground),
            ),
            Span::styled("▏", Style::default().fg(theme.accent)),
        ]),
        Line::default(),
    ];

    let selected = palette.selected_index();
    let mut selected_line = 0;
    let mut index = 0;
    for section in palette.sections() {
        lines.push(Line::from(Span::styled(
            section.kind.title().to_string(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )));
        if section.loading {
            lines.push(Line::from(Span::styled(
                format!("  {} searching…", app.spinner_char()),
                Style::default().fg(theme.muted),
            )));
        }
        for item in section.items {
            let label = truncate_to_width(&item.label(), text_width.saturating_sub(4));
            let detail = item.detail();
            let room = text_width.saturating_sub(label.chars().count() + 6);
            let mut spans = vec![Span::raw(format!("  {}", label))];
            if !detail.is_empty() && room > 4 {
                spans.push(Span::styled(
                    format!("  {}", truncate_to_width(&detail, room)),
                    Style::default().fg(theme.muted),
                ));
            }
            let mut line = Line::from(spans);
            if index == selected {
                line = line.style(Style::default().bg(theme.selection).fg(theme.selection_fg));
                selected_line = lines.len();
            }
            lines.push(line);
            index += 1;
        }
    }
    if index == 0 && !palette.query().trim().is_empty() && !palette.is_pending() {
        lines.push(Line::from(Span::styled(
            "No results",
            Style::default().fg(theme.muted),
        )));
    }

    let visible = inner.height as usize;
    let scroll = selected_line.saturating_sub(visible.saturating_sub(1));
    f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
}
