// Sidebar component
//
// Project tree: projects with their changes, inbox and archive leaves.
// Scrolls to keep the cursor visible and records the first drawn row on
// the App so mouse clicks map back to rows.

use crate::api::Project;
use crate::dashboard::{SelectedItem, SidebarRow};
use crate::tui::app::{App, Focus};
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.pane_border(focused)))
        .title(" Projects ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !app.cache.loaded {
        f.render_widget(
            Paragraph::new(format!(" {} loading…", app.spinner_char()))
                .style(Style::default().fg(app.theme.muted)),
            inner,
        );
        return;
    }
    if app.cache.projects.is_empty() {
        f.render_widget(
            Paragraph::new(vec![
                Line::from(" No projects yet"),
                Line::from(" Press a to add one"),
            ])
            .style(Style::default().fg(app.theme.muted)),
            inner,
        );
        return;
    }

    let rows = app.sidebar_rows();
    let height = inner.height as usize;
    app.sidebar_offset = scroll_offset(app.sidebar_offset, app.sidebar.cursor(), height);

    let width = inner.width as usize;
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.sidebar_offset)
        .take(height)
        .map(|(idx, row)| row_line(app, row, idx == app.sidebar.cursor() && focused, width))
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

/// Smallest scroll change that keeps `cursor` inside `height` rows
fn scroll_offset(offset: usize, cursor: usize, height: usize) -> usize {
    if height == 0 || cursor < offset {
        cursor
    } else if cursor >= offset + height {
        cursor + 1 - height
    } else {
        offset
    }
}

fn row_line(app: &App, row: &SidebarRow, under_cursor: bool, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let Some(project) = app.cache.project(row.project_id()) else {
        return Line::default();
    };

    let (text, mut style) = match row {
        SidebarRow::Project { .. } => project_text(app, project),
        SidebarRow::Change { change_id, .. } => match project.change(change_id) {
            Some(change) => (
                format!(
                    "   {} {}/{}",
                    change.title, change.completed_tasks, change.total_tasks
                ),
                Style::default().fg(theme.status_color(&change.status)),
            ),
            None => (String::new(), Style::default()),
        },
        SidebarRow::Inbox { .. } => ("   ✉ Inbox".to_string(), Style::default().fg(theme.muted)),
        SidebarRow::Archived { .. } => {
            ("   ⌫ Archived".to_string(), Style::default().fg(theme.muted))
        }
    };

    if app.selected.as_ref() == Some(&row.to_selection()) {
        style = style.add_modifier(Modifier::BOLD);
    }
    if let SidebarRow::Project { project_id } = row {
        if app.drag.source() == Some(project_id.as_str()) {
            style = style.add_modifier(Modifier::ITALIC | Modifier::DIM);
        }
        if app.drag.target() == Some(project_id.as_str())
            && app.drag.source() != Some(project_id.as_str())
        {
            style = style.bg(theme.drop_target).fg(theme.background);
        }
    }
    if under_cursor {
        style = style.bg(theme.selection).fg(theme.selection_fg);
    }

    Line::from(Span::styled(truncate_to_width(&text, width), style))
}

fn project_text(app: &App, project: &Project) -> (String, Style) {
    let theme = &app.theme;
    let arrow = if app.sidebar.is_expanded(&project.id) {
        "▾"
    } else {
        "▸"
    };
    let active = app.cache.is_active(&project.id);
    let marker = if active { "●" } else { " " };
    let style = if active {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.foreground)
    };
    let diagram = match &app.selected {
        Some(SelectedItem::Diagram { project_id }) if *project_id == project.id => " ◇",
        _ => "",
    };
    (
        format!("{} {} {}{}", arrow, marker, project.name, diagram),
        style,
    )
}
