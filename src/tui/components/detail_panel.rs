//! Detail panel component
//!
//! Shows whatever is selected: a project overview, one change, the inbox,
//! the archive, a document reference or the settings summary. Content is
//! plain lines; the panel only owns its vertical scroll.

use crate::api::Project;
use crate::dashboard::SelectedItem;
use crate::tui::app::{App, Focus};
use crate::tui::traits::{Handled, Interactive};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const PAGE: u16 = 10;
const BAR_WIDTH: usize = 20;

#[derive(Debug, Default)]
pub struct DetailPanel {
    scroll: u16,
}

impl DetailPanel {
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Back to the top (selection changed)
    pub fn reset(&mut self) {
        self.scroll = 0;
    }
}

impl Interactive for DetailPanel {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE),
            KeyCode::Home => self.scroll = 0,
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> &'static str {
        "↑↓:scroll  PgUp/PgDn:page  Tab:sidebar"
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = app
        .selected
        .as_ref()
        .map(|s| format!(" {} ", s.label()))
        .unwrap_or_else(|| " SpecDeck ".to_string());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.pane_border(app.focus == Focus::Detail)))
        .title(title);

    let paragraph = Paragraph::new(detail_lines(app))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail.scroll(), 0));
    f.render_widget(paragraph, area);
}

/// Content lines for the current selection
pub fn detail_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let heading = Style::default().fg(theme.title).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted);

    let Some(selected) = &app.selected else {
        return vec![
            Line::from(Span::styled("Nothing selected", heading)),
            Line::default(),
            Line::from(Span::styled(
                "Pick a project in the sidebar or press Ctrl+K to search.",
                muted,
            )),
        ];
    };
    let project = selected.project_id().and_then(|id| app.cache.project(id));

    match selected {
        SelectedItem::Project { .. } => match project {
            Some(project) => project_lines(app, project),
            None => vec![Line::from("Project not found")],
        },
        SelectedItem::Change { change_id, .. } => {
            let Some(change) = project.and_then(|p| p.change(change_id)) else {
                return vec![Line::from("Change not found")];
            };
            vec![
                Line::from(Span::styled(change.title.clone(), heading)),
                Line::from(Span::styled(change.id.clone(), muted)),
                Line::default(),
                Line::from(vec![
                    Span::raw("Status    "),
                    Span::styled(
                        change.status.clone(),
                        Style::default().fg(theme.status_color(&change.status)),
                    ),
                ]),
                Line::from(format!(
                    "Tasks     {}/{}",
                    change.completed_tasks, change.total_tasks
                )),
                progress_line(app, change.progress()),
                Line::from(format!(
                    "Updated   {}",
                    change.updated_at.format("%Y-%m-%d %H:%M")
                )),
            ]
        }
        SelectedItem::StandaloneTasks { project_id } => {
            let mut lines = vec![
                Line::from(Span::styled("Inbox", heading)),
                Line::default(),
            ];
            match app.cache.tasks.get(project_id) {
                None => lines.push(Line::from(Span::styled(
                    format!("{} loading…", app.spinner_char()),
                    muted,
                ))),
                Some(tasks) if tasks.is_empty() => {
                    lines.push(Line::from(Span::styled("No standalone tasks", muted)))
                }
                Some(tasks) => lines.extend(tasks.iter().map(|task| {
                    let (mark, style) = if task.done {
                        ("[x]", Style::default().fg(theme.success))
                    } else {
                        ("[ ]", Style::default().fg(theme.foreground))
                    };
                    Line::from(Span::styled(format!("{} {}", mark, task.title), style))
                })),
            }
            lines
        }
        SelectedItem::Archived { project_id } => {
            let mut lines = vec![
                Line::from(Span::styled("Archived changes", heading)),
                Line::default(),
            ];
            match app.cache.archived.get(project_id) {
                None => lines.push(Line::from(Span::styled(
                    format!("{} loading…", app.spinner_char()),
                    muted,
                ))),
                Some(archived) if archived.is_empty() => {
                    lines.push(Line::from(Span::styled("Nothing archived", muted)))
                }
                Some(archived) => lines.extend(archived.iter().map(|change| {
                    let date = change
                        .archived_at
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default();
                    Line::from(vec![
                        Span::raw(format!("{}  ", change.title)),
                        Span::styled(date, muted),
                    ])
                })),
            }
            lines
        }
        SelectedItem::Docs { path, .. } => {
            let mut lines = vec![
                Line::from(Span::styled("Document", heading)),
                Line::default(),
                Line::from(path.clone()),
            ];
            if let Some(project) = project {
                lines.push(Line::from(Span::styled(format!("in {}", project.name), muted)));
            }
            lines
        }
        SelectedItem::Diagram { .. } => vec![Line::from(Span::styled(
            format!("{} generating diagram…", app.spinner_char()),
            muted,
        ))],
        SelectedItem::Settings => settings_lines(app),
    }
}

fn project_lines(app: &App, project: &Project) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let heading = Style::default().fg(theme.title).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted);

    let mut lines = vec![
        Line::from(Span::styled(project.name.clone(), heading)),
        Line::from(Span::styled(project.path.clone(), muted)),
    ];
    if app.cache.is_active(&project.id) {
        lines.push(Line::from(Span::styled("● active", Style::default().fg(theme.accent))));
    }

    if let Some(git) = app.cache.git.get(&project.id) {
        lines.push(Line::default());
        lines.push(Line::from(format!("Branch    {}", git.branch)));
        if git.is_dirty() {
            lines.push(Line::from(Span::styled(
                format!(
                    "Changes   {} modified, {} staged, {} untracked",
                    git.modified.len(),
                    git.staged.len(),
                    git.untracked.len()
                ),
                Style::default().fg(theme.warning),
            )));
        }
    }

    lines.push(Line::default());
    if project.changes.is_empty() {
        lines.push(Line::from(Span::styled("No active changes", muted)));
        return lines;
    }
    lines.push(Line::from(Span::styled(
        format!("Changes ({})", project.changes.len()),
        heading,
    )));
    for change in &project.changes {
        lines.push(Line::from(vec![
            Span::raw(format!("{}  ", change.title)),
            Span::styled(
                format!(
                    "{} {}/{}",
                    change.status, change.completed_tasks, change.total_tasks
                ),
                Style::default().fg(theme.status_color(&change.status)),
            ),
        ]));
    }
    lines
}

fn progress_line(app: &App, progress: f64) -> Line<'static> {
    let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round()) as usize;
    Line::from(vec![
        Span::raw("Progress  "),
        Span::styled(
            "█".repeat(filled),
            Style::default().fg(app.theme.progress_fill),
        ),
        Span::styled(
            "░".repeat(BAR_WIDTH - filled),
            Style::default().fg(app.theme.muted),
        ),
        Span::raw(format!(" {:.0}%", progress * 100.0)),
    ])
}

fn settings_lines(app: &App) -> Vec<Line<'static>> {
    let config = &app.config;
    let heading = Style::default()
        .fg(app.theme.title)
        .add_modifier(Modifier::BOLD);
    let path = crate::config::Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(unavailable)".to_string());

    vec![
        Line::from(Span::styled("Settings", heading)),
        Line::from(Span::styled(
            format!("{} (specdeck config edit)", path),
            Style::default().fg(app.theme.muted),
        )),
        Line::default(),
        Line::from(format!("theme                {}", app.theme.name)),
        Line::from(format!("api.base_url         {}", config.api.base_url)),
        Line::from(format!("api.timeout_secs     {}", config.api.timeout_secs)),
        Line::from(format!("palette.debounce_ms  {}", config.palette.debounce_ms)),
        Line::from(format!("palette.min_query    {}", config.palette.min_query_len)),
        Line::from(format!("palette.limit        {}", config.palette.result_limit)),
        Line::from(format!("ui.export_dir        {}", config.ui.export_dir.display())),
        Line::from(format!("logging.level        {}", config.logging.level)),
        Line::from(format!(
            "logging.file         {}",
            if config.logging.file_enabled {
                config.logging.file_dir.display().to_string()
            } else {
                "off".to_string()
            }
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dashboard::test_support::{change, project};
    use crate::logging::LogBuffer;
    use crate::tui::effects::AppMessage;
    use crossterm::event::KeyModifiers;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let mut app = App::new(Config::default(), LogBuffer::new());
        app.handle_message(AppMessage::ProjectsLoaded(Ok(vec![project(
            "p1",
            "web",
            vec![change("c1", "Add auth")],
        )])));
        app
    }

    #[test]
    fn change_detail_shows_progress() {
        let mut app = app();
        app.selected = Some(SelectedItem::Change {
            project_id: "p1".into(),
            change_id: "c1".into(),
        });
        let content = text(&detail_lines(&app));
        assert!(content.contains("Add auth"));
        assert!(content.contains("Tasks     1/3"));
        assert!(content.contains("33%"));
    }

    #[test]
    fn inbox_shows_loading_until_tasks_arrive() {
        let mut app = app();
        app.selected = Some(SelectedItem::StandaloneTasks {
            project_id: "p1".into(),
        });
        assert!(text(&detail_lines(&app)).contains("loading"));

        app.cache.tasks.insert("p1".into(), vec![]);
        assert!(text(&detail_lines(&app)).contains("No standalone tasks"));
    }

    #[test]
    fn settings_list_api_url() {
        let mut app = app();
        app.selected = Some(SelectedItem::Settings);
        assert!(text(&detail_lines(&app)).contains(&app.config.api.base_url));
    }

    #[test]
    fn scroll_keys() {
        let mut panel = DetailPanel::default();
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(panel.handle_key(key(KeyCode::PageDown)), Handled::Yes);
        assert_eq!(panel.handle_key(key(KeyCode::Up)), Handled::Yes);
        assert_eq!(panel.scroll(), 9);
        assert_eq!(panel.handle_key(key(KeyCode::Char('x'))), Handled::No);
        panel.handle_key(key(KeyCode::Home));
        assert_eq!(panel.scroll(), 0);
    }
}
