// Views module - screen-level rendering
//
// One dashboard screen: title bar, sidebar + detail body, status bar.
// Overlays stack on top in order: palette, modal, toast.

mod modal;

use super::app::{App, Focus};
use super::layout::DashboardLayout;
use crate::tui::components::{
    detail_panel, diagram_panel, palette_panel, sidebar_panel, status_bar, title_bar,
};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

/// Main UI render function, called on every frame
///
/// Stores the computed layout on the App for mouse hit-testing.
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let fullscreen = app
        .diagram
        .as_ref()
        .is_some_and(|d| d.viewport.is_fullscreen());
    let layout = DashboardLayout::compute(area, !app.sidebar_collapsed && !fullscreen);
    app.layout = layout;

    title_bar::render(f, layout.title, app);
    if let Some(sidebar) = layout.sidebar {
        sidebar_panel::render(f, sidebar, app);
    }
    match &app.diagram {
        Some(view) => diagram_panel::render(
            f,
            layout.detail,
            view,
            &app.theme,
            app.focus == Focus::Detail,
        ),
        None => detail_panel::render(f, layout.detail, app),
    }
    status_bar::render(f, layout.status, app);

    if app.palette.is_open() {
        palette_panel::render(f, area, app);
    }
    if let Some(open) = &app.modal {
        modal::render(f, open, app);
    }
    if let Some(toast) = &app.toast {
        toast.render(f, area, &app.theme);
    }
}
