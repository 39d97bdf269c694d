// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard and mouse input, timer ticks, API results)
// - Routing input to the App
// - Spawning the background work the App asks for

pub mod app;
pub mod clipboard;
pub mod components;
pub mod effects;
pub mod input;
pub mod layout;
pub mod modal;
pub mod traits;
pub mod views;

use crate::api::ApiClient;
use crate::config::Config;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, Focus};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use effects::AppMessage;
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use traits::{Handled, Interactive};

/// Run the TUI
///
/// Sets up the terminal, runs the event loop and restores the terminal
/// when done, also when the loop failed.
pub async fn run_tui(config: Config, api: ApiClient, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(config, log_buffer);
    tracing::info!("Dashboard API at {}", api.base_url());

    let result = run_event_loop(&mut terminal, &mut app, &api).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on three sources at once:
/// 1. Keyboard and mouse input
/// 2. Timer ticks (spinners, toast expiry, palette debounce)
/// 3. Results of background API calls
///
/// After each wake-up the effects the App queued are spawned.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: &ApiClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        for effect in app.take_effects() {
            effects::spawn(effect, api, &tx);
        }

        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => {
                            handle_key_event(app, key_event, Instant::now());
                        }
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick(Instant::now());
            }

            Some(message) = rx.recv() => {
                app.handle_message(message);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
///
/// Layered dispatch: Modal → Palette → Drag → Global → Focused pane
fn handle_key_event(app: &mut App, key_event: KeyEvent, now: Instant) {
    if key_event.kind == KeyEventKind::Release {
        app.input.release(key_event.code);
        return;
    }

    if handle_modal_input(app, key_event) {
        return;
    }
    if handle_palette_input(app, key_event, now) {
        return;
    }

    // Everything below is rate-limited; text entry above is not
    if !app.input.press_at(key_event.code, now) {
        return;
    }

    if handle_drag_keys(app, key_event) {
        return;
    }
    if handle_global_keys(app, key_event) {
        return;
    }
    match app.focus {
        Focus::Sidebar => handle_sidebar_keys(app, key_event),
        Focus::Detail => handle_detail_keys(app, key_event),
    }
}

/// Handle modal input - returns true if a modal absorbed the input
fn handle_modal_input(app: &mut App, key_event: KeyEvent) -> bool {
    let Some(modal) = app.modal.as_mut() else {
        return false;
    };

    match modal.handle_input(key_event) {
        ModalAction::None => {}
        ModalAction::Close => app.modal = None,
        ModalAction::SubmitPath { purpose, input } => app.submit_path(purpose, &input),
        ModalAction::ConfirmRemove(project_id) => app.confirm_remove(project_id),
        ModalAction::CopyLogs => {
            if let Some(Modal::Logs { min_level, .. }) = &app.modal {
                let min_level = *min_level;
                app.copy_logs(min_level);
            }
        }
    }
    true
}

/// Palette takes every key while open
fn handle_palette_input(app: &mut App, key_event: KeyEvent, now: Instant) -> bool {
    if !app.palette.is_open() {
        return false;
    }
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        KeyCode::Esc => app.close_palette(),
        KeyCode::Char('k') if ctrl => app.close_palette(),
        KeyCode::Enter => app.palette_select(),
        KeyCode::Up => app.palette.move_up(),
        KeyCode::Char('p') if ctrl => app.palette.move_up(),
        KeyCode::Down | KeyCode::Tab => app.palette.move_down(),
        KeyCode::Char('n') if ctrl => app.palette.move_down(),
        KeyCode::Backspace => app.palette.backspace(now),
        KeyCode::Char(c) if !ctrl => app.palette.input_char(c, now),
        _ => {}
    }
    true
}

/// Keyboard reordering owns the keys until dropped or cancelled
fn handle_drag_keys(app: &mut App, key_event: KeyEvent) -> bool {
    if !app.drag.is_active() {
        return false;
    }
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_drag_target(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_drag_target(1),
        KeyCode::Enter | KeyCode::Char('m') => app.finish_drag(),
        KeyCode::Esc => app.cancel_drag(),
        _ => {}
    }
    true
}

/// Handle global keys - returns true if handled
fn handle_global_keys(app: &mut App, key_event: KeyEvent) -> bool {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('k') if ctrl => app.open_palette(),
        KeyCode::Char('/') => app.open_palette(),
        KeyCode::Char('?') => app.modal = Some(Modal::help()),
        KeyCode::Char('L') => app.modal = Some(Modal::logs()),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Char('b') => app.toggle_sidebar(),
        KeyCode::Char('c') => app.copy_active_path(),
        KeyCode::Char('p') => app.pull(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('g') => app.generate_diagram(),
        KeyCode::Char('a') => app.open_add_project(),
        _ => return false,
    }
    true
}

fn handle_sidebar_keys(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => app.sidebar.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.sidebar.move_down(&app.cache),
        KeyCode::Home => app.sidebar.move_to_top(),
        KeyCode::End => app.sidebar.move_to_bottom(&app.cache),
        KeyCode::Enter => app.select_cursor(),
        KeyCode::Char(' ') => app.toggle_cursor_expand(),
        KeyCode::Left | KeyCode::Char('h') => app.collapse_cursor(),
        KeyCode::Right | KeyCode::Char('l') => app.expand_cursor(),
        KeyCode::Char('m') => app.begin_keyboard_drag(),
        KeyCode::Char('e') => app.open_edit_path(),
        KeyCode::Char('d') | KeyCode::Delete => app.open_confirm_remove(),
        _ => {}
    }
}

fn handle_detail_keys(app: &mut App, key_event: KeyEvent) {
    let Some(diagram) = app.diagram.as_mut() else {
        if app.detail.handle_key(key_event) == Handled::No && key_event.code == KeyCode::Esc {
            app.toggle_focus();
        }
        return;
    };

    if diagram.viewport.handle_key(key_event) == Handled::Yes {
        return;
    }
    match key_event.code {
        KeyCode::Char('s') => app.export_diagram(),
        KeyCode::Char('y') => app.copy_diagram_source(),
        KeyCode::Esc => {
            // Leave the viewer for the project it belongs to
            let project_id = diagram.project_id.clone();
            app.navigate(crate::dashboard::SelectedItem::Project { project_id });
        }
        _ => {}
    }
}

/// Handle mouse input
///
/// Sidebar: click selects, press-drag-release across projects reorders,
/// wheel moves the cursor. Diagram: drag pans, Ctrl+wheel zooms.
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.modal.is_some() || app.palette.is_open() {
        return;
    }
    let (column, row) = (mouse_event.column, mouse_event.row);
    let sidebar_row = app.layout.sidebar_row_at(column, row);
    let in_detail = app.layout.in_detail(column, row);
    let ctrl = mouse_event.modifiers.contains(KeyModifiers::CONTROL);

    match mouse_event.kind {
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            let up = mouse_event.kind == MouseEventKind::ScrollUp;
            if sidebar_row.is_some() {
                if up {
                    app.sidebar.move_up();
                } else {
                    app.sidebar.move_down(&app.cache);
                }
            } else if in_detail {
                match app.diagram.as_mut() {
                    Some(diagram) if ctrl => {
                        if up {
                            diagram.viewport.zoom_in();
                        } else {
                            diagram.viewport.zoom_out();
                        }
                    }
                    Some(diagram) => diagram.viewport.pan_by(0, if up { 1 } else { -1 }),
                    None => {
                        let code = if up { KeyCode::Up } else { KeyCode::Down };
                        app.detail.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
                    }
                }
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(index) = sidebar_row {
                app.sidebar_press(index);
            } else if in_detail {
                app.focus = Focus::Detail;
                if let Some(diagram) = app.diagram.as_mut() {
                    diagram.viewport.begin_pan(column, row);
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.pressed_row.is_some() {
                if let Some(index) = sidebar_row {
                    app.sidebar_drag(index);
                }
            } else if let Some(diagram) = app.diagram.as_mut() {
                diagram.viewport.drag_to(column, row);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.pressed_row.is_some() || app.drag.is_active() {
                app.sidebar_release(sidebar_row);
            }
            if let Some(diagram) = app.diagram.as_mut() {
                diagram.viewport.end_pan();
            }
        }
        _ => {}
    }
}
