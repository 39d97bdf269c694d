// TUI application state
//
// App is the orchestrator: it owns the dashboard state machines, applies
// input to them and folds API results back in. It never awaits. Anything
// that needs the network is queued as an `Effect` and comes back later as
// an `AppMessage`.

use super::components::detail_panel::DetailPanel;
use super::components::Toast;
use super::effects::{AppMessage, Effect};
use super::input::InputHandler;
use super::layout::DashboardLayout;
use super::modal::{resolve_project_dir, Modal, PathPurpose};
use crate::api::{ApiError, DiagramResponse, ProjectId};
use crate::config::Config;
use crate::dashboard::{
    prune_selection, CommandPalette, DashboardCache, DiagramView, DragState, DropOutcome,
    PaletteAction, QuickAction, ReorderLedger, SelectOutcome, SelectedItem, SidebarRow,
    SidebarTree, StatusSummary,
};
use crate::logging::{LogBuffer, LogLevel};
use crate::theme::Theme;
use std::time::Instant;

/// Which pane receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sidebar,
    Detail,
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub cache: DashboardCache,
    /// What the detail pane shows
    pub selected: Option<SelectedItem>,
    pub sidebar: SidebarTree,
    pub drag: DragState,
    /// Sidebar row under a held mouse button, until release or drag
    pub pressed_row: Option<SidebarRow>,
    pub ledger: ReorderLedger,
    pub palette: CommandPalette,
    /// Open diagram viewer (only while a diagram is selected)
    pub diagram: Option<DiagramView>,
    /// Project whose diagram is being generated
    pub diagram_pending: Option<ProjectId>,
    pub detail: DetailPanel,
    pub focus: Focus,
    pub sidebar_collapsed: bool,
    pub modal: Option<Modal>,
    pub toast: Option<Toast>,
    pub log_buffer: LogBuffer,
    pub input: InputHandler,
    /// Regions drawn in the last frame, for mouse hit-testing
    pub layout: DashboardLayout,
    /// First sidebar row drawn in the last frame
    pub sidebar_offset: usize,
    pub should_quit: bool,
    /// Animation frame for spinners
    pub frame: usize,
    effects: Vec<Effect>,
}

impl App {
    pub fn new(config: Config, log_buffer: LogBuffer) -> Self {
        let mut app = Self {
            theme: Theme::by_name(&config.theme),
            sidebar_collapsed: config.ui.sidebar_collapsed,
            palette: CommandPalette::new(&config.palette),
            config,
            cache: DashboardCache::default(),
            selected: None,
            sidebar: SidebarTree::default(),
            drag: DragState::default(),
            pressed_row: None,
            ledger: ReorderLedger::default(),
            diagram: None,
            diagram_pending: None,
            detail: DetailPanel::default(),
            focus: Focus::default(),
            modal: None,
            toast: None,
            log_buffer,
            input: InputHandler::default(),
            layout: DashboardLayout::default(),
            sidebar_offset: 0,
            should_quit: false,
            frame: 0,
            effects: Vec::new(),
        };
        app.push(Effect::LoadProjects);
        app
    }

    // ─────────────────────────────────────────────────────────────────────
    // Effects and notifications
    // ─────────────────────────────────────────────────────────────────────

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Drain queued effects for the event loop to spawn
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    fn show_api_error(&mut self, err: &ApiError, fallback: &str) {
        tracing::warn!("{}: {}", fallback, err);
        self.toast = Some(Toast::error(format!("✗ {}", err.toast_message(fallback))));
    }

    pub fn spinner_char(&self) -> char {
        const FRAMES: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];
        FRAMES[self.frame % FRAMES.len()]
    }

    /// Periodic tick: toast expiry, spinners, palette debounce
    pub fn tick(&mut self, now: Instant) {
        self.frame = self.frame.wrapping_add(1);
        if self.toast.as_ref().is_some_and(|t| t.is_expired_at(now)) {
            self.toast = None;
        }
        if let Some(request) = self.palette.tick(now, &self.cache) {
            self.push(Effect::Search(request));
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Derived state
    // ─────────────────────────────────────────────────────────────────────

    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        self.sidebar.rows(&self.cache)
    }

    pub fn status_summary(&self) -> Option<StatusSummary> {
        let project = self.cache.active_project()?;
        Some(StatusSummary::derive(project, self.cache.git.get(&project.id)))
    }

    pub fn is_loading(&self) -> bool {
        !self.cache.loaded || self.diagram_pending.is_some() || self.ledger.in_flight()
    }

    /// Project the global actions (pull, diagram) apply to
    fn target_project(&self) -> Option<ProjectId> {
        self.selected
            .as_ref()
            .and_then(|s| s.project_id())
            .filter(|id| self.cache.project(id).is_some())
            .map(str::to_string)
            .or_else(|| self.cache.active.clone())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the selection and fetch whatever the new item shows
    pub fn set_selected(&mut self, item: Option<SelectedItem>) {
        self.detail.reset();
        if !matches!(item, Some(SelectedItem::Diagram { .. })) {
            self.diagram = None;
        }
        match &item {
            Some(SelectedItem::StandaloneTasks { project_id }) => {
                self.push(Effect::LoadTasks(project_id.clone()));
            }
            Some(SelectedItem::Archived { project_id }) => {
                self.push(Effect::LoadArchived(project_id.clone()));
            }
            _ => {}
        }
        self.selected = item;
    }

    /// Apply a sidebar selection; activation runs in the background
    fn apply_outcome(&mut self, outcome: SelectOutcome) {
        self.set_selected(Some(outcome.selected));
        if let Some(project_id) = outcome.activate {
            tracing::debug!("Activating project {}", project_id);
            self.cache.set_active(&project_id);
            self.push(Effect::Activate(project_id.clone()));
            self.push(Effect::LoadGit(project_id));
        }
    }

    pub fn select_row(&mut self, row: &SidebarRow) {
        self.sidebar.focus_row(&self.cache, row);
        let outcome = self.sidebar.select_row(&self.cache, row);
        self.apply_outcome(outcome);
    }

    pub fn select_cursor(&mut self) {
        if let Some(row) = self.sidebar.cursor_row(&self.cache) {
            self.select_row(&row);
        }
    }

    /// Navigate to an item chosen in the palette
    ///
    /// Items pointing at a project or change that no longer exists clear
    /// the selection instead.
    pub fn navigate(&mut self, item: SelectedItem) {
        if !item.still_exists(&self.cache.projects) {
            tracing::debug!("Palette target {:?} no longer exists", item);
            self.set_selected(None);
            return;
        }
        match &item {
            SelectedItem::Project { project_id } => {
                let outcome = self.sidebar.select_project(&self.cache, project_id);
                self.sidebar.focus_row(
                    &self.cache,
                    &SidebarRow::Project {
                        project_id: project_id.clone(),
                    },
                );
                self.apply_outcome(outcome);
            }
            SelectedItem::Change {
                project_id,
                change_id,
            } => {
                let outcome = self.sidebar.select_change(&self.cache, project_id, change_id);
                self.sidebar.focus_row(
                    &self.cache,
                    &SidebarRow::Change {
                        project_id: project_id.clone(),
                        change_id: change_id.clone(),
                    },
                );
                self.apply_outcome(outcome);
            }
            _ => self.set_selected(Some(item)),
        }
        self.focus = Focus::Detail;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Sidebar
    // ─────────────────────────────────────────────────────────────────────

    /// Space: flip the project under the cursor
    pub fn toggle_cursor_expand(&mut self) {
        if let Some(row) = self.sidebar.cursor_row(&self.cache) {
            let project_id = row.project_id().to_string();
            self.sidebar.toggle_expand(&project_id);
            self.sidebar.focus_row(&self.cache, &SidebarRow::Project { project_id });
        }
    }

    /// ←: collapse the cursor's project and move onto it
    pub fn collapse_cursor(&mut self) {
        if let Some(row) = self.sidebar.cursor_row(&self.cache) {
            let project_id = row.project_id().to_string();
            if self.sidebar.is_expanded(&project_id) {
                self.sidebar.toggle_expand(&project_id);
            }
            self.sidebar.focus_row(&self.cache, &SidebarRow::Project { project_id });
        }
    }

    /// →: expand the cursor's project
    pub fn expand_cursor(&mut self) {
        if let Some(row) = self.sidebar.cursor_row(&self.cache) {
            self.sidebar.expand(row.project_id());
        }
    }

    fn cursor_project(&self) -> Option<ProjectId> {
        match self.sidebar.cursor_row(&self.cache)? {
            SidebarRow::Project { project_id } => Some(project_id),
            _ => None,
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        if self.sidebar_collapsed {
            self.focus = Focus::Detail;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Detail,
            Focus::Detail if !self.sidebar_collapsed => Focus::Sidebar,
            Focus::Detail => Focus::Detail,
        };
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reordering
    // ─────────────────────────────────────────────────────────────────────

    /// `m` on a project row: pick it up
    pub fn begin_keyboard_drag(&mut self) {
        if let Some(project_id) = self.cursor_project() {
            self.drag.begin(&project_id);
            self.drag.hover(&project_id);
        }
    }

    /// ↑/↓ while dragging: move the drop target by `delta` projects
    pub fn move_drag_target(&mut self, delta: isize) {
        let order = self.cache.project_order();
        let Some(current) = self.drag.target().or(self.drag.source()) else {
            return;
        };
        let Some(idx) = order.iter().position(|id| id == current) else {
            return;
        };
        let next = idx.saturating_add_signed(delta).min(order.len().saturating_sub(1));
        let target = order[next].clone();
        self.drag.hover(&target);
        self.sidebar
            .focus_row(&self.cache, &SidebarRow::Project { project_id: target });
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
        self.pressed_row = None;
    }

    /// Drop: apply the new order locally, then persist it
    pub fn finish_drag(&mut self) {
        let source = self.drag.source().map(str::to_string);
        let previous = self.cache.project_order();
        match self.drag.drop_on(&previous) {
            DropOutcome::NoOp => {}
            DropOutcome::Reordered(order) => {
                let seq = self.ledger.begin(previous, order.clone());
                self.cache.apply_order(&order);
                tracing::info!("Reordered projects (#{}): {:?}", seq, order);
                self.push(Effect::Reorder { seq, order });
            }
        }
        if let Some(project_id) = source {
            self.sidebar
                .focus_row(&self.cache, &SidebarRow::Project { project_id });
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mouse on the sidebar
    // ─────────────────────────────────────────────────────────────────────

    fn row_at(&self, index: usize) -> Option<SidebarRow> {
        self.sidebar_rows().into_iter().nth(index + self.sidebar_offset)
    }

    pub fn sidebar_press(&mut self, index: usize) {
        self.pressed_row = self.row_at(index);
    }

    /// Pointer moved with the button held; a move onto another project
    /// turns the press into a drag
    pub fn sidebar_drag(&mut self, index: usize) {
        let Some(SidebarRow::Project { project_id: source }) = self.pressed_row.clone() else {
            return;
        };
        let Some(row) = self.row_at(index) else {
            return;
        };
        let target = row.project_id();
        if !self.drag.is_active() {
            if target == source {
                return;
            }
            self.drag.begin(&source);
        }
        self.drag.hover(target);
    }

    /// Release: drop a drag, or treat press+release on one row as a click
    pub fn sidebar_release(&mut self, index: Option<usize>) {
        let pressed = self.pressed_row.take();
        let row = index.and_then(|i| self.row_at(i));

        if self.drag.is_active() {
            match &row {
                Some(row) => {
                    self.drag.hover(row.project_id());
                    self.finish_drag();
                }
                // Released outside the list
                None => self.cancel_drag(),
            }
            return;
        }

        match (pressed, row) {
            (Some(pressed), Some(row)) if pressed == row => self.click_row(&row),
            _ => {}
        }
    }

    fn click_row(&mut self, row: &SidebarRow) {
        self.focus = Focus::Sidebar;
        if let SidebarRow::Project { project_id } = row {
            let already = matches!(&self.selected,
                Some(SelectedItem::Project { project_id: id }) if id == project_id);
            if already {
                self.sidebar.toggle_expand(project_id);
                self.sidebar.focus_row(&self.cache, row);
                return;
            }
        }
        self.select_row(row);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Command palette
    // ─────────────────────────────────────────────────────────────────────

    pub fn open_palette(&mut self) {
        self.input.reset();
        self.palette.open();
    }

    pub fn close_palette(&mut self) {
        self.palette.close();
    }

    /// Enter in the palette
    pub fn palette_select(&mut self) {
        let Some(action) = self.palette.select(&self.cache) else {
            return;
        };
        self.palette.close();
        match action {
            PaletteAction::Navigate(item) => self.navigate(item),
            PaletteAction::Quick(action) => self.run_quick_action(action),
            PaletteAction::CopyText(text) => self.copy(&text, "result to clipboard"),
        }
    }

    pub fn run_quick_action(&mut self, action: QuickAction) {
        match action {
            QuickAction::AddProject => self.open_add_project(),
            QuickAction::OpenSettings => {
                self.set_selected(Some(SelectedItem::Settings));
                self.focus = Focus::Detail;
            }
            QuickAction::GenerateDiagram => self.generate_diagram(),
            QuickAction::Refresh => self.refresh(),
            QuickAction::ToggleSidebar => self.toggle_sidebar(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Project management
    // ─────────────────────────────────────────────────────────────────────

    pub fn open_add_project(&mut self) {
        self.input.reset();
        self.modal = Some(Modal::add_project());
    }

    /// `e` on a project row
    pub fn open_edit_path(&mut self) {
        let Some(project) = self.cursor_project().and_then(|id| self.cache.project(&id)) else {
            return;
        };
        self.modal = Some(Modal::edit_path(&project.id, &project.path));
        self.input.reset();
    }

    /// `d` on a project row
    pub fn open_confirm_remove(&mut self) {
        let Some(project) = self.cursor_project().and_then(|id| self.cache.project(&id)) else {
            return;
        };
        self.modal = Some(Modal::confirm_remove(&project.id, &project.name));
    }

    /// Enter in the path modal: validate, then send
    pub fn submit_path(&mut self, purpose: PathPurpose, input: &str) {
        let path = match resolve_project_dir(input) {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(message) => {
                if let Some(modal) = &mut self.modal {
                    modal.set_error(message);
                }
                return;
            }
        };
        self.modal = None;
        match purpose {
            PathPurpose::AddProject => {
                self.show_toast(format!("Adding {}…", path));
                self.push(Effect::AddProject(path));
            }
            PathPurpose::EditPath(project_id) => {
                self.show_toast("Updating project folder…");
                self.push(Effect::UpdatePath { project_id, path });
            }
        }
    }

    pub fn confirm_remove(&mut self, project_id: ProjectId) {
        self.modal = None;
        self.push(Effect::RemoveProject(project_id));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Status bar actions
    // ─────────────────────────────────────────────────────────────────────

    fn copy(&mut self, text: &str, what: &str) {
        let message = super::clipboard::copy_with_feedback(text, what);
        self.show_toast(message);
    }

    /// `c`: full path of the active project
    pub fn copy_active_path(&mut self) {
        match self.status_summary() {
            Some(status) => self.copy(&status.cwd_full, "path"),
            None => self.show_toast("No active project"),
        }
    }

    /// `p`: pull the target project
    pub fn pull(&mut self) {
        let Some(project_id) = self.target_project() else {
            self.show_toast("No active project");
            return;
        };
        let name = self
            .cache
            .project(&project_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        self.show_toast(format!("Pulling {}…", name));
        self.push(Effect::Pull(project_id));
    }

    /// `r`: re-fetch everything visible
    pub fn refresh(&mut self) {
        self.push(Effect::LoadProjects);
        if let Some(active) = self.cache.active.clone() {
            self.push(Effect::LoadGit(active));
        }
        match self.selected.clone() {
            Some(SelectedItem::StandaloneTasks { project_id }) => {
                self.push(Effect::LoadTasks(project_id))
            }
            Some(SelectedItem::Archived { project_id }) => {
                self.push(Effect::LoadArchived(project_id))
            }
            _ => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Diagram
    // ─────────────────────────────────────────────────────────────────────

    /// `g`: generate the architecture diagram of the target project
    pub fn generate_diagram(&mut self) {
        let Some(project) = self
            .target_project()
            .and_then(|id| self.cache.project(&id))
        else {
            self.show_toast("Select a project first");
            return;
        };
        let message = format!("Generating diagram for {}…", project.name);
        let effect = Effect::GenerateDiagram {
            project_id: project.id.clone(),
            project_path: project.path.clone(),
        };
        self.diagram_pending = Some(project.id.clone());
        self.show_toast(message);
        self.push(effect);
    }

    fn open_diagram(&mut self, project_id: ProjectId, response: DiagramResponse) {
        let name = self
            .cache
            .project(&project_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| project_id.clone());
        if let Some(message) = &response.message {
            self.show_toast(message.clone());
        }
        self.set_selected(Some(SelectedItem::Diagram {
            project_id: project_id.clone(),
        }));
        self.diagram = Some(DiagramView::new(project_id, name, response));
        self.focus = Focus::Detail;
    }

    /// `s` in the diagram viewer
    pub fn export_diagram(&mut self) {
        let Some(diagram) = &self.diagram else {
            return;
        };
        let message = match diagram.export_svg(&self.config.ui.export_dir) {
            Ok(path) => {
                tracing::info!("Exported diagram to {}", path.display());
                format!("✓ Exported {}", path.display())
            }
            Err(e) => {
                tracing::warn!("Diagram export failed: {}", e);
                format!("✗ Export failed: {}", e)
            }
        };
        self.show_toast(message);
    }

    /// `y` in the diagram viewer
    pub fn copy_diagram_source(&mut self) {
        if let Some(source) = self.diagram.as_ref().map(|d| d.source().to_string()) {
            self.copy(&source, "diagram source");
        }
    }

    /// `y` in the logs modal
    pub fn copy_logs(&mut self, min_level: LogLevel) {
        let text = self
            .log_buffer
            .recent(usize::MAX, min_level)
            .iter()
            .map(|e| {
                format!(
                    "{} {:5} {} {}",
                    e.timestamp.format("%H:%M:%S"),
                    e.level.as_str(),
                    e.target,
                    e.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.copy(&text, "logs");
    }

    // ─────────────────────────────────────────────────────────────────────
    // API results
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::ProjectsLoaded(Ok(projects)) => self.on_projects(projects),
            AppMessage::ProjectsLoaded(Err(e)) => {
                self.show_api_error(&e, "Could not load projects")
            }

            AppMessage::Activated { project_id, result } => {
                self.cache.settle_active(&project_id);
                match result {
                    Ok(()) => tracing::debug!("Project {} is active", project_id),
                    Err(e) => {
                        // The local selection stays; the list tells us who is active
                        self.show_api_error(&e, "Failed to activate project");
                        self.push(Effect::LoadProjects);
                    }
                }
            }

            AppMessage::ReorderSaved { seq, result } => match result {
                Ok(()) => self.ledger.succeeded(seq),
                Err(e) => {
                    self.show_api_error(&e, "Failed to save project order");
                    if let Some(previous) = self.ledger.failed(seq) {
                        tracing::info!("Rolling back project order (#{})", seq);
                        self.cache.apply_order(&previous);
                        self.push(Effect::LoadProjects);
                    }
                }
            },

            AppMessage::ProjectAdded(result) => match result {
                Ok(project) => {
                    self.show_toast(format!("✓ Added {}", project.name));
                    self.cache.upsert_project(project);
                    self.push(Effect::LoadProjects);
                }
                Err(e) => self.show_api_error(&e, "Failed to add project"),
            },

            AppMessage::ProjectRemoved { project_id, result } => match result {
                Ok(()) => {
                    let name = self
                        .cache
                        .project(&project_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| project_id.clone());
                    self.cache.remove_project(&project_id);
                    self.after_projects_changed();
                    self.show_toast(format!("✓ Removed {}", name));
                    self.push(Effect::LoadProjects);
                }
                Err(e) => self.show_api_error(&e, "Failed to remove project"),
            },

            AppMessage::PathUpdated(result) => match result {
                Ok(project) => {
                    let project_id = project.id.clone();
                    self.show_toast(format!("✓ {} now points at {}", project.name, project.path));
                    self.cache.upsert_project(project);
                    self.push(Effect::LoadProjects);
                    self.push(Effect::LoadGit(project_id));
                }
                Err(e) => self.show_api_error(&e, "Failed to update project path"),
            },

            AppMessage::GitLoaded { project_id, result } => match result {
                Ok(status) => {
                    self.cache.git.insert(project_id, status);
                }
                Err(e) => tracing::warn!("Git status for {} failed: {}", project_id, e),
            },

            AppMessage::Pulled { project_id, result } => match result {
                Ok(()) => {
                    self.show_toast("✓ Pulled");
                    self.push(Effect::LoadGit(project_id));
                    self.push(Effect::LoadProjects);
                }
                Err(e) => self.show_api_error(&e, "Pull failed"),
            },

            AppMessage::TasksLoaded { project_id, result } => match result {
                Ok(tasks) => {
                    self.cache.tasks.insert(project_id, tasks);
                }
                Err(e) => {
                    self.show_api_error(&e, "Could not load tasks");
                    self.cache.tasks.insert(project_id, Vec::new());
                }
            },

            AppMessage::ArchivedLoaded { project_id, result } => match result {
                Ok(archived) => {
                    self.cache.archived.insert(project_id, archived);
                }
                Err(e) => {
                    self.show_api_error(&e, "Could not load archived changes");
                    self.cache.archived.insert(project_id, Vec::new());
                }
            },

            AppMessage::SearchResults {
                generation,
                results,
            } => {
                self.palette.apply(generation, results);
            }

            AppMessage::DiagramGenerated { project_id, result } => {
                if self.diagram_pending.as_deref() != Some(project_id.as_str()) {
                    tracing::debug!("Ignoring superseded diagram for {}", project_id);
                    return;
                }
                self.diagram_pending = None;
                match result {
                    Ok(response) => self.open_diagram(project_id, response),
                    Err(e) => self.show_api_error(&e, "Failed to generate diagram"),
                }
            }
        }
    }

    fn on_projects(&mut self, projects: Vec<crate::api::Project>) {
        let first_load = !self.cache.loaded;
        tracing::info!("Loaded {} projects", projects.len());
        self.cache.replace_projects(projects);
        if let Some(order) = self.ledger.pending_order() {
            self.cache.apply_order(order);
        }
        self.after_projects_changed();

        let Some(active) = self.cache.active.clone() else {
            return;
        };
        if first_load && self.selected.is_none() {
            self.sidebar.expand(&active);
            let row = SidebarRow::Project {
                project_id: active.clone(),
            };
            self.sidebar.focus_row(&self.cache, &row);
            self.selected = Some(row.to_selection());
        }
        if !self.cache.git.contains_key(&active) {
            self.push(Effect::LoadGit(active));
        }
    }

    /// Drop state that points at projects which are gone
    fn after_projects_changed(&mut self) {
        if prune_selection(&mut self.selected, &self.cache.projects) {
            self.detail.reset();
        }
        if self
            .diagram
            .as_ref()
            .is_some_and(|d| self.cache.project(&d.project_id).is_none())
        {
            self.diagram = None;
        }
        if let Some(source) = self.drag.source() {
            if self.cache.project(source).is_none() {
                self.drag.cancel();
            }
        }
        self.sidebar.retain_projects(&self.cache);
        self.sidebar.clamp_cursor(&self.cache);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DiagramSource, GitStatus};
    use crate::dashboard::test_support::{change, project};

    /// Server state at startup: [a*, b, c, d]
    fn server_projects() -> Vec<crate::api::Project> {
        let mut web = project("a", "web", vec![change("c1", "Add auth")]);
        web.is_active = true;
        vec![
            web,
            project("b", "api", vec![]),
            project("c", "docs", vec![]),
            project("d", "infra", vec![]),
        ]
    }

    fn loaded_app() -> App {
        let mut app = App::new(Config::default(), LogBuffer::new());
        assert_eq!(app.take_effects(), vec![Effect::LoadProjects]);
        app.handle_message(AppMessage::ProjectsLoaded(Ok(server_projects())));
        app
    }

    fn order(app: &App) -> Vec<&str> {
        app.cache.projects.iter().map(|p| p.id.as_str()).collect()
    }

    fn server_error(message: &str) -> ApiError {
        ApiError::Status {
            status: 500,
            message: message.into(),
        }
    }

    #[test]
    fn first_load_selects_active_project_and_fetches_git() {
        let mut app = loaded_app();
        assert_eq!(
            app.selected,
            Some(SelectedItem::Project { project_id: "a".into() })
        );
        assert!(app.sidebar.is_expanded("a"));
        assert_eq!(app.take_effects(), vec![Effect::LoadGit("a".into())]);
    }

    #[test]
    fn selecting_inactive_project_activates_in_background() {
        let mut app = loaded_app();
        app.take_effects();

        app.select_row(&SidebarRow::Project { project_id: "b".into() });

        assert_eq!(
            app.selected,
            Some(SelectedItem::Project { project_id: "b".into() })
        );
        assert!(app.cache.is_active("b"));
        assert_eq!(
            app.take_effects(),
            vec![Effect::Activate("b".into()), Effect::LoadGit("b".into())]
        );
    }

    #[test]
    fn failed_activation_toasts_and_refetches_but_keeps_selection() {
        let mut app = loaded_app();
        app.select_row(&SidebarRow::Project { project_id: "b".into() });
        app.take_effects();

        app.handle_message(AppMessage::Activated {
            project_id: "b".into(),
            result: Err(server_error("")),
        });

        assert!(app.toast.as_ref().unwrap().message.contains("Failed to activate project"));
        assert_eq!(app.take_effects(), vec![Effect::LoadProjects]);
        assert_eq!(
            app.selected,
            Some(SelectedItem::Project { project_id: "b".into() })
        );
    }

    #[test]
    fn keyboard_drag_reorders_and_persists() {
        let mut app = loaded_app();
        app.take_effects();
        app.sidebar.toggle_expand("a");
        app.sidebar.move_to_top();

        app.begin_keyboard_drag();
        app.move_drag_target(1);
        app.move_drag_target(1);
        app.finish_drag();

        assert_eq!(order(&app), ["b", "c", "a", "d"]);
        assert_eq!(
            app.take_effects(),
            vec![Effect::Reorder {
                seq: 1,
                order: vec!["b".into(), "c".into(), "a".into(), "d".into()]
            }]
        );
        assert!(!app.drag.is_active());
    }

    #[test]
    fn failed_latest_reorder_rolls_back_and_refetches() {
        let mut app = loaded_app();
        app.take_effects();
        app.drag.begin("a");
        app.drag.hover("c");
        app.finish_drag();
        app.take_effects();

        app.handle_message(AppMessage::ReorderSaved {
            seq: 1,
            result: Err(server_error("disk full")),
        });

        assert_eq!(order(&app), ["a", "b", "c", "d"]);
        assert_eq!(app.toast.as_ref().unwrap().message, "✗ disk full");
        assert_eq!(app.take_effects(), vec![Effect::LoadProjects]);
    }

    #[test]
    fn list_fetched_before_activation_keeps_new_active_project() {
        let mut app = loaded_app();
        app.refresh();
        app.select_row(&SidebarRow::Project { project_id: "b".into() });
        app.take_effects();

        // Refresh answered with the list from before the activation
        app.handle_message(AppMessage::ProjectsLoaded(Ok(server_projects())));
        app.handle_message(AppMessage::Activated {
            project_id: "b".into(),
            result: Ok(()),
        });

        assert!(app.cache.is_active("b"));
        assert_eq!(
            app.status_summary().map(|s| s.cwd_full),
            Some("/tmp/api".to_string())
        );
        assert_eq!(
            app.selected,
            Some(SelectedItem::Project { project_id: "b".into() })
        );
    }

    #[test]
    fn list_fetched_before_reorder_keeps_new_order() {
        let mut app = loaded_app();
        app.refresh();
        app.drag.begin("a");
        app.drag.hover("c");
        app.finish_drag();
        app.take_effects();
        assert_eq!(order(&app), ["b", "c", "a", "d"]);

        app.handle_message(AppMessage::ProjectsLoaded(Ok(server_projects())));
        assert_eq!(order(&app), ["b", "c", "a", "d"]);

        app.handle_message(AppMessage::ReorderSaved {
            seq: 1,
            result: Ok(()),
        });
        assert_eq!(order(&app), ["b", "c", "a", "d"]);
        assert!(!app.ledger.in_flight());
    }

    #[test]
    fn superseded_reorder_failure_only_toasts() {
        let mut app = loaded_app();
        app.take_effects();
        app.drag.begin("a");
        app.drag.hover("b");
        app.finish_drag();
        app.drag.begin("d");
        app.drag.hover("a");
        app.finish_drag();
        app.take_effects();
        let after_second = order(&app).join(",");

        app.handle_message(AppMessage::ReorderSaved {
            seq: 1,
            result: Err(server_error("conflict")),
        });

        assert_eq!(order(&app).join(","), after_second);
        assert!(app.toast.is_some());
        assert!(app.take_effects().is_empty());
    }

    #[test]
    fn self_drop_issues_no_mutation() {
        let mut app = loaded_app();
        app.take_effects();
        app.drag.begin("b");
        app.drag.hover("b");
        app.finish_drag();
        assert!(app.take_effects().is_empty());
    }

    #[test]
    fn mouse_press_release_on_same_row_is_a_click() {
        let mut app = loaded_app();
        app.take_effects();
        // rows: a, c1, inbox, archived, b, c, d
        app.sidebar_press(4);
        app.sidebar_release(Some(4));

        assert_eq!(
            app.selected,
            Some(SelectedItem::Project { project_id: "b".into() })
        );
        assert!(!app.drag.is_active());
    }

    #[test]
    fn mouse_drag_across_projects_reorders() {
        let mut app = loaded_app();
        app.take_effects();
        app.sidebar.toggle_expand("a");
        // rows: a, b, c, d
        app.sidebar_press(3);
        app.sidebar_drag(2);
        app.sidebar_drag(1);
        app.sidebar_release(Some(1));

        assert_eq!(order(&app), ["a", "d", "b", "c"]);
        assert!(matches!(app.take_effects().as_slice(), [Effect::Reorder { seq: 1, .. }]));
    }

    #[test]
    fn releasing_drag_outside_sidebar_cancels() {
        let mut app = loaded_app();
        app.take_effects();
        app.sidebar.toggle_expand("a");
        app.sidebar_press(3);
        app.sidebar_drag(1);
        assert!(app.drag.is_active());

        app.sidebar_release(None);

        assert!(!app.drag.is_active());
        assert_eq!(order(&app), ["a", "b", "c", "d"]);
        assert!(app.take_effects().is_empty());
    }

    #[test]
    fn removing_selected_project_clears_selection() {
        let mut app = loaded_app();
        app.take_effects();
        app.select_row(&SidebarRow::Project { project_id: "b".into() });
        app.take_effects();

        app.handle_message(AppMessage::ProjectRemoved {
            project_id: "b".into(),
            result: Ok(()),
        });

        assert!(app.selected.is_none());
        assert!(app.cache.project("b").is_none());
        assert_eq!(app.take_effects(), vec![Effect::LoadProjects]);
    }

    #[test]
    fn palette_navigation_to_vanished_change_clears_selection() {
        let mut app = loaded_app();
        app.navigate(SelectedItem::Change {
            project_id: "a".into(),
            change_id: "gone".into(),
        });
        assert!(app.selected.is_none());
    }

    #[test]
    fn inbox_selection_fetches_tasks() {
        let mut app = loaded_app();
        app.take_effects();
        app.select_row(&SidebarRow::Inbox { project_id: "a".into() });
        assert_eq!(app.take_effects(), vec![Effect::LoadTasks("a".into())]);
    }

    #[test]
    fn path_modal_rejects_missing_directory() {
        let mut app = loaded_app();
        app.open_add_project();
        app.submit_path(PathPurpose::AddProject, "/definitely/not/here/specdeck");

        let Some(Modal::PathInput { error, .. }) = &app.modal else {
            panic!("modal should stay open");
        };
        assert!(error.as_deref().unwrap().starts_with("Not a directory"));
    }

    #[test]
    fn diagram_result_opens_viewer() {
        let mut app = loaded_app();
        app.take_effects();
        app.generate_diagram();
        assert!(matches!(
            app.take_effects().as_slice(),
            [Effect::GenerateDiagram { project_id, project_path }]
                if project_id == "a" && project_path == "/tmp/web"
        ));

        app.handle_message(AppMessage::DiagramGenerated {
            project_id: "a".into(),
            result: Ok(DiagramResponse {
                mermaid_code: "graph TD\n  A --> B".into(),
                generated: DiagramSource::Simple,
                message: None,
            }),
        });

        assert_eq!(
            app.selected,
            Some(SelectedItem::Diagram { project_id: "a".into() })
        );
        assert!(app.diagram.is_some());
        assert_eq!(app.focus, Focus::Detail);

        // Leaving the viewer discards it
        app.select_row(&SidebarRow::Project { project_id: "a".into() });
        assert!(app.diagram.is_none());
    }

    #[test]
    fn status_summary_follows_active_project() {
        let mut app = loaded_app();
        app.handle_message(AppMessage::GitLoaded {
            project_id: "a".into(),
            result: Ok(GitStatus {
                branch: "main".into(),
                ahead: 2,
                ..Default::default()
            }),
        });

        let status = app.status_summary().unwrap();
        assert_eq!(status.cwd_full, "/tmp/web");
        let git = status.git.unwrap();
        assert_eq!(git.branch, "main");
        assert!(!git.dirty);
    }

    #[test]
    fn stale_search_results_never_reach_the_palette() {
        let mut app = loaded_app();
        app.open_palette();
        let t0 = Instant::now();
        for c in "auth".chars() {
            app.palette.input_char(c, t0);
        }
        app.tick(t0 + std::time::Duration::from_millis(400));
        let generation = app.palette.generation();

        app.close_palette();
        app.handle_message(AppMessage::SearchResults {
            generation,
            results: crate::dashboard::SearchResults::Memory(vec![]),
        });
        // Closing bumped the generation, so the memory source is untouched
        let memory = app
            .palette
            .sections()
            .into_iter()
            .find(|s| s.kind == crate::dashboard::palette::SectionKind::Memory)
            .expect("memory section still pending");
        assert!(memory.loading);
    }
}
