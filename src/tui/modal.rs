// Modal overlays
//
// Self-contained dialogs that handle their own input and return actions.
// App just holds Option<Modal>; the event loop acts on the returned
// ModalAction.

use crate::api::ProjectId;
use crate::logging::LogLevel;
use crate::util::expand_tilde;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPurpose {
    AddProject,
    EditPath(ProjectId),
}

impl PathPurpose {
    pub fn title(&self) -> &'static str {
        match self {
            Self::AddProject => "Add project",
            Self::EditPath(_) => "Change project folder",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalAction {
    /// Input consumed, nothing else to do
    None,
    Close,
    SubmitPath { purpose: PathPurpose, input: String },
    ConfirmRemove(ProjectId),
    CopyLogs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Help {
        scroll: u16,
    },
    /// Captured tracing output; `scroll` counts lines up from the newest
    Logs {
        scroll: usize,
        min_level: LogLevel,
    },
    PathInput {
        purpose: PathPurpose,
        input: String,
        error: Option<String>,
    },
    ConfirmRemove {
        project_id: ProjectId,
        name: String,
    },
}

impl Modal {
    pub fn help() -> Self {
        Modal::Help { scroll: 0 }
    }

    pub fn logs() -> Self {
        Modal::Logs {
            scroll: 0,
            min_level: LogLevel::Debug,
        }
    }

    pub fn add_project() -> Self {
        Modal::PathInput {
            purpose: PathPurpose::AddProject,
            input: String::new(),
            error: None,
        }
    }

    pub fn edit_path(project_id: &str, current: &str) -> Self {
        Modal::PathInput {
            purpose: PathPurpose::EditPath(project_id.to_string()),
            input: current.to_string(),
            error: None,
        }
    }

    pub fn confirm_remove(project_id: &str, name: &str) -> Self {
        Modal::ConfirmRemove {
            project_id: project_id.to_string(),
            name: name.to_string(),
        }
    }

    /// Show a validation problem under the path field
    pub fn set_error(&mut self, message: String) {
        if let Modal::PathInput { error, .. } = self {
            *error = Some(message);
        }
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> ModalAction {
        match self {
            Modal::Help { scroll } => match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                KeyCode::Up | KeyCode::Char('k') => {
                    *scroll = scroll.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    *scroll = scroll.saturating_add(1);
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
            Modal::Logs { scroll, min_level } => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('L') => ModalAction::Close,
                KeyCode::Up | KeyCode::Char('k') => {
                    *scroll = scroll.saturating_add(1);
                    ModalAction::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    *scroll = scroll.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::PageUp => {
                    *scroll = scroll.saturating_add(10);
                    ModalAction::None
                }
                KeyCode::PageDown => {
                    *scroll = scroll.saturating_sub(10);
                    ModalAction::None
                }
                KeyCode::End => {
                    *scroll = 0;
                    ModalAction::None
                }
                KeyCode::Char('l') => {
                    *min_level = next_level(*min_level);
                    *scroll = 0;
                    ModalAction::None
                }
                KeyCode::Char('y') => ModalAction::CopyLogs,
                _ => ModalAction::None,
            },
            Modal::PathInput {
                purpose,
                input,
                error,
            } => match key.code {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Enter => ModalAction::SubmitPath {
                    purpose: purpose.clone(),
                    input: input.clone(),
                },
                KeyCode::Backspace => {
                    input.pop();
                    *error = None;
                    ModalAction::None
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.clear();
                    *error = None;
                    ModalAction::None
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.push(c);
                    *error = None;
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
            Modal::ConfirmRemove { project_id, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    ModalAction::ConfirmRemove(project_id.clone())
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') => {
                    ModalAction::Close
                }
                _ => ModalAction::None,
            },
        }
    }
}

/// Cycle the logs filter: debug → info → warn → error → trace → debug
fn next_level(level: LogLevel) -> LogLevel {
    match level {
        LogLevel::Trace => LogLevel::Debug,
        LogLevel::Debug => LogLevel::Info,
        LogLevel::Info => LogLevel::Warn,
        LogLevel::Warn => LogLevel::Error,
        LogLevel::Error => LogLevel::Trace,
    }
}

/// Validate a folder typed into the path modal
///
/// Expands `~`, requires an existing directory and returns its absolute path.
pub fn resolve_project_dir(input: &str) -> Result<PathBuf, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Enter a folder path".to_string());
    }
    let path = expand_tilde(input);
    if !path.is_dir() {
        return Err(format!("Not a directory: {}", path.display()));
    }
    std::fs::canonicalize(&path).map_err(|e| format!("Cannot resolve {}: {}", path.display(), e))
}
