//! Interactive trait for panes that handle keyboard input

use crossterm::event::KeyEvent;

/// Whether a pane consumed a key or let it bubble up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Yes,
    No,
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled {
            Self::Yes
        } else {
            Self::No
        }
    }
}

/// Implemented by panes that take keys when focused
///
/// ```text
/// KeyEvent → modal → palette → global keys → focused pane (Interactive)
/// ```
pub trait Interactive {
    fn handle_key(&mut self, key: KeyEvent) -> Handled;

    /// Key hints shown in the status bar while focused
    fn focus_hint(&self) -> &'static str {
        ""
    }
}
