// Color themes for the TUI
//
// Two built-in palettes selected by name from config (`theme = "..."`).
// Names are matched case-insensitively; anything unknown gets Deck Dark.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Terminal
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    // Chrome
    pub border: Color,
    pub border_focused: Color,
    pub border_type: BorderType,
    pub title: Color,
    pub status_bar: Color,

    // Selection and drag feedback
    pub selection: Color,
    pub selection_fg: Color,
    pub drop_target: Color,

    // Semantic
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub progress_fill: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::deck_dark()
    }
}

impl Theme {
    pub const NAMES: [&'static str; 2] = ["Deck Dark", "Deck Light"];

    pub fn by_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "deck light" | "deck-light" | "light" => Self::deck_light(),
            "deck dark" | "deck-dark" | "dark" => Self::deck_dark(),
            other => {
                tracing::debug!("Unknown theme {:?}, using Deck Dark", other);
                Self::deck_dark()
            }
        }
    }

    pub fn deck_dark() -> Self {
        Self {
            name: "Deck Dark".to_string(),
            background: Color::Rgb(30, 33, 40),
            foreground: Color::Rgb(220, 223, 228),
            muted: Color::Rgb(130, 137, 151),
            border: Color::Rgb(75, 82, 99),
            border_focused: Color::Rgb(97, 175, 239),
            border_type: BorderType::Rounded,
            title: Color::Rgb(86, 182, 194),
            status_bar: Color::Rgb(40, 44, 52),
            selection: Color::Rgb(62, 68, 81),
            selection_fg: Color::Rgb(236, 239, 244),
            drop_target: Color::Rgb(229, 192, 123),
            accent: Color::Rgb(198, 120, 221),
            success: Color::Rgb(152, 195, 121),
            warning: Color::Rgb(229, 192, 123),
            error: Color::Rgb(224, 108, 117),
            progress_fill: Color::Rgb(97, 175, 239),
        }
    }

    pub fn deck_light() -> Self {
        Self {
            name: "Deck Light".to_string(),
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Rgb(56, 58, 66),
            muted: Color::Rgb(140, 143, 153),
            border: Color::Rgb(200, 202, 208),
            border_focused: Color::Rgb(64, 120, 242),
            border_type: BorderType::Rounded,
            title: Color::Rgb(1, 132, 188),
            status_bar: Color::Rgb(234, 234, 235),
            selection: Color::Rgb(215, 225, 245),
            selection_fg: Color::Rgb(40, 42, 48),
            drop_target: Color::Rgb(193, 132, 1),
            accent: Color::Rgb(166, 38, 164),
            success: Color::Rgb(80, 161, 79),
            warning: Color::Rgb(193, 132, 1),
            error: Color::Rgb(228, 86, 73),
            progress_fill: Color::Rgb(64, 120, 242),
        }
    }

    /// Border color for a pane depending on focus
    pub fn pane_border(&self, focused: bool) -> Color {
        if focused {
            self.border_focused
        } else {
            self.border
        }
    }

    /// Color for a change status badge
    pub fn status_color(&self, status: &str) -> Color {
        match status.to_lowercase().as_str() {
            "done" | "complete" | "completed" | "archived" => self.success,
            "in-progress" | "in_progress" | "active" => self.progress_fill,
            "blocked" | "failed" => self.error,
            "review" | "in-review" => self.warning,
            _ => self.muted,
        }
    }
}
