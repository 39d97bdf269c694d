/// Responsive layout for the dashboard.
///
/// Breakpoints are the single source of truth for width thresholds; the
/// dashboard layout is computed once per frame and kept on the App so mouse
/// events can be hit-tested against what was actually drawn.
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// < 60 cols: split pane, minimal terminal
    Compact,
    /// 60-99 cols: half-screen
    Normal,
    /// 100-139 cols: full terminal
    Wide,
    /// 140+ cols: ultrawide monitor
    UltraWide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=59 => Breakpoint::Compact,
            60..=99 => Breakpoint::Normal,
            100..=139 => Breakpoint::Wide,
            _ => Breakpoint::UltraWide,
        }
    }

    pub fn at_least(&self, min: Breakpoint) -> bool {
        *self >= min
    }

    /// Sidebar width (borders included)
    pub fn sidebar_width(&self) -> u16 {
        match self {
            Breakpoint::Compact => 22,
            Breakpoint::Normal => 28,
            Breakpoint::Wide => 34,
            Breakpoint::UltraWide => 42,
        }
    }
}

/// Screen regions of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardLayout {
    pub title: Rect,
    /// None while the sidebar is collapsed or the diagram is fullscreen
    pub sidebar: Option<Rect>,
    pub detail: Rect,
    pub status: Rect,
}

impl DashboardLayout {
    pub fn compute(area: Rect, show_sidebar: bool) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let body = rows[1];
        let sidebar_width = Breakpoint::from_width(area.width).sidebar_width();
        let (sidebar, detail) = if show_sidebar && body.width > sidebar_width + 10 {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(sidebar_width), Constraint::Min(10)])
                .split(body);
            (Some(cols[0]), cols[1])
        } else {
            (None, body)
        };

        Self {
            title: rows[0],
            sidebar,
            detail,
            status: rows[2],
        }
    }

    /// Index of the sidebar row under (column, row), before scrolling
    ///
    /// Rows start inside the top border.
    pub fn sidebar_row_at(&self, column: u16, row: u16) -> Option<usize> {
        let sidebar = self.sidebar?;
        let inner = Rect::new(
            sidebar.x + 1,
            sidebar.y + 1,
            sidebar.width.saturating_sub(2),
            sidebar.height.saturating_sub(2),
        );
        inner
            .contains(Position::new(column, row))
            .then(|| (row - inner.y) as usize)
    }

    pub fn in_detail(&self, column: u16, row: u16) -> bool {
        self.detail.contains(Position::new(column, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_thresholds() {
        assert_eq!(Breakpoint::from_width(40), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(59), Breakpoint::Compact);
        assert_eq!(Breakpoint::from_width(60), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(99), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(100), Breakpoint::Wide);
        assert_eq!(Breakpoint::from_width(139), Breakpoint::Wide);
        assert_eq!(Breakpoint::from_width(140), Breakpoint::UltraWide);
        assert!(Breakpoint::Wide.at_least(Breakpoint::Normal));
        assert!(!Breakpoint::Wide.at_least(Breakpoint::UltraWide));
    }

    #[test]
    fn layout_splits_title_body_status() {
        let layout = DashboardLayout::compute(Rect::new(0, 0, 120, 40), true);
        assert_eq!(layout.title, Rect::new(0, 0, 120, 1));
        assert_eq!(layout.status, Rect::new(0, 39, 120, 1));
        assert_eq!(layout.sidebar, Some(Rect::new(0, 1, 34, 38)));
        assert_eq!(layout.detail, Rect::new(34, 1, 86, 38));
    }

    #[test]
    fn collapsed_sidebar_gives_detail_full_width() {
        let layout = DashboardLayout::compute(Rect::new(0, 0, 80, 24), false);
        assert!(layout.sidebar.is_none());
        assert_eq!(layout.detail.width, 80);
    }

    #[test]
    fn sidebar_hit_testing_skips_borders() {
        let layout = DashboardLayout::compute(Rect::new(0, 0, 120, 40), true);
        assert_eq!(layout.sidebar_row_at(5, 1), None);
        assert_eq!(layout.sidebar_row_at(5, 2), Some(0));
        assert_eq!(layout.sidebar_row_at(5, 6), Some(4));
        assert_eq!(layout.sidebar_row_at(60, 6), None);
        assert!(layout.in_detail(60, 6));
    }
}
