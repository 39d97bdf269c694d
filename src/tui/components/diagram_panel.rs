// Diagram viewer component
//
// Mermaid source laid out as text at the current zoom, shifted by the pan
// offset. Positive offsets push the drawing right/down; negative ones cut
// columns/rows off the left/top.

use crate::dashboard::{DiagramView, DiagramViewport};
use crate::theme::Theme;
use crate::tui::traits::{Handled, Interactive};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

impl Interactive for DiagramViewport {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom_in(),
            KeyCode::Char('-') => self.zoom_out(),
            KeyCode::Char('0') => self.reset(),
            KeyCode::Char('f') => self.toggle_fullscreen(),
            KeyCode::Left | KeyCode::Char('h') => self.pan_by(-2, 0),
            KeyCode::Right | KeyCode::Char('l') => self.pan_by(2, 0),
            KeyCode::Up | KeyCode::Char('k') => self.pan_by(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.pan_by(0, 1),
            _ => return Handled::No,
        }
        Handled::Yes
    }

    fn focus_hint(&self) -> &'static str {
        "+/-:zoom  0:reset  ←↑↓→:pan  f:fullscreen  s:export  y:copy"
    }
}

pub fn render(f: &mut Frame, area: Rect, view: &DiagramView, theme: &Theme, focused: bool) {
    let viewport = &view.viewport;
    let title = format!(
        " Diagram · {} · {} · {:.0}% ",
        view.project_name,
        view.diagram.generated.label(),
        viewport.zoom() * 100.0
    );
    let border = if viewport.is_panning() {
        theme.accent
    } else {
        theme.pane_border(focused)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(border))
        .title(title);

    let lines: Vec<Line> = shift_lines(view.rendered_lines(), viewport.offset())
        .into_iter()
        .map(Line::from)
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(theme.foreground)),
        area,
    );
}

/// Apply a pan offset to laid-out lines
pub fn shift_lines(lines: Vec<String>, (dx, dy): (i32, i32)) -> Vec<String> {
    let rows: Vec<String> = if dy >= 0 {
        std::iter::repeat(String::new())
            .take(dy as usize)
            .chain(lines)
            .collect()
    } else {
        lines.into_iter().skip(dy.unsigned_abs() as usize).collect()
    };

    rows.into_iter()
        .map(|line| {
            if dx >= 0 {
                format!("{}{}", " ".repeat(dx as usize), line)
            } else {
                line.chars().skip(dx.unsigned_abs() as usize).collect()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn lines() -> Vec<String> {
        vec!["graph TD".into(), "  A --> B".into()]
    }

    #[test]
    fn positive_offset_pads() {
        assert_eq!(
            shift_lines(lines(), (2, 1)),
            vec!["  ", "  graph TD", "    A --> B"]
        );
    }

    #[test]
    fn negative_offset_clips() {
        assert_eq!(shift_lines(lines(), (-2, -1)), vec!["A --> B"]);
        assert_eq!(shift_lines(lines(), (-20, 0)), vec!["", ""]);
    }

    #[test]
    fn zoom_and_pan_keys() {
        let mut viewport = DiagramViewport::default();
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);

        viewport.handle_key(key('+'));
        viewport.handle_key(key('l'));
        assert_eq!(viewport.zoom(), 1.25);
        assert_eq!(viewport.offset(), (2, 0));

        viewport.handle_key(key('0'));
        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(viewport.offset(), (0, 0));
        assert_eq!(viewport.handle_key(key('x')), Handled::No);
    }
}
