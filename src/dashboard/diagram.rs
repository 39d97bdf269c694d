// Diagram viewer: pan/zoom/export around a text rendering of Mermaid source
//
// Zoom scales the spacing of the rendered text (horizontal runs of blanks and
// blank lines between rows). Pan is an offset in cells; mouse drags track it
// as a delta from where the drag started. Nothing here survives closing the
// viewer.

use crate::api::{DiagramResponse, ProjectId};
use std::path::{Path, PathBuf};

pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PanOrigin {
    pointer: (u16, u16),
    offset: (i32, i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramViewport {
    zoom: f32,
    /// Content offset in cells (x, y); positive moves content right/down
    offset: (i32, i32),
    pan_origin: Option<PanOrigin>,
    fullscreen: bool,
}

impl Default for DiagramViewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: (0, 0),
            pan_origin: None,
            fullscreen: false,
        }
    }
}

impl DiagramViewport {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn offset(&self) -> (i32, i32) {
        self.offset
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_panning(&self) -> bool {
        self.pan_origin.is_some()
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Back to 1.0× at the origin
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.offset = (0, 0);
        self.pan_origin = None;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.offset = (self.offset.0 + dx, self.offset.1 + dy);
    }

    /// Left button went down at (column, row)
    pub fn begin_pan(&mut self, column: u16, row: u16) {
        self.pan_origin = Some(PanOrigin {
            pointer: (column, row),
            offset: self.offset,
        });
    }

    /// Pointer moved while the button is held
    pub fn drag_to(&mut self, column: u16, row: u16) {
        let Some(origin) = self.pan_origin else {
            return;
        };
        let dx = column as i32 - origin.pointer.0 as i32;
        let dy = row as i32 - origin.pointer.1 as i32;
        self.offset = (origin.offset.0 + dx, origin.offset.1 + dy);
    }

    pub fn end_pan(&mut self) {
        self.pan_origin = None;
    }
}

/// A generated diagram plus the viewer state around it
#[derive(Debug, Clone)]
pub struct DiagramView {
    pub project_id: ProjectId,
    pub project_name: String,
    pub diagram: DiagramResponse,
    pub viewport: DiagramViewport,
}

impl DiagramView {
    pub fn new(project_id: ProjectId, project_name: String, diagram: DiagramResponse) -> Self {
        Self {
            project_id,
            project_name,
            diagram,
            viewport: DiagramViewport::default(),
        }
    }

    pub fn source(&self) -> &str {
        &self.diagram.mermaid_code
    }

    pub fn rendered_lines(&self) -> Vec<String> {
        render_lines(self.source(), self.viewport.zoom())
    }

    /// `<dir>/<project>-diagram.svg`
    pub fn export_path(&self, dir: &Path) -> PathBuf {
        let stem: String = self
            .project_name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();
        let stem = if stem.is_empty() { "project".to_string() } else { stem };
        dir.join(format!("{}-diagram.svg", stem))
    }

    /// Write the SVG export and return where it went
    pub fn export_svg(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = self.export_path(dir);
        std::fs::write(&path, to_svg(self.source(), self.viewport.zoom()))?;
        Ok(path)
    }
}

/// Lay out diagram source with spacing scaled by `zoom`
pub fn render_lines(source: &str, zoom: f32) -> Vec<String> {
    let extra_blank_lines = (zoom.floor() as usize).saturating_sub(1);
    let mut lines = Vec::new();

    for (i, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            if zoom >= 1.0 {
                lines.push(String::new());
            }
            continue;
        }
        if i > 0 {
            lines.extend(std::iter::repeat(String::new()).take(extra_blank_lines));
        }
        lines.push(scale_blanks(line, zoom));
    }
    lines
}

/// Scale every run of spaces; inner runs never collapse below one space
fn scale_blanks(line: &str, zoom: f32) -> String {
    let mut out = String::with_capacity(line.len());
    let mut run = 0usize;
    let mut leading = true;

    let flush = |out: &mut String, run: usize, leading: bool| {
        if run == 0 {
            return;
        }
        let scaled = (run as f32 * zoom).round() as usize;
        let scaled = if leading { scaled } else { scaled.max(1) };
        out.extend(std::iter::repeat(' ').take(scaled));
    };

    for c in line.chars() {
        if c == ' ' {
            run += 1;
        } else {
            flush(&mut out, run, leading);
            run = 0;
            leading = false;
            out.push(c);
        }
    }
    out
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Monospace SVG rendering of the source at `zoom`
pub fn to_svg(source: &str, zoom: f32) -> String {
    let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    let font_size = 14.0 * zoom;
    let line_height = font_size * 1.4;
    let char_width = font_size * 0.6;
    let padding = 16.0;

    let lines: Vec<&str> = source.lines().collect();
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = padding * 2.0 + widest as f32 * char_width;
    let height = padding * 2.0 + lines.len() as f32 * line_height;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n\
         <g font-family=\"monospace\" font-size=\"{fs:.1}\" fill=\"black\">\n",
        w = width,
        h = height,
        fs = font_size,
    );
    for (i, line) in lines.iter().enumerate() {
        let y = padding + (i as f32 + 1.0) * line_height;
        svg.push_str(&format!(
            "<text x=\"{:.0}\" y=\"{:.1}\" xml:space=\"preserve\">{}</text>\n",
            padding,
            y,
            escape_xml(line)
        ));
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DiagramSource;

    fn view(code: &str) -> DiagramView {
        DiagramView::new(
            "p1".into(),
            "web app".into(),
            DiagramResponse {
                mermaid_code: code.into(),
                generated: DiagramSource::Simple,
                message: None,
            },
        )
    }

    #[test]
    fn zoom_in_twenty_times_clamps_at_max() {
        let mut viewport = DiagramViewport::default();
        for _ in 0..20 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom(), 3.0);
    }

    #[test]
    fn zoom_out_clamps_at_min() {
        let mut viewport = DiagramViewport::default();
        for _ in 0..20 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.zoom(), 0.25);
    }

    #[test]
    fn drag_tracks_delta_from_start() {
        let mut viewport = DiagramViewport::default();
        viewport.pan_by(3, 1);

        viewport.begin_pan(10, 10);
        viewport.drag_to(14, 8);
        assert_eq!(viewport.offset(), (7, -1));
        viewport.drag_to(11, 10);
        assert_eq!(viewport.offset(), (4, 1));
        viewport.end_pan();

        // Moves without a held button do nothing
        viewport.drag_to(50, 50);
        assert_eq!(viewport.offset(), (4, 1));
    }

    #[test]
    fn reset_restores_origin_and_unit_zoom() {
        let mut viewport = DiagramViewport::default();
        viewport.zoom_in();
        viewport.pan_by(-5, 2);
        viewport.begin_pan(1, 1);
        viewport.reset();

        assert_eq!(viewport.zoom(), 1.0);
        assert_eq!(viewport.offset(), (0, 0));
        assert!(!viewport.is_panning());
    }

    #[test]
    fn unit_zoom_renders_source_verbatim() {
        let code = "graph TD\n  A[Start] --> B[End]";
        assert_eq!(render_lines(code, 1.0), ["graph TD", "  A[Start] --> B[End]"]);
    }

    #[test]
    fn double_zoom_widens_spacing_and_adds_rows() {
        let code = "graph TD\n  A --> B";
        assert_eq!(render_lines(code, 2.0), ["graph  TD", "", "    A  -->  B"]);
    }

    #[test]
    fn small_zoom_keeps_words_apart_and_drops_blank_rows() {
        let code = "graph TD\n\n    A --> B";
        assert_eq!(render_lines(code, 0.25), ["graph TD", " A --> B"]);
    }

    #[test]
    fn svg_export_escapes_markup() {
        let svg = to_svg("A[\"x < y & z\"]", 1.0);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("&quot;x &lt; y &amp; z&quot;"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn export_writes_file_named_after_project() {
        let dir = std::env::temp_dir().join(format!("specdeck-export-{}", std::process::id()));
        let diagram = view("graph TD\n  A --> B");

        let path = diagram.export_svg(&dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "web-app-diagram.svg");
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("A --&gt; B"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
