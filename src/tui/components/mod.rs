// Components module - UI building blocks
//
// Shell components are rendered every frame:
// - Title bar: app name, loading spinner, what is selected
// - Status bar: active folder, git branch and sync state, key hints
//
// Panes (sidebar, detail, diagram) and overlays (palette, toast) are each a
// focused, single-responsibility module.

pub mod detail_panel;
pub mod diagram_panel;
pub mod palette_panel;
pub mod sidebar_panel;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use toast::Toast;
