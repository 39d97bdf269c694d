// Dashboard state: everything the UI shows, independent of the terminal
//
// The TUI layer owns one of each of these and feeds them events; nothing
// in here touches ratatui, crossterm or the network.

pub mod cache;
pub mod diagram;
pub mod palette;
pub mod reorder;
pub mod selection;
pub mod sidebar;
pub mod status;

pub use cache::DashboardCache;
pub use diagram::{DiagramView, DiagramViewport};
pub use palette::{CommandPalette, PaletteAction, QuickAction, SearchRequest, SearchResults};
pub use reorder::{DragState, DropOutcome, ReorderLedger};
pub use selection::{prune_selection, SelectedItem};
pub use sidebar::{SelectOutcome, SidebarRow, SidebarTree};
pub use status::StatusSummary;
