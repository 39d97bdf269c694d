// Sidebar tree: projects → changes (+ inbox and archive leaves)
//
// Holds only local UI state (expanded set and cursor). Selecting emits the
// new `SelectedItem` immediately; activating the project on the server is
// returned as a follow-up the caller runs in the background.

use super::cache::DashboardCache;
use super::selection::SelectedItem;
use crate::api::{ChangeId, ProjectId};
use std::collections::HashSet;

/// One visible line of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarRow {
    Project {
        project_id: ProjectId,
    },
    Change {
        project_id: ProjectId,
        change_id: ChangeId,
    },
    Inbox {
        project_id: ProjectId,
    },
    Archived {
        project_id: ProjectId,
    },
}

impl SidebarRow {
    pub fn project_id(&self) -> &str {
        match self {
            Self::Project { project_id }
            | Self::Change { project_id, .. }
            | Self::Inbox { project_id }
            | Self::Archived { project_id } => project_id,
        }
    }

    /// The selection this row stands for
    pub fn to_selection(&self) -> SelectedItem {
        match self {
            Self::Project { project_id } => SelectedItem::Project {
                project_id: project_id.clone(),
            },
            Self::Change {
                project_id,
                change_id,
            } => SelectedItem::Change {
                project_id: project_id.clone(),
                change_id: change_id.clone(),
            },
            Self::Inbox { project_id } => SelectedItem::StandaloneTasks {
                project_id: project_id.clone(),
            },
            Self::Archived { project_id } => SelectedItem::Archived {
                project_id: project_id.clone(),
            },
        }
    }
}

/// Result of a selection: what to show, and whether the server must be told
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOutcome {
    pub selected: SelectedItem,
    /// Project to activate server-side (None when it already is active)
    pub activate: Option<ProjectId>,
}

#[derive(Debug, Default)]
pub struct SidebarTree {
    expanded: HashSet<ProjectId>,
    cursor: usize,
}

impl SidebarTree {
    pub fn is_expanded(&self, project_id: &str) -> bool {
        self.expanded.contains(project_id)
    }

    /// Flip the expanded state; returns the new state
    pub fn toggle_expand(&mut self, project_id: &str) -> bool {
        if !self.expanded.remove(project_id) {
            self.expanded.insert(project_id.to_string());
            true
        } else {
            false
        }
    }

    pub fn expand(&mut self, project_id: &str) {
        self.expanded.insert(project_id.to_string());
    }

    /// Forget expanded state of projects that are gone
    pub fn retain_projects(&mut self, cache: &DashboardCache) {
        self.expanded.retain(|id| cache.project(id).is_some());
    }

    /// Visible rows in display order
    pub fn rows(&self, cache: &DashboardCache) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for project in &cache.projects {
            rows.push(SidebarRow::Project {
                project_id: project.id.clone(),
            });
            if !self.is_expanded(&project.id) {
                continue;
            }
            rows.extend(project.changes.iter().map(|c| SidebarRow::Change {
                project_id: project.id.clone(),
                change_id: c.id.clone(),
            }));
            rows.push(SidebarRow::Inbox {
                project_id: project.id.clone(),
            });
            rows.push(SidebarRow::Archived {
                project_id: project.id.clone(),
            });
        }
        rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_row(&self, cache: &DashboardCache) -> Option<SidebarRow> {
        self.rows(cache).into_iter().nth(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, cache: &DashboardCache) {
        let last = self.rows(cache).len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(last);
    }

    pub fn move_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_bottom(&mut self, cache: &DashboardCache) {
        self.cursor = self.rows(cache).len().saturating_sub(1);
    }

    /// Keep the cursor on an existing row after the tree shrank
    pub fn clamp_cursor(&mut self, cache: &DashboardCache) {
        let len = self.rows(cache).len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    /// Put the cursor on `row` if it is visible
    pub fn focus_row(&mut self, cache: &DashboardCache, row: &SidebarRow) {
        if let Some(idx) = self.rows(cache).iter().position(|r| r == row) {
            self.cursor = idx;
        }
    }

    /// Select a project: show it, expand it, activate it if needed
    pub fn select_project(&mut self, cache: &DashboardCache, project_id: &str) -> SelectOutcome {
        self.expand(project_id);
        SelectOutcome {
            selected: SelectedItem::Project {
                project_id: project_id.to_string(),
            },
            activate: needs_activation(cache, project_id),
        }
    }

    /// Select a change leaf; its project gets the same treatment as above
    pub fn select_change(
        &mut self,
        cache: &DashboardCache,
        project_id: &str,
        change_id: &str,
    ) -> SelectOutcome {
        self.expand(project_id);
        SelectOutcome {
            selected: SelectedItem::Change {
                project_id: project_id.to_string(),
                change_id: change_id.to_string(),
            },
            activate: needs_activation(cache, project_id),
        }
    }

    /// Select whatever `row` stands for
    pub fn select_row(&mut self, cache: &DashboardCache, row: &SidebarRow) -> SelectOutcome {
        match row {
            SidebarRow::Project { project_id } => self.select_project(cache, project_id),
            SidebarRow::Change {
                project_id,
                change_id,
            } => self.select_change(cache, project_id, change_id),
            SidebarRow::Inbox { project_id } | SidebarRow::Archived { project_id } => {
                SelectOutcome {
                    selected: row.to_selection(),
                    activate: needs_activation(cache, project_id),
                }
            }
        }
    }
}

fn needs_activation(cache: &DashboardCache, project_id: &str) -> Option<ProjectId> {
    (!cache.is_active(project_id)).then(|| project_id.to_string())
}
