// What the detail pane is showing
//
// Client-local and never persisted. Held by the App, replaced by sidebar
// clicks and palette navigation.

use crate::api::{ChangeId, Project, ProjectId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedItem {
    Project {
        project_id: ProjectId,
    },
    Change {
        project_id: ProjectId,
        change_id: ChangeId,
    },
    /// Project inbox (tasks outside any change)
    StandaloneTasks {
        project_id: ProjectId,
    },
    Archived {
        project_id: ProjectId,
    },
    /// A document opened from search; project is unknown for global hits
    Docs {
        project_id: Option<ProjectId>,
        path: String,
    },
    Diagram {
        project_id: ProjectId,
    },
    Settings,
}

impl SelectedItem {
    /// Owning project, if the item belongs to one
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::Project { project_id }
            | Self::Change { project_id, .. }
            | Self::StandaloneTasks { project_id }
            | Self::Archived { project_id }
            | Self::Diagram { project_id } => Some(project_id),
            Self::Docs { project_id, .. } => project_id.as_deref(),
            Self::Settings => None,
        }
    }

    /// Whether the entities this item points at are still in `projects`
    pub fn still_exists(&self, projects: &[Project]) -> bool {
        let Some(project_id) = self.project_id() else {
            return true;
        };
        let Some(project) = projects.iter().find(|p| p.id == project_id) else {
            return false;
        };
        match self {
            Self::Change { change_id, .. } => project.change(change_id).is_some(),
            _ => true,
        }
    }

    /// Short label for the title bar
    pub fn label(&self) -> &'static str {
        match self {
            Self::Project { .. } => "Project",
            Self::Change { .. } => "Change",
            Self::StandaloneTasks { .. } => "Inbox",
            Self::Archived { .. } => "Archived",
            Self::Docs { .. } => "Document",
            Self::Diagram { .. } => "Diagram",
            Self::Settings => "Settings",
        }
    }
}

/// Drop a selection whose project or change disappeared
///
/// Returns true when the selection was cleared.
pub fn prune_selection(selected: &mut Option<SelectedItem>, projects: &[Project]) -> bool {
    match selected {
        Some(item) if !item.still_exists(projects) => {
            tracing::debug!("Clearing stale selection {:?}", item);
            *selected = None;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_support::{change, project};

    #[test]
    fn change_selection_survives_while_change_exists() {
        let projects = vec![project("p1", "web", vec![change("c1", "Add auth")])];
        let mut selected = Some(SelectedItem::Change {
            project_id: "p1".into(),
            change_id: "c1".into(),
        });

        assert!(!prune_selection(&mut selected, &projects));
        assert!(selected.is_some());
    }

    #[test]
    fn selection_clears_when_change_is_gone() {
        let projects = vec![project("p1", "web", vec![])];
        let mut selected = Some(SelectedItem::Change {
            project_id: "p1".into(),
            change_id: "c1".into(),
        });

        assert!(prune_selection(&mut selected, &projects));
        assert!(selected.is_none());
    }

    #[test]
    fn selection_clears_when_project_removed() {
        let mut selected = Some(SelectedItem::StandaloneTasks {
            project_id: "gone".into(),
        });
        assert!(prune_selection(&mut selected, &[]));
    }

    #[test]
    fn projectless_items_are_kept() {
        let mut selected = Some(SelectedItem::Docs {
            project_id: None,
            path: "/docs/readme.md".into(),
        });
        assert!(!prune_selection(&mut selected, &[]));

        let mut settings = Some(SelectedItem::Settings);
        assert!(!prune_selection(&mut settings, &[]));
    }
}
