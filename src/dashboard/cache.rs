// Client-side view of server state
//
// Everything here is a copy of what the dashboard API returned, plus the
// optimistic edits the UI applies before the server confirms them. After
// each mutation the App re-fetches, which replaces the affected entries.

use crate::api::{ArchivedChange, Change, GitStatus, Project, ProjectId, StandaloneTask};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DashboardCache {
    /// Projects in display order
    pub projects: Vec<Project>,
    pub git: HashMap<ProjectId, GitStatus>,
    pub tasks: HashMap<ProjectId, Vec<StandaloneTask>>,
    pub archived: HashMap<ProjectId, Vec<ArchivedChange>>,
    /// Active project as the client currently believes it to be
    pub active: Option<ProjectId>,
    /// Activation sent but not yet answered; outranks refetched lists
    pending_active: Option<ProjectId>,
    /// Set once the first project list arrived
    pub loaded: bool,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl DashboardCache {
    /// Replace the project list with an authoritative copy from the server
    ///
    /// A list fetched before a pending activation reached the server still
    /// names the old active project, so the pending one is kept.
    pub fn replace_projects(&mut self, mut projects: Vec<Project>) {
        if let Some(pending) = &self.pending_active {
            if projects.iter().any(|p| &p.id == pending) {
                for project in &mut projects {
                    project.is_active = &project.id == pending;
                }
            } else {
                self.pending_active = None;
            }
        }
        self.active = projects
            .iter()
            .find(|p| p.is_active)
            .map(|p| p.id.clone());

        // Drop per-project data for projects that no longer exist
        let ids: Vec<&ProjectId> = projects.iter().map(|p| &p.id).collect();
        self.git.retain(|id, _| ids.contains(&id));
        self.tasks.retain(|id, _| ids.contains(&id));
        self.archived.retain(|id, _| ids.contains(&id));

        self.projects = projects;
        self.loaded = true;
        self.last_refresh = Some(Utc::now());
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn change(&self, project_id: &str, change_id: &str) -> Option<(&Project, &Change)> {
        let project = self.project(project_id)?;
        project.change(change_id).map(|c| (project, c))
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.active.as_deref().and_then(|id| self.project(id))
    }

    pub fn is_active(&self, project_id: &str) -> bool {
        self.active.as_deref() == Some(project_id)
    }

    /// Optimistically mark a project active until the server answers
    pub fn set_active(&mut self, project_id: &str) {
        for project in &mut self.projects {
            project.is_active = project.id == project_id;
        }
        self.active = Some(project_id.to_string());
        self.pending_active = Some(project_id.to_string());
    }

    /// The server answered the activation of `project_id`
    ///
    /// Answers for a project that was since superseded by another
    /// activation leave the newer one pending.
    pub fn settle_active(&mut self, project_id: &str) {
        if self.pending_active.as_deref() == Some(project_id) {
            self.pending_active = None;
        }
    }

    pub fn project_order(&self) -> Vec<ProjectId> {
        self.projects.iter().map(|p| p.id.clone()).collect()
    }

    /// Rearrange projects to follow `order`; ids not in `order` keep their
    /// relative position at the end
    pub fn apply_order(&mut self, order: &[ProjectId]) {
        let position = |id: &ProjectId| order.iter().position(|o| o == id).unwrap_or(usize::MAX);
        self.projects.sort_by_key(|p| position(&p.id));
    }

    /// Insert or update a project returned by a mutation
    pub fn upsert_project(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }
    }

    pub fn remove_project(&mut self, project_id: &str) {
        self.projects.retain(|p| p.id != project_id);
        self.git.remove(project_id);
        self.tasks.remove(project_id);
        self.archived.remove(project_id);
        if self.active.as_deref() == Some(project_id) {
            self.active = None;
        }
        self.settle_active(project_id);
    }

    /// Every change paired with its owning project, in display order
    pub fn all_changes(&self) -> impl Iterator<Item = (&Project, &Change)> {
        self.projects
            .iter()
            .flat_map(|p| p.changes.iter().map(move |c| (p, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_support::{change, project};

    fn ids(cache: &DashboardCache) -> Vec<&str> {
        cache.projects.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn replace_projects_picks_up_active_flag() {
        let mut cache = DashboardCache::default();
        let mut b = project("b", "api", vec![]);
        b.is_active = true;
        cache.replace_projects(vec![project("a", "web", vec![]), b]);

        assert!(cache.loaded);
        assert_eq!(cache.active.as_deref(), Some("b"));
        assert_eq!(cache.active_project().map(|p| p.name.as_str()), Some("api"));
    }

    #[test]
    fn pending_activation_survives_stale_list() {
        let mut cache = DashboardCache::default();
        let mut a = project("a", "web", vec![]);
        a.is_active = true;
        cache.replace_projects(vec![a.clone(), project("b", "api", vec![])]);

        cache.set_active("b");
        cache.replace_projects(vec![a.clone(), project("b", "api", vec![])]);
        assert_eq!(cache.active.as_deref(), Some("b"));
        assert!(cache.project("b").unwrap().is_active);
        assert!(!cache.project("a").unwrap().is_active);

        // Once settled the server's list is authoritative again
        cache.settle_active("b");
        cache.replace_projects(vec![a, project("b", "api", vec![])]);
        assert_eq!(cache.active.as_deref(), Some("a"));
    }

    #[test]
    fn settling_superseded_activation_keeps_newer_pending() {
        let mut cache = DashboardCache::default();
        let mut a = project("a", "web", vec![]);
        a.is_active = true;
        let list = vec![a, project("b", "api", vec![]), project("c", "docs", vec![])];
        cache.replace_projects(list.clone());

        cache.set_active("b");
        cache.set_active("c");
        cache.settle_active("b");
        cache.replace_projects(list);
        assert_eq!(cache.active.as_deref(), Some("c"));
    }

    #[test]
    fn pending_activation_of_vanished_project_is_dropped() {
        let mut cache = DashboardCache::default();
        let mut a = project("a", "web", vec![]);
        a.is_active = true;
        cache.replace_projects(vec![a.clone(), project("b", "api", vec![])]);

        cache.set_active("b");
        cache.replace_projects(vec![a]);
        assert_eq!(cache.active.as_deref(), Some("a"));
    }

    #[test]
    fn replace_projects_drops_data_of_removed_projects() {
        let mut cache = DashboardCache::default();
        cache.git.insert("gone".into(), GitStatus::default());
        cache.tasks.insert("gone".into(), vec![]);
        cache.replace_projects(vec![project("a", "web", vec![])]);

        assert!(cache.git.is_empty());
        assert!(cache.tasks.is_empty());
    }

    #[test]
    fn apply_order_follows_ids() {
        let mut cache = DashboardCache::default();
        cache.replace_projects(vec![
            project("a", "A", vec![]),
            project("b", "B", vec![]),
            project("c", "C", vec![]),
        ]);

        cache.apply_order(&["c".into(), "a".into(), "b".into()]);
        assert_eq!(ids(&cache), ["c", "a", "b"]);
    }

    #[test]
    fn set_active_moves_flag() {
        let mut cache = DashboardCache::default();
        cache.replace_projects(vec![project("a", "A", vec![]), project("b", "B", vec![])]);
        cache.set_active("a");
        cache.set_active("b");

        assert!(cache.is_active("b"));
        assert!(!cache.projects[0].is_active);
        assert!(cache.projects[1].is_active);
    }

    #[test]
    fn all_changes_pairs_with_owner() {
        let mut cache = DashboardCache::default();
        cache.replace_projects(vec![
            project("a", "A", vec![change("c1", "one")]),
            project("b", "B", vec![change("c2", "two"), change("c3", "three")]),
        ]);

        let pairs: Vec<(&str, &str)> = cache
            .all_changes()
            .map(|(p, c)| (p.id.as_str(), c.id.as_str()))
            .collect();
        assert_eq!(pairs, [("a", "c1"), ("b", "c2"), ("b", "c3")]);
    }

    #[test]
    fn remove_active_project_clears_active() {
        let mut cache = DashboardCache::default();
        cache.replace_projects(vec![project("a", "A", vec![])]);
        cache.set_active("a");
        cache.remove_project("a");

        assert!(cache.active.is_none());
        assert!(cache.projects.is_empty());
    }
}
