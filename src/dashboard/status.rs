// Status bar model: working directory and derived Git state

use crate::api::{GitStatus, Project};
use crate::util::abbreviate_path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSummary {
    pub branch: String,
    pub ahead: u32,
    pub behind: u32,
    pub dirty: bool,
    pub changed_files: usize,
}

impl From<&GitStatus> for GitSummary {
    fn from(status: &GitStatus) -> Self {
        Self {
            branch: status.branch.clone(),
            ahead: status.ahead,
            behind: status.behind,
            dirty: status.is_dirty(),
            changed_files: status.changed_files(),
        }
    }
}

impl GitSummary {
    /// `↑2 ↓1`, empty when in sync
    pub fn sync_label(&self) -> String {
        match (self.ahead, self.behind) {
            (0, 0) => String::new(),
            (a, 0) => format!("↑{}", a),
            (0, b) => format!("↓{}", b),
            (a, b) => format!("↑{} ↓{}", a, b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    /// Last two path segments of the working directory
    pub cwd_short: String,
    /// Full path, for copying
    pub cwd_full: String,
    /// None while the status has not loaded yet
    pub git: Option<GitSummary>,
}

impl StatusSummary {
    pub fn derive(project: &Project, git: Option<&GitStatus>) -> Self {
        Self {
            cwd_short: abbreviate_path(&project.path),
            cwd_full: project.path.clone(),
            git: git.map(GitSummary::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_support::project;

    #[test]
    fn untracked_file_alone_makes_tree_dirty() {
        let status = GitStatus {
            branch: "main".into(),
            untracked: vec!["x.ts".into()],
            ..Default::default()
        };
        let summary = GitSummary::from(&status);
        assert!(summary.dirty);
        assert_eq!(summary.changed_files, 1);
    }

    #[test]
    fn sync_label_variants() {
        let mut summary = GitSummary::from(&GitStatus::default());
        assert_eq!(summary.sync_label(), "");
        summary.ahead = 2;
        assert_eq!(summary.sync_label(), "↑2");
        summary.behind = 1;
        assert_eq!(summary.sync_label(), "↑2 ↓1");
        summary.ahead = 0;
        assert_eq!(summary.sync_label(), "↓1");
    }

    #[test]
    fn derive_abbreviates_path_and_keeps_full() {
        let mut p = project("p1", "web", vec![]);
        p.path = "/home/dev/code/web".into();

        let summary = StatusSummary::derive(&p, None);
        assert_eq!(summary.cwd_short, "…/code/web");
        assert_eq!(summary.cwd_full, "/home/dev/code/web");
        assert!(summary.git.is_none());
    }
}
