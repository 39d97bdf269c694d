// Wire models for the dashboard API
//
// These mirror the JSON the local dashboard server returns. Field names are
// camelCase on the wire; unknown fields are ignored so the server can grow
// without breaking the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ProjectId = String;
pub type ChangeId = String;

/// A registered project folder and its changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub changes: Vec<Change>,
    /// Server-side "active project" flag
    #[serde(default)]
    pub is_active: bool,
}

impl Project {
    pub fn change(&self, change_id: &str) -> Option<&Change> {
        self.changes.iter().find(|c| c.id == change_id)
    }
}

/// A tracked feature/proposal unit owned by one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub id: ChangeId,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub total_tasks: u32,
    pub updated_at: DateTime<Utc>,
}

impl Change {
    /// Completed fraction in 0.0..=1.0 (0 when there are no tasks)
    pub fn progress(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        (self.completed_tasks.min(self.total_tasks) as f64) / (self.total_tasks as f64)
    }
}

/// Git working tree status for one project
///
/// The server also sends an `isDirty` flag; it is ignored and derived from
/// the file lists instead (see [`GitStatus::is_dirty`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatus {
    pub branch: String,
    #[serde(default)]
    pub ahead: u32,
    #[serde(default)]
    pub behind: u32,
    #[serde(default)]
    pub modified: Vec<String>,
    #[serde(default)]
    pub staged: Vec<String>,
    #[serde(default)]
    pub untracked: Vec<String>,
}

impl GitStatus {
    /// Total number of files that differ from HEAD
    pub fn changed_files(&self) -> usize {
        self.modified.len() + self.staged.len() + self.untracked.len()
    }

    /// Any modified, staged or untracked file makes the tree dirty
    pub fn is_dirty(&self) -> bool {
        self.changed_files() > 0
    }
}

/// Inbox task not attached to any change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandaloneTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedChange {
    pub id: ChangeId,
    pub title: String,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
}

/// Global (cross-project) document search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocHit {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub project_name: Option<String>,
    pub path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
}

/// Semantic (vector) search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagHit {
    pub score: f32,
    pub content: String,
    /// Source document path, when the index recorded one
    #[serde(default)]
    pub source: Option<String>,
}

/// Prior-session memory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub summary: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

/// Envelope used by the three search endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// How the server produced a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramSource {
    Simple,
    Llm,
}

impl DiagramSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Llm => "llm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramResponse {
    pub mermaid_code: String,
    pub generated: DiagramSource,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_parses_camel_case_with_missing_optional_fields() {
        let json = r#"{
            "id": "p1",
            "name": "web",
            "path": "/home/dev/code/web",
            "changes": [{
                "id": "add-auth",
                "title": "Add auth",
                "status": "in-progress",
                "completedTasks": 2,
                "totalTasks": 5,
                "updatedAt": "2026-03-01T10:00:00Z"
            }]
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert!(!project.is_active);
        assert_eq!(project.changes.len(), 1);
        assert_eq!(project.changes[0].completed_tasks, 2);
        assert!((project.changes[0].progress() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn git_status_derives_dirty_from_file_lists() {
        // The wire flag says clean, but an untracked file makes it dirty
        let json = r#"{"branch":"main","isDirty":false,"untracked":["x.ts"]}"#;
        let status: GitStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_dirty());
        assert_eq!(status.changed_files(), 1);
    }

    #[test]
    fn clean_git_status_is_not_dirty() {
        let status = GitStatus {
            branch: "main".into(),
            ..Default::default()
        };
        assert!(!status.is_dirty());
    }

    #[test]
    fn progress_handles_zero_tasks() {
        let change = Change {
            id: "c".into(),
            title: "c".into(),
            status: "draft".into(),
            completed_tasks: 0,
            total_tasks: 0,
            updated_at: Utc::now(),
        };
        assert_eq!(change.progress(), 0.0);
    }

    #[test]
    fn memory_record_reads_type_field() {
        let json = r#"{"id":"m1","type":"decision","summary":"Use JWT"}"#;
        let record: MemoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, "decision");
        assert!(record.project_id.is_none());
    }

    #[test]
    fn diagram_response_parses_generator() {
        let json = r#"{"mermaidCode":"graph TD\nA-->B","generated":"llm"}"#;
        let response: DiagramResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.generated, DiagramSource::Llm);
        assert!(response.message.is_none());
    }
}
