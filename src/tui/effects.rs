// Background work requested by the App
//
// App methods never await. They queue an `Effect`; the event loop drains the
// queue and spawns one task per effect. Each task owns a clone of the API
// client and posts its outcome back as an `AppMessage` on the app channel.
// A send error only means the TUI already exited, so it is ignored.

use crate::api::{
    ApiClient, ApiError, ArchivedChange, DiagramResponse, GitStatus, Project, ProjectId,
    StandaloneTask,
};
use crate::dashboard::{SearchRequest, SearchResults};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadProjects,
    Activate(ProjectId),
    Reorder { seq: u64, order: Vec<ProjectId> },
    AddProject(String),
    RemoveProject(ProjectId),
    UpdatePath { project_id: ProjectId, path: String },
    LoadGit(ProjectId),
    Pull(ProjectId),
    LoadTasks(ProjectId),
    LoadArchived(ProjectId),
    Search(SearchRequest),
    GenerateDiagram { project_id: ProjectId, project_path: String },
}

/// Outcome of an effect, delivered to the event loop
#[derive(Debug)]
pub enum AppMessage {
    ProjectsLoaded(Result<Vec<Project>, ApiError>),
    Activated {
        project_id: ProjectId,
        result: Result<(), ApiError>,
    },
    ReorderSaved {
        seq: u64,
        result: Result<(), ApiError>,
    },
    ProjectAdded(Result<Project, ApiError>),
    ProjectRemoved {
        project_id: ProjectId,
        result: Result<(), ApiError>,
    },
    PathUpdated(Result<Project, ApiError>),
    GitLoaded {
        project_id: ProjectId,
        result: Result<GitStatus, ApiError>,
    },
    Pulled {
        project_id: ProjectId,
        result: Result<(), ApiError>,
    },
    TasksLoaded {
        project_id: ProjectId,
        result: Result<Vec<StandaloneTask>, ApiError>,
    },
    ArchivedLoaded {
        project_id: ProjectId,
        result: Result<Vec<ArchivedChange>, ApiError>,
    },
    /// One remote palette source answered (failures arrive as empty lists)
    SearchResults {
        generation: u64,
        results: SearchResults,
    },
    DiagramGenerated {
        project_id: ProjectId,
        result: Result<DiagramResponse, ApiError>,
    },
}

/// Spawn the task for `effect`
pub fn spawn(effect: Effect, api: &ApiClient, tx: &mpsc::Sender<AppMessage>) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move { run(effect, api, tx).await });
}

async fn run(effect: Effect, api: ApiClient, tx: mpsc::Sender<AppMessage>) {
    let message = match effect {
        Effect::Search(request) => {
            spawn_search(request, &api, &tx);
            return;
        }
        Effect::LoadProjects => AppMessage::ProjectsLoaded(api.list_projects().await),
        Effect::Activate(project_id) => {
            let result = api.activate_project(&project_id).await;
            AppMessage::Activated { project_id, result }
        }
        Effect::Reorder { seq, order } => AppMessage::ReorderSaved {
            seq,
            result: api.reorder_projects(&order).await,
        },
        Effect::AddProject(path) => AppMessage::ProjectAdded(api.add_project(&path).await),
        Effect::RemoveProject(project_id) => {
            let result = api.remove_project(&project_id).await;
            AppMessage::ProjectRemoved { project_id, result }
        }
        Effect::UpdatePath { project_id, path } => {
            AppMessage::PathUpdated(api.update_project_path(&project_id, &path).await)
        }
        Effect::LoadGit(project_id) => {
            let result = api.git_status(&project_id).await;
            AppMessage::GitLoaded { project_id, result }
        }
        Effect::Pull(project_id) => {
            let result = api.pull_project(&project_id).await;
            AppMessage::Pulled { project_id, result }
        }
        Effect::LoadTasks(project_id) => {
            let result = api.standalone_tasks(&project_id).await;
            AppMessage::TasksLoaded { project_id, result }
        }
        Effect::LoadArchived(project_id) => {
            let result = api.archived_changes(&project_id).await;
            AppMessage::ArchivedLoaded { project_id, result }
        }
        Effect::GenerateDiagram {
            project_id,
            project_path,
        } => {
            let result = api.generate_diagram(&project_path).await;
            AppMessage::DiagramGenerated { project_id, result }
        }
    };
    let _ = tx.send(message).await;
}

/// One task per remote source so each section renders as soon as it lands
fn spawn_search(request: SearchRequest, api: &ApiClient, tx: &mpsc::Sender<AppMessage>) {
    let SearchRequest {
        generation,
        query,
        limit,
    } = request;

    {
        let (api, tx, query) = (api.clone(), tx.clone(), query.clone());
        tokio::spawn(async move {
            let hits = degrade("docs", api.search_docs(&query, limit).await);
            let results = SearchResults::Docs(hits);
            let _ = tx.send(AppMessage::SearchResults { generation, results }).await;
        });
    }
    {
        let (api, tx, query) = (api.clone(), tx.clone(), query.clone());
        tokio::spawn(async move {
            let hits = degrade("semantic", api.search_semantic(&query, limit).await);
            let results = SearchResults::Semantic(hits);
            let _ = tx.send(AppMessage::SearchResults { generation, results }).await;
        });
    }
    {
        let (api, tx) = (api.clone(), tx.clone());
        tokio::spawn(async move {
            let records = degrade("memory", api.search_memory(&query, limit).await);
            let results = SearchResults::Memory(records);
            let _ = tx.send(AppMessage::SearchResults { generation, results }).await;
        });
    }
}

/// A failing search source shows up as an empty section
pub(crate) fn degrade<T>(source: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("Palette {} search failed: {}", source, e);
        Vec::new()
    })
}
