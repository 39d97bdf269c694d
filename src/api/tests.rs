//! Client tests against an in-process mock of the dashboard API

use super::*;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Recorded = Arc<Mutex<Vec<String>>>;

async fn spawn_server(router: Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let config = ApiConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 5,
    };
    ApiClient::new(&config).unwrap()
}

fn sample_projects() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "p1",
            "name": "web",
            "path": "/home/dev/code/web",
            "isActive": true,
            "changes": [{
                "id": "add-auth",
                "title": "Add auth",
                "status": "in-progress",
                "completedTasks": 1,
                "totalTasks": 3,
                "updatedAt": "2026-03-01T10:00:00Z"
            }]
        },
        { "id": "p2", "name": "api", "path": "/home/dev/code/api" }
    ])
}

#[tokio::test]
async fn list_projects_decodes_in_server_order() {
    let router = Router::new().route(
        "/api/projects",
        get(|| async { Json(sample_projects()) }),
    );
    let client = spawn_server(router).await;

    let projects = client.list_projects().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, "p1");
    assert!(projects[0].is_active);
    assert_eq!(projects[1].changes.len(), 0);
}

#[tokio::test]
async fn reorder_sends_full_id_list() {
    let recorded: Recorded = Arc::default();
    let router = Router::new()
        .route(
            "/api/projects/order",
            put(
                |State(rec): State<Recorded>, Json(body): Json<serde_json::Value>| async move {
                    rec.lock().unwrap().push(body["projectIds"].to_string());
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(recorded.clone());
    let client = spawn_server(router).await;

    let order = vec!["b".to_string(), "c".to_string(), "a".to_string()];
    client.reorder_projects(&order).await.unwrap();

    assert_eq!(recorded.lock().unwrap().as_slice(), [r#"["b","c","a"]"#]);
}

#[tokio::test]
async fn activate_percent_encodes_project_id() {
    let recorded: Recorded = Arc::default();
    let router = Router::new()
        .route(
            "/api/projects/:id/activate",
            post(|State(rec): State<Recorded>, Path(id): Path<String>| async move {
                rec.lock().unwrap().push(id);
                StatusCode::OK
            }),
        )
        .with_state(recorded.clone());
    let client = spawn_server(router).await;

    client.activate_project("my project").await.unwrap();
    assert_eq!(recorded.lock().unwrap().as_slice(), ["my project"]);
}

#[tokio::test]
async fn error_body_message_becomes_status_error() {
    let router = Router::new().route(
        "/api/projects",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(serde_json::json!({ "error": "Project already registered" })),
            )
        }),
    );
    let client = spawn_server(router).await;

    let err = client.add_project("/tmp/web").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 409,
            message: "Project already registered".into()
        }
    );
}

#[tokio::test]
async fn plain_text_error_body_is_kept() {
    let router = Router::new().route(
        "/api/projects/:id",
        axum::routing::delete(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "disk full\n") }),
    );
    let client = spawn_server(router).await;

    let err = client.remove_project("p1").await.unwrap_err();
    assert_eq!(err.toast_message("Failed to remove project"), "disk full");
}

#[tokio::test]
async fn search_passes_query_and_limit() {
    let recorded: Recorded = Arc::default();
    let router = Router::new()
        .route(
            "/api/rag/search",
            get(
                |State(rec): State<Recorded>, Query(params): Query<HashMap<String, String>>| async move {
                    rec.lock()
                        .unwrap()
                        .push(format!("{}:{}", params["query"], params["limit"]));
                    Json(serde_json::json!({
                        "results": [{ "score": 0.91, "content": "JWT middleware", "source": "docs/auth.md" }]
                    }))
                },
            ),
        )
        .with_state(recorded.clone());
    let client = spawn_server(router).await;

    let hits = client.search_semantic("auth flow", 8).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source.as_deref(), Some("docs/auth.md"));
    assert_eq!(recorded.lock().unwrap().as_slice(), ["auth flow:8"]);
}

#[tokio::test]
async fn git_status_uses_project_query_param() {
    let router = Router::new().route(
        "/api/git/status",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            Json(serde_json::json!({
                "branch": format!("branch-of-{}", params["projectId"]),
                "ahead": 2,
                "behind": 0,
                "modified": ["src/lib.rs"]
            }))
        }),
    );
    let client = spawn_server(router).await;

    let status = client.git_status("p1").await.unwrap();
    assert_eq!(status.branch, "branch-of-p1");
    assert_eq!(status.ahead, 2);
    assert!(status.is_dirty());
}

#[tokio::test]
async fn diagram_generate_posts_project_path() {
    let router = Router::new().route(
        "/api/diagram/generate",
        post(|Json(body): Json<serde_json::Value>| async move {
            Json(serde_json::json!({
                "mermaidCode": format!("graph TD\n  root[{}]", body["projectPath"].as_str().unwrap_or("")),
                "generated": "simple"
            }))
        }),
    );
    let client = spawn_server(router).await;

    let diagram = client.generate_diagram("/home/dev/web").await.unwrap();
    assert_eq!(diagram.generated, DiagramSource::Simple);
    assert!(diagram.mermaid_code.contains("/home/dev/web"));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&ApiConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 2,
    })
    .unwrap();

    let err = client.list_projects().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
}

#[test]
fn base_url_with_prefix_keeps_prefix() {
    let client = ApiClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:3001/dashboard/".into(),
        timeout_secs: 2,
    })
    .unwrap();

    let url = client.endpoint(&["api", "projects"]).unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:3001/dashboard/api/projects");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ApiClient::new(&ApiConfig {
        base_url: "not a url".into(),
        timeout_secs: 2,
    })
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidUrl(_)));
}
