//! HTTP API
//!
//! Maps catalog operations onto JSON routes under `/api`:
//!
//! | Method | Path                                                   | Operation      |
//! |--------|--------------------------------------------------------|----------------|
//! | GET    | `/api/categories`                                      | list categories|
//! | POST   | `/api/categories`                                      | add category   |
//! | GET    | `/api/categories/{category}/subtopics`                 | list subtopics |
//! | POST   | `/api/categories/{category}/subtopics`                 | add subtopic   |
//! | GET    | `/api/categories/{category}/subtopics/{subtopic}/sets` | list sets      |
//! | POST   | `/api/categories/{category}/subtopics/{subtopic}/sets` | add set        |
//!
//! Errors are returned as `{"error": "..."}` with 404 for unknown ids, 400
//! for a missing name and 500 for storage failures.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use studydeck_core::{
    Catalog, CatalogError, CatalogResult, Category, CategorySummary, DocumentStats, DocumentStore,
    StudySet, Subtopic, SubtopicSummary,
};

type SharedCatalog<S> = Arc<Catalog<S>>;

/// Build the API router around a shared catalog
pub fn router<S>(catalog: SharedCatalog<S>) -> Router
where
    S: DocumentStore + 'static,
{
    // The browser frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/stats", get(stats::<S>))
        .route(
            "/api/categories",
            get(list_categories::<S>).post(add_category::<S>),
        )
        .route(
            "/api/categories/{category_id}/subtopics",
            get(list_subtopics::<S>).post(add_subtopic::<S>),
        )
        .route(
            "/api/categories/{category_id}/subtopics/{subtopic_id}/sets",
            get(list_sets::<S>).post(add_set::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(catalog)
}

/// Bind `addr` and serve the API until Ctrl-C
pub async fn serve<S>(catalog: SharedCatalog<S>, addr: &str) -> Result<()>
where
    S: DocumentStore + 'static,
{
    let location = catalog.store().location();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(document = %location, "StudyDeck API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C; shutting down");
    }
}

// ==================== Errors ====================

/// Error returned by handlers
#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    /// The blocking task running the operation panicked or was cancelled
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        ApiError::Catalog(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Catalog(e) if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
            ApiError::Catalog(e) if e.is_validation() => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Catalog(e) => {
                error!(error = %e, "Catalog operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Internal(message) => {
                error!(error = %message, "Request task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Run a catalog operation off the async workers, since it does file I/O
/// and may wait on the writer lock
async fn run_blocking<S, T, F>(catalog: SharedCatalog<S>, operation: F) -> Result<T, ApiError>
where
    S: DocumentStore + 'static,
    T: Send + 'static,
    F: FnOnce(&Catalog<S>) -> CatalogResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || operation(&catalog))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

/// Pull `name` out of a request body
///
/// A body that is empty, not JSON, or has no string `name` yields `None`,
/// which the catalog reports as a missing name.
fn requested_name(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("name")?.as_str().map(str::to_owned)
}

// ==================== Handlers ====================

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn stats<S: DocumentStore + 'static>(
    State(catalog): State<SharedCatalog<S>>,
) -> Result<Json<DocumentStats>, ApiError> {
    run_blocking(catalog, |catalog| Ok(catalog.stats()))
        .await
        .map(Json)
}

async fn list_categories<S: DocumentStore + 'static>(
    State(catalog): State<SharedCatalog<S>>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    run_blocking(catalog, |catalog| Ok(catalog.list_categories()))
        .await
        .map(Json)
}

async fn list_subtopics<S: DocumentStore + 'static>(
    State(catalog): State<SharedCatalog<S>>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<SubtopicSummary>>, ApiError> {
    run_blocking(catalog, move |catalog| catalog.list_subtopics(&category_id))
        .await
        .map(Json)
}

async fn list_sets<S: DocumentStore + 'static>(
    State(catalog): State<SharedCatalog<S>>,
    Path((category_id, subtopic_id)): Path<(String, String)>,
) -> Result<Json<Vec<StudySet>>, ApiError> {
    run_blocking(catalog, move |catalog| {
        catalog.list_sets(&category_id, &subtopic_id)
    })
    .await
    .map(Json)
}

async fn add_category<S: DocumentStore + 'static>(
    State(catalog): State<SharedCatalog<S>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = requested_name(&body);
    let category =
        run_blocking(catalog, move |catalog| catalog.add_category(name.as_deref())).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn add_subtopic<S: DocumentStore + 'static>(
    State(catalog): State<SharedCatalog<S>>,
    Path(category_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Subtopic>), ApiError> {
    let name = requested_name(&body);
    let subtopic = run_blocking(catalog, move |catalog| {
        catalog.add_subtopic(&category_id, name.as_deref())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(subtopic)))
}

async fn add_set<S: DocumentStore + 'static>(
    State(catalog): State<SharedCatalog<S>>,
    Path((category_id, subtopic_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<StudySet>), ApiError> {
    let name = requested_name(&body);
    let set = run_blocking(catalog, move |catalog| {
        catalog.add_set(&category_id, &subtopic_id, name.as_deref())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(set)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use studydeck_core::{JsonFileStore, MemoryStore};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn memory_catalog() -> SharedCatalog<MemoryStore> {
        Arc::new(Catalog::new(MemoryStore::new()))
    }

    async fn send<S: DocumentStore + 'static>(
        catalog: &SharedCatalog<S>,
        request: Request<Body>,
    ) -> (StatusCode, Value) {
        let response = router(Arc::clone(catalog)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let catalog = memory_catalog();
        let (status, body) = send(&catalog, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_empty_catalog_lists_no_categories() {
        let catalog = memory_catalog();
        let (status, body) = send(&catalog, get("/api/categories")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let catalog = memory_catalog();

        let (status, math) = send(&catalog, post("/api/categories", r#"{"name": "Math"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        let math_id = math["id"].as_str().unwrap().to_string();
        assert!(math_id.starts_with("cat-"));
        assert_eq!(math, json!({"id": math_id, "name": "Math", "subtopics": []}));

        let uri = format!("/api/categories/{}/subtopics", math_id);
        let (status, algebra) = send(&catalog, post(&uri, r#"{"name": "Algebra"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        let algebra_id = algebra["id"].as_str().unwrap().to_string();
        assert!(algebra_id.starts_with("sub-"));
        assert_eq!(algebra, json!({"id": algebra_id, "name": "Algebra", "sets": []}));

        let uri = format!("/api/categories/{}/subtopics/{}/sets", math_id, algebra_id);
        let (status, chapter) = send(&catalog, post(&uri, r#"{"name": "Chapter 1"}"#)).await;
        assert_eq!(status, StatusCode::CREATED);
        let chapter_id = chapter["id"].as_str().unwrap().to_string();
        assert!(chapter_id.starts_with("set-"));
        assert_eq!(
            chapter,
            json!({"id": chapter_id, "name": "Chapter 1", "flashcards": []})
        );

        let (status, categories) = send(&catalog, get("/api/categories")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            categories,
            json!([{
                "id": math_id,
                "name": "Math",
                "totalSets": 1,
                "totalCards": 0,
                "cardsToReview": 0
            }])
        );

        let (_, subtopics) = send(&catalog, get(&format!("/api/categories/{}/subtopics", math_id))).await;
        assert_eq!(
            subtopics,
            json!([{"id": algebra_id, "name": "Algebra", "totalSets": 1, "totalCards": 0}])
        );

        let (status, sets) = send(&catalog, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sets, json!([chapter]));
    }

    #[tokio::test]
    async fn test_post_without_name_is_rejected() {
        let catalog = memory_catalog();

        for body in ["{}", r#"{"name": ""}"#, r#"{"name": 42}"#, "not json", ""] {
            let (status, response) = send(&catalog, post("/api/categories", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {:?}", body);
            assert!(response["error"].as_str().unwrap().contains("name"));
        }

        let (_, categories) = send(&catalog, get("/api/categories")).await;
        assert_eq!(categories, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let catalog = memory_catalog();

        let (status, body) = send(&catalog, get("/api/categories/cat-missing/subtopics")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("cat-missing"));

        let (status, _) = send(
            &catalog,
            post("/api/categories/cat-missing/subtopics", r#"{"name": "Algebra"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_subtopic_is_not_found() {
        let catalog = memory_catalog();
        let category = catalog.add_category(Some("Math")).unwrap();

        let uri = format!("/api/categories/{}/subtopics/sub-missing/sets", category.id);
        let (status, body) = send(&catalog, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("sub-missing"));

        let (status, _) = send(&catalog, post(&uri, r#"{"name": "Chapter 1"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_document_file_lists_empty() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = Arc::new(Catalog::new(JsonFileStore::new(
            temp_dir.path().join("database.json"),
        )));

        let (status, body) = send(&catalog, get("/api/categories")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_unwritable_document_is_server_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let catalog = Arc::new(Catalog::new(JsonFileStore::new(blocker.join("database.json"))));

        let (status, body) = send(&catalog, post("/api/categories", r#"{"name": "Math"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_stats() {
        let catalog = memory_catalog();
        catalog.add_category(Some("Math")).unwrap();

        let (status, body) = send(&catalog, get("/api/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"], json!(1));
        assert_eq!(body["flashcards"], json!(0));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let catalog = memory_catalog();
        let request = Request::builder()
            .uri("/api/categories")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = router(catalog).oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    #[test]
    fn test_requested_name() {
        assert_eq!(requested_name(br#"{"name": "Math"}"#), Some("Math".to_string()));
        assert_eq!(requested_name(br#"{"name": null}"#), None);
        assert_eq!(requested_name(b"[]"), None);
        assert_eq!(requested_name(b""), None);
    }
}
