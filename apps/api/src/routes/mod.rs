pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::documents::handlers;
use crate::state::AppState;

fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(handlers::handle_create))
        .route("/update/:document_id", patch(handlers::handle_update))
        .route("/restore/archive", patch(handlers::handle_restore))
        .route("/all", get(handlers::handle_list_active))
        .route("/trash/all", get(handlers::handle_list_archived))
        .route(
            "/public/doc/:document_id",
            get(handlers::handle_get_public),
        )
        .route("/:document_id", get(handlers::handle_get_document))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1/documents", document_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, DEFAULT_AUTH_USER_HEADER};
    use crate::documents::service::DocumentService;
    use crate::store::MemoryStore;

    fn test_router() -> Router {
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            database_url: None,
            database_max_connections: 1,
            auth_user_header: DEFAULT_AUTH_USER_HEADER.to_string(),
        };
        let state = AppState {
            config,
            documents: Arc::new(DocumentService::new(Arc::new(MemoryStore::new()))),
        };
        build_router(state)
    }

    fn request(
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(DEFAULT_AUTH_USER_HEADER, user);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response: Response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn create(app: &Router, user: &str, title: &str) -> Value {
        let (status, body) = send(
            app,
            request(
                Method::POST,
                "/api/v1/documents/create",
                Some(user),
                Some(json!({ "title": title })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"].clone()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_router();
        let (status, body) = send(&app, request(Method::GET, "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_create_requires_identity() {
        let app = test_router();
        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/api/v1/documents/create",
                None,
                Some(json!({ "title": "Resume" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_body() {
        let app = test_router();
        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/api/v1/documents/create",
                Some("alice"),
                Some(json!({ "name": "no title" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_returns_private_document() {
        let app = test_router();
        let doc = create(&app, "alice", "Resume").await;
        assert_eq!(doc["status"], "private");
        assert_eq!(doc["userId"], "alice");
        assert_eq!(doc["title"], "Resume");
        assert!(doc["documentId"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_update_then_fetch_aggregate() {
        let app = test_router();
        let doc = create(&app, "alice", "Untitled").await;
        let document_id = doc["documentId"].as_str().unwrap();

        let (status, body) = send(
            &app,
            request(
                Method::PATCH,
                &format!("/api/v1/documents/update/{document_id}"),
                Some("alice"),
                Some(json!({
                    "title": "Platform Engineer",
                    "personalInfo": { "firstName": "Ada" },
                    "experience": [{ "title": "SRE", "companyName": "Acme" }],
                    "skillsInfo": [{ "name": "Rust", "rating": 5 }]
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = send(
            &app,
            request(
                Method::GET,
                &format!("/api/v1/documents/{document_id}"),
                Some("alice"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["title"], "Platform Engineer");
        assert_eq!(data["personalInfo"]["firstName"], "Ada");
        assert_eq!(data["experiences"].as_array().unwrap().len(), 1);
        assert_eq!(data["experiences"][0]["docId"], doc["id"]);
        assert_eq!(data["skills"][0]["rating"], 5);
    }

    #[tokio::test]
    async fn test_update_other_users_document_is_not_found() {
        let app = test_router();
        let doc = create(&app, "alice", "Mine").await;
        let document_id = doc["documentId"].as_str().unwrap();

        let (status, body) = send(
            &app,
            request(
                Method::PATCH,
                &format!("/api/v1/documents/update/{document_id}"),
                Some("mallory"),
                Some(json!({ "title": "Hijacked" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_archive_trash_and_restore_flow() {
        let app = test_router();
        let doc = create(&app, "alice", "Old resume").await;
        let document_id = doc["documentId"].as_str().unwrap();

        let (status, _) = send(
            &app,
            request(
                Method::PATCH,
                &format!("/api/v1/documents/update/{document_id}"),
                Some("alice"),
                Some(json!({ "status": "archived" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, active) = send(
            &app,
            request(Method::GET, "/api/v1/documents/all", Some("alice"), None),
        )
        .await;
        assert!(active["data"].as_array().unwrap().is_empty());

        let (_, trash) = send(
            &app,
            request(Method::GET, "/api/v1/documents/trash/all", Some("alice"), None),
        )
        .await;
        assert_eq!(trash["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            request(
                Method::PATCH,
                "/api/v1/documents/restore/archive",
                Some("alice"),
                Some(json!({ "documentId": document_id, "status": "public" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_STATE");

        let (status, body) = send(
            &app,
            request(
                Method::PATCH,
                "/api/v1/documents/restore/archive",
                Some("alice"),
                Some(json!({ "documentId": document_id, "status": "archived" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "private");

        let (status, _) = send(
            &app,
            request(
                Method::PATCH,
                "/api/v1/documents/restore/archive",
                Some("alice"),
                Some(json!({ "documentId": document_id, "status": "archived" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_public_route_needs_public_status() {
        let app = test_router();
        let doc = create(&app, "alice", "Portfolio").await;
        let document_id = doc["documentId"].as_str().unwrap();
        let public_uri = format!("/api/v1/documents/public/doc/{document_id}");

        let (status, body) = send(&app, request(Method::GET, &public_uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        send(
            &app,
            request(
                Method::PATCH,
                &format!("/api/v1/documents/update/{document_id}"),
                Some("alice"),
                Some(json!({ "status": "public" })),
            ),
        )
        .await;

        let (status, body) = send(&app, request(Method::GET, &public_uri, None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Portfolio");
    }
}
