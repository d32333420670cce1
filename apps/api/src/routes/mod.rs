pub mod health;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::analytics;
use crate::applications;
use crate::export;
use crate::state::AppState;
use crate::tasks;

/// POST /signup
/// Auth lives in the frontend's identity provider; this just acknowledges the
/// payload so old clients keep working.
async fn signup_handler(Json(payload): Json<Value>) -> Json<Value> {
    Json(json!({
        "message": "Auth is handled by the identity provider on the frontend",
        "payload": payload
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::status_handler))
        .route(
            "/applications",
            get(applications::handlers::handle_list_applications)
                .post(applications::handlers::handle_create_application),
        )
        .route(
            "/applications/move",
            post(applications::handlers::handle_move_application),
        )
        .route(
            "/applications/:id",
            put(applications::handlers::handle_update_application)
                .delete(applications::handlers::handle_delete_application),
        )
        .route("/tasks/upcoming", get(tasks::handlers::handle_upcoming_tasks))
        .route("/tasks", post(tasks::handlers::handle_create_task))
        .route(
            "/tasks/:id",
            put(tasks::handlers::handle_update_task)
                .delete(tasks::handlers::handle_delete_task),
        )
        .route("/analytics/summary", get(analytics::handlers::handle_summary))
        .route("/export/csv", get(export::handle_export_csv))
        .route("/signup", post(signup_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::identity::{Identity, PLACEHOLDER_USER_ID};

    /// State with a lazy pool: URL is parsed but no connection is made, so
    /// routes that never touch the database can be exercised offline.
    fn offline_state() -> AppState {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/ats")
            .expect("valid database url");
        AppState {
            db,
            identity: Identity::new(PLACEHOLDER_USER_ID),
        }
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn status_route_reports_running() {
        let response = build_router(offline_state())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(
            payload.get("status").and_then(Value::as_str),
            Some("Personal ATS API running")
        );
    }

    #[tokio::test]
    async fn signup_echoes_payload_with_static_message() {
        let body = json!({"email": "me@example.com"});
        let response = build_router(offline_state())
            .oneshot(
                Request::post("/signup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload.get("payload"), Some(&body));
        assert!(payload.get("message").is_some());
    }

    #[tokio::test]
    async fn summary_rejects_malformed_as_of() {
        // The as_of parse happens before any database work, so this runs
        // offline against the lazy pool.
        let response = build_router(offline_state())
            .oneshot(
                Request::get("/analytics/summary?as_of=not-a-timestamp")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(
            payload
                .pointer("/error/code")
                .and_then(Value::as_str),
            Some("VALIDATION_ERROR")
        );
    }

    #[tokio::test]
    async fn move_with_malformed_query_is_a_client_error() {
        let response = build_router(offline_state())
            .oneshot(
                Request::post("/applications/move?app_id=not-a-uuid&stage_id=3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
