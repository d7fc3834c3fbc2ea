//! HTTP API module
//!
//! Timer control, the custom workout editor, saved workouts, preferences and
//! the live event stream.

pub mod events;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use events::events_handler;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/hiit/start", post(start_hiit_handler))
        .route("/timer/custom/start", post(start_custom_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/resume", post(resume_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/custom/intervals", get(list_intervals_handler).post(add_interval_handler))
        .route(
            "/custom/intervals/:id",
            axum::routing::patch(update_interval_handler).delete(remove_interval_handler),
        )
        .route("/custom/intervals/:id/step", post(step_interval_handler))
        .route("/custom/intervals/:id/move", post(move_interval_handler))
        .route("/workouts", get(list_workouts_handler).post(save_workout_handler))
        .route("/workouts/:id", axum::routing::delete(delete_workout_handler))
        .route("/workouts/:id/load", post(load_workout_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/cues", get(get_cues_handler).put(put_cues_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/events", get(events_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{services::cues::testing::RecordingSink, state::app_state::tests::test_state};

    fn app() -> Router {
        create_router(Arc::new(test_state(&RecordingSink::default())))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (status, body) = call(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn hiit_start_clamps_form_values() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/timer/hiit/start",
            Some(json!({ "work_seconds": 1, "rest_seconds": 10, "rounds": 99 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["run"]["mode"], "running");
        assert_eq!(body["run"]["remaining"], 3);
        assert_eq!(body["run"]["is_prestart"], true);
        assert_eq!(body["run"]["workout"], "hiit");
        assert_eq!(body["run"]["current"]["seconds"], 5);
    }

    #[tokio::test]
    async fn pause_while_editing_is_unchanged() {
        let (status, body) = call(&app(), Method::POST, "/timer/pause", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unchanged");
        assert_eq!(body["run"]["mode"], "editing");
    }

    #[tokio::test]
    async fn editor_conflicts_while_running() {
        let app = app();
        call(&app, Method::POST, "/timer/custom/start", None).await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/custom/intervals",
            Some(json!({ "kind": "work" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");

        call(&app, Method::POST, "/timer/reset", None).await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/custom/intervals",
            Some(json!({ "kind": "work" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 4);
    }

    #[tokio::test]
    async fn interval_editing_round_trip() {
        let app = app();
        let (_, body) = call(&app, Method::GET, "/custom/intervals", None).await;
        assert_eq!(body["total_seconds"], 40);
        assert_eq!(body["total_time"], "00:40");
        assert_eq!(body["runnable"], true);

        let (status, body) = call(
            &app,
            Method::POST,
            "/custom/intervals/2/step",
            Some(json!({ "delta": -100 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["duration"], 5);

        let (_, body) = call(
            &app,
            Method::POST,
            "/custom/intervals/3/move",
            Some(json!({ "target_id": 1 })),
        )
        .await;
        let ids: Vec<_> = body["intervals"]
            .as_array()
            .unwrap()
            .iter()
            .map(|it| it["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn unknown_interval_is_not_found() {
        let app = app();
        let (status, _) = call(&app, Method::DELETE, "/custom/intervals/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(
            &app,
            Method::PATCH,
            "/custom/intervals/42",
            Some(json!({ "label": "Sprint" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn saved_workouts_flow() {
        let app = app();
        let (status, _) = call(&app, Method::POST, "/workouts", Some(json!({ "name": "   " }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, saved) =
            call(&app, Method::POST, "/workouts", Some(json!({ "name": " Tabata " }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(saved["name"], "Tabata");
        let id = saved["id"].as_str().unwrap().to_string();

        let (_, list) = call(&app, Method::GET, "/workouts", None).await;
        assert_eq!(list["workouts"].as_array().unwrap().len(), 1);

        let (status, loaded) = call(&app, Method::POST, &format!("/workouts/{}/load", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loaded["run"]["mode"], "editing");
        assert_eq!(loaded["intervals"].as_array().unwrap().len(), 3);

        let (_, deleted) = call(&app, Method::DELETE, &format!("/workouts/{}", id), None).await;
        assert_eq!(deleted["deleted"], true);
        let (status, _) = call(&app, Method::POST, &format!("/workouts/{}/load", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn saved_workouts_reach_disk_from_blocking_pool() {
        let dir = std::env::temp_dir().join(format!("hiit-pro-api-{}", uuid::Uuid::new_v4().simple()));
        let (event_tx, _) = tokio::sync::broadcast::channel(8);
        let state = AppState::new(
            0,
            "127.0.0.1".to_string(),
            crate::storage::LocalStore::open(&dir),
            crate::services::CuePlayer::new(Default::default()),
            event_tx,
        );
        let app = create_router(Arc::new(state));

        let (status, saved) =
            call(&app, Method::POST, "/workouts", Some(json!({ "name": "Disk Day" }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let reopened = crate::storage::LocalStore::open(&dir);
        let stored = crate::workouts::store::list(&reopened);
        assert_eq!(stored.len(), 1);
        assert_eq!(Some(stored[0].id.as_str()), saved["id"].as_str());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn settings_and_wake_lock() {
        let app = app();
        let (_, status) = call(&app, Method::GET, "/status", None).await;
        assert_eq!(status["keep_screen_awake"], true);

        let (code, _) = call(
            &app,
            Method::PUT,
            "/settings",
            Some(json!({ "theme": "ocean", "wake_lock": "disabled" })),
        )
        .await;
        assert_eq!(code, StatusCode::OK);

        let (_, status) = call(&app, Method::GET, "/status", None).await;
        assert_eq!(status["settings"]["theme"], "ocean");
        assert_eq!(status["keep_screen_awake"], false);
    }

    #[tokio::test]
    async fn cue_volume_is_clamped() {
        let app = app();
        let (_, body) = call(
            &app,
            Method::PUT,
            "/cues",
            Some(json!({ "sound": true, "vibration": true, "volume": 4.0 })),
        )
        .await;
        assert_eq!(body["volume"], 1.0);
        assert_eq!(body["vibration"], true);
    }
}
