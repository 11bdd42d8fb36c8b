pub mod cv;
pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::models::cv::{Certification, Education, Experience, Language, Project, Skill};
use crate::state::AppState;
use crate::store::Collection;

/// Adds add/update/remove routes for one collection under `/api/v1/cv/{name}`.
fn with_collection<E: Collection>(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            &format!("/api/v1/cv/{}", E::NAME),
            post(cv::handle_add_entry::<E>),
        )
        .route(
            &format!("/api/v1/cv/{}/:id", E::NAME),
            patch(cv::handle_update_entry::<E>).delete(cv::handle_remove_entry::<E>),
        )
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/cv", get(cv::handle_get_cv))
        .route("/api/v1/cv/report", get(cv::handle_get_report))
        .route(
            "/api/v1/cv/personal-info",
            patch(cv::handle_update_personal_info),
        )
        .route("/api/v1/cv/template", put(cv::handle_set_template))
        .route("/api/v1/cv/language", put(cv::handle_set_language))
        .route("/api/v1/cv/section", put(cv::handle_set_section))
        .route("/api/v1/cv/recalculate", post(cv::handle_recalculate));

    let router = with_collection::<Experience>(router);
    let router = with_collection::<Education>(router);
    let router = with_collection::<Skill>(router);
    let router = with_collection::<Language>(router);
    let router = with_collection::<Certification>(router);
    let router = with_collection::<Project>(router);

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::errors::PersistenceError;
    use crate::persistence::{load_snapshot, InMemorySnapshotStore, SnapshotStore};
    use crate::store::CvStore;

    /// Holds its first save back, so a later request can overtake it.
    struct SlowFirstSave {
        inner: InMemorySnapshotStore,
        delayed: AtomicBool,
    }

    #[async_trait]
    impl SnapshotStore for SlowFirstSave {
        async fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
            self.inner.load(key).await
        }

        async fn save(&self, key: &str, value: String) -> Result<(), PersistenceError> {
            if !self.delayed.swap(true, Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            self.inner.save(key, value).await
        }
    }

    struct FailingSlot;

    #[async_trait]
    impl SnapshotStore for FailingSlot {
        async fn load(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Ok(None)
        }

        async fn save(&self, key: &str, _value: String) -> Result<(), PersistenceError> {
            Err(PersistenceError::InvalidKey(key.to_string()))
        }
    }

    fn test_app() -> (Router, InMemorySnapshotStore) {
        let slot = InMemorySnapshotStore::new();
        let state = AppState::new(CvStore::new(), Arc::new(slot.clone()), Config::default());
        (build_router(state), slot)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_overlapping_writes_persist_in_order() {
        let inner = InMemorySnapshotStore::new();
        let slot = SlowFirstSave {
            inner: inner.clone(),
            delayed: AtomicBool::new(false),
        };
        let state = AppState::new(CvStore::new(), Arc::new(slot), Config::default());
        let app = build_router(state);

        let first = {
            let app = app.clone();
            tokio::spawn(async move {
                send(
                    &app,
                    Method::POST,
                    "/api/v1/cv/skills",
                    Some(json!({
                        "id": "a",
                        "name": "a",
                        "category": "technical",
                        "level": "expert"
                    })),
                )
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let second = {
            let app = app.clone();
            tokio::spawn(async move {
                send(
                    &app,
                    Method::POST,
                    "/api/v1/cv/skills",
                    Some(json!({"id": "b", "name": "b", "category": "soft", "level": "expert"})),
                )
                .await
            })
        };
        assert_eq!(first.await.unwrap().0, StatusCode::OK);
        assert_eq!(second.await.unwrap().0, StatusCode::OK);

        let snapshot = load_snapshot(&inner, "cv-builder-storage")
            .await
            .unwrap()
            .unwrap();
        let ids: Vec<_> = snapshot.state.skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_mutation_in_memory() {
        let state = AppState::new(CvStore::new(), Arc::new(FailingSlot), Config::default());
        let app = build_router(state);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/cv/template",
            Some(json!({"template": "classic"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");

        let (_, body) = send(&app, Method::GET, "/api/v1/cv", None).await;
        assert_eq!(body["currentTemplate"], "classic");
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_get_fresh_cv() {
        let (app, _) = test_app();
        let (status, body) = send(&app, Method::GET, "/api/v1/cv", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["languages"].as_array().unwrap().len(), 2);
        assert_eq!(body["direction"], "ltr");
        assert_eq!(body["currentTemplate"], "");
    }

    #[tokio::test]
    async fn test_personal_info_with_template_scores() {
        let (app, _) = test_app();
        send(
            &app,
            Method::PUT,
            "/api/v1/cv/template",
            Some(json!({"template": "modern"})),
        )
        .await;
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/cv/personal-info",
            Some(json!({
                "fullName": "Reem Al-Otaibi",
                "email": "reem@example.com",
                "phone": "+966501234567",
                "title": "UX Researcher",
                "location": "Riyadh"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["atsScore"], 20);
        assert_eq!(body["completionPercentage"], 38);
        assert_eq!(body["personalInfo"]["fullName"], "Reem Al-Otaibi");
    }

    #[tokio::test]
    async fn test_add_experience_generates_id_and_persists() {
        let (app, slot) = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/cv/experience",
            Some(json!({
                "company": "Saudia",
                "position": "Software Engineer",
                "current": true,
                "description": [
                    "Led a cross-functional team of 8 engineers to deliver a new platform."
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["atsScore"], 25);
        let id = body["experience"][0]["id"].as_str().unwrap();
        assert!(!id.is_empty());

        let snapshot = load_snapshot(&slot, "cv-builder-storage")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.state.experience.len(), 1);
        assert_eq!(snapshot.state.experience[0].id, id);
    }

    #[tokio::test]
    async fn test_update_and_remove_skill() {
        let (app, _) = test_app();
        send(
            &app,
            Method::POST,
            "/api/v1/cv/skills",
            Some(json!({"id": "s1", "name": "Go", "category": "technical", "level": "beginner"})),
        )
        .await;
        let (_, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/cv/skills/s1",
            Some(json!({"level": "advanced"})),
        )
        .await;
        assert_eq!(body["skills"][0]["level"], "advanced");

        let (status, body) = send(&app, Method::DELETE, "/api/v1/cv/skills/s1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["skills"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_an_error() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/cv/certifications/nope",
            Some(json!({"name": "CISSP"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["certifications"].as_array().unwrap().is_empty());

        let (status, _) = send(&app, Method::DELETE, "/api/v1/cv/education/nope", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_entry_is_bad_request() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/cv/skills",
            Some(json!({"name": "Chess", "category": "hobby", "level": "expert"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_set_language_flips_direction() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/cv/language",
            Some(json!({"language": "ar"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["language"], "ar");
        assert_eq!(body["direction"], "rtl");
    }

    #[tokio::test]
    async fn test_set_section() {
        let (app, _) = test_app();
        let (_, body) = send(
            &app,
            Method::PUT,
            "/api/v1/cv/section",
            Some(json!({"section": "projects"})),
        )
        .await;
        assert_eq!(body["currentSection"], "projects");
    }

    #[tokio::test]
    async fn test_report_is_computed_fresh() {
        let (app, _) = test_app();
        let (status, body) = send(&app, Method::GET, "/api/v1/cv/report", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completion"]["percentage"], 13);
        assert_eq!(body["ats"]["total"], 0);
        assert_eq!(body["rating"], "needs_work");
    }

    #[tokio::test]
    async fn test_recalculate_refreshes_stale_ats() {
        let (app, _) = test_app();
        for (id, category) in [("a", "technical"), ("b", "soft"), ("c", "soft")] {
            send(
                &app,
                Method::POST,
                "/api/v1/cv/skills",
                Some(json!({"id": id, "name": id, "category": category, "level": "expert"})),
            )
            .await;
        }
        let (_, body) = send(&app, Method::GET, "/api/v1/cv", None).await;
        assert_eq!(body["atsScore"], 0);
        assert_eq!(body["completionPercentage"], 25);

        let (_, body) = send(&app, Method::POST, "/api/v1/cv/recalculate", None).await;
        assert_eq!(body["atsScore"], 15);
    }

    #[tokio::test]
    async fn test_projects_collection() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/cv/projects",
            Some(json!({
                "title": "Quran recitation app",
                "technologies": ["Rust", "Flutter"],
                "teamSize": "3"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["projects"][0]["teamSize"], "3");
        assert_eq!(body["completionPercentage"], 0);
    }
}
