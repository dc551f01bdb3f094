pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::benchmark::handlers as benchmark;
use crate::dashboard::handlers as dashboard;
use crate::insights::handlers as insights;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Benchmark intake
        .route("/api/v1/employees", get(benchmark::handle_list_employees))
        .route("/api/v1/benchmarks", post(benchmark::handle_save_benchmark))
        .route(
            "/api/v1/benchmarks/profile",
            post(benchmark::handle_job_profile),
        )
        .route(
            "/api/v1/benchmarks/:role_id",
            get(benchmark::handle_get_benchmark),
        )
        // Session
        .route(
            "/api/v1/session",
            post(session::handle_create_session).get(session::handle_get_session),
        )
        .route("/api/v1/session/role", put(session::handle_select_role))
        // Dashboard
        .route(
            "/api/v1/dashboard/overview",
            get(dashboard::handle_overview),
        )
        .route(
            "/api/v1/dashboard/comparison",
            get(dashboard::handle_comparison),
        )
        .route(
            "/api/v1/dashboard/talent-variables",
            get(dashboard::handle_talent_variables),
        )
        // Insights
        .route("/api/v1/insights/top", get(insights::handle_top_candidates))
        .route(
            "/api/v1/insights/radar/:candidate_id",
            get(insights::handle_radar),
        )
        .route(
            "/api/v1/insights/summary",
            post(insights::handle_insight_summary),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::benchmark::test_support::InMemoryBenchmarkStore;
    use crate::insights::handlers::NO_CANDIDATES_MESSAGE;
    use crate::llm_client::MISSING_KEY_MESSAGE;
    use crate::matching::test_support::StaticRetrieval;
    use crate::matching::MatchService;
    use crate::models::matching::MatchResultRow;
    use crate::projection::test_support::{placed, scenario};
    use crate::session::{InMemorySessionStore, SESSION_HEADER};

    struct Harness {
        router: Router,
        store: Arc<InMemoryBenchmarkStore>,
        engine: Arc<StaticRetrieval>,
    }

    fn harness(results: &[(&str, Vec<MatchResultRow>)]) -> Harness {
        let store = Arc::new(InMemoryBenchmarkStore::with_employees(&["E1", "E2", "E3", "E4"]));
        let engine = Arc::new(StaticRetrieval {
            results: results
                .iter()
                .map(|(role, rows)| (role.to_string(), rows.clone()))
                .collect(),
            ..Default::default()
        });
        let state = AppState {
            benchmarks: store.clone(),
            matches: MatchService::new(
                engine.clone(),
                Duration::from_secs(600),
                Duration::from_secs(20),
            ),
            sessions: Arc::new(InMemorySessionStore::default()),
            llm: None,
        };
        Harness {
            router: build_router(state),
            store,
            engine,
        }
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        session: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = session {
            builder = builder.header(SESSION_HEADER, id.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn benchmark_body(ids: &[&str]) -> Value {
        json!({
            "role_name": "Data Analyst",
            "job_level": "Middle",
            "role_purpose": "Turn raw data into weekly decisions.",
            "reference_employee_ids": ids,
        })
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(&[]);
        let (status, body) = send(&h.router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_backend"], "static");
        assert_eq!(body["session_store"], "memory");
        assert_eq!(body["ai_enabled"], false);
    }

    #[tokio::test]
    async fn test_list_employees() {
        let h = harness(&[]);
        let (status, body) = send(&h.router, "GET", "/api/v1/employees", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);
        assert_eq!(body[0]["employee_id"], "E1");
    }

    #[tokio::test]
    async fn test_save_benchmark_rejects_four_employees_without_writing() {
        let h = harness(&[]);
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/benchmarks",
            None,
            Some(benchmark_body(&["E1", "E2", "E3", "E4"])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.store.writes(), 0);
    }

    #[tokio::test]
    async fn test_save_then_dashboard_follows_session() {
        let h = harness(&[("data_analyst", scenario())]);
        let session = Uuid::new_v4();

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/benchmarks",
            Some(session),
            Some(benchmark_body(&["E1", "E2"])),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["role_id"], "data_analyst");
        assert_eq!(body["session_updated"], true);

        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/dashboard/overview",
            Some(session),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role_id"], "data_analyst");
        assert_eq!(body["summary"]["count"], 2);
        assert_eq!(body["summary"]["mean_final"], 75.0);
        assert_eq!(body["summary"]["max_final"], 90.0);
        assert_eq!(body["summary"]["min_final"], 60.0);
    }

    #[tokio::test]
    async fn test_dashboard_without_role_is_not_found() {
        let h = harness(&[]);
        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/dashboard/overview",
            Some(Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(h.engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_role_is_not_found() {
        let h = harness(&[]);
        let (status, _) = send(
            &h.router,
            "GET",
            "/api/v1/dashboard/overview?role_id=ghost",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_explicit_role_id_is_normalized() {
        let h = harness(&[("data_analyst", scenario())]);
        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/dashboard/overview?role_id=Data%20Analyst",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role_id"], "data_analyst");

        let session = Uuid::new_v4();
        send(
            &h.router,
            "POST",
            "/api/v1/benchmarks",
            None,
            Some(benchmark_body(&["E1"])),
        )
        .await;
        let (status, body) = send(
            &h.router,
            "PUT",
            "/api/v1/session/role",
            Some(session),
            Some(json!({ "role_id": "Data Analyst" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected_role_id"], "data_analyst");
    }

    #[tokio::test]
    async fn test_malformed_session_header() {
        let h = harness(&[]);
        let request = Request::builder()
            .uri("/api/v1/dashboard/overview")
            .header(SESSION_HEADER, "nope")
            .body(Body::empty())
            .unwrap();
        let response = h.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_overview_filters_and_options() {
        let rows = vec![
            placed("C1", "Ops", "IV", 80.0),
            placed("C2", "Finance", "III", 60.0),
            placed("C3", "Ops", "III", 40.0),
        ];
        let h = harness(&[("plant_manager", rows)]);
        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/dashboard/overview?role_id=plant_manager&directorate=Ops&bins=2",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["count"], 2);
        assert_eq!(body["summary"]["mean_final"], 60.0);
        assert_eq!(body["histogram"].as_array().unwrap().len(), 2);
        assert_eq!(body["by_directorate"][0]["label"], "Ops");
        assert_eq!(body["by_grade"].as_array().unwrap().len(), 2);
        assert_eq!(
            body["filter_options"]["directorates"],
            json!(["Finance", "Ops"])
        );
    }

    #[tokio::test]
    async fn test_comparison_keeps_missing_groups_null() {
        let h = harness(&[("data_analyst", scenario())]);
        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/dashboard/comparison?role_id=data_analyst",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["group_labels"], json!(["Competency", "Psychometric"]));
        assert_eq!(body["candidates"][0]["candidate_id"], "C1");
        assert_eq!(body["candidates"][0]["Psychometric"], 70.0);
        assert_eq!(body["candidates"][1]["Competency"], 60.0);
        assert!(body["candidates"][1]["Psychometric"].is_null());
    }

    #[tokio::test]
    async fn test_talent_variables_empty_breakdown() {
        let h = harness(&[("data_analyst", scenario())]);
        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/dashboard/talent-variables?role_id=data_analyst",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["variables"], json!([]));
    }

    #[tokio::test]
    async fn test_top_and_radar() {
        let h = harness(&[("data_analyst", scenario())]);

        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/insights/top?role_id=data_analyst&n=1",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["candidates"].as_array().unwrap().len(), 1);
        assert_eq!(body["candidates"][0]["candidate_id"], "C1");
        assert_eq!(body["candidates"][0]["final_match_rate"], 90.0);

        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/insights/radar/C1?role_id=data_analyst",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["axes"][0]["label"], "Competency");
        assert_eq!(body["axes"][1]["value"], 70.0);

        let (status, _) = send(
            &h.router,
            "GET",
            "/api/v1/insights/radar/C9?role_id=data_analyst",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Three page loads, one engine call.
        assert_eq!(h.engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_summary_without_ai_key_degrades() {
        let h = harness(&[("data_analyst", scenario()), ("empty_role", vec![])]);

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/insights/summary",
            None,
            Some(json!({ "role_id": "data_analyst" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["narrative"]["generated"], false);
        assert_eq!(body["narrative"]["text"], MISSING_KEY_MESSAGE);
        assert_eq!(body["top_candidates"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/insights/summary",
            None,
            Some(json!({ "role_id": "empty_role" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["narrative"]["text"], NO_CANDIDATES_MESSAGE);
    }

    #[tokio::test]
    async fn test_job_profile_without_ai_key_degrades() {
        let h = harness(&[]);
        let (status, body) = send(
            &h.router,
            "POST",
            "/api/v1/benchmarks/profile",
            None,
            Some(json!({ "role_name": "Data Analyst", "role_purpose": "Reports" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], MISSING_KEY_MESSAGE);

        let (status, _) = send(
            &h.router,
            "POST",
            "/api/v1/benchmarks/profile",
            None,
            Some(json!({ "role_name": " " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_session_selection_flow() {
        let h = harness(&[]);

        let (status, body) = send(&h.router, "POST", "/api/v1/session", None, None).await;
        assert_eq!(status, StatusCode::CREATED);
        let session: Uuid = serde_json::from_value(body["session_id"].clone()).unwrap();

        let (status, _) = send(
            &h.router,
            "PUT",
            "/api/v1/session/role",
            Some(session),
            Some(json!({ "role_id": "data_analyst" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        send(
            &h.router,
            "POST",
            "/api/v1/benchmarks",
            None,
            Some(benchmark_body(&["E1"])),
        )
        .await;

        let (status, body) = send(
            &h.router,
            "PUT",
            "/api/v1/session/role",
            Some(session),
            Some(json!({ "role_id": "data_analyst" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected_role_id"], "data_analyst");

        let (status, body) = send(&h.router, "GET", "/api/v1/session", Some(session), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected_role_id"], "data_analyst");

        let (status, _) = send(&h.router, "GET", "/api/v1/session", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_benchmark() {
        let h = harness(&[]);
        send(
            &h.router,
            "POST",
            "/api/v1/benchmarks",
            None,
            Some(benchmark_body(&["E1", "E3"])),
        )
        .await;

        let (status, body) = send(
            &h.router,
            "GET",
            "/api/v1/benchmarks/data_analyst",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected_talent_ids"], json!(["E1", "E3"]));

        let (status, _) = send(&h.router, "GET", "/api/v1/benchmarks/ghost", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
