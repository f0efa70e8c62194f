use std::{collections::HashMap, sync::Arc, time::Duration};

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use mathmaster::{
    app_state::AppState,
    config::{Config, StoreBackend},
    db::Database,
    errors::GenerationError,
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
    models::domain::{Difficulty, GradeLevel},
    services::generation_service::{GeneratedQuestion, QuestionGenerator},
};

struct CannedGenerator;

#[async_trait]
impl QuestionGenerator for CannedGenerator {
    async fn generate(
        &self,
        topic: &str,
        _difficulty: Difficulty,
        _grade: GradeLevel,
    ) -> Result<GeneratedQuestion, GenerationError> {
        if topic == "Falha" {
            return Err(GenerationError::Service("503 Service Unavailable".to_string()));
        }
        Ok(GeneratedQuestion {
            text: format!("Questão gerada sobre {}", topic),
            options: ["1", "2", "3", "4"].map(String::from).to_vec(),
            correct_option_index: 3,
            category: String::new(),
        })
    }
}

async fn test_state() -> AppState {
    let mut config = Config::from_env();
    config.store_backend = StoreBackend::Memory;
    config.feedback_delay_ms = 20;

    let db = Database::connect(&config).await.unwrap();
    AppState::with_parts(config, db, Arc::new(CannedGenerator))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(RequestIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    };
}

/// Answer key for a grade, read through the teacher listing.
macro_rules! answer_key {
    ($app:expr, $grade:expr) => {{
        let req = test::TestRequest::get()
            .uri(&format!("/api/teacher/questions?gradeLevel={}", $grade))
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        body.as_array()
            .unwrap()
            .iter()
            .map(|q| {
                (
                    q["id"].as_str().unwrap().to_string(),
                    q["correctOptionIndex"].as_u64().unwrap(),
                )
            })
            .collect::<HashMap<String, u64>>()
    }};
}

/// Polls the session view until it leaves `$pending`.
macro_rules! wait_for_status {
    ($app:expr, $id:expr, $pending:expr) => {{
        let mut found = None;
        for _ in 0..100 {
            let req = test::TestRequest::get()
                .uri(&format!("/api/student/sessions/{}", $id))
                .to_request();
            let view: Value = test::call_and_read_body_json($app, req).await;
            if view["status"] != $pending {
                found = Some(view);
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        found.expect("session never left the pending state")
    }};
}

#[actix_web::test]
async fn full_quiz_flow_lands_on_the_leaderboard() {
    let state = test_state().await;
    let app = app!(state.clone());
    let key = answer_key!(&app, "6ano");

    let req = test::TestRequest::post()
        .uri("/api/student/sessions")
        .set_json(json!({ "studentName": "Ana", "gradeLevel": "6ano", "topic": "all", "seed": 42 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let mut view: Value = test::read_body_json(resp).await;
    let id = view["sessionId"].as_str().unwrap().to_string();
    assert_eq!(view["totalQuestions"], 3);

    for n in 1..=3 {
        assert_eq!(view["questionNumber"], n);
        let qid = view["currentQuestion"]["id"].as_str().unwrap();
        let correct = key[qid];
        // Miss the last one.
        let choice = if n < 3 { correct } else { (correct + 1) % 4 };

        let req = test::TestRequest::post()
            .uri(&format!("/api/student/sessions/{}/answers", id))
            .set_json(json!({ "optionIndex": choice, "timeSpentSeconds": 4.2 }))
            .to_request();
        let submitted: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(submitted["accepted"], true);
        assert_eq!(submitted["feedback"]["isCorrect"], n < 3);
        assert_eq!(submitted["feedback"]["correctOptionIndex"], correct);

        view = wait_for_status!(&app, &id, "answered_pending");
    }

    assert_eq!(view["status"], "finished");
    assert_eq!(view["result"]["score"], 2);
    assert_eq!(view["result"]["percentage"], 67);
    assert_eq!(state.session_service.active_sessions().await, 0);

    let req = test::TestRequest::get()
        .uri("/api/teacher/attempts?gradeLevel=6ano")
        .to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    let board = board.as_array().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[0]["studentName"], "Ana");
    assert_eq!(board[0]["percentage"], 67);

    let req = test::TestRequest::get()
        .uri("/api/teacher/attempts?gradeLevel=7ano")
        .to_request();
    let other: Value = test::call_and_read_body_json(&app, req).await;
    assert!(other.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn second_answer_during_feedback_is_ignored() {
    let app = app!(test_state().await);

    let req = test::TestRequest::post()
        .uri("/api/student/sessions")
        .set_json(json!({ "studentName": "Bia", "gradeLevel": "9ano", "seed": 1 }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    let id = view["sessionId"].as_str().unwrap().to_string();

    let answer = |option: u64| {
        test::TestRequest::post()
            .uri(&format!("/api/student/sessions/{}/answers", id))
            .set_json(json!({ "optionIndex": option }))
            .to_request()
    };

    let first: Value = test::call_and_read_body_json(&app, answer(0)).await;
    let second: Value = test::call_and_read_body_json(&app, answer(2)).await;
    assert_eq!(first["accepted"], true);
    assert_eq!(second["accepted"], false);
    assert_eq!(second["feedback"]["selectedOptionIndex"], 0);

    let view = wait_for_status!(&app, &id, "answered_pending");
    assert_eq!(view["questionNumber"], 2);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/student/sessions/{}/answers", id))
            .set_json(json!({ "optionIndex": 4 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn exit_mid_quiz_records_nothing() {
    let app = app!(test_state().await);

    let req = test::TestRequest::post()
        .uri("/api/student/sessions")
        .set_json(json!({ "studentName": "Caio", "gradeLevel": "7ano" }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    let id = view["sessionId"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/student/sessions/{}/answers", id))
        .set_json(json!({ "optionIndex": 1 }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/student/sessions/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(50)).await;

    let req = test::TestRequest::get().uri("/api/teacher/attempts").to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    assert!(board.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn topic_with_no_questions_shows_empty_state() {
    let app = app!(test_state().await);

    let req = test::TestRequest::post()
        .uri("/api/student/sessions")
        .set_json(json!({ "studentName": "Davi", "gradeLevel": "8ano", "topic": "Estatística" }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(view["status"], "empty");
    assert_eq!(view["totalQuestions"], 0);
    assert!(view.get("currentQuestion").is_none());
}

#[actix_web::test]
async fn generated_question_joins_the_bank_and_can_be_quizzed() {
    let app = app!(test_state().await);

    let req = test::TestRequest::post()
        .uri("/api/teacher/questions/generate")
        .set_json(json!({ "topic": "Probabilidade", "difficulty": "hard", "gradeLevel": "9ano" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["category"], "Probabilidade");
    assert_eq!(created["gradeLevel"], "9ano");

    let req = test::TestRequest::post()
        .uri("/api/student/sessions")
        .set_json(json!({ "studentName": "Eva", "gradeLevel": "9ano", "topic": "Probabilidade" }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["totalQuestions"], 1);
    assert_eq!(view["currentQuestion"]["id"], created["id"]);

    let req = test::TestRequest::post()
        .uri("/api/teacher/questions/generate")
        .set_json(json!({ "topic": "Falha", "gradeLevel": "9ano" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "GENERATION_FAILED");
}

#[actix_web::test]
async fn reset_returns_to_seeded_state() {
    let app = app!(test_state().await);

    let req = test::TestRequest::delete()
        .uri("/api/teacher/questions/6-easy")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri("/api/teacher/reset").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let key = answer_key!(&app, "6ano");
    assert!(key.contains_key("6-easy"));
    assert_eq!(key.len(), 3);
}

#[actix_web::test]
async fn health_endpoints_respond() {
    let app = app!(test_state().await);

    for uri in ["/health", "/health/live", "/health/ready"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert!(test::call_service(&app, req).await.status().is_success(), "{}", uri);
    }
}
