use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    constants::curriculum::topics_for,
    errors::AppError,
    models::{
        domain::GradeLevel,
        dto::{
            request::{StartSessionRequest, SubmitAnswerRequest},
            response::{MessageResponse, TopicsResponse},
        },
    },
};

#[post("/api/student/sessions")]
pub async fn start_session(
    state: web::Data<AppState>,
    request: web::Json<StartSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let view = state.session_service.start(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/api/student/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = state.session_service.view(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/student/sessions/{id}/answers")]
pub async fn submit_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .session_service
        .submit_answer(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/api/student/sessions/{id}")]
pub async fn exit_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.session_service.exit(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Session closed")))
}

#[get("/api/topics/{grade}")]
pub async fn list_topics(grade: web::Path<GradeLevel>) -> HttpResponse {
    let grade = grade.into_inner();
    HttpResponse::Ok().json(TopicsResponse {
        grade_level: grade,
        label: grade.label(),
        topics: topics_for(grade).to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        config::Config, db::Database, services::generation_service::MockQuestionGenerator,
        test_utils::test_helpers::assert_error_status,
    };

    async fn state() -> AppState {
        let db = Database::in_memory().await.unwrap();
        AppState::with_parts(
            Config::test_config(),
            db,
            Arc::new(MockQuestionGenerator::new()),
        )
    }

    #[actix_web::test]
    async fn start_then_view_session() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state().await))
                .service(start_session)
                .service(get_session),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/student/sessions")
            .set_json(json!({ "studentName": "Ana", "gradeLevel": "8ano", "seed": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "in_progress");
        assert_eq!(body["totalQuestions"], 3);
        assert_eq!(body["questionNumber"], 1);
        assert!(body["currentQuestion"].get("correctOptionIndex").is_none());

        let id = body["sessionId"].as_str().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/api/student/sessions/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn start_without_grade_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state().await))
                .service(start_session),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/student/sessions")
            .set_json(json!({ "studentName": "Ana" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn answering_unknown_session_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state().await))
                .service(submit_answer)
                .service(exit_session),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/student/sessions/ghost/answers")
            .set_json(json!({ "optionIndex": 0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri("/api/student/sessions/ghost")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_status(resp.status());
    }

    #[actix_web::test]
    async fn negative_time_spent_is_accepted() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state().await))
                .service(start_session)
                .service(submit_answer),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/student/sessions")
            .set_json(json!({ "studentName": "Ana", "gradeLevel": "7ano", "seed": 9 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = body["sessionId"].as_str().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/student/sessions/{}/answers", id))
            .set_json(json!({ "optionIndex": 2, "timeSpentSeconds": -4.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn topics_are_listed_per_grade() {
        let app = test::init_service(App::new().service(list_topics)).await;

        let req = test::TestRequest::get().uri("/api/topics/9ano").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["gradeLevel"], "9ano");
        assert_eq!(body["topics"].as_array().unwrap().len(), 6);
    }

    #[actix_web::test]
    async fn unknown_grade_is_not_found() {
        let app = test::init_service(App::new().service(list_topics)).await;

        let req = test::TestRequest::get().uri("/api/topics/5ano").to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_status(resp.status());
    }
}
