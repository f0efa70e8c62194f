use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{
            CreateQuestionRequest, GenerateQuestionRequest, LeaderboardParams, QuestionListParams,
        },
        response::MessageResponse,
    },
};

#[get("/api/teacher/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    query: web::Query<QuestionListParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let questions = state
        .question_service
        .list_questions(params.grade_level, &params.topic)
        .await?;
    Ok(HttpResponse::Ok().json(questions))
}

#[post("/api/teacher/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    request: web::Json<CreateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .question_service
        .create_question(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}

#[post("/api/teacher/questions/generate")]
pub async fn generate_question(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .generation_service
        .generate_question(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}

#[delete("/api/teacher/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.question_service.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Question '{}' deleted",
        id
    ))))
}

#[get("/api/teacher/attempts")]
pub async fn list_attempts(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardParams>,
) -> Result<HttpResponse, AppError> {
    let entries = state
        .attempt_service
        .leaderboard(query.into_inner().grade_level)
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[post("/api/teacher/reset")]
pub async fn reset_all_data(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.reset_all_data().await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("All data reset")))
}
