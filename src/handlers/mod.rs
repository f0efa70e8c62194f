use actix_web::web;

pub mod health_handler;
pub mod student_handler;
pub mod teacher_handler;

pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use student_handler::{exit_session, get_session, list_topics, start_session, submit_answer};
pub use teacher_handler::{
    create_question, delete_question, generate_question, list_attempts, list_questions,
    reset_all_data,
};

/// Registers every route on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(list_topics)
        .service(start_session)
        .service(get_session)
        .service(submit_answer)
        .service(exit_session)
        .service(list_questions)
        .service(create_question)
        .service(generate_question)
        .service(delete_question)
        .service(list_attempts)
        .service(reset_all_data);
}
