// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{exam, exercise, module, quiz, section},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (exercises, quizzes, exams, sections, modules).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let exercise_routes = Router::new()
        .route(
            "/",
            get(exercise::list_exercises).post(exercise::create_exercise),
        )
        .route(
            "/{id}",
            get(exercise::get_exercise).delete(exercise::delete_exercise),
        )
        .route("/quiz/{quizId}", get(exercise::quiz_exercises))
        .route("/exam/{examId}", get(exercise::exam_exercises));

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::add_quiz))
        .route("/available", get(quiz::available_quizzes))
        .route("/{id}", get(quiz::get_quiz).delete(quiz::delete_quiz))
        .route("/section/{sectionId}", get(quiz::quizzes_by_section))
        .route("/{id}/exercises", post(quiz::attach_exercises))
        .route(
            "/{id}/exercises/{exerciseId}",
            axum::routing::delete(quiz::detach_exercise),
        )
        .route("/submit", post(quiz::submit_quiz))
        .route("/{id}/result", get(quiz::quiz_result));

    let exam_routes = Router::new()
        .route("/", post(exam::add_exam))
        .route("/{id}", get(exam::get_exam).delete(exam::delete_exam))
        .route("/section/{sectionId}", get(exam::exam_by_section))
        .route("/{id}/exercises", post(exam::attach_exercises));

    let section_routes = Router::new()
        .route("/", get(section::list_sections).post(section::add_section))
        .route(
            "/{id}",
            get(section::get_section)
                .put(section::update_section)
                .delete(section::delete_section),
        )
        .route("/roadmap/{roadmapId}", get(section::sections_by_roadmap));

    let module_routes = Router::new()
        .route("/", get(module::list_modules))
        .route("/{id}", get(module::get_module))
        .route("/open", post(module::open_module))
        .route("/open-status", get(module::open_status));

    Router::new()
        .nest("/api/exercises", exercise_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/exams", exam_routes)
        .nest("/api/sections", section_routes)
        .nest("/api/modules", module_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
