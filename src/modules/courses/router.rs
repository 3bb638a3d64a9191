use axum::{
    Router,
    routing::{delete, get, post},
};

use super::controller::{
    add_student, create_course, enroll, get_course, list_courses, remove_student, update_course,
};
use crate::state::AppState;

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/{id}", get(get_course).put(update_course))
        .route("/{id}/enroll", post(enroll))
        .route("/{id}/students", post(add_student))
        .route("/{id}/students/{student_id}", delete(remove_student))
}
