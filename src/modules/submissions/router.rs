use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    grade_submission, list_for_assignment, my_grades, my_submissions, submit_assignment,
};
use crate::state::AppState;

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_assignment))
        .route("/me", get(my_submissions))
        .route("/grades", get(my_grades))
        .route("/assignment/{assignment_id}", get(list_for_assignment))
        .route("/{id}/grade", put(grade_submission))
}
