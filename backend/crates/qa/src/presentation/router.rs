//! Q&A Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::application::QaConfig;
use crate::domain::repository::QaStore;
use crate::presentation::handlers::{self, QaAppState};

/// Create the Q&A router
///
/// Mutations need `auth::CurrentUser`; layer the auth `authenticate`
/// middleware over this router.
pub fn qa_router<R>(repo: Arc<R>, config: Arc<QaConfig>) -> Router
where
    R: QaStore,
{
    let state = QaAppState { repo, config };

    Router::new()
        .route(
            "/questions",
            get(handlers::list_questions::<R>).post(handlers::create_question::<R>),
        )
        .route(
            "/questions/{id}",
            get(handlers::show_question::<R>)
                .patch(handlers::update_question::<R>)
                .delete(handlers::delete_question::<R>),
        )
        .route(
            "/questions/{id}/answers",
            post(handlers::create_answer::<R>),
        )
        .route(
            "/questions/{id}/votes",
            post(handlers::vote_question::<R>).delete(handlers::unvote_question::<R>),
        )
        .route(
            "/questions/{id}/subscriptions",
            post(handlers::subscribe::<R>),
        )
        .route(
            "/answers/{id}",
            patch(handlers::update_answer::<R>).delete(handlers::delete_answer::<R>),
        )
        .route("/answers/{id}/best", post(handlers::mark_best_answer::<R>))
        .route(
            "/answers/{id}/votes",
            post(handlers::vote_answer::<R>).delete(handlers::unvote_answer::<R>),
        )
        .route("/links/{id}", delete(handlers::delete_link::<R>))
        .route("/subscriptions/{id}", delete(handlers::unsubscribe::<R>))
        .route("/rewards", get(handlers::list_rewards::<R>))
        .with_state(state)
}
