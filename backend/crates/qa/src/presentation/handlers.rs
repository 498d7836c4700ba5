//! HTTP Handlers

use std::sync::Arc;

use auth::CurrentUser;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::{AnswerId, LinkId, QuestionId, SubscriptionId};

use crate::application::{
    CastVoteUseCase, CreateAnswerInput, CreateAnswerUseCase, CreateQuestionInput,
    CreateQuestionUseCase, DeleteAnswerUseCase, DeleteLinkUseCase, DeleteQuestionUseCase,
    ListQuestionsUseCase, ListRewardsUseCase, MarkBestAnswerUseCase, QaConfig,
    RevokeVoteUseCase, ShowQuestionUseCase, SubscribeUseCase, UnsubscribeUseCase,
    UpdateAnswerUseCase, UpdateQuestionInput, UpdateQuestionUseCase,
};
use crate::domain::repository::QaStore;
use crate::domain::value_objects::ResourceRef;
use crate::error::QaResult;
use crate::presentation::dto::{
    AnswerResponse, CreateAnswerRequest, CreateQuestionRequest, QuestionResponse,
    QuestionSummaryResponse, RewardResponse, SubscriptionResponse, UpdateAnswerRequest,
    UpdateQuestionRequest, VoteRequest, VotesResponse,
};

/// Shared state for Q&A handlers
pub struct QaAppState<R>
where
    R: QaStore,
{
    pub repo: Arc<R>,
    pub config: Arc<QaConfig>,
}

impl<R> Clone for QaAppState<R>
where
    R: QaStore,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Questions
// ============================================================================

/// GET /api/questions
pub async fn list_questions<R: QaStore>(
    State(state): State<QaAppState<R>>,
) -> QaResult<Json<Vec<QuestionSummaryResponse>>> {
    let questions = ListQuestionsUseCase::new(state.repo.clone()).execute().await?;

    Ok(Json(
        questions
            .iter()
            .map(QuestionSummaryResponse::from)
            .collect(),
    ))
}

/// GET /api/questions/{id}
pub async fn show_question<R: QaStore>(
    State(state): State<QaAppState<R>>,
    viewer: Option<CurrentUser>,
    Path(question_id): Path<QuestionId>,
) -> QaResult<Json<QuestionResponse>> {
    let use_case = ShowQuestionUseCase::new(state.repo.clone());
    let detail = use_case
        .execute(&question_id, viewer.as_ref().map(|user| &user.user_id))
        .await?;

    Ok(Json(QuestionResponse::from(&detail)))
}

/// POST /api/questions
pub async fn create_question<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Json(req): Json<CreateQuestionRequest>,
) -> QaResult<impl IntoResponse> {
    let use_case = CreateQuestionUseCase::new(state.repo.clone(), state.config.clone());
    let input = CreateQuestionInput {
        title: req.title,
        body: req.body,
        links: req.links.into_iter().map(Into::into).collect(),
        reward: req.reward.map(Into::into),
    };

    let detail = use_case.execute(current_user.user_id, input).await?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from(&detail))))
}

/// PATCH /api/questions/{id}
pub async fn update_question<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(question_id): Path<QuestionId>,
    Json(req): Json<UpdateQuestionRequest>,
) -> QaResult<Json<QuestionResponse>> {
    let use_case = UpdateQuestionUseCase::new(state.repo.clone(), state.config.clone());
    let input = UpdateQuestionInput {
        title: req.title,
        body: req.body,
    };
    use_case
        .execute(&current_user.user_id, &question_id, input)
        .await?;

    let detail = ShowQuestionUseCase::new(state.repo.clone())
        .execute(&question_id, Some(&current_user.user_id))
        .await?;

    Ok(Json(QuestionResponse::from(&detail)))
}

/// DELETE /api/questions/{id}
pub async fn delete_question<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(question_id): Path<QuestionId>,
) -> QaResult<StatusCode> {
    DeleteQuestionUseCase::new(state.repo.clone())
        .execute(&current_user.user_id, &question_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Answers
// ============================================================================

/// POST /api/questions/{id}/answers
pub async fn create_answer<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(question_id): Path<QuestionId>,
    Json(req): Json<CreateAnswerRequest>,
) -> QaResult<impl IntoResponse> {
    let use_case = CreateAnswerUseCase::new(state.repo.clone(), state.config.clone());
    let input = CreateAnswerInput {
        body: req.body,
        links: req.links.into_iter().map(Into::into).collect(),
    };

    let detail = use_case
        .execute(current_user.user_id, question_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(AnswerResponse::from(&detail))))
}

/// PATCH /api/answers/{id}
pub async fn update_answer<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(answer_id): Path<AnswerId>,
    Json(req): Json<UpdateAnswerRequest>,
) -> QaResult<Json<AnswerResponse>> {
    let detail = UpdateAnswerUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&current_user.user_id, &answer_id, req.body)
        .await?;

    Ok(Json(AnswerResponse::from(&detail)))
}

/// DELETE /api/answers/{id}
pub async fn delete_answer<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(answer_id): Path<AnswerId>,
) -> QaResult<StatusCode> {
    DeleteAnswerUseCase::new(state.repo.clone())
        .execute(&current_user.user_id, &answer_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/answers/{id}/best
pub async fn mark_best_answer<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(answer_id): Path<AnswerId>,
) -> QaResult<Json<AnswerResponse>> {
    let detail = MarkBestAnswerUseCase::new(state.repo.clone())
        .execute(&current_user.user_id, &answer_id)
        .await?;

    Ok(Json(AnswerResponse::from(&detail)))
}

// ============================================================================
// Votes
// ============================================================================

/// POST /api/questions/{id}/votes
pub async fn vote_question<R: QaStore>(
    state: State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(question_id): Path<QuestionId>,
    req: Json<VoteRequest>,
) -> QaResult<impl IntoResponse> {
    cast_vote(state, current_user, question_id.into(), req).await
}

/// DELETE /api/questions/{id}/votes
pub async fn unvote_question<R: QaStore>(
    state: State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(question_id): Path<QuestionId>,
) -> QaResult<Json<VotesResponse>> {
    revoke_vote(state, current_user, question_id.into()).await
}

/// POST /api/answers/{id}/votes
pub async fn vote_answer<R: QaStore>(
    state: State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(answer_id): Path<AnswerId>,
    req: Json<VoteRequest>,
) -> QaResult<impl IntoResponse> {
    cast_vote(state, current_user, answer_id.into(), req).await
}

/// DELETE /api/answers/{id}/votes
pub async fn unvote_answer<R: QaStore>(
    state: State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(answer_id): Path<AnswerId>,
) -> QaResult<Json<VotesResponse>> {
    revoke_vote(state, current_user, answer_id.into()).await
}

async fn cast_vote<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    target: ResourceRef,
    Json(req): Json<VoteRequest>,
) -> QaResult<(StatusCode, Json<VotesResponse>)> {
    let votes_sum = CastVoteUseCase::new(state.repo.clone())
        .execute(current_user.user_id, target, req.value)
        .await?;

    Ok((StatusCode::CREATED, Json(VotesResponse { votes_sum })))
}

async fn revoke_vote<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    target: ResourceRef,
) -> QaResult<Json<VotesResponse>> {
    let votes_sum = RevokeVoteUseCase::new(state.repo.clone())
        .execute(&current_user.user_id, target)
        .await?;

    Ok(Json(VotesResponse { votes_sum }))
}

// ============================================================================
// Links
// ============================================================================

/// DELETE /api/links/{id}
pub async fn delete_link<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(link_id): Path<LinkId>,
) -> QaResult<StatusCode> {
    DeleteLinkUseCase::new(state.repo.clone())
        .execute(&current_user.user_id, &link_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Subscriptions
// ============================================================================

/// POST /api/questions/{id}/subscriptions
pub async fn subscribe<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(question_id): Path<QuestionId>,
) -> QaResult<impl IntoResponse> {
    let subscription = SubscribeUseCase::new(state.repo.clone())
        .execute(current_user.user_id, question_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::from(&subscription)),
    ))
}

/// DELETE /api/subscriptions/{id}
pub async fn unsubscribe<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
    Path(subscription_id): Path<SubscriptionId>,
) -> QaResult<StatusCode> {
    UnsubscribeUseCase::new(state.repo.clone())
        .execute(&current_user.user_id, &subscription_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Rewards
// ============================================================================

/// GET /api/rewards
pub async fn list_rewards<R: QaStore>(
    State(state): State<QaAppState<R>>,
    current_user: CurrentUser,
) -> QaResult<Json<Vec<RewardResponse>>> {
    let rewards = ListRewardsUseCase::new(state.repo.clone())
        .execute(&current_user.user_id)
        .await?;

    Ok(Json(rewards.iter().map(RewardResponse::from).collect()))
}
