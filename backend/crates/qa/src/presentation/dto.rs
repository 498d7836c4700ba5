//! API DTOs (Data Transfer Objects)
//!
//! Timestamps are Unix milliseconds, like the auth API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{AnswerDetail, LinkInput, QuestionDetail, RewardInput};
use crate::domain::entities::{Link, QuestionSummary, Reward, Subscription};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinkRequest {
    pub name: String,
    pub url: String,
}

impl From<LinkRequest> for LinkInput {
    fn from(req: LinkRequest) -> Self {
        Self {
            name: req.name,
            url: req.url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewardRequest {
    pub title: String,
    pub image_url: String,
}

impl From<RewardRequest> for RewardInput {
    fn from(req: RewardRequest) -> Self {
        Self {
            title: req.title,
            image_url: req.image_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateQuestionRequest {
    pub title: String,
    pub body: String,
    pub links: Vec<LinkRequest>,
    pub reward: Option<RewardRequest>,
}

/// Absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateAnswerRequest {
    pub body: String,
    pub links: Vec<LinkRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateAnswerRequest {
    pub body: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub value: i64,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

impl From<&Link> for LinkResponse {
    fn from(link: &Link) -> Self {
        Self {
            id: link.link_id.into_uuid(),
            name: link.name.as_str().to_string(),
            url: link.url.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub recipient_id: Option<Uuid>,
}

impl From<&Reward> for RewardResponse {
    fn from(reward: &Reward) -> Self {
        Self {
            id: reward.reward_id.into_uuid(),
            question_id: reward.question_id.into_uuid(),
            title: reward.title.as_str().to_string(),
            image_url: reward.image_url.as_str().to_string(),
            recipient_id: reward.recipient_id.map(|id| id.into_uuid()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub question_id: Uuid,
}

impl From<&Subscription> for SubscriptionResponse {
    fn from(subscription: &Subscription) -> Self {
        Self {
            id: subscription.subscription_id.into_uuid(),
            question_id: subscription.question_id.into_uuid(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotesResponse {
    pub votes_sum: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub best: bool,
    pub votes_sum: i64,
    pub links: Vec<LinkResponse>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&AnswerDetail> for AnswerResponse {
    fn from(detail: &AnswerDetail) -> Self {
        let answer = &detail.answer;
        Self {
            id: answer.answer_id.into_uuid(),
            question_id: answer.question_id.into_uuid(),
            author_id: answer.author_id.into_uuid(),
            body: answer.body.as_str().to_string(),
            best: answer.best,
            votes_sum: detail.votes_sum,
            links: detail.links.iter().map(LinkResponse::from).collect(),
            created_at: answer.created_at.timestamp_millis(),
            updated_at: answer.updated_at.timestamp_millis(),
        }
    }
}

/// Entry of the question list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummaryResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub votes_sum: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&QuestionSummary> for QuestionSummaryResponse {
    fn from(summary: &QuestionSummary) -> Self {
        let question = &summary.question;
        Self {
            id: question.question_id.into_uuid(),
            author_id: question.author_id.into_uuid(),
            title: question.title.as_str().to_string(),
            body: question.body.as_str().to_string(),
            votes_sum: summary.votes_sum,
            created_at: question.created_at.timestamp_millis(),
            updated_at: question.updated_at.timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub votes_sum: i64,
    pub links: Vec<LinkResponse>,
    pub reward: Option<RewardResponse>,
    pub answers: Vec<AnswerResponse>,
    /// Present when the viewer is subscribed
    pub subscription: Option<SubscriptionResponse>,
    pub subscribers_count: usize,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&QuestionDetail> for QuestionResponse {
    fn from(detail: &QuestionDetail) -> Self {
        let question = &detail.question;
        Self {
            id: question.question_id.into_uuid(),
            author_id: question.author_id.into_uuid(),
            title: question.title.as_str().to_string(),
            body: question.body.as_str().to_string(),
            votes_sum: detail.votes_sum,
            links: detail.links.iter().map(LinkResponse::from).collect(),
            reward: detail.reward.as_ref().map(RewardResponse::from),
            answers: detail.answers.iter().map(AnswerResponse::from).collect(),
            subscription: detail.subscription.as_ref().map(SubscriptionResponse::from),
            subscribers_count: detail.subscribers_count,
            created_at: question.created_at.timestamp_millis(),
            updated_at: question.updated_at.timestamp_millis(),
        }
    }
}
