//! Domain Entities

use chrono::{DateTime, Utc};
use kernel::id::{AnswerId, LinkId, QuestionId, RewardId, SubscriptionId, UserId, VoteId};

use crate::domain::value_objects::{Body, LinkName, LinkUrl, ResourceRef, Title, VoteValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub question_id: QuestionId,
    pub author_id: UserId,
    pub title: Title,
    pub body: Body,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(author_id: UserId, title: Title, body: Body) -> Self {
        let now = Utc::now();
        Self {
            question_id: QuestionId::new(),
            author_id,
            title,
            body,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        self.author_id == *user_id
    }

    /// Partial update; `None` keeps the current value
    pub fn edit(&mut self, title: Option<Title>, body: Option<Body>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(body) = body {
            self.body = body;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub answer_id: AnswerId,
    pub question_id: QuestionId,
    pub author_id: UserId,
    pub body: Body,
    /// At most one answer per question is the best one
    pub best: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(question_id: QuestionId, author_id: UserId, body: Body) -> Self {
        let now = Utc::now();
        Self {
            answer_id: AnswerId::new(),
            question_id,
            author_id,
            body,
            best: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        self.author_id == *user_id
    }

    pub fn edit(&mut self, body: Body) {
        self.body = body;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub link_id: LinkId,
    pub linkable: ResourceRef,
    pub name: LinkName,
    pub url: LinkUrl,
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn new(linkable: ResourceRef, name: LinkName, url: LinkUrl) -> Self {
        Self {
            link_id: LinkId::new(),
            linkable,
            name,
            url,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub vote_id: VoteId,
    pub votable: ResourceRef,
    pub user_id: UserId,
    pub value: VoteValue,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(votable: ResourceRef, user_id: UserId, value: VoteValue) -> Self {
        Self {
            vote_id: VoteId::new(),
            votable,
            user_id,
            value,
            created_at: Utc::now(),
        }
    }
}

/// Bounty offered by a question's author, earned by the best answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub reward_id: RewardId,
    pub question_id: QuestionId,
    pub title: Title,
    pub image_url: LinkUrl,
    pub recipient_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    pub fn new(question_id: QuestionId, title: Title, image_url: LinkUrl) -> Self {
        let now = Utc::now();
        Self {
            reward_id: RewardId::new(),
            question_id,
            title,
            image_url,
            recipient_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Give the reward to `user_id`, replacing any earlier recipient
    pub fn award_to(&mut self, user_id: UserId) {
        self.recipient_id = Some(user_id);
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub subscription_id: SubscriptionId,
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(user_id: UserId, question_id: QuestionId) -> Self {
        Self {
            subscription_id: SubscriptionId::new(),
            user_id,
            question_id,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Aggregates written or read together
// ============================================================================

/// A question with everything created alongside it
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: Question,
    pub links: Vec<Link>,
    pub reward: Option<Reward>,
    /// Authors follow their own questions
    pub author_subscription: Subscription,
}

/// Question row for listings
#[derive(Debug, Clone)]
pub struct QuestionSummary {
    pub question: Question,
    pub votes_sum: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(author_id: UserId) -> Question {
        Question::new(
            author_id,
            Title::parse("Title", 255).unwrap(),
            Body::parse("Body", 255).unwrap(),
        )
    }

    #[test]
    fn test_question_authorship() {
        let author = UserId::new();
        let q = question(author);
        assert!(q.is_authored_by(&author));
        assert!(!q.is_authored_by(&UserId::new()));
    }

    #[test]
    fn test_question_partial_edit() {
        let mut q = question(UserId::new());
        q.edit(None, Some(Body::parse("New body", 255).unwrap()));
        assert_eq!(q.title.as_str(), "Title");
        assert_eq!(q.body.as_str(), "New body");
        assert!(q.updated_at >= q.created_at);
    }

    #[test]
    fn test_new_answer_is_not_best() {
        let answer = Answer::new(QuestionId::new(), UserId::new(), Body::parse("A", 10).unwrap());
        assert!(!answer.best);
    }

    #[test]
    fn test_reward_award_to() {
        let mut reward = Reward::new(
            QuestionId::new(),
            Title::parse("Gold", 255).unwrap(),
            LinkUrl::parse("https://example.com/gold.png").unwrap(),
        );
        assert_eq!(reward.recipient_id, None);

        let first = UserId::new();
        let second = UserId::new();
        reward.award_to(first);
        reward.award_to(second);
        assert_eq!(reward.recipient_id, Some(second));
    }
}
