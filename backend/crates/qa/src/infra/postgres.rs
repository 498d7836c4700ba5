//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{AnswerId, LinkId, QuestionId, RewardId, SubscriptionId, UserId, VoteId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{
    Answer, Link, NewQuestion, Question, QuestionSummary, Reward, Subscription, Vote,
};
use crate::domain::repository::{
    AnswerRepository, LinkRepository, QuestionRepository, RewardRepository,
    SubscriptionRepository, VoteRepository,
};
use crate::domain::value_objects::{
    Body, LinkName, LinkUrl, ResourceRef, Title, VoteValue,
};
use crate::error::{QaError, QaResult};

/// PostgreSQL-backed Q&A repository
#[derive(Clone)]
pub struct PgQaRepository {
    pool: PgPool,
}

impl PgQaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Question Repository Implementation
// ============================================================================

impl QuestionRepository for PgQaRepository {
    async fn create(&self, new_question: &NewQuestion) -> QaResult<()> {
        let mut tx = self.pool.begin().await?;
        let question = &new_question.question;

        sqlx::query(
            r#"
            INSERT INTO questions (question_id, author_id, title, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(question.question_id.as_uuid())
        .bind(question.author_id.as_uuid())
        .bind(question.title.as_str())
        .bind(question.body.as_str())
        .bind(question.created_at)
        .bind(question.updated_at)
        .execute(&mut *tx)
        .await?;

        for link in &new_question.links {
            insert_link(&mut *tx, link).await?;
        }

        if let Some(reward) = &new_question.reward {
            sqlx::query(
                r#"
                INSERT INTO rewards (reward_id, question_id, title, image_url, recipient_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(reward.reward_id.as_uuid())
            .bind(reward.question_id.as_uuid())
            .bind(reward.title.as_str())
            .bind(reward.image_url.as_str())
            .bind(reward.recipient_id.map(UserId::into_uuid))
            .bind(reward.created_at)
            .bind(reward.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        insert_subscription(&mut *tx, &new_question.author_subscription).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, question_id: &QuestionId) -> QaResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT question_id, author_id, title, body, created_at, updated_at
            FROM questions
            WHERE question_id = $1
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(QuestionRow::into_question))
    }

    async fn list(&self) -> QaResult<Vec<QuestionSummary>> {
        let rows = sqlx::query_as::<_, QuestionSummaryRow>(
            r#"
            SELECT
                q.question_id,
                q.author_id,
                q.title,
                q.body,
                q.created_at,
                q.updated_at,
                COALESCE(SUM(v.value), 0)::BIGINT AS votes_sum
            FROM questions q
            LEFT JOIN votes v
                ON v.votable_kind = 'question' AND v.votable_id = q.question_id
            GROUP BY q.question_id
            ORDER BY q.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| QuestionSummary {
                votes_sum: row.votes_sum,
                question: row.question.into_question(),
            })
            .collect())
    }

    async fn update(&self, question: &Question) -> QaResult<()> {
        sqlx::query(
            r#"
            UPDATE questions SET
                title = $2,
                body = $3,
                updated_at = $4
            WHERE question_id = $1
            "#,
        )
        .bind(question.question_id.as_uuid())
        .bind(question.title.as_str())
        .bind(question.body.as_str())
        .bind(question.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, question_id: &QuestionId) -> QaResult<()> {
        let mut tx = self.pool.begin().await?;

        // Polymorphic rows have no foreign key; answers, reward and
        // subscriptions go with the question row.
        sqlx::query(
            r#"
            DELETE FROM votes
            WHERE (votable_kind = 'question' AND votable_id = $1)
               OR (votable_kind = 'answer' AND votable_id IN (
                    SELECT answer_id FROM answers WHERE question_id = $1
               ))
            "#,
        )
        .bind(question_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM links
            WHERE (linkable_kind = 'question' AND linkable_id = $1)
               OR (linkable_kind = 'answer' AND linkable_id IN (
                    SELECT answer_id FROM answers WHERE question_id = $1
               ))
            "#,
        )
        .bind(question_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM questions WHERE question_id = $1")
            .bind(question_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Answer Repository Implementation
// ============================================================================

impl AnswerRepository for PgQaRepository {
    async fn create(&self, answer: &Answer, links: &[Link]) -> QaResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO answers (answer_id, question_id, author_id, body, best, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(answer.answer_id.as_uuid())
        .bind(answer.question_id.as_uuid())
        .bind(answer.author_id.as_uuid())
        .bind(answer.body.as_str())
        .bind(answer.best)
        .bind(answer.created_at)
        .bind(answer.updated_at)
        .execute(&mut *tx)
        .await?;

        for link in links {
            insert_link(&mut *tx, link).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, answer_id: &AnswerId) -> QaResult<Option<Answer>> {
        let row = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT answer_id, question_id, author_id, body, best, created_at, updated_at
            FROM answers
            WHERE answer_id = $1
            "#,
        )
        .bind(answer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AnswerRow::into_answer))
    }

    async fn list_by_question(&self, question_id: &QuestionId) -> QaResult<Vec<Answer>> {
        let rows = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT answer_id, question_id, author_id, body, best, created_at, updated_at
            FROM answers
            WHERE question_id = $1
            ORDER BY best DESC, created_at
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AnswerRow::into_answer).collect())
    }

    async fn update(&self, answer: &Answer) -> QaResult<()> {
        sqlx::query("UPDATE answers SET body = $2, updated_at = $3 WHERE answer_id = $1")
            .bind(answer.answer_id.as_uuid())
            .bind(answer.body.as_str())
            .bind(answer.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, answer_id: &AnswerId) -> QaResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM votes WHERE votable_kind = 'answer' AND votable_id = $1")
            .bind(answer_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM links WHERE linkable_kind = 'answer' AND linkable_id = $1")
            .bind(answer_id.as_uuid())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM answers WHERE answer_id = $1")
            .bind(answer_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn mark_best(&self, answer: &Answer, reward: Option<&Reward>) -> QaResult<()> {
        let mut tx = self.pool.begin().await?;

        // Clear first: the partial unique index allows one best per question
        sqlx::query(
            r#"
            UPDATE answers SET best = FALSE, updated_at = $3
            WHERE question_id = $1 AND best AND answer_id <> $2
            "#,
        )
        .bind(answer.question_id.as_uuid())
        .bind(answer.answer_id.as_uuid())
        .bind(answer.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE answers SET best = $2, updated_at = $3 WHERE answer_id = $1")
            .bind(answer.answer_id.as_uuid())
            .bind(answer.best)
            .bind(answer.updated_at)
            .execute(&mut *tx)
            .await?;

        if let Some(reward) = reward {
            sqlx::query(
                "UPDATE rewards SET recipient_id = $2, updated_at = $3 WHERE reward_id = $1",
            )
            .bind(reward.reward_id.as_uuid())
            .bind(reward.recipient_id.map(UserId::into_uuid))
            .bind(reward.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Link Repository Implementation
// ============================================================================

async fn insert_link<'e, E>(executor: E, link: &Link) -> QaResult<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO links (link_id, linkable_kind, linkable_id, name, url, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(link.link_id.as_uuid())
    .bind(link.linkable.kind().as_str())
    .bind(link.linkable.id())
    .bind(link.name.as_str())
    .bind(link.url.as_str())
    .bind(link.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

impl LinkRepository for PgQaRepository {
    async fn list_for(&self, linkable: &ResourceRef) -> QaResult<Vec<Link>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT link_id, linkable_kind, linkable_id, name, url, created_at
            FROM links
            WHERE linkable_kind = $1 AND linkable_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(linkable.kind().as_str())
        .bind(linkable.id())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LinkRow::into_link).collect()
    }

    async fn find_by_id(&self, link_id: &LinkId) -> QaResult<Option<Link>> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT link_id, linkable_kind, linkable_id, name, url, created_at
            FROM links
            WHERE link_id = $1
            "#,
        )
        .bind(link_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(LinkRow::into_link).transpose()
    }

    async fn delete(&self, link_id: &LinkId) -> QaResult<()> {
        sqlx::query("DELETE FROM links WHERE link_id = $1")
            .bind(link_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Vote Repository Implementation
// ============================================================================

impl VoteRepository for PgQaRepository {
    async fn find_by_user(
        &self,
        votable: &ResourceRef,
        user_id: &UserId,
    ) -> QaResult<Option<Vote>> {
        let row = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT vote_id, votable_kind, votable_id, user_id, value, created_at
            FROM votes
            WHERE votable_kind = $1 AND votable_id = $2 AND user_id = $3
            "#,
        )
        .bind(votable.kind().as_str())
        .bind(votable.id())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(VoteRow::into_vote).transpose()
    }

    async fn create(&self, vote: &Vote) -> QaResult<()> {
        sqlx::query(
            r#"
            INSERT INTO votes (vote_id, votable_kind, votable_id, user_id, value, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(vote.vote_id.as_uuid())
        .bind(vote.votable.kind().as_str())
        .bind(vote.votable.id())
        .bind(vote.user_id.as_uuid())
        .bind(vote.value.value())
        .bind(vote.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, vote_id: &VoteId) -> QaResult<()> {
        sqlx::query("DELETE FROM votes WHERE vote_id = $1")
            .bind(vote_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn sum_for(&self, votable: &ResourceRef) -> QaResult<i64> {
        let sum = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(value), 0)::BIGINT
            FROM votes
            WHERE votable_kind = $1 AND votable_id = $2
            "#,
        )
        .bind(votable.kind().as_str())
        .bind(votable.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }
}

// ============================================================================
// Reward Repository Implementation
// ============================================================================

impl RewardRepository for PgQaRepository {
    async fn find_by_question(&self, question_id: &QuestionId) -> QaResult<Option<Reward>> {
        let row = sqlx::query_as::<_, RewardRow>(
            r#"
            SELECT reward_id, question_id, title, image_url, recipient_id, created_at, updated_at
            FROM rewards
            WHERE question_id = $1
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RewardRow::into_reward))
    }

    async fn list_by_recipient(&self, user_id: &UserId) -> QaResult<Vec<Reward>> {
        let rows = sqlx::query_as::<_, RewardRow>(
            r#"
            SELECT reward_id, question_id, title, image_url, recipient_id, created_at, updated_at
            FROM rewards
            WHERE recipient_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RewardRow::into_reward).collect())
    }
}

// ============================================================================
// Subscription Repository Implementation
// ============================================================================

async fn insert_subscription<'e, E>(executor: E, subscription: &Subscription) -> QaResult<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO subscriptions (subscription_id, user_id, question_id, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(subscription.subscription_id.as_uuid())
    .bind(subscription.user_id.as_uuid())
    .bind(subscription.question_id.as_uuid())
    .bind(subscription.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

impl SubscriptionRepository for PgQaRepository {
    async fn create(&self, subscription: &Subscription) -> QaResult<()> {
        insert_subscription(&self.pool, subscription).await
    }

    async fn find_by_id(
        &self,
        subscription_id: &SubscriptionId,
    ) -> QaResult<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT subscription_id, user_id, question_id, created_at
            FROM subscriptions
            WHERE subscription_id = $1
            "#,
        )
        .bind(subscription_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SubscriptionRow::into_subscription))
    }

    async fn find_by_user_and_question(
        &self,
        user_id: &UserId,
        question_id: &QuestionId,
    ) -> QaResult<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT subscription_id, user_id, question_id, created_at
            FROM subscriptions
            WHERE user_id = $1 AND question_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(question_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SubscriptionRow::into_subscription))
    }

    async fn delete(&self, subscription_id: &SubscriptionId) -> QaResult<()> {
        sqlx::query("DELETE FROM subscriptions WHERE subscription_id = $1")
            .bind(subscription_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_by_question(&self, question_id: &QuestionId) -> QaResult<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT subscription_id, user_id, question_id, created_at
            FROM subscriptions
            WHERE question_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(SubscriptionRow::into_subscription)
            .collect())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn resource_ref(kind: &str, id: Uuid) -> QaResult<ResourceRef> {
    ResourceRef::from_parts(kind, id).map_err(QaError::Internal)
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    question_id: Uuid,
    author_id: Uuid,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuestionRow {
    fn into_question(self) -> Question {
        Question {
            question_id: QuestionId::from_uuid(self.question_id),
            author_id: UserId::from_uuid(self.author_id),
            title: Title::from_db(self.title),
            body: Body::from_db(self.body),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuestionSummaryRow {
    #[sqlx(flatten)]
    question: QuestionRow,
    votes_sum: i64,
}

#[derive(sqlx::FromRow)]
struct AnswerRow {
    answer_id: Uuid,
    question_id: Uuid,
    author_id: Uuid,
    body: String,
    best: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AnswerRow {
    fn into_answer(self) -> Answer {
        Answer {
            answer_id: AnswerId::from_uuid(self.answer_id),
            question_id: QuestionId::from_uuid(self.question_id),
            author_id: UserId::from_uuid(self.author_id),
            body: Body::from_db(self.body),
            best: self.best,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    link_id: Uuid,
    linkable_kind: String,
    linkable_id: Uuid,
    name: String,
    url: String,
    created_at: DateTime<Utc>,
}

impl LinkRow {
    fn into_link(self) -> QaResult<Link> {
        Ok(Link {
            link_id: LinkId::from_uuid(self.link_id),
            linkable: resource_ref(&self.linkable_kind, self.linkable_id)?,
            name: LinkName::from_db(self.name),
            url: LinkUrl::from_db(self.url),
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    vote_id: Uuid,
    votable_kind: String,
    votable_id: Uuid,
    user_id: Uuid,
    value: i16,
    created_at: DateTime<Utc>,
}

impl VoteRow {
    fn into_vote(self) -> QaResult<Vote> {
        Ok(Vote {
            vote_id: VoteId::from_uuid(self.vote_id),
            votable: resource_ref(&self.votable_kind, self.votable_id)?,
            user_id: UserId::from_uuid(self.user_id),
            value: VoteValue::parse(i64::from(self.value)).map_err(QaError::Internal)?,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RewardRow {
    reward_id: Uuid,
    question_id: Uuid,
    title: String,
    image_url: String,
    recipient_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RewardRow {
    fn into_reward(self) -> Reward {
        Reward {
            reward_id: RewardId::from_uuid(self.reward_id),
            question_id: QuestionId::from_uuid(self.question_id),
            title: Title::from_db(self.title),
            image_url: LinkUrl::from_db(self.image_url),
            recipient_id: self.recipient_id.map(UserId::from_uuid),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    subscription_id: Uuid,
    user_id: Uuid,
    question_id: Uuid,
    created_at: DateTime<Utc>,
}

impl SubscriptionRow {
    fn into_subscription(self) -> Subscription {
        Subscription {
            subscription_id: SubscriptionId::from_uuid(self.subscription_id),
            user_id: UserId::from_uuid(self.user_id),
            question_id: QuestionId::from_uuid(self.question_id),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ResourceKind;

    #[test]
    fn test_stored_kind_must_be_known() {
        let err = resource_ref("comment", Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, QaError::Internal(_)));
        assert_eq!(
            resource_ref(ResourceKind::Answer.as_str(), Uuid::nil())
                .unwrap()
                .kind(),
            ResourceKind::Answer
        );
    }
}
