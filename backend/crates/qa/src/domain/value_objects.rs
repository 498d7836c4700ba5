//! Domain Value Objects
//!
//! Validated text and URL types, vote values, and the tagged union used for
//! resources that can receive votes and links.
//!
//! Validation returns the bare reason (`"can't be blank"`); the caller knows
//! which request field it belongs to.

use std::fmt;
use std::str::FromStr;

use kernel::id::{AnswerId, QuestionId};
use url::Url;
use uuid::Uuid;

// ============================================================================
// Votable / Linkable
// ============================================================================

/// Kind discriminator stored next to polymorphic rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Question,
    Answer,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Question => "question",
            ResourceKind::Answer => "answer",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(ResourceKind::Question),
            "answer" => Ok(ResourceKind::Answer),
            other => Err(format!("unknown resource kind: {other}")),
        }
    }
}

/// A question or an answer, as the target of a vote or a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Question(QuestionId),
    Answer(AnswerId),
}

impl ResourceRef {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Question(_) => ResourceKind::Question,
            ResourceRef::Answer(_) => ResourceKind::Answer,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ResourceRef::Question(id) => *id.as_uuid(),
            ResourceRef::Answer(id) => *id.as_uuid(),
        }
    }

    /// Rebuild from a stored (kind, id) pair
    pub fn from_parts(kind: &str, id: Uuid) -> Result<Self, String> {
        Ok(match kind.parse::<ResourceKind>()? {
            ResourceKind::Question => ResourceRef::Question(QuestionId::from_uuid(id)),
            ResourceKind::Answer => ResourceRef::Answer(AnswerId::from_uuid(id)),
        })
    }
}

impl From<QuestionId> for ResourceRef {
    fn from(id: QuestionId) -> Self {
        ResourceRef::Question(id)
    }
}

impl From<AnswerId> for ResourceRef {
    fn from(id: AnswerId) -> Self {
        ResourceRef::Answer(id)
    }
}

// ============================================================================
// Text
// ============================================================================

fn bounded_text(raw: String, max_len: usize) -> Result<String, String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err("can't be blank".to_string());
    }
    if text.chars().count() > max_len {
        return Err(format!("is too long (maximum is {max_len} characters)"));
    }
    Ok(text.to_string())
}

/// Question or reward title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn parse(raw: impl Into<String>, max_len: usize) -> Result<Self, String> {
        bounded_text(raw.into(), max_len).map(Self)
    }

    pub fn from_db(title: String) -> Self {
        Self(title)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Question or answer body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body(String);

impl Body {
    pub fn parse(raw: impl Into<String>, max_len: usize) -> Result<Self, String> {
        bounded_text(raw.into(), max_len).map(Self)
    }

    pub fn from_db(body: String) -> Self {
        Self(body)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkName(String);

impl LinkName {
    pub fn parse(raw: impl Into<String>, max_len: usize) -> Result<Self, String> {
        bounded_text(raw.into(), max_len).map(Self)
    }

    pub fn from_db(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute http(s) URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkUrl(String);

impl LinkUrl {
    pub fn parse(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("can't be blank".to_string());
        }

        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                Ok(Self(url.to_string()))
            }
            _ => Err("is not a valid URL".to_string()),
        }
    }

    pub fn from_db(url: String) -> Self {
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Votes
// ============================================================================

/// +1 or -1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteValue(i16);

impl VoteValue {
    pub const UP: VoteValue = VoteValue(1);
    pub const DOWN: VoteValue = VoteValue(-1);

    pub fn parse(value: i64) -> Result<Self, String> {
        match value {
            1 => Ok(Self::UP),
            -1 => Ok(Self::DOWN),
            _ => Err("must be 1 or -1".to_string()),
        }
    }

    pub fn value(&self) -> i16 {
        self.0
    }
}
