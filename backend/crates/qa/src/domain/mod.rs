//! Domain Layer
//!
//! Entities, value objects and repository traits.

pub mod entities;
pub mod repository;
pub mod value_objects;

// Re-exports
pub use entities::*;
pub use repository::{
    AnswerRepository, LinkRepository, QaStore, QuestionRepository, RewardRepository,
    SubscriptionRepository, VoteRepository,
};
pub use value_objects::*;
