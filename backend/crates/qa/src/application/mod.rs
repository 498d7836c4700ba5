//! Application Layer
//!
//! One use case per file. Each holds the repositories it needs and exposes
//! `execute`.

pub mod config;
pub mod input;

mod ownership;

pub mod cast_vote;
pub mod create_answer;
pub mod create_question;
pub mod delete_answer;
pub mod delete_link;
pub mod delete_question;
pub mod list_questions;
pub mod list_rewards;
pub mod mark_best_answer;
pub mod revoke_vote;
pub mod show_question;
pub mod subscribe;
pub mod unsubscribe;
pub mod update_answer;
pub mod update_question;

pub use cast_vote::CastVoteUseCase;
pub use config::QaConfig;
pub use create_answer::{CreateAnswerInput, CreateAnswerUseCase};
pub use create_question::{CreateQuestionInput, CreateQuestionUseCase};
pub use delete_answer::DeleteAnswerUseCase;
pub use delete_link::DeleteLinkUseCase;
pub use delete_question::DeleteQuestionUseCase;
pub use input::{LinkInput, RewardInput};
pub use list_questions::ListQuestionsUseCase;
pub use list_rewards::ListRewardsUseCase;
pub use mark_best_answer::MarkBestAnswerUseCase;
pub use revoke_vote::RevokeVoteUseCase;
pub use show_question::{AnswerDetail, QuestionDetail, ShowQuestionUseCase};
pub use subscribe::SubscribeUseCase;
pub use unsubscribe::UnsubscribeUseCase;
pub use update_answer::UpdateAnswerUseCase;
pub use update_question::{UpdateQuestionInput, UpdateQuestionUseCase};
