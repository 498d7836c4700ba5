//! Nested inputs and their validation
//!
//! Links and rewards arrive nested in question/answer requests. Entries whose
//! fields are all blank are dropped before validation.

use std::borrow::Cow;

use kernel::error::field::{FieldError, FieldErrors};
use kernel::id::QuestionId;

use crate::application::config::QaConfig;
use crate::domain::entities::{Link, Reward};
use crate::domain::value_objects::{LinkName, LinkUrl, ResourceRef, Title};

#[derive(Debug, Clone, Default)]
pub struct LinkInput {
    pub name: String,
    pub url: String,
}

impl LinkInput {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RewardInput {
    pub title: String,
    pub image_url: String,
}

impl RewardInput {
    fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.image_url.trim().is_empty()
    }
}

/// Record a failed validation under `field`
pub(crate) fn check<T>(
    errors: &mut FieldErrors,
    field: impl Into<Cow<'static, str>>,
    result: Result<T, String>,
) -> Option<T> {
    errors.capture(result.map_err(|message| FieldError::new(field, message)))
}

/// Links for `linkable`; errors are reported as `links[i].name` / `links[i].url`
pub(crate) fn build_links(
    inputs: Vec<LinkInput>,
    linkable: ResourceRef,
    config: &QaConfig,
    errors: &mut FieldErrors,
) -> Vec<Link> {
    let inputs: Vec<(usize, LinkInput)> = inputs
        .into_iter()
        .enumerate()
        .filter(|(_, link)| !link.is_blank())
        .collect();

    if inputs.len() > config.max_links {
        errors.push(
            "links",
            format!("is too long (maximum is {} links)", config.max_links),
        );
        return Vec::new();
    }

    let mut links = Vec::with_capacity(inputs.len());
    for (index, input) in inputs {
        let name = check(
            errors,
            format!("links[{index}].name"),
            LinkName::parse(input.name, config.link_name_max_len),
        );
        let url = check(errors, format!("links[{index}].url"), LinkUrl::parse(input.url));
        if let (Some(name), Some(url)) = (name, url) {
            links.push(Link::new(linkable, name, url));
        }
    }
    links
}

/// Reward for `question_id`; `None` for a missing or all-blank input
pub(crate) fn build_reward(
    input: Option<RewardInput>,
    question_id: QuestionId,
    config: &QaConfig,
    errors: &mut FieldErrors,
) -> Option<Reward> {
    let input = input.filter(|reward| !reward.is_blank())?;

    let mut reward_errors = FieldErrors::new();
    let title = check(
        &mut reward_errors,
        "title",
        Title::parse(input.title, config.title_max_len),
    );
    let image_url = check(&mut reward_errors, "imageUrl", LinkUrl::parse(input.image_url));
    errors.extend_prefixed("reward", reward_errors);

    Some(Reward::new(question_id, title?, image_url?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(name: &str, url: &str) -> LinkInput {
        LinkInput {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    fn fields(errors: &FieldErrors) -> Vec<String> {
        errors.iter().map(|e| e.field.to_string()).collect()
    }

    #[test]
    fn test_blank_links_are_ignored() {
        let mut errors = FieldErrors::new();
        let target = ResourceRef::Question(QuestionId::new());
        let links = build_links(
            vec![link("", " "), link("Gist", "https://gist.github.com/1")],
            target,
            &QaConfig::default(),
            &mut errors,
        );

        assert!(errors.is_empty());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].linkable, target);
    }

    #[test]
    fn test_link_errors_keep_request_index() {
        let mut errors = FieldErrors::new();
        let links = build_links(
            vec![link("", ""), link("Docs", "not a url"), link("", "https://a.io")],
            ResourceRef::Question(QuestionId::new()),
            &QaConfig::default(),
            &mut errors,
        );

        assert!(links.is_empty());
        assert_eq!(fields(&errors), ["links[1].url", "links[2].name"]);
    }

    #[test]
    fn test_too_many_links() {
        let config = QaConfig {
            max_links: 1,
            ..QaConfig::default()
        };
        let mut errors = FieldErrors::new();
        build_links(
            vec![link("a", "https://a.io"), link("b", "https://b.io")],
            ResourceRef::Question(QuestionId::new()),
            &config,
            &mut errors,
        );
        assert_eq!(fields(&errors), ["links"]);
    }

    #[test]
    fn test_reward() {
        let mut errors = FieldErrors::new();
        let question_id = QuestionId::new();
        let config = QaConfig::default();

        assert!(build_reward(None, question_id, &config, &mut errors).is_none());
        assert!(build_reward(Some(RewardInput::default()), question_id, &config, &mut errors).is_none());
        assert!(errors.is_empty());

        let reward = build_reward(
            Some(RewardInput {
                title: "Gold".to_string(),
                image_url: "https://example.com/gold.png".to_string(),
            }),
            question_id,
            &config,
            &mut errors,
        )
        .unwrap();
        assert_eq!(reward.question_id, question_id);

        let missing_image = build_reward(
            Some(RewardInput {
                title: "Gold".to_string(),
                image_url: String::new(),
            }),
            question_id,
            &config,
            &mut errors,
        );
        assert!(missing_image.is_none());
        assert_eq!(fields(&errors), ["reward.imageUrl"]);
    }
}
