//! Application Configuration
//!
//! Field limits for the Q&A application layer.

#[derive(Debug, Clone)]
pub struct QaConfig {
    /// Question and reward titles
    pub title_max_len: usize,
    /// Question and answer bodies
    pub body_max_len: usize,
    pub link_name_max_len: usize,
    /// Links attached to one question or answer in a single request
    pub max_links: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            title_max_len: 255,
            body_max_len: 10_000,
            link_name_max_len: 255,
            max_links: 10,
        }
    }
}
