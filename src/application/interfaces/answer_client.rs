use async_trait::async_trait;

use crate::domain::DomainError;

/// Answers one plain-text question with generated text.
///
/// Each call is independent: implementors keep no conversation history.
/// A successful response that carries no usable text is reported as
/// [`crate::domain::NO_ANSWER_FALLBACK`], not as an error.
#[async_trait]
pub trait AnswerClient: Send + Sync {
    async fn ask(&self, text: &str) -> Result<String, DomainError>;
}
