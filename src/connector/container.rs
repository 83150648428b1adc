use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::{AnswerClient, ChatSession};
use crate::connector::{AppConfig, GeminiClient, MockAnswerClient};
use crate::domain::DomainError;

/// Simulated latency of the mock client, so the pending state is visible.
const MOCK_DELAY: Duration = Duration::from_millis(600);

/// Wires the configured [`AnswerClient`] into new sessions.
pub struct Container {
    answer_client: Arc<dyn AnswerClient>,
    config: AppConfig,
}

impl Container {
    pub fn new(config: AppConfig) -> Result<Self, DomainError> {
        let answer_client: Arc<dyn AnswerClient> = match (&config.gemini, config.mock) {
            (_, true) => {
                debug!("Using mock answer client");
                Arc::new(MockAnswerClient::new().with_delay(MOCK_DELAY))
            }
            (Some(gemini), false) => {
                debug!(
                    "Using Gemini answer client at {} (key via {})",
                    gemini.endpoint,
                    gemini.key_placement.as_str()
                );
                Arc::new(GeminiClient::new(gemini.clone()))
            }
            (None, false) => {
                return Err(DomainError::config("no answer client configured"));
            }
        };

        Ok(Self {
            answer_client,
            config,
        })
    }

    pub fn answer_client(&self) -> Arc<dyn AnswerClient> {
        Arc::clone(&self.answer_client)
    }

    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(self.answer_client())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
