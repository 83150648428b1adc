use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::AnswerClient;
use crate::domain::DomainError;

const DEFAULT_ANSWER: &str = "This is a **mock** answer.\n\n- no network was used\n- run without `--mock` to talk to Gemini";

/// Scripted [`AnswerClient`] for tests and offline runs.
///
/// Outcomes queued with [`with_answer`](Self::with_answer) and
/// [`with_error`](Self::with_error) are returned in order; once the queue is
/// drained every call returns the default answer.
pub struct MockAnswerClient {
    script: Mutex<VecDeque<Result<String, DomainError>>>,
    questions: Mutex<Vec<String>>,
    default_answer: String,
    delay: Option<Duration>,
}

impl MockAnswerClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            questions: Mutex::new(Vec::new()),
            default_answer: DEFAULT_ANSWER.to_string(),
            delay: None,
        }
    }

    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(answer.into()));
        self
    }

    pub fn with_error(self, error: DomainError) -> Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    pub fn with_default_answer(mut self, answer: impl Into<String>) -> Self {
        self.default_answer = answer.into();
        self
    }

    /// Sleep before answering, so the pending state is observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.questions).len()
    }

    pub fn questions(&self) -> Vec<String> {
        lock(&self.questions).clone()
    }
}

impl Default for MockAnswerClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AnswerClient for MockAnswerClient {
    async fn ask(&self, text: &str) -> Result<String, DomainError> {
        lock(&self.questions).push(text.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = lock(&self.script).pop_front();
        debug!("MockAnswerClient answering question of {} chars", text.len());
        next.unwrap_or_else(|| Ok(self.default_answer.clone()))
    }
}
