use std::sync::Arc;

use tracing::{debug, error};

use crate::application::AnswerClient;
use crate::domain::{DomainError, Message, SessionState, TurnId};

/// A submitted question whose answer has not been fetched yet.
///
/// Returned by [`ChatSession::submit`]. Awaiting [`PendingAnswer::resolve`]
/// performs the network call; it does not touch the session, so it can run
/// on another task while the owner keeps rendering.
pub struct PendingAnswer {
    client: Arc<dyn AnswerClient>,
    turn: TurnId,
    question: String,
}

impl PendingAnswer {
    pub fn turn(&self) -> &TurnId {
        &self.turn
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub async fn resolve(self) -> AnswerOutcome {
        debug!("Resolving turn {}", self.turn);
        let result = self.client.ask(&self.question).await;
        AnswerOutcome {
            turn: self.turn,
            result,
        }
    }
}

/// Result of one request, tagged with the turn it belongs to.
#[derive(Debug)]
pub struct AnswerOutcome {
    pub turn: TurnId,
    pub result: Result<String, DomainError>,
}

/// Owns a conversation and drives the request lifecycle for each turn.
pub struct ChatSession {
    client: Arc<dyn AnswerClient>,
    state: SessionState,
}

impl ChatSession {
    pub fn new(client: Arc<dyn AnswerClient>) -> Self {
        Self {
            client,
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    pub fn pending_input(&self) -> &str {
        self.state.pending_input()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state.is_awaiting_response()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.pending_input = text.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.state.pending_input.push(c);
    }

    pub fn push_newline(&mut self) {
        self.state.pending_input.push('\n');
    }

    pub fn backspace(&mut self) {
        self.state.pending_input.pop();
    }

    pub fn clear_error(&mut self) {
        self.state.last_error = None;
    }

    /// Start a turn for `text`.
    ///
    /// Returns `None` without touching state when `text` is blank or another
    /// turn is still in flight. Otherwise the user message is recorded, the
    /// input and previous error are cleared, and the session is marked as
    /// awaiting a response.
    pub fn submit(&mut self, text: &str) -> Option<PendingAnswer> {
        if text.trim().is_empty() {
            debug!("Ignoring blank submission");
            return None;
        }
        if self.state.is_awaiting_response {
            debug!("Ignoring submission while a response is pending");
            return None;
        }

        let message = Message::user(text);
        let turn = TurnId::new(message.id());
        self.state.messages.push(message);
        self.state.pending_input.clear();
        self.state.last_error = None;
        self.state.is_awaiting_response = true;
        self.state.in_flight = Some(turn.clone());

        debug!("Submitted turn {turn}");

        Some(PendingAnswer {
            client: Arc::clone(&self.client),
            turn,
            question: text.to_string(),
        })
    }

    /// Submit whatever is currently in the input buffer.
    pub fn submit_input(&mut self) -> Option<PendingAnswer> {
        let text = self.state.pending_input.clone();
        self.submit(&text)
    }

    /// Record the outcome of a turn.
    ///
    /// Returns `false` and leaves state untouched if `outcome` does not belong
    /// to the turn currently in flight.
    pub fn apply(&mut self, outcome: AnswerOutcome) -> bool {
        if self.state.in_flight.as_ref() != Some(&outcome.turn) {
            debug!("Discarding outcome for stale turn {}", outcome.turn);
            return false;
        }

        match outcome.result {
            Ok(answer) => {
                self.state.messages.push(Message::assistant(answer));
            }
            Err(e) => {
                error!("Turn {} failed: {e}", outcome.turn);
                self.state.last_error = Some(format!("Error: {e}"));
            }
        }

        self.state.is_awaiting_response = false;
        self.state.in_flight = None;
        true
    }

    /// Submit `text`, wait for the answer and apply it.
    ///
    /// Returns `false` if the submission was rejected.
    pub async fn ask(&mut self, text: &str) -> bool {
        let Some(pending) = self.submit(text) else {
            return false;
        };
        let outcome = pending.resolve().await;
        self.apply(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockAnswerClient;
    use crate::domain::{Role, NO_ANSWER_FALLBACK};

    fn session_with(client: MockAnswerClient) -> (ChatSession, Arc<MockAnswerClient>) {
        let client = Arc::new(client);
        (ChatSession::new(client.clone()), client)
    }

    #[test]
    fn submit_records_user_message_before_resolution() {
        let (mut session, client) = session_with(MockAnswerClient::new());
        session.set_input("question");

        let pending = session.submit("question").expect("should be accepted");

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role(), Role::User);
        assert_eq!(session.messages()[0].text(), "question");
        assert!(session.pending_input().is_empty());
        assert!(session.is_awaiting_response());
        assert_eq!(pending.question(), "question");
        assert_eq!(pending.turn().as_str(), session.messages()[0].id());
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn submit_clears_previous_error() {
        let (mut session, _) = session_with(MockAnswerClient::new());
        session.state.last_error = Some("Error: old".to_string());

        let _pending = session.submit("again");
        assert!(session.last_error().is_none());
    }

    #[test]
    fn second_submit_while_pending_is_noop() {
        let (mut session, _) = session_with(MockAnswerClient::new());
        let _first = session.submit("first").expect("accepted");
        session.set_input("draft");

        assert!(session.submit("second").is_none());
        assert!(session.submit_input().is_none());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.pending_input(), "draft");
        assert!(session.is_awaiting_response());
    }

    #[test]
    fn blank_submit_is_noop() {
        let (mut session, client) = session_with(MockAnswerClient::new());
        assert!(session.submit("").is_none());
        assert!(session.submit("   \n\t").is_none());
        assert!(session.messages().is_empty());
        assert!(!session.is_awaiting_response());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn outcome_for_other_turn_is_discarded() {
        let (mut session, _) = session_with(MockAnswerClient::new());
        let _pending = session.submit("question").expect("accepted");

        let applied = session.apply(AnswerOutcome {
            turn: TurnId::new("not-this-turn"),
            result: Ok("late".to_string()),
        });

        assert!(!applied);
        assert_eq!(session.messages().len(), 1);
        assert!(session.is_awaiting_response());
    }

    #[tokio::test]
    async fn empty_answer_becomes_fallback() {
        let (mut session, _) = session_with(MockAnswerClient::new().with_answer(""));
        assert!(session.ask("question").await);
        let last = session.messages().last().expect("assistant message");
        assert_eq!(last.text(), NO_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn failure_sets_error_and_releases_pending() {
        let client = MockAnswerClient::new().with_error(DomainError::parse("unexpected EOF"));
        let (mut session, _) = session_with(client);

        assert!(session.ask("question").await);
        assert_eq!(session.messages().len(), 1);
        assert!(!session.is_awaiting_response());
        assert!(session.state().in_flight().is_none());
        let err = session.last_error().expect("error set");
        assert!(err.starts_with("Error: "));
        assert!(err.contains("unexpected EOF"));
    }

    #[tokio::test]
    async fn submit_input_uses_buffer() {
        let (mut session, client) = session_with(MockAnswerClient::new().with_answer("ok"));
        session.push_char('h');
        session.push_char('i');
        session.push_newline();
        session.push_char('x');
        session.backspace();

        let pending = session.submit_input().expect("accepted");
        assert_eq!(pending.question(), "hi\n");
        let outcome = pending.resolve().await;
        assert!(session.apply(outcome));
        assert_eq!(client.questions(), vec!["hi\n".to_string()]);
    }
}
