use serde::Serialize;

use super::Message;

/// Identifies one in-flight request by the id of the user message that
/// started it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TurnId(String);

impl TurnId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a conversation as the UI sees it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub(crate) messages: Vec<Message>,
    pub(crate) pending_input: String,
    pub(crate) is_awaiting_response: bool,
    pub(crate) last_error: Option<String>,
    /// Turn whose answer is currently outstanding.
    #[serde(skip)]
    pub(crate) in_flight: Option<TurnId>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.is_awaiting_response
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn in_flight(&self) -> Option<&TurnId> {
        self.in_flight.as_ref()
    }
}
