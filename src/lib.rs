pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;
pub mod tui;

pub use application::{AnswerClient, AnswerOutcome, ChatSession, PendingAnswer};

pub use connector::{
    AppConfig, Container, GeminiClient, GeminiConfig, KeyPlacement, MockAnswerClient,
};

pub use domain::{DomainError, Message, Role, SessionState, TurnId, NO_ANSWER_FALLBACK};
