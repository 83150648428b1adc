//! # Application Layer
//!
//! The answer-client interface and the chat session use case.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
