//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Answer clients (Gemini over HTTP, scripted mock)
//! - Startup configuration and dependency wiring

pub mod adapter;
pub mod config;
pub mod container;

pub use adapter::*;
pub use config::*;
pub use container::*;
