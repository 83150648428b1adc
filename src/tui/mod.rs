//! # Terminal UI
//!
//! Interactive chat front-end: input editing, scrollable conversation and
//! markdown-styled answers. Drives a [`ChatSession`] from the terminal event
//! loop.

pub mod app;
pub mod event;
pub mod markdown;
pub mod ui;

use anyhow::Result;

use crate::application::ChatSession;

pub use app::App;

/// Take over the terminal and run the chat UI until the user quits.
pub async fn run(session: ChatSession) -> Result<()> {
    let terminal = ratatui::init();
    let result = App::new(session).run(terminal).await;
    ratatui::restore();
    result
}
