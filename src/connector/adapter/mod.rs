mod gemini_client;
mod mock_answer_client;

pub use gemini_client::*;
pub use mock_answer_client::*;
