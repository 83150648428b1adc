mod message;
mod session_state;

pub use message::*;
pub use session_state::*;
