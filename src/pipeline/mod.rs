//! Pipeline entry points for bot operations.
//!
//! - `run_bot`: Poll the forum and answer `[[Title]]` mentions until cancelled
//! - `run_lookup`: Render the reply for a piece of text, without posting

mod bot;
mod lookup;
mod poller;
mod responder;

pub use bot::run_bot;
pub use lookup::{build_responder, lookup_with, run_lookup};
pub use poller::{CommentOutcome, CommentStreamPoller, Cursor, CycleOutcome, StalenessTracker};
pub use responder::Responder;
