//! Action-log persistence.
//!
//! Every mutating [`Receptionist`](crate::receptionist::Receptionist) call made
//! through an [`ActionRecorder`] is appended to a log as one JSON line:
//!
//! ```text
//! {"actionName":"addPublication","parameters":{"text":"hi","userId":"…"},"return":{"dateTime":"2024-03-01T10:15:30Z","postId":"…",…}}
//! ```
//!
//! [`ReplayLoader`] rebuilds an equivalent receptionist from such a log. The
//! ids and timestamps the domain minted at call time are staged from each
//! record's `return` object right before the call is re-issued, so replay never
//! consults the real clock or random source for them.

pub mod loader;
pub mod record;
pub mod recorder;
pub mod staging;

pub use loader::{load_from, Replay, ReplayLoader};
pub use record::{ActionKind, ActionRecord};
pub use recorder::ActionRecorder;
