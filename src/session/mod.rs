pub mod machine;
pub mod registry;

pub use machine::{Page, SessionState, TransitionError};
pub use registry::{SessionId, SessionRegistry};
