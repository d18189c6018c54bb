pub mod router;

pub use router::{SentimindState, sentimind_router};
