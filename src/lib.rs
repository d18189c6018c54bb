pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod service;
pub mod session;
pub mod types;

pub use error::SentimindError;
pub use server::{SentimindState, sentimind_router};
