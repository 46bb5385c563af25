//! Word-of-the-day and quiz content, live or bundled.

mod client;
pub mod fallback;
mod provider;
mod request;

pub use client::{ContentConfig, GenerativeClient};
pub use provider::{ContentProvider, ContentSource};
pub use request::{ContentRequest, DEFAULT_QUIZ_TOPIC, QUIZ_LENGTH};
