#![forbid(unsafe_code)]

pub mod app_services;
pub mod content;
pub mod error;
pub mod progress_store;

pub use lingo_core::Clock;

pub use app_services::AppServices;
pub use content::{
    ContentConfig, ContentProvider, ContentRequest, ContentSource, DEFAULT_QUIZ_TOPIC,
    GenerativeClient, QUIZ_LENGTH,
};
pub use error::{AppServicesError, ContentConfigError, ContentError};
pub use progress_store::{PersistOutcome, ProgressStore};
