//! Shared error types for the services crate.

use thiserror::Error;

use lingo_core::model::ContentShapeError;
use storage::sqlite::SqliteInitError;

/// Reasons a live content fetch did not produce usable content.
///
/// `ContentProvider` never surfaces these to the learner; they are logged and
/// replaced with bundled content.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("content service is not configured")]
    Disabled,
    #[error("content service returned an empty response")]
    EmptyResponse,
    #[error("content service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("content payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] ContentShapeError),
}

/// Errors raised while reading content service settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
