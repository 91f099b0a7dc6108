//! Errors raised while loading narrative content.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template '{0}' has neither text nor texts")]
    EmptyTemplate(String),
}
