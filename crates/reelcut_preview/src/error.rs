use reelcut_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no overlay matches {0}")]
    NoOverlay(String),

    #[error("submission was never delivered")]
    NotSubmitted,
}

pub type Result<T> = std::result::Result<T, PreviewError>;
