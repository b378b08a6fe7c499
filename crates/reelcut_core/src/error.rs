use thiserror::Error;

use crate::session::Stage;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Overlay not found: {0}")]
    OverlayNotFound(uuid::Uuid),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Cannot {op} while {stage:?}")]
    InvalidStage { op: &'static str, stage: Stage },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
