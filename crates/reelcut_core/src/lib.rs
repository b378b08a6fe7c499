pub mod config;
pub mod error;
pub mod history;
pub mod overlay;
pub mod placement;
pub mod playback;
pub mod session;
pub mod trim;
pub mod types;
pub mod upload;

pub use config::EditorConfig;
pub use error::{CoreError, Result};
pub use session::{EditSession, RenderFrame, RenderSurface, Stage, Submission, SubmissionSink};
pub use types::*;
