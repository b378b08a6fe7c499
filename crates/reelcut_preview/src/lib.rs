pub mod clock;
pub mod driver;
pub mod error;
pub mod event;
pub mod surface;

pub use clock::SimulatedClock;
pub use driver::{EditorDriver, Layout};
pub use error::{PreviewError, Result};
pub use event::{EditorEvent, OverlayEdit, OverlayTarget};
pub use surface::{ChannelSink, TracingSurface};
