use reelcut_core::session::{RenderFrame, RenderSurface, Submission, SubmissionSink};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Render surface for headless runs: logs whenever the set of visible
/// overlays or the selection changes instead of drawing.
#[derive(Debug, Default)]
pub struct TracingSurface {
    last_visible: Vec<Uuid>,
    last_selected: Option<Uuid>,
    frames: u64,
}

impl TracingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSurface for TracingSurface {
    fn draw(&mut self, frame: &RenderFrame) {
        self.frames += 1;
        let visible: Vec<Uuid> = frame.visible_overlays.iter().map(|o| o.id).collect();
        if visible != self.last_visible || frame.selected_overlay_id != self.last_selected {
            tracing::info!(
                time = %frame.current_time,
                visible = visible.len(),
                selected = ?frame.selected_overlay_id,
                filter = frame.filter.name(),
                "Preview overlays changed"
            );
            self.last_visible = visible;
            self.last_selected = frame.selected_overlay_id;
        }
        tracing::trace!(time = %frame.current_time, stage = ?frame.stage, "Frame");
    }
}

/// Hands the submission to whoever holds the receiving end.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Option<oneshot::Sender<Submission>>,
}

impl ChannelSink {
    pub fn new() -> (Self, oneshot::Receiver<Submission>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }
}

impl SubmissionSink for ChannelSink {
    fn submit(&mut self, submission: Submission) {
        match self.tx.take() {
            Some(tx) => {
                if tx.send(submission).is_err() {
                    tracing::warn!("Submission receiver dropped");
                }
            }
            None => tracing::warn!("Submission already delivered, ignoring"),
        }
    }
}
