//! Event loop that feeds an [`EditSession`] from a channel of input events
//! and keeps a media clock looping inside the trim window.

use crate::error::{PreviewError, Result};
use crate::event::{EditorEvent, OverlayEdit, OverlayTarget};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reelcut_core::placement::{Point, Rect};
use reelcut_core::playback::MediaHandle;
use reelcut_core::session::{EditSession, RenderSurface, Stage, SubmissionSink};
use reelcut_core::trim::TrimBar;
use reelcut_core::upload::UploadStatus;
use reelcut_core::{Clip, EditorConfig, TextOverlay, TimeUs};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Screen geometry the pointer events are expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Layout {
    pub trim_bar: TrimBar,
    pub container: Rect,
    /// Rendered overlay size, used when a pointer-down carries no box.
    pub overlay_width: f64,
    pub overlay_height: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            trim_bar: TrimBar {
                left: 0.0,
                width: 360.0,
            },
            container: Rect {
                left: 0.0,
                top: 0.0,
                width: 360.0,
                height: 640.0,
            },
            overlay_width: 160.0,
            overlay_height: 40.0,
        }
    }
}

impl Layout {
    /// Box an overlay at `position` would occupy, centered on its anchor.
    fn overlay_rect(&self, overlay: &TextOverlay) -> Rect {
        let c = self.container;
        let center_x = c.left + overlay.position.x / 100.0 * c.width;
        let center_y = c.top + overlay.position.y / 100.0 * c.height;
        Rect {
            left: center_x - self.overlay_width / 2.0,
            top: center_y - self.overlay_height / 2.0,
            width: self.overlay_width,
            height: self.overlay_height,
        }
    }
}

pub struct EditorDriver<M, S, K> {
    session: EditSession,
    media: M,
    surface: S,
    sink: K,
    layout: Layout,
    rng: StdRng,
}

impl<M, S, K> EditorDriver<M, S, K>
where
    M: MediaHandle,
    S: RenderSurface,
    K: SubmissionSink,
{
    pub fn new(config: EditorConfig, media: M, surface: S, sink: K, layout: Layout) -> Self {
        Self::with_rng(config, media, surface, sink, layout, StdRng::from_entropy())
    }

    /// Same as [`EditorDriver::new`] with a fixed upload sequence.
    pub fn with_seed(
        config: EditorConfig,
        media: M,
        surface: S,
        sink: K,
        layout: Layout,
        seed: u64,
    ) -> Self {
        Self::with_rng(config, media, surface, sink, layout, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: EditorConfig,
        media: M,
        surface: S,
        sink: K,
        layout: Layout,
        rng: StdRng,
    ) -> Self {
        Self {
            session: EditSession::new(config),
            media,
            surface,
            sink,
            layout,
            rng,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    fn resolve(&self, target: OverlayTarget) -> Result<Uuid> {
        let session = &self.session;
        let found = match target {
            OverlayTarget::Selected => session.selected_overlay(),
            OverlayTarget::Latest => session.overlays().last(),
            OverlayTarget::Index(i) => session.overlays().get(i),
            OverlayTarget::Id(id) => session.overlay(id),
        };
        found
            .map(|o| o.id)
            .ok_or_else(|| PreviewError::NoOverlay(target.to_string()))
    }

    fn edited_overlay(&self, id: Uuid, edit: OverlayEdit) -> Result<TextOverlay> {
        let mut overlay = self
            .session
            .overlay(id)
            .cloned()
            .ok_or_else(|| PreviewError::NoOverlay(id.to_string()))?;
        if let Some(text) = edit.text {
            overlay.text = text;
        }
        if let Some(color) = edit.color {
            overlay.color = color;
        }
        if let Some(size) = edit.font_size {
            overlay.font_size = size;
        }
        if let Some(family) = edit.font_family {
            overlay.font_family = family;
        }
        if let Some(start) = edit.start_secs {
            overlay.start_time = TimeUs::from_seconds(start);
        }
        if let Some(end) = edit.end_secs {
            overlay.end_time = TimeUs::from_seconds(end);
        }
        Ok(overlay)
    }

    /// Apply one input event to the session and mirror any seek on the media.
    pub fn handle(&mut self, event: EditorEvent) -> Result<()> {
        if event.is_continuous() {
            tracing::trace!(?event, "Editor event");
        } else {
            tracing::debug!(?event, "Editor event");
        }

        match event {
            EditorEvent::SelectClip { name, mime_type } => {
                self.session.select_clip(Clip::new(name, mime_type))?;
            }
            EditorEvent::MetadataLoaded { duration_secs } => {
                let first = self.session.duration().is_none();
                self.session
                    .metadata_loaded(TimeUs::from_seconds(duration_secs))?;
                if first {
                    self.media.seek(TimeUs::ZERO);
                    self.media.play();
                }
            }
            EditorEvent::GrabTrimHandle { handle } => self.session.grab_trim_handle(handle),
            EditorEvent::PointerMove { x, y } => {
                let seek = self.session.pointer_move(
                    Point { x, y },
                    self.layout.trim_bar,
                    self.layout.container,
                );
                if let Some(time) = seek {
                    self.media.seek(time);
                }
            }
            EditorEvent::PointerUp => {
                self.session.pointer_up();
            }
            EditorEvent::OverlayPointerDown { target, x, y, rect } => {
                let id = self.resolve(target)?;
                let rect = match rect {
                    Some(rect) => rect,
                    None => self
                        .session
                        .overlay(id)
                        .map(|o| self.layout.overlay_rect(o))
                        .ok_or_else(|| PreviewError::NoOverlay(id.to_string()))?,
                };
                if !self.session.begin_overlay_drag(id, Point { x, y }, rect) {
                    tracing::debug!(%id, "Overlay drag refused");
                }
            }
            EditorEvent::AddText => {
                self.session.add_overlay()?;
            }
            EditorEvent::SelectText { target } => {
                let id = self.resolve(target)?;
                self.session.select_overlay(id)?;
            }
            EditorEvent::Deselect => self.session.deselect_overlay(),
            EditorEvent::SaveText { target, edit } => {
                let id = self.resolve(target)?;
                let overlay = self.edited_overlay(id, edit)?;
                self.session.save_overlay(overlay)?;
            }
            EditorEvent::DeleteText { target } => {
                let id = self.resolve(target)?;
                self.session.delete_overlay(id)?;
            }
            EditorEvent::SelectFilter { filter } => self.session.select_filter(filter)?,
            EditorEvent::Undo => {
                if let Some(time) = self.session.undo()? {
                    self.media.seek(time);
                }
            }
            EditorEvent::Redo => {
                if let Some(time) = self.session.redo()? {
                    self.media.seek(time);
                }
            }
            EditorEvent::Next => self.session.next()?,
            EditorEvent::Back => {
                self.session.back()?;
                if self.session.stage() == Stage::Selecting {
                    self.media.pause();
                    self.media.seek(TimeUs::ZERO);
                }
            }
            EditorEvent::SetCaption { caption } => self.session.set_caption(caption)?,
            EditorEvent::Post => self.session.post()?,
            EditorEvent::CancelUpload => self.session.cancel_upload()?,
            EditorEvent::Cancel => {
                self.session.cancel()?;
                self.media.pause();
            }
        }
        Ok(())
    }

    /// Playback poll: loop the media inside the trim window and draw a frame.
    pub fn tick(&mut self) {
        self.session.sync_playback(&mut self.media);
        let frame = self.session.render_frame();
        self.surface.draw(&frame);
    }

    /// One step of the simulated upload. Does nothing outside submission.
    pub fn upload_tick(&mut self) -> Result<UploadStatus> {
        if self.session.stage() != Stage::Submitting {
            return Ok(UploadStatus::InProgress(
                self.session.upload_progress().unwrap_or(0),
            ));
        }
        let status = self.session.advance_upload(&mut self.rng, &mut self.sink)?;
        match status {
            UploadStatus::InProgress(progress) => tracing::debug!(progress, "Uploading"),
            UploadStatus::Complete => {
                self.media.pause();
                tracing::info!("Upload complete");
            }
        }
        Ok(status)
    }

    /// Drive the session until it finishes, is cancelled, or the event
    /// channel closes with no upload in flight. Rejected events are logged
    /// and skipped.
    pub async fn run(&mut self, mut events: mpsc::Receiver<EditorEvent>) -> Stage {
        let config = self.session.config();
        let mut poll = tokio::time::interval(config.playback_poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut upload = tokio::time::interval(config.upload_tick_interval());
        upload.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut closed = false;
        let mut was_submitting = false;
        loop {
            let stage = self.session.stage();
            if matches!(stage, Stage::Finished | Stage::Cancelled) {
                break;
            }
            let submitting = stage == Stage::Submitting;
            if closed && !submitting {
                tracing::info!(?stage, "Event channel closed");
                break;
            }
            if submitting && !was_submitting {
                upload.reset();
            }
            was_submitting = submitting;

            tokio::select! {
                biased;
                event = events.recv(), if !closed => match event {
                    Some(event) => {
                        if let Err(e) = self.handle(event) {
                            tracing::warn!(error = %e, "Event rejected");
                        }
                    }
                    None => closed = true,
                },
                _ = upload.tick(), if submitting => {
                    if let Err(e) = self.upload_tick() {
                        tracing::warn!(error = %e, "Upload step failed");
                    }
                }
                _ = poll.tick() => self.tick(),
            }
        }

        self.tick();
        self.session.stage()
    }
}
