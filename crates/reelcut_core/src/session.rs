//! The editing pass as one state machine.
//!
//! `EditSession` walks a clip from selection through editing and review to
//! submission. It owns the trim window, the overlays, and their history, and
//! routes pointer input to the trim and placement controllers. Only discrete
//! edits reach the history; continuous pointer moves never do.

use crate::config::EditorConfig;
use crate::error::{CoreError, Result};
use crate::history::{EditKind, EditSnapshot, History};
use crate::overlay;
use crate::placement::{PlacementController, Point, Rect};
use crate::playback::{MediaHandle, PlaybackSynchronizer};
use crate::trim::{TrimBar, TrimController, TrimHandle};
use crate::types::*;
use crate::upload::{UploadSession, UploadStatus};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Stage {
    Selecting,
    Editing,
    Reviewing,
    Submitting,
    Finished,
    Cancelled,
}

/// What the submission collaborator receives once the upload completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub clip: Clip,
    pub caption: String,
    pub overlays: Vec<TextOverlay>,
    pub trim: TrimWindow,
    pub filter: FilterTag,
}

/// Receives the finished edit. Called at most once per session.
pub trait SubmissionSink {
    fn submit(&mut self, submission: Submission);
}

/// Everything a renderer needs to draw one preview frame.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderFrame {
    pub stage: Stage,
    pub current_time: TimeUs,
    pub trim: Option<TrimWindow>,
    pub visible_overlays: Vec<TextOverlay>,
    pub selected_overlay_id: Option<Uuid>,
    pub filter: FilterTag,
    pub upload_progress: Option<u32>,
}

pub trait RenderSurface {
    fn draw(&mut self, frame: &RenderFrame);
}

/// Edit state that only exists once the clip duration is known.
#[derive(Debug, Clone)]
struct EditState {
    duration: TimeUs,
    overlays: Vec<TextOverlay>,
    trim: TrimController,
    history: History,
}

impl EditState {
    fn snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            overlays: self.overlays.clone(),
            trim: self.trim.window(),
        }
    }

    fn commit(&mut self, kind: EditKind) {
        let snapshot = self.snapshot();
        self.history.record(kind, snapshot);
    }

    fn overlay_index(&self, id: Uuid) -> Result<usize> {
        self.overlays
            .iter()
            .position(|o| o.id == id)
            .ok_or(CoreError::OverlayNotFound(id))
    }
}

pub struct EditSession {
    config: EditorConfig,
    stage: Stage,
    clip: Option<Clip>,
    edit: Option<EditState>,
    placement: PlacementController,
    playback: PlaybackSynchronizer,
    current_time: TimeUs,
    caption: String,
    filter: FilterTag,
    upload: Option<UploadSession>,
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            stage: Stage::Selecting,
            clip: None,
            edit: None,
            placement: PlacementController::new(),
            playback: PlaybackSynchronizer::new(),
            current_time: TimeUs::ZERO,
            caption: String::new(),
            filter: FilterTag::None,
            upload: None,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    pub fn duration(&self) -> Option<TimeUs> {
        self.edit.as_ref().map(|e| e.duration)
    }

    pub fn overlays(&self) -> &[TextOverlay] {
        self.edit
            .as_ref()
            .map(|e| e.overlays.as_slice())
            .unwrap_or(&[])
    }

    pub fn overlay(&self, id: Uuid) -> Option<&TextOverlay> {
        self.overlays().iter().find(|o| o.id == id)
    }

    pub fn trim_window(&self) -> Option<TrimWindow> {
        self.edit.as_ref().map(|e| e.trim.window())
    }

    pub fn is_trimming(&self) -> bool {
        self.edit.as_ref().is_some_and(|e| e.trim.is_dragging())
    }

    pub fn selected_overlay(&self) -> Option<&TextOverlay> {
        self.placement.selected().and_then(|id| self.overlay(id))
    }

    pub fn history(&self) -> Option<&History> {
        self.edit.as_ref().map(|e| &e.history)
    }

    pub fn can_undo(&self) -> bool {
        self.history().is_some_and(History::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.history().is_some_and(History::can_redo)
    }

    pub fn current_time(&self) -> TimeUs {
        self.current_time
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn filter(&self) -> FilterTag {
        self.filter
    }

    pub fn upload_progress(&self) -> Option<u32> {
        self.upload.as_ref().map(UploadSession::progress)
    }

    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            stage: self.stage,
            current_time: self.current_time,
            trim: self.trim_window(),
            visible_overlays: overlay::visible_overlays(self.overlays(), self.current_time)
                .into_iter()
                .cloned()
                .collect(),
            selected_overlay_id: self.placement.selected(),
            filter: self.filter,
            upload_progress: self.upload_progress(),
        }
    }

    // -----------------------------------------------------------------------
    // Stage transitions
    // -----------------------------------------------------------------------

    fn require(&self, op: &'static str, stage: Stage) -> Result<()> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(CoreError::InvalidStage {
                op,
                stage: self.stage,
            })
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(from = ?self.stage, to = ?stage, "Edit session stage changed");
        self.stage = stage;
    }

    /// Accept the clip to edit. Non-video input is rejected and leaves the
    /// session untouched.
    pub fn select_clip(&mut self, clip: Clip) -> Result<()> {
        self.require("select a clip", Stage::Selecting)?;
        if !clip.is_video() {
            tracing::warn!(name = %clip.name, mime = %clip.mime_type, "Rejected non-video selection");
            return Err(CoreError::InvalidSelection(format!(
                "{} is not a video ({})",
                clip.name, clip.mime_type
            )));
        }
        let known_duration = clip.duration;
        tracing::info!(clip_id = %clip.id, name = %clip.name, "Clip selected");
        self.clip = Some(clip);
        self.enter(Stage::Editing);
        if let Some(duration) = known_duration {
            self.metadata_loaded(duration)?;
        }
        Ok(())
    }

    /// The clip source resolved the duration. Seeds trim, overlays and history.
    /// Later reports for the same clip are ignored.
    pub fn metadata_loaded(&mut self, duration: TimeUs) -> Result<()> {
        self.require("load metadata", Stage::Editing)?;
        if self.edit.is_some() {
            tracing::debug!(%duration, "Duplicate metadata ignored");
            return Ok(());
        }
        let duration = duration.max(TimeUs::ZERO);
        if let Some(clip) = self.clip.as_mut() {
            clip.duration = Some(duration);
        }
        let trim = TrimWindow::full(duration);
        let initial = EditSnapshot {
            overlays: vec![],
            trim,
        };
        self.edit = Some(EditState {
            duration,
            overlays: vec![],
            trim: TrimController::new(trim, self.config.min_trim_length),
            history: History::new(initial, self.config.max_history),
        });
        self.current_time = TimeUs::ZERO;
        tracing::info!(%duration, "Clip metadata loaded");
        Ok(())
    }

    /// Leave the editor without posting. Only offered before a clip is chosen.
    pub fn cancel(&mut self) -> Result<()> {
        self.require("cancel", Stage::Selecting)?;
        self.discard();
        self.enter(Stage::Cancelled);
        Ok(())
    }

    /// From editing: throw away every edit and return to clip selection.
    /// From review: return to editing with everything intact.
    pub fn back(&mut self) -> Result<()> {
        match self.stage {
            Stage::Editing => {
                self.discard();
                self.enter(Stage::Selecting);
                Ok(())
            }
            Stage::Reviewing => {
                self.enter(Stage::Editing);
                Ok(())
            }
            stage => Err(CoreError::InvalidStage { op: "go back", stage }),
        }
    }

    /// Move on to review. A no-op until the duration is known.
    pub fn next(&mut self) -> Result<()> {
        self.require("continue to review", Stage::Editing)?;
        if self.edit.is_none() {
            tracing::debug!("Next ignored before metadata");
            return Ok(());
        }
        self.pointer_up();
        self.placement.reset();
        self.enter(Stage::Reviewing);
        Ok(())
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) -> Result<()> {
        self.require("edit the caption", Stage::Reviewing)?;
        self.caption = caption.into();
        Ok(())
    }

    pub fn select_filter(&mut self, filter: FilterTag) -> Result<()> {
        self.require("choose a filter", Stage::Editing)?;
        self.filter = filter;
        Ok(())
    }

    fn discard(&mut self) {
        self.clip = None;
        self.edit = None;
        self.placement.reset();
        self.playback = PlaybackSynchronizer::new();
        self.current_time = TimeUs::ZERO;
        self.caption.clear();
        self.filter = FilterTag::None;
        self.upload = None;
    }

    // -----------------------------------------------------------------------
    // Trim
    // -----------------------------------------------------------------------

    fn editing_state(&mut self) -> Option<&mut EditState> {
        if self.stage == Stage::Editing {
            self.edit.as_mut()
        } else {
            None
        }
    }

    pub fn grab_trim_handle(&mut self, handle: TrimHandle) {
        if self.placement.dragging().is_some() {
            return;
        }
        if let Some(edit) = self.editing_state() {
            edit.trim.grab(handle);
        }
    }

    /// Continuous trim input. Returns the time the preview should seek to
    /// when the handle moved.
    pub fn trim_pointer_move(&mut self, pointer_x: f64, bar: TrimBar) -> Option<TimeUs> {
        let edit = self.editing_state()?;
        let duration = edit.duration;
        let time = edit.trim.update(pointer_x, bar, duration)?;
        self.current_time = time;
        self.playback.suppress_next_check();
        Some(time)
    }

    /// Finish a trim drag, committing one history entry.
    pub fn release_trim(&mut self) -> bool {
        let Some(edit) = self.editing_state() else {
            return false;
        };
        if edit.trim.release().is_none() {
            return false;
        }
        edit.commit(EditKind::Trim);
        true
    }

    // -----------------------------------------------------------------------
    // Overlays
    // -----------------------------------------------------------------------

    /// Add a default overlay at the current playback time and select it.
    /// Returns `None` while the duration is unknown.
    ///
    /// Discrete overlay edits first release any drag in progress, so the drag
    /// lands in history as its own entry before the edit.
    pub fn add_overlay(&mut self) -> Result<Option<Uuid>> {
        self.require("add text", Stage::Editing)?;
        self.pointer_up();
        let at = self.current_time;
        let config = &self.config;
        let Some(edit) = self.edit.as_mut() else {
            return Ok(None);
        };
        let created = overlay::normalize(
            overlay::create_overlay(at, edit.duration, config),
            edit.duration,
            config,
        );
        let id = created.id;
        tracing::debug!(%id, start = %created.start_time, end = %created.end_time, "Overlay added");
        edit.overlays.push(created);
        edit.commit(EditKind::AddOverlay);
        self.placement.select(id);
        Ok(Some(id))
    }

    /// Replace an overlay wholesale with an edited copy, matched by id.
    pub fn save_overlay(&mut self, updated: TextOverlay) -> Result<()> {
        self.require("edit text", Stage::Editing)?;
        self.pointer_up();
        let config = &self.config;
        let Some(edit) = self.edit.as_mut() else {
            return Ok(());
        };
        let index = edit.overlay_index(updated.id)?;
        edit.overlays[index] = overlay::normalize(updated, edit.duration, config);
        edit.commit(EditKind::SaveOverlay);
        self.placement.deselect();
        Ok(())
    }

    pub fn delete_overlay(&mut self, id: Uuid) -> Result<()> {
        self.require("delete text", Stage::Editing)?;
        self.pointer_up();
        let Some(edit) = self.edit.as_mut() else {
            return Ok(());
        };
        let index = edit.overlay_index(id)?;
        edit.overlays.remove(index);
        edit.commit(EditKind::DeleteOverlay);
        self.placement.reset();
        tracing::debug!(%id, "Overlay deleted");
        Ok(())
    }

    pub fn select_overlay(&mut self, id: Uuid) -> Result<()> {
        self.require("select text", Stage::Editing)?;
        if self.overlay(id).is_none() {
            return Err(CoreError::OverlayNotFound(id));
        }
        self.placement.select(id);
        Ok(())
    }

    pub fn deselect_overlay(&mut self) {
        self.placement.deselect();
    }

    /// Pointer down on a rendered overlay. Ignored for unknown ids or while a
    /// trim handle is held.
    pub fn begin_overlay_drag(&mut self, id: Uuid, pointer: Point, overlay_rect: Rect) -> bool {
        if self.stage != Stage::Editing || self.is_trimming() || self.overlay(id).is_none() {
            return false;
        }
        self.placement.begin_drag(id, pointer, overlay_rect);
        true
    }

    /// Continuous overlay drag input. Moves the overlay without touching history.
    pub fn overlay_pointer_move(&mut self, pointer: Point, container: Rect) -> Option<Position> {
        let (id, position) = self.placement.update_drag(pointer, container)?;
        let edit = self.editing_state()?;
        let target = edit.overlays.iter_mut().find(|o| o.id == id)?;
        target.position = position;
        Some(position)
    }

    /// Finish an overlay drag, committing one history entry.
    pub fn release_overlay_drag(&mut self) -> bool {
        let Some(id) = self.placement.end_drag() else {
            return false;
        };
        match self.editing_state() {
            Some(edit) if edit.overlay_index(id).is_ok() => {
                edit.commit(EditKind::MoveOverlay);
                true
            }
            _ => false,
        }
    }

    /// A pointer release seen anywhere. Ends whichever drag is active so a
    /// release outside the tracked element can't leave a drag stuck.
    pub fn pointer_up(&mut self) -> bool {
        let trimmed = self.release_trim();
        let moved = self.release_overlay_drag();
        trimmed || moved
    }

    /// Continuous pointer movement seen anywhere; feeds whichever drag is active.
    pub fn pointer_move(&mut self, pointer: Point, bar: TrimBar, container: Rect) -> Option<TimeUs> {
        if self.is_trimming() {
            self.trim_pointer_move(pointer.x, bar)
        } else {
            self.overlay_pointer_move(pointer, container);
            None
        }
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Step back one edit. Returns the time the preview should seek to when
    /// something was undone.
    pub fn undo(&mut self) -> Result<Option<TimeUs>> {
        self.require("undo", Stage::Editing)?;
        let snapshot = match self.edit.as_mut().and_then(|e| e.history.undo()) {
            Some(s) => s.clone(),
            None => return Ok(None),
        };
        Ok(Some(self.apply_snapshot(snapshot)))
    }

    pub fn redo(&mut self) -> Result<Option<TimeUs>> {
        self.require("redo", Stage::Editing)?;
        let snapshot = match self.edit.as_mut().and_then(|e| e.history.redo()) {
            Some(s) => s.clone(),
            None => return Ok(None),
        };
        Ok(Some(self.apply_snapshot(snapshot)))
    }

    fn apply_snapshot(&mut self, snapshot: EditSnapshot) -> TimeUs {
        let start = snapshot.trim.start_time;
        if let Some(edit) = self.edit.as_mut() {
            edit.overlays = snapshot.overlays;
            edit.trim.restore(snapshot.trim);
        }
        self.placement.end_drag();
        if let Some(id) = self.placement.selected() {
            if self.overlay(id).is_none() {
                self.placement.deselect();
            }
        }
        self.current_time = start;
        self.playback.suppress_next_check();
        start
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------

    /// Clock tick: read the player position and loop it inside the trim window.
    pub fn sync_playback(&mut self, media: &mut dyn MediaHandle) -> TimeUs {
        self.current_time = match self.edit.as_ref() {
            Some(edit) => self.playback.sync(media, edit.trim.window()),
            None => media.current_time(),
        };
        self.current_time
    }

    // -----------------------------------------------------------------------
    // Upload
    // -----------------------------------------------------------------------

    /// Start the simulated upload.
    pub fn post(&mut self) -> Result<()> {
        self.require("post", Stage::Reviewing)?;
        if self.clip.is_none() || self.edit.is_none() {
            return Ok(());
        }
        self.upload = Some(UploadSession::new(&self.config));
        self.enter(Stage::Submitting);
        Ok(())
    }

    /// Abandon the upload and return to review. Nothing is submitted.
    pub fn cancel_upload(&mut self) -> Result<()> {
        self.require("cancel the upload", Stage::Submitting)?;
        if let Some(upload) = self.upload.take() {
            tracing::info!(progress = upload.progress(), "Upload cancelled");
        }
        self.enter(Stage::Reviewing);
        Ok(())
    }

    pub fn advance_upload<R: Rng>(
        &mut self,
        rng: &mut R,
        sink: &mut dyn SubmissionSink,
    ) -> Result<UploadStatus> {
        self.require("upload", Stage::Submitting)?;
        let status = match self.upload.as_mut() {
            Some(upload) => upload.advance(rng),
            None => UploadStatus::Complete,
        };
        self.finish_upload_step(status, sink)
    }

    pub fn advance_upload_by(
        &mut self,
        step: u32,
        sink: &mut dyn SubmissionSink,
    ) -> Result<UploadStatus> {
        self.require("upload", Stage::Submitting)?;
        let status = match self.upload.as_mut() {
            Some(upload) => upload.advance_by(step),
            None => UploadStatus::Complete,
        };
        self.finish_upload_step(status, sink)
    }

    fn finish_upload_step(
        &mut self,
        status: UploadStatus,
        sink: &mut dyn SubmissionSink,
    ) -> Result<UploadStatus> {
        if status != UploadStatus::Complete {
            return Ok(status);
        }
        self.upload = None;
        if let Some(submission) = self.take_submission() {
            tracing::info!(
                clip_id = %submission.clip.id,
                overlays = submission.overlays.len(),
                "Submitting edit"
            );
            sink.submit(submission);
        }
        self.enter(Stage::Finished);
        Ok(status)
    }

    fn take_submission(&mut self) -> Option<Submission> {
        let clip = self.clip.take()?;
        let edit = self.edit.take()?;
        Some(Submission {
            clip,
            caption: std::mem::take(&mut self.caption),
            trim: edit.trim.window(),
            overlays: edit.overlays,
            filter: self.filter,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
