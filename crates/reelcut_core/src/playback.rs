use crate::types::*;

/// The preview player. Both trim seeking and loop restarts write through this
/// handle, always from the editor's single event loop.
pub trait MediaHandle {
    fn current_time(&self) -> TimeUs;
    fn seek(&mut self, time: TimeUs);
    fn play(&mut self);
    fn pause(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    /// Playback ran past the trim end; jump back to this time and keep playing.
    Restart(TimeUs),
}

/// Keeps preview playback looping over the trim window.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSynchronizer {
    suppress_next: bool,
}

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the loop check on the next tick. Set after a trim drag seeks the
    /// player so the two writers don't undo each other.
    pub fn suppress_next_check(&mut self) {
        self.suppress_next = true;
    }

    pub fn check(&mut self, current: TimeUs, trim: TrimWindow) -> LoopAction {
        if std::mem::take(&mut self.suppress_next) {
            return LoopAction::Continue;
        }
        if current >= trim.end_time {
            LoopAction::Restart(trim.start_time)
        } else {
            LoopAction::Continue
        }
    }

    /// Read the player's clock, restart it if it ran past the trim end, and
    /// return the position the rest of the frame should use.
    pub fn sync(&mut self, media: &mut dyn MediaHandle, trim: TrimWindow) -> TimeUs {
        let current = media.current_time();
        match self.check(current, trim) {
            LoopAction::Continue => current,
            LoopAction::Restart(start) => {
                tracing::debug!(from = %current, to = %start, "Looping preview");
                media.seek(start);
                media.play();
                start
            }
        }
    }
}
