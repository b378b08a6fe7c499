//! Trim handle dragging.
//!
//! The controller owns the trim window and turns a stream of pointer positions
//! over the trim bar into handle times. Updates that would shrink the window
//! below the minimum length are dropped, so the window is valid after every
//! step of a drag, not only at release.

use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrimHandle {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrimDrag {
    #[default]
    Idle,
    DraggingStart,
    DraggingEnd,
}

/// Physical extent of the trim bar in pointer coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrimBar {
    pub left: f64,
    pub width: f64,
}

impl TrimBar {
    /// Map a pointer x coordinate to a clip time by linear interpolation.
    /// Pointers beyond either end of the bar pin to that end.
    pub fn time_at(&self, pointer_x: f64, duration: TimeUs) -> Option<TimeUs> {
        if self.width.is_nan() || self.width <= 0.0 {
            return None;
        }
        let fraction = ((pointer_x - self.left) / self.width).clamp(0.0, 1.0);
        Some(TimeUs::from_seconds(fraction * duration.as_seconds()))
    }
}

#[derive(Debug, Clone)]
pub struct TrimController {
    state: TrimDrag,
    window: TrimWindow,
    min_length: TimeUs,
}

impl TrimController {
    pub fn new(window: TrimWindow, min_length: TimeUs) -> Self {
        Self {
            state: TrimDrag::Idle,
            window,
            min_length,
        }
    }

    pub fn window(&self) -> TrimWindow {
        self.window
    }

    pub fn state(&self) -> TrimDrag {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state != TrimDrag::Idle
    }

    /// Grab a handle. Ignored if a drag is already in progress.
    pub fn grab(&mut self, handle: TrimHandle) {
        if self.is_dragging() {
            return;
        }
        self.state = match handle {
            TrimHandle::Start => TrimDrag::DraggingStart,
            TrimHandle::End => TrimDrag::DraggingEnd,
        };
        tracing::debug!(?handle, "Trim handle grabbed");
    }

    /// Move the grabbed handle toward the pointer. Returns the handle's new
    /// time when the move is accepted, which is where the preview should seek.
    pub fn update(&mut self, pointer_x: f64, bar: TrimBar, duration: TimeUs) -> Option<TimeUs> {
        if !self.is_dragging() {
            return None;
        }
        let time = bar.time_at(pointer_x, duration)?;
        match self.state {
            TrimDrag::DraggingStart if time < self.window.end_time - self.min_length => {
                self.window.start_time = time;
                Some(time)
            }
            TrimDrag::DraggingEnd if time > self.window.start_time + self.min_length => {
                self.window.end_time = time;
                Some(time)
            }
            _ => None,
        }
    }

    /// End the drag. Returns the window to commit if a drag was active.
    pub fn release(&mut self) -> Option<TrimWindow> {
        if !self.is_dragging() {
            return None;
        }
        self.state = TrimDrag::Idle;
        tracing::debug!(
            start = %self.window.start_time,
            end = %self.window.end_time,
            "Trim released"
        );
        Some(self.window)
    }

    /// Replace the window wholesale (undo/redo) and abandon any drag.
    pub fn restore(&mut self, window: TrimWindow) {
        self.state = TrimDrag::Idle;
        self.window = window;
    }
}
