//! Overlay dragging and selection.
//!
//! Coordinates come in as pointer pixels; positions go out as percentages of
//! the video container, which is what overlays store. The point of the overlay
//! that was grabbed stays under the pointer for the whole drag.

use crate::types::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned box in pointer coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    overlay_id: Uuid,
    /// Pointer relative to the overlay's rendered top-left.
    grab_offset: Point,
    /// Rendered overlay size at grab time.
    size: Point,
}

#[derive(Debug, Clone, Default)]
pub struct PlacementController {
    drag: Option<DragState>,
    selected: Option<Uuid>,
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn dragging(&self) -> Option<Uuid> {
        self.drag.map(|d| d.overlay_id)
    }

    /// Select an overlay, replacing any previous selection.
    pub fn select(&mut self, overlay_id: Uuid) {
        self.selected = Some(overlay_id);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Start dragging `overlay_id`, which is rendered at `overlay_rect`.
    pub fn begin_drag(&mut self, overlay_id: Uuid, pointer: Point, overlay_rect: Rect) {
        self.drag = Some(DragState {
            overlay_id,
            grab_offset: Point {
                x: pointer.x - overlay_rect.left,
                y: pointer.y - overlay_rect.top,
            },
            size: Point {
                x: overlay_rect.width,
                y: overlay_rect.height,
            },
        });
        self.select(overlay_id);
        tracing::debug!(%overlay_id, "Overlay drag started");
    }

    /// New center position for the dragged overlay, or `None` when no drag is
    /// active or the container has no area.
    pub fn update_drag(&self, pointer: Point, container: Rect) -> Option<(Uuid, Position)> {
        let drag = self.drag?;
        if !container.has_area() {
            return None;
        }
        let center_x = pointer.x - drag.grab_offset.x + drag.size.x / 2.0;
        let center_y = pointer.y - drag.grab_offset.y + drag.size.y / 2.0;
        let position = Position {
            x: (center_x - container.left) / container.width * 100.0,
            y: (center_y - container.top) / container.height * 100.0,
        }
        .clamped();
        Some((drag.overlay_id, position))
    }

    /// Finish the drag. Returns the dragged overlay if a drag was active.
    pub fn end_drag(&mut self) -> Option<Uuid> {
        let drag = self.drag.take()?;
        tracing::debug!(overlay_id = %drag.overlay_id, "Overlay drag ended");
        Some(drag.overlay_id)
    }

    /// Forget drag and selection, used when the overlay set is replaced.
    pub fn reset(&mut self) {
        self.drag = None;
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 360.0,
        height: 640.0,
    };

    /// A 100x40 overlay centered at 50%/50% of the container.
    fn centered_rect() -> Rect {
        Rect {
            left: 130.0,
            top: 300.0,
            width: 100.0,
            height: 40.0,
        }
    }

    #[test]
    fn grabbed_point_stays_under_pointer() {
        let mut placement = PlacementController::new();
        let id = Uuid::new_v4();
        // Grab near the overlay's top-left corner, away from its center.
        placement.begin_drag(id, Point { x: 140.0, y: 305.0 }, centered_rect());

        // Without moving, the overlay must not jump.
        let (_, p) = placement
            .update_drag(Point { x: 140.0, y: 305.0 }, CONTAINER)
            .unwrap();
        assert!((p.x - 50.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);

        // Move 36px right and 64px down: 10% on each axis.
        let (moved, p) = placement
            .update_drag(Point { x: 176.0, y: 369.0 }, CONTAINER)
            .unwrap();
        assert_eq!(moved, id);
        assert!((p.x - 60.0).abs() < 1e-9);
        assert!((p.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn positions_clamped_outside_container() {
        let mut placement = PlacementController::new();
        placement.begin_drag(Uuid::new_v4(), Point { x: 180.0, y: 320.0 }, centered_rect());

        for pointer in [
            Point { x: -5_000.0, y: -5_000.0 },
            Point { x: 5_000.0, y: 5_000.0 },
            Point { x: -1.0, y: 9_999.0 },
        ] {
            let (_, p) = placement.update_drag(pointer, CONTAINER).unwrap();
            assert!((0.0..=100.0).contains(&p.x));
            assert!((0.0..=100.0).contains(&p.y));
        }
    }

    #[test]
    fn container_offset_is_respected() {
        let mut placement = PlacementController::new();
        let container = Rect {
            left: 1000.0,
            top: 200.0,
            width: 200.0,
            height: 400.0,
        };
        let rect = Rect {
            left: 1090.0,
            top: 390.0,
            width: 20.0,
            height: 20.0,
        };
        placement.begin_drag(Uuid::new_v4(), Point { x: 1100.0, y: 400.0 }, rect);
        let (_, p) = placement
            .update_drag(Point { x: 1150.0, y: 500.0 }, container)
            .unwrap();
        assert!((p.x - 75.0).abs() < 1e-9);
        assert!((p.y - 75.0).abs() < 1e-9);
    }

    #[test]
    fn update_without_drag_is_none() {
        let placement = PlacementController::new();
        assert!(placement.update_drag(Point { x: 1.0, y: 1.0 }, CONTAINER).is_none());
    }

    #[test]
    fn degenerate_container_is_ignored() {
        let mut placement = PlacementController::new();
        placement.begin_drag(Uuid::new_v4(), Point { x: 1.0, y: 1.0 }, centered_rect());
        let flat = Rect {
            width: 0.0,
            ..CONTAINER
        };
        assert!(placement.update_drag(Point { x: 1.0, y: 1.0 }, flat).is_none());
    }

    #[test]
    fn end_drag_reports_once() {
        let mut placement = PlacementController::new();
        let id = Uuid::new_v4();
        placement.begin_drag(id, Point { x: 0.0, y: 0.0 }, centered_rect());
        assert_eq!(placement.dragging(), Some(id));
        assert_eq!(placement.end_drag(), Some(id));
        assert_eq!(placement.end_drag(), None);
        // Selection outlives the drag.
        assert_eq!(placement.selected(), Some(id));
    }

    #[test]
    fn selection_is_exclusive() {
        let mut placement = PlacementController::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        placement.select(a);
        placement.begin_drag(b, Point { x: 0.0, y: 0.0 }, centered_rect());
        assert_eq!(placement.selected(), Some(b));
        placement.deselect();
        assert_eq!(placement.selected(), None);
    }
}
