//! Input events delivered to the editor loop.

use reelcut_core::placement::Rect;
use reelcut_core::trim::TrimHandle;
use reelcut_core::FilterTag;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which overlay an event refers to. Scripts rarely know overlay ids up
/// front, so they can point at the selection or by position instead.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverlayTarget {
    #[default]
    Selected,
    Latest,
    Index(usize),
    Id(Uuid),
}

impl fmt::Display for OverlayTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayTarget::Selected => write!(f, "the selected overlay"),
            OverlayTarget::Latest => write!(f, "the latest overlay"),
            OverlayTarget::Index(i) => write!(f, "overlay #{}", i),
            OverlayTarget::Id(id) => write!(f, "overlay {}", id),
        }
    }
}

/// Fields changed in the text editor panel. Unset fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OverlayEdit {
    pub text: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<u32>,
    pub font_family: Option<String>,
    pub start_secs: Option<f64>,
    pub end_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    SelectClip {
        name: String,
        mime_type: String,
    },
    MetadataLoaded {
        duration_secs: f64,
    },
    GrabTrimHandle {
        handle: TrimHandle,
    },
    /// Pointer moved anywhere on the page.
    PointerMove {
        x: f64,
        y: f64,
    },
    /// Pointer released anywhere on the page.
    PointerUp,
    OverlayPointerDown {
        #[serde(default)]
        target: OverlayTarget,
        x: f64,
        y: f64,
        /// Rendered overlay box; estimated from the layout when absent.
        #[serde(default)]
        rect: Option<Rect>,
    },
    AddText,
    SelectText {
        #[serde(default)]
        target: OverlayTarget,
    },
    Deselect,
    SaveText {
        #[serde(default)]
        target: OverlayTarget,
        #[serde(default)]
        edit: OverlayEdit,
    },
    DeleteText {
        #[serde(default)]
        target: OverlayTarget,
    },
    SelectFilter {
        filter: FilterTag,
    },
    Undo,
    Redo,
    Next,
    Back,
    SetCaption {
        caption: String,
    },
    Post,
    CancelUpload,
    Cancel,
}

impl EditorEvent {
    /// Continuous input that fires on every pointer move.
    pub fn is_continuous(&self) -> bool {
        matches!(self, EditorEvent::PointerMove { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_events() {
        let json = r#"[
            { "type": "select_clip", "name": "a.mp4", "mime_type": "video/mp4" },
            { "type": "metadata_loaded", "duration_secs": 12.5 },
            { "type": "grab_trim_handle", "handle": "Start" },
            { "type": "pointer_move", "x": 10, "y": 0 },
            { "type": "pointer_up" },
            { "type": "overlay_pointer_down", "target": "latest", "x": 180, "y": 320 },
            { "type": "save_text", "target": { "index": 0 }, "edit": { "text": "Hi", "end_secs": 4.0 } },
            { "type": "select_filter", "filter": "Sunset" }
        ]"#;
        let events: Vec<EditorEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events.len(), 8);
        assert_eq!(
            events[1],
            EditorEvent::MetadataLoaded {
                duration_secs: 12.5
            }
        );
        assert!(events[3].is_continuous());
        assert!(matches!(
            events[5],
            EditorEvent::OverlayPointerDown {
                target: OverlayTarget::Latest,
                rect: None,
                ..
            }
        ));
        match &events[6] {
            EditorEvent::SaveText { target, edit } => {
                assert_eq!(*target, OverlayTarget::Index(0));
                assert_eq!(edit.text.as_deref(), Some("Hi"));
                assert_eq!(edit.color, None);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn target_defaults_to_selection() {
        let event: EditorEvent = serde_json::from_str(r#"{ "type": "delete_text" }"#).unwrap();
        assert_eq!(
            event,
            EditorEvent::DeleteText {
                target: OverlayTarget::Selected
            }
        );
    }
}
