use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TimeUs
// ---------------------------------------------------------------------------

/// A point or span on the clip timeline, in microseconds. Arithmetic
/// saturates at the `i64` bounds.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct TimeUs(pub i64);

impl TimeUs {
    pub const ZERO: Self = Self(0);

    pub fn from_seconds(s: f64) -> Self {
        Self((s * 1_000_000.0).round() as i64)
    }

    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms * 1_000)
    }
}

impl Add for TimeUs {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for TimeUs {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for TimeUs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_seconds())
    }
}

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

/// Handle to the media being edited. The engine never reads its bytes; the
/// duration arrives later from the clip source once metadata resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub id: Uuid,
    pub name: String,
    pub mime_type: String,
    pub duration: Option<TimeUs>,
}

impl Clip {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mime_type: mime_type.into(),
            duration: None,
        }
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Overlay center in percent of the rendered frame, origin top-left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const CENTER: Self = Self { x: 50.0, y: 50.0 };

    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 100.0),
            y: self.y.clamp(0.0, 100.0),
        }
    }
}

// ---------------------------------------------------------------------------
// TextOverlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextOverlay {
    pub id: Uuid,
    pub text: String,
    pub color: String,
    pub font_size: u32,
    pub font_family: String,
    pub position: Position,
    pub start_time: TimeUs,
    pub end_time: TimeUs,
}

// ---------------------------------------------------------------------------
// TrimWindow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrimWindow {
    pub start_time: TimeUs,
    pub end_time: TimeUs,
}

impl TrimWindow {
    /// The whole clip, which is where every editing pass starts.
    pub fn full(duration: TimeUs) -> Self {
        Self {
            start_time: TimeUs::ZERO,
            end_time: duration,
        }
    }

    pub fn length(&self) -> TimeUs {
        self.end_time - self.start_time
    }
}

// ---------------------------------------------------------------------------
// FilterTag
// ---------------------------------------------------------------------------

/// Visual style preset. Opaque to the engine; the renderer owns the look.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FilterTag {
    #[default]
    None,
    Classic,
    Sunset,
    Techno,
    Vivid,
    Muted,
}

impl FilterTag {
    pub const ALL: [FilterTag; 6] = [
        FilterTag::None,
        FilterTag::Classic,
        FilterTag::Sunset,
        FilterTag::Techno,
        FilterTag::Vivid,
        FilterTag::Muted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterTag::None => "None",
            FilterTag::Classic => "Classic",
            FilterTag::Sunset => "Sunset",
            FilterTag::Techno => "Techno",
            FilterTag::Vivid => "Vivid",
            FilterTag::Muted => "Muted",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_us_add_sub() {
        let a = TimeUs(5_000_000);
        let b = TimeUs(3_000_000);
        assert_eq!(a + b, TimeUs(8_000_000));
        assert_eq!(a - b, TimeUs(2_000_000));
    }

    #[test]
    fn time_us_arithmetic_saturates() {
        let huge = TimeUs::from_seconds(f64::MAX);
        assert_eq!(huge, TimeUs(i64::MAX));
        assert_eq!(huge + TimeUs::from_seconds(3.0), TimeUs(i64::MAX));
        assert_eq!(TimeUs(i64::MIN) - TimeUs(1), TimeUs(i64::MIN));
    }

    #[test]
    fn time_us_from_seconds_rounds() {
        assert_eq!(TimeUs::from_seconds(2.5), TimeUs(2_500_000));
        // 0.62 * 10.0 is slightly above 6.2 in binary floating point
        assert_eq!(TimeUs::from_seconds(0.62 * 10.0), TimeUs(6_200_000));
        assert_eq!(TimeUs::from_seconds(0.29 * 10.0), TimeUs(2_900_000));
        assert!((TimeUs(2_500_000).as_seconds() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn time_us_display() {
        assert_eq!(TimeUs(0).to_string(), "0.000s");
        assert_eq!(TimeUs(6_200_000).to_string(), "6.200s");
    }

    #[test]
    fn clip_mime_check() {
        assert!(Clip::new("a.mp4", "video/mp4").is_video());
        assert!(!Clip::new("a.png", "image/png").is_video());
        assert!(Clip::new("a.mp4", "video/mp4").duration.is_none());
    }

    #[test]
    fn position_clamped() {
        let p = Position { x: -20.0, y: 140.0 }.clamped();
        assert_eq!(p, Position { x: 0.0, y: 100.0 });
        assert_eq!(Position::CENTER.clamped(), Position::CENTER);
    }

    #[test]
    fn trim_window_full_and_length() {
        let w = TrimWindow::full(TimeUs::from_seconds(10.0));
        assert_eq!(w.start_time, TimeUs::ZERO);
        assert_eq!(w.length(), TimeUs(10_000_000));
    }

    #[test]
    fn filter_tags_have_distinct_names() {
        let mut names: Vec<_> = FilterTag::ALL.iter().map(|f| f.name()).collect();
        names.dedup();
        assert_eq!(names.len(), 6);
        assert_eq!(FilterTag::default(), FilterTag::None);
    }

    #[test]
    fn serde_roundtrip_overlay() {
        let overlay = TextOverlay {
            id: Uuid::new_v4(),
            text: "hi".to_string(),
            color: "#FFFFFF".to_string(),
            font_size: 28,
            font_family: "Nunito".to_string(),
            position: Position::CENTER,
            start_time: TimeUs(0),
            end_time: TimeUs(3_000_000),
        };
        let json = serde_json::to_string(&overlay).unwrap();
        let back: TextOverlay = serde_json::from_str(&json).unwrap();
        assert_eq!(overlay, back);
    }
}
