use crate::config::EditorConfig;
use crate::types::*;
use uuid::Uuid;

/// Create a new overlay centered in the frame, visible from `at_time` for the
/// configured window or until the clip ends, whichever comes first.
pub fn create_overlay(at_time: TimeUs, clip_duration: TimeUs, config: &EditorConfig) -> TextOverlay {
    let style = &config.overlay_style;
    let start_time = at_time.clamp(TimeUs::ZERO, clip_duration);
    TextOverlay {
        id: Uuid::new_v4(),
        text: style.text.clone(),
        color: style.color.clone(),
        font_size: style.font_size,
        font_family: style.font_family.clone(),
        position: Position::CENTER,
        start_time,
        end_time: (start_time + config.overlay_window).min(clip_duration),
    }
}

/// Inclusive at both ends.
pub fn is_visible(overlay: &TextOverlay, time: TimeUs) -> bool {
    overlay.start_time <= time && time <= overlay.end_time
}

/// Overlays showing at `time`, in insertion order.
pub fn visible_overlays(overlays: &[TextOverlay], time: TimeUs) -> Vec<&TextOverlay> {
    overlays.iter().filter(|o| is_visible(o, time)).collect()
}

/// Bring a caller-supplied overlay back inside the clip so snapshots stay
/// consistent: window within `[0, duration]` and non-empty, font size within
/// the configured bounds, position within the frame.
pub fn normalize(mut overlay: TextOverlay, duration: TimeUs, config: &EditorConfig) -> TextOverlay {
    let min_len = config.min_overlay_length.min(duration);

    overlay.start_time = overlay.start_time.clamp(TimeUs::ZERO, duration);
    overlay.end_time = overlay.end_time.clamp(TimeUs::ZERO, duration);
    if overlay.end_time <= overlay.start_time {
        overlay.end_time = (overlay.start_time + min_len).min(duration);
        if overlay.end_time - overlay.start_time < min_len {
            overlay.start_time = overlay.end_time - min_len;
        }
    }

    overlay.font_size = overlay
        .font_size
        .clamp(config.min_font_size, config.max_font_size);
    overlay.position = overlay.position.clamped();
    overlay
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> TimeUs {
        TimeUs::from_seconds(s)
    }

    #[test]
    fn create_gets_three_second_window() {
        let config = EditorConfig::default();
        let o = create_overlay(secs(4.0), secs(10.0), &config);
        assert_eq!(o.start_time, secs(4.0));
        assert_eq!(o.end_time, secs(7.0));
        assert_eq!(o.text, "Sample Text");
        assert_eq!(o.color, "#FFFFFF");
        assert_eq!(o.font_size, 28);
        assert_eq!(o.font_family, "Nunito");
        assert_eq!(o.position, Position::CENTER);
    }

    #[test]
    fn create_near_end_clamps_to_duration() {
        let config = EditorConfig::default();
        let o = create_overlay(secs(9.0), secs(10.0), &config);
        assert_eq!(o.start_time, secs(9.0));
        assert_eq!(o.end_time, secs(10.0));
    }

    #[test]
    fn create_on_huge_duration_does_not_overflow() {
        let config = EditorConfig::default();
        let duration = TimeUs::from_seconds(f64::MAX);
        let o = create_overlay(duration, duration, &config);
        assert_eq!(o.start_time, duration);
        assert_eq!(o.end_time, duration);
    }

    #[test]
    fn create_gives_unique_ids() {
        let config = EditorConfig::default();
        let a = create_overlay(secs(0.0), secs(10.0), &config);
        let b = create_overlay(secs(0.0), secs(10.0), &config);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn visibility_is_inclusive() {
        let config = EditorConfig::default();
        let o = create_overlay(secs(4.0), secs(10.0), &config);
        assert!(!is_visible(&o, secs(3.999)));
        assert!(is_visible(&o, secs(4.0)));
        assert!(is_visible(&o, secs(5.5)));
        assert!(is_visible(&o, secs(7.0)));
        assert!(!is_visible(&o, secs(7.001)));
    }

    #[test]
    fn visible_overlays_keeps_order_and_filters() {
        let config = EditorConfig::default();
        let a = create_overlay(secs(0.0), secs(10.0), &config);
        let b = create_overlay(secs(2.0), secs(10.0), &config);
        let c = create_overlay(secs(8.0), secs(10.0), &config);
        let overlays = vec![a.clone(), b.clone(), c];

        let visible = visible_overlays(&overlays, secs(2.5));
        let ids: Vec<_> = visible.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert!(visible_overlays(&overlays, secs(7.5)).is_empty());
    }

    #[test]
    fn normalize_clamps_window_and_style() {
        let config = EditorConfig::default();
        let mut o = create_overlay(secs(1.0), secs(10.0), &config);
        o.start_time = secs(-2.0);
        o.end_time = secs(14.0);
        o.font_size = 200;
        o.position = Position { x: 120.0, y: -5.0 };

        let n = normalize(o, secs(10.0), &config);
        assert_eq!(n.start_time, TimeUs::ZERO);
        assert_eq!(n.end_time, secs(10.0));
        assert_eq!(n.font_size, 72);
        assert_eq!(n.position, Position { x: 100.0, y: 0.0 });
    }

    #[test]
    fn normalize_repairs_inverted_window() {
        let config = EditorConfig::default();
        let mut o = create_overlay(secs(1.0), secs(10.0), &config);
        o.start_time = secs(5.0);
        o.end_time = secs(3.0);
        let n = normalize(o, secs(10.0), &config);
        assert_eq!(n.start_time, secs(5.0));
        assert_eq!(n.end_time, secs(5.1));

        let mut o = create_overlay(secs(1.0), secs(10.0), &config);
        o.start_time = secs(10.0);
        o.end_time = secs(10.0);
        let n = normalize(o, secs(10.0), &config);
        assert_eq!(n.start_time, secs(9.9));
        assert_eq!(n.end_time, secs(10.0));
    }
}
