use crate::config::EditorConfig;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    InProgress(u32),
    Complete,
}

/// Cosmetic progress counter for a submission in flight. Holds no edit state,
/// so dropping it mid-way leaves nothing half-submitted.
#[derive(Debug, Clone)]
pub struct UploadSession {
    progress: u32,
    step_min: u32,
    step_max: u32,
}

impl UploadSession {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            progress: 0,
            step_min: config.upload_step_min,
            step_max: config.upload_step_max.max(config.upload_step_min + 1),
        }
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn advance_by(&mut self, step: u32) -> UploadStatus {
        self.progress = self.progress.saturating_add(step).min(100);
        if self.progress >= 100 {
            UploadStatus::Complete
        } else {
            UploadStatus::InProgress(self.progress)
        }
    }

    /// Advance by a random step from the configured range.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> UploadStatus {
        let step = rng.gen_range(self.step_min..self.step_max);
        self.advance_by(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn progress_caps_at_100() {
        let mut upload = UploadSession::new(&EditorConfig::default());
        assert_eq!(upload.advance_by(60), UploadStatus::InProgress(60));
        assert_eq!(upload.advance_by(60), UploadStatus::Complete);
        assert_eq!(upload.progress(), 100);
    }

    #[test]
    fn oversized_step_completes() {
        let mut upload = UploadSession::new(&EditorConfig::default());
        upload.advance_by(50);
        assert_eq!(upload.advance_by(u32::MAX), UploadStatus::Complete);
        assert_eq!(upload.progress(), 100);
    }

    #[test]
    fn random_steps_stay_in_range_and_finish() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut upload = UploadSession::new(&EditorConfig::default());
        let mut ticks = 0;
        let mut last = 0;
        loop {
            ticks += 1;
            match upload.advance(&mut rng) {
                UploadStatus::InProgress(p) => {
                    assert!((5..15).contains(&(p - last)));
                    last = p;
                }
                UploadStatus::Complete => break,
            }
        }
        // 100 / 14 rounds up to 8, 100 / 5 is 20
        assert!((8..=20).contains(&ticks));
    }
}
