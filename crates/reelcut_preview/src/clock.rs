use reelcut_core::playback::MediaHandle;
use reelcut_core::TimeUs;
use tokio::time::Instant;

/// A media clock with no media behind it. Position advances with tokio time
/// while playing, so paused-time tests can drive it deterministically.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    base: TimeUs,
    anchor: Instant,
    playing: bool,
    seek_count: usize,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self {
            base: TimeUs::ZERO,
            anchor: Instant::now(),
            playing: false,
            seek_count: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn seek_count(&self) -> usize {
        self.seek_count
    }
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaHandle for SimulatedClock {
    fn current_time(&self) -> TimeUs {
        if self.playing {
            let elapsed = self.anchor.elapsed().as_micros() as i64;
            self.base + TimeUs(elapsed)
        } else {
            self.base
        }
    }

    fn seek(&mut self, time: TimeUs) {
        self.base = time;
        self.anchor = Instant::now();
        self.seek_count += 1;
    }

    fn play(&mut self) {
        if !self.playing {
            self.anchor = Instant::now();
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.base = self.current_time();
            self.playing = false;
        }
    }
}
