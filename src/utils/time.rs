#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// Wall clock anchored at scene construction.
///
/// Frame times are passed in by the caller instead of sampled here, so a
/// scene's animation is a pure function of the instants it is fed.
#[derive(Debug, Clone, Copy)]
pub struct SceneClock {
    start_time: Instant,
    last_update: Instant,
    /// Total elapsed time since construction
    pub elapsed: Duration,
}

impl SceneClock {
    /// Creates a clock whose origin is `start`.
    #[must_use]
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start_time: start,
            last_update: start,
            elapsed: Duration::ZERO,
        }
    }

    /// Advances the clock to `now`. Instants earlier than the last tick are
    /// clamped so elapsed time never runs backwards.
    pub fn tick(&mut self, now: Instant) {
        let now = now.max(self.last_update);
        self.elapsed = now - self.start_time;
        self.last_update = now;
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}
