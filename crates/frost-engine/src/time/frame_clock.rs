use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Seconds since the clock was created (or last reset).
    pub media_time: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

#[derive(Debug, Clone)]
enum Source {
    Wall { origin: Instant, last: Instant },
    Fixed { step: Duration, elapsed: Duration },
}

/// Frame clock producing `FrameTime` snapshots.
///
/// The wall-clock variant clamps delta time so a stalled frame (debugger,
/// minimized window) does not make animations jump. The fixed-step variant
/// advances by exactly one step per tick and is used for offline rendering
/// and tests.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: Source,
    frame_index: u64,
    dt_max: Duration,
}

impl FrameClock {
    /// Wall-clock timing with a 250 ms delta clamp.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            source: Source::Wall { origin: now, last: now },
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    /// Deterministic timing: every tick advances media time by `step`.
    pub fn fixed(step: Duration) -> Self {
        Self {
            source: Source::Fixed { step, elapsed: Duration::ZERO },
            frame_index: 0,
            dt_max: step,
        }
    }

    /// Fixed-step clock running at `fps` frames per second.
    pub fn fixed_fps(fps: u32) -> Self {
        Self::fixed(Duration::from_secs_f64(1.0 / fps.max(1) as f64))
    }

    /// Restarts media time at zero.
    pub fn reset(&mut self) {
        self.frame_index = 0;
        match &mut self.source {
            Source::Wall { origin, last } => {
                *origin = Instant::now();
                *last = *origin;
            }
            Source::Fixed { elapsed, .. } => *elapsed = Duration::ZERO,
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let (dt, media_time) = match &mut self.source {
            Source::Wall { origin, last } => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(*last).min(self.dt_max);
                *last = now;
                (dt, now.saturating_duration_since(*origin).as_secs_f64())
            }
            Source::Fixed { step, elapsed } => {
                *elapsed += *step;
                (*step, elapsed.as_secs_f64())
            }
        };

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            media_time,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
