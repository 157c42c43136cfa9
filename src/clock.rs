//! Frame timing: elapsed time since start, per-frame delta and FPS logging.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames averaged for the FPS report
const FPS_WINDOW: usize = 60;

/// Interval between FPS log lines
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Timing of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started (monotonic, non-negative)
    pub elapsed: f32,

    /// Seconds since the previous frame
    pub delta: f32,
}

/// Monotonic frame clock owned by the render loop
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    last_report: Instant,
    frame_times: VecDeque<Duration>,
    min_fps: f32,
    max_fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            last_report: now,
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
            min_fps: f32::MAX,
            max_fps: 0.0,
        }
    }

    /// Advance to a new frame
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        // Instant is monotonic, but guard against a caller-supplied earlier instant
        let frame_time = now.saturating_duration_since(self.last_frame);
        self.last_frame = self.last_frame.max(now);

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > FPS_WINDOW {
            self.frame_times.pop_front();
        }

        let fps = self.average_fps();
        if fps > 0.0 {
            self.min_fps = self.min_fps.min(fps);
            self.max_fps = self.max_fps.max(fps);
        }

        if now.saturating_duration_since(self.last_report) >= REPORT_INTERVAL {
            log::debug!(
                "FPS - Min: {:.1}, Avg: {:.1}, Max: {:.1}",
                self.min_fps,
                fps,
                self.max_fps
            );
            self.last_report = now;
        }

        FrameTime {
            elapsed: self.last_frame.duration_since(self.start).as_secs_f32(),
            delta: frame_time.as_secs_f32(),
        }
    }

    /// Average frames per second over the recent window
    pub fn average_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total.as_secs_f32() / self.frame_times.len() as f32;

        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
