/// Frame timing for the animation update loop
///
/// Produces one variable time delta per rendered frame. Long hitches are
/// clamped so a stalled window does not fast-forward every clip at once,
/// and paused frames report a zero delta so the controller still ticks.
use std::time::{Duration, Instant};

/// Longest delta handed out for a single frame
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Frame timing state
pub struct FrameClock {
    /// Time of last frame
    last_frame_time: Instant,

    /// Time when the clock started
    start_time: Instant,

    /// Whether the game is paused
    paused: bool,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,

    /// Delta handed out for the current frame (in seconds)
    delta: f32,
}

impl FrameClock {
    /// Create a new frame clock starting now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a frame clock with an explicit start instant
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame_time: now,
            start_time: now,
            paused: false,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            current_fps: 0.0,
            delta: 0.0,
        }
    }

    /// Begin a new frame, returns the delta to advance animations by
    pub fn begin_frame(&mut self) -> f32 {
        self.begin_frame_at(Instant::now())
    }

    /// Begin a new frame observed at `now`
    pub fn begin_frame_at(&mut self, now: Instant) -> f32 {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        // Store frame time for FPS calculation
        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        // Update FPS counter every 10 frames
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        self.delta = if self.paused {
            0.0
        } else {
            frame_time.as_secs_f32().min(MAX_FRAME_DELTA)
        };
        self.delta
    }

    /// Get the delta of the current frame (in seconds)
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.last_frame_time.duration_since(self.start_time)
    }

    /// Get total number of frames begun
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Check if the clock is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause: subsequent frames report a zero delta
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Animation paused");
        }
    }

    /// Resume normal deltas
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::info!("Animation resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Update FPS calculation
    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        // Calculate average frame time
        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        // Convert to FPS
        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_creation() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.delta(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_delta_matches_frame_time() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let dt = clock.begin_frame_at(start + Duration::from_millis(16));
        assert_relative_eq!(dt, 0.016, epsilon = 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);

        let dt = clock.begin_frame_at(start + Duration::from_millis(300));
        assert_eq!(dt, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_paused_frames_have_zero_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.pause();

        let dt = clock.begin_frame_at(start + Duration::from_millis(50));
        assert_eq!(dt, 0.0);
        assert_eq!(clock.frame_count(), 1);

        clock.resume();
        let dt = clock.begin_frame_at(start + Duration::from_millis(66));
        assert_relative_eq!(dt, 0.016, epsilon = 1e-6);
    }

    #[test]
    fn test_toggle_pause() {
        let mut clock = FrameClock::new();
        clock.toggle_pause();
        assert!(clock.is_paused());
        clock.toggle_pause();
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_fps_after_ten_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        for i in 1..=10 {
            clock.begin_frame_at(start + Duration::from_millis(20 * i));
        }
        assert_relative_eq!(clock.fps(), 50.0, epsilon = 0.01);
        assert_eq!(clock.elapsed(), Duration::from_millis(200));
    }
}
