// Runtime playback handle for a single clip

use crate::core::math::{clamp, fade_weight, wrap_time};

use super::clip::{ClipResource, LoopMode};

/// Something an action reported while being advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    /// A non-looping (or repetition-limited) action reached its end
    Finished,
}

/// Linear weight ramp applied on top of the action's base weight
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    /// Stop the action once the ramp completes (fade-outs)
    stop_on_end: bool,
}

/// Playback state of one clip on one character
///
/// Created once per clip by the mixer and reused for every play; `reset`
/// rewinds it, `stop` takes it out of the blend entirely.
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: ClipResource,
    time: f32,
    /// Base weight set by the owner
    weight: f32,
    time_scale: f32,
    loop_mode: LoopMode,
    clamp_when_finished: bool,
    loop_count: u32,
    /// Whether the mixer should advance this action
    running: bool,
    /// Disabled actions contribute nothing to the pose
    enabled: bool,
    /// Paused actions hold their current pose (clamped finish)
    paused: bool,
    fade: Option<Fade>,
    fade_factor: f32,
    /// Latched once a finish event was emitted, cleared by `reset`
    finished: bool,
}

impl ClipAction {
    /// Bind a new action to a clip, using the clip's authored loop mode
    pub fn new(clip: ClipResource) -> Self {
        let loop_mode = clip.default_loop;
        Self {
            clip,
            time: 0.0,
            weight: 1.0,
            time_scale: 1.0,
            loop_mode,
            clamp_when_finished: false,
            loop_count: 0,
            running: false,
            enabled: true,
            paused: false,
            fade: None,
            fade_factor: 1.0,
            finished: false,
        }
    }

    /// Rewind to the start and clear any fade, pause or finished state
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.loop_count = 0;
        self.enabled = true;
        self.paused = false;
        self.fade = None;
        self.fade_factor = 1.0;
        self.finished = false;
        self
    }

    /// Schedule the action for playback
    pub fn play(&mut self) -> &mut Self {
        self.running = true;
        self
    }

    /// Stop playback immediately; the action's blended weight drops to zero
    pub fn stop(&mut self) -> &mut Self {
        self.running = false;
        self.reset()
    }

    pub fn set_effective_weight(&mut self, weight: f32) -> &mut Self {
        self.weight = weight.max(0.0);
        self
    }

    /// Set playback speed (1.0 = normal, negative values are clamped to 0)
    pub fn set_effective_time_scale(&mut self, time_scale: f32) -> &mut Self {
        self.time_scale = time_scale.max(0.0);
        self
    }

    pub fn set_loop(&mut self, loop_mode: LoopMode) -> &mut Self {
        self.loop_mode = loop_mode;
        self
    }

    pub fn set_clamp_when_finished(&mut self, clamp: bool) -> &mut Self {
        self.clamp_when_finished = clamp;
        self
    }

    /// Ramp the fade factor from 0 to 1 over `duration` seconds
    ///
    /// The ramp is applied from the next tick on; until then the action
    /// reports the weight it already had.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        if duration <= 0.0 {
            self.fade = None;
            self.fade_factor = 1.0;
        } else {
            self.fade = Some(Fade {
                from: 0.0,
                to: 1.0,
                elapsed: 0.0,
                duration,
                stop_on_end: false,
            });
        }
        self
    }

    /// Ramp the fade factor from its current value to 0, then stop
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        if duration <= 0.0 {
            return self.stop();
        }
        self.fade = Some(Fade {
            from: self.fade_factor,
            to: 0.0,
            elapsed: 0.0,
            duration,
            stop_on_end: true,
        });
        self
    }

    /// Advance by `dt` seconds. Only called by the mixer, with `dt > 0`.
    pub(crate) fn tick(&mut self, dt: f32) -> Option<ActionEvent> {
        if !self.running {
            return None;
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            self.fade_factor = fade_weight(fade.from, fade.to, fade.elapsed, fade.duration);
            if fade.elapsed >= fade.duration {
                let stop_on_end = fade.stop_on_end;
                self.fade = None;
                if stop_on_end {
                    self.stop();
                    return None;
                }
            }
        }

        if self.paused || !self.enabled {
            return None;
        }

        self.time += dt * self.time_scale;
        let duration = self.clip.duration;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    return self.finish();
                }
            }
            LoopMode::Repeat { repetitions } => {
                let (wrapped, cycles) = wrap_time(self.time, duration);
                self.loop_count = self.loop_count.saturating_add(cycles);
                match repetitions {
                    Some(limit) if self.loop_count >= limit => return self.finish(),
                    _ => self.time = wrapped,
                }
            }
        }

        None
    }

    fn finish(&mut self) -> Option<ActionEvent> {
        self.time = self.clip.duration;
        if self.clamp_when_finished {
            self.paused = true;
        } else {
            self.enabled = false;
        }

        if self.finished {
            return None;
        }
        self.finished = true;
        Some(ActionEvent::Finished)
    }

    /// Weight this action currently contributes to the blend
    pub fn weight(&self) -> f32 {
        if self.running && self.enabled {
            self.weight * clamp(self.fade_factor, 0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Base weight, ignoring fades
    pub fn effective_weight(&self) -> f32 {
        self.weight
    }

    pub fn effective_time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn clip(&self) -> &ClipResource {
        &self.clip
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn clamp_when_finished(&self) -> bool {
        self.clamp_when_finished
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
