// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation clock: global playback time and transport state.
//!
//! The clock owns the event-relative playback time shared by every entity.
//! It is advanced exactly once per render frame via [`AnimationClock::tick`]
//! and mutated otherwise only by the transport commands
//! (play/pause/stop/seek/step).

use crate::event::Event;

/// Default frame rate assumed by frame stepping
pub const DEFAULT_FRAME_RATE: f32 = 30.0;

/// Transport state of the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    /// Not playing, time reset to zero
    #[default]
    Stopped,
    /// Advancing on every tick
    Playing,
    /// Not playing, time retained
    Paused,
    /// Automatically paused at a phase boundary, time pinned to it
    PhaseHeld,
}

impl ClockState {
    /// Check if the clock advances on tick
    pub fn is_playing(&self) -> bool {
        matches!(self, ClockState::Playing)
    }
}

/// Discrete playback speed multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackSpeed {
    /// 0.25x
    Quarter,
    /// 0.5x
    Half,
    /// 1x
    #[default]
    Normal,
    /// 1.5x
    OneAndHalf,
    /// 2x
    Double,
}

impl PlaybackSpeed {
    /// Get the time multiplier
    pub fn multiplier(&self) -> f32 {
        match self {
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
        }
    }

    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Quarter => "0.25x",
            Self::Half => "0.5x",
            Self::Normal => "1x",
            Self::OneAndHalf => "1.5x",
            Self::Double => "2x",
        }
    }

    /// Get all available speeds
    pub fn all() -> &'static [PlaybackSpeed] {
        &[
            Self::Quarter,
            Self::Half,
            Self::Normal,
            Self::OneAndHalf,
            Self::Double,
        ]
    }
}

/// Boundary condition reached by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTransition {
    /// An auto-pause phase boundary was crossed; time is pinned to it
    HeldAtPhase(usize),
    /// The end of the event was reached with looping on; time wrapped
    Looped,
    /// The end of the event was reached; clock is paused at the duration
    Finished,
}

/// Global playback clock for the active event
#[derive(Debug, Clone)]
pub struct AnimationClock {
    /// Current global time in seconds
    time: f32,
    /// Transport state
    state: ClockState,
    /// Speed multiplier applied to tick deltas
    speed: PlaybackSpeed,
    /// Wrap around at the end of the event
    looping: bool,
    /// Index of the phase the clock is held at, if any
    held_phase: Option<usize>,
    /// Frame rate assumed by `step_forward`/`step_backward`
    frame_rate: f32,
}

impl AnimationClock {
    /// Create a stopped clock
    pub fn new() -> Self {
        Self {
            time: 0.0,
            state: ClockState::Stopped,
            speed: PlaybackSpeed::Normal,
            looping: false,
            held_phase: None,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }

    /// Reset to the stopped initial state, keeping frame rate
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.state = ClockState::Stopped;
        self.speed = PlaybackSpeed::Normal;
        self.looping = false;
        self.held_phase = None;
    }

    /// Current global time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current transport state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Check if the clock advances on tick
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Index of the phase the clock is held at, if any
    pub fn held_phase(&self) -> Option<usize> {
        self.held_phase
    }

    /// Current speed setting
    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Set the speed multiplier
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
    }

    /// Whether playback wraps at the end of the event
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Enable or disable looping
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Frame rate assumed by frame stepping
    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Set the frame rate assumed by frame stepping
    pub fn set_frame_rate(&mut self, frame_rate: f32) {
        if frame_rate > 0.0 {
            self.frame_rate = frame_rate;
        }
    }

    /// Normalized scrubber position in `[0, 1]`
    pub fn progress(&self, duration: f32) -> f32 {
        if duration <= 0.0 {
            0.0
        } else {
            (self.time / duration).clamp(0.0, 1.0)
        }
    }

    /// Start or resume playing from the current time
    pub fn play(&mut self) {
        if self.state != ClockState::Playing {
            self.state = ClockState::Playing;
            self.held_phase = None;
            tracing::info!(time = self.time, "playback started");
        }
    }

    /// Pause, retaining the current time
    pub fn pause(&mut self) {
        if self.state == ClockState::Playing {
            self.state = ClockState::Paused;
            tracing::info!(time = self.time, "playback paused");
        }
    }

    /// Toggle between playing and not playing
    pub fn toggle_playback(&mut self) {
        if self.state == ClockState::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Stop and reset to the initial transport state
    ///
    /// Stopping resets time, speed, and looping, not just the play state.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.time = 0.0;
        self.speed = PlaybackSpeed::Normal;
        self.looping = false;
        self.held_phase = None;
        tracing::info!("playback stopped");
    }

    /// Jump to a time, clamped to `[0, duration]`
    ///
    /// Does not start or stop playback. A phase hold is released into the
    /// plain paused state, since the held time no longer applies.
    pub fn seek(&mut self, time: f32, duration: f32) {
        self.time = time.clamp(0.0, duration.max(0.0));
        if self.state == ClockState::PhaseHeld {
            self.state = ClockState::Paused;
            self.held_phase = None;
        }
        tracing::debug!(time = self.time, "seek");
    }

    /// Seek forward by `frames` frame-durations
    pub fn step_forward(&mut self, frames: u32, duration: f32) {
        self.seek(self.time + frames as f32 / self.frame_rate, duration);
    }

    /// Seek backward by `frames` frame-durations
    pub fn step_backward(&mut self, frames: u32, duration: f32) {
        self.seek(self.time - frames as f32 / self.frame_rate, duration);
    }

    /// Release a phase hold and resume playing from the held time
    ///
    /// Time stays exactly at the boundary; the next tick moves it forward.
    pub fn continue_past_phase(&mut self) {
        if self.state == ClockState::PhaseHeld {
            self.state = ClockState::Playing;
            self.held_phase = None;
            tracing::info!(time = self.time, "resumed past phase boundary");
        }
    }

    /// Advance time by a frame delta while playing
    ///
    /// Crossing an auto-pause phase boundary pins the time exactly at that
    /// boundary and holds; the overshoot is discarded. Reaching the end of
    /// the event wraps when looping, otherwise pauses at the duration.
    pub fn tick(&mut self, delta_seconds: f32, event: &Event) -> Option<ClockTransition> {
        if self.state != ClockState::Playing {
            return None;
        }
        let start = self.time;
        let target = start + delta_seconds * self.speed.multiplier();

        for (index, phase) in event.phases().iter().enumerate() {
            if phase.auto_pause && start < phase.start_time && target >= phase.start_time {
                self.time = phase.start_time;
                self.state = ClockState::PhaseHeld;
                self.held_phase = Some(index);
                tracing::info!(phase = index, time = self.time, "held at phase boundary");
                return Some(ClockTransition::HeldAtPhase(index));
            }
        }

        let duration = event.duration();
        if target >= duration {
            if self.looping && duration > 0.0 {
                self.time = target % duration;
                tracing::debug!(time = self.time, "looped");
                return Some(ClockTransition::Looped);
            }
            self.time = duration;
            self.state = ClockState::Paused;
            tracing::info!(time = self.time, "reached end of event");
            return Some(ClockTransition::Finished);
        }

        self.time = target;
        None
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new()
    }
}
