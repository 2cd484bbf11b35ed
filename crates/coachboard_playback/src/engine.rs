// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback engine facade.
//!
//! [`PlaybackEngine`] owns the active [`Event`] and its [`AnimationClock`]
//! and exposes the per-frame entry point [`PlaybackEngine::tick`]. Each tick
//! advances and freezes the global time, then samples every active entity,
//! so all poses produced in one frame observe the same time. State changes
//! are queued as [`PlaybackEvent`]s and drained by the host with
//! [`PlaybackEngine::take_events`].

use crate::clock::{AnimationClock, ClockState, ClockTransition, PlaybackSpeed};
use crate::event::Event;
use crate::math;
use crate::path::{EntityId, EntityKind};

/// Notification emitted by transport commands and ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// Playback started or resumed
    Started,
    /// Playback paused by the user
    Paused,
    /// Playback stopped and reset
    Stopped,
    /// Time jumped to a new position
    Seeked {
        /// The clamped target time
        time: f32,
    },
    /// Playback held automatically at a phase boundary
    PhaseHeld {
        /// Index of the phase the clock is held at
        index: usize,
    },
    /// A phase hold was released by the user
    PhaseResumed,
    /// Playback wrapped around to the start of the event
    Looped,
    /// Playback reached the end of the event and paused
    Finished,
}

/// Sampled state of one active entity for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityPose {
    /// Entity the pose belongs to
    pub entity_id: EntityId,
    /// Kind of entity
    pub kind: EntityKind,
    /// Interpolated position
    pub position: [f32; 3],
    /// Segment velocity in units/second
    pub velocity: [f32; 3],
    /// Horizontal movement direction in radians, when moving
    ///
    /// `None` while the horizontal speed is inside the dead-zone, so the
    /// rendering layer keeps the entity's previous facing.
    pub facing: Option<f32>,
}

/// Owns the active event and drives its playback
#[derive(Debug, Default)]
pub struct PlaybackEngine {
    /// Active event, if any
    event: Option<Event>,
    /// Global playback clock
    clock: AnimationClock,
    /// Notifications queued since the last drain
    pending: Vec<PlaybackEvent>,
}

impl PlaybackEngine {
    /// Create an engine with no active event
    pub fn new() -> Self {
        Self {
            event: None,
            clock: AnimationClock::new(),
            pending: Vec::new(),
        }
    }

    /// Activate an event, resetting the clock to the initial state
    pub fn set_event(&mut self, event: Event) {
        tracing::info!(name = %event.name, duration = event.duration(), "event activated");
        self.event = Some(event);
        self.clock.reset();
        self.pending.clear();
    }

    /// Deactivate the current event
    pub fn clear_event(&mut self) -> Option<Event> {
        self.clock.reset();
        self.pending.clear();
        self.event.take()
    }

    /// Get the active event
    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    /// Get the clock
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Current global time in seconds
    pub fn current_time(&self) -> f32 {
        self.clock.time()
    }

    /// Check if the clock advances on tick
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Normalized scrubber position in `[0, 1]`
    pub fn scrub_position(&self) -> f32 {
        match &self.event {
            Some(event) => self.clock.progress(event.duration()),
            None => 0.0,
        }
    }

    /// Index of the phase playback is held at, if any
    pub fn held_phase(&self) -> Option<usize> {
        self.clock.held_phase()
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        if self.event.is_none() || self.clock.is_playing() {
            return;
        }
        self.clock.play();
        self.pending.push(PlaybackEvent::Started);
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.clock.is_playing() {
            self.clock.pause();
            self.pending.push(PlaybackEvent::Paused);
        }
    }

    /// Toggle between playing and paused
    pub fn toggle_playback(&mut self) {
        if self.clock.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Stop playback and reset time to zero
    pub fn stop(&mut self) {
        if self.event.is_none() {
            return;
        }
        self.clock.stop();
        self.pending.push(PlaybackEvent::Stopped);
    }

    /// Jump to a time, clamped to the event's duration
    pub fn seek(&mut self, time: f32) {
        let Some(event) = &self.event else { return };
        self.clock.seek(time, event.duration());
        self.pending.push(PlaybackEvent::Seeked {
            time: self.clock.time(),
        });
    }

    /// Seek forward by `frames` frame-durations
    pub fn step_forward(&mut self, frames: u32) {
        let Some(event) = &self.event else { return };
        self.clock.step_forward(frames, event.duration());
        self.pending.push(PlaybackEvent::Seeked {
            time: self.clock.time(),
        });
    }

    /// Seek backward by `frames` frame-durations
    pub fn step_backward(&mut self, frames: u32) {
        let Some(event) = &self.event else { return };
        self.clock.step_backward(frames, event.duration());
        self.pending.push(PlaybackEvent::Seeked {
            time: self.clock.time(),
        });
    }

    /// Release a phase hold and resume playback
    pub fn continue_past_phase(&mut self) {
        if self.clock.state() == ClockState::PhaseHeld {
            self.clock.continue_past_phase();
            self.pending.push(PlaybackEvent::PhaseResumed);
        }
    }

    /// Set the playback speed
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.clock.set_speed(speed);
    }

    /// Enable or disable looping
    pub fn set_looping(&mut self, looping: bool) {
        self.clock.set_looping(looping);
    }

    /// Advance one frame and sample all active entities
    ///
    /// The clock is advanced and frozen before any entity is sampled, so
    /// every pose in the returned set observes the same global time.
    pub fn tick(&mut self, delta_seconds: f32) -> Vec<EntityPose> {
        let Some(event) = &self.event else {
            return Vec::new();
        };

        match self.clock.tick(delta_seconds, event) {
            Some(ClockTransition::HeldAtPhase(index)) => {
                self.pending.push(PlaybackEvent::PhaseHeld { index });
            }
            Some(ClockTransition::Looped) => self.pending.push(PlaybackEvent::Looped),
            Some(ClockTransition::Finished) => self.pending.push(PlaybackEvent::Finished),
            None => {}
        }

        Self::sample_poses(event, self.clock.time())
    }

    /// Sample poses for all entities active at a global time
    pub fn sample_poses(event: &Event, global_time: f32) -> Vec<EntityPose> {
        let mut poses = Vec::with_capacity(event.entity_count());
        for timed in event.timed_paths() {
            if !timed.is_active(global_time) {
                continue;
            }
            let local = timed.local_time(global_time);
            let position = timed.path.position_at(local);
            let velocity = timed.path.velocity_at(local);
            let facing = if math::horizontal_length(velocity) > math::DIRECTION_DEAD_ZONE {
                Some(velocity[2].atan2(velocity[0]))
            } else {
                None
            };
            poses.push(EntityPose {
                entity_id: timed.path.entity_id,
                kind: timed.path.kind,
                position,
                velocity,
                facing,
            });
        }
        poses
    }

    /// Drain the notifications queued since the last call
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending)
    }
}
