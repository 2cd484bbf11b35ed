// SPDX-License-Identifier: MIT OR Apache-2.0
//! POV chase-camera controller.
//!
//! Derives a smoothed first-person camera pose from the target entity's
//! interpolated position and velocity: the camera trails the entity by a
//! configurable distance and height and looks a fixed lead distance ahead
//! of it, both smoothed exponentially across frames.

use crate::math::{look_rotation, quat_slerp, IDENTITY, UP};
use coachboard_playback::math::{self, DIRECTION_DEAD_ZONE};
use coachboard_playback::{EntityId, Event};

/// Per-frame interpolation factor for position and orientation smoothing
const SMOOTHING: f32 = 0.1;

/// How far ahead of the entity the camera looks, in board units
const LOOK_AHEAD: f32 = 5.0;

/// Vertical offset of the look-at point above the entity
const EYE_HEIGHT: f32 = 1.0;

/// Horizontal forward used before any movement has been observed
const DEFAULT_FORWARD: [f32; 2] = [-1.0, 0.0];

/// A camera position and orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position
    pub position: [f32; 3],
    /// Camera orientation quaternion (`-Z` forward, `+Y` up)
    pub orientation: [f32; 4],
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            orientation: IDENTITY,
        }
    }
}

/// UI-session settings for the POV camera
///
/// Ephemeral view state; not part of the event and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PovSettings {
    /// Whether the POV view is active
    pub enabled: bool,
    /// Entity the camera follows
    pub target: Option<EntityId>,
    /// Camera height above the entity
    pub height: f32,
    /// Trailing distance behind the entity
    pub distance: f32,
}

impl Default for PovSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            target: None,
            height: 1.8,
            distance: 3.0,
        }
    }
}

/// Outcome of a per-frame POV update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PovUpdate {
    /// The camera pose was advanced toward the target
    Updated,
    /// No usable target this frame; the camera holds its last pose
    ///
    /// Expected transient condition: POV disabled, no target selected, the
    /// target has no path in the event, or it is not yet active.
    Unavailable,
}

/// Chase-camera controller for one POV view
///
/// Retains the previous pose and the last observed movement direction; both
/// feed the next frame's smoothing.
#[derive(Debug, Clone)]
pub struct PovController {
    /// View settings, owned by the UI session
    pub settings: PovSettings,
    /// Smoothed camera pose carried across frames
    pose: CameraPose,
    /// Last observed horizontal movement direction (unit xz vector)
    forward: [f32; 2],
}

impl PovController {
    /// Create a controller with default settings
    pub fn new() -> Self {
        Self {
            settings: PovSettings::default(),
            pose: CameraPose::default(),
            forward: DEFAULT_FORWARD,
        }
    }

    /// Current camera pose
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Last observed horizontal movement direction
    pub fn forward(&self) -> [f32; 2] {
        self.forward
    }

    /// Enable POV and follow an entity
    pub fn follow(&mut self, target: EntityId) {
        self.settings.enabled = true;
        self.settings.target = Some(target);
        tracing::info!(?target, "pov camera following entity");
    }

    /// Disable POV, keeping the last pose
    pub fn release(&mut self) {
        self.settings.enabled = false;
        self.settings.target = None;
    }

    /// Reset retained smoothing state to the initial pose and forward
    pub fn reset(&mut self) {
        self.pose = CameraPose::default();
        self.forward = DEFAULT_FORWARD;
    }

    /// Advance the camera one frame toward the target entity
    ///
    /// Reads the target's interpolated position and velocity at
    /// `global_time` and smooths the pose toward the derived chase position
    /// and look-at orientation. Returns [`PovUpdate::Unavailable`] and holds
    /// the pose when there is no usable target this frame.
    pub fn update(&mut self, event: &Event, global_time: f32) -> PovUpdate {
        if !self.settings.enabled {
            return PovUpdate::Unavailable;
        }
        let Some(target) = self.settings.target else {
            return PovUpdate::Unavailable;
        };
        let Some(timed) = event.path_for(target) else {
            tracing::debug!(?target, "pov target has no path in the active event");
            return PovUpdate::Unavailable;
        };
        if !timed.is_active(global_time) {
            return PovUpdate::Unavailable;
        }

        let local = timed.local_time(global_time);
        let position = timed.path.position_at(local);
        let velocity = timed.path.velocity_at(local);

        // Update the movement direction only outside the dead-zone, so a
        // stationary entity keeps its last heading instead of jittering
        let speed = math::horizontal_length(velocity);
        if speed > DIRECTION_DEAD_ZONE {
            self.forward = [velocity[0] / speed, velocity[2] / speed];
        }
        let forward = [self.forward[0], 0.0, self.forward[1]];

        let desired_position = math::add(
            math::sub(position, math::scale(forward, self.settings.distance)),
            [0.0, self.settings.height, 0.0],
        );
        let look_at = math::add(
            math::add(position, math::scale(forward, LOOK_AHEAD)),
            [0.0, EYE_HEIGHT, 0.0],
        );

        let new_position = math::lerp_vec3(self.pose.position, desired_position, SMOOTHING);
        let direction = math::normalize(math::sub(look_at, new_position));
        let target_orientation = look_rotation(direction, UP);
        let new_orientation = quat_slerp(self.pose.orientation, target_orientation, SMOOTHING);

        self.pose = CameraPose {
            position: new_position,
            orientation: new_orientation,
        };
        PovUpdate::Updated
    }
}

impl Default for PovController {
    fn default() -> Self {
        Self::new()
    }
}
