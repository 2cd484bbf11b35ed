// SPDX-License-Identifier: MIT OR Apache-2.0
//! First-person chase camera for CoachBoard scenario playback.
//!
//! This crate derives a smooth point-of-view camera from a followed
//! entity's movement:
//! - Forward direction from the entity's instantaneous velocity, with a
//!   dead-zone so a stationary entity keeps its heading
//! - Trailing position behind and above the entity
//! - Exponentially smoothed position and orientation across frames
//!
//! The controller only consumes the playback crate's interpolator contract;
//! it has no knowledge of path internals.

pub mod camera;
pub mod math;

pub use camera::{CameraPose, PovController, PovSettings, PovUpdate};
