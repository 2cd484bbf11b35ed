// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scenario playback engine for CoachBoard.
//!
//! This crate drives the board's replay animation:
//! - Recorded movement paths with position/velocity interpolation
//! - Events bundling per-entity paths and phase markers
//! - A global animation clock with play/pause/stop/seek/step transport
//! - A playback engine facade producing per-frame entity poses
//!
//! ## Architecture
//!
//! The engine is frame-driven and single-threaded. Once per render frame the
//! host calls [`PlaybackEngine::tick`] with the frame delta; the clock is
//! advanced and frozen first, then every active entity is sampled against
//! the same global time. Transport state changes are queued as
//! [`PlaybackEvent`]s for the host UI to drain.

pub mod clock;
pub mod engine;
pub mod event;
pub mod math;
pub mod path;

pub use clock::{
    AnimationClock, ClockState, ClockTransition, PlaybackSpeed, DEFAULT_FRAME_RATE,
};
pub use engine::{EntityPose, PlaybackEngine, PlaybackEvent};
pub use event::{Event, EventError, EventId, Phase, PhaseId, TimedPath};
pub use path::{EntityId, EntityKind, Path, PathError, Waypoint};
