// SPDX-License-Identifier: MIT OR Apache-2.0
//! Recorded movement paths.
//!
//! A [`Path`] is one entity's recorded motion: an ordered sequence of
//! time-stamped positions captured while the user dragged the entity across
//! the board. The path answers two pure queries, position and velocity at a
//! time on its own local timeline.

use crate::math;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a board entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of entity a path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EntityKind {
    /// A player figure
    #[default]
    Player,
    /// The ball
    Ball,
    /// A static prop (cone, flag)
    Marker,
}

impl EntityKind {
    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Ball => "Ball",
            Self::Marker => "Marker",
        }
    }
}

/// One recorded (time, position) sample on a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Time in seconds on the path's local timeline
    pub time: f32,
    /// Position on the board
    pub position: [f32; 3],
}

impl Waypoint {
    /// Create a new waypoint
    pub fn new(time: f32, position: [f32; 3]) -> Self {
        Self { time, position }
    }
}

/// Validation failure for a recorded path
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// A path must contain at least one waypoint
    #[error("path has no waypoints")]
    Empty,
    /// Waypoint timestamps must be non-negative
    #[error("waypoint {index} has negative timestamp {time}")]
    NegativeTimestamp {
        /// Index of the offending waypoint
        index: usize,
        /// The rejected timestamp
        time: f32,
    },
    /// Waypoint timestamps must be non-decreasing
    #[error("waypoint {index} is earlier than its predecessor")]
    OutOfOrder {
        /// Index of the offending waypoint
        index: usize,
    },
}

/// An entity's recorded movement
///
/// Invariants (enforced at construction): at least one waypoint, timestamps
/// non-negative and non-decreasing. A single-waypoint path is a static pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    /// Entity this path moves
    pub entity_id: EntityId,
    /// Kind of entity
    pub kind: EntityKind,
    /// Waypoints ordered by time
    waypoints: Vec<Waypoint>,
}

impl Path {
    /// Create a validated path
    pub fn new(
        entity_id: EntityId,
        kind: EntityKind,
        waypoints: Vec<Waypoint>,
    ) -> Result<Self, PathError> {
        let path = Self {
            entity_id,
            kind,
            waypoints,
        };
        path.validate()?;
        Ok(path)
    }

    /// Check the path invariants
    ///
    /// Hosts that deserialize paths from storage should call this before
    /// handing them to the playback engine.
    pub fn validate(&self) -> Result<(), PathError> {
        if self.waypoints.is_empty() {
            return Err(PathError::Empty);
        }
        for (index, pair) in self.waypoints.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                return Err(PathError::OutOfOrder { index: index + 1 });
            }
        }
        if let Some(index) = self.waypoints.iter().position(|w| w.time < 0.0) {
            return Err(PathError::NegativeTimestamp {
                index,
                time: self.waypoints[index].time,
            });
        }
        Ok(())
    }

    /// Get all waypoints
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Get waypoint count
    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    /// A static pin has exactly one waypoint and never moves
    pub fn is_static(&self) -> bool {
        self.waypoints.len() == 1
    }

    /// Time of the first waypoint
    pub fn start_time(&self) -> f32 {
        self.waypoints[0].time
    }

    /// Time of the last waypoint
    pub fn end_time(&self) -> f32 {
        self.waypoints[self.waypoints.len() - 1].time
    }

    /// Duration covered by the recording
    pub fn duration(&self) -> f32 {
        self.end_time() - self.start_time()
    }

    /// Position at time `t` on the path's local timeline
    ///
    /// Clamps outside the recorded range (no extrapolation) and linearly
    /// interpolates between the bracketing waypoints inside it.
    pub fn position_at(&self, t: f32) -> [f32; 3] {
        match self.segment_at(t) {
            Segment::Before => self.waypoints[0].position,
            Segment::After => self.waypoints[self.waypoints.len() - 1].position,
            Segment::Between(i) => {
                let a = &self.waypoints[i];
                let b = &self.waypoints[i + 1];
                let dt = b.time - a.time;
                if dt <= f32::EPSILON {
                    // Zero-duration segment: jump to the later waypoint
                    return b.position;
                }
                let f = (t - a.time) / dt;
                math::lerp_vec3(a.position, b.position, f)
            }
        }
    }

    /// Velocity at time `t` in units/second
    ///
    /// The secant slope of the bracketing segment: constant within a segment
    /// and discontinuous at waypoints. Zero outside the recorded range, on
    /// zero-duration segments, and for static pins.
    pub fn velocity_at(&self, t: f32) -> [f32; 3] {
        match self.segment_at(t) {
            Segment::Before | Segment::After => [0.0, 0.0, 0.0],
            Segment::Between(i) => {
                let a = &self.waypoints[i];
                let b = &self.waypoints[i + 1];
                let dt = b.time - a.time;
                if dt <= f32::EPSILON {
                    return [0.0, 0.0, 0.0];
                }
                math::scale(math::sub(b.position, a.position), 1.0 / dt)
            }
        }
    }

    /// Locate the segment bracketing time `t`
    ///
    /// A sample exactly on a waypoint belongs to the segment that starts
    /// there, so the returned index `i` satisfies
    /// `waypoints[i].time <= t < waypoints[i + 1].time`.
    fn segment_at(&self, t: f32) -> Segment {
        let last = self.waypoints.len() - 1;
        match self.waypoints.iter().rposition(|w| w.time <= t) {
            None => Segment::Before,
            Some(i) if i == last => Segment::After,
            Some(i) => Segment::Between(i),
        }
    }

    /// Get the waypoint nearest to time `t`
    pub fn nearest_waypoint(&self, t: f32) -> &Waypoint {
        self.waypoints
            .iter()
            .min_by(|a, b| {
                let da = (a.time - t).abs();
                let db = (b.time - t).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(&self.waypoints[0])
    }

    /// Shift all waypoints by a time delta, clamping at zero
    pub fn offset_time(&mut self, delta: f32) {
        for w in &mut self.waypoints {
            w.time = (w.time + delta).max(0.0);
        }
    }

    /// Stretch or compress the recording by a positive time factor
    pub fn scale_time(&mut self, factor: f32) {
        if factor <= 0.0 {
            return;
        }
        for w in &mut self.waypoints {
            w.time *= factor;
        }
    }
}

/// Result of the bracketing-segment search
enum Segment {
    /// Query time precedes the first waypoint
    Before,
    /// Query time is at or past the last waypoint
    After,
    /// Query time falls in the segment starting at this index
    Between(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(waypoints: Vec<Waypoint>) -> Path {
        Path::new(EntityId::new(), EntityKind::Player, waypoints).unwrap()
    }

    fn assert_vec3_eq(a: [f32; 3], b: [f32; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_empty_path_rejected() {
        let result = Path::new(EntityId::new(), EntityKind::Player, Vec::new());
        assert_eq!(result.unwrap_err(), PathError::Empty);
    }

    #[test]
    fn test_unsorted_path_rejected() {
        let result = Path::new(
            EntityId::new(),
            EntityKind::Player,
            vec![
                Waypoint::new(2.0, [0.0, 0.0, 0.0]),
                Waypoint::new(1.0, [1.0, 0.0, 0.0]),
            ],
        );
        assert_eq!(result.unwrap_err(), PathError::OutOfOrder { index: 1 });
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let result = Path::new(
            EntityId::new(),
            EntityKind::Ball,
            vec![Waypoint::new(-0.5, [0.0, 0.0, 0.0])],
        );
        assert!(matches!(
            result.unwrap_err(),
            PathError::NegativeTimestamp { index: 0, .. }
        ));
    }

    #[test]
    fn test_position_clamps_outside_range() {
        let p = path(vec![
            Waypoint::new(1.0, [10.0, 0.0, 0.0]),
            Waypoint::new(3.0, [30.0, 0.0, 0.0]),
        ]);
        assert_vec3_eq(p.position_at(0.0), [10.0, 0.0, 0.0]);
        assert_vec3_eq(p.position_at(99.0), [30.0, 0.0, 0.0]);
    }

    #[test]
    fn test_position_interpolates_linearly() {
        let p = path(vec![
            Waypoint::new(0.0, [0.0, 0.0, 0.0]),
            Waypoint::new(4.0, [8.0, 0.0, -4.0]),
        ]);
        assert_vec3_eq(p.position_at(1.0), [2.0, 0.0, -1.0]);
        assert_vec3_eq(p.position_at(2.0), [4.0, 0.0, -2.0]);
    }

    #[test]
    fn test_position_continuous_at_waypoint() {
        let p = path(vec![
            Waypoint::new(0.0, [0.0, 0.0, 0.0]),
            Waypoint::new(1.0, [5.0, 0.0, 2.0]),
            Waypoint::new(3.0, [1.0, 0.0, 6.0]),
        ]);
        // A sample exactly on the middle waypoint matches its position
        assert_vec3_eq(p.position_at(1.0), [5.0, 0.0, 2.0]);
    }

    #[test]
    fn test_zero_duration_segment_jumps() {
        let p = path(vec![
            Waypoint::new(0.0, [0.0, 0.0, 0.0]),
            Waypoint::new(1.0, [1.0, 0.0, 0.0]),
            Waypoint::new(1.0, [9.0, 0.0, 0.0]),
            Waypoint::new(2.0, [9.0, 0.0, 1.0]),
        ]);
        assert_vec3_eq(p.position_at(1.0), [9.0, 0.0, 0.0]);
        assert_vec3_eq(p.velocity_at(1.0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_velocity_is_segment_secant() {
        let p = path(vec![
            Waypoint::new(0.0, [0.0, 0.0, 0.0]),
            Waypoint::new(2.0, [10.0, 0.0, 0.0]),
            Waypoint::new(4.0, [10.0, 0.0, 20.0]),
        ]);
        assert_vec3_eq(p.velocity_at(0.5), [5.0, 0.0, 0.0]);
        assert_vec3_eq(p.velocity_at(1.5), [5.0, 0.0, 0.0]);
        assert_vec3_eq(p.velocity_at(3.0), [0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_static_pin_has_zero_velocity() {
        let p = path(vec![Waypoint::new(0.0, [3.0, 0.0, 7.0])]);
        assert!(p.is_static());
        assert_vec3_eq(p.velocity_at(0.0), [0.0, 0.0, 0.0]);
        assert_vec3_eq(p.velocity_at(5.0), [0.0, 0.0, 0.0]);
        assert_vec3_eq(p.position_at(5.0), [3.0, 0.0, 7.0]);
    }

    #[test]
    fn test_offset_time_clamps_at_zero() {
        let mut p = path(vec![
            Waypoint::new(0.5, [0.0, 0.0, 0.0]),
            Waypoint::new(2.0, [1.0, 0.0, 0.0]),
        ]);
        p.offset_time(-1.0);
        assert_eq!(p.start_time(), 0.0);
        assert_eq!(p.end_time(), 1.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_scale_time() {
        let mut p = path(vec![
            Waypoint::new(0.0, [0.0, 0.0, 0.0]),
            Waypoint::new(2.0, [1.0, 0.0, 0.0]),
        ]);
        p.scale_time(2.0);
        assert_eq!(p.duration(), 4.0);
        p.scale_time(-1.0); // ignored
        assert_eq!(p.duration(), 4.0);
    }

    #[test]
    fn test_nearest_waypoint() {
        let p = path(vec![
            Waypoint::new(0.0, [0.0, 0.0, 0.0]),
            Waypoint::new(2.0, [1.0, 0.0, 0.0]),
            Waypoint::new(5.0, [2.0, 0.0, 0.0]),
        ]);
        assert_eq!(p.nearest_waypoint(1.9).time, 2.0);
        assert_eq!(p.nearest_waypoint(4.0).time, 5.0);
    }
}
