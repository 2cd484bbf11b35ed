// SPDX-License-Identifier: MIT OR Apache-2.0
//! Events: named scenarios bundling paths and phase markers.
//!
//! An [`Event`] is the unit the playback engine operates on. It carries a
//! fixed duration, an ordered list of [`Phase`] markers, and one
//! [`TimedPath`] per entity giving that entity's path and its activation
//! offset into the event's global timeline.

use crate::path::{EntityId, Path, PathError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhaseId(pub Uuid);

impl PhaseId {
    /// Create a new random phase ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PhaseId {
    fn default() -> Self {
        Self::new()
    }
}

/// A named time marker on an event's timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    /// Unique phase ID
    pub id: PhaseId,
    /// Phase name ("Build-up", "Cross", ...)
    pub name: String,
    /// Optional narration text shown while held at this phase
    pub description: Option<String>,
    /// Time the phase starts; `0.0` is the implicit first phase
    pub start_time: f32,
    /// Pause playback automatically when this phase is reached
    pub auto_pause: bool,
}

impl Phase {
    /// Create a new phase
    pub fn new(name: impl Into<String>, start_time: f32) -> Self {
        Self {
            id: PhaseId::new(),
            name: name.into(),
            description: None,
            start_time,
            auto_pause: false,
        }
    }

    /// Set the narration text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Enable automatic pause at this phase
    pub fn with_auto_pause(mut self) -> Self {
        self.auto_pause = true;
        self
    }
}

/// A path plus its activation offset into the event timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedPath {
    /// The recorded movement
    pub path: Path,
    /// Global time at which the entity starts following the path
    pub start_offset: f32,
}

impl TimedPath {
    /// Create a timed path
    pub fn new(path: Path, start_offset: f32) -> Self {
        Self { path, start_offset }
    }

    /// Whether the entity has been activated at this global time
    pub fn is_active(&self, global_time: f32) -> bool {
        global_time >= self.start_offset
    }

    /// Translate global time to the path's local timeline
    ///
    /// Never negative for an active entity.
    pub fn local_time(&self, global_time: f32) -> f32 {
        global_time - self.start_offset
    }
}

/// Validation failure for an event
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    /// Duration must be non-negative
    #[error("event duration {0} is negative")]
    NegativeDuration(f32),
    /// Phases must be sorted by start time
    #[error("phase {index} starts before its predecessor")]
    UnsortedPhases {
        /// Index of the offending phase
        index: usize,
    },
    /// Phase start times must lie within the event
    #[error("phase {index} starts at {start_time}, outside the event duration")]
    PhaseOutOfRange {
        /// Index of the offending phase
        index: usize,
        /// The rejected start time
        start_time: f32,
    },
    /// Activation offsets must lie within the event
    #[error("path for entity {entity_id:?} has start offset {start_offset} outside [0, duration]")]
    OffsetOutOfRange {
        /// Entity whose path is misconfigured
        entity_id: EntityId,
        /// The rejected offset
        start_offset: f32,
    },
    /// Each entity may contribute at most one path
    #[error("entity {entity_id:?} has more than one path")]
    DuplicateEntity {
        /// The duplicated entity
        entity_id: EntityId,
    },
    /// A contained path failed validation
    #[error("path for entity {entity_id:?} is invalid: {source}")]
    InvalidPath {
        /// Entity whose path is invalid
        entity_id: EntityId,
        /// The underlying path error
        source: PathError,
    },
}

/// A named, time-bounded scenario
///
/// Immutable once constructed; the playback engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: EventId,
    /// Event name
    pub name: String,
    /// Length of the global timeline in seconds
    duration: f32,
    /// Phase markers sorted by start time
    phases: Vec<Phase>,
    /// One timed path per entity, keyed by entity ID
    paths: IndexMap<EntityId, TimedPath>,
}

impl Event {
    /// Create a validated event
    pub fn new(
        name: impl Into<String>,
        duration: f32,
        phases: Vec<Phase>,
        paths: Vec<TimedPath>,
    ) -> Result<Self, EventError> {
        let mut map = IndexMap::with_capacity(paths.len());
        for timed in paths {
            let entity_id = timed.path.entity_id;
            if map.insert(entity_id, timed).is_some() {
                return Err(EventError::DuplicateEntity { entity_id });
            }
        }
        let event = Self {
            id: EventId::new(),
            name: name.into(),
            duration,
            phases,
            paths: map,
        };
        event.validate()?;
        Ok(event)
    }

    /// Check the event invariants
    ///
    /// Hosts that deserialize events from storage should call this before
    /// activating them.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.duration < 0.0 {
            return Err(EventError::NegativeDuration(self.duration));
        }
        for (index, pair) in self.phases.windows(2).enumerate() {
            if pair[1].start_time < pair[0].start_time {
                return Err(EventError::UnsortedPhases { index: index + 1 });
            }
        }
        for (index, phase) in self.phases.iter().enumerate() {
            if phase.start_time < 0.0 || phase.start_time > self.duration {
                return Err(EventError::PhaseOutOfRange {
                    index,
                    start_time: phase.start_time,
                });
            }
        }
        for (entity_id, timed) in &self.paths {
            if timed.start_offset < 0.0 || timed.start_offset > self.duration {
                return Err(EventError::OffsetOutOfRange {
                    entity_id: *entity_id,
                    start_offset: timed.start_offset,
                });
            }
            timed.path.validate().map_err(|source| EventError::InvalidPath {
                entity_id: *entity_id,
                source,
            })?;
        }
        Ok(())
    }

    /// Length of the global timeline in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Get all phases, sorted by start time
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Get phase count
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Get a phase by index
    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    /// Index of the phase active at a global time
    ///
    /// The greatest index whose start time is `<=` the sample, so a sample
    /// exactly on a boundary belongs to the phase that starts there. `None`
    /// when the event has no phases or the sample precedes the first one.
    pub fn active_phase_index(&self, global_time: f32) -> Option<usize> {
        self.phases.iter().rposition(|p| p.start_time <= global_time)
    }

    /// Get the timed path for an entity
    pub fn path_for(&self, entity_id: EntityId) -> Option<&TimedPath> {
        self.paths.get(&entity_id)
    }

    /// Iterate over all timed paths in insertion order
    pub fn timed_paths(&self) -> impl Iterator<Item = &TimedPath> {
        self.paths.values()
    }

    /// Number of entities with a path in this event
    pub fn entity_count(&self) -> usize {
        self.paths.len()
    }

    /// Timeline length actually covered by path content
    ///
    /// Can be shorter than `duration` when paths end early.
    pub fn content_duration(&self) -> f32 {
        self.paths
            .values()
            .map(|t| t.start_offset + t.path.end_time())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{EntityKind, Waypoint};

    fn pin(time: f32) -> Path {
        Path::new(
            EntityId::new(),
            EntityKind::Player,
            vec![Waypoint::new(time, [0.0, 0.0, 0.0])],
        )
        .unwrap()
    }

    #[test]
    fn test_negative_duration_rejected() {
        let result = Event::new("Counter press", -1.0, Vec::new(), Vec::new());
        assert_eq!(result.unwrap_err(), EventError::NegativeDuration(-1.0));
    }

    #[test]
    fn test_unsorted_phases_rejected() {
        let phases = vec![Phase::new("Second", 5.0), Phase::new("First", 2.0)];
        let result = Event::new("Set piece", 10.0, phases, Vec::new());
        assert_eq!(result.unwrap_err(), EventError::UnsortedPhases { index: 1 });
    }

    #[test]
    fn test_phase_beyond_duration_rejected() {
        let phases = vec![Phase::new("Late", 12.0)];
        let result = Event::new("Set piece", 10.0, phases, Vec::new());
        assert!(matches!(
            result.unwrap_err(),
            EventError::PhaseOutOfRange { index: 0, .. }
        ));
    }

    #[test]
    fn test_offset_beyond_duration_rejected() {
        let result = Event::new("Overlap", 5.0, Vec::new(), vec![TimedPath::new(pin(0.0), 6.0)]);
        assert!(matches!(
            result.unwrap_err(),
            EventError::OffsetOutOfRange { .. }
        ));
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let path = pin(0.0);
        let duplicate = path.clone();
        let result = Event::new(
            "Duplicate",
            5.0,
            Vec::new(),
            vec![TimedPath::new(path, 0.0), TimedPath::new(duplicate, 1.0)],
        );
        assert!(matches!(
            result.unwrap_err(),
            EventError::DuplicateEntity { .. }
        ));
    }

    #[test]
    fn test_active_phase_index_tie_break() {
        let phases = vec![
            Phase::new("Build-up", 0.0),
            Phase::new("Cross", 4.0),
            Phase::new("Finish", 8.0),
        ];
        let event = Event::new("Attack", 10.0, phases, Vec::new()).unwrap();
        assert_eq!(event.active_phase_index(0.0), Some(0));
        assert_eq!(event.active_phase_index(3.9), Some(0));
        // A sample exactly on a boundary belongs to the phase starting there
        assert_eq!(event.active_phase_index(4.0), Some(1));
        assert_eq!(event.active_phase_index(99.0), Some(2));
    }

    #[test]
    fn test_empty_phase_list_has_no_active_phase() {
        let event = Event::new("Free run", 10.0, Vec::new(), Vec::new()).unwrap();
        assert_eq!(event.active_phase_index(5.0), None);
    }

    #[test]
    fn test_activation_and_local_time() {
        let timed = TimedPath::new(pin(0.0), 3.0);
        assert!(!timed.is_active(2.9));
        assert!(timed.is_active(3.0));
        assert_eq!(timed.local_time(5.0), 2.0);
    }

    #[test]
    fn test_event_loads_from_ron() {
        let text = r#"(
            id: ("a2c8d3f0-5b1e-4e8a-9c6d-1f2a3b4c5d6e"),
            name: "Give and go",
            duration: 12.0,
            phases: [(
                id: ("b3d9e4a1-6c2f-4f9b-8d7e-2a3b4c5d6e7f"),
                name: "Pass",
                description: Some("First pass into the wall player"),
                start_time: 4.0,
                auto_pause: true,
            )],
            paths: {
                ("c4e0f5b2-7d3a-4a0c-9e8f-3b4c5d6e7f80"): (
                    path: (
                        entity_id: ("c4e0f5b2-7d3a-4a0c-9e8f-3b4c5d6e7f80"),
                        kind: Player,
                        waypoints: [
                            (time: 0.0, position: (0.0, 0.0, 0.0)),
                            (time: 8.0, position: (20.0, 0.0, 5.0)),
                        ],
                    ),
                    start_offset: 2.0,
                ),
            },
        )"#;
        let event: Event = ron::from_str(text).unwrap();
        event.validate().unwrap();
        assert_eq!(event.name, "Give and go");
        assert_eq!(event.entity_count(), 1);
        assert_eq!(event.phase_count(), 1);
        assert!(event.phases()[0].auto_pause);
        assert_eq!(event.content_duration(), 10.0);
    }
}
