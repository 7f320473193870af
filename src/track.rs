//! Breadcrumb track recording

use crate::types::{Fix, Position, Timestamp};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A recorded track point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackPoint {
    pub position: Position,
    pub timestamp: Timestamp,
}

impl From<Fix> for TrackPoint {
    fn from(fix: Fix) -> Self {
        Self {
            position: fix.position,
            timestamp: fix.timestamp,
        }
    }
}

/// Append-only list of track points, cleared only on request
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    points: Vec<TrackPoint>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `point` if recording is enabled and its position differs from
    /// the last recorded one (exact comparison, no distance threshold).
    /// Returns whether the point was appended.
    pub fn record(&mut self, point: TrackPoint, recording_enabled: bool) -> bool {
        if !recording_enabled {
            return false;
        }
        if self.last_position() == Some(point.position) {
            debug!("Skipping repeated track point {:?}", point.position);
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn last_position(&self) -> Option<Position> {
        self.points.last().map(|p| p.position)
    }

    /// Ordered (lat, lon) polyline for the map layer
    pub fn polyline(&self) -> Vec<Position> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// A track is drawn only once it has at least two points
    pub fn is_drawable(&self) -> bool {
        self.points.len() > 1
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Track plus the session's start/stop recording switch
#[derive(Debug, Clone, Default)]
pub struct TrackRecorder {
    track: Track,
    recording: bool,
}

impl TrackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.recording = true;
    }

    pub fn stop(&mut self) {
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn record(&mut self, fix: Fix) -> bool {
        self.track.record(fix.into(), self.recording)
    }

    pub fn clear(&mut self) {
        self.track.clear();
    }

    pub fn track(&self) -> &Track {
        &self.track
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64, ts: Timestamp) -> TrackPoint {
        TrackPoint {
            position: Position::new(lat, lon),
            timestamp: ts,
        }
    }

    #[test]
    fn test_record_requires_recording_enabled() {
        let mut track = Track::new();
        assert!(!track.record(point(29.5, -95.0, 1), false));
        assert!(track.is_empty());
        assert!(track.record(point(29.5, -95.0, 1), true));
        assert_eq!(track.len(), 1);
    }

    #[test]
    fn test_consecutive_duplicates_suppressed() {
        let mut track = Track::new();
        assert!(track.record(point(29.5, -95.0, 1), true));
        // same position, later timestamp
        assert!(!track.record(point(29.5, -95.0, 2), true));
        // tiny move is still a different point
        assert!(track.record(point(29.5, -95.000001, 3), true));
        // returning to an earlier, non-consecutive point is allowed
        assert!(track.record(point(29.5, -95.0, 4), true));
        assert_eq!(track.len(), 3);
        assert!(track.is_drawable());
    }

    #[test]
    fn test_clear_empties_track() {
        let mut track = Track::new();
        track.record(point(1.0, 2.0, 1), true);
        track.record(point(1.0, 3.0, 2), true);
        track.clear();
        assert!(track.is_empty());
        assert_eq!(track.last_position(), None);
    }

    #[test]
    fn test_recorder_switch() {
        let mut recorder = TrackRecorder::new();
        assert!(!recorder.record(Fix::new(29.5, -95.0, 1)));
        recorder.start();
        assert!(recorder.record(Fix::new(29.5, -95.0, 2)));
        recorder.stop();
        assert!(!recorder.record(Fix::new(29.6, -95.0, 3)));
        assert_eq!(
            recorder.track().polyline(),
            vec![Position::new(29.5, -95.0)]
        );
    }
}
