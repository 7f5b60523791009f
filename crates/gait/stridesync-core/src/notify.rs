//! Notify tracks, sync markers and notify events.
//!
//! Tracks are identified by name and located by linear scan; markers and events
//! refer to their track by index. Removing a track shifts every later index down
//! by one so references stay consistent.

use serde::{Deserialize, Serialize};

/// Linear RGBA color of a notify track.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl TrackColor {
    pub const WHITE: TrackColor = TrackColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
}

impl Default for TrackColor {
    fn default() -> Self {
        Self::WHITE
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotifyTrack {
    pub name: String,
    #[serde(default)]
    pub color: TrackColor,
}

/// A named phase marker used for sync-group playback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncMarker {
    pub name: String,
    pub time: f32,
    pub track_index: usize,
}

/// A timestamped notify whose behavior is identified by `class`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotifyEvent {
    pub class: String,
    #[serde(default)]
    pub name: String,
    pub time: f32,
    pub track_index: usize,
}

/// Authored notify data of one clip plus the caches derived from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyTracks {
    #[serde(default)]
    pub tracks: Vec<NotifyTrack>,
    #[serde(default)]
    pub markers: Vec<SyncMarker>,
    #[serde(default)]
    pub events: Vec<NotifyEvent>,
    /// Sorted, de-duplicated marker names. Rebuilt by `refresh`.
    #[serde(skip)]
    unique_marker_names: Vec<String>,
}

fn within(time: f32, duration: f32) -> bool {
    time.is_finite() && (0.0..=duration).contains(&time)
}

impl NotifyTracks {
    pub fn track_index(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }

    /// Append a track, replacing any existing track of the same name.
    pub fn add_track(&mut self, name: &str, color: TrackColor) -> usize {
        if self.track_index(name).is_some() {
            self.remove_track(name);
        }
        self.tracks.push(NotifyTrack {
            name: name.to_string(),
            color,
        });
        self.refresh();
        self.tracks.len() - 1
    }

    /// Remove a track with its markers and events. Returns false if no such track.
    pub fn remove_track(&mut self, name: &str) -> bool {
        let Some(removed) = self.track_index(name) else {
            return false;
        };
        self.clear_track(removed);
        for event in self.events.iter_mut() {
            if event.track_index > removed {
                event.track_index -= 1;
            }
        }
        for marker in self.markers.iter_mut() {
            if marker.track_index > removed {
                marker.track_index -= 1;
            }
        }
        self.tracks.remove(removed);
        self.refresh();
        true
    }

    /// Drop every marker and event on a track, keeping the track itself.
    pub fn clear_track(&mut self, track_index: usize) {
        self.markers.retain(|m| m.track_index != track_index);
        self.events.retain(|e| e.track_index != track_index);
    }

    pub fn add_marker(&mut self, name: &str, time: f32, track_index: usize, duration: f32) -> bool {
        if track_index >= self.tracks.len() || !within(time, duration) {
            return false;
        }
        self.markers.push(SyncMarker {
            name: name.to_string(),
            time,
            track_index,
        });
        true
    }

    pub fn add_event(&mut self, track_index: usize, time: f32, class: &str, duration: f32) -> bool {
        if track_index >= self.tracks.len() || !within(time, duration) {
            return false;
        }
        self.events.push(NotifyEvent {
            class: class.to_string(),
            name: class.to_string(),
            time,
            track_index,
        });
        true
    }

    pub fn unique_marker_names(&self) -> &[String] {
        &self.unique_marker_names
    }

    /// Rebuild derived data: time-ordered markers/events and the marker-name list.
    pub fn refresh(&mut self) {
        self.markers.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.events.sort_by(|a, b| a.time.total_cmp(&b.time));
        let mut names: Vec<String> = self.markers.iter().map(|m| m.name.clone()).collect();
        names.sort();
        names.dedup();
        self.unique_marker_names = names;
    }
}

/// Write access to a clip's notify tracks, as provided by the host editor.
///
/// Implementors must keep marker/event track indices consistent when tracks
/// are removed. Callers invoke `refresh_derived_caches` after structural edits.
pub trait NotifyEditor {
    fn notify_tracks(&self) -> &[NotifyTrack];
    fn sync_markers(&self) -> &[SyncMarker];
    fn notify_events(&self) -> &[NotifyEvent];

    /// Create a track, replacing any like-named one. Returns its index.
    fn create_notify_track(&mut self, name: &str, color: TrackColor) -> usize;
    fn remove_notify_track(&mut self, name: &str) -> bool;
    fn clear_notify_track(&mut self, track_index: usize);
    /// Returns false when the index or time is out of range.
    fn add_sync_marker(&mut self, name: &str, time: f32, track_index: usize) -> bool;
    fn add_notify_event(&mut self, track_index: usize, time: f32, event_class: &str) -> bool;
    fn refresh_derived_caches(&mut self);

    fn track_index(&self, name: &str) -> Option<usize> {
        self.notify_tracks().iter().position(|t| t.name == name)
    }

    fn has_sync_marker_near(&self, track_index: usize, time: f32, tolerance: f32) -> bool {
        self.sync_markers()
            .iter()
            .any(|m| m.track_index == track_index && (m.time - time).abs() <= tolerance)
    }

    fn has_notify_event_near(&self, track_index: usize, time: f32, tolerance: f32) -> bool {
        self.notify_events()
            .iter()
            .any(|e| e.track_index == track_index && (e.time - time).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> NotifyTracks {
        let mut n = NotifyTracks::default();
        n.add_track("A", TrackColor::WHITE);
        n.add_track("B", TrackColor::WHITE);
        n.add_track("C", TrackColor::WHITE);
        assert!(n.add_marker("a", 0.1, 0, 1.0));
        assert!(n.add_marker("b", 0.2, 1, 1.0));
        assert!(n.add_marker("c", 0.3, 2, 1.0));
        assert!(n.add_event(2, 0.4, "Footstep", 1.0));
        n
    }

    #[test]
    fn removing_a_track_shifts_later_indices() {
        let mut n = store();
        assert!(n.remove_track("B"));
        assert_eq!(n.tracks.len(), 2);
        assert_eq!(n.markers.len(), 2);
        let c = n.markers.iter().find(|m| m.name == "c").unwrap();
        assert_eq!(c.track_index, 1);
        assert_eq!(n.events[0].track_index, 1);
        let a = n.markers.iter().find(|m| m.name == "a").unwrap();
        assert_eq!(a.track_index, 0);
    }

    #[test]
    fn re_adding_a_track_replaces_it() {
        let mut n = store();
        let idx = n.add_track("A", TrackColor::WHITE);
        assert_eq!(idx, 2);
        assert_eq!(n.track_index("A"), Some(2));
        assert!(n.markers.iter().all(|m| m.name != "a"));
    }

    #[test]
    fn out_of_range_inserts_are_rejected() {
        let mut n = store();
        assert!(!n.add_marker("late", 1.5, 0, 1.0));
        assert!(!n.add_marker("neg", -0.1, 0, 1.0));
        assert!(!n.add_marker("bad", 0.5, 9, 1.0));
        assert!(n.add_marker("edge", 1.0, 0, 1.0));
    }

    #[test]
    fn refresh_sorts_and_collects_names() {
        let mut n = NotifyTracks::default();
        n.add_track("A", TrackColor::WHITE);
        n.add_marker("z", 0.9, 0, 1.0);
        n.add_marker("y", 0.1, 0, 1.0);
        n.add_marker("z", 0.5, 0, 1.0);
        n.refresh();
        let times: Vec<f32> = n.markers.iter().map(|m| m.time).collect();
        assert_eq!(times, vec![0.1, 0.5, 0.9]);
        assert_eq!(n.unique_marker_names(), &["y".to_string(), "z".to_string()]);
    }
}
