//! Clip access contracts and the in-memory sampled clip.
//!
//! The host editor owns real animation assets; the core only needs per-frame
//! root-relative bone positions (`PoseSource`) and notify editing (`NotifyEditor`).
//! `SampledClip` implements both over pre-sampled data and is what the JSON
//! fixtures and host adapters deserialize into.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::GaitError;
use crate::notify::{NotifyEditor, NotifyEvent, NotifyTrack, NotifyTracks, SyncMarker, TrackColor};

/// Read access to a looping clip's bone trajectories.
pub trait PoseSource {
    fn clip_name(&self) -> &str;
    /// Number of distinct frames in one loop. Frame `N-1` is followed by frame 0.
    fn frame_count(&self) -> usize;
    fn duration(&self) -> f32;
    fn time_at_frame(&self, frame: usize) -> f32;
    fn has_bone(&self, bone: &str) -> bool;
    /// Bone position relative to the root at `frame`. The root itself sits at the origin.
    fn bone_position(&self, bone: &str, frame: usize) -> Option<[f32; 3]>;
}

/// Everything the builder and transplanter need from a clip.
pub trait GaitClip: PoseSource + NotifyEditor {}

impl<T: PoseSource + NotifyEditor> GaitClip for T {}

fn default_rate_scale() -> f32 {
    1.0
}

/// Pre-sampled looping clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampledClip {
    pub name: String,
    /// Loop length in seconds.
    pub duration: f32,
    #[serde(default)]
    pub root_bone: Option<String>,
    /// Root-relative positions per bone, one entry per frame.
    pub bones: HashMap<String, Vec<[f32; 3]>>,
    #[serde(default)]
    pub notifies: NotifyTracks,
    #[serde(default = "default_rate_scale")]
    pub rate_scale: f32,
    /// Root translation accumulated over one loop.
    #[serde(default)]
    pub root_motion: [f32; 3],
}

impl SampledClip {
    pub fn new(name: &str, duration: f32) -> Self {
        Self {
            name: name.to_string(),
            duration,
            root_bone: None,
            bones: HashMap::new(),
            notifies: NotifyTracks::default(),
            rate_scale: 1.0,
            root_motion: [0.0; 3],
        }
    }

    pub fn with_bone(mut self, bone: &str, frames: Vec<[f32; 3]>) -> Self {
        self.bones.insert(bone.to_string(), frames);
        self
    }

    pub fn with_root(mut self, bone: &str) -> Self {
        self.root_bone = Some(bone.to_string());
        self
    }

    /// Parse a clip from JSON and validate it.
    pub fn from_json(s: &str) -> Result<Self, GaitError> {
        let mut clip: SampledClip = serde_json::from_str(s)?;
        clip.validate()?;
        clip.notifies.refresh();
        Ok(clip)
    }

    pub fn to_json(&self) -> Result<String, GaitError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Positive finite duration, equal frame counts for every bone, and
    /// notify references within range.
    pub fn validate(&self) -> Result<(), GaitError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(GaitError::InvalidClip(format!(
                "clip '{}' duration must be > 0",
                self.name
            )));
        }
        let mut frames: Option<usize> = None;
        for (bone, samples) in self.bones.iter() {
            match frames {
                None => frames = Some(samples.len()),
                Some(n) if n != samples.len() => {
                    return Err(GaitError::InvalidClip(format!(
                        "bone '{bone}' in clip '{}' has {} frames, expected {n}",
                        self.name,
                        samples.len()
                    )));
                }
                Some(_) => {}
            }
        }
        let tracks = self.notifies.tracks.len();
        let bad_marker = self.notifies.markers.iter().any(|m| m.track_index >= tracks);
        let bad_event = self.notifies.events.iter().any(|e| e.track_index >= tracks);
        if bad_marker || bad_event {
            return Err(GaitError::InvalidClip(format!(
                "clip '{}' references a notify track that does not exist",
                self.name
            )));
        }
        Ok(())
    }
}

impl PoseSource for SampledClip {
    fn clip_name(&self) -> &str {
        &self.name
    }

    fn frame_count(&self) -> usize {
        self.bones.values().map(Vec::len).max().unwrap_or(0)
    }

    fn duration(&self) -> f32 {
        self.duration
    }

    fn time_at_frame(&self, frame: usize) -> f32 {
        let n = self.frame_count();
        if n == 0 {
            return 0.0;
        }
        self.duration * frame as f32 / n as f32
    }

    fn has_bone(&self, bone: &str) -> bool {
        self.bones.contains_key(bone)
    }

    fn bone_position(&self, bone: &str, frame: usize) -> Option<[f32; 3]> {
        if self.root_bone.as_deref() == Some(bone) {
            return self.has_bone(bone).then_some([0.0; 3]);
        }
        self.bones.get(bone).and_then(|f| f.get(frame)).copied()
    }
}

impl NotifyEditor for SampledClip {
    fn notify_tracks(&self) -> &[NotifyTrack] {
        &self.notifies.tracks
    }

    fn sync_markers(&self) -> &[SyncMarker] {
        &self.notifies.markers
    }

    fn notify_events(&self) -> &[NotifyEvent] {
        &self.notifies.events
    }

    fn create_notify_track(&mut self, name: &str, color: TrackColor) -> usize {
        self.notifies.add_track(name, color)
    }

    fn remove_notify_track(&mut self, name: &str) -> bool {
        self.notifies.remove_track(name)
    }

    fn clear_notify_track(&mut self, track_index: usize) {
        self.notifies.clear_track(track_index);
    }

    fn add_sync_marker(&mut self, name: &str, time: f32, track_index: usize) -> bool {
        self.notifies.add_marker(name, time, track_index, self.duration)
    }

    fn add_notify_event(&mut self, track_index: usize, time: f32, event_class: &str) -> bool {
        self.notifies
            .add_event(track_index, time, event_class, self.duration)
    }

    fn refresh_derived_caches(&mut self) {
        self.notifies.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_frame_clip() -> SampledClip {
        SampledClip::new("Idle_F", 2.0)
            .with_root("root")
            .with_bone("root", vec![[5.0, 5.0, 5.0], [6.0, 6.0, 6.0]])
            .with_bone("foot_l", vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
    }

    #[test]
    fn root_is_forced_to_origin() {
        let clip = two_frame_clip();
        assert_eq!(clip.bone_position("root", 1), Some([0.0, 0.0, 0.0]));
        assert_eq!(clip.bone_position("foot_l", 1), Some([4.0, 5.0, 6.0]));
        assert_eq!(clip.bone_position("hand_l", 0), None);
    }

    #[test]
    fn frames_tile_the_loop() {
        let clip = two_frame_clip();
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.time_at_frame(0), 0.0);
        assert_eq!(clip.time_at_frame(1), 1.0);
    }

    #[test]
    fn validate_rejects_ragged_bones() {
        let clip = two_frame_clip().with_bone("foot_r", vec![[0.0; 3]]);
        assert!(matches!(clip.validate(), Err(GaitError::InvalidClip(_))));
    }

    #[test]
    fn json_round_trip_keeps_notifies() {
        let mut clip = two_frame_clip();
        let idx = clip.create_notify_track("Sync", TrackColor::WHITE);
        assert!(clip.add_sync_marker("step", 0.5, idx));
        let text = clip.to_json().unwrap();
        let back = SampledClip::from_json(&text).unwrap();
        assert_eq!(back.sync_markers().len(), 1);
        assert_eq!(back.track_index("Sync"), Some(0));
    }
}
