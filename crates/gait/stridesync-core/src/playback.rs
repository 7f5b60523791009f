//! Clip selection by name and playback-rate scaling.

use serde::{Deserialize, Serialize};

use crate::clip::SampledClip;

/// Case-sensitive prefix/postfix filter. Empty parts match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFilter {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub postfix: String,
}

impl NameFilter {
    pub fn new(prefix: &str, postfix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            postfix: postfix.to_string(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.prefix) && name.ends_with(&self.postfix)
    }
}

/// Playback-rate access on a clip.
pub trait PlaybackRate {
    fn rate_scale(&self) -> f32;
    fn set_rate_scale(&mut self, scale: f32);
    /// Root translation accumulated over one loop.
    fn root_motion(&self) -> [f32; 3];
    fn playback_length(&self) -> f32;
}

impl PlaybackRate for SampledClip {
    fn rate_scale(&self) -> f32 {
        self.rate_scale
    }

    fn set_rate_scale(&mut self, scale: f32) {
        self.rate_scale = scale;
    }

    fn root_motion(&self) -> [f32; 3] {
        self.root_motion
    }

    fn playback_length(&self) -> f32 {
        self.duration
    }
}

fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Rate scale that makes a clip's root travel at `target_speed` units/second.
/// `None` when the clip barely moves (every component within `epsilon`) or has no length.
pub fn rate_scale_for_speed(
    root_motion: [f32; 3],
    duration: f32,
    target_speed: f32,
    epsilon: f32,
) -> Option<f32> {
    if duration <= 0.0 || root_motion.iter().all(|c| c.abs() <= epsilon) {
        return None;
    }
    let speed = length(root_motion) / duration;
    Some(target_speed / speed)
}

/// Set the same rate scale on every clip.
pub fn apply_rate_scale<'a, P, I>(clips: I, scale: f32)
where
    P: PlaybackRate + 'a,
    I: IntoIterator<Item = &'a mut P>,
{
    for clip in clips {
        clip.set_rate_scale(scale);
    }
}

/// Rescale each clip so its root moves at `target_speed`. Returns how many
/// clips were skipped for having no root motion.
pub fn apply_root_motion_speed<'a, P, I>(clips: I, target_speed: f32, epsilon: f32) -> usize
where
    P: PlaybackRate + 'a,
    I: IntoIterator<Item = &'a mut P>,
{
    let mut skipped = 0;
    for clip in clips {
        match rate_scale_for_speed(
            clip.root_motion(),
            clip.playback_length(),
            target_speed,
            epsilon,
        ) {
            Some(scale) => clip.set_rate_scale(scale),
            None => skipped += 1,
        }
    }
    skipped
}
