//! Gait reference: a clip's contact times arranged into alternating stance
//! intervals, used as a time-warping coordinate between clips.
//!
//! A timestamp maps to a `Phase` (ratio inside its stance interval plus the
//! foot order of that interval). A phase maps back to one timestamp per
//! interval of the same foot order, so clips containing several gait cycles
//! yield several times.

use serde::{Deserialize, Serialize};

use crate::clip::PoseSource;
use crate::config::Config;
use crate::contact::detect_contact_times;
use crate::direction::Direction;
use crate::error::GaitError;
use crate::interval::{pair_contacts, FootOrder, StanceInterval};

/// Position inside a stance interval.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub ratio: f32,
    pub order: FootOrder,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaitReference {
    pub clip_name: String,
    pub duration: f32,
    pub direction: Direction,
    pub left_markers: Vec<f32>,
    pub right_markers: Vec<f32>,
    pub intervals: Vec<StanceInterval>,
    /// Set for invalid references; kept through serialization so a snapshot
    /// of a failed build stays excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<GaitError>,
}

const TILING_EPS: f32 = 1e-3;

impl GaitReference {
    /// Detect contacts for both feet and build the reference. Failures are
    /// captured in the returned value; check `is_valid`.
    pub fn build<C: PoseSource + ?Sized>(
        clip: &C,
        left_bone: &str,
        right_bone: &str,
        cfg: &Config,
    ) -> GaitReference {
        let direction = Direction::from_clip_name(clip.clip_name());
        let detect = |bone: &str| {
            detect_contact_times(clip, bone, direction, cfg.stabilization_threshold)
        };
        let contacts = detect(left_bone).and_then(|l| detect(right_bone).map(|r| (l, r)));
        match contacts {
            Ok((left, right)) => GaitReference::from_contacts(
                clip.clip_name(),
                clip.duration(),
                direction,
                left,
                right,
                left_bone,
                right_bone,
            ),
            Err(err) => GaitReference::invalid(clip.clip_name(), clip.duration(), direction, err),
        }
    }

    /// Build from already-detected contact times. Bone names only feed diagnostics.
    pub fn from_contacts(
        clip_name: &str,
        duration: f32,
        direction: Direction,
        mut left: Vec<f32>,
        mut right: Vec<f32>,
        left_bone: &str,
        right_bone: &str,
    ) -> GaitReference {
        left.sort_by(f32::total_cmp);
        right.sort_by(f32::total_cmp);

        let failure = if left.is_empty() {
            Some(GaitError::NoContacts {
                clip: clip_name.to_string(),
                bone: left_bone.to_string(),
            })
        } else if right.is_empty() {
            Some(GaitError::NoContacts {
                clip: clip_name.to_string(),
                bone: right_bone.to_string(),
            })
        } else if left.len() != right.len() {
            Some(GaitError::ContactCountMismatch {
                clip: clip_name.to_string(),
                left: left.len(),
                right: right.len(),
            })
        } else {
            None
        };

        if let Some(err) = failure {
            log::warn!("reference calculation failed for {clip_name}: {err}");
            let mut reference = GaitReference::invalid(clip_name, duration, direction, err);
            reference.left_markers = left;
            reference.right_markers = right;
            return reference;
        }

        let intervals = pair_contacts(&left, &right);
        let reference = GaitReference {
            clip_name: clip_name.to_string(),
            duration,
            direction,
            left_markers: left,
            right_markers: right,
            intervals,
            failure: None,
        };
        let covered = reference.covered_length();
        if (covered - duration).abs() > TILING_EPS {
            log::warn!(
                "stance intervals of {clip_name} cover {covered} of {duration}; contacts do not alternate"
            );
        }
        reference
    }

    fn invalid(clip_name: &str, duration: f32, direction: Direction, err: GaitError) -> Self {
        GaitReference {
            clip_name: clip_name.to_string(),
            duration,
            direction,
            left_markers: Vec::new(),
            right_markers: Vec::new(),
            intervals: Vec::new(),
            failure: Some(err),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }

    pub fn failure(&self) -> Option<&GaitError> {
        self.failure.as_ref()
    }

    /// `Ok` only for a usable reference: no recorded failure and at least one interval.
    pub fn into_result(self) -> Result<GaitReference, GaitError> {
        match self.failure {
            Some(err) => Err(err),
            None if self.intervals.is_empty() => Err(GaitError::ReferenceMissing {
                clip: self.clip_name,
            }),
            None => Ok(self),
        }
    }

    /// Sum of interval lengths; equals `duration` when intervals tile the loop.
    pub fn covered_length(&self) -> f32 {
        self.intervals.iter().map(|i| i.length(self.duration)).sum()
    }

    /// Interval a timestamp belongs to.
    ///
    /// Containment is half-open, so a time exactly on a boundary belongs to the
    /// interval that starts there. If no interval contains the time (intervals
    /// that do not tile the loop), the final interval is used.
    pub fn interval_for(&self, time: f32) -> Option<&StanceInterval> {
        self.intervals
            .iter()
            .find(|i| i.contains(time))
            .or_else(|| self.intervals.last())
    }

    pub fn time_to_phase(&self, time: f32) -> Result<Phase, GaitError> {
        let interval = self
            .interval_for(time)
            .filter(|_| self.is_valid())
            .ok_or_else(|| GaitError::ReferenceMissing {
                clip: self.clip_name.clone(),
            })?;
        Ok(Phase {
            ratio: interval.ratio_at(time, self.duration),
            order: interval.order,
        })
    }

    /// One timestamp per interval whose foot order matches `phase.order`.
    pub fn phase_to_times(&self, phase: Phase) -> Vec<f32> {
        self.intervals
            .iter()
            .filter(|i| i.order == phase.order)
            .map(|i| i.time_at(phase.ratio, self.duration))
            .collect()
    }
}
