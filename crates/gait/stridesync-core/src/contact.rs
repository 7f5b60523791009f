//! Foot-contact detection over a looping bone trajectory.
//!
//! Pass 1 finds turning points: frames where the foot's coordinate along the
//! movement axis is a strict local extremum (end of a swing). Pass 2 walks
//! forward from each turning point while the foot is still dropping by at least
//! the stabilization threshold per frame; the frame after the drop falls below
//! the threshold is the contact. Both passes treat frame indices circularly.

use crate::clip::PoseSource;
use crate::direction::Direction;
use crate::error::GaitError;

#[inline]
fn prev_frame(i: usize, n: usize) -> usize {
    if i == 0 {
        n - 1
    } else {
        i - 1
    }
}

#[inline]
fn next_frame(i: usize, n: usize) -> usize {
    if i + 1 == n {
        0
    } else {
        i + 1
    }
}

/// Sample a bone once per frame.
pub fn sample_trajectory<C: PoseSource + ?Sized>(
    clip: &C,
    bone: &str,
) -> Result<Vec<[f32; 3]>, GaitError> {
    let n = clip.frame_count();
    (0..n)
        .map(|frame| {
            clip.bone_position(bone, frame).ok_or_else(|| {
                if clip.has_bone(bone) {
                    // Bone exists but its track is shorter than the clip.
                    GaitError::InvalidClip(format!(
                        "bone '{bone}' in clip '{}' has no sample for frame {frame} of {n}",
                        clip.clip_name()
                    ))
                } else {
                    GaitError::BoneNotFound {
                        clip: clip.clip_name().to_string(),
                        bone: bone.to_string(),
                    }
                }
            })
        })
        .collect()
}

/// Frames whose movement-axis coordinate is a local extremum for `direction`.
pub fn turning_points(trajectory: &[[f32; 3]], direction: Direction) -> Vec<usize> {
    let n = trajectory.len();
    if n < 3 {
        return Vec::new();
    }
    (0..n)
        .filter(|&i| {
            direction.is_turning_point(
                trajectory[prev_frame(i, n)],
                trajectory[i],
                trajectory[next_frame(i, n)],
            )
        })
        .collect()
}

/// Walk forward from `start` until the per-frame height drop falls below
/// `threshold`, returning the frame after that step. `None` if the walk goes
/// a full cycle without settling.
pub fn stabilize(trajectory: &[[f32; 3]], start: usize, threshold: f32) -> Option<usize> {
    let n = trajectory.len();
    let mut cur = start;
    for _ in 0..n {
        let next = next_frame(cur, n);
        let drop = trajectory[cur][2] - trajectory[next][2];
        if drop < threshold {
            return Some(next);
        }
        cur = next;
    }
    None
}

/// Contact frames for a trajectory, sorted and de-duplicated.
pub fn contact_frames(
    trajectory: &[[f32; 3]],
    direction: Direction,
    threshold: f32,
) -> Result<Vec<usize>, usize> {
    let mut frames = Vec::new();
    for tp in turning_points(trajectory, direction) {
        match stabilize(trajectory, tp, threshold) {
            Some(frame) => frames.push(frame),
            None => return Err(tp),
        }
    }
    frames.sort_unstable();
    frames.dedup();
    Ok(frames)
}

/// Contact timestamps of `bone` in `clip`, ascending.
///
/// An empty result is not an error here; the reference builder decides what a
/// missing foot means.
pub fn detect_contact_times<C: PoseSource + ?Sized>(
    clip: &C,
    bone: &str,
    direction: Direction,
    threshold: f32,
) -> Result<Vec<f32>, GaitError> {
    if clip.frame_count() == 0 {
        return Err(GaitError::EmptyClip {
            clip: clip.clip_name().to_string(),
        });
    }
    if !clip.has_bone(bone) {
        return Err(GaitError::BoneNotFound {
            clip: clip.clip_name().to_string(),
            bone: bone.to_string(),
        });
    }
    let trajectory = sample_trajectory(clip, bone)?;
    let frames = contact_frames(&trajectory, direction, threshold).map_err(|frame| {
        GaitError::StabilizationDiverged {
            clip: clip.clip_name().to_string(),
            bone: bone.to_string(),
            frame,
        }
    })?;
    for frame in frames.iter() {
        log::debug!("{} {}: contact at frame {}", clip.clip_name(), bone, frame);
    }
    Ok(frames.into_iter().map(|f| clip.time_at_frame(f)).collect())
}
