//! Phase-preserving transplantation of sync markers and notify events.
//!
//! Every marker/event on the source track is converted to a phase through the
//! source clip's own reference, then back to concrete times through each
//! target's reference. The source clip is a target too: a multi-cycle source
//! picks up markers in cycles that had none.

use serde::{Deserialize, Serialize};

use crate::clip::GaitClip;
use crate::config::Config;
use crate::error::GaitError;
use crate::group::ReferenceGroup;
use crate::ids::ClipId;
use crate::library::ClipLibrary;
use crate::reference::{GaitReference, Phase};

/// Per-clip result of a transplant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipTransplant {
    pub clip: Option<ClipId>,
    pub clip_name: String,
    pub markers_added: usize,
    pub events_added: usize,
    /// Insertions suppressed because an entry already sat within tolerance.
    pub duplicates_skipped: usize,
    /// Insertions the clip refused (time outside the clip).
    pub rejected: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransplantReport {
    pub source: Option<ClipId>,
    pub track: String,
    pub clips: Vec<ClipTransplant>,
}

impl TransplantReport {
    pub fn markers_added(&self) -> usize {
        self.clips.iter().map(|c| c.markers_added).sum()
    }

    pub fn events_added(&self) -> usize {
        self.clips.iter().map(|c| c.events_added).sum()
    }

    pub fn for_clip(&self, clip: ClipId) -> Option<&ClipTransplant> {
        self.clips.iter().find(|c| c.clip == Some(clip))
    }

    pub fn diagnostics(&self) -> Vec<String> {
        self.clips
            .iter()
            .map(|c| {
                let mut line = format!(
                    "{}: track '{}' +{} markers, +{} events",
                    c.clip_name, self.track, c.markers_added, c.events_added
                );
                if c.duplicates_skipped > 0 {
                    line.push_str(&format!(", {} duplicates skipped", c.duplicates_skipped));
                }
                if c.rejected > 0 {
                    line.push_str(&format!(", {} out of range", c.rejected));
                }
                line
            })
            .collect()
    }
}

/// Source entries already converted to phase.
struct PhasedEntries {
    markers: Vec<(String, Phase)>,
    events: Vec<(String, Phase)>,
}

fn collect_phases<C: GaitClip>(
    clip: &C,
    reference: &GaitReference,
    track_index: usize,
) -> Result<PhasedEntries, GaitError> {
    let markers = clip
        .sync_markers()
        .iter()
        .filter(|m| m.track_index == track_index)
        .map(|m| Ok((m.name.clone(), reference.time_to_phase(m.time)?)))
        .collect::<Result<Vec<_>, GaitError>>()?;
    let events = clip
        .notify_events()
        .iter()
        .filter(|e| e.track_index == track_index)
        .map(|e| Ok((e.class.clone(), reference.time_to_phase(e.time)?)))
        .collect::<Result<Vec<_>, GaitError>>()?;
    Ok(PhasedEntries { markers, events })
}

/// Copy every marker and event of `track` on `source` onto all clips in `group`.
///
/// Fails without touching any clip when the source has no reference or no such
/// track. The like-named track on each target is emptied first (and created if
/// missing), then refilled.
pub fn transplant<C: GaitClip>(
    group: &ReferenceGroup,
    clips: &mut ClipLibrary<C>,
    source: ClipId,
    track: &str,
    cfg: &Config,
) -> Result<TransplantReport, GaitError> {
    let source_clip = clips.get(source).ok_or(GaitError::ClipNotFound(source))?;
    let source_ref = group
        .get(source)
        .ok_or_else(|| GaitError::ReferenceMissing {
            clip: source_clip.clip_name().to_string(),
        })?;
    let track_index =
        source_clip
            .track_index(track)
            .ok_or_else(|| GaitError::TrackNotFound {
                clip: source_clip.clip_name().to_string(),
                track: track.to_string(),
            })?;
    let entries = collect_phases(source_clip, source_ref, track_index)?;

    let mut report = TransplantReport {
        source: Some(source),
        track: track.to_string(),
        clips: Vec::new(),
    };
    for id in group.ids() {
        let Some(reference) = group.get(id) else {
            continue;
        };
        let Some(clip) = clips.get_mut(id) else {
            log::warn!("clip {id:?} has a reference but is not loaded; skipping");
            continue;
        };
        let mut outcome = transplant_into(clip, reference, track, &entries, cfg);
        outcome.clip = Some(id);
        report.clips.push(outcome);
    }
    Ok(report)
}

fn transplant_into<C: GaitClip>(
    clip: &mut C,
    reference: &GaitReference,
    track: &str,
    entries: &PhasedEntries,
    cfg: &Config,
) -> ClipTransplant {
    let track_index = match clip.track_index(track) {
        Some(index) => index,
        None => clip.create_notify_track(track, cfg.track_color),
    };
    clip.clear_notify_track(track_index);
    clip.refresh_derived_caches();

    let mut outcome = ClipTransplant {
        clip_name: clip.clip_name().to_string(),
        ..Default::default()
    };

    for (name, phase) in entries.markers.iter() {
        for time in reference.phase_to_times(*phase) {
            if clip.has_sync_marker_near(track_index, time, cfg.duplicate_tolerance) {
                outcome.duplicates_skipped += 1;
            } else if clip.add_sync_marker(name, time, track_index) {
                log::debug!("{}: marker '{name}' at {time}", outcome.clip_name);
                outcome.markers_added += 1;
            } else {
                log::warn!("{}: marker '{name}' at {time} is outside the clip", outcome.clip_name);
                outcome.rejected += 1;
            }
        }
    }
    for (class, phase) in entries.events.iter() {
        for time in reference.phase_to_times(*phase) {
            if clip.has_notify_event_near(track_index, time, cfg.duplicate_tolerance) {
                outcome.duplicates_skipped += 1;
            } else if clip.add_notify_event(track_index, time, class) {
                log::debug!("{}: event '{class}' at {time}", outcome.clip_name);
                outcome.events_added += 1;
            } else {
                log::warn!("{}: event '{class}' at {time} is outside the clip", outcome.clip_name);
                outcome.rejected += 1;
            }
        }
    }
    clip.refresh_derived_caches();
    outcome
}

/// Replace the default track of every referenced clip with one marker per
/// detected contact. Returns the number of markers placed.
pub fn place_contact_markers<C: GaitClip>(
    group: &ReferenceGroup,
    clips: &mut ClipLibrary<C>,
    cfg: &Config,
) -> usize {
    let mut placed = 0;
    for id in group.ids() {
        let (Some(reference), Some(clip)) = (group.get(id), clips.get_mut(id)) else {
            continue;
        };
        clip.remove_notify_track(&cfg.default_track_name);
        let track_index = clip.create_notify_track(&cfg.default_track_name, cfg.track_color);
        let left = reference.left_markers.iter().map(|t| (&cfg.left_marker_name, *t));
        let right = reference.right_markers.iter().map(|t| (&cfg.right_marker_name, *t));
        for (name, time) in left.chain(right) {
            if clip.add_sync_marker(name, time, track_index) {
                placed += 1;
            }
        }
        clip.refresh_derived_caches();
    }
    placed
}
