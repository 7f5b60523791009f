//! Session: owns loaded clips, the reference group and the tool config, and
//! exposes the button-level operations an editor UI triggers.
//!
//! Methods:
//! - load_clip, build_reference / build_references, clear_references
//! - transplant, add_default_markers
//! - select_clips, apply_rate_scale, apply_root_motion_speed

use serde::{Deserialize, Serialize};

use crate::clip::{GaitClip, SampledClip};
use crate::config::Config;
use crate::error::GaitError;
use crate::group::ReferenceGroup;
use crate::ids::{ClipId, IdAllocator};
use crate::library::ClipLibrary;
use crate::playback::{self, NameFilter, PlaybackRate};
use crate::reference::GaitReference;
use crate::transplant::{self, TransplantReport};

/// Outcome of a batch reference build.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub built: Vec<ClipId>,
    /// Clips that already had a reference and were left as is.
    pub cached: Vec<ClipId>,
    #[serde(skip)]
    pub failed: Vec<(ClipId, GaitError)>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn diagnostics(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.built.is_empty() {
            lines.push(format!("built {} gait references", self.built.len()));
        }
        if !self.cached.is_empty() {
            lines.push(format!("{} clips already referenced", self.cached.len()));
        }
        for (_, err) in self.failed.iter() {
            lines.push(format!("skipped: {err}"));
        }
        lines
    }
}

#[derive(Debug)]
pub struct GaitSession<C: GaitClip = SampledClip> {
    cfg: Config,
    ids: IdAllocator,
    clips: ClipLibrary<C>,
    group: ReferenceGroup,
}

impl<C: GaitClip> GaitSession<C> {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            clips: ClipLibrary::default(),
            group: ReferenceGroup::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn load_clip(&mut self, clip: C) -> ClipId {
        let id = self.ids.alloc_clip();
        self.clips.insert(id, clip);
        id
    }

    pub fn clip(&self, id: ClipId) -> Option<&C> {
        self.clips.get(id)
    }

    pub fn clip_mut(&mut self, id: ClipId) -> Option<&mut C> {
        self.clips.get_mut(id)
    }

    pub fn clip_ids(&self) -> Vec<ClipId> {
        self.clips.ids()
    }

    pub fn find_clip(&self, name: &str) -> Option<ClipId> {
        self.clips.find_by_name(name)
    }

    pub fn references(&self) -> &ReferenceGroup {
        &self.group
    }

    pub fn reference(&self, id: ClipId) -> Option<&GaitReference> {
        self.group.get(id)
    }

    /// Clips whose names pass `filter`, in load order.
    pub fn select_clips(&self, filter: &NameFilter) -> Vec<ClipId> {
        self.clips
            .iter()
            .filter(|(_, clip)| filter.matches(clip.clip_name()))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Build (or rebuild) the reference for one clip. Only a valid reference is cached.
    pub fn build_reference(
        &mut self,
        id: ClipId,
        left_bone: &str,
        right_bone: &str,
    ) -> Result<&GaitReference, GaitError> {
        let clip = self.clips.get(id).ok_or(GaitError::ClipNotFound(id))?;
        // Any failed rebuild drops the stale entry.
        self.group.remove(id);
        for bone in [left_bone, right_bone] {
            if !clip.has_bone(bone) {
                let err = GaitError::BoneNotFound {
                    clip: clip.clip_name().to_string(),
                    bone: bone.to_string(),
                };
                log::warn!("{err}");
                return Err(err);
            }
        }
        let reference = GaitReference::build(clip, left_bone, right_bone, &self.cfg);
        if let Some(err) = reference.failure() {
            log::warn!("excluding {} from the reference group: {err}", clip.clip_name());
        }
        self.group.insert(id, reference)?;
        self.group.get(id).ok_or_else(|| GaitError::ReferenceMissing {
            clip: format!("{id:?}"),
        })
    }

    /// Build references for every listed clip that does not have one yet.
    /// Failures are collected; the batch always runs to the end.
    pub fn build_references(
        &mut self,
        ids: &[ClipId],
        left_bone: &str,
        right_bone: &str,
    ) -> BuildReport {
        let mut report = BuildReport::default();
        for &id in ids {
            if self.group.contains(id) {
                report.cached.push(id);
                continue;
            }
            match self.build_reference(id, left_bone, right_bone) {
                Ok(_) => report.built.push(id),
                Err(err) => report.failed.push((id, err)),
            }
        }
        log::info!(
            "reference group: {} built, {} cached, {} failed",
            report.built.len(),
            report.cached.len(),
            report.failed.len()
        );
        report
    }

    pub fn build_all(&mut self, left_bone: &str, right_bone: &str) -> BuildReport {
        let ids = self.clip_ids();
        self.build_references(&ids, left_bone, right_bone)
    }

    pub fn clear_references(&mut self) {
        self.group.clear();
    }

    pub fn transplant(&mut self, source: ClipId, track: &str) -> Result<TransplantReport, GaitError> {
        transplant::transplant(&self.group, &mut self.clips, source, track, &self.cfg).map_err(
            |err| {
                log::warn!("transplant of track '{track}' aborted: {err}");
                err
            },
        )
    }

    /// Place raw contact markers on the default track of every referenced clip.
    pub fn add_default_markers(&mut self) -> usize {
        transplant::place_contact_markers(&self.group, &mut self.clips, &self.cfg)
    }
}

impl<C: GaitClip + PlaybackRate> GaitSession<C> {
    pub fn apply_rate_scale(&mut self, ids: &[ClipId], scale: f32) {
        for &id in ids {
            if let Some(clip) = self.clips.get_mut(id) {
                playback::apply_rate_scale([clip], scale);
            }
        }
    }

    /// Returns the clips skipped for having no root motion.
    pub fn apply_root_motion_speed(&mut self, ids: &[ClipId], target_speed: f32) -> Vec<ClipId> {
        let epsilon = self.cfg.root_motion_epsilon;
        let mut skipped = Vec::new();
        for &id in ids {
            let Some(clip) = self.clips.get_mut(id) else {
                continue;
            };
            if playback::apply_root_motion_speed([&mut *clip], target_speed, epsilon) > 0 {
                log::warn!("clip {} has no root motion; skipping", clip.clip_name());
                skipped.push(id);
            }
        }
        skipped
    }
}

impl Default for GaitSession<SampledClip> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
