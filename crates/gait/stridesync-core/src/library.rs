//! Clip storage addressed by `ClipId`.

use crate::clip::PoseSource;
use crate::ids::ClipId;

/// Minimal clip library: insertion-ordered, linear lookup.
#[derive(Debug)]
pub struct ClipLibrary<C> {
    items: Vec<(ClipId, C)>,
}

impl<C> Default for ClipLibrary<C> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<C> ClipLibrary<C> {
    pub fn insert(&mut self, id: ClipId, clip: C) {
        self.items.push((id, clip));
    }

    pub fn get(&self, id: ClipId) -> Option<&C> {
        self.items
            .iter()
            .find_map(|(c, clip)| if *c == id { Some(clip) } else { None })
    }

    pub fn get_mut(&mut self, id: ClipId) -> Option<&mut C> {
        self.items
            .iter_mut()
            .find_map(|(c, clip)| if *c == id { Some(clip) } else { None })
    }

    pub fn ids(&self) -> Vec<ClipId> {
        self.items.iter().map(|(id, _)| *id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ClipId, C)> {
        self.items.iter()
    }
}

impl<C: PoseSource> ClipLibrary<C> {
    pub fn find_by_name(&self, name: &str) -> Option<ClipId> {
        self.items
            .iter()
            .find(|(_, clip)| clip.clip_name() == name)
            .map(|(id, _)| *id)
    }
}
