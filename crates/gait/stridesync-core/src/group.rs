//! Session-scoped cache of gait references keyed by clip.
//!
//! Only valid references are stored. Entries are never invalidated
//! automatically: rebuild after a clip's skeleton or length changes.

use hashbrown::HashMap;

use crate::error::GaitError;
use crate::ids::ClipId;
use crate::reference::GaitReference;

#[derive(Debug, Default, Clone)]
pub struct ReferenceGroup {
    refs: HashMap<ClipId, GaitReference>,
}

impl ReferenceGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reference, replacing any previous one for the clip. Invalid
    /// references are rejected with their failure.
    pub fn insert(&mut self, clip: ClipId, reference: GaitReference) -> Result<(), GaitError> {
        let reference = reference.into_result()?;
        self.refs.insert(clip, reference);
        Ok(())
    }

    pub fn get(&self, clip: ClipId) -> Option<&GaitReference> {
        self.refs.get(&clip)
    }

    pub fn contains(&self, clip: ClipId) -> bool {
        self.refs.contains_key(&clip)
    }

    pub fn remove(&mut self, clip: ClipId) -> Option<GaitReference> {
        self.refs.remove(&clip)
    }

    pub fn clear(&mut self) {
        self.refs.clear();
    }

    /// Clip ids in ascending order.
    pub fn ids(&self) -> Vec<ClipId> {
        let mut ids: Vec<ClipId> = self.refs.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;

    fn valid(name: &str) -> GaitReference {
        GaitReference::from_contacts(name, 2.0, Direction::Forward, vec![0.2], vec![1.2], "l", "r")
    }

    #[test]
    fn rejects_invalid_and_keeps_valid() {
        let mut group = ReferenceGroup::new();
        group.insert(ClipId(3), valid("B_F")).unwrap();
        group.insert(ClipId(1), valid("A_F")).unwrap();
        let bad = GaitReference::from_contacts(
            "C_F",
            2.0,
            Direction::Forward,
            vec![0.2, 0.4],
            vec![1.2],
            "l",
            "r",
        );
        assert!(group.insert(ClipId(2), bad).is_err());
        assert!(!group.contains(ClipId(2)));
        assert_eq!(group.ids(), vec![ClipId(1), ClipId(3)]);
        group.clear();
        assert!(group.is_empty());
    }

    #[test]
    fn restored_snapshots_keep_their_validity() {
        let mut group = ReferenceGroup::new();
        let bad = GaitReference::from_contacts(
            "Limp_F",
            2.0,
            Direction::Forward,
            vec![0.2, 0.4],
            vec![1.2],
            "l",
            "r",
        );
        let restored: GaitReference =
            serde_json::from_str(&serde_json::to_string(&bad).unwrap()).unwrap();
        let err = group.insert(ClipId(7), restored).unwrap_err();
        assert!(matches!(err, GaitError::ContactCountMismatch { left: 2, right: 1, .. }));
        assert!(group.is_empty());

        // A hand-written snapshot with no intervals is not a usable reference either.
        let bare: GaitReference = serde_json::from_str(
            r#"{"clip_name":"Idle_F","duration":1.0,"direction":"Forward",
                "left_markers":[],"right_markers":[],"intervals":[]}"#,
        )
        .unwrap();
        assert!(matches!(
            group.insert(ClipId(8), bare),
            Err(GaitError::ReferenceMissing { .. })
        ));
        assert!(group.is_empty());
    }
}
