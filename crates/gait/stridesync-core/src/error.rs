//! Error taxonomy for reference building and marker transplantation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::ClipId;

/// Coarse classification used by callers to decide how to report a failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing bone, track, clip or reference; mismatched contact counts.
    Precondition,
    /// No contact points, or the stabilization walk never settled.
    Detection,
    /// Malformed clip or configuration data.
    Data,
}

/// Errors produced by the gait reference model.
///
/// None of these are fatal to a session: batch operations collect them per clip
/// and keep going.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum GaitError {
    #[error("clip {0:?} is not loaded in this session")]
    ClipNotFound(ClipId),
    #[error("bone '{bone}' not found in clip '{clip}'")]
    BoneNotFound { clip: String, bone: String },
    #[error("notify track '{track}' not found in clip '{clip}'")]
    TrackNotFound { clip: String, track: String },
    #[error("clip '{clip}' has no gait reference in the current group")]
    ReferenceMissing { clip: String },
    #[error("clip '{clip}' has no frames")]
    EmptyClip { clip: String },
    #[error("no contact points detected for bone '{bone}' in clip '{clip}'")]
    NoContacts { clip: String, bone: String },
    #[error("contact count mismatch in clip '{clip}': left {left}, right {right}")]
    ContactCountMismatch {
        clip: String,
        left: usize,
        right: usize,
    },
    #[error(
        "height of bone '{bone}' in clip '{clip}' did not settle within one cycle from frame {frame}"
    )]
    StabilizationDiverged {
        clip: String,
        bone: String,
        frame: usize,
    },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid clip data: {0}")]
    InvalidClip(String),
}

impl GaitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GaitError::ClipNotFound(_)
            | GaitError::BoneNotFound { .. }
            | GaitError::TrackNotFound { .. }
            | GaitError::ReferenceMissing { .. }
            | GaitError::ContactCountMismatch { .. } => ErrorKind::Precondition,
            GaitError::EmptyClip { .. }
            | GaitError::NoContacts { .. }
            | GaitError::StabilizationDiverged { .. } => ErrorKind::Detection,
            GaitError::Parse(_) | GaitError::InvalidClip(_) => ErrorKind::Data,
        }
    }
}

impl From<serde_json::Error> for GaitError {
    fn from(err: serde_json::Error) -> Self {
        GaitError::Parse(err.to_string())
    }
}
