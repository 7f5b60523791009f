//! StrideSync Core (engine-agnostic)
//!
//! Gait-phase reference model for locomotion clips sharing one rig:
//! - contact detection from per-frame foot trajectories (`contact`)
//! - alternating left/right stance intervals over the loop (`interval`, `reference`)
//! - phase-preserving transplantation of sync markers and notify events
//!   from one reference clip onto every clip in a group (`transplant`)
//!
//! Hosts provide clip data through `PoseSource` and `NotifyEditor`; `SampledClip`
//! is the in-memory implementation used by fixtures and adapters.

pub mod clip;
pub mod config;
pub mod contact;
pub mod direction;
pub mod error;
pub mod group;
pub mod ids;
pub mod interval;
pub mod library;
pub mod notify;
pub mod playback;
pub mod reference;
pub mod session;
pub mod transplant;

// Re-exports for consumers (adapters)
pub use clip::{GaitClip, PoseSource, SampledClip};
pub use config::Config;
pub use contact::detect_contact_times;
pub use direction::{classify, Classification, Direction};
pub use error::{ErrorKind, GaitError};
pub use group::ReferenceGroup;
pub use ids::ClipId;
pub use interval::{FootOrder, StanceInterval};
pub use library::ClipLibrary;
pub use notify::{NotifyEditor, NotifyEvent, NotifyTrack, SyncMarker, TrackColor};
pub use playback::{NameFilter, PlaybackRate};
pub use reference::{GaitReference, Phase};
pub use session::{BuildReport, GaitSession};
pub use transplant::{transplant, ClipTransplant, TransplantReport};
