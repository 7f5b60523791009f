//! Locomotion direction derived from the clip naming convention.
//!
//! Clip names end in a direction tag: `FL`, `FR`, `BL`, `BR` for diagonals and
//! `F`, `B`, `L`, `R` for cardinals. Diagonal tags are checked first so `Walk_FL`
//! is not read as a plain left strafe.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Backward,
    LeftForward,
    RightForward,
    LeftBackward,
    RightBackward,
}

/// Trajectory coordinate used for turning-point detection.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
}

/// Which local extremum marks the end of a swing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Extremum {
    Maximum,
    Minimum,
}

const SUFFIXES: [(&str, Direction); 8] = [
    ("FL", Direction::LeftForward),
    ("FR", Direction::RightForward),
    ("BL", Direction::LeftBackward),
    ("BR", Direction::RightBackward),
    ("F", Direction::Forward),
    ("B", Direction::Backward),
    ("R", Direction::Right),
    ("L", Direction::Left),
];

/// Outcome of classifying a clip name.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Classification {
    Matched(Direction),
    /// No suffix matched; callers fall back to `Forward` and should warn.
    Unmatched,
}

impl Classification {
    pub fn direction(self) -> Direction {
        match self {
            Classification::Matched(d) => d,
            Classification::Unmatched => Direction::Forward,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Classification::Unmatched)
    }
}

/// Classify a clip name by its direction suffix (case-sensitive).
pub fn classify(name: &str) -> Classification {
    SUFFIXES
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|(_, d)| Classification::Matched(*d))
        .unwrap_or(Classification::Unmatched)
}

impl Direction {
    /// Direction for a clip name, logging a warning when the naming convention
    /// is not followed.
    pub fn from_clip_name(name: &str) -> Direction {
        let class = classify(name);
        if class.is_fallback() {
            log::warn!("no direction suffix on clip '{name}', assuming forward; check naming convention");
        }
        class.direction()
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            _ => Axis::Y,
        }
    }

    pub fn extremum(self) -> Extremum {
        match self {
            Direction::Left
            | Direction::Forward
            | Direction::LeftForward
            | Direction::RightForward => Extremum::Maximum,
            Direction::Right
            | Direction::Backward
            | Direction::LeftBackward
            | Direction::RightBackward => Extremum::Minimum,
        }
    }

    /// True when `cur` is a strict local extremum between `prev` and `next`
    /// along this direction's axis.
    pub fn is_turning_point(self, prev: [f32; 3], cur: [f32; 3], next: [f32; 3]) -> bool {
        let i = match self.axis() {
            Axis::X => 0,
            Axis::Y => 1,
        };
        let (p, c, n) = (prev[i], cur[i], next[i]);
        match self.extremum() {
            Extremum::Maximum => p < c && c > n,
            Extremum::Minimum => p > c && c < n,
        }
    }
}
