//! Stance intervals: one gait half-cycle between consecutive contacts of
//! opposite feet, on a looping timeline.

use serde::{Deserialize, Serialize};

/// Which foot lands at the interval's left bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FootOrder {
    LeftRight,
    RightLeft,
}

impl FootOrder {
    pub fn flipped(self) -> FootOrder {
        match self {
            FootOrder::LeftRight => FootOrder::RightLeft,
            FootOrder::RightLeft => FootOrder::LeftRight,
        }
    }
}

/// `[left, right)` on a loop of some duration. When `left > right` the interval
/// runs past the end of the clip and continues from time 0.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StanceInterval {
    pub left: f32,
    pub right: f32,
    pub order: FootOrder,
}

impl StanceInterval {
    pub fn new(left: f32, right: f32, order: FootOrder) -> Self {
        Self { left, right, order }
    }

    #[inline]
    pub fn is_wrapped(&self) -> bool {
        self.left > self.right
    }

    /// Interval length on a loop of `duration`.
    pub fn length(&self, duration: f32) -> f32 {
        if self.is_wrapped() {
            self.right + duration - self.left
        } else {
            self.right - self.left
        }
    }

    /// Half-open containment; wrapped intervals cover `[left, duration)` and `[0, right)`.
    pub fn contains(&self, time: f32) -> bool {
        if self.is_wrapped() {
            time >= self.left || time < self.right
        } else {
            time >= self.left && time < self.right
        }
    }

    /// Position of `time` within the interval, in `[0, 1)` for contained times.
    pub fn ratio_at(&self, time: f32, duration: f32) -> f32 {
        let len = self.length(duration);
        if len <= 0.0 {
            return 0.0;
        }
        let t = if self.is_wrapped() && time < self.left {
            time + duration
        } else {
            time
        };
        (t - self.left) / len
    }

    /// Inverse of `ratio_at`, folded back into `[0, duration)`.
    pub fn time_at(&self, ratio: f32, duration: f32) -> f32 {
        let t = self.left + self.length(duration) * ratio;
        if self.is_wrapped() && t >= duration {
            t - duration
        } else {
            t
        }
    }
}

/// Pair up sorted contact lists into alternating intervals.
///
/// Whichever foot lands first in raw clip time opens the first interval. The
/// final interval closes on the first contact of the opposite foot and is
/// therefore wrapped. Callers guarantee both lists are non-empty and equal in length.
pub fn pair_contacts(left: &[f32], right: &[f32]) -> Vec<StanceInterval> {
    let n = left.len().min(right.len());
    if n == 0 {
        return Vec::new();
    }
    let (first, second, order) = if left[0] < right[0] {
        (left, right, FootOrder::LeftRight)
    } else {
        (right, left, FootOrder::RightLeft)
    };
    let mut intervals = Vec::with_capacity(2 * n);
    for i in 0..n {
        intervals.push(StanceInterval::new(first[i], second[i], order));
        let close = if i + 1 == n { first[0] } else { first[i + 1] };
        intervals.push(StanceInterval::new(second[i], close, order.flipped()));
    }
    intervals
}
