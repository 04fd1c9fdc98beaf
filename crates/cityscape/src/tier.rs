//! Day-count tiers.
//!
//! Thresholds: `0` is an empty lot, `1..=3` XSmall, `4..=6` Small, `7..=9`
//! Medium and everything from `10` up is Large. The ranges are contiguous and
//! cover all of `u32`, so classification is total.

use serde::{Deserialize, Serialize};

/// Size bucket of one day's entity, ordered from empty to large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Empty,
    XSmall,
    Small,
    Medium,
    Large,
}

/// Upper bound (inclusive) of each non-empty tier except the open-ended last.
const XSMALL_MAX: u32 = 3;
const SMALL_MAX: u32 = 6;
const MEDIUM_MAX: u32 = 9;
const SMALL_MIN: u32 = XSMALL_MAX + 1;
const MEDIUM_MIN: u32 = SMALL_MAX + 1;

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Empty,
        Tier::XSmall,
        Tier::Small,
        Tier::Medium,
        Tier::Large,
    ];

    /// Map a raw day count to its tier.
    pub fn classify(count: u32) -> Tier {
        match count {
            0 => Tier::Empty,
            1..=XSMALL_MAX => Tier::XSmall,
            SMALL_MIN..=SMALL_MAX => Tier::Small,
            MEDIUM_MIN..=MEDIUM_MAX => Tier::Medium,
            _ => Tier::Large,
        }
    }

    /// 0 for Empty up to 4 for Large.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_empty(self) -> bool {
        self == Tier::Empty
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Empty => "Empty",
            Tier::XSmall => "XSmall",
            Tier::Small => "Small",
            Tier::Medium => "Medium",
            Tier::Large => "Large",
        }
    }
}
