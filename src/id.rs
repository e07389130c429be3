use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identity of a profile, assigned by the store.
///
/// Serialized as a bare integer so that the favorites list stays
/// compatible with plain `[1, 2, 3]` arrays.
#[derive(
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Clone,
    Copy,
    Debug,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ProfileId(pub u64);

impl ProfileId {
    pub fn next(self) -> Self {
        ProfileId(self.0 + 1)
    }
}

impl From<u64> for ProfileId {
    fn from(value: u64) -> Self {
        ProfileId(value)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProfileId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ProfileId)
    }
}
