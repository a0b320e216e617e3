//! Visitor demographics and ride thrill categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// How intense a ride is.  Used to filter which rides a demographic accepts.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrillCategory {
    Family,
    Thrill,
}

impl ThrillCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ThrillCategory::Family => "family",
            ThrillCategory::Thrill => "thrill",
        }
    }
}

impl fmt::Display for ThrillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visitor demographic.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Demographic {
    Kid,
    Adult,
    Elder,
}

impl Demographic {
    pub const ALL: [Demographic; 3] = [Demographic::Kid, Demographic::Adult, Demographic::Elder];

    /// Thrill categories this demographic is willing to ride.
    pub fn allowed_thrills(self) -> &'static [ThrillCategory] {
        match self {
            Demographic::Kid | Demographic::Elder => &[ThrillCategory::Family],
            Demographic::Adult => &[ThrillCategory::Thrill, ThrillCategory::Family],
        }
    }

    #[inline]
    pub fn accepts(self, thrill: ThrillCategory) -> bool {
        self.allowed_thrills().contains(&thrill)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Demographic::Kid   => "kid",
            Demographic::Adult => "adult",
            Demographic::Elder => "elder",
        }
    }
}

impl fmt::Display for Demographic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Demographic {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kid"   => Ok(Demographic::Kid),
            "adult" => Ok(Demographic::Adult),
            "elder" => Ok(Demographic::Elder),
            other   => Err(CoreError::Parse(format!("unknown demographic `{other}`"))),
        }
    }
}
