// src/version/mod.rs

//! Version handling and constraint satisfaction for package dependencies
//!
//! Versions are three numeric components (`major.minor.revision`) compared
//! component by component. Constraints on them live in [`VersionSpec`].

mod spec;

pub use spec::VersionSpec;

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A package version: `major.minor.revision`
///
/// Ordering is numeric per component, so `1.10.0 > 1.9.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub revision: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, revision: u64) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Parse a version string
    ///
    /// Format: major[.minor[.revision]]
    /// Examples:
    /// - "1.2.3" → 1.2.3
    /// - "1.2" → 1.2.0
    /// - "4" → 4.0.0
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::MalformedVersion(s.to_string()));
        }

        let mut components = [0u64; 3];
        let mut count = 0;
        for part in trimmed.split('.') {
            if count == components.len()
                || part.is_empty()
                || !part.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(Error::MalformedVersion(s.to_string()));
            }
            components[count] = part
                .parse::<u64>()
                .map_err(|_| Error::MalformedVersion(s.to_string()))?;
            count += 1;
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}
