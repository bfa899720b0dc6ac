// src/version/spec.rs

//! Version constraints
//!
//! Textual grammar:
//! - `"*"` (or an empty string) → any version
//! - `"1.2.3!"` → exactly 1.2.3
//! - `"1.2.3+"` → 1.2.3 or newer
//! - `"1.2.3-"` → 1.2.3 or older
//! - `"1.2.3-4.5.6"` → inclusive range, endpoints in either order
//! - `"1.2.3"` → same as `"1.2.3+"`

use super::Version;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed constraint describing which versions of a package are acceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    /// Any version is acceptable
    Any,
    /// Exact version match
    Exact(Version),
    /// Greater than or equal
    AtLeast(Version),
    /// Less than or equal
    AtMost(Version),
    /// Inclusive range, `lo <= hi` always holds
    Range(Version, Version),
}

impl VersionSpec {
    /// Build a range, swapping the endpoints if they are given in reverse
    pub fn range(a: Version, b: Version) -> Self {
        if a <= b {
            VersionSpec::Range(a, b)
        } else {
            VersionSpec::Range(b, a)
        }
    }

    /// Parse a version spec string
    pub fn parse(s: &str) -> Result<Self> {
        let spec = s.trim();
        let malformed = || Error::MalformedVersionSpec(s.to_string());

        if spec.is_empty() || spec == "*" {
            return Ok(VersionSpec::Any);
        }

        let version = |text: &str| Version::parse(text).map_err(|_| malformed());

        if let Some(rest) = spec.strip_suffix('!') {
            Ok(VersionSpec::Exact(version(rest)?))
        } else if let Some(rest) = spec.strip_suffix('+') {
            Ok(VersionSpec::AtLeast(version(rest)?))
        } else if let Some(rest) = spec.strip_suffix('-') {
            Ok(VersionSpec::AtMost(version(rest)?))
        } else if let Some((lo, hi)) = spec.split_once('-') {
            Ok(VersionSpec::range(version(lo)?, version(hi)?))
        } else {
            // No suffix behaves as a lower bound
            Ok(VersionSpec::AtLeast(version(spec)?))
        }
    }

    /// Check if a version satisfies this spec
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        self.compare_against_version(version) == Ordering::Equal
    }

    /// Position of `version` relative to the accepted interval
    ///
    /// `Equal` when the version satisfies this spec, `Less` when it is too
    /// old, `Greater` when it is too new.
    pub fn compare_against_version(&self, version: &Version) -> Ordering {
        let (lo, hi) = self.bounds();
        if lo.is_some_and(|lo| version < &lo) {
            Ordering::Less
        } else if hi.is_some_and(|hi| version > &hi) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Inclusive lower and upper bounds, `None` meaning unbounded
    pub fn bounds(&self) -> (Option<Version>, Option<Version>) {
        match *self {
            VersionSpec::Any => (None, None),
            VersionSpec::Exact(v) => (Some(v), Some(v)),
            VersionSpec::AtLeast(v) => (Some(v), None),
            VersionSpec::AtMost(v) => (None, Some(v)),
            VersionSpec::Range(lo, hi) => (Some(lo), Some(hi)),
        }
    }

    /// Check if some version could satisfy both specs at once
    pub fn is_compatible_with(&self, other: &VersionSpec) -> bool {
        let (lo_a, hi_a) = self.bounds();
        let (lo_b, hi_b) = other.bounds();
        let lo = lo_a.max(lo_b);
        let hi = match (hi_a, hi_b) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        match (lo, hi) {
            (Some(lo), Some(hi)) => lo <= hi,
            _ => true,
        }
    }
}

impl Default for VersionSpec {
    fn default() -> Self {
        VersionSpec::Any
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Any => write!(f, "*"),
            VersionSpec::Exact(v) => write!(f, "{}!", v),
            VersionSpec::AtLeast(v) => write!(f, "{}+", v),
            VersionSpec::AtMost(v) => write!(f, "{}-", v),
            VersionSpec::Range(lo, hi) => write!(f, "{}-{}", lo, hi),
        }
    }
}

impl FromStr for VersionSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for VersionSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        VersionSpec::parse(&s).map_err(serde::de::Error::custom)
    }
}
