// src/error.rs

//! Error types shared by the version, package and resolver modules

use crate::resolver::Conflict;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing versions, loading package lists or planning
#[derive(Debug, Error)]
pub enum Error {
    /// Version string does not match `major[.minor[.revision]]`
    #[error("Malformed version '{0}'")]
    MalformedVersion(String),

    /// Version spec string is not a valid version spec
    #[error("Malformed version spec '{0}'")]
    MalformedVersionSpec(String),

    /// Requested package is not present in the available list
    #[error("Unknown package '{0}'")]
    UnknownPackage(String),

    /// Package exists but no version satisfies the requested spec
    #[error("No version of package '{name}' matches '{spec}'")]
    UnknownPackageVersion { name: String, spec: String },

    /// Remove or upgrade requested for a package that is not installed
    #[error("Package '{0}' is not installed")]
    NotInstalled(String),

    /// An installed package that stays behind still needs this one
    #[error("Package '{name}' is required by installed package '{dependent}'")]
    HasDependent { name: String, dependent: String },

    /// No consistent assignment of versions exists
    #[error("Dependency resolution failed: {0}")]
    Resolution(Conflict),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Repository index or project manifest is not valid TOML
    #[error("Failed to parse {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A package list could not be written out as TOML
    #[error("Failed to serialize manifest")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<Conflict> for Error {
    fn from(conflict: Conflict) -> Self {
        Error::Resolution(conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_cause_reported_once() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "I/O error");
        assert_eq!(err.source().unwrap().to_string(), "gone");
    }

    #[test]
    fn test_manifest_cause_reported_once() {
        let source = toml::from_str::<toml::Table>("[broken").unwrap_err();
        let cause = source.to_string();
        let err = Error::Manifest {
            path: PathBuf::from("repository.toml"),
            source,
        };
        assert_eq!(err.to_string(), "Failed to parse repository.toml");
        assert_eq!(err.source().unwrap().to_string(), cause);
    }

    #[test]
    fn test_serialize_error() {
        let err = Error::from(<toml::ser::Error as serde::ser::Error>::custom("unsupported"));
        assert!(matches!(err, Error::Serialize(_)));
        assert_eq!(err.to_string(), "Failed to serialize manifest");
        assert!(err.source().unwrap().to_string().contains("unsupported"));
    }
}
