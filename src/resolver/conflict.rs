// src/resolver/conflict.rs

//! Conflict types for dependency resolution
//!
//! Defines why a resolution failed. Carried by
//! [`Error::Resolution`](crate::Error::Resolution).

/// A conflict between package requirements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// No version of a package satisfies a requirement
    UnsatisfiableConstraint {
        package: String,
        /// Closest version that was considered, if any exists
        version: Option<String>,
        required_constraint: String,
        required_by: String,
    },
    /// Several requirers need versions no single release satisfies
    ConflictingConstraints {
        package: String,
        constraints: Vec<(String, String)>, // (requirer, constraint)
    },
    /// Package is neither installed nor available
    MissingPackage {
        package: String,
        required_by: Vec<String>,
    },
    /// A package kept being re-selected without settling
    TooManyCandidates { package: String, attempts: usize },
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::UnsatisfiableConstraint {
                package,
                version,
                required_constraint,
                required_by,
            } => {
                write!(
                    f,
                    "No version of {} satisfies constraint {} required by {}",
                    package, required_constraint, required_by
                )?;
                if let Some(version) = version {
                    write!(f, " (closest: {})", version)?;
                }
                Ok(())
            }
            Conflict::ConflictingConstraints {
                package,
                constraints,
            } => {
                writeln!(f, "Conflicting version requirements for package {}:", package)?;
                for (requirer, constraint) in constraints {
                    writeln!(f, "  - {} requires {}", requirer, constraint)?;
                }
                Ok(())
            }
            Conflict::MissingPackage {
                package,
                required_by,
            } => {
                write!(
                    f,
                    "Missing package {} required by {}",
                    package,
                    required_by.join(", ")
                )
            }
            Conflict::TooManyCandidates { package, attempts } => write!(
                f,
                "Gave up selecting a version of {} after {} attempts",
                package, attempts
            ),
        }
    }
}
