// src/resolver/plan.rs

//! Resolution plan data structures
//!
//! Contains the result type handed to whatever installs and removes files.

use crate::package::PackageVersion;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Versions to add and remove for one requested operation
///
/// `add` is ordered so that dependencies come before their dependents;
/// executors install in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    add: Vec<PackageVersion>,
    remove: Vec<PackageVersion>,
}

impl Plan {
    pub fn new(add: Vec<PackageVersion>, remove: Vec<PackageVersion>) -> Self {
        Self { add, remove }
    }

    /// A plan that changes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn added(&self) -> &[PackageVersion] {
        &self.add
    }

    pub fn removed(&self) -> &[PackageVersion] {
        &self.remove
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        let removed: HashSet<&str> = self.remove.iter().map(|pv| pv.name()).collect();
        let upgrades = self
            .add
            .iter()
            .filter(|pv| removed.contains(pv.name()))
            .count();

        PlanSummary {
            to_add: self.add.len(),
            to_remove: self.remove.len(),
            upgrades,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Nothing to do");
        }
        for pv in &self.remove {
            writeln!(f, "- {}", pv)?;
        }
        for pv in &self.add {
            writeln!(f, "+ {}", pv)?;
        }
        Ok(())
    }
}

/// Counts describing a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub to_add: usize,
    pub to_remove: usize,
    /// Packages that appear in both lists with different versions
    pub upgrades: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    #[test]
    fn test_empty_plan() {
        let plan = Plan::empty();
        assert!(plan.is_empty());
        assert_eq!(plan.to_string(), "Nothing to do\n");
        assert_eq!(
            plan.summary(),
            PlanSummary {
                to_add: 0,
                to_remove: 0,
                upgrades: 0
            }
        );
    }

    #[test]
    fn test_plan_summary_counts_upgrades() {
        let plan = Plan::new(
            vec![
                PackageVersion::new("lib", Version::new(2, 0, 0)),
                PackageVersion::new("new", Version::new(1, 0, 0)),
            ],
            vec![PackageVersion::new("lib", Version::new(1, 0, 0))],
        );
        let summary = plan.summary();
        assert_eq!(summary.to_add, 2);
        assert_eq!(summary.to_remove, 1);
        assert_eq!(summary.upgrades, 1);
        assert_eq!(plan.to_string(), "- lib@1.0.0\n+ lib@2.0.0\n+ new@1.0.0\n");
    }
}
