use std::fmt;

use crate::name::PackageName;
use crate::range::VersionRange;

/// A `(package, range)` constraint. Requirements originate from the manifest
/// (direct) or from a package version's declared dependencies (transitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    name: PackageName,
    range: VersionRange,
}

impl Requirement {
    pub fn new(name: PackageName, range: VersionRange) -> Self {
        Self { name, range }
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    pub fn range(&self) -> &VersionRange {
        &self.range
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.range.is_universal() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.range)
        }
    }
}
