use std::fmt;
use std::str::FromStr;

use crate::operator::Operator;
use crate::specifier::{SpecifierParseError, VersionSpecifier};
use crate::version::Version;

/// A conjunction of [`VersionSpecifier`] predicates, e.g. `>=2.25, <3.0`.
///
/// An empty range is the universal range: every version is contained in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRange {
    specifiers: Vec<VersionSpecifier>,
}

impl VersionRange {
    /// The range that admits every version.
    pub fn universal() -> Self {
        Self::default()
    }

    pub fn from_specifiers(specifiers: Vec<VersionSpecifier>) -> Self {
        Self { specifiers }
    }

    pub fn specifiers(&self) -> &[VersionSpecifier] {
        &self.specifiers
    }

    pub fn is_universal(&self) -> bool {
        self.specifiers.is_empty()
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.specifiers.iter().all(|spec| spec.contains(version))
    }

    /// The conjunction of `self` and `other`: a version satisfies the result
    /// iff it satisfies both. An empty intersection isn't detected here —
    /// callers test it by checking `contains` against the known version set,
    /// per spec: an unsatisfiable merge surfaces as `Unsat`, not a parse error.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut specifiers = self.specifiers.clone();
        specifiers.extend(other.specifiers.iter().cloned());
        Self { specifiers }
    }

    /// Whether some version could possibly satisfy every predicate in this
    /// range, decided algebraically rather than against a concrete catalog.
    /// Folds `>`/`>=`/`~=` into a tightest lower bound and `<`/`<=`/`~=` into
    /// a tightest upper bound, then checks the bounds (and any `==`/`!=`
    /// predicates) for a contradiction.
    pub fn is_satisfiable(&self) -> bool {
        let mut lower: Option<(Version, bool)> = None;
        let mut upper: Option<(Version, bool)> = None;
        let mut equals: Vec<&Version> = Vec::new();
        let mut not_equals: Vec<&Version> = Vec::new();

        for spec in &self.specifiers {
            match spec.operator() {
                Operator::GreaterThan => tighten_lower(&mut lower, spec.version(), false),
                Operator::GreaterThanEqual => tighten_lower(&mut lower, spec.version(), true),
                Operator::LessThan => tighten_upper(&mut upper, spec.version(), false),
                Operator::LessThanEqual => tighten_upper(&mut upper, spec.version(), true),
                Operator::CompatibleRelease => {
                    tighten_lower(&mut lower, spec.version(), true);
                    tighten_upper_owned(&mut upper, spec.version().next_breaking(), false);
                }
                Operator::Equal => equals.push(spec.version()),
                Operator::NotEqual => not_equals.push(spec.version()),
            }
        }

        if let Some(&pinned) = equals.first() {
            if equals.iter().any(|v| *v != pinned) {
                return false;
            }
            if not_equals.iter().any(|v| *v == pinned) {
                return false;
            }
            if let Some((lo, inclusive)) = &lower {
                if pinned < lo || (pinned == lo && !inclusive) {
                    return false;
                }
            }
            if let Some((hi, inclusive)) = &upper {
                if pinned > hi || (pinned == hi && !inclusive) {
                    return false;
                }
            }
            return true;
        }

        match (&lower, &upper) {
            (Some((lo, lo_inclusive)), Some((hi, hi_inclusive))) => match lo.cmp(hi) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Equal => *lo_inclusive && *hi_inclusive,
                std::cmp::Ordering::Greater => false,
            },
            _ => true,
        }
    }
}

fn tighten_lower(current: &mut Option<(Version, bool)>, candidate: &Version, inclusive: bool) {
    let replace = match current {
        Some((existing, _)) => candidate > existing,
        None => true,
    };
    if replace {
        *current = Some((candidate.clone(), inclusive));
    }
}

fn tighten_upper(current: &mut Option<(Version, bool)>, candidate: &Version, inclusive: bool) {
    let replace = match current {
        Some((existing, _)) => candidate < existing,
        None => true,
    };
    if replace {
        *current = Some((candidate.clone(), inclusive));
    }
}

fn tighten_upper_owned(current: &mut Option<(Version, bool)>, candidate: Version, inclusive: bool) {
    let replace = match current {
        Some((existing, _)) => candidate < *existing,
        None => true,
    };
    if replace {
        *current = Some((candidate, inclusive));
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.specifiers.is_empty() {
            return write!(f, "*");
        }
        let joined = self
            .specifiers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{joined}")
    }
}

impl FromStr for VersionRange {
    type Err = SpecifierParseError;

    /// Parses a comma-separated list of predicates, e.g. `>=2.25, <3.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::universal());
        }
        let specifiers = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(VersionSpecifier::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_specifiers(specifiers))
    }
}
