use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::operator::{Operator, UnknownOperator};
use crate::version::{Version, VersionParseError};

/// A single relational predicate, e.g. `>= 2.25` in `requests >= 2.25, < 3.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpecifier {
    operator: Operator,
    version: Version,
}

impl VersionSpecifier {
    pub fn new(operator: Operator, version: Version) -> Self {
        Self { operator, version }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Whether `version` satisfies this predicate.
    pub fn contains(&self, version: &Version) -> bool {
        match self.operator {
            Operator::Equal => version == &self.version,
            Operator::NotEqual => version != &self.version,
            Operator::LessThan => version < &self.version,
            Operator::LessThanEqual => version <= &self.version,
            Operator::GreaterThan => version > &self.version,
            Operator::GreaterThanEqual => version >= &self.version,
            Operator::CompatibleRelease => {
                version >= &self.version && version < &self.version.next_breaking()
            }
        }
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// A specifier string that is neither a recognized operator nor a parseable version.
#[derive(Debug, thiserror::Error)]
pub enum SpecifierParseError {
    #[error(transparent)]
    Operator(#[from] UnknownOperator),
    #[error(transparent)]
    Version(#[from] VersionParseError),
    #[error("malformed version specifier: `{0}`")]
    Malformed(String),
}

static SPECIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<operator>~=|==|!=|<=|>=|<|>)\s*(?P<version>.+?)\s*$").unwrap()
});

impl FromStr for VersionSpecifier {
    type Err = SpecifierParseError;

    /// Parses a single predicate such as `>=2.25` or `~=1.2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SPECIFIER_RE
            .captures(s)
            .ok_or_else(|| SpecifierParseError::Malformed(s.to_string()))?;
        let operator = caps["operator"].parse::<Operator>()?;
        let version = caps["version"].parse::<Version>()?;
        Ok(Self::new(operator, version))
    }
}
