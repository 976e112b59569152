use std::fmt;

/// A package name, compared case-insensitively the way the rest of the
/// pipeline treats them (the manifest, the graph and the solver all key on
/// this normalized form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Self::normalize(&name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalize(name: &str) -> String {
        name.trim().to_lowercase().replace(['_', '.'], "-")
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PackageName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_separators() {
        assert_eq!(PackageName::new("Foo_Bar.Baz"), PackageName::new("foo-bar-baz"));
    }
}
