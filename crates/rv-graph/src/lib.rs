//! The read-only knowledge graph (C2) and the dependency-closure computation
//! that expands a set of direct requirements into the candidate universe the
//! solver chooses from (C3).
//!
//! Loading the catalog's on-disk JSON is this crate's job; fetching it from
//! a registry is not — the adapter only ever sees bytes already on disk or
//! in memory.

mod closure;
mod error;

use std::collections::BTreeMap;

use rv_version::{PackageName, Requirement, Version, VersionRange};
use serde::Deserialize;

pub use closure::{close_candidates, CandidateUniverse, EmptyCandidate};
pub use error::GraphError;

/// Everything the knowledge graph records about a single resolved version of
/// a package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    requires_interpreter: Option<String>,
}

/// A fully parsed `(package, version)` record with its declared dependencies
/// and interpreter range, as exposed to the rest of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    name: PackageName,
    version: Version,
    dependencies: Vec<Requirement>,
    requires_interpreter: VersionRange,
}

impl PackageVersion {
    pub fn name(&self) -> &PackageName {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn dependencies(&self) -> &[Requirement] {
        &self.dependencies
    }

    pub fn requires_interpreter(&self) -> &VersionRange {
        &self.requires_interpreter
    }
}

/// The on-disk shape: `packages -> versions -> metadata`. Matches
/// `original_source/read.py`'s `KGraph.json` layout.
#[derive(Debug, Deserialize)]
struct RawGraph {
    packages: BTreeMap<String, BTreeMap<String, PackageMetadata>>,
}

/// The read-only catalog of packages, versions, dependencies and interpreter
/// ranges. Loaded once per process and treated as immutable for the
/// duration of every resolution run it backs.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    packages: BTreeMap<PackageName, BTreeMap<Version, PackageVersion>>,
}

impl KnowledgeGraph {
    /// Parses a knowledge graph from its JSON serialization.
    pub fn from_json(text: &str) -> Result<Self, GraphError> {
        let raw: RawGraph = serde_json::from_str(text)?;
        tracing::debug!(packages = raw.packages.len(), "knowledge graph document parsed");

        let mut packages = BTreeMap::new();
        for (name_str, versions) in raw.packages {
            let name = PackageName::new(&name_str);
            let mut by_version = BTreeMap::new();
            for (version_str, meta) in versions {
                let version: Version = version_str
                    .parse()
                    .map_err(|source| GraphError::BadVersion {
                        package: name.clone(),
                        version: version_str.clone(),
                        source,
                    })?;

                let dependencies = meta
                    .dependencies
                    .iter()
                    .map(|raw_req| parse_requirement(&name, raw_req))
                    .collect::<Result<Vec<_>, _>>()?;

                let requires_interpreter = match meta.requires_interpreter {
                    Some(range_str) => {
                        range_str
                            .parse()
                            .map_err(|source| GraphError::BadInterpreterRange {
                                package: name.clone(),
                                version: version.clone(),
                                source,
                            })?
                    }
                    None => VersionRange::universal(),
                };

                by_version.insert(
                    version.clone(),
                    PackageVersion {
                        name: name.clone(),
                        version,
                        dependencies,
                        requires_interpreter,
                    },
                );
            }
            packages.insert(name, by_version);
        }

        tracing::debug!(packages = packages.len(), "knowledge graph loaded");
        Ok(Self { packages })
    }

    /// Versions of `name` known to the graph, newest first.
    pub fn versions_of(&self, name: &PackageName) -> Result<Vec<&Version>, GraphError> {
        let by_version = self
            .packages
            .get(name)
            .ok_or_else(|| GraphError::UnknownPackage(name.clone()))?;
        Ok(by_version.keys().rev().collect())
    }

    /// Declared dependencies of `(name, version)`.
    pub fn dependencies_of(
        &self,
        name: &PackageName,
        version: &Version,
    ) -> Result<&[Requirement], GraphError> {
        Ok(self.lookup(name, version)?.dependencies())
    }

    /// Interpreter range declared by `(name, version)`; universal if absent.
    pub fn interpreter_range_of(
        &self,
        name: &PackageName,
        version: &Version,
    ) -> Result<&VersionRange, GraphError> {
        Ok(self.lookup(name, version)?.requires_interpreter())
    }

    /// Every version of `name` present in the graph that satisfies `range`,
    /// newest first.
    pub fn matching_versions(
        &self,
        name: &PackageName,
        range: &VersionRange,
    ) -> Result<Vec<&Version>, GraphError> {
        Ok(self
            .versions_of(name)?
            .into_iter()
            .filter(|v| range.contains(v))
            .collect())
    }

    fn lookup(&self, name: &PackageName, version: &Version) -> Result<&PackageVersion, GraphError> {
        let by_version = self
            .packages
            .get(name)
            .ok_or_else(|| GraphError::UnknownPackage(name.clone()))?;
        by_version
            .get(version)
            .ok_or_else(|| GraphError::UnknownVersion {
                package: name.clone(),
                version: version.clone(),
            })
    }
}

fn parse_requirement(owner: &PackageName, raw: &str) -> Result<Requirement, GraphError> {
    let trimmed = raw.trim();
    let split_at = trimmed
        .find(|c: char| "=!<>~".contains(c))
        .unwrap_or(trimmed.len());
    let (name_part, range_part) = trimmed.split_at(split_at);
    let name = name_part.trim();
    if name.is_empty() {
        return Err(GraphError::BadDependency {
            package: owner.clone(),
            text: raw.to_string(),
        });
    }
    let range: VersionRange = range_part
        .parse()
        .map_err(|_| GraphError::BadDependency {
            package: owner.clone(),
            text: raw.to_string(),
        })?;
    Ok(Requirement::new(PackageName::new(name), range))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnowledgeGraph {
        let json = indoc::indoc! {r#"
            {
                "packages": {
                    "a": {
                        "1.0": { "dependencies": ["b>=2.0"] }
                    },
                    "b": {
                        "1.0": {},
                        "2.0": {},
                        "2.1": {}
                    }
                }
            }
        "#};
        KnowledgeGraph::from_json(json).unwrap()
    }

    #[test]
    fn parses_versions_newest_first() {
        let graph = sample();
        let versions = graph.versions_of(&PackageName::new("b")).unwrap();
        assert_eq!(
            versions,
            vec![&"2.1".parse::<Version>().unwrap(), &"2.0".parse().unwrap(), &"1.0".parse().unwrap()]
        );
    }

    #[test]
    fn parses_declared_dependencies() {
        let graph = sample();
        let deps = graph
            .dependencies_of(&PackageName::new("a"), &"1.0".parse().unwrap())
            .unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name().as_str(), "b");
    }

    #[test]
    fn absent_interpreter_range_is_universal() {
        let graph = sample();
        let range = graph
            .interpreter_range_of(&PackageName::new("b"), &"1.0".parse().unwrap())
            .unwrap();
        assert!(range.is_universal());
    }

    #[test]
    fn unknown_package_is_reported() {
        let graph = sample();
        let err = graph.versions_of(&PackageName::new("zzz")).unwrap_err();
        assert!(matches!(err, GraphError::UnknownPackage(_)));
    }

    #[test]
    fn unknown_version_is_reported() {
        let graph = sample();
        let err = graph
            .dependencies_of(&PackageName::new("a"), &"9.9".parse().unwrap())
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownVersion { .. }));
    }

    #[test]
    fn matching_versions_filters_by_range() {
        let graph = sample();
        let range: VersionRange = ">=2.0".parse().unwrap();
        let matches = graph.matching_versions(&PackageName::new("b"), &range).unwrap();
        assert_eq!(matches.len(), 2);
    }
}
