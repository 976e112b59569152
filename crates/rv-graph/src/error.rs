use rv_version::{PackageName, Version, VersionParseError, SpecifierParseError};

/// Everything that can go wrong loading or querying the knowledge graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("unknown package: {0}")]
    UnknownPackage(PackageName),

    #[error("unknown version {version} of package {package}")]
    UnknownVersion { package: PackageName, version: Version },

    #[error("package {package}: unparseable dependency `{text}`")]
    BadDependency { package: PackageName, text: String },

    #[error("package {package}: unparseable version `{version}`: {source}")]
    BadVersion {
        package: PackageName,
        version: String,
        #[source]
        source: VersionParseError,
    },

    #[error("package {package} {version}: unparseable interpreter range: {source}")]
    BadInterpreterRange {
        package: PackageName,
        version: Version,
        #[source]
        source: SpecifierParseError,
    },

    #[error("malformed knowledge graph document: {0}")]
    Malformed(#[from] serde_json::Error),
}
