//! Interpreter-version selection (C6): intersects the per-package interpreter
//! ranges of a resolved model against an available-interpreter catalog and
//! picks the newest installable version.
//!
//! Grounded on `original_source/python_version_resolver.py`'s
//! `merge_constraints`/`filter_python_versions`/`get_latest_version` trio,
//! expressed here as typed `VersionRange` intersection and a sorted catalog
//! scan instead of string-typed `SpecifierSet`s.

use rv_graph::{GraphError, KnowledgeGraph};
use rv_solver::Model;
use rv_version::{PackageName, Version, VersionRange};

/// Why interpreter selection failed.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    #[error("package {package} narrows the interpreter range to empty")]
    InterpreterIncompatible { package: PackageName },

    #[error("no catalog interpreter version satisfies the merged range {range}")]
    NoAvailableInterpreter { range: VersionRange },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Merges every resolved package's interpreter range and returns the newest
/// catalog version inside the intersection.
pub fn select_interpreter(
    model: &Model,
    graph: &KnowledgeGraph,
    catalog: &[Version],
) -> Result<Version, InterpreterError> {
    let mut merged = VersionRange::universal();

    for (name, version) in model.packages() {
        let package_range = graph.interpreter_range_of(name, version)?;
        let narrowed = merged.intersect(package_range);
        if !narrowed.is_satisfiable() {
            tracing::debug!(%package_range, package = %name, "package narrows the interpreter range to empty");
            return Err(InterpreterError::InterpreterIncompatible { package: name.clone() });
        }
        merged = narrowed;
    }
    tracing::debug!(range = %merged, "merged interpreter range");

    let chosen = catalog.iter().filter(|v| merged.contains(v)).max().cloned();
    tracing::debug!(chosen = ?chosen.as_ref().map(ToString::to_string), candidates = catalog.len(), "interpreter catalog scanned");
    chosen.ok_or(InterpreterError::NoAvailableInterpreter { range: merged })
}
