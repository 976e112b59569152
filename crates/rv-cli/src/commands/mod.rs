use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use rv_graph::{close_candidates, KnowledgeGraph};
use rv_interpreter::{select_interpreter, InterpreterError};
use rv_manifest::parse_requirements;
use rv_solver::{solve, ResolveOptions, SolveError};
use rv_version::Version;

/// Maps onto the process exit codes spec.md §6 specifies for reference:
/// success, parse failure, unsat, indeterminate, or missing interpreter.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ExitStatus {
    Success,
    MalformedInput,
    Unsat,
    Indeterminate,
    NoInterpreter,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::MalformedInput => ExitCode::from(1),
            ExitStatus::Unsat => ExitCode::from(2),
            ExitStatus::Indeterminate => ExitCode::from(3),
            ExitStatus::NoInterpreter => ExitCode::from(4),
        }
    }
}

pub(crate) struct ResolveArgs {
    pub manifest: PathBuf,
    pub graph: PathBuf,
    pub catalog: PathBuf,
    pub output: PathBuf,
    pub prefer_newest: bool,
    pub minimize_packages: bool,
    pub timeout_ms: Option<u64>,
}

pub(crate) fn resolve(args: ResolveArgs) -> Result<ExitStatus> {
    let manifest_text = fs::read_to_string(&args.manifest)
        .with_context(|| format!("failed to read manifest {}", args.manifest.display()))?;
    let graph_text = fs::read_to_string(&args.graph)
        .with_context(|| format!("failed to read knowledge graph {}", args.graph.display()))?;
    let catalog_text = fs::read_to_string(&args.catalog)
        .with_context(|| format!("failed to read interpreter catalog {}", args.catalog.display()))?;

    let direct = match parse_requirements(&manifest_text) {
        Ok(reqs) => reqs,
        Err(err) => {
            tracing::error!(rendered = %err.render(), "manifest parse failed");
            return Ok(ExitStatus::MalformedInput);
        }
    };

    let graph = KnowledgeGraph::from_json(&graph_text)
        .with_context(|| format!("{} is not a valid knowledge graph document", args.graph.display()))?;

    let catalog = parse_catalog(&catalog_text)?;

    let universe = close_candidates(&graph, &direct)
        .with_context(|| "failed to close the candidate universe against the knowledge graph")?;
    for empty in universe.empty_candidates() {
        tracing::warn!(requirement = %empty.requirement, "requirement admits no candidate in the knowledge graph");
    }

    let options = ResolveOptions {
        prefer_newest: args.prefer_newest,
        minimize_packages: args.minimize_packages,
        timeout_ms: args.timeout_ms,
    };

    let (model, elapsed) = match solve(&universe, &direct, &options) {
        Ok(outcome) => outcome,
        Err(SolveError::Unsat(proof)) => {
            let proof_path = sibling(&args.output, "unsat-proof.txt");
            fs::write(&proof_path, proof.as_str())
                .with_context(|| format!("failed to write {}", proof_path.display()))?;
            tracing::error!(proof = %proof_path.display(), "resolution is unsatisfiable");
            return Ok(ExitStatus::Unsat);
        }
        Err(SolveError::Indeterminate) => {
            tracing::error!("solver returned unknown or timed out");
            return Ok(ExitStatus::Indeterminate);
        }
    };
    tracing::info!(elapsed_ms = elapsed.as_millis(), packages = model.len(), "resolution solved");

    let interpreter = match select_interpreter(&model, &graph, &catalog) {
        Ok(version) => version,
        Err(InterpreterError::InterpreterIncompatible { package }) => {
            tracing::error!(%package, "package narrows the interpreter range to empty");
            return Ok(ExitStatus::NoInterpreter);
        }
        Err(InterpreterError::NoAvailableInterpreter { range }) => {
            tracing::error!(%range, "no catalog interpreter satisfies the merged range");
            return Ok(ExitStatus::NoInterpreter);
        }
        Err(InterpreterError::Graph(err)) => return Err(err.into()),
    };

    let script = render_install_script(&interpreter, &model);
    fs::write(&args.output, script)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(ExitStatus::Success)
}

fn parse_catalog(text: &str) -> Result<Vec<Version>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            line.parse::<Version>()
                .with_context(|| format!("unparseable interpreter catalog entry `{line}`"))
        })
        .collect()
}

fn sibling(output: &Path, name: &str) -> PathBuf {
    output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from(name), |p| p.join(name))
}

/// Renders the install script per spec.md §6: a comment marking the
/// interpreter pin, `interpreter == <version>`, then one sorted
/// `name == version` line per resolved package.
fn render_install_script(interpreter: &Version, model: &rv_solver::Model) -> String {
    let mut out = String::new();
    out.push_str("# interpreter pin\n");
    let _ = writeln!(out, "interpreter == {interpreter}\n");
    for (name, version) in model.packages() {
        let _ = writeln!(out, "{name} == {version}");
    }
    out
}
