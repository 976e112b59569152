//! The SMT encoder (C4) and solver driver (C5): turns a candidate universe
//! into boolean assertions, hands them to `z3`, and extracts either a
//! package-version model or an opaque unsat proof.
//!
//! Mirrors the original tool's `generate_smt_expression`/`smt_solver` pair
//! (`z3.Context`/`z3.Solver` from Python), but with the solver context owned
//! for the lifetime of a single resolution run rather than kept global.

mod encode;
mod error;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use rv_graph::CandidateUniverse;
use rv_version::{PackageName, Requirement, Version};
use z3::{Config, Context, Optimize, SatResult, Solver};

pub use error::{SolveError, UnsatProof};

/// Preferences threaded through to the encoder's optional soft-clause
/// families, and the solver's wall-clock budget. Both preference flags
/// default off, matching the source entry point never setting them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub prefer_newest: bool,
    pub minimize_packages: bool,
    pub timeout_ms: Option<u64>,
}

/// A satisfying assignment projected to one chosen version per package that
/// appears in it. A package transitively reachable but not forced by any
/// constraint may be absent — it was optional and dropped.
#[derive(Debug, Clone, Default)]
pub struct Model {
    assignments: BTreeMap<PackageName, Version>,
}

impl Model {
    pub fn get(&self, name: &PackageName) -> Option<&Version> {
        self.assignments.get(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = (&PackageName, &Version)> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Encodes `universe` against `direct` and solves it, returning the model
/// and the wall-clock time the solver spent on `check`.
///
/// The encoder never mutates `universe`; the context and solver it builds
/// exist only for this call.
pub fn solve(
    universe: &CandidateUniverse,
    direct: &[Requirement],
    options: &ResolveOptions,
) -> Result<(Model, Duration), SolveError> {
    let mut config = Config::new();
    if let Some(timeout_ms) = options.timeout_ms {
        config.set_timeout_msec(timeout_ms);
    }
    let context = Context::new(&config);

    if options.prefer_newest || options.minimize_packages {
        let optimize = Optimize::new(&context);
        let vars = encode::assert_hard_constraints(&context, &optimize, universe, direct);
        encode::assert_soft_constraints(&optimize, &vars, universe, options);

        let start = Instant::now();
        let result = optimize.check(&[]);
        let elapsed = start.elapsed();

        match result {
            SatResult::Sat => {
                let model = optimize.get_model().expect("sat result carries a model");
                Ok((extract_model(&model, &vars), elapsed))
            }
            SatResult::Unsat => Err(SolveError::Unsat(UnsatProof::new(optimize.to_string()))),
            SatResult::Unknown => Err(SolveError::Indeterminate),
        }
    } else {
        let solver = Solver::new(&context);
        let vars = encode::assert_hard_constraints(&context, &solver, universe, direct);

        let start = Instant::now();
        let result = solver.check();
        let elapsed = start.elapsed();

        tracing::debug!(elapsed_ms = elapsed.as_millis(), variables = vars.len(), "solver check completed");

        match result {
            SatResult::Sat => {
                let model = solver.get_model().expect("sat result carries a model");
                Ok((extract_model(&model, &vars), elapsed))
            }
            SatResult::Unsat => Err(SolveError::Unsat(UnsatProof::new(solver.to_string()))),
            SatResult::Unknown => Err(SolveError::Indeterminate),
        }
    }
}

fn extract_model<'ctx>(
    model: &z3::Model<'ctx>,
    vars: &encode::Variables<'ctx>,
) -> Model {
    let mut assignments = BTreeMap::new();
    for ((name, version), var) in vars {
        if model
            .eval(var, true)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            assignments.insert(name.clone(), version.clone());
        }
    }
    Model { assignments }
}
