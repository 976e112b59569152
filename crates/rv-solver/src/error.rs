/// An opaque unsat artifact: whatever text the underlying solver emits. No
/// stable schema is committed to here, per the pipeline's contract that the
/// core never synthesizes a heuristic "why" narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsatProof(String);

impl UnsatProof {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UnsatProof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the solver driver can fail with. `Unsat` and `Indeterminate` are
/// distinct: a timeout or an `unknown` result is never reported as unsat.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("no satisfying assignment exists")]
    Unsat(UnsatProof),

    #[error("solver returned unknown or timed out before deciding satisfiability")]
    Indeterminate,
}
