use std::collections::{HashSet, VecDeque};

use rv_version::Requirement;

use crate::error::GraphError;
use crate::{KnowledgeGraph, PackageVersion};

/// A direct requirement whose range admits no version present in the graph.
/// Recorded, not raised — the SMT encoding turns it into an unsatisfiable
/// witness disjunction rather than aborting the closure early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyCandidate {
    pub requirement: Requirement,
}

/// The finite set of `PackageVersion`s reachable from a set of direct
/// requirements, closed over declared dependencies.
#[derive(Debug, Clone, Default)]
pub struct CandidateUniverse {
    members: Vec<PackageVersion>,
    empty_candidates: Vec<EmptyCandidate>,
}

impl CandidateUniverse {
    pub fn members(&self) -> &[PackageVersion] {
        &self.members
    }

    pub fn empty_candidates(&self) -> &[EmptyCandidate] {
        &self.empty_candidates
    }
}

/// Expands `direct` into the transitive candidate universe by breadth-first
/// traversal of declared dependencies. Membership is keyed by
/// `(name, version)` identity so dependency cycles can't cause non-termination:
/// a `PackageVersion` already in the universe is never requeued.
pub fn close_candidates(
    graph: &KnowledgeGraph,
    direct: &[Requirement],
) -> Result<CandidateUniverse, GraphError> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut members = Vec::new();
    let mut empty_candidates = Vec::new();
    let mut queue: VecDeque<PackageVersion> = VecDeque::new();

    for requirement in direct {
        let matches = graph.matching_versions(requirement.name(), requirement.range())?;
        if matches.is_empty() {
            tracing::debug!(requirement = %requirement, "direct requirement admits no candidate in the graph");
            empty_candidates.push(EmptyCandidate {
                requirement: requirement.clone(),
            });
            continue;
        }
        for version in matches {
            enqueue(graph, requirement.name(), version, &mut seen, &mut queue)?;
        }
    }

    while let Some(candidate) = queue.pop_front() {
        let dependencies = candidate.dependencies().to_vec();
        members.push(candidate);

        for dependency in &dependencies {
            let matches = graph.matching_versions(dependency.name(), dependency.range())?;
            if matches.is_empty() {
                tracing::debug!(requirement = %dependency, "declared dependency admits no candidate in the graph");
                empty_candidates.push(EmptyCandidate {
                    requirement: dependency.clone(),
                });
                continue;
            }
            for version in matches {
                enqueue(graph, dependency.name(), version, &mut seen, &mut queue)?;
            }
        }
    }

    tracing::debug!(
        members = members.len(),
        empty_candidates = empty_candidates.len(),
        "candidate universe closed"
    );
    Ok(CandidateUniverse {
        members,
        empty_candidates,
    })
}

fn enqueue(
    graph: &KnowledgeGraph,
    name: &rv_version::PackageName,
    version: &rv_version::Version,
    seen: &mut HashSet<(String, String)>,
    queue: &mut VecDeque<PackageVersion>,
) -> Result<(), GraphError> {
    let key = (name.to_string(), version.to_string());
    if !seen.insert(key) {
        return Ok(());
    }
    let dependencies = graph.dependencies_of(name, version)?.to_vec();
    let requires_interpreter = graph.interpreter_range_of(name, version)?.clone();
    queue.push_back(PackageVersion {
        name: name.clone(),
        version: version.clone(),
        dependencies,
        requires_interpreter,
    });
    Ok(())
}
