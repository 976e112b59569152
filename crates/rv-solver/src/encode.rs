use std::collections::HashMap;

use itertools::Itertools;
use rv_graph::CandidateUniverse;
use rv_version::{PackageName, Requirement, Version};
use z3::ast::Bool;
use z3::{Context, Optimize, Solver};

use crate::ResolveOptions;

/// One boolean variable per candidate `(package, version)`, keyed for O(1)
/// lookup while building implication clauses.
pub(crate) type Variables<'ctx> = HashMap<(PackageName, Version), Bool<'ctx>>;

/// Anything that accepts a hard boolean assertion. `Solver` and `Optimize`
/// expose the same shape under different method names; this lets the
/// at-most-one/witness/implication families be built once regardless of
/// which backend a given run uses.
pub(crate) trait Assertable<'ctx> {
    fn assert_hard(&self, clause: &Bool<'ctx>);
}

impl<'ctx> Assertable<'ctx> for Solver<'ctx> {
    fn assert_hard(&self, clause: &Bool<'ctx>) {
        self.assert(clause);
    }
}

impl<'ctx> Assertable<'ctx> for Optimize<'ctx> {
    fn assert_hard(&self, clause: &Bool<'ctx>) {
        self.assert(clause);
    }
}

/// Groups the universe's members by package name, versions sorted
/// descending, matching §4.4's "packages sorted by name, versions in
/// descending order" reproducibility requirement.
fn grouped(universe: &CandidateUniverse) -> Vec<(PackageName, Vec<Version>)> {
    universe
        .members()
        .iter()
        .map(|member| (member.name().clone(), member.version().clone()))
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| a.0.as_str().cmp(b.0.as_str()))
        .map(|(name, mut versions)| {
            versions.sort_by(|a, b| b.cmp(a));
            (name, versions)
        })
        .collect()
}

/// Builds one boolean variable per candidate and asserts the at-most-one,
/// direct-requirement-witness and dependency-implication families described
/// in §4.4, in that fixed order.
pub(crate) fn assert_hard_constraints<'ctx>(
    ctx: &'ctx Context,
    target: &impl Assertable<'ctx>,
    universe: &CandidateUniverse,
    direct: &[Requirement],
) -> Variables<'ctx> {
    let groups = grouped(universe);

    let mut vars: Variables<'ctx> = HashMap::new();
    for (name, versions) in &groups {
        for version in versions {
            let symbol = format!("{name}@{version}");
            vars.insert(
                (name.clone(), version.clone()),
                Bool::new_const(ctx, symbol.as_str()),
            );
        }
    }

    // At-most-one-per-package.
    for (name, versions) in &groups {
        if versions.len() < 2 {
            continue;
        }
        let refs: Vec<&Bool<'ctx>> = versions
            .iter()
            .map(|v| &vars[&(name.clone(), v.clone())])
            .collect();
        let weighted: Vec<(&Bool<'ctx>, i32)> = refs.iter().map(|b| (*b, 1)).collect();
        target.assert_hard(&Bool::pb_le(ctx, &weighted, 1));
    }

    // Direct-requirement witness.
    for requirement in direct {
        let witnesses = matching_vars(&vars, requirement);
        let clause = if witnesses.is_empty() {
            Bool::from_bool(ctx, false)
        } else {
            Bool::or(ctx, &witnesses)
        };
        target.assert_hard(&clause);
    }

    // Dependency implication.
    for member in universe.members() {
        let Some(antecedent) = vars.get(&(member.name().clone(), member.version().clone())) else {
            continue;
        };
        for dependency in member.dependencies() {
            let witnesses = matching_vars(&vars, dependency);
            let consequence = if witnesses.is_empty() {
                Bool::from_bool(ctx, false)
            } else {
                Bool::or(ctx, &witnesses)
            };
            target.assert_hard(&antecedent.implies(&consequence));
        }
    }

    vars
}

fn matching_vars<'a, 'ctx>(
    vars: &'a Variables<'ctx>,
    requirement: &Requirement,
) -> Vec<&'a Bool<'ctx>> {
    vars.iter()
        .filter(|((name, version), _)| name == requirement.name() && requirement.range().contains(version))
        .map(|(_, var)| var)
        .collect()
}

/// Attaches the optional soft-clause preference families. *prefer-newest*
/// weights each package's candidates by descending version rank so the
/// optimizer favors the newest satisfiable one; *minimize-packages* penalizes
/// every candidate being true, favoring the smallest model the hard
/// constraints allow.
pub(crate) fn assert_soft_constraints<'ctx>(
    optimize: &Optimize<'ctx>,
    vars: &Variables<'ctx>,
    universe: &CandidateUniverse,
    options: &ResolveOptions,
) {
    if options.prefer_newest {
        for (name, versions) in grouped(universe) {
            let count = u32::try_from(versions.len()).unwrap_or(u32::MAX);
            for (rank, version) in versions.iter().enumerate() {
                let weight = count - u32::try_from(rank).unwrap_or(u32::MAX);
                optimize.assert_soft(&vars[&(name.clone(), version.clone())], weight, None);
            }
        }
    }

    if options.minimize_packages {
        for var in vars.values() {
            optimize.assert_soft(&var.not(), 1u32, None);
        }
    }
}
