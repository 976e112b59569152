//! The literal end-to-end scenarios: trivial, transitive with
//! prefer-newest, conflict, and dependency cycle.

use rv_graph::{close_candidates, KnowledgeGraph};
use rv_solver::{solve, ResolveOptions, SolveError};
use rv_version::{PackageName, Requirement, VersionRange};

fn direct(names: &[&str]) -> Vec<Requirement> {
    names
        .iter()
        .map(|n| Requirement::new(PackageName::new(*n), VersionRange::universal()))
        .collect()
}

#[test]
fn scenario_a_trivial() {
    let graph = KnowledgeGraph::from_json(indoc::indoc! {r#"
        { "packages": { "a": { "1.0": {} } } }
    "#})
    .unwrap();
    let reqs = direct(&["a"]);
    let universe = close_candidates(&graph, &reqs).unwrap();
    let (model, _) = solve(&universe, &reqs, &ResolveOptions::default()).unwrap();

    assert_eq!(model.get(&PackageName::new("a")).unwrap().to_string(), "1.0");
    assert_eq!(model.len(), 1);
}

#[test]
fn scenario_b_transitive_prefers_newest() {
    let graph = KnowledgeGraph::from_json(indoc::indoc! {r#"
        {
            "packages": {
                "a": { "1.0": { "dependencies": ["b>=2.0"] } },
                "b": { "1.0": {}, "2.0": {}, "2.1": {} }
            }
        }
    "#})
    .unwrap();
    let reqs = direct(&["a"]);
    let universe = close_candidates(&graph, &reqs).unwrap();
    let options = ResolveOptions {
        prefer_newest: true,
        ..Default::default()
    };
    let (model, _) = solve(&universe, &reqs, &options).unwrap();

    assert_eq!(model.get(&PackageName::new("a")).unwrap().to_string(), "1.0");
    assert_eq!(model.get(&PackageName::new("b")).unwrap().to_string(), "2.1");
}

#[test]
fn scenario_c_conflict_is_unsat() {
    let graph = KnowledgeGraph::from_json(indoc::indoc! {r#"
        {
            "packages": {
                "a": { "1.0": { "dependencies": ["c==1.0"] } },
                "b": { "1.0": { "dependencies": ["c==2.0"] } },
                "c": { "1.0": {}, "2.0": {} }
            }
        }
    "#})
    .unwrap();
    let reqs = direct(&["a", "b"]);
    let universe = close_candidates(&graph, &reqs).unwrap();
    let result = solve(&universe, &reqs, &ResolveOptions::default());

    assert!(matches!(result, Err(SolveError::Unsat(_))));
}

#[test]
fn scenario_d_cycle_terminates() {
    let graph = KnowledgeGraph::from_json(indoc::indoc! {r#"
        {
            "packages": {
                "a": { "1.0": { "dependencies": ["b>=1.0"] } },
                "b": { "1.0": { "dependencies": ["a>=1.0"] } }
            }
        }
    "#})
    .unwrap();
    let reqs = direct(&["a"]);
    let universe = close_candidates(&graph, &reqs).unwrap();
    let (model, _) = solve(&universe, &reqs, &ResolveOptions::default()).unwrap();

    assert_eq!(model.get(&PackageName::new("a")).unwrap().to_string(), "1.0");
    assert_eq!(model.get(&PackageName::new("b")).unwrap().to_string(), "1.0");
}

#[test]
fn empty_candidate_direct_requirement_is_unsat() {
    let graph = KnowledgeGraph::from_json(indoc::indoc! {r#"
        { "packages": { "a": { "1.0": {} } } }
    "#})
    .unwrap();
    let reqs = vec![Requirement::new(PackageName::new("a"), ">=9.0".parse().unwrap())];
    let universe = close_candidates(&graph, &reqs).unwrap();
    assert!(!universe.empty_candidates().is_empty());

    let result = solve(&universe, &reqs, &ResolveOptions::default());
    assert!(matches!(result, Err(SolveError::Unsat(_))));
}
