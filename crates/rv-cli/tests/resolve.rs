//! Drives the `rv-solve resolve` binary end-to-end against the literal
//! scenarios from spec.md §8, covering the CLI's own I/O: reading the
//! manifest/graph/catalog files, and writing the install script
//! (commands/mod.rs's two-section format) or the sibling unsat-proof file.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn rv_solve() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rv-solve"))
}

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn scenario_a_trivial_writes_install_script() {
    let dir = TempDir::new().unwrap();
    let manifest = write(&dir, "manifest.txt", "A\n");
    let graph = write(
        &dir,
        "graph.json",
        indoc::indoc! {r#"
            { "packages": { "A": { "1.0": {} } } }
        "#},
    );
    let catalog = write(&dir, "catalog.txt", "3.10.0\n");
    let output = dir.path().join("install_script.txt");

    let status = rv_solve()
        .args(["resolve"])
        .arg(&manifest)
        .arg("--graph")
        .arg(&graph)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(&output)
        .arg("--quiet")
        .status()
        .unwrap();

    assert!(status.success());
    let script = fs::read_to_string(&output).unwrap();
    assert!(script.contains("interpreter == 3.10.0"));
    assert!(script.contains("a == 1.0"));
}

#[test]
fn scenario_b_transitive_prefer_newest_picks_the_newest_dependency() {
    let dir = TempDir::new().unwrap();
    let manifest = write(&dir, "manifest.txt", "A\n");
    let graph = write(
        &dir,
        "graph.json",
        indoc::indoc! {r#"
            {
                "packages": {
                    "A": { "1.0": { "dependencies": ["B>=2.0"] } },
                    "B": { "1.0": {}, "2.0": {}, "2.1": {} }
                }
            }
        "#},
    );
    let catalog = write(&dir, "catalog.txt", "3.10.0\n");
    let output = dir.path().join("install_script.txt");

    let status = rv_solve()
        .arg("resolve")
        .arg(&manifest)
        .arg("--graph")
        .arg(&graph)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(&output)
        .arg("--prefer-newest")
        .arg("--quiet")
        .status()
        .unwrap();

    assert!(status.success());
    let script = fs::read_to_string(&output).unwrap();
    assert!(script.contains("a == 1.0"));
    assert!(script.contains("b == 2.1"));
}

#[test]
fn scenario_c_conflict_exits_unsat_and_writes_a_proof() {
    let dir = TempDir::new().unwrap();
    let manifest = write(&dir, "manifest.txt", "A\nB\n");
    let graph = write(
        &dir,
        "graph.json",
        indoc::indoc! {r#"
            {
                "packages": {
                    "A": { "1.0": { "dependencies": ["C==1.0"] } },
                    "B": { "1.0": { "dependencies": ["C==2.0"] } },
                    "C": { "1.0": {}, "2.0": {} }
                }
            }
        "#},
    );
    let catalog = write(&dir, "catalog.txt", "3.10.0\n");
    let output = dir.path().join("install_script.txt");

    let status = rv_solve()
        .arg("resolve")
        .arg(&manifest)
        .arg("--graph")
        .arg(&graph)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(&output)
        .arg("--quiet")
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(2));
    assert!(!output.exists());
    let proof = fs::read_to_string(dir.path().join("unsat-proof.txt")).unwrap();
    assert!(!proof.is_empty());
}

#[test]
fn scenario_f_interpreter_empty_exits_no_interpreter() {
    let dir = TempDir::new().unwrap();
    let manifest = write(&dir, "manifest.txt", "A\nB\n");
    let graph = write(
        &dir,
        "graph.json",
        indoc::indoc! {r#"
            {
                "packages": {
                    "A": { "1.0": { "requires_interpreter": "<3.9" } },
                    "B": { "1.0": { "requires_interpreter": ">=3.10" } }
                }
            }
        "#},
    );
    let catalog = write(&dir, "catalog.txt", "3.8.0\n3.9.5\n3.10.2\n3.11.0\n");
    let output = dir.path().join("install_script.txt");

    let status = rv_solve()
        .arg("resolve")
        .arg(&manifest)
        .arg("--graph")
        .arg(&graph)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(&output)
        .arg("--quiet")
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(4));
    assert!(!output.exists());
}

#[test]
fn malformed_manifest_exits_with_parse_failure() {
    let dir = TempDir::new().unwrap();
    let manifest = write(&dir, "manifest.txt", "A =~ 1.0\n");
    let graph = write(&dir, "graph.json", r#"{ "packages": {} }"#);
    let catalog = write(&dir, "catalog.txt", "3.10.0\n");
    let output = dir.path().join("install_script.txt");

    let status = rv_solve()
        .arg("resolve")
        .arg(&manifest)
        .arg("--graph")
        .arg(&graph)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(&output)
        .arg("--quiet")
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(!output.exists());
}
