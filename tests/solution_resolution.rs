//! Integration tests for multi-project resolution and solution output.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vcgen::generator::{self, GenerateOptions};
use vcgen::guid;
use vcgen::lock::{GuidLock, LOCK_FILE};
use vcgen::toolset::ToolsetVersion;

const LIB_A: &str = r#"
[package]
name = "a"
kind = "staticlib"

[build]
sources = ["a.cpp"]
"#;

const APP_B: &str = r#"
[package]
name = "b"

[build]
sources = ["main.cpp"]
libs = ["a.lib", "user32.lib"]
"#;

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn create_tree(subprojects: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "vcgen.toml",
        &format!("subprojects = {}\n\n[package]\nname = \"all\"\nkind = \"subdirs\"\n", subprojects),
    );
    write(dir.path(), "a/vcgen.toml", LIB_A);
    write(dir.path(), "b/vcgen.toml", APP_B);
    dir
}

fn options() -> GenerateOptions {
    GenerateOptions {
        toolset: Some(ToolsetVersion::Vs2022),
        silent: true,
        ..GenerateOptions::default()
    }
}

#[test]
fn test_library_consumer_gets_exactly_one_edge() {
    let dir = create_tree("[\"a\", \"b\"]");
    let options = options();
    let mut diag = options.diagnostics();

    let generated = generator::generate_solution(dir.path(), &options, &mut diag).unwrap();
    let solution = &generated.solution;
    let names: Vec<&str> = solution.leaves.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);

    let edges: Vec<(&str, &str)> = solution
        .edges()
        .into_iter()
        .map(|(from, to)| (from.name.as_str(), to.name.as_str()))
        .collect();
    assert_eq!(edges, vec![("b", "a")]);
    assert!(!diag.mentions("user32"));

    assert_eq!(generated.solution_file, dir.path().join("all.sln"));
    let sln = fs::read_to_string(&generated.solution_file).unwrap();
    let a_guid = &solution.leaves[0].dependency.guid;
    assert!(sln.contains(&format!("\"a\", \"a\\a.vcxproj\", \"{}\"", a_guid)));
    assert!(sln.contains("\"b\", \"b\\b.vcxproj\""));
    assert_eq!(sln.matches("ProjectSection(ProjectDependencies)").count(), 1);
    assert!(sln.contains(&format!("\t\t{g} = {g}\r\n", g = a_guid)));
    assert!(generated.projects.is_empty());
}

#[test]
fn test_missing_subproject_is_skipped_and_siblings_survive() {
    let dir = create_tree("[\"a\", \"missing\", \"b\"]");
    let options = options();
    let mut diag = options.diagnostics();

    let generated = generator::generate_solution(dir.path(), &options, &mut diag).unwrap();
    let names: Vec<&str> = generated.solution.leaves.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(diag.mentions("skipping sub-project 'missing'"));
    assert_eq!(generated.solution.edges().len(), 1);
}

#[test]
fn test_recursive_generation_writes_every_leaf() {
    let dir = create_tree("[\"a\", \"b\"]");
    let options = GenerateOptions {
        recursive: true,
        ..options()
    };
    let mut diag = options.diagnostics();

    let generated = generator::generate_solution(dir.path(), &options, &mut diag).unwrap();
    assert_eq!(generated.projects.len(), 2);
    let a_file = dir.path().join("a").join("a.vcxproj");
    let b_file = dir.path().join("b").join("b.vcxproj");
    assert!(a_file.is_file());
    assert!(b_file.is_file());
    assert!(dir.path().join("b").join("b.vcxproj.filters").is_file());

    // The project GUIDs match the ones the solution refers to.
    for (leaf, project) in generated.solution.leaves.iter().zip(&generated.projects) {
        assert_eq!(leaf.guid, project.guid);
        let body = fs::read_to_string(&project.project_file).unwrap();
        assert!(body.contains(&format!("<ProjectGuid>{}</ProjectGuid>", leaf.dependency.guid)));
    }
    let b_body = fs::read_to_string(&b_file).unwrap();
    assert!(b_body.contains("<ClCompile Include=\"main.cpp\" />"));
}

#[test]
fn test_pinned_guids_are_reused() {
    let dir = create_tree("[\"a\", \"b\"]");
    let options = options();

    let (lock_dir, count) = generator::pin_guids(dir.path(), &options, &mut options.diagnostics()).unwrap();
    assert_eq!(count, 2);
    assert!(lock_dir.join(LOCK_FILE).is_file());
    assert_eq!(GuidLock::load(&lock_dir).unwrap().projects.len(), 2);

    let pinned = guid::parse_guid("{12345678-1234-5678-9ABC-DEF012345678}").unwrap();
    let mut lock = GuidLock::load(&lock_dir).unwrap();
    lock.pin(&dir.path().join("a").join("a.vcxproj"), &pinned);
    lock.save(&lock_dir).unwrap();

    let generated = generator::generate_solution(dir.path(), &options, &mut options.diagnostics()).unwrap();
    assert_eq!(generated.solution.leaves[0].guid, pinned);
    assert_eq!(
        generated.solution.leaves[0].dependency.guid,
        "{12345678-1234-5678-9ABC-DEF012345678}"
    );
}

#[test]
fn test_legacy_solution_and_json_graph() {
    let dir = create_tree("[\"a\", \"b\"]");
    let options = GenerateOptions {
        toolset: Some(ToolsetVersion::Vs2003),
        ..options()
    };
    let mut diag = options.diagnostics();

    let generated = generator::generate_solution(dir.path(), &options, &mut diag).unwrap();
    let sln = fs::read_to_string(&generated.solution_file).unwrap();
    assert!(sln.starts_with("Microsoft Visual Studio Solution File, Format Version 8.00\r\n"));
    assert!(sln.contains("\"a\", \"a\\a.vcproj\""));
    assert!(sln.contains("GlobalSection(ProjectDependencies) = postSolution"));

    let json: serde_json::Value = serde_json::from_str(&generator::solution_json(&generated.solution).unwrap()).unwrap();
    assert_eq!(json["name"], "all");
    assert_eq!(json["leaves"][1]["artifact"], "b.exe");
    assert_eq!(json["leaves"][1]["depends_on"][0], "a.lib");
}
