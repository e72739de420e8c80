//! Integration tests for single-project generation.
//!
//! Each test writes a `vcgen.toml` into a temporary directory and runs the
//! generator against it.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vcgen::generator::{self, GenerateOptions};
use vcgen::toolset::ToolsetVersion;

const CORE_DESCRIPTION: &str = r#"
[package]
name = "core"
kind = "staticlib"

[build]
sources = ["src/core.cpp", "src/net/socket.cpp", "src/debug_only.cpp"]
headers = ["include/core.h"]
cflags = "/W4 /EHsc /DCORE_EXPORTS"
configs = ["Debug", "Release"]
platforms = ["x64"]

[profile.Release]
cflags = ["/O2"]
exclude = ["src/debug_only.cpp"]
"#;

fn create_project(description: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/net")).unwrap();
    fs::create_dir_all(dir.path().join("include")).unwrap();
    fs::write(dir.path().join("vcgen.toml"), description).unwrap();
    dir
}

fn silent(toolset: Option<ToolsetVersion>) -> GenerateOptions {
    GenerateOptions {
        toolset,
        silent: true,
        ..GenerateOptions::default()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_two_configurations_share_one_project() {
    let dir = create_project(CORE_DESCRIPTION);
    let options = silent(Some(ToolsetVersion::Vs2022));
    let mut diag = options.diagnostics();

    let generated = generator::generate_project(dir.path(), &options, &mut diag)
        .unwrap()
        .unwrap();
    assert_eq!(generated.configurations, 2);
    assert_eq!(generated.project_file, dir.path().join("core.vcxproj"));

    let body = read(&generated.project_file);
    assert_eq!(body.matches("<ProjectConfiguration Include=").count(), 2);
    assert!(body.contains("<ProjectConfiguration Include=\"Debug|x64\">"));
    assert!(body.contains("<ProjectConfiguration Include=\"Release|x64\">"));
    assert_eq!(body.matches("<ProjectGuid>").count(), 1);
    assert!(body.contains(&format!("<ProjectGuid>{}</ProjectGuid>", vcgen::guid::format_guid(&generated.guid))));
    assert!(body.contains("<ConfigurationType>StaticLibrary</ConfigurationType>"));
    assert!(body.contains("<ClCompile Include=\"src\\core.cpp\" />"));
    assert!(body.contains("<ClInclude Include=\"include\\core.h\" />"));
    // Excluded from Release only.
    assert_eq!(body.matches("<ExcludedFromBuild ").count(), 1);
    assert!(body.contains("'$(Configuration)|$(Platform)'=='Release|x64'\">true</ExcludedFromBuild>"));

    let filters_file = generated.filters_file.unwrap();
    assert_eq!(filters_file, dir.path().join("core.vcxproj.filters"));
    let filters = read(&filters_file);
    assert!(filters.contains("<Filter Include=\"Source Files\">"));
    assert!(filters.contains("<Filter Include=\"Source Files\\src\\net\">"));
    assert!(filters.contains("<Filter Include=\"Header Files\">"));
    assert!(filters.contains("<ClCompile Include=\"src\\net\\socket.cpp\">"));
    assert!(filters.contains("<Filter>Source Files\\src\\net</Filter>"));
}

#[test]
fn test_every_project_item_appears_in_the_filter_map() {
    let dir = create_project(CORE_DESCRIPTION);
    let options = silent(Some(ToolsetVersion::Vs2019));
    let mut diag = options.diagnostics();

    let generated = generator::generate_project(dir.path(), &options, &mut diag)
        .unwrap()
        .unwrap();
    let body = read(&generated.project_file);
    let filters = read(&generated.filters_file.unwrap());

    for path in ["src\\core.cpp", "src\\net\\socket.cpp", "src\\debug_only.cpp", "include\\core.h"] {
        let include = format!("Include=\"{}\"", path);
        assert_eq!(body.matches(&include).count(), 1, "{}", path);
        assert_eq!(filters.matches(&include).count(), 1, "{}", path);
    }
}

#[test]
fn test_legacy_toolset_writes_vcproj_without_filter_map() {
    let dir = create_project(CORE_DESCRIPTION);
    let options = silent(Some(ToolsetVersion::Vs2008));
    let mut diag = options.diagnostics();

    let generated = generator::generate_project(dir.path(), &options, &mut diag)
        .unwrap()
        .unwrap();
    assert_eq!(generated.project_file, dir.path().join("core.vcproj"));
    assert!(generated.filters_file.is_none());
    assert!(!dir.path().join("core.vcxproj").exists());

    let text = read(&generated.project_file);
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"Windows-1252\"?>\r\n"));
    assert!(text.contains("Version=\"9.00\""));
    assert_eq!(text.matches("<Configuration\r\n").count(), 2);
    assert!(text.contains("Name=\"VCLibrarianTool\""));
    assert!(text.contains("RelativePath=\".\\src\\net\\socket.cpp\""));
    assert_eq!(text.matches("ExcludedFromBuild=\"true\"").count(), 1);
}

#[test]
fn test_output_directory_prefixes_source_paths() {
    let dir = create_project(CORE_DESCRIPTION);
    let out = dir.path().join("build");
    let options = GenerateOptions {
        output_dir: Some(out.clone()),
        ..silent(Some(ToolsetVersion::Vs2022))
    };
    let mut diag = options.diagnostics();

    let generated = generator::generate_project(dir.path(), &options, &mut diag)
        .unwrap()
        .unwrap();
    assert_eq!(generated.project_file, out.join("core.vcxproj"));
    let body = read(&generated.project_file);
    assert!(body.contains("<ClCompile Include=\"..\\src\\core.cpp\" />"));
}

#[test]
fn test_guid_is_stable_across_runs() {
    let dir = create_project(CORE_DESCRIPTION);
    let options = silent(None);

    let first = generator::generate_project(dir.path(), &options, &mut options.diagnostics())
        .unwrap()
        .unwrap();
    let second = generator::generate_project(dir.path(), &options, &mut options.diagnostics())
        .unwrap()
        .unwrap();
    assert_eq!(first.guid, second.guid);
    assert_eq!(read(&first.project_file), read(&second.project_file));
}

#[test]
fn test_flat_filters_keep_one_level_per_role() {
    let dir = create_project(CORE_DESCRIPTION);
    let options = GenerateOptions {
        tree_mode: Some(vcgen::tree::TreeMode::Flat),
        ..silent(Some(ToolsetVersion::Vs2022))
    };
    let mut diag = options.diagnostics();

    let generated = generator::generate_project(dir.path(), &options, &mut diag)
        .unwrap()
        .unwrap();
    let filters = read(&generated.filters_file.unwrap());
    assert!(filters.contains("<Filter Include=\"Source Files\">"));
    assert!(!filters.contains("Source Files\\src"));
}

#[test]
fn test_collection_is_rejected_and_missing_description_errors() {
    let dir = create_project("subprojects = [\"core\"]\n\n[package]\nname = \"all\"\nkind = \"subdirs\"\n");
    let options = silent(None);
    let err = generator::generate_project(dir.path(), &options, &mut options.diagnostics()).unwrap_err();
    assert!(err.to_string().contains("vcgen solution"));

    let empty = tempfile::tempdir().unwrap();
    let err = generator::generate_project(empty.path(), &options, &mut options.diagnostics()).unwrap_err();
    assert!(format!("{:#}", err).contains("build description not found"));
}
