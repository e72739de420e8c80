//! Single-configuration project builder.
//!
//! Turns one description plus a (build type, platform) pair into a
//! [`ProjectSingleConfig`]: baseline tool settings for the build type, then
//! the description's flags, then the build-type profile, then file
//! classification.

use crate::config::{CharacterSetName, Description, TargetKind, ToolConfig};
use crate::diagnostics::Diagnostics;
use crate::filters::{self, FilterRole, RoleTable, SourceEntry};
use crate::flags::{apply_flags, push_unique};
use crate::model::linker::SubSystem;
use crate::model::{
    CharacterSet, CompilerTool, Configuration, ConfigurationType, CustomBuildTool,
    DeploymentFile, LibrarianTool, LinkerTool, TriState,
};
use crate::paths;
use crate::project::ProjectSingleConfig;
use crate::toolset::ToolsetVersion;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use uuid::Uuid;

/// Inputs of one single-configuration build.
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    pub description: &'a Description,
    pub build_type: &'a str,
    pub platform: &'a str,
    pub toolset: ToolsetVersion,
    pub guid: Uuid,
    /// Extra inputs per custom tool name, from its dependency command.
    pub discovered: &'a BTreeMap<String, Vec<String>>,
}

/// Configuration type and primary output extension of a target kind.
pub fn target_settings(kind: TargetKind) -> (ConfigurationType, &'static str) {
    match kind {
        TargetKind::App => (ConfigurationType::Application, "exe"),
        TargetKind::Lib => (ConfigurationType::DynamicLibrary, "dll"),
        TargetKind::Staticlib => (ConfigurationType::StaticLibrary, "lib"),
        TargetKind::Subdirs => (ConfigurationType::Utility, ""),
    }
}

/// Runs the dependency command of every custom tool once.
pub fn discover_tool_inputs(
    description: &Description,
    dir: &Path,
    diag: &mut Diagnostics,
) -> BTreeMap<String, Vec<String>> {
    description
        .tools
        .iter()
        .filter_map(|tool| {
            let command = tool.depend_command.as_deref()?;
            Some((
                tool.name.clone(),
                crate::discovery::discover_inputs(command, dir, diag),
            ))
        })
        .collect()
}

fn default_directories(toolset: ToolsetVersion) -> (&'static str, &'static str) {
    if toolset.uses_msbuild() {
        ("$(Platform)\\$(Configuration)", "obj\\$(Platform)\\$(Configuration)")
    } else {
        ("$(PlatformName)\\$(ConfigurationName)", "obj\\$(PlatformName)\\$(ConfigurationName)")
    }
}

/// `foo` and `-lfoo` name `foo.lib`; anything else is passed as a flag.
fn library_token(lib: &str) -> String {
    let lib = lib.trim();
    if crate::flags::linker::library_name(lib).is_some()
        || lib.starts_with('-')
        || lib.starts_with('/')
    {
        lib.to_string()
    } else {
        format!("{}.lib", lib)
    }
}

/// Substitutes `${in}`, `${out}` and `${base}` in a tool template.
fn substitute(template: &str, input: &str, output: &str) -> String {
    template
        .replace("${in}", input)
        .replace("${out}", output)
        .replace("${base}", paths::file_stem(input))
}

/// Library and linker flag tokens, profile flags last.
fn link_tokens(req: &BuildRequest) -> Vec<String> {
    let build = &req.description.build;
    let mut tokens: Vec<String> = build.libs.iter().map(|l| library_token(l)).collect();
    tokens.extend(build.lflags.tokens());
    if let Some(profile) = req.description.profile(req.build_type) {
        tokens.extend(profile.lflags.tokens());
    }
    tokens
}

fn configure_compiler(config: &mut Configuration, req: &BuildRequest, diag: &mut Diagnostics) {
    let description = req.description;
    let build = &description.build;
    let compiler = &mut config.compiler;

    apply_flags(compiler, &build.cflags.tokens(), req.toolset, diag);
    let mut defines: Vec<&String> = build.defines.iter().collect();
    if let Some(profile) = description.profile(req.build_type) {
        apply_flags(compiler, &profile.cflags.tokens(), req.toolset, diag);
        defines.extend(profile.defines.iter());
    }

    for dir in &build.include_paths {
        let dir = paths::to_native(dir);
        push_unique(&mut compiler.additional_include_directories, &dir);
        push_unique(&mut config.resource.additional_include_directories, &dir);
    }
    for define in defines {
        push_unique(&mut compiler.preprocessor_definitions, define);
        push_unique(&mut config.resource.preprocessor_definitions, define);
    }
    if compiler.whole_program_optimization.is_true() {
        config.whole_program_optimization = TriState::True;
    }
}

fn custom_build_entries(
    tool: &ToolConfig,
    discovered: &[String],
    entries: &mut Vec<SourceEntry>,
) {
    let role = tool.filter.as_deref().map(|name| {
        FilterRole::from_name(name).unwrap_or_else(|| FilterRole::Extra(name.to_string()))
    });

    for input in &tool.inputs {
        let input = paths::normalize(input);
        let output = (!tool.output.trim().is_empty())
            .then(|| paths::normalize(&substitute(&tool.output, &input, "")));
        let in_native = paths::to_native(&input);
        let out_native = output.as_deref().map(paths::to_native).unwrap_or_default();

        let custom_build = CustomBuildTool {
            command_line: tool
                .commands
                .iter()
                .map(|c| substitute(c, &in_native, &out_native))
                .collect(),
            description: match &tool.message {
                Some(message) => substitute(message, &in_native, &out_native),
                None => format!("{} {}", tool.name, in_native),
            },
            outputs: output.iter().map(|o| paths::to_native(o)).collect(),
            additional_dependencies: tool
                .depends
                .iter()
                .chain(discovered)
                .map(|d| paths::to_native(d))
                .collect(),
        };

        entries.push(SourceEntry {
            tool: Some(tool.name.clone()),
            custom_build: Some(custom_build),
            ..SourceEntry::new(input.clone(), role.clone())
        });
        if let Some(output) = output {
            entries.push(SourceEntry {
                generated_from: Some(input),
                ..SourceEntry::new(output, Some(FilterRole::Generated))
            });
        }
    }
}

fn file_entries(req: &BuildRequest) -> Vec<SourceEntry> {
    let description = req.description;
    let build = &description.build;

    let mut entries = Vec::new();
    for tool in &description.tools {
        let discovered = req.discovered.get(&tool.name).map(Vec::as_slice).unwrap_or(&[]);
        custom_build_entries(tool, discovered, &mut entries);
    }
    // Rule inputs and outputs keep the association the rule gives them.
    let claimed: HashSet<String> = entries
        .iter()
        .map(|e| paths::normalize(&e.path).to_lowercase())
        .collect();

    let lists = [
        (&build.sources, FilterRole::Source),
        (&build.headers, FilterRole::Header),
        (&build.generated, FilterRole::Generated),
        (&build.forms, FilterRole::Form),
        (&build.translations, FilterRole::Translation),
        (&build.resources, FilterRole::Resource),
        (&build.distfiles, FilterRole::Distribution),
    ];
    for (files, role) in lists {
        for file in files {
            if !claimed.contains(&paths::normalize(file).to_lowercase()) {
                entries.push(SourceEntry::new(file.clone(), Some(role.clone())));
            }
        }
    }
    if let Some(deploy) = &description.deploy {
        for file in &deploy.files {
            if !claimed.contains(&paths::normalize(file).to_lowercase()) {
                entries.push(SourceEntry::new(file.clone(), Some(FilterRole::Deployment)));
            }
        }
    }

    let mut excluded: HashSet<String> = build
        .excluded
        .iter()
        .map(|p| paths::normalize(p).to_lowercase())
        .collect();
    if let Some(profile) = description.profile(req.build_type) {
        excluded.extend(profile.exclude.iter().map(|p| paths::normalize(p).to_lowercase()));
    }
    for entry in &mut entries {
        if excluded.contains(&paths::normalize(&entry.path).to_lowercase()) {
            entry.excluded = true;
        }
    }
    entries
}

/// Builds the single-configuration project for `req`. Never fails: flag
/// problems are reported to `diag` and kept verbatim.
pub fn build_single_config(req: &BuildRequest, diag: &mut Diagnostics) -> ProjectSingleConfig {
    let description = req.description;
    let build = &description.build;
    let mut config = Configuration::new(req.build_type, req.platform);
    let debug = config.is_debug();

    let (configuration_type, extension) = target_settings(description.package.kind);
    config.configuration_type = configuration_type;
    config.character_set = match build.character_set {
        CharacterSetName::Unicode => CharacterSet::Unicode,
        CharacterSetName::Mbcs => CharacterSet::Mbcs,
        CharacterSetName::None => CharacterSet::NotSet,
    };
    if req.toolset.uses_msbuild() {
        config.platform_toolset = req.toolset.platform_toolset().to_string();
    }
    let (out_dir, int_dir) = default_directories(req.toolset);
    config.output_directory = build
        .output_dir
        .as_deref()
        .map(paths::to_native)
        .unwrap_or_else(|| out_dir.to_string());
    config.intermediate_directory = build
        .intermediate_dir
        .as_deref()
        .map(paths::to_native)
        .unwrap_or_else(|| int_dir.to_string());
    config.primary_output = description.target_name().to_string();
    config.primary_output_extension = extension.to_string();

    config.compiler = CompilerTool::for_build(debug);
    configure_compiler(&mut config, req, diag);
    config.apply_build_type_macro();

    if config.uses_linker() {
        let mut linker = LinkerTool::for_build(debug, req.platform);
        match description.package.kind {
            TargetKind::Lib => linker.link_dll = TriState::True,
            _ => linker.sub_system = SubSystem::Console,
        }
        apply_flags(&mut linker, &link_tokens(req), req.toolset, diag);
        for dir in &build.lib_paths {
            push_unique(&mut linker.additional_library_directories, &paths::to_native(dir));
        }
        if !req.toolset.uses_msbuild() && linker.output_file.is_empty() {
            linker.output_file = format!("$(OutDir)\\{}", config.primary_output_file());
        }
        config.linker = linker;
    } else if config.uses_librarian() {
        let mut librarian = LibrarianTool::for_build(req.platform);
        apply_flags(&mut librarian, &link_tokens(req), req.toolset, diag);
        for dir in &build.lib_paths {
            push_unique(&mut librarian.additional_library_directories, &paths::to_native(dir));
        }
        if !req.toolset.uses_msbuild() && librarian.output_file.is_empty() {
            librarian.output_file = format!("$(OutDir)\\{}", config.primary_output_file());
        }
        config.librarian = librarian;
    }

    apply_flags(&mut config.midl, &build.idlflags.tokens(), req.toolset, diag);
    apply_flags(&mut config.resource, &build.rcflags.tokens(), req.toolset, diag);

    let scripts = &description.scripts;
    config.pre_build.command_line = scripts.pre_build.clone();
    config.pre_link.command_line = scripts.pre_link.clone();
    config.post_build.command_line = scripts.post_build.clone();

    if let Some(deploy) = &description.deploy {
        config.deployment.remote_directory = deploy.remote_directory.clone();
        config.deployment.register_output = if deploy.register_output {
            TriState::True
        } else {
            TriState::Unset
        };
        config.deployment.additional_files = deploy
            .files
            .iter()
            .map(|file| {
                let normalized = paths::normalize(file);
                let source_dir = match normalized.rsplit_once('/') {
                    Some((dir, _)) => paths::to_native(dir),
                    None => ".".to_string(),
                };
                DeploymentFile {
                    name: paths::file_name(&normalized).to_string(),
                    source_dir,
                    target_dir: deploy.remote_directory.clone(),
                }
            })
            .collect();
    }

    let filters = filters::classify(file_entries(req), &RoleTable::default());

    ProjectSingleConfig {
        name: description.package.name.clone(),
        guid: req.guid,
        platform: req.platform.to_string(),
        configuration: config,
        filters,
        rules: build.rules.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_description;
    use crate::model::compiler::{Optimization, RuntimeLibrary, WarningLevel};

    const CORE: &str = r#"
[package]
name = "core"
kind = "lib"

[build]
sources = ["src/core.cpp", "src/scan.l", "src/debug_only.cpp"]
headers = ["include/core.h"]
include_paths = ["include"]
defines = ["CORE_EXPORTS"]
cflags = "/W4 /EHsc"
libs = ["user32", "-lpng"]
lib_paths = ["third_party/lib"]

[profile.Release]
cflags = ["/GL"]
exclude = ["src/debug_only.cpp"]

[scripts]
post_build = ["copy a b", "copy c d"]

[[tools]]
name = "lexer"
inputs = ["src/scan.l"]
output = "gen/${base}.c"
commands = ["flex -o ${out} ${in}"]
depends = ["tools/flex.exe"]
"#;

    fn build(build_type: &str, diag: &mut Diagnostics) -> ProjectSingleConfig {
        let description = parse_description(CORE, Path::new("core/vcgen.toml")).unwrap();
        let discovered = BTreeMap::new();
        let req = BuildRequest {
            description: &description,
            build_type,
            platform: "x64",
            toolset: ToolsetVersion::Vs2022,
            guid: Uuid::nil(),
            discovered: &discovered,
        };
        build_single_config(&req, diag)
    }

    #[test]
    fn test_release_configuration() {
        let mut diag = Diagnostics::silent();
        let single = build("Release", &mut diag);
        let config = &single.configuration;
        assert!(diag.is_empty(), "{:?}", diag.entries());

        assert_eq!(config.configuration_type, ConfigurationType::DynamicLibrary);
        assert_eq!(config.primary_output_file(), "core.dll");
        assert_eq!(config.platform_toolset, "v143");
        assert_eq!(config.compiler.warning_level, WarningLevel::Level4);
        assert_eq!(config.compiler.optimization, Optimization::MaxSpeed);
        assert_eq!(config.compiler.runtime_library, RuntimeLibrary::MultiThreadedDll);
        assert_eq!(config.compiler.preprocessor_definitions, vec!["CORE_EXPORTS", "NDEBUG"]);
        assert_eq!(config.whole_program_optimization, TriState::True);
        assert_eq!(config.linker.link_dll, TriState::True);
        assert_eq!(config.linker.additional_dependencies, vec!["user32.lib", "png.lib"]);
        assert_eq!(config.linker.additional_library_directories, vec!["third_party\\lib"]);
        assert_eq!(config.post_build.command_line.len(), 2);

        let (_, excluded) = single.filters.locate("src/debug_only.cpp").unwrap();
        assert!(excluded.excluded);
    }

    #[test]
    fn test_debug_configuration_keeps_profile_out() {
        let mut diag = Diagnostics::silent();
        let single = build("Debug", &mut diag);
        let config = &single.configuration;
        assert_eq!(config.compiler.optimization, Optimization::Disabled);
        assert_eq!(config.compiler.preprocessor_definitions, vec!["CORE_EXPORTS", "_DEBUG"]);
        assert_eq!(config.whole_program_optimization, TriState::Unset);
        let (_, file) = single.filters.locate("src/debug_only.cpp").unwrap();
        assert!(!file.excluded);
    }

    #[test]
    fn test_custom_tool_files() {
        let mut diag = Diagnostics::silent();
        let single = build("Debug", &mut diag);

        let (filter, input) = single.filters.locate("src/scan.l").unwrap();
        assert_eq!(filter.role, FilterRole::Extra("lexer".into()));
        let custom = input.custom_build.as_ref().unwrap();
        assert_eq!(custom.command_line, vec![r"flex -o gen\scan.c src\scan.l"]);
        assert_eq!(custom.outputs, vec![r"gen\scan.c"]);
        assert_eq!(custom.additional_dependencies, vec![r"tools\flex.exe"]);

        let (filter, output) = single.filters.locate("gen/scan.c").unwrap();
        assert_eq!(filter.role, FilterRole::Generated);
        assert_eq!(output.generated_from.as_deref(), Some("src/scan.l"));
    }

    #[test]
    fn test_file_sets_match_across_build_types() {
        let mut diag = Diagnostics::silent();
        assert_eq!(
            build("Debug", &mut diag).filters.paths(),
            build("Release", &mut diag).filters.paths()
        );
    }

    #[test]
    fn test_library_tokens() {
        assert_eq!(library_token("user32"), "user32.lib");
        assert_eq!(library_token("ws2_32.lib"), "ws2_32.lib");
        assert_eq!(library_token("-lz"), "-lz");
    }
}
