//! Dependency resolver.
//!
//! Walks a tree of sub-project declarations depth first, loading each
//! description in isolation under a scoped [`ResolveContext`]. Collections
//! (`kind = "subdirs"`) are flattened; every buildable leaf gets a stable
//! GUID, an artifact name and a set of advisory dependency edges.
//!
//! Edges come from three places: explicit `depends`, consumed libraries that
//! another leaf produces, and custom tool inputs that another leaf produces.
//! References to leaves not seen yet are deferred and matched once the whole
//! tree is known. Nothing here aborts: a bad entry is reported and skipped.

pub mod context;

pub use context::{DirScope, ResolveContext};

use crate::config::{
    self, DESCRIPTION_FILE, Description, DescriptionError, SubprojectEntry, TargetKind,
};
use crate::diagnostics::Diagnostics;
use crate::lock::GuidLock;
use crate::paths;
use crate::toolset::ToolsetVersion;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Source of descriptions. Loading must not have side effects.
pub trait DescriptionLoader {
    fn load(&mut self, path: &Path) -> Result<Description, DescriptionError>;
}

/// Reads `vcgen.toml` files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlLoader;

impl DescriptionLoader for TomlLoader {
    fn load(&mut self, path: &Path) -> Result<Description, DescriptionError> {
        config::load_description(path)
    }
}

/// Libraries every Windows program links; never dependency edges.
const SYSTEM_LIBRARIES: &[&str] = &[
    "advapi32", "bufferoverflowu", "comctl32", "comdlg32", "crypt32", "d3d11", "d3d9", "dbghelp",
    "dwmapi", "dxgi", "gdi32", "gdiplus", "glu32", "imm32", "iphlpapi", "kernel32", "libcmt",
    "libcmtd", "mpr", "msimg32", "msvcrt", "msvcrtd", "netapi32", "odbc32", "odbccp32", "ole32",
    "oleaut32", "opengl32", "psapi", "rpcrt4", "setupapi", "shell32", "shlwapi", "ucrt", "ucrtd",
    "user32", "userenv", "uuid", "uxtheme", "vcruntime", "vcruntimed", "version", "winmm",
    "winspool", "wininet", "ws2_32", "wsock32",
];

pub fn is_system_library(name: &str) -> bool {
    let stem = paths::file_stem(name).to_ascii_lowercase();
    SYSTEM_LIBRARIES.contains(&stem.as_str())
}

/// Link-time spelling of a library reference: `-lfoo`, `foo`, `foo.dll`
/// and `foo.lib` all become `foo.lib`.
pub fn link_name(reference: &str) -> Option<String> {
    let reference = reference.trim();
    let name = match reference.strip_prefix("-l") {
        Some(name) => name,
        None if reference.starts_with('-') || reference.starts_with('/') => return None,
        None => paths::file_name(reference),
    };
    if name.is_empty() {
        return None;
    }
    match paths::extension(name).as_deref() {
        Some("lib") | Some("dll") => Some(format!("{}.lib", paths::file_stem(name))),
        Some(_) => None,
        None => Some(format!("{}.lib", name)),
    }
}

/// Artifact other projects refer to. A shared library is consumed through
/// its import library.
pub fn artifact_name(description: &Description) -> String {
    let target = description.target_name();
    match description.package.kind {
        TargetKind::App => format!("{}.exe", target),
        TargetKind::Lib | TargetKind::Staticlib => format!("{}.lib", target),
        TargetKind::Subdirs => target.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Overrides the root description's toolset.
    pub toolset: Option<ToolsetVersion>,
    /// Features available for `requires`.
    pub features: Vec<String>,
    /// Where project and solution files go. Defaults to the root directory.
    pub output_dir: Option<PathBuf>,
}

/// Identity of a leaf and the artifacts it depends on.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SolutionDependency {
    pub guid: String,
    pub artifact: String,
    pub depends_on: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Leaf {
    pub name: String,
    #[serde(skip)]
    pub guid: Uuid,
    pub description_file: PathBuf,
    pub project_file: PathBuf,
    pub configs: Vec<String>,
    pub platforms: Vec<String>,
    #[serde(flatten)]
    pub dependency: SolutionDependency,
}

#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub name: String,
    pub dir: PathBuf,
    #[serde(skip)]
    pub toolset: ToolsetVersion,
    pub leaves: Vec<Leaf>,
}

impl Solution {
    pub fn leaf_by_artifact(&self, artifact: &str) -> Option<&Leaf> {
        self.leaves
            .iter()
            .find(|l| l.dependency.artifact.eq_ignore_ascii_case(artifact))
    }

    /// `(dependent, dependency)` pairs in leaf order.
    pub fn edges(&self) -> Vec<(&Leaf, &Leaf)> {
        self.leaves
            .iter()
            .flat_map(|leaf| {
                leaf.dependency
                    .depends_on
                    .iter()
                    .filter_map(move |artifact| Some((leaf, self.leaf_by_artifact(artifact)?)))
            })
            .collect()
    }

    /// Union of every leaf's `build type|platform` pairs, in first-seen order.
    pub fn configurations(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for leaf in &self.leaves {
            for build_type in &leaf.configs {
                for platform in &leaf.platforms {
                    if !pairs.iter().any(|(b, p)| {
                        b.eq_ignore_ascii_case(build_type) && p.eq_ignore_ascii_case(platform)
                    }) {
                        pairs.push((build_type.clone(), platform.clone()));
                    }
                }
            }
        }
        pairs
    }

    /// Dependency cycles among distinct leaves, each as a closed name path.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        fn visit(
            solution: &Solution,
            index: usize,
            marks: &mut [Mark],
            stack: &mut Vec<usize>,
            found: &mut Vec<Vec<String>>,
        ) {
            marks[index] = Mark::Active;
            stack.push(index);
            for artifact in &solution.leaves[index].dependency.depends_on {
                let Some(next) = solution
                    .leaves
                    .iter()
                    .position(|l| l.dependency.artifact.eq_ignore_ascii_case(artifact))
                else {
                    continue;
                };
                match marks[next] {
                    Mark::New => visit(solution, next, marks, stack, found),
                    Mark::Active => {
                        let start = stack.iter().position(|i| *i == next).unwrap_or(0);
                        let mut cycle: Vec<String> = stack[start..]
                            .iter()
                            .map(|i| solution.leaves[*i].name.clone())
                            .collect();
                        cycle.push(solution.leaves[next].name.clone());
                        found.push(cycle);
                    }
                    Mark::Done => {}
                }
            }
            stack.pop();
            marks[index] = Mark::Done;
        }

        let mut marks = vec![Mark::New; self.leaves.len()];
        let mut found = Vec::new();
        for index in 0..self.leaves.len() {
            if marks[index] == Mark::New {
                visit(self, index, &mut marks, &mut Vec::new(), &mut found);
            }
        }
        found
    }
}

/// Where a reference came from; decides how an unmatched one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DepOrigin {
    Declared,
    Library,
    Tool,
}

#[derive(Debug, Clone)]
struct Reference {
    leaf: usize,
    name: String,
    origin: DepOrigin,
}

struct Resolver<'a, L: DescriptionLoader> {
    loader: &'a mut L,
    options: &'a ResolveOptions,
    lock: &'a GuidLock,
    diag: &'a mut Diagnostics,
    toolset: ToolsetVersion,
    leaves: Vec<Leaf>,
    /// Lower-cased project names and artifacts to leaf index.
    known: HashMap<String, usize>,
    deferred: Vec<Reference>,
}

/// Description file an entry refers to and the output sub-directory its
/// projects are written to.
fn locate(entry: &SubprojectEntry, source_dir: &Path) -> Option<(PathBuf, PathBuf)> {
    let (reference, subdir) = match entry {
        SubprojectEntry::Simple(reference) => (reference.clone(), None),
        SubprojectEntry::Detailed {
            file: Some(file),
            subdir,
            ..
        } => (file.clone(), subdir.clone()),
        SubprojectEntry::Detailed {
            path, name, subdir, ..
        } => (path.clone().or_else(|| name.clone())?, subdir.clone()),
    };
    if reference.trim().is_empty() {
        return None;
    }

    let normalized = paths::normalize(&reference);
    let (file, dir) = if normalized.to_ascii_lowercase().ends_with(".toml") {
        let dir = normalized
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_default();
        (source_dir.join(&normalized), dir)
    } else {
        (source_dir.join(&normalized).join(DESCRIPTION_FILE), normalized)
    };
    let output = subdir.unwrap_or(dir);
    let output = if output == "." { String::new() } else { output };
    Some((file, PathBuf::from(output)))
}

impl<L: DescriptionLoader> Resolver<'_, L> {
    fn unmet_requirement<'d>(&self, description: &'d Description) -> Option<&'d str> {
        description
            .package
            .requires
            .iter()
            .find(|req| {
                !self
                    .options
                    .features
                    .iter()
                    .any(|f| f.eq_ignore_ascii_case(req))
            })
            .map(String::as_str)
    }

    fn resolve_collection(
        &mut self,
        description: &Description,
        ctx: &mut ResolveContext,
        inherited: &[String],
    ) {
        for entry in &description.subprojects {
            let label = entry.display_name();
            if !entry.builds() {
                self.diag
                    .note(format!("sub-project '{}' is opted out of the build, skipped", label));
                continue;
            }
            let Some((file, output_subdir)) = locate(entry, &ctx.source_dir) else {
                self.diag.warn(format!(
                    "{}: sub-project entry without a path, skipped",
                    ctx.source_dir.display()
                ));
                continue;
            };
            if ctx.is_active(&file) {
                self.diag.warn(format!(
                    "sub-project '{}' includes itself through {}, skipped",
                    label,
                    file.display()
                ));
                continue;
            }

            let child = match self.loader.load(&file) {
                Ok(child) => child,
                Err(e) => {
                    self.diag.warn(format!("skipping sub-project '{}': {}", label, e));
                    continue;
                }
            };
            if let Some(feature) = self.unmet_requirement(&child) {
                self.diag.warn(format!(
                    "skipping sub-project '{}' ({}): requires unavailable feature '{}'",
                    label,
                    file.display(),
                    feature
                ));
                continue;
            }

            let mut depends = inherited.to_vec();
            for dep in entry.depends() {
                if !depends.iter().any(|d| d.eq_ignore_ascii_case(dep)) {
                    depends.push(dep.clone());
                }
            }

            let mut scope = ctx.enter(&file, &output_subdir);
            if child.package.kind.is_collection() {
                self.resolve_collection(&child, &mut scope, &depends);
            } else {
                let output_dir = scope.output_dir.clone();
                self.add_leaf(&child, &file, &output_dir, entry.guid(), &depends);
            }
        }
    }

    fn add_leaf(
        &mut self,
        description: &Description,
        file: &Path,
        output_dir: &Path,
        entry_guid: Option<&str>,
        inherited: &[String],
    ) {
        let name = description.package.name.clone();
        let artifact = artifact_name(description);
        if let Some(&existing) = self.known.get(&artifact.to_lowercase()) {
            self.diag.warn(format!(
                "skipping '{}' ({}): '{}' is already produced by '{}'",
                name,
                file.display(),
                artifact,
                self.leaves[existing].name
            ));
            return;
        }

        let project_file =
            output_dir.join(format!("{}.{}", name, self.toolset.project_extension()));
        let explicit = entry_guid.or(description.package.guid.as_deref());
        let guid = self.lock.guid_for(explicit, &project_file, self.diag);

        let index = self.leaves.len();
        self.leaves.push(Leaf {
            name: name.clone(),
            guid,
            description_file: file.to_path_buf(),
            project_file,
            configs: description.build.configs.clone(),
            platforms: description.build.platforms.clone(),
            dependency: SolutionDependency {
                guid: crate::guid::format_guid(&guid),
                artifact: artifact.clone(),
                depends_on: BTreeSet::new(),
            },
        });
        self.known.entry(name.to_lowercase()).or_insert(index);
        self.known.insert(artifact.to_lowercase(), index);

        let dir = file.parent().unwrap_or(Path::new("."));
        for reference in self.references(description, dir, inherited) {
            let reference = Reference {
                leaf: index,
                ..reference
            };
            if !self.link(&reference) {
                self.deferred.push(reference);
            }
        }
    }

    fn references(
        &mut self,
        description: &Description,
        dir: &Path,
        inherited: &[String],
    ) -> Vec<Reference> {
        let build = &description.build;
        let mut refs = Vec::new();
        let mut push = |name: String, origin: DepOrigin| {
            if !refs.iter().any(|r: &Reference| r.name.eq_ignore_ascii_case(&name)) {
                refs.push(Reference { leaf: 0, name, origin });
            }
        };

        for dep in inherited.iter().chain(&build.depends) {
            push(dep.clone(), DepOrigin::Declared);
        }

        let lflags = build.lflags.tokens();
        for lib in build.libs.iter().chain(&lflags) {
            if let Some(lib) = link_name(lib)
                && !is_system_library(&lib)
            {
                push(lib, DepOrigin::Library);
            }
        }

        for tool in &description.tools {
            let discovered = match &tool.depend_command {
                Some(command) => crate::discovery::discover_inputs(command, dir, self.diag),
                None => Vec::new(),
            };
            for input in tool.inputs.iter().chain(&tool.depends).chain(&discovered) {
                push(paths::file_name(input).to_string(), DepOrigin::Tool);
            }
        }
        refs
    }

    /// Records the edge for `reference` if its target is known.
    fn link(&mut self, reference: &Reference) -> bool {
        let key = reference.name.to_lowercase();
        let target = match reference.origin {
            DepOrigin::Declared => self
                .known
                .get(&key)
                .or_else(|| self.known.get(&format!("{}.lib", key)))
                .or_else(|| self.known.get(&format!("{}.exe", key)))
                .or_else(|| self.known.get(&link_name(&key)?.to_lowercase())),
            DepOrigin::Library | DepOrigin::Tool => self.known.get(&key),
        };
        let Some(&target) = target else {
            return false;
        };
        if target != reference.leaf {
            let artifact = self.leaves[target].dependency.artifact.clone();
            self.leaves[reference.leaf]
                .dependency
                .depends_on
                .insert(artifact);
        }
        true
    }

    fn finish(&mut self) {
        for reference in std::mem::take(&mut self.deferred) {
            if self.link(&reference) {
                continue;
            }
            let leaf = &self.leaves[reference.leaf].name;
            match reference.origin {
                DepOrigin::Declared => self.diag.warn(format!(
                    "project '{}': unresolved dependency '{}', edge omitted",
                    leaf, reference.name
                )),
                DepOrigin::Library => self.diag.note(format!(
                    "project '{}': library '{}' is not built by this solution",
                    leaf, reference.name
                )),
                DepOrigin::Tool => {}
            }
        }
    }
}

/// Description file for a directory or file argument.
pub fn description_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DESCRIPTION_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Resolves the tree rooted at `root` (a description file or a directory
/// holding one). Always returns a solution, possibly without leaves.
pub fn resolve<L: DescriptionLoader>(
    root: &Path,
    options: &ResolveOptions,
    lock: &GuidLock,
    loader: &mut L,
    diag: &mut Diagnostics,
) -> Solution {
    let root_file = description_path(root);
    let root_dir = root_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let output_dir = options.output_dir.clone().unwrap_or_else(|| root_dir.clone());
    let fallback_name = root_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "solution".to_string());

    let loaded = match loader.load(&root_file) {
        Ok(description) => Some(description),
        Err(e) => {
            diag.error(format!("{}", e));
            None
        }
    };

    let toolset = options
        .toolset
        .or_else(|| {
            let spelled = loaded.as_ref()?.build.toolset.as_deref()?;
            let parsed = ToolsetVersion::parse(spelled);
            if parsed.is_none() {
                diag.warn(format!(
                    "unknown toolset '{}', using {}",
                    spelled,
                    ToolsetVersion::latest()
                ));
            }
            parsed
        })
        .unwrap_or_default();

    let mut resolver = Resolver {
        loader,
        options,
        lock,
        diag,
        toolset,
        leaves: Vec::new(),
        known: HashMap::new(),
        deferred: Vec::new(),
    };

    let mut name = fallback_name;
    if let Some(description) = loaded {
        name = description.package.name.clone();
        if let Some(feature) = resolver.unmet_requirement(&description) {
            resolver.diag.warn(format!(
                "{} requires unavailable feature '{}', nothing resolved",
                root_file.display(),
                feature
            ));
        } else {
            let mut ctx = ResolveContext::new(root_dir.clone(), output_dir.clone());
            let mut scope = ctx.enter(&root_file, Path::new(""));
            if description.package.kind.is_collection() {
                resolver.resolve_collection(&description, &mut scope, &[]);
            } else {
                let dir = scope.output_dir.clone();
                resolver.add_leaf(&description, &root_file, &dir, None, &[]);
            }
        }
    }
    resolver.finish();

    let solution = Solution {
        name,
        dir: output_dir,
        toolset,
        leaves: resolver.leaves,
    };
    for cycle in solution.cycles() {
        resolver.diag.note(format!("dependency cycle: {}", cycle.join(" -> ")));
    }
    if solution.leaves.is_empty() {
        resolver
            .diag
            .warn(format!("no projects resolved under {}", root_dir.display()));
    }
    solution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_description;

    /// In-memory descriptions keyed by path.
    #[derive(Default)]
    struct MapLoader {
        files: HashMap<PathBuf, String>,
        loaded: Vec<PathBuf>,
    }

    impl MapLoader {
        fn with(mut self, path: &str, text: &str) -> Self {
            self.files.insert(PathBuf::from(path), text.to_string());
            self
        }
    }

    impl DescriptionLoader for MapLoader {
        fn load(&mut self, path: &Path) -> Result<Description, DescriptionError> {
            self.loaded.push(path.to_path_buf());
            match self.files.get(path) {
                Some(text) => parse_description(text, path),
                None => Err(DescriptionError::NotFound(path.to_path_buf())),
            }
        }
    }

    fn run(loader: &mut MapLoader, features: &[&str]) -> (Solution, Diagnostics) {
        let options = ResolveOptions {
            features: features.iter().map(|f| f.to_string()).collect(),
            ..ResolveOptions::default()
        };
        let mut diag = Diagnostics::silent();
        let solution = resolve(
            Path::new("/w/vcgen.toml"),
            &options,
            &GuidLock::default(),
            loader,
            &mut diag,
        );
        (solution, diag)
    }

    fn names(solution: &Solution) -> Vec<&str> {
        solution.leaves.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_link_names() {
        assert_eq!(link_name("-lpng").as_deref(), Some("png.lib"));
        assert_eq!(link_name("core.dll").as_deref(), Some("core.lib"));
        assert_eq!(link_name("lib/Core.lib").as_deref(), Some("Core.lib"));
        assert_eq!(link_name("util").as_deref(), Some("util.lib"));
        assert_eq!(link_name("/NODEFAULTLIB"), None);
        assert_eq!(link_name("readme.txt"), None);
        assert!(is_system_library("KERNEL32.lib"));
        assert!(!is_system_library("core.lib"));
    }

    #[test]
    fn test_deferred_references_resolve_after_the_walk() {
        let mut loader = MapLoader::default()
            .with(
                "/w/vcgen.toml",
                r#"subprojects = ["app", "libs"]
[package]
name = "all"
kind = "subdirs""#,
            )
            .with(
                "/w/app/vcgen.toml",
                "[package]\nname = \"app\"\n[build]\ndepends = [\"core\"]\nlibs = [\"user32.lib\", \"zlib\"]",
            )
            .with(
                "/w/libs/vcgen.toml",
                "subprojects = [\"core\"]\n[package]\nname = \"libs\"\nkind = \"subdirs\"",
            )
            .with("/w/libs/core/vcgen.toml", "[package]\nname = \"core\"\nkind = \"dll\"");

        let (solution, diag) = run(&mut loader, &[]);
        assert_eq!(names(&solution), vec!["app", "core"]);
        let edges: Vec<(&str, &str)> = solution
            .edges()
            .into_iter()
            .map(|(a, b)| (a.name.as_str(), b.name.as_str()))
            .collect();
        assert_eq!(edges, vec![("app", "core")]);
        assert_eq!(
            solution.leaves[1].project_file,
            PathBuf::from("/w/libs/core/core.vcxproj")
        );
        assert!(diag.mentions("zlib.lib"));
        assert_eq!(diag.warnings().count(), 0);
    }

    #[test]
    fn test_declared_dll_dependency_matches_its_import_library() {
        let mut loader = MapLoader::default()
            .with(
                "/w/vcgen.toml",
                "subprojects = [\"b\", \"a\"]\n[package]\nname = \"all\"\nkind = \"subdirs\"",
            )
            .with("/w/a/vcgen.toml", "[package]\nname = \"a\"\nkind = \"lib\"")
            .with(
                "/w/b/vcgen.toml",
                "[package]\nname = \"b\"\n[build]\ndepends = [\"A.dll\"]",
            );

        let (solution, diag) = run(&mut loader, &[]);
        assert_eq!(names(&solution), vec!["b", "a"]);
        assert_eq!(solution.edges().len(), 1);
        assert!(solution.leaves[0].dependency.depends_on.contains("a.lib"));
        assert!(!diag.mentions("unresolved dependency"));
    }

    #[test]
    fn test_collection_dependencies_propagate_as_union() {
        let mut loader = MapLoader::default()
            .with(
                "/w/vcgen.toml",
                r#"subprojects = ["base", { path = "group", depends = ["base"] }]
[package]
name = "all"
kind = "subdirs""#,
            )
            .with("/w/base/vcgen.toml", "[package]\nname = \"base\"\nkind = \"staticlib\"")
            .with(
                "/w/group/vcgen.toml",
                "subprojects = [\"tool\"]\n[package]\nname = \"group\"\nkind = \"subdirs\"",
            )
            .with(
                "/w/group/tool/vcgen.toml",
                "[package]\nname = \"tool\"\n[build]\ndepends = [\"extra\"]",
            );

        let (solution, diag) = run(&mut loader, &[]);
        let tool = &solution.leaves[1];
        assert_eq!(tool.name, "tool");
        assert_eq!(
            tool.dependency.depends_on.iter().collect::<Vec<_>>(),
            vec!["base.lib"]
        );
        assert!(diag.mentions("unresolved dependency 'extra'"));
    }

    #[test]
    fn test_opt_out_requirements_and_self_references() {
        let mut loader = MapLoader::default()
            .with(
                "/w/vcgen.toml",
                r#"subprojects = [{ path = "off", build = false }, "gui", "me", "missing"]
[package]
name = "all"
kind = "subdirs""#,
            )
            .with("/w/off/vcgen.toml", "[package]\nname = \"off\"")
            .with("/w/gui/vcgen.toml", "[package]\nname = \"gui\"\nrequires = [\"gui\"]")
            .with(
                "/w/me/vcgen.toml",
                "[package]\nname = \"me\"\nkind = \"lib\"\n[build]\ndepends = [\"me\"]\nlibs = [\"me.lib\"]",
            );

        let (solution, diag) = run(&mut loader, &[]);
        assert_eq!(names(&solution), vec!["me"]);
        assert!(solution.leaves[0].dependency.depends_on.is_empty());
        assert!(!loader.loaded.contains(&PathBuf::from("/w/off/vcgen.toml")));
        assert!(diag.mentions("requires unavailable feature 'gui'"));
        assert!(diag.mentions("missing"));

        let (solution, _) = run(&mut loader, &["GUI"]);
        assert_eq!(names(&solution), vec!["gui", "me"]);
    }

    #[test]
    fn test_tool_inputs_produced_by_another_leaf() {
        let mut loader = MapLoader::default()
            .with(
                "/w/vcgen.toml",
                r#"subprojects = ["parser", "gen"]
[package]
name = "all"
kind = "subdirs""#,
            )
            .with(
                "/w/parser/vcgen.toml",
                r#"[package]
name = "parser"
kind = "staticlib"
[[tools]]
name = "grammar"
inputs = ["grammar.y"]
depends = ["../gen/bin/gen.exe"]"#,
            )
            .with("/w/gen/vcgen.toml", "[package]\nname = \"gen\"");

        let (solution, _) = run(&mut loader, &[]);
        assert_eq!(
            solution.leaves[0].dependency.depends_on.iter().collect::<Vec<_>>(),
            vec!["gen.exe"]
        );
    }

    #[test]
    fn test_cycles_are_reported_not_fatal() {
        let mut loader = MapLoader::default()
            .with(
                "/w/vcgen.toml",
                r#"subprojects = ["a", "b"]
[package]
name = "all"
kind = "subdirs""#,
            )
            .with(
                "/w/a/vcgen.toml",
                "[package]\nname = \"a\"\nkind = \"lib\"\n[build]\ndepends = [\"b\"]",
            )
            .with(
                "/w/b/vcgen.toml",
                "[package]\nname = \"b\"\nkind = \"lib\"\n[build]\ndepends = [\"a\"]",
            );

        let (solution, diag) = run(&mut loader, &[]);
        assert_eq!(solution.edges().len(), 2);
        assert_eq!(solution.cycles(), vec![vec!["a", "b", "a"]]);
        assert!(diag.mentions("dependency cycle: a -> b -> a"));
    }

    #[test]
    fn test_self_including_collection_is_skipped() {
        let mut loader = MapLoader::default()
            .with(
                "/w/vcgen.toml",
                r#"subprojects = ["vcgen.toml", "x"]
[package]
name = "all"
kind = "subdirs""#,
            )
            .with("/w/x/vcgen.toml", "[package]\nname = \"x\"");

        let (solution, diag) = run(&mut loader, &[]);
        assert_eq!(names(&solution), vec!["x"]);
        assert!(diag.mentions("includes itself"));
    }

    #[test]
    fn test_leaf_root_and_empty_solution() {
        let mut loader = MapLoader::default().with("/w/vcgen.toml", "[package]\nname = \"solo\"");
        let (solution, _) = run(&mut loader, &[]);
        assert_eq!(names(&solution), vec!["solo"]);
        assert_eq!(solution.configurations().len(), 2);

        let mut loader = MapLoader::default();
        let (solution, diag) = run(&mut loader, &[]);
        assert!(solution.leaves.is_empty());
        assert_eq!(solution.name, "w");
        assert!(diag.mentions("no projects resolved"));
    }
}
