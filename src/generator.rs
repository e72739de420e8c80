//! Generation orchestration: description in, project and solution files out.

use crate::builder::{self, BuildRequest};
use crate::config::{self, Description};
use crate::diagnostics::Diagnostics;
use crate::emit::{self, WalkOptions, solution::write_solution};
use crate::lock::GuidLock;
use crate::paths;
use crate::project::{self, Project};
use crate::resolver::{self, ResolveOptions, Solution, TomlLoader};
use crate::toolset::ToolsetVersion;
use crate::tree::TreeMode;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub toolset: Option<ToolsetVersion>,
    /// Where generated files go. Defaults to the description's directory.
    pub output_dir: Option<PathBuf>,
    /// Overrides the description's `flat_filters`.
    pub tree_mode: Option<TreeMode>,
    /// Features available to `requires`.
    pub features: Vec<String>,
    /// Also generate every leaf project of a solution.
    pub recursive: bool,
    pub silent: bool,
}

impl GenerateOptions {
    pub fn diagnostics(&self) -> Diagnostics {
        if self.silent {
            Diagnostics::silent()
        } else {
            Diagnostics::new()
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedProject {
    pub name: String,
    pub guid: Uuid,
    pub project_file: PathBuf,
    pub filters_file: Option<PathBuf>,
    pub configurations: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedSolution {
    pub solution: Solution,
    pub solution_file: PathBuf,
    pub projects: Vec<GeneratedProject>,
}

fn select_toolset(
    explicit: Option<ToolsetVersion>,
    description: &Description,
    diag: &mut Diagnostics,
) -> ToolsetVersion {
    if let Some(toolset) = explicit {
        return toolset;
    }
    match description.build.toolset.as_deref() {
        Some(spelled) => ToolsetVersion::parse(spelled).unwrap_or_else(|| {
            diag.warn(format!(
                "{}: unknown toolset '{}', using {}",
                description.package.name,
                spelled,
                ToolsetVersion::latest()
            ));
            ToolsetVersion::latest()
        }),
        None => ToolsetVersion::latest(),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Path prefix leading from `project_dir` back to `source_dir`.
fn source_prefix(project_dir: &Path, source_dir: &Path) -> String {
    let relative = paths::relative_path(&absolute(project_dir), &absolute(source_dir));
    let spelled = paths::normalize(&relative.to_string_lossy());
    if spelled == "." { String::new() } else { spelled }
}

/// Builds every (build type, platform) configuration of `description` and
/// assembles them. `None` when nothing could be assembled.
pub fn build_project(
    description: &Description,
    source_dir: &Path,
    toolset: ToolsetVersion,
    guid: Uuid,
    diag: &mut Diagnostics,
) -> Option<Project> {
    let discovered = builder::discover_tool_inputs(description, source_dir, diag);
    let build = &description.build;

    let mut singles = Vec::new();
    for build_type in &build.configs {
        for platform in &build.platforms {
            let request = BuildRequest {
                description,
                build_type,
                platform,
                toolset,
                guid,
                discovered: &discovered,
            };
            singles.push(builder::build_single_config(&request, diag));
        }
    }
    project::assemble(&description.package.name, singles, diag)
}

/// Serializes `project` to `project_file` (and its filter map, if any).
pub fn write_project(
    project: &Project,
    toolset: ToolsetVersion,
    options: &WalkOptions,
    project_file: &Path,
) -> Result<Option<PathBuf>> {
    let dir = parent_dir(project_file);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let files = emit::render_project(project, toolset, options)
        .with_context(|| format!("Failed to render project '{}'", project.name))?;
    fs::write(project_file, &files.body)
        .with_context(|| format!("Failed to write {}", project_file.display()))?;

    match files.filters {
        Some(filters) => {
            let filters_file = project_file.with_extension(format!("{}.filters", toolset.project_extension()));
            fs::write(&filters_file, filters)
                .with_context(|| format!("Failed to write {}", filters_file.display()))?;
            Ok(Some(filters_file))
        }
        None => Ok(None),
    }
}

fn generate_leaf(
    description: &Description,
    description_file: &Path,
    project_file: &Path,
    toolset: ToolsetVersion,
    guid: Uuid,
    tree_mode: Option<TreeMode>,
    diag: &mut Diagnostics,
) -> Result<Option<GeneratedProject>> {
    let source_dir = parent_dir(description_file);
    let Some(project) = build_project(description, &source_dir, toolset, guid, diag) else {
        return Ok(None);
    };

    let mode = tree_mode.unwrap_or(if description.build.flat_filters {
        TreeMode::Flat
    } else {
        TreeMode::Hierarchical
    });
    let walk = WalkOptions {
        mode,
        source_prefix: source_prefix(&parent_dir(project_file), &source_dir),
    };
    let filters_file = write_project(&project, toolset, &walk, project_file)?;

    Ok(Some(GeneratedProject {
        name: project.name.clone(),
        guid: project.guid,
        project_file: project_file.to_path_buf(),
        filters_file,
        configurations: project.members.len(),
    }))
}

/// Generates the project described at `path` (a description file or a
/// directory holding one). `Ok(None)` when no configuration survived.
pub fn generate_project(
    path: &Path,
    options: &GenerateOptions,
    diag: &mut Diagnostics,
) -> Result<Option<GeneratedProject>> {
    let description_file = resolver::description_path(path);
    let description = config::load_description(&description_file)?;
    if description.package.kind.is_collection() {
        bail!(
            "{} describes a collection of sub-projects; use `vcgen solution`",
            description_file.display()
        );
    }

    let source_dir = parent_dir(&description_file);
    let lock = GuidLock::load(&source_dir)?;
    let toolset = select_toolset(options.toolset, &description, diag);
    let output_dir = options.output_dir.clone().unwrap_or_else(|| source_dir.clone());
    let project_file = output_dir.join(format!(
        "{}.{}",
        description.package.name,
        toolset.project_extension()
    ));
    let guid = lock.guid_for(description.package.guid.as_deref(), &project_file, diag);

    generate_leaf(
        &description,
        &description_file,
        &project_file,
        toolset,
        guid,
        options.tree_mode,
        diag,
    )
}

fn resolve_solution(path: &Path, options: &GenerateOptions, diag: &mut Diagnostics) -> Result<(Solution, PathBuf)> {
    let description_file = resolver::description_path(path);
    let root_dir = parent_dir(&description_file);
    let lock = GuidLock::load(&root_dir)?;
    let resolve_options = ResolveOptions {
        toolset: options.toolset,
        features: options.features.clone(),
        output_dir: options.output_dir.clone(),
    };
    let solution = resolver::resolve(path, &resolve_options, &lock, &mut TomlLoader, diag);
    Ok((solution, root_dir))
}

/// Resolves the sub-project tree at `path` and writes its solution file.
/// With `recursive`, every leaf project is generated too; a leaf that fails
/// is reported and skipped.
pub fn generate_solution(
    path: &Path,
    options: &GenerateOptions,
    diag: &mut Diagnostics,
) -> Result<GeneratedSolution> {
    let (solution, _) = resolve_solution(path, options, diag)?;

    fs::create_dir_all(&solution.dir)
        .with_context(|| format!("Failed to create {}", solution.dir.display()))?;
    let solution_file = solution.dir.join(format!("{}.sln", solution.name));
    let bytes = write_solution(&solution, Vec::new())
        .with_context(|| format!("Failed to render solution '{}'", solution.name))?;
    fs::write(&solution_file, bytes)
        .with_context(|| format!("Failed to write {}", solution_file.display()))?;

    let mut projects = Vec::new();
    if options.recursive {
        for leaf in &solution.leaves {
            let generated = config::load_description(&leaf.description_file)
                .map_err(anyhow::Error::from)
                .and_then(|description| {
                    generate_leaf(
                        &description,
                        &leaf.description_file,
                        &leaf.project_file,
                        solution.toolset,
                        leaf.guid,
                        options.tree_mode,
                        diag,
                    )
                });
            match generated {
                Ok(Some(project)) => projects.push(project),
                Ok(None) => {}
                Err(e) => diag.error(format!("project '{}' not generated: {:#}", leaf.name, e)),
            }
        }
    }

    Ok(GeneratedSolution {
        solution,
        solution_file,
        projects,
    })
}

/// Pins the GUID of every resolved leaf in the root's `vcgen.lock`.
/// Returns the lock directory and the number of pinned projects.
pub fn pin_guids(path: &Path, options: &GenerateOptions, diag: &mut Diagnostics) -> Result<(PathBuf, usize)> {
    let (solution, root_dir) = resolve_solution(path, options, diag)?;
    let mut lock = GuidLock::load(&root_dir)?;
    for leaf in &solution.leaves {
        lock.pin(&leaf.project_file, &leaf.guid);
    }
    lock.save(&root_dir)?;
    Ok((root_dir, solution.leaves.len()))
}

/// JSON dump of the resolved dependency graph.
pub fn solution_json(solution: &Solution) -> Result<String> {
    serde_json::to_string_pretty(solution).context("Failed to serialize the dependency graph")
}
