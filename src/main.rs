//! # vcgen CLI Entry Point
//!
//! Parses arguments with clap and hands off to [`vcgen::generator`].
//!
//! ## Commands
//!
//! - `project`: one `.vcxproj` (or `.vcproj`) from a `vcgen.toml`
//! - `solution`: resolve the sub-project tree and write a `.sln`
//! - `lock`: pin every resolved project GUID in `vcgen.lock`
//! - `tree`: print the filter tree a project would get

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use vcgen::config;
use vcgen::generator::{self, GenerateOptions};
use vcgen::resolver;
use vcgen::toolset::ToolsetVersion;
use vcgen::tree::{self, TreeMode};
use vcgen::ui;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "vcgen")]
#[command(about = "Visual Studio project and solution generator", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the project file of one description
    Project {
        /// Description file or the directory holding vcgen.toml
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Visual Studio generation (2008, vs2019, v143, 17.0, ...)
        #[arg(long)]
        toolset: Option<String>,
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// One filter level per role instead of nested folders
        #[arg(long)]
        flat: bool,
        /// Suppress warnings and notes
        #[arg(short, long)]
        quiet: bool,
    },
    /// Resolve sub-projects and generate a solution
    Solution {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        toolset: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also generate every project of the solution
        #[arg(short, long)]
        recursive: bool,
        /// Feature available to `requires` (repeatable)
        #[arg(long = "feature")]
        features: Vec<String>,
        /// Print the dependency graph as JSON
        #[arg(long)]
        json: bool,
        #[arg(long)]
        flat: bool,
        #[arg(short, long)]
        quiet: bool,
    },
    /// Persist resolved project GUIDs in vcgen.lock
    Lock {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        toolset: Option<String>,
        #[arg(long = "feature")]
        features: Vec<String>,
    },
    /// Print the filter tree of a project
    Tree {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        flat: bool,
    },
}

fn parse_toolset(spelled: Option<&str>) -> Result<Option<ToolsetVersion>> {
    match spelled {
        None => Ok(None),
        Some(s) => match ToolsetVersion::parse(s) {
            Some(v) => Ok(Some(v)),
            None => bail!("Unknown toolset '{}' (try 2008, 2019, v143 or 17.0)", s),
        },
    }
}

fn tree_mode(flat: bool) -> Option<TreeMode> {
    flat.then_some(TreeMode::Flat)
}

fn main() -> Result<()> {
    enable_windows_utf8_console();

    let cli = Cli::parse();

    match cli.command {
        Commands::Project {
            path,
            toolset,
            out,
            flat,
            quiet,
        } => {
            let options = GenerateOptions {
                toolset: parse_toolset(toolset.as_deref())?,
                output_dir: out,
                tree_mode: tree_mode(flat),
                silent: quiet,
                ..GenerateOptions::default()
            };
            let mut diag = options.diagnostics();
            match generator::generate_project(&path, &options, &mut diag)? {
                Some(project) => {
                    println!(
                        "{} Generated {} ({} configurations)",
                        "✓".green(),
                        project.project_file.display().to_string().bold(),
                        project.configurations
                    );
                    if let Some(filters) = project.filters_file {
                        println!("   {} {}", "+".dimmed(), filters.display());
                    }
                    Ok(())
                }
                None => bail!("No project generated for {}", path.display()),
            }
        }

        Commands::Solution {
            path,
            toolset,
            out,
            recursive,
            features,
            json,
            flat,
            quiet,
        } => {
            let options = GenerateOptions {
                toolset: parse_toolset(toolset.as_deref())?,
                output_dir: out,
                tree_mode: tree_mode(flat),
                features,
                recursive,
                silent: quiet || json,
            };
            let mut diag = options.diagnostics();
            let generated = generator::generate_solution(&path, &options, &mut diag)?;

            if json {
                println!("{}", generator::solution_json(&generated.solution)?);
                return Ok(());
            }
            println!(
                "{} Generated {} ({} projects, {})",
                "✓".green(),
                generated.solution_file.display().to_string().bold(),
                generated.solution.leaves.len(),
                generated.solution.toolset
            );
            if !generated.solution.leaves.is_empty() {
                ui::solution_table(&generated.solution).print();
            }
            for project in &generated.projects {
                println!("   {} {}", "+".dimmed(), project.project_file.display());
            }
            Ok(())
        }

        Commands::Lock {
            path,
            toolset,
            features,
        } => {
            let options = GenerateOptions {
                toolset: parse_toolset(toolset.as_deref())?,
                features,
                ..GenerateOptions::default()
            };
            let mut diag = options.diagnostics();
            let (dir, count) = generator::pin_guids(&path, &options, &mut diag)?;
            println!(
                "{} Pinned {} project GUIDs in {}",
                "✓".green(),
                count,
                dir.join(vcgen::lock::LOCK_FILE).display()
            );
            Ok(())
        }

        Commands::Tree { path, flat } => {
            let mut diag = vcgen::diagnostics::Diagnostics::new();
            let description_file = resolver::description_path(&path);
            let description = config::load_description(&description_file)?;
            let source_dir = description_file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let toolset = ToolsetVersion::latest();
            let Some(project) = generator::build_project(
                &description,
                &source_dir,
                toolset,
                uuid::Uuid::nil(),
                &mut diag,
            ) else {
                bail!("No configurations for {}", description_file.display());
            };
            let mode = if flat || description.build.flat_filters {
                TreeMode::Flat
            } else {
                TreeMode::Hierarchical
            };
            for role in project.roles() {
                print!("{}", tree::render(&tree::build_tree(project.filters_for(&role), mode)));
            }
            Ok(())
        }
    }
}
