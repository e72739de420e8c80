//! `.sln` writer.

use crate::guid::PROJECT_TYPE_VC;
use crate::paths;
use crate::resolver::{Leaf, Solution};
use crate::toolset::ToolsetVersion;
use std::io::{self, Write};

struct SlnWriter<W: Write> {
    out: W,
}

impl<W: Write> SlnWriter<W> {
    fn line(&mut self, depth: usize, text: &str) -> io::Result<()> {
        write!(self.out, "{}{}\r\n", "\t".repeat(depth), text)
    }

    fn section(
        &mut self,
        name: &str,
        timing: &str,
        entries: impl IntoIterator<Item = String>,
    ) -> io::Result<()> {
        self.line(1, &format!("GlobalSection({}) = {}", name, timing))?;
        for entry in entries {
            self.line(2, &entry)?;
        }
        self.line(1, "EndGlobalSection")
    }
}

/// Leaf configuration used for the solution pair `(build_type, platform)`,
/// and whether the leaf builds in it.
fn mapped_configuration(leaf: &Leaf, build_type: &str, platform: &str) -> Option<(String, bool)> {
    let own_build = leaf
        .configs
        .iter()
        .find(|c| c.eq_ignore_ascii_case(build_type));
    let own_platform = leaf
        .platforms
        .iter()
        .find(|p| p.eq_ignore_ascii_case(platform));
    let build = own_build.or_else(|| leaf.configs.first())?;
    let target = own_platform.or_else(|| leaf.platforms.first())?;
    Some((
        format!("{}|{}", build, target),
        own_build.is_some() && own_platform.is_some(),
    ))
}

fn dependency_guids<'a>(solution: &'a Solution, leaf: &'a Leaf) -> Vec<&'a str> {
    leaf.dependency
        .depends_on
        .iter()
        .filter_map(|artifact| solution.leaf_by_artifact(artifact))
        .filter(|dep| dep.dependency.guid != leaf.dependency.guid)
        .map(|dep| dep.dependency.guid.as_str())
        .collect()
}

fn write_projects<W: Write>(sln: &mut SlnWriter<W>, solution: &Solution) -> io::Result<()> {
    let per_project_dependencies = solution.toolset >= ToolsetVersion::Vs2005;
    for leaf in &solution.leaves {
        let path = paths::native_relative(&solution.dir, &leaf.project_file);
        sln.line(
            0,
            &format!(
                "Project(\"{}\") = \"{}\", \"{}\", \"{}\"",
                PROJECT_TYPE_VC, leaf.name, path, leaf.dependency.guid
            ),
        )?;
        let deps = dependency_guids(solution, leaf);
        if per_project_dependencies && !deps.is_empty() {
            sln.line(1, "ProjectSection(ProjectDependencies) = postProject")?;
            for dep in deps {
                sln.line(2, &format!("{} = {}", dep, dep))?;
            }
            sln.line(1, "EndProjectSection")?;
        }
        sln.line(0, "EndProject")?;
    }
    Ok(())
}

fn write_legacy_globals<W: Write>(sln: &mut SlnWriter<W>, solution: &Solution) -> io::Result<()> {
    let mut build_types: Vec<String> = Vec::new();
    for (build_type, _) in solution.configurations() {
        if !build_types.iter().any(|b| b.eq_ignore_ascii_case(&build_type)) {
            build_types.push(build_type);
        }
    }

    sln.section(
        "SolutionConfiguration",
        "preSolution",
        build_types.iter().map(|b| format!("{} = {}", b, b)),
    )?;

    let mut dependencies = Vec::new();
    for leaf in &solution.leaves {
        for (index, dep) in dependency_guids(solution, leaf).into_iter().enumerate() {
            dependencies.push(format!("{}.{} = {}", leaf.dependency.guid, index, dep));
        }
    }
    sln.section("ProjectDependencies", "postSolution", dependencies)?;

    let mut mappings = Vec::new();
    for leaf in &solution.leaves {
        let platform = leaf.platforms.first().map(String::as_str).unwrap_or("Win32");
        for build_type in &build_types {
            let Some((active, builds)) = mapped_configuration(leaf, build_type, platform) else {
                continue;
            };
            let guid = &leaf.dependency.guid;
            mappings.push(format!("{}.{}.ActiveCfg = {}", guid, build_type, active));
            if builds {
                mappings.push(format!("{}.{}.Build.0 = {}", guid, build_type, active));
            }
        }
    }
    sln.section("ProjectConfiguration", "postSolution", mappings)?;
    sln.section("ExtensibilityGlobals", "postSolution", Vec::new())?;
    sln.section("ExtensibilityAddIns", "postSolution", Vec::new())
}

fn write_globals<W: Write>(sln: &mut SlnWriter<W>, solution: &Solution) -> io::Result<()> {
    let pairs = solution.configurations();
    sln.section(
        "SolutionConfigurationPlatforms",
        "preSolution",
        pairs
            .iter()
            .map(|(b, p)| format!("{b}|{p} = {b}|{p}", b = b, p = p)),
    )?;

    let mut mappings = Vec::new();
    for leaf in &solution.leaves {
        for (build_type, platform) in &pairs {
            let Some((active, builds)) = mapped_configuration(leaf, build_type, platform) else {
                continue;
            };
            let key = format!("{}.{}|{}", leaf.dependency.guid, build_type, platform);
            mappings.push(format!("{}.ActiveCfg = {}", key, active));
            if builds {
                mappings.push(format!("{}.Build.0 = {}", key, active));
            }
        }
    }
    sln.section("ProjectConfigurationPlatforms", "postSolution", mappings)?;
    sln.section(
        "SolutionProperties",
        "preSolution",
        ["HideSolutionNode = FALSE".to_string()],
    )
}

/// Writes `solution` into `out`. An empty solution still produces a valid
/// file.
pub fn write_solution<W: Write>(solution: &Solution, out: W) -> io::Result<W> {
    let mut sln = SlnWriter { out };

    if solution.toolset >= ToolsetVersion::Vs2005 {
        sln.line(0, "")?;
    }
    sln.line(
        0,
        &format!(
            "Microsoft Visual Studio Solution File, Format Version {}",
            solution.toolset.solution_format_version()
        ),
    )?;
    if let Some(comment) = solution.toolset.solution_comment() {
        sln.line(0, comment)?;
    }

    write_projects(&mut sln, solution)?;

    sln.line(0, "Global")?;
    if solution.toolset >= ToolsetVersion::Vs2005 {
        write_globals(&mut sln, solution)?;
    } else {
        write_legacy_globals(&mut sln, solution)?;
    }
    sln.line(0, "EndGlobal")?;

    sln.out.flush()?;
    Ok(sln.out)
}
