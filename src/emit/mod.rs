//! Project and solution serialization.
//!
//! Every emitter is a deterministic function of its model: the same
//! [`Project`] or [`Solution`](crate::resolver::Solution) always produces the
//! same bytes.

pub mod solution;
pub mod vcproj;
pub mod vcxproj;
pub mod walk;
pub mod xml;

use crate::model::Settings;
use crate::project::Project;
use crate::toolset::ToolsetVersion;
use std::io;

pub use walk::WalkOptions;

/// Serialized files of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFiles {
    pub body: Vec<u8>,
    /// `.vcxproj.filters` companion; `None` for the inline shape.
    pub filters: Option<Vec<u8>>,
}

/// Renders `project` in the shape `toolset` expects.
pub fn render_project(
    project: &Project,
    toolset: ToolsetVersion,
    options: &WalkOptions,
) -> io::Result<ProjectFiles> {
    if toolset.uses_msbuild() {
        let (body, filters) = vcxproj::write_vcxproj(project, toolset, options, Vec::new(), Vec::new())?;
        Ok(ProjectFiles {
            body,
            filters: Some(filters),
        })
    } else {
        let body = vcproj::write_vcproj(project, toolset, options, Vec::new())?;
        Ok(ProjectFiles { body, filters: None })
    }
}

/// MSBuild condition selecting one configuration.
pub(crate) fn condition(configuration: &str) -> String {
    format!("'$(Configuration)|$(Platform)'=='{}'", configuration)
}

/// `leading` attributes followed by every setting.
pub(crate) fn attributes<'a>(leading: &[(&'a str, &'a str)], settings: &'a Settings) -> Vec<(&'a str, &'a str)> {
    leading
        .iter()
        .copied()
        .chain(settings.entries().iter().map(|(name, value)| (*name, value.as_str())))
        .collect()
}
