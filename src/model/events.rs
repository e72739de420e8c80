//! Custom build steps, build events and deployment.

use super::{Dialect, Settings, TriState};

const VCPROJ_SEPARATOR: &str = "\r\nif errorlevel 1 goto VCReportError\r\n";
const VCXPROJ_SEPARATOR: &str = "\r\nif errorlevel 1 goto VCEnd\r\n";

/// Joins statements so a failing one aborts the rest.
pub fn join_commands(commands: &[String], dialect: Dialect) -> String {
    let separator = match dialect {
        Dialect::Vcproj => VCPROJ_SEPARATOR,
        Dialect::Vcxproj => VCXPROJ_SEPARATOR,
    };
    commands
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// A per-file (or per-configuration) custom build step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomBuildTool {
    pub command_line: Vec<String>,
    pub description: String,
    pub outputs: Vec<String>,
    pub additional_dependencies: Vec<String>,
}

impl CustomBuildTool {
    pub fn is_empty(&self) -> bool {
        self.command_line.is_empty()
    }

    pub fn write_settings(&self, s: &mut Settings) {
        if self.is_empty() {
            return;
        }
        let command = join_commands(&self.command_line, s.dialect());
        s.text("CommandLine", "Command", &command);
        s.text("Description", "Message", &self.description);
        match s.dialect() {
            // Neither attribute inherits an item default in `.vcproj`.
            Dialect::Vcproj => {
                s.text("Outputs", "", &self.outputs.join(";"));
                s.text(
                    "AdditionalDependencies",
                    "",
                    &self.additional_dependencies.join(";"),
                );
            }
            Dialect::Vcxproj => {
                s.list("", "Outputs", &self.outputs);
                s.list("", "AdditionalInputs", &self.additional_dependencies);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    #[default]
    PreBuild,
    PreLink,
    PostBuild,
}

impl EventKind {
    /// `(vcproj tool name, vcxproj element)`.
    pub fn names(self) -> (&'static str, &'static str) {
        match self {
            EventKind::PreBuild => ("VCPreBuildEventTool", "PreBuildEvent"),
            EventKind::PreLink => ("VCPreLinkEventTool", "PreLinkEvent"),
            EventKind::PostBuild => ("VCPostBuildEventTool", "PostBuildEvent"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTool {
    pub kind: EventKind,
    pub command_line: Vec<String>,
    pub description: String,
    pub excluded_from_build: TriState,
}

impl EventTool {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.command_line.is_empty() && !self.excluded_from_build.is_set()
    }

    pub fn write_settings(&self, s: &mut Settings) {
        let command = join_commands(&self.command_line, s.dialect());
        s.text("CommandLine", "Command", &command);
        s.text("Description", "Message", &self.description);
        s.flag("ExcludedFromBuild", "", self.excluded_from_build);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentFile {
    pub name: String,
    pub source_dir: String,
    pub target_dir: String,
}

/// Device deployment. Only the `.vcproj` schema has a tool block for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentTool {
    pub remote_directory: String,
    pub additional_files: Vec<DeploymentFile>,
    pub register_output: TriState,
}

impl DeploymentTool {
    pub fn is_empty(&self) -> bool {
        self.remote_directory.is_empty()
            && self.additional_files.is_empty()
            && !self.register_output.is_set()
    }

    pub fn write_settings(&self, s: &mut Settings) {
        s.text("RemoteDirectory", "", &self.remote_directory);
        s.flag("RegisterOutput", "", self.register_output);
        let files = self
            .additional_files
            .iter()
            .map(|f| format!("{}|{}|{}|0", f.name, f.source_dir, f.target_dir))
            .collect::<Vec<_>>()
            .join(";");
        s.text("AdditionalFiles", "", &files);
    }
}
