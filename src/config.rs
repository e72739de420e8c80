//! Build description format (`vcgen.toml`).
//!
//! ```toml
//! [package]
//! name = "core"
//! kind = "lib"
//!
//! [build]
//! sources = ["src/core.cpp"]
//! cflags = "/W4 /EHsc"
//!
//! [profile.Release]
//! cflags = ["/GL"]
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DESCRIPTION_FILE: &str = "vcgen.toml";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Description {
    pub package: PackageConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub scripts: ScriptsConfig,
    #[serde(default)]
    pub tools: Vec<ToolConfig>,
    #[serde(default)]
    pub subprojects: Vec<SubprojectEntry>,
    pub deploy: Option<DeployConfig>,
    #[serde(default, rename = "profile")]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct PackageConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: TargetKind,
    /// Explicit project GUID override.
    pub guid: Option<String>,
    /// Features that must be available for the project to be generated.
    #[serde(default)]
    pub requires: Vec<String>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[default]
    App,
    #[serde(alias = "dll", alias = "shared")]
    Lib,
    #[serde(alias = "static")]
    Staticlib,
    Subdirs,
}

impl TargetKind {
    pub fn is_collection(self) -> bool {
        self == TargetKind::Subdirs
    }
}

/// A flag list written either as one string or as an array of flags.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    /// A single string is tokenized; array elements are taken as tokens.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => crate::flags::tokenize(s),
            OneOrMany::Many(v) => v.iter().filter(|s| !s.trim().is_empty()).cloned().collect(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CharacterSetName {
    #[default]
    Unicode,
    Mbcs,
    None,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BuildConfig {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub forms: Vec<String>,
    #[serde(default)]
    pub translations: Vec<String>,
    #[serde(default)]
    pub generated: Vec<String>,
    #[serde(default)]
    pub distfiles: Vec<String>,
    #[serde(default)]
    pub include_paths: Vec<String>,
    #[serde(default)]
    pub lib_paths: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub cflags: OneOrMany,
    #[serde(default)]
    pub lflags: OneOrMany,
    #[serde(default)]
    pub idlflags: OneOrMany,
    #[serde(default)]
    pub rcflags: OneOrMany,
    #[serde(default)]
    pub libs: Vec<String>,
    /// Explicit dependencies: project names or artifact names.
    #[serde(default)]
    pub depends: Vec<String>,
    /// Primary output base name. Defaults to the package name.
    pub target: Option<String>,
    #[serde(default = "default_configs")]
    pub configs: Vec<String>,
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
    pub toolset: Option<String>,
    pub output_dir: Option<String>,
    pub intermediate_dir: Option<String>,
    #[serde(default)]
    pub character_set: CharacterSetName,
    #[serde(default)]
    pub flat_filters: bool,
    /// Build customization (auxiliary tool rule) names, e.g. `masm`.
    #[serde(default)]
    pub rules: Vec<String>,
    /// Files excluded from the build in every configuration.
    #[serde(default)]
    pub excluded: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            headers: Vec::new(),
            resources: Vec::new(),
            forms: Vec::new(),
            translations: Vec::new(),
            generated: Vec::new(),
            distfiles: Vec::new(),
            include_paths: Vec::new(),
            lib_paths: Vec::new(),
            defines: Vec::new(),
            cflags: OneOrMany::default(),
            lflags: OneOrMany::default(),
            idlflags: OneOrMany::default(),
            rcflags: OneOrMany::default(),
            libs: Vec::new(),
            depends: Vec::new(),
            target: None,
            configs: default_configs(),
            platforms: default_platforms(),
            toolset: None,
            output_dir: None,
            intermediate_dir: None,
            character_set: CharacterSetName::default(),
            flat_filters: false,
            rules: Vec::new(),
            excluded: Vec::new(),
        }
    }
}

fn default_configs() -> Vec<String> {
    vec!["Debug".to_string(), "Release".to_string()]
}

fn default_platforms() -> Vec<String> {
    vec!["x64".to_string()]
}

/// Per build-type overrides, `[profile.Release]`.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct Profile {
    #[serde(default)]
    pub cflags: OneOrMany,
    #[serde(default)]
    pub lflags: OneOrMany,
    #[serde(default)]
    pub defines: Vec<String>,
    /// Files excluded from the build in this build type.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ScriptsConfig {
    #[serde(default)]
    pub pre_build: Vec<String>,
    #[serde(default)]
    pub pre_link: Vec<String>,
    #[serde(default)]
    pub post_build: Vec<String>,
}

/// A custom build rule applied to each of its inputs.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ToolConfig {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Output path pattern; `${base}` is the input's file stem.
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub commands: Vec<String>,
    pub message: Option<String>,
    /// Extra inputs of every step (tools, scripts).
    #[serde(default)]
    pub depends: Vec<String>,
    /// Command printing further inputs, one per line.
    pub depend_command: Option<String>,
    /// Display filter for the inputs. Defaults to a filter named after the tool.
    pub filter: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct DeployConfig {
    #[serde(default)]
    pub remote_directory: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub register_output: bool,
}

/// A `[[subprojects]]` entry (or a plain string naming a directory).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SubprojectEntry {
    Simple(String),
    Detailed {
        name: Option<String>,
        path: Option<String>,
        /// Explicit description file.
        file: Option<String>,
        /// Directory the project is generated in, when it differs from `path`.
        subdir: Option<String>,
        #[serde(default)]
        depends: Vec<String>,
        #[serde(default = "default_true")]
        build: bool,
        guid: Option<String>,
    },
}

fn default_true() -> bool {
    true
}

impl SubprojectEntry {
    /// Name used in diagnostics and for dependency matching.
    pub fn display_name(&self) -> String {
        match self {
            SubprojectEntry::Simple(path) => path.clone(),
            SubprojectEntry::Detailed {
                name, path, file, subdir, ..
            } => name
                .clone()
                .or_else(|| path.clone())
                .or_else(|| file.clone())
                .or_else(|| subdir.clone())
                .unwrap_or_default(),
        }
    }

    pub fn depends(&self) -> &[String] {
        match self {
            SubprojectEntry::Simple(_) => &[],
            SubprojectEntry::Detailed { depends, .. } => depends,
        }
    }

    pub fn builds(&self) -> bool {
        match self {
            SubprojectEntry::Simple(_) => true,
            SubprojectEntry::Detailed { build, .. } => *build,
        }
    }

    pub fn guid(&self) -> Option<&str> {
        match self {
            SubprojectEntry::Simple(_) => None,
            SubprojectEntry::Detailed { guid, .. } => guid.as_deref(),
        }
    }
}

impl Description {
    /// Overrides for `build_type`, matched case-insensitively.
    pub fn profile(&self, build_type: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(build_type))
            .map(|(_, profile)| profile)
    }

    /// Primary output base name.
    pub fn target_name(&self) -> &str {
        self.build.target.as_deref().unwrap_or(&self.package.name)
    }
}

#[derive(Debug)]
pub enum DescriptionError {
    NotFound(PathBuf),
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, String),
}

impl fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionError::NotFound(path) => {
                write!(f, "build description not found: {}", path.display())
            }
            DescriptionError::Io(path, e) => write!(f, "failed to read {}: {}", path.display(), e),
            DescriptionError::Parse(path, msg) => {
                write!(f, "failed to parse {}: {}", path.display(), msg)
            }
        }
    }
}

impl std::error::Error for DescriptionError {}

/// Parses description text. `origin` names the file in errors and supplies
/// the default project name.
pub fn parse_description(text: &str, origin: &Path) -> Result<Description, DescriptionError> {
    let mut description: Description = toml::from_str(text)
        .map_err(|e| DescriptionError::Parse(origin.to_path_buf(), e.message().to_string()))?;

    if description.package.name.trim().is_empty() {
        let dir_name = origin
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if dir_name.is_empty() {
            return Err(DescriptionError::Parse(
                origin.to_path_buf(),
                "package.name is required".to_string(),
            ));
        }
        description.package.name = dir_name;
    }
    if description.build.configs.is_empty() {
        description.build.configs = default_configs();
    }
    if description.build.platforms.is_empty() {
        description.build.platforms = default_platforms();
    }
    Ok(description)
}

/// Reads and parses a description file. Has no side effects.
pub fn load_description(path: &Path) -> Result<Description, DescriptionError> {
    if !path.is_file() {
        return Err(DescriptionError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| DescriptionError::Io(path.to_path_buf(), e))?;
    parse_description(&text, path)
}
