//! A (build type, platform) configuration owning one instance of every tool.

use super::linker::LinkIncremental;
use super::{
    CompilerTool, CustomBuildTool, DeploymentTool, Dialect, EventKind, EventTool, LibrarianTool,
    LinkerTool, MidlTool, ResourceTool, Settings, TriState,
};

choice_enum! {
    pub enum ConfigurationType {
        Application => ("1", "Application"),
        DynamicLibrary => ("2", "DynamicLibrary"),
        StaticLibrary => ("4", "StaticLibrary"),
        Utility => ("10", "Utility"),
    }
}

choice_enum! {
    pub enum CharacterSet {
        Unicode => ("1", "Unicode"),
        Mbcs => ("2", "MultiByte"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub build_type: String,
    pub platform: String,
    pub configuration_type: ConfigurationType,
    pub character_set: CharacterSet,
    pub whole_program_optimization: TriState,
    pub platform_toolset: String,
    pub output_directory: String,
    pub intermediate_directory: String,
    pub primary_output: String,
    pub primary_output_extension: String,

    pub compiler: CompilerTool,
    pub linker: LinkerTool,
    pub librarian: LibrarianTool,
    pub midl: MidlTool,
    pub resource: ResourceTool,
    pub custom_build: CustomBuildTool,
    pub pre_build: EventTool,
    pub pre_link: EventTool,
    pub post_build: EventTool,
    pub deployment: DeploymentTool,

    build_macro_applied: bool,
}

impl Configuration {
    pub fn new(build_type: &str, platform: &str) -> Self {
        Self {
            build_type: build_type.to_string(),
            platform: platform.to_string(),
            configuration_type: ConfigurationType::NotSet,
            character_set: CharacterSet::NotSet,
            whole_program_optimization: TriState::Unset,
            platform_toolset: String::new(),
            output_directory: String::new(),
            intermediate_directory: String::new(),
            primary_output: String::new(),
            primary_output_extension: String::new(),
            compiler: CompilerTool::default(),
            linker: LinkerTool::default(),
            librarian: LibrarianTool::default(),
            midl: MidlTool::default(),
            resource: ResourceTool::default(),
            custom_build: CustomBuildTool::default(),
            pre_build: EventTool::new(EventKind::PreBuild),
            pre_link: EventTool::new(EventKind::PreLink),
            post_build: EventTool::new(EventKind::PostBuild),
            deployment: DeploymentTool::default(),
            build_macro_applied: false,
        }
    }

    /// `Debug|x64`
    pub fn name(&self) -> String {
        format!("{}|{}", self.build_type, self.platform)
    }

    pub fn is_debug(&self) -> bool {
        self.build_type.to_ascii_lowercase().starts_with("debug")
    }

    /// Adds `_DEBUG` or `NDEBUG` to the compiler and resource definitions.
    /// Repeated calls on the same configuration are no-ops.
    pub fn apply_build_type_macro(&mut self) {
        if self.build_macro_applied {
            return;
        }
        self.build_macro_applied = true;
        let name = if self.is_debug() { "_DEBUG" } else { "NDEBUG" };
        for defs in [
            &mut self.compiler.preprocessor_definitions,
            &mut self.resource.preprocessor_definitions,
        ] {
            if !defs.iter().any(|d| d == name) {
                defs.push(name.to_string());
            }
        }
    }

    /// Whether the configuration links an image (as opposed to archiving).
    pub fn uses_linker(&self) -> bool {
        matches!(
            self.configuration_type,
            ConfigurationType::Application | ConfigurationType::DynamicLibrary
        )
    }

    pub fn uses_librarian(&self) -> bool {
        self.configuration_type == ConfigurationType::StaticLibrary
    }

    /// Full output file name, e.g. `core.dll`.
    pub fn primary_output_file(&self) -> String {
        if self.primary_output_extension.is_empty() {
            self.primary_output.clone()
        } else {
            format!("{}.{}", self.primary_output, self.primary_output_extension)
        }
    }

    /// Attributes of a `.vcproj` `<Configuration>` element, or the
    /// `Label="Configuration"` property group of a `.vcxproj`.
    pub fn general_settings(&self, dialect: Dialect) -> Settings {
        let mut s = Settings::new(dialect);
        match dialect {
            Dialect::Vcproj => {
                s.raw("Name", "", self.name());
                s.text("OutputDirectory", "", &self.output_directory);
                s.text("IntermediateDirectory", "", &self.intermediate_directory);
                s.choice("ConfigurationType", "", self.configuration_type);
                s.choice("CharacterSet", "", self.character_set);
                // The legacy attribute is an integer.
                if self.whole_program_optimization.is_set() {
                    let value = if self.whole_program_optimization.is_true() { "1" } else { "0" };
                    s.raw("WholeProgramOptimization", "", value);
                }
            }
            Dialect::Vcxproj => {
                s.choice("", "ConfigurationType", self.configuration_type);
                s.raw("", "UseDebugLibraries", if self.is_debug() { "true" } else { "false" });
                s.text("", "PlatformToolset", &self.platform_toolset);
                s.flag("", "WholeProgramOptimization", self.whole_program_optimization);
                s.choice("", "CharacterSet", self.character_set);
            }
        }
        s
    }

    /// Output locations. `.vcxproj` only; `.vcproj` carries them as
    /// configuration attributes.
    pub fn output_settings(&self) -> Settings {
        let mut s = Settings::new(Dialect::Vcxproj);
        s.text("", "OutDir", &with_trailing_separator(&self.output_directory));
        s.text("", "IntDir", &with_trailing_separator(&self.intermediate_directory));
        s.text("", "TargetName", &self.primary_output);
        if !self.primary_output_extension.is_empty() {
            s.raw("", "TargetExt", format!(".{}", self.primary_output_extension));
        }
        if self.uses_linker() && self.linker.link_incremental != LinkIncremental::NotSet {
            s.choice("", "LinkIncremental", self.linker.link_incremental);
        }
        s
    }
}

fn with_trailing_separator(dir: &str) -> String {
    if dir.is_empty() || dir.ends_with('\\') || dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{}\\", dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_type_macro_is_applied_once() {
        let mut config = Configuration::new("Release", "x64");
        config.apply_build_type_macro();
        config.apply_build_type_macro();
        assert_eq!(config.compiler.preprocessor_definitions, vec!["NDEBUG"]);
        assert_eq!(config.resource.preprocessor_definitions, vec!["NDEBUG"]);

        let mut debug = Configuration::new("Debug", "Win32");
        debug.compiler.preprocessor_definitions.push("_DEBUG".into());
        debug.apply_build_type_macro();
        assert_eq!(debug.compiler.preprocessor_definitions, vec!["_DEBUG"]);
        assert_eq!(debug.name(), "Debug|Win32");
    }

    #[test]
    fn test_general_settings_per_dialect() {
        let mut config = Configuration::new("Debug", "x64");
        config.configuration_type = ConfigurationType::DynamicLibrary;
        config.character_set = CharacterSet::Unicode;
        config.platform_toolset = "v143".into();

        let legacy = config.general_settings(Dialect::Vcproj);
        assert_eq!(legacy.get("Name"), Some("Debug|x64"));
        assert_eq!(legacy.get("ConfigurationType"), Some("2"));
        assert_eq!(legacy.get("PlatformToolset"), None);

        let msbuild = config.general_settings(Dialect::Vcxproj);
        assert_eq!(msbuild.get("ConfigurationType"), Some("DynamicLibrary"));
        assert_eq!(msbuild.get("UseDebugLibraries"), Some("true"));
        assert_eq!(msbuild.get("PlatformToolset"), Some("v143"));
        assert_eq!(msbuild.get("CharacterSet"), Some("Unicode"));
    }

    #[test]
    fn test_output_settings() {
        let mut config = Configuration::new("Release", "x64");
        config.configuration_type = ConfigurationType::Application;
        config.output_directory = "bin\\Release".into();
        config.primary_output = "app".into();
        config.primary_output_extension = "exe".into();
        config.linker.link_incremental = LinkIncremental::No;

        let s = config.output_settings();
        assert_eq!(s.get("OutDir"), Some("bin\\Release\\"));
        assert_eq!(s.get("TargetExt"), Some(".exe"));
        assert_eq!(s.get("LinkIncremental"), Some("false"));
        assert_eq!(config.primary_output_file(), "app.exe");
    }
}
