//! Resource compiler settings (`VCResourceCompilerTool` / `ResourceCompile`).

use super::{Dialect, Settings, TriState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTool {
    pub additional_include_directories: Vec<String>,
    pub additional_options: Vec<String>,
    /// Language id, e.g. `0x409`.
    pub culture: Option<u32>,
    pub ignore_standard_include_path: TriState,
    pub null_terminate_strings: TriState,
    pub preprocessor_definitions: Vec<String>,
    pub resource_output_file_name: String,
    pub show_progress: TriState,
    pub suppress_startup_banner: TriState,
    pub undefine_preprocessor_definitions: Vec<String>,
}

impl ResourceTool {
    pub fn write_settings(&self, s: &mut Settings) {
        let mut options = self.additional_options.clone();
        if s.dialect() == Dialect::Vcproj && self.null_terminate_strings.is_true() {
            options.push("/n".to_string());
        }

        s.list(
            "AdditionalIncludeDirectories",
            "AdditionalIncludeDirectories",
            &self.additional_include_directories,
        );
        s.options("AdditionalOptions", "AdditionalOptions", &options);
        if let Some(culture) = self.culture {
            match s.dialect() {
                Dialect::Vcproj => s.raw("Culture", "", culture.to_string()),
                Dialect::Vcxproj => s.raw("", "Culture", format!("0x{:04x}", culture)),
            }
        }
        s.flag(
            "IgnoreStandardIncludePath",
            "IgnoreStandardIncludePath",
            self.ignore_standard_include_path,
        );
        s.flag("", "NullTerminateStrings", self.null_terminate_strings);
        s.list(
            "PreprocessorDefinitions",
            "PreprocessorDefinitions",
            &self.preprocessor_definitions,
        );
        s.text(
            "ResourceOutputFileName",
            "ResourceOutputFileName",
            &self.resource_output_file_name,
        );
        s.flag("ShowProgress", "ShowProgress", self.show_progress);
        s.flag("", "SuppressStartupBanner", self.suppress_startup_banner);
        s.list(
            "UndefinePreprocessorDefinitions",
            "UndefinePreprocessorDefinitions",
            &self.undefine_preprocessor_definitions,
        );
    }
}
