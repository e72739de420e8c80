//! Static library archiver settings (`VCLibrarianTool` / `Lib`).

use super::linker::TargetMachine;
use super::{Settings, TriState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarianTool {
    pub additional_dependencies: Vec<String>,
    pub additional_library_directories: Vec<String>,
    pub additional_options: Vec<String>,
    pub export_named_functions: Vec<String>,
    pub force_symbol_references: Vec<String>,
    pub ignore_all_default_libraries: TriState,
    pub ignore_default_library_names: Vec<String>,
    pub link_time_code_generation: TriState,
    pub module_definition_file: String,
    pub output_file: String,
    pub suppress_startup_banner: TriState,
    pub target_machine: TargetMachine,
    pub treat_warnings_as_errors: TriState,
}

impl LibrarianTool {
    pub fn for_build(platform: &str) -> Self {
        Self {
            suppress_startup_banner: TriState::True,
            target_machine: TargetMachine::for_platform(platform),
            ..Self::default()
        }
    }

    pub fn write_settings(&self, s: &mut Settings) {
        s.libraries(
            "AdditionalDependencies",
            "AdditionalDependencies",
            &self.additional_dependencies,
        );
        s.list(
            "AdditionalLibraryDirectories",
            "AdditionalLibraryDirectories",
            &self.additional_library_directories,
        );
        s.options("AdditionalOptions", "AdditionalOptions", &self.additional_options);
        s.list(
            "ExportNamedFunctions",
            "ExportNamedFunctions",
            &self.export_named_functions,
        );
        s.list(
            "ForceSymbolReferences",
            "ForceSymbolReferences",
            &self.force_symbol_references,
        );
        s.flag(
            "IgnoreAllDefaultLibraries",
            "IgnoreAllDefaultLibraries",
            self.ignore_all_default_libraries,
        );
        s.list(
            "IgnoreDefaultLibraryNames",
            "IgnoreSpecificDefaultLibraries",
            &self.ignore_default_library_names,
        );
        s.flag("", "LinkTimeCodeGeneration", self.link_time_code_generation);
        s.text(
            "ModuleDefinitionFile",
            "ModuleDefinitionFile",
            &self.module_definition_file,
        );
        s.text("OutputFile", "OutputFile", &self.output_file);
        s.flag(
            "SuppressStartupBanner",
            "SuppressStartupBanner",
            self.suppress_startup_banner,
        );
        // `.vcproj` librarian blocks have no machine attribute.
        s.choice("", "TargetMachine", self.target_machine);
        s.flag(
            "",
            "TreatLibWarningAsErrors",
            self.treat_warnings_as_errors,
        );
    }
}
