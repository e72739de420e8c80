//! Linker settings (`VCLinkerTool` / `Link`).

use super::{Choice, Dialect, Settings, TriState};

choice_enum! {
    /// Linker switches that `.vcproj` encodes as 1 (off) / 2 (on).
    pub enum Toggle {
        Off => ("1", "false"),
        On => ("2", "true"),
    }
}

choice_enum! {
    pub enum LinkIncremental {
        No => ("1", "false"),
        Yes => ("2", "true"),
    }
}

choice_enum! {
    pub enum SubSystem {
        Console => ("1", "Console"),
        Windows => ("2", "Windows"),
        Native => ("3", "Native"),
        EfiApplication => ("4", "EFI Application"),
        EfiBootService => ("5", "EFI Boot Service Driver"),
        EfiRom => ("6", "EFI ROM"),
        EfiRuntime => ("7", "EFI Runtime"),
        Posix => ("", "POSIX"),
    }
}

choice_enum! {
    pub enum TargetMachine {
        X86 => ("1", "MachineX86"),
        Arm => ("3", "MachineARM"),
        Ia64 => ("5", "MachineIA64"),
        X64 => ("17", "MachineX64"),
        Arm64 => ("", "MachineARM64"),
    }
}

impl TargetMachine {
    /// Machine for a solution platform name.
    pub fn for_platform(platform: &str) -> Self {
        match platform.to_ascii_lowercase().as_str() {
            "win32" | "x86" => Self::X86,
            "x64" | "amd64" => Self::X64,
            "arm" => Self::Arm,
            "arm64" => Self::Arm64,
            "ia64" | "itanium" => Self::Ia64,
            _ => Self::NotSet,
        }
    }
}

choice_enum! {
    pub enum LinkTimeCodeGeneration {
        Default => ("0", "Default"),
        UseLtcg => ("1", "UseLinkTimeCodeGeneration"),
        PgInstrument => ("2", "PGInstrument"),
        PgOptimize => ("3", "PGOptimization"),
        PgUpdate => ("4", "PGUpdate"),
        Incremental => ("", "UseFastLinkTimeCodeGeneration"),
    }
}

choice_enum! {
    pub enum LinkerDebug {
        No => ("false", "false"),
        Yes => ("true", "true"),
        FastLink => ("", "DebugFastLink"),
        Full => ("", "DebugFull"),
    }
}

choice_enum! {
    pub enum LinkerErrorReporting {
        None => ("0", "NoErrorReport"),
        Prompt => ("1", "PromptImmediately"),
        Queue => ("2", "QueueForNextLogin"),
        Send => ("", "SendErrorReport"),
    }
}

choice_enum! {
    pub enum UacExecutionLevel {
        AsInvoker => ("0", "AsInvoker"),
        HighestAvailable => ("1", "HighestAvailable"),
        RequireAdministrator => ("2", "RequireAdministrator"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkerTool {
    pub additional_dependencies: Vec<String>,
    pub additional_library_directories: Vec<String>,
    pub additional_manifest_dependencies: Vec<String>,
    pub additional_options: Vec<String>,
    pub base_address: String,
    pub data_execution_prevention: Toggle,
    pub delay_load_dlls: Vec<String>,
    pub enable_comdat_folding: Toggle,
    pub enable_uac: TriState,
    pub entry_point_symbol: String,
    pub error_reporting: LinkerErrorReporting,
    pub fixed_base_address: Toggle,
    pub force_symbol_references: Vec<String>,
    pub generate_debug_information: LinkerDebug,
    pub generate_manifest: TriState,
    pub generate_map_file: TriState,
    pub heap_commit_size: Option<u64>,
    pub heap_reserve_size: Option<u64>,
    pub ignore_all_default_libraries: TriState,
    pub ignore_default_library_names: Vec<String>,
    pub import_library: String,
    pub large_address_aware: Toggle,
    pub link_dll: TriState,
    pub link_incremental: LinkIncremental,
    pub link_time_code_generation: LinkTimeCodeGeneration,
    pub manifest_file: String,
    pub map_exports: TriState,
    pub map_file_name: String,
    pub minimum_required_version: String,
    pub module_definition_file: String,
    pub no_entry_point: TriState,
    pub optimize_references: Toggle,
    pub output_file: String,
    pub profile: TriState,
    pub program_database_file: String,
    pub randomized_base_address: Toggle,
    pub set_checksum: TriState,
    pub stack_commit_size: Option<u64>,
    pub stack_reserve_size: Option<u64>,
    pub sub_system: SubSystem,
    pub suppress_startup_banner: TriState,
    pub target_machine: TargetMachine,
    pub treat_warnings_as_errors: TriState,
    pub uac_execution_level: UacExecutionLevel,
    pub version: String,
}

impl LinkerTool {
    /// Baseline settings before any user flag is applied.
    pub fn for_build(debug: bool, platform: &str) -> Self {
        let mut tool = Self {
            suppress_startup_banner: TriState::True,
            target_machine: TargetMachine::for_platform(platform),
            ..Self::default()
        };
        if debug {
            tool.generate_debug_information = LinkerDebug::Yes;
            tool.link_incremental = LinkIncremental::Yes;
        } else {
            tool.optimize_references = Toggle::On;
            tool.enable_comdat_folding = Toggle::On;
            tool.link_incremental = LinkIncremental::No;
        }
        tool
    }

    pub fn write_settings(&self, s: &mut Settings) {
        let mut options = self.additional_options.clone();
        if s.dialect() == Dialect::Vcproj && !self.minimum_required_version.is_empty() {
            // `.vcproj` has no attribute for the subsystem version suffix.
            if let Some(token) = self.sub_system.token(Dialect::Vcxproj) {
                options.push(format!(
                    "/SUBSYSTEM:{},{}",
                    token.to_ascii_uppercase(),
                    self.minimum_required_version
                ));
            }
        }

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
        s.list(
            "AdditionalManifestDependencies",
            "AdditionalManifestDependencies",
            &self.additional_manifest_dependencies,
        );
        s.options("AdditionalOptions", "AdditionalOptions", &options);
        s.text("BaseAddress", "BaseAddress", &self.base_address);
        s.choice(
            "DataExecutionPrevention",
            "DataExecutionPrevention",
            self.data_execution_prevention,
        );
        s.list("DelayLoadDLLs", "DelayLoadDLLs", &self.delay_load_dlls);
        s.choice("EnableCOMDATFolding", "EnableCOMDATFolding", self.enable_comdat_folding);
        s.flag("EnableUAC", "EnableUAC", self.enable_uac);
        s.text("EntryPointSymbol", "EntryPointSymbol", &self.entry_point_symbol);
        s.choice("ErrorReporting", "LinkErrorReporting", self.error_reporting);
        s.choice("FixedBaseAddress", "FixedBaseAddress", self.fixed_base_address);
        s.list(
            "ForceSymbolReferences",
            "ForceSymbolReferences",
            &self.force_symbol_references,
        );
        s.choice(
            "GenerateDebugInformation",
            "GenerateDebugInformation",
            self.generate_debug_information,
        );
        s.flag("GenerateManifest", "GenerateManifest", self.generate_manifest);
        s.flag("GenerateMapFile", "GenerateMapFile", self.generate_map_file);
        s.number("HeapCommitSize", "HeapCommitSize", self.heap_commit_size);
        s.number("HeapReserveSize", "HeapReserveSize", self.heap_reserve_size);
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
        s.text("ImportLibrary", "ImportLibrary", &self.import_library);
        s.choice("LargeAddressAware", "LargeAddressAware", self.large_address_aware);
        s.flag("", "LinkDLL", self.link_dll);
        // MSBuild carries LinkIncremental in the configuration property group.
        s.choice("LinkIncremental", "", self.link_incremental);
        s.choice(
            "LinkTimeCodeGeneration",
            "LinkTimeCodeGeneration",
            self.link_time_code_generation,
        );
        s.text("ManifestFile", "ManifestFile", &self.manifest_file);
        s.flag("MapExports", "MapExports", self.map_exports);
        s.text("MapFileName", "MapFileName", &self.map_file_name);
        s.text("", "MinimumRequiredVersion", &self.minimum_required_version);
        s.text(
            "ModuleDefinitionFile",
            "ModuleDefinitionFile",
            &self.module_definition_file,
        );
        s.flag("ResourceOnlyDLL", "NoEntryPoint", self.no_entry_point);
        s.choice("OptimizeReferences", "OptimizeReferences", self.optimize_references);
        s.text("OutputFile", "OutputFile", &self.output_file);
        s.flag("Profile", "Profile", self.profile);
        s.text("ProgramDatabaseFile", "ProgramDatabaseFile", &self.program_database_file);
        s.choice(
            "RandomizedBaseAddress",
            "RandomizedBaseAddress",
            self.randomized_base_address,
        );
        s.flag("SetChecksum", "SetChecksum", self.set_checksum);
        s.number("StackCommitSize", "StackCommitSize", self.stack_commit_size);
        s.number("StackReserveSize", "StackReserveSize", self.stack_reserve_size);
        s.choice("SubSystem", "SubSystem", self.sub_system);
        s.flag(
            "SuppressStartupBanner",
            "SuppressStartupBanner",
            self.suppress_startup_banner,
        );
        s.choice("TargetMachine", "TargetMachine", self.target_machine);
        s.flag(
            "TreatLinkerWarningAsErrors",
            "TreatLinkerWarningAsErrors",
            self.treat_warnings_as_errors,
        );
        s.choice("UACExecutionLevel", "UACExecutionLevel", self.uac_execution_level);
        s.text("Version", "Version", &self.version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_tokens() {
        let tool = LinkerTool {
            optimize_references: Toggle::On,
            large_address_aware: Toggle::Off,
            ..LinkerTool::default()
        };
        let mut legacy = Settings::new(Dialect::Vcproj);
        tool.write_settings(&mut legacy);
        assert_eq!(legacy.get("OptimizeReferences"), Some("2"));
        assert_eq!(legacy.get("LargeAddressAware"), Some("1"));

        let mut msbuild = Settings::new(Dialect::Vcxproj);
        tool.write_settings(&mut msbuild);
        assert_eq!(msbuild.get("OptimizeReferences"), Some("true"));
        assert_eq!(msbuild.get("LargeAddressAware"), Some("false"));
    }

    #[test]
    fn test_link_incremental_only_inline_in_vcproj() {
        let tool = LinkerTool::for_build(true, "x64");
        let mut legacy = Settings::new(Dialect::Vcproj);
        tool.write_settings(&mut legacy);
        assert_eq!(legacy.get("LinkIncremental"), Some("2"));
        assert_eq!(legacy.get("TargetMachine"), Some("17"));

        let mut msbuild = Settings::new(Dialect::Vcxproj);
        tool.write_settings(&mut msbuild);
        assert_eq!(msbuild.get("LinkIncremental"), None);
        assert_eq!(msbuild.get("GenerateDebugInformation"), Some("true"));
    }

    #[test]
    fn test_subsystem_version_in_vcproj_options() {
        let tool = LinkerTool {
            sub_system: SubSystem::Console,
            minimum_required_version: "5.01".into(),
            ..LinkerTool::default()
        };
        let mut legacy = Settings::new(Dialect::Vcproj);
        tool.write_settings(&mut legacy);
        assert_eq!(legacy.get("AdditionalOptions"), Some("/SUBSYSTEM:CONSOLE,5.01"));
        assert_eq!(legacy.get("SubSystem"), Some("1"));

        let mut msbuild = Settings::new(Dialect::Vcxproj);
        tool.write_settings(&mut msbuild);
        assert_eq!(msbuild.get("MinimumRequiredVersion"), Some("5.01"));
    }

    #[test]
    fn test_target_machine_for_platform() {
        assert_eq!(TargetMachine::for_platform("Win32"), TargetMachine::X86);
        assert_eq!(TargetMachine::for_platform("x64"), TargetMachine::X64);
        assert_eq!(TargetMachine::for_platform("ARM64"), TargetMachine::Arm64);
        assert_eq!(TargetMachine::for_platform("mips"), TargetMachine::NotSet);
    }
}
