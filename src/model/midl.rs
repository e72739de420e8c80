//! Interface definition compiler settings (`VCMIDLTool` / `Midl`).

use super::{Settings, TriState};

choice_enum! {
    pub enum MidlTarget {
        Win32 => ("1", "Win32"),
        Itanium => ("2", "Itanium"),
        X64 => ("3", "X64"),
        Arm64 => ("", "ARM64"),
    }
}

choice_enum! {
    pub enum MidlWarningLevel {
        Level0 => ("0", "0"),
        Level1 => ("1", "1"),
        Level2 => ("2", "2"),
        Level3 => ("3", "3"),
        Level4 => ("4", "4"),
    }
}

choice_enum! {
    pub enum MidlCharType {
        Unsigned => ("0", "Unsigned"),
        Signed => ("1", "Signed"),
        Ascii => ("2", "Ascii"),
    }
}

choice_enum! {
    pub enum MidlErrorChecks {
        Custom => ("0", "EnableCustom"),
        None => ("1", "None"),
        All => ("2", "All"),
    }
}

choice_enum! {
    pub enum MidlAlignment {
        Byte1 => ("1", "1"),
        Byte2 => ("2", "2"),
        Byte4 => ("3", "4"),
        Byte8 => ("4", "8"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidlTool {
    pub additional_include_directories: Vec<String>,
    pub additional_options: Vec<String>,
    pub client_stub_file: String,
    pub default_char_type: MidlCharType,
    pub dll_data_file_name: String,
    pub enable_error_checks: MidlErrorChecks,
    pub generate_stubless_proxies: TriState,
    pub header_file_name: String,
    pub ignore_standard_include_path: TriState,
    pub interface_identifier_file_name: String,
    pub mktyplib_compatible: TriState,
    pub output_directory: String,
    pub preprocessor_definitions: Vec<String>,
    pub proxy_file_name: String,
    pub server_stub_file: String,
    pub struct_member_alignment: MidlAlignment,
    pub suppress_startup_banner: TriState,
    pub target_environment: MidlTarget,
    pub type_library_name: String,
    pub undefine_preprocessor_definitions: Vec<String>,
    pub validate_all_parameters: TriState,
    pub warn_as_error: TriState,
    pub warning_level: MidlWarningLevel,
}

impl MidlTool {
    pub fn write_settings(&self, s: &mut Settings) {
        s.list(
            "AdditionalIncludeDirectories",
            "AdditionalIncludeDirectories",
            &self.additional_include_directories,
        );
        s.options("AdditionalOptions", "AdditionalOptions", &self.additional_options);
        s.text("", "ClientStubFile", &self.client_stub_file);
        s.choice("DefaultCharType", "DefaultCharType", self.default_char_type);
        s.text("DLLDataFileName", "DllDataFileName", &self.dll_data_file_name);
        s.choice("EnableErrorChecks", "EnableErrorChecks", self.enable_error_checks);
        s.flag(
            "GenerateStublessProxies",
            "GenerateStublessProxies",
            self.generate_stubless_proxies,
        );
        s.text("HeaderFileName", "HeaderFileName", &self.header_file_name);
        s.flag(
            "IgnoreStandardIncludePath",
            "IgnoreStandardIncludePath",
            self.ignore_standard_include_path,
        );
        s.text(
            "InterfaceIdentifierFileName",
            "InterfaceIdentifierFileName",
            &self.interface_identifier_file_name,
        );
        s.flag("MkTypLibCompatible", "MkTypLibCompatible", self.mktyplib_compatible);
        s.text("OutputDirectory", "OutputDirectory", &self.output_directory);
        s.list(
            "PreprocessorDefinitions",
            "PreprocessorDefinitions",
            &self.preprocessor_definitions,
        );
        s.text("ProxyFileName", "ProxyFileName", &self.proxy_file_name);
        s.text("", "ServerStubFile", &self.server_stub_file);
        s.choice(
            "StructMemberAlignment",
            "StructMemberAlignment",
            self.struct_member_alignment,
        );
        s.flag(
            "SuppressStartupBanner",
            "SuppressStartupBanner",
            self.suppress_startup_banner,
        );
        s.choice("TargetEnvironment", "TargetEnvironment", self.target_environment);
        s.text("TypeLibraryName", "TypeLibraryName", &self.type_library_name);
        s.list(
            "UndefinePreprocessorDefinitions",
            "UndefinePreprocessorDefinitions",
            &self.undefine_preprocessor_definitions,
        );
        s.flag(
            "ValidateParameters",
            "ValidateAllParameters",
            self.validate_all_parameters,
        );
        s.flag("WarnAsError", "WarnAsError", self.warn_as_error);
        s.choice("WarningLevel", "WarningLevel", self.warning_level);
    }
}
