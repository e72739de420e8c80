//! `midl.exe` option parsing. Most MIDL switches take their value as the
//! next command-line token.

use super::{FlagOutcome, FlagTarget, option_value, push_unique, strip_switch};
use crate::model::TriState;
use crate::model::midl::*;
use crate::toolset::ToolsetVersion;

use FlagOutcome::{Applied, Unknown, Unsupported, Verbatim};

const SEPARATE_VALUE: &[&str] = &[
    "D", "I", "U", "h", "header", "iid", "proxy", "dlldata", "tlb", "out", "cstub", "sstub",
    "env", "char", "error", "target", "acf", "server", "client", "prefix",
];

impl FlagTarget for MidlTool {
    const TOOL: &'static str = "midl";

    fn additional_options(&mut self) -> &mut Vec<String> {
        &mut self.additional_options
    }

    fn takes_separate_value(&self, flag: &str) -> bool {
        strip_switch(flag).is_some_and(|body| SEPARATE_VALUE.contains(&body))
    }

    fn parse_flag(&mut self, flag: &str, toolset: ToolsetVersion) -> FlagOutcome {
        let Some(body) = strip_switch(flag) else {
            return Unknown;
        };
        let (name, value) = match body.split_once(char::is_whitespace) {
            Some((name, value)) => (name, option_value(value)),
            None => (body, ""),
        };

        match (name, value) {
            ("nologo", "") => self.suppress_startup_banner = TriState::True,
            ("h" | "header", file) if !file.is_empty() => self.header_file_name = file.to_string(),
            ("iid", file) if !file.is_empty() => {
                self.interface_identifier_file_name = file.to_string()
            }
            ("proxy", file) if !file.is_empty() => self.proxy_file_name = file.to_string(),
            ("dlldata", file) if !file.is_empty() => self.dll_data_file_name = file.to_string(),
            ("tlb", file) if !file.is_empty() => self.type_library_name = file.to_string(),
            ("out", dir) if !dir.is_empty() => self.output_directory = dir.to_string(),
            ("cstub", file) if !file.is_empty() => self.client_stub_file = file.to_string(),
            ("sstub", file) if !file.is_empty() => self.server_stub_file = file.to_string(),
            ("env", env) => return self.set_environment(env, toolset),
            ("win32" | "win64" | "x64" | "ia64" | "arm64", "") => {
                return self.set_environment(name, toolset);
            }
            ("char", kind) => {
                self.default_char_type = match kind {
                    "unsigned" => MidlCharType::Unsigned,
                    "signed" => MidlCharType::Signed,
                    "ascii7" => MidlCharType::Ascii,
                    _ => return Unknown,
                }
            }
            ("error", kind) => {
                self.enable_error_checks = match kind {
                    "none" => MidlErrorChecks::None,
                    "all" => MidlErrorChecks::All,
                    "allocation" | "bounds_check" | "enum" | "ref" | "stub_data" => {
                        MidlErrorChecks::Custom
                    }
                    _ => return Unknown,
                }
            }
            ("W0", "") => self.warning_level = MidlWarningLevel::Level0,
            ("W1", "") => self.warning_level = MidlWarningLevel::Level1,
            ("W2", "") => self.warning_level = MidlWarningLevel::Level2,
            ("W3", "") => self.warning_level = MidlWarningLevel::Level3,
            ("W4", "") => self.warning_level = MidlWarningLevel::Level4,
            ("WX", "") => self.warn_as_error = TriState::True,
            ("Oicf" | "Oif", "") => self.generate_stubless_proxies = TriState::True,
            ("Os" | "Oi", "") => return Verbatim,
            ("robust", "") => self.validate_all_parameters = TriState::True,
            ("no_robust", "") => self.validate_all_parameters = TriState::False,
            ("mktyplib203", "") => self.mktyplib_compatible = TriState::True,
            ("no_def_idir", "") => self.ignore_standard_include_path = TriState::True,
            ("Zp1", "") => self.struct_member_alignment = MidlAlignment::Byte1,
            ("Zp2", "") => self.struct_member_alignment = MidlAlignment::Byte2,
            ("Zp4", "") => self.struct_member_alignment = MidlAlignment::Byte4,
            ("Zp8", "") => self.struct_member_alignment = MidlAlignment::Byte8,
            ("target" | "acf" | "server" | "client" | "prefix", v) if !v.is_empty() => {
                return Verbatim;
            }
            ("app_config" | "no_warn" | "notlb" | "newtlb" | "oldtlb", "") => return Verbatim,
            _ => return self.parse_joined(body),
        }
        Applied
    }
}

impl MidlTool {
    fn set_environment(&mut self, env: &str, toolset: ToolsetVersion) -> FlagOutcome {
        self.target_environment = match env {
            "win32" => MidlTarget::Win32,
            "ia64" => MidlTarget::Itanium,
            "win64" | "x64" | "amd64" => MidlTarget::X64,
            "arm64" if toolset < ToolsetVersion::Vs2017 => return Unsupported,
            "arm64" => MidlTarget::Arm64,
            _ => return Unknown,
        };
        Applied
    }

    /// `/DNAME`, `/Idir`, `/UNAME` with the value attached.
    fn parse_joined(&mut self, body: &str) -> FlagOutcome {
        let Some(first) = body.chars().next() else {
            return Unknown;
        };
        let value = option_value(&body[first.len_utf8()..]);
        if value.is_empty() {
            return Unknown;
        }
        let list = match first {
            'D' => &mut self.preprocessor_definitions,
            'I' => &mut self.additional_include_directories,
            'U' => &mut self.undefine_preprocessor_definitions,
            _ => return Unknown,
        };
        push_unique(list, value);
        Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::flags::{apply_flags, tokenize};

    #[test]
    fn test_separate_value_switches() {
        let mut tool = MidlTool::default();
        let mut diag = Diagnostics::silent();
        let tokens = tokenize("/nologo /h app_h.h /iid app_i.c /tlb app.tlb /env x64 /DWIN64 /I idl /W1 /Oicf");
        let unmapped = apply_flags(&mut tool, &tokens, ToolsetVersion::Vs2022, &mut diag);
        assert_eq!(unmapped, 0);
        assert_eq!(tool.header_file_name, "app_h.h");
        assert_eq!(tool.interface_identifier_file_name, "app_i.c");
        assert_eq!(tool.type_library_name, "app.tlb");
        assert_eq!(tool.target_environment, MidlTarget::X64);
        assert_eq!(tool.preprocessor_definitions, vec!["WIN64"]);
        assert_eq!(tool.additional_include_directories, vec!["idl"]);
        assert_eq!(tool.warning_level, MidlWarningLevel::Level1);
        assert_eq!(tool.generate_stubless_proxies, TriState::True);
        assert!(tool.additional_options.is_empty());
    }

    #[test]
    fn test_arm64_is_gated() {
        let mut tool = MidlTool::default();
        assert_eq!(tool.parse_flag("/env arm64", ToolsetVersion::Vs2015), Unsupported);
        assert_eq!(tool.parse_flag("/env arm64", ToolsetVersion::Vs2019), Applied);
    }
}
