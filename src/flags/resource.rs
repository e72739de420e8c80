//! `rc.exe` option parsing. Resource compiler switches are case-insensitive.

use super::{FlagOutcome, FlagTarget, option_value, push_unique, strip_switch};
use crate::model::{ResourceTool, TriState};
use crate::toolset::ToolsetVersion;

use FlagOutcome::{Applied, Unknown, Unsupported, Verbatim};

impl FlagTarget for ResourceTool {
    const TOOL: &'static str = "resource compiler";

    fn additional_options(&mut self) -> &mut Vec<String> {
        &mut self.additional_options
    }

    fn takes_separate_value(&self, flag: &str) -> bool {
        strip_switch(flag).is_some_and(|body| {
            matches!(body.to_ascii_lowercase().as_str(), "d" | "u" | "i" | "l" | "fo" | "c")
        })
    }

    fn parse_flag(&mut self, flag: &str, toolset: ToolsetVersion) -> FlagOutcome {
        let Some(body) = strip_switch(flag) else {
            return Unknown;
        };
        let lower = body.to_ascii_lowercase();

        match lower.as_str() {
            "nologo" if toolset < ToolsetVersion::Vs2010 => return Unsupported,
            "nologo" => self.suppress_startup_banner = TriState::True,
            "v" => self.show_progress = TriState::True,
            "x" => self.ignore_standard_include_path = TriState::True,
            "n" => self.null_terminate_strings = TriState::True,
            "r" | "y" | "w" => return Verbatim,
            _ if lower.starts_with("fo") => match option_value(&body[2..]) {
                "" => return Unknown,
                file => self.resource_output_file_name = file.to_string(),
            },
            _ => {
                let mut chars = body.chars();
                let first = chars.next().map(|c| c.to_ascii_lowercase());
                let value = option_value(chars.as_str());
                if value.is_empty() {
                    return Unknown;
                }
                match first {
                    Some('d') => push_unique(&mut self.preprocessor_definitions, value),
                    Some('u') => push_unique(&mut self.undefine_preprocessor_definitions, value),
                    Some('i') => push_unique(&mut self.additional_include_directories, value),
                    Some('l') => match parse_language(value) {
                        Some(culture) => self.culture = Some(culture),
                        None => return Unknown,
                    },
                    Some('c') => return Verbatim,
                    _ => return Unknown,
                }
            }
        }
        Applied
    }
}

/// Language ids are hexadecimal with or without the `0x` prefix.
fn parse_language(value: &str) -> Option<u32> {
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::flags::{apply_flags, tokenize};

    #[test]
    fn test_case_insensitive_switches() {
        let mut tool = ResourceTool::default();
        let mut diag = Diagnostics::silent();
        let tokens = tokenize("/NOLOGO /l 0x409 /dVERSION=2 /I res /Fo out.res /n");
        let unmapped = apply_flags(&mut tool, &tokens, ToolsetVersion::Vs2019, &mut diag);
        assert_eq!(unmapped, 0);
        assert_eq!(tool.suppress_startup_banner, TriState::True);
        assert_eq!(tool.culture, Some(0x409));
        assert_eq!(tool.preprocessor_definitions, vec!["VERSION=2"]);
        assert_eq!(tool.additional_include_directories, vec!["res"]);
        assert_eq!(tool.resource_output_file_name, "out.res");
        assert_eq!(tool.null_terminate_strings, TriState::True);
    }

    #[test]
    fn test_language_without_prefix() {
        assert_eq!(parse_language("409"), Some(0x409));
        assert_eq!(parse_language("zz"), None);
    }
}
