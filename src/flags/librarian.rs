//! `lib.exe` option parsing. Shares switch syntax with the linker.

use super::linker::{parse_machine, parse_unix_or_bare, split_switch, yes_no};
use super::{FlagOutcome, FlagTarget, push_each, push_unique, strip_switch};
use crate::model::{LibrarianTool, TriState};
use crate::toolset::ToolsetVersion;

use FlagOutcome::{Applied, Unknown, Verbatim};

impl FlagTarget for LibrarianTool {
    const TOOL: &'static str = "librarian";

    fn additional_options(&mut self) -> &mut Vec<String> {
        &mut self.additional_options
    }

    fn parse_flag(&mut self, flag: &str, toolset: ToolsetVersion) -> FlagOutcome {
        if let Some(outcome) = parse_unix_or_bare(
            flag,
            &mut self.additional_dependencies,
            &mut self.additional_library_directories,
        ) {
            return outcome;
        }
        let Some(body) = strip_switch(flag) else {
            return Unknown;
        };

        match split_switch(body) {
            (name, None) if name == "NOLOGO" => self.suppress_startup_banner = TriState::True,
            (name, None) if name == "LTCG" => self.link_time_code_generation = TriState::True,
            (name, None) if name == "NODEFAULTLIB" => {
                self.ignore_all_default_libraries = TriState::True
            }
            (name, Some(lib)) if name == "NODEFAULTLIB" => {
                push_each(&mut self.ignore_default_library_names, lib)
            }
            (name, Some(v)) if name == "OUT" => self.output_file = v.to_string(),
            (name, Some(v)) if name == "DEF" => self.module_definition_file = v.to_string(),
            (name, Some(v)) if name == "LIBPATH" => {
                push_unique(&mut self.additional_library_directories, v)
            }
            (name, Some(v)) if name == "EXPORT" => push_unique(&mut self.export_named_functions, v),
            (name, Some(v)) if name == "INCLUDE" => {
                push_unique(&mut self.force_symbol_references, v)
            }
            (name, Some(v)) if name == "MACHINE" => match parse_machine(v, toolset) {
                Ok(machine) => self.target_machine = machine,
                Err(outcome) => return outcome,
            },
            (name, v) if name == "WX" => match yes_no(v) {
                Some(on) => self.treat_warnings_as_errors = on.into(),
                None => return Unknown,
            },
            (name, _)
                if matches!(
                    name.as_str(),
                    "SUBSYSTEM" | "VERBOSE" | "IGNORE" | "NAME" | "REMOVE" | "EXTRACT" | "LIST"
                ) =>
            {
                return Verbatim;
            }
            _ => return Unknown,
        }
        Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::linker::TargetMachine;

    #[test]
    fn test_archiver_flags() {
        let mut tool = LibrarianTool::default();
        for flag in ["/NOLOGO", "/MACHINE:X64", "/OUT:core.lib", "zlib.lib", "/LTCG"] {
            assert_eq!(tool.parse_flag(flag, ToolsetVersion::Vs2022), Applied, "{}", flag);
        }
        assert_eq!(tool.target_machine, TargetMachine::X64);
        assert_eq!(tool.output_file, "core.lib");
        assert_eq!(tool.additional_dependencies, vec!["zlib.lib"]);
        assert_eq!(tool.parse_flag("/VERBOSE", ToolsetVersion::Vs2022), Verbatim);
        assert_eq!(tool.parse_flag("/FROB", ToolsetVersion::Vs2022), Unknown);
    }
}
