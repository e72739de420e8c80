//! `link.exe` option parsing.
//!
//! Linker switches are case-insensitive and take their value after `:`.
//! Bare library names and the Unix `-lfoo` / `-Ldir` spellings are accepted.

use super::{FlagOutcome, FlagTarget, parse_size_pair, push_each, push_unique, strip_switch};
use crate::model::TriState;
use crate::model::linker::*;
use crate::toolset::ToolsetVersion;

use FlagOutcome::{Applied, Unknown, Unsupported, Verbatim};
use ToolsetVersion as Vs;

/// Switches understood by `link.exe` that have no typed field.
const PASSTHROUGH: &[&str] = &[
    "ALIGN", "ALLOWBIND", "ALLOWISOLATION", "APPCONTAINER", "ASSEMBLYDEBUG", "CETCOMPAT",
    "CLRTHREADATTRIBUTE", "DEFAULTLIB", "DRIVER", "FILEALIGN", "FORCE", "FUNCTIONPADMIN",
    "GUARD", "HIGHENTROPYVA", "IGNORE", "IGNOREIDL", "MERGE", "MIDL", "NATVIS", "NOASSEMBLY",
    "ORDER", "PDBALTPATH", "SAFESEH", "SECTION", "SWAPRUN", "TLBID", "TLBOUT", "TSAWARE",
    "VERBOSE",
];

/// Splits a linker switch body into its upper-cased name and raw value.
pub(crate) fn split_switch(body: &str) -> (String, Option<&str>) {
    match body.split_once(':') {
        Some((name, value)) => (name.to_ascii_uppercase(), Some(value.trim_matches('"'))),
        None => (body.to_ascii_uppercase(), None),
    }
}

/// `None` (bare switch) enables, `:NO` disables.
pub(crate) fn yes_no(value: Option<&str>) -> Option<bool> {
    match value {
        None => Some(true),
        Some(v) if v.eq_ignore_ascii_case("NO") => Some(false),
        Some(_) => None,
    }
}

fn toggle_of(on: bool) -> Toggle {
    if on { Toggle::On } else { Toggle::Off }
}

pub(crate) fn parse_machine(value: &str, toolset: ToolsetVersion) -> Result<TargetMachine, FlagOutcome> {
    match value.to_ascii_uppercase().as_str() {
        "X86" | "I386" => Ok(TargetMachine::X86),
        "X64" | "AMD64" => Ok(TargetMachine::X64),
        "IA64" => Ok(TargetMachine::Ia64),
        "ARM" if toolset < Vs::Vs2005 => Err(Unsupported),
        "ARM" => Ok(TargetMachine::Arm),
        "ARM64" if toolset < Vs::Vs2017 => Err(Unsupported),
        "ARM64" => Ok(TargetMachine::Arm64),
        _ => Err(Unknown),
    }
}

/// Library name for a bare token or `-lfoo`.
pub(crate) fn library_name(token: &str) -> Option<String> {
    let lower = token.to_ascii_lowercase();
    if lower.ends_with(".lib") || lower.ends_with(".obj") || lower.ends_with(".res") {
        return Some(token.to_string());
    }
    None
}

/// Handles bare libraries and `-l`/`-L`. `None` means the token is a
/// regular switch.
pub(crate) fn parse_unix_or_bare(
    flag: &str,
    dependencies: &mut Vec<String>,
    directories: &mut Vec<String>,
) -> Option<FlagOutcome> {
    let Some(body) = strip_switch(flag) else {
        return Some(match library_name(flag) {
            Some(lib) => {
                push_unique(dependencies, &lib);
                Applied
            }
            None => Unknown,
        });
    };
    if !flag.starts_with('-') {
        return None;
    }
    if let Some(name) = body.strip_prefix('l') {
        if name.is_empty() {
            return Some(Unknown);
        }
        let lib = library_name(name).unwrap_or_else(|| format!("{}.lib", name));
        push_unique(dependencies, &lib);
        return Some(Applied);
    }
    if let Some(dir) = body.strip_prefix('L')
        && !dir.is_empty()
        && !body.contains(':')
        && !PASSTHROUGH.contains(&body.to_ascii_uppercase().as_str())
    {
        let upper = body.to_ascii_uppercase();
        if !(upper.starts_with("LTCG") || upper.starts_with("LARGEADDRESSAWARE")) {
            push_unique(directories, dir);
            return Some(Applied);
        }
    }
    None
}

impl FlagTarget for LinkerTool {
    const TOOL: &'static str = "linker";

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
        let (name, value) = split_switch(body);

        match (name.as_str(), value) {
            ("NOLOGO", None) => self.suppress_startup_banner = TriState::True,
            ("DLL", None) => self.link_dll = TriState::True,
            ("DEBUG", None) => self.generate_debug_information = LinkerDebug::Yes,
            ("DEBUG", Some(v)) => {
                self.generate_debug_information = match v.to_ascii_uppercase().as_str() {
                    "NONE" => LinkerDebug::No,
                    "FASTLINK" if toolset < Vs::Vs2015 => return Unsupported,
                    "FASTLINK" => LinkerDebug::FastLink,
                    "FULL" if toolset < Vs::Vs2017 => return Unsupported,
                    "FULL" => LinkerDebug::Full,
                    _ => return Unknown,
                }
            }
            ("INCREMENTAL", v) => match yes_no(v) {
                Some(true) => self.link_incremental = LinkIncremental::Yes,
                Some(false) => self.link_incremental = LinkIncremental::No,
                None => return Unknown,
            },
            ("OPT", Some(v)) => return self.parse_opt(v),
            ("SUBSYSTEM", Some(v)) => return self.parse_subsystem(v),
            ("MACHINE", Some(v)) => match parse_machine(v, toolset) {
                Ok(machine) => self.target_machine = machine,
                Err(outcome) => return outcome,
            },
            ("LTCG", v) => {
                self.link_time_code_generation = match v.map(|v| v.to_ascii_uppercase()).as_deref() {
                    None => LinkTimeCodeGeneration::UseLtcg,
                    Some("OFF") => LinkTimeCodeGeneration::Default,
                    Some("INCREMENTAL") if toolset < Vs::Vs2015 => return Unsupported,
                    Some("INCREMENTAL") => LinkTimeCodeGeneration::Incremental,
                    Some("PGINSTRUMENT") => LinkTimeCodeGeneration::PgInstrument,
                    Some("PGOPTIMIZE") => LinkTimeCodeGeneration::PgOptimize,
                    Some("PGUPDATE") => LinkTimeCodeGeneration::PgUpdate,
                    Some("STATUS") | Some("NOSTATUS") => return Verbatim,
                    Some(_) => return Unknown,
                }
            }
            ("LIBPATH", Some(dir)) if !dir.is_empty() => {
                push_unique(&mut self.additional_library_directories, dir)
            }
            ("DEF", Some(v)) => self.module_definition_file = v.to_string(),
            ("OUT", Some(v)) => self.output_file = v.to_string(),
            ("IMPLIB", Some(v)) => self.import_library = v.to_string(),
            ("PDB", Some(v)) => self.program_database_file = v.to_string(),
            ("MAP", v) => {
                self.generate_map_file = TriState::True;
                self.map_file_name = v.unwrap_or_default().to_string();
            }
            ("MAPINFO", Some(v)) if v.eq_ignore_ascii_case("EXPORTS") => {
                self.map_exports = TriState::True
            }
            ("ENTRY", Some(v)) => self.entry_point_symbol = v.to_string(),
            ("NOENTRY", None) => self.no_entry_point = TriState::True,
            ("BASE", Some(v)) => self.base_address = v.to_string(),
            ("FIXED", v) => match yes_no(v) {
                Some(on) => self.fixed_base_address = toggle_of(on),
                None => return Unknown,
            },
            ("DYNAMICBASE", v) if toolset < Vs::Vs2008 && v.is_none() => return Unsupported,
            ("DYNAMICBASE", v) => match yes_no(v) {
                Some(on) => self.randomized_base_address = toggle_of(on),
                None => return Unknown,
            },
            ("NXCOMPAT", v) => match yes_no(v) {
                Some(on) => self.data_execution_prevention = toggle_of(on),
                None => return Unknown,
            },
            ("LARGEADDRESSAWARE", v) => match yes_no(v) {
                Some(on) => self.large_address_aware = toggle_of(on),
                None => return Unknown,
            },
            ("HEAP", Some(v)) => match parse_size_pair(v) {
                Some((reserve, commit)) => {
                    self.heap_reserve_size = Some(reserve);
                    self.heap_commit_size = commit;
                }
                None => return Unknown,
            },
            ("STACK", Some(v)) => match parse_size_pair(v) {
                Some((reserve, commit)) => {
                    self.stack_reserve_size = Some(reserve);
                    self.stack_commit_size = commit;
                }
                None => return Unknown,
            },
            ("NODEFAULTLIB", None) => self.ignore_all_default_libraries = TriState::True,
            ("NODEFAULTLIB", Some(lib)) => push_each(&mut self.ignore_default_library_names, lib),
            ("DELAYLOAD", Some(dll)) => push_unique(&mut self.delay_load_dlls, dll),
            ("INCLUDE", Some(symbol)) => push_unique(&mut self.force_symbol_references, symbol),
            ("MANIFEST", _) if toolset < Vs::Vs2005 => return Unsupported,
            ("MANIFEST", None) => self.generate_manifest = TriState::True,
            ("MANIFEST", Some(v)) => match v.to_ascii_uppercase().as_str() {
                "NO" => self.generate_manifest = TriState::False,
                "EMBED" => {
                    self.generate_manifest = TriState::True;
                    return Verbatim;
                }
                _ => return Unknown,
            },
            ("MANIFESTFILE", Some(v)) => self.manifest_file = v.to_string(),
            ("MANIFESTDEPENDENCY", Some(v)) => {
                push_unique(&mut self.additional_manifest_dependencies, v)
            }
            ("MANIFESTUAC", _) if toolset < Vs::Vs2008 => return Unsupported,
            ("MANIFESTUAC", v) => return self.parse_uac(v),
            ("VERSION", Some(v)) => self.version = v.to_string(),
            ("ERRORREPORT", Some(v)) => {
                self.error_reporting = match v.to_ascii_uppercase().as_str() {
                    "NONE" => LinkerErrorReporting::None,
                    "PROMPT" => LinkerErrorReporting::Prompt,
                    "QUEUE" => LinkerErrorReporting::Queue,
                    "SEND" if toolset < Vs::Vs2010 => return Unsupported,
                    "SEND" => LinkerErrorReporting::Send,
                    _ => return Unknown,
                }
            }
            ("PROFILE", None) => self.profile = TriState::True,
            ("RELEASE", None) => self.set_checksum = TriState::True,
            ("WX", v) => match yes_no(v) {
                Some(on) => self.treat_warnings_as_errors = on.into(),
                None => return Unknown,
            },
            (name, _) if PASSTHROUGH.contains(&name) => return Verbatim,
            _ => return Unknown,
        }
        Applied
    }
}

impl LinkerTool {
    /// `/OPT:REF,ICF` style comma lists.
    fn parse_opt(&mut self, value: &str) -> FlagOutcome {
        let mut outcome = Applied;
        for part in value.split(',') {
            let part = part.trim().to_ascii_uppercase();
            match part.as_str() {
                "REF" => self.optimize_references = Toggle::On,
                "NOREF" => self.optimize_references = Toggle::Off,
                "ICF" => self.enable_comdat_folding = Toggle::On,
                "NOICF" => self.enable_comdat_folding = Toggle::Off,
                "LBR" | "NOLBR" | "WIN98" | "NOWIN98" => outcome = Verbatim,
                p if p.starts_with("ICF=") => {
                    self.enable_comdat_folding = Toggle::On;
                    outcome = Verbatim;
                }
                _ => return Unknown,
            }
        }
        outcome
    }

    /// `/SUBSYSTEM:CONSOLE,5.01`
    fn parse_subsystem(&mut self, value: &str) -> FlagOutcome {
        let (name, version) = match value.split_once(',') {
            Some((name, version)) => (name, Some(version.trim())),
            None => (value, None),
        };
        self.sub_system = match name.to_ascii_uppercase().as_str() {
            "CONSOLE" => SubSystem::Console,
            "WINDOWS" => SubSystem::Windows,
            "NATIVE" => SubSystem::Native,
            "EFI_APPLICATION" => SubSystem::EfiApplication,
            "EFI_BOOT_SERVICE_DRIVER" => SubSystem::EfiBootService,
            "EFI_ROM" => SubSystem::EfiRom,
            "EFI_RUNTIME_DRIVER" => SubSystem::EfiRuntime,
            "POSIX" => SubSystem::Posix,
            _ => return Unknown,
        };
        if let Some(version) = version {
            self.minimum_required_version = version.to_string();
        }
        Applied
    }

    /// `/MANIFESTUAC`, `/MANIFESTUAC:NO`, `/MANIFESTUAC:"level='asInvoker' uiAccess='false'"`
    fn parse_uac(&mut self, value: Option<&str>) -> FlagOutcome {
        let Some(value) = value else {
            self.enable_uac = TriState::True;
            return Applied;
        };
        if value.eq_ignore_ascii_case("NO") {
            self.enable_uac = TriState::False;
            return Applied;
        }
        let mut outcome = Unknown;
        for part in value.split_whitespace() {
            let Some((key, level)) = part.split_once('=') else {
                continue;
            };
            let level = level.trim_matches('\'');
            match key {
                "level" => {
                    self.enable_uac = TriState::True;
                    self.uac_execution_level = match level {
                        "asInvoker" => UacExecutionLevel::AsInvoker,
                        "highestAvailable" => UacExecutionLevel::HighestAvailable,
                        "requireAdministrator" => UacExecutionLevel::RequireAdministrator,
                        _ => return Unknown,
                    };
                    outcome = Applied;
                }
                "uiAccess" => {
                    if outcome == Unknown {
                        outcome = Verbatim;
                    }
                }
                _ => return Unknown,
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::flags::{apply_flags, tokenize};

    fn parse(flags: &str, toolset: ToolsetVersion) -> (LinkerTool, Diagnostics) {
        let mut tool = LinkerTool::default();
        let mut diag = Diagnostics::silent();
        apply_flags(&mut tool, &tokenize(flags), toolset, &mut diag);
        (tool, diag)
    }

    #[test]
    fn test_every_known_spelling_is_recognized_on_latest() {
        let corpus = [
            "/NOLOGO", "/nologo", "/DLL", "/DEBUG", "/DEBUG:FASTLINK", "/DEBUG:FULL",
            "/DEBUG:NONE", "/INCREMENTAL", "/INCREMENTAL:NO", "/OPT:REF", "/OPT:NOREF",
            "/OPT:ICF", "/OPT:NOICF", "/OPT:REF,ICF", "/SUBSYSTEM:CONSOLE",
            "/SUBSYSTEM:WINDOWS,6.01", "/MACHINE:X86", "/MACHINE:X64", "/MACHINE:ARM64",
            "/LTCG", "/LTCG:INCREMENTAL", "/LTCG:PGINSTRUMENT", "/LTCG:PGOPTIMIZE",
            "/LIBPATH:lib", "/DEF:exports.def", "/OUT:app.exe", "/IMPLIB:app.lib",
            "/PDB:app.pdb", "/MAP", "/MAP:app.map", "/MAPINFO:EXPORTS", "/ENTRY:main",
            "/NOENTRY", "/BASE:0x10000000", "/FIXED", "/FIXED:NO", "/DYNAMICBASE",
            "/DYNAMICBASE:NO", "/NXCOMPAT", "/NXCOMPAT:NO", "/LARGEADDRESSAWARE",
            "/LARGEADDRESSAWARE:NO", "/HEAP:0x100000,0x1000", "/STACK:8388608",
            "/NODEFAULTLIB", "/NODEFAULTLIB:libcmt.lib", "/DELAYLOAD:foo.dll",
            "/INCLUDE:_sym", "/MANIFEST", "/MANIFEST:NO", "/MANIFESTFILE:app.manifest",
            "/MANIFESTUAC", "/MANIFESTUAC:NO", "/VERSION:1.2", "/ERRORREPORT:PROMPT",
            "/ERRORREPORT:SEND", "/PROFILE", "/RELEASE", "/WX", "/WX:NO", "kernel32.lib",
            "-lfoo", "-Lthird_party/lib",
        ];
        for flag in corpus {
            let mut tool = LinkerTool::default();
            assert_eq!(tool.parse_flag(flag, Vs::Vs2022), Applied, "{}", flag);
            assert!(tool.additional_options.is_empty(), "{}", flag);
        }
    }

    #[test]
    fn test_version_gated_spellings_on_old_toolsets() {
        for (flag, toolset) in [
            ("/DEBUG:FASTLINK", Vs::Vs2013),
            ("/DEBUG:FULL", Vs::Vs2015),
            ("/LTCG:INCREMENTAL", Vs::Vs2013),
            ("/MANIFESTUAC", Vs::Vs2005),
            ("/MACHINE:ARM64", Vs::Vs2015),
            ("/MANIFEST", Vs::Vs2003),
        ] {
            let (tool, diag) = parse(flag, toolset);
            assert_eq!(tool.additional_options, vec![flag], "{} on {}", flag, toolset);
            assert!(diag.mentions(flag));
        }
    }

    #[test]
    fn test_subsystem_and_sizes() {
        let (tool, diag) = parse(
            "/SUBSYSTEM:CONSOLE,5.01 /STACK:0x200000,4096 /OPT:REF,ICF",
            Vs::Vs2019,
        );
        assert_eq!(tool.sub_system, SubSystem::Console);
        assert_eq!(tool.minimum_required_version, "5.01");
        assert_eq!(tool.stack_reserve_size, Some(0x200000));
        assert_eq!(tool.stack_commit_size, Some(4096));
        assert_eq!(tool.optimize_references, Toggle::On);
        assert_eq!(tool.enable_comdat_folding, Toggle::On);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_libraries_in_every_spelling() {
        let (tool, _) = parse("user32.lib -lpng -lz.lib -L../libs /LIBPATH:C:\\sdk", Vs::Vs2022);
        assert_eq!(tool.additional_dependencies, vec!["user32.lib", "png.lib", "z.lib"]);
        assert_eq!(tool.additional_library_directories, vec!["../libs", "C:\\sdk"]);
    }

    #[test]
    fn test_uac_level() {
        let mut tool = LinkerTool::default();
        let outcome = tool.parse_flag(
            "/MANIFESTUAC:level='requireAdministrator' uiAccess='false'",
            Vs::Vs2022,
        );
        assert_eq!(outcome, Applied);
        assert_eq!(tool.uac_execution_level, UacExecutionLevel::RequireAdministrator);
        assert_eq!(tool.enable_uac, TriState::True);
    }

    #[test]
    fn test_unknown_is_preserved() {
        let (tool, diag) = parse("/FROBNICATE /CETCOMPAT", Vs::Vs2022);
        assert_eq!(tool.additional_options, vec!["/FROBNICATE", "/CETCOMPAT"]);
        assert_eq!(diag.warnings().count(), 1);
    }
}
