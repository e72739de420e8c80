//! `cl.exe` option parsing.

use super::{FlagOutcome, FlagTarget, option_value, push_each, push_unique, strip_switch, toggle};
use crate::model::{Choice, TriState};
use crate::model::compiler::*;
use crate::toolset::ToolsetVersion;

use FlagOutcome::{Applied, Unknown, Unsupported, Verbatim};
use ToolsetVersion as Vs;

impl FlagTarget for CompilerTool {
    const TOOL: &'static str = "compiler";

    fn additional_options(&mut self) -> &mut Vec<String> {
        &mut self.additional_options
    }

    fn takes_separate_value(&self, flag: &str) -> bool {
        matches!(strip_switch(flag), Some("D" | "I" | "U" | "FI" | "FU" | "AI"))
    }

    fn parse_flag(&mut self, flag: &str, toolset: ToolsetVersion) -> FlagOutcome {
        let Some(body) = strip_switch(flag) else {
            return Unknown;
        };
        let Some(first) = body.chars().next() else {
            return Unknown;
        };
        let rest = &body[first.len_utf8()..];

        match first {
            'A' => match rest.strip_prefix('I') {
                Some(dir) if !option_value(dir).is_empty() => {
                    push_unique(&mut self.additional_using_directories, option_value(dir));
                    Applied
                }
                _ => Unknown,
            },
            'a' => match rest.strip_prefix("rch:") {
                Some(arch) => self.parse_arch(arch, toolset),
                None if rest == "nalyze" || rest.starts_with("nalyze:") => Verbatim,
                None => Unknown,
            },
            'b' if rest == "igobj" => Verbatim,
            'C' if rest.is_empty() => {
                self.keep_comments = TriState::True;
                Applied
            }
            'c' => match rest {
                "" => Applied,
                "lr" => {
                    self.compile_as_managed = CompileAsManaged::Assembly;
                    Applied
                }
                _ => match rest.strip_prefix("lr:") {
                    Some(kind) => self.parse_clr(kind, toolset),
                    None => Unknown,
                },
            },
            'D' => match option_value(rest) {
                "" => Unknown,
                def => {
                    push_unique(&mut self.preprocessor_definitions, def);
                    Applied
                }
            },
            'd' => match rest {
                "oc" => {
                    self.generate_xml_documentation = TriState::True;
                    Applied
                }
                _ if rest.starts_with("iagnostics:") => Verbatim,
                _ => Unknown,
            },
            'E' => match rest {
                "" | "P" => Verbatim,
                "Hsc" | "Hcs" => self.set_eh(ExceptionHandling::Sync),
                "Ha" | "Hac" | "Hca" => self.set_eh(ExceptionHandling::Async),
                "Hs" if toolset < Vs::Vs2010 => Unsupported,
                "Hs" => self.set_eh(ExceptionHandling::SyncCThrow),
                "H-" | "Hs-" | "Hs-c-" | "Ha-" => self.set_eh(ExceptionHandling::Disabled),
                "Hc" | "Hc-" | "Hsc-" => Verbatim,
                _ => Unknown,
            },
            'e' => match rest.strip_prefix("rrorReport:") {
                Some(mode) => self.parse_error_report(mode, toolset),
                None if rest.starts_with("xternal:") => Verbatim,
                None => Unknown,
            },
            'F' => self.parse_file_option(rest, toolset),
            'f' => match rest.strip_prefix("p:") {
                Some(model) => self.parse_fp(model),
                None if rest.starts_with("avor:") => Verbatim,
                None => Unknown,
            },
            'G' => self.parse_codegen(rest, toolset),
            'g' if rest.starts_with("uard:") => Verbatim,
            'H' if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) => Verbatim,
            'I' => match option_value(rest) {
                "" => Unknown,
                dir => {
                    push_unique(&mut self.additional_include_directories, dir);
                    Applied
                }
            },
            'J' if rest.is_empty() => {
                self.default_char_is_unsigned = TriState::True;
                Applied
            }
            'L' => match rest {
                "D" | "Dd" | "N" => Verbatim,
                _ => Unknown,
            },
            'M' => self.parse_runtime(rest, toolset),
            'n' if rest == "ologo" => {
                self.suppress_startup_banner = TriState::True;
                Applied
            }
            'O' => self.parse_optimization(rest),
            'o' => match rest {
                "penmp" => {
                    self.open_mp = TriState::True;
                    Applied
                }
                "penmp-" => {
                    self.open_mp = TriState::False;
                    Applied
                }
                _ => Unknown,
            },
            'P' if rest.is_empty() => {
                self.generate_preprocessed_file = PreprocessToFile::WithLineNumbers;
                Applied
            }
            'p' => match rest {
                "ermissive-" | "ermissive" if toolset < Vs::Vs2017 => Unsupported,
                "ermissive-" => {
                    self.conformance_mode = TriState::True;
                    Applied
                }
                "ermissive" => {
                    self.conformance_mode = TriState::False;
                    Applied
                }
                _ => Unknown,
            },
            'Q' => match rest {
                "par" | "spectre" | "fast_transcendentals" | "imprecise_fwaits" => Verbatim,
                _ if rest.starts_with("par-report:") || rest.starts_with("vec-report:") => {
                    Verbatim
                }
                _ => Unknown,
            },
            'R' => match rest {
                "TC1" | "TCsu" | "TCus" => {
                    self.basic_runtime_checks = BasicRuntimeChecks::Both;
                    Applied
                }
                "TCs" => {
                    self.basic_runtime_checks = BasicRuntimeChecks::StackFrame;
                    Applied
                }
                "TCu" => {
                    self.basic_runtime_checks = BasicRuntimeChecks::UninitializedVariables;
                    Applied
                }
                "TCc" => {
                    self.smaller_type_check = TriState::True;
                    Applied
                }
                _ => Unknown,
            },
            's' => match rest {
                "howIncludes" => {
                    self.show_includes = TriState::True;
                    Applied
                }
                "dl" | "dl-" if toolset < Vs::Vs2012 => Unsupported,
                "dl" => {
                    self.sdl_check = TriState::True;
                    Applied
                }
                "dl-" => {
                    self.sdl_check = TriState::False;
                    Applied
                }
                _ => match rest.strip_prefix("td") {
                    Some(std) if std.starts_with(':') || std.starts_with('=') => {
                        self.parse_std(option_value(std), toolset)
                    }
                    _ => Unknown,
                },
            },
            'T' => match rest {
                "C" => {
                    self.compile_as = CompileAs::C;
                    Applied
                }
                "P" => {
                    self.compile_as = CompileAs::Cpp;
                    Applied
                }
                _ if rest.starts_with('c') || rest.starts_with('p') => Verbatim,
                _ => Unknown,
            },
            'U' => match option_value(rest) {
                "" => Unknown,
                def => {
                    push_unique(&mut self.undefine_preprocessor_definitions, def);
                    Applied
                }
            },
            'u' => match rest {
                "" => {
                    self.undefine_all_preprocessor_definitions = TriState::True;
                    Applied
                }
                "tf-8" if toolset < Vs::Vs2015 => Unsupported,
                "tf-8" => Verbatim,
                _ => Unknown,
            },
            'V' => Verbatim,
            'v' => match rest {
                "d0" | "d1" | "d2" | "mb" | "mg" | "mm" | "ms" | "mv" => Verbatim,
                _ => Unknown,
            },
            'W' => self.parse_warning(rest, toolset),
            'w' => self.parse_specific_warning(rest),
            'X' if rest.is_empty() => {
                self.ignore_standard_include_path = TriState::True;
                Applied
            }
            'Y' => self.parse_pch(rest, toolset),
            'Z' => self.parse_language(rest),
            _ => Unknown,
        }
    }
}

impl CompilerTool {
    fn set_eh(&mut self, value: ExceptionHandling) -> FlagOutcome {
        self.exception_handling = value;
        Applied
    }

    fn parse_arch(&mut self, arch: &str, toolset: ToolsetVersion) -> FlagOutcome {
        let (value, since) = match arch {
            "SSE" => (EnhancedInstructionSet::Sse, Vs::Vs2005),
            "SSE2" => (EnhancedInstructionSet::Sse2, Vs::Vs2005),
            "AVX" => (EnhancedInstructionSet::Avx, Vs::Vs2012),
            "AVX2" => (EnhancedInstructionSet::Avx2, Vs::Vs2013),
            "AVX512" => (EnhancedInstructionSet::Avx512, Vs::Vs2017),
            "IA32" => (EnhancedInstructionSet::Ia32, Vs::Vs2012),
            _ => return Unknown,
        };
        if toolset < since {
            return Unsupported;
        }
        self.enable_enhanced_instruction_set = value;
        Applied
    }

    fn parse_clr(&mut self, kind: &str, toolset: ToolsetVersion) -> FlagOutcome {
        let value = match kind {
            "pure" | "safe" if !(Vs::Vs2005..=Vs::Vs2015).contains(&toolset) => {
                return Unsupported;
            }
            "pure" => CompileAsManaged::Pure,
            "safe" => CompileAsManaged::Safe,
            "oldSyntax" if toolset > Vs::Vs2008 => return Unsupported,
            "oldSyntax" => CompileAsManaged::OldSyntax,
            "noAssembly" | "initialAppDomain" | "nostdlib" | "netcore" => return Verbatim,
            _ => return Unknown,
        };
        self.compile_as_managed = value;
        Applied
    }

    fn parse_error_report(&mut self, mode: &str, toolset: ToolsetVersion) -> FlagOutcome {
        if toolset < Vs::Vs2005 {
            return Unsupported;
        }
        self.error_reporting = match mode {
            "none" => CompilerErrorReporting::None,
            "prompt" => CompilerErrorReporting::Prompt,
            "queue" => CompilerErrorReporting::Queue,
            "send" if toolset < Vs::Vs2010 => return Unsupported,
            "send" => CompilerErrorReporting::Send,
            _ => return Unknown,
        };
        Applied
    }

    fn parse_fp(&mut self, model: &str) -> FlagOutcome {
        match model {
            "precise" => self.floating_point_model = FloatingPointModel::Precise,
            "strict" => self.floating_point_model = FloatingPointModel::Strict,
            "fast" => self.floating_point_model = FloatingPointModel::Fast,
            "except" => self.floating_point_exceptions = TriState::True,
            "except-" => self.floating_point_exceptions = TriState::False,
            _ => return Unknown,
        }
        Applied
    }

    /// `/Fa`, `/FA`, `/Fd`, `/FI`, `/Fo`, `/Fp`, `/FR`, `/Fr`, `/FU`, ...
    fn parse_file_option(&mut self, rest: &str, toolset: ToolsetVersion) -> FlagOutcome {
        let Some(second) = rest.chars().next() else {
            return Unknown;
        };
        let value = option_value(&rest[second.len_utf8()..]);

        match second {
            'A' => {
                self.assembler_output = match &rest[1..] {
                    "" => AssemblerOutput::AssemblyCode,
                    "c" => AssemblerOutput::AssemblyAndMachineCode,
                    "s" => AssemblerOutput::AssemblyAndSourceCode,
                    "cs" | "sc" => AssemblerOutput::All,
                    _ => return Unknown,
                };
                Applied
            }
            'a' => {
                self.assembler_listing_location = value.to_string();
                if !self.assembler_output.is_set() {
                    self.assembler_output = AssemblerOutput::AssemblyCode;
                }
                Applied
            }
            'C' if value.is_empty() => {
                self.use_full_paths = TriState::True;
                Applied
            }
            'd' => {
                self.program_database_file_name = value.to_string();
                Applied
            }
            'I' if !value.is_empty() => {
                push_unique(&mut self.forced_include_files, value);
                Applied
            }
            'o' => {
                self.object_file = value.to_string();
                Applied
            }
            'p' => {
                self.precompiled_header_file = value.to_string();
                Applied
            }
            'R' | 'r' => {
                self.browse_information = if second == 'R' {
                    BrowseInformation::Full
                } else {
                    BrowseInformation::NoLocalSymbols
                };
                self.browse_information_file = value.to_string();
                Applied
            }
            'S' if value.is_empty() && toolset < Vs::Vs2013 => Unsupported,
            'S' if value.is_empty() => Verbatim,
            'U' if !value.is_empty() => {
                push_unique(&mut self.forced_using_files, value);
                Applied
            }
            'x' if value.is_empty() => {
                self.expand_attributed_source = TriState::True;
                Applied
            }
            'e' | 'm' | 'i' => Verbatim,
            c if c.is_ascii_digit() => Verbatim,
            _ => Unknown,
        }
    }

    fn parse_codegen(&mut self, rest: &str, toolset: ToolsetVersion) -> FlagOutcome {
        let Some(second) = rest.chars().next() else {
            return Unknown;
        };
        let tail = &rest[second.len_utf8()..];

        let field = match second {
            'F' => &mut self.string_pooling,
            'L' => &mut self.whole_program_optimization,
            'R' => &mut self.runtime_type_info,
            'S' => &mut self.buffer_security_check,
            'T' => &mut self.enable_fiber_safe_optimizations,
            'm' => &mut self.minimal_rebuild,
            'y' => &mut self.enable_function_level_linking,
            'X' => {
                return match toggle(tail) {
                    Some(TriState::True) => self.set_eh(ExceptionHandling::Sync),
                    Some(_) => self.set_eh(ExceptionHandling::Disabled),
                    None => Unknown,
                };
            }
            'd' | 'r' | 'z' | 'v' if !tail.is_empty() => return Unknown,
            'd' => return self.set_call(CallingConvention::Cdecl),
            'r' => return self.set_call(CallingConvention::FastCall),
            'z' => return self.set_call(CallingConvention::StdCall),
            'v' if toolset < Vs::Vs2013 => return Unsupported,
            'v' => return self.set_call(CallingConvention::VectorCall),
            'Z' if tail.is_empty() && toolset > Vs::Vs2003 => return Unsupported,
            'Z' if tail.is_empty() => {
                self.basic_runtime_checks = BasicRuntimeChecks::StackFrame;
                return Applied;
            }
            '5' | '6' | '7' | 'B' if tail.is_empty() && toolset > Vs::Vs2003 => {
                return Unsupported;
            }
            '5' | '6' | '7' | 'B' | 'A' | 'D' | 'h' | 'H' | 'e' | 'w' | 'W'
                if tail.is_empty() =>
            {
                return Verbatim;
            }
            's' if tail.chars().all(|c| c.is_ascii_digit()) => return Verbatim,
            _ => return Unknown,
        };

        match toggle(tail) {
            Some(value) => {
                *field = value;
                Applied
            }
            None => Unknown,
        }
    }

    fn set_call(&mut self, value: CallingConvention) -> FlagOutcome {
        self.calling_convention = value;
        Applied
    }

    fn parse_runtime(&mut self, rest: &str, toolset: ToolsetVersion) -> FlagOutcome {
        self.runtime_library = match rest {
            "T" => RuntimeLibrary::MultiThreaded,
            "Td" => RuntimeLibrary::MultiThreadedDebug,
            "D" => RuntimeLibrary::MultiThreadedDll,
            "Dd" => RuntimeLibrary::MultiThreadedDebugDll,
            _ => {
                let Some(count) = rest.strip_prefix('P') else {
                    return Unknown;
                };
                if toolset < Vs::Vs2008 {
                    return Unsupported;
                }
                if count.is_empty() {
                    self.multi_processor_compilation = TriState::True;
                    return Applied;
                }
                // /MP4 both enables the feature and sets the process count.
                return match count.parse::<u64>() {
                    Ok(n) => {
                        self.multi_processor_compilation = TriState::True;
                        self.processor_number = Some(n);
                        Applied
                    }
                    Err(_) => Unknown,
                };
            }
        };
        Applied
    }

    fn parse_optimization(&mut self, rest: &str) -> FlagOutcome {
        match rest {
            "d" => self.optimization = Optimization::Disabled,
            "1" => self.optimization = Optimization::MinSpace,
            "2" => self.optimization = Optimization::MaxSpeed,
            "x" => self.optimization = Optimization::Full,
            "b0" => self.inline_function_expansion = InlineExpansion::Disabled,
            "b1" => self.inline_function_expansion = InlineExpansion::OnlyExplicit,
            "b2" => self.inline_function_expansion = InlineExpansion::AnySuitable,
            "i" => self.enable_intrinsic_functions = TriState::True,
            "i-" => self.enable_intrinsic_functions = TriState::False,
            "s" => self.favor_size_or_speed = FavorSizeOrSpeed::Size,
            "t" => self.favor_size_or_speed = FavorSizeOrSpeed::Speed,
            "y" => self.omit_frame_pointers = TriState::True,
            "y-" => self.omit_frame_pointers = TriState::False,
            "g" | "a" | "w" => {
                if !self.optimization.is_set() {
                    self.optimization = Optimization::Custom;
                }
                return Verbatim;
            }
            _ => return Unknown,
        }
        Applied
    }

    fn parse_std(&mut self, value: &str, toolset: ToolsetVersion) -> FlagOutcome {
        enum Std {
            Cpp(LanguageStandard),
            C(LanguageStandardC),
        }
        let (std, since) = match value {
            "c++14" => (Std::Cpp(LanguageStandard::Cpp14), Vs::Vs2015),
            "c++17" => (Std::Cpp(LanguageStandard::Cpp17), Vs::Vs2017),
            "c++20" => (Std::Cpp(LanguageStandard::Cpp20), Vs::Vs2019),
            "c++latest" => (Std::Cpp(LanguageStandard::Latest), Vs::Vs2015),
            "c11" => (Std::C(LanguageStandardC::C11), Vs::Vs2019),
            "c17" => (Std::C(LanguageStandardC::C17), Vs::Vs2019),
            _ => return Unknown,
        };
        if toolset < since {
            return Unsupported;
        }
        match std {
            Std::Cpp(v) => self.language_standard = v,
            Std::C(v) => self.language_standard_c = v,
        }
        Applied
    }

    fn parse_warning(&mut self, rest: &str, toolset: ToolsetVersion) -> FlagOutcome {
        match rest {
            "0" => self.warning_level = WarningLevel::TurnOffAll,
            "1" => self.warning_level = WarningLevel::Level1,
            "2" => self.warning_level = WarningLevel::Level2,
            "3" => self.warning_level = WarningLevel::Level3,
            "4" => self.warning_level = WarningLevel::Level4,
            "all" if toolset < Vs::Vs2010 => return Unsupported,
            "all" => self.warning_level = WarningLevel::EnableAll,
            "X" => self.treat_warnings_as_errors = TriState::True,
            "X-" => self.treat_warnings_as_errors = TriState::False,
            "p64" if toolset > Vs::Vs2008 => return Unsupported,
            "p64" => self.detect_64bit_portability = TriState::True,
            "L" => return Verbatim,
            _ if rest.starts_with("v:") => return Verbatim,
            _ => return Unknown,
        }
        Applied
    }

    /// `/w`, `/wd4996`, `/we4715`, `/wo4000`, `/w14242`.
    fn parse_specific_warning(&mut self, rest: &str) -> FlagOutcome {
        if rest.is_empty() {
            self.warning_level = WarningLevel::TurnOffAll;
            return Applied;
        }
        let Some(kind) = rest.chars().next() else {
            return Unknown;
        };
        let number = option_value(&rest[kind.len_utf8()..]);
        if number.is_empty() || !number.split(';').all(|n| n.chars().all(|c| c.is_ascii_digit())) {
            return Unknown;
        }
        match kind {
            'd' => push_each(&mut self.disable_specific_warnings, number),
            'e' => push_each(&mut self.treat_specific_warnings_as_errors, number),
            'o' | '1' | '2' | '3' | '4' => return Verbatim,
            _ => return Unknown,
        }
        Applied
    }

    fn parse_pch(&mut self, rest: &str, toolset: ToolsetVersion) -> FlagOutcome {
        let Some(kind) = rest.chars().next() else {
            return Unknown;
        };
        let header = option_value(&rest[kind.len_utf8()..]);
        match kind {
            'c' => {
                self.precompiled_header = PrecompiledHeader::Create;
                self.precompiled_header_through = header.to_string();
                Applied
            }
            'u' => {
                self.precompiled_header = PrecompiledHeader::Use;
                self.precompiled_header_through = header.to_string();
                Applied
            }
            '-' if header.is_empty() => {
                self.precompiled_header = PrecompiledHeader::NotUsing;
                Applied
            }
            'X' if toolset > Vs::Vs2003 => Unsupported,
            'X' | 'd' | 'l' => Verbatim,
            _ => Unknown,
        }
    }

    fn parse_language(&mut self, rest: &str) -> FlagOutcome {
        match rest {
            "i" => self.debug_information_format = DebugInformationFormat::ProgramDatabase,
            "I" => self.debug_information_format = DebugInformationFormat::EditAndContinue,
            "7" => self.debug_information_format = DebugInformationFormat::OldStyle,
            "a" => self.disable_language_extensions = TriState::True,
            "e" => self.disable_language_extensions = TriState::False,
            "l" => self.omit_default_lib_name = TriState::True,
            "p1" => self.struct_member_alignment = StructMemberAlignment::Byte1,
            "p2" => self.struct_member_alignment = StructMemberAlignment::Byte2,
            "p4" => self.struct_member_alignment = StructMemberAlignment::Byte4,
            "p8" => self.struct_member_alignment = StructMemberAlignment::Byte8,
            "p16" => self.struct_member_alignment = StructMemberAlignment::Byte16,
            "c:wchar_t" => self.treat_wchar_t_as_builtin = TriState::True,
            "c:wchar_t-" => self.treat_wchar_t_as_builtin = TriState::False,
            "c:forScope" => self.force_conformance_in_for_loop_scope = TriState::True,
            "c:forScope-" => self.force_conformance_in_for_loop_scope = TriState::False,
            "s" | "p" | "W" | "o" | "o-" | "H" => return Verbatim,
            _ if rest.starts_with("c:") || rest.starts_with('m') => return Verbatim,
            _ => return Unknown,
        }
        Applied
    }
}
