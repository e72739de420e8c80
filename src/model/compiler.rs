//! C/C++ compiler settings (`VCCLCompilerTool` / `ClCompile`).

use super::{Dialect, Settings, TriState};

choice_enum! {
    pub enum Optimization {
        Disabled => ("0", "Disabled"),
        MinSpace => ("1", "MinSpace"),
        MaxSpeed => ("2", "MaxSpeed"),
        Full => ("3", "Full"),
        Custom => ("4", ""),
    }
}

choice_enum! {
    pub enum WarningLevel {
        TurnOffAll => ("0", "TurnOffAllWarnings"),
        Level1 => ("1", "Level1"),
        Level2 => ("2", "Level2"),
        Level3 => ("3", "Level3"),
        Level4 => ("4", "Level4"),
        EnableAll => ("", "EnableAllWarnings"),
    }
}

choice_enum! {
    pub enum ExceptionHandling {
        Disabled => ("0", "false"),
        /// `/EHsc`: C++ exceptions, no structured exceptions.
        Sync => ("1", "Sync"),
        /// `/EHa`: C++ and structured exceptions.
        Async => ("2", "Async"),
        /// `/EHs`: extern "C" functions may throw.
        SyncCThrow => ("", "SyncCThrow"),
    }
}

choice_enum! {
    pub enum RuntimeLibrary {
        MultiThreaded => ("0", "MultiThreaded"),
        MultiThreadedDebug => ("1", "MultiThreadedDebug"),
        MultiThreadedDll => ("2", "MultiThreadedDLL"),
        MultiThreadedDebugDll => ("3", "MultiThreadedDebugDLL"),
    }
}

choice_enum! {
    pub enum DebugInformationFormat {
        None => ("0", "None"),
        OldStyle => ("1", "OldStyle"),
        ProgramDatabase => ("3", "ProgramDatabase"),
        EditAndContinue => ("4", "EditAndContinue"),
    }
}

choice_enum! {
    pub enum BasicRuntimeChecks {
        Default => ("0", "Default"),
        StackFrame => ("1", "StackFrameRuntimeCheck"),
        UninitializedVariables => ("2", "UninitializedLocalUsageCheck"),
        Both => ("3", "EnableFastChecks"),
    }
}

choice_enum! {
    pub enum InlineExpansion {
        Disabled => ("0", "Disabled"),
        OnlyExplicit => ("1", "OnlyExplicitInline"),
        AnySuitable => ("2", "AnySuitable"),
    }
}

choice_enum! {
    pub enum FavorSizeOrSpeed {
        Neither => ("0", "Neither"),
        Speed => ("1", "Speed"),
        Size => ("2", "Size"),
    }
}

choice_enum! {
    pub enum CompileAs {
        Default => ("0", "Default"),
        C => ("1", "CompileAsC"),
        Cpp => ("2", "CompileAsCpp"),
    }
}

choice_enum! {
    pub enum CallingConvention {
        Cdecl => ("0", "Cdecl"),
        FastCall => ("1", "FastCall"),
        StdCall => ("2", "StdCall"),
        VectorCall => ("", "VectorCall"),
    }
}

choice_enum! {
    pub enum PrecompiledHeader {
        NotUsing => ("0", "NotUsing"),
        Create => ("1", "Create"),
        Use => ("3", "Use"),
    }
}

choice_enum! {
    pub enum AssemblerOutput {
        NoListing => ("0", "NoListing"),
        AssemblyCode => ("1", "AssemblyCode"),
        AssemblyAndMachineCode => ("2", "AssemblyAndMachineCode"),
        All => ("3", "All"),
        AssemblyAndSourceCode => ("4", "AssemblyAndSourceCode"),
    }
}

choice_enum! {
    pub enum BrowseInformation {
        Full => ("1", "true"),
        NoLocalSymbols => ("2", "true"),
    }
}

choice_enum! {
    pub enum StructMemberAlignment {
        Default => ("0", "Default"),
        Byte1 => ("1", "1Byte"),
        Byte2 => ("2", "2Bytes"),
        Byte4 => ("3", "4Bytes"),
        Byte8 => ("4", "8Bytes"),
        Byte16 => ("5", "16Bytes"),
    }
}

choice_enum! {
    pub enum CompileAsManaged {
        Assembly => ("1", "true"),
        Pure => ("2", "Pure"),
        Safe => ("3", "Safe"),
        OldSyntax => ("4", "OldSyntax"),
    }
}

choice_enum! {
    pub enum EnhancedInstructionSet {
        Sse => ("1", "StreamingSIMDExtensions"),
        Sse2 => ("2", "StreamingSIMDExtensions2"),
        Avx => ("", "AdvancedVectorExtensions"),
        Avx2 => ("", "AdvancedVectorExtensions2"),
        Avx512 => ("", "AdvancedVectorExtensions512"),
        Ia32 => ("", "NoExtensions"),
    }
}

choice_enum! {
    pub enum FloatingPointModel {
        Precise => ("0", "Precise"),
        Strict => ("1", "Strict"),
        Fast => ("2", "Fast"),
    }
}

choice_enum! {
    pub enum PreprocessToFile {
        No => ("0", ""),
        WithLineNumbers => ("1", ""),
        WithoutLineNumbers => ("2", ""),
    }
}

choice_enum! {
    pub enum LanguageStandard {
        Cpp14 => ("", "stdcpp14"),
        Cpp17 => ("", "stdcpp17"),
        Cpp20 => ("", "stdcpp20"),
        Latest => ("", "stdcpplatest"),
    }
}

choice_enum! {
    pub enum LanguageStandardC {
        C11 => ("", "stdc11"),
        C17 => ("", "stdc17"),
    }
}

choice_enum! {
    pub enum CompilerErrorReporting {
        None => ("0", "None"),
        Prompt => ("1", "Prompt"),
        Queue => ("2", "Queue"),
        Send => ("", "Send"),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerTool {
    pub additional_include_directories: Vec<String>,
    pub additional_options: Vec<String>,
    pub additional_using_directories: Vec<String>,
    pub assembler_listing_location: String,
    pub assembler_output: AssemblerOutput,
    pub basic_runtime_checks: BasicRuntimeChecks,
    pub browse_information: BrowseInformation,
    pub browse_information_file: String,
    pub buffer_security_check: TriState,
    pub calling_convention: CallingConvention,
    pub compile_as: CompileAs,
    pub compile_as_managed: CompileAsManaged,
    pub conformance_mode: TriState,
    pub debug_information_format: DebugInformationFormat,
    pub default_char_is_unsigned: TriState,
    pub detect_64bit_portability: TriState,
    pub disable_language_extensions: TriState,
    pub disable_specific_warnings: Vec<String>,
    pub enable_enhanced_instruction_set: EnhancedInstructionSet,
    pub enable_fiber_safe_optimizations: TriState,
    pub enable_function_level_linking: TriState,
    pub enable_intrinsic_functions: TriState,
    pub error_reporting: CompilerErrorReporting,
    pub exception_handling: ExceptionHandling,
    pub expand_attributed_source: TriState,
    pub favor_size_or_speed: FavorSizeOrSpeed,
    pub floating_point_exceptions: TriState,
    pub floating_point_model: FloatingPointModel,
    pub force_conformance_in_for_loop_scope: TriState,
    pub forced_include_files: Vec<String>,
    pub forced_using_files: Vec<String>,
    pub generate_preprocessed_file: PreprocessToFile,
    pub generate_xml_documentation: TriState,
    pub ignore_standard_include_path: TriState,
    pub inline_function_expansion: InlineExpansion,
    pub keep_comments: TriState,
    pub language_standard: LanguageStandard,
    pub language_standard_c: LanguageStandardC,
    pub minimal_rebuild: TriState,
    pub multi_processor_compilation: TriState,
    pub processor_number: Option<u64>,
    pub object_file: String,
    pub omit_default_lib_name: TriState,
    pub omit_frame_pointers: TriState,
    pub open_mp: TriState,
    pub optimization: Optimization,
    pub precompiled_header: PrecompiledHeader,
    pub precompiled_header_file: String,
    pub precompiled_header_through: String,
    pub preprocessor_definitions: Vec<String>,
    pub program_database_file_name: String,
    pub runtime_library: RuntimeLibrary,
    pub runtime_type_info: TriState,
    pub sdl_check: TriState,
    pub show_includes: TriState,
    pub smaller_type_check: TriState,
    pub string_pooling: TriState,
    pub struct_member_alignment: StructMemberAlignment,
    pub suppress_startup_banner: TriState,
    pub treat_specific_warnings_as_errors: Vec<String>,
    pub treat_wchar_t_as_builtin: TriState,
    pub treat_warnings_as_errors: TriState,
    pub undefine_all_preprocessor_definitions: TriState,
    pub undefine_preprocessor_definitions: Vec<String>,
    pub use_full_paths: TriState,
    pub warning_level: WarningLevel,
    pub whole_program_optimization: TriState,
}

impl CompilerTool {
    /// Baseline settings before any user flag is applied.
    pub fn for_build(debug: bool) -> Self {
        let mut tool = Self {
            suppress_startup_banner: TriState::True,
            warning_level: WarningLevel::Level3,
            ..Self::default()
        };
        if debug {
            tool.optimization = Optimization::Disabled;
            tool.debug_information_format = DebugInformationFormat::ProgramDatabase;
            tool.basic_runtime_checks = BasicRuntimeChecks::Both;
            tool.runtime_library = RuntimeLibrary::MultiThreadedDebugDll;
        } else {
            tool.optimization = Optimization::MaxSpeed;
            tool.runtime_library = RuntimeLibrary::MultiThreadedDll;
        }
        tool
    }

    pub fn write_settings(&self, s: &mut Settings) {
        let mut options = self.additional_options.clone();
        if s.dialect() == Dialect::Vcproj && self.multi_processor_compilation.is_true() {
            // No vcproj attribute for /MP.
            match self.processor_number {
                Some(n) => options.push(format!("/MP{}", n)),
                None => options.push("/MP".to_string()),
            }
        }

        s.list(
            "AdditionalIncludeDirectories",
            "AdditionalIncludeDirectories",
            &self.additional_include_directories,
        );
        s.options("AdditionalOptions", "AdditionalOptions", &options);
        s.list(
            "AdditionalUsingDirectories",
            "AdditionalUsingDirectories",
            &self.additional_using_directories,
        );
        s.text(
            "AssemblerListingLocation",
            "AssemblerListingLocation",
            &self.assembler_listing_location,
        );
        s.choice("AssemblerOutput", "AssemblerOutput", self.assembler_output);
        s.choice("BasicRuntimeChecks", "BasicRuntimeChecks", self.basic_runtime_checks);
        s.choice("BrowseInformation", "BrowseInformation", self.browse_information);
        s.text(
            "BrowseInformationFile",
            "BrowseInformationFile",
            &self.browse_information_file,
        );
        s.flag("BufferSecurityCheck", "BufferSecurityCheck", self.buffer_security_check);
        s.choice("CallingConvention", "CallingConvention", self.calling_convention);
        s.choice("CompileAs", "CompileAs", self.compile_as);
        s.choice("CompileAsManaged", "CompileAsManaged", self.compile_as_managed);
        s.flag("", "ConformanceMode", self.conformance_mode);
        s.choice(
            "DebugInformationFormat",
            "DebugInformationFormat",
            self.debug_information_format,
        );
        s.flag("DefaultCharIsUnsigned", "", self.default_char_is_unsigned);
        s.flag(
            "Detect64BitPortabilityProblems",
            "",
            self.detect_64bit_portability,
        );
        s.flag(
            "DisableLanguageExtensions",
            "DisableLanguageExtensions",
            self.disable_language_extensions,
        );
        s.list(
            "DisableSpecificWarnings",
            "DisableSpecificWarnings",
            &self.disable_specific_warnings,
        );
        s.choice(
            "EnableEnhancedInstructionSet",
            "EnableEnhancedInstructionSet",
            self.enable_enhanced_instruction_set,
        );
        s.flag(
            "EnableFiberSafeOptimizations",
            "EnableFiberSafeOptimizations",
            self.enable_fiber_safe_optimizations,
        );
        s.flag(
            "EnableFunctionLevelLinking",
            "FunctionLevelLinking",
            self.enable_function_level_linking,
        );
        s.flag(
            "EnableIntrinsicFunctions",
            "IntrinsicFunctions",
            self.enable_intrinsic_functions,
        );
        s.choice("ErrorReporting", "ErrorReporting", self.error_reporting);
        s.choice("ExceptionHandling", "ExceptionHandling", self.exception_handling);
        s.flag(
            "ExpandAttributedSource",
            "ExpandAttributedSource",
            self.expand_attributed_source,
        );
        s.choice("FavorSizeOrSpeed", "FavorSizeOrSpeed", self.favor_size_or_speed);
        s.flag(
            "FloatingPointExceptions",
            "FloatingPointExceptions",
            self.floating_point_exceptions,
        );
        s.choice("FloatingPointModel", "FloatingPointModel", self.floating_point_model);
        s.flag(
            "ForceConformanceInForLoopScope",
            "ForceConformanceInForLoopScope",
            self.force_conformance_in_for_loop_scope,
        );
        s.list("ForcedIncludeFiles", "ForcedIncludeFiles", &self.forced_include_files);
        s.list("ForcedUsingFiles", "ForcedUsingFiles", &self.forced_using_files);
        s.choice("GeneratePreprocessedFile", "", self.generate_preprocessed_file);
        if s.dialect() == Dialect::Vcxproj {
            match self.generate_preprocessed_file {
                PreprocessToFile::WithLineNumbers => {
                    s.flag("", "PreprocessToFile", TriState::True);
                }
                PreprocessToFile::WithoutLineNumbers => {
                    s.flag("", "PreprocessToFile", TriState::True);
                    s.flag("", "PreprocessSuppressLineNumbers", TriState::True);
                }
                PreprocessToFile::No => s.flag("", "PreprocessToFile", TriState::False),
                PreprocessToFile::NotSet => {}
            }
        }
        s.flag(
            "GenerateXMLDocumentationFiles",
            "GenerateXMLDocumentationFiles",
            self.generate_xml_documentation,
        );
        s.flag(
            "IgnoreStandardIncludePath",
            "IgnoreStandardIncludePath",
            self.ignore_standard_include_path,
        );
        s.choice(
            "InlineFunctionExpansion",
            "InlineFunctionExpansion",
            self.inline_function_expansion,
        );
        s.flag("KeepComments", "PreprocessKeepComments", self.keep_comments);
        s.choice("", "LanguageStandard", self.language_standard);
        s.choice("", "LanguageStandard_C", self.language_standard_c);
        s.flag("MinimalRebuild", "MinimalRebuild", self.minimal_rebuild);
        s.flag(
            "",
            "MultiProcessorCompilation",
            self.multi_processor_compilation,
        );
        if self.multi_processor_compilation.is_true() {
            s.number("", "ProcessorNumber", self.processor_number);
        }
        s.text("ObjectFile", "ObjectFileName", &self.object_file);
        s.flag("OmitDefaultLibName", "OmitDefaultLibName", self.omit_default_lib_name);
        s.flag("OmitFramePointers", "OmitFramePointers", self.omit_frame_pointers);
        s.flag("OpenMP", "OpenMPSupport", self.open_mp);
        s.choice("Optimization", "Optimization", self.optimization);
        s.choice("UsePrecompiledHeader", "PrecompiledHeader", self.precompiled_header);
        s.text(
            "PrecompiledHeaderThrough",
            "PrecompiledHeaderFile",
            &self.precompiled_header_through,
        );
        s.text(
            "PrecompiledHeaderFile",
            "PrecompiledHeaderOutputFile",
            &self.precompiled_header_file,
        );
        s.list(
            "PreprocessorDefinitions",
            "PreprocessorDefinitions",
            &self.preprocessor_definitions,
        );
        s.text(
            "ProgramDataBaseFileName",
            "ProgramDataBaseFileName",
            &self.program_database_file_name,
        );
        s.choice("RuntimeLibrary", "RuntimeLibrary", self.runtime_library);
        s.flag("RuntimeTypeInfo", "RuntimeTypeInfo", self.runtime_type_info);
        s.flag("", "SDLCheck", self.sdl_check);
        s.flag("ShowIncludes", "ShowIncludes", self.show_includes);
        s.flag("SmallerTypeCheck", "SmallerTypeCheck", self.smaller_type_check);
        s.flag("StringPooling", "StringPooling", self.string_pooling);
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
        s.list(
            "TreatSpecificWarningsAsErrors",
            "TreatSpecificWarningsAsErrors",
            &self.treat_specific_warnings_as_errors,
        );
        s.flag(
            "TreatWChar_tAsBuiltInType",
            "TreatWChar_tAsBuiltInType",
            self.treat_wchar_t_as_builtin,
        );
        s.flag("WarnAsError", "TreatWarningAsError", self.treat_warnings_as_errors);
        s.flag(
            "UndefineAllPreprocessorDefinitions",
            "UndefineAllPreprocessorDefinitions",
            self.undefine_all_preprocessor_definitions,
        );
        s.list(
            "UndefinePreprocessorDefinitions",
            "UndefinePreprocessorDefinitions",
            &self.undefine_preprocessor_definitions,
        );
        s.flag("UseFullPaths", "UseFullPaths", self.use_full_paths);
        s.choice("WarningLevel", "WarningLevel", self.warning_level);
        s.flag(
            "WholeProgramOptimization",
            "WholeProgramOptimization",
            self.whole_program_optimization,
        );
    }
}
