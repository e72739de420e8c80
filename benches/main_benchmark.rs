use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::path::Path;
use uuid::Uuid;
use vcgen::config;
use vcgen::diagnostics::Diagnostics;
use vcgen::emit::{self, WalkOptions};
use vcgen::flags::{self, apply_flags};
use vcgen::generator;
use vcgen::lock::GuidLock;
use vcgen::model::{CompilerTool, LinkerTool};
use vcgen::toolset::ToolsetVersion;

const MOCK_DESCRIPTION: &str = r#"
[package]
name = "benchmark_project"
kind = "staticlib"

[build]
sources = ["src/main.cpp", "src/utils.cpp", "src/net/socket.cpp", "src/net/http.cpp"]
headers = ["include/utils.h", "include/net.h"]
cflags = "/W4 /EHsc /O2 /GL /Zi /MP /DWIN32 /D_LIB /Iinclude"
lflags = ["/LTCG", "/OPT:REF"]
platforms = ["Win32", "x64"]

[profile.Release]
cflags = ["/Ox"]
exclude = ["src/net/http.cpp"]
"#;

const MOCK_CFLAGS: &str = "/nologo /W4 /WX- /EHsc /O2 /Ob2 /Oi /GL /GS- /Gy /Zi /MD /fp:precise \
     /Zc:wchar_t /Zc:forScope /DNDEBUG /D_CONSOLE /I..\\include /Fo\"obj\\\\\" /std:c++20 /unknown";

const MOCK_LOCK: &str = r#"
[project]
"c:/work/core/core.vcxproj" = "{12345678-1234-5678-9ABC-DEF012345678}"
"c:/work/app/app.vcxproj" = "{12345678-1234-5678-9ABC-DEF012345679}"
"#;

fn bench_description_parse(c: &mut Criterion) {
    c.bench_function("parse_vcgen_toml", |b| {
        b.iter(|| config::parse_description(black_box(MOCK_DESCRIPTION), Path::new("bench/vcgen.toml")).unwrap())
    });
}

fn bench_lock_parse(c: &mut Criterion) {
    c.bench_function("parse_vcgen_lock", |b| {
        b.iter(|| {
            let _: GuidLock = toml::from_str(black_box(MOCK_LOCK)).unwrap();
        })
    });
}

fn bench_flag_parsing(c: &mut Criterion) {
    let tokens = flags::tokenize(MOCK_CFLAGS);

    c.bench_function("apply_compiler_flags", |b| {
        b.iter(|| {
            let mut tool = CompilerTool::default();
            let mut diag = Diagnostics::silent();
            apply_flags(&mut tool, black_box(&tokens), ToolsetVersion::Vs2022, &mut diag)
        })
    });

    let link_tokens = flags::tokenize("/DEBUG /SUBSYSTEM:CONSOLE /OPT:REF /OPT:ICF /LTCG kernel32.lib user32.lib");
    c.bench_function("apply_linker_flags", |b| {
        b.iter(|| {
            let mut tool = LinkerTool::default();
            let mut diag = Diagnostics::silent();
            apply_flags(&mut tool, black_box(&link_tokens), ToolsetVersion::Vs2008, &mut diag)
        })
    });
}

fn bench_emit(c: &mut Criterion) {
    let description = config::parse_description(MOCK_DESCRIPTION, Path::new("bench/vcgen.toml")).unwrap();
    let mut diag = Diagnostics::silent();
    let project = generator::build_project(
        &description,
        Path::new("bench"),
        ToolsetVersion::Vs2022,
        Uuid::nil(),
        &mut diag,
    )
    .unwrap();
    let options = WalkOptions::default();

    c.bench_function("render_vcxproj", |b| {
        b.iter(|| emit::render_project(black_box(&project), ToolsetVersion::Vs2022, &options).unwrap())
    });

    c.bench_function("render_vcproj", |b| {
        b.iter(|| emit::render_project(black_box(&project), ToolsetVersion::Vs2008, &options).unwrap())
    });
}

criterion_group!(
    benches,
    bench_description_parse,
    bench_lock_parse,
    bench_flag_parsing,
    bench_emit
);
criterion_main!(benches);
