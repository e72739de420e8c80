//! Inline `.vcproj` writer (VS2002-VS2008).
//!
//! One stream holds everything: configurations with one `<Tool>` block per
//! tool, then the `<Files>` tree with per-file configuration overrides.

use super::walk::{self, FileEvent, FolderEvent, TreeSink, WalkOptions};
use super::xml::XmlWriter;
use super::attributes;
use crate::model::{Configuration, Dialect, Settings};
use crate::project::Project;
use crate::toolset::ToolsetVersion;
use std::io::{self, Write};

const INDENT: &str = "\t";

fn tool_block<W: Write>(xml: &mut XmlWriter<W>, name: &str, settings: &Settings) -> io::Result<()> {
    xml.empty_multiline("Tool", &attributes(&[("Name", name)], settings))
}

fn tool<W: Write>(
    xml: &mut XmlWriter<W>,
    name: &str,
    write: impl FnOnce(&mut Settings),
) -> io::Result<()> {
    let mut settings = Settings::new(Dialect::Vcproj);
    write(&mut settings);
    tool_block(xml, name, &settings)
}

fn write_configuration<W: Write>(xml: &mut XmlWriter<W>, config: &Configuration) -> io::Result<()> {
    let general = config.general_settings(Dialect::Vcproj);
    xml.open_multiline("Configuration", &attributes(&[], &general))?;

    let (pre_build, _) = config.pre_build.kind.names();
    tool(xml, pre_build, |s| config.pre_build.write_settings(s))?;
    tool(xml, "VCCustomBuildTool", |s| config.custom_build.write_settings(s))?;
    tool(xml, "VCMIDLTool", |s| config.midl.write_settings(s))?;
    tool(xml, "VCCLCompilerTool", |s| config.compiler.write_settings(s))?;
    tool(xml, "VCResourceCompilerTool", |s| config.resource.write_settings(s))?;
    let (pre_link, _) = config.pre_link.kind.names();
    tool(xml, pre_link, |s| config.pre_link.write_settings(s))?;
    if config.uses_linker() {
        tool(xml, "VCLinkerTool", |s| config.linker.write_settings(s))?;
    } else if config.uses_librarian() {
        tool(xml, "VCLibrarianTool", |s| config.librarian.write_settings(s))?;
    }
    let (post_build, _) = config.post_build.kind.names();
    tool(xml, post_build, |s| config.post_build.write_settings(s))?;
    if !config.deployment.is_empty() {
        tool(xml, "DeploymentTool", |s| config.deployment.write_settings(s))?;
    }

    xml.close()
}

/// Tool a per-file configuration override belongs to.
fn file_tool(item_type: &str) -> &'static str {
    match item_type {
        "ClCompile" => "VCCLCompilerTool",
        "ResourceCompile" => "VCResourceCompilerTool",
        "Midl" => "VCMIDLTool",
        "MASM" => "MASM",
        _ => "VCCustomBuildTool",
    }
}

/// `.vcproj` files spell relative paths from the project directory.
fn relative_path(path: &str) -> String {
    if path.starts_with('.') || path.starts_with('\\') || path.as_bytes().get(1) == Some(&b':') {
        path.to_string()
    } else {
        format!(".\\{}", path)
    }
}

struct FilesSink<'x, W: Write> {
    xml: &'x mut XmlWriter<W>,
}

impl<W: Write> TreeSink for FilesSink<'_, W> {
    fn begin_folder(&mut self, folder: &FolderEvent) -> io::Result<()> {
        let mut attrs = vec![("Name", folder.name)];
        if folder.depth == 0 {
            attrs.push(("Filter", folder.role.extensions()));
        }
        attrs.push(("UniqueIdentifier", folder.guid.as_str()));
        if folder.depth == 0 && !folder.role.parse_files() {
            attrs.push(("ParseFiles", "false"));
        }
        self.xml.open_multiline("Filter", &attrs)
    }

    fn end_folder(&mut self, _folder: &FolderEvent) -> io::Result<()> {
        self.xml.close()
    }

    fn file(&mut self, file: &FileEvent) -> io::Result<()> {
        let path = relative_path(&file.path);
        let attrs = [("RelativePath", path.as_str())];
        if !file.has_overrides() {
            return self.xml.empty_multiline("File", &attrs);
        }

        self.xml.open_multiline("File", &attrs)?;
        for config in file.configs.iter().filter(|c| c.is_overridden()) {
            let mut head = vec![("Name", config.configuration.as_str())];
            if config.excluded {
                head.push(("ExcludedFromBuild", "true"));
            }
            self.xml.open_multiline("FileConfiguration", &head)?;
            match config.custom_build.filter(|c| !c.is_empty()) {
                Some(custom) => {
                    tool(self.xml, "VCCustomBuildTool", |s| custom.write_settings(s))?
                }
                None => self
                    .xml
                    .empty_multiline("Tool", &[("Name", file_tool(file.item_type))])?,
            }
            self.xml.close()?;
        }
        self.xml.close()
    }
}

/// Writes `project` as a `.vcproj` document into `out`.
pub fn write_vcproj<W: Write>(
    project: &Project,
    toolset: ToolsetVersion,
    options: &WalkOptions,
    out: W,
) -> io::Result<W> {
    let mut xml = XmlWriter::new(out, INDENT);
    let guid = project.guid_string();

    xml.declaration("Windows-1252")?;
    xml.open_multiline(
        "VisualStudioProject",
        &[
            ("ProjectType", "Visual C++"),
            ("Version", toolset.vcproj_version()),
            ("Name", project.name.as_str()),
            ("ProjectGUID", guid.as_str()),
            ("RootNamespace", project.name.as_str()),
            ("Keyword", "Win32Proj"),
        ],
    )?;

    xml.open_multiline("Platforms", &[])?;
    for platform in project.platforms() {
        xml.empty_multiline("Platform", &[("Name", platform)])?;
    }
    xml.close()?;

    // Tool files arrived with VS2005.
    if toolset >= ToolsetVersion::Vs2005 {
        xml.open_multiline("ToolFiles", &[])?;
        for rule in &project.rules {
            let file_name = format!("{}.rules", rule);
            xml.empty_multiline("DefaultToolFile", &[("FileName", file_name.as_str())])?;
        }
        xml.close()?;
    }

    xml.open_multiline("Configurations", &[])?;
    for config in project.configurations() {
        write_configuration(&mut xml, config)?;
    }
    xml.close()?;

    xml.open_multiline("References", &[])?;
    xml.close()?;

    xml.open_multiline("Files", &[])?;
    {
        let mut sink = FilesSink { xml: &mut xml };
        let mut sinks: [&mut dyn TreeSink; 1] = [&mut sink];
        walk::walk_project(project, options, &mut sinks)?;
    }
    xml.close()?;

    xml.open_multiline("Globals", &[])?;
    xml.close()?;

    xml.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterFile, FilterRole, FilterSet};
    use crate::model::{ConfigurationType, CustomBuildTool};
    use crate::project::ProjectSingleConfig;
    use uuid::Uuid;

    fn member(build_type: &str) -> ProjectSingleConfig {
        let mut configuration = Configuration::new(build_type, "Win32");
        configuration.configuration_type = ConfigurationType::Application;
        configuration.output_directory = "$(PlatformName)\\$(ConfigurationName)".into();
        configuration.compiler.preprocessor_definitions = vec!["A&B".into()];
        configuration.post_build.command_line = vec!["copy a b".into(), "copy c d".into()];

        let mut filters = FilterSet::default();
        filters.filter_mut(FilterRole::Source).add(FilterFile {
            path: "src/main.cpp".into(),
            excluded: build_type == "Release",
            generated_from: None,
            custom_build: None,
        });
        filters.filter_mut(FilterRole::Extra("lexer".into())).add(FilterFile {
            path: "src/scan.l".into(),
            excluded: false,
            generated_from: None,
            custom_build: Some(CustomBuildTool {
                command_line: vec!["flex src\\scan.l".into()],
                description: "Lexing".into(),
                outputs: vec!["gen\\scan.c".into()],
                additional_dependencies: Vec::new(),
            }),
        });
        ProjectSingleConfig {
            name: "app".into(),
            guid: Uuid::nil(),
            platform: "Win32".into(),
            configuration,
            filters,
            rules: Vec::new(),
        }
    }

    fn render(toolset: ToolsetVersion) -> String {
        let project = Project {
            name: "app".into(),
            guid: Uuid::nil(),
            platform: "Win32".into(),
            members: vec![member("Debug"), member("Release")],
            rules: vec!["masm".into()],
        };
        let bytes = write_vcproj(&project, toolset, &WalkOptions::default(), Vec::new()).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_document_shape() {
        let text = render(ToolsetVersion::Vs2008);
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"Windows-1252\"?>\r\n<VisualStudioProject\r\n"));
        assert!(text.contains("\tVersion=\"9.00\"\r\n"));
        assert!(text.contains("ProjectGUID=\"{00000000-0000-0000-0000-000000000000}\""));
        assert_eq!(text.matches("<Configuration\r\n").count(), 2);
        assert!(text.contains("Name=\"Debug|Win32\""));
        assert!(text.contains("FileName=\"masm.rules\""));
        assert!(text.contains("PreprocessorDefinitions=\"A&amp;B\""));
        assert!(text.contains("CommandLine=\"copy a b&#x0D;&#x0A;if errorlevel 1 goto VCReportError&#x0D;&#x0A;copy c d\""));
        assert!(text.contains("Name=\"VCLinkerTool\""));
        assert!(!text.contains("VCLibrarianTool"));
        assert!(text.ends_with("</VisualStudioProject>\r\n"));
    }

    #[test]
    fn test_files_carry_per_configuration_overrides() {
        let text = render(ToolsetVersion::Vs2008);
        assert!(text.contains("RelativePath=\".\\src\\main.cpp\""));
        assert_eq!(text.matches("ExcludedFromBuild=\"true\"").count(), 1);
        // The custom build step is repeated for both configurations.
        assert_eq!(text.matches("CommandLine=\"flex src\\scan.l\"").count(), 2);
        assert!(text.contains(&format!("UniqueIdentifier=\"{}\"", FilterRole::Source.guid())));
    }

    #[test]
    fn test_oldest_generation_has_no_tool_files() {
        let text = render(ToolsetVersion::Vs2002);
        assert!(text.contains("Version=\"7.00\""));
        assert!(!text.contains("<ToolFiles"));
    }
}
