//! MSBuild `.vcxproj` and `.vcxproj.filters` writers (VS2010+).
//!
//! The body and the filter map are produced by one walk: the body sink
//! writes items as they arrive, the filter sink collects folders and
//! memberships and writes the companion file afterwards.

use super::walk::{self, FileEvent, FolderEvent, TreeSink, WalkOptions};
use super::xml::XmlWriter;
use super::condition;
use crate::model::{Configuration, Dialect, Settings};
use crate::project::Project;
use crate::toolset::ToolsetVersion;
use std::io::{self, Write};

const INDENT: &str = "  ";
const NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";
const USER_PROPS: &str = "$(UserRootDir)\\Microsoft.Cpp.$(Platform).user.props";

/// `<element>` with one child per setting; skipped when there are none.
fn settings_group<W: Write>(
    xml: &mut XmlWriter<W>,
    element: &str,
    attrs: &[(&str, &str)],
    settings: &Settings,
) -> io::Result<()> {
    if settings.is_empty() {
        return Ok(());
    }
    xml.open(element, attrs)?;
    for (name, value) in settings.entries() {
        xml.text_element(name, &[], value)?;
    }
    xml.close()
}

fn tool<W: Write>(
    xml: &mut XmlWriter<W>,
    element: &str,
    write: impl FnOnce(&mut Settings),
) -> io::Result<()> {
    let mut settings = Settings::new(Dialect::Vcxproj);
    write(&mut settings);
    settings_group(xml, element, &[], &settings)
}

fn item_definitions<W: Write>(xml: &mut XmlWriter<W>, config: &Configuration) -> io::Result<()> {
    let cond = condition(&config.name());
    xml.open("ItemDefinitionGroup", &[("Condition", cond.as_str())])?;

    tool(xml, "ClCompile", |s| config.compiler.write_settings(s))?;
    if config.uses_linker() {
        tool(xml, "Link", |s| config.linker.write_settings(s))?;
    } else if config.uses_librarian() {
        tool(xml, "Lib", |s| config.librarian.write_settings(s))?;
    }
    tool(xml, "Midl", |s| config.midl.write_settings(s))?;
    tool(xml, "ResourceCompile", |s| config.resource.write_settings(s))?;
    for event in [&config.pre_build, &config.pre_link, &config.post_build] {
        if !event.is_empty() {
            let (_, element) = event.kind.names();
            tool(xml, element, |s| event.write_settings(s))?;
        }
    }
    tool(xml, "CustomBuildStep", |s| config.custom_build.write_settings(s))?;

    xml.close()
}

struct ItemsSink<'x, W: Write> {
    xml: &'x mut XmlWriter<W>,
}

impl<W: Write> TreeSink for ItemsSink<'_, W> {
    fn begin_folder(&mut self, folder: &FolderEvent) -> io::Result<()> {
        if folder.depth == 0 {
            self.xml.open("ItemGroup", &[])?;
        }
        Ok(())
    }

    fn end_folder(&mut self, folder: &FolderEvent) -> io::Result<()> {
        if folder.depth == 0 {
            self.xml.close()?;
        }
        Ok(())
    }

    fn file(&mut self, file: &FileEvent) -> io::Result<()> {
        let include = [("Include", file.path.as_str())];
        if !file.has_overrides() {
            return self.xml.empty(file.item_type, &include);
        }

        self.xml.open(file.item_type, &include)?;
        for config in file.configs.iter().filter(|c| c.is_overridden()) {
            let cond = condition(&config.configuration);
            let attrs = [("Condition", cond.as_str())];
            if config.excluded {
                self.xml.text_element("ExcludedFromBuild", &attrs, "true")?;
            }
            if let Some(custom) = config.custom_build.filter(|c| !c.is_empty()) {
                let mut settings = Settings::new(Dialect::Vcxproj);
                custom.write_settings(&mut settings);
                for (name, value) in settings.entries() {
                    self.xml.text_element(name, &attrs, value)?;
                }
            }
        }
        self.xml.close()
    }
}

struct FilterDefinition {
    path: String,
    guid: String,
    extensions: &'static str,
    parse_files: bool,
}

/// Collects the filter map while the body is written.
#[derive(Default)]
struct FiltersSink {
    filters: Vec<FilterDefinition>,
    /// `(item type, path, folder)` in walk order.
    items: Vec<(&'static str, String, String)>,
}

impl TreeSink for FiltersSink {
    fn begin_folder(&mut self, folder: &FolderEvent) -> io::Result<()> {
        let top = folder.depth == 0;
        self.filters.push(FilterDefinition {
            path: folder.path.clone(),
            guid: folder.guid.clone(),
            extensions: if top { folder.role.extensions() } else { "" },
            parse_files: !top || folder.role.parse_files(),
        });
        Ok(())
    }

    fn end_folder(&mut self, _folder: &FolderEvent) -> io::Result<()> {
        Ok(())
    }

    fn file(&mut self, file: &FileEvent) -> io::Result<()> {
        self.items
            .push((file.item_type, file.path.clone(), file.folder.to_string()));
        Ok(())
    }
}

impl FiltersSink {
    fn write<W: Write>(&self, out: W) -> io::Result<W> {
        let mut xml = XmlWriter::new(out, INDENT);
        xml.declaration("utf-8")?;
        xml.open("Project", &[("ToolsVersion", "4.0"), ("xmlns", NAMESPACE)])?;

        if !self.filters.is_empty() {
            xml.open("ItemGroup", &[])?;
            for filter in &self.filters {
                xml.open("Filter", &[("Include", filter.path.as_str())])?;
                xml.text_element("UniqueIdentifier", &[], &filter.guid)?;
                if !filter.extensions.is_empty() {
                    xml.text_element("Extensions", &[], filter.extensions)?;
                }
                if !filter.parse_files {
                    xml.text_element("ParseFiles", &[], "false")?;
                }
                xml.close()?;
            }
            xml.close()?;
        }

        // One item group per item type, first appearance first.
        let mut types: Vec<&str> = Vec::new();
        for (item_type, _, _) in &self.items {
            if !types.contains(item_type) {
                types.push(*item_type);
            }
        }
        for item_type in types {
            xml.open("ItemGroup", &[])?;
            for (_, path, folder) in self.items.iter().filter(|(t, _, _)| *t == item_type) {
                xml.open(item_type, &[("Include", path.as_str())])?;
                xml.text_element("Filter", &[], folder)?;
                xml.close()?;
            }
            xml.close()?;
        }

        xml.finish()
    }
}

/// Writes `project` as a `.vcxproj` into `body` and its filter map into
/// `filters`.
pub fn write_vcxproj<W: Write, F: Write>(
    project: &Project,
    toolset: ToolsetVersion,
    options: &WalkOptions,
    body: W,
    filters: F,
) -> io::Result<(W, F)> {
    let mut xml = XmlWriter::new(body, INDENT);
    let guid = project.guid_string();

    xml.declaration("utf-8")?;
    xml.open(
        "Project",
        &[
            ("DefaultTargets", "Build"),
            ("ToolsVersion", toolset.tools_version()),
            ("xmlns", NAMESPACE),
        ],
    )?;

    xml.open("ItemGroup", &[("Label", "ProjectConfigurations")])?;
    for config in project.configurations() {
        let name = config.name();
        xml.open("ProjectConfiguration", &[("Include", name.as_str())])?;
        xml.text_element("Configuration", &[], &config.build_type)?;
        xml.text_element("Platform", &[], &config.platform)?;
        xml.close()?;
    }
    xml.close()?;

    xml.open("PropertyGroup", &[("Label", "Globals")])?;
    xml.text_element("ProjectGuid", &[], &guid)?;
    xml.text_element("RootNamespace", &[], &project.name)?;
    xml.text_element("Keyword", &[], "Win32Proj")?;
    xml.text_element("ProjectName", &[], &project.name)?;
    xml.close()?;

    xml.empty("Import", &[("Project", "$(VCTargetsPath)\\Microsoft.Cpp.Default.props")])?;
    for config in project.configurations() {
        let cond = condition(&config.name());
        settings_group(
            &mut xml,
            "PropertyGroup",
            &[("Condition", cond.as_str()), ("Label", "Configuration")],
            &config.general_settings(Dialect::Vcxproj),
        )?;
    }
    xml.empty("Import", &[("Project", "$(VCTargetsPath)\\Microsoft.Cpp.props")])?;

    xml.open("ImportGroup", &[("Label", "ExtensionSettings")])?;
    for rule in &project.rules {
        let props = format!("$(VCTargetsPath)\\BuildCustomizations\\{}.props", rule);
        xml.empty("Import", &[("Project", props.as_str())])?;
    }
    xml.close()?;

    let user_props_exists = format!("exists('{}')", USER_PROPS);
    for config in project.configurations() {
        let cond = condition(&config.name());
        xml.open("ImportGroup", &[("Label", "PropertySheets"), ("Condition", cond.as_str())])?;
        xml.empty(
            "Import",
            &[
                ("Project", USER_PROPS),
                ("Condition", user_props_exists.as_str()),
                ("Label", "LocalAppDataPlatform"),
            ],
        )?;
        xml.close()?;
    }
    xml.empty("PropertyGroup", &[("Label", "UserMacros")])?;

    for config in project.configurations() {
        let cond = condition(&config.name());
        settings_group(&mut xml, "PropertyGroup", &[("Condition", cond.as_str())], &config.output_settings())?;
    }
    for config in project.configurations() {
        item_definitions(&mut xml, config)?;
    }

    let mut filter_sink = FiltersSink::default();
    {
        let mut items = ItemsSink { xml: &mut xml };
        let mut sinks: [&mut dyn TreeSink; 2] = [&mut items, &mut filter_sink];
        walk::walk_project(project, options, &mut sinks)?;
    }

    xml.empty("Import", &[("Project", "$(VCTargetsPath)\\Microsoft.Cpp.targets")])?;
    xml.open("ImportGroup", &[("Label", "ExtensionTargets")])?;
    for rule in &project.rules {
        let targets = format!("$(VCTargetsPath)\\BuildCustomizations\\{}.targets", rule);
        xml.empty("Import", &[("Project", targets.as_str())])?;
    }
    xml.close()?;

    let body = xml.finish()?;
    let filters = filter_sink.write(filters)?;
    Ok((body, filters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterFile, FilterRole, FilterSet};
    use crate::model::{ConfigurationType, CustomBuildTool, TriState};
    use crate::project::ProjectSingleConfig;
    use uuid::Uuid;

    fn member(build_type: &str) -> ProjectSingleConfig {
        let mut configuration = Configuration::new(build_type, "x64");
        configuration.configuration_type = ConfigurationType::StaticLibrary;
        configuration.platform_toolset = "v143".into();
        configuration.primary_output = "core".into();
        configuration.primary_output_extension = "lib".into();
        configuration.librarian.suppress_startup_banner = TriState::True;
        configuration.apply_build_type_macro();

        let mut filters = FilterSet::default();
        for (path, role) in [
            ("src/core.cpp", FilterRole::Source),
            ("src/net/sock.cpp", FilterRole::Source),
            ("include/core.h", FilterRole::Header),
            ("README.md", FilterRole::Distribution),
        ] {
            filters.filter_mut(role).add(FilterFile {
                path: path.into(),
                excluded: build_type == "Debug" && path.contains("sock"),
                generated_from: None,
                custom_build: None,
            });
        }
        filters.filter_mut(FilterRole::Extra("lexer".into())).add(FilterFile {
            path: "src/scan.l".into(),
            excluded: false,
            generated_from: None,
            custom_build: Some(CustomBuildTool {
                command_line: vec!["flex a".into(), "flex b".into()],
                description: "Lexing".into(),
                outputs: vec!["gen\\scan.c".into()],
                additional_dependencies: Vec::new(),
            }),
        });

        ProjectSingleConfig {
            name: "core".into(),
            guid: Uuid::nil(),
            platform: "x64".into(),
            configuration,
            filters,
            rules: Vec::new(),
        }
    }

    fn render() -> (String, String) {
        let project = Project {
            name: "core".into(),
            guid: Uuid::nil(),
            platform: "x64".into(),
            members: vec![member("Debug"), member("Release")],
            rules: vec!["masm".into()],
        };
        let (body, filters) = write_vcxproj(
            &project,
            ToolsetVersion::Vs2022,
            &WalkOptions::default(),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        (String::from_utf8(body).unwrap(), String::from_utf8(filters).unwrap())
    }

    #[test]
    fn test_body_has_one_block_per_configuration() {
        let (body, _) = render();
        assert!(body.contains("<Project DefaultTargets=\"Build\" ToolsVersion=\"17.0\""));
        assert_eq!(body.matches("<ProjectConfiguration Include=").count(), 2);
        assert_eq!(body.matches("Label=\"Configuration\"").count(), 2);
        assert_eq!(body.matches("<ItemDefinitionGroup ").count(), 2);
        assert!(body.contains("<ConfigurationType>StaticLibrary</ConfigurationType>"));
        assert!(body.contains("<PlatformToolset>v143</PlatformToolset>"));
        assert!(body.contains("<Lib>"));
        assert!(!body.contains("<Link>"));
        assert!(body.contains("<PreprocessorDefinitions>NDEBUG;%(PreprocessorDefinitions)</PreprocessorDefinitions>"));
        assert!(body.contains("BuildCustomizations\\masm.props"));
        assert!(body.contains("BuildCustomizations\\masm.targets"));
        assert!(body.contains("<ProjectGuid>{00000000-0000-0000-0000-000000000000}</ProjectGuid>"));
    }

    #[test]
    fn test_items_and_overrides() {
        let (body, _) = render();
        assert!(body.contains("<ClCompile Include=\"src\\core.cpp\" />"));
        assert!(body.contains("<ClInclude Include=\"include\\core.h\" />"));
        assert!(body.contains("<None Include=\"README.md\" />"));
        assert!(body.contains(
            "<ExcludedFromBuild Condition=\"'$(Configuration)|$(Platform)'=='Debug|x64'\">true</ExcludedFromBuild>"
        ));
        assert_eq!(body.matches("<ExcludedFromBuild ").count(), 1);
        assert!(body.contains("<CustomBuild Include=\"src\\scan.l\">"));
        assert!(body.contains("flex a\r\nif errorlevel 1 goto VCEnd\r\nflex b</Command>"));
        assert_eq!(body.matches("<Outputs Condition=").count(), 2);
    }

    #[test]
    fn test_filter_map_matches_the_body() {
        let (body, filters) = render();
        assert!(filters.contains("<Filter Include=\"Source Files\">"));
        assert!(filters.contains(&format!("<UniqueIdentifier>{}</UniqueIdentifier>", FilterRole::Source.guid())));
        assert!(filters.contains("<Filter Include=\"Source Files\\src\\net\">"));
        assert!(filters.contains("<Filter>Source Files\\src\\net</Filter>"));
        assert!(filters.contains("<ParseFiles>false</ParseFiles>"));

        // Every item of the body appears once in the filter map.
        for line in body.lines().filter(|l| l.contains(" Include=\"") && !l.contains("ProjectConfiguration") && !l.contains("Import")) {
            let start = line.find("Include=\"").unwrap() + 9;
            let path = &line[start..start + line[start..].find('"').unwrap()];
            assert_eq!(filters.matches(&format!("Include=\"{}\"", path)).count(), 1, "{}", path);
        }
    }
}
