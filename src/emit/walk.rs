//! The one tree walk shared by every project emitter.
//!
//! [`walk_project`] visits the display tree of each filter role and feeds
//! structured events to any number of [`TreeSink`]s in a single pass. Folder
//! identifiers and file spellings are computed here once, so the inline and
//! the split project shapes cannot drift apart.

use crate::filters::{FilterFile, FilterRole};
use crate::guid;
use crate::model::CustomBuildTool;
use crate::paths;
use crate::project::Project;
use crate::tree::{self, FolderNode, TreeMode};
use std::io;

/// How files are spelled and arranged.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub mode: TreeMode,
    /// Prepended to relative file paths: the way from the project file's
    /// directory to the description's directory. Empty when they coincide.
    pub source_prefix: String,
}

#[derive(Debug, Clone)]
pub struct FolderEvent<'a> {
    pub role: &'a FilterRole,
    /// Segment name shown in the IDE.
    pub name: &'a str,
    /// Backslash-joined path from the role folder, e.g. `Source Files\net`.
    pub path: String,
    pub guid: String,
    /// 0 for the role folder itself.
    pub depth: usize,
}

/// Per-configuration state of one file.
#[derive(Debug, Clone)]
pub struct FileConfig<'a> {
    /// `Debug|x64`
    pub configuration: String,
    pub excluded: bool,
    pub custom_build: Option<&'a CustomBuildTool>,
}

impl FileConfig<'_> {
    /// Whether anything must be written for this configuration.
    pub fn is_overridden(&self) -> bool {
        self.excluded || self.custom_build.is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct FileEvent<'a> {
    /// Native spelling, relative to the project file.
    pub path: String,
    pub role: &'a FilterRole,
    /// Path of the containing folder, as in [`FolderEvent::path`].
    pub folder: &'a str,
    pub item_type: &'static str,
    pub configs: Vec<FileConfig<'a>>,
}

impl FileEvent<'_> {
    pub fn has_overrides(&self) -> bool {
        self.configs.iter().any(FileConfig::is_overridden)
    }
}

pub trait TreeSink {
    fn begin_folder(&mut self, folder: &FolderEvent) -> io::Result<()>;
    fn end_folder(&mut self, folder: &FolderEvent) -> io::Result<()>;
    fn file(&mut self, file: &FileEvent) -> io::Result<()>;
}

/// MSBuild item type of a file.
pub fn item_type(path: &str, custom_build: bool, rules: &[String]) -> &'static str {
    if custom_build {
        return "CustomBuild";
    }
    match paths::extension(path).as_deref() {
        Some("c" | "cpp" | "cxx" | "cc" | "c++") => "ClCompile",
        Some("h" | "hh" | "hpp" | "hxx" | "h++" | "inl") => "ClInclude",
        Some("rc") => "ResourceCompile",
        Some("idl" | "odl") => "Midl",
        Some("asm") if rules.iter().any(|r| r.eq_ignore_ascii_case("masm")) => "MASM",
        _ => "None",
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('\\') || path.as_bytes().get(1) == Some(&b':')
}

/// Spelling of `path` inside the project file.
pub fn project_path(path: &str, prefix: &str) -> String {
    if prefix.is_empty() || is_absolute(path) {
        paths::to_native(&paths::normalize(path))
    } else {
        paths::to_native(&paths::normalize(&format!("{}/{}", prefix, path)))
    }
}

struct Walker<'p, 's, 'k> {
    project: &'p Project,
    role: &'p FilterRole,
    options: &'p WalkOptions,
    sinks: &'s mut [&'k mut dyn TreeSink],
}

impl<'p> Walker<'p, '_, '_> {
    fn configs_of(&self, file: &FilterFile) -> Vec<FileConfig<'p>> {
        self.project
            .members
            .iter()
            .map(|member| {
                let own = member
                    .filters
                    .filter(self.role)
                    .and_then(|f| f.get(&file.path))
                    .or_else(|| member.filters.locate(&file.path).map(|(_, f)| f));
                FileConfig {
                    configuration: member.configuration.name(),
                    excluded: own.is_some_and(|f| f.excluded),
                    custom_build: own.and_then(|f| f.custom_build.as_ref()),
                }
            })
            .collect()
    }

    fn folder(&mut self, node: &'p FolderNode, path: String, depth: usize) -> io::Result<()> {
        let guid = if depth == 0 {
            self.role.guid()
        } else {
            guid::format_guid(&guid::filter_guid(&path))
        };
        let event = FolderEvent {
            role: self.role,
            name: &node.name,
            path,
            guid,
            depth,
        };
        for sink in self.sinks.iter_mut() {
            sink.begin_folder(&event)?;
        }

        for child in node.folders.values() {
            let child_path = format!("{}\\{}", event.path, child.name);
            self.folder(child, child_path, depth + 1)?;
        }
        for file in node.files.values() {
            let configs = self.configs_of(file);
            let custom = configs.iter().any(|c| c.custom_build.is_some_and(|t| !t.is_empty()));
            let file_event = FileEvent {
                path: project_path(&file.path, &self.options.source_prefix),
                role: self.role,
                folder: &event.path,
                item_type: item_type(&file.path, custom, &self.project.rules),
                configs,
            };
            for sink in self.sinks.iter_mut() {
                sink.file(&file_event)?;
            }
        }

        for sink in self.sinks.iter_mut() {
            sink.end_folder(&event)?;
        }
        Ok(())
    }
}

/// Walks every non-empty role of `project` in display order.
pub fn walk_project(
    project: &Project,
    options: &WalkOptions,
    sinks: &mut [&mut dyn TreeSink],
) -> io::Result<()> {
    for role in project.roles() {
        let filters = project.filters_for(&role);
        let root = tree::build_tree(filters, options.mode);
        if root.is_empty() {
            continue;
        }
        let mut walker = Walker {
            project,
            role: &role,
            options,
            sinks: &mut *sinks,
        };
        walker.folder(&root, role.name().to_string(), 0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterSet;
    use crate::model::Configuration;
    use crate::project::ProjectSingleConfig;
    use uuid::Uuid;

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl TreeSink for Recorder {
        fn begin_folder(&mut self, folder: &FolderEvent) -> io::Result<()> {
            self.log.push(format!("+{} {}", folder.path, folder.guid));
            Ok(())
        }

        fn end_folder(&mut self, folder: &FolderEvent) -> io::Result<()> {
            self.log.push(format!("-{}", folder.path));
            Ok(())
        }

        fn file(&mut self, file: &FileEvent) -> io::Result<()> {
            let excluded: Vec<&str> = file
                .configs
                .iter()
                .filter(|c| c.excluded)
                .map(|c| c.configuration.as_str())
                .collect();
            self.log.push(format!("{} {} {:?}", file.item_type, file.path, excluded));
            Ok(())
        }
    }

    fn member(build_type: &str, excluded: bool) -> ProjectSingleConfig {
        let mut filters = FilterSet::default();
        for (path, role) in [
            ("src/main.cpp", FilterRole::Source),
            ("src/net/sock.cpp", FilterRole::Source),
            ("include/app.h", FilterRole::Header),
        ] {
            filters.filter_mut(role).add(FilterFile {
                path: path.to_string(),
                excluded: excluded && path.contains("sock"),
                generated_from: None,
                custom_build: None,
            });
        }
        ProjectSingleConfig {
            name: "app".into(),
            guid: Uuid::nil(),
            platform: "x64".into(),
            configuration: Configuration::new(build_type, "x64"),
            filters,
            rules: Vec::new(),
        }
    }

    fn project() -> Project {
        Project {
            name: "app".into(),
            guid: Uuid::nil(),
            platform: "x64".into(),
            members: vec![member("Debug", false), member("Release", true)],
            rules: Vec::new(),
        }
    }

    #[test]
    fn test_every_sink_sees_the_same_events() {
        let project = project();
        let mut first = Recorder::default();
        let mut second = Recorder::default();
        let mut sinks: [&mut dyn TreeSink; 2] = [&mut first, &mut second];
        walk_project(&project, &WalkOptions::default(), &mut sinks).unwrap();
        assert_eq!(first.log, second.log);

        let source_guid = FilterRole::Source.guid();
        let net_guid = guid::format_guid(&guid::filter_guid("Source Files\\src\\net"));
        assert_eq!(
            first.log,
            vec![
                format!("+Source Files {}", source_guid),
                format!("+Source Files\\src {}", guid::format_guid(&guid::filter_guid("Source Files\\src"))),
                format!("+Source Files\\src\\net {}", net_guid),
                "ClCompile src\\net\\sock.cpp [\"Release|x64\"]".to_string(),
                "-Source Files\\src\\net".to_string(),
                "ClCompile src\\main.cpp []".to_string(),
                "-Source Files\\src".to_string(),
                "-Source Files".to_string(),
                format!("+Header Files {}", FilterRole::Header.guid()),
                format!("+Header Files\\include {}", guid::format_guid(&guid::filter_guid("Header Files\\include"))),
                "ClInclude include\\app.h []".to_string(),
                "-Header Files\\include".to_string(),
                "-Header Files".to_string(),
            ]
        );
    }

    #[test]
    fn test_source_prefix() {
        assert_eq!(project_path("src/a.cpp", "../app"), "..\\app\\src\\a.cpp");
        assert_eq!(project_path("src/a.cpp", ""), "src\\a.cpp");
        assert_eq!(project_path("C:/sdk/x.h", "../app"), "C:\\sdk\\x.h");
    }

    #[test]
    fn test_item_types() {
        let masm = vec!["masm".to_string()];
        assert_eq!(item_type("a.cpp", false, &[]), "ClCompile");
        assert_eq!(item_type("a.cpp", true, &[]), "CustomBuild");
        assert_eq!(item_type("a.hpp", false, &[]), "ClInclude");
        assert_eq!(item_type("a.rc", false, &[]), "ResourceCompile");
        assert_eq!(item_type("a.asm", false, &[]), "None");
        assert_eq!(item_type("a.asm", false, &masm), "MASM");
        assert_eq!(item_type("README", false, &[]), "None");
    }
}
