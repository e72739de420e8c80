//! Project assembly.
//!
//! Each (build type, platform) pair of a target is built separately into a
//! [`ProjectSingleConfig`]. [`assemble`] merges the members of one logical
//! target into a [`Project`]: identity, name and shared metadata come from
//! the first member, and every member's configuration is kept.

use crate::diagnostics::Diagnostics;
use crate::filters::{Filter, FilterRole, FilterSet};
use crate::guid;
use crate::model::Configuration;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSingleConfig {
    pub name: String,
    pub guid: Uuid,
    pub platform: String,
    pub configuration: Configuration,
    pub filters: FilterSet,
    /// Build customization names (`masm`, ...).
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub guid: Uuid,
    pub platform: String,
    pub members: Vec<ProjectSingleConfig>,
    pub rules: Vec<String>,
}

impl Project {
    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.members.iter().map(|m| &m.configuration)
    }

    /// Distinct platforms in member order.
    pub fn platforms(&self) -> Vec<&str> {
        let mut platforms: Vec<&str> = Vec::new();
        for member in &self.members {
            if !platforms.contains(&member.configuration.platform.as_str()) {
                platforms.push(&member.configuration.platform);
            }
        }
        platforms
    }

    /// Roles present in any member, in display order.
    pub fn roles(&self) -> BTreeSet<FilterRole> {
        self.members
            .iter()
            .flat_map(|m| m.filters.iter().map(|f| f.role.clone()))
            .collect()
    }

    /// Every member's filter for `role`, in member order.
    pub fn filters_for<'a>(&'a self, role: &FilterRole) -> Vec<&'a Filter> {
        self.members
            .iter()
            .filter_map(|m| m.filters.filter(role))
            .collect()
    }

    pub fn guid_string(&self) -> String {
        guid::format_guid(&self.guid)
    }
}

/// Merges the single-configuration projects of one target. Returns `None`
/// (with an error diagnostic) when `singles` is empty.
///
/// Members whose file set differs from the first member's, or that repeat
/// an already merged configuration, are dropped with a warning.
pub fn assemble(
    name: &str,
    singles: Vec<ProjectSingleConfig>,
    diag: &mut Diagnostics,
) -> Option<Project> {
    let mut singles = singles.into_iter();
    let Some(first) = singles.next() else {
        diag.error(format!("project '{}' has no configurations, nothing generated", name));
        return None;
    };

    let reference = first.filters.paths();
    let mut project = Project {
        name: first.name.clone(),
        guid: first.guid,
        platform: first.platform.clone(),
        members: Vec::new(),
        rules: first.rules.clone(),
    };
    project.members.push(first);

    for single in singles {
        let config_name = single.configuration.name();
        if project
            .configurations()
            .any(|c| c.name().eq_ignore_ascii_case(&config_name))
        {
            diag.warn(format!(
                "project '{}': configuration '{}' given twice, keeping the first",
                project.name, config_name
            ));
            continue;
        }
        if single.filters.paths() != reference {
            diag.warn(format!(
                "project '{}': file set of '{}' differs from '{}', configuration dropped",
                project.name,
                config_name,
                project.members[0].configuration.name()
            ));
            continue;
        }
        for rule in &single.rules {
            if !project.rules.contains(rule) {
                project.rules.push(rule.clone());
            }
        }
        project.members.push(single);
    }
    Some(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterFile, FilterRole};

    fn single(build_type: &str, platform: &str, files: &[&str]) -> ProjectSingleConfig {
        let mut filters = FilterSet::default();
        for path in files {
            filters.filter_mut(FilterRole::Source).add(FilterFile {
                path: path.to_string(),
                excluded: false,
                generated_from: None,
                custom_build: None,
            });
        }
        ProjectSingleConfig {
            name: "core".to_string(),
            guid: guid::derive_from_key(&format!("core-{}", build_type)).unwrap(),
            platform: platform.to_string(),
            configuration: Configuration::new(build_type, platform),
            filters,
            rules: vec!["masm".to_string()],
        }
    }

    #[test]
    fn test_two_configurations_merge_under_one_identity() {
        let debug = single("Debug", "x64", &["src/core.cpp"]);
        let expected = debug.guid;
        let release = single("Release", "x64", &["src/core.cpp"]);

        let mut diag = Diagnostics::silent();
        let project = assemble("core", vec![debug, release], &mut diag).unwrap();
        assert_eq!(project.members.len(), 2);
        assert_eq!(project.guid, expected);
        assert_eq!(project.rules, vec!["masm"]);
        assert_eq!(project.platforms(), vec!["x64"]);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_zero_members_is_an_error() {
        let mut diag = Diagnostics::silent();
        assert!(assemble("ghost", Vec::new(), &mut diag).is_none());
        assert!(diag.mentions("ghost"));
    }

    #[test]
    fn test_mismatched_and_duplicate_members_are_dropped() {
        let members = vec![
            single("Debug", "x64", &["src/core.cpp"]),
            single("Release", "x64", &["src/core.cpp", "src/extra.cpp"]),
            single("debug", "x64", &["src/core.cpp"]),
            single("Debug", "Win32", &["SRC/Core.cpp"]),
        ];
        let mut diag = Diagnostics::silent();
        let project = assemble("core", members, &mut diag).unwrap();
        let names: Vec<String> = project.configurations().map(Configuration::name).collect();
        assert_eq!(names, vec!["Debug|x64", "Debug|Win32"]);
        assert_eq!(diag.warnings().count(), 2);
        assert_eq!(project.platforms(), vec!["x64", "Win32"]);
    }
}
