//! File classification into display filters.
//!
//! Every input file lands in exactly one [`Filter`]. Files attached to a
//! custom build rule keep the role the rule gives them; everything else is
//! classified by extension, then by the list it was declared in.

use crate::guid;
use crate::model::CustomBuildTool;
use crate::paths;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// Semantic role of a filter. Ordering is display order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterRole {
    Source,
    Header,
    Generated,
    LexYacc,
    Translation,
    Form,
    Resource,
    Deployment,
    Distribution,
    /// Files of a custom build rule, named after the rule.
    Extra(String),
}

impl FilterRole {
    pub const BUILTIN: [FilterRole; 9] = [
        FilterRole::Source,
        FilterRole::Header,
        FilterRole::Generated,
        FilterRole::LexYacc,
        FilterRole::Translation,
        FilterRole::Form,
        FilterRole::Resource,
        FilterRole::Deployment,
        FilterRole::Distribution,
    ];

    pub fn name(&self) -> &str {
        match self {
            FilterRole::Source => "Source Files",
            FilterRole::Header => "Header Files",
            FilterRole::Generated => "Generated Files",
            FilterRole::LexYacc => "Lex / Yacc Files",
            FilterRole::Translation => "Translation Files",
            FilterRole::Form => "Form Files",
            FilterRole::Resource => "Resource Files",
            FilterRole::Deployment => "Deployment Files",
            FilterRole::Distribution => "Distribution Files",
            FilterRole::Extra(name) => name,
        }
    }

    /// Accepts a display name (`Header Files`) or a short name (`header`).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::BUILTIN.into_iter().find(|role| {
            let display = role.name().to_lowercase();
            display == lower || display.split_whitespace().next() == Some(lower.as_str())
        })
    }

    pub fn guid(&self) -> String {
        let fixed = match self {
            FilterRole::Source => "{4FC737F1-C7A5-4376-A066-2A32D752A2FF}",
            FilterRole::Header => "{93995380-89BD-4b04-88EB-625FBE52EBFB}",
            FilterRole::Generated => "{71ED8ED8-ACB9-4CE9-BBE1-E00B30144E11}",
            FilterRole::LexYacc => "{E12AE0D2-192F-4d59-BD23-7D3FA58D3183}",
            FilterRole::Translation => "{639EADAA-A684-42e4-A9AD-28FC9BCB8F7C}",
            FilterRole::Form => "{99349809-55BA-4b9d-BF79-8FDBB0286EB3}",
            FilterRole::Resource => "{D9D6E242-F8AF-46E4-B9FD-80ECBC20BA3E}",
            FilterRole::Deployment => "{D9D6E243-F8AF-46E4-B9FD-80ECBC20BA3F}",
            FilterRole::Distribution => "{B83CAFC7-1DEB-4a5c-8F6E-6D5F8ADCC7B1}",
            FilterRole::Extra(name) => return guid::format_guid(&guid::filter_guid(name)),
        };
        fixed.to_string()
    }

    /// `Filter` pattern attribute / `Extensions` element.
    pub fn extensions(&self) -> &'static str {
        match self {
            FilterRole::Source => "cpp;c;cxx;cc;c++;def;odl;idl;hpj;bat;asm;asmx",
            FilterRole::Header => "h;hh;hpp;hxx;hm;inl;inc;xsd",
            FilterRole::Generated => "cpp;c;cxx;moc;h;def;odl;idl;res",
            FilterRole::LexYacc => "l;y",
            FilterRole::Translation => "ts;xlf",
            FilterRole::Form => "ui",
            FilterRole::Resource => {
                "qrc;rc;ico;cur;bmp;dlg;rc2;rct;bin;rgs;gif;jpg;jpeg;jpe;resx;tiff;tif;png;wav"
            }
            FilterRole::Deployment | FilterRole::Distribution | FilterRole::Extra(_) => "",
        }
    }

    /// Whether the IDE parses files of this filter for symbols.
    pub fn parse_files(&self) -> bool {
        matches!(
            self,
            FilterRole::Source | FilterRole::Header | FilterRole::LexYacc | FilterRole::Form
        )
    }
}

impl fmt::Display for FilterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A file inside a filter. Per-configuration data lives here because every
/// single-configuration project carries its own filter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFile {
    pub path: String,
    pub excluded: bool,
    /// Input this file is generated from, for generated files.
    pub generated_from: Option<String>,
    pub custom_build: Option<CustomBuildTool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub role: FilterRole,
    files: BTreeMap<String, FilterFile>,
}

impl Filter {
    pub fn new(role: FilterRole) -> Self {
        Self {
            role,
            files: BTreeMap::new(),
        }
    }

    /// Adds `file` unless the path is already present. Returns whether it
    /// was added.
    pub fn add(&mut self, file: FilterFile) -> bool {
        let key = file.path.to_lowercase();
        if self.files.contains_key(&key) {
            return false;
        }
        self.files.insert(key, file);
        true
    }

    /// Adds every file of `other` not already present. Existing metadata wins.
    pub fn merge_from(&mut self, other: &Filter) {
        for file in other.files.values() {
            self.add(file.clone());
        }
    }

    pub fn files(&self) -> impl Iterator<Item = &FilterFile> {
        self.files.values()
    }

    pub fn get(&self, path: &str) -> Option<&FilterFile> {
        self.files.get(&path.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// All filters of one project configuration, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: BTreeMap<FilterRole, Filter>,
}

impl FilterSet {
    pub fn filter(&self, role: &FilterRole) -> Option<&Filter> {
        self.filters.get(role)
    }

    pub fn filter_mut(&mut self, role: FilterRole) -> &mut Filter {
        self.filters
            .entry(role.clone())
            .or_insert_with(|| Filter::new(role))
    }

    /// Non-empty filters in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.values().filter(|f| !f.is_empty())
    }

    /// Filter holding `path`, if any.
    pub fn locate(&self, path: &str) -> Option<(&Filter, &FilterFile)> {
        self.filters
            .values()
            .find_map(|filter| filter.get(path).map(|file| (filter, file)))
    }

    /// Lower-cased paths of every file.
    pub fn paths(&self) -> BTreeSet<String> {
        self.filters
            .values()
            .flat_map(|f| f.files.keys().cloned())
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.filters.values().map(Filter::len).sum()
    }

    /// Merges filters sharing a role. Earlier contributors keep their files.
    pub fn merge_from(&mut self, other: &FilterSet) {
        for filter in other.filters.values() {
            self.filter_mut(filter.role.clone()).merge_from(filter);
        }
    }
}

/// Extension table used for classification.
#[derive(Debug, Clone)]
pub struct RoleTable {
    entries: Vec<(FilterRole, Vec<String>)>,
}

impl Default for RoleTable {
    fn default() -> Self {
        let table = [
            (FilterRole::Source, "c;cpp;cxx;cc;c++;asm;def;idl;odl"),
            (FilterRole::Header, "h;hh;hpp;hxx;h++;inl;inc"),
            (FilterRole::LexYacc, "l;y"),
            (FilterRole::Translation, "ts;xlf"),
            (FilterRole::Form, "ui"),
            (
                FilterRole::Resource,
                "rc;qrc;ico;cur;bmp;gif;jpg;jpeg;png;tif;tiff;wav;resx;rc2",
            ),
        ];
        Self {
            entries: table
                .into_iter()
                .map(|(role, exts)| (role, exts.split(';').map(str::to_string).collect()))
                .collect(),
        }
    }
}

impl RoleTable {
    /// Prepends extensions for `role`, taking precedence over the defaults.
    pub fn with(mut self, role: FilterRole, extensions: &[&str]) -> Self {
        let exts = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self.entries.insert(0, (role, exts));
        self
    }

    pub fn role_for(&self, path: &str) -> Option<FilterRole> {
        let ext = paths::extension(path)?;
        self.entries
            .iter()
            .find(|(_, exts)| exts.contains(&ext))
            .map(|(role, _)| role.clone())
    }
}

/// One file as declared by the build description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: String,
    /// Role implied by the list the file was declared in.
    pub declared: Option<FilterRole>,
    /// Custom build rule attached to the file.
    pub tool: Option<String>,
    pub custom_build: Option<CustomBuildTool>,
    pub generated_from: Option<String>,
    pub excluded: bool,
}

impl SourceEntry {
    pub fn new(path: impl Into<String>, declared: Option<FilterRole>) -> Self {
        Self {
            path: path.into(),
            declared,
            ..Self::default()
        }
    }

    fn sort_key(&self) -> (String, Option<FilterRole>, Option<String>, Option<String>, bool) {
        (
            self.path.to_lowercase(),
            self.declared.clone(),
            self.tool.clone(),
            self.generated_from.clone(),
            self.excluded,
        )
    }
}

fn role_of(entry: &SourceEntry, table: &RoleTable) -> FilterRole {
    if let Some(tool) = &entry.tool {
        return entry
            .declared
            .clone()
            .unwrap_or_else(|| FilterRole::Extra(tool.clone()));
    }
    if entry.generated_from.is_some() || entry.declared == Some(FilterRole::Generated) {
        return FilterRole::Generated;
    }
    table
        .role_for(&entry.path)
        .or_else(|| entry.declared.clone())
        .unwrap_or(FilterRole::Distribution)
}

/// Buckets `entries` into filters. The result does not depend on input
/// order: entries are sorted first and the first entry for a path wins.
pub fn classify(entries: Vec<SourceEntry>, table: &RoleTable) -> FilterSet {
    let mut entries = entries;
    entries.sort_by_cached_key(SourceEntry::sort_key);

    let mut set = FilterSet::default();
    let mut seen = HashSet::new();
    for entry in entries {
        let path = paths::normalize(&entry.path);
        if !seen.insert(path.to_lowercase()) {
            continue;
        }
        let role = role_of(&entry, table);
        set.filter_mut(role).add(FilterFile {
            path,
            excluded: entry.excluded,
            generated_from: entry.generated_from,
            custom_build: entry.custom_build,
        });
    }
    set
}
