//! Display trees for filters.
//!
//! A filter's files are arranged either as nested folders following their
//! directory segments, or as one flat level ordered by file name. The tree
//! can also be rendered for the terminal:
//!
//! ```text
//! Source Files
//! ├── net
//! │   └── sock.cpp
//! └── main.cpp
//! ```

use crate::filters::{Filter, FilterFile};
use crate::paths;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeMode {
    #[default]
    Hierarchical,
    Flat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderNode {
    /// Display name (first spelling seen).
    pub name: String,
    /// Sub-folders keyed by lower-cased name.
    pub folders: BTreeMap<String, FolderNode>,
    /// Files keyed so that iteration order is deterministic.
    pub files: BTreeMap<String, FilterFile>,
}

impl FolderNode {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.values().map(FolderNode::file_count).sum::<usize>()
    }

    fn insert_hierarchical(&mut self, file: &FilterFile) {
        let normalized = paths::normalize(&file.path);
        let mut segments: Vec<&str> = normalized
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".." && !s.ends_with(':'))
            .collect();
        let Some(name) = segments.pop() else {
            return;
        };

        let mut node = self;
        for segment in segments {
            node = node
                .folders
                .entry(segment.to_lowercase())
                .or_insert_with(|| FolderNode::named(segment));
        }
        node.files
            .entry(format!("{}|{}", name.to_lowercase(), normalized.to_lowercase()))
            .or_insert_with(|| file.clone());
    }

    fn insert_flat(&mut self, file: &FilterFile) {
        let normalized = paths::normalize(&file.path);
        let name = paths::file_name(&normalized).to_lowercase();
        // The path suffix keeps same-named files from different directories apart.
        self.files
            .entry(format!("{}|{}", name, normalized.to_lowercase()))
            .or_insert_with(|| file.clone());
    }
}

/// Builds the display tree of the union of `filters` (one per contributing
/// configuration). Files are merged by path; the first contributor wins.
pub fn build_tree<'a>(filters: impl IntoIterator<Item = &'a Filter>, mode: TreeMode) -> FolderNode {
    let mut merged: Option<Filter> = None;
    for filter in filters {
        match merged.as_mut() {
            Some(m) => m.merge_from(filter),
            None => merged = Some(filter.clone()),
        }
    }
    let Some(merged) = merged else {
        return FolderNode::default();
    };

    let mut root = FolderNode::named(merged.role.name());
    for file in merged.files() {
        match mode {
            TreeMode::Hierarchical => root.insert_hierarchical(file),
            TreeMode::Flat => root.insert_flat(file),
        }
    }
    root
}

/// ASCII rendering, folders first.
pub fn render(root: &FolderNode) -> String {
    let mut out = format!("{}\n", root.name);
    render_children(root, "", &mut out);
    out
}

fn render_children(node: &FolderNode, prefix: &str, out: &mut String) {
    let count = node.folders.len() + node.files.len();
    let mut index = 0;

    for folder in node.folders.values() {
        index += 1;
        let last = index == count;
        out.push_str(&format!("{}{} {}\n", prefix, if last { "└──" } else { "├──" }, folder.name));
        let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(folder, &child_prefix, out);
    }
    for file in node.files.values() {
        index += 1;
        let last = index == count;
        out.push_str(&format!(
            "{}{} {}\n",
            prefix,
            if last { "└──" } else { "├──" },
            paths::file_name(&file.path)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterRole;

    fn file(path: &str, excluded: bool) -> FilterFile {
        FilterFile {
            path: path.to_string(),
            excluded,
            generated_from: None,
            custom_build: None,
        }
    }

    fn sources() -> Filter {
        let mut filter = Filter::new(FilterRole::Source);
        filter.add(file("src/main.cpp", false));
        filter.add(file("src/net/sock.cpp", false));
        filter.add(file("tests/main.cpp", false));
        filter
    }

    #[test]
    fn test_hierarchical_nests_by_directory() {
        let tree = build_tree([&sources()], TreeMode::Hierarchical);
        assert_eq!(tree.name, "Source Files");
        let src = &tree.folders["src"];
        assert_eq!(src.files.len(), 1);
        assert_eq!(src.folders["net"].files.len(), 1);
        assert_eq!(tree.folders["tests"].files.len(), 1);
        assert_eq!(tree.file_count(), 3);
    }

    #[test]
    fn test_flat_keeps_same_named_files_apart() {
        let tree = build_tree([&sources()], TreeMode::Flat);
        assert!(tree.folders.is_empty());
        let names: Vec<&str> = tree.files.values().map(|f| f.path.as_str()).collect();
        assert_eq!(names, vec!["src/main.cpp", "tests/main.cpp", "src/net/sock.cpp"]);
    }

    #[test]
    fn test_merge_across_configurations() {
        let debug = sources();
        let mut release = Filter::new(FilterRole::Source);
        release.add(file("src/main.cpp", true));
        release.add(file("src/release_only.cpp", false));

        let tree = build_tree([&debug, &release], TreeMode::Hierarchical);
        assert_eq!(tree.file_count(), 4);
        let main = tree.folders["src"]
            .files
            .values()
            .find(|f| f.path == "src/main.cpp")
            .unwrap();
        assert!(!main.excluded);
    }

    #[test]
    fn test_render() {
        let tree = build_tree([&sources()], TreeMode::Hierarchical);
        let text = render(&tree);
        assert!(text.starts_with("Source Files\n"));
        assert!(text.contains("│   ├── net\n"));
        assert!(text.contains("└── tests\n"));
    }
}
