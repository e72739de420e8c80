//! Path spelling helpers. Project files always use `\` separators.

use std::path::{Component, Path, PathBuf};

/// Windows spelling of `path`.
pub fn to_native(path: &str) -> String {
    path.replace('/', "\\")
}

/// Forward-slash spelling with `.` segments, empty segments and resolvable
/// `..` segments removed. Leading `..` segments are kept.
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." && !last.ends_with(':') => {
                    out.pop();
                }
                _ if absolute => {}
                _ => out.push(".."),
            },
            s => out.push(s),
        }
    }

    let joined = out.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Lexical relative path from directory `base` to `target`. Falls back to
/// `target` when the two share no root.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let target_parts: Vec<Component> =
        target.components().filter(|c| *c != Component::CurDir).collect();

    let common = base
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 && base.first().is_some_and(|c| matches!(c, Component::RootDir | Component::Prefix(_))) {
        return target.to_path_buf();
    }

    let mut out = PathBuf::new();
    for _ in common..base.len() {
        out.push("..");
    }
    for part in &target_parts[common..] {
        out.push(part.as_os_str());
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Native relative spelling used inside project and solution files.
pub fn native_relative(base: &Path, target: &Path) -> String {
    to_native(&relative_path(base, target).to_string_lossy())
}

/// Lower-cased file extension without the dot.
pub fn extension(path: &str) -> Option<String> {
    let name = file_name(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Last path segment, for either separator.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// File name without its last extension.
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
