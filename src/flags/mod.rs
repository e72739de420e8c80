//! Option parser.
//!
//! Raw flag strings are tokenized and fed, one token at a time, to a tool's
//! [`FlagTarget`] implementation, which mutates the typed fields the token
//! implies. Nothing here fails: a token the tool does not understand, or one
//! the selected toolset cannot express, is kept verbatim in the tool's
//! additional options and reported to [`Diagnostics`].

pub mod compiler;
pub mod librarian;
pub mod linker;
pub mod midl;
pub mod resource;

use crate::diagnostics::Diagnostics;
use crate::toolset::ToolsetVersion;

/// Result of interpreting a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    /// Mapped onto typed fields.
    Applied,
    /// Recognized, but has no typed field. Kept verbatim without a diagnostic.
    Verbatim,
    /// Recognized, but not available on the selected toolset.
    Unsupported,
    Unknown,
}

/// A tool configuration that can be populated from command-line flags.
pub trait FlagTarget {
    /// Tool name used in diagnostics.
    const TOOL: &'static str;

    fn parse_flag(&mut self, flag: &str, toolset: ToolsetVersion) -> FlagOutcome;

    fn additional_options(&mut self) -> &mut Vec<String>;

    /// Whether `flag` accepts its value as the following token (`/D NAME`).
    fn takes_separate_value(&self, _flag: &str) -> bool {
        false
    }
}

/// Splits a flag string on whitespace, honoring double quotes the way the
/// MSVC command line does: quotes are removed, `\"` is a literal quote and
/// backslashes before a quote are halved. A quoted empty string yields no
/// token.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut backslashes = 0;

    for c in input.chars() {
        if c == '\\' {
            backslashes += 1;
            continue;
        }
        if c == '"' {
            current.push_str(&"\\".repeat(backslashes / 2));
            if backslashes % 2 == 1 {
                current.push('"');
            } else {
                quoted = !quoted;
            }
            backslashes = 0;
            continue;
        }
        current.push_str(&"\\".repeat(backslashes));
        backslashes = 0;
        if c.is_whitespace() && !quoted {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    current.push_str(&"\\".repeat(backslashes));
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Applies `tokens` in order. Returns how many tokens were not mapped onto
/// typed fields.
pub fn apply_flags<T: FlagTarget>(
    tool: &mut T,
    tokens: &[String],
    toolset: ToolsetVersion,
    diag: &mut Diagnostics,
) -> usize {
    let mut unmapped = 0;
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        let mut flag = token.clone();
        if tool.takes_separate_value(token)
            && let Some(next) = iter.peek()
            && is_separate_value(token, next)
        {
            flag = format!("{} {}", token, next);
            iter.next();
        }

        match tool.parse_flag(&flag, toolset) {
            FlagOutcome::Applied => {}
            FlagOutcome::Verbatim => tool.additional_options().push(flag),
            FlagOutcome::Unsupported => {
                diag.note(format!(
                    "{}: '{}' is not supported by {}, passed through verbatim",
                    T::TOOL,
                    flag,
                    toolset
                ));
                tool.additional_options().push(flag);
                unmapped += 1;
            }
            FlagOutcome::Unknown => {
                diag.warn(format!(
                    "{}: unknown option '{}', kept in additional options",
                    T::TOOL,
                    flag
                ));
                tool.additional_options().push(flag);
                unmapped += 1;
            }
        }
    }
    unmapped
}

/// Whether `next` is the value of the separate-value switch `switch`.
/// A `/`-led token is a value after a `-` switch, or when it reads as a
/// path (`/usr/include`).
fn is_separate_value(switch: &str, next: &str) -> bool {
    match next.strip_prefix('/') {
        Some(rest) => switch.starts_with('-') || rest.contains(['/', '\\']),
        None => !next.starts_with('-'),
    }
}

/// Flag body without its `/` or `-` prefix.
pub(crate) fn strip_switch(flag: &str) -> Option<&str> {
    flag.strip_prefix('/')
        .or_else(|| flag.strip_prefix('-'))
        .filter(|body| !body.is_empty())
}

/// Value after a switch name: separators `:` or `=`, whitespace and quotes
/// are trimmed.
pub(crate) fn option_value(rest: &str) -> &str {
    rest.trim_start()
        .trim_start_matches([':', '='])
        .trim()
        .trim_matches('"')
}

/// `""` enables, `"-"` disables.
pub(crate) fn toggle(rest: &str) -> Option<crate::model::TriState> {
    match rest {
        "" => Some(crate::model::TriState::True),
        "-" => Some(crate::model::TriState::False),
        _ => None,
    }
}

pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Adds a `;`-separated value list.
pub(crate) fn push_each(list: &mut Vec<String>, values: &str) {
    for value in values.split(';') {
        push_unique(list, value.trim());
    }
}

/// Parses a decimal or `0x` hexadecimal size.
pub(crate) fn parse_number(value: &str) -> Option<u64> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// `reserve[,commit]`
pub(crate) fn parse_size_pair(value: &str) -> Option<(u64, Option<u64>)> {
    let mut parts = value.splitn(2, ',');
    let reserve = parse_number(parts.next()?)?;
    let commit = match parts.next() {
        Some(commit) => Some(parse_number(commit)?),
        None => None,
    };
    Some((reserve, commit))
}
