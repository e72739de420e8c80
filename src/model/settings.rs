//! The serialization boundary for tool options.
//!
//! Tools describe every field through a `Settings` collector. Defaulted
//! values (unset tri-states, `NotSet` choices, empty strings and lists) are
//! dropped here and nowhere else, so emitters only ever see values that must
//! be written.

use super::{Choice, Dialect, TriState};

#[derive(Debug, Clone)]
pub struct Settings {
    dialect: Dialect,
    entries: Vec<(&'static str, String)>,
}

impl Settings {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            entries: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value written for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn name(&self, legacy: &'static str, msbuild: &'static str) -> Option<&'static str> {
        let name = match self.dialect {
            Dialect::Vcproj => legacy,
            Dialect::Vcxproj => msbuild,
        };
        (!name.is_empty()).then_some(name)
    }

    /// Always-present value (the caller decided it must be written).
    pub fn raw(&mut self, legacy: &'static str, msbuild: &'static str, value: impl Into<String>) {
        if let Some(name) = self.name(legacy, msbuild) {
            self.entries.push((name, value.into()));
        }
    }

    pub fn flag(&mut self, legacy: &'static str, msbuild: &'static str, value: TriState) {
        if let (Some(name), Some(token)) = (self.name(legacy, msbuild), value.token()) {
            self.entries.push((name, token.to_string()));
        }
    }

    pub fn choice<C: Choice>(&mut self, legacy: &'static str, msbuild: &'static str, value: C) {
        if let (Some(name), Some(token)) = (self.name(legacy, msbuild), value.token(self.dialect)) {
            self.entries.push((name, token.to_string()));
        }
    }

    pub fn text(&mut self, legacy: &'static str, msbuild: &'static str, value: &str) {
        if value.is_empty() {
            return;
        }
        if let Some(name) = self.name(legacy, msbuild) {
            self.entries.push((name, value.to_string()));
        }
    }

    pub fn number(&mut self, legacy: &'static str, msbuild: &'static str, value: Option<u64>) {
        if let (Some(name), Some(value)) = (self.name(legacy, msbuild), value) {
            self.entries.push((name, value.to_string()));
        }
    }

    /// `;`-separated list. MSBuild lists inherit the item default.
    pub fn list(&mut self, legacy: &'static str, msbuild: &'static str, values: &[String]) {
        self.joined(legacy, msbuild, values, ";");
    }

    /// Library lists are space separated in `.vcproj` files.
    pub fn libraries(&mut self, legacy: &'static str, msbuild: &'static str, values: &[String]) {
        let separator = match self.dialect {
            Dialect::Vcproj => " ",
            Dialect::Vcxproj => ";",
        };
        self.joined(legacy, msbuild, values, separator);
    }

    fn joined(&mut self, legacy: &'static str, msbuild: &'static str, values: &[String], sep: &str) {
        if values.is_empty() {
            return;
        }
        let Some(name) = self.name(legacy, msbuild) else {
            return;
        };
        let mut value = values.join(sep);
        if self.dialect == Dialect::Vcxproj {
            value.push_str(&format!(";%({})", name));
        }
        self.entries.push((name, value));
    }

    /// Verbatim command-line options, quoted when they contain spaces.
    pub fn options(&mut self, legacy: &'static str, msbuild: &'static str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        let Some(name) = self.name(legacy, msbuild) else {
            return;
        };
        let mut value = values
            .iter()
            .map(|v| {
                if v.contains(' ') && !v.starts_with('"') {
                    format!("\"{}\"", v)
                } else {
                    v.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        if self.dialect == Dialect::Vcxproj {
            value.push_str(&format!(" %({})", name));
        }
        self.entries.push((name, value));
    }
}
