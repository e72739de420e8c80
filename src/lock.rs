use crate::diagnostics::Diagnostics;
use crate::guid;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use uuid::Uuid;

pub const LOCK_FILE: &str = "vcgen.lock";

/// Pinned project GUIDs (`vcgen.lock`), keyed by project identity.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct GuidLock {
    #[serde(rename = "project", default)]
    pub projects: BTreeMap<String, String>,
}

impl GuidLock {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(LOCK_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(LOCK_FILE);
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, identity: &str) -> Option<&str> {
        self.projects.get(identity).map(String::as_str)
    }

    pub fn insert(&mut self, identity: String, guid: String) {
        self.projects.insert(identity, guid);
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// GUID of the project written to `project_file`: the explicit override,
    /// else the pinned entry, else one derived from the file's identity.
    pub fn guid_for(
        &self,
        explicit: Option<&str>,
        project_file: &Path,
        diag: &mut Diagnostics,
    ) -> Uuid {
        if explicit.is_none()
            && let Some(pinned) = self.get(&guid::canonical_identity(project_file))
        {
            match guid::parse_guid(pinned) {
                Some(parsed) => return parsed,
                None => diag.warn(format!(
                    "{}: invalid pinned GUID '{}' for {}",
                    LOCK_FILE,
                    pinned,
                    project_file.display()
                )),
            }
        }
        guid::project_guid(explicit, project_file, diag)
    }

    /// Pins `guid` for `project_file`.
    pub fn pin(&mut self, project_file: &Path, guid: &Uuid) {
        self.insert(guid::canonical_identity(project_file), guid::format_guid(guid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_insert_and_get() {
        let mut lock = GuidLock::default();
        lock.insert(
            "c:/work/core/core.vcxproj".to_string(),
            "{12345678-1234-5678-9ABC-DEF012345678}".to_string(),
        );
        assert_eq!(
            lock.get("c:/work/core/core.vcxproj"),
            Some("{12345678-1234-5678-9ABC-DEF012345678}")
        );
        assert!(lock.get("c:/work/app/app.vcxproj").is_none());
    }

    #[test]
    fn test_lock_parse() {
        let toml_str = r#"
[project]
"c:/work/core/core.vcxproj" = "{12345678-1234-5678-9ABC-DEF012345678}"
"#;
        let lock: GuidLock = toml::from_str(toml_str).unwrap();
        assert_eq!(lock.projects.len(), 1);
    }

    #[test]
    fn test_pinned_guid_wins_over_derivation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("core.vcxproj");
        let mut diag = Diagnostics::silent();

        let mut lock = GuidLock::default();
        let derived = lock.guid_for(None, &file, &mut diag);
        let pinned = guid::parse_guid("{12345678-1234-5678-9ABC-DEF012345678}").unwrap();
        lock.pin(&file, &pinned);

        assert_ne!(derived, pinned);
        assert_eq!(lock.guid_for(None, &file, &mut diag), pinned);
        let explicit = lock.guid_for(Some("{00000000-0000-5000-8000-000000000001}"), &file, &mut diag);
        assert_eq!(guid::format_guid(&explicit), "{00000000-0000-5000-8000-000000000001}");
        assert!(diag.is_empty());
    }

    #[test]
    fn test_lock_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GuidLock::load(dir.path()).unwrap().is_empty());

        let mut lock = GuidLock::default();
        lock.insert("a".to_string(), "{00000000-0000-5000-8000-000000000001}".to_string());
        lock.save(dir.path()).unwrap();
        assert_eq!(GuidLock::load(dir.path()).unwrap(), lock);
    }
}
