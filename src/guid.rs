//! Stable project identifiers.
//!
//! A project's GUID is the SHA-256 of its canonical identifying path, cut to
//! 16 bytes with the RFC 4122 version (5) and variant bits forced. The same
//! path always yields the same GUID, so regenerating a solution never
//! changes project identities. A caller-supplied override always wins.

use crate::diagnostics::Diagnostics;
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

/// Project type GUID of Visual C++ projects in solution files.
pub const PROJECT_TYPE_VC: &str = "{8BC9CEB8-8B4A-11D0-8D11-00A0C91BC942}";

fn hash_bytes(key: &str) -> [u8; 16] {
    let digest = Sha256::digest(key.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    bytes
}

fn masked(mut bytes: [u8; 16]) -> Uuid {
    bytes[6] = (bytes[6] & 0x0F) | 0x50;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
    Uuid::from_bytes(bytes)
}

/// Deterministic identifier for `key`. `None` for an empty key or a
/// degenerate (all-zero) hash.
pub fn derive_from_key(key: &str) -> Option<Uuid> {
    if key.is_empty() {
        return None;
    }
    let bytes = hash_bytes(key);
    if bytes.iter().all(|b| *b == 0) {
        return None;
    }
    Some(masked(bytes))
}

/// Canonical, platform-normalized spelling of an identifying path:
/// absolute, forward slashes, lower case. Only the parent directory is
/// resolved, so the spelling does not change once the file exists.
pub fn canonical_identity(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let resolved = match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent)
            .map(|p| p.join(name))
            .unwrap_or_else(|_| absolute.clone()),
        _ => absolute.clone(),
    };
    let spelled = resolved.to_string_lossy();
    let spelled = spelled.strip_prefix(r"\\?\").unwrap_or(&spelled);
    crate::paths::normalize(spelled).to_lowercase()
}

/// Identifier of a project: the override if it parses, otherwise derived
/// from `identity`. Falls back to a random identifier with a warning.
pub fn project_guid(explicit: Option<&str>, identity: &Path, diag: &mut Diagnostics) -> Uuid {
    if let Some(text) = explicit {
        match parse_guid(text) {
            Some(guid) => return guid,
            None => diag.warn(format!(
                "invalid GUID override '{}' for {}, deriving one instead",
                text,
                identity.display()
            )),
        }
    }

    match derive_from_key(&canonical_identity(identity)) {
        Some(guid) => guid,
        None => {
            diag.warn(format!(
                "could not derive a stable GUID for {}; using a random one. Run `vcgen lock` to persist it",
                identity.display()
            ));
            Uuid::new_v4()
        }
    }
}

/// Identifier of a display filter folder, derived from its full name.
pub fn filter_guid(name: &str) -> Uuid {
    masked(hash_bytes(&format!("filter:{}", name.to_lowercase())))
}

/// Accepts the braced and bare spellings.
pub fn parse_guid(text: &str) -> Option<Uuid> {
    let trimmed = text.trim().trim_start_matches('{').trim_end_matches('}');
    Uuid::parse_str(trimmed).ok()
}

/// `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`
pub fn format_guid(guid: &Uuid) -> String {
    format!("{{{}}}", guid.hyphenated().to_string().to_uppercase())
}
