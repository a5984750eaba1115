//! Plugin metadata file (`info.ini`).
//!
//! Only the top-level `version` key is read or written. Every other line,
//! including comments and sections, is preserved byte for byte.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{PluginVersion, ReleaseError, ReleaseResult};

/// Metadata file name inside a plugin's package directory.
pub const INFO_FILE_NAME: &str = "info.ini";

static SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\[").expect("invalid regex"));

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*version[ \t]*=[ \t]*(?P<value>"[^"\r\n]*"|'[^'\r\n]*'|[^#\r\n]*)"#)
        .expect("invalid regex")
});

/// Returns the metadata file location for a plugin working copy.
#[must_use]
pub fn info_file_path(repo_root: &Path, plugin_base: &str, plugin: &str) -> PathBuf {
    repo_root.join(plugin_base).join(plugin).join(INFO_FILE_NAME)
}

/// Reads and validates the version from a metadata file.
///
/// # Errors
///
/// Returns an error if the file is missing, has no top-level `version`
/// key, or the version is not three dot-separated integers.
pub fn read_version(path: &Path) -> ReleaseResult<PluginVersion> {
    if !path.is_file() {
        return Err(ReleaseError::MissingMetadataFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let range = version_value_range(&content)
        .ok_or_else(|| ReleaseError::MissingVersionKey(path.to_path_buf()))?;

    let version = PluginVersion::parse(&content[range])?;
    debug!(?path, %version, "read plugin version");
    Ok(version)
}

/// Writes `version` into the metadata file's `version` line in place.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written, or has no
/// top-level `version` key.
pub fn write_version(path: &Path, version: &PluginVersion) -> ReleaseResult<()> {
    if !path.is_file() {
        return Err(ReleaseError::MissingMetadataFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let range = version_value_range(&content)
        .ok_or_else(|| ReleaseError::MissingVersionKey(path.to_path_buf()))?;

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..range.start]);
    updated.push_str(&version.to_string());
    updated.push_str(&content[range.end..]);

    fs::write(path, updated)?;
    debug!(?path, %version, "wrote plugin version");
    Ok(())
}

/// Locates the bare version value (without quotes or trailing blanks) of
/// the top-level `version` key.
fn version_value_range(content: &str) -> Option<Range<usize>> {
    let top_level_end = SECTION_REGEX
        .find(content)
        .map_or(content.len(), |m| m.start());

    let captures = VERSION_REGEX.captures(&content[..top_level_end])?;
    let value = captures.name("value")?;
    let raw = value.as_str();

    let quoted = raw.len() >= 2
        && (raw.starts_with('"') && raw.ends_with('"')
            || raw.starts_with('\'') && raw.ends_with('\''));
    if quoted {
        return Some(value.start() + 1..value.end() - 1);
    }

    let trimmed = raw.trim_end();
    Some(value.start()..value.start() + trimmed.len())
}
