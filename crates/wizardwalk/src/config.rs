//! Environment-supplied configuration: the SDK list the wizard offers as
//! selectable versions, the expected extension version, and the walker
//! options.

use std::collections::HashSet;
use std::path::Path;
use std::{env, fs};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AutomationError;

/// Semicolon-separated list of SDK paths, each optionally carrying a short
/// name after the last colon.
pub const QT_DIRS_ENV: &str = "SQUISH_VSTOOLS_QTDIRS";

/// Expected version string of the extension under test.
pub const EXTENSION_VERSION_ENV: &str = "SQUISH_VSTOOLS_VERSION";

/// One configured SDK location and its derived short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QtDir {
    pub path: String,
    pub name: String,
}

/// Options recognized by the wizard walker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Configure the SDK list into the host's version registry before opening
    /// any wizard, and clear it again after the last template.
    pub perform_qt_version_setup: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            perform_qt_version_setup: true,
        }
    }
}

/// Parse a raw SDK list. Entries are de-duplicated by case-insensitive path
/// comparison, first occurrence wins, insertion order is preserved. The name
/// is the last colon-delimited segment of the path with surrounding
/// backslashes stripped and inner ones turned into underscores.
pub fn parse_qt_dirs(raw: &str) -> Vec<QtDir> {
    let mut unique_paths = HashSet::new();
    let mut dirs = Vec::new();
    for current in raw.split(';').filter(|s| !s.is_empty()) {
        if !unique_paths.insert(current.to_lowercase()) {
            continue;
        }
        let name = current
            .rsplit(':')
            .next()
            .unwrap_or(current)
            .trim_matches('\\')
            .replace('\\', "_");
        dirs.push(QtDir {
            path: current.to_string(),
            name,
        });
    }
    dirs
}

/// Read the SDK list from [`QT_DIRS_ENV`]. An absent variable or a list that
/// parses to nothing is a configuration error: no meaningful run is possible
/// without at least one SDK.
pub fn qt_dirs_from_env() -> Result<Vec<QtDir>, AutomationError> {
    let raw = env::var(QT_DIRS_ENV).unwrap_or_default();
    let dirs = parse_qt_dirs(&raw);
    if dirs.is_empty() {
        return Err(AutomationError::MissingEnvironment(format!(
            "no Qt versions known; is {QT_DIRS_ENV} set correctly?"
        )));
    }
    Ok(dirs)
}

/// The extension version the host is expected to display: [`EXTENSION_VERSION_ENV`]
/// if set, otherwise the contents of `fallback_file`.
pub fn expected_extension_version(fallback_file: &Path) -> Result<String, AutomationError> {
    if let Ok(version) = env::var(EXTENSION_VERSION_ENV) {
        if !version.is_empty() {
            return Ok(version);
        }
    }
    warn!(
        file = %fallback_file.display(),
        "{EXTENSION_VERSION_ENV} is not set, falling back to the version file"
    );
    let contents = fs::read_to_string(fallback_file).map_err(|e| {
        AutomationError::MissingEnvironment(format!(
            "cannot read expected extension version from {}: {e}",
            fallback_file.display()
        ))
    })?;
    Ok(contents.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_the_last_colon_segment() {
        let dirs = parse_qt_dirs("C:\\Qt\\6.5.0:msvc2019");
        assert_eq!(
            dirs,
            vec![QtDir {
                path: "C:\\Qt\\6.5.0:msvc2019".into(),
                name: "msvc2019".into(),
            }]
        );
    }

    #[test]
    fn name_falls_back_to_the_path_tail_with_underscores() {
        // No name segment beyond the drive colon: the remaining path tail is
        // flattened into an identifier.
        let dirs = parse_qt_dirs("C:\\Qt\\6.5.0");
        assert_eq!(dirs[0].name, "Qt_6.5.0");
    }

    #[test]
    fn duplicate_paths_differing_only_by_case_collapse() {
        let dirs = parse_qt_dirs("C:\\Qt\\6.5.0:msvc2019;C:\\qt\\6.5.0:msvc2019");
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].name, "msvc2019");
        assert_eq!(dirs[0].path, "C:\\Qt\\6.5.0:msvc2019");
    }

    #[test]
    fn insertion_order_is_first_seen() {
        let dirs = parse_qt_dirs("C:\\a:one;C:\\b:two;C:\\A:one");
        let names: Vec<_> = dirs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["one", "two"]);
    }

    #[test]
    fn name_collisions_across_distinct_paths_are_not_flagged() {
        // Two different paths may derive the same short name; the parser
        // keeps both and leaves the conflict to the host dialog.
        let dirs = parse_qt_dirs("C:\\Qt\\6.5.0:msvc2019;C:\\Qt\\6.6.0:msvc2019");
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[0].name, dirs[1].name);
    }

    #[test]
    fn empty_or_separator_only_lists_parse_to_nothing() {
        assert!(parse_qt_dirs("").is_empty());
        assert!(parse_qt_dirs(";;").is_empty());
    }

    #[test]
    fn version_fallback_reads_the_version_file() {
        let path = std::env::temp_dir().join("wizardwalk-version-fallback.log");
        fs::write(&path, "3.3.1\n").unwrap();
        env::remove_var(EXTENSION_VERSION_ENV);
        assert_eq!(expected_extension_version(&path).unwrap(), "3.3.1");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_version_file_is_an_error() {
        env::remove_var(EXTENSION_VERSION_ENV);
        let missing = std::env::temp_dir().join("wizardwalk-no-such-version.log");
        assert!(matches!(
            expected_extension_version(&missing),
            Err(AutomationError::MissingEnvironment(_))
        ));
    }
}
