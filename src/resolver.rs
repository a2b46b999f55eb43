//! Resolving artifact names and wildcard patterns to files on disk

use crate::database::DatabaseLocator;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Suffix of exported preference files
pub const PREFERENCES_SUFFIX: &str = ".xml";

/// A name pattern from a restore request
///
/// Wildcards use exactly one `*` at the start, at the end, or one at each
/// end. Any other placement is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardPattern {
    /// `*suffix`
    EndsWith(String),
    /// `prefix*`
    StartsWith(String),
    /// `*mid*`
    Contains(String),
    /// No `*` at all
    Literal(String),
}

impl WildcardPattern {
    /// Parse a pattern, accepting literal names
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if a `*` appears anywhere other than
    /// the first or last character.
    pub fn parse(pattern: &str) -> Result<Self> {
        if !pattern.contains('*') {
            return Ok(WildcardPattern::Literal(pattern.to_string()));
        }

        let leading = pattern.starts_with('*');
        let inner = pattern.strip_prefix('*').unwrap_or(pattern);
        let trailing = inner.ends_with('*');
        let inner = inner.strip_suffix('*').unwrap_or(inner);

        if inner.contains('*') {
            return Err(Error::InvalidPattern(pattern.to_string()));
        }

        Ok(match (leading, trailing) {
            (true, true) => WildcardPattern::Contains(inner.to_string()),
            (true, false) => WildcardPattern::EndsWith(inner.to_string()),
            (false, true) => WildcardPattern::StartsWith(inner.to_string()),
            (false, false) => unreachable!("pattern contains '*' at an end"),
        })
    }

    /// Parse a pattern that must contain a wildcard
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` for literal names and misplaced `*`.
    pub fn parse_wildcard(pattern: &str) -> Result<Self> {
        match Self::parse(pattern)? {
            WildcardPattern::Literal(_) => Err(Error::InvalidPattern(pattern.to_string())),
            parsed => Ok(parsed),
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, WildcardPattern::Literal(_))
    }

    /// Whether a file name satisfies the pattern
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            WildcardPattern::EndsWith(suffix) => name.ends_with(suffix.as_str()),
            WildcardPattern::StartsWith(prefix) => name.starts_with(prefix.as_str()),
            WildcardPattern::Contains(mid) => name.contains(mid.as_str()),
            WildcardPattern::Literal(literal) => name == literal,
        }
    }
}

/// Regular files directly inside `dir` whose name matches `pattern`
///
/// Results are sorted by file name.
///
/// # Errors
///
/// Returns `Error::InvalidPattern` if `pattern` has no `*` or a misplaced
/// one, and `Error::DirectoryRead` if `dir` cannot be listed.
pub fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = WildcardPattern::parse_wildcard(pattern)?;
    let mut matches: Vec<PathBuf> = crate::error::list_files(dir)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
        })
        .collect();
    matches.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(matches)
}

/// Append `.xml` to a preference store name unless it already ends with it
#[must_use]
pub fn preferences_file_name(name: &str) -> String {
    if name.ends_with(PREFERENCES_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{PREFERENCES_SUFFIX}")
    }
}

/// Preference store name for an exported file name (`.xml` removed)
#[must_use]
pub fn store_name_from_file(file_name: &str) -> &str {
    file_name.strip_suffix(PREFERENCES_SUFFIX).unwrap_or(file_name)
}

/// Maps logical artifact names to source paths and staged paths
#[derive(Clone)]
pub struct ArtifactResolver {
    preferences_root: PathBuf,
    databases: Arc<dyn DatabaseLocator>,
}

impl ArtifactResolver {
    pub fn new(preferences_root: impl Into<PathBuf>, databases: Arc<dyn DatabaseLocator>) -> Self {
        Self {
            preferences_root: preferences_root.into(),
            databases,
        }
    }

    /// `<preferencesRoot>/<name>.xml`
    #[must_use]
    pub fn preferences_path(&self, name: &str) -> PathBuf {
        self.preferences_root.join(preferences_file_name(name))
    }

    /// Database file as reported by the locator, name unchanged
    #[must_use]
    pub fn database_path(&self, name: &str) -> PathBuf {
        self.databases.database_path(name)
    }

    /// Directory restored databases are copied into
    #[must_use]
    pub fn database_dir(&self) -> PathBuf {
        self.databases.database_dir()
    }

    /// Where a preference export lands inside a staging directory
    #[must_use]
    pub fn staged_preferences_path(&self, staging_dir: &Path, name: &str) -> PathBuf {
        staged_path(staging_dir, &self.preferences_path(name))
    }

    /// Where a database copy lands inside a staging directory
    #[must_use]
    pub fn staged_database_path(&self, staging_dir: &Path, name: &str) -> PathBuf {
        staged_path(staging_dir, &self.database_path(name))
    }
}

impl std::fmt::Debug for ArtifactResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactResolver")
            .field("preferences_root", &self.preferences_root)
            .field("database_dir", &self.databases.database_dir())
            .finish()
    }
}

fn staged_path(staging_dir: &Path, source: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) => staging_dir.join(name),
        None => staging_dir.join(source),
    }
}
