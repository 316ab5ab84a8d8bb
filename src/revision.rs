use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// A single migration step discovered on disk.
///
/// A revision is parsed from a file named `<digits>_<description>.<ext>`:
/// the leading numeric token becomes the version, the remaining tokens
/// (underscores replaced by spaces) become the description. The paired
/// upgrade/downgrade operations are not stored here; they are bound lazily
/// by the executor, which resolves the version against a
/// [ScriptSet](crate::ScriptSet) at apply time.
///
/// Revisions are disk-derived, per-run value objects. They are rebuilt on
/// every scan and never persisted.
#[derive(Debug, Clone)]
pub struct Revision {
    version: u32,
    description: String,
    source_path: PathBuf,
}

impl Revision {
    /// Parse a revision from a migration file path.
    ///
    /// Fails with [Error::InvalidMigrationFileName] if the file name does not
    /// match `<digits>_<description>.<ext>` or the version is zero.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidMigrationFileName(path.display().to_string()))?;
        let (version, description) = parse_file_name(file_name)
            .ok_or_else(|| Error::InvalidMigrationFileName(file_name.to_string()))?;
        Ok(Self {
            version,
            description,
            source_path: path.to_path_buf(),
        })
    }

    /// The integer version parsed from the leading token of the file name.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The human-readable description derived from the file name.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Path of the migration file this revision was parsed from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

// Two revisions are the same step iff their (version, description) pair
// matches; the source path is incidental.
impl PartialEq for Revision {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.description == other.description
    }
}

impl Eq for Revision {}

impl PartialOrd for Revision {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Revision {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> {}", self.version, self.description)
    }
}

/// Split a migration file name into (version, description).
///
/// The version is everything before the first underscore; the description is
/// the remainder up to the first dot, with underscores replaced by spaces.
/// Returns None for any shape that does not fit, including a missing
/// extension or a version of zero.
fn parse_file_name(name: &str) -> Option<(u32, String)> {
    let (digits, rest) = name.split_once('_')?;
    let version: u32 = digits.parse().ok()?;
    if version == 0 {
        return None;
    }
    // "foo_bar_baz.py" -> "foo_bar_baz"; no dot means no extension, reject
    let (stem, _ext) = rest.split_once('.')?;
    let description = stem.split('_').collect::<Vec<_>>().join(" ");
    Some((version, description))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_and_description() {
        let rev = Revision::from_path(Path::new("db/00001_foo.py")).unwrap();
        assert_eq!(rev.version(), 1);
        assert_eq!(rev.description(), "foo");
        assert_eq!(rev.source_path(), Path::new("db/00001_foo.py"));
    }

    #[test]
    fn joins_multi_token_descriptions_with_spaces() {
        let rev = Revision::from_path(Path::new("00011_foo_bar_baz.py")).unwrap();
        assert_eq!(rev.version(), 11);
        assert_eq!(rev.description(), "foo bar baz");
    }

    #[test]
    fn accepts_non_ascii_descriptions() {
        let rev = Revision::from_path(Path::new("00010_peña.py")).unwrap();
        assert_eq!(rev.version(), 10);
        assert_eq!(rev.description(), "peña");
    }

    #[test]
    fn version_is_not_required_to_be_four_digits() {
        let rev = Revision::from_path(Path::new("123_widen_ids.rs")).unwrap();
        assert_eq!(rev.version(), 123);
    }

    #[test]
    fn rejects_names_without_numeric_prefix() {
        let err = Revision::from_path(Path::new("foo.tmp~")).unwrap_err();
        assert!(matches!(err, Error::InvalidMigrationFileName(name) if name == "foo.tmp~"));
    }

    #[test]
    fn rejects_names_without_extension() {
        let err = Revision::from_path(Path::new("0001_foo")).unwrap_err();
        assert!(matches!(err, Error::InvalidMigrationFileName(_)));
    }

    #[test]
    fn rejects_version_zero() {
        let err = Revision::from_path(Path::new("0000_genesis.rs")).unwrap_err();
        assert!(matches!(err, Error::InvalidMigrationFileName(_)));
    }

    #[test]
    fn equality_is_version_and_description() {
        let a = Revision::from_path(Path::new("a/0001_foo.rs")).unwrap();
        let b = Revision::from_path(Path::new("b/00001_foo.py")).unwrap();
        let c = Revision::from_path(Path::new("a/0001_bar.rs")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn orders_by_version() {
        let mut revs = vec![
            Revision::from_path(Path::new("00006_qix.py")).unwrap(),
            Revision::from_path(Path::new("00001_foo.py")).unwrap(),
            Revision::from_path(Path::new("00003_baz.py")).unwrap(),
        ];
        revs.sort();
        let versions: Vec<u32> = revs.iter().map(|r| r.version()).collect();
        assert_eq!(versions, vec![1, 3, 6]);
    }
}
