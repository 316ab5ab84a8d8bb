//! Revision discovery and migration path computation.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::revision::Revision;

/// List a migration directory and build the ordered revision sequence.
///
/// A missing directory is created empty and scanning proceeds, so a fresh
/// project surfaces as [Error::NoMigrationsFound] rather than an I/O error.
/// Subdirectories are silently skipped. One unparsable file name aborts the
/// whole scan, and two files sharing a version number are rejected outright.
pub fn scan(directory: &Path) -> Result<Vec<Revision>, Error> {
    if !directory.exists() {
        debug!(directory = %directory.display(), "migration directory missing, creating");
        fs::create_dir_all(directory)?;
    }

    let mut revisions: Vec<Revision> = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        revisions.push(Revision::from_path(&entry.path())?);
    }

    revisions.sort();
    for pair in revisions.windows(2) {
        if pair[0].version() == pair[1].version() {
            return Err(Error::DuplicateVersion {
                version: pair[0].version(),
                first: pair[0].source_path().display().to_string(),
                second: pair[1].source_path().display().to_string(),
            });
        }
    }

    if revisions.is_empty() {
        return Err(Error::NoMigrationsFound(directory.to_path_buf()));
    }

    debug!(
        directory = %directory.display(),
        count = revisions.len(),
        "scanned migration directory"
    );
    Ok(revisions)
}

/// The ordered revision subsequence for an upgrade run: ascending, filtered
/// to `version >= from_version` when a bound is given (inclusive).
pub fn upgrade_path(directory: &Path, from_version: Option<u32>) -> Result<Vec<Revision>, Error> {
    let revisions = scan(directory)?;
    Ok(match from_version {
        Some(from) => revisions
            .into_iter()
            .filter(|r| r.version() >= from)
            .collect(),
        None => revisions,
    })
}

/// The ordered revision subsequence for a downgrade run: descending, filtered
/// to `version <= to_version` when a bound is given (inclusive).
pub fn downgrade_path(directory: &Path, to_version: Option<u32>) -> Result<Vec<Revision>, Error> {
    let mut revisions = scan(directory)?;
    revisions.reverse();
    Ok(match to_version {
        Some(to) => revisions
            .into_iter()
            .filter(|r| r.version() <= to)
            .collect(),
        None => revisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    const FIXTURE: &[&str] = &[
        "00006_qix.py",
        "00001_foo.py",
        "00003_baz.py",
        "00002_bar.py",
        "00004_qux.py",
        "00010_peña.py",
        "00011_foo_bar_baz.py",
    ];

    fn versions(revisions: &[Revision]) -> Vec<u32> {
        revisions.iter().map(|r| r.version()).collect()
    }

    #[test]
    fn scan_sorts_ascending_by_version() {
        let dir = dir_with(&["00006_qix.py", "00001_foo.py", "00003_baz.py"]);
        let revisions = scan(dir.path()).unwrap();
        assert_eq!(versions(&revisions), vec![1, 3, 6]);
    }

    #[test]
    fn scan_creates_missing_directory_and_reports_no_migrations() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("db");
        let err = scan(&missing).unwrap_err();
        assert!(matches!(err, Error::NoMigrationsFound(p) if p == missing));
        assert!(missing.is_dir());
    }

    #[test]
    fn scan_reports_empty_directory_as_no_migrations() {
        let dir = TempDir::new().unwrap();
        let err = scan(dir.path()).unwrap_err();
        assert!(matches!(err, Error::NoMigrationsFound(_)));
    }

    #[test]
    fn scan_skips_subdirectories() {
        let dir = dir_with(&["0001_foo.rs"]);
        fs::create_dir(dir.path().join("archive")).unwrap();
        let revisions = scan(dir.path()).unwrap();
        assert_eq!(versions(&revisions), vec![1]);
    }

    #[test]
    fn one_bad_file_name_aborts_the_scan() {
        let dir = dir_with(&["00001_foo.py", "00003_baz.py", "foo.tmp~"]);
        let err = scan(dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidMigrationFileName(name) if name == "foo.tmp~"));
    }

    #[test]
    fn duplicate_versions_are_rejected() {
        let dir = dir_with(&["0002_foo.rs", "00002_bar.rs", "0001_base.rs"]);
        let err = scan(dir.path()).unwrap_err();
        assert!(matches!(err, Error::DuplicateVersion { version: 2, .. }));
    }

    #[test]
    fn upgrade_path_without_bound_is_the_full_ascending_sequence() {
        let dir = dir_with(FIXTURE);
        let path = upgrade_path(dir.path(), None).unwrap();
        assert_eq!(versions(&path), vec![1, 2, 3, 4, 6, 10, 11]);
    }

    #[test]
    fn upgrade_path_bound_is_inclusive() {
        let dir = dir_with(FIXTURE);
        let path = upgrade_path(dir.path(), Some(3)).unwrap();
        assert_eq!(versions(&path), vec![3, 4, 6, 10, 11]);
    }

    #[test]
    fn downgrade_path_without_bound_is_the_full_descending_sequence() {
        let dir = dir_with(FIXTURE);
        let path = downgrade_path(dir.path(), None).unwrap();
        assert_eq!(versions(&path), vec![11, 10, 6, 4, 3, 2, 1]);
    }

    #[test]
    fn downgrade_path_bound_is_inclusive() {
        let dir = dir_with(FIXTURE);
        let path = downgrade_path(dir.path(), Some(3)).unwrap();
        assert_eq!(versions(&path), vec![11, 10, 6, 4, 3]);
    }

    #[test]
    fn path_calculators_propagate_scan_failures() {
        let dir = dir_with(&["0001_foo.rs", "foo.tmp~"]);
        assert!(matches!(
            upgrade_path(dir.path(), None).unwrap_err(),
            Error::InvalidMigrationFileName(_)
        ));
        assert!(matches!(
            downgrade_path(dir.path(), Some(1)).unwrap_err(),
            Error::InvalidMigrationFileName(_)
        ));
    }
}
