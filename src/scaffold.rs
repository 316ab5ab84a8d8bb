//! Revision scaffolding: stamp out the next numbered migration file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Error;
use crate::scan::scan;

/// Create a new, empty, correctly numbered migration script file.
///
/// The next version is one past the highest existing version, or 1 when the
/// directory holds no migrations yet. The version is zero-padded to 4 digits
/// and the message is slugified (whitespace to underscores) into the
/// description. Fails with [Error::RevisionFileExists] rather than
/// overwriting anything already at the target path.
pub fn create(directory: &Path, message: &str) -> Result<PathBuf, Error> {
    let next_version = match scan(directory) {
        Ok(revisions) => {
            // scan returns at least one revision, ascending
            revisions.last().map(|r| r.version()).unwrap_or(0) + 1
        }
        // a fresh (possibly just-created) directory starts at 1
        Err(Error::NoMigrationsFound(_)) => 1,
        Err(e) => return Err(e),
    };

    let slug = slugify(message);
    let path = directory.join(format!("{:04}_{}.rs", next_version, slug));
    if path.exists() {
        return Err(Error::RevisionFileExists(path));
    }

    fs::write(&path, template(message, &slug))?;
    info!(path = %path.display(), "created revision {}", next_version);
    Ok(path)
}

fn slugify(message: &str) -> String {
    message
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

fn template(message: &str, slug: &str) -> String {
    let type_name = pascal_case(slug);
    format!(
        "//! {message}\n\
         \n\
         use tomb_migrate::{{Error, Script}};\n\
         \n\
         pub struct {type_name};\n\
         \n\
         impl Script for {type_name} {{\n\
         \x20   // Implement the upgrade/downgrade pair for each backend this\n\
         \x20   // deployment targets, then register the script under its\n\
         \x20   // version number in your ScriptSet.\n\
         }}\n"
    )
}

fn pascal_case(slug: &str) -> String {
    slug.split('_')
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
