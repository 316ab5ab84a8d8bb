//! The orchestration loop: walks a migration path across the configured
//! databases, comparing each database's marker against each revision.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::info;

use crate::error::Error;
use crate::provider::{DatabaseProvider, Direction, InitOutcome, VersionState};
use crate::revision::Revision;
use crate::scaffold;
use crate::scan::{downgrade_path, upgrade_path};
use crate::script::{Script, ScriptSet};

/// Drives migrations for a set of configured databases.
///
/// Revisions are processed strictly sequentially, and within a revision the
/// providers are processed strictly sequentially in name order. Each
/// (revision, provider) pair is evaluated independently against that
/// provider's marker, so databases at different versions converge in a
/// single run. There is no cross-provider or cross-revision transactionality:
/// a fatal error leaves earlier providers at whatever version they last
/// completed, and a re-run resumes correctly through the skip logic.
pub struct Executor {
    directory: PathBuf,
    scripts: ScriptSet,
    providers: BTreeMap<String, Box<dyn DatabaseProvider>>,
}

impl Executor {
    pub fn new(
        directory: impl Into<PathBuf>,
        scripts: ScriptSet,
        providers: BTreeMap<String, Box<dyn DatabaseProvider>>,
    ) -> Self {
        Self {
            directory: directory.into(),
            scripts,
            providers,
        }
    }

    /// Second phase of provider construction: open every connection.
    /// Fail-fast, so a refused connection surfaces before anything runs.
    pub fn connect_all(&mut self) -> Result<(), Error> {
        for provider in self.providers.values_mut() {
            provider.connect()?;
        }
        Ok(())
    }

    /// Apply every revision at or above `from_version` (all revisions when
    /// `None`) to every database that is not already past it.
    pub fn upgrade(&mut self, from_version: Option<u32>) -> Result<(), Error> {
        let path = upgrade_path(&self.directory, from_version)?;
        for revision in &path {
            info!("Running upgrade {}", revision);
            for provider in self.providers.values_mut() {
                match provider.current_version()? {
                    VersionState::NotInitialized => {
                        return Err(Error::NotInitialized(provider.label()));
                    }
                    VersionState::Version(current) if current >= revision.version() => {
                        info!(
                            "{} is already at version {}, skipping revision {}",
                            provider.label(),
                            current,
                            revision.version()
                        );
                    }
                    VersionState::Version(_) => {
                        let script = self.scripts.resolve(revision)?;
                        provider.apply(script, Direction::Up)?;
                        provider.update(revision.version())?;
                        info!("Applied revision {} to {}", revision.version(), provider.label());
                    }
                }
            }
        }
        info!("Done upgrading");
        Ok(())
    }

    /// Walk back every revision at or below `to_version` (all revisions when
    /// `None`) on every database that has it applied. After a successful
    /// downgrade of revision N the marker lands at N - 1.
    pub fn downgrade(&mut self, to_version: Option<u32>) -> Result<(), Error> {
        let path = downgrade_path(&self.directory, to_version)?;
        for revision in &path {
            info!("Running downgrade {}", revision);
            for provider in self.providers.values_mut() {
                match provider.current_version()? {
                    VersionState::NotInitialized => {
                        return Err(Error::NotInitialized(provider.label()));
                    }
                    VersionState::Version(current) if current < revision.version() => {
                        // this revision was never applied here
                        info!(
                            "{} is at version {}, skipping revision {}",
                            provider.label(),
                            current,
                            revision.version()
                        );
                    }
                    VersionState::Version(_) => {
                        let script = self.scripts.resolve(revision)?;
                        provider.apply(script, Direction::Down)?;
                        provider.update(revision.version() - 1)?;
                        info!(
                            "Reverted revision {} on {}",
                            revision.version(),
                            provider.label()
                        );
                    }
                }
            }
        }
        info!("Done downgrading");
        Ok(())
    }

    /// Create the version marker on every database that does not have one.
    /// Already-initialized databases are reported and skipped, so init can be
    /// re-run across a mixed set.
    pub fn init(&mut self) -> Result<(), Error> {
        for provider in self.providers.values_mut() {
            match provider.init()? {
                InitOutcome::Created => {
                    info!("Initialized {} at version 0", provider.label());
                }
                InitOutcome::AlreadyInitialized => {
                    info!("{} is already initialized", provider.label());
                }
            }
        }
        Ok(())
    }

    /// Scaffold the next numbered migration file in the directory.
    pub fn revision(&self, message: &str) -> Result<PathBuf, Error> {
        scaffold::create(&self.directory, message)
    }

    /// Read every database's marker state, in name order.
    pub fn status(&mut self) -> Result<Vec<(String, VersionState)>, Error> {
        let mut states = Vec::with_capacity(self.providers.len());
        for provider in self.providers.values_mut() {
            let state = provider.current_version()?;
            states.push((provider.label(), state));
        }
        Ok(states)
    }
}

impl ScriptSet {
    /// Bind a disk-discovered revision to its registered script.
    fn resolve(&self, revision: &Revision) -> Result<&dyn Script, Error> {
        self.get(revision.version())
            .ok_or(Error::MissingScript(revision.version()))
    }
}
