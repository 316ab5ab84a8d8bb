use crate::error::Error;
use crate::script::Script;

/// Name of the marker table/collection each provider keeps inside its target
/// database. Holds exactly one record: the version of the last successfully
/// applied revision and when it was written.
pub const MARKER_TABLE_NAME: &str = "_tomb_version_";

/// Which of a script's paired operations to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Result of reading a database's version marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionState {
    /// The marker table/collection does not exist; `init` has not run.
    NotInitialized,
    /// The marker's recorded version. An existing-but-empty marker table
    /// reads as `Version(0)`.
    Version(u32),
}

/// Result of an `init` call.
///
/// "Already initialized" is a value rather than an error so the init loop can
/// run across a mixed set of already-/not-yet-initialized databases and
/// report each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The marker was created at version 0.
    Created,
    /// A marker record already existed; nothing was changed.
    AlreadyInitialized,
}

/// Backend-specific capability for one target database.
///
/// Implemented once per database technology. A provider owns the native
/// connection for the run's lifetime and the persisted version marker inside
/// the target database. Construction is side-effect free; [connect](Self::connect)
/// opens the connection, so a configuration error is caught before any
/// external process is touched and tests can substitute their own connection.
pub trait DatabaseProvider {
    /// The configuration key this provider was built under.
    fn name(&self) -> &str;

    /// Human-readable `"<name> (<host>)"` label for diagnostics.
    fn label(&self) -> String;

    /// Open the live connection. Called once, after construction.
    fn connect(&mut self) -> Result<(), Error>;

    /// Create the marker if absent. Detects (but does not silently absorb)
    /// a repeat call: the outcome says whether a marker already existed.
    fn init(&mut self) -> Result<InitOutcome, Error>;

    /// Read the marker. Distinguishes a missing marker table
    /// ([VersionState::NotInitialized]) from a recorded version of zero.
    fn current_version(&mut self) -> Result<VersionState, Error>;

    /// Overwrite the marker's version and timestamp. Fails with
    /// [Error::NotInitialized] when the marker table does not exist.
    fn update(&mut self, version: u32) -> Result<(), Error>;

    /// Invoke the script operation for `direction` against this provider's
    /// native connection handle.
    fn apply(&mut self, script: &dyn Script, direction: Direction) -> Result<(), Error>;
}
