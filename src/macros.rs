//! Convenience macros for registering migration scripts.

/// Build a [ScriptSet](crate::ScriptSet) from `version => script` pairs.
///
/// ```
/// use tomb_migrate::{script_set, Script};
///
/// struct CreateUsers;
/// impl Script for CreateUsers {
///     fn sqlite_upgrade(&self, conn: &mut rusqlite::Connection) -> Result<(), tomb_migrate::Error> {
///         conn.execute("CREATE TABLE users (id INTEGER PRIMARY KEY)", [])?;
///         Ok(())
///     }
///     fn sqlite_downgrade(&self, conn: &mut rusqlite::Connection) -> Result<(), tomb_migrate::Error> {
///         conn.execute("DROP TABLE users", [])?;
///         Ok(())
///     }
/// }
///
/// let scripts = script_set! {
///     1 => CreateUsers,
/// };
/// assert!(scripts.get(1).is_some());
/// ```
#[macro_export]
macro_rules! script_set {
    ( $( $version:expr => $script:expr ),* $(,)? ) => {{
        let mut set = $crate::ScriptSet::new();
        $( set.register($version, $script); )*
        set
    }};
}
