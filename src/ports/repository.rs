//! Repository port for policy persistence.

use std::path::Path;

use crate::{Result, policy::PolicyRecord};

/// Port for persisting and loading trained policies.
///
/// # Examples
///
/// ```no_run
/// use pegsolitaire::{policy::PolicyRecord, ports::PolicyRepository};
/// use std::path::Path;
///
/// fn archive<R: PolicyRepository>(repo: &R, record: &PolicyRecord) -> pegsolitaire::Result<()> {
///     repo.save(record, Path::new("policy-5levels.txt"))
/// }
/// ```
pub trait PolicyRepository {
    /// Save a policy and its run metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization fails.
    fn save(&self, record: &PolicyRecord, path: &Path) -> Result<()>;

    /// Load a policy.
    ///
    /// Formats that cannot carry all metadata fields fill them with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read or its content is malformed.
    fn load(&self, path: &Path) -> Result<PolicyRecord>;
}
