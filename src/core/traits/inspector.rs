use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::fingerprint::Fingerprint;

/// Port for reading the signing certificate fingerprint of a package.
///
/// Implementations live in `adapters::android` (e.g. KeytoolInspector).
pub trait CertificateInspector {
    /// Fingerprint of the certificate `package` is currently signed with.
    fn fingerprint(&self, package: &Path) -> Result<Fingerprint>;
}
