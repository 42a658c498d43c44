use std::path::Path;

use crate::core::errors::Result;

/// Port for signing a package with a private key and certificate.
pub trait PackageSigner {
    /// Sign `package` and write the signed copy to `signed`.
    ///
    /// `package` itself is left untouched.
    fn sign(
        &self,
        package: &Path,
        certificate: &Path,
        private_key: &Path,
        signed: &Path,
    ) -> Result<()>;
}
