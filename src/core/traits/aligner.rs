use std::path::Path;

use crate::core::errors::Result;

/// Port for rewriting a package so its uncompressed entries are aligned.
pub trait PackageAligner {
    /// Align `artifact` and write the result to `destination`,
    /// replacing any existing file.
    fn align(&self, artifact: &Path, destination: &Path) -> Result<()>;
}
