use std::path::{Path, PathBuf};

use crate::core::errors::{Result, ResignError};
use crate::core::models::inventory::PackageInventory;
use crate::core::traits::inspector::CertificateInspector;

/// Package file extension, compared case-insensitively.
pub const PACKAGE_EXTENSION: &str = "apk";

/// Recursively collect every package below `root`, sorted by path.
///
/// Symlinked files are included; symlinked directories are not descended.
pub fn find_packages(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ResignError::InvalidArguments {
            detail: format!("'{}' is not a directory", root.display()),
        });
    }

    let mut packages = Vec::new();
    walk(root, &mut packages)?;
    packages.sort();
    Ok(packages)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(&path, out)?;
        } else if is_package(&path) && path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn is_package(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PACKAGE_EXTENSION))
}

/// Builds the fingerprint inventory through a `CertificateInspector`.
pub struct InventoryService<I: CertificateInspector> {
    pub inspector: I,
}

impl<I: CertificateInspector> InventoryService<I> {
    /// Inspect every package in order. The first failure aborts the scan.
    ///
    /// `on_package` is called before each inspection with the package's
    /// position and path.
    pub fn build(
        &self,
        packages: &[PathBuf],
        mut on_package: impl FnMut(usize, &Path),
    ) -> Result<PackageInventory> {
        let mut inventory = PackageInventory::new();
        for (i, package) in packages.iter().enumerate() {
            on_package(i, package);
            let fingerprint = self.inspector.fingerprint(package)?;
            inventory.insert(package.clone(), fingerprint);
        }
        Ok(inventory)
    }
}
