use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{Result, ResignError};
use crate::core::models::fingerprint::Fingerprint;
use crate::core::traits::inspector::CertificateInspector;

static SHA1_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*SHA1:\s*([0-9A-Fa-f:]+)\s*$").expect("valid regex"));

/// Reads package fingerprints with `keytool -printcert -jarfile`.
pub struct KeytoolInspector {
    keytool: PathBuf,
}

impl KeytoolInspector {
    pub fn new(keytool: PathBuf) -> Self {
        Self { keytool }
    }

    /// First `SHA1:` fingerprint in keytool's output.
    ///
    /// Packages signed by several signers list one certificate block per
    /// signer; the first one is used.
    pub fn parse_sha1(output: &str) -> Option<Fingerprint> {
        SHA1_LINE
            .captures(output)
            .and_then(|c| Fingerprint::parse(&c[1]))
    }
}

impl CertificateInspector for KeytoolInspector {
    fn fingerprint(&self, package: &Path) -> Result<Fingerprint> {
        let inspect_err = |reason: String| ResignError::CertificateInspection {
            package: package.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.keytool)
            .args(["-printcert", "-jarfile"])
            .arg(package)
            .output()
            .map_err(|e| inspect_err(format!("failed to run keytool: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(inspect_err(format!(
                "keytool exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_sha1(&stdout)
            .ok_or_else(|| inspect_err("no SHA1 line in keytool output".into()))
    }
}
