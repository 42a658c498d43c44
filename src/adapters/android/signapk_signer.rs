use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use super::process::{command_line, run_tool};
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::traits::signer::PackageSigner;

/// Signs packages with the AOSP SignApk tool:
/// `java -jar SignApk.jar -w <cert> <key> <package> <signed>`.
///
/// `-w` signs the whole file, as firmware images require. `-v` is added
/// in verbose mode.
pub struct SignApkSigner {
    java: PathBuf,
    jar: PathBuf,
    verbose: bool,
}

impl SignApkSigner {
    pub fn new(java: PathBuf, jar: PathBuf, verbose: bool) -> Self {
        Self { java, jar, verbose }
    }

    fn args<'a>(
        &'a self,
        package: &'a Path,
        certificate: &'a Path,
        private_key: &'a Path,
        signed: &'a Path,
    ) -> Vec<&'a OsStr> {
        let mut args = vec![OsStr::new("-jar"), self.jar.as_os_str(), OsStr::new("-w")];
        if self.verbose {
            args.push(OsStr::new("-v"));
        }
        args.extend([
            certificate.as_os_str(),
            private_key.as_os_str(),
            package.as_os_str(),
            signed.as_os_str(),
        ]);
        args
    }
}

impl PackageSigner for SignApkSigner {
    fn sign(
        &self,
        package: &Path,
        certificate: &Path,
        private_key: &Path,
        signed: &Path,
    ) -> Result<()> {
        let args = self.args(package, certificate, private_key, signed);
        output::detail(&command_line(&self.java, &args));
        let out = run_tool("signapk", &self.java, &args, package)?;
        if self.verbose {
            output::detail(String::from_utf8_lossy(&out.stdout).trim());
        }
        Ok(())
    }
}
