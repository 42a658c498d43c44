use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::process::{command_line, run_tool};
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::traits::aligner::PackageAligner;

/// Default alignment boundary in bytes.
pub const DEFAULT_BOUNDARY: u32 = 4;

/// Aligns packages with the Android SDK `zipalign` tool.
pub struct ZipalignAligner {
    zipalign: PathBuf,
    boundary: u32,
    verbose: bool,
}

impl ZipalignAligner {
    pub fn new(zipalign: PathBuf, boundary: u32, verbose: bool) -> Self {
        Self {
            zipalign,
            boundary,
            verbose,
        }
    }

    fn args(&self, artifact: &Path, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(5);
        if self.verbose {
            args.push("-v".into());
        }
        args.push("-f".into());
        args.push(self.boundary.to_string().into());
        args.push(artifact.into());
        args.push(destination.into());
        args
    }
}

impl PackageAligner for ZipalignAligner {
    fn align(&self, artifact: &Path, destination: &Path) -> Result<()> {
        let args = self.args(artifact, destination);
        output::detail(&command_line(&self.zipalign, &args));
        let out = run_tool("zipalign", &self.zipalign, &args, destination)?;
        if self.verbose {
            output::detail(String::from_utf8_lossy(&out.stdout).trim());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_destination_at_boundary() {
        let aligner = ZipalignAligner::new(PathBuf::from("zipalign"), DEFAULT_BOUNDARY, false);
        let args = aligner.args(Path::new("Foo.apk.tmp"), Path::new("Foo.apk"));
        assert_eq!(
            command_line(Path::new("zipalign"), &args),
            "zipalign -f 4 Foo.apk.tmp Foo.apk"
        );
    }

    #[test]
    fn verbose_flag_is_forwarded() {
        let aligner = ZipalignAligner::new(PathBuf::from("zipalign"), 16, true);
        let args = aligner.args(Path::new("a"), Path::new("b"));
        assert_eq!(command_line(Path::new("zipalign"), &args), "zipalign -v -f 16 a b");
    }
}
