use std::path::{Path, PathBuf};

use super::java_runtime::JavaRuntime;
use super::keytool_inspector::KeytoolInspector;
use super::process::is_spawnable;
use super::signapk_signer::SignApkSigner;
use super::zipalign_aligner::ZipalignAligner;
use crate::config::app_config::ToolsSection;
use crate::core::errors::{Result, ResignError};

/// The external tools a run depends on, verified to be present.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub java: JavaRuntime,
    pub keytool: PathBuf,
    pub zipalign: PathBuf,
    pub signapk_jar: PathBuf,
}

impl Toolchain {
    /// Check every tool before any work starts.
    ///
    /// Without an explicit `signapk_jar`, the jar matching the Java
    /// version is expected next to the running executable.
    pub fn preflight(tools: &ToolsSection) -> Result<Self> {
        let java = JavaRuntime::detect(&tools.java)?;

        for (name, program) in [("keytool", &tools.keytool), ("zipalign", &tools.zipalign)] {
            if !is_spawnable(program) {
                return Err(ResignError::ToolUnavailable {
                    tool: name.into(),
                    detail: format!("'{}' not found", program.display()),
                });
            }
        }

        let signapk_jar = match &tools.signapk_jar {
            Some(jar) => jar.clone(),
            None => executable_dir()?.join(java.signapk_jar_name()),
        };
        if !signapk_jar.is_file() {
            return Err(ResignError::ToolUnavailable {
                tool: "SignApk".into(),
                detail: format!("'{}' not found", signapk_jar.display()),
            });
        }

        Ok(Self {
            java,
            keytool: tools.keytool.clone(),
            zipalign: tools.zipalign.clone(),
            signapk_jar,
        })
    }

    pub fn inspector(&self) -> KeytoolInspector {
        KeytoolInspector::new(self.keytool.clone())
    }

    pub fn signer(&self, verbose: bool) -> SignApkSigner {
        SignApkSigner::new(self.java.program.clone(), self.signapk_jar.clone(), verbose)
    }

    pub fn aligner(&self, boundary: u32, verbose: bool) -> ZipalignAligner {
        ZipalignAligner::new(self.zipalign.clone(), boundary, verbose)
    }
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| ResignError::ToolUnavailable {
            tool: "SignApk".into(),
            detail: format!("cannot locate the directory of {}", exe.display()),
        })
}
