use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use crate::core::errors::{Result, ResignError};

/// Check that `program` can be spawned at all.
///
/// The exit status is ignored: zipalign and keytool print usage and
/// exit non-zero when called without arguments.
pub fn is_spawnable(program: &Path) -> bool {
    Command::new(program).output().is_ok()
}

/// Render a command line for verbose output.
pub fn command_line<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(AsRef::as_ref))
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a tool on behalf of `package` and return its output on success.
///
/// Spawn failures and non-zero exits become `ExternalTool` errors.
pub fn run_tool<S: AsRef<OsStr>>(
    tool: &str,
    program: &Path,
    args: &[S],
    package: &Path,
) -> Result<Output> {
    let tool_err = |reason: String| ResignError::ExternalTool {
        tool: tool.to_string(),
        package: package.to_path_buf(),
        reason,
        leftover: None,
    };

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| tool_err(format!("failed to run {}: {e}", program.display())))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(tool_err(format!(
            "{} exited with {}: {}",
            program.display(),
            output.status,
            stderr.trim()
        )));
    }

    Ok(output)
}
