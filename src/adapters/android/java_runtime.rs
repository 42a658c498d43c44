use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{Result, ResignError};

static QUOTED_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));

/// SignApk build for Java 6 runtimes.
pub const SIGNAPK_JAVA6_JAR: &str = "SignApkv2.jar";

/// SignApk build for Java 7 and newer.
pub const SIGNAPK_JAR: &str = "SignApkv2_java7.jar";

/// A detected Java runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaRuntime {
    pub program: PathBuf,
    /// Version string as printed by `java -version`, e.g. `1.8.0_392` or `17.0.9`.
    pub version: String,
}

impl JavaRuntime {
    /// Run `java -version` and parse the reported version.
    pub fn detect(program: &Path) -> Result<Self> {
        let unavailable = |detail: String| ResignError::ToolUnavailable {
            tool: "java".into(),
            detail,
        };

        let output = Command::new(program)
            .arg("-version")
            .output()
            .map_err(|e| unavailable(format!("failed to run {}: {e}", program.display())))?;

        // `java -version` historically prints to stderr.
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        );
        let version = Self::parse_version(&text)
            .ok_or_else(|| unavailable("could not determine the Java version".into()))?;

        Ok(Self {
            program: program.to_path_buf(),
            version,
        })
    }

    /// First quoted string of `java -version` output.
    pub fn parse_version(output: &str) -> Option<String> {
        QUOTED_VERSION
            .captures(output)
            .map(|c| c[1].to_string())
    }

    /// Major version: `1.6.0_45` → 6, `17.0.9` → 17.
    pub fn major(&self) -> Option<u32> {
        let mut parts = self.version.split(['.', '_', '-', '+']);
        let first: u32 = parts.next()?.parse().ok()?;
        if first == 1 {
            parts.next()?.parse().ok()
        } else {
            Some(first)
        }
    }

    /// SignApk jar file name suited to this runtime.
    pub fn signapk_jar_name(&self) -> &'static str {
        match self.major() {
            Some(6) => SIGNAPK_JAVA6_JAR,
            _ => SIGNAPK_JAR,
        }
    }
}
