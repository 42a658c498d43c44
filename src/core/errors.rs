use std::path::PathBuf;

/// All domain errors for romsign.
///
/// Every variant aborts the run. Messages carry enough context for the
/// operator to fix the problem without re-running under a debugger.
#[derive(Debug, thiserror::Error)]
pub enum ResignError {
    #[error(
        "{tool} is not available: {detail}\n\n  \
         romsign needs java, keytool and zipalign on PATH (or configured in romsign.toml)\n  \
         and the SignApk jar next to the romsign binary.\n\n  \
         Solutions:\n    \
         → Install a JDK and the Android build-tools\n    \
         → Point [tools] in romsign.toml at the binaries"
    )]
    ToolUnavailable { tool: String, detail: String },

    #[error("Invalid arguments: {detail}")]
    InvalidArguments { detail: String },

    #[error(
        "Failed to obtain the SHA1 of {package}: {reason}\n\n  \
         Make sure you have the newest version of keytool."
    )]
    CertificateInspection { package: PathBuf, reason: String },

    #[error(
        "Didn't find a {reference}.apk in the ROM directory. \
         Cannot determine the old {role} key!"
    )]
    ReferenceNotFound { role: String, reference: String },

    #[error("Cannot load certificate {path}: {reason}")]
    CertificateLoad { path: PathBuf, reason: String },

    #[error(
        "{key} is the same as the current {role} key ({fingerprint})\n\n  \
         Re-signing with the key the image already uses would change nothing.\n  \
         Check that you passed the new key, not the one you are replacing."
    )]
    IdentityKey {
        role: String,
        key: String,
        fingerprint: String,
    },

    #[error("{tool} failed on {package}: {reason}{}", leftover_hint(.leftover))]
    ExternalTool {
        tool: String,
        package: PathBuf,
        reason: String,
        leftover: Option<PathBuf>,
    },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn leftover_hint(leftover: &Option<PathBuf>) -> String {
    match leftover {
        Some(path) => format!(
            "\n\n  Temporary file left on disk: {}\n  \
             Packages before this one are already re-signed.",
            path.display()
        ),
        None => String::new(),
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ResignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_tool_mentions_leftover_artifact() {
        let err = ResignError::ExternalTool {
            tool: "zipalign".into(),
            package: PathBuf::from("system/app/Foo.apk"),
            reason: "exit status 1".into(),
            leftover: Some(PathBuf::from("system/app/Foo.apk.tmp")),
        };
        let msg = err.to_string();
        assert!(msg.contains("zipalign failed on system/app/Foo.apk"));
        assert!(msg.contains("Foo.apk.tmp"));
    }

    #[test]
    fn external_tool_without_leftover_is_single_line() {
        let err = ResignError::ExternalTool {
            tool: "java".into(),
            package: PathBuf::from("Foo.apk"),
            reason: "not found".into(),
            leftover: None,
        };
        assert_eq!(err.to_string(), "java failed on Foo.apk: not found");
    }

    #[test]
    fn reference_not_found_names_the_package() {
        let err = ResignError::ReferenceNotFound {
            role: "platform".into(),
            reference: "Settings".into(),
        };
        assert!(err.to_string().contains("Settings.apk"));
    }
}
