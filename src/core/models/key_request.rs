use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, ResignError};
use crate::core::models::key_role::KeyRole;

/// Certificate file suffix appended to a key identifier.
pub const CERTIFICATE_SUFFIX: &str = ".x509.pem";

/// Private key file suffix appended to a key identifier.
pub const PRIVATE_KEY_SUFFIX: &str = ".pk8";

/// A new key requested by the operator for one role.
///
/// `identifier` is a path stem: `keys/platform` stands for
/// `keys/platform.x509.pem` and `keys/platform.pk8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRequest {
    pub role: KeyRole,
    pub identifier: PathBuf,
}

impl KeyRequest {
    /// Build a request from a raw command-line value.
    ///
    /// The final path component is cut at its first `.` so that
    /// `platform`, `platform.pk8` and `platform.x509.pem` all name the
    /// same key. Directory components are kept as given.
    pub fn from_arg(role: KeyRole, raw: &str) -> Result<Self> {
        let path = Path::new(raw);
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ResignError::InvalidArguments {
                detail: format!("'{raw}' is not a valid {role} key name"),
            })?;

        // A leading dot belongs to the name, not to an extension.
        let first = file_name.chars().next().map_or(0, char::len_utf8);
        let stem = match file_name[first..].find('.') {
            Some(idx) => &file_name[..first + idx],
            None => file_name,
        };

        if stem.is_empty() || stem == "." {
            return Err(ResignError::InvalidArguments {
                detail: format!("'{raw}' is not a valid {role} key name"),
            });
        }

        Ok(Self {
            role,
            identifier: path.with_file_name(stem),
        })
    }

    pub fn certificate_path(&self) -> PathBuf {
        with_suffix(&self.identifier, CERTIFICATE_SUFFIX)
    }

    pub fn private_key_path(&self) -> PathBuf {
        with_suffix(&self.identifier, PRIVATE_KEY_SUFFIX)
    }

    /// Identifier as shown to the operator.
    pub fn display_name(&self) -> String {
        self.identifier.display().to_string()
    }
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(stem.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_identifier_is_kept() {
        let req = KeyRequest::from_arg(KeyRole::Platform, "platform").unwrap();
        assert_eq!(req.identifier, PathBuf::from("platform"));
        assert_eq!(req.certificate_path(), PathBuf::from("platform.x509.pem"));
        assert_eq!(req.private_key_path(), PathBuf::from("platform.pk8"));
    }

    #[test]
    fn extension_is_truncated_at_first_dot() {
        let a = KeyRequest::from_arg(KeyRole::Media, "media.x509.pem").unwrap();
        let b = KeyRequest::from_arg(KeyRole::Media, "media.pk8").unwrap();
        assert_eq!(a.identifier, PathBuf::from("media"));
        assert_eq!(a, b);
    }

    #[test]
    fn directories_survive_truncation() {
        let req = KeyRequest::from_arg(KeyRole::Shared, "../keys/shared.pk8").unwrap();
        assert_eq!(req.identifier, PathBuf::from("../keys/shared"));
        assert_eq!(
            req.certificate_path(),
            PathBuf::from("../keys/shared.x509.pem")
        );
    }

    #[test]
    fn leading_dot_is_part_of_the_name() {
        let req = KeyRequest::from_arg(KeyRole::Release, ".release.pk8").unwrap();
        assert_eq!(req.identifier, PathBuf::from(".release"));
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(KeyRequest::from_arg(KeyRole::Platform, "").is_err());
        assert!(KeyRequest::from_arg(KeyRole::Platform, "keys/..").is_err());
    }
}
