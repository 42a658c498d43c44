/// The four key purposes of an AOSP firmware image.
///
/// Each role is discovered through a reference package that is always
/// signed with that role's key in a stock build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyRole {
    Platform,
    Shared,
    Media,
    Release,
}

impl KeyRole {
    /// All roles in processing order.
    pub const ALL: [KeyRole; 4] = [
        KeyRole::Platform,
        KeyRole::Shared,
        KeyRole::Media,
        KeyRole::Release,
    ];

    /// Package name whose signature reveals the key currently used for this role.
    pub fn default_reference(self) -> &'static str {
        match self {
            KeyRole::Platform => "Settings",
            KeyRole::Shared => "ContactsProvider",
            KeyRole::Media => "DownloadProvider",
            KeyRole::Release => "HTMLViewer",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyRole::Platform => "platform",
            KeyRole::Shared => "shared",
            KeyRole::Media => "media",
            KeyRole::Release => "release",
        }
    }
}

impl std::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_packages_match_aosp() {
        assert_eq!(KeyRole::Platform.default_reference(), "Settings");
        assert_eq!(KeyRole::Shared.default_reference(), "ContactsProvider");
        assert_eq!(KeyRole::Media.default_reference(), "DownloadProvider");
        assert_eq!(KeyRole::Release.default_reference(), "HTMLViewer");
    }

    #[test]
    fn processing_order_is_platform_first() {
        let names: Vec<_> = KeyRole::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["platform", "shared", "media", "release"]);
    }
}
