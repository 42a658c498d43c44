use sha1::{Digest, Sha1};

/// A certificate fingerprint in the conventional display form:
/// uppercase hex byte pairs joined by colons (`3F:A2:…:9C`).
///
/// Values are normalized on construction, so two fingerprints compare
/// equal exactly when they denote the same digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Normalize and validate a fingerprint as printed by a tool.
    ///
    /// Surrounding whitespace is dropped and hex digits are uppercased.
    /// Returns `None` unless the input holds at least one hex digit and
    /// nothing but hex digits and `:`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if !trimmed.chars().any(|c| c.is_ascii_hexdigit())
            || !trimmed
                .chars()
                .all(|c| c.is_ascii_hexdigit() || c == ':')
        {
            return None;
        }
        Some(Self(trimmed.to_ascii_uppercase()))
    }

    /// SHA-1 of a DER-encoded certificate.
    pub fn of_der(der: &[u8]) -> Self {
        let digest = Sha1::digest(der);
        Self(format_digest(&digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn format_digest(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let fp = Fingerprint::parse("  aa:bb:0c \n").unwrap();
        assert_eq!(fp.as_str(), "AA:BB:0C");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Fingerprint::parse("").is_none());
        assert!(Fingerprint::parse("   ").is_none());
        assert!(Fingerprint::parse("AA:BB:ZZ").is_none());
        assert!(Fingerprint::parse("AA BB").is_none());
    }

    #[test]
    fn parse_rejects_separators_without_digits() {
        assert!(Fingerprint::parse(":::").is_none());
        assert!(Fingerprint::parse(" : ").is_none());
    }

    #[test]
    fn parsed_and_computed_fingerprints_compare_equal() {
        let computed = Fingerprint::of_der(b"certificate bytes");
        let lower = computed.as_str().to_lowercase();
        assert_eq!(Fingerprint::parse(&lower).unwrap(), computed);
    }

    #[test]
    fn sha1_fingerprint_has_display_format() {
        let fp = Fingerprint::of_der(b"");
        // SHA-1 of the empty input
        assert_eq!(
            fp.as_str(),
            "DA:39:A3:EE:5E:6B:4B:0D:32:55:BF:EF:95:60:18:90:AF:D8:07:09"
        );
        assert_eq!(fp.as_str().len(), 59);
        assert_eq!(fp.as_str().matches(':').count(), 19);
    }

    #[test]
    fn same_bytes_same_fingerprint() {
        assert_eq!(Fingerprint::of_der(b"abc"), Fingerprint::of_der(b"abc"));
        assert_ne!(Fingerprint::of_der(b"abc"), Fingerprint::of_der(b"abd"));
    }
}
