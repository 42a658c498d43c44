use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::models::fingerprint::Fingerprint;

/// How a role's reference name is matched against discovered package paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMatch {
    /// The package file stem equals the reference name (`…/Settings.apk`).
    #[default]
    Stem,
    /// The path contains the reference name anywhere.
    ///
    /// Also matches unrelated packages such as `NotSettingsToo.apk`.
    Substring,
}

impl ReferenceMatch {
    pub fn matches(self, path: &Path, reference: &str) -> bool {
        match self {
            ReferenceMatch::Stem => path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s == reference),
            ReferenceMatch::Substring => path.to_string_lossy().contains(reference),
        }
    }
}

/// Every package found in the image, mapped to the fingerprint of the
/// certificate it is currently signed with.
///
/// Iteration follows insertion order. The inventory reflects the image as
/// it was before any re-signing, and is never updated afterwards.
#[derive(Debug, Clone, Default)]
pub struct PackageInventory {
    entries: Vec<(PathBuf, Fingerprint)>,
    index: HashMap<PathBuf, usize>,
}

impl PackageInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a package. Inserting a known path replaces its fingerprint
    /// and keeps its original position.
    pub fn insert(&mut self, path: PathBuf, fingerprint: Fingerprint) {
        match self.index.get(&path) {
            Some(&i) => self.entries[i].1 = fingerprint,
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push((path, fingerprint));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, path: &Path) -> Option<&Fingerprint> {
        self.index.get(path).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Fingerprint)> {
        self.entries.iter().map(|(p, f)| (p.as_path(), f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entries whose path matches `reference`, in inventory order.
    pub fn find_matching(
        &self,
        reference: &str,
        rule: ReferenceMatch,
    ) -> Vec<(&Path, &Fingerprint)> {
        self.iter()
            .filter(|(path, _)| rule.matches(path, reference))
            .collect()
    }

    /// Number of distinct fingerprints in the image.
    pub fn distinct_fingerprints(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, fp)| fp)
            .collect::<HashSet<_>>()
            .len()
    }
}

impl FromIterator<(PathBuf, Fingerprint)> for PackageInventory {
    fn from_iter<T: IntoIterator<Item = (PathBuf, Fingerprint)>>(iter: T) -> Self {
        let mut inventory = Self::new();
        for (path, fp) in iter {
            inventory.insert(path, fp);
        }
        inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(s: &str) -> Fingerprint {
        Fingerprint::parse(s).unwrap()
    }

    fn sample() -> PackageInventory {
        [
            ("system/app/NotSettingsToo.apk", "11:11"),
            ("system/priv-app/Settings/Settings.apk", "AA:BB"),
            ("system/app/Calendar.apk", "AA:BB"),
            ("system/app/SettingsProvider.apk", "CC:DD"),
        ]
        .into_iter()
        .map(|(p, f)| (PathBuf::from(p), fp(f)))
        .collect()
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let inv = sample();
        let paths: Vec<_> = inv.iter().map(|(p, _)| p.to_path_buf()).collect();
        assert_eq!(paths[0], PathBuf::from("system/app/NotSettingsToo.apk"));
        assert_eq!(paths[3], PathBuf::from("system/app/SettingsProvider.apk"));
    }

    #[test]
    fn reinsert_replaces_value_in_place() {
        let mut inv = sample();
        inv.insert(PathBuf::from("system/app/Calendar.apk"), fp("EE:FF"));
        assert_eq!(inv.len(), 4);
        assert_eq!(
            inv.get(Path::new("system/app/Calendar.apk")),
            Some(&fp("EE:FF"))
        );
        let third = inv.iter().nth(2).unwrap().0;
        assert_eq!(third, Path::new("system/app/Calendar.apk"));
    }

    #[test]
    fn stem_match_ignores_lookalikes() {
        let inv = sample();
        let hits = inv.find_matching("Settings", ReferenceMatch::Stem);
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].0,
            Path::new("system/priv-app/Settings/Settings.apk")
        );
    }

    #[test]
    fn substring_match_catches_every_path_containing_the_name() {
        let inv = sample();
        let hits = inv.find_matching("Settings", ReferenceMatch::Substring);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].0, Path::new("system/app/NotSettingsToo.apk"));
    }

    #[test]
    fn counts_distinct_fingerprints() {
        assert_eq!(sample().distinct_fingerprints(), 3);
        assert_eq!(PackageInventory::new().distinct_fingerprints(), 0);
    }
}
