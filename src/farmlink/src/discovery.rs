//! Save slot discovery.
//!
//! The game pre-allocates `savegame1`, `savegame2`, ... under its documents
//! folder. A slot only holds a save once `careerSavegame.xml` exists in it.

use crate::save::{Save, SaveError, DESCRIPTOR_FILE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SLOT_PREFIX: &str = "savegame";

/// Whether a directory name looks like a save slot (`savegame` + index)
pub fn is_slot_name(name: &str) -> bool {
    name.strip_prefix(SLOT_PREFIX)
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

/// A slot directory that contains a save descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    path: PathBuf,
}

impl SaveSlot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.path.join(DESCRIPTOR_FILE)
    }

    /// Parse the slot's descriptor
    pub fn load(&self) -> Result<Save, SaveError> {
        Save::load(&self.path)
    }
}

/// Lazy iterator over occupied save slots under a root directory
#[derive(Debug)]
pub struct SaveSlots {
    entries: Option<fs::ReadDir>,
}

impl Iterator for SaveSlots {
    type Item = SaveSlot;

    fn next(&mut self) -> Option<SaveSlot> {
        let entries = self.entries.as_mut()?;

        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable directory entry: {}", e);
                    continue;
                }
            };

            let is_slot = entry.file_name().to_str().is_some_and(is_slot_name);
            if !is_slot || !entry.path().is_dir() {
                continue;
            }

            let slot = SaveSlot { path: entry.path() };
            if slot.descriptor_path().is_file() {
                return Some(slot);
            }
            tracing::debug!("Empty save slot: {}", slot.path.display());
        }

        None
    }
}

/// Enumerate occupied save slots under `root`
///
/// A missing root yields no slots; the game may simply not be installed.
pub fn discover(root: &Path) -> SaveSlots {
    let entries = match fs::read_dir(root) {
        Ok(entries) => Some(entries),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("Cannot read save root {}: {}", root.display(), e);
            None
        }
    };
    SaveSlots { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_descriptor(slot: &Path) {
        fs::create_dir_all(slot).unwrap();
        fs::write(
            slot.join(DESCRIPTOR_FILE),
            "<careerSavegame><settings><savegameName>s</savegameName><mapId>m</mapId><playerName>p</playerName></settings></careerSavegame>",
        )
        .unwrap();
    }

    #[test]
    fn test_is_slot_name() {
        assert!(is_slot_name("savegame1"));
        assert!(is_slot_name("savegame9"));
        assert!(is_slot_name("savegame20"));
        assert!(!is_slot_name("savegame"));
        assert!(!is_slot_name("savegameBackup"));
        assert!(!is_slot_name("savegame1_backup"));
        assert!(!is_slot_name("Savegame1"));
        assert!(!is_slot_name("mods"));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover(&dir.path().join("FarmingSimulator2019")).count(), 0);
    }

    #[test]
    fn test_skips_empty_and_unrelated() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        write_descriptor(&root.join("savegame1"));
        fs::create_dir_all(root.join("savegame2")).unwrap();
        write_descriptor(&root.join("savegame12"));
        write_descriptor(&root.join("savegameBackup"));
        write_descriptor(&root.join("mods"));
        fs::write(root.join("savegame3"), "not a directory").unwrap();

        let mut found: Vec<_> = discover(root)
            .map(|slot| slot.path().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        found.sort();

        assert_eq!(found, vec!["savegame1", "savegame12"]);
    }

    #[test]
    fn test_slot_load() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptor(&dir.path().join("savegame4"));

        let slot = discover(dir.path()).next().unwrap();
        let save = slot.load().unwrap();
        assert_eq!(save.identity.as_str(), "p-m");
        assert_eq!(save.folder, dir.path().join("savegame4"));
    }
}
