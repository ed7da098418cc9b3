//! Save descriptor parsing and save identity.

use crate::fill_type::MappingError;
use crate::xml::{Element, XmlError};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Save-relative descriptor file; a slot without it holds no save
pub const DESCRIPTOR_FILE: &str = "careerSavegame.xml";

/// Errors that abort processing of one save
#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("Silo stores fill type {0} which is not in the fill type mapping")]
    UnknownFillType(String),
}

/// Stable key the resource server correlates reports against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SaveIdentity(String);

impl SaveIdentity {
    pub const SEPARATOR: char = '-';

    pub fn new(player_name: &str, map_id: &str) -> Self {
        SaveIdentity(format!("{}{}{}", player_name, Self::SEPARATOR, map_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SaveIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A save found in a slot, with the settings read from its descriptor
#[derive(Debug, Clone)]
pub struct Save {
    pub folder: PathBuf,
    /// Display name, only used for logging
    pub name: String,
    pub map_id: String,
    pub player_name: String,
    pub identity: SaveIdentity,
}

impl Save {
    /// Read `careerSavegame.xml` from a save folder
    pub fn load(folder: &Path) -> Result<Self, SaveError> {
        let doc = Element::read_file(&folder.join(DESCRIPTOR_FILE))?;
        Self::from_descriptor(folder, &doc)
    }

    /// Build from a parsed descriptor (`careerSavegame` → `settings`)
    pub fn from_descriptor(folder: &Path, doc: &Element) -> Result<Self, SaveError> {
        let settings = doc.required_child("settings")?;
        let name = settings.child_text("savegameName")?.to_string();
        let map_id = settings.child_text("mapId")?.to_string();
        let player_name = settings.child_text("playerName")?.to_string();

        Ok(Save {
            folder: folder.to_path_buf(),
            identity: SaveIdentity::new(&player_name, &map_id),
            name,
            map_id,
            player_name,
        })
    }
}
