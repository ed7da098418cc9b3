//! Fill type name to code mapping for a single save.
//!
//! Every save carries its own `densityMapHeight.xml` listing the fill types
//! the terrain and silos know about, each with a numeric index. Selling
//! stations may report fill types that never appear there, so the table can
//! grow while the inventory is being read.

use crate::xml::{Element, XmlError};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Save-relative file holding the `tipTypeMapping` entries
pub const MAPPING_FILE: &str = "densityMapHeight.xml";

/// Numeric fill type code
pub type FillTypeCode = u16;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Fill type code {code} is declared for both {existing} and {name}")]
    DuplicateCode {
        code: FillTypeCode,
        existing: String,
        name: String,
    },

    #[error("Fill type {name} is declared with codes {existing} and {code}")]
    ConflictingCode {
        name: String,
        existing: FillTypeCode,
        code: FillTypeCode,
    },

    #[error("No fill type name for code {0}")]
    UnknownCode(FillTypeCode),

    #[error("No free fill type code left for {0}")]
    Exhausted(String),

    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// Normalize a fill type name the way the game compares them
pub fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Bidirectional fill type table, scoped to one save
#[derive(Debug, Clone, Default)]
pub struct FillTypeMap {
    by_name: HashMap<String, FillTypeCode>,
    by_code: BTreeMap<FillTypeCode, String>,
}

impl FillTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the mapping declared in a save folder's `densityMapHeight.xml`
    pub fn load(save_folder: &Path) -> Result<Self, MappingError> {
        let doc = Element::read_file(&save_folder.join(MAPPING_FILE))?;
        Self::from_document(&doc)
    }

    /// Build from a parsed mapping document (root with `tipTypeMapping` children)
    pub fn from_document(doc: &Element) -> Result<Self, MappingError> {
        let mut map = Self::new();
        for entry in doc.children("tipTypeMapping") {
            let name = entry.required_attr("fillType")?;
            let code: FillTypeCode = entry.parse_attr("index")?;
            map.insert(name, code)?;
        }
        Ok(map)
    }

    /// Declare `name` with a fixed code
    ///
    /// Declaring the same pair twice is accepted. Giving a code to a second
    /// name, or a second code to a name, is rejected so that reverse lookups
    /// stay unambiguous.
    pub fn insert(&mut self, name: &str, code: FillTypeCode) -> Result<(), MappingError> {
        let name = normalize(name);

        if let Some(&existing) = self.by_name.get(&name) {
            if existing == code {
                return Ok(());
            }
            return Err(MappingError::ConflictingCode {
                name,
                existing,
                code,
            });
        }

        if let Some(existing) = self.by_code.get(&code) {
            return Err(MappingError::DuplicateCode {
                code,
                existing: existing.clone(),
                name,
            });
        }

        self.by_code.insert(code, name.clone());
        self.by_name.insert(name, code);
        Ok(())
    }

    /// Code for `name`, assigning one past the current maximum if it is new
    pub fn get_or_assign(&mut self, name: &str) -> Result<FillTypeCode, MappingError> {
        if let Some(code) = self.code(name) {
            return Ok(code);
        }

        let code = match self.max_code() {
            None => 0,
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| MappingError::Exhausted(normalize(name)))?,
        };

        tracing::debug!("Assigned fill type code {} to {}", code, normalize(name));
        self.insert(name, code)?;
        Ok(code)
    }

    pub fn code(&self, name: &str) -> Option<FillTypeCode> {
        self.by_name.get(&normalize(name)).copied()
    }

    pub fn name(&self, code: FillTypeCode) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn max_code(&self) -> Option<FillTypeCode> {
        self.by_code.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Entries ordered by code
    pub fn iter(&self) -> impl Iterator<Item = (FillTypeCode, &str)> {
        self.by_code.iter().map(|(code, name)| (*code, name.as_str()))
    }
}
