//! Symbol catalog
//!
//! Maps symbol names (in strip order) to loaded image handles and records
//! which symbol is the jackpot.

use std::collections::HashMap;

use crate::config::MachineConfig;
use crate::error::GameError;

/// Handle to a loaded symbol image (a texture atlas cell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub texture: TextureHandle,
}

/// Ordered symbol catalog shared by every reel
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    entries: Vec<SymbolEntry>,
    jackpot: usize,
}

impl SymbolCatalog {
    /// Build from entries in strip order
    pub fn new(entries: Vec<SymbolEntry>, jackpot: &str) -> Result<Self, GameError> {
        if entries.is_empty() {
            return Err(GameError::InvalidCatalog("catalog is empty".into()));
        }
        let jackpot = entries
            .iter()
            .position(|e| e.name == jackpot)
            .ok_or_else(|| {
                GameError::InvalidCatalog(format!("jackpot symbol '{}' is not in the catalog", jackpot))
            })?;
        Ok(Self { entries, jackpot })
    }

    /// Pair the configured order with the handles produced by asset loading
    pub fn from_loaded(
        config: &MachineConfig,
        textures: &HashMap<String, TextureHandle>,
    ) -> Result<Self, GameError> {
        let entries = config
            .symbols
            .iter()
            .map(|asset| {
                textures
                    .get(&asset.name)
                    .map(|&texture| SymbolEntry {
                        name: asset.name.clone(),
                        texture,
                    })
                    .ok_or_else(|| GameError::AssetLoad {
                        name: asset.name.clone(),
                        path: asset.path.clone(),
                        reason: "no texture was loaded for this symbol".into(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries, &config.jackpot)
    }

    /// Catalog whose handles are atlas cells 1..=n in config order
    pub fn sequential(config: &MachineConfig) -> Result<Self, GameError> {
        let entries = config
            .symbols
            .iter()
            .enumerate()
            .map(|(i, asset)| SymbolEntry {
                name: asset.name.clone(),
                texture: TextureHandle(i as u32 + 1),
            })
            .collect();
        Self::new(entries, &config.jackpot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SymbolEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn name(&self, index: usize) -> &str {
        self.entries.get(index).map(|e| e.name.as_str()).unwrap_or("?")
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Catalog index of the jackpot symbol
    pub fn jackpot(&self) -> usize {
        self.jackpot
    }

    pub fn is_jackpot(&self, index: usize) -> bool {
        index == self.jackpot
    }
}
