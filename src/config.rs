//! Machine configuration
//!
//! Symbol catalog, timing and layout ratios. Defaults come from
//! [`crate::consts`]; a JSON document can override any field.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;

/// A symbol image in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolAsset {
    pub name: String,
    pub path: String,
}

/// Tunable machine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Catalog in strip order (index 0 sits in the window on a fresh reel)
    pub symbols: Vec<SymbolAsset>,
    /// Name of the winning symbol
    pub jackpot: String,
    pub reel_count: usize,
    pub base_rotations: u32,
    /// Seconds
    pub spin_duration: f32,
    /// Seconds added per reel index
    pub reel_delay: f32,
    pub reel_padding: f32,
    pub symbol_scale: f32,
    pub corner_radius: f32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            symbols: SYMBOLS
                .iter()
                .map(|(name, path)| SymbolAsset {
                    name: (*name).to_string(),
                    path: (*path).to_string(),
                })
                .collect(),
            jackpot: JACKPOT_SYMBOL.to_string(),
            reel_count: REEL_COUNT,
            base_rotations: BASE_ROTATIONS,
            spin_duration: SPIN_DURATION,
            reel_delay: REEL_DELAY,
            reel_padding: REEL_PADDING,
            symbol_scale: SYMBOL_SCALE,
            corner_radius: CORNER_RADIUS,
        }
    }
}

impl MachineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Config served by the host page, or the defaults when there is none
    pub fn from_optional_json(json: Option<&str>) -> Result<Self, GameError> {
        match json {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }

    /// Reject catalogs the reel engine cannot lay out
    pub fn validate(&self) -> Result<(), GameError> {
        if self.symbols.is_empty() {
            return Err(GameError::InvalidCatalog("catalog is empty".into()));
        }
        for (i, symbol) in self.symbols.iter().enumerate() {
            if self.symbols[..i].iter().any(|s| s.name == symbol.name) {
                return Err(GameError::InvalidCatalog(format!(
                    "duplicate symbol '{}'",
                    symbol.name
                )));
            }
        }
        if !self.symbols.iter().any(|s| s.name == self.jackpot) {
            return Err(GameError::InvalidCatalog(format!(
                "jackpot symbol '{}' is not in the catalog",
                self.jackpot
            )));
        }
        if self.reel_count == 0 {
            return Err(GameError::InvalidCatalog("machine needs at least one reel".into()));
        }
        if !(self.spin_duration.is_finite() && self.spin_duration > 0.0)
            || !(self.reel_delay.is_finite() && self.reel_delay >= 0.0)
        {
            return Err(GameError::InvalidCatalog(format!(
                "bad timing: spin {}s, delay {}s",
                self.spin_duration, self.reel_delay
            )));
        }
        Ok(())
    }

    /// Symbol names in strip order
    pub fn symbol_names(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.name.as_str())
    }

    /// Spin duration for a given reel (staggered stop)
    pub fn reel_duration(&self, reel_index: usize) -> f32 {
        self.spin_duration + reel_index as f32 * self.reel_delay
    }
}
