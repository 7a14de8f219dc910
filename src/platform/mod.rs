//! Platform layer
//!
//! - Asset loading (browser images into the texture atlas)
//! - DOM text overlay (labels are HTML, not rasterized glyphs)

#[cfg(target_arch = "wasm32")]
pub mod assets;
pub mod overlay;

pub use overlay::{OverlayText, overlay_texts};

/// Counts finished asset loads for the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetProgress {
    total: usize,
    loaded: usize,
}

impl AssetProgress {
    pub fn new(total: usize) -> Self {
        Self { total, loaded: 0 }
    }

    /// Record one more finished asset; returns the new fraction
    pub fn advance(&mut self) -> f32 {
        self.loaded = (self.loaded + 1).min(self.total);
        self.fraction()
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f32 / self.total as f32
        }
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}
