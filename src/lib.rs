//! Lucky Reels - A three-reel browser slot machine
//!
//! Core modules:
//! - `sim`: Reel engine and spin orchestration (pure, platform independent)
//! - `ui`: Presentation components (background, loader, spin button, win overlay)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser asset loading and DOM overlay
//! - `config`: Data-driven symbol catalog and timing

pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use config::MachineConfig;
pub use error::GameError;
pub use settings::{QualityPreset, Settings};

/// Machine configuration constants
pub mod consts {
    /// Number of entries in the default symbol catalog
    pub const SYMBOL_COUNT: usize = 5;
    /// Reels on the machine
    pub const REEL_COUNT: usize = 3;
    /// Whole strip loops every spin travels before the random extra steps
    pub const BASE_ROTATIONS: u32 = 3;
    /// Spin duration of the first reel (seconds)
    pub const SPIN_DURATION: f32 = 2.5;
    /// Extra duration added per reel index (seconds), staggers the stops
    pub const REEL_DELAY: f32 = 0.5;

    /// Default symbol order and asset paths
    pub const SYMBOLS: [(&str, &str); SYMBOL_COUNT] = [
        ("cherry", "assets/cherry.png"),
        ("coin", "assets/coin.png"),
        ("horseshoe", "assets/horseshoe.png"),
        ("lemon", "assets/lemon.png"),
        ("watermelon", "assets/watermelon.png"),
    ];
    /// Symbol whose appearance in any reel window wins
    pub const JACKPOT_SYMBOL: &str = "coin";

    /// Gap between reels as a fraction of the slot size
    pub const REEL_PADDING: f32 = 0.1;
    /// Sprite edge length as a fraction of the slot size
    pub const SYMBOL_SCALE: f32 = 0.8;
    /// Reel corner radius as a fraction of the slot size
    pub const CORNER_RADIUS: f32 = 0.1;
    /// Slot size is this fraction of the smaller viewport axis
    pub const SLOT_FRACTION: f32 = 0.25;

    /// Longest frame the animation clock will advance in one step (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Palette (0xRRGGBB)
    pub mod colors {
        pub const BACKGROUND: u32 = 0x2c3e50;
        pub const BACKGROUND_DARK: u32 = 0x1a2634;
        pub const BUTTON: u32 = 0xff8800;
        pub const BUTTON_GLOW: u32 = 0xff0000;
        pub const LOADER_ERROR: u32 = 0xff0000;
        pub const WHITE: u32 = 0xffffff;
        pub const BLACK: u32 = 0x000000;
        pub const GLOW_COLORS: [u32; 5] = [0x3498db, 0xe74c3c, 0xf1c40f, 0xe67e22, 0x1abc9c];
    }
}

/// Unpack a 0xRRGGBB color into linear-ish RGBA floats
#[inline]
pub fn rgba(color: u32, alpha: f32) -> [f32; 4] {
    let r = ((color >> 16) & 0xff) as f32 / 255.0;
    let g = ((color >> 8) & 0xff) as f32 / 255.0;
    let b = (color & 0xff) as f32 / 255.0;
    [r, g, b, alpha]
}

/// Per-channel linear interpolation between two 0xRRGGBB colors
pub fn interpolate_color(from: u32, to: u32, ratio: f32) -> u32 {
    let channel = |shift: u32| {
        let a = ((from >> shift) & 0xff) as f32;
        let b = ((to >> shift) & 0xff) as f32;
        ((a + (b - a) * ratio).round() as u32).min(0xff)
    };
    (channel(16) << 16) | (channel(8) << 8) | channel(0)
}
