//! The reel engine
//!
//! A reel is a vertical strip with one sprite per catalog symbol, viewed
//! through a square window of edge `slot_size`. The strip scrolls downward by
//! an unbounded offset; sprites that leave the recycling window are moved by
//! a whole strip height so the finite set reads as an endless loop.
//!
//! Coordinates:
//! - `Sprite::y` is the sprite center in strip-local space
//! - viewport position = `Sprite::y + offset`
//! - the visible window is `[0, slot_size]` in viewport space

use glam::Vec2;
use rand::Rng;

use super::completion::{Completion, CompletionFuture, completion};
use super::symbols::{SymbolCatalog, TextureHandle};
use super::tween::{Ease, Tween};
use crate::config::MachineConfig;

/// Spin deceleration curve (cubic ease-out)
pub const SPIN_EASE: Ease = Ease::PowerOut(3);
/// Drop shadow offset in pixels
pub const SHADOW_OFFSET: f32 = 2.0;
/// Drop shadow opacity
pub const SHADOW_ALPHA: f32 = 0.2;

/// One symbol image on the strip
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Catalog index
    pub symbol: usize,
    pub texture: TextureHandle,
    /// Horizontal center (reel-local)
    pub x: f64,
    /// Vertical center (strip-local)
    pub y: f64,
    /// Edge length
    pub size: f64,
}

/// Background, shadow and mask geometry, rebuilt on every resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReelFrame {
    pub size: f32,
    pub corner_radius: f32,
}

impl ReelFrame {
    fn new(size: f64, corner_ratio: f32) -> Self {
        let size = size as f32;
        Self {
            size,
            corner_radius: size * corner_ratio,
        }
    }
}

/// Per-reel parameters taken from the machine configuration
#[derive(Debug, Clone, Copy)]
struct ReelParams {
    base_rotations: u32,
    duration: f32,
    symbol_scale: f64,
    corner_ratio: f32,
}

#[derive(Debug)]
struct ActiveSpin {
    tween: Tween<f64>,
    completion: Completion,
}

/// A single looping reel
#[derive(Debug)]
pub struct Reel {
    index: usize,
    slot_size: f64,
    offset: f64,
    sprites: Vec<Sprite>,
    frame: ReelFrame,
    /// Screen position of the reel's top-left corner
    origin: Vec2,
    params: ReelParams,
    spin: Option<ActiveSpin>,
    /// Renderer may reuse this reel's last mesh while true
    static_hint: bool,
    /// Bumped on every visual change
    revision: u64,
}

impl Reel {
    /// Build a reel with the default machine timing
    pub fn new(catalog: &SymbolCatalog, slot_size: f32, index: usize) -> Self {
        Self::with_config(catalog, slot_size, index, &MachineConfig::default())
    }

    pub fn with_config(
        catalog: &SymbolCatalog,
        slot_size: f32,
        index: usize,
        config: &MachineConfig,
    ) -> Self {
        let params = ReelParams {
            base_rotations: config.base_rotations,
            duration: config.reel_duration(index),
            symbol_scale: config.symbol_scale as f64,
            corner_ratio: config.corner_radius,
        };
        let slot = slot_size.max(0.0) as f64;
        let sprites = catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| Sprite {
                symbol: i,
                texture: entry.texture,
                x: slot / 2.0,
                y: i as f64 * slot + slot / 2.0,
                size: slot * params.symbol_scale,
            })
            .collect();

        Self {
            index,
            slot_size: slot,
            offset: 0.0,
            sprites,
            frame: ReelFrame::new(slot, params.corner_ratio),
            origin: Vec2::ZERO,
            params,
            spin: None,
            static_hint: true,
            revision: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slot_size(&self) -> f64 {
        self.slot_size
    }

    /// Current strip offset (pixels, grows with every spin)
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn frame(&self) -> ReelFrame {
        self.frame
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        if self.origin != origin {
            self.origin = origin;
            self.revision += 1;
        }
    }

    /// Total strip height
    pub fn strip_height(&self) -> f64 {
        self.slot_size * self.sprites.len() as f64
    }

    /// Sprite center in viewport space
    #[inline]
    pub fn viewport_y(&self, sprite: &Sprite) -> f64 {
        sprite.y + self.offset
    }

    /// Half-open recycling window `[lo, lo + strip_height)` in viewport space
    pub fn recycle_window(&self) -> (f64, f64) {
        let h = self.strip_height();
        let lo = (-2.0 * self.slot_size).max(self.slot_size - h);
        (lo, lo + h)
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Rendering hint: the reel will look the same next frame
    pub fn is_static(&self) -> bool {
        self.static_hint
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Seconds the spin animation lasts for this reel
    pub fn spin_duration(&self) -> f32 {
        self.params.duration
    }

    /// Start a spin; resolves once the easing animation has fully run.
    ///
    /// A reel that is already spinning keeps its in-flight target and hands
    /// back another future for the same completion.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CompletionFuture {
        if let Some(active) = &self.spin {
            return active.completion.future();
        }

        let count = self.sprites.len();
        if count == 0 || self.slot_size <= 0.0 {
            return CompletionFuture::ready();
        }

        let extra_steps = rng.random_range(0..count);
        // slot * count * (base + extra / count), kept in whole slots
        let steps = self.params.base_rotations as usize * count + extra_steps;
        let target = self.offset + self.slot_size * steps as f64;

        log::debug!(
            "reel {} spin: {} steps over {:.2}s",
            self.index,
            steps,
            self.params.duration
        );

        let (completion, future) = completion();
        self.spin = Some(ActiveSpin {
            tween: Tween::new(self.offset, target, self.params.duration, SPIN_EASE),
            completion,
        });
        self.static_hint = false;
        self.revision += 1;
        future
    }

    /// Target offset of the in-flight spin
    pub fn spin_target(&self) -> Option<f64> {
        self.spin.as_ref().map(|active| active.tween.to)
    }

    /// Advance the spin animation; returns true on the frame it completes
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(active) = self.spin.as_mut() else {
            return false;
        };

        let finished = active.tween.advance(dt);
        self.offset = active.tween.value();
        self.recycle();
        self.revision += 1;

        if finished {
            if let Some(active) = self.spin.take() {
                self.offset = active.tween.to;
                self.recycle();
                active.completion.resolve();
            }
            self.static_hint = true;
        }
        finished
    }

    /// Move every sprite into the recycling window by whole strip heights
    pub fn recycle(&mut self) {
        let h = self.strip_height();
        if h <= 0.0 {
            return;
        }
        let (lo, hi) = self.recycle_window();
        let offset = self.offset;
        for sprite in &mut self.sprites {
            let pos = sprite.y + offset;
            let wraps = ((pos - lo) / h).floor();
            if wraps != 0.0 {
                sprite.y -= wraps * h;
            }
            // Rounding can leave a sprite exactly on a boundary
            let pos = sprite.y + offset;
            if pos >= hi {
                sprite.y -= h;
            } else if pos < lo {
                sprite.y += h;
            }
        }
    }

    /// Rescale the reel to a new slot size, preserving relative scroll
    pub fn resize(&mut self, new_size: f32) {
        if !new_size.is_finite() || new_size <= 0.0 {
            log::warn!("reel {}: ignoring resize to {}", self.index, new_size);
            return;
        }

        let new_slot = new_size as f64;
        let old_slot = self.slot_size;

        if old_slot.is_finite() && old_slot > 0.0 {
            let scale = new_slot / old_slot;
            self.offset *= scale;
            for sprite in &mut self.sprites {
                sprite.x = new_slot / 2.0;
                sprite.y = (sprite.y - old_slot / 2.0) * scale + new_slot / 2.0;
                sprite.size *= scale;
            }
            if let Some(active) = self.spin.as_mut() {
                active.tween.rescale(scale);
            }
        } else {
            for (i, sprite) in self.sprites.iter_mut().enumerate() {
                sprite.x = new_slot / 2.0;
                sprite.y = i as f64 * new_slot + new_slot / 2.0;
                sprite.size = new_slot * self.params.symbol_scale;
            }
        }

        self.slot_size = new_slot;
        self.frame = ReelFrame::new(new_slot, self.params.corner_ratio);
        self.recycle();
        self.revision += 1;
    }

    /// Sprites whose viewport position lies within `[0, slot_size]`
    pub fn visible_sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(move |sprite| {
            let pos = self.viewport_y(sprite);
            pos >= 0.0 && pos <= self.slot_size
        })
    }

    /// Catalog indices of the visible sprites
    pub fn visible_symbols(&self) -> Vec<usize> {
        self.visible_sprites().map(|s| s.symbol).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::sequential(&MachineConfig::default()).unwrap()
    }

    fn run_to_completion(reel: &mut Reel) -> usize {
        let mut frames = 0;
        while !reel.update(DT) {
            frames += 1;
            assert!(frames < 10_000, "spin never finished");
        }
        frames
    }

    fn assert_aligned(reel: &Reel) {
        let slots = reel.offset() / reel.slot_size();
        assert!(
            (slots - slots.round()).abs() < 1e-6,
            "offset {} not on a slot boundary",
            reel.offset()
        );
    }

    #[test]
    fn test_initial_layout() {
        let reel = Reel::new(&catalog(), 100.0, 0);
        assert_eq!(reel.sprites().len(), 5);
        for (i, sprite) in reel.sprites().iter().enumerate() {
            assert_eq!(sprite.symbol, i);
            assert_eq!(sprite.x, 50.0);
            assert_eq!(sprite.y, i as f64 * 100.0 + 50.0);
            assert!((sprite.size - 80.0).abs() < 1e-4);
        }
        assert_eq!(reel.offset(), 0.0);
        assert_eq!(reel.frame().corner_radius, 10.0);
        assert!(reel.is_static());
    }

    #[test]
    fn test_fresh_reel_shows_first_symbol() {
        let reel = Reel::new(&catalog(), 100.0, 2);
        assert_eq!(reel.visible_symbols(), vec![0]);
    }

    #[test]
    fn test_spin_lands_on_slot_boundary() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut reel = Reel::new(&catalog(), 100.0, 0);
        for _ in 0..20 {
            let before = reel.offset();
            let _ = reel.spin(&mut rng);
            run_to_completion(&mut reel);

            let travelled = reel.offset() - before;
            // 3 whole loops plus 0..5 extra steps
            assert!(travelled >= 1500.0 - 1e-6 && travelled <= 1900.0 + 1e-6);
            assert_aligned(&reel);
            assert_eq!(reel.visible_symbols().len(), 1);
        }
    }

    #[test]
    fn test_future_resolves_only_after_duration() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut reel = Reel::new(&catalog(), 100.0, 1);
        let future = reel.spin(&mut rng);
        assert_eq!(reel.spin_duration(), 3.0);

        // Nearly there numerically, but the animation is still running
        for _ in 0..170 {
            assert!(!reel.update(DT));
        }
        let target = reel.spin_target().unwrap();
        assert!((target - reel.offset()).abs() < 1.0);
        assert!(!future.is_resolved());

        run_to_completion(&mut reel);
        assert!(future.is_resolved());
        assert!(!reel.is_spinning());
    }

    #[test]
    fn test_window_never_empty_during_spin() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut reel = Reel::new(&catalog(), 120.0, 0);
        let _ = reel.spin(&mut rng);
        let (lo, hi) = reel.recycle_window();
        loop {
            let done = reel.update(DT);
            assert!(reel.visible_sprites().count() >= 1);
            for sprite in reel.sprites() {
                let pos = reel.viewport_y(sprite);
                assert!(pos >= lo && pos < hi, "sprite escaped window at {}", pos);
            }
            if done {
                break;
            }
        }
    }

    #[test]
    fn test_static_hint_suspended_while_spinning() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut reel = Reel::new(&catalog(), 100.0, 0);
        assert!(reel.is_static());
        let _ = reel.spin(&mut rng);
        assert!(!reel.is_static());
        reel.update(DT);
        assert!(!reel.is_static());
        run_to_completion(&mut reel);
        assert!(reel.is_static());
    }

    #[test]
    fn test_second_spin_keeps_in_flight_target() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut reel = Reel::new(&catalog(), 100.0, 0);
        let first = reel.spin(&mut rng);
        reel.update(DT);
        let target = reel.spin_target();
        let offset = reel.offset();

        let second = reel.spin(&mut rng);
        assert_eq!(reel.spin_target(), target);
        assert_eq!(reel.offset(), offset);

        run_to_completion(&mut reel);
        assert!(first.is_resolved() && second.is_resolved());
    }

    #[test]
    fn test_resize_round_trip() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut reel = Reel::new(&catalog(), 100.0, 0);
        let _ = reel.spin(&mut rng);
        run_to_completion(&mut reel);

        let offset = reel.offset();
        let positions: Vec<f64> = reel.sprites().iter().map(|s| s.y).collect();

        reel.resize(137.0);
        assert!((reel.offset() - offset * 1.37).abs() < 1e-6);
        reel.resize(100.0);

        assert!((reel.offset() - offset).abs() < 1e-6);
        for (sprite, y) in reel.sprites().iter().zip(positions) {
            assert!((sprite.y - y).abs() < 1e-6);
            assert!((sprite.size - 80.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_resize_rescales_about_center() {
        let mut reel = Reel::new(&catalog(), 100.0, 0);
        reel.resize(200.0);
        assert_eq!(reel.slot_size(), 200.0);
        assert_eq!(reel.frame().size, 200.0);
        assert_eq!(reel.frame().corner_radius, 20.0);
        let ys: Vec<f64> = reel.sprites().iter().map(|s| s.y).collect();
        // (50 - 50) * 2 + 100 = 100, (150 - 50) * 2 + 100 = 300, ...
        assert_eq!(&ys[..2], &[100.0, 300.0]);
        assert_eq!(reel.visible_symbols(), vec![0]);
    }

    #[test]
    fn test_resize_mid_spin_lands_on_new_grid() {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut reel = Reel::new(&catalog(), 100.0, 0);
        let _ = reel.spin(&mut rng);
        for _ in 0..30 {
            reel.update(DT);
        }
        let before = reel.offset();
        reel.resize(150.0);
        // No snap: the current offset scales with the slot
        assert!((reel.offset() - before * 1.5).abs() < 1e-6);
        reel.update(DT);
        assert!(reel.offset() >= before * 1.5);

        run_to_completion(&mut reel);
        assert_aligned(&reel);
        assert_eq!(reel.visible_symbols().len(), 1);
    }

    #[test]
    fn test_first_layout_without_previous_size() {
        let mut reel = Reel::new(&catalog(), 0.0, 0);
        reel.resize(80.0);
        for (i, sprite) in reel.sprites().iter().enumerate() {
            let pos = reel.viewport_y(sprite);
            let expected = i as f64 * 80.0 + 40.0;
            // Stacked layout, possibly wrapped by one strip height
            assert!(
                (pos - expected).abs() < 1e-9 || (pos - (expected - 400.0)).abs() < 1e-9,
                "sprite {} at {}",
                i,
                pos
            );
            assert!((sprite.size - 64.0).abs() < 1e-4);
        }
        assert_eq!(reel.visible_symbols(), vec![0]);
    }

    #[test]
    fn test_invalid_resize_ignored() {
        let mut reel = Reel::new(&catalog(), 100.0, 0);
        let revision = reel.revision();
        reel.resize(0.0);
        reel.resize(f32::NAN);
        reel.resize(-5.0);
        assert_eq!(reel.slot_size(), 100.0);
        assert_eq!(reel.revision(), revision);
    }
}
