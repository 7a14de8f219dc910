//! The spin control
//!
//! Enabled: accepts activation, shows hover glow and scale. Disabled while
//! the reels spin: rejects input, dims, and ignores hover.

use glam::Vec2;

use crate::sim::tween::{Ease, Tween};

pub const LABEL_ENABLED: &str = "SPIN";
pub const LABEL_DISABLED: &str = "Spinning...";
/// Glow extends this far beyond the button on every side
pub const GLOW_MARGIN: f32 = 15.0;

const HOVER_SCALE: f32 = 1.05;
const DISABLED_SCALE: f32 = 0.95;
const DISABLED_ALPHA: f32 = 0.7;
const TWEEN_EASE: Ease = Ease::PowerOut(1);

/// True if `p` lies inside the rounded rectangle
pub fn rounded_rect_contains(min: Vec2, size: Vec2, radius: f32, p: Vec2) -> bool {
    let max = min + size;
    if p.x < min.x || p.y < min.y || p.x > max.x || p.y > max.y {
        return false;
    }
    let r = radius.min(size.x / 2.0).min(size.y / 2.0).max(0.0);
    // Nearest point on the inner (radius-shrunk) rectangle
    let inner = p.clamp(min + Vec2::splat(r), max - Vec2::splat(r));
    p.distance_squared(inner) <= r * r
}

fn retarget(current: &Tween<f32>, to: f32, duration: f32) -> Tween<f32> {
    Tween::new(current.value(), to, duration, TWEEN_EASE)
}

/// Spin button state
#[derive(Debug, Clone)]
pub struct SpinButton {
    center: Vec2,
    size: Vec2,
    enabled: bool,
    hovered: bool,
    alpha: f32,
    glow: Tween<f32>,
    scale: Tween<f32>,
}

impl SpinButton {
    pub fn new(viewport: Vec2) -> Self {
        let mut button = Self {
            center: Vec2::ZERO,
            size: Vec2::ZERO,
            enabled: true,
            hovered: false,
            alpha: 1.0,
            glow: Tween::new(0.0, 0.0, 0.0, TWEEN_EASE),
            scale: Tween::new(1.0, 1.0, 0.0, TWEEN_EASE),
        };
        button.resize(viewport);
        button
    }

    pub fn resize(&mut self, viewport: Vec2) {
        let width = (viewport.x * 0.2).min(200.0).max(0.0);
        self.size = Vec2::new(width, width * 0.3);
        self.center = Vec2::new(viewport.x / 2.0, viewport.y * 0.75);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Unscaled button size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn corner_radius(&self) -> f32 {
        self.size.y / 2.0
    }

    pub fn label(&self) -> &'static str {
        if self.enabled { LABEL_ENABLED } else { LABEL_DISABLED }
    }

    pub fn font_size(&self) -> f32 {
        self.size.y * 0.5
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn glow_alpha(&self) -> f32 {
        self.glow.value()
    }

    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    /// Top-left corner of the unscaled button
    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    pub fn contains(&self, p: Vec2) -> bool {
        rounded_rect_contains(self.min(), self.size, self.corner_radius(), p)
    }

    /// Track the pointer for hover feedback
    pub fn pointer_move(&mut self, p: Vec2) {
        let over = self.contains(p);
        if over == self.hovered {
            return;
        }
        self.hovered = over;
        if !self.enabled {
            return;
        }
        if over {
            self.glow = retarget(&self.glow, 1.0, 0.2);
            self.scale = retarget(&self.scale, HOVER_SCALE, 0.2);
        } else {
            self.glow = retarget(&self.glow, 0.0, 0.3);
            self.scale = retarget(&self.scale, 1.0, 0.2);
        }
    }

    /// Pointer press; true when the press should start a spin
    pub fn activate(&mut self, p: Vec2) -> bool {
        self.enabled && self.contains(p)
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.alpha = 1.0;
        self.scale = retarget(&self.scale, 1.0, 0.2);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.alpha = DISABLED_ALPHA;
        self.glow = retarget(&self.glow, 0.0, 0.2);
        self.scale = retarget(&self.scale, DISABLED_SCALE, 0.2);
    }

    pub fn update(&mut self, dt: f32) {
        self.glow.advance(dt);
        self.scale.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> SpinButton {
        SpinButton::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_layout() {
        let b = button();
        assert_eq!(b.size(), Vec2::new(160.0, 48.0));
        assert_eq!(b.center(), Vec2::new(400.0, 450.0));
        assert_eq!(b.corner_radius(), 24.0);
        assert_eq!(b.font_size(), 24.0);

        let wide = SpinButton::new(Vec2::new(2000.0, 1000.0));
        assert_eq!(wide.size().x, 200.0);
    }

    #[test]
    fn test_rounded_hit_test() {
        let b = button();
        assert!(b.contains(b.center()));
        // Bounding box corner lies outside the rounded corner
        assert!(!b.contains(b.min() + Vec2::splat(1.0)));
        assert!(b.contains(b.min() + Vec2::new(24.0, 1.0)));
        assert!(!b.contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_hover_feedback() {
        let mut b = button();
        b.pointer_move(b.center());
        assert!(b.is_hovered());
        b.update(0.5);
        assert_eq!(b.glow_alpha(), 1.0);
        assert_eq!(b.scale(), HOVER_SCALE);

        b.pointer_move(Vec2::ZERO);
        b.update(0.5);
        assert_eq!(b.glow_alpha(), 0.0);
        assert_eq!(b.scale(), 1.0);
    }

    #[test]
    fn test_disabled_rejects_input() {
        let mut b = button();
        let c = b.center();
        assert!(b.activate(c));

        b.disable();
        assert_eq!(b.label(), LABEL_DISABLED);
        assert_eq!(b.alpha(), DISABLED_ALPHA);
        assert!(!b.activate(c));

        b.pointer_move(c);
        b.update(0.5);
        assert_eq!(b.glow_alpha(), 0.0);
        assert_eq!(b.scale(), DISABLED_SCALE);

        b.enable();
        b.update(0.5);
        assert_eq!(b.label(), LABEL_ENABLED);
        assert_eq!(b.alpha(), 1.0);
        assert_eq!(b.scale(), 1.0);
        assert!(b.activate(c));
    }
}
