//! Animated backdrop: a vertical color gradient plus drifting glow circles

use glam::Vec2;
use rand::Rng;

use crate::consts::colors::{BACKGROUND, BACKGROUND_DARK, GLOW_COLORS};
use crate::interpolate_color;
use crate::sim::tween::{Ease, Tween};

/// Number of stacked gradient layers
pub const GRADIENT_LAYERS: usize = 15;
/// Drift clock runs at a tenth of wall time
const DRIFT_TIME_SCALE: f32 = 0.1;
/// Circles are kept inside this fraction of each axis after a resize
const INTERIOR_MIN: f32 = 0.1;
const INTERIOR_MAX: f32 = 0.9;

/// One full-screen gradient layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientLayer {
    pub color: u32,
    pub alpha: f32,
}

/// Ambient circle drifting on a sinusoidal loop
#[derive(Debug, Clone)]
pub struct GlowCircle {
    pub color: u32,
    /// Peak opacity
    pub base_alpha: f32,
    /// Diameter in pixels
    pub size: f32,
    /// Anchor as a fraction of the viewport
    pub rel: Vec2,
    pub move_range: f32,
    pub move_speed: f32,
    pub phase: f32,
    fade: Tween<f32>,
}

impl GlowCircle {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let color = GLOW_COLORS[rng.random_range(0..GLOW_COLORS.len())];
        let base_alpha = 0.01 + rng.random::<f32>() * 0.1;
        let fade_duration = 2.0 + rng.random::<f32>() * 2.0;
        let fade_delay = rng.random::<f32>() * 2.0;

        Self {
            color,
            base_alpha,
            size: 20.0 + rng.random::<f32>() * 80.0,
            rel: Vec2::new(rng.random(), rng.random()),
            move_range: 30.0 + rng.random::<f32>() * 50.0,
            move_speed: 1.0 + rng.random::<f32>() * 2.0,
            phase: rng.random::<f32>() * std::f32::consts::TAU,
            fade: Tween::new(base_alpha, base_alpha * 0.1, fade_duration, Ease::SineInOut)
                .with_delay(fade_delay),
        }
    }

    /// Current opacity
    pub fn alpha(&self) -> f32 {
        self.fade.value()
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Center for a viewport at drift time `t`
    pub fn position(&self, viewport: Vec2, t: f32) -> Vec2 {
        let angle = t * self.move_speed + self.phase;
        Vec2::new(
            self.rel.x * viewport.x + angle.sin() * self.move_range,
            self.rel.y * viewport.y + angle.cos() * self.move_range,
        )
    }

    /// Yoyo between the base opacity and a tenth of it, forever
    fn update(&mut self, dt: f32) {
        if self.fade.advance(dt) {
            self.fade = self.fade.reversed();
        }
    }
}

/// Gradient from the base background color to its dark variant
pub fn gradient_layers() -> Vec<GradientLayer> {
    (0..GRADIENT_LAYERS)
        .map(|i| {
            let ratio = i as f32 / GRADIENT_LAYERS as f32;
            GradientLayer {
                color: interpolate_color(BACKGROUND, BACKGROUND_DARK, ratio),
                alpha: 1.0 - ratio * 0.5,
            }
        })
        .collect()
}

/// Backdrop state
#[derive(Debug, Clone)]
pub struct Background {
    viewport: Vec2,
    gradient: Vec<GradientLayer>,
    circles: Vec<GlowCircle>,
    /// Seconds of drift accumulated
    clock: f32,
    drift: bool,
}

impl Background {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Vec2, circle_count: usize) -> Self {
        let circles = (0..circle_count).map(|_| GlowCircle::random(rng)).collect();
        let mut background = Self {
            viewport,
            gradient: Vec::new(),
            circles,
            clock: 0.0,
            drift: true,
        };
        background.resize(viewport);
        background
    }

    /// Rebuild the gradient and pull circles off the edges
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.gradient = gradient_layers();
        for circle in &mut self.circles {
            circle.rel = circle
                .rel
                .clamp(Vec2::splat(INTERIOR_MIN), Vec2::splat(INTERIOR_MAX));
        }
    }

    /// Freeze or resume the drift motion
    pub fn set_drift(&mut self, drift: bool) {
        self.drift = drift;
    }

    pub fn update(&mut self, dt: f32) {
        if self.drift {
            self.clock += dt;
        }
        for circle in &mut self.circles {
            circle.update(dt);
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn gradient(&self) -> &[GradientLayer] {
        &self.gradient
    }

    pub fn circles(&self) -> &[GlowCircle] {
        &self.circles
    }

    /// Drift time fed to the sinusoids
    pub fn drift_time(&self) -> f32 {
        self.clock * DRIFT_TIME_SCALE
    }

    /// Current center of a circle
    pub fn circle_position(&self, circle: &GlowCircle) -> Vec2 {
        circle.position(self.viewport, self.drift_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn background(count: usize) -> Background {
        let mut rng = Pcg32::seed_from_u64(42);
        Background::new(&mut rng, Vec2::new(800.0, 600.0), count)
    }

    #[test]
    fn test_gradient_layers() {
        let layers = gradient_layers();
        assert_eq!(layers.len(), GRADIENT_LAYERS);
        assert_eq!(layers[0].color, BACKGROUND);
        assert_eq!(layers[0].alpha, 1.0);
        assert!(layers[14].alpha > 0.5);
        assert_ne!(layers[14].color, BACKGROUND);
    }

    #[test]
    fn test_circle_parameters_in_range() {
        let bg = background(100);
        assert_eq!(bg.circles().len(), 100);
        for c in bg.circles() {
            assert!(GLOW_COLORS.contains(&c.color));
            assert!(c.base_alpha >= 0.01 && c.base_alpha < 0.11);
            assert!(c.size >= 20.0 && c.size < 100.0);
            assert!(c.move_range >= 30.0 && c.move_range < 80.0);
            assert!(c.move_speed >= 1.0 && c.move_speed < 3.0);
            assert!(c.rel.x >= INTERIOR_MIN && c.rel.x <= INTERIOR_MAX);
            assert!(c.rel.y >= INTERIOR_MIN && c.rel.y <= INTERIOR_MAX);
        }
    }

    #[test]
    fn test_position_follows_drift() {
        let mut bg = background(1);
        let start = bg.circle_position(&bg.circles()[0]);
        bg.update(2.0);
        let moved = bg.circle_position(&bg.circles()[0]);
        assert_ne!(start, moved);

        // Drift stays within the move range of the anchor
        let c = &bg.circles()[0];
        let anchor = c.rel * bg.viewport();
        assert!((moved - anchor).length() <= c.move_range + 1e-3);
    }

    #[test]
    fn test_reduced_motion_freezes_drift() {
        let mut bg = background(3);
        bg.set_drift(false);
        let before: Vec<Vec2> = bg.circles().iter().map(|c| bg.circle_position(c)).collect();
        bg.update(5.0);
        let after: Vec<Vec2> = bg.circles().iter().map(|c| bg.circle_position(c)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_fade_yoyos_between_bounds() {
        let mut bg = background(10);
        for _ in 0..2000 {
            bg.update(1.0 / 60.0);
            for c in bg.circles() {
                let a = c.alpha();
                assert!(a >= c.base_alpha * 0.1 - 1e-6 && a <= c.base_alpha + 1e-6);
            }
        }
    }

    #[test]
    fn test_resize_clamps_into_interior() {
        let mut bg = background(50);
        bg.resize(Vec2::new(320.0, 480.0));
        assert_eq!(bg.viewport(), Vec2::new(320.0, 480.0));
        assert_eq!(bg.gradient().len(), GRADIENT_LAYERS);
        for c in bg.circles() {
            assert!(c.rel.x >= INTERIOR_MIN && c.rel.x <= INTERIOR_MAX);
        }
    }
}
