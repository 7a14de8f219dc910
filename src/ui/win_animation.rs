//! Win celebration: a pulsing label plus a rising particle fountain

use glam::Vec2;
use rand::Rng;

use crate::consts::colors::GLOW_COLORS;
use crate::sim::tween::{Ease, Tween};

pub const WIN_LABEL: &str = "YOU WIN!";
pub const PARTICLE_RADIUS: f32 = 5.0;
/// Particles per emission burst
pub const BURST_SIZE: usize = 3;
/// Seconds between bursts
pub const BURST_INTERVAL: f32 = 0.1;

const PARTICLE_ALPHA: f32 = 0.8;
const LABEL_IN_DURATION: f32 = 0.5;
const LABEL_SETTLE_DURATION: f32 = 0.3;
const LABEL_OUT_DURATION: f32 = 0.3;

/// A single celebration particle; removed once faded out
#[derive(Debug, Clone)]
pub struct WinParticle {
    pub color: u32,
    motion: Tween<Vec2>,
    fade: Tween<f32>,
}

impl WinParticle {
    fn spawn<R: Rng + ?Sized>(rng: &mut R, viewport: Vec2) -> Self {
        let color = GLOW_COLORS[rng.random_range(0..GLOW_COLORS.len())];
        let start = Vec2::new(rng.random::<f32>() * viewport.x, viewport.y + 10.0);
        let duration = 1.0 + rng.random::<f32>() * 2.0;
        let target = Vec2::new(
            start.x - 100.0 + rng.random::<f32>() * 200.0,
            -100.0 - rng.random::<f32>() * 200.0,
        );
        Self {
            color,
            motion: Tween::new(start, target, duration, Ease::PowerOut(1)),
            fade: Tween::new(PARTICLE_ALPHA, 0.0, duration, Ease::PowerOut(1)),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.motion.value()
    }

    pub fn alpha(&self) -> f32 {
        self.fade.value()
    }

    pub fn target(&self) -> Vec2 {
        self.motion.to
    }

    /// Returns true once the particle has faded out
    fn update(&mut self, dt: f32) -> bool {
        self.motion.advance(dt);
        self.fade.advance(dt)
    }
}

/// Label in/out animation
#[derive(Debug, Clone)]
struct LabelAnimation {
    alpha: Tween<f32>,
    scale_in: Tween<f32>,
    scale_settle: Tween<f32>,
}

impl LabelAnimation {
    fn hidden() -> Self {
        Self {
            alpha: Tween::new(0.0, 0.0, 0.0, Ease::Linear),
            scale_in: Tween::new(1.0, 1.0, 0.0, Ease::Linear),
            scale_settle: Tween::new(1.0, 1.0, 0.0, Ease::Linear),
        }
    }

    fn pop_in() -> Self {
        let ease = Ease::BackOut(1.7);
        Self {
            alpha: Tween::new(0.0, 1.0, LABEL_IN_DURATION, ease),
            scale_in: Tween::new(0.5, 1.5, LABEL_IN_DURATION, ease),
            scale_settle: Tween::new(1.5, 1.0, LABEL_SETTLE_DURATION, Ease::PowerOut(2))
                .with_delay(LABEL_IN_DURATION),
        }
    }

    fn fade_out(&mut self) {
        self.alpha = Tween::new(self.alpha(), 0.0, LABEL_OUT_DURATION, Ease::PowerIn(2));
    }

    fn alpha(&self) -> f32 {
        self.alpha.value().clamp(0.0, 1.0)
    }

    fn scale(&self) -> f32 {
        if self.scale_in.is_finished() {
            self.scale_settle.value()
        } else {
            self.scale_in.value()
        }
    }

    fn update(&mut self, dt: f32) {
        self.alpha.advance(dt);
        self.scale_in.advance(dt);
        self.scale_settle.advance(dt);
    }
}

/// Win overlay state
#[derive(Debug, Clone)]
pub struct WinAnimation {
    viewport: Vec2,
    active: bool,
    label: LabelAnimation,
    particles: Vec<WinParticle>,
    /// Seconds until the next burst
    emit_timer: f32,
    max_particles: usize,
}

impl WinAnimation {
    pub fn new(viewport: Vec2, max_particles: usize) -> Self {
        Self {
            viewport,
            active: false,
            label: LabelAnimation::hidden(),
            particles: Vec::new(),
            emit_timer: 0.0,
            max_particles,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
    }

    /// Begin the celebration; no-op while already running
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.active {
            return;
        }
        self.active = true;
        self.label = LabelAnimation::pop_in();
        self.emit_burst(rng);
        self.emit_timer = BURST_INTERVAL;
    }

    /// Stop emitting and fade the label; live particles run out on their own
    pub fn stop(&mut self) {
        self.active = false;
        self.label.fade_out();
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        self.label.update(dt);
        self.particles.retain_mut(|p| !p.update(dt));

        if self.active {
            self.emit_timer -= dt;
            while self.emit_timer <= 0.0 {
                self.emit_burst(rng);
                self.emit_timer += BURST_INTERVAL;
            }
        }
    }

    fn emit_burst<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..BURST_SIZE {
            if self.particles.len() >= self.max_particles {
                break;
            }
            self.particles.push(WinParticle::spawn(rng, self.viewport));
        }
    }

    pub fn particles(&self) -> &[WinParticle] {
        &self.particles
    }

    pub fn label_alpha(&self) -> f32 {
        self.label.alpha()
    }

    pub fn label_scale(&self) -> f32 {
        self.label.scale()
    }

    pub fn label_position(&self) -> Vec2 {
        Vec2::new(self.viewport.x / 2.0, self.viewport.y * 0.3)
    }

    pub fn font_size(&self) -> f32 {
        (self.viewport.x * 0.1).clamp(48.0, 72.0)
    }
}
