//! Time-based tweens and easing curves
//!
//! Easing is a pure function of the elapsed fraction; a [`Tween`] only tracks
//! time and interpolates between two values. Nothing here schedules itself:
//! owners call [`Tween::advance`] once per frame.

use glam::Vec2;

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// `t^n`
    PowerIn(i32),
    /// `1 - (1 - t)^n` (fast start, decelerating finish)
    PowerOut(i32),
    /// Half-cosine in-out
    SineInOut,
    /// Overshoots past 1 before settling; the value is the overshoot amount
    BackOut(f32),
}

impl Ease {
    /// Map an elapsed fraction in `[0, 1]` to a progress fraction
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::PowerIn(n) => t.powi(n),
            Ease::PowerOut(n) => 1.0 - (1.0 - t).powi(n),
            Ease::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
            Ease::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
        }
    }
}

/// Values a tween can interpolate
pub trait Lerp: Copy {
    fn lerp_to(self, to: Self, t: f32) -> Self;
    fn scaled(self, factor: f64) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }

    fn scaled(self, factor: f64) -> Self {
        self * factor as f32
    }
}

impl Lerp for f64 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self + (to - self) * t as f64
    }

    fn scaled(self, factor: f64) -> Self {
        self * factor
    }
}

impl Lerp for Vec2 {
    fn lerp_to(self, to: Self, t: f32) -> Self {
        self.lerp(to, t)
    }

    fn scaled(self, factor: f64) -> Self {
        self * factor as f32
    }
}

/// Interpolates a value from `from` to `to` over `duration` seconds
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T: Lerp> {
    pub from: T,
    pub to: T,
    pub ease: Ease,
    duration: f32,
    delay: f32,
    elapsed: f32,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            ease,
            duration: duration.max(0.0),
            delay: 0.0,
            elapsed: 0.0,
        }
    }

    /// Hold at `from` for `delay` seconds before starting
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Advance the clock; returns true once the tween has fully completed
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.delay + self.duration);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    /// Elapsed fraction of the active (post-delay) part, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    /// Current interpolated value; exactly `to` once finished
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        self.from.lerp_to(self.to, self.ease.apply(self.progress()))
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Rescale both endpoints, keeping the clock
    pub fn rescale(&mut self, factor: f64) {
        self.from = self.from.scaled(factor);
        self.to = self.to.scaled(factor);
    }

    /// Restart running back toward the start value (yoyo)
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            ease: self.ease,
            duration: self.duration,
            delay: 0.0,
            elapsed: 0.0,
        }
    }
}
