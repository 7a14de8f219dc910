//! Loading overlay
//!
//! Shows asset progress and stays on screen for at least
//! [`MIN_DISPLAY_TIME`] even when loading finishes instantly. `hide()` hands
//! back a future that resolves once the overlay has faded out and released
//! its drawables.

use glam::Vec2;

use crate::sim::completion::{Completion, CompletionFuture, completion};
use crate::sim::tween::{Ease, Tween};

/// Minimum time the loader stays visible (seconds)
pub const MIN_DISPLAY_TIME: f32 = 1.0;
/// Fade-out duration (seconds)
pub const FADE_DURATION: f32 = 0.3;
/// Shown when assets fail to load
pub const ERROR_MESSAGE: &str = "Error loading game. Please refresh.";

const BAR_INSET: f32 = 2.0;
const LABEL_GAP: f32 = 20.0;

/// Loader lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Visible,
    /// Waiting out the minimum display time
    Hiding,
    FadingOut,
    /// Drawables released; every call is a no-op
    Released,
}

/// Geometry of the progress box for a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoaderLayout {
    pub box_min: Vec2,
    pub box_size: Vec2,
    /// Fill bar area at 100%
    pub bar_min: Vec2,
    pub bar_size: Vec2,
    /// Label center
    pub label_pos: Vec2,
    pub font_size: f32,
}

impl LoaderLayout {
    pub fn compute(viewport: Vec2) -> Self {
        let box_size = Vec2::new((viewport.x * 0.3).min(300.0), (viewport.y * 0.03).max(20.0));
        let center = viewport / 2.0;
        let bar_size = (box_size - Vec2::splat(BAR_INSET * 2.0)).max(Vec2::ZERO);
        Self {
            box_min: center - box_size / 2.0,
            box_size,
            bar_min: center - bar_size / 2.0,
            bar_size,
            label_pos: Vec2::new(center.x, center.y + box_size.y + LABEL_GAP),
            font_size: (viewport.x * 0.02).max(16.0),
        }
    }

    /// Corner radius of the box and bar
    pub fn corner_radius(&self) -> f32 {
        self.box_size.y / 2.0
    }
}

/// Loading overlay state
#[derive(Debug)]
pub struct Loader {
    state: LoaderState,
    layout: LoaderLayout,
    progress: f32,
    label: String,
    error: bool,
    /// Seconds since the loader was shown
    elapsed: f32,
    alpha: f32,
    fade: Option<Tween<f32>>,
    hidden: Option<Completion>,
}

impl Loader {
    pub fn new(viewport: Vec2) -> Self {
        let mut loader = Self {
            state: LoaderState::Visible,
            layout: LoaderLayout::compute(viewport),
            progress: 0.0,
            label: String::new(),
            error: false,
            elapsed: 0.0,
            alpha: 1.0,
            fade: None,
            hidden: None,
        };
        loader.set_progress(0.0);
        loader
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn is_released(&self) -> bool {
        self.state == LoaderState::Released
    }

    pub fn layout(&self) -> &LoaderLayout {
        &self.layout
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Overlay opacity
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Fill bar width for the current progress
    pub fn bar_width(&self) -> f32 {
        self.layout.bar_size.x * self.progress
    }

    /// Update the fill fraction, clamped to `[0, 1]`
    pub fn set_progress(&mut self, progress: f32) {
        if self.is_released() || self.error {
            return;
        }
        self.progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.label = format!("Loading... {}%", (self.progress * 100.0).floor() as u32);
    }

    /// Replace the label with an error and freeze the overlay
    pub fn show_error(&mut self, message: &str) {
        if self.is_released() {
            return;
        }
        self.error = true;
        self.label = message.to_string();
    }

    pub fn resize(&mut self, viewport: Vec2) {
        if self.is_released() {
            return;
        }
        self.layout = LoaderLayout::compute(viewport);
    }

    /// Begin hiding; resolves after the minimum display time plus the fade
    pub fn hide(&mut self) -> CompletionFuture {
        match self.state {
            LoaderState::Released => CompletionFuture::ready(),
            LoaderState::Hiding | LoaderState::FadingOut => match &self.hidden {
                Some(done) => done.future(),
                None => CompletionFuture::ready(),
            },
            LoaderState::Visible => {
                let (done, future) = completion();
                self.hidden = Some(done);
                self.state = LoaderState::Hiding;
                log::debug!(
                    "loader hide requested after {:.2}s",
                    self.elapsed
                );
                self.advance_hide();
                future
            }
        }
    }

    pub fn update(&mut self, dt: f32) {
        if self.is_released() {
            return;
        }
        self.elapsed += dt.max(0.0);

        if let Some(fade) = self.fade.as_mut() {
            let finished = fade.advance(dt);
            self.alpha = fade.value();
            if finished {
                self.release();
                return;
            }
        }
        self.advance_hide();
    }

    fn advance_hide(&mut self) {
        if self.state == LoaderState::Hiding && self.elapsed >= MIN_DISPLAY_TIME {
            self.state = LoaderState::FadingOut;
            self.fade = Some(Tween::new(1.0, 0.0, FADE_DURATION, Ease::PowerOut(2)));
        }
    }

    fn release(&mut self) {
        self.state = LoaderState::Released;
        self.fade = None;
        self.alpha = 0.0;
        self.label.clear();
        if let Some(done) = self.hidden.take() {
            done.resolve();
        }
        log::info!("Loader released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(loader: &mut Loader, seconds: f32) {
        let mut t = 0.0;
        while t < seconds {
            loader.update(DT);
            t += DT;
        }
    }

    #[test]
    fn test_progress_label_and_clamp() {
        let mut loader = Loader::new(Vec2::new(1000.0, 800.0));
        assert_eq!(loader.label(), "Loading... 0%");
        loader.set_progress(0.4);
        assert_eq!(loader.label(), "Loading... 40%");
        loader.set_progress(0.999);
        assert_eq!(loader.label(), "Loading... 99%");
        loader.set_progress(3.0);
        assert_eq!(loader.progress(), 1.0);
        assert_eq!(loader.bar_width(), loader.layout().bar_size.x);
        loader.set_progress(-1.0);
        assert_eq!(loader.progress(), 0.0);
    }

    #[test]
    fn test_layout() {
        let layout = LoaderLayout::compute(Vec2::new(2000.0, 400.0));
        assert_eq!(layout.box_size, Vec2::new(300.0, 20.0));
        assert_eq!(layout.bar_size, Vec2::new(296.0, 16.0));
        assert_eq!(layout.box_min, Vec2::new(850.0, 190.0));
        assert_eq!(layout.font_size, 40.0);
        assert_eq!(layout.label_pos, Vec2::new(1000.0, 240.0));
    }

    #[test]
    fn test_minimum_display_time() {
        let mut loader = Loader::new(Vec2::new(800.0, 600.0));
        loader.set_progress(1.0);
        let hidden = loader.hide();

        run(&mut loader, 0.9);
        assert_eq!(loader.state(), LoaderState::Hiding);
        assert_eq!(loader.alpha(), 1.0);
        assert!(!hidden.is_resolved());

        run(&mut loader, 0.2);
        assert_eq!(loader.state(), LoaderState::FadingOut);
        assert!(!hidden.is_resolved());

        run(&mut loader, 0.4);
        assert!(loader.is_released());
        assert!(hidden.is_resolved());
    }

    #[test]
    fn test_late_hide_fades_immediately() {
        let mut loader = Loader::new(Vec2::new(800.0, 600.0));
        run(&mut loader, 2.0);
        let _ = loader.hide();
        assert_eq!(loader.state(), LoaderState::FadingOut);
        loader.update(0.15);
        assert!(loader.alpha() < 1.0 && loader.alpha() > 0.0);
    }

    #[test]
    fn test_second_hide_shares_completion() {
        let mut loader = Loader::new(Vec2::new(800.0, 600.0));
        let first = loader.hide();
        let second = loader.hide();
        run(&mut loader, 1.5);
        assert!(first.is_resolved() && second.is_resolved());
        assert!(loader.hide().is_resolved());
    }

    #[test]
    fn test_released_loader_ignores_calls() {
        let mut loader = Loader::new(Vec2::new(800.0, 600.0));
        let _ = loader.hide();
        run(&mut loader, 1.5);
        let layout = *loader.layout();
        loader.resize(Vec2::new(100.0, 100.0));
        loader.set_progress(0.5);
        loader.show_error(ERROR_MESSAGE);
        assert_eq!(*loader.layout(), layout);
        assert_eq!(loader.label(), "");
        assert!(!loader.is_error());
    }

    #[test]
    fn test_resize_mid_fade() {
        let mut loader = Loader::new(Vec2::new(800.0, 600.0));
        run(&mut loader, 1.0);
        let _ = loader.hide();
        loader.update(0.1);
        loader.resize(Vec2::new(400.0, 300.0));
        assert!((loader.layout().box_size.x - 120.0).abs() < 1e-4);
        run(&mut loader, 0.5);
        assert!(loader.is_released());
    }

    #[test]
    fn test_error_freezes_progress() {
        let mut loader = Loader::new(Vec2::new(800.0, 600.0));
        loader.set_progress(0.6);
        loader.show_error(ERROR_MESSAGE);
        loader.set_progress(1.0);
        assert!(loader.is_error());
        assert_eq!(loader.label(), ERROR_MESSAGE);
        assert_eq!(loader.progress(), 0.6);
    }
}
