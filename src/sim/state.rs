//! Game state aggregate
//!
//! Everything the frame loop advances and the renderer reads lives here:
//! the loading phase, the machine once assets are in, and the presentation
//! components around it.

use std::collections::HashMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::completion::CompletionFuture;
use super::machine::{SlotMachine, SpinOutcome};
use super::symbols::{SymbolCatalog, TextureHandle};
use crate::config::MachineConfig;
use crate::error::GameError;
use crate::settings::Settings;
use crate::ui::loader::ERROR_MESSAGE;
use crate::ui::{Background, Loader, SpinButton, WinAnimation};

/// Top-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Loader on screen, assets in flight or loader fading out
    Loading,
    /// Machine playable
    Ready,
    /// Asset loading failed; nothing but the error is shown
    Failed,
}

/// Notable transitions, drained by the platform layer each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    AssetsLoaded,
    LoadFailed(String),
    SpinStarted,
    SpinFinished(SpinOutcome),
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    /// RNG seed, kept for reproducing a session
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    pub viewport: Vec2,
    pub settings: Settings,
    pub config: MachineConfig,
    /// Present once assets are loaded and the loader has hidden
    pub machine: Option<SlotMachine>,
    pub background: Background,
    pub spin_button: SpinButton,
    pub win: WinAnimation,
    pub loader: Loader,
    /// Seconds since start
    pub time: f32,
    events: Vec<GameEvent>,
    /// Catalog waiting for the loader to finish hiding
    pending_catalog: Option<SymbolCatalog>,
    loader_hidden: Option<CompletionFuture>,
}

impl GameState {
    pub fn new(seed: u64, viewport: Vec2, config: MachineConfig, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut background =
            Background::new(&mut rng, viewport, settings.quality.background_circles());
        background.set_drift(settings.background_drift());

        Self {
            seed,
            rng,
            phase: GamePhase::Loading,
            viewport,
            spin_button: SpinButton::new(viewport),
            win: WinAnimation::new(viewport, settings.max_particles()),
            loader: Loader::new(viewport),
            background,
            settings,
            config,
            machine: None,
            time: 0.0,
            events: Vec::new(),
            pending_catalog: None,
            loader_hidden: None,
        }
    }

    /// Report asset progress as a fraction
    pub fn set_load_progress(&mut self, progress: f32) {
        if self.phase == GamePhase::Loading {
            self.loader.set_progress(progress);
        }
    }

    /// All symbol images are in; the machine appears once the loader hides
    pub fn finish_loading(
        &mut self,
        textures: &HashMap<String, TextureHandle>,
    ) -> Result<(), GameError> {
        if self.phase != GamePhase::Loading {
            return Ok(());
        }
        match SymbolCatalog::from_loaded(&self.config, textures) {
            Ok(catalog) => {
                self.loader.set_progress(1.0);
                self.pending_catalog = Some(catalog);
                self.loader_hidden = Some(self.loader.hide());
                Ok(())
            }
            Err(err) => {
                self.fail_loading(&err);
                Err(err)
            }
        }
    }

    /// Fatal asset failure: show the error and halt initialization
    pub fn fail_loading(&mut self, err: &GameError) {
        log::error!("Error preloading assets: {}", err);
        self.phase = GamePhase::Failed;
        self.pending_catalog = None;
        self.loader_hidden = None;
        self.loader.show_error(ERROR_MESSAGE);
        self.events.push(GameEvent::LoadFailed(err.to_string()));
    }

    /// Build the machine once the loader is gone
    pub(crate) fn poll_loading(&mut self) {
        if self.phase != GamePhase::Loading {
            return;
        }
        let hidden = self
            .loader_hidden
            .as_ref()
            .is_some_and(CompletionFuture::is_resolved);
        if !hidden {
            return;
        }
        self.loader_hidden = None;
        if let Some(catalog) = self.pending_catalog.take() {
            self.machine = Some(SlotMachine::new(self.config.clone(), catalog, self.viewport));
            self.phase = GamePhase::Ready;
            self.events.push(GameEvent::AssetsLoaded);
            log::info!("Assets loaded, machine ready");
        }
    }

    /// Start a spin if the machine is idle; returns true if one started
    pub fn request_spin(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        let Some(machine) = self.machine.as_mut() else {
            return false;
        };
        if machine.request_spin(&mut self.rng).is_none() {
            return false;
        }
        self.spin_button.disable();
        self.win.stop();
        self.events.push(GameEvent::SpinStarted);
        true
    }

    pub fn is_spinning(&self) -> bool {
        self.machine.as_ref().is_some_and(SlotMachine::is_spinning)
    }

    /// Advance the machine and the components that react to it
    pub(crate) fn update_machine(&mut self, dt: f32) {
        let outcome = self.machine.as_mut().and_then(|m| m.update(dt));
        if let Some(outcome) = outcome {
            self.spin_button.enable();
            if outcome.win {
                self.win.start(&mut self.rng);
            }
            self.events.push(GameEvent::SpinFinished(outcome));
        }
        self.win.update(dt, &mut self.rng);
    }

    /// Re-layout every component
    pub fn resize(&mut self, viewport: Vec2) {
        if viewport == self.viewport {
            return;
        }
        log::info!("Resize to {:.0}x{:.0}", viewport.x, viewport.y);
        self.viewport = viewport;
        self.loader.resize(viewport);
        self.background.resize(viewport);
        self.spin_button.resize(viewport);
        self.win.resize(viewport);
        if let Some(machine) = self.machine.as_mut() {
            machine.resize(viewport);
        }
    }

    /// Apply changed preferences
    pub fn apply_settings(&mut self, settings: Settings) {
        self.background.set_drift(settings.background_drift());
        self.win.set_max_particles(settings.max_particles());
        self.settings = settings;
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(
            12345,
            Vec2::new(800.0, 600.0),
            MachineConfig::default(),
            Settings::default(),
        )
    }

    fn all_textures() -> HashMap<String, TextureHandle> {
        MachineConfig::default()
            .symbol_names()
            .enumerate()
            .map(|(i, name)| (name.to_string(), TextureHandle(i as u32 + 1)))
            .collect()
    }

    #[test]
    fn test_starts_loading() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Loading);
        assert!(state.machine.is_none());
        assert_eq!(state.background.circles().len(), 100);
    }

    #[test]
    fn test_machine_waits_for_loader() {
        let mut s = state();
        s.finish_loading(&all_textures()).unwrap();
        s.poll_loading();
        assert_eq!(s.phase, GamePhase::Loading);
        assert!(s.machine.is_none());
    }

    #[test]
    fn test_missing_asset_fails_loading() {
        let mut s = state();
        let mut textures = all_textures();
        textures.remove("coin");
        assert!(s.finish_loading(&textures).is_err());
        assert_eq!(s.phase, GamePhase::Failed);
        assert!(s.loader.is_error());
        assert_eq!(s.loader.label(), ERROR_MESSAGE);
        assert!(matches!(s.drain_events().as_slice(), [GameEvent::LoadFailed(_)]));
        assert!(!s.request_spin());
    }

    #[test]
    fn test_spin_rejected_while_loading() {
        let mut s = state();
        assert!(!s.request_spin());
        assert!(s.drain_events().is_empty());
    }
}
