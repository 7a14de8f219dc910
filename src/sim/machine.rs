//! Spin orchestration
//!
//! The machine owns the reels, lays them out in the viewport, serializes
//! spins through an explicit [`SpinPhase`], joins the per-reel completions
//! and evaluates the win condition once every reel has stopped.

use std::task::{Context, Waker};

use futures::FutureExt;
use futures::future::{JoinAll, join_all};
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::completion::{Completion, CompletionFuture, completion};
use super::reel::Reel;
use super::symbols::SymbolCatalog;
use crate::config::MachineConfig;
use crate::consts::SLOT_FRACTION;

/// Spin lock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
}

/// Result of a finished spin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinOutcome {
    pub win: bool,
    /// Visible symbol names, one list per reel
    pub visible: Vec<Vec<String>>,
}

/// Reel placement for a viewport
#[derive(Debug, Clone, PartialEq)]
pub struct MachineLayout {
    pub slot_size: f32,
    pub padding: f32,
    /// Top-left corner of each reel
    pub origins: Vec<Vec2>,
}

impl MachineLayout {
    /// Center `reel_count` square reels in the viewport
    pub fn compute(viewport: Vec2, reel_count: usize, padding_ratio: f32) -> Self {
        let slot_size = (viewport.x.min(viewport.y) * SLOT_FRACTION).max(0.0);
        let padding = slot_size * padding_ratio;
        let gaps = reel_count.saturating_sub(1) as f32;
        let total_width = slot_size * reel_count as f32 + padding * gaps;
        let start_x = (viewport.x - total_width) / 2.0;
        let y = viewport.y / 2.0 - slot_size / 2.0;

        let origins = (0..reel_count)
            .map(|i| Vec2::new(start_x + (slot_size + padding) * i as f32, y))
            .collect();

        Self {
            slot_size,
            padding,
            origins,
        }
    }
}

/// The slot machine orchestrator
#[derive(Debug)]
pub struct SlotMachine {
    config: MachineConfig,
    catalog: SymbolCatalog,
    reels: Vec<Reel>,
    phase: SpinPhase,
    /// Join over the per-reel completions of the in-flight spin
    stopping: Option<JoinAll<CompletionFuture>>,
    /// Resolved once every pending reel completes
    done: Option<Completion>,
    layout: MachineLayout,
    total_spins: u64,
    total_wins: u64,
}

impl SlotMachine {
    pub fn new(config: MachineConfig, catalog: SymbolCatalog, viewport: Vec2) -> Self {
        let layout = MachineLayout::compute(viewport, config.reel_count, config.reel_padding);
        let reels = (0..config.reel_count)
            .map(|i| {
                let mut reel = Reel::with_config(&catalog, layout.slot_size, i, &config);
                reel.set_origin(layout.origins[i]);
                reel
            })
            .collect();

        log::info!(
            "Machine ready: {} reels x {} symbols, slot {:.1}px",
            config.reel_count,
            catalog.len(),
            layout.slot_size
        );

        Self {
            config,
            catalog,
            reels,
            phase: SpinPhase::Idle,
            stopping: None,
            done: None,
            layout,
            total_spins: 0,
            total_wins: 0,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn layout(&self) -> &MachineLayout {
        &self.layout
    }

    pub fn total_spins(&self) -> u64 {
        self.total_spins
    }

    pub fn total_wins(&self) -> u64 {
        self.total_wins
    }

    /// Start all reels; `None` if a spin is already in flight
    pub fn request_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<CompletionFuture> {
        if self.phase == SpinPhase::Spinning {
            log::warn!("Spin requested while spinning - ignored");
            return None;
        }

        self.phase = SpinPhase::Spinning;
        self.total_spins += 1;
        self.stopping = Some(join_all(self.reels.iter_mut().map(|reel| reel.spin(rng))));

        let (done, future) = completion();
        self.done = Some(done);
        log::info!("Spin #{} started", self.total_spins);
        Some(future)
    }

    /// Advance every reel; returns the outcome on the frame the spin ends
    pub fn update(&mut self, dt: f32) -> Option<SpinOutcome> {
        for reel in &mut self.reels {
            reel.update(dt);
        }

        if self.phase != SpinPhase::Spinning || !self.all_reels_stopped() {
            return None;
        }

        self.phase = SpinPhase::Idle;
        self.stopping = None;
        if let Some(done) = self.done.take() {
            done.resolve();
        }

        let outcome = SpinOutcome {
            win: self.check_win(),
            visible: self.visible_symbols(),
        };
        if outcome.win {
            self.total_wins += 1;
        }
        log::info!(
            "Spin #{} finished: {:?} ({})",
            self.total_spins,
            outcome.visible,
            if outcome.win { "WIN" } else { "no win" }
        );
        Some(outcome)
    }

    /// Poll the reel join without blocking the frame
    fn all_reels_stopped(&mut self) -> bool {
        let mut cx = Context::from_waker(Waker::noop());
        self.stopping
            .as_mut()
            .is_some_and(|join| join.poll_unpin(&mut cx).is_ready())
    }

    /// Re-layout for a new viewport; safe mid-spin
    pub fn resize(&mut self, viewport: Vec2) {
        let layout =
            MachineLayout::compute(viewport, self.reels.len(), self.config.reel_padding);
        for (reel, origin) in self.reels.iter_mut().zip(&layout.origins) {
            reel.set_origin(*origin);
            reel.resize(layout.slot_size);
        }
        self.layout = layout;
    }

    /// True if any reel shows the jackpot symbol
    pub fn check_win(&self) -> bool {
        self.reels.iter().any(|reel| {
            reel.visible_sprites()
                .any(|sprite| self.catalog.is_jackpot(sprite.symbol))
        })
    }

    /// Visible symbol names per reel
    pub fn visible_symbols(&self) -> Vec<Vec<String>> {
        self.reels
            .iter()
            .map(|reel| {
                reel.visible_symbols()
                    .into_iter()
                    .map(|i| self.catalog.name(i).to_string())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn machine() -> SlotMachine {
        let config = MachineConfig::default();
        let catalog = SymbolCatalog::sequential(&config).unwrap();
        SlotMachine::new(config, catalog, Vec2::new(400.0, 400.0))
    }

    fn run_spin(machine: &mut SlotMachine) -> SpinOutcome {
        for _ in 0..10_000 {
            if let Some(outcome) = machine.update(DT) {
                return outcome;
            }
        }
        panic!("spin never finished");
    }

    #[test]
    fn test_spin_ends_with_the_slowest_reel() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut machine = machine();
        let future = machine.request_spin(&mut rng).unwrap();

        // Reel 0 stops at 2.5s, reel 2 only at 3.5s
        let mut elapsed = 0.0;
        while machine.reels()[0].is_spinning() {
            assert!(machine.update(DT).is_none());
            elapsed += DT;
        }
        assert!(elapsed < 3.0);
        assert!(machine.reels()[2].is_spinning());
        assert!(machine.is_spinning());
        assert!(!future.is_resolved());

        run_spin(&mut machine);
        assert!(!machine.is_spinning());
        assert!(future.is_resolved());
    }

    #[test]
    fn test_layout_centers_reels() {
        let layout = MachineLayout::compute(Vec2::new(800.0, 400.0), 3, 0.1);
        assert_eq!(layout.slot_size, 100.0);
        assert!((layout.padding - 10.0).abs() < 1e-5);
        // Total width 320 centered in 800
        assert!((layout.origins[0].x - 240.0).abs() < 1e-4);
        assert!((layout.origins[2].x - 460.0).abs() < 1e-4);
        assert_eq!(layout.origins[1].y, 150.0);
    }

    #[test]
    fn test_initial_windows_show_cherry() {
        let machine = machine();
        assert_eq!(machine.reels().len(), 3);
        assert_eq!(machine.reels()[0].slot_size(), 100.0);
        for visible in machine.visible_symbols() {
            assert_eq!(visible, vec!["cherry".to_string()]);
        }
        assert!(!machine.check_win());
    }

    #[test]
    fn test_spin_outcome_matches_windows() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut machine = machine();
        for _ in 0..25 {
            let future = machine.request_spin(&mut rng).expect("idle machine spins");
            let outcome = run_spin(&mut machine);
            assert!(future.is_resolved());
            assert_eq!(machine.phase(), SpinPhase::Idle);

            for visible in &outcome.visible {
                assert_eq!(visible.len(), 1);
            }
            let any_coin = outcome.visible.iter().any(|v| v[0] == "coin");
            assert_eq!(outcome.win, any_coin);
        }
        assert_eq!(machine.total_spins(), 25);
    }

    #[test]
    fn test_spin_is_exclusive() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut machine = machine();
        assert!(machine.request_spin(&mut rng).is_some());
        machine.update(DT);

        let targets: Vec<_> = machine.reels().iter().map(|r| r.spin_target()).collect();
        let offsets: Vec<_> = machine.reels().iter().map(|r| r.offset()).collect();
        assert!(machine.request_spin(&mut rng).is_none());
        assert_eq!(
            machine.reels().iter().map(|r| r.spin_target()).collect::<Vec<_>>(),
            targets
        );
        assert_eq!(
            machine.reels().iter().map(|r| r.offset()).collect::<Vec<_>>(),
            offsets
        );
        assert_eq!(machine.total_spins(), 1);
    }

    #[test]
    fn test_join_waits_for_slowest_reel() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut machine = machine();
        let _ = machine.request_spin(&mut rng);

        // First reel stops at 2.5s, last at 3.5s
        let mut elapsed = 0.0;
        while elapsed < 3.0 {
            assert!(machine.update(DT).is_none());
            elapsed += DT;
        }
        assert!(!machine.reels()[0].is_spinning());
        assert!(machine.reels()[2].is_spinning());
        assert!(machine.is_spinning());

        run_spin(&mut machine);
        assert!(machine.reels().iter().all(|r| !r.is_spinning()));
    }

    #[test]
    fn test_resize_mid_spin_keeps_alignment() {
        let mut rng = Pcg32::seed_from_u64(77);
        let mut machine = machine();
        let _ = machine.request_spin(&mut rng);
        for _ in 0..45 {
            machine.update(DT);
        }
        machine.resize(Vec2::new(1000.0, 600.0));
        assert_eq!(machine.layout().slot_size, 150.0);

        let outcome = run_spin(&mut machine);
        for visible in outcome.visible {
            assert_eq!(visible.len(), 1);
        }
        for reel in machine.reels() {
            assert_eq!(reel.slot_size(), 150.0);
            assert_eq!(reel.origin(), machine.layout().origins[reel.index()]);
        }
    }
}
