//! Per-frame update
//!
//! One call per animation frame: apply input, then advance every animation
//! by the (clamped) frame delta.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use crate::consts::MAX_FRAME_DT;

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position (CSS pixels)
    pub pointer: Option<Vec2>,
    /// Pointer pressed this frame at `pointer`
    pub pointer_down: bool,
    /// Spin requested from the keyboard
    pub spin: bool,
    /// New viewport size
    pub resize: Option<Vec2>,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };
    state.time += dt;

    if let Some(viewport) = input.resize {
        state.resize(viewport);
    }

    match state.phase {
        GamePhase::Loading => {
            state.loader.update(dt);
            state.poll_loading();
        }
        GamePhase::Failed => {}
        GamePhase::Ready => {
            if let Some(p) = input.pointer {
                state.spin_button.pointer_move(p);
                if input.pointer_down && state.spin_button.activate(p) {
                    state.request_spin();
                }
            }
            if input.spin {
                state.request_spin();
            }

            state.background.update(dt);
            state.spin_button.update(dt);
            state.update_machine(dt);
        }
    }
}
