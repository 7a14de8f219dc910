//! DOM text overlay
//!
//! Labels (loader text, spin button, win banner, fps) are absolutely
//! positioned HTML elements over the canvas. [`overlay_texts`] derives their
//! content and placement from the game state; the browser driver only
//! writes the result into the page.

use glam::Vec2;

use crate::consts::colors::{LOADER_ERROR, WHITE};
use crate::sim::state::{GamePhase, GameState};
use crate::ui::win_animation::WIN_LABEL;

pub const LOADER_TEXT_ID: &str = "loader-text";
pub const SPIN_LABEL_ID: &str = "spin-label";
pub const WIN_TEXT_ID: &str = "win-text";
pub const FPS_ID: &str = "fps";

const WIN_COLOR: u32 = 0xf1c40f;

/// One positioned text element
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    pub id: &'static str,
    pub text: String,
    /// Center in CSS pixels
    pub center: Vec2,
    pub font_size: f32,
    pub alpha: f32,
    pub scale: f32,
    pub color: u32,
    pub visible: bool,
}

impl OverlayText {
    fn hidden(id: &'static str) -> Self {
        Self {
            id,
            text: String::new(),
            center: Vec2::ZERO,
            font_size: 16.0,
            alpha: 0.0,
            scale: 1.0,
            color: WHITE,
            visible: false,
        }
    }

    /// Inline style for the element
    pub fn css(&self) -> String {
        if !self.visible {
            return "display:none".to_string();
        }
        format!(
            "position:absolute;left:{:.1}px;top:{:.1}px;\
             transform:translate(-50%,-50%) scale({:.3});\
             font-size:{:.1}px;opacity:{:.3};color:#{:06x};pointer-events:none",
            self.center.x, self.center.y, self.scale, self.font_size, self.alpha, self.color
        )
    }
}

/// Overlay elements for the current frame
pub fn overlay_texts(state: &GameState, fps: Option<u32>) -> Vec<OverlayText> {
    let mut loader = OverlayText::hidden(LOADER_TEXT_ID);
    let mut spin = OverlayText::hidden(SPIN_LABEL_ID);
    let mut win = OverlayText::hidden(WIN_TEXT_ID);
    let mut fps_text = OverlayText::hidden(FPS_ID);

    match state.phase {
        GamePhase::Loading | GamePhase::Failed => {
            let l = &state.loader;
            if !l.is_released() {
                loader = OverlayText {
                    text: l.label().to_string(),
                    center: l.layout().label_pos,
                    font_size: l.layout().font_size,
                    alpha: l.alpha(),
                    color: if l.is_error() { LOADER_ERROR } else { WHITE },
                    visible: true,
                    ..loader
                };
            }
        }
        GamePhase::Ready => {
            let b = &state.spin_button;
            spin = OverlayText {
                text: b.label().to_string(),
                center: b.center(),
                font_size: b.font_size(),
                alpha: b.alpha(),
                scale: b.scale(),
                visible: true,
                ..spin
            };

            let w = &state.win;
            if w.label_alpha() > 0.0 {
                win = OverlayText {
                    text: WIN_LABEL.to_string(),
                    center: w.label_position(),
                    font_size: w.font_size(),
                    alpha: w.label_alpha(),
                    scale: w.label_scale(),
                    color: WIN_COLOR,
                    visible: true,
                    ..win
                };
            }
        }
    }

    if let Some(fps) = fps.filter(|_| state.settings.show_fps) {
        fps_text = OverlayText {
            text: format!("{} fps", fps),
            center: Vec2::new(40.0, 16.0),
            font_size: 12.0,
            alpha: 0.8,
            visible: true,
            ..fps_text
        };
    }

    vec![loader, spin, win, fps_text]
}

/// Write the overlay into the page; missing elements are skipped
#[cfg(target_arch = "wasm32")]
pub fn apply(document: &web_sys::Document, texts: &[OverlayText]) {
    for text in texts {
        if let Some(el) = document.get_element_by_id(text.id) {
            if el.text_content().as_deref() != Some(text.text.as_str()) {
                el.set_text_content(Some(&text.text));
            }
            let _ = el.set_attribute("style", &text.css());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;
    use crate::error::GameError;
    use crate::settings::Settings;
    use crate::ui::loader::ERROR_MESSAGE;

    fn state() -> GameState {
        GameState::new(
            1,
            Vec2::new(800.0, 600.0),
            MachineConfig::default(),
            Settings::default(),
        )
    }

    fn find<'a>(texts: &'a [OverlayText], id: &str) -> &'a OverlayText {
        texts.iter().find(|t| t.id == id).unwrap()
    }

    #[test]
    fn test_loading_shows_only_loader_text() {
        let texts = overlay_texts(&state(), Some(60));
        let loader = find(&texts, LOADER_TEXT_ID);
        assert!(loader.visible);
        assert_eq!(loader.text, "Loading... 0%");
        assert!(!find(&texts, SPIN_LABEL_ID).visible);
        assert!(!find(&texts, WIN_TEXT_ID).visible);
        // fps hidden unless enabled in settings
        assert!(!find(&texts, FPS_ID).visible);
    }

    #[test]
    fn test_error_text_is_red() {
        let mut s = state();
        s.fail_loading(&GameError::AssetLoad {
            name: "coin".into(),
            path: "assets/coin.png".into(),
            reason: "404".into(),
        });
        let texts = overlay_texts(&s, None);
        let loader = find(&texts, LOADER_TEXT_ID);
        assert_eq!(loader.text, ERROR_MESSAGE);
        assert_eq!(loader.color, LOADER_ERROR);
        assert!(loader.css().contains("color:#ff0000"));
    }

    #[test]
    fn test_hidden_css() {
        assert_eq!(OverlayText::hidden(FPS_ID).css(), "display:none");
    }
}
