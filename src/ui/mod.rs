//! Presentation components
//!
//! Each component keeps its own animation state and is advanced by
//! [`crate::sim::tick`]; the renderer only reads from them. Text is exposed as
//! plain strings for the DOM overlay.

pub mod background;
pub mod loader;
pub mod spin_button;
pub mod win_animation;

pub use background::{Background, GlowCircle, GradientLayer};
pub use loader::{Loader, LoaderState};
pub use spin_button::SpinButton;
pub use win_animation::{WinAnimation, WinParticle};
