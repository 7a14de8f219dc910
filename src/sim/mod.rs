//! Simulation layer
//!
//! The reel engine and everything the frame loop advances. Pure and
//! platform independent:
//! - Time only enters through `dt`
//! - Randomness only through a caller-supplied (seeded) RNG
//! - No rendering or browser dependencies

pub mod completion;
pub mod machine;
pub mod reel;
pub mod state;
pub mod symbols;
pub mod tick;
pub mod tween;

pub use completion::{Completion, CompletionFuture, completion};
pub use machine::{MachineLayout, SlotMachine, SpinOutcome, SpinPhase};
pub use reel::{Reel, ReelFrame, Sprite};
pub use state::{GameEvent, GamePhase, GameState};
pub use symbols::{SymbolCatalog, SymbolEntry, TextureHandle};
pub use tick::{TickInput, tick};
pub use tween::{Ease, Lerp, Tween};
