//! The playable game: a session state machine driving the flying views
//!
//! - `session`: Setup, view dispatch and the end of a game
//! - `views`: the per-tick loop shared by the far view and the pad views
//! - `outcome`: landing count-up, crash animation and the banner pauses
//! - `flames`, `input`, `resources`: per-view helpers

pub mod flames;
pub mod input;
pub mod outcome;
pub mod resources;
pub mod session;
pub mod views;

pub use session::{Flight, GameSession, SessionEnd};
