//! Platform abstraction layer
//!
//! The game core only ever talks to these traits:
//! - `Renderer`: sprite lifetime, frame presentation (one per retrace), text and rectangles
//! - `Keyboard`: thruster key state and window focus/close events
//! - `Backend`: both of the above plus the title screen
//!
//! `terminal` drives a real terminal through crossterm; `headless` is a
//! scripted stand-in used by tests and the `--headless` flag.

pub mod headless;
pub mod terminal;

use std::rc::Rc;

use glam::IVec2;

use crate::assets::{AssetId, AssetStore};
use crate::audio::AudioManager;
use crate::error::LanderError;
use crate::sim::ThrustInput;

/// Opaque handle to an allocated sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteHandle(pub u32);

/// Palette for text and rectangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Black,
    Grey,
    White,
    Blue,
    Red,
}

/// Window-level events the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    CloseRequested,
    /// Focus lost; gameplay stalls until `Active`
    Inactive,
    Active,
}

/// Title screen selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleChoice {
    Play,
    Quit,
}

/// Drawing surface paced to the display
pub trait Renderer {
    /// Allocate a sprite for an asset; hidden until drawn
    fn create_sprite(&mut self, asset: AssetId) -> Result<SpriteHandle, LanderError>;
    fn free_sprite(&mut self, sprite: SpriteHandle);
    /// Show the sprite at a view pixel position
    fn draw_sprite(&mut self, sprite: SpriteHandle, pos: IVec2);
    /// Hide the sprite, keeping it allocated
    fn remove_sprite(&mut self, sprite: SpriteHandle);
    /// Show everything drawn so far and block until the next retrace
    fn present_frame(&mut self);
    fn draw_text(&mut self, pos: IVec2, text: &str, color: Color);
    fn fill_rect(&mut self, pos: IVec2, size: IVec2, color: Color);
    /// Wipe text and rectangles
    fn clear(&mut self);

    /// Hold the current picture for a number of retraces
    fn pause(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.present_frame();
        }
    }
}

/// Thruster keys and window events
pub trait Keyboard {
    /// Thrusters whose keys are currently held
    fn poll_keys(&mut self) -> ThrustInput;
    /// Next pending window event, if any
    fn poll_window_event(&mut self) -> Option<WindowEvent>;
    /// Block until a window event arrives
    fn wait_window_event(&mut self) -> WindowEvent;
}

/// A complete frontend
pub trait Backend: Renderer + Keyboard {
    /// Show the title menu until the player picks something
    fn title_screen(&mut self, hiscore: u32) -> TitleChoice;
}

/// Everything a session needs from the outside world
pub struct Platform<B: Backend> {
    pub backend: B,
    pub audio: AudioManager,
    pub assets: Rc<dyn AssetStore>,
}

impl<B: Backend> Platform<B> {
    pub fn new(backend: B, audio: AudioManager, assets: Rc<dyn AssetStore>) -> Self {
        Self {
            backend,
            audio,
            assets,
        }
    }
}
