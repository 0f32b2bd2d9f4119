//! Thruster flames and their sounds
//!
//! A flame shows while its key is held and there is fuel to burn. Sounds
//! start and stop on the same edges as the flames; the main flame flickers
//! between two frames every tick it stays lit.

use glam::IVec2;

use super::resources::SpriteSet;
use crate::assets::{AssetId, Scale};
use crate::audio::{AudioManager, Channel, SoundEffect};
use crate::platform::{Renderer, SpriteHandle};
use crate::sim::{ProbeInfo, ThrustInput};

/// Flame positions relative to the probe sprite: left, right, down
fn flame_offsets(scale: Scale) -> [IVec2; 3] {
    match scale {
        Scale::Far => [IVec2::new(0, 5), IVec2::new(20, 5), IVec2::new(7, 16)],
        Scale::Close => [IVec2::new(0, 10), IVec2::new(40, 10), IVec2::new(14, 32)],
    }
}

/// Which flames are on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThrusterVisualState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    /// Main flame frame currently shown
    pub frame: u8,
}

impl ThrusterVisualState {
    pub fn any(&self) -> bool {
        self.left || self.right || self.down
    }

    /// Bring flames and sounds in line with the probe's thrusters
    pub fn update<R: Renderer + ?Sized>(
        &mut self,
        probe: &ProbeInfo,
        probe_px: IVec2,
        scale: Scale,
        sprites: &SpriteSet,
        renderer: &mut R,
        audio: &mut AudioManager,
    ) {
        let [left_at, right_at, down_at] = flame_offsets(scale).map(|o| probe_px + o);

        side_flame(
            &mut self.left,
            probe.firing(ThrustInput::LEFT),
            sprites.handle(AssetId::FlameLeft(scale)),
            left_at,
            ThrustInput::LEFT,
            renderer,
            audio,
        );
        side_flame(
            &mut self.right,
            probe.firing(ThrustInput::RIGHT),
            sprites.handle(AssetId::FlameRight(scale)),
            right_at,
            ThrustInput::RIGHT,
            renderer,
            audio,
        );

        let firing = probe.firing(ThrustInput::UP);
        let current = sprites.handle(AssetId::FlameDown(scale, self.frame));
        match (self.down, firing) {
            (false, true) => {
                self.down = true;
                self.frame = 0;
                audio.start(SoundEffect::MainThruster);
                if let Some(h) = sprites.handle(AssetId::FlameDown(scale, 0)) {
                    renderer.draw_sprite(h, down_at);
                }
            }
            (true, true) => {
                if let Some(h) = current {
                    renderer.remove_sprite(h);
                }
                self.frame ^= 1;
                if let Some(h) = sprites.handle(AssetId::FlameDown(scale, self.frame)) {
                    renderer.draw_sprite(h, down_at);
                }
            }
            (true, false) => {
                self.down = false;
                audio.stop(Channel::Main);
                if let Some(h) = current {
                    renderer.remove_sprite(h);
                }
            }
            (false, false) => {}
        }
    }
}

fn side_flame<R: Renderer + ?Sized>(
    lit: &mut bool,
    firing: bool,
    sprite: Option<SpriteHandle>,
    at: IVec2,
    thruster: ThrustInput,
    renderer: &mut R,
    audio: &mut AudioManager,
) {
    let sound = SoundEffect::for_thruster(thruster);
    match (*lit, firing) {
        (false, true) => {
            *lit = true;
            if let Some(sound) = sound {
                audio.start(sound);
            }
            if let Some(h) = sprite {
                renderer.draw_sprite(h, at);
            }
        }
        // Follow the probe
        (true, true) => {
            if let Some(h) = sprite {
                renderer.draw_sprite(h, at);
            }
        }
        (true, false) => {
            *lit = false;
            if let Some(sound) = sound {
                audio.stop(sound.channel());
            }
            if let Some(h) = sprite {
                renderer.remove_sprite(h);
            }
        }
        (false, false) => {}
    }
}
