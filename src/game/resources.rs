//! Sprite ownership for a view
//!
//! A view either gets every sprite it asks for or none of them: a failed
//! allocation frees what was already taken, newest first.

use log::warn;

use crate::assets::AssetId;
use crate::error::LanderError;
use crate::platform::{Renderer, SpriteHandle};

/// Sprites allocated together and released together
#[derive(Debug, Default)]
pub struct SpriteSet {
    sprites: Vec<(AssetId, SpriteHandle)>,
}

impl SpriteSet {
    /// Allocate one sprite per asset, in order
    pub fn acquire<R: Renderer + ?Sized>(
        renderer: &mut R,
        assets: &[AssetId],
    ) -> Result<Self, LanderError> {
        let mut set = SpriteSet::default();
        for &asset in assets {
            match renderer.create_sprite(asset) {
                Ok(handle) => set.sprites.push((asset, handle)),
                Err(e) => {
                    warn!(
                        "Sprite {} of {} failed, releasing the rest",
                        set.sprites.len() + 1,
                        assets.len()
                    );
                    set.release(renderer);
                    return Err(e);
                }
            }
        }
        Ok(set)
    }

    pub fn handle(&self, asset: AssetId) -> Option<SpriteHandle> {
        self.sprites
            .iter()
            .find(|(a, _)| *a == asset)
            .map(|(_, h)| *h)
    }

    /// Hide and free every sprite, newest first
    pub fn release<R: Renderer + ?Sized>(mut self, renderer: &mut R) {
        while let Some((_, handle)) = self.sprites.pop() {
            renderer.remove_sprite(handle);
            renderer.free_sprite(handle);
        }
    }
}
