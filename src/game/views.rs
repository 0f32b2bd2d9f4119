//! Flying views: the far view and the three pad close-ups
//!
//! Every view runs the same tick: sample input, apply gravity and motion,
//! check the view's exit rule, place the probe, resolve collisions, then
//! either leave (clearing flames and input) or show the frame.

use glam::IVec2;
use log::debug;

use super::flames::ThrusterVisualState;
use super::input::{Sampled, sample_input};
use super::resources::SpriteSet;
use super::session::Flight;
use crate::assets::{AssetId, AssetStore};
use crate::error::LanderError;
use crate::platform::{Backend, Platform, Renderer};
use crate::sim::{
    CollisionCode, HitKind, Placement, ProbeInfo, Scene, ThrustInput, ViewState, below_view,
    far_view_transition, out_of_sky, physics, resolve,
};

/// The view on screen and the sprites it owns
#[derive(Debug)]
pub struct ActiveView {
    pub scene: Scene,
    pub sprites: SpriteSet,
    /// Where the probe sprite was last drawn
    pub probe_px: IVec2,
    pub flames: ThrusterVisualState,
}

impl ActiveView {
    /// Sprites a scene needs, in draw order
    pub fn assets(scene: Scene) -> Vec<AssetId> {
        let scale = scene.scale();
        let mut assets = vec![AssetId::Land(scene)];
        if let Scene::Pad(pad) = scene {
            assets.push(AssetId::PadMarker(pad));
        }
        assets.extend([
            AssetId::Probe(scale),
            AssetId::FlameLeft(scale),
            AssetId::FlameRight(scale),
            AssetId::FlameDown(scale, 0),
            AssetId::FlameDown(scale, 1),
        ]);
        assets
    }

    /// Allocate the scene's sprites and draw the scenery and the probe
    pub fn enter<R: Renderer + ?Sized>(
        scene: Scene,
        probe: &ProbeInfo,
        renderer: &mut R,
    ) -> Result<Self, LanderError> {
        let sprites = SpriteSet::acquire(renderer, &Self::assets(scene))?;
        if let Some(land) = sprites.handle(AssetId::Land(scene)) {
            renderer.draw_sprite(land, IVec2::ZERO);
        }
        if let Scene::Pad(pad) = scene {
            if let Some(marker) = sprites.handle(AssetId::PadMarker(pad)) {
                renderer.draw_sprite(marker, pad.marker_rect().0);
            }
        }
        let mut view = Self {
            scene,
            sprites,
            probe_px: scene.probe_px(probe),
            flames: ThrusterVisualState::default(),
        };
        view.draw_probe(renderer);
        debug!("Entered {:?}", scene);
        Ok(view)
    }

    /// Free every sprite of the view
    pub fn leave<R: Renderer + ?Sized>(self, renderer: &mut R) {
        debug!("Leaving {:?}", self.scene);
        self.sprites.release(renderer);
    }

    pub fn draw_probe<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if let Some(h) = self.sprites.handle(AssetId::Probe(self.scene.scale())) {
            renderer.draw_sprite(h, self.probe_px);
        }
    }

    pub fn hide_probe<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if let Some(h) = self.sprites.handle(AssetId::Probe(self.scene.scale())) {
            renderer.remove_sprite(h);
        }
    }

    /// Collision code for the probe where it is drawn now
    pub fn collide(&self, assets: &dyn AssetStore) -> CollisionCode {
        let mut entities = Vec::with_capacity(3);
        if let Some(probe) = assets.sprite(AssetId::Probe(self.scene.scale())) {
            entities.push(Placement::new(
                HitKind::Probe,
                &probe.mask,
                self.probe_px + probe.offset,
            ));
        }
        if let Scene::Pad(pad) = self.scene {
            if let Some(marker) = assets.sprite(AssetId::PadMarker(pad)) {
                entities.push(Placement::new(
                    HitKind::Pad,
                    &marker.mask,
                    pad.marker_rect().0 + marker.offset,
                ));
            }
        }
        if let Some(land) = assets.sprite(AssetId::Land(self.scene)) {
            entities.push(Placement::new(HitKind::Land, &land.mask, land.offset));
        }
        resolve(&entities)
    }

    /// Take the flames down and silence the thrusters
    fn douse<B: Backend>(&mut self, probe: &mut ProbeInfo, platform: &mut Platform<B>) {
        probe.user_input = ThrustInput::NONE;
        self.flames.update(
            probe,
            self.probe_px,
            self.scene.scale(),
            &self.sprites,
            &mut platform.backend,
            &mut platform.audio,
        );
    }
}

/// Run ticks until the view hands over to another state
pub fn fly<B: Backend>(
    flight: &mut Flight,
    view: &mut ActiveView,
    platform: &mut Platform<B>,
) -> ViewState {
    loop {
        if let Some(next) = tick(flight, view, platform) {
            debug!("{:?} exits to {:?}", view.scene, next);
            return next;
        }
    }
}

/// One retrace of a flying view
pub fn tick<B: Backend>(
    flight: &mut Flight,
    view: &mut ActiveView,
    platform: &mut Platform<B>,
) -> Option<ViewState> {
    if sample_input(&mut platform.backend, &mut flight.probe) == Sampled::Quit {
        view.douse(&mut flight.probe, platform);
        return Some(ViewState::Quit);
    }
    flight.hud.update_fuel(&mut platform.backend, flight.probe.fuel);

    physics::apply_gravity(&mut flight.probe);
    flight
        .hud
        .update_velocity_scale(&mut platform.backend, flight.probe.y_vel);
    physics::integrate(&mut flight.probe);

    let mut next = match view.scene {
        Scene::Far => far_view_transition(&flight.probe),
        Scene::Pad(pad) => pad
            .probe_left_zone(&flight.probe)
            .then_some(ViewState::FarView),
    };

    view.probe_px = view.scene.probe_px(&flight.probe);
    view.draw_probe(&mut platform.backend);

    flight.collision = flight
        .collision
        .merge(view.collide(platform.assets.as_ref()));
    match (flight.collision, view.scene) {
        (CollisionCode::Crashed, _) => next = Some(ViewState::Crashed),
        (CollisionCode::Landed, Scene::Pad(pad)) => {
            view.probe_px.y = pad.rest_y_px();
            view.draw_probe(&mut platform.backend);
            next = Some(ViewState::Landed);
        }
        _ if next.is_none() && below_view(view.probe_px) => {
            debug!("Probe fell out of {:?}", view.scene);
            next = Some(ViewState::Crashed);
        }
        _ => {}
    }

    if next.is_some() {
        view.douse(&mut flight.probe, platform);
        return next;
    }

    view.flames.update(
        &flight.probe,
        view.probe_px,
        view.scene.scale(),
        &view.sprites,
        &mut platform.backend,
        &mut platform.audio,
    );
    platform.backend.present_frame();

    if view.scene == Scene::Far && out_of_sky(&flight.probe) {
        view.douse(&mut flight.probe, platform);
        return Some(ViewState::OutOfSky);
    }
    None
}
