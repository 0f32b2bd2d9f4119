//! Procedural sprites and terrain
//!
//! Every drawable in the game is a 1-bit mask plus an offset from the
//! position it is drawn at. Nothing is loaded from disk: the probe and flame
//! shapes are text art, the landscape is sampled from one surface profile in
//! far-view units, and each pad view resamples it at twice the scale.

use std::collections::HashMap;

use glam::{IVec2, Vec2};

use crate::consts::*;
use crate::sim::{Mask, Pad, Scene};

/// Far or close-up sprite size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Far,
    Close,
}

impl Scene {
    pub fn scale(self) -> Scale {
        match self {
            Scene::Far => Scale::Far,
            Scene::Pad(_) => Scale::Close,
        }
    }
}

/// Identifies every drawable the game asks a renderer for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    Probe(Scale),
    Land(Scene),
    PadMarker(Pad),
    FlameLeft(Scale),
    FlameRight(Scale),
    /// Main thruster flame, two alternating frames
    FlameDown(Scale, u8),
    /// Crash sequence frame
    Crash(Scale, u8),
}

impl AssetId {
    /// Draw order: lower layers first
    pub fn layer(self) -> u8 {
        match self {
            AssetId::Land(_) => 0,
            AssetId::PadMarker(_) => 1,
            AssetId::Probe(_) => 2,
            AssetId::FlameLeft(_) | AssetId::FlameRight(_) | AssetId::FlameDown(..) => 3,
            AssetId::Crash(..) => 4,
        }
    }

    /// Character used by cell-based frontends
    pub fn glyph(self) -> char {
        match self {
            AssetId::Land(_) => '#',
            AssetId::PadMarker(_) => '=',
            AssetId::Probe(_) => 'A',
            AssetId::FlameLeft(_) | AssetId::FlameRight(_) | AssetId::FlameDown(..) => '*',
            AssetId::Crash(..) => '%',
        }
    }
}

/// A mask and where it sits relative to the sprite's draw position
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAsset {
    pub mask: Mask,
    pub offset: IVec2,
}

impl SpriteAsset {
    pub fn new(mask: Mask) -> Self {
        Self {
            mask,
            offset: IVec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: IVec2) -> Self {
        self.offset = offset;
        self
    }
}

/// Source of sprite images
pub trait AssetStore {
    fn sprite(&self, id: AssetId) -> Option<&SpriteAsset>;
}

/// Far-view surface profile: the first solid y for every x
#[derive(Debug, Clone)]
pub struct Terrain {
    points: Vec<Vec2>,
}

impl Default for Terrain {
    fn default() -> Self {
        Self::jupiter()
    }
}

impl Terrain {
    /// The landscape: pad A in the left valley, pad B on the central mesa,
    /// pad C in the deep right basin
    pub fn jupiter() -> Self {
        let points = [
            (-40.0, 30.0),
            (0.0, 30.0),
            (10.0, 80.0),
            (25.0, 120.0),
            (40.0, 145.0),
            (50.0, 153.0),
            (94.0, 153.0),
            (102.0, 120.0),
            (112.0, 70.0),
            (122.0, 51.5),
            (172.0, 51.5),
            (176.0, 100.0),
            (181.0, 161.0),
            (221.0, 161.0),
            (235.0, 130.0),
            (250.0, 100.0),
            (272.0, 60.0),
            (312.0, 60.0),
        ];
        Self {
            points: points.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        }
    }

    /// Surface height at x, flat beyond both ends
    pub fn surface_at(&self, x: f32) -> f32 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return f32::MAX;
        };
        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.x {
                let t = (x - a.x) / (b.x - a.x);
                return a.y + (b.y - a.y) * t;
            }
        }
        last.y
    }

    pub fn is_solid(&self, world: Vec2) -> bool {
        world.y >= self.surface_at(world.x)
    }
}

/// Land masks reach a little past the visible area on both sides. A probe
/// that gets beyond them falls out of the bottom of its view instead.
const LAND_MARGIN_X: i32 = 64;
const LAND_MASK_HEIGHT: i32 = 400;

const PROBE_ART: [&str; 21] = [
    "......######......",
    "....##########....",
    "...############...",
    "..####..##..####..",
    "..####..##..####..",
    "..##############..",
    "...############...",
    "....##########....",
    "..##############..",
    ".################.",
    ".################.",
    "..##############..",
    "....##......##....",
    "...##........##...",
    "...##........##...",
    "..##..........##..",
    "..##..........##..",
    ".##............##.",
    ".##............##.",
    "###............###",
    "###............###",
];

const FLAME_SIDE_ART: [&str; 3] = ["..#", "###", "..#"];

const FLAME_DOWN_ART: [[&str; 5]; 2] = [
    ["#####", "#####", ".###.", ".###.", "..#.."],
    ["#####", ".###.", ".###.", "..#..", "....."],
];

/// Everything drawn procedurally at startup
pub struct BuiltinAssets {
    sprites: HashMap<AssetId, SpriteAsset>,
}

impl Default for BuiltinAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinAssets {
    pub fn new() -> Self {
        let terrain = Terrain::jupiter();
        let mut sprites = HashMap::new();

        let small_probe = Mask::from_art(&PROBE_ART);
        sprites.insert(
            AssetId::Probe(Scale::Close),
            SpriteAsset::new(small_probe.scaled(2)),
        );
        sprites.insert(AssetId::Probe(Scale::Far), SpriteAsset::new(small_probe));

        sprites.insert(
            AssetId::Land(Scene::Far),
            SpriteAsset::new(land_mask(&terrain, Scene::Far))
                .with_offset(IVec2::new(-LAND_MARGIN_X, 0)),
        );
        for pad in Pad::ALL {
            let scene = Scene::Pad(pad);
            sprites.insert(
                AssetId::Land(scene),
                SpriteAsset::new(land_mask(&terrain, scene))
                    .with_offset(IVec2::new(-LAND_MARGIN_X, 0)),
            );
            let (_, size) = pad.marker_rect();
            sprites.insert(
                AssetId::PadMarker(pad),
                SpriteAsset::new(Mask::filled(size.x, size.y)),
            );
        }

        for (scale, factor) in [(Scale::Far, 1), (Scale::Close, 2)] {
            let side = Mask::from_art(&FLAME_SIDE_ART).scaled(factor);
            let left = flipped(&side);
            sprites.insert(
                AssetId::FlameLeft(scale),
                SpriteAsset::new(left).with_offset(IVec2::new(-3 * factor, 0)),
            );
            sprites.insert(
                AssetId::FlameRight(scale),
                SpriteAsset::new(side).with_offset(IVec2::new(-2 * factor, 0)),
            );
            for (frame, art) in FLAME_DOWN_ART.iter().enumerate() {
                sprites.insert(
                    AssetId::FlameDown(scale, frame as u8),
                    SpriteAsset::new(Mask::from_art(art).scaled(factor))
                        .with_offset(IVec2::new(0, 5 * factor)),
                );
            }
            let size = match scale {
                Scale::Far => IVec2::new(SMALL_PROBE_W, SMALL_PROBE_H),
                Scale::Close => IVec2::new(LARGE_PROBE_W, LARGE_PROBE_H),
            };
            for frame in 0..CRASH_FRAMES {
                sprites.insert(
                    AssetId::Crash(scale, frame as u8),
                    SpriteAsset::new(crash_frame(size, frame)),
                );
            }
        }

        Self { sprites }
    }
}

impl AssetStore for BuiltinAssets {
    fn sprite(&self, id: AssetId) -> Option<&SpriteAsset> {
        self.sprites.get(&id)
    }
}

/// Sample the terrain for one scene
///
/// In the far view the pads are part of the landscape; in a pad view the pad
/// is a separate marker sprite sitting on top of the land.
fn land_mask(terrain: &Terrain, scene: Scene) -> Mask {
    let pads: Vec<(Vec2, Vec2)> = match scene {
        Scene::Far => Pad::ALL.iter().map(|p| p.world_rect()).collect(),
        Scene::Pad(_) => Vec::new(),
    };
    Mask::from_fn(VIEW_WIDTH + 2 * LAND_MARGIN_X, LAND_MASK_HEIGHT, |x, y| {
        let world = scene.px_to_world(IVec2::new(x - LAND_MARGIN_X, y));
        terrain.is_solid(world)
            || pads.iter().any(|(pos, size)| {
                world.x >= pos.x && world.x < pos.x + size.x && world.y >= pos.y
            })
    })
}

fn flipped(mask: &Mask) -> Mask {
    Mask::from_fn(mask.width(), mask.height(), |x, y| {
        mask.get(mask.width() - 1 - x, y)
    })
}

/// Debris flying outwards from the probe's centre, thinning out per frame
fn crash_frame(size: IVec2, frame: usize) -> Mask {
    let centre = size.as_vec2() / 2.0;
    let reach = centre.length();
    let radius = reach * (frame as f32 + 1.0) / CRASH_FRAMES as f32;
    let pieces = 16 - frame as i32;
    let mut mask = Mask::new(size.x, size.y);
    for i in 0..pieces {
        let angle = i as f32 * std::f32::consts::TAU / pieces as f32 + frame as f32 * 0.3;
        let dir = Vec2::new(angle.cos(), angle.sin());
        // Every other piece trails behind the front
        let dist = if i % 2 == 0 { radius } else { radius * 0.6 };
        let p = centre + dir * dist;
        for d in [IVec2::ZERO, IVec2::X, IVec2::Y] {
            let q = p.as_ivec2() + d;
            mask.set(q.x, q.y, true);
        }
    }
    mask
}
