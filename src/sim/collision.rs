//! Collision detection between the probe and the scenery
//!
//! Every hit-capable entity is a bit mask placed at a pixel position in the
//! current view. Overlap is tested pixel-by-pixel on the intersection of the
//! two bounding boxes, and the hits are folded into a single `CollisionCode`
//! per tick: touching the land always wins over touching a pad.

use glam::IVec2;

/// A 1-bit image used for hit testing and for drawing in cell-based frontends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: i32,
    height: i32,
    bits: Vec<bool>,
}

impl Mask {
    /// Empty mask
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Build a mask from a per-pixel predicate
    pub fn from_fn(width: i32, height: i32, mut solid: impl FnMut(i32, i32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..mask.height {
            for x in 0..mask.width {
                if solid(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from rows of text art ('#' is solid)
    pub fn from_art(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut mask = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    mask.set(x as i32, y as i32, true);
                }
            }
        }
        mask
    }

    /// Filled rectangle
    pub fn filled(width: i32, height: i32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Pixel lookup; anything outside the mask is empty
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: i32, y: i32, solid: bool) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) as usize;
        self.bits[idx] = solid;
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Nearest-neighbour upscale by an integer factor
    pub fn scaled(&self, factor: i32) -> Self {
        let factor = factor.max(1);
        Self::from_fn(self.width * factor, self.height * factor, |x, y| {
            self.get(x / factor, y / factor)
        })
    }

    /// Whether this mask placed at `at` shares a solid pixel with `other` placed at `other_at`
    pub fn overlaps(&self, at: IVec2, other: &Mask, other_at: IVec2) -> bool {
        let min = at.max(other_at);
        let max = (at + self.size()).min(other_at + other.size());
        if min.x >= max.x || min.y >= max.y {
            return false;
        }
        for y in min.y..max.y {
            for x in min.x..max.x {
                if self.get(x - at.x, y - at.y) && other.get(x - other_at.x, y - other_at.y) {
                    return true;
                }
            }
        }
        false
    }
}

/// What an entity counts as when the probe touches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    Probe,
    Land,
    Pad,
}

/// A mask at its position for this tick
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub kind: HitKind,
    pub mask: &'a Mask,
    pub at: IVec2,
}

impl<'a> Placement<'a> {
    pub fn new(kind: HitKind, mask: &'a Mask, at: IVec2) -> Self {
        Self { kind, mask, at }
    }
}

/// Collision signal consumed by the active view's loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionCode {
    #[default]
    None,
    Landed,
    Crashed,
}

impl CollisionCode {
    /// Fold one probe hit into the code; a crash can never be downgraded
    pub fn absorb(self, hit: HitKind) -> Self {
        match hit {
            HitKind::Pad if self != CollisionCode::Crashed => CollisionCode::Landed,
            HitKind::Land => CollisionCode::Crashed,
            _ => self,
        }
    }

    /// Combine with a code produced later in the same view
    pub fn merge(self, later: CollisionCode) -> Self {
        match (self, later) {
            (CollisionCode::Crashed, _) | (_, CollisionCode::Crashed) => CollisionCode::Crashed,
            (CollisionCode::Landed, _) | (_, CollisionCode::Landed) => CollisionCode::Landed,
            _ => CollisionCode::None,
        }
    }
}

/// Produce at most one collision code for this tick
///
/// Hits are folded in the order the entities are listed, matching a
/// hardware collision pass that reports pairs in list order.
pub fn resolve(entities: &[Placement<'_>]) -> CollisionCode {
    let mut code = CollisionCode::None;
    for probe in entities.iter().filter(|e| e.kind == HitKind::Probe) {
        for other in entities.iter().filter(|e| e.kind != HitKind::Probe) {
            if probe.mask.overlaps(probe.at, other.mask, other.at) {
                code = code.absorb(other.kind);
            }
        }
    }
    code
}
