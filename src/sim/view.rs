//! View states and the geometry of each view
//!
//! The far view shows the whole landscape at 1:1. Each pad view magnifies a
//! window of it by `PAD_ZOOM`, anchored at the pad's origin. The probe state
//! is always in far-view units; these helpers map it to view pixels and
//! decide when the probe has left the current view.

use glam::{IVec2, Vec2};

use super::probe::ProbeInfo;
use crate::consts::*;

/// Every state of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    Setup,
    FarView,
    PadA,
    PadB,
    PadC,
    Landed,
    Crashed,
    OutOfSky,
    GameOver,
    Quit,
    Fail,
}

impl ViewState {
    /// Entry state for a pad's close-up view
    pub fn pad(pad: Pad) -> ViewState {
        match pad {
            Pad::A => ViewState::PadA,
            Pad::B => ViewState::PadB,
            Pad::C => ViewState::PadC,
        }
    }

    /// Scene this state draws, if it is a flying view
    pub fn scene(self) -> Option<Scene> {
        match self {
            ViewState::FarView => Some(Scene::Far),
            ViewState::PadA => Some(Scene::Pad(Pad::A)),
            ViewState::PadB => Some(Scene::Pad(Pad::B)),
            ViewState::PadC => Some(Scene::Pad(Pad::C)),
            _ => None,
        }
    }

    /// States that end the session
    pub fn is_terminal(self) -> bool {
        matches!(self, ViewState::Quit | ViewState::Fail)
    }
}

/// The three landing pads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pad {
    A,
    B,
    C,
}

impl Pad {
    pub const ALL: [Pad; 3] = [Pad::A, Pad::B, Pad::C];

    /// Far-view point shown at the top-left of the pad view
    pub fn origin(self) -> Vec2 {
        match self {
            Pad::A => Vec2::new(10.0, 90.0),
            Pad::B => Vec2::new(85.0, 10.0),
            Pad::C => Vec2::new(140.0, 90.0),
        }
    }

    /// Score multiplier for a landing
    pub fn bonus(self) -> u32 {
        match self {
            Pad::A => PAD_A_BONUS,
            Pad::B => PAD_B_BONUS,
            Pad::C => PAD_C_BONUS,
        }
    }

    /// Pad marker rectangle in pad-view pixels (top-left, size)
    pub fn marker_rect(self) -> (IVec2, IVec2) {
        match self {
            Pad::A => (IVec2::new(91, 118), IVec2::new(72, PAD_HEIGHT)),
            Pad::B => (IVec2::new(97, 75), IVec2::new(72, PAD_HEIGHT)),
            Pad::C => (IVec2::new(93, 134), IVec2::new(64, PAD_HEIGHT)),
        }
    }

    /// Top edge of the pad in pad-view pixels
    pub fn surface_px(self) -> i32 {
        self.marker_rect().0.y
    }

    /// Probe sprite top when resting on the pad
    pub fn rest_y_px(self) -> i32 {
        self.surface_px() - LARGE_PROBE_H
    }

    /// Pad extent in far-view units (top-left, size)
    pub fn world_rect(self) -> (Vec2, Vec2) {
        let (pos, size) = self.marker_rect();
        let top_left = self.px_to_world(pos);
        (top_left, size.as_vec2() / PAD_ZOOM)
    }

    /// Probe sprite position in this pad view
    ///
    /// The inset is added before truncating, so left of the origin the
    /// column rounds towards the inset rather than towards zero.
    pub fn probe_px(self, probe: &ProbeInfo) -> IVec2 {
        let origin = self.origin();
        IVec2::new(
            ((probe.x_pos - origin.x) * PAD_ZOOM + VIEW_X_INSET as f32) as i32,
            ((probe.y_pos - origin.y) * PAD_ZOOM) as i32,
        )
    }

    /// Far-view coordinates of a pad-view pixel
    pub fn px_to_world(self, px: IVec2) -> Vec2 {
        let origin = self.origin();
        Vec2::new(
            (px.x - VIEW_X_INSET) as f32 / PAD_ZOOM + origin.x,
            px.y as f32 / PAD_ZOOM + origin.y,
        )
    }

    /// Whether the probe has flown out of this pad's capture zone
    pub fn probe_left_zone(self, probe: &ProbeInfo) -> bool {
        match self {
            Pad::A | Pad::C => probe.y_pos < FAR_LOW_ZONE_Y,
            Pad::B => {
                probe.y_pos < PAD_B_ZONE_MIN_Y
                    || probe.x_pos < PAD_B_ZONE_MIN_X
                    || probe.x_pos > PAD_B_ZONE_MAX_X
            }
        }
    }

    /// Whether both legs are on the pad for a landing at this sprite x
    ///
    /// Pads A and C are wide enough that any pad contact counts.
    pub fn legs_on_pad(self, probe_left_px: i32) -> bool {
        match self {
            Pad::B => (PAD_B_LEG_MIN_PX..=PAD_B_LEG_MAX_PX).contains(&probe_left_px),
            Pad::A | Pad::C => true,
        }
    }
}

/// What is currently drawn: the whole landscape or one pad's close-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    Far,
    Pad(Pad),
}

impl Scene {
    /// State that (re)enters this scene
    pub fn state(self) -> ViewState {
        match self {
            Scene::Far => ViewState::FarView,
            Scene::Pad(pad) => ViewState::pad(pad),
        }
    }

    /// Probe sprite position in this scene
    pub fn probe_px(self, probe: &ProbeInfo) -> IVec2 {
        match self {
            Scene::Far => far_probe_px(probe),
            Scene::Pad(pad) => pad.probe_px(probe),
        }
    }

    /// Far-view coordinates of a pixel of this scene
    pub fn px_to_world(self, px: IVec2) -> Vec2 {
        match self {
            Scene::Far => Vec2::new((px.x - VIEW_X_INSET) as f32, px.y as f32),
            Scene::Pad(pad) => pad.px_to_world(px),
        }
    }

    /// Size of the probe sprite drawn in this scene
    pub fn probe_size(self) -> IVec2 {
        match self {
            Scene::Far => IVec2::new(SMALL_PROBE_W, SMALL_PROBE_H),
            Scene::Pad(_) => IVec2::new(LARGE_PROBE_W, LARGE_PROBE_H),
        }
    }
}

/// Probe sprite position in the far view
pub fn far_probe_px(probe: &ProbeInfo) -> IVec2 {
    IVec2::new(probe.x_pos as i32 + VIEW_X_INSET, probe.y_pos as i32)
}

/// Pad view the far view hands over to, if the probe is in a capture zone
///
/// The low zones for pads A and C are tested first; the pad B box overlaps
/// pad A's zone for x in [100, 101) and wins there.
pub fn far_view_transition(probe: &ProbeInfo) -> Option<ViewState> {
    let mut next = None;
    if probe.y_pos >= FAR_LOW_ZONE_Y {
        if probe.x_pos < PAD_A_ZONE_MAX_X {
            next = Some(ViewState::PadA);
        }
        if probe.x_pos > PAD_C_ZONE_MIN_X {
            next = Some(ViewState::PadC);
        }
    }
    if probe.y_pos >= PAD_B_ZONE_MIN_Y
        && probe.x_pos >= PAD_B_ZONE_MIN_X
        && probe.x_pos <= PAD_B_ZONE_MAX_X
    {
        next = Some(ViewState::PadB);
    }
    next
}

/// Whether a probe sprite at this position has sunk below the view
///
/// Only possible past the edge of the terrain, where nothing stops it.
pub fn below_view(probe_px: IVec2) -> bool {
    probe_px.y >= VIEW_HEIGHT
}

/// Whether the probe has flown off the top of the far view
pub fn out_of_sky(probe: &ProbeInfo) -> bool {
    probe.y_pos <= OUT_OF_SKY_Y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_at(x: f32, y: f32) -> ProbeInfo {
        ProbeInfo {
            x_pos: x,
            y_pos: y,
            ..ProbeInfo::default()
        }
    }

    #[test]
    fn test_far_view_stays_up_high() {
        assert_eq!(far_view_transition(&probe_at(20.0, 8.0)), None);
        assert_eq!(far_view_transition(&probe_at(60.0, 89.9)), None);
        assert_eq!(far_view_transition(&probe_at(190.0, 9.9)), None);
    }

    #[test]
    fn test_far_view_pad_zones() {
        assert_eq!(far_view_transition(&probe_at(50.0, 90.0)), Some(ViewState::PadA));
        assert_eq!(far_view_transition(&probe_at(200.0, 95.0)), Some(ViewState::PadC));
        assert_eq!(far_view_transition(&probe_at(140.0, 10.0)), Some(ViewState::PadB));
        // Between the low zones but outside the B box
        assert_eq!(far_view_transition(&probe_at(180.0, 5.0)), None);
    }

    #[test]
    fn test_pad_b_wins_the_overlap() {
        assert_eq!(far_view_transition(&probe_at(100.5, 95.0)), Some(ViewState::PadB));
        assert_eq!(far_view_transition(&probe_at(99.5, 95.0)), Some(ViewState::PadA));
        assert_eq!(far_view_transition(&probe_at(180.0, 95.0)), Some(ViewState::PadB));
        assert_eq!(far_view_transition(&probe_at(180.5, 95.0)), Some(ViewState::PadC));
    }

    #[test]
    fn test_pad_zone_exit() {
        assert!(Pad::A.probe_left_zone(&probe_at(50.0, 89.0)));
        assert!(!Pad::A.probe_left_zone(&probe_at(50.0, 90.0)));
        assert!(Pad::C.probe_left_zone(&probe_at(200.0, 80.0)));
        assert!(Pad::B.probe_left_zone(&probe_at(99.0, 40.0)));
        assert!(Pad::B.probe_left_zone(&probe_at(181.0, 40.0)));
        assert!(Pad::B.probe_left_zone(&probe_at(140.0, 9.0)));
        assert!(!Pad::B.probe_left_zone(&probe_at(140.0, 40.0)));
    }

    #[test]
    fn test_pad_view_mapping() {
        let px = Pad::B.probe_px(&probe_at(140.0, 10.0));
        assert_eq!(px, IVec2::new(113, 0));
        let px = Pad::A.probe_px(&probe_at(60.25, 100.75));
        assert_eq!(px, IVec2::new(103, 21));
        assert_eq!(far_probe_px(&probe_at(20.9, 8.2)), IVec2::new(23, 8));
    }

    #[test]
    fn test_pad_view_left_of_origin() {
        // -1.5 + 3 truncates to 1, not trunc(-1.5) + 3 = 2
        let px = Pad::C.probe_px(&probe_at(139.25, 90.0));
        assert_eq!(px.x, 1);
        let px = Pad::A.probe_px(&probe_at(8.0, 90.0));
        assert_eq!(px.x, -1);
    }

    #[test]
    fn test_pixel_world_round_trip_on_grid() {
        for pad in Pad::ALL {
            let px = IVec2::new(43, 20);
            let world = pad.px_to_world(px);
            assert_eq!(pad.probe_px(&probe_at(world.x, world.y)), px);
        }
    }

    #[test]
    fn test_pad_geometry() {
        assert_eq!(Pad::A.rest_y_px(), 76);
        assert_eq!(Pad::B.rest_y_px(), 33);
        assert_eq!(Pad::C.rest_y_px(), 92);
        let (pos, size) = Pad::B.world_rect();
        assert_eq!(pos, Vec2::new(132.0, 47.5));
        assert_eq!(size, Vec2::new(36.0, 4.0));
        assert_eq!(Pad::C.bonus(), 10);
    }

    #[test]
    fn test_pad_b_legs() {
        assert!(Pad::B.legs_on_pad(97));
        assert!(Pad::B.legs_on_pad(132));
        assert!(!Pad::B.legs_on_pad(96));
        assert!(!Pad::B.legs_on_pad(133));
        assert!(Pad::A.legs_on_pad(0));
    }

    #[test]
    fn test_below_view() {
        assert!(!below_view(IVec2::new(0, VIEW_HEIGHT - 1)));
        assert!(below_view(IVec2::new(0, VIEW_HEIGHT)));
    }

    #[test]
    fn test_out_of_sky_threshold() {
        assert!(!out_of_sky(&probe_at(50.0, -20.9)));
        assert!(out_of_sky(&probe_at(50.0, -21.0)));
    }
}
