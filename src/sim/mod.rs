//! Deterministic flight model
//!
//! Everything the game decides lives here. This module must stay pure:
//! - Fixed timestep only (one call per retrace)
//! - No wall-clock time or randomness
//! - No rendering or platform dependencies

pub mod collision;
pub mod outcome;
pub mod physics;
pub mod probe;
pub mod thrust;
pub mod view;

pub use collision::{CollisionCode, HitKind, Mask, Placement, resolve};
pub use outcome::{
    CountUp, LandingVerdict, ScoreBoard, bonus_banner, count_up_finish, count_up_step,
    judge_landing,
};
pub use physics::advance;
pub use probe::{ProbeInfo, ThrustInput};
pub use thrust::apply_thrust;
pub use view::{
    Pad, Scene, ViewState, below_view, far_probe_px, far_view_transition, out_of_sky,
};
