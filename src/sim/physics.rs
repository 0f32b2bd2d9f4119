//! Gravity and motion integration
//!
//! One call per tick, after thrust has been applied. Velocities are clamped
//! by guards rather than hard limits: a delta is applied only while the
//! velocity is still short of its bound, so the bound can be overshot by at
//! most one delta.

use super::probe::ProbeInfo;
use crate::consts::*;

/// Add one tick of gravity
#[inline]
pub fn apply_gravity(probe: &mut ProbeInfo) {
    if probe.y_vel < GRAVITY_CEILING {
        probe.y_vel += GRAVITY;
    }
}

/// Move the probe by its velocity
#[inline]
pub fn integrate(probe: &mut ProbeInfo) {
    probe.x_pos += probe.x_vel;
    probe.y_pos += probe.y_vel;
}

/// Gravity followed by motion
pub fn advance(probe: &mut ProbeInfo) {
    apply_gravity(probe);
    integrate(probe);
}
