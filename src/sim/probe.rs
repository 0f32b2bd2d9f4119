//! Probe kinematics and the per-tick thrust intent

use std::ops::{BitOr, BitOrAssign};

use crate::consts::*;

/// Bitmask of thrusters requested this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ThrustInput(u8);

impl ThrustInput {
    pub const NONE: ThrustInput = ThrustInput(0);
    pub const UP: ThrustInput = ThrustInput(1);
    pub const RIGHT: ThrustInput = ThrustInput(1 << 1);
    pub const LEFT: ThrustInput = ThrustInput(1 << 2);

    #[inline]
    pub fn contains(self, other: ThrustInput) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for ThrustInput {
    type Output = ThrustInput;

    fn bitor(self, rhs: ThrustInput) -> ThrustInput {
        ThrustInput(self.0 | rhs.0)
    }
}

impl BitOrAssign for ThrustInput {
    fn bitor_assign(&mut self, rhs: ThrustInput) {
        self.0 |= rhs.0;
    }
}

/// Probe position, velocity and fuel
///
/// Position is in far-view units; each view maps it to its own pixels.
/// `user_input` is recomputed every tick and cleared on view exit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeInfo {
    pub x_pos: f32,
    pub y_pos: f32,
    pub x_vel: f32,
    pub y_vel: f32,
    pub fuel: f32,
    pub user_input: ThrustInput,
}

impl Default for ProbeInfo {
    fn default() -> Self {
        Self {
            x_pos: START_X,
            y_pos: START_Y,
            x_vel: START_X_VEL,
            y_vel: START_Y_VEL,
            fuel: FUEL_MAX,
            user_input: ThrustInput::NONE,
        }
    }
}

impl ProbeInfo {
    /// Fresh probe with a full tank
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the probe back at the top-left of the sky, keeping its fuel
    pub fn respawn(&mut self) {
        self.x_pos = START_X;
        self.y_pos = START_Y;
        self.x_vel = START_X_VEL;
        self.y_vel = START_Y_VEL;
    }

    pub fn out_of_fuel(&self) -> bool {
        self.fuel <= 0.0
    }

    /// Whether a thruster is both requested and has fuel to show a flame
    pub fn firing(&self, thruster: ThrustInput) -> bool {
        self.user_input.contains(thruster) && self.fuel > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrust_bits() {
        let input = ThrustInput::UP | ThrustInput::LEFT;
        assert!(input.contains(ThrustInput::UP));
        assert!(input.contains(ThrustInput::LEFT));
        assert!(!input.contains(ThrustInput::RIGHT));
        assert!(!input.contains(ThrustInput::NONE));
        assert!(ThrustInput::default().is_empty());
    }

    #[test]
    fn test_respawn_keeps_fuel() {
        let mut probe = ProbeInfo::new();
        probe.x_pos = 150.0;
        probe.y_vel = 1.2;
        probe.fuel = 42.5;
        probe.respawn();
        assert_eq!(probe.x_pos, START_X);
        assert_eq!(probe.y_pos, START_Y);
        assert_eq!(probe.x_vel, START_X_VEL);
        assert_eq!(probe.y_vel, START_Y_VEL);
        assert_eq!(probe.fuel, 42.5);
    }

    #[test]
    fn test_firing_needs_positive_fuel() {
        let mut probe = ProbeInfo::new();
        probe.user_input = ThrustInput::UP;
        assert!(probe.firing(ThrustInput::UP));
        probe.fuel = 0.0;
        assert!(!probe.firing(ThrustInput::UP));
    }
}
