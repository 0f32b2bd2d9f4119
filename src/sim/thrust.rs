//! Applying the sampled thrusters to the probe

use super::probe::{ProbeInfo, ThrustInput};
use crate::consts::*;

/// Apply this tick's requested thrusters to velocity and fuel
///
/// Thrusters are handled in the order up, right, left. Each one checks the
/// tank before burning, so the last burn of a tick can leave the fuel
/// slightly negative. The right thruster pushes the probe left and vice
/// versa.
pub fn apply_thrust(probe: &mut ProbeInfo) {
    let input = probe.user_input;

    if input.contains(ThrustInput::UP) && probe.fuel >= 0.0 {
        if probe.y_vel > THRUST_FLOOR {
            probe.y_vel -= THRUST_UP;
        }
        probe.fuel -= FUEL_COST_UP;
    }
    if input.contains(ThrustInput::RIGHT) && probe.fuel >= 0.0 {
        probe.x_vel -= THRUST_SIDE;
        probe.fuel -= FUEL_COST_SIDE;
    }
    if input.contains(ThrustInput::LEFT) && probe.fuel >= 0.0 {
        probe.x_vel += THRUST_SIDE;
        probe.fuel -= FUEL_COST_SIDE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_burns_and_lifts() {
        let mut probe = ProbeInfo::new();
        probe.user_input = ThrustInput::UP;
        apply_thrust(&mut probe);
        assert!((probe.y_vel + THRUST_UP).abs() < 1e-6);
        assert_eq!(probe.fuel, FUEL_MAX - FUEL_COST_UP);
    }

    #[test]
    fn test_side_thrusters_push_opposite_way() {
        let mut probe = ProbeInfo::new();
        probe.user_input = ThrustInput::RIGHT;
        apply_thrust(&mut probe);
        assert!((probe.x_vel - (START_X_VEL - THRUST_SIDE)).abs() < 1e-6);

        let mut probe = ProbeInfo::new();
        probe.user_input = ThrustInput::LEFT;
        apply_thrust(&mut probe);
        assert!((probe.x_vel - (START_X_VEL + THRUST_SIDE)).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_side_thrusters_cancel_but_burn_twice() {
        let mut probe = ProbeInfo::new();
        probe.user_input = ThrustInput::LEFT | ThrustInput::RIGHT;
        apply_thrust(&mut probe);
        assert!((probe.x_vel - START_X_VEL).abs() < 1e-6);
        assert_eq!(probe.fuel, FUEL_MAX - 2.0 * FUEL_COST_SIDE);
    }

    #[test]
    fn test_last_drop_can_go_negative() {
        let mut probe = ProbeInfo::new();
        probe.fuel = 0.25;
        probe.user_input = ThrustInput::UP | ThrustInput::RIGHT | ThrustInput::LEFT;
        apply_thrust(&mut probe);
        // Up burns with 0.25 left, then the tank is negative and the side
        // thrusters are skipped
        assert_eq!(probe.fuel, -0.25);
        assert!((probe.x_vel - START_X_VEL).abs() < 1e-6);
    }

    #[test]
    fn test_empty_tank_does_nothing() {
        let mut probe = ProbeInfo::new();
        probe.fuel = -0.5;
        probe.user_input = ThrustInput::UP | ThrustInput::LEFT;
        let before = probe.clone();
        apply_thrust(&mut probe);
        assert_eq!(probe, before);
    }

    #[test]
    fn test_zero_fuel_still_fires_once() {
        let mut probe = ProbeInfo::new();
        probe.fuel = 0.0;
        probe.user_input = ThrustInput::LEFT;
        apply_thrust(&mut probe);
        assert_eq!(probe.fuel, -FUEL_COST_SIDE);
    }

    #[test]
    fn test_up_thrust_floor() {
        let mut probe = ProbeInfo::new();
        probe.y_vel = THRUST_FLOOR;
        probe.user_input = ThrustInput::UP;
        apply_thrust(&mut probe);
        assert_eq!(probe.y_vel, THRUST_FLOOR);
        // Fuel is still spent
        assert_eq!(probe.fuel, FUEL_MAX - FUEL_COST_UP);
    }
}
