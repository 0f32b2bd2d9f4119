//! Per-tick input sampling

use log::{debug, info};

use crate::platform::{Keyboard, WindowEvent};
use crate::sim::{ProbeInfo, apply_thrust};

/// Whether the tick may go on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampled {
    Ready,
    Quit,
}

/// Read the window and the keys, then burn the requested thrusters
///
/// A close request ends the tick before anything moves. Losing focus
/// freezes the game until focus comes back.
pub fn sample_input<K: Keyboard + ?Sized>(keyboard: &mut K, probe: &mut ProbeInfo) -> Sampled {
    match keyboard.poll_window_event() {
        Some(WindowEvent::CloseRequested) => {
            info!("Close requested");
            return Sampled::Quit;
        }
        Some(WindowEvent::Inactive) => {
            debug!("Window inactive, waiting");
            loop {
                match keyboard.wait_window_event() {
                    WindowEvent::Active => break,
                    WindowEvent::CloseRequested => return Sampled::Quit,
                    WindowEvent::Inactive => {}
                }
            }
            debug!("Window active again");
        }
        Some(WindowEvent::Active) | None => {}
    }

    probe.user_input = keyboard.poll_keys();
    apply_thrust(probe);
    Sampled::Ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::headless::HeadlessBackend;
    use crate::platform::Renderer;
    use crate::sim::ThrustInput;

    #[test]
    fn test_close_skips_thrust() {
        let mut backend = HeadlessBackend::new()
            .with_keys(0, ThrustInput::UP)
            .with_window_event(0, WindowEvent::CloseRequested);
        let mut probe = ProbeInfo::new();
        assert_eq!(sample_input(&mut backend, &mut probe), Sampled::Quit);
        assert_eq!(probe.fuel, FUEL_MAX);
    }

    #[test]
    fn test_keys_burn_fuel() {
        let mut backend = HeadlessBackend::new().with_keys(0, ThrustInput::UP | ThrustInput::LEFT);
        let mut probe = ProbeInfo::new();
        assert_eq!(sample_input(&mut backend, &mut probe), Sampled::Ready);
        assert_eq!(probe.fuel, FUEL_MAX - FUEL_COST_UP - FUEL_COST_SIDE);
        assert!(probe.user_input.contains(ThrustInput::LEFT));
    }

    #[test]
    fn test_inactive_blocks_until_active() {
        let mut backend = HeadlessBackend::new()
            .with_window_event(0, WindowEvent::Inactive)
            .with_window_event(50, WindowEvent::Inactive)
            .with_window_event(60, WindowEvent::Active);
        let mut probe = ProbeInfo::new();
        assert_eq!(sample_input(&mut backend, &mut probe), Sampled::Ready);
        // Both queued events were consumed while waiting
        backend.pause(100);
        assert_eq!(backend.poll_window_event(), None);
    }

    #[test]
    fn test_close_while_inactive() {
        let mut backend = HeadlessBackend::new()
            .with_window_event(0, WindowEvent::Inactive)
            .with_window_event(5, WindowEvent::CloseRequested);
        let mut probe = ProbeInfo::new();
        assert_eq!(sample_input(&mut backend, &mut probe), Sampled::Quit);
    }
}
