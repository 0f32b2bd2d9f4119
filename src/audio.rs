//! Sound channels
//!
//! The game talks to an `AudioDevice` over four channels: one for the main
//! thruster and music, one per side thruster, and one for effects. When no
//! device can be opened the manager logs a warning and every call becomes a
//! no-op; the start tune is replaced by a silent pause so the pacing of the
//! game does not change.

use std::io::Write;

use crate::error::LanderError;
use crate::platform::Renderer;
use crate::sim::ThrustInput;
use crate::consts::SILENT_TUNE_TICKS;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Jingle played at the start of a fresh game
    StartTune,
    /// Probe destroyed
    Crash,
    /// Bonus count-up tick
    Pop,
    /// Main thruster burn
    MainThruster,
    /// Left thruster burn
    LeftThruster,
    /// Right thruster burn
    RightThruster,
}

/// Output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Main,
    Left,
    Right,
    Effect,
}

impl SoundEffect {
    /// Channel this sound is played on
    pub fn channel(self) -> Channel {
        match self {
            SoundEffect::StartTune | SoundEffect::MainThruster => Channel::Main,
            SoundEffect::LeftThruster => Channel::Left,
            SoundEffect::RightThruster => Channel::Right,
            SoundEffect::Crash | SoundEffect::Pop => Channel::Effect,
        }
    }

    /// Looping sound for a thruster bit
    pub fn for_thruster(thruster: ThrustInput) -> Option<SoundEffect> {
        if thruster == ThrustInput::UP {
            Some(SoundEffect::MainThruster)
        } else if thruster == ThrustInput::LEFT {
            Some(SoundEffect::LeftThruster)
        } else if thruster == ThrustInput::RIGHT {
            Some(SoundEffect::RightThruster)
        } else {
            None
        }
    }
}

/// Something that can make noise
pub trait AudioDevice {
    fn play_loop(&mut self, channel: Channel, sound: SoundEffect);
    fn play_once(&mut self, channel: Channel, sound: SoundEffect);
    fn stop(&mut self, channel: Channel);
    /// Block until the sound on this channel has finished
    fn wait_for_finish(&mut self, channel: Channel);
}

/// Rings the terminal bell for one-shot sounds
///
/// Loops are ignored: a bell per tick would be unbearable.
pub struct TerminalBell {
    out: std::io::Stdout,
}

impl TerminalBell {
    pub fn open() -> Result<Self, LanderError> {
        let out = std::io::stdout();
        // Terminals without a tty cannot ring
        if !std::io::IsTerminal::is_terminal(&out) {
            return Err(LanderError::AudioUnavailable("stdout is not a terminal".into()));
        }
        Ok(Self { out })
    }
}

impl AudioDevice for TerminalBell {
    fn play_loop(&mut self, _channel: Channel, _sound: SoundEffect) {}

    fn play_once(&mut self, _channel: Channel, sound: SoundEffect) {
        if matches!(sound, SoundEffect::Crash | SoundEffect::StartTune) {
            let _ = self.out.write_all(b"\x07");
            let _ = self.out.flush();
        }
    }

    fn stop(&mut self, _channel: Channel) {}

    fn wait_for_finish(&mut self, _channel: Channel) {}
}

/// Audio manager for the game
pub struct AudioManager {
    device: Option<Box<dyn AudioDevice>>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::silent()
    }
}

impl AudioManager {
    /// Wrap whatever device the frontend could open
    pub fn new(device: Result<Box<dyn AudioDevice>, LanderError>) -> Self {
        match device {
            Ok(device) => Self {
                device: Some(device),
            },
            Err(e) => {
                log::warn!("{} - audio disabled", e);
                Self::silent()
            }
        }
    }

    /// No device at all
    pub fn silent() -> Self {
        Self { device: None }
    }

    /// Start a looping sound on its channel
    pub fn start(&mut self, sound: SoundEffect) {
        if let Some(device) = self.device.as_mut() {
            device.play_loop(sound.channel(), sound);
        }
    }

    /// Fire a one-shot sound on its channel
    pub fn play(&mut self, sound: SoundEffect) {
        if let Some(device) = self.device.as_mut() {
            device.play_once(sound.channel(), sound);
        }
    }

    /// Silence a channel
    pub fn stop(&mut self, channel: Channel) {
        if let Some(device) = self.device.as_mut() {
            device.stop(channel);
        }
    }

    /// Let a one-shot finish before moving on
    pub fn wait(&mut self, channel: Channel) {
        if let Some(device) = self.device.as_mut() {
            device.wait_for_finish(channel);
        }
    }

    /// Play the start tune to the end, or hold the screen for as long
    pub fn play_start_tune<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        match self.device.as_mut() {
            Some(device) => {
                device.play_once(Channel::Main, SoundEffect::StartTune);
                device.wait_for_finish(Channel::Main);
            }
            None => renderer.pause(SILENT_TUNE_TICKS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{AudioCall, HeadlessBackend, RecordingAudio};

    #[test]
    fn test_channels() {
        assert_eq!(SoundEffect::Crash.channel(), Channel::Effect);
        assert_eq!(SoundEffect::Pop.channel(), Channel::Effect);
        assert_eq!(SoundEffect::MainThruster.channel(), Channel::Main);
        assert_eq!(SoundEffect::LeftThruster.channel(), Channel::Left);
        assert_eq!(
            SoundEffect::for_thruster(ThrustInput::RIGHT),
            Some(SoundEffect::RightThruster)
        );
        assert_eq!(SoundEffect::for_thruster(ThrustInput::NONE), None);
    }

    #[test]
    fn test_missing_device_is_silent() {
        let mut audio =
            AudioManager::new(Err(LanderError::AudioUnavailable("no card".into())));
        assert!(audio.device.is_none());
        audio.play(SoundEffect::Crash);
        audio.start(SoundEffect::MainThruster);
        audio.stop(Channel::Main);
    }

    #[test]
    fn test_silent_start_tune_holds_screen() {
        let mut backend = HeadlessBackend::new();
        let mut audio = AudioManager::silent();
        audio.play_start_tune(&mut backend);
        assert_eq!(backend.frames(), SILENT_TUNE_TICKS as u64);
    }

    #[test]
    fn test_start_tune_plays_and_waits() {
        let (device, log) = RecordingAudio::new();
        let mut audio = AudioManager::new(Ok(Box::new(device)));
        let mut backend = HeadlessBackend::new();
        audio.play_start_tune(&mut backend);
        assert_eq!(backend.frames(), 0);
        assert_eq!(
            log.calls(),
            vec![
                AudioCall::Once(Channel::Main, SoundEffect::StartTune),
                AudioCall::Wait(Channel::Main),
            ]
        );
    }
}
