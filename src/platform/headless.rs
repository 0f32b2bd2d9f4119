//! Scripted frontend with no terminal
//!
//! Keys and window events are keyed to frame numbers, every drawing call is
//! recorded, and sprite allocation can be capped to exercise failure paths.
//! Frames are not paced, so a whole game runs as fast as the CPU allows.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use glam::IVec2;

use super::{Backend, Color, Keyboard, Renderer, SpriteHandle, TitleChoice, WindowEvent};
use crate::assets::AssetId;
use crate::audio::{AudioDevice, Channel, SoundEffect};
use crate::error::LanderError;
use crate::sim::ThrustInput;

/// A recorded non-sprite drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Text { pos: IVec2, text: String, color: Color },
    Rect { pos: IVec2, size: IVec2, color: Color },
    Clear,
}

#[derive(Debug, Clone, Copy)]
struct SpriteSlot {
    asset: AssetId,
    pos: Option<IVec2>,
}

/// Backend driven by a script instead of a player
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    frame: u64,
    /// Key state changes, sorted by frame
    keys: Vec<(u64, ThrustInput)>,
    events: VecDeque<(u64, WindowEvent)>,
    max_frames: Option<u64>,
    sprite_budget: Option<usize>,
    next_handle: u32,
    sprites: BTreeMap<SpriteHandle, SpriteSlot>,
    calls: Vec<(u64, DrawCall)>,
    titles: VecDeque<TitleChoice>,
    title_shown: u32,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `input` from `frame` on, until the next key change
    pub fn with_keys(mut self, frame: u64, input: ThrustInput) -> Self {
        self.keys.push((frame, input));
        self.keys.sort_by_key(|(f, _)| *f);
        self
    }

    /// Deliver a window event once `frame` has been presented
    pub fn with_window_event(mut self, frame: u64, event: WindowEvent) -> Self {
        let idx = self.events.partition_point(|(f, _)| *f <= frame);
        self.events.insert(idx, (frame, event));
        self
    }

    /// Ask to close once this many frames have been presented
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Refuse to allocate more than this many live sprites
    pub fn with_sprite_budget(mut self, sprites: usize) -> Self {
        self.sprite_budget = Some(sprites);
        self
    }

    /// Answers for successive title screens; `Quit` once they run out
    pub fn with_title_choices(mut self, choices: &[TitleChoice]) -> Self {
        self.titles.extend(choices.iter().copied());
        self
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn live_sprites(&self) -> usize {
        self.sprites.len()
    }

    pub fn title_shown(&self) -> u32 {
        self.title_shown
    }

    /// Positions of every visible sprite showing this asset
    pub fn visible(&self, asset: AssetId) -> Vec<IVec2> {
        self.sprites
            .values()
            .filter(|s| s.asset == asset)
            .filter_map(|s| s.pos)
            .collect()
    }

    /// Every text drawn, oldest first
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|(_, call)| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Frame on which a text was first drawn
    pub fn text_frame(&self, needle: &str) -> Option<u64> {
        self.calls.iter().find_map(|(frame, call)| match call {
            DrawCall::Text { text, .. } if text.contains(needle) => Some(*frame),
            _ => None,
        })
    }

    pub fn calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().map(|(_, call)| call)
    }
}

impl Renderer for HeadlessBackend {
    fn create_sprite(&mut self, asset: AssetId) -> Result<SpriteHandle, LanderError> {
        if self
            .sprite_budget
            .is_some_and(|budget| self.sprites.len() >= budget)
        {
            return Err(LanderError::ResourceExhausted { asset });
        }
        let handle = SpriteHandle(self.next_handle);
        self.next_handle += 1;
        self.sprites.insert(handle, SpriteSlot { asset, pos: None });
        Ok(handle)
    }

    fn free_sprite(&mut self, sprite: SpriteHandle) {
        if self.sprites.remove(&sprite).is_none() {
            log::warn!("freeing unknown sprite {:?}", sprite);
        }
    }

    fn draw_sprite(&mut self, sprite: SpriteHandle, pos: IVec2) {
        if let Some(slot) = self.sprites.get_mut(&sprite) {
            slot.pos = Some(pos);
        }
    }

    fn remove_sprite(&mut self, sprite: SpriteHandle) {
        if let Some(slot) = self.sprites.get_mut(&sprite) {
            slot.pos = None;
        }
    }

    fn present_frame(&mut self) {
        self.frame += 1;
    }

    fn draw_text(&mut self, pos: IVec2, text: &str, color: Color) {
        self.calls.push((
            self.frame,
            DrawCall::Text {
                pos,
                text: text.to_string(),
                color,
            },
        ));
    }

    fn fill_rect(&mut self, pos: IVec2, size: IVec2, color: Color) {
        self.calls
            .push((self.frame, DrawCall::Rect { pos, size, color }));
    }

    fn clear(&mut self) {
        self.calls.push((self.frame, DrawCall::Clear));
    }
}

impl Keyboard for HeadlessBackend {
    fn poll_keys(&mut self) -> ThrustInput {
        self.keys
            .iter()
            .rev()
            .find(|(f, _)| *f <= self.frame)
            .map(|(_, input)| *input)
            .unwrap_or_default()
    }

    fn poll_window_event(&mut self) -> Option<WindowEvent> {
        if self.max_frames.is_some_and(|max| self.frame >= max) {
            return Some(WindowEvent::CloseRequested);
        }
        match self.events.front() {
            Some((f, _)) if *f <= self.frame => self.events.pop_front().map(|(_, e)| e),
            _ => None,
        }
    }

    fn wait_window_event(&mut self) -> WindowEvent {
        // Nothing scripted means nothing will ever arrive; wake up instead of hanging
        self.events
            .pop_front()
            .map(|(_, e)| e)
            .unwrap_or(WindowEvent::Active)
    }
}

impl Backend for HeadlessBackend {
    fn title_screen(&mut self, _hiscore: u32) -> TitleChoice {
        self.title_shown += 1;
        self.titles.pop_front().unwrap_or(TitleChoice::Quit)
    }
}

/// One call made on a recording audio device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Loop(Channel, SoundEffect),
    Once(Channel, SoundEffect),
    Stop(Channel),
    Wait(Channel),
}

/// Shared view of what a `RecordingAudio` has been asked to do
#[derive(Debug, Clone, Default)]
pub struct AudioLog(Rc<RefCell<Vec<AudioCall>>>);

impl AudioLog {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.0.borrow().clone()
    }

    /// How many times a one-shot sound was played
    pub fn count_once(&self, sound: SoundEffect) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|c| matches!(c, AudioCall::Once(_, s) if *s == sound))
            .count()
    }
}

/// Audio device that only keeps a log
#[derive(Debug, Default)]
pub struct RecordingAudio {
    log: AudioLog,
}

impl RecordingAudio {
    pub fn new() -> (Self, AudioLog) {
        let log = AudioLog::default();
        (Self { log: log.clone() }, log)
    }

    fn record(&self, call: AudioCall) {
        self.log.0.borrow_mut().push(call);
    }
}

impl AudioDevice for RecordingAudio {
    fn play_loop(&mut self, channel: Channel, sound: SoundEffect) {
        self.record(AudioCall::Loop(channel, sound));
    }

    fn play_once(&mut self, channel: Channel, sound: SoundEffect) {
        self.record(AudioCall::Once(channel, sound));
    }

    fn stop(&mut self, channel: Channel) {
        self.record(AudioCall::Stop(channel));
    }

    fn wait_for_finish(&mut self, channel: Channel) {
        self.record(AudioCall::Wait(channel));
    }
}
