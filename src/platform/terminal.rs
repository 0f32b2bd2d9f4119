//! Terminal frontend
//!
//! Each terminal cell stands for a 4x8 block of view pixels, so the
//! 320-pixel play area fits in 80 columns. Text and rectangles go to a
//! persistent backdrop; sprites are composited over it on every frame and
//! only the cells that changed are written out.
//!
//! Terminals that report key releases give exact thruster hold times.
//! Elsewhere a key counts as held for `key_hold_ms` after its last press
//! or auto-repeat.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use glam::IVec2;
use log::{debug, error, info, warn};

use super::{Backend, Color, Keyboard, Renderer, SpriteHandle, TitleChoice, WindowEvent};
use crate::assets::{AssetId, AssetStore};
use crate::consts::*;
use crate::error::LanderError;
use crate::settings::Settings;
use crate::sim::ThrustInput;

const CELL_W: i32 = 4;
const CELL_H: i32 = 8;
/// Pixel rows below the play area used by the HUD
pub const HUD_HEIGHT: i32 = 20;
pub const COLS: i32 = VIEW_WIDTH / CELL_W;
pub const ROWS: i32 = (VIEW_HEIGHT + HUD_HEIGHT + CELL_H - 1) / CELL_H;

const INSTRUCTIONS: [&str; 9] = [
    "JUPITER LANDER",
    "",
    "The object of this game is to land",
    "the probe on one of the pads",
    "lightly enough not to destroy it.",
    "",
    "Use the 'A' and 'D' keys to control",
    "your side thrusters and SPACE to",
    "control your main thruster.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::White,
    bg: Color::Black,
};

fn term_color(color: Color) -> style::Color {
    match color {
        Color::Black => style::Color::Black,
        Color::Grey => style::Color::DarkGrey,
        Color::White => style::Color::White,
        Color::Blue => style::Color::Blue,
        Color::Red => style::Color::Red,
    }
}

fn sprite_color(asset: AssetId) -> Color {
    match asset {
        AssetId::Land(_) => Color::Grey,
        AssetId::PadMarker(_) => Color::Blue,
        AssetId::Probe(_) => Color::White,
        _ => Color::Red,
    }
}

fn cell_index(col: i32, row: i32) -> Option<usize> {
    if col < 0 || row < 0 || col >= COLS || row >= ROWS {
        return None;
    }
    Some((row * COLS + col) as usize)
}

#[derive(Debug, Clone, Copy)]
struct SpriteSlot {
    asset: AssetId,
    pos: Option<IVec2>,
}

/// Thruster key state
#[derive(Debug, Default)]
struct KeyState {
    /// Last press (or repeat) of up, right and left
    pressed: [Option<Instant>; 3],
    release_events: bool,
    hold: Duration,
}

impl KeyState {
    const THRUSTERS: [ThrustInput; 3] = [ThrustInput::UP, ThrustInput::RIGHT, ThrustInput::LEFT];

    fn thruster_for(code: KeyCode) -> Option<usize> {
        match code {
            KeyCode::Char(' ') | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(0),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(1),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(2),
            _ => None,
        }
    }

    fn current(&self, now: Instant) -> ThrustInput {
        let mut input = ThrustInput::NONE;
        for (slot, thruster) in self.pressed.iter().zip(Self::THRUSTERS) {
            let held = match slot {
                Some(_) if self.release_events => true,
                Some(at) => now.duration_since(*at) < self.hold,
                None => false,
            };
            if held {
                input |= thruster;
            }
        }
        input
    }
}

/// crossterm-backed frontend
pub struct TerminalBackend {
    out: Stdout,
    assets: Rc<dyn AssetStore>,
    /// Pixels of each sprite image, built on first use
    points: HashMap<AssetId, Rc<[IVec2]>>,
    sprites: BTreeMap<SpriteHandle, SpriteSlot>,
    next_handle: u32,
    backdrop: Vec<Cell>,
    /// What the terminal currently shows
    shown: Vec<Cell>,
    keys: KeyState,
    pending: VecDeque<WindowEvent>,
    period: Duration,
    next_retrace: Instant,
    output_failed: bool,
}

impl TerminalBackend {
    /// Take over the terminal: raw mode, alternate screen, hidden cursor
    pub fn open(settings: &Settings, assets: Rc<dyn AssetStore>) -> Result<Self, LanderError> {
        let mut out = io::stdout();
        enable_raw_mode().map_err(|e| {
            error!("Failed to enable raw mode: {}", e);
            e
        })?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableFocusChange)
            .map_err(|e| {
                error!("Failed to prepare screen: {}", e);
                e
            })?;

        let release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if release_events {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            info!("Terminal reports key releases");
        } else {
            info!(
                "No key release events; holding keys for {} ms",
                settings.key_hold_ms
            );
        }

        match terminal::size() {
            Ok((w, h)) if (w as i32) < COLS || (h as i32) < ROWS => {
                warn!("Terminal is {}x{}, the game needs {}x{}", w, h, COLS, ROWS);
            }
            Ok((w, h)) => debug!("Terminal size: {}x{}", w, h),
            Err(e) => warn!("Could not read terminal size: {}", e),
        }

        let period = Duration::from_secs_f64(1.0 / settings.tick_hz.max(1) as f64);
        Ok(Self {
            out,
            assets,
            points: HashMap::new(),
            sprites: BTreeMap::new(),
            next_handle: 0,
            backdrop: vec![BLANK; (COLS * ROWS) as usize],
            shown: Vec::new(),
            keys: KeyState {
                pressed: [None; 3],
                release_events,
                hold: Duration::from_millis(settings.key_hold_ms),
            },
            pending: VecDeque::new(),
            period,
            next_retrace: Instant::now(),
            output_failed: false,
        })
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::FocusLost => self.pending.push_back(WindowEvent::Inactive),
            Event::FocusGained => self.pending.push_back(WindowEvent::Active),
            Event::Resize(..) => self.shown.clear(),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if is_close_key(&key) {
            if key.kind != KeyEventKind::Release {
                self.pending.push_back(WindowEvent::CloseRequested);
            }
            return;
        }
        let Some(slot) = KeyState::thruster_for(key.code) else {
            return;
        };
        self.keys.pressed[slot] = match key.kind {
            KeyEventKind::Release => None,
            _ => Some(Instant::now()),
        };
    }

    /// Drain everything the terminal has queued without blocking
    fn pump(&mut self) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(ev) => self.handle_event(ev),
                    Err(e) => {
                        error!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => break,
                Err(e) => {
                    error!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
        }
    }

    /// Block for the next key press, ignoring everything else
    fn read_key(&mut self) -> Option<KeyEvent> {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => return Some(key),
                Ok(Event::Resize(..)) => self.shown.clear(),
                Ok(_) => {}
                Err(e) => {
                    error!("Failed to read terminal event: {}", e);
                    return None;
                }
            }
        }
    }

    fn sprite_points(&mut self, asset: AssetId) -> Option<Rc<[IVec2]>> {
        if let Some(points) = self.points.get(&asset) {
            return Some(points.clone());
        }
        let sprite = self.assets.sprite(asset)?;
        let mask = &sprite.mask;
        let mut points = Vec::with_capacity(mask.count());
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.get(x, y) {
                    points.push(sprite.offset + IVec2::new(x, y));
                }
            }
        }
        let points: Rc<[IVec2]> = points.into();
        self.points.insert(asset, points.clone());
        Some(points)
    }

    fn compose(&self) -> Vec<Cell> {
        let mut frame = self.backdrop.clone();
        let mut visible: Vec<(u8, SpriteHandle, AssetId, IVec2)> = self
            .sprites
            .iter()
            .filter_map(|(handle, slot)| slot.pos.map(|pos| (slot.asset.layer(), *handle, slot.asset, pos)))
            .collect();
        visible.sort_by_key(|(layer, handle, ..)| (*layer, *handle));

        for (_, _, asset, pos) in visible {
            let Some(points) = self.points.get(&asset) else {
                continue;
            };
            let fg = sprite_color(asset);
            for p in points.iter() {
                let px = pos + *p;
                if px.x < 0 || px.y < 0 || px.x >= VIEW_WIDTH || px.y >= VIEW_HEIGHT {
                    continue;
                }
                if let Some(idx) = cell_index(px.x.div_euclid(CELL_W), px.y.div_euclid(CELL_H)) {
                    frame[idx] = Cell {
                        ch: asset.glyph(),
                        fg,
                        bg: frame[idx].bg,
                    };
                }
            }
        }
        frame
    }

    fn write_frame(&mut self, frame: &[Cell]) -> io::Result<()> {
        for row in 0..ROWS {
            for col in 0..COLS {
                let Some(idx) = cell_index(col, row) else {
                    continue;
                };
                let cell = frame[idx];
                if self.shown.get(idx) == Some(&cell) {
                    continue;
                }
                queue!(
                    self.out,
                    MoveTo(col as u16, row as u16),
                    SetForegroundColor(term_color(cell.fg)),
                    SetBackgroundColor(term_color(cell.bg)),
                    Print(cell.ch)
                )?;
            }
        }
        self.out.flush()
    }

    fn wait_for_retrace(&mut self) {
        let now = Instant::now();
        if self.next_retrace > now {
            std::thread::sleep(self.next_retrace - now);
        }
        self.next_retrace = self.next_retrace.max(now) + self.period;
    }

    fn show_lines(&mut self, lines: &[&str], top_row: i32) {
        self.clear();
        for (i, line) in lines.iter().enumerate() {
            let col = (COLS - line.len() as i32) / 2;
            self.draw_text(
                IVec2::new(col * CELL_W, (top_row + i as i32) * CELL_H),
                line,
                Color::White,
            );
        }
        self.present_frame();
    }
}

fn is_close_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

impl Drop for TerminalBackend {
    fn drop(&mut self) {
        if self.keys.release_events {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(self.out, ResetColor, DisableFocusChange, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        info!("Terminal restored");
    }
}

impl Renderer for TerminalBackend {
    fn create_sprite(&mut self, asset: AssetId) -> Result<SpriteHandle, LanderError> {
        if self.sprite_points(asset).is_none() {
            return Err(LanderError::ResourceExhausted { asset });
        }
        let handle = SpriteHandle(self.next_handle);
        self.next_handle += 1;
        self.sprites.insert(handle, SpriteSlot { asset, pos: None });
        Ok(handle)
    }

    fn free_sprite(&mut self, sprite: SpriteHandle) {
        self.sprites.remove(&sprite);
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
        let frame = self.compose();
        if let Err(e) = self.write_frame(&frame) {
            if !self.output_failed {
                error!("Failed to draw frame: {}", e);
                self.output_failed = true;
            }
        }
        self.shown = frame;
        self.wait_for_retrace();
    }

    fn draw_text(&mut self, pos: IVec2, text: &str, color: Color) {
        let row = pos.y.div_euclid(CELL_H);
        let first = pos.x.div_euclid(CELL_W);
        for (i, ch) in text.chars().enumerate() {
            if let Some(idx) = cell_index(first + i as i32, row) {
                let bg = self.backdrop[idx].bg;
                self.backdrop[idx] = Cell { ch, fg: color, bg };
            }
        }
    }

    fn fill_rect(&mut self, pos: IVec2, size: IVec2, color: Color) {
        if size.x <= 0 || size.y <= 0 {
            return;
        }
        let min = IVec2::new(pos.x.div_euclid(CELL_W), pos.y.div_euclid(CELL_H));
        let max = IVec2::new(
            (pos.x + size.x - 1).div_euclid(CELL_W),
            (pos.y + size.y - 1).div_euclid(CELL_H),
        );
        for row in min.y..=max.y {
            for col in min.x..=max.x {
                if let Some(idx) = cell_index(col, row) {
                    self.backdrop[idx] = Cell {
                        ch: ' ',
                        fg: Color::White,
                        bg: color,
                    };
                }
            }
        }
    }

    fn clear(&mut self) {
        self.backdrop.fill(BLANK);
    }
}

impl Keyboard for TerminalBackend {
    fn poll_keys(&mut self) -> ThrustInput {
        self.pump();
        self.keys.current(Instant::now())
    }

    fn poll_window_event(&mut self) -> Option<WindowEvent> {
        self.pump();
        self.pending.pop_front()
    }

    fn wait_window_event(&mut self) -> WindowEvent {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return event;
            }
            match event::read() {
                Ok(ev) => self.handle_event(ev),
                Err(e) => {
                    error!("Failed to read terminal event: {}", e);
                    return WindowEvent::CloseRequested;
                }
            }
        }
    }
}

impl Backend for TerminalBackend {
    fn title_screen(&mut self, hiscore: u32) -> TitleChoice {
        let hiscore_line = format!("HIGH SCORE {:05}", hiscore % SCORE_LIMIT);
        loop {
            self.show_lines(
                &[
                    "J U P I T E R   L A N D E R",
                    "",
                    hiscore_line.as_str(),
                    "",
                    "[P]LAY    [H]ELP    [Q]UIT",
                ],
                8,
            );
            let Some(key) = self.read_key() else {
                return TitleChoice::Quit;
            };
            if is_close_key(&key) {
                return TitleChoice::Quit;
            }
            match key.code {
                KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => {
                    self.clear();
                    self.keys.pressed = [None; 3];
                    self.pending.clear();
                    return TitleChoice::Play;
                }
                KeyCode::Char('h') | KeyCode::Char('H') => {
                    let mut lines: Vec<&str> = INSTRUCTIONS.to_vec();
                    lines.extend(["", "[O]K"]);
                    self.show_lines(&lines, 5);
                    if self.read_key().is_none() {
                        return TitleChoice::Quit;
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_fits_play_area() {
        assert_eq!(COLS, 80);
        assert_eq!(ROWS, 25);
    }

    #[test]
    fn test_key_hold_without_release_events() {
        let start = Instant::now();
        let keys = KeyState {
            pressed: [Some(start), None, Some(start)],
            release_events: false,
            hold: Duration::from_millis(120),
        };
        assert_eq!(keys.current(start), ThrustInput::UP | ThrustInput::LEFT);
        assert_eq!(keys.current(start + Duration::from_millis(200)), ThrustInput::NONE);
    }

    #[test]
    fn test_key_hold_with_release_events() {
        let start = Instant::now();
        let keys = KeyState {
            pressed: [None, Some(start), None],
            release_events: true,
            hold: Duration::from_millis(120),
        };
        assert_eq!(keys.current(start + Duration::from_secs(5)), ThrustInput::RIGHT);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyState::thruster_for(KeyCode::Char(' ')), Some(0));
        assert_eq!(KeyState::thruster_for(KeyCode::Char('d')), Some(1));
        assert_eq!(KeyState::thruster_for(KeyCode::Char('A')), Some(2));
        assert_eq!(KeyState::thruster_for(KeyCode::Char('x')), None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_close_key(&ctrl_c));
        assert!(!is_close_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_cell_index_bounds() {
        assert_eq!(cell_index(0, 0), Some(0));
        assert_eq!(cell_index(COLS - 1, ROWS - 1), Some((COLS * ROWS - 1) as usize));
        assert_eq!(cell_index(COLS, 0), None);
        assert_eq!(cell_index(-1, 3), None);
    }
}
