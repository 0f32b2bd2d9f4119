//! Score, fuel and vertical-speed readouts
//!
//! The HUD remembers what it last drew so each update only repaints the
//! part that changed, the same way the game redraws the fuel bar one
//! sliver at a time during a burn.

use glam::IVec2;

use crate::consts::*;
use crate::platform::{Color, Renderer};
use crate::sim::ScoreBoard;

const SCORE_LABEL_POS: IVec2 = IVec2::new(8, 184);
const SCORE_POS: IVec2 = IVec2::new(36, 184);
const HISCORE_LABEL_POS: IVec2 = IVec2::new(140, 184);
const HISCORE_POS: IVec2 = IVec2::new(176, 184);
const FUEL_LABEL_POS: IVec2 = IVec2::new(8, 192);
const OUT_OF_FUEL_POS: IVec2 = IVec2::new(124, 192);
/// Left end and height of the fuel bar; one pixel per unit of fuel
const FUEL_BAR_X: i32 = 60;
const FUEL_BAR_Y: i32 = 192;
const FUEL_BAR_H: i32 = 8;

/// Velocity scale column
const SCALE_X: i32 = 295;
const SCALE_W: i32 = 15;
/// Marker row for zero vertical speed; 40 px per unit of speed
const SCALE_ZERO_Y: i32 = 89;
const SCALE_PX_PER_UNIT: f32 = 40.0;
const SCALE_TOP: i32 = SCALE_ZERO_Y - 80;
const SCALE_BOTTOM: i32 = SCALE_ZERO_Y + 80;

/// Banners shown over the play area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    NoBonus,
    Bonus(String),
    OutOfSky,
    GameOver,
}

impl Message {
    fn layout(&self) -> (IVec2, IVec2, IVec2) {
        match self {
            Message::NoBonus | Message::Bonus(_) => {
                (IVec2::new(66, 5), IVec2::new(137, 25), IVec2::new(74, 14))
            }
            Message::OutOfSky => (IVec2::new(86, 5), IVec2::new(97, 25), IVec2::new(94, 14)),
            Message::GameOver => (IVec2::new(66, 30), IVec2::new(137, 25), IVec2::new(98, 39)),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Message::NoBonus => "SORRY, NO BONUS",
            Message::Bonus(text) => text,
            Message::OutOfSky => "OUT OF SKY",
            Message::GameOver => "GAME OVER",
        }
    }
}

/// Five digits, zero padded; larger values show their leading five
pub fn score_digits(value: u32) -> String {
    format!("{:05}", value).chars().take(5).collect()
}

/// Colour of the velocity scale behind a row: blue is a safe landing speed
fn scale_color_at(y: i32) -> Color {
    let limit = safe_limit_row();
    if !(SCALE_TOP..=SCALE_BOTTOM).contains(&y) {
        Color::Black
    } else if y < limit {
        Color::Blue
    } else {
        Color::Red
    }
}

/// First row of the scale that is too fast to land
fn safe_limit_row() -> i32 {
    SCALE_ZERO_Y + (LANDING_MAX_VEL * SCALE_PX_PER_UNIT).round() as i32
}

/// Marker row for a vertical speed
pub fn scale_row(y_vel: f32) -> i32 {
    SCALE_ZERO_Y + (y_vel * SCALE_PX_PER_UNIT) as i32
}

#[derive(Debug, Clone, Default)]
pub struct Hud {
    /// Fuel bar length currently drawn
    shown_fuel: i32,
    /// Row of the velocity marker currently drawn
    scale_row: Option<i32>,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            shown_fuel: FUEL_MAX as i32,
            scale_row: None,
        }
    }

    /// Draw the static layout with a full tank
    pub fn draw_frame<R: Renderer + ?Sized>(&mut self, r: &mut R, scores: &ScoreBoard) {
        r.draw_text(SCORE_LABEL_POS, "SCORE:", Color::White);
        r.draw_text(SCORE_POS, "00000", Color::White);
        r.draw_text(HISCORE_LABEL_POS, "HISCORE:", Color::White);
        r.draw_text(HISCORE_POS, &score_digits(scores.hiscore), Color::White);

        r.draw_text(FUEL_LABEL_POS, "FUEL:", Color::White);
        r.fill_rect(
            IVec2::new(FUEL_BAR_X, FUEL_BAR_Y),
            IVec2::new(FUEL_MAX as i32, FUEL_BAR_H),
            Color::Blue,
        );
        self.shown_fuel = FUEL_MAX as i32;

        let limit = safe_limit_row();
        r.fill_rect(
            IVec2::new(SCALE_X, SCALE_TOP),
            IVec2::new(SCALE_W, limit - SCALE_TOP),
            Color::Blue,
        );
        r.fill_rect(
            IVec2::new(SCALE_X, limit),
            IVec2::new(SCALE_W, SCALE_BOTTOM - limit + 1),
            Color::Red,
        );
        r.draw_text(IVec2::new(SCALE_X - 4, 0), "m/s", Color::White);
        r.draw_text(IVec2::new(SCALE_X - 16, SCALE_ZERO_Y - 4), "0", Color::White);
        r.draw_text(IVec2::new(SCALE_X - 16, SCALE_BOTTOM - 4), "+2", Color::White);
        self.scale_row = None;
    }

    /// Shorten or lengthen the fuel bar to match the tank
    pub fn update_fuel<R: Renderer + ?Sized>(&mut self, r: &mut R, fuel: f32) {
        let mut new_fuel = fuel as i32;
        let old_fuel = self.shown_fuel;
        if old_fuel > new_fuel {
            if new_fuel <= 0 {
                new_fuel = 0;
                self.erase_bar(r);
                r.draw_text(OUT_OF_FUEL_POS, "OUT OF FUEL", Color::Blue);
            } else {
                r.fill_rect(
                    IVec2::new(FUEL_BAR_X + new_fuel, FUEL_BAR_Y),
                    IVec2::new(old_fuel - new_fuel + 1, FUEL_BAR_H),
                    Color::Black,
                );
            }
            self.shown_fuel = new_fuel;
        } else if old_fuel < new_fuel {
            if old_fuel <= 0 {
                // Wipe the "OUT OF FUEL" notice
                self.erase_bar(r);
            }
            r.fill_rect(
                IVec2::new(FUEL_BAR_X + old_fuel, FUEL_BAR_Y),
                IVec2::new(new_fuel - old_fuel + 1, FUEL_BAR_H),
                Color::Blue,
            );
            self.shown_fuel = new_fuel;
        }
    }

    /// Redraw the score, and the high score when the score is the record
    pub fn update_score<R: Renderer + ?Sized>(&mut self, r: &mut R, scores: &ScoreBoard) {
        let digits = score_digits(scores.score);
        r.fill_rect(SCORE_POS, IVec2::new(20, FUEL_BAR_H), Color::Black);
        r.draw_text(SCORE_POS, &digits, Color::White);
        if scores.is_hiscore() {
            r.fill_rect(HISCORE_POS, IVec2::new(20, FUEL_BAR_H), Color::Black);
            r.draw_text(HISCORE_POS, &digits, Color::White);
        }
    }

    /// Move the velocity marker
    pub fn update_velocity_scale<R: Renderer + ?Sized>(&mut self, r: &mut R, y_vel: f32) {
        let row = scale_row(y_vel);
        if self.scale_row == Some(row) {
            return;
        }
        if let Some(old) = self.scale_row {
            r.fill_rect(
                IVec2::new(SCALE_X, old),
                IVec2::new(SCALE_W, 1),
                scale_color_at(old),
            );
        }
        r.fill_rect(IVec2::new(SCALE_X, row), IVec2::new(SCALE_W, 1), Color::Black);
        self.scale_row = Some(row);
    }

    /// Show a banner over the play area
    pub fn show_message<R: Renderer + ?Sized>(&self, r: &mut R, message: &Message) {
        let (rect_pos, rect_size, text_pos) = message.layout();
        r.fill_rect(rect_pos, rect_size, Color::Black);
        r.draw_text(text_pos, message.text(), Color::White);
    }

    fn erase_bar<R: Renderer + ?Sized>(&self, r: &mut R) {
        r.fill_rect(
            IVec2::new(FUEL_BAR_X, FUEL_BAR_Y),
            IVec2::new(FUEL_MAX as i32, FUEL_BAR_H),
            Color::Black,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{DrawCall, HeadlessBackend};

    fn rects(backend: &HeadlessBackend) -> Vec<(IVec2, IVec2, Color)> {
        backend
            .calls()
            .filter_map(|c| match c {
                DrawCall::Rect { pos, size, color } => Some((*pos, *size, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_score_digits() {
        assert_eq!(score_digits(0), "00000");
        assert_eq!(score_digits(5510), "05510");
        assert_eq!(score_digits(99_999), "99999");
        assert_eq!(score_digits(100_005), "10000");
    }

    #[test]
    fn test_fuel_bar_shrinks_by_slivers() {
        let mut backend = HeadlessBackend::new();
        let mut hud = Hud::new();
        hud.update_fuel(&mut backend, 218.5);
        hud.update_fuel(&mut backend, 218.0);
        hud.update_fuel(&mut backend, 218.25);
        let drawn = rects(&backend);
        assert_eq!(
            drawn,
            vec![(
                IVec2::new(FUEL_BAR_X + 218, FUEL_BAR_Y),
                IVec2::new(2, FUEL_BAR_H),
                Color::Black
            )]
        );
    }

    #[test]
    fn test_out_of_fuel_notice() {
        let mut backend = HeadlessBackend::new();
        let mut hud = Hud::new();
        hud.update_fuel(&mut backend, -0.25);
        assert_eq!(backend.texts(), vec!["OUT OF FUEL"]);
        // Landing refuel wipes the notice and regrows the bar
        hud.update_fuel(&mut backend, 1.0);
        let drawn = rects(&backend);
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[2].2, Color::Blue);
    }

    #[test]
    fn test_score_shows_on_hiscore_when_record() {
        let mut backend = HeadlessBackend::new();
        let mut hud = Hud::new();
        let mut scores = ScoreBoard::new(40);
        scores.score = 30;
        hud.update_score(&mut backend, &scores);
        assert_eq!(backend.texts(), vec!["00030"]);
        scores.score = 50;
        scores.update();
        hud.update_score(&mut backend, &scores);
        assert_eq!(backend.texts(), vec!["00030", "00050", "00050"]);
    }

    #[test]
    fn test_velocity_marker_moves_only_on_change() {
        let mut backend = HeadlessBackend::new();
        let mut hud = Hud::new();
        hud.update_velocity_scale(&mut backend, 0.0);
        hud.update_velocity_scale(&mut backend, 0.01);
        hud.update_velocity_scale(&mut backend, 1.0);
        let drawn = rects(&backend);
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[0].0, IVec2::new(SCALE_X, 89));
        assert_eq!(drawn[1], (IVec2::new(SCALE_X, 89), IVec2::new(SCALE_W, 1), Color::Blue));
        assert_eq!(drawn[2].0, IVec2::new(SCALE_X, 129));
    }

    #[test]
    fn test_scale_colours() {
        assert_eq!(scale_color_at(SCALE_ZERO_Y), Color::Blue);
        assert_eq!(scale_color_at(scale_row(0.5)), Color::Red);
        assert_eq!(scale_color_at(SCALE_BOTTOM + 1), Color::Black);
    }
}
