//! Landing verdicts, bonus count-up and score bookkeeping

use super::probe::ProbeInfo;
use crate::consts::*;

/// Result of touching a pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingVerdict {
    /// Came down too fast; treated as a crash
    TooHard,
    /// Soft landing worth `points * bonus`
    Soft { points: u32, bonus: u32, total: u32 },
}

/// Judge a pad touchdown at the given vertical speed
///
/// Points are the truncated speed margin, so a landing just under the limit
/// is accepted but can be worth zero.
pub fn judge_landing(y_vel: f32, bonus: u32) -> LandingVerdict {
    if y_vel >= LANDING_MAX_VEL {
        return LandingVerdict::TooHard;
    }
    let points = ((LANDING_MAX_VEL - y_vel) * LANDING_POINTS_SCALE) as u32;
    LandingVerdict::Soft {
        points,
        bonus,
        total: points * bonus,
    }
}

/// Banner shown for a soft landing, e.g. `551 x 10 = 5510`
pub fn bonus_banner(points: u32, bonus: u32, total: u32) -> String {
    format!("{:>3} x {:>2} = {:>4}", points, bonus, total)
}

/// Score and the best score seen this process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub score: u32,
    pub hiscore: u32,
}

impl ScoreBoard {
    pub fn new(hiscore: u32) -> Self {
        Self { score: 0, hiscore }
    }

    /// Promote the score to the high score, rolling both over past 99999
    ///
    /// The rollover is only applied on the path that raises the high score,
    /// so a score past the limit that is still below the high score is left
    /// as is.
    pub fn update(&mut self) {
        if self.score > self.hiscore {
            if self.score >= SCORE_LIMIT {
                self.score -= SCORE_LIMIT;
            }
            self.hiscore = self.score;
        }
    }

    /// Whether the current score is the one on the high score readout
    pub fn is_hiscore(&self) -> bool {
        self.score == self.hiscore
    }
}

/// How a bonus is paid out: whole 10-point steps, then the remainder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUp {
    pub steps: u32,
    pub remainder: u32,
}

impl CountUp {
    pub fn new(total: u32) -> Self {
        Self {
            steps: total / SCORE_STEP,
            remainder: total % SCORE_STEP,
        }
    }
}

/// One step of the bonus count-up: 10 points and a little fuel back
pub fn count_up_step(probe: &mut ProbeInfo, scores: &mut ScoreBoard) {
    scores.score += SCORE_STEP;
    if probe.fuel < FUEL_MAX {
        probe.fuel += BONUS_FUEL_STEP;
    }
    scores.update();
}

/// Finish the count-up with the points that did not make a whole step
pub fn count_up_finish(scores: &mut ScoreBoard, count: CountUp) {
    scores.score += count.remainder;
    scores.update();
}
