//! What happens after a view hands over: landings, crashes and the end
//!
//! These run with the last view's scenery still on screen and never poll
//! input, so a close request made during a bonus count-up or a crash is
//! only seen on the next flying tick.

use log::{error, info};

use super::resources::SpriteSet;
use super::session::Flight;
use super::views::ActiveView;
use crate::assets::{AssetId, Scale};
use crate::audio::{Channel, SoundEffect};
use crate::consts::*;
use crate::hud::Message;
use crate::platform::{Backend, Platform};
use crate::sim::{
    CountUp, LandingVerdict, Pad, ViewState, bonus_banner, count_up_finish, count_up_step,
    far_probe_px, judge_landing,
};

/// Score a touchdown on a pad
///
/// Pad B is narrow: unless both legs are on it the touchdown is a crash.
pub fn landed<B: Backend>(
    flight: &mut Flight,
    pad: Pad,
    probe_left_px: i32,
    platform: &mut Platform<B>,
) -> ViewState {
    if !pad.legs_on_pad(probe_left_px) {
        info!("Touched pad {:?} with one leg off the edge", pad);
        return ViewState::Crashed;
    }

    match judge_landing(flight.probe.y_vel, pad.bonus()) {
        LandingVerdict::TooHard => {
            info!("Landed too hard on pad {:?} at {:.3}", pad, flight.probe.y_vel);
            flight.hud.show_message(&mut platform.backend, &Message::NoBonus);
            platform.backend.pause(NO_BONUS_PAUSE_TICKS);
            ViewState::Crashed
        }
        LandingVerdict::Soft {
            points,
            bonus,
            total,
        } => {
            info!("Landed on pad {:?}: {} x {} = {}", pad, points, bonus, total);
            let banner = Message::Bonus(bonus_banner(points, bonus, total));
            flight.hud.show_message(&mut platform.backend, &banner);

            let count = CountUp::new(total);
            platform.audio.start(SoundEffect::Pop);
            for _ in 0..count.steps {
                count_up_step(&mut flight.probe, &mut flight.scores);
                flight.hud.update_score(&mut platform.backend, &flight.scores);
                flight.hud.update_fuel(&mut platform.backend, flight.probe.fuel);
                platform.backend.present_frame();
            }
            platform.audio.stop(Channel::Effect);
            count_up_finish(&mut flight.scores, count);
            flight.hud.update_score(&mut platform.backend, &flight.scores);

            platform.backend.pause(BONUS_PAUSE_TICKS);
            ViewState::Setup
        }
    }
}

/// Blow up the probe where it was last drawn and take the fuel penalty
pub fn crashed<B: Backend>(
    flight: &mut Flight,
    view: Option<&mut ActiveView>,
    platform: &mut Platform<B>,
) -> ViewState {
    let (scale, at) = match view {
        Some(view) => {
            view.hide_probe(&mut platform.backend);
            (view.scene.scale(), view.probe_px)
        }
        None => (Scale::Far, far_probe_px(&flight.probe)),
    };

    let frames: Vec<AssetId> = (0..CRASH_FRAMES)
        .map(|f| AssetId::Crash(scale, f as u8))
        .collect();
    let sprites = match SpriteSet::acquire(&mut platform.backend, &frames) {
        Ok(sprites) => sprites,
        Err(e) => {
            error!("Could not set up the crash animation: {}", e);
            return ViewState::Fail;
        }
    };

    info!("Crashed at {:?}, fuel {:.2}", at, flight.probe.fuel);
    platform.audio.play(SoundEffect::Crash);
    for frame in &frames {
        if let Some(h) = sprites.handle(*frame) {
            platform.backend.draw_sprite(h, at);
            platform.backend.pause(CRASH_FRAME_TICKS);
            platform.backend.remove_sprite(h);
        }
    }
    platform.backend.present_frame();
    sprites.release(&mut platform.backend);
    platform.audio.wait(Channel::Effect);

    flight.probe.fuel -= CRASH_FUEL_PENALTY;
    flight.hud.update_fuel(&mut platform.backend, flight.probe.fuel);
    platform.backend.pause(CRASH_PAUSE_TICKS);
    ViewState::Setup
}

/// The probe flew off the top of the far view
pub fn out_of_sky<B: Backend>(flight: &mut Flight, platform: &mut Platform<B>) -> ViewState {
    info!("Probe left the sky");
    flight.hud.show_message(&mut platform.backend, &Message::OutOfSky);
    platform.backend.pause(OUT_OF_SKY_PAUSE_TICKS);
    ViewState::Setup
}

/// The tank is empty
pub fn game_over<B: Backend>(flight: &mut Flight, platform: &mut Platform<B>) -> ViewState {
    info!(
        "Game over with {} points (high score {})",
        flight.scores.score, flight.scores.hiscore
    );
    flight.hud.show_message(&mut platform.backend, &Message::GameOver);
    platform.backend.pause(GAME_OVER_PAUSE_TICKS);
    ViewState::Quit
}
