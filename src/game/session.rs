//! The game session: Setup, the flying views, outcomes, game over
//!
//! A session owns the probe, the scores and whichever view is on screen.
//! Every state runs to completion and names the next one; `Quit` and `Fail`
//! end the session after the view's sprites are released.

use log::{debug, error, info, warn};

use super::outcome;
use super::views::{self, ActiveView};
use crate::consts::FUEL_MAX;
use crate::hud::Hud;
use crate::platform::{Backend, Platform, Renderer};
use crate::sim::{CollisionCode, Pad, ProbeInfo, Scene, ScoreBoard, ViewState};

/// State shared by every view of a session
#[derive(Debug, Clone)]
pub struct Flight {
    pub probe: ProbeInfo,
    pub scores: ScoreBoard,
    pub hud: Hud,
    /// Contact seen since the last Setup
    pub collision: CollisionCode,
}

impl Flight {
    pub fn new(hiscore: u32) -> Self {
        Self {
            probe: ProbeInfo::new(),
            scores: ScoreBoard::new(hiscore),
            hud: Hud::new(),
            collision: CollisionCode::None,
        }
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Out of fuel; back to the title screen
    GameOver,
    /// The player closed the window
    Quit,
    /// A resource could not be allocated
    Fail,
}

/// One game from a full tank to game over
#[derive(Debug)]
pub struct GameSession {
    flight: Flight,
    view: Option<ActiveView>,
}

impl GameSession {
    pub fn new(hiscore: u32) -> Self {
        Self {
            flight: Flight::new(hiscore),
            view: None,
        }
    }

    pub fn probe(&self) -> &ProbeInfo {
        &self.flight.probe
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.flight.scores
    }

    /// Play until game over, a close request or a failure
    pub fn run<B: Backend>(&mut self, platform: &mut Platform<B>) -> SessionEnd {
        platform.backend.clear();
        self.flight
            .hud
            .draw_frame(&mut platform.backend, &self.flight.scores);

        let mut state = ViewState::Setup;
        loop {
            let next = self.step(state, platform);
            debug!("{:?} -> {:?}", state, next);
            match (state, next) {
                (ViewState::GameOver, _) => {
                    self.leave_view(&mut platform.backend);
                    return SessionEnd::GameOver;
                }
                (_, ViewState::Quit) => {
                    self.leave_view(&mut platform.backend);
                    info!("Session quit with {} points", self.flight.scores.score);
                    return SessionEnd::Quit;
                }
                (_, ViewState::Fail) => {
                    self.leave_view(&mut platform.backend);
                    error!("Session failed in {:?}", state);
                    return SessionEnd::Fail;
                }
                _ => state = next,
            }
        }
    }

    /// Run one state and return the next
    pub fn step<B: Backend>(&mut self, state: ViewState, platform: &mut Platform<B>) -> ViewState {
        match state {
            ViewState::Setup => self.setup(platform),
            ViewState::FarView => self.fly(Scene::Far, platform),
            ViewState::PadA => self.fly(Scene::Pad(Pad::A), platform),
            ViewState::PadB => self.fly(Scene::Pad(Pad::B), platform),
            ViewState::PadC => self.fly(Scene::Pad(Pad::C), platform),
            ViewState::Landed => match self.view.as_ref().map(|v| (v.scene, v.probe_px.x)) {
                Some((Scene::Pad(pad), left)) => outcome::landed(&mut self.flight, pad, left, platform),
                _ => {
                    warn!("Landed with no pad on screen");
                    ViewState::Setup
                }
            },
            ViewState::Crashed => outcome::crashed(&mut self.flight, self.view.as_mut(), platform),
            ViewState::OutOfSky => outcome::out_of_sky(&mut self.flight, platform),
            ViewState::GameOver => outcome::game_over(&mut self.flight, platform),
            ViewState::Quit | ViewState::Fail => {
                self.leave_view(&mut platform.backend);
                state
            }
        }
    }

    /// Clear the last view and put the probe back in the sky, if it has fuel
    fn setup<B: Backend>(&mut self, platform: &mut Platform<B>) -> ViewState {
        self.leave_view(&mut platform.backend);
        self.flight.collision = CollisionCode::None;
        if self.flight.probe.out_of_fuel() {
            return ViewState::GameOver;
        }
        self.flight.probe.respawn();
        ViewState::FarView
    }

    /// Swap in a scene and fly it until it hands over
    fn fly<B: Backend>(&mut self, scene: Scene, platform: &mut Platform<B>) -> ViewState {
        self.leave_view(&mut platform.backend);
        let fresh = scene == Scene::Far && self.is_fresh_game();
        let view = match ActiveView::enter(scene, &self.flight.probe, &mut platform.backend) {
            Ok(view) => self.view.insert(view),
            Err(e) => {
                error!("Could not enter {:?}: {}", scene, e);
                return ViewState::Fail;
            }
        };

        if fresh {
            platform.backend.present_frame();
            platform.audio.play_start_tune(&mut platform.backend);
        }
        views::fly(&mut self.flight, view, platform)
    }

    /// Nothing scored and nothing burnt yet
    fn is_fresh_game(&self) -> bool {
        self.flight.scores.score == 0 && self.flight.probe.fuel == FUEL_MAX
    }

    fn leave_view<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        if let Some(view) = self.view.take() {
            view.leave(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::assets::BuiltinAssets;
    use crate::audio::{AudioManager, SoundEffect};
    use crate::consts::*;
    use crate::platform::headless::{AudioLog, HeadlessBackend, RecordingAudio};
    use crate::sim::ThrustInput;

    fn platform(backend: HeadlessBackend) -> Platform<HeadlessBackend> {
        Platform::new(backend, AudioManager::silent(), Rc::new(BuiltinAssets::new()))
    }

    fn recording_platform(backend: HeadlessBackend) -> (Platform<HeadlessBackend>, AudioLog) {
        let (device, log) = RecordingAudio::new();
        let audio = AudioManager::new(Ok(Box::new(device)));
        (
            Platform::new(backend, audio, Rc::new(BuiltinAssets::new())),
            log,
        )
    }

    fn show(session: &mut GameSession, scene: Scene, platform: &mut Platform<HeadlessBackend>) {
        match ActiveView::enter(scene, &session.flight.probe, &mut platform.backend) {
            Ok(view) => session.view = Some(view),
            Err(e) => panic!("could not enter {:?}: {}", scene, e),
        }
    }

    #[test]
    fn test_setup_respawns_and_resets_collision() {
        let mut platform = platform(HeadlessBackend::new());
        let mut session = GameSession::new(0);
        session.flight.probe.x_pos = 150.0;
        session.flight.probe.fuel = 12.0;
        session.flight.collision = CollisionCode::Crashed;
        assert_eq!(session.step(ViewState::Setup, &mut platform), ViewState::FarView);
        assert_eq!(session.flight.collision, CollisionCode::None);
        assert_eq!(session.probe().x_pos, START_X);
        assert_eq!(session.probe().fuel, 12.0);
    }

    #[test]
    fn test_empty_tank_is_game_over() {
        let mut platform = platform(HeadlessBackend::new());
        let mut session = GameSession::new(0);
        session.flight.probe.fuel = 0.0;
        assert_eq!(session.step(ViewState::Setup, &mut platform), ViewState::GameOver);
        assert_eq!(session.step(ViewState::GameOver, &mut platform), ViewState::Quit);
        assert_eq!(platform.backend.frames(), u64::from(GAME_OVER_PAUSE_TICKS));
        assert!(platform.backend.texts().contains(&"GAME OVER"));
    }

    #[test]
    fn test_burning_the_last_fuel_ends_the_game() {
        let backend = HeadlessBackend::new()
            .with_keys(0, ThrustInput::UP)
            .with_max_frames(5000);
        let mut platform = platform(backend);
        let mut session = GameSession::new(0);
        session.flight.probe.fuel = 1.0;

        assert_eq!(session.run(&mut platform), SessionEnd::GameOver);
        // Three burns of 0.5 (the last from an empty tank), then one crash
        assert_eq!(session.probe().fuel, -0.5 - CRASH_FUEL_PENALTY);
        assert_eq!(platform.backend.live_sprites(), 0);
    }

    #[test]
    fn test_repeated_crashes_drain_the_tank() {
        let (mut platform, log) = recording_platform(HeadlessBackend::new());
        let mut session = GameSession::new(0);
        let mut crashes = 0;
        let mut state = ViewState::Setup;
        while state != ViewState::GameOver {
            state = session.step(state, &mut platform);
            if state == ViewState::FarView {
                show(&mut session, Scene::Far, &mut platform);
                state = ViewState::Crashed;
                crashes += 1;
            }
        }
        // 219 - 7 * 30 = 9 is still flyable
        assert_eq!(crashes, 8);
        assert_eq!(log.count_once(SoundEffect::Crash), 8);
        assert_eq!(session.probe().fuel, FUEL_MAX - 8.0 * CRASH_FUEL_PENALTY);
    }

    #[test]
    fn test_close_waits_for_bonus_count_up() {
        // The close request is pending from the very first frame
        let mut platform = platform(HeadlessBackend::new().with_max_frames(0));
        let mut session = GameSession::new(0);
        session.flight.probe.x_pos = 190.0;
        session.flight.probe.y_pos = 140.0;
        session.flight.probe.y_vel = 0.0;
        session.flight.probe.fuel = 100.0;
        show(&mut session, Scene::Pad(Pad::C), &mut platform);

        assert_eq!(session.step(ViewState::Landed, &mut platform), ViewState::Setup);
        assert_eq!(session.scores().score, 5510);
        assert_eq!(session.scores().hiscore, 5510);
        // Refuelling stops at a full tank
        assert_eq!(session.probe().fuel, FUEL_MAX);
        assert_eq!(platform.backend.frames(), 551 + u64::from(BONUS_PAUSE_TICKS));
        assert!(platform.backend.texts().contains(&"551 x 10 = 5510"));

        assert_eq!(session.step(ViewState::Setup, &mut platform), ViewState::FarView);
        assert_eq!(session.step(ViewState::FarView, &mut platform), ViewState::Quit);
    }

    #[test]
    fn test_hard_landing_costs_one_penalty() {
        let mut platform = platform(HeadlessBackend::new());
        let mut session = GameSession::new(0);
        session.flight.probe.y_vel = 0.5;
        show(&mut session, Scene::Pad(Pad::A), &mut platform);

        assert_eq!(session.step(ViewState::Landed, &mut platform), ViewState::Crashed);
        assert!(platform.backend.texts().contains(&"SORRY, NO BONUS"));
        assert_eq!(session.step(ViewState::Crashed, &mut platform), ViewState::Setup);
        assert_eq!(session.probe().fuel, FUEL_MAX - CRASH_FUEL_PENALTY);
        assert_eq!(session.scores().score, 0);
    }

    #[test]
    fn test_pad_b_edge_landing_is_a_crash() {
        let (mut platform, log) = recording_platform(HeadlessBackend::new());
        let mut session = GameSession::new(0);
        session.flight.probe.y_vel = 0.1;
        show(&mut session, Scene::Pad(Pad::B), &mut platform);
        if let Some(view) = session.view.as_mut() {
            view.probe_px.x = 60;
        }

        assert_eq!(session.step(ViewState::Landed, &mut platform), ViewState::Crashed);
        assert_eq!(session.step(ViewState::Crashed, &mut platform), ViewState::Setup);
        assert_eq!(session.probe().fuel, FUEL_MAX - CRASH_FUEL_PENALTY);
        assert_eq!(session.scores().score, 0);
        assert_eq!(log.count_once(SoundEffect::Crash), 1);
        // Crash frames are gone, the pad view is still up until Setup
        assert_eq!(
            platform.backend.live_sprites(),
            ActiveView::assets(Scene::Pad(Pad::B)).len()
        );
        assert_eq!(session.step(ViewState::Setup, &mut platform), ViewState::FarView);
        assert_eq!(platform.backend.live_sprites(), 0);
    }

    #[test]
    fn test_pad_b_centred_landing_scores() {
        let mut platform = platform(HeadlessBackend::new());
        let mut session = GameSession::new(0);
        session.flight.probe.y_vel = 0.0;
        show(&mut session, Scene::Pad(Pad::B), &mut platform);
        if let Some(view) = session.view.as_mut() {
            view.probe_px.x = 110;
        }
        assert_eq!(session.step(ViewState::Landed, &mut platform), ViewState::Setup);
        assert_eq!(session.scores().score, 551 * PAD_B_BONUS);
    }

    #[test]
    fn test_out_of_sky_message() {
        let mut platform = platform(HeadlessBackend::new());
        let mut session = GameSession::new(0);
        assert_eq!(session.step(ViewState::OutOfSky, &mut platform), ViewState::Setup);
        assert_eq!(platform.backend.text_frame("OUT OF SKY"), Some(0));
        assert_eq!(platform.backend.frames(), u64::from(OUT_OF_SKY_PAUSE_TICKS));
    }

    #[test]
    fn test_sprite_shortage_fails_cleanly() {
        let mut platform = platform(HeadlessBackend::new().with_sprite_budget(3));
        let mut session = GameSession::new(0);
        assert_eq!(session.step(ViewState::FarView, &mut platform), ViewState::Fail);
        assert_eq!(platform.backend.live_sprites(), 0);
        assert!(session.view.is_none());

        assert_eq!(session.run(&mut platform), SessionEnd::Fail);
        assert_eq!(platform.backend.live_sprites(), 0);
    }

    #[test]
    fn test_start_tune_only_on_a_fresh_game() {
        let (mut platform, log) = recording_platform(HeadlessBackend::new().with_max_frames(0));
        let mut session = GameSession::new(0);
        assert_eq!(session.step(ViewState::FarView, &mut platform), ViewState::Quit);
        assert_eq!(log.count_once(SoundEffect::StartTune), 1);

        session.flight.probe.fuel = FUEL_MAX - 1.0;
        assert_eq!(session.step(ViewState::FarView, &mut platform), ViewState::Quit);
        assert_eq!(log.count_once(SoundEffect::StartTune), 1);
    }

    #[test]
    fn test_silent_start_tune_holds_the_screen() {
        let mut platform = platform(HeadlessBackend::new().with_max_frames(100));
        let mut session = GameSession::new(0);
        // One frame to show the view, then the silent stand-in
        assert_eq!(session.run(&mut platform), SessionEnd::Quit);
        assert_eq!(
            platform.backend.frames(),
            1 + u64::from(SILENT_TUNE_TICKS)
        );
        assert_eq!(platform.backend.live_sprites(), 0);
    }
}
