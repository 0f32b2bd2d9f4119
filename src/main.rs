//! Jupiter Lander entry point
//!
//! Parses the command line, sets up logging to a file (the terminal belongs
//! to the game), then runs the title screen loop or a single headless game.

use std::fs::File;
use std::path::PathBuf;
use std::rc::Rc;

use log::{error, info, warn};

use jupiter_lander::assets::{AssetStore, BuiltinAssets};
use jupiter_lander::audio::{AudioDevice, AudioManager, TerminalBell};
use jupiter_lander::highscores::now_timestamp;
use jupiter_lander::platform::headless::HeadlessBackend;
use jupiter_lander::platform::terminal::TerminalBackend;
use jupiter_lander::platform::{Backend, Platform, TitleChoice};
use jupiter_lander::settings::DEFAULT_SETTINGS_FILE;
use jupiter_lander::{GameSession, HighScores, LanderError, SessionEnd, Settings};

/// Command line options
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    headless: bool,
    max_frames: Option<u64>,
}

impl Args {
    fn from_env() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut parsed = Self::default();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" if i + 1 < args.len() => {
                    parsed.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                }
                "--max-frames" if i + 1 < args.len() => {
                    parsed.max_frames = args[i + 1].parse().ok();
                    i += 2;
                }
                "--headless" => {
                    parsed.headless = true;
                    i += 1;
                }
                other => {
                    eprintln!("Ignoring unknown argument {}", other);
                    i += 1;
                }
            }
        }
        parsed
    }
}

fn init_logging(settings: &Settings) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(&settings.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            // Stderr would scribble over the game, so stay quiet instead
            eprintln!("Could not open {}: {}", settings.log_file.display(), e);
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn open_audio(settings: &Settings) -> AudioManager {
    if !settings.sound {
        info!("Sound disabled in settings");
        return AudioManager::silent();
    }
    AudioManager::new(TerminalBell::open().map(|bell| Box::new(bell) as Box<dyn AudioDevice>))
}

/// Add a finished game to the leaderboard and write it out
fn record_score(scores: &mut HighScores, score: u32, settings: &Settings) {
    if let Some(rank) = scores.add_score(score, now_timestamp()) {
        info!("Score {} placed #{}", score, rank);
        if let Err(e) = scores.save(&settings.highscore_file) {
            warn!("Could not save high scores: {}", e);
        }
    }
}

/// Title screen, game, back to the title screen until the player quits
fn run_terminal(
    settings: &Settings,
    assets: Rc<dyn AssetStore>,
    leaderboard: &mut HighScores,
) -> Result<(), LanderError> {
    let backend = TerminalBackend::open(settings, assets.clone())?;
    let mut platform = Platform::new(backend, open_audio(settings), assets);
    let mut hiscore = leaderboard.top_score().unwrap_or(0);

    loop {
        match platform.backend.title_screen(hiscore) {
            TitleChoice::Quit => break,
            TitleChoice::Play => {}
        }
        let mut session = GameSession::new(hiscore);
        let end = session.run(&mut platform);
        hiscore = session.scores().hiscore;
        match end {
            SessionEnd::GameOver => {
                record_score(leaderboard, session.scores().score, settings);
            }
            SessionEnd::Quit => break,
            SessionEnd::Fail => {
                error!("Game aborted: out of sprites");
                break;
            }
        }
    }
    Ok(())
}

/// One game with no keys pressed, for smoke tests and profiling
fn run_headless(args: &Args, assets: Rc<dyn AssetStore>, leaderboard: &HighScores) -> SessionEnd {
    let mut backend = HeadlessBackend::new();
    if let Some(frames) = args.max_frames {
        backend = backend.with_max_frames(frames);
    }
    let mut platform = Platform::new(backend, AudioManager::silent(), assets);
    let mut session = GameSession::new(leaderboard.top_score().unwrap_or(0));
    let end = session.run(&mut platform);
    info!(
        "Headless game ended with {:?} after {} frames: score {}, fuel {:.2}",
        end,
        platform.backend.frames(),
        session.scores().score,
        session.probe().fuel
    );
    println!(
        "{:?} after {} frames, score {}",
        end,
        platform.backend.frames(),
        session.scores().score
    );
    end
}

fn main() -> Result<(), LanderError> {
    let args = Args::from_env();
    let config = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = Settings::load(&config);
    init_logging(&settings);
    info!("Jupiter Lander starting with {}", config.display());
    if !config.exists() {
        // First run: leave an editable config next to the game
        if let Err(e) = settings.save(&config) {
            warn!("Could not write default settings: {}", e);
        }
    }

    let assets: Rc<dyn AssetStore> = Rc::new(BuiltinAssets::new());
    let mut leaderboard = HighScores::load(&settings.highscore_file);

    if args.headless {
        if run_headless(&args, assets, &leaderboard) == SessionEnd::Fail {
            std::process::exit(1);
        }
        return Ok(());
    }

    run_terminal(&settings, assets, &mut leaderboard).map_err(|e| {
        error!("Terminal frontend failed: {}", e);
        e
    })?;
    info!("Bye");
    Ok(())
}
