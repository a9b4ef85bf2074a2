//! Wave Shooter headless driver
//!
//! Runs one scripted session against the in-memory world: waits for assets,
//! starts, aims the gun at the nearest enemy and fires on a cadence until the
//! run ends. Prints the final HUD snapshot as JSON.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;

use wave_shooter::assets::{AssetLoader, AssetManifest, DirectoryLoader};
use wave_shooter::audio::{AudioManager, LogAudio};
use wave_shooter::sim::tick::{gun_controller, off_controller};
use wave_shooter::sim::{
    Action, GameEvent, GamePhase, GameState, Host, InputEvent, ShotOutcome, end_session,
    handle_input, on_all_assets_ready, tick,
};
use wave_shooter::world::HeadlessWorld;
use wave_shooter::{GameError, Settings, Tuning, ui};

/// Frame delta of the scripted loop (seconds)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Seconds between scripted shots
const FIRE_INTERVAL: f32 = 0.35;

/// Command-line arguments for the headless driver
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// JSON file overriding the built-in tuning tables
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,
    /// Player preferences file; defaults are used when missing
    #[arg(long, value_name = "FILE", default_value = "settings.json")]
    settings: PathBuf,
    /// Directory the asset manifest paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    assets: PathBuf,
    /// RNG seed for spawns, drift and enemy fire
    #[arg(long, value_name = "N", default_value_t = 0x5eed, value_parser = clap::value_parser!(u64))]
    seed: u64,
    /// Longest run before the driver stops (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 240.0, value_parser = parse_seconds)]
    seconds: f32,
}

fn parse_seconds(s: &str) -> Result<f32, String> {
    let seconds: f32 = s.parse().map_err(|e| format!("{}", e))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err("must be a positive number of seconds".to_string())
    }
}

/// Session tallies for the final report
#[derive(Default)]
struct Stats {
    shots: u32,
    hits: u32,
    kills: u32,
    hits_taken: u32,
}

/// Driver instance holding the core and its collaborators
struct Game {
    state: GameState,
    world: HeadlessWorld,
    audio: AudioManager,
    loader: Option<DirectoryLoader>,
    stats: Stats,
    fire_cooldown: f32,
    quit: bool,
}

impl Game {
    fn new(options: &Options) -> Result<Self, GameError> {
        let tuning = match &options.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let settings = Settings::load(&options.settings);
        let manifest = AssetManifest::from_tuning(&tuning);

        Ok(Self {
            audio: AudioManager::with_settings(Box::new(LogAudio), &settings),
            state: GameState::new(tuning, &settings, options.seed),
            world: HeadlessWorld::default(),
            loader: Some(DirectoryLoader::new(&options.assets, manifest)),
            stats: Stats::default(),
            fire_cooldown: 0.0,
            quit: false,
        })
    }

    fn press(&mut self, event: InputEvent) -> Option<ShotOutcome> {
        let mut host = Host {
            world: &mut self.world,
            audio: &mut self.audio,
        };
        handle_input(&mut self.state, &mut host, event)
    }

    /// Poll assets until the loader reports
    fn poll_assets(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        if let Some(report) = loader.poll() {
            self.loader = None;
            let mut host = Host {
                world: &mut self.world,
                audio: &mut self.audio,
            };
            on_all_assets_ready(&mut self.state, &mut host, &report);
        }
    }

    /// Scripted player: start when possible, then shoot the nearest enemy
    fn play(&mut self, dt: f32) {
        let hand = self.state.session.equipped_hand;
        match self.state.phase() {
            GamePhase::AwaitingStart => {
                self.press(InputEvent::new(off_controller(hand), Action::Trigger));
            }
            GamePhase::Playing => {
                self.fire_cooldown -= dt;
                if self.fire_cooldown > 0.0 {
                    return;
                }
                let Some(target) = self.nearest_enemy() else {
                    return;
                };
                self.world.aim(hand, target);
                self.fire_cooldown = FIRE_INTERVAL;
                self.stats.shots += 1;
                match self.press(InputEvent::new(gun_controller(hand), Action::Trigger)) {
                    Some(ShotOutcome::Hit { .. }) => self.stats.hits += 1,
                    Some(ShotOutcome::Defeated { .. }) => {
                        self.stats.hits += 1;
                        self.stats.kills += 1;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn nearest_enemy(&self) -> Option<Vec3> {
        let player = self.world.player;
        self.state
            .registry
            .enemies()
            .map(|(_, enemy)| enemy.position)
            .min_by(|a, b| {
                a.distance_squared(player)
                    .partial_cmp(&b.distance_squared(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    fn step(&mut self, dt: f32) {
        let mut host = Host {
            world: &mut self.world,
            audio: &mut self.audio,
        };
        tick(&mut self.state, &mut host, dt);

        for event in self.state.drain_events() {
            log::debug!("{:?}", event);
            match event {
                GameEvent::PlayerHit { .. } => self.stats.hits_taken += 1,
                GameEvent::QuitRequested => self.quit = true,
                _ => {}
            }
        }
    }

    fn shutdown(&mut self) {
        let mut host = Host {
            world: &mut self.world,
            audio: &mut self.audio,
        };
        end_session(&mut self.state, &mut host);
    }
}

fn run() -> Result<(), GameError> {
    let options = Options::parse();
    let mut game = Game::new(&options)?;
    log::info!("Wave Shooter (headless) starting, seed {}", game.state.seed());

    let frames = (options.seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        game.poll_assets();
        game.play(FRAME_DT);
        game.step(FRAME_DT);
        if game.quit || game.state.phase() == GamePhase::GameOver {
            break;
        }
    }

    let hud = ui::snapshot(&game.state);
    println!("{}", serde_json::to_string_pretty(&hud)?);
    log::info!(
        "Shots {}, hits {}, kills {}, hits taken {}",
        game.stats.shots,
        game.stats.hits,
        game.stats.kills,
        game.stats.hits_taken
    );

    game.shutdown();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
