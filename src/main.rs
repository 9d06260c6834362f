//! Tile Quest entry point
//!
//! Headless runner: builds the level catalog, then drives the fixed-timestep
//! loop from a scripted input track, playing cues and the map theme through
//! the log sink and capturing a frame per iteration.
//!
//! Usage: `tile-quest [settings.json] [frame budget]`

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use tile_quest::Settings;
use tile_quest::audio::{AudioManager, LogSink, MusicTrack};
use tile_quest::consts::*;
use tile_quest::render::Frame;
use tile_quest::sim::{
    GameState, LevelCatalog, Mode, RandomLevelGenerator, TickInput, WorldMap, tick,
};

/// Host frame length; deliberately off the sim rate to exercise the accumulator
const FRAME_DT: f32 = 1.0 / 50.0;
const DEFAULT_FRAME_BUDGET: u64 = 3_000;

/// Game instance holding all state
struct Game {
    state: GameState,
    audio: AudioManager,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn new(settings: &Settings, catalog: LevelCatalog, map: WorldMap) -> Self {
        let mut audio = AudioManager::from_settings(settings, Some(Box::new(LogSink)));
        audio.start_music(MusicTrack::overworld_theme());
        Self {
            state: GameState::new(map, catalog, settings.rules()),
            audio,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            let events = self.state.drain_events();
            self.audio.dispatch(&events);
            self.audio.update_music(SIM_DT);
        }
    }
}

/// Demo input: walk the map, play a level for a while, back out and quit
fn scripted_input(frame: u64, mode: Mode) -> TickInput {
    let mut input = TickInput::default();
    match mode {
        Mode::Overworld => {
            if frame < 120 {
                // Step right then back to the first node
                input.right = (20..40).contains(&frame);
                input.left = (60..90).contains(&frame);
            } else if frame < 1_500 {
                input.jump = frame % 20 < 2;
            } else {
                input.quit = frame % 20 < 2;
            }
        }
        Mode::Level => {
            input.right = true;
            input.jump = frame % 45 < 12;
            input.pause = (600..602).contains(&frame);
            input.quit = frame >= 1_400 && frame % 20 < 2;
        }
        Mode::Paused { .. } => {
            input.pause = (660..662).contains(&frame);
        }
        Mode::GameOver | Mode::Victory => {
            input.jump = frame % 30 < 2;
        }
    }
    input
}

fn level_seed(settings: &Settings) -> u64 {
    settings.level_seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    })
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Tile Quest (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = Settings::load(args.next().unwrap_or_else(|| Settings::FILE_NAME.to_string()));
    let frame_budget = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("invalid frame budget '{}'", arg))?,
        None => DEFAULT_FRAME_BUDGET,
    };

    let seed = level_seed(&settings);
    log::info!("Level seed: {}", seed);
    let map = WorldMap::standard();
    let mut catalog = LevelCatalog::build(&map, &mut RandomLevelGenerator::new(seed));
    if let Some(path) = &settings.levels_path {
        if let Err(e) = catalog.merge_file(path) {
            log::warn!("Ignoring level file: {}", e);
        }
    }

    let mut game = Game::new(&settings, catalog, map);
    let mut frame_index = 0;
    while frame_index < frame_budget && !game.state.quit_requested {
        game.input = scripted_input(frame_index, game.state.mode);
        game.update(FRAME_DT);

        let frame = Frame::capture(&game.state);
        if frame_index % 100 == 0 {
            log::info!(
                "frame {}: {:?} score {} lives {} time {:?} ({} draws)",
                frame_index,
                game.state.mode,
                frame.hud.score,
                frame.hud.lives,
                frame.hud.time,
                frame.draws.len()
            );
        }
        frame_index += 1;
    }
    game.audio.stop_music();

    log::info!(
        "Stopped after {} frames ({} ticks), final score {}",
        frame_index,
        game.state.time_ticks,
        game.state.score
    );
    Ok(())
}
