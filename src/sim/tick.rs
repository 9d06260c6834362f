//! Fixed timestep simulation tick
//!
//! Top-level dispatch: routes one tick of input to the overworld navigator or
//! the level physics depending on the active mode.

use super::overworld::NavAction;
use super::state::{GameEvent, GameState, Mode, Resume};

/// Logical actions held down this tick (a pressed-set snapshot)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Overworld: next world
    pub up: bool,
    /// Overworld: previous world
    pub down: bool,
    /// Jump in a level, confirm elsewhere
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Cancel / leave
    pub quit: bool,
}

impl TickInput {
    /// Actions held now that were not held on the previous tick
    pub fn pressed_since(&self, prev: &TickInput) -> TickInput {
        TickInput {
            left: self.left && !prev.left,
            right: self.right && !prev.right,
            up: self.up && !prev.up,
            down: self.down && !prev.down,
            jump: self.jump && !prev.jump,
            pause: self.pause && !prev.pause,
            quit: self.quit && !prev.quit,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let pressed = input.pressed_since(&state.prev_input);
    state.prev_input = *input;

    // Handle pause toggle
    if pressed.pause {
        match state.mode {
            Mode::Overworld => {
                state.set_mode(Mode::Paused {
                    resume: Resume::Overworld,
                });
                return;
            }
            Mode::Level => {
                state.set_mode(Mode::Paused {
                    resume: Resume::Level,
                });
                return;
            }
            Mode::Paused { resume } => {
                state.set_mode(resume.mode());
                return;
            }
            Mode::GameOver | Mode::Victory => {}
        }
    }

    if state.mode.is_paused() {
        return;
    }

    state.time_ticks += 1;

    match state.mode {
        Mode::Overworld => tick_overworld(state, input, &pressed, dt),
        Mode::Level => tick_level(state, input, &pressed, dt),
        Mode::GameOver | Mode::Victory => {
            if pressed.jump || pressed.quit {
                state.return_to_overworld();
            }
        }
        Mode::Paused { .. } => {}
    }
}

fn tick_overworld(state: &mut GameState, input: &TickInput, pressed: &TickInput, dt: f32) {
    if pressed.quit {
        if !state.quit_requested {
            log::info!("Quit requested from overworld");
            state.quit_requested = true;
            state.push_event(GameEvent::QuitRequested);
        }
        return;
    }

    let cooldown = state.rules.nav_cooldown_secs;
    let action = state
        .navigator
        .update(&state.map, &state.catalog, input, dt, cooldown);
    match action {
        Some(NavAction::Moved { world, node }) => {
            state.push_event(GameEvent::CursorMoved { world, node });
        }
        Some(NavAction::Enter(id)) => state.enter_level(id),
        None => {}
    }
}

fn tick_level(state: &mut GameState, input: &TickInput, pressed: &TickInput, dt: f32) {
    if pressed.quit {
        log::info!("Left level");
        state.return_to_overworld();
        return;
    }

    let Some(run) = state.level.as_mut() else {
        log::warn!("Level mode without a loaded level, returning to overworld");
        state.return_to_overworld();
        return;
    };

    for event in run.step(input, dt) {
        state.apply_level_event(event);
    }
}
