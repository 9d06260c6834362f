//! Game session state and the mode machine's data
//!
//! Everything one run needs lives here: score and lives, the active mode, the
//! overworld cursor and the level attempt in progress.

use super::level::{LevelCatalog, LevelId};
use super::overworld::{Navigator, WorldMap};
use super::physics::{DeathCause, LevelEvent, LevelRun};
use super::tick::TickInput;
use crate::consts::*;

/// Mode a pause returns to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Overworld,
    Level,
}

impl Resume {
    pub fn mode(self) -> Mode {
        match self {
            Resume::Overworld => Mode::Overworld,
            Resume::Level => Mode::Level,
        }
    }
}

/// Exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Level-select map
    Overworld,
    /// Active play
    Level,
    /// Suspended; nothing advances until resumed
    Paused { resume: Resume },
    /// Lives exhausted, waiting for confirmation
    GameOver,
    /// Goal reached, waiting for confirmation
    Victory,
}

impl Mode {
    pub fn is_paused(&self) -> bool {
        matches!(self, Mode::Paused { .. })
    }
}

/// Named audio cues; the sink decides what they sound like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Move,
    Select,
    Jump,
    Coin,
    Stomp,
    Hurt,
    Pause,
    GameOver,
    Victory,
}

/// Something the outer shell may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ModeChanged { from: Mode, to: Mode },
    CursorMoved { world: usize, node: usize },
    LevelEntered(LevelId),
    Level(LevelEvent),
    LifeLost { cause: DeathCause, lives_left: u8 },
    /// Goal bonus awarded
    LevelCleared { bonus: u64 },
    /// Player asked to leave from the overworld
    QuitRequested,
}

impl GameEvent {
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::ModeChanged { to: Mode::Paused { .. }, .. }
            | GameEvent::ModeChanged {
                from: Mode::Paused { .. },
                ..
            } => Some(SoundCue::Pause),
            GameEvent::ModeChanged { to: Mode::GameOver, .. } => Some(SoundCue::GameOver),
            GameEvent::ModeChanged { to: Mode::Victory, .. } => Some(SoundCue::Victory),
            GameEvent::CursorMoved { .. } => Some(SoundCue::Move),
            GameEvent::LevelEntered(_) => Some(SoundCue::Select),
            GameEvent::Level(LevelEvent::Jumped) => Some(SoundCue::Jump),
            GameEvent::Level(LevelEvent::CoinCollected { .. }) => Some(SoundCue::Coin),
            GameEvent::Level(LevelEvent::EnemyStomped { .. }) => Some(SoundCue::Stomp),
            GameEvent::Level(LevelEvent::PlayerHurt) | GameEvent::LifeLost { .. } => {
                Some(SoundCue::Hurt)
            }
            _ => None,
        }
    }
}

/// Session tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub starting_lives: u8,
    /// Level clock in seconds
    pub level_time_secs: f32,
    /// Overworld input debounce in seconds
    pub nav_cooldown_secs: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            level_time_secs: LEVEL_TIME_SECS,
            nav_cooldown_secs: NAV_COOLDOWN_SECS,
        }
    }
}

/// One run of the game
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub score: u64,
    pub lives: u8,
    pub mode: Mode,
    /// Overworld cursor; kept while in a level
    pub navigator: Navigator,
    /// Attempt in progress, present in Level (and while it is paused)
    pub level: Option<LevelRun>,
    pub map: WorldMap,
    pub catalog: LevelCatalog,
    pub rules: Rules,
    /// Active (unpaused) ticks simulated
    pub time_ticks: u64,
    /// Raised by quit on the overworld; the runner exits
    pub quit_requested: bool,
    /// Input snapshot from the previous tick, for press detection
    pub prev_input: TickInput,
    /// Events since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(map: WorldMap, catalog: LevelCatalog, rules: Rules) -> Self {
        Self {
            score: 0,
            lives: rules.starting_lives,
            mode: Mode::Overworld,
            navigator: Navigator::new(),
            level: None,
            map,
            catalog,
            rules,
            time_ticks: 0,
            quit_requested: false,
            prev_input: TickInput::default(),
            events: Vec::new(),
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        log::debug!("{:?}", event);
        self.events.push(event);
    }

    /// Seconds left on the level clock, if a level is loaded
    pub fn time_left(&self) -> Option<f32> {
        self.level.as_ref().map(|run| run.time_left)
    }

    /// World name under the overworld cursor
    pub fn world_name(&self) -> &str {
        self.map
            .worlds
            .get(self.navigator.world)
            .map_or("", |w| w.name.as_str())
    }

    pub(crate) fn set_mode(&mut self, to: Mode) {
        let from = self.mode;
        if from == to {
            return;
        }
        log::info!("Mode {:?} -> {:?}", from, to);
        self.mode = to;
        self.push_event(GameEvent::ModeChanged { from, to });
    }

    /// Load a level from the catalog and start playing it. Undefined ids
    /// are logged and leave the state untouched.
    pub fn enter_level(&mut self, id: LevelId) {
        let run = match self.catalog.get(id) {
            Ok(spec) => LevelRun::load(id, spec, self.rules.level_time_secs),
            Err(e) => {
                log::warn!("Cannot enter level: {}", e);
                return;
            }
        };
        self.level = Some(run);
        self.push_event(GameEvent::LevelEntered(id));
        self.set_mode(Mode::Level);
    }

    /// Drop any level in progress and go back to the map. Coming from game
    /// over also starts a fresh session.
    pub fn return_to_overworld(&mut self) {
        if self.mode == Mode::GameOver {
            self.score = 0;
            self.lives = self.rules.starting_lives;
        }
        self.level = None;
        // A confirm held from the previous screen must be released before it
        // can enter a level
        self.navigator.arm_cooldown(self.rules.nav_cooldown_secs);
        self.navigator.latch_confirm();
        self.set_mode(Mode::Overworld);
    }

    /// Score and mode consequences of one level tick
    pub(crate) fn apply_level_event(&mut self, event: LevelEvent) {
        self.push_event(GameEvent::Level(event));
        match event {
            LevelEvent::EnemyStomped { .. } => self.score += STOMP_POINTS,
            LevelEvent::CoinCollected { .. } => self.score += COIN_POINTS,
            LevelEvent::GoalReached => {
                let time_left = self.time_left().unwrap_or(0.0).max(0.0);
                let bonus = time_left.floor() as u64 * TIME_BONUS_MULTIPLIER;
                self.score += bonus;
                self.push_event(GameEvent::LevelCleared { bonus });
                self.set_mode(Mode::Victory);
            }
            LevelEvent::PlayerDied(cause) => self.lose_life(cause),
            LevelEvent::Jumped | LevelEvent::BlockBumped | LevelEvent::PlayerHurt => {}
        }
    }

    fn lose_life(&mut self, cause: DeathCause) {
        self.lives = self.lives.saturating_sub(1);
        log::info!("Life lost ({:?}), {} left", cause, self.lives);
        self.push_event(GameEvent::LifeLost {
            cause,
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.set_mode(Mode::GameOver);
        } else if let Some(run) = self.level.as_mut() {
            run.respawn(self.rules.level_time_secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::authored_levels;

    fn state() -> GameState {
        let mut catalog = LevelCatalog::empty();
        for (id, spec) in authored_levels() {
            catalog.insert(id, spec);
        }
        GameState::new(WorldMap::standard(), catalog, Rules::default())
    }

    #[test]
    fn test_new_session() {
        let state = state();
        assert_eq!(state.mode, Mode::Overworld);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert!(state.level.is_none());
        assert_eq!(state.time_left(), None);
        assert_eq!(state.world_name(), "Yoshi's Island");
    }

    #[test]
    fn test_enter_level_loads_run() {
        let mut state = state();
        state.enter_level(LevelId::new(0, 1));
        assert_eq!(state.mode, Mode::Level);
        assert_eq!(state.time_left(), Some(LEVEL_TIME_SECS));
        assert_eq!(state.level.as_ref().map(|r| r.spec.name.as_str()), Some("1-2"));

        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::LevelEntered(LevelId::new(0, 1)));
        assert_eq!(
            events[1],
            GameEvent::ModeChanged {
                from: Mode::Overworld,
                to: Mode::Level
            }
        );
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_enter_undefined_level_is_noop() {
        let mut state = state();
        let before = state.clone();
        state.enter_level(LevelId::new(0, 2));
        assert_eq!(state, before);
    }

    #[test]
    fn test_goal_awards_time_bonus() {
        let mut state = state();
        state.enter_level(LevelId::new(0, 0));
        if let Some(run) = state.level.as_mut() {
            run.time_left = 123.9;
        }
        state.score = 250;

        state.apply_level_event(LevelEvent::GoalReached);
        assert_eq!(state.mode, Mode::Victory);
        assert_eq!(state.score, 250 + 1230);
        assert!(state
            .events()
            .contains(&GameEvent::LevelCleared { bonus: 1230 }));
    }

    #[test]
    fn test_death_respawns_until_out_of_lives() {
        let mut state = state();
        state.enter_level(LevelId::new(0, 0));
        if let Some(run) = state.level.as_mut() {
            run.player.rect.x = 400.0;
        }
        state.score = 450;

        state.apply_level_event(LevelEvent::PlayerDied(DeathCause::Fall));
        assert_eq!(state.lives, 2);
        assert_eq!(state.score, 450);
        assert_eq!(state.mode, Mode::Level);
        let run = state.level.as_ref().map(|r| (r.player.rect.center_x(), r.player.invincible_ticks));
        assert_eq!(run, Some((64.0, INVINCIBLE_TICKS)));

        state.apply_level_event(LevelEvent::PlayerDied(DeathCause::Enemy));
        state.apply_level_event(LevelEvent::PlayerDied(DeathCause::TimeUp));
        assert_eq!(state.lives, 0);
        assert_eq!(state.mode, Mode::GameOver);
    }

    #[test]
    fn test_game_over_exit_resets_session() {
        let mut state = state();
        state.score = 900;
        state.lives = 0;
        state.mode = Mode::GameOver;

        state.return_to_overworld();
        assert_eq!(state.mode, Mode::Overworld);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.navigator.cooldown > 0.0);
        assert!(state.navigator.confirm_latched);
    }

    #[test]
    fn test_victory_exit_keeps_score() {
        let mut state = state();
        state.enter_level(LevelId::new(0, 0));
        state.score = 900;
        state.lives = 2;
        state.mode = Mode::Victory;

        state.return_to_overworld();
        assert_eq!((state.score, state.lives), (900, 2));
        assert!(state.level.is_none());
    }

    #[test]
    fn test_event_cues() {
        let pause = GameEvent::ModeChanged {
            from: Mode::Level,
            to: Mode::Paused {
                resume: Resume::Level,
            },
        };
        assert_eq!(pause.cue(), Some(SoundCue::Pause));
        let resume = GameEvent::ModeChanged {
            from: Mode::Paused {
                resume: Resume::Overworld,
            },
            to: Mode::Overworld,
        };
        assert_eq!(resume.cue(), Some(SoundCue::Pause));
        assert_eq!(
            GameEvent::CursorMoved { world: 0, node: 1 }.cue(),
            Some(SoundCue::Move)
        );
        assert_eq!(GameEvent::Level(LevelEvent::BlockBumped).cue(), None);
        assert_eq!(GameEvent::Level(LevelEvent::PlayerDied(DeathCause::Fall)).cue(), None);
        assert_eq!(
            GameEvent::LifeLost {
                cause: DeathCause::Fall,
                lives_left: 1
            }
            .cue(),
            Some(SoundCue::Hurt)
        );
        assert_eq!(GameEvent::QuitRequested.cue(), None);
    }
}
