//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (solids, coins and enemies keep definition order)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod collision;
pub mod grid;
pub mod level;
pub mod overworld;
pub mod physics;
pub mod rect;
pub mod state;
pub mod tick;

pub use body::{Enemy, EnemyKind, EnemySpawn, EnemyState, HurtOutcome, Player, PlayerSize};
pub use collision::{Axis, AxisContact, MoveContacts, is_stomp, move_and_collide, resolve_axis};
pub use grid::SpatialGrid;
pub use level::{
    Coin, LevelCatalog, LevelGenerator, LevelGeometry, LevelId, LevelSpec, RandomLevelGenerator,
    Solid, SolidKind, Theme, authored_levels,
};
pub use overworld::{NavAction, Navigator, Node, NodeKind, World, WorldMap};
pub use physics::{DeathCause, LevelEvent, LevelRun};
pub use rect::Rect;
pub use state::{GameEvent, GameState, Mode, Resume, Rules, SoundCue};
pub use tick::{TickInput, tick};
