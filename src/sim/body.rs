//! Moving bodies: the player and patrolling enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Player size state; determines the hitbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerSize {
    #[default]
    Small,
    Big,
    Fire,
}

impl PlayerSize {
    /// Hitbox `(width, height)` in pixels
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PlayerSize::Small => (TILE, TILE * 1.5),
            PlayerSize::Big | PlayerSize::Fire => (TILE, TILE * 2.0),
        }
    }
}

/// What a hit from an enemy did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HurtOutcome {
    /// Dropped to small and gained invincibility
    Shrunk,
    /// Was already small
    Died,
}

/// Where the player's feet go on (re)spawn
pub fn player_start() -> Vec2 {
    Vec2::new(TILE_PX * 2.0, GROUND_Y)
}

/// The player body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Velocity in pixels/tick
    pub vel: Vec2,
    pub size: PlayerSize,
    pub on_ground: bool,
    /// Ticks of invincibility remaining
    pub invincible_ticks: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::spawn()
    }
}

impl Player {
    /// A small player standing at the level start, not yet grounded
    pub fn spawn() -> Self {
        let size = PlayerSize::Small;
        let (w, h) = size.dimensions();
        Self {
            rect: Rect::from_midbottom(player_start(), w, h),
            vel: Vec2::ZERO,
            size,
            on_ground: false,
            invincible_ticks: 0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Switch size state, keeping the feet planted
    pub fn set_size(&mut self, size: PlayerSize) {
        if self.size == size {
            return;
        }
        self.size = size;
        let (w, h) = size.dimensions();
        self.rect.resize_from_midbottom(w, h);
    }

    /// Apply an enemy hit: big/fire shrink with a grace window, small dies
    pub fn hurt(&mut self) -> HurtOutcome {
        match self.size {
            PlayerSize::Small => HurtOutcome::Died,
            PlayerSize::Big | PlayerSize::Fire => {
                self.set_size(PlayerSize::Small);
                self.invincible_ticks = INVINCIBLE_TICKS;
                HurtOutcome::Shrunk
            }
        }
    }

    /// Blink phase for rendering while invincible
    pub fn visible(&self) -> bool {
        self.invincible_ticks == 0 || self.invincible_ticks % 10 < 5
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Walks along the ground (goomba-style)
    #[serde(alias = "goomba")]
    GroundWalker,
    /// Taller, faster shelled walker (koopa-style)
    #[serde(alias = "koopa")]
    ShellWalker,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 2] = [EnemyKind::GroundWalker, EnemyKind::ShellWalker];

    pub fn width(&self) -> f32 {
        TILE_PX
    }

    pub fn height(&self) -> f32 {
        match self {
            EnemyKind::GroundWalker => TILE_PX,
            EnemyKind::ShellWalker => TILE_PX * 1.5,
        }
    }

    /// Initial patrol velocity in pixels/tick (negative walks left)
    pub fn patrol_speed(&self) -> f32 {
        let units = match self {
            EnemyKind::GroundWalker => -1.0,
            EnemyKind::ShellWalker => -1.5,
        };
        units * ENEMY_SPEED_SCALE * SIM_DT
    }
}

/// Enemy spawn descriptor from a level definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Left edge in pixels
    pub x: f32,
    pub kind: EnemyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Walking,
    /// Stomped; removed from the active set on the next tick
    Defeated,
}

/// An active enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub rect: Rect,
    pub vel: Vec2,
    pub state: EnemyState,
    pub on_ground: bool,
}

impl Enemy {
    /// Place an enemy standing on the ground line at the spawn's x
    pub fn spawn(id: u32, spawn: &EnemySpawn) -> Self {
        let kind = spawn.kind;
        let h = kind.height();
        Self {
            id,
            kind,
            rect: Rect::new(spawn.x, GROUND_Y - h, kind.width(), h),
            vel: Vec2::new(kind.patrol_speed(), 0.0),
            state: EnemyState::Walking,
            on_ground: false,
        }
    }

    pub fn is_walking(&self) -> bool {
        self.state == EnemyState::Walking
    }

    /// Turn around, keeping patrol speed
    pub fn reverse(&mut self) {
        let speed = self.kind.patrol_speed().abs();
        self.vel.x = if self.vel.x > 0.0 { -speed } else { speed };
    }
}
