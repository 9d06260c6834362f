//! In-level simulation step
//!
//! Advances the player and enemies one fixed tick against the loaded level and
//! reports what happened. Scoring, lives and mode changes are left to the game
//! state machine, which consumes the returned events.

use super::body::{Enemy, EnemyState, HurtOutcome, Player};
use super::collision::{is_stomp, move_and_collide};
use super::level::{LevelGeometry, LevelId, LevelSpec};
use super::tick::TickInput;
use crate::clamp_camera;
use crate::consts::*;

/// Why the player lost a life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Enemy,
    Fall,
    TimeUp,
}

/// Something that happened during a level tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    Jumped,
    /// Hit a solid from below
    BlockBumped,
    CoinCollected { coin: u32 },
    EnemyStomped { enemy: u32 },
    /// Shrunk by an enemy, now invincible for a while
    PlayerHurt,
    PlayerDied(DeathCause),
    GoalReached,
}

impl LevelEvent {
    /// True for events that end the tick early
    pub fn is_terminal(&self) -> bool {
        matches!(self, LevelEvent::PlayerDied(_) | LevelEvent::GoalReached)
    }
}

/// Everything that lives for the duration of one attempt at a level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRun {
    pub id: LevelId,
    /// Definition kept for respawn reloads
    pub spec: LevelSpec,
    pub geometry: LevelGeometry,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub camera_x: f32,
    /// Seconds left on the level clock
    pub time_left: f32,
}

impl LevelRun {
    /// Fresh attempt: initial geometry, enemies from their spawn list, a
    /// small player at the start, full clock
    pub fn load(id: LevelId, spec: &LevelSpec, time_limit: f32) -> Self {
        let geometry = LevelGeometry::from_spec(spec);
        let enemies = spec
            .enemies
            .iter()
            .enumerate()
            .map(|(i, spawn)| Enemy::spawn(i as u32, spawn))
            .collect();
        log::info!(
            "Loaded level '{}' {}: width {}, {} solids, {} coins",
            spec.name,
            id,
            geometry.width,
            geometry.solids.len(),
            geometry.coins.len()
        );
        Self {
            id,
            spec: spec.clone(),
            geometry,
            player: Player::spawn(),
            enemies,
            camera_x: 0.0,
            time_left: time_limit,
        }
    }

    /// Advance one tick. Returns events in the order they happened; a
    /// terminal event (death or goal) is always last.
    pub fn step(&mut self, input: &TickInput, dt: f32) -> Vec<LevelEvent> {
        let mut events = Vec::new();

        self.step_player(input, &mut events);
        self.camera_x = clamp_camera(self.player.rect.center_x() - VIEW_W / 2.0, self.geometry.width);

        if self.step_enemies(&mut events) {
            return events;
        }

        while let Some(coin) = self.geometry.take_coin(&self.player.rect) {
            events.push(LevelEvent::CoinCollected { coin: coin.id });
        }

        if self.player.rect.overlaps(&self.geometry.goal) {
            events.push(LevelEvent::GoalReached);
            return events;
        }

        if self.player.invincible_ticks > 0 {
            self.player.invincible_ticks -= 1;
        }

        self.time_left -= dt;
        if self.time_left <= 0.0 {
            events.push(LevelEvent::PlayerDied(DeathCause::TimeUp));
            return events;
        }

        if self.player.rect.top() > VIEW_H {
            events.push(LevelEvent::PlayerDied(DeathCause::Fall));
        }
        events
    }

    fn step_player(&mut self, input: &TickInput, events: &mut Vec<LevelEvent>) {
        let player = &mut self.player;
        let walk = WALK_SPEED * SIM_DT;

        player.vel.x = 0.0;
        if input.left {
            player.vel.x = -walk;
        }
        if input.right {
            player.vel.x = walk;
        }

        if input.jump && player.on_ground {
            player.vel.y = JUMP_VEL;
            player.on_ground = false;
            events.push(LevelEvent::Jumped);
        }

        player.vel.y = (player.vel.y + GRAVITY).min(TERMINAL_VELOCITY);

        let contacts = move_and_collide(&mut player.rect, &mut player.vel, &self.geometry);
        player.on_ground = contacts.y.landed;
        if contacts.y.bumped {
            events.push(LevelEvent::BlockBumped);
        }
    }

    /// Move enemies and resolve player contact. Returns true if the player died.
    fn step_enemies(&mut self, events: &mut Vec<LevelEvent>) -> bool {
        // Stomped last tick, or fell out of the world
        self.enemies.retain(|e| e.is_walking() && e.rect.top() <= VIEW_H);

        let level_width = self.geometry.width;
        for enemy in &mut self.enemies {
            let heading = enemy.vel.x;
            enemy.vel.y = (enemy.vel.y + GRAVITY).min(TERMINAL_VELOCITY);
            let contacts = move_and_collide(&mut enemy.rect, &mut enemy.vel, &self.geometry);
            enemy.on_ground = contacts.y.landed;

            // Walls zero vel.x, so turn around from the pre-move heading
            if contacts.x.hit {
                enemy.vel.x = -heading;
            } else if enemy.rect.left() < 0.0 || enemy.rect.right() > level_width {
                enemy.rect.x = enemy.rect.x.clamp(0.0, (level_width - enemy.rect.w).max(0.0));
                enemy.reverse();
            }

            if !self.player.rect.overlaps(&enemy.rect) {
                continue;
            }
            if is_stomp(&self.player, enemy) {
                enemy.state = EnemyState::Defeated;
                self.player.vel.y = JUMP_VEL * STOMP_BOUNCE;
                events.push(LevelEvent::EnemyStomped { enemy: enemy.id });
            } else if !self.player.is_invincible() {
                match self.player.hurt() {
                    HurtOutcome::Shrunk => events.push(LevelEvent::PlayerHurt),
                    HurtOutcome::Died => {
                        events.push(LevelEvent::PlayerDied(DeathCause::Enemy));
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Put the player back at the start of a freshly reloaded level
    pub fn respawn(&mut self, time_limit: f32) {
        *self = Self::load(self.id, &self.spec, time_limit);
        self.player.invincible_ticks = INVINCIBLE_TICKS;
    }
}
