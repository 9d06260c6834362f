//! Per-frame draw list
//!
//! The simulation never draws. Each frame the host captures a [`Frame`] from
//! the game state: camera-space rectangles tagged with what they are, the HUD
//! values and, on the map, the overworld layout. Rasterizing it is up to the
//! host.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{
    EnemyKind, GameState, LevelRun, Mode, NodeKind, PlayerSize, Rect, Resume, SolidKind,
};

/// Convert an 8-bit RGB triple to a linear-ish RGBA color
fn color(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha,
    ]
}

const GROUND: [u8; 3] = [155, 118, 83];
const BLOCK: [u8; 3] = [198, 109, 43];
const GOAL: [u8; 3] = [0, 168, 24];
const COIN: [u8; 3] = [255, 219, 88];
const MAP_BACKGROUND: [u8; 3] = [34, 139, 34];
const BLACK: [u8; 3] = [0, 0, 0];
const SKY: [u8; 3] = [110, 180, 240];

/// What a rectangle depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Platform,
    Block,
    Coin,
    Goal,
    Enemy(EnemyKind),
    Player(PlayerSize),
}

impl DrawKind {
    pub fn color(&self) -> [f32; 4] {
        let rgb = match self {
            DrawKind::Platform => GROUND,
            DrawKind::Block => BLOCK,
            DrawKind::Coin => COIN,
            DrawKind::Goal => GOAL,
            DrawKind::Enemy(EnemyKind::GroundWalker) => [168, 80, 32],
            DrawKind::Enemy(EnemyKind::ShellWalker) => [32, 160, 0],
            DrawKind::Player(PlayerSize::Small) => [255, 0, 0],
            DrawKind::Player(PlayerSize::Big) => [255, 99, 0],
            DrawKind::Player(PlayerSize::Fire) => [255, 255, 255],
        };
        color(rgb, 1.0)
    }
}

/// One rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmd {
    pub rect: Rect,
    pub kind: DrawKind,
}

/// Values shown in the heads-up display
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    /// Whole seconds left, while a level is loaded
    pub time: Option<u32>,
    pub level_name: Option<String>,
    pub world_name: String,
}

/// Full-screen message over (or instead of) the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Paused,
    GameOver,
    Victory,
}

/// A map node as drawn
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub pos: Vec2,
    pub kind: NodeKind,
    pub label: String,
    pub color: [f32; 4],
}

/// The level-select map of the current world
#[derive(Debug, Clone, PartialEq)]
pub struct OverworldView {
    pub nodes: Vec<NodeView>,
    /// Path segments between consecutive nodes
    pub paths: Vec<(Vec2, Vec2)>,
    pub cursor: Vec2,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: [f32; 4],
    /// Back to front
    pub draws: Vec<DrawCmd>,
    pub overworld: Option<OverworldView>,
    pub hud: Hud,
    pub overlay: Option<Overlay>,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        let hud = Hud {
            score: state.score,
            lives: state.lives,
            time: state.time_left().map(|t| t.max(0.0).floor() as u32),
            level_name: state.level.as_ref().map(|run| run.spec.name.clone()),
            world_name: state.world_name().to_string(),
        };

        let mut frame = Self {
            clear_color: color(BLACK, 1.0),
            draws: Vec::new(),
            overworld: None,
            hud,
            overlay: None,
        };

        // A paused frame shows the scene it suspended
        let scene = match state.mode {
            Mode::Paused { resume } => {
                frame.overlay = Some(Overlay::Paused);
                resume
            }
            Mode::Overworld => Resume::Overworld,
            Mode::Level => Resume::Level,
            Mode::GameOver => {
                frame.overlay = Some(Overlay::GameOver);
                return frame;
            }
            Mode::Victory => {
                frame.clear_color = color(SKY, 1.0);
                frame.overlay = Some(Overlay::Victory);
                return frame;
            }
        };

        match scene {
            Resume::Overworld => frame.draw_overworld(state),
            Resume::Level => {
                if let Some(run) = &state.level {
                    frame.draw_level(run);
                }
            }
        }
        frame
    }

    fn draw_overworld(&mut self, state: &GameState) {
        self.clear_color = color(MAP_BACKGROUND, 1.0);
        let Some(world) = state.map.worlds.get(state.navigator.world) else {
            return;
        };
        let nodes = world
            .nodes
            .iter()
            .map(|node| NodeView {
                pos: node.pos,
                kind: node.kind,
                label: node.label.clone(),
                color: color(node.kind.rgb(), 1.0),
            })
            .collect();
        let cursor = world
            .nodes
            .get(state.navigator.node)
            .map_or(Vec2::ZERO, |node| node.pos);
        self.overworld = Some(OverworldView {
            nodes,
            paths: world.paths().collect(),
            cursor,
        });
    }

    fn draw_level(&mut self, run: &LevelRun) {
        self.clear_color = color(run.geometry.theme.rgb(), 1.0);
        let offset = -run.camera_x;

        let solids = run.geometry.solids.iter().map(|solid| {
            let kind = match solid.kind {
                SolidKind::Platform => DrawKind::Platform,
                SolidKind::Block => DrawKind::Block,
            };
            (solid.rect, kind)
        });
        let coins = run.geometry.coins.iter().map(|c| (c.rect, DrawKind::Coin));
        let enemies = run
            .enemies
            .iter()
            .filter(|e| e.is_walking())
            .map(|e| (e.rect, DrawKind::Enemy(e.kind)));
        let goal = std::iter::once((run.geometry.goal, DrawKind::Goal));

        for (rect, kind) in solids.chain(coins).chain(goal).chain(enemies) {
            self.push_visible(rect.translated(offset, 0.0), kind);
        }

        let player = &run.player;
        if player.visible() {
            self.push_visible(
                player.rect.translated(offset, 0.0),
                DrawKind::Player(player.size),
            );
        }
    }

    /// Skip anything entirely outside the viewport
    fn push_visible(&mut self, rect: Rect, kind: DrawKind) {
        if rect.right() <= 0.0 || rect.left() >= VIEW_W {
            return;
        }
        self.draws.push(DrawCmd { rect, kind });
    }

    pub fn count(&self, kind: DrawKind) -> usize {
        self.draws.iter().filter(|d| d.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LevelCatalog, LevelId, Rules, WorldMap, authored_levels};

    fn state() -> GameState {
        let mut catalog = LevelCatalog::empty();
        for (id, spec) in authored_levels() {
            catalog.insert(id, spec);
        }
        GameState::new(WorldMap::standard(), catalog, Rules::default())
    }

    #[test]
    fn test_overworld_frame() {
        let mut state = state();
        state.navigator.node = 2;
        let frame = Frame::capture(&state);

        let view = frame.overworld.as_ref().unwrap();
        assert_eq!(view.nodes.len(), 6);
        assert_eq!(view.paths.len(), 5);
        assert_eq!(view.cursor, state.map.worlds[0].nodes[2].pos);
        assert!(frame.draws.is_empty());
        assert_eq!(frame.hud.time, None);
        assert_eq!(frame.hud.world_name, "Yoshi's Island");
        assert_eq!(frame.overlay, None);
    }

    #[test]
    fn test_level_frame_is_camera_relative() {
        let mut state = state();
        state.enter_level(LevelId::new(0, 0));
        let run = state.level.as_mut().unwrap();
        run.camera_x = 100.0;
        let ground = run.geometry.solids[0].rect;
        let frame = Frame::capture(&state);

        assert_eq!(frame.hud.time, Some(300));
        assert_eq!(frame.hud.level_name.as_deref(), Some("1-1"));
        assert_eq!(frame.draws[0].kind, DrawKind::Platform);
        assert_eq!(frame.draws[0].rect.x, ground.x - 100.0);
        assert_eq!(frame.count(DrawKind::Player(PlayerSize::Small)), 1);
        assert!(frame.draws.iter().all(|d| d.rect.right() > 0.0 && d.rect.left() < VIEW_W));
    }

    #[test]
    fn test_player_blinks_while_invincible() {
        let mut state = state();
        state.enter_level(LevelId::new(0, 0));
        let player = DrawKind::Player(PlayerSize::Small);

        let run = state.level.as_mut().unwrap();
        run.player.invincible_ticks = 12;
        assert_eq!(Frame::capture(&state).count(player), 1);

        let run = state.level.as_mut().unwrap();
        run.player.invincible_ticks = 17;
        assert_eq!(Frame::capture(&state).count(player), 0);
    }

    #[test]
    fn test_paused_frame_keeps_scene() {
        let mut state = state();
        state.enter_level(LevelId::new(0, 0));
        let playing = Frame::capture(&state);

        state.mode = Mode::Paused {
            resume: Resume::Level,
        };
        let paused = Frame::capture(&state);
        assert_eq!(paused.overlay, Some(Overlay::Paused));
        assert_eq!(paused.draws, playing.draws);
    }

    #[test]
    fn test_end_screens_have_no_scene() {
        let mut state = state();
        state.enter_level(LevelId::new(0, 0));
        state.mode = Mode::GameOver;
        let frame = Frame::capture(&state);
        assert_eq!(frame.overlay, Some(Overlay::GameOver));
        assert!(frame.draws.is_empty());
        assert!(frame.overworld.is_none());
    }
}
