//! Overworld map and level-select navigation
//!
//! Worlds are an ordered list of linear node paths. The navigator moves a
//! cursor along the current world's path, clamped at both ends, and hands back
//! a level id when the player confirms a node that has a definition.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{LevelCatalog, LevelId};
use super::tick::TickInput;

/// Map node categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Plain,
    Switch,
    GhostHouse,
    Fortress,
    Castle,
}

impl NodeKind {
    /// Marker color on the map
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            NodeKind::Plain => [60, 220, 60],
            NodeKind::Switch => [240, 220, 70],
            NodeKind::GhostHouse => [120, 60, 180],
            NodeKind::Fortress => [220, 120, 30],
            NodeKind::Castle => [220, 50, 50],
        }
    }
}

/// A level entrance on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub pos: Vec2,
    pub label: String,
    pub kind: NodeKind,
    pub level: LevelId,
}

/// One world: nodes connected in order by straight paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    pub nodes: Vec<Node>,
}

impl World {
    /// Path segments between consecutive nodes
    pub fn paths(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.nodes.windows(2).map(|pair| (pair[0].pos, pair[1].pos))
    }
}

/// The full overworld
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldMap {
    pub worlds: Vec<World>,
}

/// Compact node table: `(x, y, label, kind)`
type NodeRow = (f32, f32, &'static str, NodeKind);

fn world(index: usize, name: &str, rows: &[NodeRow]) -> World {
    World {
        name: name.to_string(),
        nodes: rows
            .iter()
            .enumerate()
            .map(|(node, &(x, y, label, kind))| Node {
                pos: Vec2::new(x, y),
                label: label.to_string(),
                kind,
                level: LevelId::new(index, node),
            })
            .collect(),
    }
}

impl WorldMap {
    /// The nine-world map the game ships with
    pub fn standard() -> Self {
        use NodeKind::*;
        let worlds = vec![
            world(0, "Yoshi's Island", &[
                (60.0, 300.0, "YI 1", Plain),
                (120.0, 270.0, "YI 2", Plain),
                (90.0, 220.0, "Ylw Switch", Switch),
                (180.0, 240.0, "YI 3", Plain),
                (240.0, 270.0, "YI 4", Plain),
                (300.0, 300.0, "#1 Iggy", Castle),
            ]),
            world(1, "Donut Plains", &[
                (60.0, 180.0, "DP 1", Plain),
                (120.0, 150.0, "DP 2", Plain),
                (90.0, 100.0, "Grn Switch", Switch),
                (180.0, 120.0, "DP Secret", Plain),
                (240.0, 150.0, "DP 3", Plain),
                (300.0, 180.0, "DP 4", Plain),
                (360.0, 150.0, "DP Ghost", GhostHouse),
                (420.0, 180.0, "#2 Morton", Castle),
            ]),
            world(2, "Vanilla Dome", &[
                (400.0, 80.0, "VD 1", Plain),
                (460.0, 50.0, "VD 2", Plain),
                (430.0, 120.0, "Red Switch", Switch),
                (520.0, 90.0, "VD 3", Plain),
                (580.0, 60.0, "VD Ghost", GhostHouse),
                (550.0, 130.0, "#3 Lemmy", Castle),
            ]),
            world(3, "Twin Bridges", &[
                (80.0, 350.0, "V.Fortress", Fortress),
                (150.0, 320.0, "Cookie Mtn", Plain),
                (220.0, 350.0, "Butter Br 1", Plain),
                (290.0, 320.0, "Butter Br 2", Plain),
                (360.0, 350.0, "Cheese Br", Plain),
                (430.0, 320.0, "#4 Ludwig", Castle),
            ]),
            world(4, "Forest of Illusion", &[
                (500.0, 250.0, "FoI 1", Plain),
                (560.0, 220.0, "FoI 2", Plain),
                (530.0, 170.0, "Blu Switch", Switch),
                (470.0, 190.0, "FoI 3", Plain),
                (540.0, 280.0, "FoI Ghost", GhostHouse),
                (590.0, 200.0, "FoI Secret", Plain),
                (500.0, 140.0, "#5 Roy", Castle),
            ]),
            world(5, "Chocolate Island", &[
                (80.0, 50.0, "CI 1", Plain),
                (140.0, 80.0, "CI 2", Plain),
                (200.0, 50.0, "CI 3", Plain),
                (170.0, 110.0, "CI Ghost", GhostHouse),
                (260.0, 80.0, "CI Secret", Plain),
                (320.0, 50.0, "ChocoFort", Fortress),
                (290.0, 120.0, "#6 Wendy", Castle),
            ]),
            world(6, "Valley of Bowser", &[
                (450.0, 350.0, "VB 1", Plain),
                (500.0, 320.0, "VB 2", Plain),
                (550.0, 350.0, "VB Ghost", GhostHouse),
                (500.0, 380.0, "VB Castle", Fortress),
                (580.0, 300.0, "Bowser's", Castle),
            ]),
            world(7, "Star World", &[
                (100.0, 30.0, "SW 1", Plain),
                (180.0, 30.0, "SW 2", Plain),
                (260.0, 30.0, "SW 3", Plain),
                (340.0, 30.0, "SW 4", Plain),
                (420.0, 30.0, "SW 5", Plain),
            ]),
            world(8, "Special Zone", &[
                (500.0, 30.0, "Gnarly", Plain),
                (500.0, 70.0, "Tubular", Plain),
                (500.0, 110.0, "WayCool", Plain),
                (500.0, 150.0, "Awesome", Plain),
                (500.0, 190.0, "Groovy", Plain),
                (500.0, 230.0, "Mondo", Plain),
                (500.0, 270.0, "Outrage", Plain),
                (500.0, 310.0, "Funky", Plain),
            ]),
        ];
        Self { worlds }
    }

    pub fn node(&self, world: usize, node: usize) -> Option<&Node> {
        self.worlds.get(world)?.nodes.get(node)
    }
}

/// Result of one navigator update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Cursor moved to a new node (possibly in a new world)
    Moved { world: usize, node: usize },
    /// Confirmed a node with a defined level
    Enter(LevelId),
}

/// Level-select cursor with input debounce
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Navigator {
    pub world: usize,
    pub node: usize,
    /// Seconds until input is accepted again
    pub cooldown: f32,
    /// Confirm is ignored until it has been seen released
    #[serde(default)]
    pub confirm_latched: bool,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> LevelId {
        LevelId::new(self.world, self.node)
    }

    /// Ignore input for one debounce window
    pub fn arm_cooldown(&mut self, secs: f32) {
        self.cooldown = secs;
    }

    /// Ignore confirm until it is released and pressed again
    pub fn latch_confirm(&mut self) {
        self.confirm_latched = true;
    }

    /// Advance the cursor from held input. At most one action per debounce
    /// window; holding a direction repeats once the window elapses.
    pub fn update(
        &mut self,
        map: &WorldMap,
        catalog: &LevelCatalog,
        input: &TickInput,
        dt: f32,
        cooldown_secs: f32,
    ) -> Option<NavAction> {
        if !input.jump {
            self.confirm_latched = false;
        }
        self.cooldown -= dt;
        if self.cooldown > 0.0 {
            return None;
        }
        self.cooldown = 0.0;

        let last_world = map.worlds.len().checked_sub(1)?;
        let last_node = map.worlds[self.world].nodes.len().saturating_sub(1);

        let (world, node) = if input.right {
            (self.world, (self.node + 1).min(last_node))
        } else if input.left {
            (self.world, self.node.saturating_sub(1))
        } else if input.up {
            if self.world < last_world {
                (self.world + 1, 0)
            } else {
                (self.world, self.node)
            }
        } else if input.down {
            if self.world > 0 {
                (self.world - 1, 0)
            } else {
                (self.world, self.node)
            }
        } else if input.jump {
            if self.confirm_latched {
                return None;
            }
            self.cooldown = cooldown_secs;
            let id = map.node(self.world, self.node)?.level;
            return match catalog.get(id) {
                Ok(_) => Some(NavAction::Enter(id)),
                Err(e) => {
                    log::warn!("Overworld select ignored: {}", e);
                    None
                }
            };
        } else {
            return None;
        };

        // Clamped at an edge: nothing moves, nothing plays
        if (world, node) == (self.world, self.node) {
            return None;
        }

        self.world = world;
        self.node = node;
        self.cooldown = cooldown_secs;
        log::debug!("Overworld cursor -> world {}, node {}", world, node);
        Some(NavAction::Moved { world, node })
    }
}
