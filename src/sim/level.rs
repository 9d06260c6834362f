//! Level definitions and the per-level geometry store
//!
//! A `LevelSpec` is the immutable, serializable definition of a level. Loading
//! one produces `LevelGeometry`: pixel-space solids indexed by a spatial grid,
//! the live coin set, and the goal. Enemies are spawned separately from the
//! spec's descriptor list.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{EnemyKind, EnemySpawn};
use super::grid::SpatialGrid;
use super::overworld::WorldMap;
use super::rect::Rect;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::tile_to_px;

/// Identifies a level by the overworld node it hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LevelId {
    pub world: usize,
    pub node: usize,
}

impl LevelId {
    pub const fn new(world: usize, node: usize) -> Self {
        Self { world, node }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.world, self.node)
    }
}

/// Background palette for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Sky,
    Cornflower,
    LightSky,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Sky, Theme::Cornflower, Theme::LightSky];

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Theme::Sky => [110, 180, 240],
            Theme::Cornflower => [100, 149, 237],
            Theme::LightSky => [135, 206, 250],
        }
    }
}

/// Static definition of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub name: String,
    /// Platforms in pixels
    pub platforms: Vec<Rect>,
    /// Block tile coordinates `(tx, ty)`
    #[serde(default)]
    pub blocks: Vec<(i32, i32)>,
    /// Coin tile coordinates `(tx, ty)`
    #[serde(default)]
    pub coins: Vec<(i32, i32)>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    /// Goal top-left in pixels
    pub goal: (f32, f32),
    #[serde(default)]
    pub theme: Theme,
}

impl LevelSpec {
    /// Width of the playable area: the furthest platform edge, never less
    /// than one screen. No platforms falls back to the viewport width.
    pub fn level_width(&self) -> f32 {
        self.platforms
            .iter()
            .map(Rect::right)
            .reduce(f32::max)
            .map_or(VIEW_W, |max_x| max_x.max(VIEW_W))
    }

    /// Check loaded geometry: positive finite sizes, everything inside the
    /// level bounds. Anything outside would blow up the spatial grid.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidLevel {
            name: self.name.clone(),
            reason,
        };
        let in_bounds = |rect: &Rect| rect.within(MAX_LEVEL_WIDTH, MAX_LEVEL_HEIGHT);

        for platform in &self.platforms {
            if !platform.is_valid() {
                return Err(invalid(format!("platform {:?} has non-positive size", platform)));
            }
            if !in_bounds(platform) {
                return Err(invalid(format!("platform {:?} is out of bounds", platform)));
            }
        }
        let tiles = self.blocks.iter().map(|t| ("block", t));
        for (what, &(tx, ty)) in tiles.chain(self.coins.iter().map(|t| ("coin", t))) {
            let rect = Rect::new(tile_to_px(tx), tile_to_px(ty), TILE_PX, TILE_PX);
            if !in_bounds(&rect) {
                return Err(invalid(format!("{} tile ({}, {}) is out of bounds", what, tx, ty)));
            }
        }
        if let Some(enemy) = self
            .enemies
            .iter()
            .find(|e| !e.x.is_finite() || e.x.abs() > MAX_LEVEL_WIDTH)
        {
            return Err(invalid(format!("enemy spawn x {} is out of bounds", enemy.x)));
        }
        let goal = self.goal_rect();
        if !goal.is_valid() || !in_bounds(&goal) {
            return Err(invalid(format!("goal {:?} is out of bounds", self.goal)));
        }
        Ok(())
    }

    pub fn goal_rect(&self) -> Rect {
        Rect::new(self.goal.0, self.goal.1, TILE_PX, TILE_PX * 2.0)
    }
}

/// Kind of static collidable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolidKind {
    Platform,
    Block,
}

/// A static collidable rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub rect: Rect,
    pub kind: SolidKind,
}

/// A coin pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub rect: Rect,
}

/// Geometry store for the loaded level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGeometry {
    pub name: String,
    /// Platforms first, then blocks; the grid indexes into this list
    pub solids: Vec<Solid>,
    /// Coins still in play
    pub coins: Vec<Coin>,
    pub goal: Rect,
    pub theme: Theme,
    pub width: f32,
    grid: SpatialGrid,
}

impl LevelGeometry {
    /// Convert a definition to pixel space and index its solids
    pub fn from_spec(spec: &LevelSpec) -> Self {
        let platforms = spec.platforms.iter().map(|&rect| Solid {
            rect,
            kind: SolidKind::Platform,
        });
        let blocks = spec.blocks.iter().map(|&(tx, ty)| Solid {
            rect: Rect::new(tile_to_px(tx), tile_to_px(ty), TILE_PX, TILE_PX),
            kind: SolidKind::Block,
        });
        let solids: Vec<Solid> = platforms.chain(blocks).collect();

        // Coins are one source tile, centered in their level tile
        let inset = (TILE_PX - TILE) / 2.0;
        let coins = spec
            .coins
            .iter()
            .enumerate()
            .map(|(i, &(tx, ty))| Coin {
                id: i as u32,
                rect: Rect::new(tile_to_px(tx) + inset, tile_to_px(ty) + inset, TILE, TILE),
            })
            .collect();

        let mut grid = SpatialGrid::default();
        for (id, solid) in solids.iter().enumerate() {
            grid.insert(id, &solid.rect);
        }

        Self {
            name: spec.name.clone(),
            solids,
            coins,
            goal: spec.goal_rect(),
            theme: spec.theme,
            width: spec.level_width(),
            grid,
        }
    }

    /// Solid rectangles actually overlapping `rect`
    pub fn overlapping_solids(&self, rect: &Rect) -> Vec<Rect> {
        self.grid
            .query(rect)
            .into_iter()
            .map(|id| self.solids[id].rect)
            .filter(|r| r.overlaps(rect))
            .collect()
    }

    /// Remove and return the first coin touching `rect`
    pub fn take_coin(&mut self, rect: &Rect) -> Option<Coin> {
        let idx = self.coins.iter().position(|c| c.rect.overlaps(rect))?;
        Some(self.coins.remove(idx))
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }
}

/// Produces definitions for nodes that have no authored level
pub trait LevelGenerator {
    fn generate(&mut self, id: LevelId, label: &str) -> LevelSpec;
}

/// Bounded random fallback levels from a seeded PCG stream
#[derive(Debug, Clone)]
pub struct RandomLevelGenerator {
    rng: Pcg32,
}

impl RandomLevelGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl LevelGenerator for RandomLevelGenerator {
    fn generate(&mut self, id: LevelId, label: &str) -> LevelSpec {
        let width = VIEW_W * 2.0;
        let screen_rows = (VIEW_H / TILE_PX) as i32;
        let max_tile_x = (width / TILE_PX) as i32 - 5;

        let rng = &mut self.rng;
        let blocks = (0..rng.random_range(5..=10usize))
            .map(|_| {
                (
                    rng.random_range(5..=max_tile_x),
                    rng.random_range(screen_rows - 12..=screen_rows - 5),
                )
            })
            .collect();
        // Rows are kept on-screen
        let coins = (0..rng.random_range(8..=15usize))
            .map(|_| {
                (
                    rng.random_range(5..=max_tile_x),
                    rng.random_range((screen_rows - 15).max(0)..=screen_rows - 7),
                )
            })
            .collect();
        let enemies = (0..rng.random_range(2..=4usize))
            .map(|_| EnemySpawn {
                x: rng.random_range((VIEW_W / 4.0) as i32..=(width - VIEW_W / 4.0) as i32) as f32,
                kind: EnemyKind::ALL[rng.random_range(0..EnemyKind::ALL.len())],
            })
            .collect();
        let theme = Theme::ALL[rng.random_range(0..Theme::ALL.len())];

        let name = if label.is_empty() {
            format!("W{}-N{}", id.world + 1, id.node + 1)
        } else {
            label.to_string()
        };

        LevelSpec {
            name,
            platforms: vec![Rect::new(0.0, GROUND_Y, width, TILE_PX)],
            blocks,
            coins,
            enemies,
            goal: (width - TILE_PX * 3.0, VIEW_H - TILE_PX * 3.0),
            theme,
        }
    }
}

fn ground_walker(x: f32) -> EnemySpawn {
    EnemySpawn {
        x,
        kind: EnemyKind::GroundWalker,
    }
}

fn shell_walker(x: f32) -> EnemySpawn {
    EnemySpawn {
        x,
        kind: EnemyKind::ShellWalker,
    }
}

/// Hand-authored levels and the nodes they are bound to
pub fn authored_levels() -> Vec<(LevelId, LevelSpec)> {
    let (w, h, t) = (VIEW_W, VIEW_H, TILE_PX);
    let goal = (w * 2.0 - 60.0, h - 64.0);
    vec![
        (
            LevelId::new(0, 0),
            LevelSpec {
                name: "1-1".to_string(),
                platforms: vec![Rect::new(0.0, h - t, w, t), Rect::new(w + 50.0, h - t, w, t)],
                blocks: vec![(6, 18), (7, 18), (12, 16), (25, 18)],
                coins: vec![(10, 14), (14, 14), (27, 16)],
                enemies: vec![ground_walker(200.0), shell_walker(380.0), ground_walker(w + 100.0)],
                goal,
                theme: Theme::Sky,
            },
        ),
        (
            LevelId::new(0, 1),
            LevelSpec {
                name: "1-2".to_string(),
                platforms: vec![
                    Rect::new(0.0, h - t, w / 2.0, t),
                    Rect::new(w / 2.0 + 100.0, h - t, w / 2.0 - 100.0, t),
                    Rect::new(w, h - t, w, t),
                ],
                blocks: vec![(5, 17), (15, 15), (20, 13)],
                coins: vec![(8, 15), (18, 13)],
                enemies: vec![ground_walker(150.0), shell_walker(450.0)],
                goal,
                theme: Theme::Sky,
            },
        ),
        (
            LevelId::new(0, 3),
            LevelSpec {
                name: "1-3".to_string(),
                platforms: vec![
                    Rect::new(0.0, h - t, w, t),
                    Rect::new(100.0, h - 96.0, 150.0, t),
                    Rect::new(w, h - t, w, t),
                ],
                blocks: vec![(8, 16), (9, 16), (10, 16)],
                coins: vec![(12, 14), (13, 14)],
                enemies: vec![ground_walker(250.0), shell_walker(350.0)],
                goal,
                theme: Theme::Sky,
            },
        ),
        (
            LevelId::new(1, 0),
            LevelSpec {
                name: "2-1".to_string(),
                platforms: vec![Rect::new(0.0, h - t, w * 2.0, t)],
                blocks: vec![(5, 18), (20, 17)],
                coins: vec![(10, 16), (25, 15)],
                enemies: vec![ground_walker(200.0)],
                goal,
                theme: Theme::Sky,
            },
        ),
    ]
}

/// One entry of a JSON level file
#[derive(Debug, Deserialize)]
struct LevelEntry {
    world: usize,
    node: usize,
    level: LevelSpec,
}

/// Load-time table from overworld node to level definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelCatalog {
    specs: BTreeMap<LevelId, LevelSpec>,
}

impl LevelCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Authored levels, plus a generated level for every other map node
    pub fn build(map: &WorldMap, generator: &mut dyn LevelGenerator) -> Self {
        let mut catalog = Self::empty();
        for (id, spec) in authored_levels() {
            catalog.insert(id, spec);
        }
        let mut generated = 0;
        for world in &map.worlds {
            for node in &world.nodes {
                if !catalog.contains(node.level) {
                    catalog.insert(node.level, generator.generate(node.level, &node.label));
                    generated += 1;
                }
            }
        }
        log::info!(
            "Level catalog ready: {} levels ({} generated)",
            catalog.len(),
            generated
        );
        catalog
    }

    pub fn insert(&mut self, id: LevelId, spec: LevelSpec) {
        self.specs.insert(id, spec);
    }

    pub fn contains(&self, id: LevelId) -> bool {
        self.specs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Resolve a node's level
    pub fn get(&self, id: LevelId) -> Result<&LevelSpec> {
        self.specs.get(&id).ok_or(Error::UndefinedLevel {
            world: id.world,
            node: id.node,
        })
    }

    /// Merge definitions from a JSON array of `{world, node, level}` entries.
    /// Nothing is merged unless every entry validates.
    pub fn merge_json(&mut self, json: &str) -> Result<usize> {
        let entries: Vec<LevelEntry> = serde_json::from_str(json)?;
        for entry in &entries {
            entry.level.validate()?;
        }
        let count = entries.len();
        for entry in entries {
            log::debug!("Loaded level '{}' for node ({}, {})", entry.level.name, entry.world, entry.node);
            self.insert(LevelId::new(entry.world, entry.node), entry.level);
        }
        Ok(count)
    }

    /// Merge definitions from a JSON file
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let count = self.merge_json(&json)?;
        log::info!("Merged {} level definitions from {}", count, path.display());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::overworld::WorldMap;

    #[test]
    fn test_level_width_from_platforms() {
        let (_, spec) = authored_levels().remove(0);
        // Second platform of 1-1 ends at W + 50 + W
        assert_eq!(spec.level_width(), VIEW_W * 2.0 + 50.0);
    }

    #[test]
    fn test_level_width_falls_back_to_viewport() {
        let spec = LevelSpec {
            name: "empty".to_string(),
            platforms: Vec::new(),
            blocks: vec![(3, 3)],
            coins: vec![(4, 4)],
            enemies: Vec::new(),
            goal: (100.0, 100.0),
            theme: Theme::Sky,
        };
        assert_eq!(spec.level_width(), VIEW_W);

        // Other geometry is still processed
        let geo = LevelGeometry::from_spec(&spec);
        assert_eq!(geo.solids.len(), 1);
        assert_eq!(geo.coins.len(), 1);

        let narrow = LevelSpec {
            platforms: vec![Rect::new(0.0, 300.0, 100.0, 10.0)],
            ..spec
        };
        assert_eq!(narrow.level_width(), VIEW_W);
    }

    #[test]
    fn test_geometry_conversion() {
        let (_, spec) = authored_levels().remove(0);
        let geo = LevelGeometry::from_spec(&spec);

        assert_eq!(geo.solids.len(), 2 + 4);
        assert_eq!(geo.solids[0].kind, SolidKind::Platform);
        assert_eq!(geo.solids[2].kind, SolidKind::Block);
        assert_eq!(geo.solids[2].rect, Rect::new(192.0, 576.0, 32.0, 32.0));
        assert_eq!(geo.coins[0].rect, Rect::new(328.0, 456.0, 16.0, 16.0));
        assert_eq!(geo.goal, Rect::new(1220.0, 336.0, 32.0, 64.0));
    }

    #[test]
    fn test_overlapping_solids_filters_broad_phase() {
        let (_, spec) = authored_levels().remove(0);
        let geo = LevelGeometry::from_spec(&spec);

        // Standing exactly on the ground: touching, not overlapping
        let feet = Rect::new(56.0, GROUND_Y - 24.0, 16.0, 24.0);
        assert!(geo.overlapping_solids(&feet).is_empty());

        let sunk = feet.translated(0.0, 4.0);
        assert_eq!(geo.overlapping_solids(&sunk), vec![spec.platforms[0]]);
    }

    #[test]
    fn test_take_coin_removes_once() {
        let (_, spec) = authored_levels().remove(0);
        let mut geo = LevelGeometry::from_spec(&spec);
        let coin = geo.coins[0].rect;

        assert!(geo.take_coin(&coin).is_some());
        assert_eq!(geo.coins.len(), 2);
        assert!(geo.take_coin(&coin).is_none());
        assert_eq!(geo.coins.len(), 2);
    }

    #[test]
    fn test_reload_is_identical() {
        let (_, spec) = authored_levels().remove(1);
        assert_eq!(LevelGeometry::from_spec(&spec), LevelGeometry::from_spec(&spec));
    }

    #[test]
    fn test_generator_is_seeded_and_bounded() {
        let id = LevelId::new(2, 3);
        let a = RandomLevelGenerator::new(7).generate(id, "VD 3");
        let b = RandomLevelGenerator::new(7).generate(id, "VD 3");
        assert_eq!(a, b);

        for seed in 0..20 {
            let spec = RandomLevelGenerator::new(seed).generate(id, "");
            assert_eq!(spec.name, "W3-N4");
            assert!((5..=10).contains(&spec.blocks.len()));
            assert!((8..=15).contains(&spec.coins.len()));
            assert!((2..=4).contains(&spec.enemies.len()));
            assert_eq!(spec.level_width(), VIEW_W * 2.0);
            assert!(spec.coins.iter().all(|&(_, ty)| ty >= 0));
            assert!(spec.enemies.iter().all(|e| e.x >= 160.0 && e.x <= 1120.0));
            spec.validate().unwrap();
        }
    }

    struct FlatGenerator;

    impl LevelGenerator for FlatGenerator {
        fn generate(&mut self, _id: LevelId, label: &str) -> LevelSpec {
            LevelSpec {
                name: label.to_string(),
                platforms: vec![Rect::new(0.0, GROUND_Y, VIEW_W, TILE_PX)],
                blocks: Vec::new(),
                coins: Vec::new(),
                enemies: Vec::new(),
                goal: (500.0, 300.0),
                theme: Theme::Sky,
            }
        }
    }

    #[test]
    fn test_catalog_covers_every_node() {
        let map = WorldMap::standard();
        let catalog = LevelCatalog::build(&map, &mut FlatGenerator);

        for world in &map.worlds {
            for node in &world.nodes {
                assert!(catalog.get(node.level).is_ok(), "missing {}", node.level);
            }
        }
        // Authored levels win over the generator
        assert_eq!(catalog.get(LevelId::new(0, 0)).unwrap().name, "1-1");
        assert_eq!(catalog.get(LevelId::new(0, 2)).unwrap().name, "Ylw Switch");
    }

    #[test]
    fn test_catalog_undefined_level() {
        let catalog = LevelCatalog::empty();
        let err = catalog.get(LevelId::new(4, 9)).unwrap_err();
        assert!(matches!(err, Error::UndefinedLevel { world: 4, node: 9 }));
    }

    #[test]
    fn test_merge_json() {
        let mut catalog = LevelCatalog::empty();
        let json = r#"[
            {"world": 0, "node": 4, "level": {
                "name": "Custom",
                "platforms": [{"x": 0, "y": 368, "w": 1280, "h": 32}],
                "coins": [[3, 10]],
                "enemies": [{"x": 300, "kind": "goomba"}],
                "goal": [1200, 336],
                "theme": "cornflower"
            }}
        ]"#;
        assert_eq!(catalog.merge_json(json).unwrap(), 1);

        let spec = catalog.get(LevelId::new(0, 4)).unwrap();
        assert_eq!(spec.name, "Custom");
        assert!(spec.blocks.is_empty());
        assert_eq!(spec.enemies[0].kind, EnemyKind::GroundWalker);
        assert_eq!(spec.theme, Theme::Cornflower);
    }

    #[test]
    fn test_merge_json_rejects_degenerate_platform() {
        let mut catalog = LevelCatalog::empty();
        let json = r#"[{"world": 0, "node": 0, "level": {
            "name": "Broken",
            "platforms": [{"x": 0, "y": 368, "w": 0, "h": 32}],
            "goal": [10, 10]
        }}]"#;
        assert!(matches!(
            catalog.merge_json(json),
            Err(Error::InvalidLevel { .. })
        ));
        assert!(catalog.is_empty());

        assert!(matches!(catalog.merge_json("not json"), Err(Error::Parse(_))));
    }

    fn level_json(platform: &str, extra: &str) -> String {
        format!(
            r#"[{{"world": 0, "node": 0, "level": {{
                "name": "Huge",
                "platforms": [{}],
                "goal": [600, 304]{}
            }}}}]"#,
            platform, extra
        )
    }

    #[test]
    fn test_merge_json_rejects_unbounded_geometry() {
        let mut catalog = LevelCatalog::empty();

        // Overflows f32 to infinity; a parse error is acceptable too
        let json = level_json(r#"{"x": 0, "y": 368, "w": 1e39, "h": 32}"#, "");
        assert!(matches!(
            catalog.merge_json(&json),
            Err(Error::InvalidLevel { .. } | Error::Parse(_))
        ));

        let json = level_json(r#"{"x": 0, "y": 368, "w": 2e7, "h": 32}"#, "");
        assert!(matches!(
            catalog.merge_json(&json),
            Err(Error::InvalidLevel { .. })
        ));

        let ground = r#"{"x": 0, "y": 368, "w": 640, "h": 32}"#;
        for extra in [
            r#", "coins": [[2000000, 5]]"#,
            r#", "blocks": [[3, -1000000]]"#,
            r#", "enemies": [{"x": 1e12, "kind": "ground_walker"}]"#,
        ] {
            assert!(matches!(
                catalog.merge_json(&level_json(ground, extra)),
                Err(Error::InvalidLevel { .. })
            ));
        }
        assert!(catalog.is_empty());

        // A long but bounded level still loads
        let json = level_json(r#"{"x": 0, "y": 368, "w": 60000, "h": 32}"#, "");
        assert_eq!(catalog.merge_json(&json).unwrap(), 1);
    }
}
