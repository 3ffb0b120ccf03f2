//! Scenario loader.
//!
//! A scenario is a rectangular map in grid coordinates plus the cover, props
//! and units placed on it. Coordinates are `(x, y)` tile indices; cover
//! positions are fractional tile coordinates so a wall can sit between two
//! tiles. Everything is scaled by the configured tile spacing at build time.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tactics_core::{
    Battle, CombatConfig, CoverSize, CoverSpec, Faction, ImpactKind, RollSource, TileGraph,
    TileId, TileSpec, UnitSpec, UnitStats,
};

use crate::loaders::{ItemCatalog, LoadResult, WeaponCatalog, read_file};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverData {
    pub size: CoverSize,
    pub at: (f32, f32),
    /// Degrees from the +x axis. 90 runs the span north-south.
    pub orientation: f32,
    #[serde(default)]
    pub vaultable: Option<bool>,
    #[serde(default)]
    pub bonus: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropData {
    pub at: (u32, u32),
    #[serde(default)]
    pub traversable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    pub name: String,
    pub faction: Faction,
    pub at: (u32, u32),
    pub health: u32,
    pub movement: u32,
    pub aim: f32,
    pub dodge: f32,
    pub action_points: u32,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub items: Vec<(String, u32)>,
}

/// Scenario structure for RON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub name: String,
    pub dimensions: (u32, u32),
    /// Tiles that exist but cannot be walked on.
    #[serde(default)]
    pub blocked: Vec<(u32, u32)>,
    /// Holes in the rectangle: no tile at all.
    #[serde(default)]
    pub void: Vec<(u32, u32)>,
    #[serde(default)]
    pub surfaces: Vec<(u32, u32, ImpactKind)>,
    #[serde(default)]
    pub covers: Vec<CoverData>,
    #[serde(default)]
    pub props: Vec<PropData>,
    pub units: Vec<UnitData>,
}

impl ScenarioData {
    /// Builds the tile graph and spawns every unit.
    pub fn build(
        &self,
        config: CombatConfig,
        weapons: &WeaponCatalog,
        items: &ItemCatalog,
        rolls: Box<dyn RollSource>,
    ) -> LoadResult<Battle> {
        let spacing = config.tile_spacing;
        let (width, height) = self.dimensions;

        let mut index: BTreeMap<(u32, u32), TileId> = BTreeMap::new();
        let mut tiles = Vec::new();
        for y in 0..height {
            for x in 0..width {
                if self.void.contains(&(x, y)) {
                    continue;
                }
                let mut spec = TileSpec::new(Vec2::new(x as f32, y as f32) * spacing);
                if self.blocked.contains(&(x, y)) {
                    spec = spec.blocked();
                }
                if let Some((_, _, impact)) = self.surfaces.iter().find(|s| (s.0, s.1) == (x, y)) {
                    spec = spec.with_impact(*impact);
                }
                index.insert((x, y), TileId(tiles.len() as u32));
                tiles.push(spec);
            }
        }

        let covers = self
            .covers
            .iter()
            .map(|cover| {
                let mut spec = CoverSpec::new(
                    cover.size,
                    Vec2::new(cover.at.0, cover.at.1) * spacing,
                    cover.orientation,
                );
                if let Some(vaultable) = cover.vaultable {
                    spec = spec.vaultable(vaultable);
                }
                if let Some(bonus) = cover.bonus {
                    spec = spec.with_bonus(bonus);
                }
                spec
            })
            .collect();

        let tile_at = |at: (u32, u32)| {
            index
                .get(&at)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("({}, {}) is outside the map of '{}'", at.0, at.1, self.name))
        };

        let grid = TileGraph::build(tiles, covers, &config);
        let mut battle = Battle::new(config, grid, rolls);

        for prop in &self.props {
            battle
                .place_prop(tile_at(prop.at)?, prop.traversable)
                .map_err(|e| anyhow::anyhow!("prop at {:?}: {}", prop.at, e))?;
        }

        for unit in &self.units {
            let stats = UnitStats::new(unit.health, unit.movement, unit.aim, unit.dodge, unit.action_points)
                .with_armor(unit.armor);
            let mut spec = UnitSpec::new(unit.name.clone(), unit.faction, stats);
            for weapon in &unit.weapons {
                spec = spec.with_weapon(weapons.instantiate(weapon)?);
            }
            for (item, quantity) in &unit.items {
                spec = spec.with_items(items.instantiate(item)?, *quantity);
            }
            let id = battle
                .spawn_unit(spec, tile_at(unit.at)?)
                .map_err(|e| anyhow::anyhow!("unit '{}': {}", unit.name, e))?;
            tracing::debug!("scenario '{}' placed {} as {}", self.name, unit.name, id);
        }

        Ok(battle)
    }
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioData> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioData> {
        let data: ScenarioData = ron::from_str(content)?;
        if data.dimensions.0 == 0 || data.dimensions.1 == 0 {
            anyhow::bail!("scenario '{}' has an empty map", data.name);
        }
        Ok(data)
    }
}
