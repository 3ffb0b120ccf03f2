use std::collections::{BTreeSet, VecDeque};

use glam::Vec2;

use crate::config::CombatConfig;
use crate::state::{CoverId, TileId, UnitId};

use super::cover::{CoverObject, CoverSpec};
use super::error::GridError;
use super::tile::{Occupant, Tile, TileSpec};

/// Small slack so float tile positions exactly one spacing apart still link.
const PROXIMITY_SLACK: f32 = 1e-3;

/// The active map: tiles, their adjacency, occupancy and cover.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGraph {
    spacing: f32,
    tiles: Vec<Tile>,
    covers: Vec<CoverObject>,
    isolated: Vec<TileId>,
}

impl TileGraph {
    /// Builds the graph once at map load.
    ///
    /// Adjacency links every pair of tiles whose centres lie within one grid
    /// spacing. Each tile registers the first cover object within one spacing.
    /// Tiles without neighbours are logged and kept; they are an authoring
    /// defect, not a reason to refuse the map.
    pub fn build(tiles: Vec<TileSpec>, covers: Vec<CoverSpec>, config: &CombatConfig) -> Self {
        let spacing = config.tile_spacing;
        let reach = spacing + PROXIMITY_SLACK;

        let mut tiles: Vec<Tile> = tiles
            .into_iter()
            .enumerate()
            .map(|(index, spec)| Tile::from_spec(TileId(index as u32), spec))
            .collect();
        let mut covers: Vec<CoverObject> = covers
            .into_iter()
            .enumerate()
            .map(|(index, spec)| CoverObject::from_spec(CoverId(index as u32), spec, config))
            .collect();

        let positions: Vec<Vec2> = tiles.iter().map(Tile::position).collect();
        for (index, tile) in tiles.iter_mut().enumerate() {
            tile.adjacent = positions
                .iter()
                .enumerate()
                .filter(|&(other, position)| {
                    other != index && position.distance(positions[index]) <= reach
                })
                .map(|(other, _)| TileId(other as u32))
                .collect();
        }

        for tile in tiles.iter_mut() {
            let nearest = covers
                .iter_mut()
                .find(|cover| cover.position().distance(tile.position) <= reach);
            if let Some(cover) = nearest {
                tile.cover = Some(cover.id());
                cover.register_tile(tile.id);
            }
        }

        let isolated: Vec<TileId> = if tiles.len() > 1 {
            tiles
                .iter()
                .filter(|tile| tile.adjacent.is_empty())
                .map(Tile::id)
                .collect()
        } else {
            Vec::new()
        };
        for tile in &isolated {
            let position = positions[tile.index()];
            tracing::error!(
                "No neighbours found for {} at ({}, {})",
                tile,
                position.x,
                position.y
            );
        }

        Self {
            spacing,
            tiles,
            covers,
            isolated,
        }
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn cover(&self, id: CoverId) -> Option<&CoverObject> {
        self.covers.get(id.index())
    }

    pub fn covers(&self) -> impl Iterator<Item = &CoverObject> {
        self.covers.iter()
    }

    /// Precomputed neighbours; empty for isolated or unknown tiles.
    pub fn adjacent(&self, id: TileId) -> &[TileId] {
        self.tile(id).map(Tile::adjacent).unwrap_or(&[])
    }

    /// Integrity problems found at build time.
    pub fn integrity_report(&self) -> Vec<GridError> {
        self.isolated
            .iter()
            .map(|&tile| GridError::IsolatedTile { tile })
            .collect()
    }

    /// Tile whose centre lies within half a spacing of `point`.
    pub fn tile_at(&self, point: Vec2) -> Option<TileId> {
        let limit = self.spacing * 0.5 + PROXIMITY_SLACK;
        self.tiles
            .iter()
            .map(|tile| (tile.position.distance(point), tile.id))
            .filter(|(distance, _)| *distance <= limit)
            .min_by(|lhs, rhs| lhs.0.total_cmp(&rhs.0))
            .map(|(_, id)| id)
    }

    /// Cost-bounded shortest path over unit step cost.
    ///
    /// The returned sequence excludes `from` and ends with `to`; its length is
    /// the path cost. Empty when `to` is unreachable within `max_cost`, when it
    /// is occupied or not traversable, or when `from == to`.
    pub fn find_path(&self, from: TileId, to: TileId, max_cost: u32) -> Vec<TileId> {
        if from == to || self.tile(from).is_none() {
            return Vec::new();
        }
        match self.tile(to) {
            Some(tile) if tile.is_free() => {}
            _ => return Vec::new(),
        }

        let mut parent: Vec<Option<TileId>> = vec![None; self.tiles.len()];
        let mut cost: Vec<Option<u32>> = vec![None; self.tiles.len()];
        let mut queue = VecDeque::from([from]);
        cost[from.index()] = Some(0);

        while let Some(current) = queue.pop_front() {
            let depth = cost[current.index()].unwrap_or(0);
            if current == to {
                break;
            }
            if depth >= max_cost {
                continue;
            }
            for &next in self.adjacent(current) {
                if cost[next.index()].is_some() {
                    continue;
                }
                let passable = self
                    .tile(next)
                    .is_some_and(|tile| if next == to { tile.is_free() } else { tile.is_traversable() });
                if !passable {
                    continue;
                }
                cost[next.index()] = Some(depth + 1);
                parent[next.index()] = Some(current);
                queue.push_back(next);
            }
        }

        if cost[to.index()].is_none() {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut cursor = to;
        while cursor != from {
            path.push(cursor);
            match parent[cursor.index()] {
                Some(previous) => cursor = previous,
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }

    /// Every free tile a unit on `origin` could end a move on within `range`.
    pub fn tiles_in_range(&self, origin: TileId, range: u32) -> BTreeSet<TileId> {
        let mut reached = BTreeSet::new();
        if self.tile(origin).is_none() {
            return reached;
        }

        let mut visited = vec![false; self.tiles.len()];
        let mut queue = VecDeque::from([(origin, 0u32)]);
        visited[origin.index()] = true;

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= range {
                continue;
            }
            for &next in self.adjacent(current) {
                if visited[next.index()] {
                    continue;
                }
                visited[next.index()] = true;
                let Some(tile) = self.tile(next) else {
                    continue;
                };
                if tile.is_free() {
                    reached.insert(next);
                }
                if tile.is_traversable() {
                    queue.push_back((next, depth + 1));
                }
            }
        }
        reached
    }

    /// Every tile within `radius` tiles of `center`, measured straight-line
    /// between centres. Terrain and occupants do not block the footprint.
    pub fn area_of_effect(&self, center: TileId, radius: f32) -> BTreeSet<TileId> {
        let Some(origin) = self.tile(center).map(Tile::position) else {
            return BTreeSet::new();
        };
        let reach = radius.max(0.0) * self.spacing + PROXIMITY_SLACK;
        let mut area: BTreeSet<TileId> = self
            .tiles
            .iter()
            .filter(|tile| tile.position.distance(origin) <= reach)
            .map(Tile::id)
            .collect();
        area.insert(center);
        area
    }

    /// Distinct units standing on `tiles`, in tile order.
    pub fn occupant_units<'a>(&self, tiles: impl IntoIterator<Item = &'a TileId>) -> Vec<UnitId> {
        let mut units = Vec::new();
        for tile in tiles {
            if let Some(unit) = self.tile(*tile).and_then(Tile::occupant_unit) {
                if !units.contains(&unit) {
                    units.push(unit);
                }
            }
        }
        units
    }

    /// Hop count between two tiles over the adjacency graph, ignoring
    /// occupancy. Falls back to straight-line tiles when disconnected.
    pub fn tile_distance(&self, from: TileId, to: TileId) -> u32 {
        if from == to {
            return 0;
        }
        let (Some(start), Some(end)) = (self.tile(from), self.tile(to)) else {
            return 0;
        };

        let mut depth = vec![None; self.tiles.len()];
        let mut queue = VecDeque::from([from]);
        depth[from.index()] = Some(0u32);
        while let Some(current) = queue.pop_front() {
            let here = depth[current.index()].unwrap_or(0);
            for &next in self.adjacent(current) {
                if depth[next.index()].is_none() {
                    if next == to {
                        return here + 1;
                    }
                    depth[next.index()] = Some(here + 1);
                    queue.push_back(next);
                }
            }
        }

        (start.position.distance(end.position) / self.spacing).round() as u32
    }

    /// First unoccupied neighbour of `tile`.
    pub fn nearest_open_tile(&self, tile: TileId) -> Option<TileId> {
        let open = self
            .adjacent(tile)
            .iter()
            .copied()
            .find(|&next| self.tile(next).is_some_and(Tile::is_free));
        if open.is_none() {
            tracing::debug!("No open neighbour tiles found around {}", tile);
        }
        open
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Result<&mut Tile, GridError> {
        self.tiles
            .get_mut(id.index())
            .ok_or(GridError::UnknownTile(id))
    }

    /// Puts `occupant` on an empty tile.
    pub fn place(&mut self, tile: TileId, occupant: Occupant) -> Result<(), GridError> {
        let slot = self.tile_mut(tile)?;
        if slot.occupant.is_some() {
            return Err(GridError::Occupied { tile });
        }
        slot.occupant = Some(occupant);
        Ok(())
    }

    /// Clears `tile` if `unit` is the one standing there.
    pub fn vacate(&mut self, tile: TileId, unit: UnitId) -> Result<(), GridError> {
        let slot = self.tile_mut(tile)?;
        if slot.occupant_unit() != Some(unit) {
            return Err(GridError::NotOccupant { tile, unit });
        }
        slot.occupant = None;
        Ok(())
    }

    /// Moves `unit` from `from` onto the empty tile `to`.
    ///
    /// Rolls back if the destination refuses the unit.
    pub fn transfer(&mut self, unit: UnitId, from: TileId, to: TileId) -> Result<(), GridError> {
        self.vacate(from, unit)?;
        if let Err(error) = self.place(to, Occupant::Unit(unit)) {
            let _ = self.place(from, Occupant::Unit(unit));
            return Err(error);
        }
        Ok(())
    }
}
