//! Cover objects and tile-centre line-of-sight tests.
//!
//! Rays always run between tile centres, never between animated bones, so a
//! crouch or recoil animation can never change a hit chance.

use glam::Vec2;

use crate::config::CombatConfig;
use crate::state::{CoverId, TileId};

use super::graph::TileGraph;

/// Height class of a cover object.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CoverSize {
    #[default]
    Half,
    Full,
}

impl CoverSize {
    pub fn default_bonus(self, config: &CombatConfig) -> f32 {
        match self {
            CoverSize::Half => config.half_cover_bonus,
            CoverSize::Full => config.full_cover_bonus,
        }
    }
}

/// Authoring input for a cover object.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverSpec {
    pub size: CoverSize,
    /// Centre of the blocking span in world space.
    pub position: Vec2,
    /// Direction of the blocking span, in degrees from the +x axis.
    pub orientation_degrees: f32,
    /// Half the span length; defaults to half a tile spacing.
    pub half_width: Option<f32>,
    /// Overrides the size-derived bonus.
    pub bonus: Option<f32>,
    pub can_vault: bool,
}

impl CoverSpec {
    pub fn new(size: CoverSize, position: Vec2, orientation_degrees: f32) -> Self {
        Self {
            size,
            position,
            orientation_degrees,
            half_width: None,
            bonus: None,
            can_vault: matches!(size, CoverSize::Half),
        }
    }

    pub fn with_bonus(mut self, bonus: f32) -> Self {
        self.bonus = Some(bonus);
        self
    }

    pub fn vaultable(mut self, can_vault: bool) -> Self {
        self.can_vault = can_vault;
        self
    }
}

/// Map prop shielding the tiles registered to it.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverObject {
    pub(crate) id: CoverId,
    pub(crate) size: CoverSize,
    pub(crate) position: Vec2,
    pub(crate) orientation: f32,
    pub(crate) half_width: f32,
    pub(crate) bonus: f32,
    pub(crate) can_vault: bool,
    pub(crate) tiles: Vec<TileId>,
}

impl CoverObject {
    pub(crate) fn from_spec(id: CoverId, spec: CoverSpec, config: &CombatConfig) -> Self {
        Self {
            id,
            size: spec.size,
            position: spec.position,
            orientation: spec.orientation_degrees.to_radians(),
            half_width: spec.half_width.unwrap_or(config.tile_spacing * 0.5),
            bonus: spec.bonus.unwrap_or_else(|| spec.size.default_bonus(config)),
            can_vault: spec.can_vault,
            tiles: Vec::new(),
        }
    }

    pub fn id(&self) -> CoverId {
        self.id
    }

    pub fn size(&self) -> CoverSize {
        self.size
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Orientation of the blocking span in radians.
    pub fn orientation(&self) -> f32 {
        self.orientation
    }

    pub fn can_vault(&self) -> bool {
        self.can_vault
    }

    /// Tiles this object shields.
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub(crate) fn register_tile(&mut self, tile: TileId) {
        if !self.tiles.contains(&tile) {
            self.tiles.push(tile);
        }
    }

    /// End points of the blocking span.
    pub fn span(&self) -> (Vec2, Vec2) {
        let along = Vec2::from_angle(self.orientation) * self.half_width;
        (self.position - along, self.position + along)
    }

    /// Parameter `t` in `[0, 1]` at which the segment `from -> to` crosses this
    /// object's span, if it does.
    pub fn intersect(&self, from: Vec2, to: Vec2) -> Option<f32> {
        let (a, b) = self.span();
        segment_intersection(from, to, a, b)
    }
}

/// Flat defense modifier subtracted from an attacker's hit modifier.
pub fn cover_bonus(cover: &CoverObject) -> f32 {
    cover.bonus
}

const EPSILON: f32 = 1e-5;

fn segment_intersection(p: Vec2, p_end: Vec2, q: Vec2, q_end: Vec2) -> Option<f32> {
    let r = p_end - p;
    let s = q_end - q;
    let denom = r.perp_dot(s);
    if denom.abs() < EPSILON {
        // Parallel or collinear: a ray sliding along a wall does not hit it.
        return None;
    }
    let qp = q - p;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    let range = -EPSILON..=1.0 + EPSILON;
    (range.contains(&t) && range.contains(&u)).then_some(t.clamp(0.0, 1.0))
}

impl TileGraph {
    /// First cover object crossed by the ray from the defender's tile centre
    /// towards the attacker's tile centre.
    pub fn first_cover_between(&self, defender: TileId, attacker: TileId) -> Option<CoverId> {
        let from = self.tile(defender)?.position();
        let to = self.tile(attacker)?.position();
        if from == to {
            return None;
        }

        self.covers()
            .filter_map(|cover| cover.intersect(from, to).map(|t| (t, cover.id())))
            .min_by(|(lhs, lhs_id), (rhs, rhs_id)| lhs.total_cmp(rhs).then(lhs_id.cmp(rhs_id)))
            .map(|(_, id)| id)
    }

    /// Whether the defender on `defender` is shielded from `attacker`.
    ///
    /// The first cover along the ray decides: if it is not the defender's own
    /// registered cover, the defender is flanked.
    pub fn is_covered(&self, defender: TileId, attacker: TileId) -> bool {
        let Some(own) = self.tile(defender).and_then(|tile| tile.cover()) else {
            return false;
        };
        self.first_cover_between(defender, attacker) == Some(own)
    }

    /// The defender's registered cover, if it shields them from `attacker`.
    pub fn shielding_cover(&self, defender: TileId, attacker: TileId) -> Option<&CoverObject> {
        if !self.is_covered(defender, attacker) {
            return None;
        }
        self.tile(defender)
            .and_then(|tile| tile.cover())
            .and_then(|id| self.cover(id))
    }

    /// A vaultable cover object crossed when stepping from `from` to `to`.
    pub fn vault_between(&self, from: TileId, to: TileId) -> Option<CoverId> {
        let start = self.tile(from)?.position();
        let end = self.tile(to)?.position();
        self.covers()
            .filter(|cover| cover.can_vault())
            .find(|cover| cover.intersect(start, end).is_some())
            .map(CoverObject::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Tile, TileSpec};

    /// 7x3 field with full cover east of (1, 1), its span running north-south.
    fn field(config: &CombatConfig) -> TileGraph {
        let tiles = TileSpec::rectangle(7, 3, 1.0);
        let cover = CoverSpec::new(CoverSize::Full, Vec2::new(1.5, 1.0), 90.0);
        TileGraph::build(tiles, vec![cover], config)
    }

    fn at(x: u32, y: u32) -> TileId {
        TileId(y * 7 + x)
    }

    #[test]
    fn frontal_attack_is_covered() {
        let config = CombatConfig::default();
        let graph = field(&config);
        assert!(graph.is_covered(at(1, 1), at(5, 1)));
    }

    #[test]
    fn attack_from_behind_is_flanked() {
        let config = CombatConfig::default();
        let graph = field(&config);
        assert!(!graph.is_covered(at(1, 1), at(0, 1)));
    }

    #[test]
    fn perpendicular_attack_is_flanked() {
        let config = CombatConfig::default();
        let graph = field(&config);
        assert!(!graph.is_covered(at(1, 1), at(1, 2)));
    }

    #[test]
    fn cover_registers_tiles_on_both_sides() {
        let config = CombatConfig::default();
        let graph = field(&config);
        let cover = graph.covers().next().map(|c| c.tiles().to_vec());
        assert_eq!(cover, Some(vec![at(1, 1), at(2, 1)]));
        assert_eq!(graph.tile(at(2, 1)).and_then(Tile::cover), Some(CoverId(0)));
    }

    #[test]
    fn other_cover_hit_first_means_flanked() {
        let config = CombatConfig::default();
        let tiles = TileSpec::rectangle(7, 1, 1.0);
        // Defender at x=3 owns the cover east of it (3.5); an unrelated wall
        // at 2.5 sits between it and a western attacker.
        let own = CoverSpec::new(CoverSize::Half, Vec2::new(3.5, 0.0), 90.0);
        let other = CoverSpec::new(CoverSize::Full, Vec2::new(2.5, 0.0), 90.0);
        let graph = TileGraph::build(tiles, vec![own, other], &config);
        assert_eq!(graph.tile(TileId(3)).and_then(Tile::cover), Some(CoverId(0)));
        assert!(graph.is_covered(TileId(3), TileId(6)));
        assert!(!graph.is_covered(TileId(3), TileId(0)));
    }

    #[test]
    fn full_cover_bonus_exceeds_half() {
        let config = CombatConfig::default();
        let half = CoverObject::from_spec(
            CoverId(0),
            CoverSpec::new(CoverSize::Half, Vec2::ZERO, 0.0),
            &config,
        );
        let full = CoverObject::from_spec(
            CoverId(1),
            CoverSpec::new(CoverSize::Full, Vec2::ZERO, 0.0),
            &config,
        );
        assert!(cover_bonus(&half) < cover_bonus(&full));
    }

    #[test]
    fn vault_detected_only_for_vaultable_cover() {
        let config = CombatConfig::default();
        let tiles = TileSpec::rectangle(3, 1, 1.0);
        let low = CoverSpec::new(CoverSize::Half, Vec2::new(0.5, 0.0), 90.0);
        let wall = CoverSpec::new(CoverSize::Full, Vec2::new(1.5, 0.0), 90.0).vaultable(false);
        let graph = TileGraph::build(tiles, vec![low, wall], &config);
        assert_eq!(graph.vault_between(TileId(0), TileId(1)), Some(CoverId(0)));
        assert_eq!(graph.vault_between(TileId(1), TileId(2)), None);
    }
}
