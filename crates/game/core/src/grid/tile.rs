use glam::Vec2;

use crate::state::{CoverId, TileId, UnitId};

/// Surface material, used to pick impact effects when a shot lands.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ImpactKind {
    #[default]
    Concrete,
    Dirt,
    Metal,
    Wood,
    Water,
}

/// Whatever stands on a tile. The tile holds a weak reference only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupant {
    Unit(UnitId),
    /// Environmental object; traversable props can be walked through.
    Prop { traversable: bool },
}

impl Occupant {
    pub fn unit(self) -> Option<UnitId> {
        match self {
            Occupant::Unit(id) => Some(id),
            Occupant::Prop { .. } => None,
        }
    }

    pub fn is_traversable(self) -> bool {
        matches!(self, Occupant::Prop { traversable: true })
    }
}

/// Authoring input for a tile. Adjacency and cover are derived at build time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSpec {
    pub position: Vec2,
    pub traversable: bool,
    pub impact: ImpactKind,
}

impl TileSpec {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            traversable: true,
            impact: ImpactKind::default(),
        }
    }

    pub fn blocked(mut self) -> Self {
        self.traversable = false;
        self
    }

    pub fn with_impact(mut self, impact: ImpactKind) -> Self {
        self.impact = impact;
        self
    }

    /// Row-major rectangle of open tiles; tile `(x, y)` gets index `y * width + x`.
    pub fn rectangle(width: u32, height: u32, spacing: f32) -> Vec<TileSpec> {
        let mut specs = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                specs.push(TileSpec::new(Vec2::new(x as f32, y as f32) * spacing));
            }
        }
        specs
    }
}

/// Atomic grid cell: unit of occupancy, pathing and splash measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub(crate) id: TileId,
    pub(crate) position: Vec2,
    pub(crate) traversable: bool,
    pub(crate) impact: ImpactKind,
    pub(crate) adjacent: Vec<TileId>,
    pub(crate) occupant: Option<Occupant>,
    pub(crate) cover: Option<CoverId>,
}

impl Tile {
    pub(crate) fn from_spec(id: TileId, spec: TileSpec) -> Self {
        Self {
            id,
            position: spec.position,
            traversable: spec.traversable,
            impact: spec.impact,
            adjacent: Vec::new(),
            occupant: None,
            cover: None,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    /// World position of the tile centre.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn impact(&self) -> ImpactKind {
        self.impact
    }

    pub fn adjacent(&self) -> &[TileId] {
        &self.adjacent
    }

    pub fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    pub fn occupant_unit(&self) -> Option<UnitId> {
        self.occupant.and_then(Occupant::unit)
    }

    pub fn cover(&self) -> Option<CoverId> {
        self.cover
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// A path may pass through this tile.
    pub fn is_traversable(&self) -> bool {
        self.traversable && self.occupant.is_none_or(Occupant::is_traversable)
    }

    /// A unit may end its move on this tile.
    pub fn is_free(&self) -> bool {
        self.traversable && self.occupant.is_none()
    }
}
