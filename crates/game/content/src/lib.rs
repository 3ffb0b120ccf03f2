//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Combat tuning (TOML)
//! - Weapon and item catalogs (RON)
//! - Scenarios: map layout, cover, props and unit placement (RON)
//!
//! All loaders use tactics-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, CoverData, ItemCatalog, ItemLoader, LoadResult, PropData,
    ScenarioData, ScenarioLoader, UnitData, WeaponCatalog, WeaponLoader,
};
