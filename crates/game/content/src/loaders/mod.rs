//! Content loaders for reading combat data from files.
//!
//! RON for catalogs and scenarios, TOML for tuning. Every loader returns
//! [`LoadResult`] with the failing file named in the error.

pub mod config;
pub mod factory;
pub mod item;
pub mod scenario;
pub mod weapon;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::{ItemCatalog, ItemLoader};
pub use scenario::{CoverData, PropData, ScenarioData, ScenarioLoader, UnitData};
pub use weapon::{WeaponCatalog, WeaponLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
