//! Content factory for building battles from data files.

use std::path::{Path, PathBuf};

use tactics_core::{Battle, CombatConfig, RollSource};

use crate::loaders::{
    ConfigLoader, ItemCatalog, ItemLoader, LoadResult, ScenarioData, ScenarioLoader,
    WeaponCatalog, WeaponLoader,
};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── weapons.ron
/// ├── items.ron
/// └── scenarios/
///     └── skirmish.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat tuning from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load weapon catalog from `weapons.ron`.
    pub fn load_weapons(&self) -> LoadResult<WeaponCatalog> {
        WeaponLoader::load(&self.data_dir.join("weapons.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load `scenarios/<name>.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<ScenarioData> {
        ScenarioLoader::load(&self.data_dir.join("scenarios").join(format!("{name}.ron")))
    }

    /// Loads catalogs and the named scenario and builds a ready battle.
    pub fn load_battle(
        &self,
        scenario: &str,
        config: CombatConfig,
        rolls: Box<dyn RollSource>,
    ) -> LoadResult<Battle> {
        let weapons = self.load_weapons()?;
        let items = self.load_items()?;
        let data = self.load_scenario(scenario)?;
        tracing::info!(
            "loaded scenario '{}' ({} units, {} weapons, {} items)",
            data.name,
            data.units.len(),
            weapons.len(),
            items.len()
        );
        data.build(config, &weapons, &items, rolls)
    }
}
