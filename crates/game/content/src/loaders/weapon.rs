//! Weapon catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{Weapon, WeaponStats};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeaponEntry {
    name: String,
    stats: WeaponStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeaponCatalogRon {
    weapons: Vec<WeaponEntry>,
}

/// Weapon profiles by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponCatalog {
    weapons: BTreeMap<String, WeaponStats>,
}

impl WeaponCatalog {
    pub fn insert(&mut self, name: impl Into<String>, stats: WeaponStats) {
        self.weapons.insert(name.into(), stats);
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// A fully loaded copy of the named weapon.
    pub fn instantiate(&self, name: &str) -> LoadResult<Weapon> {
        let stats = self
            .weapons
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown weapon '{}'", name))?;
        Ok(Weapon::new(name, *stats))
    }
}

/// Loader for weapon catalogs from RON files.
pub struct WeaponLoader;

impl WeaponLoader {
    pub fn load(path: &Path) -> LoadResult<WeaponCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse weapon catalog RON {}: {}", path.display(), e)
        })
    }

    pub fn parse(content: &str) -> LoadResult<WeaponCatalog> {
        let data: WeaponCatalogRon = ron::from_str(content)?;
        let mut catalog = WeaponCatalog::default();
        for entry in data.weapons {
            let stats = entry.stats;
            if stats.range_min > stats.range_max {
                anyhow::bail!(
                    "weapon '{}' has range_min {} above range_max {}",
                    entry.name,
                    stats.range_min,
                    stats.range_max
                );
            }
            if catalog.weapons.contains_key(&entry.name) {
                tracing::warn!("weapon '{}' defined twice; keeping the last", entry.name);
            }
            catalog.insert(entry.name, stats);
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"(
        weapons: [
            (
                name: "rifle",
                stats: (
                    damage: 4,
                    area_of_effect: 0.0,
                    range_min: 1,
                    range_max: 6,
                    ammo_max: 4,
                    base_accuracy_modifier: 1.0,
                    over_range_penalty: 10.0,
                    under_range_penalty: 5.0,
                ),
            ),
        ],
    )"#;

    #[test]
    fn parses_and_instantiates_loaded() {
        let catalog = WeaponLoader::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 1);
        let rifle = catalog.instantiate("rifle").unwrap();
        assert_eq!(rifle.ammo(), 4);
        assert!(catalog.instantiate("bow").is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let broken = CATALOG.replace("range_min: 1", "range_min: 9");
        assert!(WeaponLoader::parse(&broken).is_err());
    }
}
