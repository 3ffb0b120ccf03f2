//! Item catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{Item, ItemKind};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemEntry {
    name: String,
    kind: ItemKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemCatalogRon {
    items: Vec<ItemEntry>,
}

/// Item definitions by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemCatalog {
    items: BTreeMap<String, ItemKind>,
}

impl ItemCatalog {
    pub fn insert(&mut self, name: impl Into<String>, kind: ItemKind) {
        self.items.insert(name.into(), kind);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn instantiate(&self, name: &str) -> LoadResult<Item> {
        let kind = self
            .items
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown item '{}'", name))?;
        Ok(Item::new(name, *kind))
    }
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse item catalog RON {}: {}", path.display(), e)
        })
    }

    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let data: ItemCatalogRon = ron::from_str(content)?;
        let mut catalog = ItemCatalog::default();
        for entry in data.items {
            catalog.insert(entry.name, entry.kind);
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::Restore;

    #[test]
    fn parses_both_item_kinds() {
        let catalog = ItemLoader::parse(
            r#"(
                items: [
                    (name: "medkit", kind: Medkit(Percent(0.5))),
                    (name: "grenade", kind: Grenade(damage: 3, radius: 1.5)),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(
            catalog.instantiate("medkit").unwrap().kind,
            ItemKind::Medkit(Restore::Percent(0.5))
        );
        assert!(matches!(
            catalog.instantiate("grenade").unwrap().kind,
            ItemKind::Grenade { damage: 3, .. }
        ));
    }
}
