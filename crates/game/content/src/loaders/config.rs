//! Combat configuration loader.

use std::path::Path;

use tactics_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
///
/// Missing keys fall back to [`CombatConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)?;
        if config.tile_spacing <= 0.0 {
            anyhow::bail!("tile_spacing must be positive, got {}", config.tile_spacing);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("global_hit_base = 45.0\n").unwrap();
        assert_eq!(config.global_hit_base, 45.0);
        assert_eq!(config.full_cover_bonus, CombatConfig::DEFAULT_FULL_COVER_BONUS);
    }

    #[test]
    fn zero_spacing_is_rejected() {
        assert!(ConfigLoader::parse("tile_spacing = 0.0\n").is_err());
    }
}
