//! Run configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Settings for one headless run.
#[derive(Clone, Debug, PartialEq)]
pub struct CliConfig {
    /// Content directory; the bundled data when unset.
    pub data_dir: Option<PathBuf>,
    /// Combat tuning file; `config.toml` of the content directory when unset.
    pub config_path: Option<PathBuf>,
    pub scenario: String,
    pub seed: u64,
    pub max_turns: u32,
    pub session_id: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            config_path: None,
            scenario: "skirmish".to_string(),
            seed: 0,
            max_turns: 50,
            session_id: None,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.data_dir = env::var_os("TACTICS_DATA_DIR").map(PathBuf::from);
        config.config_path = env::var_os("TACTICS_CONFIG").map(PathBuf::from);
        if let Ok(scenario) = env::var("TACTICS_SCENARIO") {
            config.scenario = scenario;
        }
        if let Some(seed) = read_env::<u64>("TACTICS_SEED") {
            config.seed = seed;
        }
        if let Some(turns) = read_env::<u32>("TACTICS_MAX_TURNS") {
            config.max_turns = turns.max(1);
        }
        config.session_id = env::var("TACTICS_SESSION").ok();

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
