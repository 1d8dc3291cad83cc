use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Runtime settings. All optional; the tool must work with zero setup.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the catalog cache lives.
    pub cache_path: String,
    /// Sheet to load on startup when the cache is empty.
    pub sheet_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_path: "catalog.db".to_string(),
            sheet_path: None,
        }
    }
}

/// Loads `config.json` next to the binary; a missing file means
/// defaults, a present-but-broken file is an error worth surfacing.
pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
