use std::fs;
use std::path::Path;

use veil_core::EngineConfig;

pub fn read_text(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e))
}

/// Load an engine configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = read_text(path)?;
    EngineConfig::from_json(&text).map_err(|e| format!("Invalid config '{}': {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &EngineConfig) -> Result<(), String> {
    let json = config
        .to_json()
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create '{}': {}", parent.display(), e))?;
    }
    fs::write(path, json + "\n").map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::PatternStore;

    #[test]
    fn test_config_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("veil-cli-test-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");
        let config = EngineConfig {
            fail_closed: true,
            patterns: PatternStore {
                blocked_hosts: vec!["tracker.example".into()],
                ..PatternStore::default()
            },
            ..EngineConfig::default()
        };

        write_config(&path, &config).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), config);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_config() {
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
        let err = load_config(Some(Path::new("/nonexistent/veil.json"))).unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }
}
