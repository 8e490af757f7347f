use crate::config::{ClusteringConfig, OverflowPolicy};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse clustering configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<ClusteringConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file '{}'", config_path.display()))?;

    // An empty file deserializes to YAML null, which means "all defaults"
    let config: Option<ClusteringConfig> = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file '{}'", config_path.display()))?;
    let config = config.unwrap_or_default();

    config.validate()?;

    Ok(config)
}

/// Load configuration from `config_path` if given, otherwise use defaults
pub fn load_config_or_default(config_path: Option<&Path>) -> Result<ClusteringConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using defaults");
            Ok(ClusteringConfig::default())
        }
    }
}

/// CLI arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub concentrators: Option<usize>,
    pub max_capacity: Option<usize>,
    pub overflow_policy: Option<OverflowPolicy>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut ClusteringConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(count) = overrides.concentrators {
        info!("Concentrator count override: {}", count);
        config.concentrator_count = Some(count);
    }

    if let Some(capacity) = overrides.max_capacity {
        info!("Max capacity override: {}", capacity);
        config.max_capacity = capacity;
    }

    if let Some(policy) = overrides.overflow_policy {
        info!("Overflow policy override: {:?}", policy);
        config.overflow_policy = policy;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
min_load: 100
max_load: 200
target_load: 150
max_capacity: 200
overflow_policy: fail
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.target_load, 150);
        assert_eq!(config.overflow_policy, OverflowPolicy::Fail);
        assert_eq!(config.reserve, 20);
    }

    #[test]
    fn test_target_above_band_reaches_max_load_correction() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "target_load: 520\n").unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.target_load, 520);

        // available = 1040, ceil(1040/520) = 2, average 520 > 500,
        // ceil(1040/500) = 3
        let count = crate::topology::estimate_concentrator_count(1_060, &config).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config, ClusteringConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "min_load: 900\n").unwrap();
        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = load_config_or_default(None).unwrap();

        let overrides = CliOverrides {
            concentrators: Some(12),
            max_capacity: Some(150),
            overflow_policy: Some(OverflowPolicy::Exceed),
        };

        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.concentrator_count, Some(12));
        assert_eq!(config.max_capacity, 150);
        assert_eq!(config.overflow_policy, OverflowPolicy::Exceed);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = ClusteringConfig::default();
        let overrides = CliOverrides {
            concentrators: Some(0),
            ..Default::default()
        };
        assert!(apply_overrides(&mut config, &overrides).is_err());
    }
}
