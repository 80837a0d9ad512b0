//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.filter.power.is_finite() {
            return Err(ConfigError::ValidationError(
                "filter.power must be a finite number".into(),
            ));
        }
        if self.filter.pool_sizes.is_empty() {
            return Err(ConfigError::ValidationError(
                "filter.pool_sizes must not be empty".into(),
            ));
        }
        if self.filter.pool_sizes.contains(&0) {
            return Err(ConfigError::ValidationError(
                "filter.pool_sizes entries must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_power() {
        let mut config = Config::default();
        config.filter.power = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("filter.power"));

        config.filter.power = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_pool_sizes() {
        let mut config = Config::default();
        config.filter.pool_sizes.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pool_sizes"));
    }

    #[test]
    fn test_validate_rejects_zero_pool_size() {
        let mut config = Config::default();
        config.filter.pool_sizes = vec![3, 0, 5];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pool_sizes"));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = Config::default();
        config.limits.max_image_dimension = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_image_dimension"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
