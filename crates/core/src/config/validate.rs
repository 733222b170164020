use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Worker pool size and shutdown ceiling are not 0
/// - Resolver landing URL is set
/// - Template entry names are set
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.orchestrator.max_workers == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.max_workers cannot be 0".to_string(),
        ));
    }

    if config.orchestrator.shutdown_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.shutdown_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.resolver.landing_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "resolver.landing_url cannot be empty".to_string(),
        ));
    }

    if config.template.content_entry.is_empty() || config.template.barcode_entry.is_empty() {
        return Err(ConfigError::ValidationError(
            "template.content_entry and template.barcode_entry must be set".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_workers_fails() {
        let mut config = Config::default();
        config.orchestrator.max_workers = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_shutdown_timeout_fails() {
        let mut config = Config::default();
        config.orchestrator.shutdown_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_landing_url_fails() {
        let mut config = Config::default();
        config.resolver.landing_url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_template_entry_fails() {
        let mut config = Config::default();
        config.template.barcode_entry.clear();
        assert!(validate_config(&config).is_err());
    }
}
