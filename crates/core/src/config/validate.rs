use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - `source` is an absolute path
/// - exactly one of `target.path` / `target.mtp`, and `mtp` looks like `SERIAL/path`
/// - transcode extension is a bare extension
/// - pipeline sizes are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.source.as_os_str().is_empty() || !config.source.is_absolute() {
        return Err(ConfigError::ValidationError(
            "source must be an absolute path".to_string(),
        ));
    }

    match (&config.target.path, &config.target.mtp) {
        (Some(_), Some(_)) => {
            return Err(ConfigError::ValidationError(
                "target.path and target.mtp are mutually exclusive".to_string(),
            ))
        }
        (None, None) => {
            return Err(ConfigError::ValidationError(
                "one of target.path or target.mtp is required".to_string(),
            ))
        }
        (None, Some(mtp)) => {
            let serial = mtp.split('/').next().unwrap_or_default();
            if serial.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "target.mtp must look like SERIAL/path, got {:?}",
                    mtp
                )));
            }
        }
        (Some(_), None) => {}
    }

    let extension = &config.target.transcode.extension;
    if extension.is_empty() || extension.contains('.') || extension.contains('/') {
        return Err(ConfigError::ValidationError(format!(
            "target.transcode.extension must be a bare extension like \"mp3\", got {:?}",
            extension
        )));
    }

    if config.pipeline.workers == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.workers cannot be 0".to_string(),
        ));
    }
    if config.pipeline.queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.queue_capacity cannot be 0".to_string(),
        ));
    }
    if config.pipeline.copy_buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.copy_buffer_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}
