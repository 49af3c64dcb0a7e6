use crate::config::Config;
use crate::error::AppError;
use std::path::Path;

/// Tables every config file must contain
pub const EXPECTED_TABLES: [&str; 3] = ["display", "segments", "playlist"];

/// Checks the raw TOML for the required tables and a `module` key in every segment.
///
/// # Returns
/// * `Err(AppError::MissingTables)` - Naming every absent table
/// * `Err(AppError::MissingModule)` - Naming every segment without a module
pub fn validate_tables(raw: &toml::Table) -> Result<(), AppError> {
    let missing_tables: Vec<String> = EXPECTED_TABLES
        .iter()
        .filter(|table| !matches!(raw.get(**table), Some(toml::Value::Table(_))))
        .map(|table| table.to_string())
        .collect();
    if !missing_tables.is_empty() {
        return Err(AppError::MissingTables(missing_tables));
    }

    let bad_segments: Vec<String> = match raw.get("segments") {
        Some(toml::Value::Table(segments)) => segments
            .iter()
            .filter(|(_, declaration)| {
                !matches!(
                    declaration.get("module"),
                    Some(toml::Value::String(module)) if !module.trim().is_empty()
                )
            })
            .map(|(name, _)| name.clone())
            .collect(),
        _ => Vec::new(),
    };
    if !bad_segments.is_empty() {
        return Err(AppError::MissingModule(bad_segments));
    }

    Ok(())
}

/// Validates the typed configuration
///
/// # Validation Rules
/// - Width must be at least one column
/// - Character rates must be positive
/// - Beat length and segment pause cannot be negative
/// - The playlist needs at least one entry
/// - If log file path is provided, it cannot be empty
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let display = &config.display;

    if display.width == 0 {
        return Err(AppError::config_error("display width must be at least 1"));
    }

    if display.cps.is_nan() || display.cps <= 0.0 {
        return Err(AppError::config_error("display cps must be greater than 0"));
    }

    if display.newline_cps.is_nan() || display.newline_cps <= 0.0 {
        return Err(AppError::config_error(
            "display newline_cps must be greater than 0",
        ));
    }

    if display.beat_seconds.is_nan() || display.beat_seconds < 0.0 {
        return Err(AppError::config_error(
            "display beat_seconds cannot be negative",
        ));
    }

    let pause = config.playlist.segment_pause;
    if pause.is_nan() || pause < 0.0 {
        return Err(AppError::config_error(
            "playlist segment_pause cannot be negative",
        ));
    }

    if config.playlist.order.is_empty() {
        return Err(AppError::config_error(
            "playlist order must contain at least one entry",
        ));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
