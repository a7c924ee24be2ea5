use std::path::PathBuf;

/// Get the application data directory, creating it if necessary
pub fn app_data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get local data directory"))?
        .join("pulse");

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// Get the suggestion audit log path
pub fn audit_db_path() -> anyhow::Result<PathBuf> {
    Ok(app_data_dir()?.join("pulse.db"))
}

/// Get the logs directory
pub fn logs_dir() -> anyhow::Result<PathBuf> {
    let dir = app_data_dir()?.join("logs");

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// Get the configuration file path
pub fn config_file_path() -> anyhow::Result<PathBuf> {
    Ok(app_data_dir()?.join("config.toml"))
}
