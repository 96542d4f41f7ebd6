use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tmos_core::ConfigFile;

/// Read every config file in command line order.
pub fn load_config_files(paths: &[PathBuf]) -> Result<Vec<ConfigFile>> {
    paths.iter().map(|path| load_config_file(path)).collect()
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ConfigFile::new(name, content))
}
