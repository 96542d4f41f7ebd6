use std::env;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse to write the report over one of the config files it was built from.
///
/// Config files always exist, so they are canonicalized. The report may not
/// exist yet; its parent directory is canonicalized when present and the rest
/// is resolved lexically, `..` included.
pub fn ensure_report_not_input(report: &Path, configs: &[PathBuf]) -> Result<()> {
    let target = report_location(report)?;

    let clash = configs.iter().find(|config| {
        let location = config
            .canonicalize()
            .ok()
            .or_else(|| lexical_absolute(config).ok());
        location.as_ref() == Some(&target)
    });
    if let Some(config) = clash {
        bail!(
            "refusing to overwrite config file {} with the report",
            config.display()
        );
    }
    Ok(())
}

fn report_location(report: &Path) -> Result<PathBuf> {
    if let Ok(path) = report.canonicalize() {
        return Ok(path);
    }
    let absolute = lexical_absolute(report)?;
    if let (Some(dir), Some(file)) = (absolute.parent(), absolute.file_name()) {
        if let Ok(dir) = dir.canonicalize() {
            return Ok(dir.join(file));
        }
    }
    Ok(absolute)
}

/// Absolute form of `path` with `.` and `..` folded away, without touching disk.
fn lexical_absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .context("failed to read the working directory")?
            .join(path)
    };

    let mut folded = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                folded.pop();
            }
            other => folded.push(other.as_os_str()),
        }
    }
    Ok(folded)
}
