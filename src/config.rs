//! Resolved settings for one configuration generation run

use crate::error::{RegistryError, Result};
use crate::routes::path::is_safe_segment;
use crate::routes::{GlobalRoutes, NamePrefix};
use std::env;
use std::path::{Component, Path, PathBuf};

/// Validated generator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Absolute directory scanned for `{name}/{tag}/manifest.json`
    pub root: PathBuf,
    /// Directory nginx serves image files from, without trailing slash
    pub server_root: String,
    pub name_prefix: NamePrefix,
    pub global_routes: GlobalRoutes,
}

impl GeneratorConfig {
    /// Resolve settings; `server_root` defaults to the absolute `root`
    pub fn new(
        root: &Path,
        server_root: Option<&str>,
        name_prefix: Option<&str>,
        global_routes: GlobalRoutes,
    ) -> Result<Self> {
        let root = absolute_path(root)?;

        let server_root = match server_root {
            Some(server_root) => server_root.to_string(),
            None => root
                .to_str()
                .ok_or_else(|| {
                    RegistryError::Validation(format!(
                        "Root {} is not valid UTF-8; pass --server-root explicitly",
                        root.display()
                    ))
                })?
                .to_string(),
        };

        let config = Self {
            root,
            server_root: server_root.trim_end_matches('/').to_string(),
            name_prefix: NamePrefix::new(name_prefix.unwrap_or_default())?,
            global_routes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let unsafe_part = self
            .server_root
            .split('/')
            .filter(|part| !part.is_empty())
            .find(|part| !is_safe_segment(part));

        if let Some(part) = unsafe_part {
            return Err(RegistryError::Validation(format!(
                "Server root '{}' contains '{}', which cannot be embedded in nginx configuration",
                self.server_root, part
            )));
        }
        Ok(())
    }
}

/// Make `path` absolute against the current directory and fold `.` and `..`
/// lexically, without touching the filesystem.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| RegistryError::io(Path::new("."), e))?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
