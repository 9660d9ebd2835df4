//! Discovery of exported images laid out as `{root}/{name}/{tag}/manifest.json`

use crate::error::{RegistryError, Result};
use crate::image::manifest::{MANIFEST_JSON, MediaType, check_manifest};
use crate::logging::Logger;
use crate::routes::path::is_safe_segment;
use std::fs;
use std::path::{Path, PathBuf};

/// A `(name, tag, mediaType)` triple for a servable image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredImage {
    pub name: String,
    pub tag: String,
    pub media_type: MediaType,
}

/// Walks an image tree and reports the tags holding a valid manifest.
///
/// Each call re-reads the filesystem; nothing is cached between scans.
pub struct ImageDiscoverer {
    logger: Logger,
}

impl ImageDiscoverer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Scan `root` and return every eligible image tag, in name then tag order.
    ///
    /// Ineligible entries are logged and skipped. Failing to list `root` or an
    /// image directory is an error.
    pub fn discover(&self, root: &Path) -> Result<Vec<DiscoveredImage>> {
        self.logger
            .info(&format!("Finding images in {}", root.display()));

        let mut found = Vec::new();
        for (name, name_path) in self.list_directories(root)? {
            self.logger.info(&format!(
                "Looking into {} for tags of {}",
                name_path.display(),
                name
            ));

            for (tag, tag_path) in self.list_directories(&name_path)? {
                self.logger.info(&format!(
                    "Looking into {} for a valid image",
                    tag_path.display()
                ));

                if let Some(media_type) = self.inspect_tag(&tag_path)? {
                    self.logger.info(&format!(
                        "Found image {}:{} in {}",
                        name,
                        tag,
                        tag_path.display()
                    ));
                    found.push(DiscoveredImage {
                        name: name.clone(),
                        tag,
                        media_type,
                    });
                }
            }
        }

        self.logger.debug(&format!(
            "Discovered {} image tag(s) under {}",
            found.len(),
            root.display()
        ));
        Ok(found)
    }

    /// Immediate subdirectories of `dir` whose names can be served, sorted by name
    fn list_directories(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>> {
        let entries = fs::read_dir(dir).map_err(|e| RegistryError::io(dir, e))?;

        let mut directories = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RegistryError::io(dir, e))?;
            let path = entry.path();

            // Follows symlinks, like the host's own directory check
            if !path.is_dir() {
                self.logger
                    .info(&format!("Not a directory: {}", path.display()));
                continue;
            }

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    self.logger.info(&format!(
                        "Skipping {}: name {:?} is not valid UTF-8",
                        path.display(),
                        raw
                    ));
                    continue;
                }
            };

            if !is_safe_segment(&name) {
                self.logger.info(&format!(
                    "Skipping {}: name cannot be embedded in nginx configuration",
                    path.display()
                ));
                continue;
            }

            directories.push((name, path));
        }

        directories.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(directories)
    }

    /// Media type of the manifest in `tag_path`, or `None` if it is not servable
    fn inspect_tag(&self, tag_path: &Path) -> Result<Option<MediaType>> {
        let manifest = tag_path.join(MANIFEST_JSON);

        if !manifest.is_file() {
            self.logger
                .info(&format!("No manifest file at {}", manifest.display()));
            return Ok(None);
        }

        self.logger.info(&format!(
            "Attempting to load JSON data from {}",
            manifest.display()
        ));
        let data = fs::read(&manifest).map_err(|e| RegistryError::io(&manifest, e))?;

        match check_manifest(&data) {
            Ok(media_type) => Ok(Some(media_type)),
            Err(rejection) => {
                self.logger
                    .info(&format!("Skipping {}: {}", manifest.display(), rejection));
                Ok(None)
            }
        }
    }
}
