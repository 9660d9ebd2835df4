//! Registry inventory: discovered tags aggregated per image name

use crate::error::Result;
use crate::image::digest::{ManifestDigester, Sha256Digest};
use crate::image::discovery::DiscoveredImage;
use crate::image::manifest::{MANIFEST_JSON, MediaType};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything needed to serve one tag's manifest
#[derive(Debug, Clone)]
pub struct ImageManifestInfo {
    pub tag: String,
    pub media_type: MediaType,
    pub manifest_path: PathBuf,
    digest: Option<Sha256Digest>,
}

impl ImageManifestInfo {
    pub fn new(tag: String, media_type: MediaType, manifest_path: PathBuf) -> Self {
        Self {
            tag,
            media_type,
            manifest_path,
            digest: None,
        }
    }

    /// Digest of the manifest bytes, computed on first use and then reused
    pub fn digest(&mut self, digester: &ManifestDigester) -> Result<Sha256Digest> {
        if let Some(digest) = &self.digest {
            return Ok(digest.clone());
        }
        let digest = digester.digest_file(&self.manifest_path)?;
        self.digest = Some(digest.clone());
        Ok(digest)
    }
}

/// An image name and its tags, kept in tag order
#[derive(Debug, Clone)]
pub struct Image {
    pub name: String,
    tags: BTreeMap<String, ImageManifestInfo>,
}

impl Image {
    pub fn new(name: String) -> Self {
        Self {
            name,
            tags: BTreeMap::new(),
        }
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }

    pub fn tags(&self) -> impl Iterator<Item = &ImageManifestInfo> {
        self.tags.values()
    }

    pub fn tags_mut(&mut self) -> impl Iterator<Item = &mut ImageManifestInfo> {
        self.tags.values_mut()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Mapping from image name to [`Image`], iterated in name order
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    images: BTreeMap<String, Image>,
}

impl Inventory {
    /// Aggregate discovery results found under `root` by image name
    pub fn from_discovered(root: &Path, discovered: Vec<DiscoveredImage>) -> Self {
        let mut inventory = Self::default();
        for found in discovered {
            let manifest_path = root.join(&found.name).join(&found.tag).join(MANIFEST_JSON);
            inventory
                .images
                .entry(found.name.clone())
                .or_insert_with(|| Image::new(found.name))
                .tags
                .insert(
                    found.tag.clone(),
                    ImageManifestInfo::new(found.tag, found.media_type, manifest_path),
                );
        }
        inventory
    }

    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.images.values()
    }

    pub fn images_mut(&mut self) -> impl Iterator<Item = &mut Image> {
        self.images.values_mut()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn tag_count(&self) -> usize {
        self.images.values().map(Image::len).sum()
    }
}
