//! Exported image handling
//!
//! This module finds exported images on disk and describes them for route
//! emission. An image tree is laid out as:
//!
//! ```text
//! {root}/
//!   {name}/
//!     {tag}/
//!       manifest.json
//!       {blob digest hex}...
//! ```
//!
//! The [`ImageDiscoverer`] walks that tree and keeps only tags whose
//! `manifest.json` is a schema version 2 Docker or OCI image manifest. Results
//! are aggregated into an [`Inventory`], whose manifest digests are computed
//! lazily by a [`ManifestDigester`].
//!
//! ```no_run
//! use std::path::Path;
//! use static_container_registry::image::{ImageDiscoverer, Inventory};
//! use static_container_registry::logging::Logger;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Path::new("/srv/images");
//! let discoverer = ImageDiscoverer::new(Logger::new(false));
//! let inventory = Inventory::from_discovered(root, discoverer.discover(root)?);
//! for image in inventory.images() {
//!     println!("{}: {:?}", image.name, image.tag_names());
//! }
//! # Ok(())
//! # }
//! ```

pub mod digest;
pub mod discovery;
pub mod inventory;
pub mod manifest;

pub use digest::{DigestUtils, ManifestDigester, Sha256Digest};
pub use discovery::{DiscoveredImage, ImageDiscoverer};
pub use inventory::{Image, ImageManifestInfo, Inventory};
pub use manifest::{MediaType, check_manifest};
