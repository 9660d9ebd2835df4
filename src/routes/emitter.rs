//! Route emission: turns an [`Inventory`] into ordered nginx rules

use crate::error::Result;
use crate::image::{DigestUtils, Image, Inventory, ManifestDigester};
use crate::logging::Logger;
use crate::routes::path::{NamePrefix, RepositoryPath};
use crate::routes::rule::{BlobRoute, ManifestRoute, RouteRule};
use std::collections::HashSet;

/// Which of the once-per-server rules (`/v2`, `/v2/`, `@404_tag`) to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlobalRoutes {
    /// Global rules followed by per-image rules
    #[default]
    Include,
    /// Per-image rules only, for configs included next to one that has the globals
    Omit,
    /// Global rules only; images are not scanned
    Only,
}

impl GlobalRoutes {
    pub fn from_flags(omit: bool, only: bool) -> Self {
        match (omit, only) {
            (_, true) => GlobalRoutes::Only,
            (true, false) => GlobalRoutes::Omit,
            (false, false) => GlobalRoutes::Include,
        }
    }

    pub fn includes_globals(&self) -> bool {
        !matches!(self, GlobalRoutes::Omit)
    }

    pub fn includes_images(&self) -> bool {
        !matches!(self, GlobalRoutes::Only)
    }
}

/// Builds rules for images served from `server_root`
pub struct RouteEmitter {
    logger: Logger,
    digester: ManifestDigester,
    server_root: String,
    name_prefix: NamePrefix,
}

impl RouteEmitter {
    pub fn new(
        logger: Logger,
        digester: ManifestDigester,
        server_root: impl Into<String>,
        name_prefix: NamePrefix,
    ) -> Self {
        Self {
            logger,
            digester,
            server_root: server_root.into(),
            name_prefix,
        }
    }

    /// Every rule for `inventory`, globals first, images in name order.
    ///
    /// All manifest digests are resolved before anything is returned, so a
    /// manifest that cannot be read fails the whole emission.
    pub fn emit(&self, inventory: &mut Inventory, global_routes: GlobalRoutes) -> Result<Vec<RouteRule>> {
        let mut rules = Vec::new();

        if global_routes.includes_globals() {
            rules.extend(self.global_rules()?);
        }

        if !global_routes.includes_images() {
            return Ok(rules);
        }

        for image in inventory.images_mut() {
            rules.extend(self.image_rules(image)?);
        }

        Ok(rules)
    }

    pub fn global_rules(&self) -> Result<Vec<RouteRule>> {
        Ok(vec![
            RouteRule::ApiRedirect,
            RouteRule::ApiVersionCheck,
            RouteRule::tag_invalid_fallback()?,
        ])
    }

    /// Tag list, manifest and blob rules for a single image.
    ///
    /// Digest routes are de-duplicated within the image: the first tag in sort
    /// order owns a digest, later tags with identical manifests only get their
    /// tag route and a comment.
    pub fn image_rules(&self, image: &mut Image) -> Result<Vec<RouteRule>> {
        let name = image.name.clone();
        let tags = image.tag_names();
        let repository = RepositoryPath::new(&self.name_prefix, &name);

        self.logger.debug(&format!(
            "Emitting routes for {} ({} tag(s)) at /v2/{}{}",
            name,
            tags.len(),
            self.name_prefix,
            name
        ));

        let mut rules = vec![RouteRule::tag_list(&repository, tags.clone())?];
        let mut served_digests = HashSet::new();

        for info in image.tags_mut() {
            let digest = info.digest(&self.digester)?;
            let alias = format!("{}/{}/{}/", self.server_root, name, info.tag);

            rules.push(RouteRule::Manifest(ManifestRoute {
                path: repository.manifest(&info.tag),
                alias: alias.clone(),
                media_type: info.media_type,
                digest: digest.clone(),
            }));

            if served_digests.insert(digest.clone()) {
                rules.push(RouteRule::Manifest(ManifestRoute {
                    path: repository.manifest(&digest.to_string()),
                    alias,
                    media_type: info.media_type,
                    digest,
                }));
            } else {
                self.logger.detail(&format!(
                    "{}:{} shares {} with an earlier tag",
                    name,
                    info.tag,
                    DigestUtils::format_digest_short(&digest)
                ));
                rules.push(RouteRule::DigestAlreadyServed {
                    name: name.clone(),
                    tag: info.tag.clone(),
                });
            }
        }

        rules.push(RouteRule::Blob(BlobRoute {
            pattern: repository.blob_pattern(),
            alias: format!("{}/{}/", self.server_root, name),
            tags,
        }));

        Ok(rules)
    }
}
