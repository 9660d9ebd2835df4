//! nginx routing rules for the Docker Registry HTTP API v2 read surface
//!
//! The generated rules cover:
//!
//! - `GET /v2` and `GET /v2/` (API version check)
//! - `GET /v2/<name>/tags/list`
//! - `GET /v2/<name>/manifests/<tag>` and `.../manifests/sha256:<hex>`
//! - `GET /v2/<name>/blobs/sha256:<hex>`
//!
//! Rule order is significant and preserved from emission to output.

pub mod emitter;
pub mod json;
pub mod path;
pub mod rule;

pub use emitter::{GlobalRoutes, RouteEmitter};
pub use path::{NamePrefix, RepositoryPath};
pub use rule::{BlobRoute, ManifestRoute, RouteRule};
