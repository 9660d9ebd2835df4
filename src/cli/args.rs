//! Command-line argument parsing

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::routes::GlobalRoutes;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "static-container-registry")]
#[command(about = "Generate nginx configuration to serve exported images as a read-only container registry")]
#[command(version)]
pub struct Args {
    /// Optional prefix added to every image name
    #[arg(long = "name-prefix", value_name = "PREFIX")]
    pub name_prefix: Option<String>,

    /// Root directory from where exported image files are served (default: ROOT)
    #[arg(long = "server-root", value_name = "PATH")]
    pub server_root: Option<String>,

    /// Do not write rules for constant locations (e.g. /v2/), necessary to
    /// include the configuration with others
    #[arg(long = "omit-constants", conflicts_with = "only_constants")]
    pub omit_constants: bool,

    /// Only write rules for constant locations (e.g. /v2/), to include only once
    #[arg(long = "only-constants")]
    pub only_constants: bool,

    /// Log every decision and computed digest
    #[arg(long = "verbose", short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(long = "quiet", short = 'q')]
    pub quiet: bool,

    /// Root directory containing exported images (default: current directory)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Fill options left unset on the command line from the environment
    pub fn from_env(self) -> Self {
        self.with_fallbacks(|key| std::env::var(key).ok())
    }

    /// Fill options left unset on the command line from `lookup`.
    ///
    /// Explicit flags always win; a fallback only ever fills a gap.
    pub fn with_fallbacks<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.name_prefix.is_none() {
            self.name_prefix = lookup("STATIC_REGISTRY_NAME_PREFIX");
        }

        if self.server_root.is_none() {
            self.server_root = lookup("STATIC_REGISTRY_SERVER_ROOT");
        }

        if !self.verbose && !self.quiet {
            if let Some(val) = lookup("STATIC_REGISTRY_VERBOSE") {
                self.verbose = val.eq_ignore_ascii_case("true") || val == "1";
            }
        }

        self
    }

    pub fn global_routes(&self) -> GlobalRoutes {
        GlobalRoutes::from_flags(self.omit_constants, self.only_constants)
    }

    /// Resolve into a validated [`GeneratorConfig`]
    pub fn to_config(&self) -> Result<GeneratorConfig> {
        let root = self.root.clone().unwrap_or_else(|| PathBuf::from("."));
        GeneratorConfig::new(
            &root,
            self.server_root.as_deref(),
            self.name_prefix.as_deref(),
            self.global_routes(),
        )
    }
}
