//! One-pass configuration generation: discover, aggregate, digest, emit

use crate::config::GeneratorConfig;
use crate::error::{RegistryError, Result};
use crate::image::{ImageDiscoverer, Inventory, ManifestDigester};
use crate::logging::Logger;
use crate::routes::{RouteEmitter, RouteRule};
use std::io::Write;

pub struct ConfigGenerator {
    config: GeneratorConfig,
    logger: Logger,
}

impl ConfigGenerator {
    pub fn new(config: GeneratorConfig, logger: Logger) -> Self {
        Self { config, logger }
    }

    /// Build every rule for the configured tree without writing anything
    pub fn generate(&self) -> Result<Vec<RouteRule>> {
        let emitter = RouteEmitter::new(
            self.logger.clone(),
            ManifestDigester::new(self.logger.clone()),
            self.config.server_root.clone(),
            self.config.name_prefix.clone(),
        );

        let mut inventory = if self.config.global_routes.includes_images() {
            let discovered = ImageDiscoverer::new(self.logger.clone()).discover(&self.config.root)?;
            Inventory::from_discovered(&self.config.root, discovered)
        } else {
            self.logger.debug("Only global routes requested, skipping image discovery");
            Inventory::default()
        };

        if self.config.global_routes.includes_images() && inventory.is_empty() {
            self.logger.warning(&format!(
                "No servable images found in {}",
                self.config.root.display()
            ));
        } else if self.config.global_routes.includes_images() {
            self.logger.info(&format!(
                "Serving {} image(s) with {} tag(s)",
                inventory.len(),
                inventory.tag_count()
            ));
        }

        emitter.emit(&mut inventory, self.config.global_routes)
    }

    /// Generate and write the configuration document to `writer`.
    ///
    /// Generation completes before the first byte is written, so a failed run
    /// leaves `writer` untouched.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<usize> {
        let rules = self.generate()?;
        write_rules(writer, &rules)?;
        Ok(rules.len())
    }
}

/// Write rendered rules in order and flush
pub fn write_rules<W: Write>(mut writer: W, rules: &[RouteRule]) -> Result<()> {
    for rule in rules {
        write!(writer, "{}", rule).map_err(RegistryError::Output)?;
    }
    writer.flush().map_err(RegistryError::Output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::GlobalRoutes;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_output_error() {
        let err = write_rules(FailingWriter, &[RouteRule::ApiRedirect]).unwrap_err();
        assert!(matches!(err, RegistryError::Output(_)));
    }

    #[test]
    fn test_only_globals_skips_discovery() {
        let root = tempfile::tempdir().unwrap();
        // Discovery of a missing root would fail; global-only runs never look
        let config = GeneratorConfig::new(
            &root.path().join("missing"),
            Some("/srv"),
            None,
            GlobalRoutes::Only,
        )
        .unwrap();

        let mut out = Vec::new();
        let count = ConfigGenerator::new(config, Logger::new_quiet())
            .write_to(&mut out)
            .unwrap();
        assert_eq!(count, 3);
        assert!(String::from_utf8(out).unwrap().starts_with("\nlocation = /v2 {"));
    }

    #[test]
    fn test_failed_generation_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::new(
            &root.path().join("missing"),
            None,
            None,
            GlobalRoutes::Include,
        )
        .unwrap();

        let mut out = Vec::new();
        let result = ConfigGenerator::new(config, Logger::new_quiet()).write_to(&mut out);
        assert!(matches!(result, Err(RegistryError::Io { .. })));
        assert!(out.is_empty());
    }
}
