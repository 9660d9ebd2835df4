//! Runner driving a single configuration generation

use crate::cli::args::Args;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generator::ConfigGenerator;
use crate::logging::Logger;
use std::io::{self, BufWriter};

pub struct Runner {
    config: GeneratorConfig,
    logger: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Result<Self> {
        let logger = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        let config = args.to_config()?;
        Ok(Self { config, logger })
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Generate the configuration and write it to standard output
    pub fn run(&self) -> Result<()> {
        self.logger.section("Static Container Registry");
        self.logger.summary_kv(
            "Settings",
            &[
                ("Name prefix", self.config.name_prefix.to_string()),
                ("Server root", self.config.server_root.clone()),
                ("Root", self.config.root.display().to_string()),
                ("Global routes", format!("{:?}", self.config.global_routes)),
            ],
        );

        let generator = ConfigGenerator::new(self.config.clone(), self.logger.clone());
        let stdout = io::stdout();
        let count = generator.write_to(BufWriter::new(stdout.lock()))?;

        let elapsed = self
            .logger
            .elapsed()
            .map(|elapsed| self.logger.format_duration(elapsed))
            .unwrap_or_else(|| "unknown".to_string());
        self.logger
            .debug(&format!("Wrote {} rule(s) in {}", count, elapsed));
        Ok(())
    }
}
