//! `sitemaker serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use sitemaker_config::{CliSettings, Config};
use sitemaker_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover sitemaker.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// IANA timezone for lastmod values (overrides config).
    #[arg(long, env = "SITEMAKER_TIMEZONE")]
    timezone: Option<String>,

    /// Enable verbose output (request tracing).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            timezone: self.timezone,
            host: self.host,
            port: self.port,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let sitemap = config.build_sitemap()?;

        // Fail before binding if the sitemap cannot be rendered at all
        sitemap.get()?;

        output.info(&format!(
            "Serving {} URL(s) on http://{}:{}{}",
            sitemap.len(),
            config.server.host,
            config.server.port,
            config.server.path
        ));
        output.info(&format!("Timezone: {}", sitemap.timezone()));

        let server_config = server_config_from_config(&config);
        run_server(server_config, sitemap)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
