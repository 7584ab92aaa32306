//! `sitemaker build` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use sitemaker_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover sitemaker.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// IANA timezone for lastmod values (overrides config).
    #[arg(long, env = "SITEMAKER_TIMEZONE")]
    timezone: Option<String>,

    /// Write the sitemap to stdout instead of a file.
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a URL entry is invalid, or
    /// the sitemap cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            timezone: self.timezone,
            output: self.output,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let sitemap = config.build_sitemap()?;

        if sitemap.is_empty() {
            output.warning("No [[urls]] entries configured, sitemap will be empty");
        }

        if self.stdout {
            let xml = sitemap.get()?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(xml.as_bytes())?;
            stdout.flush()?;
            return Ok(());
        }

        ensure_parent_dir(&config.output_resolved)?;
        sitemap.save(&config.output_resolved)?;

        output.success(&format!(
            "Wrote {} URL(s) to {}",
            sitemap.len(),
            config.output_resolved.display()
        ));
        Ok(())
    }
}

/// Create the output file's parent directory if it is missing.
fn ensure_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
