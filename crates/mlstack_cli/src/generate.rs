//! Template generation command.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use mlstack_config::{StackConfig, ENVIRONMENT_CONFIG_PATH};
use mlstack_iac::generate_template;

use crate::cli::Cli;

/// Load both configuration documents and render the template as JSON.
pub fn render(environment_path: &Path, cluster_path: &Path) -> Result<String> {
    let config = StackConfig::load(environment_path, cluster_path)
        .with_context(|| format!("Failed to load configuration from {:?}", cluster_path))?;

    let template = generate_template(&config).context("Failed to generate template")?;
    debug!("Serializing {} resources", template.len());

    let json = template.to_json().context("Failed to serialize template")?;
    Ok(json)
}

pub fn execute(cli: &Cli) -> Result<()> {
    info!("Generating MarkLogic cluster template from {:?}", cli.config);

    let json = render(Path::new(ENVIRONMENT_CONFIG_PATH), &cli.config)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write template to stdout")?;
    stdout.flush().context("Failed to write template to stdout")?;

    Ok(())
}
