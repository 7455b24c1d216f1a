//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use mlstack_config::DEFAULT_CLUSTER_CONFIG_PATH;

/// ml-stack - MarkLogic CloudFormation template generator
#[derive(Parser, Debug)]
#[command(name = "ml-stack")]
#[command(about = "MarkLogic CloudFormation template generator")]
#[command(long_about = r#"
Generates a CloudFormation template for a MarkLogic cluster spread across
availability zones and prints it to standard output.

The environment configuration is always read from conf/aws_config.json.
The cluster configuration defaults to conf/ml_master.json.

Logging goes to standard error at info level. RUST_LOG overrides the
level unless -v is given, which always selects debug.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
  4 - Template error
"#)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// MarkLogic cluster configuration file
    #[arg(
        short = 'f',
        long = "config",
        value_name = "CONFIGURATION_FILE",
        default_value = DEFAULT_CLUSTER_CONFIG_PATH
    )]
    pub config: PathBuf,
}

impl Cli {
    /// Log filter directives: `-v` forces debug, else `RUST_LOG`, else info.
    pub fn log_filter(&self, env_filter: Option<String>) -> String {
        if self.verbose {
            return "debug".to_string();
        }
        env_filter
            .filter(|directives| !directives.trim().is_empty())
            .unwrap_or_else(|| "info".to_string())
    }
}
