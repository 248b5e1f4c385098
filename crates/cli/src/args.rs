use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pgrest", version, about = "Automatic REST API for PostgreSQL")]
pub struct CommandLineArgs {
  /// Path to the TOML configuration file.
  #[arg(long, env = "PGREST_CONFIG")]
  pub config: Option<PathBuf>,

  /// Listen address, overriding the configuration file.
  #[arg(short, long, env = "PGREST_ADDRESS")]
  pub address: Option<String>,

  /// Verbose logging for development.
  #[arg(long)]
  pub dev: bool,
}
