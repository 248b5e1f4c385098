#![allow(clippy::needless_return)]

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod args;

use clap::Parser;
use log::*;

use pgrest::config::AppConfig;
use pgrest::{Server, ServerOptions};

use crate::args::CommandLineArgs;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_logger(dev: bool) {
  const DEFAULT: &str = "info";

  env_logger::Builder::from_env(if dev {
    env_logger::Env::new().default_filter_or(format!("{DEFAULT},pgrest=debug,tower_http=debug"))
  } else {
    env_logger::Env::new().default_filter_or(DEFAULT)
  })
  .format_timestamp_micros()
  .init();
}

async fn async_main() -> Result<(), BoxError> {
  let args = CommandLineArgs::parse();

  init_logger(args.dev);

  let mut config = AppConfig::load(args.config.as_deref())?;
  if let Some(address) = args.address {
    config.server.address = address;
  }

  debug!(
    "serving database '{}' from {}",
    config.database.dbname, config.server.address
  );

  let server = Server::init(ServerOptions { config })?;
  server.serve().await?;

  return Ok(());
}

fn main() -> Result<(), BoxError> {
  let runtime = tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .build()?;

  return runtime.block_on(async_main());
}
