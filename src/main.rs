use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use homesaver::{
    config::{self, Config},
    logger::setup_logger,
    MarketplaceClient, Profile, PropertyView, SavedPropertyStore,
};
use log::error;
use serde_json::Value;

const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every saved property
    List,
    /// Print the account summary
    Profile,
    /// Tell whether the property in FILE is saved
    Status { file: PathBuf },
    Save { file: PathBuf },
    Remove { file: PathBuf },
    /// Save the property if it is not saved yet, remove it otherwise
    Toggle { file: PathBuf },
}

/// Commands that work on the mounted saved-property store.
enum StoreCommand {
    List,
    Status(PathBuf),
    Save(PathBuf),
    Remove(PathBuf),
    Toggle(PathBuf),
}

fn read_property(path: &Path) -> Result<PropertyView> {
    let bytes =
        std::fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    let value: Value = serde_json::from_slice(&bytes).context("property file is not JSON")?;
    Ok(PropertyView::from_value(&value)?)
}

async fn run_store(
    config: &Config,
    client: Arc<MarketplaceClient>,
    command: StoreCommand,
) -> Result<()> {
    let mut store = SavedPropertyStore::mount(client, config.placeholder_image()).await;
    if !store.is_authenticated() {
        return Err(anyhow!("not logged in, set session_cookie in the config"));
    }

    match command {
        StoreCommand::List => {
            println!("{}", serde_json::to_string_pretty(store.records())?);
        }
        StoreCommand::Status(path) => {
            let property = read_property(&path)?;
            println!("{}: saved={}", property.describe(), store.is_saved(&property));
        }
        StoreCommand::Save(path) => {
            let property = read_property(&path)?;
            let record = store.save(&property).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        StoreCommand::Remove(path) => {
            let property = read_property(&path)?;
            store.remove(&property).await?;
            println!("removed {}", property.describe());
        }
        StoreCommand::Toggle(path) => {
            let property = read_property(&path)?;
            let saved = store.toggle(&property).await?;
            println!("{}: saved={}", property.describe(), saved);
        }
    }

    Ok(())
}

async fn run(config: &Config, command: Command) -> Result<()> {
    let client = Arc::new(MarketplaceClient::new(config)?);

    let store_command = match command {
        Command::Profile => {
            let profile = Profile::load(client).await?;
            println!("{}", serde_json::to_string_pretty(&profile.summary())?);
            return Ok(());
        }
        Command::List => StoreCommand::List,
        Command::Status { file } => StoreCommand::Status(file),
        Command::Save { file } => StoreCommand::Save(file),
        Command::Remove { file } => StoreCommand::Remove(file),
        Command::Toggle { file } => StoreCommand::Toggle(file),
    };

    run_store(config, client, store_command).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logger(std::env::var(LOG_LEVEL_ENV).ok().as_deref())?;

    let config: Config = config::read_config();

    if let Err(err) = run(&config, args.command).await {
        error!("Error: {:?}", err);
        return Err(err);
    }

    Ok(())
}
