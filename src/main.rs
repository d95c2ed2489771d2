use anyhow::bail;
use arrkit::config::Config;
use arrkit::services::Services;
use clap::Parser;
use cli::{Cli, Command};
use log::{debug, info};
use serde::Serialize;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::setup_logging(&args.log_level)?;

    let config = Config::load(&args.config).await?;
    let services = Services::new(&config)?;
    if services.is_empty() {
        bail!("no services configured in {}", args.config.display());
    }
    debug!("configured services: {services:?}");

    run(&services, args.command).await
}

async fn run(services: &Services, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Check => {
            let results = services.check().await;
            let unreachable: Vec<_> = results
                .iter()
                .filter_map(|(kind, ok)| (!ok).then_some(kind))
                .collect();
            if !unreachable.is_empty() {
                bail!("unreachable services: {unreachable:?}");
            }
            info!("all {} services are reachable", results.len());
        }
        Command::Status { service } => print(&services.get(service)?.status().await?)?,
        Command::Queue { service } => print(&services.get(service)?.queue().await?)?,
        Command::Calendar {
            service,
            start,
            end,
        } => print(&services.get(service)?.calendar(start, end).await?)?,
        Command::Lookup { service, term } => {
            print(&services.get(service)?.lookup(&term).await?)?
        }
        Command::RootFolders { service } => {
            print(&services.get(service)?.root_folders().await?)?
        }
        Command::QualityProfiles { service } => {
            print(&services.get(service)?.quality_profiles().await?)?
        }
        Command::Indexers { test } => {
            let prowlarr = services.prowlarr()?;
            if test {
                print(&prowlarr.test_all_indexers().await?)?
            } else {
                print(&prowlarr.indexers().await?)?
            }
        }
        Command::Search { query, categories } => {
            print(&services.prowlarr()?.search(&query, &categories).await?)?
        }
    }
    Ok(())
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
