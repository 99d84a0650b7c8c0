use anyhow::bail;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod config;
mod loader;
mod phrases;
mod reference;
mod search;
mod semantic;
mod service;
#[cfg(test)]
mod tests;

use app::{App, SearchRequest};
use config::Config;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Expand { template } => {
            println!("{}", serde_json::to_string_pretty(&phrases::expand(&template))?);
            Ok(())
        }

        cli::Command::Reference {} => {
            println!(
                "{}",
                serde_json::to_string_pretty(&reference::reference_lists())?
            );
            Ok(())
        }

        cli::Command::Search {
            query,
            top_k,
            threshold,
            topics,
            only_in_topics,
            filter_results,
        } => {
            if query.trim().is_empty() {
                bail!("query is empty");
            }

            let config = Config::load()?;
            let threshold = threshold.unwrap_or(config.semantic_search.default_threshold);
            if !(0.0..=1.0).contains(&threshold) {
                bail!("threshold must be between 0.0 and 1.0, got {threshold}");
            }

            let app = App::load(&config)?;
            let request = SearchRequest {
                query,
                top_k: top_k.unwrap_or(config.semantic_search.top_k),
                threshold,
                topics,
                only_in_topics,
                filter_results,
            };

            match app.search(&request) {
                Ok(output) => {
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    Ok(())
                }
                Err(err) => bail!("Search failed: {err}"),
            }
        }

        cli::Command::Topics {} => {
            let app = App::load(&Config::load()?)?;
            println!("{}", serde_json::to_string_pretty(&app.topics())?);
            Ok(())
        }

        cli::Command::Browse { topics } => {
            let app = App::load(&Config::load()?)?;
            let entries = app.browse(&topics);
            if entries.is_empty() {
                log::warn!("No phrases for the selected topics");
            }
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(())
        }
    }
}
