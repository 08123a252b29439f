use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use linkbot::Config;
use linkbot::channels::{build_formatter, doctor_channels, start_channels};
use std::sync::Arc;

/// Placeholder target for `linkbot resolve`, so truncation matches a real channel.
const RESOLVE_TARGET: &str = "#linkbot";

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            validate(&config)?;
            start_channels(Arc::new(config)).await?;
            Ok(())
        }
        Commands::Resolve { urls } => {
            config
                .validate_links()
                .with_context(|| format!("Invalid config {}", config.config_path.display()))?;
            resolve_once(&config, &urls.join(" ")).await
        }
        Commands::CheckConfig => {
            validate(&config)?;
            print_summary(&config);
            doctor_channels(Arc::new(config)).await
        }
    }
}

fn validate(config: &Config) -> Result<()> {
    config
        .validate()
        .with_context(|| format!("Invalid config {}", config.config_path.display()))
}

async fn resolve_once(config: &Config, text: &str) -> Result<()> {
    let formatter = build_formatter(config)?;
    let batch = formatter.collect(text, RESOLVE_TARGET).await;
    let frames =
        linkbot::links::formatter::shape_replies(RESOLVE_TARGET, batch, config.links.max_line_bytes);
    for frame in frames {
        println!("{}", frame.text);
    }
    Ok(())
}

fn print_summary(config: &Config) {
    println!("Config OK: {}", config.config_path.display());
    println!("  › server    {}:{}", config.irc.server, config.irc.port);
    println!("  › nickname  {}", config.irc.nickname);
    println!("  › autojoins {}", config.irc.autojoins.join(", "));
    println!(
        "  › http      timeout {}s, {} concurrent messages",
        config.links.request_timeout_secs, config.links.max_concurrent_messages
    );
    println!("  › line cap  {} bytes", config.links.max_line_bytes);
    println!();
}
