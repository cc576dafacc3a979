mod cli;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use austin_web_core::ChartState;
use austin_web_core::html::compile_page;
use austin_web_core::model::parse_samples;
use austin_web_protocol::{ChartConfig, ProfileMode, TimeStyle};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_samples(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading samples from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            samples,
            output,
            memory,
            clock,
            width,
            title,
            source_extension,
            inverted,
        } => {
            let text = read_samples(&samples)?;
            let builder = parse_samples(&text)
                .with_context(|| format!("parsing samples from {}", samples.display()))?;
            let sample_count = builder.samples();
            let rows = u32::try_from(builder.height()).unwrap_or(u32::MAX);
            let tree = builder.finish();

            let config = ChartConfig {
                width,
                height: rows,
                inverted,
                title: title.unwrap_or_default(),
                mode: if memory {
                    ProfileMode::Memory
                } else {
                    ProfileMode::Time
                },
                time_style: if clock {
                    TimeStyle::Clock
                } else {
                    TimeStyle::Microseconds
                },
                source_extension,
                ..ChartConfig::default()
            };
            tracing::info!(samples = sample_count, frames = tree.len(), mode = %config.mode, "compiling");

            let page = compile_page(&tree, &ChartState::new(config))?;
            std::fs::write(&output, page)
                .with_context(|| format!("writing {}", output.display()))?;

            eprintln!(
                "✨🧁✨ {sample_count} samples compiled into {}",
                output.display()
            );
        }
    }

    Ok(())
}
