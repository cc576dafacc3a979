use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Flame graph visualisation for Austin profiles
#[derive(Parser)]
#[command(name = "austin-web", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile Austin samples into a standalone HTML flame graph
    Compile {
        /// Austin collapsed samples (`-` for stdin)
        samples: PathBuf,

        /// Output HTML file path
        #[arg(short, long, default_value = "austin.html")]
        output: PathBuf,

        /// Samples carry memory (KB) instead of time (μs)
        #[arg(short, long)]
        memory: bool,

        /// Show times as HH:MM:SS instead of raw microseconds
        #[arg(long)]
        clock: bool,

        /// Initial chart width in pixels
        #[arg(long, default_value_t = 960.0)]
        width: f64,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Extension of the profiled language's own modules
        #[arg(long, default_value = ".py")]
        source_extension: String,

        /// Draw the root at the top
        #[arg(long)]
        inverted: bool,
    },
}
