//! Heap Flame CLI
//!
//! Turns heap-sampling allocation profiles into categorized reports,
//! terminal summaries and flamegraphs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use heap_flame::commands::{
    display_schema, display_version, execute_analyse, validate_args, validate_report_file,
    AnalyseArgs,
};
use heap_flame::flamegraph::FlamegraphConfig;
use heap_flame::utils::config::DEFAULT_FLAMEGRAPH_WIDTH;

/// Heap Flame - categorized heap allocation flamegraphs
#[derive(Parser, Debug)]
#[command(name = "heap-flame")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse a heap profile
    Analyse {
        /// Heap profile to analyse
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "heap-profile.json")]
        output: PathBuf,

        /// Output path for SVG flamegraph (optional)
        #[arg(short, long)]
        flamegraph: Option<PathBuf>,

        /// Number of top frames to include
        #[arg(long, default_value = "20")]
        top_frames: usize,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph width in pixels
        #[arg(long, default_value_t = DEFAULT_FLAMEGRAPH_WIDTH)]
        width: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// TOML filter preset with `show` and `hide` key lists
        #[arg(long, env = "HEAP_FLAME_FILTERS")]
        config: Option<PathBuf>,

        /// Make a category or category:type visible (repeatable)
        #[arg(long)]
        show: Vec<String>,

        /// Hide a category or category:type (repeatable)
        #[arg(long)]
        hide: Vec<String>,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyse {
            input,
            output,
            flamegraph,
            top_frames,
            title,
            width,
            summary,
            config,
            show,
            hide,
        } => {
            let fg_config = flamegraph.as_ref().map(|_| {
                let config = FlamegraphConfig::new().with_width(width);
                match title {
                    Some(title) => config.with_title(title),
                    None => config,
                }
            });

            let args = AnalyseArgs {
                input,
                output_json: output,
                output_svg: flamegraph,
                top_frames,
                flamegraph_config: fg_config,
                print_summary: summary,
                filter_config: config,
                show,
                hide,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyse(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
