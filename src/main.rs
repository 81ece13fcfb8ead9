//! readprof CLI
//!
//! Captures, inspects and fetches read profiles.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use readprof::commands::{
    display_version, execute_capture, execute_fetch, execute_inspect, validate_args, CaptureArgs,
    FetchArgs, InspectArgs,
};
use readprof::utils::config::{DEFAULT_PROFILE_SECONDS, DEFAULT_READ_BUFFER, DEFAULT_TOP_SAMPLES};

/// readprof - sampling profiler for read operations
#[derive(Parser, Debug)]
#[command(name = "readprof")]
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
    /// Profile reading one or more files
    Capture {
        /// Input file to read (repeatable)
        #[arg(short, long = "input", required = true)]
        inputs: Vec<PathBuf>,

        /// Output path for the gzip-compressed pprof profile
        #[arg(short, long, default_value = "profile.pb.gz")]
        output: PathBuf,

        /// Bytes requested by each read
        #[arg(short, long, default_value_t = DEFAULT_READ_BUFFER)]
        buffer_size: usize,

        /// Output path for a JSON summary (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of hot stacks to include in summaries
        #[arg(long, default_value_t = DEFAULT_TOP_SAMPLES)]
        top: usize,
    },

    /// Decode and summarize a profile file
    Inspect {
        /// Path to a profile (gzip or raw protobuf)
        #[arg(short, long)]
        file: PathBuf,

        /// Number of hot stacks to print
        #[arg(long, default_value_t = DEFAULT_TOP_SAMPLES)]
        top: usize,

        /// Output path for a JSON summary (optional)
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Download a profile from a running endpoint
    Fetch {
        /// Endpoint URL, e.g. http://127.0.0.1:8080/debug/readprof
        #[arg(short, long, env = "READPROF_URL")]
        url: String,

        /// Length of the profiling window
        #[arg(short, long, default_value_t = DEFAULT_PROFILE_SECONDS)]
        seconds: u64,

        /// Where to store the profile
        #[arg(short, long, default_value = "profile.pb.gz")]
        output: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Capture {
            inputs,
            output,
            buffer_size,
            json,
            summary,
            top,
        } => {
            let args = CaptureArgs {
                inputs,
                output,
                buffer_size,
                output_json: json,
                print_summary: summary,
                top_samples: top,
            };

            validate_args(&args)?;
            execute_capture(args)?;
        }

        Commands::Inspect { file, top, json } => {
            execute_inspect(InspectArgs {
                file,
                top_samples: top,
                output_json: json,
            })?;
        }

        Commands::Fetch {
            url,
            seconds,
            output,
        } => {
            execute_fetch(FetchArgs {
                url,
                seconds,
                output,
            })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
