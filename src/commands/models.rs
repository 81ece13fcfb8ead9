use crate::utils::config::{DEFAULT_PROFILE_SECONDS, DEFAULT_READ_BUFFER, DEFAULT_TOP_SAMPLES};
use std::path::PathBuf;

/// Arguments for the capture command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CaptureArgs {
    /// Files to read under the profiler
    pub inputs: Vec<PathBuf>,

    /// Output path for the gzip-compressed pprof profile
    pub output: PathBuf,

    /// Size of each read issued against the inputs
    pub buffer_size: usize,

    /// Output path for a JSON summary (optional)
    pub output_json: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Number of hot samples in summaries
    pub top_samples: usize,
}

impl Default for CaptureArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from("reads.pb.gz"),
            buffer_size: DEFAULT_READ_BUFFER,
            output_json: None,
            print_summary: false,
            top_samples: DEFAULT_TOP_SAMPLES,
        }
    }
}

/// Arguments for the inspect command
#[derive(Debug, Clone)]
pub struct InspectArgs {
    /// Profile file to read (gzip or raw protobuf)
    pub file: PathBuf,

    /// Number of hot samples to print
    pub top_samples: usize,

    /// Output path for a JSON summary (optional)
    pub output_json: Option<PathBuf>,
}

/// Arguments for the fetch command
#[derive(Debug, Clone)]
pub struct FetchArgs {
    /// Full endpoint URL
    pub url: String,

    /// Profiling window requested from the endpoint
    pub seconds: u64,

    /// Where to store the received payload
    pub output: PathBuf,
}

impl Default for FetchArgs {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/debug/readprof".to_string(),
            seconds: DEFAULT_PROFILE_SECONDS,
            output: PathBuf::from("reads.pb.gz"),
        }
    }
}
