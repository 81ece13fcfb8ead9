//! Configuration and constants shared by the library and the CLI.

use std::time::Duration;

/// Profiling window used by the control endpoint when no `seconds` is given
pub const DEFAULT_PROFILE_SECONDS: u64 = 10;

/// Path the control endpoint is mounted on
pub const PROFILE_ENDPOINT_PATH: &str = "/debug/readprof";

/// Content headers of a served profile payload
pub const PROFILE_CONTENT_TYPE: &str = "application/x-protobuf";
pub const PROFILE_CONTENT_ENCODING: &str = "gzip";

/// Added on top of the requested window when fetching from an endpoint
pub const FETCH_TIMEOUT_MARGIN: Duration = Duration::from_secs(30);

/// Upper bound for a fetch timeout; larger deadlines overflow the clock
pub const MAX_FETCH_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Frames between `capture_stack` and the code that issued an adapter read:
/// `Profiler::record_adapter_read` and the adapter's read method.
pub const ADAPTER_SKIP_FRAMES: usize = 2;

/// Chunk size used by the `capture` command when reading input files
pub const DEFAULT_READ_BUFFER: usize = 1024;

/// Number of samples shown in summaries
pub const DEFAULT_TOP_SAMPLES: usize = 20;
