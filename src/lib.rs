//! readprof
//!
//! An in-process sampling profiler for read operations. Every profiled
//! read is attributed to the call stack that issued it and to the
//! power-of-two bucket of its size, and a profiling window is exported as
//! a pprof profile that `go tool pprof` and compatible viewers can open.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::io::Read;
//!
//! readprof::start()?;
//!
//! let file = std::fs::File::open("data.bin")?;
//! let mut reader = readprof::reader(file);
//! let mut buf = Vec::new();
//! reader.read_to_end(&mut buf)?;
//!
//! let profile = readprof::stop()?;
//! readprof::output::write_profile(&profile, "reads.pb.gz")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Long-running services can expose the `/debug/readprof` endpoint from
//! the [`http`] module instead and pull profiles with `readprof fetch`.

pub mod adapters;
pub mod client;
pub mod commands;
#[cfg(feature = "http")]
pub mod http;
pub mod output;
pub mod profile;
pub mod sampler;
pub mod utils;

pub use adapters::{ProfiledReader, ProfiledReaderAt, ReadAt};
pub use profile::Profile;
pub use sampler::{MappingSource, Profiler, StackKey};
pub use utils::error::ProfilerError;

use std::io::Read;
use std::sync::OnceLock;

static DEFAULT_PROFILER: OnceLock<Profiler> = OnceLock::new();

/// The process-wide profiler, created on first use
///
/// **Public** - shared by [`start`], [`stop`], [`reader`] and [`reader_at`]
pub fn default_profiler() -> &'static Profiler {
    DEFAULT_PROFILER.get_or_init(Profiler::new)
}

/// Open a profiling window on the default profiler
///
/// # Errors
/// * `ProfilerError::AlreadyRunning` - a window is already open
pub fn start() -> Result<(), ProfilerError> {
    default_profiler().start()
}

/// Close the default profiler's window and return its profile
///
/// # Errors
/// * `ProfilerError::NotRunning` - no window is open
pub fn stop() -> Result<Profile, ProfilerError> {
    default_profiler().stop()
}

/// Wrap a reader so its reads are reported to the default profiler
pub fn reader<R: Read>(inner: R) -> ProfiledReader<'static, R> {
    default_profiler().reader(inner)
}

/// Wrap a positional reader so its reads are reported to the default profiler
pub fn reader_at<R: ReadAt>(inner: R) -> ProfiledReaderAt<'static, R> {
    default_profiler().reader_at(inner)
}
