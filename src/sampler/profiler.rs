//! The read profiler: a lock-protected accumulator of read samples.
//!
//! Reads are grouped by (call stack, size bucket) and counted while a
//! profiling window is open. Stopping the window detaches the sample map
//! and turns it into a pprof profile.

use super::capture::capture_stack;
use super::stack_key::StackKey;
use crate::profile::{read_process_mappings, MemoryMapping, Profile, ProfileBuilder};
use crate::utils::config::ADAPTER_SKIP_FRAMES;
use crate::utils::error::ProfilerError;
use chrono::{DateTime, Utc};
use log::info;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Aggregated values of one sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Number of reads
    pub count: i64,

    /// Total bytes returned by those reads
    pub bytes: i64,
}

/// Samples of one profiling window
pub type SampleMap = HashMap<StackKey, Counters>;

/// Where the profile builder gets its memory mappings from
#[derive(Debug, Clone, Default)]
pub enum MappingSource {
    /// Read the live process mappings when a window is stopped
    #[default]
    Process,

    /// Use a fixed list (an empty list yields the synthetic full-range mapping)
    Fixed(Vec<MemoryMapping>),
}

/// An open profiling window
struct Window {
    started_at: DateTime<Utc>,
    started: Instant,
    samples: SampleMap,
}

/// Read profiler
///
/// **Public** - use an explicit instance or the process-wide default
/// (see [`crate::default_profiler`])
///
/// `record` may be called from any number of threads. Start and stop are
/// rare control operations.
pub struct Profiler {
    /// `Some` while running; the lock also serializes sample updates
    window: Mutex<Option<Window>>,

    /// Hint mirroring `window.is_some()` so disabled reads skip stack capture
    enabled: AtomicBool,

    mappings: MappingSource,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler {
    /// Create a stopped profiler that resolves addresses against the process mappings
    pub fn new() -> Self {
        Self::with_mappings(MappingSource::Process)
    }

    /// Create a stopped profiler with an explicit mapping source
    pub fn with_mappings(mappings: MappingSource) -> Self {
        Self {
            window: Mutex::new(None),
            enabled: AtomicBool::new(false),
            mappings,
        }
    }

    /// Open a profiling window
    ///
    /// # Errors
    /// * `ProfilerError::AlreadyRunning` - a window is already open; it is left untouched
    pub fn start(&self) -> Result<(), ProfilerError> {
        let mut window = self.window.lock();
        if window.is_some() {
            return Err(ProfilerError::AlreadyRunning);
        }

        *window = Some(Window {
            started_at: Utc::now(),
            started: Instant::now(),
            samples: SampleMap::new(),
        });
        self.enabled.store(true, Ordering::Release);

        info!("Read profiler started");
        Ok(())
    }

    /// Close the profiling window and build its profile
    ///
    /// The running flag is cleared and the sample map detached in one
    /// critical section, so a racing `record` lands in exactly one window.
    ///
    /// # Errors
    /// * `ProfilerError::NotRunning` - no window is open
    pub fn stop(&self) -> Result<Profile, ProfilerError> {
        let window = {
            let mut guard = self.window.lock();
            let window = guard.take().ok_or(ProfilerError::NotRunning)?;
            self.enabled.store(false, Ordering::Release);
            window
        };

        let duration = window.started.elapsed();
        info!(
            "Read profiler stopped after {:.2}s with {} unique samples",
            duration.as_secs_f64(),
            window.samples.len()
        );

        let mut builder = ProfileBuilder::new(window.started_at, duration);
        match &self.mappings {
            MappingSource::Process => {
                for mapping in read_process_mappings() {
                    builder.add_mapping(&mapping);
                }
            }
            MappingSource::Fixed(mappings) => {
                for mapping in mappings {
                    builder.add_mapping(mapping);
                }
            }
        }

        Ok(builder.build(&window.samples))
    }

    /// Whether a profiling window is open
    pub fn is_running(&self) -> bool {
        self.window.lock().is_some()
    }

    /// Record one read of `size` bytes issued from `stack` (innermost frame first)
    ///
    /// No-op when no window is open. Never fails.
    pub fn record(&self, size: usize, stack: &[usize]) {
        let key = StackKey::new(stack, size);
        let bytes = i64::try_from(size).unwrap_or(i64::MAX);

        let mut guard = self.window.lock();
        let Some(window) = guard.as_mut() else {
            return;
        };

        let counters = window.samples.entry(key).or_default();
        counters.count += 1;
        counters.bytes = counters.bytes.saturating_add(bytes);
    }

    /// Record one read of `size` bytes issued by the function calling `record_read`
    ///
    /// **Public** - for read paths not covered by [`crate::adapters`]
    ///
    /// Returns before capturing the stack when profiling is off.
    #[inline(never)]
    pub fn record_read(&self, size: usize) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }

        // Drop this frame
        let stack = capture_stack(1);
        self.record(size, stack.as_slice());
    }

    /// Record one read of `size` bytes issued by the caller of a read adapter
    ///
    /// The innermost frame kept is the code that called the adapter's
    /// read method.
    #[inline(never)]
    pub(crate) fn record_adapter_read(&self, size: usize) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }

        let stack = capture_stack(ADAPTER_SKIP_FRAMES);
        self.record(size, stack.as_slice());
    }

    /// Number of unique samples in the open window (0 when stopped)
    pub fn sample_count(&self) -> usize {
        self.window.lock().as_ref().map_or(0, |w| w.samples.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_profiler() -> Profiler {
        Profiler::with_mappings(MappingSource::Fixed(Vec::new()))
    }

    #[test]
    fn test_record_while_stopped_is_ignored() {
        let profiler = fixed_profiler();
        profiler.record(100, &[0x1, 0x2]);
        profiler.record_read(100);
        profiler.record_adapter_read(100);

        assert_eq!(profiler.sample_count(), 0);
        assert!(!profiler.is_running());
    }

    #[test]
    fn test_start_twice_fails() {
        let profiler = fixed_profiler();
        profiler.start().unwrap();
        profiler.record(10, &[0x1]);

        assert_eq!(profiler.start(), Err(ProfilerError::AlreadyRunning));
        assert_eq!(profiler.sample_count(), 1);
        assert!(profiler.is_running());
    }

    #[test]
    fn test_stop_without_start_fails() {
        let profiler = fixed_profiler();
        assert_eq!(profiler.stop().unwrap_err(), ProfilerError::NotRunning);
    }

    #[test]
    fn test_stop_detaches_samples() {
        let profiler = fixed_profiler();
        profiler.start().unwrap();
        profiler.record(100, &[0x1]);
        profiler.record(200, &[0x1]);

        let profile = profiler.stop().unwrap();
        assert_eq!(profile.sample.len(), 1);
        assert_eq!(profile.sample[0].value, vec![2, 300]);

        assert!(!profiler.is_running());
        assert_eq!(profiler.sample_count(), 0);
    }

    #[test]
    fn test_enabled_hint_follows_lifecycle() {
        let profiler = fixed_profiler();
        assert!(!profiler.enabled.load(Ordering::Relaxed));

        profiler.start().unwrap();
        assert!(profiler.enabled.load(Ordering::Relaxed));

        profiler.stop().unwrap();
        assert!(!profiler.enabled.load(Ordering::Relaxed));
    }

    #[test]
    fn test_record_read_captures_stack() {
        let profiler = fixed_profiler();
        profiler.start().unwrap();
        profiler.record_read(64);

        let profile = profiler.stop().unwrap();
        assert_eq!(profile.sample.len(), 1);
        assert_eq!(profile.sample[0].value, vec![1, 64]);
    }
}
