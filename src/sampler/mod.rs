//! Sampling of read events.
//!
//! This module turns individual reads into aggregated samples:
//! - Stack capture at the read site
//! - Power-of-two size bucketing and the aggregation key
//! - The lock-protected accumulator with its start/record/stop lifecycle

pub mod capture;
pub mod profiler;
pub mod stack_key;

// Re-export main types and functions
pub use capture::{capture_stack, CapturedStack};
pub use profiler::{Counters, MappingSource, Profiler, SampleMap};
pub use stack_key::{size_bucket, StackKey, MAX_SIZE_BUCKET, MAX_STACK_DEPTH};
