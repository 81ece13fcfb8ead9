//! Exchange-format profiles.
//!
//! This module covers everything after sampling:
//! - pprof message definitions
//! - Process memory mappings used to attribute addresses
//! - The table-building algorithm turning samples into a profile
//! - Summaries for display and JSON output

pub mod builder;
pub mod mappings;
pub mod proto;
pub mod summary;

// Re-export main types and functions
pub use builder::{ProfileBuilder, RESERVED_STRINGS};
pub use mappings::{parse_proc_maps, read_process_mappings, MemoryMapping};
pub use proto::{Label, Location, Mapping, Profile, Sample, ValueType};
pub use summary::{summarize, BucketStats, HotSample, ProfileSummary};
