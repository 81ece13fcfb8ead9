//! Build pprof profiles from detached sample maps.
//!
//! The builder owns the table bookkeeping: it interns strings, numbers
//! mappings and locations, and guarantees that every id a sample refers
//! to exists in its table.

use super::mappings::MemoryMapping;
use super::proto::{Label, Location, Mapping, Profile, Sample, ValueType};
use crate::sampler::SampleMap;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use std::time::Duration;

/// String table entries every profile starts with, in index order
pub const RESERVED_STRINGS: [&str; 5] = ["", "reads", "count", "read", "bytes"];

const STR_READS: i64 = 1;
const STR_COUNT: i64 = 2;
const STR_READ: i64 = 3;
const STR_BYTES: i64 = 4;

/// Incremental builder for one profile
///
/// **Public** - used by `Profiler::stop`, usable directly for tests
///
/// # Example
/// ```ignore
/// let mut builder = ProfileBuilder::new(Utc::now(), Duration::from_secs(10));
/// builder.add_mapping(&mapping);
/// let profile = builder.build(&samples);
/// ```
pub struct ProfileBuilder {
    profile: Profile,
    strings: HashMap<String, i64>,

    /// Ranges of `profile.mapping`, same order, so index + 1 is the mapping id
    ranges: Vec<MemoryMapping>,
}

impl ProfileBuilder {
    /// Start a profile for a window opened at `started_at` and lasting `duration`
    pub fn new(started_at: DateTime<Utc>, duration: Duration) -> Self {
        let strings = RESERVED_STRINGS
            .iter()
            .enumerate()
            .map(|(i, s)| (s.to_string(), i as i64))
            .collect();

        let profile = Profile {
            string_table: RESERVED_STRINGS.iter().map(|s| s.to_string()).collect(),
            time_nanos: started_at.timestamp_nanos_opt().unwrap_or_default(),
            duration_nanos: i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX),
            period: 1,
            period_type: Some(ValueType {
                r#type: STR_READS,
                unit: STR_COUNT,
            }),
            sample_type: vec![
                ValueType {
                    r#type: STR_READS,
                    unit: STR_COUNT,
                },
                ValueType {
                    r#type: STR_READ,
                    unit: STR_BYTES,
                },
            ],
            ..Default::default()
        };

        Self {
            profile,
            strings,
            ranges: Vec::new(),
        }
    }

    /// Intern a string and return its index in the string table
    fn add_string(&mut self, s: &str) -> i64 {
        if let Some(&index) = self.strings.get(s) {
            return index;
        }

        let index = self.profile.string_table.len() as i64;
        self.profile.string_table.push(s.to_string());
        self.strings.insert(s.to_string(), index);
        index
    }

    /// Add a known code region; ids are assigned in insertion order starting at 1
    pub fn add_mapping(&mut self, mapping: &MemoryMapping) {
        let id = self.profile.mapping.len() as u64 + 1;
        let filename = self.add_string(&mapping.filename);
        let build_id = self.add_string(&mapping.build_id);

        self.profile.mapping.push(Mapping {
            id,
            memory_start: mapping.start,
            memory_limit: mapping.limit,
            file_offset: mapping.offset,
            filename,
            build_id,
            ..Default::default()
        });
        self.ranges.push(mapping.clone());
    }

    /// Mapping covering the whole address space, used when none are known
    fn add_synthetic_mapping(&mut self) {
        let id = self.profile.mapping.len() as u64 + 1;
        self.profile.mapping.push(Mapping {
            id,
            memory_start: 0,
            memory_limit: u64::MAX,
            ..Default::default()
        });
        self.ranges.push(MemoryMapping {
            start: 0,
            limit: u64::MAX,
            offset: 0,
            filename: String::new(),
            build_id: String::new(),
        });
    }

    /// Lowest mapping id whose range contains `address`, or 0
    fn resolve_mapping(&self, address: u64) -> u64 {
        self.ranges
            .iter()
            .position(|m| m.contains(address))
            .map_or(0, |index| index as u64 + 1)
    }

    /// Populate locations and samples and return the finished profile
    ///
    /// **Public** - main entry point
    ///
    /// # Algorithm
    /// 1. Fall back to the synthetic mapping if no mapping was added
    /// 2. For each sample key, dedupe its valid frames into locations,
    ///    resolving each new address to its covering mapping
    /// 3. Emit one sample per key with `[count, bytes]` and a "bytes"
    ///    label holding the bucket size
    ///
    /// Sample order follows map iteration order and is not stable.
    pub fn build(mut self, samples: &SampleMap) -> Profile {
        if self.profile.mapping.is_empty() {
            self.add_synthetic_mapping();
        }

        let mut location_ids: HashMap<usize, u64> = HashMap::new();
        self.profile.sample.reserve(samples.len());

        for (key, counters) in samples {
            let mut ids = Vec::with_capacity(key.num_locations());

            for &frame in key.frames() {
                let id = match location_ids.get(&frame) {
                    Some(&id) => id,
                    None => {
                        let id = self.profile.location.len() as u64 + 1;
                        let address = frame as u64;
                        let mapping_id = self.resolve_mapping(address);

                        self.profile.location.push(Location {
                            id,
                            mapping_id,
                            address,
                            ..Default::default()
                        });
                        location_ids.insert(frame, id);
                        id
                    }
                };
                ids.push(id);
            }

            self.profile.sample.push(Sample {
                location_id: ids,
                value: vec![counters.count, counters.bytes],
                label: vec![Label {
                    key: STR_BYTES,
                    num: key.bucket_bytes(),
                    ..Default::default()
                }],
            });
        }

        debug!(
            "Built profile: {} samples, {} locations, {} mappings, {} strings",
            self.profile.sample.len(),
            self.profile.location.len(),
            self.profile.mapping.len(),
            self.profile.string_table.len()
        );

        self.profile
    }
}
