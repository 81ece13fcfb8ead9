//! Summaries of built profiles.
//!
//! Hot samples are the call stacks that read the most bytes.
//! These are the primary targets when tuning buffer sizes.

use super::proto::Profile;
use chrono::{TimeZone, Utc};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Totals for one size bucket
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BucketStats {
    /// Upper bound of the bucket in bytes (a power of two)
    pub bucket_bytes: i64,
    pub reads: i64,
    pub bytes: i64,
}

/// One sample, ready for display
#[derive(Debug, Clone, Serialize)]
pub struct HotSample {
    /// Addresses, root first, separated by ';'
    pub stack: String,
    pub reads: i64,
    pub bytes: i64,
    pub bucket_bytes: i64,

    /// Share of all bytes read in the window
    pub percentage: f64,
}

/// Summary of a profile
///
/// **Public** - written as JSON and printed by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    /// Window start as RFC 3339
    pub captured_at: String,
    pub duration_ms: i64,
    pub total_reads: i64,
    pub total_bytes: i64,
    pub unique_samples: usize,
    pub locations: usize,
    pub mappings: usize,

    /// Ascending by bucket size
    pub buckets: Vec<BucketStats>,

    /// Descending by bytes
    pub top_samples: Vec<HotSample>,
}

impl ProfileSummary {
    /// Get human-readable one-line summary
    ///
    /// **Public** - for logging and CLI output
    pub fn summary(&self) -> String {
        format!(
            "Reads: {} | Bytes: {} | Samples: {} | Locations: {} | Window: {} ms",
            self.total_reads,
            self.total_bytes,
            self.unique_samples,
            self.locations,
            self.duration_ms
        )
    }

    /// Average bytes per read, 0 when nothing was read
    pub fn mean_read_size(&self) -> i64 {
        if self.total_reads > 0 {
            self.total_bytes / self.total_reads
        } else {
            0
        }
    }
}

/// Summarize a profile
///
/// **Public** - main entry point for summaries
///
/// # Arguments
/// * `profile` - Built or decoded profile
/// * `top_n` - Number of hot samples to keep
pub fn summarize(profile: &Profile, top_n: usize) -> ProfileSummary {
    debug!("Summarizing profile with {} samples", profile.sample.len());

    let mut buckets: BTreeMap<i64, BucketStats> = BTreeMap::new();
    let mut total_reads = 0i64;
    let mut total_bytes = 0i64;

    for sample in &profile.sample {
        let (reads, bytes) = sample_values(sample.value.as_slice());
        total_reads = total_reads.saturating_add(reads);
        total_bytes = total_bytes.saturating_add(bytes);

        let bucket_bytes = bucket_label(profile, sample);
        let entry = buckets.entry(bucket_bytes).or_insert(BucketStats {
            bucket_bytes,
            reads: 0,
            bytes: 0,
        });
        entry.reads = entry.reads.saturating_add(reads);
        entry.bytes = entry.bytes.saturating_add(bytes);
    }

    let addresses: HashMap<u64, u64> = profile
        .location
        .iter()
        .map(|l| (l.id, l.address))
        .collect();

    let mut hot: Vec<HotSample> = profile
        .sample
        .iter()
        .map(|sample| {
            let (reads, bytes) = sample_values(sample.value.as_slice());
            HotSample {
                stack: render_stack(&addresses, &sample.location_id),
                reads,
                bytes,
                bucket_bytes: bucket_label(profile, sample),
                percentage: percentage(bytes, total_bytes),
            }
        })
        .collect();
    hot.sort_by(|a, b| b.bytes.cmp(&a.bytes).then(b.reads.cmp(&a.reads)));
    hot.truncate(top_n);

    let captured_at = Utc
        .timestamp_nanos(profile.time_nanos)
        .to_rfc3339();

    ProfileSummary {
        captured_at,
        duration_ms: profile.duration_nanos / 1_000_000,
        total_reads,
        total_bytes,
        unique_samples: profile.sample.len(),
        locations: profile.location.len(),
        mappings: profile.mapping.len(),
        buckets: buckets.into_values().collect(),
        top_samples: hot,
    }
}

fn sample_values(values: &[i64]) -> (i64, i64) {
    (
        values.first().copied().unwrap_or(0),
        values.get(1).copied().unwrap_or(0),
    )
}

/// Value of the sample's "bytes" label, 0 if absent
fn bucket_label(profile: &Profile, sample: &super::proto::Sample) -> i64 {
    sample
        .label
        .iter()
        .find(|l| {
            usize::try_from(l.key)
                .ok()
                .and_then(|k| profile.string_table.get(k))
                .is_some_and(|s| s == "bytes")
        })
        .map_or(0, |l| l.num)
}

/// Render location ids as hex addresses, root first like collapsed stacks
fn render_stack(addresses: &HashMap<u64, u64>, location_ids: &[u64]) -> String {
    location_ids
        .iter()
        .rev()
        .map(|id| {
            addresses
                .get(id)
                .map_or_else(|| format!("loc#{}", id), |address| format!("{:#x}", address))
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn percentage(part: i64, total: i64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
