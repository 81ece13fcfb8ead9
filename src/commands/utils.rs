use crate::profile::ProfileSummary;
use crate::utils::config::PROFILE_ENDPOINT_PATH;

/// Print a summary table to stdout
pub fn print_summary(summary: &ProfileSummary) {
    println!("\n{}", "=".repeat(80));
    println!("READ PROFILE SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Captured at:   {}", summary.captured_at);
    println!("Window:        {} ms", summary.duration_ms);
    println!("Reads:         {}", summary.total_reads);
    println!("Bytes:         {}", summary.total_bytes);
    println!("Mean read:     {} bytes", summary.mean_read_size());
    println!("Unique stacks: {}", summary.unique_samples);

    if !summary.buckets.is_empty() {
        println!("\n  {:>14} {:>12} {:>16}", "BUCKET (<=B)", "READS", "BYTES");
        for bucket in &summary.buckets {
            println!(
                "  {:>14} {:>12} {:>16}",
                bucket.bucket_bytes, bucket.reads, bucket.bytes
            );
        }
    }

    if !summary.top_samples.is_empty() {
        println!("\n  HOT STACKS (most bytes first)");
        for (i, sample) in summary.top_samples.iter().enumerate() {
            println!(
                "  {:>3}. {:>6.1}% {:>10} reads {:>14} bytes  <= {} B",
                i + 1,
                sample.percentage,
                sample.reads,
                sample.bytes,
                sample.bucket_bytes
            );
            println!("       {}", sample.stack);
        }
    }

    println!("{}", "=".repeat(80));
}

/// Display version information
pub fn display_version() {
    println!("readprof v{}", env!("CARGO_PKG_VERSION"));
    println!("Endpoint path: {}", PROFILE_ENDPOINT_PATH);
    println!();
    println!("An in-process sampling profiler for read operations.");
}
