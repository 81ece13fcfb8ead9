//! Inspect command implementation.
//!
//! Decodes a profile file and prints (or writes) its summary.

use super::models::InspectArgs;
use super::utils::print_summary;
use crate::output::{read_profile, write_summary};
use crate::profile::{summarize, ProfileSummary};
use anyhow::{Context, Result};
use log::info;

/// Execute the inspect command
///
/// **Public** - main entry point called from main.rs
pub fn execute_inspect(args: InspectArgs) -> Result<ProfileSummary> {
    println!("Inspecting profile: {}", args.file.display());

    let profile = read_profile(&args.file)
        .with_context(|| format!("Failed to read profile {}", args.file.display()))?;
    let summary = summarize(&profile, args.top_samples);

    println!("✓ Valid read profile");
    println!("  Mappings:  {}", summary.mappings);
    println!("  Locations: {}", summary.locations);
    println!("  Strings:   {}", profile.string_table.len());

    if let Some(json_path) = &args.output_json {
        write_summary(&summary, json_path).context("Failed to write JSON summary")?;
        info!("✓ Summary written to: {}", json_path.display());
    }

    print_summary(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::write_profile;
    use crate::profile::ProfileBuilder;
    use crate::sampler::{Counters, SampleMap, StackKey};
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_inspect_reports_totals() {
        let mut samples = SampleMap::new();
        samples.insert(StackKey::new(&[0x10, 0x20], 64), Counters { count: 5, bytes: 320 });
        let profile = ProfileBuilder::new(Utc::now(), Duration::from_secs(1)).build(&samples);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.pb.gz");
        write_profile(&profile, &path).unwrap();

        let summary = execute_inspect(InspectArgs {
            file: path,
            top_samples: 3,
            output_json: None,
        })
        .unwrap();

        assert_eq!(summary.total_reads, 5);
        assert_eq!(summary.total_bytes, 320);
    }

    #[test]
    fn test_inspect_missing_file_fails() {
        let result = execute_inspect(InspectArgs {
            file: "/nonexistent/reads.pb.gz".into(),
            top_samples: 3,
            output_json: None,
        });
        assert!(result.is_err());
    }
}
