//! JSON summary output writer.
//!
//! Writes profile summaries to JSON files with proper formatting.

use super::{create_parent_dirs, file_size, validate_path};
use crate::profile::ProfileSummary;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a profile summary to a JSON file
///
/// **Public** - used by the `capture` and `inspect` commands
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(
    summary: &ProfileSummary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());

    validate_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    // Serialize to JSON with pretty printing
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Summary written successfully ({} bytes)",
        file_size(output_path)
    );

    Ok(())
}

/// Read a summary back as a generic JSON value
///
/// **Public** - useful for tests and tooling that post-process summaries
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<serde_json::Value, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{summarize, ProfileBuilder};
    use crate::sampler::{Counters, SampleMap, StackKey};
    use chrono::Utc;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn create_test_summary() -> ProfileSummary {
        let mut samples = SampleMap::new();
        samples.insert(
            StackKey::new(&[0xabc, 0xdef], 512),
            Counters { count: 4, bytes: 2048 },
        );
        let profile = ProfileBuilder::new(Utc::now(), Duration::from_secs(2)).build(&samples);
        summarize(&profile, 5)
    }

    #[test]
    fn test_write_and_read_summary() {
        let temp_file = NamedTempFile::new().unwrap();
        write_summary(&create_test_summary(), temp_file.path()).unwrap();

        let value = read_summary(temp_file.path()).unwrap();
        assert_eq!(value["total_reads"], 4);
        assert_eq!(value["total_bytes"], 2048);
        assert_eq!(value["top_samples"][0]["stack"], "0xdef;0xabc");
        assert_eq!(value["buckets"][0]["bucket_bytes"], 512);
    }

    #[test]
    fn test_validate_output_path_empty() {
        let result = write_summary(&create_test_summary(), "");
        assert!(result.is_err());
    }
}
