//! pprof profile encoding and file output.
//!
//! Profiles are written the way `go tool pprof` expects them:
//! protobuf-encoded and gzip-compressed.

use super::{create_parent_dirs, file_size, validate_path};
use crate::profile::Profile;
use crate::utils::error::OutputError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use prost::Message;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Encode a profile as uncompressed protobuf
pub fn encode_profile(profile: &Profile) -> Vec<u8> {
    profile.encode_to_vec()
}

/// Gzip-compress a byte buffer
///
/// # Errors
/// * `OutputError::WriteFailed` - compression stream failure
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, OutputError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes).map_err(OutputError::WriteFailed)?;
    encoder.finish().map_err(OutputError::WriteFailed)
}

/// Encode a profile as gzip-compressed protobuf, the transport format
///
/// **Public** - used by the control endpoint and `write_profile`
pub fn encode_compressed(profile: &Profile) -> Result<Vec<u8>, OutputError> {
    let encoded = encode_profile(profile);
    let compressed = compress(&encoded)?;
    debug!(
        "Encoded profile: {} bytes protobuf, {} bytes gzip",
        encoded.len(),
        compressed.len()
    );
    Ok(compressed)
}

/// Decode a profile from gzip-compressed or raw protobuf bytes
///
/// # Errors
/// * `OutputError::ReadFailed` - corrupt gzip stream
/// * `OutputError::DecodeFailed` - bytes are not a profile message
pub fn decode_profile(bytes: &[u8]) -> Result<Profile, OutputError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut decoded)
            .map_err(OutputError::ReadFailed)?;
        return Ok(Profile::decode(decoded.as_slice())?);
    }

    Ok(Profile::decode(bytes)?)
}

/// Write a profile to a `.pb.gz` file
///
/// **Public** - main entry point for profile output
///
/// # Arguments
/// * `profile` - Profile to write
/// * `output_path` - Destination file; parent directories are created
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let profile = profiler.stop()?;
/// write_profile(&profile, "reads.pb.gz")?;
/// ```
pub fn write_profile(profile: &Profile, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing profile to: {}", output_path.display());

    let payload = encode_compressed(profile)?;
    write_payload(&payload, output_path)
}

/// Write an already encoded profile payload as received from an endpoint
///
/// **Public** - used by `write_profile` and the `fetch` command
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_payload(payload: &[u8], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    validate_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(payload).map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Profile written successfully ({} bytes)",
        file_size(output_path)
    );

    Ok(())
}

/// Read a profile from a file written by `write_profile` or served by an endpoint
///
/// # Errors
/// * `OutputError::ReadFailed` - File read error
/// * `OutputError::DecodeFailed` - File is not a profile
pub fn read_profile(input_path: impl AsRef<Path>) -> Result<Profile, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading profile from: {}", input_path.display());

    let bytes = std::fs::read(input_path).map_err(OutputError::ReadFailed)?;
    let profile = decode_profile(&bytes)?;

    debug!(
        "Profile loaded: {} samples, {} locations",
        profile.sample.len(),
        profile.location.len()
    );

    Ok(profile)
}
