//! Fetch command implementation.
//!
//! Pulls a profile from a running control endpoint and stores the
//! payload as received (gzip-compressed protobuf).

use super::models::FetchArgs;
use crate::client::ProfileClient;
use crate::output::{decode_profile, validate_path, write_payload};
use anyhow::{Context, Result};
use log::info;

/// Execute the fetch command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Endpoint unreachable or returning an error status
/// * Payload that does not decode as a profile
/// * File write errors
pub fn execute_fetch(args: FetchArgs) -> Result<()> {
    validate_path(&args.output).context("Invalid output path")?;

    let client = ProfileClient::new(&args.url).context("Failed to create HTTP client")?;
    let payload = client
        .fetch_raw(args.seconds)
        .with_context(|| format!("Failed to fetch profile from {}", args.url))?;

    // Refuse to store something pprof cannot open
    let profile = decode_profile(&payload).context("Endpoint returned an invalid profile")?;
    info!(
        "Received profile with {} samples ({} bytes)",
        profile.sample.len(),
        payload.len()
    );

    write_payload(&payload, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("✓ Profile written to: {}", args.output.display());

    Ok(())
}
