//! Capture command implementation.
//!
//! The capture command:
//! 1. Opens a profiling window on a private profiler
//! 2. Reads every input file through a profiled reader
//! 3. Stops the window and builds the profile
//! 4. Writes output files

use super::models::CaptureArgs;
use super::utils::print_summary;
use crate::output::{write_profile, write_summary};
use crate::profile::summarize;
use crate::sampler::Profiler;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

/// Validate capture arguments before doing any work
///
/// **Public** - called from main.rs before `execute_capture`
pub fn validate_args(args: &CaptureArgs) -> Result<()> {
    if args.inputs.is_empty() {
        bail!("At least one input file is required");
    }
    if args.buffer_size == 0 {
        bail!("Buffer size must be greater than zero");
    }
    for input in &args.inputs {
        if !input.is_file() {
            bail!("Input is not a readable file: {}", input.display());
        }
    }
    Ok(())
}

/// Execute the capture command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input file open/read failures
/// * File write errors
pub fn execute_capture(args: CaptureArgs) -> Result<()> {
    let start_time = Instant::now();
    let profiler = Profiler::new();

    info!("Step 1/3: Profiling reads of {} input(s)...", args.inputs.len());
    profiler.start().context("Failed to start profiler")?;

    let mut total = 0u64;
    for input in &args.inputs {
        let read = read_profiled(&profiler, input, args.buffer_size)
            .with_context(|| format!("Failed to read {}", input.display()));
        match read {
            Ok(bytes) => total += bytes,
            Err(e) => {
                // Leave the profiler stopped before bailing out
                let _ = profiler.stop();
                return Err(e);
            }
        }
    }
    debug!("Read {} bytes in total", total);

    info!("Step 2/3: Building profile...");
    let profile = profiler.stop().context("Failed to stop profiler")?;
    let summary = summarize(&profile, args.top_samples);
    info!("{}", summary.summary());

    info!("Step 3/3: Writing output files...");
    write_profile(&profile, &args.output).context("Failed to write profile")?;
    info!("✓ Profile written to: {}", args.output.display());

    if let Some(json_path) = &args.output_json {
        write_summary(&summary, json_path).context("Failed to write JSON summary")?;
        info!("✓ Summary written to: {}", json_path.display());
    }

    if args.print_summary {
        print_summary(&summary);
    }

    info!(
        "Capture completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Read a whole file in `buffer_size` chunks through a profiled reader
///
/// **Private** - internal helper for execute_capture
fn read_profiled(profiler: &Profiler, path: &Path, buffer_size: usize) -> io::Result<u64> {
    let file = File::open(path)?;
    let mut reader = profiler.reader(file);
    let mut buf = vec![0u8; buffer_size];
    let mut total = 0u64;

    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => total += n as u64,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
