//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod capture;
pub mod fetch;
pub mod inspect;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use capture::{execute_capture, validate_args};
pub use fetch::execute_fetch;
pub use inspect::execute_inspect;
pub use models::{CaptureArgs, FetchArgs, InspectArgs};
pub use utils::{display_version, print_summary};
