//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: The server failed while running
//! - 2: Invalid configuration, nothing was started

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// The server started but failed
pub const EXIT_WARNING: i32 = 1;

/// Configuration errors
pub const EXIT_ERROR: i32 = 2;
