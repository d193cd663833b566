//! Stable exit codes for the gittyup CLI.

/// Exit was chosen, or a one-shot action completed or had nothing to do.
pub const OK: i32 = 0;
/// Invalid settings or arguments, or the terminal could not be prompted.
pub const INVALID: i32 = 1;
/// A one-shot action hit a backend failure.
pub const FAILED: i32 = 2;
