//! Stable exit codes for the action binary.

/// Every planned command succeeded (or `plan` printed a plan).
pub const OK: i32 = 0;
/// A failure was reported to the CI host.
pub const FAILED: i32 = 1;
