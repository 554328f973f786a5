//! Stable exit codes for the seeder and curator binaries.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config, unreadable input or other errors.
pub const INVALID: i32 = 1;
/// A scrape or curation run finished without collecting any records; nothing was written.
pub const EMPTY: i32 = 2;
