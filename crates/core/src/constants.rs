//! Shared constants for the agenda core.

/// Hours of the standard clinic day, in order: a morning block and an
/// afternoon block with a lunch gap from 11:00 to 13:00.
pub const CONSULTATION_HOURS: [u32; 9] = [7, 8, 9, 10, 13, 14, 15, 16, 17];

/// File name of a physician's slot ledger inside their data directory.
pub const LEDGER_FILE_NAME: &str = "slots.json";
