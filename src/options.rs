//! Ingestion limits and switches.

use crate::container::DEFAULT_MAX_PART_BYTES;

/// Default cap on accepted accounts per workbook.
pub const DEFAULT_MAX_ACCOUNTS: usize = 10_000;

/// Default maximum length of a sanitized account name.
pub const DEFAULT_MAX_NAME_CHARS: usize = 200;

/// Options for parsing a trial balance.
///
/// The defaults are the production limits; tests and tools can tighten or
/// relax them through the builder methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Stop accepting rows once this many accounts were accepted
    pub max_accounts: usize,

    /// Rows whose sanitized name is longer than this are dropped
    pub max_name_chars: usize,

    /// Largest decompressed size of any single archive part, or of a whole
    /// `.xls` compound file
    pub max_part_bytes: u64,

    /// Record why rows were dropped
    pub collect_diagnostics: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_accounts: DEFAULT_MAX_ACCOUNTS,
            max_name_chars: DEFAULT_MAX_NAME_CHARS,
            max_part_bytes: DEFAULT_MAX_PART_BYTES,
            collect_diagnostics: false,
        }
    }
}

impl ParseOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the account cap (at least 1).
    pub fn with_max_accounts(mut self, max: usize) -> Self {
        self.max_accounts = max.max(1);
        self
    }

    /// Set the maximum account name length.
    pub fn with_max_name_chars(mut self, max: usize) -> Self {
        self.max_name_chars = max;
        self
    }

    /// Set the per-part decompressed size limit (at least 1 KiB).
    pub fn with_max_part_bytes(mut self, max: u64) -> Self {
        self.max_part_bytes = max.max(1024);
        self
    }

    /// Enable skipped-row diagnostics.
    pub fn with_diagnostics(mut self, collect: bool) -> Self {
        self.collect_diagnostics = collect;
        self
    }
}
