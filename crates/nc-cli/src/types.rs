use std::path::PathBuf;

use nc_interpret::SkippedLine;

#[derive(Debug)]
pub struct ConvertSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
    pub skipped: Vec<SkippedLine>,
    pub state_out: Option<PathBuf>,
    pub nc_out: Option<PathBuf>,
    /// Set when the iteration limit stopped the conversion early.
    pub limit_exceeded: Option<LimitHit>,
}

#[derive(Debug, Clone, Copy)]
pub struct LimitHit {
    pub limit: usize,
    pub line_no: usize,
}

impl ConvertSummary {
    pub fn has_errors(&self) -> bool {
        self.limit_exceeded.is_some()
    }
}
