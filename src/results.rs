use std::time::Duration;

use crate::error::DirTreeError;
use crate::spec::PathSpec;

/// The output of a completed walk.
///
/// `paths` and `errors` are both opt-in. Enable them on the builder with
/// `.collect_paths(true)` and `.collect_errors(true)`.
#[derive(Debug)]
pub struct WalkResults {
    /// Number of entries handed to the visitor.
    pub visited: usize,

    /// Visited paths, in visiting order.
    /// Only populated if `.collect_paths(true)` was set on the builder.
    pub paths: Vec<PathSpec>,

    /// True if the walk ended because the limit was reached.
    pub stopped_early: bool,

    /// Traversal statistics.
    pub stats: WalkStats,

    /// Levels that could not be listed (missing, unreachable share, IO).
    /// Only populated if `.collect_errors(true)` was set on the builder.
    pub errors: Vec<DirTreeError>,
}

/// Statistics for a completed walk.
#[derive(Debug, Clone, Copy)]
pub struct WalkStats {
    /// Visited entries that were not directories.
    pub files: usize,

    /// Visited entries that were directories.
    pub dirs: usize,

    /// Listings opened successfully, counting both passes of each level.
    pub levels: usize,

    /// Listings that could not be opened.
    pub skipped_levels: usize,

    /// Wall-clock time from walk start to completion.
    pub duration: Duration,

    /// Visited entries per second, clamped to 0 on zero-duration runs.
    pub entries_per_sec: usize,
}

impl WalkStats {
    pub(crate) fn compute(
        files: usize,
        dirs: usize,
        levels: usize,
        skipped_levels: usize,
        duration: Duration,
    ) -> Self {
        let total = files + dirs;
        let eps = if duration.as_secs_f64() > 0.0 {
            (total as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            files,
            dirs,
            levels,
            skipped_levels,
            duration,
            entries_per_sec: eps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_has_zero_rate() {
        let stats = WalkStats::compute(3, 1, 2, 0, Duration::ZERO);
        assert_eq!(stats.entries_per_sec, 0);
    }

    #[test]
    fn rate_counts_files_and_dirs() {
        let stats = WalkStats::compute(6, 2, 4, 1, Duration::from_secs(2));
        assert_eq!(stats.entries_per_sec, 4);
        assert_eq!(stats.skipped_levels, 1);
    }
}
