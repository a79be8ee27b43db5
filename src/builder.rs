use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;

use crate::engine::{Mode, Tally, Walker};
use crate::entry::DirEntry;
use crate::error::DirTreeError;
use crate::fs::FsListing;
use crate::results::{WalkResults, WalkStats};
use crate::spec::PathSpec;
use crate::traits::Listing;

// ---------------------------------------------------------------------------
// WalkBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and running a walk.
///
/// Created via [`dirtree::walk()`](crate::walk). Configure with chained
/// builder methods, then call [`run()`](WalkBuilder::run) or
/// [`for_each()`](WalkBuilder::for_each).
///
/// # Example
///
/// ```rust,ignore
/// let results = dirtree::walk("src\\*.rs")
///     .subfolders(true)
///     .root(project_dir)
///     .collect_paths(true)
///     .run()?;
/// ```
pub struct WalkBuilder {
    pattern:        String,
    mode:           Mode,
    listing:        Option<Box<dyn Listing>>,
    limit:          Option<usize>,
    collect_paths:  bool,
    collect_errors: bool,
}

impl WalkBuilder {
    pub(crate) fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern:        pattern.into(),
            mode:           Mode::default(),
            listing:        None,
            limit:          None,
            collect_paths:  false,
            collect_errors: false,
        }
    }

    // ── Depth ─────────────────────────────────────────────────────────────

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `.mode(Mode::IncludeSubfolders)` / `.mode(Mode::ShallowOnly)`.
    pub fn subfolders(self, yes: bool) -> Self {
        self.mode(if yes { Mode::IncludeSubfolders } else { Mode::ShallowOnly })
    }

    // ── Listing ───────────────────────────────────────────────────────────

    /// Set the directory-listing backend.
    ///
    /// Defaults to [`FsListing::new()`], the host filesystem relative to the
    /// working directory.
    pub fn listing(mut self, l: impl Listing + 'static) -> Self {
        self.listing = Some(Box::new(l));
        self
    }

    /// Resolve relative patterns against `dir` on the host filesystem.
    ///
    /// Equivalent to `.listing(FsListing::rooted(dir))`.
    pub fn root(self, dir: impl Into<PathBuf>) -> Self {
        self.listing(FsListing::rooted(dir))
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Stop after `n` visited entries.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Collect visited paths into [`WalkResults::paths`].
    pub fn collect_paths(mut self, yes: bool) -> Self {
        self.collect_paths = yes;
        self
    }

    /// Collect listing failures into [`WalkResults::errors`].
    ///
    /// Failures never stop the walk; without this they are only logged.
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.collect_errors = yes;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Run the walk and return its results.
    ///
    /// # Errors
    ///
    /// Returns `Err` only if the pattern is malformed. Levels that cannot be
    /// listed are skipped and, with `.collect_errors(true)`, reported in
    /// [`WalkResults::errors`].
    pub fn run(self) -> Result<WalkResults, DirTreeError> {
        self.for_each(|_| {})
    }

    /// Run the walk, calling `visitor` for every visited entry in order.
    pub fn for_each<F>(self, mut visitor: F) -> Result<WalkResults, DirTreeError>
    where
        F: FnMut(&DirEntry),
    {
        let pattern = PathSpec::new(self.pattern)?;
        let listing: Box<dyn Listing> = match self.listing {
            Some(l) => l,
            None    => Box::new(FsListing::new()),
        };

        let limit          = self.limit;
        let collect_paths  = self.collect_paths;
        let mut visited    = 0usize;
        let mut paths      = Vec::new();
        let mut errors     = Vec::new();

        let start = Instant::now();

        let (tally, stopped) = if limit == Some(0) {
            (Tally::default(), true)
        } else {
            let mut visit = |entry: &DirEntry| -> ControlFlow<()> {
                visited += 1;
                if collect_paths {
                    paths.push(entry.spec.clone());
                }
                visitor(entry);
                match limit {
                    Some(lim) if visited >= lim => ControlFlow::Break(()),
                    _ => ControlFlow::Continue(()),
                }
            };

            let mut walker = Walker::new(listing.as_ref(), self.mode, &mut visit);
            if self.collect_errors {
                walker = walker.collect_errors(&mut errors);
            }
            let stopped = walker.walk(&pattern, 0).is_break();
            (walker.tally, stopped)
        };

        let duration = start.elapsed();
        debug!(pattern = %pattern, visited, stopped, "walk finished");

        Ok(WalkResults {
            visited,
            paths,
            stopped_early: stopped,
            stats: WalkStats::compute(
                tally.files,
                tally.dirs,
                tally.levels,
                tally.skipped_levels,
                duration,
            ),
            errors,
        })
    }
}
