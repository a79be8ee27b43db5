use std::ops::ControlFlow;

use tracing::{debug, debug_span};

use crate::entry::DirEntry;
use crate::enumerator::DirEnumerator;
use crate::error::DirTreeError;
use crate::spec::PathSpec;
use crate::traits::Listing;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// How far a walk reaches below the pattern's own directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Only the pattern's own level.
    #[default]
    ShallowOnly,
    /// The pattern's level, then the same pattern under every subfolder.
    IncludeSubfolders,
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Per-walk counters, filled in as levels are read.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Tally {
    pub files: usize,
    pub dirs: usize,
    pub levels: usize,
    pub skipped_levels: usize,
}

/// State shared by every level of one walk.
pub(crate) struct Walker<'a> {
    listing: &'a dyn Listing,
    mode: Mode,
    visitor: &'a mut dyn FnMut(&DirEntry) -> ControlFlow<()>,
    errors: Option<&'a mut Vec<DirTreeError>>,
    pub tally: Tally,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        listing: &'a dyn Listing,
        mode: Mode,
        visitor: &'a mut dyn FnMut(&DirEntry) -> ControlFlow<()>,
    ) -> Self {
        Self { listing, mode, visitor, errors: None, tally: Tally::default() }
    }

    /// Record enumeration failures into `errors` instead of only logging them.
    pub(crate) fn collect_errors(mut self, errors: &'a mut Vec<DirTreeError>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Visit every entry matching `pattern`, then, when descending, repeat
    /// under each subfolder of the pattern's directory. Depth-first; a
    /// level's own matches come before anything inside its subfolders.
    ///
    /// There is no depth limit and no cycle detection. Links are listed but
    /// never reported as directories, so the host listing cannot loop.
    pub(crate) fn walk(&mut self, pattern: &PathSpec, depth: usize) -> ControlFlow<()> {
        let span = debug_span!("walk_level", pattern = %pattern, depth);
        let _enter = span.enter();

        // Match pass: the caller's filter, no regard for the directory flag.
        let mut matched = DirEnumerator::open(self.listing, pattern);
        self.note_open(&mut matched);
        for entry in matched.by_ref() {
            if entry.is_dir() {
                self.tally.dirs += 1;
            } else {
                self.tally.files += 1;
            }
            (self.visitor)(&entry)?;
        }
        drop(matched);

        if self.mode == Mode::ShallowOnly {
            return ControlFlow::Continue(());
        }

        // Descend pass: every folder at this level, whatever the filter.
        let (volume, directory, file) = pattern.split3();
        let everything = match PathSpec::from_parts(volume, directory, "*") {
            Ok(spec) => spec,
            Err(err) => {
                self.record(err);
                return ControlFlow::Continue(());
            }
        };

        let mut folders = DirEnumerator::open(self.listing, &everything);
        self.note_open(&mut folders);
        for entry in folders.by_ref() {
            if !entry.is_dir() {
                continue;
            }
            let child_dir = format!("{directory}{}", entry.name);
            match PathSpec::from_parts(volume, &child_dir, file) {
                Ok(child) => self.walk(&child, depth + 1)?,
                Err(err) => self.record(err),
            }
        }
        ControlFlow::Continue(())
    }

    fn note_open(&mut self, it: &mut DirEnumerator) {
        match it.take_open_error() {
            Some(err) => {
                self.tally.skipped_levels += 1;
                self.record(err);
            }
            None => self.tally.levels += 1,
        }
    }

    fn record(&mut self, err: DirTreeError) {
        debug!(error = %err, network = err.is_network(), "level skipped");
        if let Some(errors) = self.errors.as_mut() {
            errors.push(err);
        }
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Call `visitor` for every entry matching `pattern`, descending into
/// subfolders when `mode` asks for it.
///
/// Levels that cannot be listed contribute nothing and never stop the walk.
///
/// ```rust,no_run
/// use dirtree::{engine, FsListing, Mode, PathSpec};
///
/// let pattern = PathSpec::new("src\\*.rs")?;
/// engine::for_each(&FsListing::new(), &pattern, Mode::IncludeSubfolders, |entry| {
///     println!("{}", entry.spec);
/// });
/// # Ok::<(), dirtree::DirTreeError>(())
/// ```
pub fn for_each<F>(listing: &dyn Listing, pattern: &PathSpec, mode: Mode, mut visitor: F)
where
    F: FnMut(&DirEntry),
{
    let mut visit = |entry: &DirEntry| -> ControlFlow<()> {
        visitor(entry);
        ControlFlow::Continue(())
    };
    let _ = Walker::new(listing, mode, &mut visit).walk(pattern, 0);
}

/// Like [`for_each`], but `visitor` may stop the walk by returning
/// [`ControlFlow::Break`]. Returns `Break` if it did.
pub fn try_for_each<F>(
    listing: &dyn Listing,
    pattern: &PathSpec,
    mode: Mode,
    mut visitor: F,
) -> ControlFlow<()>
where
    F: FnMut(&DirEntry) -> ControlFlow<()>,
{
    Walker::new(listing, mode, &mut visitor).walk(pattern, 0)
}
