use tracing::{debug, trace};

use crate::entry::{Attributes, DirEntry};
use crate::error::DirTreeError;
use crate::spec::PathSpec;
use crate::traits::{Listing, ListingCursor, RawEntry};

// ---------------------------------------------------------------------------
// SearchHandle
// ---------------------------------------------------------------------------

/// Sole owner of an open listing. Closes it exactly once, on release or
/// on drop, whichever comes first.
struct SearchHandle(Option<Box<dyn ListingCursor>>);

impl SearchHandle {
    fn next(&mut self) -> Option<RawEntry> {
        self.0.as_mut()?.next_entry()
    }

    fn release(&mut self) {
        if let Some(mut cursor) = self.0.take() {
            cursor.close();
        }
    }

    fn is_open(&self) -> bool {
        self.0.is_some()
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.release();
    }
}

// ---------------------------------------------------------------------------
// DirEnumerator
// ---------------------------------------------------------------------------

/// Where a [`DirEnumerator`] cursor stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorState {
    /// Not yet opened. `open` always leaves the cursor positioned or
    /// exhausted, so callers never see this state.
    Uninitialized,
    /// Holding a valid entry.
    Positioned(DirEntry),
    /// No entry; the listing has been released.
    Exhausted,
}

/// A cursor over the entries of one directory level that match a pattern.
///
/// The cursor is positioned on the first match as soon as it is opened.
/// Entries named `.` and `..` are never surfaced. A pattern that cannot be
/// opened produces an exhausted cursor; [`open_error`](Self::open_error)
/// says why and [`is_network_available`](Self::is_network_available)
/// separates an unreachable share from a missing path.
///
/// ```rust,no_run
/// use dirtree::{DirEnumerator, FsListing, PathSpec};
///
/// let pattern = PathSpec::new("src\\*.rs")?;
/// let mut it = DirEnumerator::open(&FsListing::new(), &pattern);
/// while let Some(entry) = it.current() {
///     println!("{} ({} bytes)", entry.spec, entry.size());
///     it.advance();
/// }
/// # Ok::<(), dirtree::DirTreeError>(())
/// ```
pub struct DirEnumerator {
    handle: SearchHandle,
    state: CursorState,
    volume: String,
    directory: String,
    network_available: bool,
    error: Option<DirTreeError>,
}

impl DirEnumerator {
    /// Open `pattern` through `listing` and position on the first entry.
    pub fn open(listing: &dyn Listing, pattern: &PathSpec) -> Self {
        let pattern = pattern.without_trailing_separator();
        let (volume, directory, _) = pattern.split3();

        let mut this = Self {
            handle: SearchHandle(None),
            state: CursorState::Uninitialized,
            volume: volume.to_owned(),
            directory: directory.to_owned(),
            network_available: true,
            error: None,
        };

        match listing.open(&pattern) {
            Ok(cursor) => {
                trace!(pattern = %pattern, "listing opened");
                this.handle = SearchHandle(Some(cursor));
                this.step();
            }
            Err(err) => {
                debug!(pattern = %pattern, network = err.is_network(), error = %err, "listing unavailable");
                this.network_available = !err.is_network();
                this.error = Some(err);
                this.state = CursorState::Exhausted;
            }
        }
        this
    }

    pub fn has_current(&self) -> bool {
        matches!(self.state, CursorState::Positioned(_))
    }

    /// The entry under the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<&DirEntry> {
        match &self.state {
            CursorState::Positioned(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn current_attributes(&self) -> Option<Attributes> {
        self.current().map(|e| e.attributes)
    }

    /// Move to the next match. Returns whether the cursor is still positioned.
    /// A no-op once exhausted.
    pub fn advance(&mut self) -> bool {
        if self.has_current() {
            self.step();
        }
        self.has_current()
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// False if the open failed because a network share was unreachable.
    pub fn is_network_available(&self) -> bool {
        self.network_available
    }

    /// Why the listing could not be opened, if it could not.
    pub fn open_error(&self) -> Option<&DirTreeError> {
        self.error.as_ref()
    }

    pub fn take_open_error(&mut self) -> Option<DirTreeError> {
        self.error.take()
    }

    /// True while the underlying listing is still held.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    // Pull raw entries until one is presentable or the listing ends.
    fn step(&mut self) {
        loop {
            let Some(raw) = self.handle.next() else {
                trace!(directory = %self.directory, "listing exhausted");
                self.handle.release();
                self.state = CursorState::Exhausted;
                return;
            };

            if raw.name == "." || raw.name == ".." {
                continue;
            }

            match PathSpec::from_parts(&self.volume, &self.directory, &raw.name) {
                Ok(spec) => {
                    trace!(entry = %spec, "cursor positioned");
                    self.state = CursorState::Positioned(DirEntry {
                        spec,
                        name: raw.name,
                        attributes: raw.attributes,
                    });
                    return;
                }
                Err(err) => {
                    debug!(name = %raw.name, error = %err, "skipping unrepresentable entry");
                }
            }
        }
    }
}

impl Iterator for DirEnumerator {
    type Item = DirEntry;

    /// Yield the current entry and advance past it.
    fn next(&mut self) -> Option<DirEntry> {
        match std::mem::replace(&mut self.state, CursorState::Uninitialized) {
            CursorState::Positioned(entry) => {
                self.step();
                Some(entry)
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}
