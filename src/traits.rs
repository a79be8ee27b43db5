use crate::entry::Attributes;
use crate::error::DirTreeError;
use crate::spec::PathSpec;

/// One record produced by a [`ListingCursor`]: a bare name plus attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub attributes: Attributes,
}

impl RawEntry {
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self { name: name.into(), attributes }
    }
}

/// The operating system's directory-listing capability.
///
/// Implement this to run enumerators and walks over something other than
/// the local filesystem (an archive, a test fixture, a remote share).
/// [`FsListing`](crate::FsListing) is the host implementation.
///
/// # Object Safety
///
/// `Listing` is object-safe. [`WalkBuilder`](crate::WalkBuilder) stores it as
/// `Box<dyn Listing>`, so `open()` returns `Box<dyn ListingCursor>` rather
/// than an associated type.
///
/// # Example
///
/// ```rust
/// use dirtree::{Attributes, DirTreeError, Listing, ListingCursor, PathSpec, RawEntry};
///
/// struct Flat(Vec<&'static str>);
///
/// struct Cursor(std::vec::IntoIter<RawEntry>);
///
/// impl ListingCursor for Cursor {
///     fn next_entry(&mut self) -> Option<RawEntry> { self.0.next() }
///     fn close(&mut self) {}
/// }
///
/// impl Listing for Flat {
///     fn open(&self, _pattern: &PathSpec) -> Result<Box<dyn ListingCursor>, DirTreeError> {
///         let entries: Vec<_> = self.0.iter()
///             .map(|n| RawEntry::new(*n, Attributes::file(0)))
///             .collect();
///         Ok(Box::new(Cursor(entries.into_iter())))
///     }
///     fn exists(&self, spec: &PathSpec) -> bool {
///         self.0.iter().any(|n| *n == spec.file())
///     }
/// }
/// ```
pub trait Listing {
    /// Open a listing of the entries matching `pattern`, whose final
    /// segment may hold wildcards. The pattern never ends in `\`.
    ///
    /// Fails with [`DirTreeError::NotFound`], [`DirTreeError::NetworkUnavailable`]
    /// or [`DirTreeError::Io`]. An existing directory with no matches may
    /// return either an empty cursor or `NotFound`.
    fn open(&self, pattern: &PathSpec) -> Result<Box<dyn ListingCursor>, DirTreeError>;

    /// Existence probe, independent of any open cursor.
    fn exists(&self, spec: &PathSpec) -> bool;
}

/// An open listing. Owned by exactly one enumerator.
pub trait ListingCursor {
    /// The next raw entry, or `None` at end of listing.
    fn next_entry(&mut self) -> Option<RawEntry>;

    /// Release the underlying resources. Must be idempotent.
    fn close(&mut self);
}
