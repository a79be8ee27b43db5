//! # dirtree
//!
//! Path specs in the `volume:\directory\file.ext` grammar, and recursive
//! directory walks driven by them.
//!
//! [`PathSpec`] holds one validated path string and splits it into volume,
//! directory, stem and extension on demand. [`DirEnumerator`] is a cursor
//! over one directory level matching a wildcard pattern. The [`engine`]
//! walks a pattern across a whole tree, and [`walk()`] wraps it in a builder.
//! Listing itself goes through the [`Listing`] trait; [`FsListing`] is the
//! host filesystem.
//!
//! # Quick Start
//!
//! ```rust
//! use dirtree::PathSpec;
//!
//! let spec = PathSpec::new("c:\\projects\\dir.v2\\main.tar.gz").unwrap();
//! assert_eq!(spec.volume(), "c:");
//! assert_eq!(spec.directory(), "\\projects\\dir.v2\\");
//! assert_eq!(spec.stem(), "main.tar");
//! assert_eq!(spec.extension(), "gz");
//! assert!(spec.is_file());
//! ```
//!
//! Walking every `.rs` file below a directory:
//!
//! ```rust,no_run
//! let results = dirtree::walk("src\\*.rs")
//!     .subfolders(true)
//!     .collect_paths(true)
//!     .run()?;
//!
//! for path in &results.paths {
//!     println!("{path}");
//! }
//! # Ok::<(), dirtree::DirTreeError>(())
//! ```
//!
//! # Walk order
//!
//! Each level is read twice. The match pass lists the caller's pattern and
//! visits every entry it yields. The descend pass lists `*` in the same
//! directory and repeats the walk under each folder it finds, so folders
//! are discovered even when the pattern (say `*.cpp`) would not match them.
//! A level's matches are always visited before anything inside its
//! subfolders.

#![forbid(unsafe_code)]

pub mod engine;
pub mod name;

mod builder;
mod entry;
mod enumerator;
mod error;
mod fs;
mod results;
mod spec;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::WalkBuilder;
pub use engine::Mode;
pub use entry::{Attributes, DirEntry, EntryKind};
pub use enumerator::{CursorState, DirEnumerator};
pub use error::{DirTreeError, MalformedReason};
pub use fs::FsListing;
pub use results::{WalkResults, WalkStats};
pub use spec::{Components, PathSpec, DIRECTORY_SEPARATOR, EXTENSION_SEPARATOR, VOLUME_SEPARATOR};
pub use traits::{Listing, ListingCursor, RawEntry};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`WalkBuilder`] for `pattern`.
///
/// The pattern is parsed when the walk runs. Its final segment may hold
/// `*` and `?` wildcards.
///
/// # Example
///
/// ```rust,no_run
/// use dirtree::Mode;
///
/// let results = dirtree::walk("*.txt")
///     .mode(Mode::IncludeSubfolders)
///     .limit(100)
///     .run()
///     .unwrap();
///
/// println!("visited {} files in {:.3}s", results.visited, results.stats.duration.as_secs_f64());
/// ```
pub fn walk(pattern: impl Into<String>) -> WalkBuilder {
    WalkBuilder::new(pattern)
}
