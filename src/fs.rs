use std::io;
use std::path::{Path, PathBuf};

use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use tracing::{debug, trace};

use crate::entry::{Attributes, EntryKind};
use crate::error::DirTreeError;
use crate::spec::PathSpec;
use crate::traits::{Listing, ListingCursor, RawEntry};

#[cfg(windows)]
const ERROR_BAD_NETPATH: i32 = 53;
#[cfg(windows)]
const ERROR_BAD_NET_NAME: i32 = 67;

// ---------------------------------------------------------------------------
// FsListing
// ---------------------------------------------------------------------------

/// [`Listing`] over the host filesystem.
///
/// Each open reads one directory level with `ignore`'s walker, keeping the
/// names that match the pattern's final segment. Matching is a
/// case-insensitive glob over `*` and `?`; `*.*` matches every name and
/// `*.` matches names without an extension.
/// Relative specs resolve against the root, if one was given, and against
/// the working directory otherwise.
#[derive(Debug, Clone, Default)]
pub struct FsListing {
    root: Option<PathBuf>,
}

impl FsListing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative specs against `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, spec: &PathSpec) -> Result<PathBuf, DirTreeError> {
        if cfg!(not(windows)) && !spec.volume().is_empty() {
            return Err(DirTreeError::NotFound(spec.to_native_path()));
        }
        let native = spec.to_native_path();
        Ok(match &self.root {
            Some(root) if !native.is_absolute() => root.join(native),
            _ => native,
        })
    }

    // Parent directory to list for a pattern, relative "" meaning ".".
    fn parent_dir(&self, pattern: &PathSpec) -> Result<PathBuf, DirTreeError> {
        let (volume, directory, _) = pattern.split3();
        let parent = PathSpec::from_parts(volume, directory, "")?;
        let dir = self.resolve(&parent)?;
        Ok(if dir.as_os_str().is_empty() { PathBuf::from(".") } else { dir })
    }
}

impl Listing for FsListing {
    fn open(&self, pattern: &PathSpec) -> Result<Box<dyn ListingCursor>, DirTreeError> {
        let segment = pattern.file();
        let parent = self.parent_dir(pattern)?;
        if segment.is_empty() {
            return Err(DirTreeError::NotFound(parent));
        }
        std::fs::metadata(&parent).map_err(|e| map_io_error(parent.clone(), e))?;
        let matcher = segment_matcher(&parent, segment)?;

        let mut builder = WalkBuilder::new(&parent);
        builder
            .standard_filters(false)
            .ignore(false)
            .parents(false)
            .hidden(false)
            .follow_links(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut entries = Vec::new();
        for res in builder.build() {
            let entry = res.map_err(map_ignore_error)?;
            if entry.depth() == 0 {
                continue;
            }
            let Some(ft) = entry.file_type() else { continue };
            let Some(name) = entry.file_name().to_str() else {
                debug!(name = ?entry.file_name(), "skipping non-UTF-8 entry name");
                continue;
            };

            let is_dir = ft.is_dir();
            if !matches(&matcher, segment, name, entry.path(), is_dir) {
                continue;
            }

            let kind = if is_dir {
                EntryKind::Dir
            } else if ft.is_file() {
                EntryKind::File
            } else if ft.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::Other
            };
            let size = match kind {
                EntryKind::Dir => 0,
                _ => entry.metadata().map(|m| m.len()).unwrap_or(0),
            };

            entries.push(RawEntry {
                name: name.to_owned(),
                attributes: Attributes { kind, size },
            });
        }

        trace!(parent = %parent.display(), pattern = segment, matched = entries.len(), "directory read");
        Ok(Box::new(FsCursor { entries: Some(entries.into_iter()) }))
    }

    fn exists(&self, spec: &PathSpec) -> bool {
        let spec = spec.without_trailing_separator();
        if spec.is_empty() {
            return false;
        }
        self.resolve(&spec)
            .map(|p| std::fs::symlink_metadata(p).is_ok())
            .unwrap_or(false)
    }
}

/// A snapshot of one directory level, handed out one entry at a time.
struct FsCursor {
    entries: Option<std::vec::IntoIter<RawEntry>>,
}

impl ListingCursor for FsCursor {
    fn next_entry(&mut self) -> Option<RawEntry> {
        self.entries.as_mut()?.next()
    }

    fn close(&mut self) {
        self.entries = None;
    }
}

// ---------------------------------------------------------------------------
// Segment matching
// ---------------------------------------------------------------------------

fn segment_matcher(parent: &Path, segment: &str) -> Result<Override, DirTreeError> {
    let mut builder = OverrideBuilder::new(parent);
    builder
        .case_insensitive(true)
        .map_err(|e| DirTreeError::InvalidPattern(e.to_string()))?;
    builder
        .add(&escape_segment(segment))
        .map_err(|e| DirTreeError::InvalidPattern(e.to_string()))?;
    builder
        .build()
        .map_err(|e| DirTreeError::InvalidPattern(e.to_string()))
}

// `*.*` matches every name and `*.` only names without a `.`.
fn matches(matcher: &Override, segment: &str, name: &str, path: &Path, is_dir: bool) -> bool {
    match segment {
        "*.*" => true,
        "*." => !name.contains('.'),
        _ => matcher.matched(path, is_dir).is_whitelist(),
    }
}

// Only `*` and `?` are wildcards in a segment. Everything the glob
// syntax would otherwise interpret is escaped, including trailing spaces,
// which a glob line would otherwise drop.
fn escape_segment(segment: &str) -> String {
    let trailing = segment.len() - segment.trim_end_matches(' ').len();
    let body_end = segment.chars().count() - trailing;
    let mut out = String::with_capacity(segment.len() + trailing + 2);
    for (i, c) in segment.chars().enumerate() {
        match c {
            ' ' if i >= body_end => out.push_str("\\ "),
            '[' | ']' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '!' | '#' if i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Map ignore::Error to DirTreeError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> DirTreeError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => map_io_error(path, io_err),
            other => DirTreeError::Io {
                path,
                source: io::Error::new(io::ErrorKind::Other, other.to_string()),
            },
        },
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::Io(io_err) => map_io_error(PathBuf::new(), io_err),
        other => DirTreeError::Io {
            path: PathBuf::new(),
            source: io::Error::new(io::ErrorKind::Other, other.to_string()),
        },
    }
}

fn map_io_error(path: PathBuf, err: io::Error) -> DirTreeError {
    if is_network_error(&err) {
        return DirTreeError::NetworkUnavailable(path);
    }
    match err.kind() {
        io::ErrorKind::NotFound => DirTreeError::NotFound(path),
        _ => DirTreeError::Io { path, source: err },
    }
}

#[cfg(windows)]
fn is_network_error(err: &io::Error) -> bool {
    matches!(err.raw_os_error(), Some(ERROR_BAD_NETPATH | ERROR_BAD_NET_NAME))
}

#[cfg(not(windows))]
fn is_network_error(_err: &io::Error) -> bool {
    false
}
