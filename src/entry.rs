use crate::spec::PathSpec;

/// The entry under a [`DirEnumerator`](crate::DirEnumerator) cursor.
///
/// Rebuilt every time the cursor moves. `spec` is the composite path
/// `volume + directory + name`, where volume and directory come from the
/// pattern the enumerator was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path of the entry.
    pub spec: PathSpec,

    /// Bare entry name as reported by the listing.
    pub name: String,

    /// Attributes read from the listing record.
    pub attributes: Attributes,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.attributes.is_dir()
    }

    pub fn size(&self) -> u64 {
        self.attributes.size
    }
}

/// Directory flag and size, taken straight from the enumeration record
/// rather than a second filesystem query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes {
    pub kind: EntryKind,

    /// Size in bytes. Zero for directories.
    pub size: u64,
}

impl Attributes {
    pub fn file(size: u64) -> Self {
        Self { kind: EntryKind::File, size }
    }

    pub fn dir() -> Self {
        Self { kind: EntryKind::Dir, size: 0 }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// The kind of a listed entry.
///
/// Symlinks are reported as themselves and never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    /// A regular file.
    #[default]
    File,

    /// A directory.
    Dir,

    /// A symbolic link.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}
