use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{DirTreeError, MalformedReason};
use crate::name::{self, Wildcards};

/// Separates the drive letter from the rest of the path (`C:`).
pub const VOLUME_SEPARATOR: char = ':';
/// Separates directory segments.
pub const DIRECTORY_SEPARATOR: char = '\\';
/// Separates a file stem from its extension.
pub const EXTENSION_SEPARATOR: char = '.';

// ---------------------------------------------------------------------------
// PathSpec
// ---------------------------------------------------------------------------

/// A validated path string in the `volume:\directory\file.ext` grammar.
///
/// Only the full text is stored. The volume, directory, stem and extension
/// are byte spans recomputed on demand by a single scan:
///
/// ```text
/// text                  volume  directory   stem     extension
/// "a:"                  a:
/// "a:\file"             a:      \           file
/// "..\..\dir\"                  ..\..\dir\
/// "..\..\file"                  ..\..\      file
/// "dir.ext\file.ext"            dir.ext\    file     ext
/// "file.ex.longext"                         file.ex  longext
/// ```
///
/// Every constructor validates. A `PathSpec` that exists is well formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathSpec {
    text: String,
}

/// The four contiguous pieces of a [`PathSpec`], borrowed from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Components<'a> {
    pub volume: &'a str,
    pub directory: &'a str,
    pub stem: &'a str,
    pub extension: &'a str,
    /// True if an extension separator was present, even with an empty
    /// extension (`"file."`).
    pub has_extension_separator: bool,
}

impl Components<'_> {
    /// Reassemble the pieces, emitting the extension separator only if one
    /// was present in the source text.
    pub fn compose(&self) -> String {
        let mut out = String::with_capacity(
            self.volume.len() + self.directory.len() + self.stem.len() + self.extension.len() + 1,
        );
        out.push_str(self.volume);
        out.push_str(self.directory);
        out.push_str(self.stem);
        if self.has_extension_separator {
            out.push(EXTENSION_SEPARATOR);
        }
        out.push_str(self.extension);
        out
    }
}

/// Byte offsets of the landmarks found by [`scan`].
#[derive(Debug, Clone, Copy)]
struct Spans {
    volume_end: usize,
    directory_end: usize,
    stem_end: usize,
    extension_start: usize,
}

// Volume: first two chars iff the second is ':'.
// Directory: through the last '\'.
// Extension: after the last '.', but only if it follows the last '\'.
fn scan(text: &str) -> Spans {
    let bytes = text.as_bytes();
    let volume_end = if bytes.get(1) == Some(&(VOLUME_SEPARATOR as u8)) { 2 } else { 0 };

    let last_dir = text.rfind(DIRECTORY_SEPARATOR);
    let directory_end = last_dir.map_or(volume_end, |i| (i + 1).max(volume_end));

    let ext_sep = text
        .rfind(EXTENSION_SEPARATOR)
        .filter(|&i| last_dir.map_or(true, |d| i > d))
        .filter(|&i| i >= directory_end);

    match ext_sep {
        Some(i) => Spans { volume_end, directory_end, stem_end: i, extension_start: i + 1 },
        None => Spans {
            volume_end,
            directory_end,
            stem_end: text.len(),
            extension_start: text.len(),
        },
    }
}

fn validate(text: &str) -> Result<(), DirTreeError> {
    let parts = split(text);

    if !parts.volume.is_empty() {
        let mut chars = parts.volume.chars();
        let letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let sep = chars.next() == Some(VOLUME_SEPARATOR);
        if parts.volume.len() != 2 || !letter || !sep {
            return Err(DirTreeError::malformed(text, MalformedReason::Volume));
        }
    }

    if !name::is_good_directory(parts.directory, Wildcards::Allowed) {
        return Err(DirTreeError::malformed(text, MalformedReason::Directory));
    }

    let file = &text[parts.volume.len() + parts.directory.len()..];
    if !name::is_good_file_name(file, Wildcards::Allowed) {
        return Err(DirTreeError::malformed(text, MalformedReason::File));
    }

    if parts.compose() != text {
        return Err(DirTreeError::malformed(text, MalformedReason::Reassembly));
    }
    Ok(())
}

fn split(text: &str) -> Components<'_> {
    let s = scan(text);
    Components {
        volume: &text[..s.volume_end],
        directory: &text[s.volume_end..s.directory_end],
        stem: &text[s.directory_end..s.stem_end],
        extension: &text[s.extension_start..],
        has_extension_separator: s.extension_start != s.stem_end,
    }
}

impl PathSpec {
    /// Parse and validate a full path string.
    pub fn new(text: impl Into<String>) -> Result<Self, DirTreeError> {
        let text = text.into();
        validate(&text)?;
        Ok(Self { text })
    }

    /// Build from a volume, directory and file name. A `\` is inserted
    /// after `directory` unless it already ends in one.
    pub fn from_parts(volume: &str, directory: &str, file: &str) -> Result<Self, DirTreeError> {
        let mut text = String::with_capacity(volume.len() + directory.len() + file.len() + 1);
        text.push_str(volume);
        push_directory(&mut text, directory);
        text.push_str(file);
        Self::new(text)
    }

    /// Build from a volume, directory, stem and extension. A `.` is
    /// inserted before a non-empty `extension` unless it already starts
    /// with one.
    pub fn from_parts_with_extension(
        volume: &str,
        directory: &str,
        stem: &str,
        extension: &str,
    ) -> Result<Self, DirTreeError> {
        let mut text = String::with_capacity(
            volume.len() + directory.len() + stem.len() + extension.len() + 2,
        );
        text.push_str(volume);
        push_directory(&mut text, directory);
        text.push_str(stem);
        if !extension.is_empty() && !extension.starts_with(EXTENSION_SEPARATOR) {
            text.push(EXTENSION_SEPARATOR);
        }
        text.push_str(extension);
        Self::new(text)
    }

    /// Convert a host path, mapping `/` to `\`.
    pub fn from_path(path: &Path) -> Result<Self, DirTreeError> {
        let text = path.to_string_lossy().replace('/', "\\");
        Self::new(text)
    }

    /// Replace the contents. On failure `self` keeps its previous value.
    pub fn assign(&mut self, text: impl Into<String>) -> Result<(), DirTreeError> {
        *self = Self::new(text)?;
        Ok(())
    }

    pub fn assign_spec(&mut self, other: &PathSpec) {
        self.text.clone_from(&other.text);
    }

    // ── Projections ──────────────────────────────────────────────────────

    pub fn components(&self) -> Components<'_> {
        split(&self.text)
    }

    /// `(volume, directory, file)` where file includes the extension.
    pub fn split3(&self) -> (&str, &str, &str) {
        let c = self.components();
        let file = &self.text[c.volume.len() + c.directory.len()..];
        (c.volume, c.directory, file)
    }

    /// `(volume, directory, stem, extension)`.
    pub fn split4(&self) -> (&str, &str, &str, &str) {
        let c = self.components();
        (c.volume, c.directory, c.stem, c.extension)
    }

    pub fn volume(&self) -> &str {
        self.components().volume
    }

    pub fn directory(&self) -> &str {
        self.components().directory
    }

    /// Stem plus extension, including the separator.
    pub fn file(&self) -> &str {
        self.split3().2
    }

    pub fn stem(&self) -> &str {
        self.components().stem
    }

    /// Extension without its leading `.`.
    pub fn extension(&self) -> &str {
        self.components().extension
    }

    pub fn full_path(&self) -> &str {
        &self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    // ── Classification ───────────────────────────────────────────────────

    /// Directory-like: no stem or extension, but a volume or directory.
    pub fn is_folder(&self) -> bool {
        let c = self.components();
        c.stem.is_empty()
            && c.extension.is_empty()
            && (!c.volume.is_empty() || !c.directory.is_empty())
    }

    /// File-like: has a non-empty stem.
    pub fn is_file(&self) -> bool {
        !self.components().stem.is_empty()
    }

    pub fn is_printable(&self) -> bool {
        name::is_printable(&self.text)
    }

    pub fn is_extended_ascii(&self) -> bool {
        name::is_extended_ascii(&self.text)
    }

    /// Existence probe through `listing`, independent of any enumeration.
    pub fn exists_in(&self, listing: &dyn crate::traits::Listing) -> bool {
        listing.exists(self)
    }

    /// Host path with `\` mapped to the platform separator.
    pub fn to_native_path(&self) -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(&self.text)
        } else {
            PathBuf::from(self.text.replace(DIRECTORY_SEPARATOR, "/"))
        }
    }

    /// Copy with one trailing `\` removed, if present.
    pub(crate) fn without_trailing_separator(&self) -> PathSpec {
        match self.text.strip_suffix(DIRECTORY_SEPARATOR) {
            // The last directory segment moves into the file span and holds no
            // separator, so revalidation cannot fail.
            Some(trimmed) => PathSpec::new(trimmed).unwrap_or_else(|_| self.clone()),
            None => self.clone(),
        }
    }
}

fn push_directory(text: &mut String, directory: &str) {
    text.push_str(directory);
    if !directory.is_empty() && !directory.ends_with(DIRECTORY_SEPARATOR) {
        text.push(DIRECTORY_SEPARATOR);
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for PathSpec {
    type Err = DirTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for PathSpec {
    type Error = DirTreeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<String> for PathSpec {
    type Error = DirTreeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for PathSpec {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
