//! Character-level rules for names in the `volume:\directory\file.ext` grammar.

/// Whether glob characters (`*`, `?`) are acceptable in a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcards {
    Allowed,
    Forbidden,
}

const RESERVED: &[char] = &['<', '>', '"', '|', '/', ':'];
const GLOB: &[char] = &['*', '?'];

fn is_legal(c: char, wildcards: Wildcards) -> bool {
    if c.is_ascii_control() || RESERVED.contains(&c) {
        return false;
    }
    wildcards == Wildcards::Allowed || !GLOB.contains(&c)
}

/// True if `name` is a legal single file name. Directory separators are
/// not allowed.
pub fn is_good_file_name(name: &str, wildcards: Wildcards) -> bool {
    name.chars().all(|c| c != '\\' && is_legal(c, wildcards))
}

/// True if `dir` is a legal directory span. Same rules as
/// [`is_good_file_name`] except that `\` separators may appear.
pub fn is_good_directory(dir: &str, wildcards: Wildcards) -> bool {
    dir.chars().all(|c| c == '\\' || is_legal(c, wildcards))
}

/// True if every character is printable ASCII (space through `~`).
///
/// Some programs refuse to open files whose names fall outside this range.
pub fn is_printable(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// True if any byte lies outside 7-bit ASCII.
pub fn is_extended_ascii(s: &str) -> bool {
    !s.is_ascii()
}
