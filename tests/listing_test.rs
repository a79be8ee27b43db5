use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use dirtree::engine;
use dirtree::{
    walk, Attributes, DirEnumerator, DirTreeError, Listing, ListingCursor, Mode, PathSpec,
    RawEntry,
};

// ---------------------------------------------------------------------------
// In-memory listing
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Counters {
    opened: Cell<usize>,
    closed: Cell<usize>,
    patterns: RefCell<Vec<String>>,
}

/// A directory tree keyed by `volume + directory` (e.g. `""`, `"src\\"`).
///
/// Every listing reports `.` and `..` first, like the host primitive does.
#[derive(Clone, Default)]
struct MemTree {
    dirs: BTreeMap<String, Vec<(String, Attributes)>>,
    unreachable: Vec<String>,
    counters: Rc<Counters>,
}

impl MemTree {
    fn file(mut self, dir: &str, name: &str) -> Self {
        self.dirs.entry(dir.into()).or_default().push((name.into(), Attributes::file(1)));
        self
    }

    fn folder(mut self, dir: &str, name: &str) -> Self {
        self.dirs.entry(dir.into()).or_default().push((name.into(), Attributes::dir()));
        self.dirs.entry(format!("{dir}{name}\\")).or_default();
        self
    }

    fn unreachable(mut self, dir: &str) -> Self {
        self.unreachable.push(dir.into());
        self
    }
}

struct MemCursor {
    entries: std::vec::IntoIter<RawEntry>,
    counters: Rc<Counters>,
    closed: bool,
}

impl ListingCursor for MemCursor {
    fn next_entry(&mut self) -> Option<RawEntry> {
        self.entries.next()
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.counters.closed.set(self.counters.closed.get() + 1);
        }
    }
}

impl Listing for MemTree {
    fn open(&self, pattern: &PathSpec) -> Result<Box<dyn ListingCursor>, DirTreeError> {
        self.counters.patterns.borrow_mut().push(pattern.to_string());
        let (volume, directory, file) = pattern.split3();
        let key = format!("{volume}{directory}");

        if self.unreachable.contains(&key) {
            return Err(DirTreeError::NetworkUnavailable(key.into()));
        }
        let Some(children) = self.dirs.get(&key) else {
            return Err(DirTreeError::NotFound(key.into()));
        };

        self.counters.opened.set(self.counters.opened.get() + 1);
        let mut entries = vec![
            RawEntry::new(".", Attributes::dir()),
            RawEntry::new("..", Attributes::dir()),
        ];
        entries.extend(
            children
                .iter()
                .filter(|(name, _)| wildcard(file, name))
                .map(|(name, attrs)| RawEntry::new(name.clone(), *attrs)),
        );
        Ok(Box::new(MemCursor {
            entries: entries.into_iter(),
            counters: Rc::clone(&self.counters),
            closed: false,
        }))
    }

    fn exists(&self, spec: &PathSpec) -> bool {
        let (volume, directory, file) = spec.split3();
        self.dirs
            .get(&format!("{volume}{directory}"))
            .is_some_and(|c| c.iter().any(|(n, _)| n == file))
    }
}

fn wildcard(pattern: &str, name: &str) -> bool {
    fn go(p: &[char], n: &[char]) -> bool {
        match (p.first(), n.first()) {
            (None, None) => true,
            (Some('*'), _) => go(&p[1..], n) || (!n.is_empty() && go(p, &n[1..])),
            (Some('?'), Some(_)) => go(&p[1..], &n[1..]),
            (Some(a), Some(b)) => a == b && go(&p[1..], &n[1..]),
            _ => false,
        }
    }
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();
    go(&p, &n)
}

/// ```text
/// main.cpp
/// readme.md
/// lib/
///   util.cpp
///   inner/
///     x.cpp
/// net/          (unreachable)
/// res/
///   icon.png
/// ```
fn sample_tree() -> MemTree {
    MemTree::default()
        .file("", "main.cpp")
        .file("", "readme.md")
        .folder("", "lib")
        .file("lib\\", "util.cpp")
        .folder("lib\\", "inner")
        .file("lib\\inner\\", "x.cpp")
        .folder("", "net")
        .unreachable("net\\")
        .folder("", "res")
        .file("res\\", "icon.png")
}

fn collect(tree: &MemTree, pattern: &str, mode: Mode) -> Vec<String> {
    let pattern = PathSpec::new(pattern).unwrap();
    let mut seen = Vec::new();
    engine::for_each(tree, &pattern, mode, |e| seen.push(e.spec.to_string()));
    seen
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn never_yields_dot_entries() {
    let tree = sample_tree();
    let seen = collect(&tree, "*", Mode::IncludeSubfolders);
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|s| !s.ends_with('.')));
}

#[test]
fn visits_every_match_once_in_order() {
    let tree = sample_tree();
    let seen = collect(&tree, "*.cpp", Mode::IncludeSubfolders);
    assert_eq!(seen, ["main.cpp", "lib\\util.cpp", "lib\\inner\\x.cpp"]);
}

#[test]
fn unreachable_share_does_not_abort_walk() {
    let tree = sample_tree();
    let results = walk("*")
        .listing(tree.clone())
        .subfolders(true)
        .collect_errors(true)
        .collect_paths(true)
        .run()
        .unwrap();

    let paths: Vec<_> = results.paths.iter().map(PathSpec::as_str).collect();
    assert!(paths.contains(&"res\\icon.png"), "walk continued past net\\");
    assert!(paths.contains(&"net"), "the share itself is still listed");
    assert_eq!(results.errors.len(), 2);
    assert!(results.errors.iter().all(DirTreeError::is_network));
}

#[test]
fn shallow_mode_opens_exactly_one_listing() {
    let tree = sample_tree();
    collect(&tree, "*.cpp", Mode::ShallowOnly);
    assert_eq!(tree.counters.patterns.borrow().as_slice(), ["*.cpp"]);
}

#[test]
fn deep_mode_reopens_each_level_with_full_wildcard() {
    let tree = sample_tree();
    collect(&tree, "lib\\*.cpp", Mode::IncludeSubfolders);
    assert_eq!(
        tree.counters.patterns.borrow().as_slice(),
        ["lib\\*.cpp", "lib\\*", "lib\\inner\\*.cpp", "lib\\inner\\*"]
    );
}

#[test]
fn every_opened_listing_is_closed_once() {
    let tree = sample_tree();
    collect(&tree, "*", Mode::IncludeSubfolders);
    assert!(tree.counters.opened.get() > 0);
    assert_eq!(tree.counters.opened.get(), tree.counters.closed.get());
}

#[test]
fn early_stop_still_releases_listings() {
    let tree = sample_tree();
    let results = walk("*.cpp")
        .listing(tree.clone())
        .subfolders(true)
        .limit(2)
        .collect_paths(true)
        .run()
        .unwrap();

    let paths: Vec<_> = results.paths.iter().map(PathSpec::as_str).collect();
    assert_eq!(paths, ["main.cpp", "lib\\util.cpp"]);
    assert_eq!(tree.counters.opened.get(), tree.counters.closed.get());
}

#[test]
fn enumerator_reports_network_failure() {
    let tree = sample_tree();
    let pattern = PathSpec::new("net\\*").unwrap();
    let it = DirEnumerator::open(&tree, &pattern);
    assert!(!it.has_current());
    assert!(!it.is_network_available());

    let missing = PathSpec::new("gone\\*").unwrap();
    let it = DirEnumerator::open(&tree, &missing);
    assert!(!it.has_current());
    assert!(it.is_network_available());
    assert!(matches!(it.open_error(), Some(DirTreeError::NotFound(_))));
}

#[test]
fn volume_is_kept_in_composed_entries() {
    let tree = MemTree::default().file("c:\\data\\", "log.txt");
    let seen = collect(&tree, "c:\\data\\*.txt", Mode::ShallowOnly);
    assert_eq!(seen, ["c:\\data\\log.txt"]);
    assert!(PathSpec::new("c:\\data\\log.txt").unwrap().exists_in(&tree));
}
