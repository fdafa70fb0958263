//! Ranked directory history.
//!
//! Maps a key (the final component of a directory path) to the set of full
//! paths recorded under it. Ranking is never stored: every read sorts a key's
//! entries by `last_accessed`, newest first. Within a key the entries are kept
//! in mutation order (least recently touched first), which breaks same-second
//! ties in favour of the entry touched last.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ignore::IgnoreFilter;

/// Returned by [`HistoryStore::resolve`] when a key has no recorded path.
pub const CURRENT_DIR: &str = ".";

/// One recorded directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub path: String,
    /// Unix timestamp (seconds) of the last visit or promotion.
    pub last_accessed: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// First visit under this key.
    Recorded,
    /// Existing entry's access time was bumped.
    Refreshed,
    /// Path matches an ignore pattern; nothing was recorded.
    Ignored,
}

/// Current wall-clock time as unix seconds.
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Returns the key a path is stored under: its final component.
///
/// Paths without one (the filesystem root, `..`-terminated paths) are their
/// own key.
pub fn key_for(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned())
}

/// A recorded path is live only while it is still a directory.
fn path_exists(path: &str) -> bool {
    Path::new(path).is_dir()
}

/// In-memory directory history for one operation.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    keys: BTreeMap<String, Vec<Entry>>,
    ignore: IgnoreFilter,
}

impl HistoryStore {
    pub fn new(ignore: IgnoreFilter) -> Self {
        Self {
            keys: BTreeMap::new(),
            ignore,
        }
    }

    /// Builds a store from a raw map, restoring the invariants: no empty
    /// keys, and no path recorded twice under one key (the later record wins).
    pub fn from_map(map: BTreeMap<String, Vec<Entry>>, ignore: IgnoreFilter) -> Self {
        let keys = map
            .into_iter()
            .filter_map(|(key, entries)| {
                let mut unique: Vec<Entry> = Vec::with_capacity(entries.len());
                for entry in entries {
                    unique.retain(|existing| existing.path != entry.path);
                    unique.push(entry);
                }
                (!unique.is_empty()).then_some((key, unique))
            })
            .collect();
        Self { keys, ignore }
    }

    /// Raw map in storage order, for persistence.
    pub fn as_map(&self) -> &BTreeMap<String, Vec<Entry>> {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// All keys currently present, without any staleness filtering.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.keys().map(String::as_str)
    }

    /// Records a visit to `path` at the current time.
    pub fn add(&mut self, path: &str) -> AddOutcome {
        self.add_at(path, now())
    }

    /// Records a visit to `path` at `now`.
    ///
    /// Sweeps the key first, so an entry that was retroactively ignored or
    /// whose directory vanished is dropped even when `path` itself is new.
    pub fn add_at(&mut self, path: &str, now: i64) -> AddOutcome {
        let key = key_for(path);
        self.prune_stale(&key);

        if self.ignore.is_ignored(path) {
            debug!(path, "path is ignored, not recording");
            return AddOutcome::Ignored;
        }

        let entries = self.keys.entry(key).or_default();
        let outcome = touch(entries, path, now);
        debug!(path, ?outcome, "recorded visit");
        outcome
    }

    /// Most recently accessed path for `key`, or [`CURRENT_DIR`].
    pub fn resolve(&self, key: &str) -> &str {
        self.entries(key)
            .into_iter()
            .next()
            .map_or(CURRENT_DIR, |entry| entry.path.as_str())
    }

    /// Entries for `key`, newest first. Does not sweep.
    pub fn entries(&self, key: &str) -> Vec<&Entry> {
        let Some(entries) = self.keys.get(key) else {
            return Vec::new();
        };
        // Reverse first so the stable sort leaves later-touched entries ahead
        // of earlier ones with the same timestamp.
        let mut ranked: Vec<&Entry> = entries.iter().rev().collect();
        ranked.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        ranked
    }

    /// Live paths for `key`, newest first. Sweeps the key before reading.
    pub fn paths(&mut self, key: &str) -> Vec<String> {
        self.prune_stale(key);
        self.entries(key)
            .into_iter()
            .map(|entry| entry.path.clone())
            .collect()
    }

    /// Marks `path` under `key` as the most recently accessed one.
    ///
    /// Returns false if the path is not recorded under the key.
    pub fn promote(&mut self, key: &str, path: &str) -> bool {
        self.promote_at(key, path, now())
    }

    pub fn promote_at(&mut self, key: &str, path: &str, now: i64) -> bool {
        let Some(entries) = self.keys.get_mut(key) else {
            return false;
        };
        if !entries.iter().any(|entry| entry.path == path) {
            return false;
        }
        touch(entries, path, now);
        debug!(key, path, "promoted entry");
        true
    }

    /// Deletes one entry, dropping the key when it was the last one.
    ///
    /// Returns false if nothing was removed.
    pub fn remove_entry(&mut self, key: &str, path: &str) -> bool {
        let Some(entries) = self.keys.get_mut(key) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.path != path);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.keys.remove(key);
        }
        if removed {
            debug!(key, path, "removed entry");
        }
        removed
    }

    /// Drops entries under `key` whose directory is gone or that are now
    /// ignored. Returns the number of entries removed.
    pub fn prune_stale(&mut self, key: &str) -> usize {
        if !self.keys.contains_key(key) {
            return 0;
        }
        let rules = self.ignore.load_rules();
        self.retain_in(key, |entry| {
            path_exists(&entry.path) && !rules.is_match(&entry.path)
        })
    }

    /// Runs [`Self::prune_stale`] over every key.
    pub fn prune_all(&mut self) -> usize {
        let rules = self.ignore.load_rules();
        let keys: Vec<String> = self.keys.keys().cloned().collect();
        keys.iter()
            .map(|key| {
                self.retain_in(key, |entry| {
                    path_exists(&entry.path) && !rules.is_match(&entry.path)
                })
            })
            .sum()
    }

    /// Drops entries not accessed within `max_age`, or whose directory is
    /// gone, across all keys. Returns the number of entries removed.
    pub fn expire(&mut self, max_age: Duration) -> usize {
        self.expire_at(max_age, now())
    }

    pub fn expire_at(&mut self, max_age: Duration, now: i64) -> usize {
        let max_age = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        let cutoff = now.saturating_sub(max_age);
        let keys: Vec<String> = self.keys.keys().cloned().collect();
        keys.iter()
            .map(|key| {
                self.retain_in(key, |entry| {
                    entry.last_accessed >= cutoff && path_exists(&entry.path)
                })
            })
            .sum()
    }

    fn retain_in(&mut self, key: &str, mut keep: impl FnMut(&Entry) -> bool) -> usize {
        let Some(entries) = self.keys.get_mut(key) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|entry| {
            let kept = keep(entry);
            if !kept {
                debug!(key, path = %entry.path, "dropping stale entry");
            }
            kept
        });
        let removed = before - entries.len();
        if entries.is_empty() {
            self.keys.remove(key);
        }
        removed
    }
}

/// Sets `path`'s access time and moves it to the end of the mutation order.
fn touch(entries: &mut Vec<Entry>, path: &str, now: i64) -> AddOutcome {
    match entries.iter().position(|entry| entry.path == path) {
        Some(pos) => {
            let mut entry = entries.remove(pos);
            entry.last_accessed = now;
            entries.push(entry);
            AddOutcome::Refreshed
        }
        None => {
            entries.push(Entry {
                path: path.to_string(),
                last_accessed: now,
            });
            AddOutcome::Recorded
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::{TempDir, tempdir};

    use super::*;

    /// Creates `<root>/<rel>` and returns it as a string.
    fn make_dir(root: &TempDir, rel: &str) -> String {
        let path = root.path().join(rel);
        fs::create_dir_all(&path).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn store_with_ignore(root: &TempDir, patterns: &str) -> HistoryStore {
        let ignore_path = root.path().join("ignore");
        fs::write(&ignore_path, patterns).unwrap();
        HistoryStore::new(IgnoreFilter::new(ignore_path))
    }

    #[test]
    fn test_key_for_uses_final_component() {
        assert_eq!(key_for("/home/me/src/foo"), "foo");
        assert_eq!(key_for("/home/me/src/foo/"), "foo");
        assert_eq!(key_for("/"), "/");
    }

    #[test]
    fn test_add_then_paths_returns_path_first() {
        let root = tempdir().unwrap();
        let older = make_dir(&root, "a/foo");
        let newer = make_dir(&root, "b/foo");
        let mut store = HistoryStore::default();

        store.add_at(&older, 100);
        assert_eq!(store.add_at(&newer, 200), AddOutcome::Recorded);

        assert_eq!(store.paths("foo")[0], newer);
    }

    #[test]
    fn test_add_twice_never_duplicates() {
        let root = tempdir().unwrap();
        let path = make_dir(&root, "foo");
        let mut store = HistoryStore::default();

        assert_eq!(store.add_at(&path, 100), AddOutcome::Recorded);
        assert_eq!(store.add_at(&path, 200), AddOutcome::Refreshed);

        assert_eq!(store.paths("foo"), vec![path]);
        assert_eq!(store.entries("foo")[0].last_accessed, 200);
    }

    #[test]
    fn test_paths_are_newest_first() {
        let root = tempdir().unwrap();
        let paths: Vec<String> = (1..=4)
            .map(|i| make_dir(&root, &format!("p{i}/proj")))
            .collect();
        let mut store = HistoryStore::default();

        for (i, path) in paths.iter().enumerate() {
            store.add_at(path, 1_000 + i as i64);
        }

        let expected: Vec<String> = paths.iter().rev().cloned().collect();
        assert_eq!(store.paths("proj"), expected);
    }

    #[test]
    fn test_same_second_tie_favours_last_touched() {
        let root = tempdir().unwrap();
        let first = make_dir(&root, "x/proj");
        let second = make_dir(&root, "y/proj");
        let mut store = HistoryStore::default();

        store.add_at(&first, 500);
        store.add_at(&second, 500);
        assert_eq!(store.paths("proj"), vec![second.clone(), first.clone()]);

        store.add_at(&first, 500);
        assert_eq!(store.paths("proj"), vec![first, second]);
    }

    #[test]
    fn test_order_is_derived_from_timestamps() {
        let root = tempdir().unwrap();
        let a = make_dir(&root, "a/proj");
        let b = make_dir(&root, "b/proj");
        let mut map = BTreeMap::new();
        // Storage order disagrees with timestamps; timestamps win.
        map.insert(
            "proj".to_string(),
            vec![
                Entry {
                    path: b.clone(),
                    last_accessed: 10,
                },
                Entry {
                    path: a.clone(),
                    last_accessed: 5,
                },
            ],
        );
        let store = HistoryStore::from_map(map, IgnoreFilter::disabled());
        assert_eq!(store.resolve("proj"), b);
        let ranked: Vec<&str> = store
            .entries("proj")
            .into_iter()
            .map(|e| e.path.as_str())
            .collect();
        assert_eq!(ranked, vec![b.as_str(), a.as_str()]);
    }

    #[test]
    fn test_resolve_absent_key_returns_current_dir() {
        let store = HistoryStore::default();
        assert_eq!(store.resolve("missing"), CURRENT_DIR);
        assert!(store.is_empty());
    }

    #[test]
    fn test_ignored_path_is_not_recorded() {
        let root = tempdir().unwrap();
        let skipped = make_dir(&root, "scratch/foo");
        let pattern = format!("{}/scratch/*\n", root.path().display());
        let mut store = store_with_ignore(&root, &pattern);

        assert_eq!(store.add_at(&skipped, 100), AddOutcome::Ignored);
        assert!(store.paths("foo").is_empty());
        assert!(!store.contains_key("foo"));
    }

    #[test]
    fn test_tmp_pattern_blocks_add() {
        let root = tempdir().unwrap();
        let mut store = store_with_ignore(&root, "/tmp/*\n");

        assert_eq!(store.add_at("/tmp/foo", 100), AddOutcome::Ignored);
        assert!(store.paths("foo").is_empty());
    }

    #[test]
    fn test_add_purges_retroactively_ignored_sibling() {
        let root = tempdir().unwrap();
        let old = make_dir(&root, "old/proj");
        let new = make_dir(&root, "new/proj");
        let ignore_path = root.path().join("ignore");
        let mut store = HistoryStore::new(IgnoreFilter::new(&ignore_path));

        store.add_at(&old, 100);
        fs::write(&ignore_path, format!("{}/old/*\n", root.path().display())).unwrap();
        store.add_at(&new, 200);

        assert_eq!(store.paths("proj"), vec![new]);
    }

    #[test]
    fn test_prune_stale_removes_missing_and_ignored() {
        let root = tempdir().unwrap();
        let keep = make_dir(&root, "keep/proj");
        let gone = make_dir(&root, "gone/proj");
        let hidden = make_dir(&root, "hidden/proj");
        let ignore_path = root.path().join("ignore");
        let mut store = HistoryStore::new(IgnoreFilter::new(&ignore_path));

        store.add_at(&keep, 1);
        store.add_at(&gone, 2);
        store.add_at(&hidden, 3);

        fs::remove_dir_all(root.path().join("gone")).unwrap();
        fs::write(&ignore_path, format!("{}/hidden/*\n", root.path().display())).unwrap();

        assert_eq!(store.prune_stale("proj"), 2);
        assert_eq!(store.paths("proj"), vec![keep]);
        assert_eq!(store.prune_stale("proj"), 0);
    }

    #[test]
    fn test_directory_replaced_by_file_is_stale() {
        let root = tempdir().unwrap();
        let kept = make_dir(&root, "a/proj");
        let replaced = make_dir(&root, "b/proj");
        let mut store = HistoryStore::default();
        store.add_at(&kept, 1);
        store.add_at(&replaced, 2);

        fs::remove_dir(&replaced).unwrap();
        fs::write(&replaced, "not a directory").unwrap();

        assert_eq!(store.prune_stale("proj"), 1);
        assert_eq!(store.paths("proj"), vec![kept]);
    }

    #[test]
    fn test_prune_stale_drops_empty_key() {
        let root = tempdir().unwrap();
        let path = make_dir(&root, "only/proj");
        let mut store = HistoryStore::default();
        store.add_at(&path, 1);

        fs::remove_dir_all(root.path().join("only")).unwrap();

        assert_eq!(store.prune_stale("proj"), 1);
        assert!(!store.contains_key("proj"));
        assert_eq!(store.prune_stale("proj"), 0);
    }

    #[test]
    fn test_remove_entry_drops_key_when_empty() {
        let root = tempdir().unwrap();
        let a = make_dir(&root, "a/proj");
        let b = make_dir(&root, "b/proj");
        let mut store = HistoryStore::default();
        store.add_at(&a, 1);
        store.add_at(&b, 2);

        assert!(store.remove_entry("proj", &a));
        assert!(store.contains_key("proj"));
        assert!(!store.remove_entry("proj", &a));
        assert!(store.remove_entry("proj", &b));
        assert!(!store.contains_key("proj"));
    }

    #[test]
    fn test_promote_moves_path_to_front() {
        let root = tempdir().unwrap();
        let a = make_dir(&root, "a/proj");
        let b = make_dir(&root, "b/proj");
        let mut store = HistoryStore::default();
        store.add_at(&a, 1);
        store.add_at(&b, 2);

        assert!(store.promote_at("proj", &a, 3));
        assert_eq!(store.resolve("proj"), a);
        assert!(!store.promote_at("proj", "/not/recorded", 4));
        assert!(!store.promote_at("other", &a, 4));
    }

    #[test]
    fn test_expire_drops_old_and_missing() {
        let root = tempdir().unwrap();
        let fresh = make_dir(&root, "fresh/proj");
        let old = make_dir(&root, "old/proj");
        let gone = make_dir(&root, "gone/lib");
        let mut store = HistoryStore::default();
        store.add_at(&fresh, 1_000);
        store.add_at(&old, 100);
        store.add_at(&gone, 1_000);
        fs::remove_dir_all(root.path().join("gone")).unwrap();

        let removed = store.expire_at(Duration::from_secs(500), 1_200);

        assert_eq!(removed, 2);
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["proj"]);
        assert_eq!(store.paths("proj"), vec![fresh]);
    }

    #[test]
    fn test_prune_all_sweeps_every_key() {
        let root = tempdir().unwrap();
        let a = make_dir(&root, "a/one");
        let b = make_dir(&root, "b/two");
        let mut store = HistoryStore::default();
        store.add_at(&a, 1);
        store.add_at(&b, 1);
        fs::remove_dir_all(root.path().join("b")).unwrap();

        assert_eq!(store.prune_all(), 1);
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["one"]);
    }

    #[test]
    fn test_keys_are_unfiltered() {
        let root = tempdir().unwrap();
        let a = make_dir(&root, "a/one");
        let mut store = HistoryStore::default();
        store.add_at(&a, 1);
        fs::remove_dir_all(root.path().join("a")).unwrap();

        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["one"]);
        assert!(store.paths("one").is_empty());
        assert_eq!(store.keys().count(), 0);
    }

    #[test]
    fn test_from_map_restores_invariants() {
        let mut map = BTreeMap::new();
        map.insert("empty".to_string(), Vec::new());
        map.insert(
            "dup".to_string(),
            vec![
                Entry {
                    path: "/x/dup".to_string(),
                    last_accessed: 1,
                },
                Entry {
                    path: "/x/dup".to_string(),
                    last_accessed: 9,
                },
            ],
        );

        let store = HistoryStore::from_map(map, IgnoreFilter::disabled());

        assert!(!store.contains_key("empty"));
        let entries = store.entries("dup");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].last_accessed, 9);
    }
}
