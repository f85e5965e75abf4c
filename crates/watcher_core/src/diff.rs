use std::collections::BTreeSet;

use crate::Normalizer;

/// One scraped listing, as returned by the extractor. Attributes may still
/// contain volatile noise such as "· 3 hours ago".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub header: String,
    pub body: String,
}

/// A listing that has not been notified before, paired with the raw text
/// to show to a human.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Canonical identity of the listing.
    pub key: String,
    pub header: String,
    pub body: String,
}

/// The durable record of every listing key already notified.
///
/// Backed by an ordered set so that persisted snapshots are written in a
/// deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeenSet {
    keys: BTreeSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Returns true if the key was not already present.
    pub fn insert(&mut self, key: String) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// True if every key of `other` is also in `self`.
    pub fn is_superset(&self, other: &SeenSet) -> bool {
        self.keys.is_superset(&other.keys)
    }
}

impl FromIterator<String> for SeenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Result of comparing one extraction against the seen set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    /// New listings in extraction order, first record wins on key collision.
    pub notifications: Vec<Notification>,
    /// The seen set grown by every key observed this run.
    pub updated_seen: SeenSet,
}

/// Computes which of the current records are new relative to `seen`.
///
/// The updated set absorbs every key observed this run, new or not, so a
/// listing that reappears unchanged is never re-notified. An empty
/// extraction leaves the set untouched. Records whose header normalizes
/// to an empty key carry no identity and are skipped.
pub fn diff(current: &[RawRecord], seen: &SeenSet, normalizer: &Normalizer) -> DiffOutcome {
    let mut updated_seen = seen.clone();
    let mut notifications = Vec::new();

    for record in current {
        let key = normalizer.normalize(&record.header);
        if key.is_empty() {
            continue;
        }
        // insert() is false for keys already seen in a prior run or
        // earlier in this extraction, which de-duplicates within a run.
        if updated_seen.insert(key.clone()) {
            notifications.push(Notification {
                key,
                header: record.header.clone(),
                body: record.body.clone(),
            });
        }
    }

    DiffOutcome {
        notifications,
        updated_seen,
    }
}
