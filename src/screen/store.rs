//! Local List Store
//!
//! Each screen keeps its content in one arena keyed by [`ContentKey`]; named
//! feeds ("top", "full", ...) are ordered lists of keys into that arena. A
//! logical item therefore has exactly one in-memory copy per screen, and a
//! mutation is visible through every feed that lists it.
//!
//! Lookups are linear over the feeds. Feeds are page-sized.

use crate::shared::content::{Author, ContentItem, ContentKey, UserId};
use crate::shared::error::SyncError;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Where a key sits in one feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPosition {
    pub feed: String,
    pub index: usize,
}

/// Result of [`FeedStore::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The item changed; these feeds show it
    Changed(Vec<String>),
    /// The item is held but the mutation was a no-op
    Unchanged,
    /// The screen holds no copy of the item
    Missing,
}

impl Applied {
    pub fn is_changed(&self) -> bool {
        matches!(self, Applied::Changed(_))
    }
}

/// Outcome of loading a page into a feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLoad {
    /// Keys newly listed in the feed
    pub appended: usize,
    /// Feeds that lost an item the page marked hidden
    pub evicted: Vec<String>,
}

/// Arena of content items plus named feeds and an author cache
#[derive(Debug, Clone, Default)]
pub struct FeedStore {
    items: HashMap<ContentKey, ContentItem>,
    feeds: BTreeMap<String, Vec<ContentKey>>,
    authors: HashMap<UserId, Author>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a feed with a freshly fetched page
    ///
    /// Fetched copies overwrite what the arena held. Duplicate keys are
    /// skipped; a hidden copy removes the item from every feed.
    pub fn replace_feed(&mut self, name: &str, items: impl IntoIterator<Item = ContentItem>) -> PageLoad {
        let mut load = PageLoad::default();
        let mut keys = Vec::new();
        let mut seen = HashSet::new();
        for item in items {
            if !item.visible {
                load.evicted.extend(self.remove(&item.key));
                continue;
            }
            if !seen.insert(item.key.clone()) {
                continue;
            }
            keys.push(item.key.clone());
            self.items.insert(item.key.clone(), item);
        }
        load.appended = keys.len();
        self.feeds.insert(name.to_string(), keys);
        self.collect_garbage();
        load.evicted.sort();
        load.evicted.dedup();
        load
    }

    /// Append the next page to a feed, creating the feed if needed
    ///
    /// Already listed keys are refreshed in place.
    pub fn append_page(&mut self, name: &str, items: impl IntoIterator<Item = ContentItem>) -> PageLoad {
        let mut load = PageLoad::default();
        self.feeds.entry(name.to_string()).or_default();
        for item in items {
            if !item.visible {
                load.evicted.extend(self.remove(&item.key));
                continue;
            }
            let keys = self.feeds.entry(name.to_string()).or_default();
            if !keys.contains(&item.key) {
                keys.push(item.key.clone());
                load.appended += 1;
            }
            self.items.insert(item.key.clone(), item);
        }
        load.evicted.sort();
        load.evicted.dedup();
        load
    }

    /// Forget a feed; items no other feed lists are dropped
    pub fn drop_feed(&mut self, name: &str) -> bool {
        let existed = self.feeds.remove(name).is_some();
        if existed {
            self.collect_garbage();
        }
        existed
    }

    pub fn feed_names(&self) -> impl Iterator<Item = &str> {
        self.feeds.keys().map(String::as_str)
    }

    /// Items of a feed in display order
    pub fn feed<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a ContentItem> + 'a {
        self.feeds
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|key| self.items.get(key))
    }

    pub fn get(&self, key: &ContentKey) -> Option<&ContentItem> {
        self.items.get(key)
    }

    pub fn contains(&self, key: &ContentKey) -> bool {
        self.items.contains_key(key)
    }

    /// Position of `key` in every feed that lists it
    pub fn find(&self, key: &ContentKey) -> Vec<FeedPosition> {
        self.feeds
            .iter()
            .filter_map(|(name, keys)| {
                keys.iter().position(|k| k == key).map(|index| FeedPosition {
                    feed: name.clone(),
                    index,
                })
            })
            .collect()
    }

    fn feeds_containing(&self, key: &ContentKey) -> Vec<String> {
        self.find(key).into_iter().map(|pos| pos.feed).collect()
    }

    /// Apply a field-level mutation to the item
    ///
    /// The closure reports whether it changed anything. An absent key is
    /// not an error and yields [`Applied::Missing`].
    pub fn apply<F>(&mut self, key: &ContentKey, mutation: F) -> Result<Applied, SyncError>
    where
        F: FnOnce(&mut ContentItem) -> Result<bool, SyncError>,
    {
        let Some(item) = self.items.get_mut(key) else {
            return Ok(Applied::Missing);
        };
        if mutation(item)? {
            Ok(Applied::Changed(self.feeds_containing(key)))
        } else {
            Ok(Applied::Unchanged)
        }
    }

    /// Remove the item from every feed
    ///
    /// Returns the feeds that listed it.
    pub fn remove(&mut self, key: &ContentKey) -> Vec<String> {
        let mut affected = Vec::new();
        for (name, keys) in self.feeds.iter_mut() {
            let before = keys.len();
            keys.retain(|k| k != key);
            if keys.len() != before {
                affected.push(name.clone());
            }
        }
        self.items.remove(key);
        affected
    }

    /// Number of distinct items held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cache an author record, replacing any previous copy
    pub fn upsert_author(&mut self, author: Author) {
        self.authors.insert(author.id.clone(), author);
    }

    pub fn author(&self, id: &str) -> Option<&Author> {
        self.authors.get(id)
    }

    /// Replace a cached author; records this screen never cached are ignored
    pub fn replace_author(&mut self, author: Author) -> bool {
        match self.authors.get_mut(&author.id) {
            Some(cached) if *cached != author => {
                *cached = author;
                true
            }
            _ => false,
        }
    }

    /// Feeds showing at least one item by this author
    pub fn feeds_by_author(&self, id: &str) -> Vec<String> {
        self.feeds
            .iter()
            .filter(|(_, keys)| {
                keys.iter()
                    .filter_map(|key| self.items.get(key))
                    .any(|item| item.author_id == id)
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn collect_garbage(&mut self) {
        let live: HashSet<&ContentKey> = self.feeds.values().flatten().collect();
        self.items.retain(|key, _| live.contains(key));
    }
}
