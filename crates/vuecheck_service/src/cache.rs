//! Bounded open-document cache with age-based eviction.
//!
//! The language server keeps per-document analysis state for every open
//! document. The checker caps that footprint: at most `capacity` documents
//! stay open, and entries idle past the TTL are closed on the next touch.
//! Everything is released through [`DocumentCache::drain`] at run end.

use std::time::{Duration, Instant};

/// Default number of documents kept open.
pub const DEFAULT_CAPACITY: usize = 10;

/// Default idle time before a document is closed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Slot {
    uri: String,
    last_access: Instant,
}

/// Open-document bookkeeping, most recently used last.
#[derive(Debug)]
pub struct DocumentCache {
    capacity: usize,
    ttl: Duration,
    slots: Vec<Slot>,
}

/// Outcome of touching a document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Touch {
    /// The document was not open yet and needs a `didOpen`.
    pub opened: bool,
    /// Documents to `didClose`, oldest first.
    pub evicted: Vec<String>,
}

impl DocumentCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            slots: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    /// Marks `uri` as used at `now`, expiring idle entries and evicting the
    /// least recently used one beyond capacity.
    pub fn touch(&mut self, uri: &str, now: Instant) -> Touch {
        let mut touch = Touch::default();

        let mut index = 0;
        while index < self.slots.len() {
            let slot = &self.slots[index];
            if slot.uri != uri && now.duration_since(slot.last_access) > self.ttl {
                touch.evicted.push(self.slots.remove(index).uri);
            } else {
                index += 1;
            }
        }

        if let Some(position) = self.slots.iter().position(|slot| slot.uri == uri) {
            let mut slot = self.slots.remove(position);
            slot.last_access = now;
            self.slots.push(slot);
        } else {
            touch.opened = true;
            self.slots.push(Slot {
                uri: uri.to_string(),
                last_access: now,
            });
            while self.slots.len() > self.capacity {
                touch.evicted.push(self.slots.remove(0).uri);
            }
        }

        touch
    }

    /// Empties the cache; returns the uris to close, oldest first.
    pub fn drain(&mut self) -> Vec<String> {
        self.slots.drain(..).map(|slot| slot.uri).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_touch_opens() {
        let mut cache = DocumentCache::with_defaults();
        let now = Instant::now();

        let touch = cache.touch("file:///a.vue", now);
        assert!(touch.opened);
        assert!(touch.evicted.is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_repeated_touch_does_not_reopen() {
        let mut cache = DocumentCache::with_defaults();
        let now = Instant::now();

        cache.touch("file:///a.vue", now);
        let touch = cache.touch("file:///a.vue", now + Duration::from_secs(1));
        assert!(!touch.opened);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let mut cache = DocumentCache::new(3, DEFAULT_TTL);
        let now = Instant::now();

        cache.touch("file:///a.vue", now);
        cache.touch("file:///b.vue", now + Duration::from_secs(1));
        cache.touch("file:///c.vue", now + Duration::from_secs(2));
        // Refresh a; b becomes the oldest.
        cache.touch("file:///a.vue", now + Duration::from_secs(3));

        let touch = cache.touch("file:///d.vue", now + Duration::from_secs(4));
        assert!(touch.opened);
        assert_eq!(touch.evicted, vec!["file:///b.vue".to_string()]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_eleventh_document_evicts_with_default_capacity() {
        let mut cache = DocumentCache::with_defaults();
        let now = Instant::now();

        for n in 0..10 {
            let touch = cache.touch(&format!("file:///doc{n}.vue"), now);
            assert!(touch.evicted.is_empty());
        }

        let touch = cache.touch("file:///doc10.vue", now + Duration::from_secs(1));
        assert_eq!(touch.evicted, vec!["file:///doc0.vue".to_string()]);
        assert_eq!(cache.len(), 10);
    }

    #[test]
    fn test_idle_entries_expire_on_touch() {
        let mut cache = DocumentCache::new(10, Duration::from_secs(60));
        let now = Instant::now();

        cache.touch("file:///stale.vue", now);
        cache.touch("file:///fresh.vue", now + Duration::from_secs(50));

        let touch = cache.touch("file:///new.vue", now + Duration::from_secs(70));
        assert_eq!(touch.evicted, vec!["file:///stale.vue".to_string()]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_touched_entry_is_never_expired() {
        let mut cache = DocumentCache::new(10, Duration::from_secs(60));
        let now = Instant::now();

        cache.touch("file:///a.vue", now);
        let touch = cache.touch("file:///a.vue", now + Duration::from_secs(300));
        assert!(!touch.opened);
        assert!(touch.evicted.is_empty());
    }

    #[test]
    fn test_drain_returns_everything_oldest_first() {
        let mut cache = DocumentCache::with_defaults();
        let now = Instant::now();

        cache.touch("file:///a.vue", now);
        cache.touch("file:///b.vue", now + Duration::from_secs(1));

        assert_eq!(
            cache.drain(),
            vec!["file:///a.vue".to_string(), "file:///b.vue".to_string()]
        );
        assert!(cache.is_empty());
    }
}
