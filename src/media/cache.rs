// SPDX-License-Identifier: MPL-2.0
//! LRU cache of downloaded images, keyed by file URL.
//!
//! Thumbnails and full-size photos share one cache. It is bounded both by
//! entry count and by total encoded bytes; the least recently used entries
//! are evicted first.

use super::image::ImageData;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Default byte budget (64 MB of encoded image data).
pub const DEFAULT_CACHE_BYTES: usize = 64 * 1024 * 1024;

/// Cache statistics for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

pub struct ImageCache {
    entries: LruCache<String, ImageData>,
    max_bytes: usize,
    current_bytes: usize,
    stats: CacheStats,
}

impl ImageCache {
    /// Creates a cache holding at most `max_entries` images (minimum 1).
    #[must_use]
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            max_bytes,
            current_bytes: 0,
            stats: CacheStats::default(),
        }
    }

    /// Inserts an image. Images larger than half the budget are not cached.
    pub fn insert(&mut self, url: String, image: ImageData) -> bool {
        if image.byte_len > self.max_bytes / 2 {
            return false;
        }

        if let Some(existing) = self.entries.pop(&url) {
            self.current_bytes = self.current_bytes.saturating_sub(existing.byte_len);
        }

        while self.current_bytes + image.byte_len > self.max_bytes {
            match self.entries.pop_lru() {
                Some((_, evicted)) => {
                    self.current_bytes = self.current_bytes.saturating_sub(evicted.byte_len);
                    self.stats.evictions += 1;
                }
                None => break,
            }
        }

        self.current_bytes += image.byte_len;
        if let Some((_, evicted)) = self.entries.push(url, image) {
            self.current_bytes = self.current_bytes.saturating_sub(evicted.byte_len);
            self.stats.evictions += 1;
        }
        true
    }

    /// Returns a cached image and marks it as recently used.
    pub fn get(&mut self, url: &str) -> Option<&ImageData> {
        match self.entries.get(url) {
            Some(image) => {
                self.stats.hits += 1;
                Some(image)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Returns a cached image without touching LRU order or statistics.
    #[must_use]
    pub fn peek(&self, url: &str) -> Option<&ImageData> {
        self.entries.peek(url)
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains(url)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_bytes = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.current_bytes
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::image::encoded_png;

    fn image() -> ImageData {
        ImageData::from_encoded(encoded_png(4, 4)).expect("decode")
    }

    #[test]
    fn get_counts_hits_and_misses() {
        let mut cache = ImageCache::new(4, DEFAULT_CACHE_BYTES);
        cache.insert("a".to_string(), image());
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn evicts_least_recently_used_by_count() {
        let mut cache = ImageCache::new(2, DEFAULT_CACHE_BYTES);
        cache.insert("a".to_string(), image());
        cache.insert("b".to_string(), image());
        cache.get("a");
        cache.insert("c".to_string(), image());

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.memory_usage(), 2 * image().byte_len);
    }

    #[test]
    fn evicts_by_byte_budget() {
        let size = image().byte_len;
        let mut cache = ImageCache::new(16, size * 2);
        cache.insert("a".to_string(), image());
        cache.insert("b".to_string(), image());
        cache.insert("c".to_string(), image());
        assert_eq!(cache.len(), 2);
        assert!(cache.memory_usage() <= size * 2);
    }

    #[test]
    fn oversized_images_are_skipped() {
        let mut cache = ImageCache::new(4, 10);
        assert!(!cache.insert("big".to_string(), image()));
        assert!(cache.is_empty());
    }

    #[test]
    fn reinserting_same_url_does_not_double_count() {
        let mut cache = ImageCache::new(4, DEFAULT_CACHE_BYTES);
        cache.insert("a".to_string(), image());
        cache.insert("a".to_string(), image());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.memory_usage(), image().byte_len);
    }
}
