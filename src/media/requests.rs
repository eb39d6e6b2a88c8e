// SPDX-License-Identifier: MPL-2.0
//! Bookkeeping for image downloads in flight.
//!
//! The screens report every URL they would like to draw; this tracker hands
//! back only the ones that are neither cached nor already requested. A URL
//! whose download failed is not requested again until [`ImageRequests::reset`]
//! (there are no automatic retries).

use super::ImageCache;
use std::collections::HashSet;

/// Photos on each side of the lightbox selection fetched ahead of paging.
pub const PREFETCH_NEIGHBOURS: usize = 1;

#[derive(Debug, Default)]
pub struct ImageRequests {
    pending: HashSet<String>,
    failed: HashSet<String>,
}

impl ImageRequests {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks and returns the URLs from `wanted` that still need a download.
    pub fn begin<I>(&mut self, wanted: I, cache: &ImageCache) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut started = Vec::new();
        for url in wanted {
            if cache.contains(&url) || self.failed.contains(&url) || self.pending.contains(&url) {
                continue;
            }
            self.pending.insert(url.clone());
            started.push(url);
        }
        started
    }

    /// Records the end of a download.
    pub fn finish(&mut self, url: &str, succeeded: bool) {
        self.pending.remove(url);
        if !succeeded {
            self.failed.insert(url.to_string());
        }
    }

    #[must_use]
    pub fn is_pending(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Allows failed URLs to be requested again.
    pub fn reset(&mut self) {
        self.failed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::image::encoded_png;
    use crate::media::ImageData;

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn cached_and_pending_urls_are_skipped() {
        let mut cache = ImageCache::new(8, 1 << 20);
        let image = ImageData::from_encoded(encoded_png(2, 2)).expect("decode");
        cache.insert("a".into(), image);

        let mut requests = ImageRequests::new();
        assert_eq!(requests.begin(urls(&["a", "b"]), &cache), urls(&["b"]));
        assert!(requests.is_pending("b"));
        assert!(requests.begin(urls(&["a", "b"]), &cache).is_empty());
    }

    #[test]
    fn duplicates_in_one_batch_start_once() {
        let cache = ImageCache::new(8, 1 << 20);
        let mut requests = ImageRequests::new();
        assert_eq!(requests.begin(urls(&["x", "x"]), &cache), urls(&["x"]));
    }

    #[test]
    fn failures_are_not_retried_until_reset() {
        let cache = ImageCache::new(8, 1 << 20);
        let mut requests = ImageRequests::new();
        requests.begin(urls(&["x"]), &cache);
        requests.finish("x", false);

        assert_eq!(requests.pending_count(), 0);
        assert!(requests.begin(urls(&["x"]), &cache).is_empty());

        requests.reset();
        assert_eq!(requests.begin(urls(&["x"]), &cache), urls(&["x"]));
    }

    #[test]
    fn success_clears_pending() {
        let cache = ImageCache::new(8, 1 << 20);
        let mut requests = ImageRequests::new();
        requests.begin(urls(&["x"]), &cache);
        requests.finish("x", true);
        assert!(!requests.is_pending("x"));
    }
}
