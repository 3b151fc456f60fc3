//! Thread-local cache for property-name canonicalization.
//!
//! Callers address properties in either spelling (`backgroundColor` or
//! `background-color`); the host style interface only speaks kebab-case.
//! Conversion is cheap but hot, so results are memoized in a small
//! per-thread LRU keyed by the caller's spelling.

use lru::LruCache;
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::num::NonZeroUsize;

/// Number of entries to keep per thread; real pages touch far fewer
/// distinct properties.
const KEBAB_NAME_CACHE_CAPACITY: usize = 500;

type KebabNameCache = LruCache<String, String, FxBuildHasher>;

fn new_cache() -> KebabNameCache {
  let cap = NonZeroUsize::new(KEBAB_NAME_CACHE_CAPACITY)
    .expect("Name cache capacity must be non-zero");
  KebabNameCache::with_hasher(cap, FxBuildHasher::default())
}

thread_local! {
  static KEBAB_NAME_CACHE: RefCell<KebabNameCache> = RefCell::new(new_cache());
}

#[cfg(test)]
thread_local! {
  static KEBAB_NAME_CACHE_HITS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// The kebab-case spelling of `name`, memoized
pub(crate) fn canonical_property_name(name: &str) -> String {
  KEBAB_NAME_CACHE.with(|cache| {
    let mut cache = cache.borrow_mut();
    if let Some(converted) = cache.get(name) {
      #[cfg(test)]
      KEBAB_NAME_CACHE_HITS.with(|counter| counter.set(counter.get() + 1));
      return converted.clone();
    }
    let converted = to_kebab_case(name);
    cache.put(name.to_string(), converted.clone());
    converted
  })
}

fn to_kebab_case(name: &str) -> String {
  let mut out = String::with_capacity(name.len() + 4);
  for c in name.chars() {
    if c.is_ascii_uppercase() {
      out.push('-');
      out.push(c.to_ascii_lowercase());
    } else {
      out.push(c);
    }
  }
  out
}

#[cfg(test)]
pub(crate) fn cache_hits_for_tests() -> usize {
  KEBAB_NAME_CACHE_HITS.with(|counter| counter.get())
}
