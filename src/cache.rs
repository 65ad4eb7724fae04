//! An explicit, caller-owned cache of transactions per reporting period.

use crate::model::{Period, Transactions};
use crate::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// The default time an entry stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct Cached {
    stored_at: Instant,
    transactions: Transactions,
}

impl Cached {
    fn now(transactions: Transactions) -> Self {
        Self {
            stored_at: Instant::now(),
            transactions,
        }
    }
}

/// Holds the transactions fetched for each [`Period`] so that switching back and forth between
/// views does not refetch them.
///
/// Entries older than the TTL are treated as missing. Call [`clear`](Self::clear) whenever the
/// signed-in user changes and [`invalidate`](Self::invalidate) after a period's data is edited.
#[derive(Debug, Clone)]
pub struct TransactionCache {
    ttl: Duration,
    entries: HashMap<Period, Cached>,
}

impl Default for TransactionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TransactionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached transactions for `period` if they are still fresh.
    pub fn get(&self, period: Period) -> Option<&Transactions> {
        let entry = self.entries.get(&period)?;
        if entry.stored_at.elapsed() >= self.ttl {
            trace!("Cache entry for {period} is stale");
            return None;
        }
        Some(&entry.transactions)
    }

    pub fn insert(&mut self, period: Period, transactions: Transactions) {
        self.entries.insert(period, Cached::now(transactions));
    }

    /// Returns the fresh entry for `period`, or stores and returns what `fetch` produces.
    pub fn get_or_try_insert_with<F>(&mut self, period: Period, fetch: F) -> Result<&Transactions>
    where
        F: FnOnce() -> Result<Transactions>,
    {
        let ttl = self.ttl;
        let cached = match self.entries.entry(period) {
            Entry::Occupied(occupied) if occupied.get().stored_at.elapsed() < ttl => {
                occupied.into_mut()
            }
            Entry::Occupied(mut occupied) => {
                debug!("Refetching stale transactions for {period}");
                occupied.insert(Cached::now(fetch()?));
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => {
                debug!("Cache miss for {period}");
                vacant.insert(Cached::now(fetch()?))
            }
        };
        Ok(&cached.transactions)
    }

    pub fn invalidate(&mut self, period: Period) {
        if self.entries.remove(&period).is_some() {
            debug!("Invalidated cached transactions for {period}");
        }
    }

    /// Drops every entry, e.g. on login or logout.
    pub fn clear(&mut self) {
        debug!("Clearing {} cached periods", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::expense;

    fn may() -> Period {
        Period::month(2024, 5).unwrap()
    }

    fn sample() -> Transactions {
        Transactions::new(vec![expense("a", "2024-05-01", 500, "食費")])
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = TransactionCache::new(Duration::from_secs(3600));
        cache.insert(may(), sample());
        assert_eq!(cache.get(may()), Some(&sample()));
        assert_eq!(cache.get(may().previous()), None);
    }

    #[test]
    fn test_zero_ttl_is_always_stale() {
        let mut cache = TransactionCache::new(Duration::ZERO);
        cache.insert(may(), sample());
        assert_eq!(cache.get(may()), None);
    }

    #[test]
    fn test_get_or_try_insert_with_fetches_once() {
        let mut cache = TransactionCache::default();
        let mut calls = 0;
        for _ in 0..3 {
            let got = cache
                .get_or_try_insert_with(may(), || {
                    calls += 1;
                    Ok(sample())
                })
                .unwrap();
            assert_eq!(got.len(), 1);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_fetch_error_is_propagated_and_not_cached() {
        let mut cache = TransactionCache::default();
        let result = cache.get_or_try_insert_with(may(), || anyhow::bail!("offline"));
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = TransactionCache::default();
        cache.insert(may(), sample());
        cache.insert(may().previous(), sample());
        cache.invalidate(may());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
