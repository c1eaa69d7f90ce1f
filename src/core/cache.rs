//! Latest-value cache.

use tracing::debug;

use crate::core::series::LatestValue;

/// Cache cell for the latest published value of the selected series.
///
/// Two states only: it starts `Empty`, becomes `Populated` on the first
/// successful fetch, and is replaced wholesale on every forced refresh.
/// There is no expiry and no way back to `Empty`; the cell lives as long as
/// the client that owns it.
#[derive(Debug, Clone, Default)]
pub enum LatestCache {
    #[default]
    Empty,
    Populated(LatestValue),
}

impl LatestCache {
    pub fn get(&self) -> Option<&LatestValue> {
        match self {
            LatestCache::Empty => {
                debug!("Latest value cache MISS");
                None
            }
            LatestCache::Populated(latest) => {
                debug!("Latest value cache HIT");
                Some(latest)
            }
        }
    }

    /// Replace the cell contents with a freshly fetched value.
    pub fn replace(&mut self, latest: LatestValue) {
        debug!("Latest value cache PUT");
        *self = LatestCache::Populated(latest);
    }

    pub fn is_populated(&self) -> bool {
        matches!(self, LatestCache::Populated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::{SeriesCode, SeriesValue};

    fn latest(month: u32, year: i32, value: f64) -> LatestValue {
        LatestValue {
            code: SeriesCode::IGPM,
            name: None,
            periodicity: None,
            value: SeriesValue { year, month, value },
        }
    }

    #[test]
    fn test_cache_starts_empty() {
        let cache = LatestCache::default();
        assert!(!cache.is_populated());
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_cache_replace_is_wholesale() {
        let mut cache = LatestCache::default();

        cache.replace(latest(1, 2024, 0.5));
        assert!(cache.is_populated());
        assert_eq!(cache.get().unwrap().value.month, 1);

        // A second replace swaps the whole value, never merges
        cache.replace(latest(2, 2024, -0.1));
        let cached = cache.get().unwrap();
        assert_eq!(cached.value.month, 2);
        assert_eq!(cached.value.value, -0.1);
    }
}
