//! High-level client for one SGS series.

use tokio::sync::Mutex;
use tracing::debug;

use crate::config::SgsConfig;
use crate::core::analytics;
use crate::core::cache::LatestCache;
use crate::core::error::{Result, SgsError};
use crate::core::series::{SeriesCode, SeriesValue};
use crate::core::service::{OP_SERIES_VALUES, SgsService};
use crate::providers::fachada::FachadaSgs;

fn first_of_month(month: u32, year: i32) -> String {
    format!("01/{month:02}/{year:04}")
}

/// Client bound to a single series of the SGS registry.
///
/// The series code is fixed at construction; the most recent published value
/// is cached in memory after the first fetch and only replaced on an
/// explicit refresh. The client is a single-owner object: share it across
/// tasks only behind external synchronization.
///
/// Dates are `dd/mm/yyyy` strings handed to the service unmodified. Periods
/// are inclusive on both ends, so an adjustment over `[start, end]` compounds
/// the value published for the start month as well.
pub struct SgsClient<S: SgsService = FachadaSgs> {
    code: SeriesCode,
    service: S,
    cache: Mutex<LatestCache>,
}

impl SgsClient<FachadaSgs> {
    /// Connects to the production SGS webservice for the given series.
    pub async fn connect(code: SeriesCode) -> Result<Self> {
        Self::connect_with(code, SgsConfig::default()).await
    }

    /// Connects with an explicit endpoint configuration.
    pub async fn connect_with(code: SeriesCode, config: SgsConfig) -> Result<Self> {
        Ok(Self::with_service(code, FachadaSgs::connect(config).await?))
    }
}

impl<S: SgsService> SgsClient<S> {
    /// Wraps an already-established service. This is the seam used by tests
    /// and by callers bringing their own transport.
    pub fn with_service(code: SeriesCode, service: S) -> Self {
        SgsClient {
            code,
            service,
            cache: Mutex::new(LatestCache::default()),
        }
    }

    /// The series this client queries.
    pub fn code(&self) -> SeriesCode {
        self.code
    }

    /// The most recently published value of the series.
    ///
    /// Served from the cache when populated unless `refresh` is set, in
    /// which case the remote is always asked and the cache replaced with the
    /// answer. A failed fetch leaves any cached value in place.
    pub async fn latest_value(&self, refresh: bool) -> Result<SeriesValue> {
        let mut cache = self.cache.lock().await;
        if !refresh {
            if let Some(latest) = cache.get() {
                return Ok(latest.value.clone());
            }
        }

        let latest = self.service.latest_value(self.code).await?;
        debug!(
            "Fetched latest value for series {}: {}/{}",
            self.code, latest.value.month, latest.value.year
        );
        let value = latest.value.clone();
        cache.replace(latest);
        Ok(value)
    }

    /// The values published for the series over `[start, end]`, in the
    /// order the service returned them.
    ///
    /// When `end` is `None` it defaults to the first-of-month date of the
    /// latest published value, fetching that first if the cache is empty.
    pub async fn values_for_period(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<SeriesValue>> {
        let end = match end {
            Some(end) => end.to_string(),
            None => {
                let latest = self.latest_value(false).await?;
                first_of_month(latest.month, latest.year)
            }
        };

        let mut entries = self
            .service
            .series_values(&[self.code], start, &end)
            .await?;
        if entries.is_empty() {
            return Err(SgsError::remote(
                OP_SERIES_VALUES,
                format!("no result entry for series {}", self.code),
            ));
        }
        Ok(entries.remove(0).values)
    }

    /// The last twelve published values, assuming monthly cadence.
    ///
    /// The window ends at the latest published month and is computed with
    /// the arithmetic this service's long-standing clients use: the start
    /// month is `(latest_month + 1) % 12`, which renders as `00` when the
    /// latest month is November, and the start year is only decremented
    /// when the latest month is past January. Callers needing strict
    /// calendar bounds should compute them and use
    /// [`values_for_period`](Self::values_for_period) directly.
    pub async fn last_twelve_values(&self) -> Result<Vec<SeriesValue>> {
        let latest = self.latest_value(false).await?;

        let start_month = (latest.month + 1) % 12;
        let start_year = if latest.month > 1 {
            latest.year - 1
        } else {
            latest.year
        };

        let start = first_of_month(start_month, start_year);
        let end = first_of_month(latest.month, latest.year);
        self.values_for_period(&start, Some(&end)).await
    }

    /// The compounded multiplicative factor over `[start, end]`: the
    /// product of `(1 + value / 100)` over the period's published values.
    pub async fn accumulated_index_for_period(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<f64> {
        let values = self.values_for_period(start, end).await?;
        Ok(analytics::accumulated_index(&values))
    }

    /// The compounded change over `[start, end]` expressed as a percentage.
    pub async fn accumulated_percentage(&self, start: &str, end: Option<&str>) -> Result<f64> {
        let index = self.accumulated_index_for_period(start, end).await?;
        Ok(analytics::percentage_from_index(index))
    }

    /// Adjusts a monetary amount by the index accumulated over
    /// `[start, end]`, e.g. to correct a contract value for inflation.
    pub async fn adjust_value(&self, amount: f64, start: &str, end: Option<&str>) -> Result<f64> {
        let index = self.accumulated_index_for_period(start, end).await?;
        Ok(amount * index)
    }
}
