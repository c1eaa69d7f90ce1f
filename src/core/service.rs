//! The remote service boundary.

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::series::{LatestValue, SeriesCode, SeriesValues};

/// Wire name of the latest-value operation, part of the external contract.
pub const OP_LATEST_VALUE: &str = "getUltimoValorVO";
/// Wire name of the bulk series-values operation, part of the external contract.
pub const OP_SERIES_VALUES: &str = "getValoresSeriesVO";

/// The two SGS webservice operations this client consumes.
///
/// Dates at this boundary are `dd/mm/yyyy` strings, passed through to the
/// service unmodified; the service validates them and rejects what it does
/// not accept. The period is inclusive on both ends, per the service
/// contract.
#[async_trait]
pub trait SgsService: Send + Sync {
    /// Fetch the most recently published value of a series, with metadata.
    async fn latest_value(&self, code: SeriesCode) -> Result<LatestValue>;

    /// Fetch the values of the given series over `[start, end]`. Returns one
    /// entry per requested code, each with its values in the order the
    /// service published them.
    async fn series_values(
        &self,
        codes: &[SeriesCode],
        start: &str,
        end: &str,
    ) -> Result<Vec<SeriesValues>>;
}
