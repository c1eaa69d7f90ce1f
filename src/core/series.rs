//! Data model for SGS time series.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Numeric code of a series in the BCB/SGS registry.
///
/// The code is opaque to this crate and passed through to the webservice
/// unchanged. Constants are provided for the price indices this client is
/// normally used with; any other positive code published in the registry
/// works the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesCode(pub u32);

impl SeriesCode {
    /// IGP-M (FGV), monthly percentage.
    pub const IGPM: SeriesCode = SeriesCode(189);
    /// INPC (IBGE), monthly percentage.
    pub const INPC: SeriesCode = SeriesCode(188);
    /// IPCA (IBGE), monthly percentage.
    pub const IPCA: SeriesCode = SeriesCode(433);
}

impl Default for SeriesCode {
    fn default() -> Self {
        SeriesCode::IGPM
    }
}

impl Display for SeriesCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SeriesCode {
    fn from(code: u32) -> Self {
        SeriesCode(code)
    }
}

/// One published observation of a series, as returned by the webservice.
///
/// For the monthly price indices `value` is the period-over-period change in
/// percent (e.g. `0.5` for +0.5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesValue {
    pub year: i32,
    /// Month of the observation, 1-12.
    pub month: u32,
    pub value: f64,
}

/// The most recent observation of a series plus the metadata the
/// latest-value operation reports alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestValue {
    pub code: SeriesCode,
    pub name: Option<String>,
    /// Publication cadence as reported by the service, e.g. `"M"` for monthly.
    pub periodicity: Option<String>,
    pub value: SeriesValue,
}

/// One result entry of the bulk series operation: the values of a single
/// requested series over the queried period, in the order the service
/// returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesValues {
    pub code: SeriesCode,
    pub values: Vec<SeriesValue>,
}
