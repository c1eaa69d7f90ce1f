//! Client for the Banco Central do Brasil SGS time-series webservice.
//!
//! SGS publishes thousands of economic series under numeric codes; this
//! crate wraps the two operations needed to track the monthly price indices
//! (latest published value and values over a period) and derives the usual
//! computations from them: accumulated index, compounded percentage and
//! monetary adjustment. The default series is IGP-M; see
//! [`SeriesCode`] for the other well-known codes.
//!
//! Service documentation:
//! <https://www3.bcb.gov.br/sgspub/JSP/sgsgeral/sgsAjudaIng.jsp#SA>
//!
//! ```no_run
//! use bcb_sgs::{Result, SeriesCode, SgsClient};
//!
//! # async fn example() -> Result<()> {
//! let client = SgsClient::connect(SeriesCode::IGPM).await?;
//! let latest = client.latest_value(false).await?;
//! println!("IGP-M {}/{}: {}%", latest.month, latest.year, latest.value);
//!
//! // Inflation-correct a contract value over an inclusive period
//! let adjusted = client
//!     .adjust_value(1000.0, "01/01/2023", Some("01/12/2023"))
//!     .await?;
//! # let _ = adjusted;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod providers;

pub use crate::core::analytics::{accumulated_index, percentage_from_index};
pub use crate::core::{
    LatestValue, Result, SeriesCode, SeriesValue, SeriesValues, SgsError, SgsService,
};
pub use client::SgsClient;
pub use config::SgsConfig;
pub use providers::FachadaSgs;
