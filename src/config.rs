//! Endpoint configuration for the SGS webservice.

use serde::{Deserialize, Serialize};

/// Production base URL of the SGS public facade. The WSDL and the SOAP
/// endpoint both live under this path.
pub const DEFAULT_BASE_URL: &str = "https://www3.bcb.gov.br/sgspub/JSP/sgsgeral";

/// Path of the service description under the base URL.
pub const WSDL_PATH: &str = "/FachadaWSSGS.wsdl";

/// Path of the SOAP endpoint under the base URL.
pub const ENDPOINT_PATH: &str = "/FachadaWSSGS";

/// Where and how to reach the SGS webservice.
///
/// The default points at the documented production service; override
/// `base_url` to target a mirror or a test server. There is no process-wide
/// state: every client carries the config it was constructed with.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SgsConfig {
    /// Base URL under which both the WSDL and the SOAP endpoint are served.
    pub base_url: String,
    /// User-agent header sent with every request.
    pub user_agent: String,
}

impl Default for SgsConfig {
    fn default() -> Self {
        SgsConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("bcb-sgs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SgsConfig {
    /// Config pointing at an alternative service location, e.g. a mock
    /// server in tests.
    pub fn with_base_url(base_url: &str) -> Self {
        SgsConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    pub fn wsdl_url(&self) -> String {
        format!("{}{}", self.base_url, WSDL_PATH)
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url, ENDPOINT_PATH)
    }
}
