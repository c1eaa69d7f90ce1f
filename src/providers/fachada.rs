//! SOAP transport for the FachadaWSSGS webservice.

use async_trait::async_trait;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::config::SgsConfig;
use crate::core::error::{Result, SgsError};
use crate::core::series::{LatestValue, SeriesCode, SeriesValue, SeriesValues};
use crate::core::service::{OP_LATEST_VALUE, OP_SERIES_VALUES, SgsService};
use crate::providers::soap::{self, SoapValue, XmlNode};

/// Client for the SGS SOAP facade.
///
/// `connect` fetches the service description once and verifies that the two
/// operations this crate consumes are declared; after that every call is a
/// single HTTP round trip with no retry. Besides the typed [`SgsService`]
/// methods, [`invoke`](FachadaSgs::invoke) exposes any other operation the
/// facade publishes, with untyped parameters.
pub struct FachadaSgs {
    config: SgsConfig,
    http: reqwest::Client,
}

impl FachadaSgs {
    /// Establishes the session: fetches the WSDL from the configured base
    /// URL and checks it declares the consumed operations. Fails with
    /// [`SgsError::Connection`] otherwise; the error is fatal, reconstruct
    /// to retry.
    pub async fn connect(config: SgsConfig) -> Result<Self> {
        let wsdl_url = config.wsdl_url();
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| SgsError::connection(&wsdl_url, e))?;

        debug!("Fetching service description from {}", wsdl_url);
        let response = http
            .get(&wsdl_url)
            .send()
            .await
            .map_err(|e| SgsError::connection(&wsdl_url, e))?;
        if !response.status().is_success() {
            return Err(SgsError::connection(
                &wsdl_url,
                format!("HTTP error: {}", response.status()),
            ));
        }
        let text = response
            .text()
            .await
            .map_err(|e| SgsError::connection(&wsdl_url, e))?;

        let wsdl = soap::parse(&text)
            .map_err(|e| SgsError::connection(&wsdl_url, format!("invalid WSDL: {e}")))?;
        let declared: Vec<&str> = wsdl
            .descendants("operation")
            .into_iter()
            .filter_map(|op| op.attribute("name"))
            .collect();
        for required in [OP_LATEST_VALUE, OP_SERIES_VALUES] {
            if !declared.contains(&required) {
                return Err(SgsError::connection(
                    &wsdl_url,
                    format!("service does not declare operation {required}"),
                ));
            }
        }

        Ok(FachadaSgs { config, http })
    }

    /// Calls an arbitrary operation of the facade with untyped parameters
    /// and returns the parsed response document.
    ///
    /// This is the escape hatch for the many SGS operations the typed
    /// surface does not cover; the caller must know the parameter names and
    /// order the WSDL expects. SOAP faults and transport failures surface as
    /// [`SgsError::RemoteService`].
    pub async fn invoke(&self, operation: &str, params: &[(&str, SoapValue)]) -> Result<XmlNode> {
        let url = self.config.endpoint_url();
        debug!("Calling SGS operation {} at {}", operation, url);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{operation}\""))
            .body(soap::envelope(operation, params))
            .send()
            .await
            .map_err(|e| SgsError::remote(operation, format!("request error: {e} URL: {url}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SgsError::remote(operation, format!("failed to read response: {e}")))?;

        let doc = match soap::parse(&text) {
            Ok(doc) => doc,
            Err(e) if status.is_success() => {
                return Err(SgsError::remote(
                    operation,
                    format!("failed to parse response: {e}"),
                ));
            }
            Err(_) => {
                return Err(SgsError::remote(operation, format!("HTTP error: {status}")));
            }
        };

        // Faults usually arrive with a 500 status; report the faultstring
        // rather than the bare status code when one is present.
        if let Some(fault) = soap::fault_message(&doc) {
            return Err(SgsError::remote(operation, format!("SOAP fault: {fault}")));
        }
        if !status.is_success() {
            return Err(SgsError::remote(operation, format!("HTTP error: {status}")));
        }
        Ok(doc)
    }
}

fn require_child<'a>(node: &'a XmlNode, name: &str, operation: &str) -> Result<&'a XmlNode> {
    node.child(name)
        .ok_or_else(|| SgsError::remote(operation, format!("missing <{name}> in response")))
}

fn number_text<T>(node: &XmlNode, name: &str, operation: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let child = require_child(node, name, operation)?;
    // The facade renders decimals with either separator depending on locale
    child.text().replace(',', ".").parse().map_err(|e| {
        SgsError::remote(
            operation,
            format!("invalid <{name}> value '{}': {e}", child.text()),
        )
    })
}

fn parse_value(node: &XmlNode, operation: &str) -> Result<SeriesValue> {
    Ok(SeriesValue {
        year: number_text(node, "ano", operation)?,
        month: number_text(node, "mes", operation)?,
        value: number_text(node, "valor", operation)?,
    })
}

#[async_trait]
impl SgsService for FachadaSgs {
    #[instrument(name = "SgsLatestValue", skip(self), fields(code = %code))]
    async fn latest_value(&self, code: SeriesCode) -> Result<LatestValue> {
        let doc = self
            .invoke(
                OP_LATEST_VALUE,
                &[("codigoSerie", SoapValue::text(code))],
            )
            .await?;

        let serie = doc.descendant("getUltimoValorVOReturn").ok_or_else(|| {
            SgsError::remote(
                OP_LATEST_VALUE,
                format!("no data returned for series {code}"),
            )
        })?;
        let ultimo = serie.child("ultimoValor").ok_or_else(|| {
            SgsError::remote(
                OP_LATEST_VALUE,
                format!("no value published for series {code}"),
            )
        })?;

        Ok(LatestValue {
            code,
            name: serie.child("nome").map(|n| n.text().to_string()),
            periodicity: serie.child("periodicidade").map(|n| n.text().to_string()),
            value: parse_value(ultimo, OP_LATEST_VALUE)?,
        })
    }

    #[instrument(name = "SgsSeriesValues", skip(self, codes), fields(start = %start, end = %end))]
    async fn series_values(
        &self,
        codes: &[SeriesCode],
        start: &str,
        end: &str,
    ) -> Result<Vec<SeriesValues>> {
        let doc = self
            .invoke(
                OP_SERIES_VALUES,
                &[
                    ("codigosSeries", SoapValue::list(codes)),
                    ("dataInicio", SoapValue::text(start)),
                    ("dataFim", SoapValue::text(end)),
                ],
            )
            .await?;

        let ret = doc.descendant("getValoresSeriesVOReturn").ok_or_else(|| {
            SgsError::remote(OP_SERIES_VALUES, "malformed response: no result element")
        })?;

        let mut entries = Vec::new();
        for serie in ret.children_named("serie") {
            let code: u32 = number_text(serie, "codigo", OP_SERIES_VALUES)?;
            let container = serie.child("valores").unwrap_or(serie);
            let values = container
                .children_named("item")
                .map(|item| parse_value(item, OP_SERIES_VALUES))
                .collect::<Result<Vec<_>>>()?;
            entries.push(SeriesValues {
                code: SeriesCode(code),
                values,
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/" name="FachadaWSSGS">
  <portType name="FachadaWSSGS">
    <operation name="getUltimoValorVO"/>
    <operation name="getValoresSeriesVO"/>
    <operation name="getValor"/>
  </portType>
</definitions>"#;

    fn soap_body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
  <soapenv:Body>{inner}</soapenv:Body>
</soapenv:Envelope>"#
        )
    }

    async fn mount_wsdl(server: &MockServer, wsdl: &str) {
        Mock::given(method("GET"))
            .and(path("/FachadaWSSGS.wsdl"))
            .respond_with(ResponseTemplate::new(200).set_body_string(wsdl))
            .mount(server)
            .await;
    }

    async fn connect(server: &MockServer) -> FachadaSgs {
        FachadaSgs::connect(SgsConfig::with_base_url(&server.uri()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_fetches_and_verifies_wsdl() {
        let server = MockServer::start().await;
        mount_wsdl(&server, WSDL).await;
        assert!(
            FachadaSgs::connect(SgsConfig::with_base_url(&server.uri()))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_connect_fails_when_wsdl_unreachable() {
        // No mock mounted: the server answers 404
        let server = MockServer::start().await;
        let result = FachadaSgs::connect(SgsConfig::with_base_url(&server.uri())).await;
        assert!(matches!(result, Err(SgsError::Connection { .. })));
    }

    #[tokio::test]
    async fn test_connect_fails_when_operation_missing() {
        let server = MockServer::start().await;
        let wsdl = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/">
            <portType><operation name="getUltimoValorVO"/></portType>
        </definitions>"#;
        mount_wsdl(&server, wsdl).await;

        let result = FachadaSgs::connect(SgsConfig::with_base_url(&server.uri())).await;
        let err = result.err().unwrap();
        assert!(matches!(err, SgsError::Connection { .. }));
        assert!(err.to_string().contains("getValoresSeriesVO"));
    }

    #[tokio::test]
    async fn test_latest_value_parses_serie_and_metadata() {
        let server = MockServer::start().await;
        mount_wsdl(&server, WSDL).await;
        let response = soap_body(
            r#"<getUltimoValorVOResponse>
                 <getUltimoValorVOReturn>
                   <codigo>189</codigo>
                   <nome>IGP-M</nome>
                   <periodicidade>M</periodicidade>
                   <ultimoValor><ano>2024</ano><mes>3</mes><valor>0,31</valor></ultimoValor>
                 </getUltimoValorVOReturn>
               </getUltimoValorVOResponse>"#,
        );
        Mock::given(method("POST"))
            .and(path("/FachadaWSSGS"))
            .respond_with(ResponseTemplate::new(200).set_body_string(response))
            .mount(&server)
            .await;

        let latest = connect(&server)
            .await
            .latest_value(SeriesCode::IGPM)
            .await
            .unwrap();
        assert_eq!(latest.code, SeriesCode::IGPM);
        assert_eq!(latest.name.as_deref(), Some("IGP-M"));
        assert_eq!(latest.periodicity.as_deref(), Some("M"));
        assert_eq!(latest.value.year, 2024);
        assert_eq!(latest.value.month, 3);
        // Comma decimal separator accepted
        assert!((latest.value.value - 0.31).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_latest_value_without_published_value_is_remote_error() {
        let server = MockServer::start().await;
        mount_wsdl(&server, WSDL).await;
        let response = soap_body(
            r#"<getUltimoValorVOResponse>
                 <getUltimoValorVOReturn><codigo>9999</codigo></getUltimoValorVOReturn>
               </getUltimoValorVOResponse>"#,
        );
        Mock::given(method("POST"))
            .and(path("/FachadaWSSGS"))
            .respond_with(ResponseTemplate::new(200).set_body_string(response))
            .mount(&server)
            .await;

        let result = connect(&server).await.latest_value(SeriesCode(9999)).await;
        let err = result.err().unwrap();
        assert!(matches!(err, SgsError::RemoteService { .. }));
        assert!(err.to_string().contains("no value published"));
    }

    #[tokio::test]
    async fn test_series_values_preserves_service_order() {
        let server = MockServer::start().await;
        mount_wsdl(&server, WSDL).await;
        let response = soap_body(
            r#"<getValoresSeriesVOResponse>
                 <getValoresSeriesVOReturn>
                   <serie>
                     <codigo>189</codigo>
                     <valores>
                       <item><ano>2023</ano><mes>1</mes><valor>0.5</valor></item>
                       <item><ano>2023</ano><mes>2</mes><valor>-0.1</valor></item>
                     </valores>
                   </serie>
                 </getValoresSeriesVOReturn>
               </getValoresSeriesVOResponse>"#,
        );
        Mock::given(method("POST"))
            .and(path("/FachadaWSSGS"))
            .and(body_string_contains("<dataInicio>01/01/2023</dataInicio>"))
            .and(body_string_contains("<dataFim>01/02/2023</dataFim>"))
            .and(body_string_contains("<codigosSeries><item>189</item></codigosSeries>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(response))
            .mount(&server)
            .await;

        let entries = connect(&server)
            .await
            .series_values(&[SeriesCode::IGPM], "01/01/2023", "01/02/2023")
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, SeriesCode::IGPM);
        assert_eq!(
            entries[0].values,
            vec![
                SeriesValue { year: 2023, month: 1, value: 0.5 },
                SeriesValue { year: 2023, month: 2, value: -0.1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_soap_fault_surfaces_faultstring() {
        let server = MockServer::start().await;
        mount_wsdl(&server, WSDL).await;
        let response = soap_body(
            r#"<soapenv:Fault xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
                 <faultcode>soapenv:Server</faultcode>
                 <faultstring>Valor(es) nao encontrado(s)</faultstring>
               </soapenv:Fault>"#,
        );
        Mock::given(method("POST"))
            .and(path("/FachadaWSSGS"))
            .respond_with(ResponseTemplate::new(500).set_body_string(response))
            .mount(&server)
            .await;

        let result = connect(&server)
            .await
            .series_values(&[SeriesCode(1)], "01/01/2023", "01/02/2023")
            .await;
        let err = result.err().unwrap();
        assert!(matches!(err, SgsError::RemoteService { .. }));
        assert!(err.to_string().contains("Valor(es) nao encontrado(s)"));
    }

    #[tokio::test]
    async fn test_http_error_without_fault_is_remote_error() {
        let server = MockServer::start().await;
        mount_wsdl(&server, WSDL).await;
        Mock::given(method("POST"))
            .and(path("/FachadaWSSGS"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = connect(&server).await.latest_value(SeriesCode::IPCA).await;
        let err = result.err().unwrap();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_invoke_returns_raw_document() {
        let server = MockServer::start().await;
        mount_wsdl(&server, WSDL).await;
        let response = soap_body(
            r#"<getValorResponse><getValorReturn>4.5481</getValorReturn></getValorResponse>"#,
        );
        Mock::given(method("POST"))
            .and(path("/FachadaWSSGS"))
            .and(body_string_contains("<sgs:getValor>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(response))
            .mount(&server)
            .await;

        let doc = connect(&server)
            .await
            .invoke(
                "getValor",
                &[
                    ("codigoSerie", SoapValue::text(1u32)),
                    ("data", SoapValue::text("14/06/2024")),
                ],
            )
            .await
            .unwrap();
        assert_eq!(doc.descendant("getValorReturn").unwrap().text(), "4.5481");
    }
}
