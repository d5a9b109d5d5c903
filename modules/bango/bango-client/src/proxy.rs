use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;

use crate::Payload;
use crate::classify::{HEADERS_SERVICE, classify};
use crate::config::{BangoConfig, WsdlConfig};
use crate::error::ClientError;
use crate::metrics::{self, MetricsSink, NAMESPACE};
use crate::operation::{Group, Operation};
use crate::record::Record;
use crate::transport::{self, ServiceConnector};

/// Sends calls to the Solitude proxy, which holds the Bango credentials and
/// makes the SOAP call on our behalf.
pub struct ProxyBackend {
    proxy_url: String,
    http_client: reqwest::blocking::Client,
    connector: Arc<dyn ServiceConnector>,
    wsdl: WsdlConfig,
    metrics: Arc<dyn MetricsSink>,
}

impl ProxyBackend {
    /// # Errors
    /// Returns `ClientError::Config` if the HTTP client cannot be built.
    pub fn new(
        proxy_url: String,
        config: &BangoConfig,
        connector: Arc<dyn ServiceConnector>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, ClientError> {
        if !config.proxy_verify_tls {
            tracing::debug!(%proxy_url, "TLS verification disabled for proxy");
        }
        let http_client = reqwest::blocking::Client::builder()
            .timeout(config.proxy_timeout())
            .danger_accept_invalid_certs(!config.proxy_verify_tls)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            proxy_url,
            http_client,
            connector,
            wsdl: config.wsdl.clone(),
            metrics,
        })
    }

    #[must_use]
    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    /// POSTs `payload` to the proxy and maps the reply back onto the
    /// operation's result object, so it reads like a direct response.
    ///
    /// # Errors
    /// HTTP and JSON failures propagate unchanged; a non-`OK` response code
    /// is returned as `Auth` or `Provider`.
    pub fn call(
        &self,
        operation: Operation,
        payload: &Payload,
        group: Group,
    ) -> Result<Record, ClientError> {
        let reply = {
            let _timer = metrics::timer(
                self.metrics.as_ref(),
                format!("{NAMESPACE}.proxy.bango.{}", operation.metric_key()),
            );
            tracing::info!("Calling proxy: {operation}");
            let resp = self
                .http_client
                .post(&self.proxy_url)
                .header(HEADERS_SERVICE, operation.name())
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .json(payload)
                .send()?;
            tracing::debug!(status = %resp.status(), "proxy replied");
            let bytes = resp.bytes()?;
            parse_reply(&bytes)?
        };

        classify(
            self.metrics.as_ref(),
            &reply.response_code()?,
            &reply.response_message(),
        )?;

        // Find the result object and map everything back on to it, so a
        // result from the proxy looks exactly the same as a direct one.
        let client = transport::open(self.connector.as_ref(), &self.wsdl, group)?;
        let mut response = client.create(&operation.response_type())?;
        let mut result = response.take_record(&operation.result_field());
        for (k, v) in reply.to_mapping() {
            result.set(k, v);
        }
        Ok(result)
    }
}

/// Decodes the proxy's reply body, which must be a JSON object.
fn parse_reply(body: &[u8]) -> Result<Record, ClientError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(object) => Ok(Record::from_json(object)),
        other => Err(ClientError::InvalidResponse(format!(
            "expected a JSON object from the proxy, got {other}"
        ))),
    }
}
