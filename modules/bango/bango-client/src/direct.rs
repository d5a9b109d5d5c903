use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::classify::classify;
use crate::config::{BangoConfig, Credentials, WsdlConfig};
use crate::error::ClientError;
use crate::metrics::{self, MetricsSink, NAMESPACE};
use crate::operation::{Group, Operation};
use crate::record::Record;
use crate::transport::{self, ServiceConnector};
use crate::Payload;

/// Talks to Bango over its SOAP services.
pub struct DirectBackend {
    connector: Arc<dyn ServiceConnector>,
    wsdl: WsdlConfig,
    auth: Credentials,
    metrics: Arc<dyn MetricsSink>,
}

impl DirectBackend {
    #[must_use]
    pub fn new(
        config: &BangoConfig,
        connector: Arc<dyn ServiceConnector>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            connector,
            wsdl: config.wsdl.clone(),
            auth: config.auth.clone(),
            metrics,
        }
    }

    /// Builds the request from `payload`, adds credentials and calls Bango.
    ///
    /// # Errors
    /// Transport errors propagate unchanged; a non-`OK` response code is
    /// returned as `Auth` or `Provider`.
    pub fn call(
        &self,
        operation: Operation,
        payload: &Payload,
        group: Group,
    ) -> Result<Record, ClientError> {
        let client = transport::open(self.connector.as_ref(), &self.wsdl, group)?;

        let mut request = client.create(&operation.request_type())?;
        for (k, v) in payload {
            request.set(k.clone(), v.clone());
        }
        request.set("username", self.auth.user.clone());
        request.set("password", self.auth.password.expose_secret());

        tracing::debug!(%operation, %group, "Calling Bango");
        let response = {
            let _timer = metrics::timer(
                self.metrics.as_ref(),
                format!("{NAMESPACE}.bango.{}", operation.metric_key()),
            );
            client.invoke(operation.name(), request)?
        };

        classify(
            self.metrics.as_ref(),
            &response.response_code()?,
            &response.response_message(),
        )?;
        Ok(response)
    }
}
