use std::sync::Arc;

use crate::Payload;
use crate::config::BangoConfig;
use crate::direct::DirectBackend;
use crate::error::ClientError;
use crate::metrics::{LogSink, MetricsSink};
use crate::mock::MockBackend;
use crate::operation::{Group, Operation};
use crate::proxy::ProxyBackend;
use crate::record::Record;
use crate::transport::ServiceConnector;

/// Which backend a client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMode {
    /// Canned responses, no network.
    Mock,
    /// JSON over HTTP to the Solitude proxy.
    Proxy { url: String },
    /// SOAP straight to Bango.
    Direct,
}

impl ClientMode {
    /// Picks the backend for `config`.
    ///
    /// Mock wins over everything so tests never reach the network. A process
    /// flagged as the proxy always goes direct, otherwise it would forward to
    /// itself.
    #[must_use]
    pub fn select(config: &BangoConfig) -> Self {
        if config.mock {
            return ClientMode::Mock;
        }
        match config.proxy() {
            Some(url) if !config.is_proxy => ClientMode::Proxy {
                url: url.to_owned(),
            },
            _ => ClientMode::Direct,
        }
    }
}

/// Bango client with the same API whatever the backend.
pub struct BangoClient {
    inner: BangoClientImpl,
}

enum BangoClientImpl {
    Direct(DirectBackend),
    Proxy(ProxyBackend),
    Mock(MockBackend),
}

impl BangoClient {
    /// Creates the client `config` asks for, reporting metrics as log events.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the proxy HTTP client cannot be built.
    pub fn from_config(
        config: &BangoConfig,
        connector: Arc<dyn ServiceConnector>,
    ) -> Result<Self, ClientError> {
        Self::with_metrics(config, connector, Arc::new(LogSink))
    }

    /// Like [`BangoClient::from_config`] with an explicit metrics sink.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the proxy HTTP client cannot be built.
    pub fn with_metrics(
        config: &BangoConfig,
        connector: Arc<dyn ServiceConnector>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self, ClientError> {
        let inner = match ClientMode::select(config) {
            ClientMode::Mock => BangoClientImpl::Mock(MockBackend::new(metrics)),
            ClientMode::Proxy { url } => {
                BangoClientImpl::Proxy(ProxyBackend::new(url, config, connector, metrics)?)
            }
            ClientMode::Direct => {
                BangoClientImpl::Direct(DirectBackend::new(config, connector, metrics))
            }
        };
        Ok(Self { inner })
    }

    #[must_use]
    pub fn mode(&self) -> ClientMode {
        match &self.inner {
            BangoClientImpl::Direct(_) => ClientMode::Direct,
            BangoClientImpl::Proxy(p) => ClientMode::Proxy {
                url: p.proxy_url().to_owned(),
            },
            BangoClientImpl::Mock(_) => ClientMode::Mock,
        }
    }

    /// Calls a whitelisted operation by its Bango name.
    ///
    /// # Errors
    /// Returns `ClientError::UnknownOperation` before any I/O if `name` is
    /// not whitelisted, otherwise whatever the backend returns.
    pub fn call(&self, name: &str, payload: &Payload) -> Result<Record, ClientError> {
        let operation = Operation::lookup(name)?;
        self.call_operation(operation, payload)
    }

    /// Calls `operation` against the service group it belongs to.
    ///
    /// # Errors
    /// Transport errors, or `Auth`/`Provider` for non-`OK` responses.
    pub fn call_operation(
        &self,
        operation: Operation,
        payload: &Payload,
    ) -> Result<Record, ClientError> {
        self.call_in(operation, payload, operation.group())
    }

    /// Calls `operation` against an explicit service group.
    ///
    /// # Errors
    /// Transport errors, or `Auth`/`Provider` for non-`OK` responses.
    pub fn call_in(
        &self,
        operation: Operation,
        payload: &Payload,
        group: Group,
    ) -> Result<Record, ClientError> {
        match &self.inner {
            BangoClientImpl::Direct(c) => c.call(operation, payload, group),
            BangoClientImpl::Proxy(c) => c.call(operation, payload, group),
            BangoClientImpl::Mock(c) => c.call(operation, payload, group),
        }
    }

    /// # Errors
    /// See [`BangoClient::call_operation`].
    pub fn create_bango_number(&self, payload: &Payload) -> Result<Record, ClientError> {
        self.call_operation(Operation::CreateBangoNumber, payload)
    }

    /// # Errors
    /// See [`BangoClient::call_operation`].
    pub fn create_bank_details(&self, payload: &Payload) -> Result<Record, ClientError> {
        self.call_operation(Operation::CreateBankDetails, payload)
    }

    /// # Errors
    /// See [`BangoClient::call_operation`].
    pub fn create_package(&self, payload: &Payload) -> Result<Record, ClientError> {
        self.call_operation(Operation::CreatePackage, payload)
    }

    /// # Errors
    /// See [`BangoClient::call_operation`].
    pub fn make_premium_per_access(&self, payload: &Payload) -> Result<Record, ClientError> {
        self.call_operation(Operation::MakePremiumPerAccess, payload)
    }

    /// # Errors
    /// See [`BangoClient::call_operation`].
    pub fn update_finance_email_address(&self, payload: &Payload) -> Result<Record, ClientError> {
        self.call_operation(Operation::UpdateFinanceEmailAddress, payload)
    }

    /// # Errors
    /// See [`BangoClient::call_operation`].
    pub fn update_rating(&self, payload: &Payload) -> Result<Record, ClientError> {
        self.call_operation(Operation::UpdateRating, payload)
    }

    /// # Errors
    /// See [`BangoClient::call_operation`].
    pub fn update_support_email_address(&self, payload: &Payload) -> Result<Record, ClientError> {
        self.call_operation(Operation::UpdateSupportEmailAddress, payload)
    }

    /// # Errors
    /// See [`BangoClient::call_operation`].
    pub fn create_billing_configuration(&self, payload: &Payload) -> Result<Record, ClientError> {
        self.call_operation(Operation::CreateBillingConfiguration, payload)
    }
}

impl From<DirectBackend> for BangoClient {
    fn from(backend: DirectBackend) -> Self {
        Self {
            inner: BangoClientImpl::Direct(backend),
        }
    }
}

impl From<ProxyBackend> for BangoClient {
    fn from(backend: ProxyBackend) -> Self {
        Self {
            inner: BangoClientImpl::Proxy(backend),
        }
    }
}

impl From<MockBackend> for BangoClient {
    fn from(backend: MockBackend) -> Self {
        Self {
            inner: BangoClientImpl::Mock(backend),
        }
    }
}

/// Use this to get the right client for talking to Bango.
///
/// # Errors
/// See [`BangoClient::from_config`].
pub fn get_client(
    config: &BangoConfig,
    connector: Arc<dyn ServiceConnector>,
) -> Result<BangoClient, ClientError> {
    BangoClient::from_config(config, connector)
}
