//! Bango billing client
//!
//! Dispatches a fixed whitelist of Bango operations to one of three backends,
//! chosen from configuration:
//!
//! - **Direct**: SOAP calls to Bango through a [`ServiceConnector`]
//! - **Proxy**: JSON over HTTP to the Solitude proxy, which holds the credentials
//! - **Mock**: canned responses, for tests and local development
//!
//! Every backend runs responses through the same classifier, so callers see
//! the same [`Record`] and the same [`ClientError`]s whichever one is in use.
//!
//! # Examples
//!
//! ## Mocked calls
//!
//! ```
//! use std::sync::Arc;
//! use bango_client::{BangoClient, LogSink, MockBackend, Payload};
//!
//! # fn example() -> Result<(), bango_client::ClientError> {
//! let client = BangoClient::from(MockBackend::new(Arc::new(LogSink)));
//!
//! let mut payload = Payload::new();
//! payload.insert("name".to_owned(), "Jane Doe".into());
//!
//! let package = client.create_package(&payload)?;
//! assert!(package.is_ok());
//! assert!(package.get("packageId").is_some());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## From configuration
//!
//! ```no_run
//! use std::sync::Arc;
//! use bango_client::{get_client, BangoConfig, ServiceConnector};
//!
//! # fn example(connector: Arc<dyn ServiceConnector>) -> Result<(), bango_client::ClientError> {
//! let config = BangoConfig::load("config/bango.yaml")?;
//! let client = get_client(&config, connector)?;
//!
//! let rating = client.call("UpdateRating", &serde_json::Map::new())?;
//! println!("{rating}");
//! # Ok(())
//! # }
//! ```

mod classify;
mod client;
mod config;
mod direct;
mod error;
mod metrics;
mod mock;
mod operation;
mod proxy;
mod record;
mod transport;

/// Caller-supplied request fields.
pub type Payload = serde_json::Map<String, serde_json::Value>;

// Re-export public API
pub use classify::{ACCESS_DENIED, HEADERS_SERVICE, OK, classify};
pub use client::{BangoClient, ClientMode, get_client};
pub use config::{BangoConfig, Credentials, WsdlConfig};
pub use direct::DirectBackend;
pub use error::ClientError;
pub use metrics::{LogSink, MetricsSink, NAMESPACE, OtelSink, RecordingSink, Timer, timer};
pub use mock::MockBackend;
pub use operation::{Group, Operation, metric_key, request_type, response_type, result_field};
pub use proxy::ProxyBackend;
pub use record::{
    FieldValue, Generator, Mapping, Record, mapping_to_record, response_to_mapping,
};
pub use transport::{ServiceClient, ServiceConnector};
