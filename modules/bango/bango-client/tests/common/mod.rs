#![allow(dead_code)]

use std::sync::Arc;

use bango_client::{
    BangoConfig, ClientError, Group, Payload, Record, ServiceClient, ServiceConnector,
};
use parking_lot::Mutex;
use serde_json::{Value, json};

/// Everything the fake service saw.
#[derive(Debug, Default)]
pub struct Calls {
    pub connects: Vec<(Group, String)>,
    pub invocations: Vec<(String, Record)>,
}

/// In-memory stand-in for the SOAP toolkit.
///
/// Response types come with an empty `...Result` member, and every invocation
/// answers with the configured reply.
#[derive(Clone)]
pub struct FakeConnector {
    calls: Arc<Mutex<Calls>>,
    reply: Payload,
}

impl FakeConnector {
    pub fn replying(reply: Value) -> Self {
        Self {
            calls: Arc::default(),
            reply: reply.as_object().cloned().unwrap_or_default(),
        }
    }

    pub fn ok() -> Self {
        Self::replying(json!({"responseCode": "OK", "responseMessage": ""}))
    }

    pub fn connects(&self) -> Vec<(Group, String)> {
        self.calls.lock().connects.clone()
    }

    pub fn invocations(&self) -> Vec<(String, Record)> {
        self.calls.lock().invocations.clone()
    }
}

impl ServiceConnector for FakeConnector {
    fn connect(&self, group: Group, wsdl_url: &str) -> Result<Box<dyn ServiceClient>, ClientError> {
        self.calls.lock().connects.push((group, wsdl_url.to_owned()));
        Ok(Box::new(FakeService {
            calls: Arc::clone(&self.calls),
            reply: self.reply.clone(),
        }))
    }
}

struct FakeService {
    calls: Arc<Mutex<Calls>>,
    reply: Payload,
}

impl ServiceClient for FakeService {
    fn create(&self, type_name: &str) -> Result<Record, ClientError> {
        let mut record = Record::typed(type_name);
        if let Some(operation) = type_name.strip_suffix("Response") {
            record.set(format!("{operation}Result"), json!({}));
        }
        Ok(record)
    }

    fn invoke(&self, operation: &str, request: Record) -> Result<Record, ClientError> {
        self.calls
            .lock()
            .invocations
            .push((operation.to_owned(), request));
        Ok(Record::from_json(self.reply.clone()).with_type_name(format!("{operation}Response")))
    }
}

/// A connector whose transport is down.
pub struct BrokenConnector;

impl ServiceConnector for BrokenConnector {
    fn connect(&self, _group: Group, wsdl_url: &str) -> Result<Box<dyn ServiceClient>, ClientError> {
        Err(ClientError::Transport(format!("cannot load {wsdl_url}")))
    }
}

pub fn payload(value: Value) -> Payload {
    value.as_object().cloned().unwrap_or_default()
}

pub fn config() -> BangoConfig {
    BangoConfig::default().with_auth("solitude", "s3cret")
}
