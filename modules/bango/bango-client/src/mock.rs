use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::Payload;
use crate::classify::{OK, classify};
use crate::error::ClientError;
use crate::metrics::MetricsSink;
use crate::operation::{Group, Operation};
use crate::record::{Generator, Mapping, Record};

/// Microsecond clock digits past the first eight. Distinct enough for ids
/// as long as calls aren't made too fast.
fn ltime() -> Value {
    let micros = chrono::Utc::now().timestamp_micros().to_string();
    Value::from(micros.get(8..).unwrap_or(micros.as_str()))
}

fn uuid4() -> Value {
    Value::from(uuid::Uuid::new_v4().to_string())
}

const LTIME: Generator = Generator::new(ltime);
const UUID4: Generator = Generator::new(uuid4);

/// Canned data per operation. Operations that only return a
/// `responseCode` and `responseMessage` need no entry.
fn canned(operation: Operation) -> Mapping {
    let mut data = Mapping::new();
    match operation {
        Operation::CreateBangoNumber => {
            data.insert("bango".to_owned(), "some-bango-number".into());
        }
        Operation::CreatePackage => {
            for key in ["packageId", "adminPersonId", "supportPersonId", "financePersonId"] {
                data.insert(key.to_owned(), LTIME.into());
            }
        }
        Operation::UpdateSupportEmailAddress | Operation::UpdateFinanceEmailAddress => {
            data.insert("personId".to_owned(), LTIME.into());
            data.insert("personPassword".to_owned(), "xxxxx".into());
        }
        Operation::CreateBillingConfiguration => {
            data.insert("billingConfigurationId".to_owned(), UUID4.into());
        }
        Operation::CreateBankDetails | Operation::MakePremiumPerAccess | Operation::UpdateRating => {}
    }
    data
}

/// Answers every call from canned data, without touching the network.
pub struct MockBackend {
    metrics: Arc<dyn MetricsSink>,
    scripted: BTreeMap<Operation, Mapping>,
}

impl MockBackend {
    #[must_use]
    pub fn new(metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            metrics,
            scripted: BTreeMap::new(),
        }
    }

    /// Replaces the whole response for `operation`, response code included.
    #[must_use]
    pub fn respond_with(mut self, operation: Operation, fields: Mapping) -> Self {
        self.scripted.insert(operation, fields);
        self
    }

    /// Fields the mock will answer `operation` with.
    #[must_use]
    pub fn mock_results(&self, operation: Operation) -> Mapping {
        if let Some(fields) = self.scripted.get(&operation) {
            return fields.clone();
        }
        let mut result = canned(operation);
        result.insert("responseCode".to_owned(), OK.into());
        result.insert("responseMessage".to_owned(), "".into());
        result
    }

    /// The payload and group are ignored.
    ///
    /// # Errors
    /// Only scripted responses can fail, through the usual classification.
    pub fn call(
        &self,
        operation: Operation,
        _payload: &Payload,
        _group: Group,
    ) -> Result<Record, ClientError> {
        let response = Record::from_mapping(self.mock_results(operation), true)
            .with_type_name(operation.response_type());
        tracing::debug!(%operation, "Answering from mock data");
        classify(
            self.metrics.as_ref(),
            &response.response_code()?,
            &response.response_message(),
        )?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ACCESS_DENIED;
    use crate::metrics::RecordingSink;
    use crate::record::FieldValue;

    fn backend() -> MockBackend {
        MockBackend::new(Arc::new(RecordingSink::new()))
    }

    #[test]
    fn test_ltime_is_digits() {
        let Value::String(s) = ltime() else {
            panic!("ltime should be a string");
        };
        assert!(!s.is_empty());
        assert!(s.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_defaults_always_ok() {
        let mock = backend();
        for op in Operation::ALL {
            let results = mock.mock_results(op);
            assert_eq!(results["responseCode"], FieldValue::from(OK));
            assert_eq!(results["responseMessage"], FieldValue::from(""));
        }
    }

    #[test]
    fn test_generators_are_resolved() {
        let record = backend()
            .call(Operation::CreateBillingConfiguration, &Payload::new(), Group::Billing)
            .unwrap();
        let id = record.text("billingConfigurationId").unwrap();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(record.type_name(), Some("CreateBillingConfigurationResponse"));
    }

    #[test]
    fn test_scripted_response_replaces_defaults() {
        let mut fields = Mapping::new();
        fields.insert("responseCode".to_owned(), ACCESS_DENIED.into());
        let mock = backend().respond_with(Operation::CreatePackage, fields);

        let err = mock
            .call(Operation::CreatePackage, &Payload::new(), Group::Exporter)
            .unwrap_err();
        assert!(err.is_auth());
        assert_eq!(err.message(), Some(""));

        // Other operations keep their canned data.
        assert!(mock.call(Operation::UpdateRating, &Payload::new(), Group::Exporter).is_ok());
    }
}
