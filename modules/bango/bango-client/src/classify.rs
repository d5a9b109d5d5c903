use crate::error::ClientError;
use crate::metrics::{MetricsSink, NAMESPACE};

/// Response code Bango uses for success.
pub const OK: &str = "OK";

/// Response code Bango uses when the supplied credentials are rejected.
pub const ACCESS_DENIED: &str = "ACCESS_DENIED";

/// Header telling the proxy which Bango operation to run.
pub const HEADERS_SERVICE: &str = "x-solitude-service";

/// Shared error policy for every backend.
///
/// Counts the response code, then turns `ACCESS_DENIED` into
/// [`ClientError::Auth`] and any other non-`OK` code into
/// [`ClientError::Provider`].
///
/// # Errors
/// Returns the classified error when `code` is not [`OK`].
pub fn classify(metrics: &dyn MetricsSink, code: &str, message: &str) -> Result<(), ClientError> {
    metrics.incr(&format!("{NAMESPACE}.bango.{}", code.to_lowercase()));

    if code == ACCESS_DENIED {
        tracing::warn!(code, message, "Bango rejected credentials");
        return Err(ClientError::Auth {
            code: code.to_owned(),
            message: message.to_owned(),
        });
    }
    if code != OK {
        tracing::warn!(code, message, "Bango returned an error");
        return Err(ClientError::Provider {
            code: code.to_owned(),
            message: message.to_owned(),
        });
    }
    Ok(())
}
