use crate::config::WsdlConfig;
use crate::error::ClientError;
use crate::operation::Group;
use crate::record::Record;

/// A connected handle on one Bango service description.
///
/// This is the seam to the SOAP toolkit: it knows how to build empty typed
/// objects and how to invoke remote operations by name.
pub trait ServiceClient {
    /// Creates an empty object of the named WSDL type.
    ///
    /// Response types include their `...Result` member as a nested object so
    /// callers can fill it in.
    ///
    /// # Errors
    /// Returns an error if the type is not described by the service.
    fn create(&self, type_name: &str) -> Result<Record, ClientError>;

    /// Invokes the remote operation `operation` with `request` as its only
    /// argument.
    ///
    /// # Errors
    /// Transport failures are returned as-is; provider-reported codes are not
    /// interpreted here.
    fn invoke(&self, operation: &str, request: Record) -> Result<Record, ClientError>;
}

/// Opens service handles. A new handle is created for every call.
pub trait ServiceConnector: Send + Sync {
    /// # Errors
    /// Returns an error if the service description cannot be loaded.
    fn connect(&self, group: Group, wsdl_url: &str) -> Result<Box<dyn ServiceClient>, ClientError>;
}

/// Opens a handle on the service description for `group`.
///
/// # Errors
/// Propagates connector failures.
pub fn open(
    connector: &dyn ServiceConnector,
    wsdl: &WsdlConfig,
    group: Group,
) -> Result<Box<dyn ServiceClient>, ClientError> {
    let url = wsdl.location(group);
    tracing::trace!(%group, url = %url, "opening service description");
    connector.connect(group, &url)
}
