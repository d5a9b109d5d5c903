use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use secrecy::SecretString;
use serde::Deserialize;

use crate::client::ClientMode;
use crate::error::ClientError;
use crate::operation::Group;

const ENV_PREFIX: &str = "BANGO_";

/// Configuration for the Bango client.
///
/// Loaded from YAML and/or `BANGO_`-prefixed environment variables, nested
/// keys separated by `__` (e.g. `BANGO_AUTH__USER`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BangoConfig {
    /// Answer every call from canned data.
    pub mock: bool,
    /// URL of the Solitude proxy. Unset or empty disables proxying.
    pub proxy_url: Option<String>,
    /// Set on the proxy itself so it talks to Bango directly.
    pub is_proxy: bool,
    pub auth: Credentials,
    pub wsdl: WsdlConfig,
    pub proxy_timeout_secs: u64,
    /// Verify the proxy's TLS certificate. Off by default: the proxy is an
    /// internal hop.
    pub proxy_verify_tls: bool,
}

impl Default for BangoConfig {
    fn default() -> Self {
        Self {
            mock: false,
            proxy_url: None,
            is_proxy: false,
            auth: Credentials::default(),
            wsdl: WsdlConfig::default(),
            proxy_timeout_secs: 30,
            proxy_verify_tls: false,
        }
    }
}

impl BangoConfig {
    /// Loads a YAML file, then applies environment overrides.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if the file or a variable cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let config = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Reads configuration from environment variables only.
    ///
    /// # Errors
    /// Returns `ClientError::Config` if a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ClientError> {
        let config = Figment::new()
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// The proxy URL, if proxying is configured at all.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Backend this configuration selects. See [`ClientMode::select`].
    #[must_use]
    pub fn mode(&self) -> ClientMode {
        ClientMode::select(self)
    }

    #[must_use]
    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_timeout_secs)
    }

    #[must_use]
    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_is_proxy(mut self, is_proxy: bool) -> Self {
        self.is_proxy = is_proxy;
        self
    }

    #[must_use]
    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Credentials {
            user: user.into(),
            password: SecretString::from(password.into()),
        };
        self
    }
}

/// Bango account credentials injected into every direct request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub user: String,
    pub password: SecretString,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: SecretString::from(String::new()),
        }
    }
}

/// Where the service descriptions live on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WsdlConfig {
    /// Application root; WSDLs are under `lib/bango/wsdl/<env>/`.
    pub root: PathBuf,
    /// Bango environment, e.g. `test` or `prod`.
    pub env: String,
}

impl Default for WsdlConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            env: "prod".to_owned(),
        }
    }
}

impl WsdlConfig {
    /// `file://` URL of the WSDL for `group`.
    #[must_use]
    pub fn location(&self, group: Group) -> String {
        let path = self
            .root
            .join("lib")
            .join("bango")
            .join("wsdl")
            .join(&self.env)
            .join(group.wsdl_file());
        format!("file://{}", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        let config = BangoConfig::default();
        assert!(!config.mock);
        assert!(!config.is_proxy);
        assert_eq!(config.proxy(), None);
        assert_eq!(config.proxy_timeout(), Duration::from_secs(30));
        assert!(!config.proxy_verify_tls);
        assert_eq!(config.auth.password.expose_secret(), "");
        assert_eq!(config.mode(), ClientMode::Direct);
    }

    #[test]
    fn test_empty_proxy_url_disables_proxy() {
        let config = BangoConfig::default().with_proxy("");
        assert_eq!(config.proxy(), None);
    }

    #[test]
    fn test_wsdl_location() {
        let wsdl = WsdlConfig {
            root: PathBuf::from("/srv/solitude"),
            env: "test".to_owned(),
        };
        assert_eq!(
            wsdl.location(Group::Exporter),
            "file:///srv/solitude/lib/bango/wsdl/test/mozilla_exporter.wsdl"
        );
        assert_eq!(
            wsdl.location(Group::Billing),
            "file:///srv/solitude/lib/bango/wsdl/test/billing_configuration.wsdl"
        );
    }
}
