use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Which Bango service description an operation is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Group {
    #[default]
    Exporter,
    Billing,
}

impl Group {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Exporter => "exporter",
            Group::Billing => "billing",
        }
    }

    /// File name of the WSDL describing this group.
    #[must_use]
    pub fn wsdl_file(self) -> &'static str {
        match self {
            Group::Exporter => "mozilla_exporter.wsdl",
            Group::Billing => "billing_configuration.wsdl",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exporter" => Ok(Group::Exporter),
            "billing" => Ok(Group::Billing),
            other => Err(ClientError::Config(format!("unknown service group: {other}"))),
        }
    }
}

/// The whitelist of Bango operations this client is allowed to call.
///
/// Adding a variant here (and to [`Operation::ALL`]) is the only way to expose
/// a new remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    CreateBangoNumber,
    CreateBankDetails,
    CreatePackage,
    MakePremiumPerAccess,
    UpdateFinanceEmailAddress,
    UpdateRating,
    UpdateSupportEmailAddress,
    CreateBillingConfiguration,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::CreateBangoNumber,
        Operation::CreateBankDetails,
        Operation::CreatePackage,
        Operation::MakePremiumPerAccess,
        Operation::UpdateFinanceEmailAddress,
        Operation::UpdateRating,
        Operation::UpdateSupportEmailAddress,
        Operation::CreateBillingConfiguration,
    ];

    /// Canonical remote name, exactly as Bango spells it.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateBangoNumber => "CreateBangoNumber",
            Operation::CreateBankDetails => "CreateBankDetails",
            Operation::CreatePackage => "CreatePackage",
            Operation::MakePremiumPerAccess => "MakePremiumPerAccess",
            Operation::UpdateFinanceEmailAddress => "UpdateFinanceEmailAddress",
            Operation::UpdateRating => "UpdateRating",
            Operation::UpdateSupportEmailAddress => "UpdateSupportEmailAddress",
            Operation::CreateBillingConfiguration => "CreateBillingConfiguration",
        }
    }

    #[must_use]
    pub fn group(self) -> Group {
        match self {
            Operation::CreateBillingConfiguration => Group::Billing,
            _ => Group::Exporter,
        }
    }

    /// Looks an operation up by its remote name.
    ///
    /// # Errors
    /// Returns `ClientError::UnknownOperation` if `name` is not whitelisted.
    pub fn lookup(name: &str) -> Result<Self, ClientError> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| ClientError::UnknownOperation(name.to_owned()))
    }

    #[must_use]
    pub fn request_type(self) -> String {
        request_type(self.name())
    }

    #[must_use]
    pub fn response_type(self) -> String {
        response_type(self.name())
    }

    #[must_use]
    pub fn result_field(self) -> String {
        result_field(self.name())
    }

    #[must_use]
    pub fn metric_key(self) -> String {
        metric_key(self.name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

// If the Bango WSDL diverges these will need to change.

#[must_use]
pub fn request_type(name: &str) -> String {
    format!("{name}Request")
}

#[must_use]
pub fn response_type(name: &str) -> String {
    format!("{name}Response")
}

#[must_use]
pub fn result_field(name: &str) -> String {
    format!("{name}Result")
}

/// Dotted, lowercased form of a camel-case name, so metrics can be queried
/// as `update.*`.
#[must_use]
pub fn metric_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            key.push('.');
        }
        key.extend(c.to_lowercase());
        prev = Some(c);
    }
    key
}
