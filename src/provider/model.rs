use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The Dinahosting API methods used to manage challenge TXT records.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Method {
    AddTypeTxt,
    DeleteTypeTxt,
}

impl Method {
    /// The operation name placed in the request envelope.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Method::AddTypeTxt => "Domain_Zone_AddTypeTXT",
            Method::DeleteTypeTxt => "Domain_Zone_DeleteTypeTXT",
        }
    }

    /// The parameter key carrying the record content. The API expects `text` when creating a
    /// record and `value` when deleting one.
    #[must_use]
    pub fn content_key(self) -> &'static str {
        match self {
            Method::AddTypeTxt => "text",
            Method::DeleteTypeTxt => "value",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Request parameters, serialized with their keys in sorted order.
pub type Params = BTreeMap<String, String>;

/// The JSON request body sent for every API call.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct ApiEnvelope {
    pub method: Method,
    pub params: Params,
}

/// A TXT record to create or delete.
#[derive(Debug, Clone, Default, Ord, PartialOrd, Eq, PartialEq)]
pub struct TxtRecordRequest {
    /// The registrable domain owning the zone, e.g. `example.com`.
    pub domain: String,
    /// The record name relative to `domain`, e.g. `_acme-challenge`.
    pub hostname: String,
    /// The record content.
    pub value: String,
}

impl TxtRecordRequest {
    pub fn new(
        domain: impl Into<String>,
        hostname: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            hostname: hostname.into(),
            value: value.into(),
        }
    }

    /// The API parameters for this record under the given method.
    #[must_use]
    pub fn params(&self, method: Method) -> Params {
        Params::from([
            ("domain".to_string(), self.domain.clone()),
            ("hostname".to_string(), self.hostname.clone()),
            (method.content_key().to_string(), self.value.clone()),
        ])
    }
}
