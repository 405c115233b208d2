use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::UpdateError;

/// Record families the updater manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordType {
    A,
    Aaaa,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An active zone hosted at the provider.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Zone {
    pub id: String,
    pub name: String,
}

/// A single remote DNS record.
///
/// Fields the updater does not touch (type, ttl, proxied, ...) are carried
/// through `extra`, so an update sends the record back whole.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct DnsRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of pushing one record update to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PutOutcome {
    Applied,
    /// The provider answered `success: false`; the message is its own.
    Rejected {
        message: String,
    },
}

pub(crate) trait DnsApi {
    fn active_zones(&self) -> Result<Vec<Zone>, UpdateError>;

    fn records(&self, zone_id: &str, record_type: RecordType)
        -> Result<Vec<DnsRecord>, UpdateError>;

    fn put_record(&self, zone_id: &str, record: &DnsRecord) -> Result<PutOutcome, UpdateError>;
}
