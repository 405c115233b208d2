use attohttpc::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::dns::api::{DnsApi, DnsRecord, PutOutcome, RecordType, Zone};
use crate::error::UpdateError;

const SERVICE: &str = "Cloudflare";

fn default_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

/// Cloudflare API v4 client, authenticated with the account email and
/// global API key pair. No `Debug` on purpose: the key must not leak into
/// output.
pub(crate) struct Cloudflare {
    base_url: String,
    email: String,
    auth_key: String,
}

impl Cloudflare {
    pub fn new(email: &str, auth_key: &str) -> Cloudflare {
        Cloudflare::with_base_url(email, auth_key, default_base_url())
    }

    pub fn with_base_url(email: &str, auth_key: &str, base_url: String) -> Cloudflare {
        Cloudflare {
            base_url,
            email: email.to_string(),
            auth_key: auth_key.to_string(),
        }
    }

    fn read<T: DeserializeOwned>(&self, response: Response) -> Result<ApiEnvelope<T>, UpdateError> {
        if !response.is_success() {
            return Err(UpdateError::Http {
                service: SERVICE,
                status: response.status().to_string(),
            });
        }
        response.json().map_err(|err| UpdateError::Api {
            service: SERVICE,
            source: err,
        })
    }
}

impl DnsApi for Cloudflare {
    fn active_zones(&self) -> Result<Vec<Zone>, UpdateError> {
        let response = attohttpc::get(format!("{base}/zones", base = self.base_url))
            .param("status", "active")
            .header("X-Auth-Email", self.email.as_str())
            .header("X-Auth-Key", self.auth_key.as_str())
            .header("Content-Type", "application/json")
            .send()
            .map_err(UpdateError::Connection)?;

        let envelope: ApiEnvelope<Vec<Zone>> = self.read(response)?;
        Ok(envelope.result.unwrap_or_default())
    }

    fn records(
        &self,
        zone_id: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsRecord>, UpdateError> {
        let response = attohttpc::get(format!(
            "{base}/zones/{zone_id}/dns_records",
            base = self.base_url,
            zone_id = zone_id,
        ))
        .param("type", record_type.as_str())
        .header("X-Auth-Email", self.email.as_str())
        .header("X-Auth-Key", self.auth_key.as_str())
        .header("Content-Type", "application/json")
        .send()
        .map_err(UpdateError::Connection)?;

        let envelope: ApiEnvelope<Vec<DnsRecord>> = self.read(response)?;
        Ok(envelope.result.unwrap_or_default())
    }

    fn put_record(&self, zone_id: &str, record: &DnsRecord) -> Result<PutOutcome, UpdateError> {
        let response = attohttpc::put(format!(
            "{base}/zones/{zone_id}/dns_records/{id}",
            base = self.base_url,
            zone_id = zone_id,
            id = record.id,
        ))
        .json(record)
        .map_err(|err| UpdateError::Api {
            service: SERVICE,
            source: err,
        })?
        .header("X-Auth-Email", self.email.as_str())
        .header("X-Auth-Key", self.auth_key.as_str())
        .header("Content-Type", "application/json")
        .send()
        .map_err(UpdateError::Connection)?;

        // Cloudflare reports per-record validation problems (rate limits
        // included) in the JSON envelope, sometimes with a non-2xx status;
        // a readable envelope takes precedence over the status line.
        let status_ok = response.is_success();
        let status = response.status().to_string();
        match response.json::<ApiEnvelope<serde_json::Value>>() {
            Ok(envelope) if envelope.success => Ok(PutOutcome::Applied),
            Ok(envelope) => Ok(PutOutcome::Rejected {
                message: envelope.first_error(),
            }),
            Err(err) if status_ok => Err(UpdateError::Api {
                service: SERVICE,
                source: err,
            }),
            Err(_) => Err(UpdateError::Http {
                service: SERVICE,
                status,
            }),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    result: Option<T>,
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Deserialize, Debug)]
struct ApiMessage {
    message: String,
}

impl<T> ApiEnvelope<T> {
    fn first_error(&self) -> String {
        self.errors
            .first()
            .map(|err| err.message.clone())
            .unwrap_or_else(|| "no error message supplied".to_string())
    }
}
