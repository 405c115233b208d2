use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::UpdateError;

/// Sentinel config value meaning "use the resolved WAN address".
pub(crate) const DYNAMIC: &str = "dynamic";

/// Record label -> configured value, within one zone.
pub(crate) type RecordEntries = BTreeMap<String, String>;

#[derive(Deserialize, Debug)]
pub(crate) struct Settings {
    #[serde(rename = "cloudflareEmail")]
    pub cloudflare_email: String,
    #[serde(rename = "cloudflareAuthKey")]
    pub cloudflare_auth_key: String,
    /// Zones whose A records are kept on the WAN IPv4 address.
    #[serde(default)]
    pub zones: BTreeMap<String, RecordEntries>,
    /// Zones whose AAAA records are derived from the WAN IPv6 network.
    #[serde(default)]
    pub zones_v6: Option<ZonesV6>,
    #[serde(default)]
    pub logging: Logging,
}

/// The `zones_v6` table mixes the ISP prefix length with the zone names,
/// so the zones are collected from whatever keys remain.
#[derive(Deserialize, Debug)]
pub(crate) struct ZonesV6 {
    #[serde(rename = "isp_prefixlength")]
    pub isp_prefix_length: u8,
    #[serde(flatten)]
    pub zones: BTreeMap<String, RecordEntries>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct Logging {
    /// Append-only run log; no file means no mirror.
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub syslog: bool,
}

pub(crate) fn load(path: &Path) -> Result<Settings, UpdateError> {
    let file = File::open(path).map_err(|err| {
        UpdateError::Config(format!("cannot open {}: {}", path.display(), err))
    })?;
    let settings: Settings = serde_yaml::from_reader(file).map_err(|err| {
        UpdateError::Config(format!("cannot parse {}: {}", path.display(), err))
    })?;
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    fn validate(&self) -> Result<(), UpdateError> {
        if self.cloudflare_email.is_empty() || self.cloudflare_auth_key.is_empty() {
            return Err(UpdateError::Config(
                "cloudflareEmail and cloudflareAuthKey must both be set".to_string(),
            ));
        }
        if let Some(v6) = &self.zones_v6 {
            if v6.isp_prefix_length == 0 || v6.isp_prefix_length > 128 {
                return Err(UpdateError::Config(format!(
                    "isp_prefixlength {} is not between 1 and 128",
                    v6.isp_prefix_length
                )));
            }
        }
        if self.zones.is_empty() && self.v6_zones().is_none() {
            return Err(UpdateError::Config("no zones configured".to_string()));
        }
        Ok(())
    }

    /// The v6 zone table, if it exists and actually names any zones.
    pub(crate) fn v6_zones(&self) -> Option<&ZonesV6> {
        self.zones_v6.as_ref().filter(|v6| !v6.zones.is_empty())
    }
}
