use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use log::{info, warn};

use crate::config::Settings;
use crate::error::UpdateError;

const PRIMARY_V4: &str = "http://myip.dnsomatic.com";
const FAILOVER_V4: &str = "http://curlmyip.com";
const PRIMARY_V6: &str = "https://api6.ipify.org";
const FAILOVER_V6: &str = "https://v6.ident.me";

const SERVICE: &str = "address service";

/// WAN addresses resolved once at the start of a run and read-only after.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WanAddresses {
    pub v4: Option<Ipv4Addr>,
    pub v6: Option<ResolvedV6>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedV6 {
    pub address: Ipv6Addr,
    pub network: Ipv6Network,
}

/// An IPv6 network in CIDR form, reduced to its base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ipv6Network {
    base: Ipv6Addr,
    prefix_length: u8,
}

impl Ipv6Network {
    pub fn new(address: Ipv6Addr, prefix_length: u8) -> Result<Ipv6Network, UpdateError> {
        if prefix_length > 128 {
            return Err(UpdateError::InvalidAddress(format!(
                "prefix length {} is longer than an IPv6 address",
                prefix_length
            )));
        }
        let mask = if prefix_length == 0 {
            0
        } else {
            !0u128 << (128 - u32::from(prefix_length))
        };
        Ok(Ipv6Network {
            base: Ipv6Addr::from(u128::from(address) & mask),
            prefix_length,
        })
    }
}

impl fmt::Display for Ipv6Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix_length)
    }
}

/// Resolve each address family that has at least one configured zone.
pub(crate) fn resolve(settings: &Settings) -> Result<WanAddresses, UpdateError> {
    let v4 = if settings.zones.is_empty() {
        None
    } else {
        Some(resolve_v4()?)
    };
    let v6 = match settings.v6_zones() {
        Some(cfg) => Some(resolve_v6(cfg.isp_prefix_length)?),
        None => None,
    };
    Ok(WanAddresses { v4, v6 })
}

pub(crate) fn resolve_v4() -> Result<Ipv4Addr, UpdateError> {
    let body = fetch_address(PRIMARY_V4, FAILOVER_V4)?;
    match parse_address(&body)? {
        IpAddr::V4(address) => {
            info!("WAN IPv4 address is {}", address);
            Ok(address)
        }
        IpAddr::V6(address) => Err(UpdateError::InvalidAddress(format!(
            "expected an IPv4 address, got {}",
            address
        ))),
    }
}

pub(crate) fn resolve_v6(prefix_length: u8) -> Result<ResolvedV6, UpdateError> {
    let body = fetch_address(PRIMARY_V6, FAILOVER_V6)?;
    let address = match parse_address(&body)? {
        IpAddr::V6(address) => address,
        IpAddr::V4(address) => {
            return Err(UpdateError::InvalidAddress(format!(
                "expected an IPv6 address, got {}",
                address
            )))
        }
    };
    let network = Ipv6Network::new(address, prefix_length)?;
    info!("WAN IPv6 address is {}, network {}", address, network);
    Ok(ResolvedV6 { address, network })
}

// Two sources for the WAN address; the second is only tried when the first
// is unreachable.
fn fetch_address(primary: &str, failover: &str) -> Result<String, UpdateError> {
    let response = match attohttpc::get(primary).send() {
        Ok(response) => response,
        Err(err) => {
            warn!(
                "Primary address service unavailable ({}), trying fail-over",
                err
            );
            attohttpc::get(failover)
                .send()
                .map_err(UpdateError::Connection)?
        }
    };
    if !response.is_success() {
        return Err(UpdateError::Http {
            service: SERVICE,
            status: response.status().to_string(),
        });
    }
    let body = response.bytes().map_err(|err| UpdateError::Api {
        service: SERVICE,
        source: err,
    })?;
    Ok(String::from_utf8_lossy(&body).trim().to_string())
}

fn parse_address(body: &str) -> Result<IpAddr, UpdateError> {
    body.parse().map_err(|_| {
        UpdateError::InvalidAddress(format!(
            "address service returned '{}', which is not an IP address",
            body
        ))
    })
}
