use std::collections::BTreeMap;
use std::net::Ipv6Addr;

use log::info;

use crate::config::{RecordEntries, DYNAMIC};
use crate::dns::api::{DnsApi, PutOutcome, RecordType, Zone};
use crate::error::UpdateError;
use crate::runlog::RunLog;
use crate::wan::{ResolvedV6, WanAddresses};

/// Configuration key for a record, derived from its name within the zone.
///
/// Only the first dot-separated segment is used, so a multi-level
/// subdomain like `a.b.example.com` is keyed under `a`.
pub(crate) fn record_label<'a>(record_name: &'a str, zone_name: &str) -> &'a str {
    if record_name == zone_name {
        "root"
    } else {
        record_name.split('.').next().unwrap_or(record_name)
    }
}

/// The content a record should carry, given its configured value.
pub(crate) fn desired_content(
    record_type: RecordType,
    entry: &str,
    wan: &WanAddresses,
) -> Result<String, UpdateError> {
    match record_type {
        RecordType::A => {
            let address = wan.v4.ok_or_else(|| {
                UpdateError::InvalidAddress("no WAN IPv4 address was resolved".to_string())
            })?;
            Ok(address.to_string())
        }
        RecordType::Aaaa => {
            let resolved = wan.v6.ok_or_else(|| {
                UpdateError::InvalidAddress("no WAN IPv6 address was resolved".to_string())
            })?;
            if entry == DYNAMIC {
                Ok(resolved.address.to_string())
            } else {
                join_host_suffix(resolved.address, entry).map(|address| address.to_string())
            }
        }
    }
}

/// Replace the last two hex groups of `address` with the configured suffix.
fn join_host_suffix(address: Ipv6Addr, suffix: &str) -> Result<Ipv6Addr, UpdateError> {
    let groups = address.segments();
    let joined = format!(
        "{:x}:{:x}:{:x}:{:x}:{:x}:{:x}:{}",
        groups[0], groups[1], groups[2], groups[3], groups[4], groups[5], suffix
    );
    joined.parse().map_err(|_| {
        UpdateError::InvalidAddress(format!(
            "suffix '{}' does not form a valid IPv6 address with the ISP prefix ({})",
            suffix, joined
        ))
    })
}

/// Join every static suffix once up front, so a malformed entry aborts the
/// run before the provider is contacted.
pub(crate) fn check_suffixes(
    zones: &BTreeMap<String, RecordEntries>,
    resolved: &ResolvedV6,
) -> Result<(), UpdateError> {
    for entries in zones.values() {
        for entry in entries.values() {
            if entry != DYNAMIC {
                join_host_suffix(resolved.address, entry)?;
            }
        }
    }
    Ok(())
}

/// Bring one zone's records of one type in line with the desired values.
/// Returns how many updates were attempted, applied or not.
pub(crate) fn reconcile_zone(
    api: &dyn DnsApi,
    zone: &Zone,
    record_type: RecordType,
    entries: &RecordEntries,
    wan: &WanAddresses,
    runlog: &mut RunLog,
) -> Result<usize, UpdateError> {
    let records = api.records(&zone.id, record_type)?;
    let mut attempted = 0;
    for mut record in records {
        let label = record_label(&record.name, &zone.name);
        let entry = match entries.get(label) {
            Some(entry) => entry,
            None => continue,
        };
        let desired = desired_content(record_type, entry, wan)?;
        if record.content.eq_ignore_ascii_case(&desired) {
            runlog.info(&format!("No update necessary for {}", record.name));
            continue;
        }

        info!(
            "{} record {} currently points at {}",
            record_type, record.name, record.content
        );
        record.content = desired;
        attempted += 1;
        match api.put_record(&zone.id, &record)? {
            PutOutcome::Applied => {
                runlog.info(&format!("Updating {} completed successfully", record.name));
            }
            PutOutcome::Rejected { message } => {
                runlog.error(&format!("Updating {} failed: {}", record.name, message));
            }
        }
    }
    Ok(attempted)
}
