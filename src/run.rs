use log::debug;

use crate::config::Settings;
use crate::dns::api::{DnsApi, RecordType, Zone};
use crate::dns::reconcile::{check_suffixes, reconcile_zone};
use crate::error::UpdateError;
use crate::runlog::RunLog;
use crate::wan::WanAddresses;

/// Zones present both remotely and in config, in remote order.
pub(crate) fn matching_zones<'a>(remote: &'a [Zone], settings: &Settings) -> Vec<&'a Zone> {
    remote
        .iter()
        .filter(|zone| {
            settings.zones.contains_key(&zone.name)
                || settings
                    .v6_zones()
                    .map_or(false, |v6| v6.zones.contains_key(&zone.name))
        })
        .collect()
}

/// One full reconciliation pass: list the active zones, then bring every
/// configured record of every matched zone in line with the WAN addresses.
pub(crate) fn run(
    settings: &Settings,
    api: &dyn DnsApi,
    wan: &WanAddresses,
    runlog: &mut RunLog,
) -> Result<(), UpdateError> {
    if let (Some(v6cfg), Some(resolved)) = (settings.v6_zones(), wan.v6.as_ref()) {
        debug!("AAAA suffixes will be joined with {}", resolved.network);
        check_suffixes(&v6cfg.zones, resolved)?;
    }

    let zones = api.active_zones()?;
    let mut attempted = 0;
    for zone in matching_zones(&zones, settings) {
        runlog.info(&format!("Found zone {}", zone.name));
        if let Some(entries) = settings.zones.get(&zone.name) {
            attempted += reconcile_zone(api, zone, RecordType::A, entries, wan, runlog)?;
        }
        if let Some(entries) = settings.v6_zones().and_then(|v6| v6.zones.get(&zone.name)) {
            attempted += reconcile_zone(api, zone, RecordType::Aaaa, entries, wan, runlog)?;
        }
    }
    runlog.info(&format!("All done, attempted {} update(s)", attempted));
    Ok(())
}
