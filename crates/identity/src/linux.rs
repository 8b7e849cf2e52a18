//! Adapter address lookup via sysfs.

use tracing::debug;

/// Returns the MAC address of the first usable network interface.
///
/// Interfaces are considered in name order; loopback and link-local
/// (169.254.x.x) interfaces are skipped, as are all-zero addresses.
pub(crate) fn adapter_address() -> Option<String> {
    let mut names: Vec<String> = if_addrs::get_if_addrs()
        .unwrap_or_default()
        .into_iter()
        .filter(|iface| !iface.is_loopback())
        .filter(|iface| match iface.addr.ip() {
            std::net::IpAddr::V4(ip) => !(ip.octets()[0] == 169 && ip.octets()[1] == 254),
            std::net::IpAddr::V6(_) => true,
        })
        .map(|iface| iface.name)
        .collect();
    names.sort();
    names.dedup();

    for name in names {
        let path = format!("/sys/class/net/{name}/address");
        if let Ok(mac) = std::fs::read_to_string(&path) {
            let mac = mac.trim().to_ascii_lowercase();
            if crate::usable_mac(&mac) {
                debug!(interface = %name, "found adapter address");
                return Some(mac);
            }
        }
    }

    None
}
