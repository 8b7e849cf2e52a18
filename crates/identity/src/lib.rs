//! Stable per-machine identity.
//!
//! The notice service keys subscriptions by a machine identifier. On
//! Linux this is the primary network adapter's MAC address read from
//! sysfs; where no adapter address is readable, a digest of the
//! hostname stands in.

#[cfg(target_os = "linux")]
#[path = "linux.rs"]
mod platform;

#[cfg(not(target_os = "linux"))]
#[path = "fallback.rs"]
mod platform;

use tracing::debug;

/// Errors from identity resolution.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// No stable identifier could be derived. Not transient: callers
    /// must not retry and must not open a connection without an id.
    #[error("no stable machine identifier available")]
    Unavailable,
}

/// Resolves the stable machine id.
pub fn machine_id() -> Result<String, IdentityError> {
    if let Some(mac) = platform::adapter_address() {
        debug!(machine_id = %mac, "using adapter address");
        return Ok(mac);
    }

    let id = hostname_id()?;
    debug!(machine_id = %id, "using hostname-derived id");
    Ok(id)
}

/// Derives the fallback id from the hostname.
fn hostname_id() -> Result<String, IdentityError> {
    let host = hostname::get().map_err(|_| IdentityError::Unavailable)?;
    let host = host.to_string_lossy();
    let host = host.trim();
    if host.is_empty() {
        return Err(IdentityError::Unavailable);
    }
    Ok(digest_id(host))
}

/// Produces a MAC-sized hex id from a stable seed.
///
/// 12 hex chars from SHA-256(`{seed}-{os}-machine`).
pub(crate) fn digest_id(seed: &str) -> String {
    use std::fmt::Write;
    let data = format!("{seed}-{}-machine", std::env::consts::OS);
    let digest = <sha2::Sha256 as sha2::Digest>::digest(data.as_bytes());
    let mut hex = String::with_capacity(12);
    for byte in &digest[..6] {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Returns `true` for a usable MAC address string. Rejects empty
/// strings and the all-zero address some virtual interfaces report.
pub(crate) fn usable_mac(mac: &str) -> bool {
    let mac = mac.trim();
    !mac.is_empty() && mac.chars().any(|c| c.is_ascii_hexdigit() && c != '0')
}
