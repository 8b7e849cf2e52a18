//! Platforms without a sysfs adapter address source.
//!
//! Resolution falls through to the hostname-derived digest id.

pub(crate) fn adapter_address() -> Option<String> {
    None
}
