//! Stable event type names carried by notifications
//!
//! These strings are part of the external contract: MQTT topics and KNX
//! mappings are derived from them.

/// Full zone status after a meaningful change
pub const ZONE_STATE: &str = "ZONE_STATE";

/// Full client status after a meaningful change
pub const CLIENT_STATE: &str = "CLIENT_STATE";

/// System-wide status (startup, health)
pub const SYSTEM_STATUS: &str = "SYSTEM_STATUS";

/// System-wide error report
pub const SYSTEM_ERROR: &str = "SYSTEM_ERROR";
