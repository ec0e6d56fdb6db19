pub mod codec;
pub mod commands;
pub mod debounce;
pub mod dps;
pub mod envelope;
pub mod proto;
pub mod reconciler;
pub mod session;
pub mod state;
pub mod tracker;
pub mod transport;

use std::collections::BTreeMap;

/// DPS id (decimal string) -> raw value, as carried in the envelope's `data`.
pub type DpsMap = BTreeMap<String, serde_json::Value>;

/// Action parameters as received from the host.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// An appliance update ready to publish on the host broker.
pub struct DeviceUpdate {
    pub topic_name: String,
    /// Topic suffix under the device, `state` or `link`.
    pub channel: &'static str,
    pub value: String,
}

/// A host command for one appliance.
pub struct DeviceCommand {
    pub action: String,
    pub params: Params,
}
