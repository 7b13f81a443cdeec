//! Stack configuration.
//!
//! All envelope metadata is configuration rather than literals, so tests can
//! inject distinguishable values for every layer.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_PROBE_TARGET, DEFAULT_PROTOCOL, DEFAULT_SEQUENCE, DEFAULT_SESSION_STATE,
    FALLBACK_NETWORK_ADDRESS,
};
use super::hardware::MacAddress;

/// Metadata the layers attach to their envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Application protocol tag.
    pub protocol: String,
    /// Session state tag.
    pub session_state: String,
    /// Transport sequence label.
    pub sequence: u32,
    /// Data link hardware address.
    pub hardware_address: MacAddress,
    /// Network address used when the provider fails.
    pub fallback_address: IpAddr,
    /// Reference host for the system address probe.
    pub probe_target: SocketAddr,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            session_state: DEFAULT_SESSION_STATE.to_string(),
            sequence: DEFAULT_SEQUENCE,
            hardware_address: MacAddress::default(),
            fallback_address: FALLBACK_NETWORK_ADDRESS,
            probe_target: DEFAULT_PROBE_TARGET,
        }
    }
}

impl StackConfig {
    /// Create a config with default metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application protocol tag.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Set the session state tag.
    pub fn with_session_state(mut self, state: impl Into<String>) -> Self {
        self.session_state = state.into();
        self
    }

    /// Set the transport sequence label.
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set the hardware address.
    pub fn with_hardware_address(mut self, address: MacAddress) -> Self {
        self.hardware_address = address;
        self
    }

    /// Set the placeholder network address.
    pub fn with_fallback_address(mut self, address: IpAddr) -> Self {
        self.fallback_address = address;
        self
    }

    /// Set the probe's reference host.
    pub fn with_probe_target(mut self, target: SocketAddr) -> Self {
        self.probe_target = target;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StackConfig::default();
        assert_eq!(config.protocol, "HTTP");
        assert_eq!(config.session_state, "Active");
        assert_eq!(config.sequence, 1);
        assert_eq!(config.hardware_address.to_string(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(config.fallback_address.to_string(), "192.168.1.1");
        assert_eq!(config.probe_target.to_string(), "8.8.8.8:80");
    }

    #[test]
    fn test_builder_methods() {
        let config = StackConfig::new()
            .with_protocol("GOPHER")
            .with_session_state("Resumed")
            .with_sequence(42)
            .with_hardware_address(MacAddress::new([2, 0, 0, 0, 0, 1]))
            .with_fallback_address("10.0.0.9".parse().unwrap());

        assert_eq!(config.protocol, "GOPHER");
        assert_eq!(config.session_state, "Resumed");
        assert_eq!(config.sequence, 42);
        assert_eq!(config.hardware_address.octets(), [2, 0, 0, 0, 0, 1]);
        assert_eq!(config.fallback_address.to_string(), "10.0.0.9");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StackConfig =
            serde_json::from_str(r#"{"sequence": 7, "hardware_address": "02:00:00:00:00:07"}"#)
                .unwrap();

        assert_eq!(config.sequence, 7);
        assert_eq!(config.hardware_address.to_string(), "02:00:00:00:00:07");
        assert_eq!(config.protocol, "HTTP");
        assert_eq!(config.fallback_address, FALLBACK_NETWORK_ADDRESS);
    }
}
