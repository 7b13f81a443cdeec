//! Stack assembly and the public send/receive surface.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(feature = "probe"))]
use crate::address::Offline;
#[cfg(feature = "probe")]
use crate::address::UdpProbe;
use crate::core::{AddressProvider, StackConfig, StackResult};
use crate::layers::{
    ApplicationLayer, DataLinkLayer, NetworkLayer, PhysicalLayer, PresentationLayer,
    SessionLayer, TransportLayer,
};

/// The full seven-layer pipeline.
pub type Stack = ApplicationLayer<
    PresentationLayer<SessionLayer<TransportLayer<NetworkLayer<DataLinkLayer<PhysicalLayer>>>>>,
>;

/// The provider used when none is injected.
#[cfg(feature = "probe")]
fn system_provider(config: &StackConfig) -> Arc<dyn AddressProvider> {
    Arc::new(UdpProbe::new(config.probe_target))
}

#[cfg(not(feature = "probe"))]
fn system_provider(_config: &StackConfig) -> Arc<dyn AddressProvider> {
    Arc::new(Offline)
}

/// Builder for [`ProtocolStack`].
#[derive(Clone, Default)]
pub struct StackBuilder {
    config: StackConfig,
    provider: Option<Arc<dyn AddressProvider>>,
}

impl fmt::Debug for StackBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackBuilder")
            .field("config", &self.config)
            .field("provider", &self.provider.as_ref().map(|_| "<injected>"))
            .finish()
    }
}

impl StackBuilder {
    /// Create a builder with default metadata and the system provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for every layer's metadata.
    pub fn config(mut self, config: StackConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject the network layer's address provider.
    pub fn address_provider(mut self, provider: impl AddressProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Inject an already shared address provider.
    pub fn shared_address_provider(mut self, provider: Arc<dyn AddressProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Assemble the stack bottom-up.
    pub fn build(self) -> ProtocolStack {
        let config = self.config;
        let provider = self
            .provider
            .unwrap_or_else(|| system_provider(&config));

        let physical = PhysicalLayer::new();
        let data_link = DataLinkLayer::new(config.hardware_address, physical);
        let network = NetworkLayer::new(Arc::clone(&provider), config.fallback_address, data_link);
        let transport = TransportLayer::new(config.sequence, network);
        let session = SessionLayer::new(config.session_state.clone(), transport);
        let presentation = PresentationLayer::new(session);
        let application = ApplicationLayer::new(config.protocol.clone(), presentation);

        ProtocolStack {
            application,
            provider,
            config,
        }
    }
}

/// A ready-to-use stack: [`send`](Self::send) descends all seven layers,
/// [`receive`](Self::receive) climbs back up.
///
/// Immutable once built; share it by reference across threads freely.
#[derive(Clone)]
pub struct ProtocolStack {
    application: Stack,
    provider: Arc<dyn AddressProvider>,
    config: StackConfig,
}

impl fmt::Debug for ProtocolStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolStack")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ProtocolStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolStack {
    /// Build a stack with default metadata and the system provider.
    pub fn new() -> Self {
        StackBuilder::new().build()
    }

    /// Start building a customised stack.
    pub fn builder() -> StackBuilder {
        StackBuilder::new()
    }

    /// Encode `value` down to physical bytes.
    pub fn send<T: Serialize + ?Sized>(&self, value: &T) -> StackResult<Vec<u8>> {
        self.application.encode(value)
    }

    /// Decode physical bytes back to the caller's value.
    pub fn receive<T: DeserializeOwned>(&self, data: &[u8]) -> StackResult<T> {
        self.application.decode(data)
    }

    /// Ask the provider for the local address, without the fallback.
    pub fn lookup_address(&self) -> StackResult<IpAddr> {
        Ok(self.provider.local_address()?)
    }

    /// The configuration the stack was built with.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// The top of the pipeline.
    pub fn application(&self) -> &Stack {
        &self.application
    }

    /// The network layer, for inspecting its address resolution.
    pub fn network(&self) -> &NetworkLayer<DataLinkLayer<PhysicalLayer>> {
        self.application.lower().lower().lower().lower()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{Offline, StaticAddress};
    use crate::core::{Layer, MacAddress, StackError};

    fn offline_stack() -> ProtocolStack {
        ProtocolStack::builder().address_provider(Offline).build()
    }

    #[test]
    fn test_hello_network() {
        let stack = offline_stack();
        let wire = stack.send("Hello, Network!").unwrap();
        let back: String = stack.receive(&wire).unwrap();
        assert_eq!(back, "Hello, Network!");
    }

    #[test]
    fn test_config_reaches_every_layer() {
        let config = StackConfig::new()
            .with_protocol("FTP")
            .with_session_state("Paused")
            .with_sequence(9)
            .with_hardware_address(MacAddress::new([2, 0, 0, 0, 0, 9]))
            .with_fallback_address("10.9.9.9".parse().unwrap());
        let stack = ProtocolStack::builder()
            .config(config)
            .address_provider(Offline)
            .build();

        let app = stack.application();
        assert_eq!(app.protocol(), "FTP");
        let session = app.lower().lower();
        assert_eq!(session.state(), "Paused");
        assert_eq!(session.lower().sequence(), 9);
        assert_eq!(stack.network().fallback_address().to_string(), "10.9.9.9");
        assert_eq!(stack.network().source_address().to_string(), "10.9.9.9");
        assert_eq!(
            stack.network().lower().hardware_address().to_string(),
            "02:00:00:00:00:09"
        );
    }

    #[test]
    fn test_lookup_address_reports_failure() {
        let stack = offline_stack();
        assert!(matches!(
            stack.lookup_address(),
            Err(StackError::AddressLookup(_))
        ));
        // the send path still succeeds through the fallback
        assert!(stack.send("still works").is_ok());
    }

    #[test]
    fn test_injected_provider() {
        let stack = ProtocolStack::builder()
            .address_provider(StaticAddress("172.16.4.2".parse().unwrap()))
            .build();
        assert_eq!(stack.lookup_address().unwrap().to_string(), "172.16.4.2");

        let network = stack.network();
        let packet = network.encapsulate(b"x").unwrap();
        assert!(String::from_utf8(packet).unwrap().contains("172.16.4.2"));
    }

    #[test]
    fn test_stack_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProtocolStack>();

        let stack = offline_stack();
        std::thread::scope(|s| {
            for i in 0..4 {
                let stack = &stack;
                s.spawn(move || {
                    let wire = stack.send(&i).unwrap();
                    assert_eq!(stack.receive::<i32>(&wire).unwrap(), i);
                });
            }
        });
    }
}
