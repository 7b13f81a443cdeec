//! osi-demo: walk one message down the stack and back up.
//!
//! Usage: `osi-demo [MESSAGE]` (default "Hello, Network!").
//!
//! Environment variables:
//! - OSI_LOG_LEVEL: trace|debug|info|warn|error (default debug)

use std::iter;
use std::process::ExitCode;

use osi_stack::{LayerKind, ProtocolStack};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_MESSAGE: &str = "Hello, Network!";

fn render_path(layers: impl Iterator<Item = LayerKind>) -> String {
    layers.map(|layer| layer.name()).collect::<Vec<_>>().join(" -> ")
}

fn log_layer_order() {
    for layer in LayerKind::DOWNWARD {
        match layer.below() {
            Some(next) => debug!(%layer, number = layer.number(), %next, "wraps, then delegates"),
            None => debug!(%layer, number = layer.number(), "hands bytes to the wire"),
        }
    }
    info!(path = %render_path(LayerKind::DOWNWARD.into_iter()), "send path");
    let upward = iter::successors(Some(LayerKind::Physical), |layer| layer.above());
    info!(path = %render_path(upward), "receive path");
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("OSI_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let message = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

    log_layer_order();

    let stack = ProtocolStack::new();
    match stack.lookup_address() {
        Ok(address) => info!(%address, "local network address"),
        Err(err) => info!(error = %err, fallback = %stack.config().fallback_address, "no local address"),
    }

    let wire = match stack.send(&message) {
        Ok(wire) => wire,
        Err(err) => {
            error!(error = %err, "send failed");
            return ExitCode::FAILURE;
        }
    };
    info!(bytes = wire.len(), "sent through seven layers");

    let received: String = match stack.receive(&wire) {
        Ok(value) => value,
        Err(err) => {
            error!(error = %err, "receive failed");
            return ExitCode::FAILURE;
        }
    };

    println!("sent:     {message}");
    println!("wire:     {} bytes", wire.len());
    println!("received: {received}");

    if received == message {
        ExitCode::SUCCESS
    } else {
        error!("round trip altered the message");
        ExitCode::FAILURE
    }
}
