//! Protocol publisher adapters
//!
//! Each adapter turns notifications into calls on a narrow, injected
//! transport trait. The wire-level clients live outside this crate.

pub mod knx;
pub mod mqtt;

pub use knx::{KnxBus, KnxStatusPublisher, KnxValue, StatusId};
pub use mqtt::{MqttStatusPublisher, MqttTransport, DEFAULT_TOPIC_PREFIX};
