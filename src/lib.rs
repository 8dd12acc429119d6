//! # bic2200-rs - A Rust Crate for MEAN WELL BIC-2200 CAN Control
//!
//! The bic2200-rs crate controls a MEAN WELL BIC-2200 bidirectional AC/DC
//! power supply over a shared CAN bus, using the device's 16-bit register
//! request/response protocol.
//!
//! ## Features
//!
//! - Blocking register read/write transactions with a bounded reply window
//! - Echo validation of replies (the protocol's only correlation mechanism)
//! - Named, scaled accessors for the full register map: operation,
//!   direction, setpoints, readbacks, status bitfields, system config
//! - Injectable bus and clock for deterministic tests without hardware
//! - Optional Linux SocketCAN backend (`socketcan` feature)
//! - Support for logging and error handling
//!
//! ## Usage
//!
//! ```rust
//! use bic2200_rs::{Bic2200, MockCanBus, TransportConfig};
//! use std::time::Duration;
//!
//! let bus = MockCanBus::new();
//! bus.queue_reply(0x000C_0200, &[0x62, 0x00, 0xD2, 0x00]);
//!
//! let config = TransportConfig {
//!     response_timeout: Duration::from_millis(500),
//!     ..TransportConfig::default()
//! };
//! let mut bic = Bic2200::open(bus, 0x00, config).unwrap();
//! assert_eq!(bic.read_temperature().unwrap(), 21.0);
//! ```

pub mod can;
pub mod constants;
pub mod device;
pub mod error;
pub mod logging;

pub use crate::error::BicError;
pub use crate::logging::{init_logger, log_info};

// Core transport types
pub use can::bus::CanBus;
pub use can::clock::{Clock, MonotonicClock, TestClock};
pub use can::frame::CanFrame;
pub use can::mock::MockCanBus;
pub use can::transport::{RegisterTransport, TransportConfig};

// Device API
pub use device::{
    Bic2200, BidirectionalMode, DeviceInfo, Direction, FaultStatus, PowerOnPreset, SystemConfig,
    SystemStatus,
};

#[cfg(feature = "socketcan")]
pub use can::socketcan::SocketCanBus;
