//! CAN bus collaborator interface.
//!
//! The register transport drives the bus only through this trait, so real
//! hardware and deterministic test doubles share one transport
//! implementation. The primitive set mirrors a classic CAN controller
//! driver: stage an outbound frame byte by byte, then a non-blocking poll
//! plus byte drain on the inbound side.

use crate::error::BicError;

/// Byte-level access to a CAN controller.
pub trait CanBus {
    /// Applies bit rate and controller reference clock. Called once before
    /// `start`; implementations whose bit timing is configured out-of-band
    /// may record and ignore the values.
    fn configure(&mut self, bit_rate: u32, clock_hz: u32) -> Result<(), BicError>;

    /// Brings the controller onto the bus. No frame may be sent or received
    /// before this succeeds.
    fn start(&mut self) -> Result<(), BicError>;

    /// Begins staging an outbound extended-ID frame.
    fn begin_frame(&mut self, id: u32) -> Result<(), BicError>;

    /// Appends one data byte to the staged frame.
    fn write_byte(&mut self, byte: u8) -> Result<(), BicError>;

    /// Transmits the staged frame as one atomic bus frame.
    fn end_frame(&mut self) -> Result<(), BicError>;

    /// Non-blocking check for an arrived frame. On `true` the frame's data
    /// bytes become readable through `available`/`read_byte`.
    fn poll_frame(&mut self) -> Result<bool, BicError>;

    /// Number of received bytes not yet drained.
    fn available(&self) -> usize;

    /// Drains one received byte.
    fn read_byte(&mut self) -> Result<u8, BicError>;
}
