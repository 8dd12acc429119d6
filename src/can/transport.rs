//! # Register Transport
//!
//! The blocking request/response engine of the BIC-2200 protocol: one
//! outbound frame per transaction, then for reads a bounded poll of the bus
//! until a frame whose first two bytes echo the requested register arrives.
//! The device echoes no sequence numbers; the echoed address is the sole
//! correlation, and any frame that fails the echo check aborts the
//! transaction immediately.
//!
//! The transport is synchronous and single-threaded: `&mut self` on both
//! operations guarantees at most one in-flight transaction.

use crate::can::bus::CanBus;
use crate::can::clock::{Clock, MonotonicClock};
use crate::can::frame::{pack_request, validate_echo, CanFrame};
use crate::constants::{
    CAN_BIT_RATE, CAN_CLOCK_HZ, CAN_FRAME_MAX_DATA, CAN_ID_REPLY_BASE, CAN_ID_SEND_BASE,
    RESPONSE_TIMEOUT_MICROS,
};
use crate::error::BicError;
use log::{debug, trace};
use std::time::Duration;

/// Configuration for the CAN register transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub bit_rate: u32,
    pub clock_hz: u32,
    /// Reply window for reads. The default preserves the vendor driver's
    /// 500 µs literal; see `constants::RESPONSE_TIMEOUT_MICROS`.
    pub response_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            bit_rate: CAN_BIT_RATE,
            clock_hz: CAN_CLOCK_HZ,
            response_timeout: Duration::from_micros(RESPONSE_TIMEOUT_MICROS),
        }
    }
}

/// Blocking register transport over an injected CAN bus.
///
/// Owns the bus exclusively for its lifetime. The send and reply
/// identifiers are computed once from the device's bus address and never
/// change.
pub struct RegisterTransport<B: CanBus, C: Clock = MonotonicClock> {
    bus: B,
    clock: C,
    send_id: u32,
    reply_id: u32,
    config: TransportConfig,
}

impl<B: CanBus> RegisterTransport<B> {
    /// Configures and starts the bus, computing the device's send and reply
    /// identifiers from `bus_address`. No register traffic occurs here.
    pub fn open(bus: B, bus_address: u8, config: TransportConfig) -> Result<Self, BicError> {
        Self::open_with_clock(bus, MonotonicClock::new(), bus_address, config)
    }
}

impl<B: CanBus, C: Clock> RegisterTransport<B, C> {
    /// Like `open`, with an injected clock.
    pub fn open_with_clock(
        mut bus: B,
        clock: C,
        bus_address: u8,
        config: TransportConfig,
    ) -> Result<Self, BicError> {
        bus.configure(config.bit_rate, config.clock_hz)?;
        bus.start()?;

        let send_id = CAN_ID_SEND_BASE + u32::from(bus_address);
        let reply_id = CAN_ID_REPLY_BASE + u32::from(bus_address);
        debug!("transport up: send_id={send_id:08X} reply_id={reply_id:08X}");

        Ok(RegisterTransport {
            bus,
            clock,
            send_id,
            reply_id,
            config,
        })
    }

    /// Identifier used for controller→device frames.
    pub fn send_id(&self) -> u32 {
        self.send_id
    }

    /// Identifier the device replies on. The read path does not filter on
    /// it (the device echo is the only correlation, matching observed
    /// hardware behavior); it is exposed so a bus implementation can apply
    /// a receive filter if its deployment needs one.
    pub fn reply_id(&self) -> u32 {
        self.reply_id
    }

    /// Writes a register: one frame, fire-and-forget. Success means the
    /// frame was accepted for transmission, not that the device applied the
    /// value; the protocol has no write acknowledgement.
    pub fn write_register(&mut self, register: u16, payload: &[u8]) -> Result<(), BicError> {
        let frame = pack_request(self.send_id, register, payload)?;
        self.transmit(&frame)
    }

    /// Reads a register: sends an empty-payload request, then polls the bus
    /// until the response window closes. Returns the reply payload (the
    /// bytes after the echoed register address, at most six).
    pub fn read_register(&mut self, register: u16) -> Result<Vec<u8>, BicError> {
        let request = pack_request(self.send_id, register, &[])?;
        self.transmit(&request)?;

        let started = self.clock.now();
        let window = self.config.response_timeout;
        while self.clock.now().saturating_sub(started) < window {
            if !self.bus.poll_frame()? {
                continue;
            }

            let mut buf = [0u8; CAN_FRAME_MAX_DATA];
            let mut count = 0;
            while self.bus.available() > 0 && count < buf.len() {
                buf[count] = self.bus.read_byte()?;
                count += 1;
            }
            trace!("rx 0x{register:04X}: {}", hex::encode(&buf[..count]));

            // Abort-on-mismatch: a frame that fails the echo check ends the
            // transaction, it is never skipped over.
            let payload = validate_echo(register, &buf[..count])?;
            return Ok(payload.to_vec());
        }

        debug!("read 0x{register:04X} timed out after {window:?}");
        Err(BicError::Timeout(window))
    }

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), BicError> {
        trace!("tx {:08X}: {}", frame.id(), hex::encode(frame.data()));
        self.bus.begin_frame(frame.id())?;
        for &byte in frame.data() {
            self.bus.write_byte(byte)?;
        }
        self.bus.end_frame()
    }
}
