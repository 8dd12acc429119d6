//! # BIC-2200 Error Handling
//!
//! This module defines the BicError enum, which represents the different
//! error types that can occur in the bic2200-rs crate.

use std::time::Duration;
use thiserror::Error;

/// Represents the different error types that can occur in the BIC-2200 crate.
#[derive(Debug, Error)]
pub enum BicError {
    /// Indicates that the CAN transport could not be brought up. The caller
    /// must not attempt any register transaction after this.
    #[error("CAN transport failed to start: {0}")]
    InitFailure(String),

    /// Indicates an I/O error on the underlying CAN bus.
    #[error("CAN bus error: {0}")]
    Bus(String),

    /// Indicates that no valid reply arrived within the response window.
    #[error("no valid reply within {0:?}")]
    Timeout(Duration),

    /// Indicates that the reply echoed a different register address than the
    /// one requested. Signals a framing or bus-contention problem.
    #[error("reply echoed register 0x{echoed:04X}, requested 0x{requested:04X}")]
    EchoMismatch { requested: u16, echoed: u16 },

    /// Indicates that a reply carried fewer bytes than the decoder needs.
    #[error("reply carried {actual} byte(s), need at least {expected}")]
    ReplyTooShort { expected: usize, actual: usize },

    /// Indicates a register payload that does not fit a single CAN frame.
    #[error("register payload of {0} bytes exceeds the 6-byte frame limit")]
    PayloadTooLong(usize),

    /// Indicates a register value outside its documented encoding.
    #[error("register 0x{register:04X} returned unexpected value 0x{value:04X}")]
    InvalidValue { register: u16, value: u16 },

    /// Indicates a physical setpoint that does not fit the register's
    /// fixed-point range.
    #[error("value {value} does not fit register 0x{register:04X}")]
    OutOfRange { register: u16, value: f32 },
}
