//! # Register Frame Encoding and Decoding
//!
//! Every BIC-2200 transaction rides in a single CAN frame. A request frame
//! carries the 16-bit register address little-endian in its first two data
//! bytes, followed by up to six payload bytes; a reply frame echoes the
//! register address in the same position, followed by the register value.
//! The echoed address is the protocol's only request/response correlation
//! mechanism.

use crate::constants::{CAN_FRAME_MAX_DATA, MAX_REGISTER_PAYLOAD, REQUEST_HEADER_LEN};
use crate::error::BicError;

/// One CAN frame: a 29-bit extended identifier and up to 8 data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanFrame {
    id: u32,
    data: [u8; CAN_FRAME_MAX_DATA],
    len: usize,
}

impl CanFrame {
    /// Creates a frame from raw data bytes, or `None` if the data does not
    /// fit a single frame.
    pub fn new(id: u32, data: &[u8]) -> Option<Self> {
        if data.len() > CAN_FRAME_MAX_DATA {
            return None;
        }
        let mut buf = [0u8; CAN_FRAME_MAX_DATA];
        buf[..data.len()].copy_from_slice(data);
        Some(CanFrame {
            id,
            data: buf,
            len: data.len(),
        })
    }

    /// The frame's bus identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The frame's data bytes.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Number of data bytes in the frame.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the frame carries no data bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Packs a register request frame: `[low(register), high(register)]`
/// followed by the payload. Read requests use an empty payload.
///
/// Payloads longer than six bytes cannot share a frame with the register
/// address and are rejected, never truncated.
pub fn pack_request(id: u32, register: u16, payload: &[u8]) -> Result<CanFrame, BicError> {
    if payload.len() > MAX_REGISTER_PAYLOAD {
        return Err(BicError::PayloadTooLong(payload.len()));
    }
    let mut data = [0u8; CAN_FRAME_MAX_DATA];
    data[..REQUEST_HEADER_LEN].copy_from_slice(&register.to_le_bytes());
    data[REQUEST_HEADER_LEN..REQUEST_HEADER_LEN + payload.len()].copy_from_slice(payload);
    Ok(CanFrame {
        id,
        data,
        len: REQUEST_HEADER_LEN + payload.len(),
    })
}

/// Checks the echoed register address at the start of a reply and returns
/// the remaining bytes as the register payload.
pub fn validate_echo(register: u16, received: &[u8]) -> Result<&[u8], BicError> {
    if received.len() < REQUEST_HEADER_LEN {
        return Err(BicError::ReplyTooShort {
            expected: REQUEST_HEADER_LEN,
            actual: received.len(),
        });
    }
    let echoed = u16::from_le_bytes([received[0], received[1]]);
    if echoed != register {
        return Err(BicError::EchoMismatch {
            requested: register,
            echoed,
        });
    }
    Ok(&received[REQUEST_HEADER_LEN..])
}

/// Decodes a two-byte little-endian register payload.
pub fn decode_u16_le(payload: &[u8]) -> Result<u16, BicError> {
    if payload.len() < 2 {
        return Err(BicError::ReplyTooShort {
            expected: 2,
            actual: payload.len(),
        });
    }
    Ok(u16::from_le_bytes([payload[0], payload[1]]))
}

/// Decodes a one-byte register payload (boolean-style registers).
pub fn decode_u8(payload: &[u8]) -> Result<u8, BicError> {
    payload.first().copied().ok_or(BicError::ReplyTooShort {
        expected: 1,
        actual: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_request_places_address_little_endian() {
        let frame = pack_request(0x000C_0300, 0x0062, &[]).unwrap();
        assert_eq!(frame.data(), &[0x62, 0x00]);
    }

    #[test]
    fn pack_request_appends_payload_after_address() {
        let frame = pack_request(0x000C_0300, 0x0020, &[0xC0, 0x12]).unwrap();
        assert_eq!(frame.data(), &[0x20, 0x00, 0xC0, 0x12]);
    }

    #[test]
    fn pack_request_rejects_oversized_payload() {
        let err = pack_request(0x000C_0300, 0x0080, &[0u8; 7]).unwrap_err();
        assert!(matches!(err, BicError::PayloadTooLong(7)));
    }

    #[test]
    fn validate_echo_returns_payload_on_match() {
        let payload = validate_echo(0x0062, &[0x62, 0x00, 0xD2, 0x00]).unwrap();
        assert_eq!(payload, &[0xD2, 0x00]);
    }

    #[test]
    fn validate_echo_rejects_wrong_register() {
        let err = validate_echo(0x0062, &[0x01, 0x00, 0xD2, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            BicError::EchoMismatch {
                requested: 0x0062,
                echoed: 0x0001
            }
        ));
    }

    #[test]
    fn frame_data_larger_than_eight_bytes_is_refused() {
        assert!(CanFrame::new(0x000C_0300, &[0u8; 9]).is_none());
    }
}
