//! BIC-2200 Protocol Constants
//!
//! This module defines the command registers and CAN identifiers of the
//! MEAN WELL BIC-2200 bidirectional power supply, based on the vendor's
//! CANBus protocol manual.

/// Operation register: 0 = OFF, 1 = ON (1 byte)
pub const CMD_OPERATION: u16 = 0x0000;

/// Output voltage setpoint, factor 0.01 V (2 bytes)
pub const CMD_VOUT_SET: u16 = 0x0020;

/// Output current setpoint, factor 0.01 A (2 bytes)
pub const CMD_IOUT_SET: u16 = 0x0030;

/// Fault status bitfield (2 bytes)
pub const CMD_FAULT_STATUS: u16 = 0x0040;

/// Input voltage readback, factor 0.1 V (2 bytes)
pub const CMD_READ_VIN: u16 = 0x0050;

/// Output voltage readback, factor 0.01 V (2 bytes)
pub const CMD_READ_VOUT: u16 = 0x0060;

/// Output current readback, factor 0.01 A (2 bytes)
pub const CMD_READ_IOUT: u16 = 0x0061;

/// Internal temperature, factor 0.1 °C (2 bytes)
pub const CMD_READ_TEMPERATURE_1: u16 = 0x0062;

/// Manufacturer ID, ASCII bytes 0..=5
pub const CMD_MFR_ID_B0B5: u16 = 0x0080;

/// Manufacturer ID, ASCII bytes 6..=11
pub const CMD_MFR_ID_B6B11: u16 = 0x0081;

/// Model name, ASCII bytes 0..=5
pub const CMD_MFR_MODEL_B0B5: u16 = 0x0082;

/// Model name, ASCII bytes 6..=11
pub const CMD_MFR_MODEL_B6B11: u16 = 0x0083;

/// Firmware revision, ASCII bytes 0..=5
pub const CMD_MFR_REVISION_B0B5: u16 = 0x0084;

/// Factory location, ASCII bytes 0..=2
pub const CMD_MFR_LOCATION_B0B2: u16 = 0x0085;

/// Manufacture date, ASCII bytes 0..=5
pub const CMD_MFR_DATE_B0B5: u16 = 0x0086;

/// Serial number, ASCII bytes 0..=5
pub const CMD_MFR_SERIAL_B0B5: u16 = 0x0087;

/// Serial number, ASCII bytes 6..=11
pub const CMD_MFR_SERIAL_B6B11: u16 = 0x0088;

/// Scaling factor register, raw value (2 bytes)
pub const CMD_SCALING_FACTOR: u16 = 0x00C0;

/// System status bitfield (2 bytes)
pub const CMD_SYSTEM_STATUS: u16 = 0x00C1;

/// System config register, 3-bit code (2 bytes)
pub const CMD_SYSTEM_CONFIG: u16 = 0x00C2;

/// Power direction register: 0 = AC→DC, 1 = DC→AC (1 byte)
pub const CMD_DIRECTION_CTRL: u16 = 0x0100;

/// Reverse (DC→AC) output voltage setpoint, factor 0.01 V (2 bytes)
pub const CMD_REVERSE_VOUT_SET: u16 = 0x0120;

/// Reverse (DC→AC) output current setpoint, factor 0.01 A (2 bytes)
pub const CMD_REVERSE_IOUT_SET: u16 = 0x0130;

/// Bidirectional config register: 0 = auto-detect, 1 = battery mode (2 bytes)
pub const CMD_BIDIRECTIONAL_CONFIG: u16 = 0x0140;

// ----------------------------------------------------------------------------
// CAN identifiers and bus parameters
// ----------------------------------------------------------------------------

/// Base identifier for controller→device frames; add the device's bus
/// address (0x00..=0x07) to form the actual send ID.
pub const CAN_ID_SEND_BASE: u32 = 0x000C_0300;

/// Base identifier for device→controller frames; add the device's bus
/// address (0x00..=0x07) to form the actual reply ID.
pub const CAN_ID_REPLY_BASE: u32 = 0x000C_0200;

/// Broadcast identifier as printed in the vendor manual. The literal does
/// not fit the 29-bit extended-ID space; the working broadcast address is
/// the send base with device address 0xFF.
pub const CAN_ID_BROADCAST: u64 = 0x00_0C_0300_FF;

/// CAN bit rate required by the BIC-2200.
pub const CAN_BIT_RATE: u32 = 250_000;

/// Reference clock of the CAN controller in the observed deployment (MCP2515).
pub const CAN_CLOCK_HZ: u32 = 8_000_000;

/// Default reply window in microseconds, kept verbatim from the vendor
/// driver. 500 µs is shorter than one 8-byte frame at 250 kbit/s, so the
/// figure was likely meant as milliseconds; widen it through
/// `TransportConfig::response_timeout` when a real device needs longer.
pub const RESPONSE_TIMEOUT_MICROS: u64 = 500;

// ----------------------------------------------------------------------------
// Frame geometry
// ----------------------------------------------------------------------------

/// Maximum data bytes in one CAN frame.
pub const CAN_FRAME_MAX_DATA: usize = 8;

/// Every request and reply starts with the register address, little-endian.
pub const REQUEST_HEADER_LEN: usize = 2;

/// Maximum register payload per frame (frame ceiling minus the echoed
/// register address).
pub const MAX_REGISTER_PAYLOAD: usize = CAN_FRAME_MAX_DATA - REQUEST_HEADER_LEN;

/// Fixed-point scale for temperature and input-voltage readbacks.
pub const SCALE_TENTH: f32 = 0.1;

/// Fixed-point scale for output readbacks and all setpoint registers.
pub const SCALE_HUNDREDTH: f32 = 0.01;
