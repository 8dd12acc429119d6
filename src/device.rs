//! # BIC-2200 Device API
//!
//! Named, scaled accessors over the register transport. Each method maps a
//! device quantity onto its command register, chooses the 1- or 2-byte wire
//! encoding, and applies the fixed-point scale documented in the vendor's
//! register map (0.1 for temperature and input voltage, 0.01 for output
//! readbacks and all setpoints).

use crate::can::bus::CanBus;
use crate::can::clock::{Clock, MonotonicClock};
use crate::can::frame::{decode_u16_le, decode_u8};
use crate::can::transport::{RegisterTransport, TransportConfig};
use crate::constants::*;
use crate::error::BicError;
use bitflags::bitflags;

/// Power flow direction of the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    /// AC→DC (charging).
    Forward = 0,
    /// DC→AC (discharging / grid feed).
    Reverse = 1,
}

impl TryFrom<u8> for Direction {
    type Error = BicError;

    fn try_from(value: u8) -> Result<Self, BicError> {
        match value {
            0 => Ok(Direction::Forward),
            1 => Ok(Direction::Reverse),
            v => Err(BicError::InvalidValue {
                register: CMD_DIRECTION_CTRL,
                value: u16::from(v),
            }),
        }
    }
}

/// Bidirectional operating mode (register 0x0140).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum BidirectionalMode {
    /// Direction follows automatic detection; DIR_CTRL is not controllable.
    AutoDetect = 0,
    /// Battery mode; DIR_CTRL and the C/D input control the direction.
    Battery = 1,
}

impl TryFrom<u16> for BidirectionalMode {
    type Error = BicError;

    fn try_from(value: u16) -> Result<Self, BicError> {
        match value {
            0 => Ok(BidirectionalMode::AutoDetect),
            1 => Ok(BidirectionalMode::Battery),
            value => Err(BicError::InvalidValue {
                register: CMD_BIDIRECTIONAL_CONFIG,
                value,
            }),
        }
    }
}

/// Output preset applied at power-on (SYSTEM_CONFIG bits 1..=2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PowerOnPreset {
    Off = 0,
    On = 1,
    Previous = 2,
}

/// SYSTEM_CONFIG register (0x00C2), a 3-bit code: bit 0 enables CAN
/// control, bits 1..=2 select the power-on preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConfig {
    pub can_control: bool,
    pub preset: PowerOnPreset,
}

impl SystemConfig {
    pub fn to_raw(self) -> u16 {
        (self.preset as u16) << 1 | u16::from(self.can_control)
    }

    pub fn from_raw(value: u16) -> Result<Self, BicError> {
        let preset = match value >> 1 {
            0 => PowerOnPreset::Off,
            1 => PowerOnPreset::On,
            2 => PowerOnPreset::Previous,
            _ => {
                return Err(BicError::InvalidValue {
                    register: CMD_SYSTEM_CONFIG,
                    value,
                })
            }
        };
        Ok(SystemConfig {
            can_control: value & 0x01 != 0,
            preset,
        })
    }
}

bitflags! {
    /// FAULT_STATUS register (0x0040) per the vendor protocol manual.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FaultStatus: u16 {
        const FAN_FAIL = 1 << 0;
        const OTP = 1 << 1;
        const OVP = 1 << 2;
        const OLP = 1 << 3;
        const SHORT_CIRCUIT = 1 << 4;
        const AC_FAIL = 1 << 5;
        const OP_OFF = 1 << 6;
        const HI_TEMP = 1 << 7;
    }

    /// SYSTEM_STATUS register (0x00C1) per the vendor protocol manual.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SystemStatus: u16 {
        /// Device is operating as a slave in a parallel group.
        const SLAVE = 1 << 0;
        const DC_OK = 1 << 1;
        const PFC_OK = 1 << 2;
        const ADL_ON = 1 << 5;
        const INITIAL_STATE = 1 << 6;
        const EEPROM_ERROR = 1 << 7;
    }
}

/// Identity strings read from the manufacturer info registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub model: String,
    pub revision: String,
    pub location: String,
    pub date: String,
    pub serial: String,
}

/// High-level handle to one BIC-2200 on the bus.
pub struct Bic2200<B: CanBus, C: Clock = MonotonicClock> {
    transport: RegisterTransport<B, C>,
}

impl<B: CanBus> Bic2200<B> {
    /// Opens the device at `bus_address` (0x00..=0x07) on the given bus.
    pub fn open(bus: B, bus_address: u8, config: TransportConfig) -> Result<Self, BicError> {
        Ok(Bic2200 {
            transport: RegisterTransport::open(bus, bus_address, config)?,
        })
    }
}

impl<B: CanBus, C: Clock> Bic2200<B, C> {
    /// Like `open`, with an injected clock.
    pub fn open_with_clock(
        bus: B,
        clock: C,
        bus_address: u8,
        config: TransportConfig,
    ) -> Result<Self, BicError> {
        Ok(Bic2200 {
            transport: RegisterTransport::open_with_clock(bus, clock, bus_address, config)?,
        })
    }

    /// Raw access to the underlying register transport, for registers this
    /// API does not cover.
    pub fn transport(&mut self) -> &mut RegisterTransport<B, C> {
        &mut self.transport
    }

    /// Turns the output ON or OFF.
    pub fn set_operation(&mut self, on: bool) -> Result<(), BicError> {
        self.write_u8(CMD_OPERATION, u8::from(on))
    }

    /// Whether the output is currently ON.
    pub fn operation(&mut self) -> Result<bool, BicError> {
        match self.read_u8(CMD_OPERATION)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(BicError::InvalidValue {
                register: CMD_OPERATION,
                value: u16::from(value),
            }),
        }
    }

    /// Sets the power flow direction. Only effective in battery mode.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), BicError> {
        self.write_u8(CMD_DIRECTION_CTRL, direction as u8)
    }

    /// Current power flow direction.
    pub fn direction(&mut self) -> Result<Direction, BicError> {
        Direction::try_from(self.read_u8(CMD_DIRECTION_CTRL)?)
    }

    /// Internal temperature in °C.
    pub fn read_temperature(&mut self) -> Result<f32, BicError> {
        Ok(f32::from(self.read_u16(CMD_READ_TEMPERATURE_1)?) * SCALE_TENTH)
    }

    /// Input (AC side) voltage in V.
    pub fn read_input_voltage(&mut self) -> Result<f32, BicError> {
        Ok(f32::from(self.read_u16(CMD_READ_VIN)?) * SCALE_TENTH)
    }

    /// Output voltage readback in V.
    pub fn read_output_voltage(&mut self) -> Result<f32, BicError> {
        Ok(f32::from(self.read_u16(CMD_READ_VOUT)?) * SCALE_HUNDREDTH)
    }

    /// Output current readback in A.
    pub fn read_output_current(&mut self) -> Result<f32, BicError> {
        Ok(f32::from(self.read_u16(CMD_READ_IOUT)?) * SCALE_HUNDREDTH)
    }

    /// Sets the output voltage in V (wire encoding: centivolts).
    pub fn set_output_voltage(&mut self, volts: f32) -> Result<(), BicError> {
        let raw = to_fixed(CMD_VOUT_SET, volts, SCALE_HUNDREDTH)?;
        self.write_u16(CMD_VOUT_SET, raw)
    }

    /// Output voltage setpoint in V.
    pub fn output_voltage_setpoint(&mut self) -> Result<f32, BicError> {
        Ok(f32::from(self.read_u16(CMD_VOUT_SET)?) * SCALE_HUNDREDTH)
    }

    /// Sets the output current limit in A (wire encoding: centiamps).
    pub fn set_output_current(&mut self, amps: f32) -> Result<(), BicError> {
        let raw = to_fixed(CMD_IOUT_SET, amps, SCALE_HUNDREDTH)?;
        self.write_u16(CMD_IOUT_SET, raw)
    }

    /// Output current setpoint in A.
    pub fn output_current_setpoint(&mut self) -> Result<f32, BicError> {
        Ok(f32::from(self.read_u16(CMD_IOUT_SET)?) * SCALE_HUNDREDTH)
    }

    /// Sets the reverse (DC→AC) voltage setpoint in V.
    pub fn set_reverse_output_voltage(&mut self, volts: f32) -> Result<(), BicError> {
        let raw = to_fixed(CMD_REVERSE_VOUT_SET, volts, SCALE_HUNDREDTH)?;
        self.write_u16(CMD_REVERSE_VOUT_SET, raw)
    }

    /// Reverse voltage setpoint in V.
    pub fn reverse_output_voltage_setpoint(&mut self) -> Result<f32, BicError> {
        Ok(f32::from(self.read_u16(CMD_REVERSE_VOUT_SET)?) * SCALE_HUNDREDTH)
    }

    /// Sets the reverse (DC→AC) current setpoint in A.
    pub fn set_reverse_output_current(&mut self, amps: f32) -> Result<(), BicError> {
        let raw = to_fixed(CMD_REVERSE_IOUT_SET, amps, SCALE_HUNDREDTH)?;
        self.write_u16(CMD_REVERSE_IOUT_SET, raw)
    }

    /// Reverse current setpoint in A.
    pub fn reverse_output_current_setpoint(&mut self) -> Result<f32, BicError> {
        Ok(f32::from(self.read_u16(CMD_REVERSE_IOUT_SET)?) * SCALE_HUNDREDTH)
    }

    /// Fault status bitfield.
    pub fn fault_status(&mut self) -> Result<FaultStatus, BicError> {
        Ok(FaultStatus::from_bits_retain(
            self.read_u16(CMD_FAULT_STATUS)?,
        ))
    }

    /// System status bitfield.
    pub fn system_status(&mut self) -> Result<SystemStatus, BicError> {
        Ok(SystemStatus::from_bits_retain(
            self.read_u16(CMD_SYSTEM_STATUS)?,
        ))
    }

    /// Writes the SYSTEM_CONFIG register. Takes effect after a power cycle.
    pub fn set_system_config(&mut self, config: SystemConfig) -> Result<(), BicError> {
        self.write_u16(CMD_SYSTEM_CONFIG, config.to_raw())
    }

    /// Reads the SYSTEM_CONFIG register.
    pub fn system_config(&mut self) -> Result<SystemConfig, BicError> {
        SystemConfig::from_raw(self.read_u16(CMD_SYSTEM_CONFIG)?)
    }

    /// Writes the bidirectional operating mode.
    pub fn set_bidirectional_mode(&mut self, mode: BidirectionalMode) -> Result<(), BicError> {
        self.write_u16(CMD_BIDIRECTIONAL_CONFIG, mode as u16)
    }

    /// Reads the bidirectional operating mode.
    pub fn bidirectional_mode(&mut self) -> Result<BidirectionalMode, BicError> {
        BidirectionalMode::try_from(self.read_u16(CMD_BIDIRECTIONAL_CONFIG)?)
    }

    /// Raw scaling-factor register; see the vendor manual for the nibble
    /// layout.
    pub fn scaling_factors(&mut self) -> Result<u16, BicError> {
        self.read_u16(CMD_SCALING_FACTOR)
    }

    /// Reads the manufacturer info registers and assembles the ASCII
    /// identity strings.
    pub fn device_info(&mut self) -> Result<DeviceInfo, BicError> {
        Ok(DeviceInfo {
            manufacturer: self.read_ascii(&[CMD_MFR_ID_B0B5, CMD_MFR_ID_B6B11])?,
            model: self.read_ascii(&[CMD_MFR_MODEL_B0B5, CMD_MFR_MODEL_B6B11])?,
            revision: self.read_ascii(&[CMD_MFR_REVISION_B0B5])?,
            location: self.read_ascii(&[CMD_MFR_LOCATION_B0B2])?,
            date: self.read_ascii(&[CMD_MFR_DATE_B0B5])?,
            serial: self.read_ascii(&[CMD_MFR_SERIAL_B0B5, CMD_MFR_SERIAL_B6B11])?,
        })
    }

    fn read_u16(&mut self, register: u16) -> Result<u16, BicError> {
        let payload = self.transport.read_register(register)?;
        decode_u16_le(&payload)
    }

    fn read_u8(&mut self, register: u16) -> Result<u8, BicError> {
        let payload = self.transport.read_register(register)?;
        decode_u8(&payload)
    }

    fn write_u16(&mut self, register: u16, value: u16) -> Result<(), BicError> {
        self.transport.write_register(register, &value.to_le_bytes())
    }

    fn write_u8(&mut self, register: u16, value: u8) -> Result<(), BicError> {
        self.transport.write_register(register, &[value])
    }

    fn read_ascii(&mut self, registers: &[u16]) -> Result<String, BicError> {
        let mut bytes = Vec::with_capacity(registers.len() * MAX_REGISTER_PAYLOAD);
        for &register in registers {
            bytes.extend_from_slice(&self.transport.read_register(register)?);
        }
        let text: String = bytes
            .into_iter()
            .take_while(|&b| b != 0)
            .map(char::from)
            .collect();
        Ok(text.trim_end().to_string())
    }
}

fn to_fixed(register: u16, value: f32, scale: f32) -> Result<u16, BicError> {
    let counts = (value / scale).round();
    if !counts.is_finite() || counts < 0.0 || counts > f32::from(u16::MAX) {
        return Err(BicError::OutOfRange { register, value });
    }
    Ok(counts as u16)
}
