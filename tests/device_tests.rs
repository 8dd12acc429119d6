//! Integration tests for the device accessor layer: register selection,
//! wire encodings, fixed-point scaling, and typed decoding, all against the
//! mock bus.

use bic2200_rs::{
    Bic2200, BicError, BidirectionalMode, Direction, FaultStatus, MockCanBus, PowerOnPreset,
    SystemConfig, SystemStatus, TestClock, TransportConfig,
};
use std::time::Duration;

const REPLY_ID: u32 = 0x000C_0200;

fn device(bus: &MockCanBus) -> Bic2200<MockCanBus, TestClock> {
    let clock = TestClock::with_tick(Duration::from_micros(100));
    Bic2200::open_with_clock(bus.clone(), clock, 0, TransportConfig::default()).unwrap()
}

/// Tests that reply 0x00D2 on the temperature register decodes to 21.0 °C.
#[test]
fn test_read_temperature() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0x62, 0x00, 0xD2, 0x00]);
    let mut bic = device(&bus);

    assert_eq!(bic.read_temperature().unwrap(), 21.0);
}

/// Tests input voltage scaling (factor 0.1 V).
#[test]
fn test_read_input_voltage() {
    let bus = MockCanBus::new();
    // 0x0901 = 2305 -> 230.5 V
    bus.queue_reply(REPLY_ID, &[0x50, 0x00, 0x01, 0x09]);
    let mut bic = device(&bus);

    assert_eq!(bic.read_input_voltage().unwrap(), 230.5);
}

/// Tests output readback scaling (factor 0.01).
#[test]
fn test_read_output_voltage_and_current() {
    let bus = MockCanBus::new();
    // 4800 -> 48.00 V, 1000 -> 10.00 A
    bus.queue_reply(REPLY_ID, &[0x60, 0x00, 0xC0, 0x12]);
    bus.queue_reply(REPLY_ID, &[0x61, 0x00, 0xE8, 0x03]);
    let mut bic = device(&bus);

    assert_eq!(bic.read_output_voltage().unwrap(), 48.0);
    assert_eq!(bic.read_output_current().unwrap(), 10.0);
}

/// Tests that voltage setpoints hit the wire as little-endian centivolts.
#[test]
fn test_set_output_voltage_wire_encoding() {
    let bus = MockCanBus::new();
    let mut bic = device(&bus);

    bic.set_output_voltage(48.0).unwrap();

    let sent = bus.sent_frames();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].data(), &[0x20, 0x00, 0xC0, 0x12]);
}

/// Tests that current setpoints hit the wire as little-endian centiamps.
#[test]
fn test_set_output_current_wire_encoding() {
    let bus = MockCanBus::new();
    let mut bic = device(&bus);

    bic.set_output_current(10.0).unwrap();

    assert_eq!(bus.sent_frames()[0].data(), &[0x30, 0x00, 0xE8, 0x03]);
}

/// Tests the reverse setpoint registers.
#[test]
fn test_reverse_setpoint_registers() {
    let bus = MockCanBus::new();
    let mut bic = device(&bus);

    bic.set_reverse_output_voltage(48.0).unwrap();
    bic.set_reverse_output_current(10.0).unwrap();

    let sent = bus.sent_frames();
    assert_eq!(sent[0].data(), &[0x20, 0x01, 0xC0, 0x12]);
    assert_eq!(sent[1].data(), &[0x30, 0x01, 0xE8, 0x03]);
}

/// Tests that out-of-range setpoints are rejected before transmission.
#[test]
fn test_setpoint_out_of_range() {
    let bus = MockCanBus::new();
    let mut bic = device(&bus);

    assert!(matches!(
        bic.set_output_voltage(-1.0),
        Err(BicError::OutOfRange { .. })
    ));
    assert!(matches!(
        bic.set_output_voltage(700.0),
        Err(BicError::OutOfRange { .. })
    ));
    assert!(bus.sent_frames().is_empty());
}

/// Tests the one-byte operation register in both directions.
#[test]
fn test_operation_on_off() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0x00, 0x00, 0x01]);
    let mut bic = device(&bus);

    bic.set_operation(true).unwrap();
    bic.set_operation(false).unwrap();
    assert!(bic.operation().unwrap());

    let sent = bus.sent_frames();
    assert_eq!(sent[0].data(), &[0x00, 0x00, 0x01]);
    assert_eq!(sent[1].data(), &[0x00, 0x00, 0x00]);
}

/// Tests that an undocumented operation code is an error, not a guess.
#[test]
fn test_operation_invalid_code() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0x00, 0x00, 0x05]);
    let mut bic = device(&bus);

    assert!(matches!(
        bic.operation(),
        Err(BicError::InvalidValue {
            register: 0x0000,
            value: 5
        })
    ));
}

/// Tests the direction register round trip.
#[test]
fn test_direction() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0x00, 0x01, 0x01]);
    let mut bic = device(&bus);

    bic.set_direction(Direction::Reverse).unwrap();
    assert_eq!(bic.direction().unwrap(), Direction::Reverse);
    assert_eq!(bus.sent_frames()[0].data(), &[0x00, 0x01, 0x01]);
}

/// Tests SYSTEM_CONFIG encoding and decoding of the 3-bit code.
#[test]
fn test_system_config() {
    let bus = MockCanBus::new();
    // 0b101: CAN control enabled, preset = previous value
    bus.queue_reply(REPLY_ID, &[0xC2, 0x00, 0x05, 0x00]);
    let mut bic = device(&bus);

    bic.set_system_config(SystemConfig {
        can_control: true,
        preset: PowerOnPreset::On,
    })
    .unwrap();
    assert_eq!(bus.sent_frames()[0].data(), &[0xC2, 0x00, 0x03, 0x00]);

    let config = bic.system_config().unwrap();
    assert!(config.can_control);
    assert_eq!(config.preset, PowerOnPreset::Previous);
}

/// Tests that a reserved SYSTEM_CONFIG code is rejected.
#[test]
fn test_system_config_reserved_code() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0xC2, 0x00, 0x07, 0x00]);
    let mut bic = device(&bus);

    assert!(matches!(
        bic.system_config(),
        Err(BicError::InvalidValue { .. })
    ));
}

/// Tests fault status bitfield decoding.
#[test]
fn test_fault_status_bits() {
    let bus = MockCanBus::new();
    // bit 2 (OVP) + bit 5 (AC_FAIL)
    bus.queue_reply(REPLY_ID, &[0x40, 0x00, 0x24, 0x00]);
    let mut bic = device(&bus);

    let faults = bic.fault_status().unwrap();
    assert_eq!(faults, FaultStatus::OVP | FaultStatus::AC_FAIL);
}

/// Tests system status bitfield decoding.
#[test]
fn test_system_status_bits() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0xC1, 0x00, 0x02, 0x00]);
    let mut bic = device(&bus);

    assert!(bic.system_status().unwrap().contains(SystemStatus::DC_OK));
}

/// Tests the bidirectional mode register round trip.
#[test]
fn test_bidirectional_mode() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0x40, 0x01, 0x00, 0x00]);
    let mut bic = device(&bus);

    bic.set_bidirectional_mode(BidirectionalMode::Battery).unwrap();
    assert_eq!(bus.sent_frames()[0].data(), &[0x40, 0x01, 0x01, 0x00]);
    assert_eq!(
        bic.bidirectional_mode().unwrap(),
        BidirectionalMode::AutoDetect
    );
}

/// Tests the raw scaling-factor register.
#[test]
fn test_scaling_factors() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0xC0, 0x00, 0x34, 0x12]);
    let mut bic = device(&bus);

    assert_eq!(bic.scaling_factors().unwrap(), 0x1234);
}

/// Tests assembly of the manufacturer info strings from their 6-byte ASCII
/// register chunks.
#[test]
fn test_device_info() {
    let bus = MockCanBus::new();
    bus.queue_reply(REPLY_ID, &[0x80, 0x00, b'M', b'E', b'A', b'N', b'W', b'E']);
    bus.queue_reply(REPLY_ID, &[0x81, 0x00, b'L', b'L', b' ', b' ', b' ', b' ']);
    bus.queue_reply(REPLY_ID, &[0x82, 0x00, b'B', b'I', b'C', b'-', b'2', b'2']);
    bus.queue_reply(REPLY_ID, &[0x83, 0x00, b'0', b'0', b'-', b'2', b'4', 0x00]);
    bus.queue_reply(REPLY_ID, &[0x84, 0x00, b'R', b'1', b'.', b'0', b' ', b' ']);
    bus.queue_reply(REPLY_ID, &[0x85, 0x00, b'T', b'W', b'N']);
    bus.queue_reply(REPLY_ID, &[0x86, 0x00, b'2', b'3', b'0', b'9', b'0', b'1']);
    bus.queue_reply(REPLY_ID, &[0x87, 0x00, b'0', b'0', b'0', b'0', b'1', b'2']);
    bus.queue_reply(REPLY_ID, &[0x88, 0x00, b'3', b'4', b'5', b'6', 0x00, 0x00]);
    let mut bic = device(&bus);

    let info = bic.device_info().unwrap();
    assert_eq!(info.manufacturer, "MEANWELL");
    assert_eq!(info.model, "BIC-2200-24");
    assert_eq!(info.revision, "R1.0");
    assert_eq!(info.location, "TWN");
    assert_eq!(info.date, "230901");
    assert_eq!(info.serial, "0000123456");
}

/// Tests that a read failure surfaces instead of a stale or zero value.
#[test]
fn test_read_failure_is_not_zero() {
    let bus = MockCanBus::new();
    let mut bic = device(&bus);

    assert!(matches!(
        bic.read_temperature(),
        Err(BicError::Timeout(_))
    ));
}
