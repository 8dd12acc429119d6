//! Linux SocketCAN backend.
//!
//! Adapts the byte-level `CanBus` trait onto a non-blocking
//! `socketcan::CanSocket`. Bit timing of a SocketCAN interface is
//! configured out-of-band (`ip link set can0 type can bitrate 250000`), so
//! `configure` only records the requested values.

use crate::can::bus::CanBus;
use crate::constants::CAN_FRAME_MAX_DATA;
use crate::error::BicError;
use bytes::{Buf, BytesMut};
use log::{debug, warn};
use socketcan::{CanFrame as LinuxFrame, CanSocket, EmbeddedFrame, ExtendedId, Socket};
use std::io;

/// `CanBus` implementation over a Linux SocketCAN interface.
pub struct SocketCanBus {
    interface: String,
    socket: Option<CanSocket>,
    staged: Option<(u32, Vec<u8>)>,
    rx: BytesMut,
}

impl SocketCanBus {
    /// Creates an unstarted bus bound to a CAN interface name (e.g. "can0").
    pub fn new(interface: &str) -> Self {
        SocketCanBus {
            interface: interface.to_string(),
            socket: None,
            staged: None,
            rx: BytesMut::new(),
        }
    }

    fn socket(&self) -> Result<&CanSocket, BicError> {
        self.socket
            .as_ref()
            .ok_or_else(|| BicError::Bus("CAN socket not started".into()))
    }
}

impl CanBus for SocketCanBus {
    fn configure(&mut self, bit_rate: u32, clock_hz: u32) -> Result<(), BicError> {
        debug!(
            "{}: bit timing ({bit_rate} bit/s, {clock_hz} Hz ref) is set via `ip link` on Linux",
            self.interface
        );
        Ok(())
    }

    fn start(&mut self) -> Result<(), BicError> {
        let socket = CanSocket::open(&self.interface)
            .map_err(|e| BicError::InitFailure(format!("{}: {e}", self.interface)))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| BicError::InitFailure(format!("{}: {e}", self.interface)))?;
        self.socket = Some(socket);
        Ok(())
    }

    fn begin_frame(&mut self, id: u32) -> Result<(), BicError> {
        self.staged = Some((id, Vec::with_capacity(CAN_FRAME_MAX_DATA)));
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BicError> {
        match self.staged {
            Some((_, ref mut data)) if data.len() < CAN_FRAME_MAX_DATA => {
                data.push(byte);
                Ok(())
            }
            Some(_) => Err(BicError::Bus("staged frame overflow".into())),
            None => Err(BicError::Bus("write_byte without begin_frame".into())),
        }
    }

    fn end_frame(&mut self) -> Result<(), BicError> {
        let (id, data) = self
            .staged
            .take()
            .ok_or_else(|| BicError::Bus("end_frame without begin_frame".into()))?;
        let id = ExtendedId::new(id)
            .ok_or_else(|| BicError::Bus(format!("identifier {id:08X} exceeds 29 bits")))?;
        let frame = LinuxFrame::new(id, &data)
            .ok_or_else(|| BicError::Bus("frame data exceeds one CAN frame".into()))?;
        self.socket()?
            .write_frame(&frame)
            .map_err(|e| BicError::Bus(e.to_string()))
    }

    fn poll_frame(&mut self) -> Result<bool, BicError> {
        match self.socket()?.read_frame() {
            Ok(LinuxFrame::Data(frame)) => {
                self.rx.extend_from_slice(frame.data());
                Ok(true)
            }
            Ok(other) => {
                warn!("{}: ignoring non-data frame {other:?}", self.interface);
                Ok(false)
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(BicError::Bus(e.to_string())),
        }
    }

    fn available(&self) -> usize {
        self.rx.remaining()
    }

    fn read_byte(&mut self) -> Result<u8, BicError> {
        if !self.rx.has_remaining() {
            return Err(BicError::Bus("read past end of received frame".into()));
        }
        Ok(self.rx.get_u8())
    }
}
