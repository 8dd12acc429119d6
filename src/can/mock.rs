//! Mock CAN bus implementation for testing
//!
//! This module provides a mock CAN bus that can be used to test the
//! register transport without requiring actual hardware. Cloned handles
//! share state, so a test can keep one handle for inspection while the
//! transport owns another.

use crate::can::bus::CanBus;
use crate::can::frame::CanFrame;
use crate::error::BicError;
use bytes::{Buf, BytesMut};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

struct QueuedReply {
    frame: CanFrame,
    /// Number of polls to answer `false` before delivering the frame.
    delay_polls: usize,
}

#[derive(Default)]
struct MockState {
    configured: Option<(u32, u32)>,
    started: bool,
    fail_start: bool,
    staged: Option<(u32, Vec<u8>)>,
    sent: Vec<CanFrame>,
    replies: VecDeque<QueuedReply>,
    rx: BytesMut,
    polls: usize,
}

/// Mock CAN bus that simulates the device side of the register protocol.
#[derive(Clone, Default)]
pub struct MockCanBus {
    state: Arc<Mutex<MockState>>,
}

impl MockCanBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply frame to be delivered on the next poll.
    pub fn queue_reply(&self, id: u32, data: &[u8]) {
        self.queue_reply_after(id, data, 0);
    }

    /// Queues a reply frame delivered only after `delay_polls` empty polls.
    pub fn queue_reply_after(&self, id: u32, data: &[u8], delay_polls: usize) {
        let frame = CanFrame::new(id, data).expect("reply data exceeds one CAN frame");
        self.state.lock().unwrap().replies.push_back(QueuedReply {
            frame,
            delay_polls,
        });
    }

    /// Frames transmitted through the bus so far.
    pub fn sent_frames(&self) -> Vec<CanFrame> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Makes the next `start` call fail.
    pub fn fail_start(&self) {
        self.state.lock().unwrap().fail_start = true;
    }

    /// The (bit_rate, clock_hz) pair passed to `configure`, if any.
    pub fn configured(&self) -> Option<(u32, u32)> {
        self.state.lock().unwrap().configured
    }

    /// Whether `start` has completed successfully.
    pub fn started(&self) -> bool {
        self.state.lock().unwrap().started
    }

    /// Number of `poll_frame` calls made so far.
    pub fn poll_count(&self) -> usize {
        self.state.lock().unwrap().polls
    }

    /// Drops all buffered frames and counters.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.sent.clear();
        state.replies.clear();
        state.rx.clear();
        state.staged = None;
        state.polls = 0;
    }
}

impl CanBus for MockCanBus {
    fn configure(&mut self, bit_rate: u32, clock_hz: u32) -> Result<(), BicError> {
        self.state.lock().unwrap().configured = Some((bit_rate, clock_hz));
        Ok(())
    }

    fn start(&mut self) -> Result<(), BicError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_start {
            return Err(BicError::InitFailure("simulated start failure".into()));
        }
        state.started = true;
        Ok(())
    }

    fn begin_frame(&mut self, id: u32) -> Result<(), BicError> {
        self.state.lock().unwrap().staged = Some((id, Vec::new()));
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BicError> {
        let mut state = self.state.lock().unwrap();
        match state.staged {
            Some((_, ref mut data)) => {
                data.push(byte);
                Ok(())
            }
            None => Err(BicError::Bus("write_byte without begin_frame".into())),
        }
    }

    fn end_frame(&mut self) -> Result<(), BicError> {
        let mut state = self.state.lock().unwrap();
        let (id, data) = state
            .staged
            .take()
            .ok_or_else(|| BicError::Bus("end_frame without begin_frame".into()))?;
        let frame =
            CanFrame::new(id, &data).ok_or_else(|| BicError::Bus("staged frame overflow".into()))?;
        state.sent.push(frame);
        Ok(())
    }

    fn poll_frame(&mut self) -> Result<bool, BicError> {
        let mut state = self.state.lock().unwrap();
        state.polls += 1;
        if let Some(reply) = state.replies.front_mut() {
            if reply.delay_polls > 0 {
                reply.delay_polls -= 1;
                return Ok(false);
            }
        }
        match state.replies.pop_front() {
            Some(reply) => {
                state.rx.extend_from_slice(reply.frame.data());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn available(&self) -> usize {
        self.state.lock().unwrap().rx.remaining()
    }

    fn read_byte(&mut self) -> Result<u8, BicError> {
        let mut state = self.state.lock().unwrap();
        if !state.rx.has_remaining() {
            return Err(BicError::Bus("read past end of received frame".into()));
        }
        Ok(state.rx.get_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_bus_creation() {
        let bus = MockCanBus::new();
        assert_eq!(bus.sent_frames().len(), 0);
        assert!(!bus.started());
    }

    #[test]
    fn test_staged_frame_is_recorded_on_end() {
        let mut bus = MockCanBus::new();
        bus.begin_frame(0x000C_0300).unwrap();
        bus.write_byte(0x62).unwrap();
        bus.write_byte(0x00).unwrap();
        bus.end_frame().unwrap();

        let sent = bus.sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id(), 0x000C_0300);
        assert_eq!(sent[0].data(), &[0x62, 0x00]);
    }

    #[test]
    fn test_write_byte_without_begin_fails() {
        let mut bus = MockCanBus::new();
        assert!(bus.write_byte(0x00).is_err());
    }

    #[test]
    fn test_queued_reply_is_delivered_on_poll() {
        let mut bus = MockCanBus::new();
        bus.queue_reply(0x000C_0200, &[0x62, 0x00, 0xD2, 0x00]);

        assert!(bus.poll_frame().unwrap());
        assert_eq!(bus.available(), 4);
        assert_eq!(bus.read_byte().unwrap(), 0x62);
    }

    #[test]
    fn test_delayed_reply_waits_for_polls() {
        let mut bus = MockCanBus::new();
        bus.queue_reply_after(0x000C_0200, &[0x62, 0x00], 2);

        assert!(!bus.poll_frame().unwrap());
        assert!(!bus.poll_frame().unwrap());
        assert!(bus.poll_frame().unwrap());
    }

    #[test]
    fn test_fail_start() {
        let mut bus = MockCanBus::new();
        bus.fail_start();
        assert!(matches!(bus.start(), Err(BicError::InitFailure(_))));
    }
}
