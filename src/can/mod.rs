//! The can module contains the components of the register transport: frame
//! construction and decoding, the bus collaborator trait, the clock
//! abstraction, and the blocking request/response transport itself.

pub mod bus;
pub mod clock;
pub mod frame;
pub mod mock;
#[cfg(feature = "socketcan")]
pub mod socketcan;
pub mod transport;

pub use bus::CanBus;
pub use clock::{Clock, MonotonicClock};
pub use frame::CanFrame;
pub use transport::{RegisterTransport, TransportConfig};
