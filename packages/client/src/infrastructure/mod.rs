//! Infrastructure layer: wire codec and the WebSocket transport.

pub mod codec;
pub mod transport;
