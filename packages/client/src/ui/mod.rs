//! Presentation side of a session: the sink trait and the shipped sinks.

mod channel;
mod console;
mod sink;

pub use channel::{ChannelSink, SinkEvent};
pub use console::ConsoleSink;
pub use sink::ChatSink;
